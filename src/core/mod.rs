pub mod archive;
pub mod config;
pub mod download;
pub mod git;
pub mod http;
pub mod probe;
