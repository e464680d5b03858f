pub mod doctor;
pub mod music;
pub mod update;
