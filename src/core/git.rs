//! Thin wrapper around the bundled Git executable. Output is echoed live
//! line by line and also collected so the caller can inspect it afterwards.

use crate::error::{Result, WrenkitError};
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Result of one Git invocation. A non-zero exit is not an error at this
/// layer; the orchestrator decides how to report it.
pub struct GitOutcome {
    pub exit_code: Option<i32>,
    pub output: String,
}

impl GitOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

pub trait GitClient {
    fn run(&self, args: &[&str]) -> Result<GitOutcome>;
}

/// Runs the Git binary shipped inside the bundle, anchored to an explicit
/// working directory rather than the process cwd.
pub struct BundledGit {
    binary: PathBuf,
    workdir: PathBuf,
}

impl BundledGit {
    pub fn new(binary: PathBuf, workdir: PathBuf) -> Self {
        Self { binary, workdir }
    }
}

impl GitClient for BundledGit {
    fn run(&self, args: &[&str]) -> Result<GitOutcome> {
        println!("\nRunning: git {}", args.join(" "));
        println!("{}", "-".repeat(60));

        let mut child = Command::new(&self.binary)
            .args(args)
            .current_dir(&self.workdir)
            .stdout(Stdio::piped())
            // Git writes its progress to stderr; pass it straight through.
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| WrenkitError::GitError {
                message: format!("failed to run {}: {e}", self.binary.display()),
            })?;

        let mut collected = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            for line in BufReader::new(stdout).lines() {
                let line = line?;
                println!("{line}");
                collected.push(line);
            }
        }

        let status = child.wait()?;
        println!("{}", "-".repeat(60));

        Ok(GitOutcome {
            exit_code: status.code(),
            output: collected.join("\n"),
        })
    }
}
