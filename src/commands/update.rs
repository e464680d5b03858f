//! Update orchestrator: wraps the bundled Git to pull upstream changes,
//! optionally through a mirror proxy, with a configuration backup before
//! destructive synchronization.

use crate::core::config::Config;
use crate::core::git::{BundledGit, GitClient};
use crate::core::http::{ReqwestTransport, Transport};
use crate::core::probe;
use crate::error::{Result, WrenkitError};
use crate::utils::fs;
use crate::utils::prompt::{choose_index, choose_required, ConsolePrompter, Prompter};
use std::path::PathBuf;

/// Substring Git prints when a pull had nothing to do. This is a documented
/// dependency on Git's message text ("Already up to date." today,
/// "Already up-to-date." in older releases); exit codes stay the
/// authoritative failure signal.
const ALREADY_UP_TO_DATE: &str = "Already up";

/// Exact phrase required to run a destructive synchronization.
const FORCE_CONFIRM_PHRASE: &str = "force sync";

pub fn run(config: &Config) -> Result<()> {
    let prompter = ConsolePrompter;

    // Environment check: bundled Git and the source tree must exist.
    let git_binary = config.git_binary();
    if !git_binary.exists() {
        eprintln!("❌ Git executable not found: {}", git_binary.display());
        prompter.pause("Press Enter to exit")?;
        return Err(WrenkitError::GitNotFound { path: git_binary });
    }
    let src_dir = config.src_dir();
    if !src_dir.exists() {
        eprintln!("❌ Source tree not found: {}", src_dir.display());
        prompter.pause("Press Enter to exit")?;
        return Err(WrenkitError::MissingSource { path: src_dir });
    }

    println!("Wren server update");
    println!("Working directory: {}", src_dir.display());

    let git = BundledGit::new(git_binary, src_dir);
    let transport = ReqwestTransport::new()?;

    let result = orchestrate(config, &prompter, &transport, &git);

    // Always show the configured remotes, whatever path was taken.
    println!("\nCurrent remote addresses:");
    let _ = git.run(&["remote", "-v"]);

    prompter.pause("\nDone, press Enter to exit")?;
    result
}

/// The interactive state machine, separated from console and process wiring
/// so it can be driven by scripted prompts in tests.
pub(crate) fn orchestrate(
    config: &Config,
    prompter: &dyn Prompter,
    transport: &dyn Transport,
    git: &dyn GitClient,
) -> Result<()> {
    configure_proxy(config, prompter, transport, git)?;

    let modes = vec![
        "Standard pull (keeps local changes)".to_string(),
        "Force sync (discards local changes)".to_string(),
    ];
    println!("\nChoose how to update:");
    match choose_required(prompter, &modes)? {
        0 => standard_pull(git),
        _ => force_sync(config, prompter, git),
    }
}

fn configure_proxy(
    config: &Config,
    prompter: &dyn Prompter,
    transport: &dyn Transport,
    git: &dyn GitClient,
) -> Result<()> {
    if !prompter.confirm("\nConfigure a GitHub mirror proxy?", false)? {
        return Ok(());
    }

    if prompter.confirm("Select the fastest mirror automatically?", true)? {
        println!("Probing mirrors...");
        match probe::select_fastest_mirror(transport, &config.mirrors) {
            Some((mirror, latency)) => {
                println!("Fastest mirror: {mirror} ({} ms)", latency.as_millis());
                set_origin(git, &config.proxied_repo_url(&mirror))?;
            }
            None => println!("⚠️  No mirror responded, continuing without a proxy"),
        }
        return Ok(());
    }

    println!("\nAvailable mirrors:");
    match choose_index(prompter, &config.mirrors)? {
        Some(index) => set_origin(git, &config.proxied_repo_url(&config.mirrors[index]))?,
        None => {
            if prompter.confirm("Reset origin to the canonical address?", false)? {
                set_origin(git, &config.repo_url)?;
            } else {
                println!("Proxy setup cancelled");
            }
        }
    }

    Ok(())
}

fn set_origin(git: &dyn GitClient, url: &str) -> Result<()> {
    println!("Setting origin to {url}");
    let outcome = git.run(&["remote", "set-url", "origin", url])?;
    if !outcome.success() {
        println!("❌ Failed to update the remote address");
    }
    Ok(())
}

fn standard_pull(git: &dyn GitClient) -> Result<()> {
    let outcome = git.run(&["pull"])?;

    if !outcome.success() {
        println!("❌ Pull failed, check the output above");
    } else if outcome.output.contains(ALREADY_UP_TO_DATE) {
        println!("🎉 Already up to date!");
    } else {
        println!("✅ Pull complete; refresh the bundle dependencies when convenient.");
    }
    Ok(())
}

fn force_sync(config: &Config, prompter: &dyn Prompter, git: &dyn GitClient) -> Result<()> {
    println!("\n⚠️  Warning: a force sync discards ALL local modifications!");
    let answer = prompter.input(&format!(
        "Type \"{FORCE_CONFIRM_PHRASE}\" to confirm"
    ))?;
    if answer.trim() != FORCE_CONFIRM_PHRASE {
        println!("⛔ Confirmation did not match, force sync cancelled");
        return Ok(());
    }

    // Backup failure never blocks the sync.
    if backup_config(config).is_none() {
        println!("⚠️  Configuration was not backed up, continuing with the force sync");
    }

    println!("\nForce syncing...");
    let fetch = git.run(&["fetch", "--all"])?;
    if !fetch.success() {
        println!("❌ Fetch failed, check the output above");
        return Ok(());
    }

    let target = format!("origin/{}", config.main_branch);
    let reset = git.run(&["reset", "--hard", &target])?;
    if !reset.success() {
        println!("❌ Reset failed, check the output above");
        return Ok(());
    }

    println!("🎉 Force sync complete; refresh the bundle dependencies when convenient.");
    Ok(())
}

/// Snapshot the configuration directory into a timestamped backup folder.
/// Returns the backup path, or `None` when the backup was skipped or
/// failed; the caller proceeds either way.
pub(crate) fn backup_config(config: &Config) -> Option<PathBuf> {
    let data_dir = config.data_dir();
    if !data_dir.exists() {
        println!("⚠️  Configuration directory not found: {}", data_dir.display());
        return None;
    }
    if !config.config_marker().exists() {
        println!("⚠️  Configuration file not found, skipping backup");
        return None;
    }

    let stamp = chrono::Local::now().format("%Y%m%d%H%M%S");
    let backup_dir = config.backup_root().join(format!("backup_{stamp}"));

    match fs::copy_dir_recursive(&data_dir, &backup_dir) {
        Ok(()) => {
            println!("✅ Configuration backed up to {}", backup_dir.display());
            Some(backup_dir)
        }
        Err(e) => {
            println!("❌ Backup failed: {e}");
            None
        }
    }
}
