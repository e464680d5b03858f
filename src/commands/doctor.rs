use crate::core::config::Config;
use crate::error::Result;
use std::path::Path;

/// Non-interactive report on the bundle layout and tooling. Reports issues
/// without failing; it is a diagnostic, not a gate.
pub fn check_environment(config: &Config) -> Result<()> {
    println!("🔍 Wren bundle - Environment Check");
    println!();
    println!("📁 Bundle root: {}", config.root.display());
    println!();

    let mut issues_found = 0;

    println!("📦 Components:");
    issues_found += check_path("source tree", &config.src_dir());
    issues_found += check_path("server component", &config.server_dir());
    issues_found += check_path("configuration directory", &config.data_dir());
    issues_found += check_path("configuration file", &config.config_marker());
    issues_found += check_path("speech model", &config.model_file());
    // The addon is optional; its absence is informational only.
    let addon = config.addon_dir();
    if addon.exists() {
        println!("  music addon: {}", addon.display());
        println!("    ✅ installed");
    } else {
        println!("  music addon: not installed (run `wrenkit music init`)");
    }

    println!();
    println!("🔧 Tooling:");
    let git_binary = config.git_binary();
    println!("  bundled git: {}", git_binary.display());
    if git_binary.exists() {
        println!("    ✅ exists");
    } else {
        println!("    ❌ missing");
        match which::which("git") {
            Ok(system_git) => {
                println!("    ℹ️  a system git was found at {}", system_git.display())
            }
            Err(_) => println!("    ℹ️  no system git found either"),
        }
        issues_found += 1;
    }

    println!();
    println!("💾 Backups:");
    let backup_root = config.backup_root();
    if backup_root.exists() {
        let count = std::fs::read_dir(&backup_root)?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .count();
        println!("  {count} backup(s) in {}", backup_root.display());
    } else {
        println!("  no backups yet");
    }

    println!();
    if issues_found == 0 {
        println!("✅ No issues found");
    } else {
        println!("⚠️  {issues_found} issue(s) found");
    }

    Ok(())
}

fn check_path(label: &str, path: &Path) -> u32 {
    println!("  {label}: {}", path.display());
    if path.exists() {
        println!("    ✅ exists");
        0
    } else {
        println!("    ❌ missing");
        1
    }
}
