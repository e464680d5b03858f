use crate::error::{Result, WrenkitError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Canonical Git URL of the primary server repository.
const DEFAULT_REPO_URL: &str = "https://github.com/wren-voice/wren-server.git";

/// Canonical URL of the music addon branch archive.
const DEFAULT_ADDON_ARCHIVE_URL: &str =
    "https://github.com/wren-voice/wren-server-music/archive/refs/heads/master.zip";

const DEFAULT_MAIN_BRANCH: &str = "main";

fn default_mirrors() -> Vec<String> {
    [
        "https://ghfast.top",
        "https://gh.ddlc.top",
        "https://slink.ltd",
        "https://cors.isteed.cc",
        "https://hub.gitmirror.com",
        "https://sciproxy.com",
        "https://ghproxy.net",
        "https://gitclone.com",
        "https://hub.incept.pw",
        "https://github.moeyy.xyz",
        "https://dl.ghpig.top",
        "https://gh-proxy.com",
        "https://hub.whtrys.space",
        "https://gh-proxy.ygxz.in",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_repo_url() -> String {
    DEFAULT_REPO_URL.to_string()
}

fn default_addon_archive_url() -> String {
    DEFAULT_ADDON_ARCHIVE_URL.to_string()
}

fn default_main_branch() -> String {
    DEFAULT_MAIN_BRANCH.to_string()
}

/// Bundle configuration: the root directory plus the endpoint values that
/// used to be hardcoded in the maintenance scripts. An optional
/// `config.json` at the bundle root overrides the built-in defaults.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(skip)]
    pub root: PathBuf,

    /// Mirror base URLs in priority order; doubles as the latency-probe
    /// candidate set.
    #[serde(default = "default_mirrors")]
    pub mirrors: Vec<String>,

    #[serde(default = "default_repo_url")]
    pub repo_url: String,

    #[serde(default = "default_addon_archive_url")]
    pub addon_archive_url: String,

    #[serde(default = "default_main_branch")]
    pub main_branch: String,
}

impl Config {
    pub fn with_root(root: PathBuf) -> Self {
        Config {
            root,
            mirrors: default_mirrors(),
            repo_url: default_repo_url(),
            addon_archive_url: default_addon_archive_url(),
            main_branch: default_main_branch(),
        }
    }

    /// Build the configuration for the bundle containing the running
    /// executable, applying `config.json` overrides when present.
    pub fn load() -> Result<Self> {
        let root = bundle_root()?;
        Self::load_from(root)
    }

    pub fn load_from(root: PathBuf) -> Result<Self> {
        let config_path = root.join("config.json");

        if !config_path.exists() {
            return Ok(Self::with_root(root));
        }

        let content = std::fs::read_to_string(&config_path)?;
        let mut config: Config = serde_json::from_str(&content)?;

        if config.mirrors.is_empty() {
            return Err(WrenkitError::config_error(
                "config.json declares an empty mirror list",
            ));
        }

        config.root = root;
        Ok(config)
    }

    pub fn src_dir(&self) -> PathBuf {
        self.root.join("src")
    }

    pub fn server_dir(&self) -> PathBuf {
        self.src_dir().join("main").join("wren-server")
    }

    pub fn addon_dir(&self) -> PathBuf {
        self.src_dir().join("main").join("music-wren-server")
    }

    pub fn data_dir(&self) -> PathBuf {
        self.server_dir().join("data")
    }

    /// Marker file whose presence gates the pre-update configuration backup.
    pub fn config_marker(&self) -> PathBuf {
        self.data_dir().join(".config.yaml")
    }

    pub fn model_file(&self) -> PathBuf {
        self.server_dir()
            .join("models")
            .join("SenseVoiceSmall")
            .join("model.pt")
    }

    pub fn addon_data_dir(&self) -> PathBuf {
        self.addon_dir().join("data")
    }

    pub fn addon_model_file(&self) -> PathBuf {
        self.addon_dir()
            .join("models")
            .join("SenseVoiceSmall")
            .join("model.pt")
    }

    pub fn backup_root(&self) -> PathBuf {
        self.root.join("backup")
    }

    pub fn git_binary(&self) -> PathBuf {
        let relative: &Path = if cfg!(windows) {
            Path::new("runtime/git/cmd/git.exe")
        } else {
            Path::new("runtime/git/bin/git")
        };
        self.root.join(relative)
    }

    /// Where the downloaded addon archive lands.
    pub fn archive_path(&self) -> PathBuf {
        self.root.join("master.zip")
    }

    /// The addon archive URL as served by each mirror, in priority order.
    pub fn mirror_archive_urls(&self) -> Vec<String> {
        self.mirrors
            .iter()
            .map(|mirror| compose_mirror_url(mirror, &self.addon_archive_url))
            .collect()
    }

    /// The repository URL rewritten through a mirror proxy.
    pub fn proxied_repo_url(&self, mirror: &str) -> String {
        compose_mirror_url(mirror, &self.repo_url)
    }
}

/// Mirror proxies re-serve the canonical URL appended to their own base.
fn compose_mirror_url(mirror_base: &str, canonical_url: &str) -> String {
    format!("{}/{}", mirror_base.trim_end_matches('/'), canonical_url)
}

/// The bundle root is the directory holding the running executable, not the
/// process working directory.
fn bundle_root() -> Result<PathBuf> {
    let exe = std::env::current_exe().map_err(|_| WrenkitError::RootNotFound)?;
    exe.parent()
        .map(|p| p.to_path_buf())
        .ok_or(WrenkitError::RootNotFound)
}
