//! Music addon management: the download/extract/install pipeline and the
//! first-run init flow that seeds configuration and model files from the
//! primary server component.

use crate::core::archive;
use crate::core::config::Config;
use crate::core::download::Downloader;
use crate::core::http::{ReqwestTransport, Transport};
use crate::error::Result;
use crate::utils::fs;
use crate::utils::prompt::{ConsolePrompter, Prompter};


pub fn install(config: &Config) -> Result<()> {
    let transport = ReqwestTransport::new()?;
    install_with(config, &transport)
}

/// Full pipeline: download the branch archive (skipped when a previous run
/// left one behind), extract it, copy the server subtree into the bundle,
/// and clean up the temporary artifacts whatever the copy step did.
pub fn install_with(config: &Config, transport: &dyn Transport) -> Result<()> {
    let archive_path = config.archive_path();

    if archive_path.exists() {
        println!("Found existing {}, skipping download", archive_path.display());
    } else {
        println!("Downloading music addon archive...");
        let urls = config.mirror_archive_urls();
        Downloader::new(transport).download_with_fallbacks(&urls, &archive_path)?;
    }

    let extracted_root = archive::extract_archive(&archive_path, &config.root)?;

    // The server component lives at main/wren-server inside the archive.
    let source = extracted_root.join("main").join("wren-server");
    let result = archive::install_subtree(&source, &config.addon_dir());

    archive::cleanup_artifacts(&archive_path, &extracted_root);

    result?;
    println!("🎉 Music addon installed: {}", config.addon_dir().display());
    Ok(())
}

pub fn init(config: &Config) -> Result<()> {
    let transport = ReqwestTransport::new()?;
    init_with(config, &transport, &ConsolePrompter)
}

/// First-run flow: offer to download the addon when it is missing, then
/// seed it with the shared configuration directory and the speech model.
pub fn init_with(
    config: &Config,
    transport: &dyn Transport,
    prompter: &dyn Prompter,
) -> Result<()> {
    if config.addon_dir().exists() {
        println!(
            "The music addon is already installed; start it from the bundle root when ready."
        );
        return Ok(());
    }

    if !prompter.confirm("The music addon is not installed yet. Download it now?", true)? {
        println!("Download cancelled");
        return Ok(());
    }

    install_with(config, transport)?;
    seed_shared_assets(config)?;

    println!("🎉 Music addon is ready");
    Ok(())
}

/// Copy the shared configuration directory and the speech-recognition model
/// from the primary component into the addon. Each step is skipped when the
/// target already exists; a missing source is a terminal error.
pub fn seed_shared_assets(config: &Config) -> Result<()> {
    let addon_data = config.addon_data_dir();
    if addon_data.exists() {
        println!("Configuration already present, skipping copy");
    } else {
        let source = config.data_dir();
        if !source.exists() {
            return Err(crate::error::WrenkitError::MissingSource { path: source });
        }
        println!("Copying configuration to the music addon...");
        fs::copy_dir_recursive(&source, &addon_data)?;
        println!("✅ Configuration copied");
    }

    let addon_model = config.addon_model_file();
    if addon_model.exists() {
        println!("Speech recognition model already present, skipping copy");
    } else {
        let source = config.model_file();
        if !source.exists() {
            return Err(crate::error::WrenkitError::MissingSource { path: source });
        }
        println!("Copying the speech recognition model, this can take a while...");
        fs::copy_file_with_progress(&source, &addon_model)?;
        println!("✅ Model copied");
    }

    Ok(())
}
