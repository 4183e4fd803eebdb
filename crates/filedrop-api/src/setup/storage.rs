//! Storage setup and initialization

use anyhow::{Context, Result};
use filedrop_core::Config;
use filedrop_storage::LocalStorage;

/// Create the destination and staging directories and pin the destination to
/// its canonical path.
pub fn setup_storage(config: &mut Config) -> Result<()> {
    tracing::info!(
        path = %config.destination_dir.display(),
        "Preparing upload directory..."
    );

    config.destination_dir = LocalStorage::ensure_directory(&config.destination_dir)
        .context("DESTINATION_DIR is not usable")?;

    if let Some(temp_dir) = &config.upload_temp_dir {
        let canonical =
            LocalStorage::ensure_directory(temp_dir).context("UPLOAD_TEMP_DIR is not usable")?;
        config.upload_temp_dir = Some(canonical);
    }

    tracing::info!(
        destination = %config.destination_dir.display(),
        staging = %config
            .upload_temp_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
            .display(),
        allow_overwrite = config.allow_overwrite,
        "Local storage ready"
    );

    Ok(())
}
