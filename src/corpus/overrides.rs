use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::engine::mnemonic::MnemonicOverrides;

/// Newline-delimited override words. A missing file means no overrides.
pub fn load(path: &Path) -> Result<MnemonicOverrides> {
    if !path.exists() {
        return Ok(MnemonicOverrides::default());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read mnemonic overrides {}", path.display()))?;
    let overrides = MnemonicOverrides::from_words(text.lines());
    info!(path = %path.display(), entries = overrides.len(), "loaded mnemonic overrides");
    Ok(overrides)
}
