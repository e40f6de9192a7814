use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use thiserror::Error;
use tracing::{info, warn};

use crate::engine::cipher_map::{CipherError, CipherMap, PLAIN_ALPHABET};

#[derive(Debug, Error)]
pub enum CipherFileError {
    #[error("{} doesn't exist", .0.display())]
    Missing(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Unreadable { path: PathBuf, source: io::Error },
    #[error("{} does not hold a valid cipher ({source}); read it as:\n{content}", path.display())]
    Invalid {
        path: PathBuf,
        content: String,
        source: CipherError,
    },
}

pub fn load(path: &Path) -> Result<CipherMap, CipherFileError> {
    if !path.exists() {
        return Err(CipherFileError::Missing(path.to_path_buf()));
    }
    let raw = fs::read_to_string(path).map_err(|source| CipherFileError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let content = raw.trim();
    CipherMap::new(content).map_err(|source| CipherFileError::Invalid {
        path: path.to_path_buf(),
        content: content.to_string(),
        source,
    })
}

/// Write via a temp file and rename so a crash never leaves half a cipher.
pub fn save(path: &Path, cipher: &CipherMap) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&tmp_path)
        .with_context(|| format!("failed to create {}", tmp_path.display()))?;
    file.write_all(cipher.as_cipher_string().as_bytes())?;
    file.sync_all()?;
    fs::rename(&tmp_path, path)
        .with_context(|| format!("failed to write cipher to {}", path.display()))?;
    info!(path = %path.display(), "saved cipher");
    Ok(())
}

/// Ask for the cipher on `output` until `input` yields a valid one.
pub fn prompt_cipher<R: BufRead, W: Write>(mut input: R, mut output: W) -> Result<CipherMap> {
    let mut line = String::new();
    loop {
        writeln!(output, "{PLAIN_ALPHABET} should correspond to:")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            bail!("no cipher entered");
        }
        match CipherMap::new(line.trim_end_matches(['\r', '\n'])) {
            Ok(cipher) => return Ok(cipher),
            Err(err) => writeln!(output, "{err}")?,
        }
    }
}

/// Prompt for a fresh cipher and persist it.
pub fn set_interactively<R: BufRead, W: Write>(path: &Path, input: R, output: W) -> Result<CipherMap> {
    let cipher = prompt_cipher(input, output)?;
    save(path, &cipher)?;
    Ok(cipher)
}

/// Load the saved cipher, falling back to the interactive prompt when the file
/// is missing or malformed.
pub fn load_or_prompt<R: BufRead, W: Write>(path: &Path, input: R, output: W) -> Result<CipherMap> {
    load_or_prompt_via(path, || Ok((input, output)))
}

/// Like [`load_or_prompt`], but the prompt streams are only opened once the
/// file turns out to be unusable. Callers whose stdin carries data use this to
/// ask on the controlling terminal instead.
pub fn load_or_prompt_via<R, W, F>(path: &Path, open_prompt: F) -> Result<CipherMap>
where
    R: BufRead,
    W: Write,
    F: FnOnce() -> io::Result<(R, W)>,
{
    match load(path) {
        Ok(cipher) => {
            info!(path = %path.display(), "loaded cipher");
            Ok(cipher)
        }
        Err(err) => {
            warn!(error = %err, "cipher file unusable, prompting");
            let (input, mut output) = open_prompt().with_context(|| {
                format!("{err}; no terminal to ask on, run `cipher-drill set-cipher` first")
            })?;
            writeln!(output, "{err}")?;
            set_interactively(path, input, output)
        }
    }
}
