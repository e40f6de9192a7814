use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::{debug, warn};

/// Flat directory of downloaded files under the user's data dir.
pub struct DiskCache {
    base_dir: PathBuf,
}

impl DiskCache {
    pub fn new(subdir: &str) -> Option<Self> {
        let base = dirs::data_dir()?.join("cipher-drill").join(subdir);
        Self::with_base_dir(base).ok()
    }

    pub fn with_base_dir(base_dir: PathBuf) -> io::Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let path = self.base_dir.join(Self::sanitize_key(key));
        fs::read_to_string(path).ok()
    }

    pub fn put(&self, key: &str, content: &str) -> io::Result<()> {
        let path = self.base_dir.join(Self::sanitize_key(key));
        fs::write(&path, content)?;
        debug!(path = %path.display(), bytes = content.len(), "cached download");
        Ok(())
    }

    fn sanitize_key(key: &str) -> String {
        key.chars()
            .map(|c| match c {
                c if c.is_ascii_alphanumeric() => c,
                '-' | '_' | '.' => c,
                _ => '_',
            })
            .collect()
    }
}

#[cfg(feature = "network")]
pub fn fetch_url(url: &str) -> Option<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .ok()?;
    match client.get(url).send() {
        Ok(response) if response.status().is_success() => response.text().ok(),
        Ok(response) => {
            warn!(%url, status = %response.status(), "download refused");
            None
        }
        Err(err) => {
            warn!(%url, error = %err, "download failed");
            None
        }
    }
}

#[cfg(not(feature = "network"))]
pub fn fetch_url(url: &str) -> Option<String> {
    warn!(%url, "built without the network feature; not downloading");
    None
}
