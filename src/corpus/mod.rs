pub mod cache;
pub mod overrides;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::corpus::cache::DiskCache;

pub const DEFAULT_CORPUS_URL: &str = "https://raw.githubusercontent.com/first20hours/google-10000-english/refs/heads/master/google-10000-english-no-swears.txt";
const CACHE_KEY: &str = "common_words.txt";

/// Ordered word list, one entry per non-blank input line.
#[derive(Clone, Debug, Default)]
pub struct WordCorpus {
    words: Vec<String>,
}

impl WordCorpus {
    pub fn from_text(text: &str) -> Self {
        let words = text
            .lines()
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        Self { words }
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read corpus {}", path.display()))?;
        Ok(Self::from_text(&text))
    }

    /// Local file if given, else the disk cache, else a one-time download that
    /// is written back to the cache.
    pub fn acquire(local: Option<&Path>, url: &str) -> Result<Self> {
        let cache = DiskCache::new("corpus");
        Self::acquire_with(local, url, cache.as_ref(), cache::fetch_url)
    }

    pub fn acquire_with<F>(
        local: Option<&Path>,
        url: &str,
        cache: Option<&DiskCache>,
        fetch: F,
    ) -> Result<Self>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        if let Some(path) = local {
            let corpus = Self::load_file(path)?;
            info!(path = %path.display(), words = corpus.len(), "loaded corpus file");
            return Ok(corpus);
        }

        if let Some(text) = cache.and_then(|c| c.get(CACHE_KEY)) {
            let corpus = Self::from_text(&text);
            info!(words = corpus.len(), "loaded cached corpus");
            return Ok(corpus);
        }

        let Some(text) = fetch(url) else {
            bail!("word corpus unavailable: no local file, no cache, and download of {url} failed");
        };
        if let Some(cache) = cache
            && let Err(err) = cache.put(CACHE_KEY, &text)
        {
            tracing::warn!(error = %err, "could not cache corpus");
        }
        let corpus = Self::from_text(&text);
        info!(%url, words = corpus.len(), "downloaded corpus");
        Ok(corpus)
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
