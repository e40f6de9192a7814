use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::engine::cipher_map::CipherMap;

/// User-supplied bridging words keyed by `first char + last char`.
#[derive(Clone, Debug, Default)]
pub struct MnemonicOverrides {
    by_key: HashMap<String, String>,
}

impl MnemonicOverrides {
    /// Blank entries are dropped; a later word with the same key replaces an
    /// earlier one.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut by_key = HashMap::new();
        for word in words {
            let word = word.as_ref().trim();
            let (Some(first), Some(last)) = (word.chars().next(), word.chars().last()) else {
                continue;
            };
            by_key.insert(format!("{first}{last}"), word.to_string());
        }
        Self { by_key }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.by_key.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Hint {
    pub plain: char,
    pub cipher: char,
    pub mnemonic: String,
}

/// 3 for comfortable lengths, 2 for anything usable, 1 for one or two letters.
pub fn goodness(word: &str) -> u8 {
    match word.chars().count() {
        4..=7 => 3,
        n if n >= 3 => 2,
        _ => 1,
    }
}

pub struct MnemonicResolver<'a> {
    corpus: &'a [String],
    overrides: &'a MnemonicOverrides,
}

impl<'a> MnemonicResolver<'a> {
    pub fn new(corpus: &'a [String], overrides: &'a MnemonicOverrides) -> Self {
        Self { corpus, overrides }
    }

    /// Best word starting with `cipher` and ending with `plain`. Overrides win;
    /// otherwise the first highest-scoring corpus word; otherwise the bare pair.
    pub fn resolve_pair(&self, plain: char, cipher: char) -> String {
        let key = format!("{cipher}{plain}");
        if let Some(word) = self.overrides.get(&key) {
            return word.to_string();
        }

        let mut best: Option<(&str, u8)> = None;
        for word in self
            .corpus
            .iter()
            .filter(|w| w.starts_with(cipher) && w.ends_with(plain))
        {
            let score = goodness(word);
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((word.as_str(), score));
            }
        }

        best.map_or(key, |(word, _)| word.to_string())
    }

    pub fn resolve(&self, plain: char, cipher: &CipherMap) -> Option<String> {
        cipher
            .encode(plain)
            .map(|image| self.resolve_pair(plain, image))
    }

    /// One hint per distinct alphabet letter of `plaintext`, in the order the
    /// letters first appear.
    pub fn hints_for(&self, plaintext: &str, cipher: &CipherMap) -> Vec<Hint> {
        let mut seen = HashSet::new();
        plaintext
            .chars()
            .filter(|ch| seen.insert(*ch))
            .filter_map(|plain| {
                let image = cipher.encode(plain)?;
                Some(Hint {
                    plain,
                    cipher: image,
                    mnemonic: self.resolve_pair(plain, image),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_goodness_bands() {
        assert_eq!(goodness("ab"), 1);
        assert_eq!(goodness("a"), 1);
        assert_eq!(goodness("abc"), 2);
        assert_eq!(goodness("abcd"), 3);
        assert_eq!(goodness("abcdefg"), 3);
        assert_eq!(goodness("abcdefgh"), 2);
    }

    #[test]
    fn test_prefers_mid_length_word() {
        let corpus = words(&["tart", "turf", "transfer"]);
        let overrides = MnemonicOverrides::default();
        let resolver = MnemonicResolver::new(&corpus, &overrides);
        assert_eq!(resolver.resolve_pair('f', 't'), "turf");
    }

    #[test]
    fn test_ties_keep_corpus_order() {
        let corpus = words(&["tf", "tiff", "toff", "tariff"]);
        let overrides = MnemonicOverrides::default();
        let resolver = MnemonicResolver::new(&corpus, &overrides);
        assert_eq!(resolver.resolve_pair('f', 't'), "tiff");
    }

    #[test]
    fn test_lower_band_used_when_nothing_better() {
        let corpus = words(&["tf", "transfer"]);
        let overrides = MnemonicOverrides::default();
        let resolver = MnemonicResolver::new(&corpus, &overrides);
        assert_eq!(resolver.resolve_pair('f', 't'), "transfer");
    }

    #[test]
    fn test_override_wins() {
        let corpus = words(&["turf"]);
        let overrides = MnemonicOverrides::from_words(["  ", "tough-stuff", "", "xylo"]);
        assert_eq!(overrides.len(), 2);
        let resolver = MnemonicResolver::new(&corpus, &overrides);
        assert_eq!(resolver.resolve_pair('f', 't'), "tough-stuff");
        assert_eq!(resolver.resolve_pair('o', 'x'), "xylo");
    }

    #[test]
    fn test_later_override_replaces_earlier() {
        let overrides = MnemonicOverrides::from_words(["tiff", "turf"]);
        assert_eq!(overrides.get("tf"), Some("turf"));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let corpus = words(&["Turf", "TURF"]);
        let overrides = MnemonicOverrides::default();
        let resolver = MnemonicResolver::new(&corpus, &overrides);
        assert_eq!(resolver.resolve_pair('f', 't'), "tf");
    }

    #[test]
    fn test_fallback_is_cipher_then_plain() {
        let corpus = Vec::new();
        let overrides = MnemonicOverrides::default();
        let resolver = MnemonicResolver::new(&corpus, &overrides);
        assert_eq!(resolver.resolve_pair('k', 'q'), "qk");
    }

    #[test]
    fn test_hints_once_per_distinct_letter() {
        let cipher = CipherMap::new("bcdefghijklmnopqrstuvwxyza").unwrap();
        let corpus = words(&["fume", "mail"]);
        let overrides = MnemonicOverrides::default();
        let resolver = MnemonicResolver::new(&corpus, &overrides);

        let hints = resolver.hints_for("letter", &cipher);
        let letters: Vec<char> = hints.iter().map(|h| h.plain).collect();
        assert_eq!(letters, vec!['l', 'e', 't', 'r']);
        assert_eq!(hints[0].cipher, 'm');
        assert_eq!(hints[0].mnemonic, "mail");
        assert_eq!(hints[1].mnemonic, "fume");
        assert_eq!(hints[2].mnemonic, "ut");
    }

    #[test]
    fn test_resolve_outside_alphabet() {
        let cipher = CipherMap::new("bcdefghijklmnopqrstuvwxyza").unwrap();
        let corpus = Vec::new();
        let overrides = MnemonicOverrides::default();
        let resolver = MnemonicResolver::new(&corpus, &overrides);
        assert_eq!(resolver.resolve('!', &cipher), None);
        assert_eq!(resolver.resolve('a', &cipher).as_deref(), Some("ba"));
    }
}
