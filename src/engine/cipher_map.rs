use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

pub const PLAIN_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";
pub const ALPHABET_LEN: usize = 26;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    #[error("cipher must have exactly {ALPHABET_LEN} characters, got {0}")]
    WrongLength(usize),
    #[error("cipher character '{ch}' is used for both '{first}' and '{second}'")]
    Repeated { ch: char, first: char, second: char },
    #[error("cipher character {0:?} is whitespace or a control character")]
    Unprintable(char),
}

/// Bijection between the plain alphabet `a..=z` and 26 cipher symbols.
///
/// Built once per session and passed by reference to everything that renders
/// or resolves through it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CipherMap {
    forward: [char; ALPHABET_LEN],
    inverse: HashMap<char, char>,
}

impl CipherMap {
    pub fn new(cipher: &str) -> Result<Self, CipherError> {
        let images: Vec<char> = cipher.chars().collect();
        if images.len() != ALPHABET_LEN {
            return Err(CipherError::WrongLength(images.len()));
        }

        let mut forward = ['a'; ALPHABET_LEN];
        let mut inverse = HashMap::with_capacity(ALPHABET_LEN);
        for (i, (plain, image)) in PLAIN_ALPHABET.chars().zip(images).enumerate() {
            if image.is_whitespace() || image.is_control() {
                return Err(CipherError::Unprintable(image));
            }
            if let Some(&first) = inverse.get(&image) {
                return Err(CipherError::Repeated {
                    ch: image,
                    first,
                    second: plain,
                });
            }
            forward[i] = image;
            inverse.insert(image, plain);
        }

        Ok(Self { forward, inverse })
    }

    pub fn encode(&self, plain: char) -> Option<char> {
        plain_index(plain).map(|i| self.forward[i])
    }

    pub fn decode(&self, cipher: char) -> Option<char> {
        self.inverse.get(&cipher).copied()
    }

    /// `(plain, cipher)` pairs in plain alphabet order.
    pub fn pairs(&self) -> impl Iterator<Item = (char, char)> + '_ {
        PLAIN_ALPHABET.chars().zip(self.forward.iter().copied())
    }

    /// The 26-character persisted form.
    pub fn as_cipher_string(&self) -> String {
        self.forward.iter().collect()
    }
}

impl fmt::Display for CipherMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_cipher_string())
    }
}

fn plain_index(ch: char) -> Option<usize> {
    ch.is_ascii_lowercase().then(|| (ch as u8 - b'a') as usize)
}

pub fn is_plain_letter(ch: char) -> bool {
    plain_index(ch).is_some()
}
