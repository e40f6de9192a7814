use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::engine::cipher_map::CipherMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Encode,
    Decode,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnmappedPolicy {
    /// Characters outside the mapping domain pass through unchanged.
    Tolerant,
    /// The first character outside the mapping domain aborts translation.
    Strict,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TranslateError {
    #[error("cannot map {ch:?} at position {index}")]
    Unmapped { ch: char, index: usize },
}

pub fn translate(
    text: &str,
    cipher: &CipherMap,
    direction: Direction,
    policy: UnmappedPolicy,
) -> Result<String, TranslateError> {
    let mut out = String::with_capacity(text.len());
    for (index, ch) in text.chars().enumerate() {
        let mapped = match direction {
            Direction::Encode => cipher.encode(ch),
            Direction::Decode => cipher.decode(ch),
        };
        match (mapped, policy) {
            (Some(m), _) => out.push(m),
            (None, UnmappedPolicy::Tolerant) => out.push(ch),
            (None, UnmappedPolicy::Strict) => return Err(TranslateError::Unmapped { ch, index }),
        }
    }
    Ok(out)
}

/// Translate a stream line by line, writing each line's original terminator back
/// untouched so line structure survives either policy.
pub fn translate_lines<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
    cipher: &CipherMap,
    direction: Direction,
    policy: UnmappedPolicy,
) -> Result<()> {
    let mut line = String::new();
    let mut line_no = 0usize;
    loop {
        line.clear();
        if reader.read_line(&mut line).context("failed to read input")? == 0 {
            break;
        }
        line_no += 1;

        let (body, terminator) = split_terminator(&line);
        let translated = translate(body, cipher, direction, policy)
            .with_context(|| format!("line {line_no}"))?;
        writer.write_all(translated.as_bytes())?;
        writer.write_all(terminator.as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

fn split_terminator(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, &line[body.len()..])
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, &line[body.len()..])
    } else {
        (line, "")
    }
}
