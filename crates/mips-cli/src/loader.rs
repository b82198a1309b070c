//! Program loader: binary-listing text into raw 32-bit words.
//!
//! The input format is one instruction per line, each a 32-character string
//! of ASCII `0`/`1` digits, most significant bit first. The loader only
//! produces the ordered word sequence; the engine assigns addresses.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Digits per instruction line.
pub const WORD_DIGITS: usize = 32;

/// A loader failure with enough context to point at the offending line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderError {
    /// Path of the listing being loaded.
    pub path: PathBuf,
    /// 1-indexed line number, when the failure is line-specific.
    pub line: Option<usize>,
    /// What went wrong.
    pub kind: LoaderErrorKind,
}

/// Classification of loader failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderErrorKind {
    /// The file could not be read.
    Io(String),
    /// A line did not have exactly 32 digits.
    WrongLength(usize),
    /// A line contained a character other than `0` or `1`.
    InvalidDigit(char),
}

impl fmt::Display for LoaderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(message) => write!(f, "cannot read file: {message}"),
            Self::WrongLength(len) => {
                write!(f, "line must be exactly {WORD_DIGITS} binary digits (got {len})")
            }
            Self::InvalidDigit(c) => write!(f, "invalid character {c:?}, expected 0 or 1"),
        }
    }
}

impl fmt::Display for LoaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}: {}", self.path.display(), line, self.kind),
            None => write!(f, "{}: {}", self.path.display(), self.kind),
        }
    }
}

impl std::error::Error for LoaderError {}

/// Parses one trimmed listing line into a raw word, MSB first.
pub fn parse_word_line(line: &str) -> Result<u32, LoaderErrorKind> {
    let mut bits = 0u32;
    let mut digits = 0usize;

    for c in line.chars() {
        let bit = match c {
            '0' => 0,
            '1' => 1,
            _ => return Err(LoaderErrorKind::InvalidDigit(c)),
        };
        if digits < WORD_DIGITS {
            bits = bits << 1 | bit;
        }
        digits += 1;
    }

    if digits == WORD_DIGITS {
        Ok(bits)
    } else {
        Err(LoaderErrorKind::WrongLength(digits))
    }
}

/// Reads a binary listing into its ordered word sequence.
///
/// Lines are trimmed of surrounding whitespace (so `\r\n` listings load
/// unchanged) and blank lines are skipped.
///
/// # Errors
///
/// Returns a [`LoaderError`] for an unreadable file or a malformed line,
/// with the 1-indexed line number for the latter.
pub fn load_program(path: &Path) -> Result<Vec<u32>, LoaderError> {
    let text = fs::read_to_string(path).map_err(|e| LoaderError {
        path: path.to_path_buf(),
        line: None,
        kind: LoaderErrorKind::Io(e.to_string()),
    })?;

    let mut words = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let word = parse_word_line(line).map_err(|kind| LoaderError {
            path: path.to_path_buf(),
            line: Some(index + 1),
            kind,
        })?;
        words.push(word);
    }

    Ok(words)
}
