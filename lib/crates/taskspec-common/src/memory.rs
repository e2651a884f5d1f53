//! Memory sizes as written in configuration files.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TranslateError;

/// Number of bytes in one gibibyte.
pub const GIB: i64 = 1 << 30;

/// A memory size: either a raw byte count or a string with a unit suffix.
///
/// Single-letter suffixes follow the container runtime convention and are
/// binary (`512m` is 512 MiB). Two-letter `kb`/`mb`/`gb`/`tb` are decimal and
/// `kib`/`mib`/`gib`/`tib` are binary. Suffixes are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MemorySize {
    Bytes(u64),
    Text(String),
}

impl MemorySize {
    /// Resolve to a byte count.
    pub fn to_bytes(&self) -> Result<i64, TranslateError> {
        match self {
            Self::Bytes(n) => {
                i64::try_from(*n).map_err(|_| TranslateError::MemorySizeOverflow(n.to_string()))
            }
            Self::Text(s) => parse_memory_size(s),
        }
    }
}

impl From<u64> for MemorySize {
    fn from(bytes: u64) -> Self {
        Self::Bytes(bytes)
    }
}

impl fmt::Display for MemorySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

fn unit_multiplier(unit: &str) -> Option<i64> {
    let m = match unit.to_ascii_lowercase().as_str() {
        "" | "b" => 1,
        "k" | "ki" | "kib" => 1 << 10,
        "m" | "mi" | "mib" => 1 << 20,
        "g" | "gi" | "gib" => 1 << 30,
        "t" | "ti" | "tib" => 1 << 40,
        "kb" => 1_000,
        "mb" => 1_000_000,
        "gb" => 1_000_000_000,
        "tb" => 1_000_000_000_000,
        _ => return None,
    };
    Some(m)
}

/// Parse `"<digits><unit>"` into bytes.
pub fn parse_memory_size(raw: &str) -> Result<i64, TranslateError> {
    let s = raw.trim();
    let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (digits, unit) = s.split_at(split);
    if digits.is_empty() {
        return Err(TranslateError::MalformedMemorySize(raw.to_string()));
    }
    let multiplier = unit_multiplier(unit.trim())
        .ok_or_else(|| TranslateError::MalformedMemorySize(raw.to_string()))?;
    let value: i64 = digits
        .parse()
        .map_err(|_| TranslateError::MemorySizeOverflow(raw.to_string()))?;
    value
        .checked_mul(multiplier)
        .ok_or_else(|| TranslateError::MemorySizeOverflow(raw.to_string()))
}
