use std::fmt;

use serde::{Deserialize, Serialize};

/// Discovery-order preference number. Lower ranks are preferred.
pub type Rank = u16;

/// Owned UTF-16 string as carried inside identifiers.
///
/// Values never contain a NUL code unit: construction stops at the first
/// NUL, matching how the wire format terminates strings. Ordering compares
/// code units lexicographically, the same order `wcscmp` produces.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct WideString {
    units: Vec<u16>,
}

impl WideString {
    /// Build from raw code units, truncating at the first NUL.
    pub fn from_units(units: &[u16]) -> Self {
        let end = units.iter().position(|&u| u == 0).unwrap_or(units.len());
        Self {
            units: units[..end].to_vec(),
        }
    }

    /// The empty string.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Code units, without terminator.
    pub fn as_units(&self) -> &[u16] {
        &self.units
    }

    /// Number of code units, without terminator.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Encoded size in bytes including the NUL terminator.
    pub fn encoded_len(&self) -> usize {
        (self.units.len() + 1) * 2
    }

    /// Lossy conversion; unpaired surrogates become U+FFFD.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf16_lossy(&self.units)
    }
}

impl From<&str> for WideString {
    fn from(s: &str) -> Self {
        let units: Vec<u16> = s.encode_utf16().take_while(|&u| u != 0).collect();
        Self { units }
    }
}

impl From<String> for WideString {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<WideString> for String {
    fn from(w: WideString) -> Self {
        w.to_string_lossy()
    }
}

impl PartialEq<str> for WideString {
    fn eq(&self, other: &str) -> bool {
        self.units.iter().copied().eq(other.encode_utf16())
    }
}

impl PartialEq<&str> for WideString {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl fmt::Debug for WideString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_string_lossy())
    }
}

impl fmt::Display for WideString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

/// One logical namespace entry.
///
/// Records are created by the namespace provider at enumeration time, held
/// inside a snapshot, and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Display label; may contain any characters.
    pub name: WideString,
    /// Resolution target; opaque to the namespace core.
    pub path: WideString,
    /// Unique within one snapshot, not necessarily dense.
    pub rank: Rank,
}

impl Record {
    pub fn new(name: impl Into<WideString>, path: impl Into<WideString>, rank: Rank) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            rank,
        }
    }
}
