use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Known multicodec entries: `(name, code)`.
///
/// Only the names here are accepted as string aliases. Any numeric code is
/// accepted regardless, since formats can be loaded for codecs this table
/// does not know about.
const KNOWN_CODECS: &[(&str, u64)] = &[
    ("raw", 0x55),
    ("dag-pb", 0x70),
    ("dag-cbor", 0x71),
    ("libp2p-key", 0x72),
    ("git-raw", 0x78),
    ("dag-jose", 0x85),
    ("dag-json", 0x0129),
];

/// Numeric multicodec identifier.
///
/// This is the key of the format registry. Human-readable names, decimal and
/// hex strings all normalize to the same value, so `"dag-cbor"`, `"113"` and
/// `"0x71"` parse to equal `CodecId`s.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CodecId(u64);

impl CodecId {
    pub const RAW: Self = Self(0x55);
    pub const DAG_PB: Self = Self(0x70);
    pub const DAG_CBOR: Self = Self(0x71);
    pub const DAG_JSON: Self = Self(0x0129);

    /// Wrap a raw multicodec code.
    pub const fn new(code: u64) -> Self {
        Self(code)
    }

    /// The numeric multicodec code.
    pub const fn code(&self) -> u64 {
        self.0
    }

    /// Canonical name, if this code is in the known table.
    pub fn name(&self) -> Option<&'static str> {
        KNOWN_CODECS
            .iter()
            .find(|(_, code)| *code == self.0)
            .map(|(name, _)| *name)
    }

    /// Look up a codec by its canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        KNOWN_CODECS
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, code)| Self(*code))
    }
}

impl FromStr for CodecId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(hex) = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            return u64::from_str_radix(hex, 16)
                .map(Self)
                .map_err(|_| TypeError::UnknownCodec(s.to_string()));
        }
        if let Ok(code) = trimmed.parse::<u64>() {
            return Ok(Self(code));
        }
        Self::from_name(&trimmed.to_ascii_lowercase())
            .ok_or_else(|| TypeError::UnknownCodec(s.to_string()))
    }
}

impl From<u64> for CodecId {
    fn from(code: u64) -> Self {
        Self(code)
    }
}

impl From<CodecId> for u64 {
    fn from(id: CodecId) -> Self {
        id.0
    }
}

impl fmt::Debug for CodecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "CodecId({name})"),
            None => write!(f, "CodecId({:#x})", self.0),
        }
    }
}

impl fmt::Display for CodecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{:#x}", self.0),
        }
    }
}

// Serialized as the display string so config files can say `"dag-cbor"`.
impl Serialize for CodecId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CodecId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
