use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Multihash functions the resolver knows how to compute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HashAlg {
    /// SHA2-256 (multihash 0x12). The default for every bundled format.
    Sha2_256,
    /// SHA2-512 (multihash 0x13).
    Sha2_512,
    /// BLAKE3 with a 32-byte output (multihash 0x1e).
    Blake3,
}

impl HashAlg {
    /// Multihash code of this function.
    pub fn code(&self) -> u64 {
        match self {
            Self::Sha2_256 => 0x12,
            Self::Sha2_512 => 0x13,
            Self::Blake3 => 0x1e,
        }
    }

    /// Digest length in bytes.
    pub fn digest_len(&self) -> usize {
        match self {
            Self::Sha2_256 | Self::Blake3 => 32,
            Self::Sha2_512 => 64,
        }
    }

    /// Look up by multihash code.
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            0x12 => Some(Self::Sha2_256),
            0x13 => Some(Self::Sha2_512),
            0x1e => Some(Self::Blake3),
            _ => None,
        }
    }

    /// Canonical multihash table name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sha2_256 => "sha2-256",
            Self::Sha2_512 => "sha2-512",
            Self::Blake3 => "blake3",
        }
    }
}

impl FromStr for HashAlg {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "sha2-256" | "sha256" => return Ok(Self::Sha2_256),
            "sha2-512" | "sha512" => return Ok(Self::Sha2_512),
            "blake3" | "blake3-256" => return Ok(Self::Blake3),
            _ => {}
        }
        let code = match lowered.strip_prefix("0x") {
            Some(hex) => u64::from_str_radix(hex, 16).ok(),
            None => lowered.parse::<u64>().ok(),
        };
        code.and_then(Self::from_code)
            .ok_or_else(|| TypeError::UnknownHashAlg(s.to_string()))
    }
}

impl fmt::Display for HashAlg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for HashAlg {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for HashAlg {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_by_name_and_code() {
        assert_eq!("sha2-256".parse::<HashAlg>().unwrap(), HashAlg::Sha2_256);
        assert_eq!("0x13".parse::<HashAlg>().unwrap(), HashAlg::Sha2_512);
        assert_eq!("30".parse::<HashAlg>().unwrap(), HashAlg::Blake3);
    }

    #[test]
    fn unknown_is_rejected() {
        assert!(matches!(
            "md5".parse::<HashAlg>(),
            Err(TypeError::UnknownHashAlg(_))
        ));
    }

    #[test]
    fn code_roundtrip() {
        for alg in [HashAlg::Sha2_256, HashAlg::Sha2_512, HashAlg::Blake3] {
            assert_eq!(HashAlg::from_code(alg.code()), Some(alg));
        }
    }

    #[test]
    fn serde_uses_names() {
        let json = serde_json::to_string(&HashAlg::Blake3).unwrap();
        assert_eq!(json, "\"blake3\"");
    }
}
