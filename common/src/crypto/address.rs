use super::AddressError;
use serde::de::Error as SerdeError;
use serde::{Deserialize, Serialize};
use std::{
    convert::TryInto,
    fmt::{Debug, Display, Error, Formatter},
    str::FromStr,
};

pub const ADDRESS_SIZE: usize = 35; // 35 bytes, host identity width

/// Opaque account identifier as reported by the host.
///
/// Equality is byte-exact; there is no checksum or canonical form.
#[derive(Eq, PartialEq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct Address([u8; ADDRESS_SIZE]);

impl Address {
    pub const fn new(bytes: [u8; ADDRESS_SIZE]) -> Self {
        Address(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(value: &str) -> Result<Self, AddressError> {
        let value = value.trim();
        if value.len() != ADDRESS_SIZE * 2 {
            return Err(AddressError::InvalidHexLength {
                len: value.len(),
                expected: ADDRESS_SIZE * 2,
            });
        }

        let bytes = hex::decode(value).map_err(|e| AddressError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, AddressError> {
        let bytes: [u8; ADDRESS_SIZE] =
            bytes
                .try_into()
                .map_err(|_| AddressError::InvalidLength {
                    len: bytes.len(),
                    expected: ADDRESS_SIZE,
                })?;
        Ok(Address(bytes))
    }

    /// Build a readable address from a short label: the label bytes
    /// followed by zero padding.
    ///
    /// Used by scenarios and tests to name accounts without spelling out
    /// 70 hex characters.
    pub fn from_label(label: &str) -> Result<Self, AddressError> {
        let raw = label.as_bytes();
        if raw.is_empty() || raw.len() > ADDRESS_SIZE {
            return Err(AddressError::InvalidLabel(label.to_owned()));
        }

        let mut bytes = [0u8; ADDRESS_SIZE];
        bytes[..raw.len()].copy_from_slice(raw);
        Ok(Address(bytes))
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; ADDRESS_SIZE]> for Address {
    fn from(bytes: [u8; ADDRESS_SIZE]) -> Self {
        Address(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", &self.to_hex())
    }
}

impl Debug for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "Address({})", &self.to_hex())
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'a> Deserialize<'a> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'a>,
    {
        let hex = String::deserialize(deserializer)?;
        Address::from_hex(&hex).map_err(SerdeError::custom)
    }
}
