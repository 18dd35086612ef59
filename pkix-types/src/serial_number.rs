//! Certificate Serial Number
//!
//! Defined in RFC 5280 Section 4.1.2.2
//!
//! ```asn1
//! CertificateSerialNumber ::= INTEGER
//! ```

use std::ops::Deref;

use asn1::{Element, Integer};
use codec::decoder::{DecodableFrom, Decoder};
use codec::encoder::{EncodableTo, Encoder};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An INTEGER that uniquely identifies a certificate issued by a given CA.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub struct SerialNumber {
    inner: Integer,
}

impl Serialize for SerialNumber {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.format_hex())
    }
}

impl SerialNumber {
    /// The bytes are interpreted as a big-endian signed integer.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Integer::from(bytes).into()
    }

    /// Lowercase hex with colon separators, e.g. `00:f7:e9:eb`.
    pub fn format_hex(&self) -> String {
        self.inner
            .to_signed_bytes_be()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(":")
    }
}

impl From<Integer> for SerialNumber {
    fn from(inner: Integer) -> Self {
        Self { inner }
    }
}

impl From<i64> for SerialNumber {
    fn from(value: i64) -> Self {
        Self {
            inner: Integer::from(value),
        }
    }
}

impl AsRef<Integer> for SerialNumber {
    fn as_ref(&self) -> &Integer {
        &self.inner
    }
}

impl std::fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format_hex())
    }
}

impl Deref for SerialNumber {
    type Target = Integer;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DecodableFrom<Element> for SerialNumber {}

impl Decoder<Element, SerialNumber> for Element {
    type Error = Error;

    fn decode(&self) -> Result<SerialNumber> {
        match self {
            Element::Integer(i) => Ok(SerialNumber { inner: i.clone() }),
            _ => Err(Error::SerialNumberExpectedInteger),
        }
    }
}

impl EncodableTo<SerialNumber> for Element {}

impl Encoder<SerialNumber, Element> for SerialNumber {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(Element::Integer(self.inner.clone()))
    }
}
