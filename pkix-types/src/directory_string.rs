//! DirectoryString type as defined in RFC 5280 Section 4.1.2.4
//!
//! ```asn1
//! DirectoryString ::= CHOICE {
//!   teletexString     TeletexString (SIZE (1..MAX)),
//!   printableString   PrintableString (SIZE (1..MAX)),
//!   universalString   UniversalString (SIZE (1..MAX)),
//!   utf8String        UTF8String (SIZE (1..MAX)),
//!   bmpString         BMPString (SIZE (1..MAX))
//! }
//! ```
//!
//! TeletexString and UniversalString are not decoded; an attribute carrying
//! one of them is kept as raw DER by [`crate::name::AttributeValue`].

use std::fmt;
use std::ops::Deref;

use asn1::Element;
use codec::decoder::{DecodableFrom, Decoder};
use codec::encoder::{EncodableTo, Encoder};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The universal string type a [`DirectoryString`] was read from or will be
/// written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StringKind {
    #[default]
    Utf8,
    Printable,
    Ia5,
    Bmp,
}

/// A directory string together with its wire string type, so that a decoded
/// value re-encodes to the same bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectoryString {
    kind: StringKind,
    inner: String,
}

impl DirectoryString {
    /// Create a UTF8String value.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            kind: StringKind::Utf8,
            inner: value.into(),
        }
    }

    /// Create a PrintableString value, rejecting characters outside its
    /// repertoire.
    pub fn printable(value: impl Into<String>) -> Result<Self> {
        let inner = value.into();
        if !is_printable_string(&inner) {
            return Err(Error::DirectoryStringNotPrintable(inner));
        }
        Ok(Self {
            kind: StringKind::Printable,
            inner,
        })
    }

    pub fn with_kind(kind: StringKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            inner: value.into(),
        }
    }

    pub fn kind(&self) -> StringKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl Serialize for DirectoryString {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.inner.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DirectoryString {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        Ok(DirectoryString::new(inner))
    }
}

impl AsRef<str> for DirectoryString {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl Deref for DirectoryString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<&str> for DirectoryString {
    fn from(value: &str) -> Self {
        DirectoryString::new(value)
    }
}

impl From<String> for DirectoryString {
    fn from(value: String) -> Self {
        DirectoryString::new(value)
    }
}

impl TryFrom<&Element> for DirectoryString {
    type Error = Error;

    fn try_from(element: &Element) -> Result<Self> {
        let (kind, value) = match element {
            Element::PrintableString(s) => (StringKind::Printable, s.clone()),
            Element::UTF8String(s) => (StringKind::Utf8, s.clone()),
            Element::BMPString(s) => (StringKind::Bmp, s.clone()),
            Element::IA5String(s) => (StringKind::Ia5, s.clone()),
            Element::OctetString(os) => {
                // IMPLICIT tagging leaves only the contents octets
                let s = String::from_utf8(os.as_bytes().to_vec())
                    .map_err(|_| Error::DirectoryStringInvalidUtf8)?;
                (StringKind::Utf8, s)
            }
            _ => return Err(Error::DirectoryStringExpectedStringType),
        };
        Ok(Self { kind, inner: value })
    }
}

impl From<&DirectoryString> for Element {
    fn from(ds: &DirectoryString) -> Self {
        let value = ds.inner.clone();
        match ds.kind {
            StringKind::Utf8 => Element::UTF8String(value),
            StringKind::Printable => Element::PrintableString(value),
            StringKind::Ia5 => Element::IA5String(value),
            StringKind::Bmp => Element::BMPString(value),
        }
    }
}

impl fmt::Display for DirectoryString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl DecodableFrom<Element> for DirectoryString {}

impl Decoder<Element, DirectoryString> for Element {
    type Error = Error;

    fn decode(&self) -> Result<DirectoryString> {
        DirectoryString::try_from(self)
    }
}

impl EncodableTo<DirectoryString> for Element {}

impl Encoder<DirectoryString, Element> for DirectoryString {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(self.into())
    }
}

/// PrintableString allows: A-Z, a-z, 0-9, space, and ' ( ) + , - . / : = ?
pub(crate) fn is_printable_string(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_alphanumeric() || " '()+,-./:=?".contains(c))
}
