//! Name-keyed attribute access for extensions and certificate fields
//!
//! Every concrete type declares its attribute names as a small enum and
//! matches on it directly; string names are only resolved at the `get` /
//! `set` / `delete` entry points, case-insensitively.
//!
//! Extensions additionally keep the DER encoding of their value in a
//! [`ValueCache`]. A mutator drops the cached bytes and re-encodes before it
//! returns, so an extension is either without cached bytes or holds bytes
//! matching its fields.

use std::cell::OnceCell;
use std::fmt;
use std::str::FromStr;

use asn1::{ASN1Object, Element, Integer, ObjectIdentifier, OctetString};
use codec::encoder::Encoder;
use log::trace;
use pkix_types::{AlgorithmIdentifier, KeyIdentifier, SerialNumber, SubjectPublicKeyInfo};

use crate::error::{Error, Kind, Result};
use crate::general_names::GeneralNames;

/// A value passed through the name-keyed interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Integer(Integer),
    Reason(crate::extensions::CrlReason),
    KeyIdentifier(KeyIdentifier),
    GeneralNames(GeneralNames),
    AlgorithmId(AlgorithmIdentifier),
    SerialNumber(SerialNumber),
    PublicKey(SubjectPublicKeyInfo),
}

impl AttrValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "Integer",
            Self::Reason(_) => "CrlReason",
            Self::KeyIdentifier(_) => "KeyIdentifier",
            Self::GeneralNames(_) => "GeneralNames",
            Self::AlgorithmId(_) => "AlgorithmIdentifier",
            Self::SerialNumber(_) => "SerialNumber",
            Self::PublicKey(_) => "SubjectPublicKeyInfo",
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Reason(reason) => write!(f, "{reason}"),
            Self::KeyIdentifier(id) => write!(f, "{id}"),
            Self::GeneralNames(names) => write!(f, "{names}"),
            Self::AlgorithmId(alg) => write!(f, "{alg}"),
            Self::SerialNumber(serial) => write!(f, "{}", serial.format_hex()),
            Self::PublicKey(spki) => write!(f, "{}", spki.algorithm()),
        }
    }
}

/// The closed set of attribute names one type accepts.
pub trait AttributeName: Copy + 'static {
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;

    fn resolve(set: Kind, name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|attr| attr.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownAttribute {
                set,
                attribute: name.to_string(),
            })
    }
}

pub trait CertAttrSet {
    type Attribute: AttributeName;

    const KIND: Kind;
    /// Name of the set as it appears in a certificate or CRL.
    const NAME: &'static str;

    fn get_attribute(&self, attr: Self::Attribute) -> Option<AttrValue>;

    /// Must reject a mistyped value before changing anything.
    fn set_attribute(&mut self, attr: Self::Attribute, value: AttrValue) -> Result<()>;

    fn delete_attribute(&mut self, attr: Self::Attribute) -> Result<()>;

    fn get(&self, name: &str) -> Result<Option<AttrValue>> {
        let attr = Self::Attribute::resolve(Self::KIND, name)?;
        Ok(self.get_attribute(attr))
    }

    fn set(&mut self, name: &str, value: AttrValue) -> Result<()> {
        let attr = Self::Attribute::resolve(Self::KIND, name)?;
        trace!("{}: set {}", Self::NAME, attr.as_str());
        self.set_attribute(attr, value)
    }

    fn delete(&mut self, name: &str) -> Result<()> {
        let attr = Self::Attribute::resolve(Self::KIND, name)?;
        trace!("{}: delete {}", Self::NAME, attr.as_str());
        self.delete_attribute(attr)
    }

    fn attribute_names(&self) -> Vec<&'static str> {
        Self::Attribute::ALL.iter().map(|attr| attr.as_str()).collect()
    }
}

pub(crate) fn type_error(set: Kind, attribute: &'static str, expected: &'static str) -> Error {
    Error::AttributeType {
        set,
        attribute,
        expected,
    }
}

/// Cached DER encoding of an extension value.
///
/// Empty until the first encode; a value with no payload (reason code 0)
/// never fills it.
#[derive(Debug, Clone, Default)]
pub struct ValueCache {
    bytes: OnceCell<Vec<u8>>,
}

impl ValueCache {
    pub fn is_empty(&self) -> bool {
        self.bytes.get().is_none()
    }

    pub fn get(&self) -> Option<&[u8]> {
        self.bytes.get().map(Vec::as_slice)
    }

    /// Cached bytes, encoding with `encode` first if the cache is empty.
    pub fn get_or_encode<F>(&self, encode: F) -> Result<Vec<u8>>
    where
        F: FnOnce() -> Result<Option<Vec<u8>>>,
    {
        if let Some(bytes) = self.bytes.get() {
            return Ok(bytes.clone());
        }
        match encode()? {
            Some(bytes) => {
                trace!("regenerated cached extension value ({} bytes)", bytes.len());
                Ok(self.bytes.get_or_init(|| bytes).clone())
            }
            None => Ok(Vec::new()),
        }
    }

    /// Drop the cached bytes and store a fresh encoding.
    pub fn refresh<F>(&mut self, encode: F) -> Result<()>
    where
        F: FnOnce() -> Result<Option<Vec<u8>>>,
    {
        self.bytes.take();
        if let Some(bytes) = encode()? {
            trace!("re-encoded extension value ({} bytes)", bytes.len());
            let _ = self.bytes.set(bytes);
        }
        Ok(())
    }
}

/// Encode an element as the DER payload of an extension value.
pub(crate) fn element_to_der(element: &Element) -> Result<Vec<u8>> {
    Ok(element.to_der()?)
}

/// The single value carried in an extnValue.
pub(crate) fn value_element(kind: Kind, value: &OctetString) -> Result<Element> {
    let asn1_obj = ASN1Object::try_from(value)?;
    match asn1_obj.elements() {
        [elem] => Ok(elem.clone()),
        other => Err(Error::InvalidElementCount {
            kind,
            expected: "1",
            actual: other.len(),
        }),
    }
}

/// A typed certificate or CRL extension.
///
/// `parse` reads the contents of extnValue; `to_extension` produces the
/// complete envelope from the cached encoding.
pub trait Extension: Sized {
    /// Dotted extension OID.
    const OID: &'static str;

    fn oid() -> Result<ObjectIdentifier> {
        Ok(ObjectIdentifier::from_str(Self::OID)?)
    }

    fn parse(critical: bool, value: &OctetString) -> Result<Self>;

    fn is_critical(&self) -> bool;

    /// DER payload of extnValue.
    fn value(&self) -> Result<Vec<u8>>;

    fn from_extension(extension: &pkix_types::Extension) -> Result<Self> {
        let expected = Self::oid()?;
        if extension.oid() != &expected {
            return Err(Error::OidMismatch {
                expected: expected.to_string(),
                actual: extension.oid().to_string(),
            });
        }
        Self::parse(extension.is_critical(), extension.value())
    }

    fn to_extension(&self) -> Result<pkix_types::Extension> {
        Ok(pkix_types::Extension::new(
            Self::oid()?,
            self.is_critical(),
            OctetString::from(self.value()?),
        ))
    }

    fn encode_extension(&self) -> Result<Element> {
        Ok(self.to_extension()?.encode()?)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use rstest::rstest;

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Sample {
        First,
        SecondName,
    }

    impl AttributeName for Sample {
        const ALL: &'static [Self] = &[Self::First, Self::SecondName];

        fn as_str(self) -> &'static str {
            match self {
                Self::First => "first",
                Self::SecondName => "second_name",
            }
        }
    }

    #[rstest]
    #[case("first", Sample::First)]
    #[case("FIRST", Sample::First)]
    #[case("Second_Name", Sample::SecondName)]
    fn test_resolve_is_case_insensitive(#[case] name: &str, #[case] expected: Sample) {
        assert_eq!(Sample::resolve(Kind::Extension, name).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("firs")]
    #[case("second name")]
    fn test_resolve_unknown(#[case] name: &str) {
        let err = Sample::resolve(Kind::Extension, name).unwrap_err();
        assert!(matches!(err, Error::UnknownAttribute { attribute, .. } if attribute == name));
    }

    #[test]
    fn test_value_cache_encodes_once() {
        let calls = Cell::new(0);
        let cache = ValueCache::default();
        assert!(cache.is_empty());

        for _ in 0..2 {
            let bytes = cache
                .get_or_encode(|| {
                    calls.set(calls.get() + 1);
                    Ok(Some(vec![0x05, 0x00]))
                })
                .unwrap();
            assert_eq!(bytes, vec![0x05, 0x00]);
        }
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.get(), Some([0x05, 0x00].as_slice()));
    }

    #[test]
    fn test_value_cache_without_payload_stays_empty() {
        let cache = ValueCache::default();
        assert_eq!(cache.get_or_encode(|| Ok(None)).unwrap(), Vec::<u8>::new());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_value_cache_refresh_replaces_bytes() {
        let mut cache = ValueCache::default();
        cache.refresh(|| Ok(Some(vec![0x01]))).unwrap();
        assert_eq!(cache.get(), Some([0x01].as_slice()));
        cache.refresh(|| Ok(Some(vec![0x02]))).unwrap();
        assert_eq!(cache.get(), Some([0x02].as_slice()));
        cache.refresh(|| Ok(None)).unwrap();
        assert!(cache.is_empty());
    }
}
