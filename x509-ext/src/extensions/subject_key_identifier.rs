//! SubjectKeyIdentifier extension
//!
//! RFC 5280 Section 4.2.1.2
//!
//! ```asn1
//! id-ce-subjectKeyIdentifier OBJECT IDENTIFIER ::=  { id-ce 14 }
//!
//! SubjectKeyIdentifier ::= KeyIdentifier
//! ```

use std::fmt;

use asn1::OctetString;
use codec::decoder::Decoder;
use codec::encoder::Encoder;
use pkix_types::{KeyIdentifier, SubjectPublicKeyInfo};

use crate::attribute::{
    AttrValue, AttributeName, CertAttrSet, Extension, ValueCache, element_to_der, type_error,
    value_element,
};
use crate::error::{Kind, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectKeyIdentifierAttribute {
    KeyId,
}

impl AttributeName for SubjectKeyIdentifierAttribute {
    const ALL: &'static [Self] = &[Self::KeyId];

    fn as_str(self) -> &'static str {
        match self {
            Self::KeyId => "key_id",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubjectKeyIdentifierExtension {
    critical: bool,
    key_id: Option<KeyIdentifier>,
    cache: ValueCache,
}

impl SubjectKeyIdentifierExtension {
    pub fn new(key_id: KeyIdentifier) -> Self {
        Self {
            critical: false,
            key_id: Some(key_id),
            cache: ValueCache::default(),
        }
    }

    /// Identifier derived from the SHA-1 hash of the subject public key.
    pub fn from_public_key(public_key: &SubjectPublicKeyInfo) -> Self {
        Self::new(KeyIdentifier::from_public_key(public_key))
    }

    pub fn key_id(&self) -> Option<&KeyIdentifier> {
        self.key_id.as_ref()
    }
}

impl Extension for SubjectKeyIdentifierExtension {
    const OID: &'static str = "2.5.29.14";

    fn parse(critical: bool, value: &OctetString) -> Result<Self> {
        let key_id: KeyIdentifier = value_element(Kind::SubjectKeyIdentifier, value)?.decode()?;
        Ok(Self {
            critical,
            key_id: Some(key_id),
            cache: ValueCache::default(),
        })
    }

    fn is_critical(&self) -> bool {
        self.critical
    }

    fn value(&self) -> Result<Vec<u8>> {
        self.cache.get_or_encode(|| encode_key_id(self.key_id.as_ref()))
    }
}

impl CertAttrSet for SubjectKeyIdentifierExtension {
    type Attribute = SubjectKeyIdentifierAttribute;

    const KIND: Kind = Kind::SubjectKeyIdentifier;
    const NAME: &'static str = "SubjectKeyIdentifier";

    fn get_attribute(&self, attr: Self::Attribute) -> Option<AttrValue> {
        match attr {
            SubjectKeyIdentifierAttribute::KeyId => {
                self.key_id.clone().map(AttrValue::KeyIdentifier)
            }
        }
    }

    fn set_attribute(&mut self, attr: Self::Attribute, value: AttrValue) -> Result<()> {
        match (attr, value) {
            (SubjectKeyIdentifierAttribute::KeyId, AttrValue::KeyIdentifier(key_id)) => {
                self.key_id = Some(key_id);
            }
            (SubjectKeyIdentifierAttribute::KeyId, _) => {
                return Err(type_error(Self::KIND, attr.as_str(), "KeyIdentifier"));
            }
        }
        let Self { key_id, cache, .. } = self;
        cache.refresh(|| encode_key_id(key_id.as_ref()))
    }

    fn delete_attribute(&mut self, attr: Self::Attribute) -> Result<()> {
        match attr {
            SubjectKeyIdentifierAttribute::KeyId => self.key_id = None,
        }
        let Self { key_id, cache, .. } = self;
        cache.refresh(|| encode_key_id(key_id.as_ref()))
    }
}

fn encode_key_id(key_id: Option<&KeyIdentifier>) -> Result<Option<Vec<u8>>> {
    key_id
        .map(|key_id| element_to_der(&key_id.encode()?))
        .transpose()
}

impl fmt::Display for SubjectKeyIdentifierExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "X509v3 Subject Key Identifier:")?;
        match &self.key_id {
            Some(key_id) => writeln!(f, "    {key_id}"),
            None => writeln!(f, "    <empty>"),
        }
    }
}
