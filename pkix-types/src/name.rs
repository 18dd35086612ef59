//! Name and related types
//!
//! Defined in RFC 5280 Section 4.1.2.4
//!
//! ```asn1
//! Name ::= CHOICE { -- only one possibility for now --
//!     rdnSequence  RDNSequence
//! }
//!
//! RDNSequence ::= SEQUENCE OF RelativeDistinguishedName
//!
//! RelativeDistinguishedName ::= SET OF AttributeTypeAndValue
//!
//! AttributeTypeAndValue ::= SEQUENCE {
//!     type     AttributeType,
//!     value    AttributeValue
//! }
//!
//! AttributeType ::= OBJECT IDENTIFIER
//! AttributeValue ::= ANY -- DEFINED BY AttributeType
//! ```

use std::fmt;

use asn1::{Element, ObjectIdentifier};
use codec::decoder::{DecodableFrom, Decoder};
use codec::encoder::{EncodableTo, Encoder};
use serde::{Deserialize, Serialize};

use crate::OidName;
use crate::directory_string::DirectoryString;
use crate::error::{Error, Result};

/// X.509 Distinguished Name
///
/// RDNs are held in wire order, from the root of the directory tree down to
/// the most specific component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Name {
    rdn_sequence: Vec<RelativeDistinguishedName>,
}

impl Name {
    pub fn new(rdn_sequence: Vec<RelativeDistinguishedName>) -> Self {
        Self { rdn_sequence }
    }

    pub fn rdn_sequence(&self) -> &[RelativeDistinguishedName] {
        &self.rdn_sequence
    }

    pub fn is_empty(&self) -> bool {
        self.rdn_sequence.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rdn_sequence.len()
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self
            .rdn_sequence
            .iter()
            .map(|rdn| rdn.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}", formatted)
    }
}

impl DecodableFrom<Element> for Name {}

impl Decoder<Element, Name> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Name> {
        match self {
            Element::Sequence(elements) => {
                let rdn_sequence = elements
                    .iter()
                    .map(|elem| elem.decode())
                    .collect::<Result<Vec<RelativeDistinguishedName>>>()?;
                Ok(Name { rdn_sequence })
            }
            _ => Err(Error::NameExpectedSequence),
        }
    }
}

impl EncodableTo<Name> for Element {}

impl Encoder<Name, Element> for Name {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let rdn_elements = self
            .rdn_sequence
            .iter()
            .map(|rdn| rdn.encode())
            .collect::<Result<Vec<Element>>>()?;
        Ok(Element::Sequence(rdn_elements))
    }
}

/// Relative Distinguished Name (RDN)
///
/// Attributes keep their wire order; use
/// [`RelativeDistinguishedName::canonical_attributes`] for the sorted view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelativeDistinguishedName {
    attributes: Vec<AttributeTypeAndValue>,
}

impl RelativeDistinguishedName {
    pub fn new_single(attribute: AttributeTypeAndValue) -> Self {
        Self {
            attributes: vec![attribute],
        }
    }

    pub fn new(attributes: Vec<AttributeTypeAndValue>) -> Result<Self> {
        if attributes.is_empty() {
            return Err(Error::RdnEmpty);
        }
        Ok(Self { attributes })
    }

    pub fn attributes(&self) -> &[AttributeTypeAndValue] {
        &self.attributes
    }
}

impl fmt::Display for RelativeDistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self
            .attributes
            .iter()
            .map(|attr| attr.to_string())
            .collect::<Vec<_>>()
            .join("+");
        write!(f, "{}", formatted)
    }
}

impl DecodableFrom<Element> for RelativeDistinguishedName {}

impl Decoder<Element, RelativeDistinguishedName> for Element {
    type Error = Error;

    fn decode(&self) -> Result<RelativeDistinguishedName> {
        match self {
            Element::Set(elements) => {
                let attributes = elements
                    .iter()
                    .map(|elem| elem.decode())
                    .collect::<Result<Vec<AttributeTypeAndValue>>>()?;
                RelativeDistinguishedName::new(attributes)
            }
            _ => Err(Error::RdnExpectedSet),
        }
    }
}

impl EncodableTo<RelativeDistinguishedName> for Element {}

impl Encoder<RelativeDistinguishedName, Element> for RelativeDistinguishedName {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let attr_elements = self
            .attributes
            .iter()
            .map(|attr| attr.encode())
            .collect::<Result<Vec<Element>>>()?;
        Ok(Element::Set(attr_elements))
    }
}

/// An attribute value.
///
/// Directory string types decode to `Text`; anything else is kept as the
/// DER encoding of the value so that it re-encodes unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(DirectoryString),
    Encoded(Vec<u8>),
}

impl From<DirectoryString> for AttributeValue {
    fn from(value: DirectoryString) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(DirectoryString::new(value))
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Text(s) => write!(f, "{}", s),
            AttributeValue::Encoded(der) => {
                write!(f, "#")?;
                for b in der {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
        }
    }
}

/// Attribute Type and Value pair, such as CN=example.com
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeTypeAndValue {
    attribute_type: ObjectIdentifier,
    attribute_value: AttributeValue,
}

impl AttributeTypeAndValue {
    /// OID for commonName (CN)
    pub const OID_COMMON_NAME: &'static str = "2.5.4.3";
    /// OID for surname (SN)
    pub const OID_SURNAME: &'static str = "2.5.4.4";
    /// OID for serialNumber
    pub const OID_SERIAL_NUMBER: &'static str = "2.5.4.5";
    /// OID for countryName (C)
    pub const OID_COUNTRY_NAME: &'static str = "2.5.4.6";
    /// OID for localityName (L)
    pub const OID_LOCALITY_NAME: &'static str = "2.5.4.7";
    /// OID for stateOrProvinceName (ST)
    pub const OID_STATE_OR_PROVINCE_NAME: &'static str = "2.5.4.8";
    /// OID for streetAddress (STREET)
    pub const OID_STREET_ADDRESS: &'static str = "2.5.4.9";
    /// OID for organizationName (O)
    pub const OID_ORGANIZATION_NAME: &'static str = "2.5.4.10";
    /// OID for organizationalUnitName (OU)
    pub const OID_ORGANIZATIONAL_UNIT_NAME: &'static str = "2.5.4.11";
    /// OID for title
    pub const OID_TITLE: &'static str = "2.5.4.12";
    /// OID for givenName
    pub const OID_GIVEN_NAME: &'static str = "2.5.4.42";
    /// OID for dnQualifier
    pub const OID_DN_QUALIFIER: &'static str = "2.5.4.46";
    /// OID for userId (UID)
    pub const OID_USER_ID: &'static str = "0.9.2342.19200300.100.1.1";
    /// OID for domainComponent (DC)
    pub const OID_DOMAIN_COMPONENT: &'static str = "0.9.2342.19200300.100.1.25";
    /// OID for emailAddress
    pub const OID_EMAIL_ADDRESS: &'static str = "1.2.840.113549.1.9.1";

    pub fn new(attribute_type: ObjectIdentifier, attribute_value: impl Into<AttributeValue>) -> Self {
        Self {
            attribute_type,
            attribute_value: attribute_value.into(),
        }
    }

    pub fn attribute_type(&self) -> &ObjectIdentifier {
        &self.attribute_type
    }

    pub fn attribute_value(&self) -> &AttributeValue {
        &self.attribute_value
    }

    /// The string value, if the attribute holds a directory string.
    pub fn value_str(&self) -> Option<&str> {
        match &self.attribute_value {
            AttributeValue::Text(s) => Some(s.as_str()),
            AttributeValue::Encoded(_) => None,
        }
    }
}

impl OidName for AttributeTypeAndValue {
    fn oid_name(&self) -> Option<&'static str> {
        match self.attribute_type.to_string().as_str() {
            Self::OID_COMMON_NAME => Some("CN"),
            Self::OID_SURNAME => Some("SN"),
            Self::OID_SERIAL_NUMBER => Some("serialNumber"),
            Self::OID_COUNTRY_NAME => Some("C"),
            Self::OID_LOCALITY_NAME => Some("L"),
            Self::OID_STATE_OR_PROVINCE_NAME => Some("ST"),
            Self::OID_STREET_ADDRESS => Some("STREET"),
            Self::OID_ORGANIZATION_NAME => Some("O"),
            Self::OID_ORGANIZATIONAL_UNIT_NAME => Some("OU"),
            Self::OID_TITLE => Some("title"),
            Self::OID_GIVEN_NAME => Some("givenName"),
            Self::OID_DN_QUALIFIER => Some("dnQualifier"),
            Self::OID_USER_ID => Some("UID"),
            Self::OID_DOMAIN_COMPONENT => Some("DC"),
            Self::OID_EMAIL_ADDRESS => Some("emailAddress"),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeTypeAndValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.oid_name() {
            Some(name) => write!(f, "{}={}", name, self.attribute_value),
            None => write!(f, "{}={}", self.attribute_type, self.attribute_value),
        }
    }
}

impl DecodableFrom<Element> for AttributeTypeAndValue {}

impl Decoder<Element, AttributeTypeAndValue> for Element {
    type Error = Error;

    fn decode(&self) -> Result<AttributeTypeAndValue> {
        let Element::Sequence(seq) = self else {
            return Err(Error::AttributeTypeAndValueExpectedSequence);
        };

        let (attribute_type, value_elem) = match seq.as_slice() {
            [Element::ObjectIdentifier(oid), value_elem] => (oid.clone(), value_elem),
            [_, _] => return Err(Error::AttributeTypeAndValueExpectedOid),
            _ => return Err(Error::AttributeTypeAndValueInvalidElementCount),
        };

        let attribute_value = match DirectoryString::try_from(value_elem) {
            Ok(s) if !matches!(value_elem, Element::OctetString(_)) => AttributeValue::Text(s),
            _ => AttributeValue::Encoded(value_elem.to_der()?),
        };

        Ok(AttributeTypeAndValue {
            attribute_type,
            attribute_value,
        })
    }
}

impl EncodableTo<AttributeTypeAndValue> for Element {}

impl Encoder<AttributeTypeAndValue, Element> for AttributeTypeAndValue {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let oid_elm = Element::ObjectIdentifier(self.attribute_type.clone());
        let value_elm = match &self.attribute_value {
            AttributeValue::Text(s) => s.encode()?,
            AttributeValue::Encoded(der) => Element::from_der(der)?,
        };
        Ok(Element::Sequence(vec![oid_elm, value_elm]))
    }
}
