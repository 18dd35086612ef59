//! GeneralNames
//!
//! ```asn1
//! GeneralNames ::= SEQUENCE SIZE (1..MAX) OF GeneralName
//! ```
//!
//! An empty value can be built in memory but has no encoding: the field that
//! would carry it is omitted instead.

use std::fmt;

use asn1::Element;
use codec::decoder::{DecodableFrom, Decoder};
use codec::encoder::{EncodableTo, Encoder};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Kind, Result};
use crate::general_name::{GeneralName, NameContext};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeneralNames {
    names: Vec<GeneralName>,
}

impl GeneralNames {
    pub fn new(names: Vec<GeneralName>) -> Self {
        Self { names }
    }

    pub fn push(&mut self, name: GeneralName) {
        self.names.push(name);
    }

    pub fn names(&self) -> &[GeneralName] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GeneralName> {
        self.names.iter()
    }

    pub fn decode_in(element: &Element, context: NameContext) -> Result<Self> {
        let Element::Sequence(elements) = element else {
            return Err(Error::ExpectedSequence(Kind::GeneralNames));
        };
        if elements.is_empty() {
            return Err(Error::EmptySequence(Kind::GeneralNames));
        }

        let names = elements
            .iter()
            .map(|elem| GeneralName::decode_in(elem, context))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { names })
    }
}

impl From<Vec<GeneralName>> for GeneralNames {
    fn from(names: Vec<GeneralName>) -> Self {
        Self::new(names)
    }
}

impl FromIterator<GeneralName> for GeneralNames {
    fn from_iter<I: IntoIterator<Item = GeneralName>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a GeneralNames {
    type Item = &'a GeneralName;
    type IntoIter = std::slice::Iter<'a, GeneralName>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}

impl fmt::Display for GeneralNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self
            .names
            .iter()
            .map(|name| name.to_string())
            .collect::<Vec<_>>();
        write!(f, "{}", names.join(", "))
    }
}

impl DecodableFrom<Element> for GeneralNames {}

impl Decoder<Element, GeneralNames> for Element {
    type Error = Error;

    fn decode(&self) -> Result<GeneralNames> {
        GeneralNames::decode_in(self, NameContext::Plain)
    }
}

impl EncodableTo<GeneralNames> for Option<Element> {}

impl Encoder<GeneralNames, Option<Element>> for GeneralNames {
    type Error = Error;

    /// `None` for an empty collection.
    fn encode(&self) -> Result<Option<Element>> {
        if self.names.is_empty() {
            return Ok(None);
        }
        let elements = self
            .names
            .iter()
            .map(|name| name.encode())
            .collect::<Result<Vec<_>>>()?;
        Ok(Some(Element::Sequence(elements)))
    }
}

#[cfg(test)]
mod tests {
    use std::net::IpAddr;

    use hex_literal::hex;
    use rstest::rstest;

    use super::*;
    use crate::general_name::IpAddressOrRange;

    #[rstest]
    #[case(vec![GeneralName::DnsName("example.com".to_string())])]
    #[case(vec![
        GeneralName::DnsName("example.com".to_string()),
        GeneralName::DnsName("www.example.com".to_string()),
        GeneralName::IpAddress(IpAddressOrRange::Address(IpAddr::from([127, 0, 0, 1]))),
    ])]
    #[case(vec![
        GeneralName::Uri("http://example.com/crl".to_string()),
        GeneralName::Rfc822Name("ca@example.com".to_string()),
    ])]
    fn test_general_names_roundtrip(#[case] names: Vec<GeneralName>) {
        let names = GeneralNames::new(names);
        let element = names.encode().unwrap().unwrap();
        let decoded: GeneralNames = element.decode().unwrap();
        assert_eq!(decoded, names);
    }

    #[test]
    fn test_empty_general_names_has_no_encoding() {
        let names = GeneralNames::default();
        assert!(names.is_empty());
        assert_eq!(names.encode().unwrap(), None);
    }

    #[rstest]
    #[case(Element::Sequence(vec![]))]
    #[case(Element::Set(vec![]))]
    #[case(Element::Null)]
    fn test_general_names_decode_rejects(#[case] element: Element) {
        let result: Result<GeneralNames> = element.decode();
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_sequence_error() {
        let element = Element::from_der(&hex!("30 00")).unwrap();
        let result: Result<GeneralNames> = element.decode();
        assert!(matches!(
            result,
            Err(Error::EmptySequence(Kind::GeneralNames))
        ));
    }

    #[test]
    fn test_order_is_preserved() {
        let names: GeneralNames = ["b.example", "a.example"]
            .iter()
            .map(|name| GeneralName::DnsName(name.to_string()))
            .collect();
        let element = names.encode().unwrap().unwrap();
        assert_eq!(
            element.to_der().unwrap(),
            hex!("30 16 82 09 62 2e 65 78 61 6d 70 6c 65 82 09 61 2e 65 78 61 6d 70 6c 65")
        );
        assert_eq!(names.to_string(), "DNS:b.example, DNS:a.example");
    }
}
