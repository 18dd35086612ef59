//! CRL number style extensions
//!
//! RFC 5280 Section 5.2.3 and 5.2.4
//!
//! ```asn1
//! id-ce-cRLNumber OBJECT IDENTIFIER ::= { id-ce 20 }
//!
//! CRLNumber ::= INTEGER (0..MAX)
//!
//! id-ce-deltaCRLIndicator OBJECT IDENTIFIER ::= { id-ce 27 }
//!
//! BaseCRLNumber ::= CRLNumber
//! ```
//!
//! Both extensions carry one INTEGER and differ only in OID, criticality and
//! display label, so they share [`IntegerExtension`].

use std::fmt;
use std::marker::PhantomData;

use asn1::{Element, Integer, OctetString};

use crate::attribute::{
    AttrValue, AttributeName, CertAttrSet, Extension, ValueCache, element_to_der, type_error,
    value_element,
};
use crate::error::{Error, Kind, Result};

/// Fixed properties of one integer-valued extension.
pub trait IntegerExtensionKind {
    const OID: &'static str;
    const KIND: Kind;
    const NAME: &'static str;
    /// Label used when displaying the value.
    const LABEL: &'static str;
    /// Criticality of a newly built extension. When true, the extension is
    /// critical regardless of the flag it was parsed with.
    const CRITICAL: bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrlNumber;

impl IntegerExtensionKind for CrlNumber {
    const OID: &'static str = "2.5.29.20";
    const KIND: Kind = Kind::CrlNumber;
    const NAME: &'static str = "CRLNumber";
    const LABEL: &'static str = "CRL Number";
    const CRITICAL: bool = false;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeltaCrlIndicator;

impl IntegerExtensionKind for DeltaCrlIndicator {
    const OID: &'static str = "2.5.29.27";
    const KIND: Kind = Kind::DeltaCrlIndicator;
    const NAME: &'static str = "DeltaCRLIndicator";
    const LABEL: &'static str = "Base CRL Number";
    const CRITICAL: bool = true;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegerExtensionAttribute {
    Value,
}

impl AttributeName for IntegerExtensionAttribute {
    const ALL: &'static [Self] = &[Self::Value];

    fn as_str(self) -> &'static str {
        match self {
            Self::Value => "value",
        }
    }
}

#[derive(Debug, Clone)]
pub struct IntegerExtension<K> {
    critical: bool,
    number: Option<Integer>,
    cache: ValueCache,
    kind: PhantomData<K>,
}

pub type CrlNumberExtension = IntegerExtension<CrlNumber>;
pub type DeltaCrlIndicatorExtension = IntegerExtension<DeltaCrlIndicator>;

impl<K: IntegerExtensionKind> IntegerExtension<K> {
    pub fn new(value: impl Into<Integer>) -> Self {
        Self {
            critical: K::CRITICAL,
            number: Some(value.into()),
            cache: ValueCache::default(),
            kind: PhantomData,
        }
    }

    pub fn number(&self) -> Option<&Integer> {
        self.number.as_ref()
    }
}

fn encode_number(value: Option<&Integer>) -> Result<Option<Vec<u8>>> {
    value
        .map(|value| element_to_der(&Element::Integer(value.clone())))
        .transpose()
}

impl<K: IntegerExtensionKind> Extension for IntegerExtension<K> {
    const OID: &'static str = K::OID;

    fn parse(critical: bool, value: &OctetString) -> Result<Self> {
        let Element::Integer(number) = value_element(K::KIND, value)? else {
            return Err(Error::ExpectedInteger(K::KIND));
        };
        let negative = number
            .to_signed_bytes_be()
            .first()
            .is_some_and(|byte| byte & 0x80 != 0);
        if negative {
            return Err(Error::ValueOutOfRange {
                kind: K::KIND,
                field: "number",
            });
        }

        Ok(Self {
            critical: critical || K::CRITICAL,
            number: Some(number),
            cache: ValueCache::default(),
            kind: PhantomData,
        })
    }

    fn is_critical(&self) -> bool {
        self.critical
    }

    fn value(&self) -> Result<Vec<u8>> {
        self.cache.get_or_encode(|| encode_number(self.number.as_ref()))
    }
}

impl<K: IntegerExtensionKind> CertAttrSet for IntegerExtension<K> {
    type Attribute = IntegerExtensionAttribute;

    const KIND: Kind = K::KIND;
    const NAME: &'static str = K::NAME;

    fn get_attribute(&self, attr: Self::Attribute) -> Option<AttrValue> {
        match attr {
            IntegerExtensionAttribute::Value => self.number.clone().map(AttrValue::Integer),
        }
    }

    fn set_attribute(&mut self, attr: Self::Attribute, value: AttrValue) -> Result<()> {
        let AttrValue::Integer(number) = value else {
            return Err(type_error(K::KIND, attr.as_str(), "Integer"));
        };
        self.number = Some(number);
        let Self { number, cache, .. } = self;
        cache.refresh(|| encode_number(number.as_ref()))
    }

    fn delete_attribute(&mut self, attr: Self::Attribute) -> Result<()> {
        match attr {
            IntegerExtensionAttribute::Value => self.number = None,
        }
        self.cache.refresh(|| Ok(None))
    }
}

impl<K: IntegerExtensionKind> fmt::Display for IntegerExtension<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.number {
            Some(value) => writeln!(f, "{}: {}", K::LABEL, value),
            None => writeln!(f, "{}: <empty>", K::LABEL),
        }
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_crl_number_bytes() {
        let ext = CrlNumberExtension::new(4096u32);
        let der = ext.encode_extension().unwrap().to_der().unwrap();
        // SEQUENCE { 2.5.29.20, OCTET STRING { INTEGER 4096 } }
        assert_eq!(der, hex!("30 0b 06 03 55 1d 14 04 04 02 02 10 00"));
        assert!(!ext.is_critical());
        assert_eq!(ext.to_string(), "CRL Number: 4096\n");
    }

    #[test]
    fn test_delta_crl_indicator_is_critical() {
        let ext = DeltaCrlIndicatorExtension::new(7u32);
        let der = ext.encode_extension().unwrap().to_der().unwrap();
        // SEQUENCE { 2.5.29.27, TRUE, OCTET STRING { INTEGER 7 } }
        assert_eq!(der, hex!("30 0d 06 03 55 1d 1b 01 01 ff 04 03 02 01 07"));
        assert_eq!(ext.to_string(), "Base CRL Number: 7\n");

        let parsed =
            DeltaCrlIndicatorExtension::parse(false, &OctetString::from(hex!("02 01 07").to_vec()))
                .unwrap();
        assert!(parsed.is_critical());
        assert_eq!(parsed.number(), Some(&Integer::from(7u32)));
    }

    #[test]
    fn test_kinds_do_not_mix() {
        let ext = CrlNumberExtension::new(1u32).to_extension().unwrap();
        assert!(matches!(
            DeltaCrlIndicatorExtension::from_extension(&ext),
            Err(Error::OidMismatch { .. })
        ));
        assert!(CrlNumberExtension::from_extension(&ext).is_ok());
    }

    #[rstest]
    #[case("value")]
    #[case("VALUE")]
    fn test_value_attribute(#[case] name: &str) {
        let mut ext = CrlNumberExtension::new(1u32);
        ext.set(name, AttrValue::Integer(Integer::from(300u32))).unwrap();
        assert_eq!(ext.value().unwrap(), hex!("02 02 01 2c"));
        assert_eq!(
            ext.get(name).unwrap(),
            Some(AttrValue::Integer(Integer::from(300u32)))
        );

        ext.delete(name).unwrap();
        assert_eq!(ext.get(name).unwrap(), None);
        assert!(ext.value().unwrap().is_empty());
    }

    #[test]
    fn test_value_attribute_errors() {
        let mut ext = DeltaCrlIndicatorExtension::new(5u32);
        assert!(matches!(
            ext.set("value", AttrValue::Reason(crate::extensions::CrlReason::Superseded)),
            Err(Error::AttributeType { .. })
        ));
        assert_eq!(ext.number(), Some(&Integer::from(5u32)));
        assert!(matches!(
            ext.get("number"),
            Err(Error::UnknownAttribute { .. })
        ));
        assert_eq!(ext.attribute_names(), vec!["value"]);
    }

    #[rstest]
    // ENUMERATED
    #[case(hex!("0a 01 01").to_vec())]
    // negative
    #[case(hex!("02 01 ff").to_vec())]
    fn test_parse_rejects(#[case] value: Vec<u8>) {
        assert!(CrlNumberExtension::parse(false, &OctetString::from(value)).is_err());
    }
}
