//! CertificateIssuer CRL entry extension
//!
//! RFC 5280 Section 5.3.3
//!
//! ```asn1
//! id-ce-certificateIssuer   OBJECT IDENTIFIER ::= { id-ce 29 }
//!
//! CertificateIssuer ::=     GeneralNames
//! ```
//!
//! Built critical. A parsed extension keeps the flag it was read with.

use std::fmt;

use asn1::OctetString;
use codec::decoder::Decoder;
use codec::encoder::Encoder;

use crate::attribute::{
    AttrValue, AttributeName, CertAttrSet, Extension, ValueCache, element_to_der, type_error,
    value_element,
};
use crate::error::{Kind, Result};
use crate::general_names::GeneralNames;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateIssuerAttribute {
    Issuer,
}

impl AttributeName for CertificateIssuerAttribute {
    const ALL: &'static [Self] = &[Self::Issuer];

    fn as_str(self) -> &'static str {
        match self {
            Self::Issuer => "issuer",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CertificateIssuerExtension {
    critical: bool,
    names: GeneralNames,
    cache: ValueCache,
}

impl CertificateIssuerExtension {
    pub fn new(names: GeneralNames) -> Self {
        Self {
            critical: true,
            names,
            cache: ValueCache::default(),
        }
    }

    pub fn names(&self) -> &GeneralNames {
        &self.names
    }
}

fn encode_names(names: &GeneralNames) -> Result<Option<Vec<u8>>> {
    names
        .encode()?
        .map(|element| element_to_der(&element))
        .transpose()
}

impl Extension for CertificateIssuerExtension {
    const OID: &'static str = "2.5.29.29";

    fn parse(critical: bool, value: &OctetString) -> Result<Self> {
        let names: GeneralNames = value_element(Kind::CertificateIssuer, value)?.decode()?;
        Ok(Self {
            critical,
            ..Self::new(names)
        })
    }

    fn is_critical(&self) -> bool {
        self.critical
    }

    fn value(&self) -> Result<Vec<u8>> {
        self.cache.get_or_encode(|| encode_names(&self.names))
    }
}

impl CertAttrSet for CertificateIssuerExtension {
    type Attribute = CertificateIssuerAttribute;

    const KIND: Kind = Kind::CertificateIssuer;
    const NAME: &'static str = "CertificateIssuer";

    fn get_attribute(&self, attr: Self::Attribute) -> Option<AttrValue> {
        match attr {
            CertificateIssuerAttribute::Issuer if self.names.is_empty() => None,
            CertificateIssuerAttribute::Issuer => Some(AttrValue::GeneralNames(self.names.clone())),
        }
    }

    fn set_attribute(&mut self, attr: Self::Attribute, value: AttrValue) -> Result<()> {
        let AttrValue::GeneralNames(names) = value else {
            return Err(type_error(Self::KIND, attr.as_str(), "GeneralNames"));
        };
        self.names = names;
        let Self { names, cache, .. } = self;
        cache.refresh(|| encode_names(names))
    }

    fn delete_attribute(&mut self, attr: Self::Attribute) -> Result<()> {
        match attr {
            CertificateIssuerAttribute::Issuer => self.names = GeneralNames::default(),
        }
        let Self { names, cache, .. } = self;
        cache.refresh(|| encode_names(names))
    }
}

impl fmt::Display for CertificateIssuerExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.critical {
            writeln!(f, "X509v3 Certificate Issuer: critical")?;
        } else {
            writeln!(f, "X509v3 Certificate Issuer:")?;
        }
        writeln!(f, "    {}", self.names)
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use rstest::rstest;

    use super::*;
    use crate::error::Error;
    use crate::general_name::GeneralName;

    fn issuer_names() -> GeneralNames {
        GeneralNames::new(vec![
            GeneralName::DnsName("ca.example.com".to_string()),
            GeneralName::Uri("http://ca.example.com".to_string()),
        ])
    }

    #[test]
    fn test_encode_extension_bytes() {
        let ext = CertificateIssuerExtension::new(GeneralNames::new(vec![GeneralName::DnsName(
            "a.b".to_string(),
        )]));
        let der = ext.encode_extension().unwrap().to_der().unwrap();
        // SEQUENCE { 2.5.29.29, TRUE, OCTET STRING { SEQUENCE { [2] "a.b" } } }
        assert_eq!(
            der,
            hex!("30 11 06 03 55 1d 1d 01 01 ff 04 07 30 05 82 03 61 2e 62")
        );
    }

    #[test]
    fn test_new_is_critical() {
        let ext = CertificateIssuerExtension::new(issuer_names());
        assert!(ext.is_critical());
        assert!(ext.to_string().starts_with("X509v3 Certificate Issuer: critical\n"));
    }

    #[rstest]
    #[case(false)]
    #[case(true)]
    fn test_parsed_criticality_is_kept(#[case] critical: bool) {
        let envelope = pkix_types::Extension::new(
            "2.5.29.29".parse().unwrap(),
            critical,
            OctetString::from(hex!("30 05 82 03 61 2e 62").to_vec()),
        );
        let ext = CertificateIssuerExtension::from_extension(&envelope).unwrap();
        assert_eq!(ext.is_critical(), critical);
        assert_eq!(ext.to_extension().unwrap().is_critical(), critical);
        assert_eq!(ext.names().len(), 1);
    }

    #[rstest]
    #[case("issuer")]
    #[case("ISSUER")]
    fn test_set_roundtrips_through_encode(#[case] name: &str) {
        let mut ext = CertificateIssuerExtension::new(GeneralNames::default());
        assert_eq!(ext.get(name).unwrap(), None);

        ext.set(name, AttrValue::GeneralNames(issuer_names())).unwrap();
        assert_eq!(
            ext.get(name).unwrap(),
            Some(AttrValue::GeneralNames(issuer_names()))
        );

        let decoded =
            CertificateIssuerExtension::from_extension(&ext.to_extension().unwrap()).unwrap();
        assert_eq!(decoded.names(), &issuer_names());
    }

    #[test]
    fn test_set_wrong_type() {
        let mut ext = CertificateIssuerExtension::new(issuer_names());
        let err = ext
            .set(
                "issuer",
                AttrValue::KeyIdentifier(pkix_types::KeyIdentifier::new(&[1])),
            )
            .unwrap_err();
        assert!(matches!(err, Error::AttributeType { attribute: "issuer", .. }));
        assert_eq!(ext.names(), &issuer_names());
    }

    #[test]
    fn test_unknown_attribute() {
        let ext = CertificateIssuerExtension::new(issuer_names());
        assert!(matches!(
            ext.get("issuers"),
            Err(Error::UnknownAttribute { .. })
        ));
    }

    #[test]
    fn test_delete_leaves_no_payload() {
        let mut ext = CertificateIssuerExtension::new(issuer_names());
        assert!(!ext.value().unwrap().is_empty());
        ext.delete("Issuer").unwrap();
        assert_eq!(ext.get("issuer").unwrap(), None);
        assert!(ext.value().unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_empty_names() {
        let value = OctetString::from(hex!("30 00").to_vec());
        assert!(CertificateIssuerExtension::parse(true, &value).is_err());
    }
}
