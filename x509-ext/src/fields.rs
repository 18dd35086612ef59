//! Certificate fields with name-keyed access
//!
//! `signature`, `serialNumber` and `subjectPublicKeyInfo` of a TBSCertificate
//! (RFC 5280 Section 4.1.2), each exposed through [`CertAttrSet`] with a
//! single attribute. Unlike extensions they encode directly to their
//! ASN.1 value and keep no cached bytes.

use std::fmt;

use asn1::Element;
use codec::decoder::{DecodableFrom, Decoder};
use codec::encoder::{EncodableTo, Encoder};
use pkix_types::{AlgorithmIdentifier, SerialNumber, SubjectPublicKeyInfo};

use crate::attribute::{AttrValue, AttributeName, CertAttrSet, type_error};
use crate::error::{Error, Kind, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmIdAttribute {
    Algorithm,
}

impl AttributeName for AlgorithmIdAttribute {
    const ALL: &'static [Self] = &[Self::Algorithm];

    fn as_str(self) -> &'static str {
        match self {
            Self::Algorithm => "algorithm",
        }
    }
}

/// The signature algorithm of a certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateAlgorithmId {
    algorithm: Option<AlgorithmIdentifier>,
}

impl CertificateAlgorithmId {
    pub fn new(algorithm: AlgorithmIdentifier) -> Self {
        Self {
            algorithm: Some(algorithm),
        }
    }

    pub fn algorithm(&self) -> Option<&AlgorithmIdentifier> {
        self.algorithm.as_ref()
    }
}

impl CertAttrSet for CertificateAlgorithmId {
    type Attribute = AlgorithmIdAttribute;

    const KIND: Kind = Kind::CertificateAlgorithmId;
    const NAME: &'static str = "algorithmID";

    fn get_attribute(&self, attr: Self::Attribute) -> Option<AttrValue> {
        match attr {
            AlgorithmIdAttribute::Algorithm => self.algorithm.clone().map(AttrValue::AlgorithmId),
        }
    }

    fn set_attribute(&mut self, attr: Self::Attribute, value: AttrValue) -> Result<()> {
        match value {
            AttrValue::AlgorithmId(algorithm) => {
                self.algorithm = Some(algorithm);
                Ok(())
            }
            _ => Err(type_error(Self::KIND, attr.as_str(), "AlgorithmIdentifier")),
        }
    }

    fn delete_attribute(&mut self, attr: Self::Attribute) -> Result<()> {
        match attr {
            AlgorithmIdAttribute::Algorithm => self.algorithm = None,
        }
        Ok(())
    }
}

impl fmt::Display for CertificateAlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.algorithm {
            Some(algorithm) => write!(f, "Signature Algorithm: {algorithm}"),
            None => write!(f, "Signature Algorithm: <empty>"),
        }
    }
}

impl DecodableFrom<Element> for CertificateAlgorithmId {}

impl Decoder<Element, CertificateAlgorithmId> for Element {
    type Error = Error;

    fn decode(&self) -> Result<CertificateAlgorithmId> {
        let algorithm: AlgorithmIdentifier = self.decode()?;
        Ok(CertificateAlgorithmId::new(algorithm))
    }
}

impl EncodableTo<CertificateAlgorithmId> for Element {}

impl Encoder<CertificateAlgorithmId, Element> for CertificateAlgorithmId {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let algorithm = self
            .algorithm
            .as_ref()
            .ok_or(Error::MissingValue(Kind::CertificateAlgorithmId))?;
        Ok(algorithm.encode()?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialNumberAttribute {
    Number,
}

impl AttributeName for SerialNumberAttribute {
    const ALL: &'static [Self] = &[Self::Number];

    fn as_str(self) -> &'static str {
        match self {
            Self::Number => "number",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateSerialNumber {
    number: Option<SerialNumber>,
}

impl CertificateSerialNumber {
    pub fn new(number: SerialNumber) -> Self {
        Self {
            number: Some(number),
        }
    }

    pub fn number(&self) -> Option<&SerialNumber> {
        self.number.as_ref()
    }
}

impl CertAttrSet for CertificateSerialNumber {
    type Attribute = SerialNumberAttribute;

    const KIND: Kind = Kind::CertificateSerialNumber;
    const NAME: &'static str = "serialNumber";

    fn get_attribute(&self, attr: Self::Attribute) -> Option<AttrValue> {
        match attr {
            SerialNumberAttribute::Number => self.number.clone().map(AttrValue::SerialNumber),
        }
    }

    fn set_attribute(&mut self, attr: Self::Attribute, value: AttrValue) -> Result<()> {
        match value {
            AttrValue::SerialNumber(number) => {
                self.number = Some(number);
                Ok(())
            }
            _ => Err(type_error(Self::KIND, attr.as_str(), "SerialNumber")),
        }
    }

    fn delete_attribute(&mut self, attr: Self::Attribute) -> Result<()> {
        match attr {
            SerialNumberAttribute::Number => self.number = None,
        }
        Ok(())
    }
}

impl fmt::Display for CertificateSerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.number {
            Some(number) => write!(f, "Serial Number: {}", number.format_hex()),
            None => write!(f, "Serial Number: <empty>"),
        }
    }
}

impl DecodableFrom<Element> for CertificateSerialNumber {}

impl Decoder<Element, CertificateSerialNumber> for Element {
    type Error = Error;

    fn decode(&self) -> Result<CertificateSerialNumber> {
        let number: SerialNumber = self.decode()?;
        Ok(CertificateSerialNumber::new(number))
    }
}

impl EncodableTo<CertificateSerialNumber> for Element {}

impl Encoder<CertificateSerialNumber, Element> for CertificateSerialNumber {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let number = self
            .number
            .as_ref()
            .ok_or(Error::MissingValue(Kind::CertificateSerialNumber))?;
        Ok(number.encode()?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum X509KeyAttribute {
    Key,
}

impl AttributeName for X509KeyAttribute {
    const ALL: &'static [Self] = &[Self::Key];

    fn as_str(self) -> &'static str {
        match self {
            Self::Key => "key",
        }
    }
}

/// The subject public key of a certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateX509Key {
    key: Option<SubjectPublicKeyInfo>,
}

impl CertificateX509Key {
    pub fn new(key: SubjectPublicKeyInfo) -> Self {
        Self { key: Some(key) }
    }

    pub fn key(&self) -> Option<&SubjectPublicKeyInfo> {
        self.key.as_ref()
    }
}

impl CertAttrSet for CertificateX509Key {
    type Attribute = X509KeyAttribute;

    const KIND: Kind = Kind::CertificateX509Key;
    const NAME: &'static str = "key";

    fn get_attribute(&self, attr: Self::Attribute) -> Option<AttrValue> {
        match attr {
            X509KeyAttribute::Key => self.key.clone().map(AttrValue::PublicKey),
        }
    }

    fn set_attribute(&mut self, attr: Self::Attribute, value: AttrValue) -> Result<()> {
        match value {
            AttrValue::PublicKey(key) => {
                self.key = Some(key);
                Ok(())
            }
            _ => Err(type_error(Self::KIND, attr.as_str(), "SubjectPublicKeyInfo")),
        }
    }

    fn delete_attribute(&mut self, attr: Self::Attribute) -> Result<()> {
        match attr {
            X509KeyAttribute::Key => self.key = None,
        }
        Ok(())
    }
}

impl fmt::Display for CertificateX509Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(
                f,
                "Public Key Algorithm: {}, {} bits",
                key.algorithm(),
                key.subject_public_key().bit_len()
            ),
            None => write!(f, "Public Key: <empty>"),
        }
    }
}

impl DecodableFrom<Element> for CertificateX509Key {}

impl Decoder<Element, CertificateX509Key> for Element {
    type Error = Error;

    fn decode(&self) -> Result<CertificateX509Key> {
        let key: SubjectPublicKeyInfo = self.decode()?;
        Ok(CertificateX509Key::new(key))
    }
}

impl EncodableTo<CertificateX509Key> for Element {}

impl Encoder<CertificateX509Key, Element> for CertificateX509Key {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let key = self
            .key
            .as_ref()
            .ok_or(Error::MissingValue(Kind::CertificateX509Key))?;
        Ok(key.encode()?)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use asn1::{BitString, ObjectIdentifier};
    use hex_literal::hex;
    use pkix_types::AlgorithmParameters;
    use rstest::rstest;

    use super::*;

    fn sha256_with_rsa() -> AlgorithmIdentifier {
        AlgorithmIdentifier::new_with_params(
            ObjectIdentifier::from_str("1.2.840.113549.1.1.11").unwrap(),
            AlgorithmParameters::Null,
        )
    }

    fn ec_key() -> SubjectPublicKeyInfo {
        SubjectPublicKeyInfo::new(
            AlgorithmIdentifier::new(ObjectIdentifier::from_str("1.2.840.10045.2.1").unwrap()),
            BitString::new(0, vec![0x04, 0xaa, 0xbb]),
        )
    }

    #[test]
    fn test_algorithm_id_roundtrip() {
        let field = CertificateAlgorithmId::new(sha256_with_rsa());
        let element = field.encode().unwrap();
        assert_eq!(
            element.to_der().unwrap(),
            hex!("30 0d 06 09 2a 86 48 86 f7 0d 01 01 0b 05 00")
        );
        let decoded: CertificateAlgorithmId = element.decode().unwrap();
        assert_eq!(decoded, field);
    }

    #[rstest]
    #[case("algorithm")]
    #[case("Algorithm")]
    fn test_algorithm_id_attribute(#[case] name: &str) {
        let ecdsa = ObjectIdentifier::from_str("1.2.840.10045.4.3.2").unwrap();
        let mut field = CertificateAlgorithmId::new(AlgorithmIdentifier::new(ecdsa));
        field.set(name, AttrValue::AlgorithmId(sha256_with_rsa())).unwrap();
        assert_eq!(
            field.get(name).unwrap(),
            Some(AttrValue::AlgorithmId(sha256_with_rsa()))
        );
        assert!(matches!(
            field.set(name, AttrValue::SerialNumber(SerialNumber::from(1i64))),
            Err(Error::AttributeType { .. })
        ));
        assert_eq!(field.algorithm(), Some(&sha256_with_rsa()));
        assert!(matches!(
            field.get("alg"),
            Err(Error::UnknownAttribute { .. })
        ));
    }

    #[test]
    fn test_serial_number_roundtrip() {
        let field = CertificateSerialNumber::new(SerialNumber::from_bytes(&[0x01, 0x00]));
        let element = field.encode().unwrap();
        assert_eq!(element.to_der().unwrap(), hex!("02 02 01 00"));
        let decoded: CertificateSerialNumber = element.decode().unwrap();
        assert_eq!(decoded, field);
        assert_eq!(
            decoded.get("NUMBER").unwrap(),
            Some(AttrValue::SerialNumber(SerialNumber::from(256i64)))
        );
    }

    #[test]
    fn test_serial_number_delete() {
        let mut field = CertificateSerialNumber::new(SerialNumber::from(5i64));
        field.delete("number").unwrap();
        assert_eq!(field.get("number").unwrap(), None);
        assert!(matches!(
            field.encode(),
            Err(Error::MissingValue(Kind::CertificateSerialNumber))
        ));
        assert!(matches!(
            field.set("number", AttrValue::PublicKey(ec_key())),
            Err(Error::AttributeType { .. })
        ));
    }

    #[test]
    fn test_x509_key_roundtrip() {
        let field = CertificateX509Key::new(ec_key());
        let element = field.encode().unwrap();
        let decoded: CertificateX509Key = element.decode().unwrap();
        assert_eq!(decoded.key(), Some(&ec_key()));
        assert_eq!(decoded.attribute_names(), vec!["key"]);
    }

    #[test]
    fn test_x509_key_attribute() {
        let mut field = CertificateX509Key::new(ec_key());
        assert!(matches!(
            field.set("key", AttrValue::AlgorithmId(sha256_with_rsa())),
            Err(Error::AttributeType { .. })
        ));
        assert_eq!(field.get("KEY").unwrap(), Some(AttrValue::PublicKey(ec_key())));
        field.delete("key").unwrap();
        assert_eq!(field.key(), None);
        assert!(matches!(
            field.delete("public_key"),
            Err(Error::UnknownAttribute { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_wrong_element() {
        let result: Result<CertificateSerialNumber> = Element::Null.decode();
        assert!(result.is_err());
        let result: Result<CertificateX509Key> = Element::Integer(1u32.into()).decode();
        assert!(result.is_err());
    }
}
