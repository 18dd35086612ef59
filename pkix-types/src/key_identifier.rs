//! Key Identifier
//!
//! Defined in RFC 5280 Section 4.2.1.1 and 4.2.1.2
//!
//! ```asn1
//! KeyIdentifier ::= OCTET STRING
//! ```

use std::fmt;

use asn1::{Element, OctetString};
use codec::decoder::{DecodableFrom, Decoder};
use codec::encoder::{EncodableTo, Encoder};
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

use crate::error::{Error, Result};
use crate::subject_public_key_info::SubjectPublicKeyInfo;

/// Opaque bytes identifying a public key.
///
/// The bytes are copied on construction and on every read, so a caller
/// never shares a buffer with the identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyIdentifier {
    octets: OctetString,
}

impl KeyIdentifier {
    pub fn new(identifier: &[u8]) -> Self {
        Self {
            octets: OctetString::from(identifier),
        }
    }

    /// Method (1) of RFC 5280 section 4.2.1.2: the SHA-1 hash of the
    /// subjectPublicKey BIT STRING contents, excluding the tag, length and
    /// unused-bits octet.
    pub fn from_public_key(public_key: &SubjectPublicKeyInfo) -> Self {
        let digest = Sha1::digest(public_key.subject_public_key().as_bytes());
        Self::new(&digest)
    }

    /// Same as [`KeyIdentifier::from_public_key`], starting from the DER
    /// encoding of a SubjectPublicKeyInfo.
    pub fn from_public_key_der(spki: &[u8]) -> Result<Self> {
        let public_key = SubjectPublicKeyInfo::from_der(spki)?;
        Ok(Self::from_public_key(&public_key))
    }

    /// A copy of the identifier bytes.
    pub fn identifier(&self) -> Vec<u8> {
        self.octets.as_bytes().to_vec()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.octets.as_bytes()
    }
}

impl fmt::Display for KeyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self
            .octets
            .as_bytes()
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(":");
        write!(f, "{}", hex)
    }
}

impl DecodableFrom<Element> for KeyIdentifier {}

impl Decoder<Element, KeyIdentifier> for Element {
    type Error = Error;

    fn decode(&self) -> Result<KeyIdentifier> {
        match self {
            Element::OctetString(octets) => Ok(KeyIdentifier {
                octets: octets.clone(),
            }),
            _ => Err(Error::KeyIdentifierExpectedOctetString),
        }
    }
}

impl EncodableTo<KeyIdentifier> for Element {}

impl Encoder<KeyIdentifier, Element> for KeyIdentifier {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(Element::OctetString(self.octets.clone()))
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use rstest::rstest;

    use super::*;

    // SEQUENCE { SEQUENCE { id-ecPublicKey, prime256v1 }, BIT STRING 01 02 }
    const EC_SPKI: [u8; 28] = hex!(
        "30 1a 30 13 06 07 2a 86 48 ce 3d 02 01 06 08 2a 86 48 ce 3d 03 01 07 03 03 00 01 02"
    );

    #[test]
    fn test_from_public_key_hashes_bit_string_contents() {
        let id = KeyIdentifier::from_public_key_der(&EC_SPKI).unwrap();
        let expected = Sha1::digest([0x01u8, 0x02]);
        assert_eq!(id.as_bytes(), expected.as_slice());
        assert_eq!(id.identifier().len(), 20);
    }

    #[test]
    fn test_from_public_key_is_deterministic() {
        let a = KeyIdentifier::from_public_key_der(&EC_SPKI).unwrap();
        let b = KeyIdentifier::from_public_key_der(&EC_SPKI).unwrap();
        assert_eq!(a, b);
    }

    #[rstest]
    #[case(&hex!("04 02 01 02"))]
    #[case(&hex!("30 03 02 01 01"))]
    #[case(&hex!("30 00"))]
    fn test_from_public_key_rejects_malformed(#[case] input: &[u8]) {
        assert!(KeyIdentifier::from_public_key_der(input).is_err());
    }

    #[test]
    fn test_identifier_is_a_copy() {
        let mut source = vec![0xde, 0xad, 0xbe, 0xef];
        let id = KeyIdentifier::new(&source);
        source[0] = 0x00;
        assert_eq!(id.as_bytes(), &[0xde, 0xad, 0xbe, 0xef]);

        let mut out = id.identifier();
        out[1] = 0x00;
        assert_eq!(id.identifier(), vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn test_display_and_roundtrip() {
        let id = KeyIdentifier::new(&[0x0a, 0xbc]);
        assert_eq!(id.to_string(), "0A:BC");

        let element = id.encode().unwrap();
        assert_eq!(element.to_der().unwrap(), vec![0x04, 0x02, 0x0a, 0xbc]);
        let decoded: KeyIdentifier = element.decode().unwrap();
        assert_eq!(decoded, id);
    }
}
