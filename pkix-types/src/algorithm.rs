//! AlgorithmIdentifier type
//!
//! Defined in RFC 5280 Section 4.1.1.2

use std::fmt;

use asn1::{Element, ObjectIdentifier};
use codec::decoder::{DecodableFrom, Decoder};
use codec::encoder::{EncodableTo, Encoder};
use serde::{Deserialize, Serialize, ser::SerializeStruct};

use crate::OidName;
use crate::error::{Error, Result};

/// Parameters field in AlgorithmIdentifier
///
/// Wrapped in Option:
/// - None: Field not present (OPTIONAL field omitted, 0 bytes)
/// - Some(AlgorithmParameters::Null): Explicit NULL value (common for RSA)
/// - Some(AlgorithmParameters::Elm(Element)): Any other ASN.1 element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AlgorithmParameters {
    Null,
    Elm(Element),
}

impl Serialize for AlgorithmParameters {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            AlgorithmParameters::Null => serializer.serialize_str("Null"),
            AlgorithmParameters::Elm(elm) => {
                let der = elm.to_der().map_err(serde::ser::Error::custom)?;
                let hex = der.iter().map(|b| format!("{:02x}", b)).collect::<String>();
                serializer.serialize_str(&hex)
            }
        }
    }
}

/// Algorithm Identifier
///
/// ```asn1
/// AlgorithmIdentifier ::= SEQUENCE {
///     algorithm   OBJECT IDENTIFIER,
///     parameters  ANY DEFINED BY algorithm OPTIONAL
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlgorithmIdentifier {
    algorithm: ObjectIdentifier,
    parameters: Option<AlgorithmParameters>,
}

impl AlgorithmIdentifier {
    pub const OID_RSA_ENCRYPTION: &'static str = "1.2.840.113549.1.1.1";
    pub const OID_SHA256_WITH_RSA_ENCRYPTION: &'static str = "1.2.840.113549.1.1.11";
    pub const OID_EC_PUBLIC_KEY: &'static str = "1.2.840.10045.2.1";
    pub const OID_ECDSA_WITH_SHA256: &'static str = "1.2.840.10045.4.3.2";
    pub const OID_ED25519: &'static str = "1.3.101.112";

    pub fn new(algorithm: ObjectIdentifier) -> Self {
        Self {
            algorithm,
            parameters: None,
        }
    }

    pub fn new_with_params(algorithm: ObjectIdentifier, parameters: AlgorithmParameters) -> Self {
        Self {
            algorithm,
            parameters: Some(parameters),
        }
    }

    pub fn algorithm(&self) -> &ObjectIdentifier {
        &self.algorithm
    }

    pub fn parameters(&self) -> Option<&AlgorithmParameters> {
        self.parameters.as_ref()
    }
}

impl OidName for AlgorithmIdentifier {
    fn oid_name(&self) -> Option<&'static str> {
        match self.algorithm.to_string().as_str() {
            Self::OID_RSA_ENCRYPTION => Some("rsaEncryption"),
            Self::OID_SHA256_WITH_RSA_ENCRYPTION => Some("sha256WithRSAEncryption"),
            Self::OID_EC_PUBLIC_KEY => Some("id-ecPublicKey"),
            Self::OID_ECDSA_WITH_SHA256 => Some("ecdsa-with-SHA256"),
            Self::OID_ED25519 => Some("Ed25519"),
            _ => None,
        }
    }
}

impl fmt::Display for AlgorithmIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.oid_name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "{}", self.algorithm),
        }
    }
}

impl Serialize for AlgorithmIdentifier {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AlgorithmIdentifier", 2)?;
        state.serialize_field("algorithm", &self.algorithm)?;
        if let Some(params) = &self.parameters {
            state.serialize_field("parameters", params)?;
        }
        state.end()
    }
}

impl<'de> Deserialize<'de> for AlgorithmIdentifier {
    fn deserialize<D>(_deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Err(serde::de::Error::custom(
            "AlgorithmIdentifier deserialization not supported",
        ))
    }
}

impl DecodableFrom<Element> for AlgorithmIdentifier {}

impl Decoder<Element, AlgorithmIdentifier> for Element {
    type Error = Error;

    fn decode(&self) -> Result<AlgorithmIdentifier> {
        let Element::Sequence(elements) = self else {
            return Err(Error::AlgorithmIdentifierExpectedSequence);
        };

        let (algorithm, parameters) = match elements.as_slice() {
            [Element::ObjectIdentifier(oid)] => (oid.clone(), None),
            [Element::ObjectIdentifier(oid), Element::Null] => {
                (oid.clone(), Some(AlgorithmParameters::Null))
            }
            [Element::ObjectIdentifier(oid), other] => {
                (oid.clone(), Some(AlgorithmParameters::Elm(other.clone())))
            }
            [_] | [_, _] => return Err(Error::AlgorithmIdentifierExpectedOid),
            _ => return Err(Error::AlgorithmIdentifierInvalidElementCount(elements.len())),
        };

        Ok(AlgorithmIdentifier {
            algorithm,
            parameters,
        })
    }
}

impl EncodableTo<AlgorithmIdentifier> for Element {}

impl Encoder<AlgorithmIdentifier, Element> for AlgorithmIdentifier {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let mut elements = vec![Element::ObjectIdentifier(self.algorithm.clone())];
        if let Some(params) = &self.parameters {
            elements.push(match params {
                AlgorithmParameters::Null => Element::Null,
                AlgorithmParameters::Elm(elm) => elm.clone(),
            });
        }

        Ok(Element::Sequence(elements))
    }
}
