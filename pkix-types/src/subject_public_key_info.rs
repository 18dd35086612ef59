//! Subject Public Key Info
//!
//! RFC 5280 Section 4.1.2.7
//!
//! ```asn1
//! SubjectPublicKeyInfo  ::=  SEQUENCE  {
//!     algorithm            AlgorithmIdentifier,
//!     subjectPublicKey     BIT STRING
//! }
//! ```

use asn1::{BitString, Element};
use codec::decoder::{DecodableFrom, Decoder};
use codec::encoder::{EncodableTo, Encoder};
use serde::Serialize;

use crate::OidName;
use crate::algorithm::AlgorithmIdentifier;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SubjectPublicKeyInfo {
    algorithm: AlgorithmIdentifier,
    subject_public_key: BitString,
}

impl SubjectPublicKeyInfo {
    pub fn new(algorithm: AlgorithmIdentifier, subject_public_key: BitString) -> Self {
        Self {
            algorithm,
            subject_public_key,
        }
    }

    pub fn algorithm(&self) -> &AlgorithmIdentifier {
        &self.algorithm
    }

    pub fn subject_public_key(&self) -> &BitString {
        &self.subject_public_key
    }

    /// Decodes a DER-encoded SubjectPublicKeyInfo.
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        Element::from_der(bytes)?.decode()
    }

    pub fn to_der(&self) -> Result<Vec<u8>> {
        Ok(self.encode()?.to_der()?)
    }
}

impl DecodableFrom<Element> for SubjectPublicKeyInfo {}

impl Decoder<Element, SubjectPublicKeyInfo> for Element {
    type Error = Error;

    fn decode(&self) -> Result<SubjectPublicKeyInfo> {
        let Element::Sequence(elements) = self else {
            return Err(Error::SubjectPublicKeyInfoExpectedSequence);
        };

        let [algorithm_elm, public_key_elm] = elements.as_slice() else {
            return Err(Error::SubjectPublicKeyInfoInvalidElementCount(
                elements.len(),
            ));
        };
        let algorithm = algorithm_elm.decode()?;
        let Element::BitString(subject_public_key) = public_key_elm else {
            return Err(Error::SubjectPublicKeyInfoExpectedBitString);
        };

        Ok(SubjectPublicKeyInfo {
            algorithm,
            subject_public_key: subject_public_key.clone(),
        })
    }
}

impl EncodableTo<SubjectPublicKeyInfo> for Element {}

impl Encoder<SubjectPublicKeyInfo, Element> for SubjectPublicKeyInfo {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let algorithm_elm = self.algorithm.encode()?;
        let public_key_elm = Element::BitString(self.subject_public_key.clone());
        Ok(Element::Sequence(vec![algorithm_elm, public_key_elm]))
    }
}

impl OidName for SubjectPublicKeyInfo {
    fn oid_name(&self) -> Option<&'static str> {
        self.algorithm.oid_name()
    }
}
