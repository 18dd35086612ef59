//! PKIX Extension type
//!
//! RFC 5280 Section 4.1.2.9
//!
//! ```asn1
//! Extension  ::=  SEQUENCE  {
//!     extnID      OBJECT IDENTIFIER,
//!     critical    BOOLEAN DEFAULT FALSE,
//!     extnValue   OCTET STRING
//!                 -- contains the DER encoding of an ASN.1 value
//!                 -- corresponding to the extension type identified
//!                 -- by extnID
//! }
//! ```
//!
//! This is only the envelope; typed extension content lives in `x509-ext`.

use asn1::{Element, ObjectIdentifier, OctetString};
use codec::decoder::{DecodableFrom, Decoder};
use codec::encoder::{EncodableTo, Encoder};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extension {
    id: ObjectIdentifier,
    critical: bool,
    value: OctetString,
}

impl Extension {
    pub fn new(id: ObjectIdentifier, critical: bool, value: OctetString) -> Self {
        Self {
            id,
            critical,
            value,
        }
    }

    pub fn oid(&self) -> &ObjectIdentifier {
        &self.id
    }

    pub fn is_critical(&self) -> bool {
        self.critical
    }

    /// The DER-encoded extension content.
    pub fn value(&self) -> &OctetString {
        &self.value
    }
}

impl DecodableFrom<Element> for Extension {}

impl Decoder<Element, Extension> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Extension> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExtensionExpectedSequence);
        };

        // critical has DEFAULT FALSE, so it may be omitted
        let (id, critical, value) = match elements.as_slice() {
            [Element::ObjectIdentifier(id), Element::OctetString(value)] => (id, false, value),
            [
                Element::ObjectIdentifier(id),
                Element::Boolean(critical),
                Element::OctetString(value),
            ] => (id, *critical, value),
            [Element::ObjectIdentifier(_), _] => return Err(Error::ExtensionExpectedOctetString),
            [Element::ObjectIdentifier(_), _, _] => {
                return Err(Error::ExtensionInvalidCriticalOrValue);
            }
            [_, _] | [_, _, _] => return Err(Error::ExtensionExpectedOidForExtnId),
            _ => return Err(Error::ExtensionInvalidElementCount(elements.len())),
        };

        Ok(Extension::new(id.clone(), critical, value.clone()))
    }
}

impl EncodableTo<Extension> for Element {}

impl Encoder<Extension, Element> for Extension {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let mut elements = vec![Element::ObjectIdentifier(self.id.clone())];

        // DER omits a DEFAULT value
        if self.critical {
            elements.push(Element::Boolean(true));
        }

        elements.push(Element::OctetString(self.value.clone()));

        Ok(Element::Sequence(elements))
    }
}
