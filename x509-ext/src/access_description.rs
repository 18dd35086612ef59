//! AccessDescription
//!
//! RFC 5280 Section 4.2.2.1
//!
//! ```asn1
//! AccessDescription  ::=  SEQUENCE {
//!         accessMethod          OBJECT IDENTIFIER,
//!         accessLocation        GeneralName  }
//! ```

use std::cell::OnceCell;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use asn1::{Element, ObjectIdentifier};
use codec::decoder::{DecodableFrom, Decoder};
use codec::encoder::{EncodableTo, Encoder};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Kind, Result};
use crate::general_name::GeneralName;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessDescription {
    access_method: ObjectIdentifier,
    access_location: GeneralName,
    #[serde(skip)]
    hash: OnceCell<u64>,
}

impl AccessDescription {
    /// id-ad-ocsp
    pub const OCSP: &'static str = "1.3.6.1.5.5.7.48.1";
    /// id-ad-caIssuers
    pub const CA_ISSUERS: &'static str = "1.3.6.1.5.5.7.48.2";
    /// id-ad-timeStamping
    pub const TIME_STAMPING: &'static str = "1.3.6.1.5.5.7.48.3";
    /// id-ad-caRepository
    pub const CA_REPOSITORY: &'static str = "1.3.6.1.5.5.7.48.5";

    pub fn new(access_method: ObjectIdentifier, access_location: GeneralName) -> Self {
        Self {
            access_method,
            access_location,
            hash: OnceCell::new(),
        }
    }

    pub fn access_method(&self) -> &ObjectIdentifier {
        &self.access_method
    }

    pub fn access_location(&self) -> &GeneralName {
        &self.access_location
    }

    fn method_label(&self) -> String {
        let method = self.access_method.to_string();
        match method.as_str() {
            Self::OCSP => "ocsp".to_string(),
            Self::CA_ISSUERS => "caIssuers".to_string(),
            Self::TIME_STAMPING => "timeStamping".to_string(),
            Self::CA_REPOSITORY => "caRepository".to_string(),
            _ => method,
        }
    }

    fn hash_value(&self) -> u64 {
        *self.hash.get_or_init(|| {
            let mut hasher = DefaultHasher::new();
            self.access_method.hash(&mut hasher);
            self.access_location.hash(&mut hasher);
            hasher.finish()
        })
    }
}

impl PartialEq for AccessDescription {
    fn eq(&self, other: &Self) -> bool {
        self.access_method == other.access_method && self.access_location == other.access_location
    }
}

impl Eq for AccessDescription {}

impl Hash for AccessDescription {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_value());
    }
}

impl fmt::Display for AccessDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "accessMethod: {}\n   accessLocation: {}",
            self.method_label(),
            self.access_location
        )
    }
}

impl DecodableFrom<Element> for AccessDescription {}

impl Decoder<Element, AccessDescription> for Element {
    type Error = Error;

    fn decode(&self) -> Result<AccessDescription> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence(Kind::AccessDescription));
        };
        let [method, location] = elements.as_slice() else {
            return Err(Error::InvalidElementCount {
                kind: Kind::AccessDescription,
                expected: "2",
                actual: elements.len(),
            });
        };
        let Element::ObjectIdentifier(access_method) = method else {
            return Err(Error::ExpectedOid(Kind::AccessDescription));
        };

        Ok(AccessDescription::new(
            access_method.clone(),
            location.decode()?,
        ))
    }
}

impl EncodableTo<AccessDescription> for Element {}

impl Encoder<AccessDescription, Element> for AccessDescription {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(Element::Sequence(vec![
            Element::ObjectIdentifier(self.access_method.clone()),
            self.access_location.encode()?,
        ]))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::str::FromStr;

    use hex_literal::hex;
    use rstest::rstest;

    use super::*;

    fn oid(s: &str) -> ObjectIdentifier {
        ObjectIdentifier::from_str(s).unwrap()
    }

    #[test]
    fn test_ocsp_access_description_bytes() {
        // SEQUENCE { id-ad-ocsp, [6] "http://o.e" }
        let der = hex!("30 16 06 08 2b 06 01 05 05 07 30 01 86 0a 68 74 74 70 3a 2f 2f 6f 2e 65");
        let decoded: AccessDescription = Element::from_der(&der).unwrap().decode().unwrap();
        assert_eq!(decoded.access_method(), &oid(AccessDescription::OCSP));
        assert_eq!(
            decoded.access_location(),
            &GeneralName::Uri("http://o.e".to_string())
        );
        assert_eq!(decoded.encode().unwrap().to_der().unwrap(), der);
    }

    #[rstest]
    #[case(AccessDescription::OCSP, "ocsp")]
    #[case(AccessDescription::CA_ISSUERS, "caIssuers")]
    #[case(AccessDescription::TIME_STAMPING, "timeStamping")]
    #[case(AccessDescription::CA_REPOSITORY, "caRepository")]
    #[case("1.3.6.1.5.5.7.48.9", "1.3.6.1.5.5.7.48.9")]
    fn test_method_display(#[case] method: &str, #[case] label: &str) {
        let desc = AccessDescription::new(
            oid(method),
            GeneralName::Uri("http://ca.example.com/ca.crt".to_string()),
        );
        assert_eq!(
            desc.to_string(),
            format!("accessMethod: {label}\n   accessLocation: URI:http://ca.example.com/ca.crt")
        );
    }

    #[rstest]
    #[case(AccessDescription::CA_ISSUERS, GeneralName::Uri("http://ca.example.com/ca.crt".to_string()))]
    #[case(AccessDescription::CA_REPOSITORY, GeneralName::DnsName("repo.example.com".to_string()))]
    #[case("1.2.3.4", GeneralName::RegisteredId(oid("1.2.3.5")))]
    fn test_access_description_roundtrip(#[case] method: &str, #[case] location: GeneralName) {
        let desc = AccessDescription::new(oid(method), location);
        let decoded: AccessDescription = desc.encode().unwrap().decode().unwrap();
        assert_eq!(decoded, desc);
    }

    #[rstest]
    // SET
    #[case(hex!("31 07 06 03 2a 03 04 82 00").to_vec())]
    // method only
    #[case(hex!("30 05 06 03 2a 03 04").to_vec())]
    // method is an INTEGER
    #[case(hex!("30 05 02 01 01 82 00").to_vec())]
    // location has an unknown tag
    #[case(hex!("30 07 06 03 2a 03 04 89 00").to_vec())]
    fn test_access_description_decode_rejects(#[case] der: Vec<u8>) {
        let element = Element::from_der(&der).unwrap();
        let result: Result<AccessDescription> = element.decode();
        assert!(result.is_err());
    }

    #[test]
    fn test_hash_is_memoized_and_consistent() {
        let location = GeneralName::Uri("http://ocsp.example.com".to_string());
        let a = AccessDescription::new(oid(AccessDescription::OCSP), location.clone());
        let b = AccessDescription::new(oid(AccessDescription::OCSP), location);
        assert_eq!(a.hash_value(), b.hash_value());
        assert_eq!(a.hash.get(), Some(&a.hash_value()));

        let set: HashSet<_> = [a.clone(), b, a].into_iter().collect();
        assert_eq!(set.len(), 1);
    }
}
