//! Certificate policy identifiers and policy mappings
//!
//! RFC 5280 Section 4.2.1.4 and 4.2.1.5
//!
//! ```asn1
//! CertPolicyId ::= OBJECT IDENTIFIER
//!
//! PolicyMappings ::= SEQUENCE SIZE (1..MAX) OF SEQUENCE {
//!      issuerDomainPolicy      CertPolicyId,
//!      subjectDomainPolicy     CertPolicyId }
//! ```

use std::fmt;
use std::str::FromStr;

use asn1::{Element, ObjectIdentifier};
use codec::decoder::{DecodableFrom, Decoder};
use codec::encoder::{EncodableTo, Encoder};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Kind, Result};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CertificatePolicyId {
    id: ObjectIdentifier,
}

impl CertificatePolicyId {
    /// anyPolicy
    pub const ANY_POLICY: &'static str = "2.5.29.32.0";

    pub fn new(id: ObjectIdentifier) -> Self {
        Self { id }
    }

    pub fn identifier(&self) -> &ObjectIdentifier {
        &self.id
    }
}

impl From<ObjectIdentifier> for CertificatePolicyId {
    fn from(id: ObjectIdentifier) -> Self {
        Self::new(id)
    }
}

impl FromStr for CertificatePolicyId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Self::new(ObjectIdentifier::from_str(s)?))
    }
}

impl fmt::Display for CertificatePolicyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl DecodableFrom<Element> for CertificatePolicyId {}

impl Decoder<Element, CertificatePolicyId> for Element {
    type Error = Error;

    fn decode(&self) -> Result<CertificatePolicyId> {
        match self {
            Element::ObjectIdentifier(oid) => Ok(CertificatePolicyId::new(oid.clone())),
            _ => Err(Error::ExpectedOid(Kind::CertificatePolicyMap)),
        }
    }
}

impl EncodableTo<CertificatePolicyId> for Element {}

impl Encoder<CertificatePolicyId, Element> for CertificatePolicyId {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(Element::ObjectIdentifier(self.id.clone()))
    }
}

/// One entry of the policyMappings extension: the issuing CA treats
/// `issuer_domain_policy` as equivalent to the subject CA's
/// `subject_domain_policy`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CertificatePolicyMap {
    issuer_domain_policy: CertificatePolicyId,
    subject_domain_policy: CertificatePolicyId,
}

impl CertificatePolicyMap {
    pub fn new(
        issuer_domain_policy: CertificatePolicyId,
        subject_domain_policy: CertificatePolicyId,
    ) -> Self {
        Self {
            issuer_domain_policy,
            subject_domain_policy,
        }
    }

    pub fn issuer_domain_policy(&self) -> &CertificatePolicyId {
        &self.issuer_domain_policy
    }

    pub fn subject_domain_policy(&self) -> &CertificatePolicyId {
        &self.subject_domain_policy
    }
}

impl fmt::Display for CertificatePolicyMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IssuerDomain:{} SubjectDomain:{}",
            self.issuer_domain_policy, self.subject_domain_policy
        )
    }
}

impl DecodableFrom<Element> for CertificatePolicyMap {}

impl Decoder<Element, CertificatePolicyMap> for Element {
    type Error = Error;

    fn decode(&self) -> Result<CertificatePolicyMap> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence(Kind::CertificatePolicyMap));
        };
        let [issuer, subject] = elements.as_slice() else {
            return Err(Error::InvalidElementCount {
                kind: Kind::CertificatePolicyMap,
                expected: "2",
                actual: elements.len(),
            });
        };

        Ok(CertificatePolicyMap {
            issuer_domain_policy: issuer.decode()?,
            subject_domain_policy: subject.decode()?,
        })
    }
}

impl EncodableTo<CertificatePolicyMap> for Element {}

impl Encoder<CertificatePolicyMap, Element> for CertificatePolicyMap {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(Element::Sequence(vec![
            self.issuer_domain_policy.encode()?,
            self.subject_domain_policy.encode()?,
        ]))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use hex_literal::hex;
    use rstest::rstest;

    use super::*;

    fn policy(s: &str) -> CertificatePolicyId {
        CertificatePolicyId::from_str(s).unwrap()
    }

    #[test]
    fn test_policy_map_bytes() {
        // SEQUENCE { 1.2.3, 1.2.4 }
        let der = hex!("30 08 06 02 2a 03 06 02 2a 04");
        let decoded: CertificatePolicyMap = Element::from_der(&der).unwrap().decode().unwrap();
        assert_eq!(decoded.issuer_domain_policy(), &policy("1.2.3"));
        assert_eq!(decoded.subject_domain_policy(), &policy("1.2.4"));
        assert_eq!(decoded.encode().unwrap().to_der().unwrap(), der);
        assert_eq!(decoded.to_string(), "IssuerDomain:1.2.3 SubjectDomain:1.2.4");
    }

    #[rstest]
    #[case(policy("2.16.840.1.101.3.2.1.48.1"), policy("2.16.840.1.101.3.2.1.48.2"))]
    #[case(policy(CertificatePolicyId::ANY_POLICY), policy("1.3.6.1.4.1.11129.2.5.1"))]
    fn test_policy_map_roundtrip(
        #[case] issuer: CertificatePolicyId,
        #[case] subject: CertificatePolicyId,
    ) {
        let map = CertificatePolicyMap::new(issuer, subject);
        let decoded: CertificatePolicyMap = map.encode().unwrap().decode().unwrap();
        assert_eq!(decoded, map);
    }

    #[rstest]
    // SET instead of SEQUENCE
    #[case(hex!("31 08 06 02 2a 03 06 02 2a 04").to_vec())]
    // one policy
    #[case(hex!("30 04 06 02 2a 03").to_vec())]
    // subject is not an OID
    #[case(hex!("30 07 06 02 2a 03 02 01 01").to_vec())]
    // three policies
    #[case(hex!("30 0c 06 02 2a 03 06 02 2a 04 06 02 2a 05").to_vec())]
    fn test_policy_map_decode_rejects(#[case] der: Vec<u8>) {
        let element = Element::from_der(&der).unwrap();
        let result: Result<CertificatePolicyMap> = element.decode();
        assert!(result.is_err());
    }

    #[test]
    fn test_policy_id_equality_follows_oid() {
        let set: HashSet<_> = [policy("1.2.3"), policy("1.2.3"), policy("1.2.4")]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
        assert_eq!(
            serde_json::to_string(&policy("1.2.3")).unwrap(),
            "\"1.2.3\""
        );
    }
}
