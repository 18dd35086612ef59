//! GeneralSubtree and NameConstraints
//!
//! RFC 5280 Section 4.2.1.10
//!
//! ```asn1
//! NameConstraints ::= SEQUENCE {
//!     permittedSubtrees       [0]     GeneralSubtrees OPTIONAL,
//!     excludedSubtrees        [1]     GeneralSubtrees OPTIONAL
//! }
//!
//! GeneralSubtrees ::= SEQUENCE SIZE (1..MAX) OF GeneralSubtree
//!
//! GeneralSubtree ::= SEQUENCE {
//!     base                    GeneralName,
//!     minimum         [0]     BaseDistance DEFAULT 0,
//!     maximum         [1]     BaseDistance OPTIONAL
//! }
//!
//! BaseDistance ::= INTEGER (0..MAX)
//! ```

use std::fmt;

use asn1::{ASN1Object, Element, Integer, OctetString};
use codec::decoder::{DecodableFrom, Decoder};
use codec::encoder::{EncodableTo, Encoder};
use der::PrimitiveTag;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Kind, Result};
use crate::general_name::{GeneralName, NameContext};

/// A name space rooted at `base`, optionally bounded in depth.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeneralSubtree {
    base: GeneralName,
    minimum: u32,
    maximum: Option<u32>,
}

impl GeneralSubtree {
    /// Value reported by [`GeneralSubtree::maximum_or_unbounded`] when no
    /// maximum is set.
    pub const UNBOUNDED: i64 = -1;

    /// A subtree with the default bounds (minimum 0, no maximum).
    pub fn new(base: GeneralName) -> Self {
        Self {
            base,
            minimum: 0,
            maximum: None,
        }
    }

    pub fn with_bounds(base: GeneralName, minimum: u32, maximum: Option<u32>) -> Self {
        Self {
            base,
            minimum,
            maximum,
        }
    }

    pub fn base(&self) -> &GeneralName {
        &self.base
    }

    pub fn minimum(&self) -> u32 {
        self.minimum
    }

    pub fn maximum(&self) -> Option<u32> {
        self.maximum
    }

    pub fn maximum_or_unbounded(&self) -> i64 {
        self.maximum.map_or(Self::UNBOUNDED, i64::from)
    }
}

impl fmt::Display for GeneralSubtree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        match (self.minimum, self.maximum) {
            (0, None) => Ok(()),
            (min, None) => write!(f, " (minimum {})", min),
            (min, Some(max)) => write!(f, " (minimum {}, maximum {})", min, max),
        }
    }
}

/// Reads a `[slot] IMPLICIT BaseDistance`.
fn decode_base_distance(element: &Element, slot: u8) -> Result<u32> {
    let Element::ContextSpecific {
        constructed: false,
        ..
    } = element
    else {
        return Err(Error::ExpectedPrimitiveContextTag {
            kind: Kind::GeneralSubtree,
            slot,
        });
    };
    let Element::Integer(value) = element.untag(PrimitiveTag::Integer)? else {
        return Err(Error::ExpectedInteger(Kind::GeneralSubtree));
    };
    value.to_u32().ok_or(Error::ValueOutOfRange {
        kind: Kind::GeneralSubtree,
        field: if slot == 0 { "minimum" } else { "maximum" },
    })
}

impl DecodableFrom<Element> for GeneralSubtree {}

impl Decoder<Element, GeneralSubtree> for Element {
    type Error = Error;

    fn decode(&self) -> Result<GeneralSubtree> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence(Kind::GeneralSubtree));
        };
        let [base, rest @ ..] = elements.as_slice() else {
            return Err(Error::EmptySequence(Kind::GeneralSubtree));
        };

        let base = GeneralName::decode_in(base, NameContext::Subtree)?;

        // minimum [0] then maximum [1], each at most once
        let (minimum, maximum) =
            rest.iter()
                .try_fold((None, None), |(min, max), elem| match elem {
                    Element::ContextSpecific { slot: 0, .. } if min.is_none() && max.is_none() => {
                        Ok((Some(decode_base_distance(elem, 0)?), max))
                    }
                    Element::ContextSpecific { slot: 1, .. } if max.is_none() => {
                        Ok((min, Some(decode_base_distance(elem, 1)?)))
                    }
                    Element::ContextSpecific { slot, .. } => Err(Error::UnexpectedContextTag {
                        kind: Kind::GeneralSubtree,
                        slot: *slot,
                    }),
                    _ => Err(Error::ExpectedContextSpecific(Kind::GeneralSubtree)),
                })?;

        Ok(GeneralSubtree {
            base,
            minimum: minimum.unwrap_or(0),
            maximum,
        })
    }
}

impl EncodableTo<GeneralSubtree> for Element {}

impl Encoder<GeneralSubtree, Element> for GeneralSubtree {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let minimum = (self.minimum != 0)
            .then(|| Element::implicit(0, &Element::Integer(Integer::from(self.minimum))))
            .transpose()?;
        let maximum = self
            .maximum
            .map(|max| Element::implicit(1, &Element::Integer(Integer::from(max))))
            .transpose()?;

        let elements = std::iter::once(self.base.encode()?)
            .chain(minimum)
            .chain(maximum)
            .collect();
        Ok(Element::Sequence(elements))
    }
}

/// A non-empty list of subtrees once decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeneralSubtrees {
    subtrees: Vec<GeneralSubtree>,
}

impl GeneralSubtrees {
    pub fn new(subtrees: Vec<GeneralSubtree>) -> Self {
        Self { subtrees }
    }

    pub fn subtrees(&self) -> &[GeneralSubtree] {
        &self.subtrees
    }

    pub fn is_empty(&self) -> bool {
        self.subtrees.is_empty()
    }

    pub fn len(&self) -> usize {
        self.subtrees.len()
    }
}

impl From<Vec<GeneralSubtree>> for GeneralSubtrees {
    fn from(subtrees: Vec<GeneralSubtree>) -> Self {
        Self::new(subtrees)
    }
}

impl DecodableFrom<Element> for GeneralSubtrees {}

impl Decoder<Element, GeneralSubtrees> for Element {
    type Error = Error;

    fn decode(&self) -> Result<GeneralSubtrees> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence(Kind::NameConstraints));
        };
        if elements.is_empty() {
            return Err(Error::EmptySequence(Kind::NameConstraints));
        }
        let subtrees = elements
            .iter()
            .map(|elem| elem.decode())
            .collect::<Result<Vec<GeneralSubtree>>>()?;
        Ok(GeneralSubtrees { subtrees })
    }
}

impl EncodableTo<GeneralSubtrees> for Element {}

impl Encoder<GeneralSubtrees, Element> for GeneralSubtrees {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        if self.subtrees.is_empty() {
            return Err(Error::EmptySequence(Kind::NameConstraints));
        }
        let elements = self
            .subtrees
            .iter()
            .map(|subtree| subtree.encode())
            .collect::<Result<Vec<_>>>()?;
        Ok(Element::Sequence(elements))
    }
}

/// NameConstraints extension content (2.5.29.30)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NameConstraints {
    permitted_subtrees: Option<GeneralSubtrees>,
    excluded_subtrees: Option<GeneralSubtrees>,
}

impl NameConstraints {
    /// At least one non-empty list is required.
    pub fn new(
        permitted_subtrees: Option<GeneralSubtrees>,
        excluded_subtrees: Option<GeneralSubtrees>,
    ) -> Result<Self> {
        let permitted_subtrees = permitted_subtrees.filter(|s| !s.is_empty());
        let excluded_subtrees = excluded_subtrees.filter(|s| !s.is_empty());
        if permitted_subtrees.is_none() && excluded_subtrees.is_none() {
            return Err(Error::NameConstraintsEmptyContent);
        }
        Ok(Self {
            permitted_subtrees,
            excluded_subtrees,
        })
    }

    pub fn permitted_subtrees(&self) -> Option<&GeneralSubtrees> {
        self.permitted_subtrees.as_ref()
    }

    pub fn excluded_subtrees(&self) -> Option<&GeneralSubtrees> {
        self.excluded_subtrees.as_ref()
    }
}

impl DecodableFrom<OctetString> for NameConstraints {}

impl Decoder<OctetString, NameConstraints> for OctetString {
    type Error = Error;

    fn decode(&self) -> Result<NameConstraints> {
        let asn1_obj = ASN1Object::try_from(self)?;
        match asn1_obj.elements() {
            [elem] => elem.decode(),
            other => Err(Error::InvalidElementCount {
                kind: Kind::NameConstraints,
                expected: "1",
                actual: other.len(),
            }),
        }
    }
}

impl DecodableFrom<Element> for NameConstraints {}

impl Decoder<Element, NameConstraints> for Element {
    type Error = Error;

    fn decode(&self) -> Result<NameConstraints> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence(Kind::NameConstraints));
        };

        let (permitted, excluded) =
            elements
                .iter()
                .try_fold((None, None), |(permitted, excluded), elem| {
                    let Element::ContextSpecific {
                        slot, constructed, ..
                    } = elem
                    else {
                        return Err(Error::ExpectedContextSpecific(Kind::NameConstraints));
                    };
                    if !constructed {
                        return Err(Error::ExpectedConstructedContextTag {
                            kind: Kind::NameConstraints,
                            slot: *slot,
                        });
                    }
                    let subtrees = || -> Result<GeneralSubtrees> {
                        elem.untag(PrimitiveTag::Sequence)?.decode()
                    };
                    match (*slot, permitted.is_some(), excluded.is_some()) {
                        (0, false, false) => Ok((Some(subtrees()?), excluded)),
                        (1, _, false) => Ok((permitted, Some(subtrees()?))),
                        (slot, _, _) => Err(Error::UnexpectedContextTag {
                            kind: Kind::NameConstraints,
                            slot,
                        }),
                    }
                })?;

        NameConstraints::new(permitted, excluded)
    }
}

impl EncodableTo<NameConstraints> for Element {}

impl Encoder<NameConstraints, Element> for NameConstraints {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let permitted = self
            .permitted_subtrees
            .as_ref()
            .map(|subtrees| Ok::<_, Error>(Element::implicit(0, &subtrees.encode()?)?))
            .transpose()?;
        let excluded = self
            .excluded_subtrees
            .as_ref()
            .map(|subtrees| Ok::<_, Error>(Element::implicit(1, &subtrees.encode()?)?))
            .transpose()?;

        Ok(Element::Sequence(permitted.into_iter().chain(excluded).collect()))
    }
}

#[cfg(test)]
mod tests {
    use std::net::IpAddr;

    use hex_literal::hex;
    use ipnet::IpNet;
    use rstest::rstest;

    use super::*;
    use crate::general_name::IpAddressOrRange;

    fn dns(name: &str) -> GeneralName {
        GeneralName::DnsName(name.to_string())
    }

    #[rstest]
    #[case(GeneralSubtree::new(dns("example.com")))]
    #[case(GeneralSubtree::with_bounds(dns("example.com"), 5, Some(100)))]
    #[case(GeneralSubtree::with_bounds(dns("example.com"), 0, Some(3)))]
    #[case(GeneralSubtree::with_bounds(dns(".example.com"), 2, None))]
    #[case(GeneralSubtree::new(GeneralName::IpAddress(IpAddressOrRange::Network("10.0.0.0/8".parse::<IpNet>().unwrap()))))]
    fn test_general_subtree_roundtrip(#[case] subtree: GeneralSubtree) {
        let element = subtree.encode().unwrap();
        let decoded: GeneralSubtree = element.decode().unwrap();
        assert_eq!(decoded, subtree);
    }

    #[test]
    fn test_default_bounds_are_omitted() {
        let subtree = GeneralSubtree::new(dns("a.b"));
        let der = subtree.encode().unwrap().to_der().unwrap();
        assert_eq!(der, hex!("30 05 82 03 61 2e 62"));

        let decoded: GeneralSubtree = Element::from_der(&der).unwrap().decode().unwrap();
        assert_eq!(decoded.minimum(), 0);
        assert_eq!(decoded.maximum(), None);
        assert_eq!(decoded.maximum_or_unbounded(), GeneralSubtree::UNBOUNDED);
    }

    #[test]
    fn test_non_default_bounds_are_encoded() {
        let subtree = GeneralSubtree::with_bounds(dns("a.b"), 5, Some(100));
        let der = subtree.encode().unwrap().to_der().unwrap();
        assert_eq!(der, hex!("30 0b 82 03 61 2e 62 80 01 05 81 01 64"));
        assert_eq!(subtree.maximum_or_unbounded(), 100);
    }

    #[rstest]
    // minimum in constructed form
    #[case(hex!("30 0a 82 03 61 2e 62 a0 03 02 01 00").to_vec())]
    // unknown tag [2]
    #[case(hex!("30 08 82 03 61 2e 62 82 01 05").to_vec())]
    // maximum before minimum
    #[case(hex!("30 0b 82 03 61 2e 62 81 01 05 80 01 01").to_vec())]
    // negative minimum
    #[case(hex!("30 08 82 03 61 2e 62 80 01 ff").to_vec())]
    // base missing
    #[case(hex!("30 00").to_vec())]
    // base not a GeneralName
    #[case(hex!("30 03 02 01 00").to_vec())]
    fn test_general_subtree_decode_rejects(#[case] der: Vec<u8>) {
        let element = Element::from_der(&der).unwrap();
        let result: Result<GeneralSubtree> = element.decode();
        assert!(result.is_err());
    }

    #[test]
    fn test_constructed_bounds_are_rejected() {
        // SEQUENCE { dNSName "a.b", [0] { INTEGER 0 } }
        let der = hex!("30 0a 82 03 61 2e 62 a0 03 02 01 00");
        let result: Result<GeneralSubtree> = Element::from_der(&der).unwrap().decode();
        assert!(matches!(
            result,
            Err(Error::ExpectedPrimitiveContextTag {
                kind: Kind::GeneralSubtree,
                slot: 0,
            })
        ));
    }

    #[test]
    fn test_subtree_base_uses_subtree_context() {
        // iPAddress with a mask is only valid as a subtree base
        let der = hex!("30 0a 87 08 c0 a8 00 00 ff ff 00 00");
        let decoded: GeneralSubtree = Element::from_der(&der).unwrap().decode().unwrap();
        let GeneralName::IpAddress(IpAddressOrRange::Network(net)) = decoded.base() else {
            panic!("expected an IP network base");
        };
        assert_eq!(net.addr(), IpAddr::from([192, 168, 0, 0]));
        assert_eq!(net.prefix_len(), 16);
    }

    #[test]
    fn test_name_constraints_roundtrip() {
        let permitted = GeneralSubtrees::new(vec![
            GeneralSubtree::new(dns(".example.com")),
            GeneralSubtree::new(GeneralName::Uri(".example.com".to_string())),
        ]);
        let excluded = GeneralSubtrees::new(vec![GeneralSubtree::new(dns("bad.example.com"))]);
        let constraints = NameConstraints::new(Some(permitted), Some(excluded)).unwrap();

        let der = constraints.encode().unwrap().to_der().unwrap();
        let decoded: NameConstraints = OctetString::from(der).decode().unwrap();
        assert_eq!(decoded, constraints);
        assert_eq!(decoded.permitted_subtrees().map(|s| s.len()), Some(2));
    }

    #[test]
    fn test_name_constraints_requires_content() {
        assert!(matches!(
            NameConstraints::new(None, Some(GeneralSubtrees::default())),
            Err(Error::NameConstraintsEmptyContent)
        ));

        let element = Element::from_der(&hex!("30 00")).unwrap();
        let result: Result<NameConstraints> = element.decode();
        assert!(matches!(result, Err(Error::NameConstraintsEmptyContent)));
    }

    #[test]
    fn test_name_constraints_excluded_only() {
        // SEQUENCE { [1] { SEQUENCE { dNSName "a.b" } } }
        let der = hex!("30 09 a1 07 30 05 82 03 61 2e 62");
        let decoded: NameConstraints = Element::from_der(&der).unwrap().decode().unwrap();
        assert!(decoded.permitted_subtrees().is_none());
        assert_eq!(
            decoded.excluded_subtrees().unwrap().subtrees()[0].base(),
            &dns("a.b")
        );
        assert_eq!(decoded.encode().unwrap().to_der().unwrap(), der);
    }
}
