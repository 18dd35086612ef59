//! DistributionPoint and its name
//!
//! RFC 5280 Section 4.2.1.13
//!
//! ```asn1
//! DistributionPoint ::= SEQUENCE {
//!     distributionPoint       [0]     DistributionPointName OPTIONAL,
//!     reasons                 [1]     ReasonFlags OPTIONAL,
//!     cRLIssuer               [2]     GeneralNames OPTIONAL }
//!
//! DistributionPointName ::= CHOICE {
//!     fullName                [0]     GeneralNames,
//!     nameRelativeToCRLIssuer [1]     RelativeDistinguishedName }
//!
//! ReasonFlags ::= BIT STRING {
//!     unused                  (0),
//!     keyCompromise           (1),
//!     cACompromise            (2),
//!     affiliationChanged      (3),
//!     superseded              (4),
//!     cessationOfOperation    (5),
//!     certificateHold         (6),
//!     privilegeWithdrawn      (7),
//!     aACompromise            (8) }
//! ```

use std::fmt;

use asn1::{BitString, Element};
use codec::decoder::{DecodableFrom, Decoder};
use codec::encoder::{EncodableTo, Encoder};
use der::PrimitiveTag;
use pkix_types::RelativeDistinguishedName;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Kind, Result};
use crate::general_names::GeneralNames;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
enum PointName {
    FullName(GeneralNames),
    RelativeName(RelativeDistinguishedName),
}

/// Exactly one of a full name or a name relative to the CRL issuer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DistributionPointName {
    name: PointName,
}

impl DistributionPointName {
    /// Fails when `names` is empty.
    pub fn full_name(names: GeneralNames) -> Result<Self> {
        if names.is_empty() {
            return Err(Error::EmptyAlternative(Kind::DistributionPointName));
        }
        Ok(Self {
            name: PointName::FullName(names),
        })
    }

    pub fn relative_name(name: RelativeDistinguishedName) -> Self {
        Self {
            name: PointName::RelativeName(name),
        }
    }

    pub fn as_full_name(&self) -> Option<&GeneralNames> {
        match &self.name {
            PointName::FullName(names) => Some(names),
            PointName::RelativeName(_) => None,
        }
    }

    pub fn as_relative_name(&self) -> Option<&RelativeDistinguishedName> {
        match &self.name {
            PointName::FullName(_) => None,
            PointName::RelativeName(name) => Some(name),
        }
    }
}

impl fmt::Display for DistributionPointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            PointName::FullName(names) => write!(f, "Full Name: {}", names),
            PointName::RelativeName(name) => write!(f, "Relative Name: {}", name),
        }
    }
}

impl DecodableFrom<Element> for DistributionPointName {}

impl Decoder<Element, DistributionPointName> for Element {
    type Error = Error;

    fn decode(&self) -> Result<DistributionPointName> {
        let Element::ContextSpecific {
            slot, constructed, ..
        } = self
        else {
            return Err(Error::ExpectedContextSpecific(Kind::DistributionPointName));
        };

        match (*slot, *constructed) {
            (0, true) => {
                let names: GeneralNames = self.untag(PrimitiveTag::Sequence)?.decode()?;
                DistributionPointName::full_name(names)
            }
            (1, true) => {
                let name: RelativeDistinguishedName = self.untag(PrimitiveTag::Set)?.decode()?;
                Ok(DistributionPointName::relative_name(name))
            }
            (0 | 1, false) => Err(Error::ExpectedConstructedContextTag {
                kind: Kind::DistributionPointName,
                slot: *slot,
            }),
            (slot, _) => Err(Error::UnexpectedContextTag {
                kind: Kind::DistributionPointName,
                slot,
            }),
        }
    }
}

impl EncodableTo<DistributionPointName> for Element {}

impl Encoder<DistributionPointName, Element> for DistributionPointName {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        match &self.name {
            PointName::FullName(names) => {
                let names: Option<Element> = names.encode()?;
                let names = names.ok_or(Error::EmptyAlternative(Kind::DistributionPointName))?;
                Ok(Element::implicit(0, &names)?)
            }
            PointName::RelativeName(name) => Ok(Element::implicit(1, &name.encode()?)?),
        }
    }
}

/// Revocation reasons covered by a distribution point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReasonFlags {
    pub key_compromise: bool,
    pub ca_compromise: bool,
    pub affiliation_changed: bool,
    pub superseded: bool,
    pub cessation_of_operation: bool,
    pub certificate_hold: bool,
    pub privilege_withdrawn: bool,
    pub aa_compromise: bool,
}

impl ReasonFlags {
    /// Flags in bit order; bit 0 is `unused`.
    fn bits(&self) -> [bool; 9] {
        [
            false,
            self.key_compromise,
            self.ca_compromise,
            self.affiliation_changed,
            self.superseded,
            self.cessation_of_operation,
            self.certificate_hold,
            self.privilege_withdrawn,
            self.aa_compromise,
        ]
    }

    pub fn is_empty(&self) -> bool {
        !self.bits().contains(&true)
    }
}

impl From<&BitString> for ReasonFlags {
    fn from(bit_string: &BitString) -> Self {
        let bytes = bit_string.as_bytes();
        let bit_len = bit_string.bit_len();

        // bit 0 is the most significant bit of the first octet
        let is_set = |bit: usize| {
            bit < bit_len
                && bytes
                    .get(bit / 8)
                    .is_some_and(|byte| byte & (0x80 >> (bit % 8)) != 0)
        };

        Self {
            key_compromise: is_set(1),
            ca_compromise: is_set(2),
            affiliation_changed: is_set(3),
            superseded: is_set(4),
            cessation_of_operation: is_set(5),
            certificate_hold: is_set(6),
            privilege_withdrawn: is_set(7),
            aa_compromise: is_set(8),
        }
    }
}

impl fmt::Display for ReasonFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [&str; 9] = [
            "Unused",
            "Key Compromise",
            "CA Compromise",
            "Affiliation Changed",
            "Superseded",
            "Cessation Of Operation",
            "Certificate Hold",
            "Privilege Withdrawn",
            "AA Compromise",
        ];
        let names = self
            .bits()
            .iter()
            .zip(NAMES)
            .filter(|(set, _)| **set)
            .map(|(_, name)| name)
            .collect::<Vec<_>>();
        write!(f, "{}", names.join(", "))
    }
}

impl DecodableFrom<Element> for ReasonFlags {}

impl Decoder<Element, ReasonFlags> for Element {
    type Error = Error;

    fn decode(&self) -> Result<ReasonFlags> {
        match self {
            Element::BitString(bits) => Ok(ReasonFlags::from(bits)),
            _ => Err(Error::ExpectedBitString(Kind::ReasonFlags)),
        }
    }
}

impl EncodableTo<ReasonFlags> for Element {}

impl Encoder<ReasonFlags, Element> for ReasonFlags {
    type Error = Error;

    /// DER drops trailing zero bits of a named bit list.
    fn encode(&self) -> Result<Element> {
        let bits = self.bits();
        let Some(last_set) = bits.iter().rposition(|set| *set) else {
            return Ok(Element::BitString(BitString::new(0, vec![])));
        };

        let bit_len = last_set + 1;
        let mut bytes = vec![0u8; bit_len.div_ceil(8)];
        for (bit, _) in bits.iter().enumerate().filter(|(_, set)| **set) {
            if let Some(byte) = bytes.get_mut(bit / 8) {
                *byte |= 0x80 >> (bit % 8);
            }
        }
        let unused = u8::try_from(bytes.len() * 8 - bit_len).map_err(|_| Error::ValueOutOfRange {
            kind: Kind::ReasonFlags,
            field: "unused bits",
        })?;

        Ok(Element::BitString(BitString::new(unused, bytes)))
    }
}

/// One entry of a cRLDistributionPoints or freshestCRL extension.
///
/// A point carries a name, an issuer, or both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DistributionPoint {
    distribution_point: Option<DistributionPointName>,
    reasons: Option<ReasonFlags>,
    crl_issuer: Option<GeneralNames>,
}

impl DistributionPoint {
    pub fn new(
        distribution_point: Option<DistributionPointName>,
        reasons: Option<ReasonFlags>,
        crl_issuer: Option<GeneralNames>,
    ) -> Result<Self> {
        let crl_issuer = crl_issuer.filter(|names| !names.is_empty());
        if distribution_point.is_none() && crl_issuer.is_none() {
            return Err(Error::EmptyAlternative(Kind::DistributionPoint));
        }
        Ok(Self {
            distribution_point,
            reasons,
            crl_issuer,
        })
    }

    pub fn distribution_point(&self) -> Option<&DistributionPointName> {
        self.distribution_point.as_ref()
    }

    pub fn reasons(&self) -> Option<&ReasonFlags> {
        self.reasons.as_ref()
    }

    pub fn crl_issuer(&self) -> Option<&GeneralNames> {
        self.crl_issuer.as_ref()
    }
}

impl DecodableFrom<Element> for DistributionPoint {}

impl Decoder<Element, DistributionPoint> for Element {
    type Error = Error;

    fn decode(&self) -> Result<DistributionPoint> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence(Kind::DistributionPoint));
        };

        let mut distribution_point: Option<DistributionPointName> = None;
        let mut reasons: Option<ReasonFlags> = None;
        let mut crl_issuer: Option<GeneralNames> = None;
        let mut last_slot: Option<u8> = None;

        for elem in elements {
            let Element::ContextSpecific { slot, .. } = elem else {
                return Err(Error::ExpectedContextSpecific(Kind::DistributionPoint));
            };
            // fields are ordered and appear at most once
            if last_slot.is_some_and(|last| *slot <= last) {
                return Err(Error::UnexpectedContextTag {
                    kind: Kind::DistributionPoint,
                    slot: *slot,
                });
            }
            last_slot = Some(*slot);

            match slot {
                0 => {
                    let name = elem.explicit_inner().ok_or(Error::InvalidExplicitTag {
                        kind: Kind::DistributionPoint,
                        slot: 0,
                    })?;
                    distribution_point = Some(name.decode()?);
                }
                1 => reasons = Some(elem.untag(PrimitiveTag::BitString)?.decode()?),
                2 => crl_issuer = Some(elem.untag(PrimitiveTag::Sequence)?.decode()?),
                _ => {
                    return Err(Error::UnexpectedContextTag {
                        kind: Kind::DistributionPoint,
                        slot: *slot,
                    });
                }
            }
        }

        DistributionPoint::new(distribution_point, reasons, crl_issuer)
    }
}

impl EncodableTo<DistributionPoint> for Element {}

impl Encoder<DistributionPoint, Element> for DistributionPoint {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let mut elements = Vec::new();

        if let Some(name) = &self.distribution_point {
            elements.push(Element::explicit(0, name.encode()?));
        }
        if let Some(reasons) = &self.reasons {
            elements.push(Element::implicit(1, &reasons.encode()?)?);
        }
        if let Some(issuer) = &self.crl_issuer {
            let issuer: Option<Element> = issuer.encode()?;
            if let Some(issuer) = issuer {
                elements.push(Element::implicit(2, &issuer)?);
            }
        }

        Ok(Element::Sequence(elements))
    }
}
