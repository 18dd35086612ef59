//! CRLReason CRL entry extension
//!
//! RFC 5280 Section 5.3.1
//!
//! ```asn1
//! id-ce-cRLReasons OBJECT IDENTIFIER ::= { id-ce 21 }
//!
//! CRLReason ::= ENUMERATED {
//!      unspecified             (0),
//!      keyCompromise           (1),
//!      cACompromise            (2),
//!      affiliationChanged      (3),
//!      superseded              (4),
//!      cessationOfOperation    (5),
//!      certificateHold         (6),
//!           -- value 7 is not used
//!      removeFromCRL           (8),
//!      privilegeWithdrawn      (9),
//!      aACompromise           (10) }
//! ```
//!
//! `unspecified` is written as an extension without a value, and an empty
//! value reads back as `unspecified`. Codes outside the enumeration also read
//! back as `unspecified`.

use std::fmt;

use asn1::{Element, Integer, OctetString};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::attribute::{
    AttrValue, AttributeName, CertAttrSet, Extension, ValueCache, element_to_der, type_error,
    value_element,
};
use crate::error::{Error, Kind, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CrlReason {
    #[default]
    Unspecified = 0,
    KeyCompromise = 1,
    CaCompromise = 2,
    AffiliationChanged = 3,
    Superseded = 4,
    CessationOfOperation = 5,
    CertificateHold = 6,
    RemoveFromCrl = 8,
    PrivilegeWithdrawn = 9,
    AaCompromise = 10,
}

impl CrlReason {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// `None` for 7 and anything outside 0..=10.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Unspecified),
            1 => Some(Self::KeyCompromise),
            2 => Some(Self::CaCompromise),
            3 => Some(Self::AffiliationChanged),
            4 => Some(Self::Superseded),
            5 => Some(Self::CessationOfOperation),
            6 => Some(Self::CertificateHold),
            8 => Some(Self::RemoveFromCrl),
            9 => Some(Self::PrivilegeWithdrawn),
            10 => Some(Self::AaCompromise),
            _ => None,
        }
    }
}

impl fmt::Display for CrlReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unspecified => "Unspecified",
            Self::KeyCompromise => "Key Compromise",
            Self::CaCompromise => "CA Compromise",
            Self::AffiliationChanged => "Affiliation Changed",
            Self::Superseded => "Superseded",
            Self::CessationOfOperation => "Cessation Of Operation",
            Self::CertificateHold => "Certificate Hold",
            Self::RemoveFromCrl => "Remove From CRL",
            Self::PrivilegeWithdrawn => "Privilege Withdrawn",
            Self::AaCompromise => "AA Compromise",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrlReasonCodeAttribute {
    Reason,
}

impl AttributeName for CrlReasonCodeAttribute {
    const ALL: &'static [Self] = &[Self::Reason];

    fn as_str(self) -> &'static str {
        match self {
            Self::Reason => "reason",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CrlReasonCodeExtension {
    critical: bool,
    reason: CrlReason,
    cache: ValueCache,
}

impl CrlReasonCodeExtension {
    pub fn new(reason: CrlReason) -> Self {
        Self {
            critical: false,
            reason,
            cache: ValueCache::default(),
        }
    }

    pub fn reason(&self) -> CrlReason {
        self.reason
    }
}

fn encode_reason(reason: CrlReason) -> Result<Option<Vec<u8>>> {
    if reason == CrlReason::Unspecified {
        return Ok(None);
    }
    let element = Element::Enumerated(Integer::from(u32::from(reason.code())));
    element_to_der(&element).map(Some)
}

impl Extension for CrlReasonCodeExtension {
    const OID: &'static str = "2.5.29.21";

    fn parse(critical: bool, value: &OctetString) -> Result<Self> {
        if value.as_bytes().is_empty() {
            return Ok(Self {
                critical,
                ..Self::new(CrlReason::Unspecified)
            });
        }

        let Element::Enumerated(code) = value_element(Kind::CrlReasonCode, value)? else {
            return Err(Error::ExpectedEnumerated(Kind::CrlReasonCode));
        };
        let reason = code
            .to_i64()
            .and_then(CrlReason::from_code)
            .unwrap_or_else(|| {
                debug!("CRLReason: code {code} outside the enumeration, using unspecified");
                CrlReason::Unspecified
            });

        Ok(Self {
            critical,
            ..Self::new(reason)
        })
    }

    fn is_critical(&self) -> bool {
        self.critical
    }

    fn value(&self) -> Result<Vec<u8>> {
        self.cache.get_or_encode(|| encode_reason(self.reason))
    }
}

impl CertAttrSet for CrlReasonCodeExtension {
    type Attribute = CrlReasonCodeAttribute;

    const KIND: Kind = Kind::CrlReasonCode;
    const NAME: &'static str = "CRLReasonCode";

    fn get_attribute(&self, attr: Self::Attribute) -> Option<AttrValue> {
        match attr {
            CrlReasonCodeAttribute::Reason => Some(AttrValue::Reason(self.reason)),
        }
    }

    fn set_attribute(&mut self, attr: Self::Attribute, value: AttrValue) -> Result<()> {
        let AttrValue::Reason(reason) = value else {
            return Err(type_error(Self::KIND, attr.as_str(), "CrlReason"));
        };
        self.reason = reason;
        self.cache.refresh(|| encode_reason(reason))
    }

    fn delete_attribute(&mut self, attr: Self::Attribute) -> Result<()> {
        match attr {
            CrlReasonCodeAttribute::Reason => self.reason = CrlReason::Unspecified,
        }
        self.cache.refresh(|| Ok(None))
    }
}

impl fmt::Display for CrlReasonCodeExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "X509v3 CRL Reason Code:")?;
        writeln!(f, "    {}", self.reason)
    }
}
