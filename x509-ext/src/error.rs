use thiserror::Error;

use crate::general_name::NameKind;

/// Context for where an error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    GeneralName,
    GeneralNames,
    GeneralSubtree,
    NameConstraints,
    DistributionPointName,
    DistributionPoint,
    ReasonFlags,
    CertificatePolicyMap,
    AccessDescription,
    Extension,
    SubjectKeyIdentifier,
    CertificateIssuer,
    CrlReasonCode,
    CrlNumber,
    DeltaCrlIndicator,
    CertificateAlgorithmId,
    CertificateSerialNumber,
    CertificateX509Key,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GeneralName => write!(f, "GeneralName"),
            Self::GeneralNames => write!(f, "GeneralNames"),
            Self::GeneralSubtree => write!(f, "GeneralSubtree"),
            Self::NameConstraints => write!(f, "NameConstraints"),
            Self::DistributionPointName => write!(f, "DistributionPointName"),
            Self::DistributionPoint => write!(f, "DistributionPoint"),
            Self::ReasonFlags => write!(f, "ReasonFlags"),
            Self::CertificatePolicyMap => write!(f, "CertificatePolicyMap"),
            Self::AccessDescription => write!(f, "AccessDescription"),
            Self::Extension => write!(f, "Extension"),
            Self::SubjectKeyIdentifier => write!(f, "SubjectKeyIdentifier"),
            Self::CertificateIssuer => write!(f, "CertificateIssuer"),
            Self::CrlReasonCode => write!(f, "CRLReasonCode"),
            Self::CrlNumber => write!(f, "CRLNumber"),
            Self::DeltaCrlIndicator => write!(f, "DeltaCRLIndicator"),
            Self::CertificateAlgorithmId => write!(f, "CertificateAlgorithmId"),
            Self::CertificateSerialNumber => write!(f, "CertificateSerialNumber"),
            Self::CertificateX509Key => write!(f, "CertificateX509Key"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    // Common structural errors
    #[error("{0}: empty sequence")]
    EmptySequence(Kind),

    #[error("{0}: expected SEQUENCE")]
    ExpectedSequence(Kind),

    #[error("{0}: expected OCTET STRING")]
    ExpectedOctetString(Kind),

    #[error("{0}: expected BIT STRING")]
    ExpectedBitString(Kind),

    #[error("{0}: expected INTEGER")]
    ExpectedInteger(Kind),

    #[error("{0}: expected ENUMERATED")]
    ExpectedEnumerated(Kind),

    #[error("{0}: expected OBJECT IDENTIFIER")]
    ExpectedOid(Kind),

    #[error("{0}: expected a context-specific element")]
    ExpectedContextSpecific(Kind),

    #[error("{kind}: unexpected context-specific tag [{slot}]")]
    UnexpectedContextTag { kind: Kind, slot: u8 },

    #[error("{kind}: context-specific tag [{slot}] must be primitive")]
    ExpectedPrimitiveContextTag { kind: Kind, slot: u8 },

    #[error("{kind}: context-specific tag [{slot}] must be constructed")]
    ExpectedConstructedContextTag { kind: Kind, slot: u8 },

    #[error("{kind}: expected {expected} elements, got {actual}")]
    InvalidElementCount {
        kind: Kind,
        expected: &'static str,
        actual: usize,
    },

    #[error("{kind}: {field} out of range")]
    ValueOutOfRange { kind: Kind, field: &'static str },

    #[error("{kind}: [{slot}] EXPLICIT must wrap exactly one value")]
    InvalidExplicitTag { kind: Kind, slot: u8 },

    // GeneralName specific errors
    #[error("GeneralName: unknown context-specific tag [{0}]")]
    UnknownGeneralNameTag(u8),

    #[error("GeneralName: {0} must be an IA5String")]
    InvalidIa5String(NameKind),

    #[error("GeneralName: invalid dNSName {0:?}")]
    InvalidDnsName(String),

    #[error("GeneralName: invalid rfc822Name {0:?}")]
    InvalidRfc822Name(String),

    #[error("GeneralName: invalid uniformResourceIdentifier {0:?}")]
    InvalidUri(String),

    #[error("GeneralName: iPAddress must be {expected} bytes, got {actual}")]
    InvalidIpAddressLength {
        expected: &'static str,
        actual: usize,
    },

    #[error("GeneralName: non-contiguous netmask in iPAddress {0}")]
    InvalidNetmask(String),

    #[error("GeneralName: otherName value must be [0] EXPLICIT")]
    OtherNameExpectedExplicitTag,

    #[error("GeneralName: ediPartyName missing required partyName [1]")]
    EdiPartyNameMissingPartyName,

    // NameConstraints specific errors
    #[error(
        "NameConstraints: at least one of permittedSubtrees or excludedSubtrees must be present"
    )]
    NameConstraintsEmptyContent,

    // Name constraint algebra
    #[error("{operation} is not supported for {kind}")]
    UnsupportedOperation {
        kind: NameKind,
        operation: &'static str,
    },

    // Construction invariants
    #[error("{0}: alternative must not be empty")]
    EmptyAlternative(Kind),

    // Attribute framework
    #[error("{set}: unknown attribute {attribute:?}")]
    UnknownAttribute { set: Kind, attribute: String },

    #[error("{set}: attribute {attribute:?} expects a {expected} value")]
    AttributeType {
        set: Kind,
        attribute: &'static str,
        expected: &'static str,
    },

    #[error("{0}: value is not set")]
    MissingValue(Kind),

    #[error("OID mismatch: expected {expected}, got {actual}")]
    OidMismatch { expected: String, actual: String },

    /// Invalid ASN.1 structure
    #[error("invalid ASN.1: {0}")]
    InvalidAsn1(#[from] asn1::error::Error),

    #[error("PKIX types error: {0}")]
    PkixTypes(#[from] pkix_types::Error),
}

/// Result type for extension operations
pub type Result<T> = std::result::Result<T, Error>;
