//! Error types for PKIX types

use thiserror::Error;

/// Result type for PKIX types operations
pub type Result<T> = std::result::Result<T, Error>;

/// PKIX types error types
#[derive(Debug, Error)]
pub enum Error {
    // DirectoryString errors
    #[error("DirectoryString: invalid UTF-8 in OctetString")]
    DirectoryStringInvalidUtf8,
    #[error("DirectoryString: expected string type")]
    DirectoryStringExpectedStringType,
    #[error("DirectoryString: {0:?} is not valid for PrintableString")]
    DirectoryStringNotPrintable(String),

    // Extension errors
    #[error("Extension: expected SEQUENCE")]
    ExtensionExpectedSequence,
    #[error("Extension: expected 2 or 3 elements, got {0}")]
    ExtensionInvalidElementCount(usize),
    #[error("Extension: expected OCTET STRING for extnValue")]
    ExtensionExpectedOctetString,
    #[error("Extension: expected BOOLEAN for critical or OCTET STRING for extnValue")]
    ExtensionInvalidCriticalOrValue,
    #[error("Extension: expected OBJECT IDENTIFIER for extnID")]
    ExtensionExpectedOidForExtnId,

    // Name errors
    #[error("Name: expected SEQUENCE")]
    NameExpectedSequence,

    // RelativeDistinguishedName errors
    #[error("RelativeDistinguishedName: expected SET")]
    RdnExpectedSet,
    #[error("RelativeDistinguishedName: must contain at least one attribute")]
    RdnEmpty,

    // AttributeTypeAndValue errors
    #[error("AttributeTypeAndValue: expected SEQUENCE")]
    AttributeTypeAndValueExpectedSequence,
    #[error("AttributeTypeAndValue: expected OBJECT IDENTIFIER for attribute type")]
    AttributeTypeAndValueExpectedOid,
    #[error("AttributeTypeAndValue: expected 2 elements")]
    AttributeTypeAndValueInvalidElementCount,

    // AlgorithmIdentifier errors
    #[error("AlgorithmIdentifier: expected SEQUENCE")]
    AlgorithmIdentifierExpectedSequence,
    #[error("AlgorithmIdentifier: expected 1 or 2 elements, got {0}")]
    AlgorithmIdentifierInvalidElementCount(usize),
    #[error("AlgorithmIdentifier: expected OBJECT IDENTIFIER for algorithm")]
    AlgorithmIdentifierExpectedOid,

    // SerialNumber errors
    #[error("SerialNumber: expected INTEGER")]
    SerialNumberExpectedInteger,

    // SubjectPublicKeyInfo errors
    #[error("SubjectPublicKeyInfo: expected SEQUENCE")]
    SubjectPublicKeyInfoExpectedSequence,
    #[error("SubjectPublicKeyInfo: expected BIT STRING for subject public key")]
    SubjectPublicKeyInfoExpectedBitString,
    #[error("SubjectPublicKeyInfo: expected 2 elements, got {0}")]
    SubjectPublicKeyInfoInvalidElementCount(usize),

    // KeyIdentifier errors
    #[error("KeyIdentifier: expected OCTET STRING")]
    KeyIdentifierExpectedOctetString,

    /// ASN.1 encoding/decoding error
    #[error("ASN.1 error: {0}")]
    ASN1Error(#[from] asn1::error::Error),
}
