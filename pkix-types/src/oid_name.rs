//! Trait for types that have OIDs with conventional names

/// Returns the conventional short name of a well-known OID, such as `CN` for
/// `2.5.4.3` or `sha256WithRSAEncryption` for `1.2.840.113549.1.1.11`.
pub trait OidName {
    fn oid_name(&self) -> Option<&'static str>;
}
