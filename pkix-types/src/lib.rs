//! PKIX (Public Key Infrastructure using X.509) Common Types
//!
//! Types shared by X.509 certificates and CRLs (RFC 5280) that are not
//! themselves extension content: names and their RFC 2253 canonical form,
//! algorithm identifiers, public key info, serial numbers, key identifiers and
//! the extension envelope.

pub mod algorithm;
pub mod canonical;
pub mod directory_string;
pub mod error;
pub mod extension;
pub mod key_identifier;
pub mod name;
pub mod oid_name;
pub mod serial_number;
pub mod subject_public_key_info;

pub use algorithm::{AlgorithmIdentifier, AlgorithmParameters};
pub use directory_string::{DirectoryString, StringKind};
pub use error::{Error, Result};
pub use extension::Extension;
pub use key_identifier::KeyIdentifier;
pub use name::{AttributeTypeAndValue, AttributeValue, Name, RelativeDistinguishedName};
pub use oid_name::OidName;
pub use serial_number::SerialNumber;
pub use subject_public_key_info::SubjectPublicKeyInfo;
