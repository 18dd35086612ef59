//! Typed X.509 extension content (RFC 5280)
//!
//! Conversion between the DER encoding of certificate and CRL extension
//! values and their typed form: general names and the name-constraint
//! relations between them, distribution points, policy mappings, access
//! descriptions, and a small set of extensions with name-keyed attribute
//! access.
//!
//! ```
//! use asn1::Element;
//! use codec::decoder::Decoder;
//! use x509_ext::{GeneralName, NameRelation};
//!
//! let der = [0x82, 0x0b, b'e', b'x', b'a', b'm', b'p', b'l', b'e', b'.', b'c', b'o', b'm'];
//! let name: GeneralName = Element::from_der(&der).unwrap().decode().unwrap();
//! let host = GeneralName::dns("www.example.com").unwrap();
//! assert_eq!(name.constrains(Some(&host)).unwrap(), NameRelation::Narrows);
//! ```

pub mod access_description;
pub mod attribute;
pub mod distribution_point;
pub mod error;
pub mod extensions;
pub mod fields;
pub mod general_name;
pub mod general_names;
pub mod general_subtree;
mod name_constraint;
pub mod policy;

pub use access_description::AccessDescription;
pub use attribute::{AttrValue, AttributeName, CertAttrSet, Extension, ValueCache};
pub use distribution_point::{DistributionPoint, DistributionPointName, ReasonFlags};
pub use error::{Error, Kind, Result};
pub use extensions::{
    CertificateIssuerExtension, CrlNumberExtension, CrlReason, CrlReasonCodeExtension,
    DeltaCrlIndicatorExtension, IntegerExtension, SubjectKeyIdentifierExtension,
};
pub use fields::{CertificateAlgorithmId, CertificateSerialNumber, CertificateX509Key};
pub use general_name::{
    EdiPartyName, GeneralName, IpAddressOrRange, NameContext, NameKind, NameRelation, OtherName,
};
pub use general_names::GeneralNames;
pub use general_subtree::{GeneralSubtree, GeneralSubtrees, NameConstraints};
pub use policy::{CertificatePolicyId, CertificatePolicyMap};
