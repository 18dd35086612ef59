//! Concrete certificate and CRL extensions
//!
//! Each type implements [`Extension`](crate::attribute::Extension) for the
//! envelope and [`CertAttrSet`](crate::attribute::CertAttrSet) for
//! name-keyed access to its single attribute.

mod certificate_issuer;
mod crl_number;
mod crl_reason_code;
mod subject_key_identifier;

pub use certificate_issuer::{CertificateIssuerAttribute, CertificateIssuerExtension};
pub use crl_number::{
    CrlNumber, CrlNumberExtension, DeltaCrlIndicator, DeltaCrlIndicatorExtension,
    IntegerExtension, IntegerExtensionAttribute, IntegerExtensionKind,
};
pub use crl_reason_code::{CrlReason, CrlReasonCodeAttribute, CrlReasonCodeExtension};
pub use subject_key_identifier::{SubjectKeyIdentifierAttribute, SubjectKeyIdentifierExtension};
