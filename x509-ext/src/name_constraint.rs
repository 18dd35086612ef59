//! Name constraint algebra over [`GeneralName`]
//!
//! RFC 5280 Section 4.2.1.10 describes, per name form, when a name falls
//! inside a permitted or excluded subtree. [`GeneralName::constrains`]
//! answers that question for a pair of names and
//! [`GeneralName::subtree_depth`] gives the hierarchy depth of a name.

use std::net::IpAddr;

use pkix_types::Name;

use crate::error::{Error, Result};
use crate::general_name::{GeneralName, IpAddressOrRange, NameRelation, uri_host};

impl GeneralName {
    /// How `other` relates to the subtree rooted at this name.
    ///
    /// Forms that only define equality (otherName, x400Address,
    /// ediPartyName, registeredID) return an unsupported-operation error for
    /// two unequal names of the same kind.
    pub fn constrains(&self, other: Option<&GeneralName>) -> Result<NameRelation> {
        let Some(other) = other else {
            return Ok(NameRelation::DifferentType);
        };
        if self.kind() != other.kind() {
            return Ok(NameRelation::DifferentType);
        }

        match (self, other) {
            (GeneralName::DnsName(this), GeneralName::DnsName(other)) => {
                Ok(dns_constrains(this, other))
            }
            (GeneralName::Rfc822Name(this), GeneralName::Rfc822Name(other)) => {
                Ok(rfc822_constrains(this, other))
            }
            (GeneralName::Uri(this), GeneralName::Uri(other)) => Ok(uri_constrains(this, other)),
            (GeneralName::IpAddress(this), GeneralName::IpAddress(other)) => {
                Ok(ip_constrains(this, other))
            }
            (GeneralName::DirectoryName(this), GeneralName::DirectoryName(other)) => {
                Ok(directory_constrains(this, other))
            }
            _ if self == other => Ok(NameRelation::Match),
            _ => Err(Error::UnsupportedOperation {
                kind: self.kind(),
                operation: "constrains",
            }),
        }
    }

    /// Number of hierarchy levels in this name.
    ///
    /// A directoryName counts RDNs, a dNSName counts labels, an rfc822Name
    /// counts its domain labels plus one for a mailbox, and a URI counts the
    /// labels of its host.
    pub fn subtree_depth(&self) -> Result<usize> {
        let unsupported = || Error::UnsupportedOperation {
            kind: self.kind(),
            operation: "subtree_depth",
        };

        match self {
            GeneralName::DirectoryName(name) => Ok(name.len()),
            GeneralName::DnsName(name) => Ok(dns_depth(name)),
            GeneralName::Rfc822Name(name) => Ok(match name.rsplit_once('@') {
                Some((_, domain)) => 1 + dns_depth(domain),
                None => dns_depth(name),
            }),
            GeneralName::Uri(uri) => match uri_host(uri) {
                Some(host) if !is_ip_host(host) => Ok(dns_depth(host)),
                _ => Err(unsupported()),
            },
            GeneralName::IpAddress(_)
            | GeneralName::RegisteredId(_)
            | GeneralName::X400Address(_)
            | GeneralName::OtherName(_)
            | GeneralName::EdiPartyName(_) => Err(unsupported()),
        }
    }
}

fn dns_depth(name: &str) -> usize {
    name.split('.').filter(|label| !label.is_empty()).count()
}

fn is_ip_host(host: &str) -> bool {
    host.parse::<IpAddr>().is_ok()
}

/// `name` ends with `suffix` at a label boundary, where a suffix with a
/// leading dot supplies the boundary itself.
fn at_label_boundary(name: &str, suffix: &str) -> bool {
    let boundary = name.len() - suffix.len();
    let preceded_by_dot = name.as_bytes().get(boundary.wrapping_sub(1)) == Some(&b'.');
    preceded_by_dot ^ suffix.starts_with('.')
}

fn dns_constrains(this: &str, other: &str) -> NameRelation {
    let this = this.to_ascii_lowercase();
    let other = other.to_ascii_lowercase();

    if this == other {
        NameRelation::Match
    } else if this.ends_with(&other) {
        if at_label_boundary(&this, &other) {
            NameRelation::Widens
        } else {
            NameRelation::SameType
        }
    } else if other.ends_with(&this) {
        if at_label_boundary(&other, &this) {
            NameRelation::Narrows
        } else {
            NameRelation::SameType
        }
    } else {
        NameRelation::SameType
    }
}

/// A mailbox constrains only itself, a host constrains the mailboxes on it
/// and a `.domain` constrains everything below it.
fn rfc822_constrains(this: &str, other: &str) -> NameRelation {
    let this = this.to_ascii_lowercase();
    let other = other.to_ascii_lowercase();

    let contains = |outer: &str, inner: &str| {
        if outer.contains('@') {
            false
        } else if outer.starts_with('.') {
            true
        } else {
            let boundary = inner.len() - outer.len();
            inner.as_bytes().get(boundary.wrapping_sub(1)) == Some(&b'@')
        }
    };

    if this == other {
        NameRelation::Match
    } else if other.ends_with(&this) {
        if contains(&this, &other) {
            NameRelation::Narrows
        } else {
            NameRelation::SameType
        }
    } else if this.ends_with(&other) {
        if contains(&other, &this) {
            NameRelation::Widens
        } else {
            NameRelation::SameType
        }
    } else {
        NameRelation::SameType
    }
}

/// URIs are compared by host. A constraint of the form `.domain` relates to
/// the hosts below the domain, a plain host only to itself.
fn uri_constrains(this: &str, other: &str) -> NameRelation {
    let (Some(this_host), Some(other_host)) = (uri_host(this), uri_host(other)) else {
        return if this == other {
            NameRelation::Match
        } else {
            NameRelation::SameType
        };
    };

    if this_host.eq_ignore_ascii_case(other_host) {
        return NameRelation::Match;
    }
    if is_ip_host(this_host) || is_ip_host(other_host) {
        return NameRelation::SameType;
    }

    let this_domain = this_host.strip_prefix('.');
    let other_domain = other_host.strip_prefix('.');
    let relation = dns_constrains(
        this_domain.unwrap_or(this_host),
        other_domain.unwrap_or(other_host),
    );

    match (this_domain.is_some(), other_domain.is_some(), relation) {
        (false, false, NameRelation::Narrows | NameRelation::Widens) => NameRelation::SameType,
        (true, false, NameRelation::Match) => NameRelation::Widens,
        (false, true, NameRelation::Match) => NameRelation::Narrows,
        (_, _, relation) => relation,
    }
}

fn ip_constrains(this: &IpAddressOrRange, other: &IpAddressOrRange) -> NameRelation {
    match (this, other) {
        (IpAddressOrRange::Address(a), IpAddressOrRange::Address(b)) => {
            if a == b {
                NameRelation::Match
            } else {
                NameRelation::SameType
            }
        }
        (IpAddressOrRange::Network(a), IpAddressOrRange::Network(b)) => {
            if a.trunc() == b.trunc() {
                NameRelation::Match
            } else if a.contains(b) {
                NameRelation::Narrows
            } else if b.contains(a) {
                NameRelation::Widens
            } else {
                NameRelation::SameType
            }
        }
        (IpAddressOrRange::Network(net), IpAddressOrRange::Address(addr)) => {
            if net.contains(addr) {
                NameRelation::Narrows
            } else {
                NameRelation::SameType
            }
        }
        (IpAddressOrRange::Address(addr), IpAddressOrRange::Network(net)) => {
            if net.contains(addr) {
                NameRelation::Widens
            } else {
                NameRelation::SameType
            }
        }
    }
}

fn directory_constrains(this: &Name, other: &Name) -> NameRelation {
    if this.canonical_eq(other) {
        NameRelation::Match
    } else if other.is_within_subtree(this) {
        NameRelation::Narrows
    } else if this.is_within_subtree(other) {
        NameRelation::Widens
    } else {
        NameRelation::SameType
    }
}
