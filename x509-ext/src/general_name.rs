//! GeneralName
//!
//! RFC 5280 Section 4.2.1.6
//!
//! ```asn1
//! GeneralName ::= CHOICE {
//!     otherName                 [0] OtherName,
//!     rfc822Name                [1] IA5String,
//!     dNSName                   [2] IA5String,
//!     x400Address               [3] ORAddress,
//!     directoryName             [4] Name,
//!     ediPartyName              [5] EDIPartyName,
//!     uniformResourceIdentifier [6] IA5String,
//!     iPAddress                 [7] OCTET STRING,
//!     registeredID              [8] OBJECT IDENTIFIER
//! }
//!
//! OtherName ::= SEQUENCE {
//!     type-id    OBJECT IDENTIFIER,
//!     value      [0] EXPLICIT ANY DEFINED BY type-id
//! }
//!
//! EDIPartyName ::= SEQUENCE {
//!     nameAssigner [0] DirectoryString OPTIONAL,
//!     partyName    [1] DirectoryString
//! }
//! ```
//!
//! Every alternative is IMPLICIT except directoryName and the two
//! DirectoryString fields of EDIPartyName: `Name` and `DirectoryString` are
//! themselves CHOICE types, so their tags are EXPLICIT.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use asn1::{Element, ObjectIdentifier, OctetString};
use codec::decoder::{DecodableFrom, Decoder};
use codec::encoder::{EncodableTo, Encoder};
use der::PrimitiveTag;
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use pkix_types::{DirectoryString, Name};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Kind, Result};

/// The CHOICE alternative of a [`GeneralName`]. The discriminant is the
/// context-specific tag number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NameKind {
    Other = 0,
    Rfc822 = 1,
    Dns = 2,
    X400Address = 3,
    Directory = 4,
    EdiParty = 5,
    Uri = 6,
    IpAddress = 7,
    Oid = 8,
}

impl NameKind {
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Whether the alternative is carried in a constructed encoding.
    fn is_constructed(self) -> bool {
        matches!(
            self,
            NameKind::Other | NameKind::X400Address | NameKind::Directory | NameKind::EdiParty
        )
    }
}

impl TryFrom<u8> for NameKind {
    type Error = Error;

    fn try_from(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(NameKind::Other),
            1 => Ok(NameKind::Rfc822),
            2 => Ok(NameKind::Dns),
            3 => Ok(NameKind::X400Address),
            4 => Ok(NameKind::Directory),
            5 => Ok(NameKind::EdiParty),
            6 => Ok(NameKind::Uri),
            7 => Ok(NameKind::IpAddress),
            8 => Ok(NameKind::Oid),
            _ => Err(Error::UnknownGeneralNameTag(tag)),
        }
    }
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NameKind::Other => "otherName",
            NameKind::Rfc822 => "rfc822Name",
            NameKind::Dns => "dNSName",
            NameKind::X400Address => "x400Address",
            NameKind::Directory => "directoryName",
            NameKind::EdiParty => "ediPartyName",
            NameKind::Uri => "uniformResourceIdentifier",
            NameKind::IpAddress => "iPAddress",
            NameKind::Oid => "registeredID",
        };
        write!(f, "{}", name)
    }
}

/// Result of [`GeneralName::constrains`].
///
/// `Narrows` means the other name lies inside the subtree rooted at this
/// name, `Widens` the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum NameRelation {
    DifferentType = -1,
    Match = 0,
    Narrows = 1,
    Widens = 2,
    SameType = 3,
}

impl NameRelation {
    pub fn code(self) -> i8 {
        self as i8
    }
}

/// Where a GeneralName is being decoded.
///
/// A GeneralSubtree base admits forms that are invalid anywhere else: an
/// iPAddress carrying an address and a mask, a URI constraint that is only a
/// host or `.domain`, and a dNSName or rfc822Name starting with a dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameContext {
    #[default]
    Plain,
    Subtree,
}

/// An IP address, or an address range as used in name constraints.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IpAddressOrRange {
    /// 4 octets for IPv4, 16 for IPv6
    Address(IpAddr),
    /// Address followed by a netmask, 8 octets for IPv4, 32 for IPv6
    Network(IpNet),
}

impl IpAddressOrRange {
    pub fn is_network(&self) -> bool {
        matches!(self, IpAddressOrRange::Network(_))
    }

    pub fn addr(&self) -> IpAddr {
        match self {
            IpAddressOrRange::Address(addr) => *addr,
            IpAddressOrRange::Network(net) => net.addr(),
        }
    }

    fn from_octets(bytes: &[u8], context: NameContext) -> Result<Self> {
        if let Ok(octets) = <[u8; 4]>::try_from(bytes) {
            return Ok(IpAddressOrRange::Address(IpAddr::from(octets)));
        }
        if let Ok(octets) = <[u8; 16]>::try_from(bytes) {
            return Ok(IpAddressOrRange::Address(IpAddr::from(octets)));
        }

        if context == NameContext::Subtree {
            if let Ok(octets) = <[u8; 8]>::try_from(bytes) {
                let addr = Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3]);
                let mask = u32::from_be_bytes([octets[4], octets[5], octets[6], octets[7]]);
                let net = contiguous_prefix(mask.leading_ones(), mask.count_ones())
                    .and_then(|prefix| Ipv4Net::new(addr, prefix).ok())
                    .ok_or_else(|| Error::InvalidNetmask(Ipv4Addr::from(mask).to_string()))?;
                return Ok(IpAddressOrRange::Network(IpNet::V4(net)));
            }
            if bytes.len() == 32 {
                let mut addr = [0u8; 16];
                let mut mask = [0u8; 16];
                addr.copy_from_slice(&bytes[..16]);
                mask.copy_from_slice(&bytes[16..]);
                let mask = u128::from_be_bytes(mask);
                let net = contiguous_prefix(mask.leading_ones(), mask.count_ones())
                    .and_then(|prefix| Ipv6Net::new(Ipv6Addr::from(addr), prefix).ok())
                    .ok_or_else(|| Error::InvalidNetmask(Ipv6Addr::from(mask).to_string()))?;
                return Ok(IpAddressOrRange::Network(IpNet::V6(net)));
            }
        }

        Err(Error::InvalidIpAddressLength {
            expected: match context {
                NameContext::Plain => "4 or 16",
                NameContext::Subtree => "4, 8, 16 or 32",
            },
            actual: bytes.len(),
        })
    }
}

fn contiguous_prefix(leading_ones: u32, count_ones: u32) -> Option<u8> {
    if leading_ones == count_ones {
        u8::try_from(count_ones).ok()
    } else {
        None
    }
}

impl fmt::Display for IpAddressOrRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpAddressOrRange::Address(addr) => write!(f, "{}", addr),
            IpAddressOrRange::Network(net) => write!(f, "{}", net),
        }
    }
}

impl EncodableTo<IpAddressOrRange> for Element {}

impl Encoder<IpAddressOrRange, Element> for IpAddressOrRange {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let bytes = match self {
            IpAddressOrRange::Address(IpAddr::V4(addr)) => addr.octets().to_vec(),
            IpAddressOrRange::Address(IpAddr::V6(addr)) => addr.octets().to_vec(),
            IpAddressOrRange::Network(IpNet::V4(net)) => {
                [net.addr().octets(), net.netmask().octets()].concat()
            }
            IpAddressOrRange::Network(IpNet::V6(net)) => {
                [net.addr().octets(), net.netmask().octets()].concat()
            }
        };
        Ok(Element::OctetString(OctetString::from(bytes)))
    }
}

/// otherName: a type identifier and the DER encoding of its value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OtherName {
    pub type_id: ObjectIdentifier,
    /// DER of the value inside the `[0] EXPLICIT` wrapper
    pub value: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdiPartyName {
    pub name_assigner: Option<DirectoryString>,
    pub party_name: DirectoryString,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeneralName {
    OtherName(OtherName),
    Rfc822Name(String),
    DnsName(String),
    /// DER of the ORAddress SEQUENCE
    X400Address(Vec<u8>),
    DirectoryName(Name),
    EdiPartyName(EdiPartyName),
    Uri(String),
    IpAddress(IpAddressOrRange),
    RegisteredId(ObjectIdentifier),
}

impl GeneralName {
    pub fn kind(&self) -> NameKind {
        match self {
            GeneralName::OtherName(_) => NameKind::Other,
            GeneralName::Rfc822Name(_) => NameKind::Rfc822,
            GeneralName::DnsName(_) => NameKind::Dns,
            GeneralName::X400Address(_) => NameKind::X400Address,
            GeneralName::DirectoryName(_) => NameKind::Directory,
            GeneralName::EdiPartyName(_) => NameKind::EdiParty,
            GeneralName::Uri(_) => NameKind::Uri,
            GeneralName::IpAddress(_) => NameKind::IpAddress,
            GeneralName::RegisteredId(_) => NameKind::Oid,
        }
    }

    /// A validated dNSName.
    pub fn dns(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_dns_name(&name, NameContext::Plain)?;
        Ok(GeneralName::DnsName(name))
    }

    /// A validated rfc822Name mailbox or host.
    pub fn rfc822(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_rfc822_name(&name, NameContext::Plain)?;
        Ok(GeneralName::Rfc822Name(name))
    }

    /// A validated absolute URI.
    pub fn uri(uri: impl Into<String>) -> Result<Self> {
        let uri = uri.into();
        validate_uri(&uri, NameContext::Plain)?;
        Ok(GeneralName::Uri(uri))
    }

    /// Decodes a GeneralName, applying the validation rules of `context`.
    pub fn decode_in(element: &Element, context: NameContext) -> Result<Self> {
        let Element::ContextSpecific {
            slot, constructed, ..
        } = element
        else {
            return Err(Error::ExpectedContextSpecific(Kind::GeneralName));
        };
        let slot = *slot;
        let kind = NameKind::try_from(slot)?;

        match (kind.is_constructed(), *constructed) {
            (true, false) => {
                return Err(Error::ExpectedConstructedContextTag {
                    kind: Kind::GeneralName,
                    slot,
                });
            }
            (false, true) => {
                return Err(Error::ExpectedPrimitiveContextTag {
                    kind: Kind::GeneralName,
                    slot,
                });
            }
            _ => {}
        }

        match kind {
            NameKind::Other => decode_other_name(element).map(GeneralName::OtherName),
            NameKind::Rfc822 => {
                let name = untag_ia5(element, kind)?;
                validate_rfc822_name(&name, context)?;
                Ok(GeneralName::Rfc822Name(name))
            }
            NameKind::Dns => {
                let name = untag_ia5(element, kind)?;
                validate_dns_name(&name, context)?;
                Ok(GeneralName::DnsName(name))
            }
            NameKind::X400Address => {
                let address = element.untag(PrimitiveTag::Sequence)?;
                Ok(GeneralName::X400Address(address.to_der()?))
            }
            NameKind::Directory => {
                let inner = element
                    .explicit_inner()
                    .ok_or(Error::InvalidExplicitTag {
                        kind: Kind::GeneralName,
                        slot,
                    })?;
                let name: Name = inner.decode()?;
                Ok(GeneralName::DirectoryName(name))
            }
            NameKind::EdiParty => decode_edi_party_name(element).map(GeneralName::EdiPartyName),
            NameKind::Uri => {
                let uri = untag_ia5(element, kind)?;
                validate_uri(&uri, context)?;
                Ok(GeneralName::Uri(uri))
            }
            NameKind::IpAddress => match element.untag(PrimitiveTag::OctetString)? {
                Element::OctetString(os) => {
                    IpAddressOrRange::from_octets(os.as_bytes(), context).map(GeneralName::IpAddress)
                }
                _ => Err(Error::ExpectedOctetString(Kind::GeneralName)),
            },
            NameKind::Oid => match element.untag(PrimitiveTag::ObjectIdentifier)? {
                Element::ObjectIdentifier(oid) => Ok(GeneralName::RegisteredId(oid)),
                _ => Err(Error::ExpectedOid(Kind::GeneralName)),
            },
        }
    }
}

fn untag_ia5(element: &Element, kind: NameKind) -> Result<String> {
    match element.untag(PrimitiveTag::IA5String) {
        Ok(Element::IA5String(s)) => Ok(s),
        _ => Err(Error::InvalidIa5String(kind)),
    }
}

fn decode_other_name(element: &Element) -> Result<OtherName> {
    let Element::Sequence(fields) = element.untag(PrimitiveTag::Sequence)? else {
        return Err(Error::ExpectedSequence(Kind::GeneralName));
    };
    let [type_id, value] = fields.as_slice() else {
        return Err(Error::InvalidElementCount {
            kind: Kind::GeneralName,
            expected: "2",
            actual: fields.len(),
        });
    };
    let Element::ObjectIdentifier(type_id) = type_id else {
        return Err(Error::ExpectedOid(Kind::GeneralName));
    };
    let value = match value {
        Element::ContextSpecific { slot: 0, .. } => value
            .explicit_inner()
            .ok_or(Error::OtherNameExpectedExplicitTag)?,
        _ => return Err(Error::OtherNameExpectedExplicitTag),
    };

    Ok(OtherName {
        type_id: type_id.clone(),
        value: value.to_der()?,
    })
}

fn decode_edi_party_name(element: &Element) -> Result<EdiPartyName> {
    let Element::Sequence(fields) = element.untag(PrimitiveTag::Sequence)? else {
        return Err(Error::ExpectedSequence(Kind::GeneralName));
    };

    let (name_assigner, party_name) =
        fields
            .iter()
            .try_fold((None::<DirectoryString>, None), |(assigner, party), field| {
                let Element::ContextSpecific { slot, .. } = field else {
                    return Err(Error::ExpectedContextSpecific(Kind::GeneralName));
                };
                let inner = field.explicit_inner().ok_or(Error::InvalidExplicitTag {
                    kind: Kind::GeneralName,
                    slot: *slot,
                })?;
                match (*slot, assigner.is_some(), party.is_some()) {
                    (0, false, false) => Ok((Some(DirectoryString::try_from(inner)?), party)),
                    (1, _, false) => Ok((assigner, Some(DirectoryString::try_from(inner)?))),
                    _ => Err(Error::UnexpectedContextTag {
                        kind: Kind::GeneralName,
                        slot: *slot,
                    }),
                }
            })?;

    Ok(EdiPartyName {
        name_assigner,
        party_name: party_name.ok_or(Error::EdiPartyNameMissingPartyName)?,
    })
}

fn is_valid_label(label: &str) -> bool {
    let bytes = label.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(first), Some(last)) => {
            first.is_ascii_alphanumeric()
                && last.is_ascii_alphanumeric()
                && bytes
                    .iter()
                    .all(|b| b.is_ascii_alphanumeric() || *b == b'-' || *b == b'_')
        }
        _ => false,
    }
}

/// Dot-separated labels; a `*` leftmost label is accepted for wildcard
/// names, a leading dot only in a subtree.
fn is_valid_domain(name: &str, context: NameContext) -> bool {
    let name = match (context, name.strip_prefix('.')) {
        (NameContext::Subtree, Some(rest)) => rest,
        _ => name,
    };
    !name.is_empty()
        && name
            .split('.')
            .enumerate()
            .all(|(i, label)| (i == 0 && label == "*") || is_valid_label(label))
}

fn validate_dns_name(name: &str, context: NameContext) -> Result<()> {
    if is_valid_domain(name, context) {
        Ok(())
    } else {
        Err(Error::InvalidDnsName(name.to_string()))
    }
}

/// A mailbox `local@domain` or a bare host; in a subtree also `.domain`.
fn validate_rfc822_name(name: &str, context: NameContext) -> Result<()> {
    let valid = name.is_ascii()
        && !name.contains(char::is_whitespace)
        && match name.rsplit_once('@') {
            Some((local, domain)) => !local.is_empty() && is_valid_domain(domain, NameContext::Plain),
            None => is_valid_domain(name, context),
        };
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidRfc822Name(name.to_string()))
    }
}

/// An absolute URI; in a subtree also a bare host or `.domain`.
fn validate_uri(uri: &str, context: NameContext) -> Result<()> {
    let valid = uri.is_ascii()
        && !uri.contains(char::is_whitespace)
        && (uri_scheme(uri).is_some()
            || (context == NameContext::Subtree && is_valid_domain(uri, context)));
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidUri(uri.to_string()))
    }
}

/// Splits `scheme:rest` when the scheme is well formed.
fn uri_scheme(uri: &str) -> Option<(&str, &str)> {
    let (scheme, rest) = uri.split_once(':')?;
    let mut chars = scheme.chars();
    let first = chars.next()?;
    (first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')))
    .then_some((scheme, rest))
}

/// The host of a URI GeneralName.
///
/// For an absolute URI this is the authority host without userinfo, port or
/// IPv6 brackets. A string that is not an absolute URI is the name constraint
/// form and is returned whole.
pub(crate) fn uri_host(uri: &str) -> Option<&str> {
    let Some((_, rest)) = uri_scheme(uri) else {
        return (!uri.is_empty() && !uri.contains(['/', '?', '#', '@'])).then_some(uri);
    };
    let authority = rest.strip_prefix("//")?;
    let end = authority.find(['/', '?', '#']).unwrap_or(authority.len());
    let authority = &authority[..end];
    let host_port = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host_port)| host_port);
    let host = match host_port.strip_prefix('[') {
        Some(bracketed) => bracketed.split_once(']')?.0,
        None => host_port
            .split_once(':')
            .map_or(host_port, |(host, _)| host),
    };
    (!host.is_empty()).then_some(host)
}

impl fmt::Display for GeneralName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneralName::DnsName(dns) => write!(f, "DNS:{}", dns),
            GeneralName::IpAddress(ip) => write!(f, "IP Address:{}", ip),
            GeneralName::Rfc822Name(email) => write!(f, "email:{}", email),
            GeneralName::Uri(uri) => write!(f, "URI:{}", uri),
            GeneralName::DirectoryName(name) => write!(f, "DirName:{}", name),
            GeneralName::RegisteredId(oid) => write!(f, "Registered ID:{}", oid),
            GeneralName::OtherName(other) => write!(f, "othername:{}", other.type_id),
            GeneralName::X400Address(_) => write!(f, "X400Address"),
            GeneralName::EdiPartyName(edi) => match &edi.name_assigner {
                Some(assigner) => write!(f, "EdiPartyName:{}/{}", assigner, edi.party_name),
                None => write!(f, "EdiPartyName:{}", edi.party_name),
            },
        }
    }
}

impl DecodableFrom<Element> for GeneralName {}

impl Decoder<Element, GeneralName> for Element {
    type Error = Error;

    fn decode(&self) -> Result<GeneralName> {
        GeneralName::decode_in(self, NameContext::Plain)
    }
}

impl EncodableTo<GeneralName> for Element {}

impl Encoder<GeneralName, Element> for GeneralName {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let slot = self.kind().tag();
        let element = match self {
            GeneralName::OtherName(other) => {
                let value = Element::from_der(&other.value)?;
                let fields = Element::Sequence(vec![
                    Element::ObjectIdentifier(other.type_id.clone()),
                    Element::explicit(0, value),
                ]);
                Element::implicit(slot, &fields)?
            }
            GeneralName::Rfc822Name(s) | GeneralName::DnsName(s) | GeneralName::Uri(s) => {
                if !s.is_ascii() {
                    return Err(Error::InvalidIa5String(self.kind()));
                }
                Element::implicit(slot, &Element::IA5String(s.clone()))?
            }
            GeneralName::X400Address(der) => match Element::from_der(der)? {
                address @ Element::Sequence(_) => Element::implicit(slot, &address)?,
                _ => return Err(Error::ExpectedSequence(Kind::GeneralName)),
            },
            GeneralName::DirectoryName(name) => Element::explicit(slot, name.encode()?),
            GeneralName::EdiPartyName(edi) => {
                let fields = edi
                    .name_assigner
                    .iter()
                    .map(|assigner| Element::explicit(0, Element::from(assigner)))
                    .chain(std::iter::once(Element::explicit(
                        1,
                        Element::from(&edi.party_name),
                    )))
                    .collect();
                Element::implicit(slot, &Element::Sequence(fields))?
            }
            GeneralName::IpAddress(ip) => Element::implicit(slot, &ip.encode()?)?,
            GeneralName::RegisteredId(oid) => {
                Element::implicit(slot, &Element::ObjectIdentifier(oid.clone()))?
            }
        };
        Ok(element)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use hex_literal::hex;
    use pkix_types::{AttributeTypeAndValue, RelativeDistinguishedName};
    use rstest::rstest;

    use super::*;

    fn decode_bytes(bytes: &[u8], context: NameContext) -> Result<GeneralName> {
        let element = Element::from_der(bytes)?;
        GeneralName::decode_in(&element, context)
    }

    fn test_name() -> Name {
        let cn = AttributeTypeAndValue::new(
            ObjectIdentifier::from_str(AttributeTypeAndValue::OID_COMMON_NAME).unwrap(),
            DirectoryString::printable("Test").unwrap(),
        );
        Name::new(vec![RelativeDistinguishedName::new_single(cn)])
    }

    #[rstest]
    #[case(hex!("82 0b 65 78 61 6d 70 6c 65 2e 63 6f 6d").to_vec(), GeneralName::DnsName("example.com".to_string()))]
    #[case(hex!("81 05 61 40 62 2e 63").to_vec(), GeneralName::Rfc822Name("a@b.c".to_string()))]
    #[case(hex!("86 0a 68 74 74 70 3a 2f 2f 61 2e 62").to_vec(), GeneralName::Uri("http://a.b".to_string()))]
    #[case(hex!("87 04 c0 a8 01 01").to_vec(), GeneralName::IpAddress(IpAddressOrRange::Address(IpAddr::from([192, 168, 1, 1]))))]
    #[case(hex!("87 10 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00 01").to_vec(), GeneralName::IpAddress(IpAddressOrRange::Address(IpAddr::from(Ipv6Addr::LOCALHOST))))]
    #[case(hex!("88 03 2a 03 04").to_vec(), GeneralName::RegisteredId(ObjectIdentifier::from_str("1.2.3.4").unwrap()))]
    #[case(hex!("a4 11 30 0f 31 0d 30 0b 06 03 55 04 03 13 04 54 65 73 74").to_vec(), GeneralName::DirectoryName(test_name()))]
    #[case(hex!("a0 0a 06 03 2a 03 04 a0 03 0c 01 78").to_vec(), GeneralName::OtherName(OtherName { type_id: ObjectIdentifier::from_str("1.2.3.4").unwrap(), value: vec![0x0c, 0x01, 0x78] }))]
    #[case(hex!("a3 02 30 00").to_vec(), GeneralName::X400Address(vec![0x30, 0x02, 0x30, 0x00]))]
    #[case(hex!("a5 05 a1 03 0c 01 78").to_vec(), GeneralName::EdiPartyName(EdiPartyName { name_assigner: None, party_name: DirectoryString::new("x") }))]
    #[case(hex!("a5 0a a0 03 0c 01 61 a1 03 0c 01 78").to_vec(), GeneralName::EdiPartyName(EdiPartyName { name_assigner: Some(DirectoryString::new("a")), party_name: DirectoryString::new("x") }))]
    fn test_general_name_roundtrip(#[case] der: Vec<u8>, #[case] expected: GeneralName) {
        let decoded = decode_bytes(&der, NameContext::Plain).unwrap();
        assert_eq!(decoded, expected);
        assert_eq!(decoded.kind().tag(), der[0] & 0x1f);

        let encoded = decoded.encode().unwrap();
        assert_eq!(encoded.to_der().unwrap(), der);
    }

    #[rstest]
    #[case(hex!("87 08 0a 00 00 00 ff 00 00 00").to_vec(), "10.0.0.0/8")]
    #[case(hex!("87 08 c0 a8 00 00 ff ff 00 00").to_vec(), "192.168.0.0/16")]
    #[case(hex!("87 08 00 00 00 00 00 00 00 00").to_vec(), "0.0.0.0/0")]
    fn test_subtree_ip_network(#[case] der: Vec<u8>, #[case] expected: &str) {
        let decoded = decode_bytes(&der, NameContext::Subtree).unwrap();
        let GeneralName::IpAddress(ip) = &decoded else {
            panic!("expected IpAddress");
        };
        assert!(ip.is_network());
        assert_eq!(ip.to_string(), expected);
        assert_eq!(decoded.encode().unwrap().to_der().unwrap(), der);
    }

    #[rstest]
    #[case(hex!("86 0c 2e 65 78 61 6d 70 6c 65 2e 63 6f 6d").to_vec(), ".example.com")]
    #[case(hex!("86 0b 65 78 61 6d 70 6c 65 2e 63 6f 6d").to_vec(), "example.com")]
    fn test_subtree_uri_constraint(#[case] der: Vec<u8>, #[case] expected: &str) {
        let decoded = decode_bytes(&der, NameContext::Subtree).unwrap();
        assert_eq!(decoded, GeneralName::Uri(expected.to_string()));
        assert!(decode_bytes(&der, NameContext::Plain).is_err());
    }

    #[rstest]
    // "example.com"
    #[case(hex!("81 0b 65 78 61 6d 70 6c 65 2e 63 6f 6d").to_vec(), NameContext::Plain)]
    #[case(hex!("81 0b 65 78 61 6d 70 6c 65 2e 63 6f 6d").to_vec(), NameContext::Subtree)]
    // ".example.com"
    #[case(hex!("81 0c 2e 65 78 61 6d 70 6c 65 2e 63 6f 6d").to_vec(), NameContext::Subtree)]
    fn test_rfc822_host_forms(#[case] der: Vec<u8>, #[case] context: NameContext) {
        let decoded = decode_bytes(&der, context).unwrap();
        assert_eq!(decoded.kind(), NameKind::Rfc822);
        assert_eq!(decoded.encode().unwrap().to_der().unwrap(), der);
    }

    #[test]
    fn test_rfc822_domain_constraint_is_subtree_only() {
        let der = hex!("81 0c 2e 65 78 61 6d 70 6c 65 2e 63 6f 6d");
        assert!(matches!(
            decode_bytes(&der, NameContext::Plain),
            Err(Error::InvalidRfc822Name(_))
        ));
    }

    #[rstest]
    #[case(hex!("89 00").to_vec())]
    #[case(hex!("87 05 01 02 03 04 05").to_vec())]
    #[case(hex!("87 08 0a 00 00 00 ff 00 00 00").to_vec())]
    #[case(hex!("82 04 2d 62 61 64").to_vec())]
    #[case(hex!("a2 02 16 00").to_vec())]
    #[case(hex!("84 00").to_vec())]
    #[case(hex!("81 02 61 40").to_vec())]
    #[case(hex!("86 05 61 2f 62 2f 63").to_vec())]
    #[case(hex!("a5 03 a0 01 00").to_vec())]
    #[case(hex!("a5 05 a0 03 0c 01 61").to_vec())]
    #[case(hex!("a0 05 06 03 2a 03 04").to_vec())]
    #[case(hex!("16 03 61 2e 62").to_vec())]
    fn test_general_name_decode_rejects(#[case] der: Vec<u8>) {
        assert!(decode_bytes(&der, NameContext::Plain).is_err());
    }

    #[test]
    fn test_non_contiguous_netmask() {
        let err = decode_bytes(&hex!("87 08 0a 00 00 00 ff 00 ff 00"), NameContext::Subtree)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidNetmask(_)));
    }

    #[test]
    fn test_unknown_tag() {
        let err = decode_bytes(&hex!("89 00"), NameContext::Plain).unwrap_err();
        assert!(matches!(err, Error::UnknownGeneralNameTag(9)));
    }

    #[rstest]
    #[case("http://example.com/path", Some("example.com"))]
    #[case("https://user@Example.com:8443/", Some("Example.com"))]
    #[case("ldap://[2001:db8::1]/cn=x", Some("2001:db8::1"))]
    #[case(".example.com", Some(".example.com"))]
    #[case("urn:isbn:0451450523", None)]
    #[case("file:///etc/hosts", None)]
    fn test_uri_host(#[case] uri: &str, #[case] expected: Option<&str>) {
        assert_eq!(uri_host(uri), expected);
    }

    #[rstest]
    #[case(GeneralName::DnsName("www.example.com".to_string()), "DNS:www.example.com")]
    #[case(GeneralName::Rfc822Name("a@example.com".to_string()), "email:a@example.com")]
    #[case(GeneralName::IpAddress(IpAddressOrRange::Address(IpAddr::from([10, 0, 0, 1]))), "IP Address:10.0.0.1")]
    #[case(GeneralName::DirectoryName(test_name()), "DirName:CN=Test")]
    #[case(GeneralName::RegisteredId(ObjectIdentifier::from_str("1.2.3").unwrap()), "Registered ID:1.2.3")]
    fn test_general_name_display(#[case] name: GeneralName, #[case] expected: &str) {
        assert_eq!(name.to_string(), expected);
    }

    #[test]
    fn test_validated_constructors() {
        assert!(GeneralName::dns("*.example.com").is_ok());
        assert!(GeneralName::dns("exa mple.com").is_err());
        assert!(GeneralName::rfc822("user@example.com").is_ok());
        assert!(GeneralName::rfc822("example.com").is_ok());
        assert!(GeneralName::rfc822(".example.com").is_err());
        assert!(GeneralName::rfc822("@example.com").is_err());
        assert!(GeneralName::uri("https://example.com").is_ok());
        assert!(GeneralName::uri("example.com").is_err());
    }

    #[test]
    fn test_non_ascii_is_not_encoded() {
        let name = GeneralName::DnsName("ex\u{e4}mple.com".to_string());
        assert!(matches!(
            name.encode(),
            Err(Error::InvalidIa5String(NameKind::Dns))
        ));
    }
}
