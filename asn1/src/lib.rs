use std::{fmt::Display, str::FromStr};

use chrono::NaiveDateTime;
use codec::decoder::{DecodableFrom, Decoder};
use codec::encoder::{EncodableTo, Encoder};
use der::{Der, PrimitiveTag, Tag, Tlv};
use error::Error;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub mod error;

#[derive(Debug, Clone)]
pub struct ASN1Object {
    elements: Vec<Element>,
}

impl ASN1Object {
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn new(elements: Vec<Element>) -> Self {
        ASN1Object { elements }
    }
}

impl DecodableFrom<Der> for ASN1Object {}

impl Decoder<Der, ASN1Object> for Der {
    type Error = Error;
    fn decode(&self) -> Result<ASN1Object, Error> {
        let elements = self
            .elements()
            .iter()
            .map(Element::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ASN1Object { elements })
    }
}

impl EncodableTo<ASN1Object> for Der {}

impl Encoder<ASN1Object, Der> for ASN1Object {
    type Error = Error;

    fn encode(&self) -> Result<Der, Self::Error> {
        let tlvs = self
            .elements
            .iter()
            .map(Tlv::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Der::new(tlvs))
    }
}

/// A decoded ASN.1 value.
///
/// Context-specific values keep their form:
/// - constructed: `element` is an `Element::Sequence` holding every decoded
///   child in order. An EXPLICIT tag is therefore a one-child sequence, and an
///   IMPLICIT SEQUENCE or SET keeps all of its members.
/// - primitive: `element` is an `Element::OctetString` holding the raw
///   contents octets. Use [`Element::untag`] to read them as their native type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Element {
    Boolean(bool),
    Integer(Integer),
    Enumerated(Integer),
    BitString(BitString),
    OctetString(OctetString),
    Null,
    ObjectIdentifier(ObjectIdentifier),
    UTF8String(String),
    Sequence(Vec<Element>),
    Set(Vec<Element>),
    PrintableString(String),
    IA5String(String),
    BMPString(String),
    UTCTime(NaiveDateTime),
    GeneralizedTime(NaiveDateTime),
    ContextSpecific {
        slot: u8,
        constructed: bool,
        element: Box<Element>,
    },
    Unimplemented(Tlv),
}

impl Element {
    /// Re-tags `inner` with an IMPLICIT context-specific tag.
    ///
    /// The universal tag is replaced, not wrapped: a SEQUENCE or SET becomes a
    /// constructed `[slot]` with the same members, any other value becomes a
    /// primitive `[slot]` with the same contents octets.
    pub fn implicit(slot: u8, inner: &Element) -> Result<Element, Error> {
        match inner {
            Element::Sequence(children) | Element::Set(children) => Ok(Element::ContextSpecific {
                slot,
                constructed: true,
                element: Box::new(Element::Sequence(children.clone())),
            }),
            Element::ContextSpecific { .. } => Err(Error::InvalidContextSpecific {
                slot,
                msg: "an already tagged value cannot be tagged implicitly",
            }),
            other => {
                let tlv = Tlv::try_from(other)?;
                match tlv.tlvs() {
                    Some(tlvs) => {
                        let children = tlvs
                            .iter()
                            .map(Element::try_from)
                            .collect::<Result<Vec<_>, _>>()?;
                        Ok(Element::ContextSpecific {
                            slot,
                            constructed: true,
                            element: Box::new(Element::Sequence(children)),
                        })
                    }
                    None => Ok(Element::ContextSpecific {
                        slot,
                        constructed: false,
                        element: Box::new(Element::OctetString(OctetString::from(tlv.contents()))),
                    }),
                }
            }
        }
    }

    /// Wraps `inner` in an EXPLICIT context-specific tag.
    pub fn explicit(slot: u8, inner: Element) -> Element {
        Element::ContextSpecific {
            slot,
            constructed: true,
            element: Box::new(Element::Sequence(vec![inner])),
        }
    }

    /// The single child of an EXPLICIT context-specific value.
    pub fn explicit_inner(&self) -> Option<&Element> {
        match self {
            Element::ContextSpecific {
                constructed: true,
                element,
                ..
            } => match element.as_ref() {
                Element::Sequence(children) => match children.as_slice() {
                    [inner] => Some(inner),
                    _ => None,
                },
                other => Some(other),
            },
            _ => None,
        }
    }

    /// Reads an IMPLICIT context-specific value as its native universal type.
    ///
    /// This is the inverse of [`Element::implicit`]: the context tag is
    /// rewritten to `native` and the contents are decoded again.
    pub fn untag(&self, native: PrimitiveTag) -> Result<Element, Error> {
        let Element::ContextSpecific {
            slot,
            constructed,
            element,
        } = self
        else {
            return Err(Error::ExpectedContextSpecific);
        };

        match (constructed, native) {
            (true, PrimitiveTag::Sequence | PrimitiveTag::Set) => {
                let children = match element.as_ref() {
                    Element::Sequence(children) => children.clone(),
                    other => vec![other.clone()],
                };
                if native == PrimitiveTag::Set {
                    Ok(Element::Set(children))
                } else {
                    Ok(Element::Sequence(children))
                }
            }
            (true, _) => Err(Error::InvalidContextSpecific {
                slot: *slot,
                msg: "constructed value cannot be read as a primitive type",
            }),
            (false, PrimitiveTag::Sequence | PrimitiveTag::Set) => {
                Err(Error::InvalidContextSpecific {
                    slot: *slot,
                    msg: "primitive value cannot be read as a constructed type",
                })
            }
            (false, _) => {
                let data = match element.as_ref() {
                    Element::OctetString(os) => os.as_bytes().to_vec(),
                    other => Tlv::try_from(other)?.contents(),
                };
                Element::try_from(&Tlv::new_primitive(Tag::universal(native), data))
            }
        }
    }

    /// Decodes exactly one DER value.
    pub fn from_der(bytes: &[u8]) -> Result<Element, Error> {
        let der: Der = bytes.decode().map_err(Error::FailedToDecodeDer)?;
        match der.elements() {
            [tlv] => Element::try_from(tlv),
            other => Err(Error::ExpectedSingleElement(other.len())),
        }
    }

    pub fn to_der(&self) -> Result<Vec<u8>, Error> {
        Ok(Tlv::try_from(self)?.to_bytes())
    }
}

fn decode_children(tlv: &Tlv, name: &'static str) -> Result<Vec<Element>, Error> {
    tlv.tlvs()
        .ok_or(Error::ExpectedConstructed(name))?
        .iter()
        .map(Element::try_from)
        .collect()
}

fn decode_ascii(data: &[u8], err: Error) -> Result<String, Error> {
    if !data.is_ascii() {
        return Err(err);
    }
    String::from_utf8(data.to_vec()).map_err(|_| err)
}

impl TryFrom<&Tlv> for Element {
    type Error = Error;

    fn try_from(tlv: &Tlv) -> Result<Self, Self::Error> {
        match tlv.tag() {
            Tag::Primitive(primitive_tag, _raw) => {
                if let PrimitiveTag::Sequence = primitive_tag {
                    return Ok(Element::Sequence(decode_children(tlv, "SEQUENCE")?));
                }
                if let PrimitiveTag::Set = primitive_tag {
                    return Ok(Element::Set(decode_children(tlv, "SET")?));
                }
                let Some(data) = tlv.data() else {
                    return Ok(Element::Unimplemented(tlv.clone()));
                };
                match primitive_tag {
                    PrimitiveTag::Boolean => match data {
                        [0x00] => Ok(Element::Boolean(false)),
                        [0xff] => Ok(Element::Boolean(true)),
                        _ => Err(Error::InvalidBoolean),
                    },
                    PrimitiveTag::Integer => {
                        if data.is_empty() {
                            return Err(Error::IntegerNoData);
                        }
                        Ok(Element::Integer(Integer::from(data)))
                    }
                    PrimitiveTag::Enumerated => {
                        if data.is_empty() {
                            return Err(Error::EnumeratedNoData);
                        }
                        Ok(Element::Enumerated(Integer::from(data)))
                    }
                    PrimitiveTag::BitString => Ok(Element::BitString(BitString::try_from(data)?)),
                    PrimitiveTag::OctetString => Ok(Element::OctetString(OctetString::from(data))),
                    PrimitiveTag::Null => Ok(Element::Null),
                    PrimitiveTag::ObjectIdentifier => {
                        Ok(Element::ObjectIdentifier(ObjectIdentifier::try_from(data)?))
                    }
                    PrimitiveTag::UTF8String => {
                        let s = String::from_utf8(data.to_vec())
                            .map_err(|_| Error::Utf8StringInvalidUtf8)?;
                        Ok(Element::UTF8String(s))
                    }
                    PrimitiveTag::PrintableString => Ok(Element::PrintableString(decode_ascii(
                        data,
                        Error::PrintableStringInvalidEncoding,
                    )?)),
                    PrimitiveTag::IA5String => Ok(Element::IA5String(decode_ascii(
                        data,
                        Error::Ia5StringInvalidEncoding,
                    )?)),
                    PrimitiveTag::BMPString => Ok(Element::BMPString(decode_bmp_string(data)?)),
                    PrimitiveTag::UTCTime => Ok(Element::UTCTime(parse_utc_time(data)?)),
                    PrimitiveTag::GeneralizedTime => {
                        Ok(Element::GeneralizedTime(parse_generalized_time(data)?))
                    }
                    PrimitiveTag::Sequence | PrimitiveTag::Set | PrimitiveTag::Unimplemented(_) => {
                        Ok(Element::Unimplemented(tlv.clone()))
                    }
                }
            }
            Tag::ContextSpecific { slot, constructed } => {
                if *constructed {
                    let children = decode_children(tlv, "context-specific")?;
                    Ok(Element::ContextSpecific {
                        slot: *slot,
                        constructed: true,
                        element: Box::new(Element::Sequence(children)),
                    })
                } else {
                    // IMPLICIT primitive: the schema above decides how to read it.
                    let data = tlv.data().unwrap_or_default();
                    Ok(Element::ContextSpecific {
                        slot: *slot,
                        constructed: false,
                        element: Box::new(Element::OctetString(OctetString::from(data))),
                    })
                }
            }
        }
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Element::Boolean(b) => write!(f, "Boolean({})", b),
            Element::Integer(i) => write!(f, "Integer({})", i),
            Element::Enumerated(i) => write!(f, "Enumerated({})", i),
            Element::BitString(bs) => write!(f, "BitString({})", bs),
            Element::OctetString(os) => write!(f, "OctetString({})", os),
            Element::Null => write!(f, "Null"),
            Element::ObjectIdentifier(oid) => write!(f, "ObjectIdentifier({})", oid),
            Element::UTF8String(s) => write!(f, "UTF8String({})", s),
            Element::Sequence(seq) => write!(f, "Sequence({:?})", seq),
            Element::Set(set) => write!(f, "Set({:?})", set),
            Element::PrintableString(s) => write!(f, "PrintableString({})", s),
            Element::IA5String(s) => write!(f, "IA5String({})", s),
            Element::BMPString(s) => write!(f, "BMPString({})", s),
            Element::UTCTime(dt) => write!(f, "UTCTime({})", dt),
            Element::GeneralizedTime(dt) => write!(f, "GeneralizedTime({})", dt),
            Element::ContextSpecific {
                slot,
                constructed,
                element,
            } => {
                write!(
                    f,
                    "ContextSpecific(slot: {}, constructed: {}, element: {})",
                    slot, constructed, element
                )
            }
            Element::Unimplemented(tlv) => write!(f, "Unimplemented({:?})", tlv),
        }
    }
}

impl TryFrom<&Element> for Tlv {
    type Error = Error;

    fn try_from(element: &Element) -> Result<Self, Self::Error> {
        let primitive = |tag: PrimitiveTag, data: Vec<u8>| Tlv::new_primitive(Tag::universal(tag), data);
        let constructed = |tag: PrimitiveTag, elements: &[Element]| -> Result<Tlv, Error> {
            let tlvs = elements
                .iter()
                .map(Tlv::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Tlv::new_constructed(Tag::universal(tag), tlvs))
        };

        match element {
            Element::Boolean(b) => Ok(primitive(
                PrimitiveTag::Boolean,
                vec![if *b { 0xff } else { 0x00 }],
            )),
            Element::Integer(i) => Ok(primitive(PrimitiveTag::Integer, i.to_signed_bytes_be())),
            Element::Enumerated(i) => {
                Ok(primitive(PrimitiveTag::Enumerated, i.to_signed_bytes_be()))
            }
            Element::BitString(bs) => Ok(primitive(PrimitiveTag::BitString, Vec::from(bs))),
            Element::OctetString(os) => {
                Ok(primitive(PrimitiveTag::OctetString, os.as_bytes().to_vec()))
            }
            Element::Null => Ok(primitive(PrimitiveTag::Null, vec![])),
            Element::ObjectIdentifier(oid) => {
                Ok(primitive(PrimitiveTag::ObjectIdentifier, Vec::try_from(oid)?))
            }
            Element::UTF8String(s) => Ok(primitive(PrimitiveTag::UTF8String, s.as_bytes().to_vec())),
            Element::Sequence(elements) => constructed(PrimitiveTag::Sequence, elements),
            Element::Set(elements) => constructed(PrimitiveTag::Set, elements),
            Element::PrintableString(s) => Ok(primitive(
                PrimitiveTag::PrintableString,
                s.as_bytes().to_vec(),
            )),
            Element::IA5String(s) => Ok(primitive(PrimitiveTag::IA5String, s.as_bytes().to_vec())),
            Element::BMPString(s) => Ok(primitive(PrimitiveTag::BMPString, encode_bmp_string(s)?)),
            Element::UTCTime(dt) => {
                let time_str = dt.format("%y%m%d%H%M%SZ").to_string();
                Ok(primitive(PrimitiveTag::UTCTime, time_str.into_bytes()))
            }
            Element::GeneralizedTime(dt) => {
                let time_str = dt.format("%Y%m%d%H%M%SZ").to_string();
                Ok(primitive(PrimitiveTag::GeneralizedTime, time_str.into_bytes()))
            }
            Element::ContextSpecific {
                slot,
                constructed,
                element,
            } => {
                let tag = Tag::ContextSpecific {
                    slot: *slot,
                    constructed: *constructed,
                };

                if *constructed {
                    let tlvs = match element.as_ref() {
                        Element::Sequence(children) => children
                            .iter()
                            .map(Tlv::try_from)
                            .collect::<Result<Vec<_>, _>>()?,
                        other => vec![Tlv::try_from(other)?],
                    };
                    Ok(Tlv::new_constructed(tag, tlvs))
                } else {
                    match element.as_ref() {
                        Element::OctetString(os) => {
                            Ok(Tlv::new_primitive(tag, os.as_bytes().to_vec()))
                        }
                        other => {
                            let inner = Tlv::try_from(other)?;
                            match inner.data() {
                                Some(data) => Ok(Tlv::new_primitive(tag, data.to_vec())),
                                None => Err(Error::InvalidContextSpecific {
                                    slot: *slot,
                                    msg: "IMPLICIT primitive tagging requires a primitive inner element",
                                }),
                            }
                        }
                    }
                }
            }
            Element::Unimplemented(tlv) => Ok(tlv.clone()),
        }
    }
}

impl EncodableTo<Element> for Tlv {}

impl Encoder<Element, Tlv> for Element {
    type Error = Error;

    fn encode(&self) -> Result<Tlv, Self::Error> {
        Tlv::try_from(self)
    }
}

// ASN1 integer is possible to be a positive and negative value.
// This can be arbitrary sized values.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Integer {
    inner: BigInt,
}

impl Integer {
    /// Returns a reference to the inner BigInt
    pub fn as_bigint(&self) -> &BigInt {
        &self.inner
    }

    /// Minimal two's complement big-endian encoding.
    pub fn to_signed_bytes_be(&self) -> Vec<u8> {
        self.inner.to_signed_bytes_be()
    }

    pub fn to_u32(&self) -> Option<u32> {
        self.inner.to_u32()
    }

    pub fn to_i32(&self) -> Option<i32> {
        self.inner.to_i32()
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.inner.to_i64()
    }

    pub fn to_u64(&self) -> Option<u64> {
        self.inner.to_u64()
    }
}

impl Serialize for Integer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.inner.to_string())
    }
}

impl<'de> Deserialize<'de> for Integer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let inner = s.parse::<BigInt>().map_err(serde::de::Error::custom)?;
        Ok(Integer { inner })
    }
}

impl From<&[u8]> for Integer {
    fn from(value: &[u8]) -> Self {
        Integer {
            inner: BigInt::from_signed_bytes_be(value),
        }
    }
}

impl From<BigInt> for Integer {
    fn from(inner: BigInt) -> Self {
        Integer { inner }
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Integer {
            inner: BigInt::from(value),
        }
    }
}

impl From<u32> for Integer {
    fn from(value: u32) -> Self {
        Integer {
            inner: BigInt::from(value),
        }
    }
}

impl Display for Integer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectIdentifier {
    inner: Vec<u64>,
}

impl ObjectIdentifier {
    pub fn arcs(&self) -> &[u64] {
        &self.inner
    }
}

impl Serialize for ObjectIdentifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ObjectIdentifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ObjectIdentifier::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl TryFrom<&[u8]> for ObjectIdentifier {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(Error::ObjectIdentifierNoData);
        }

        let mut subidentifiers = Vec::new();
        let mut val = 0u64;
        let mut pending = false;
        for v in value {
            if val > (u64::MAX >> 7) {
                return Err(Error::ObjectIdentifierArcOverflow);
            }
            val = (val << 7) | (*v as u64 & 0x7f);
            pending = true;
            if *v & 0x80 == 0 {
                subidentifiers.push(val);
                val = 0;
                pending = false;
            }
        }
        if pending {
            return Err(Error::ObjectIdentifierIncompleteEncoding);
        }

        // The first subidentifier packs the first two arcs.
        let mut inner = Vec::with_capacity(subidentifiers.len() + 1);
        match subidentifiers.first() {
            Some(&first) if first < 40 => inner.extend([0, first]),
            Some(&first) if first < 80 => inner.extend([1, first - 40]),
            Some(&first) => inner.extend([2, first - 80]),
            None => return Err(Error::ObjectIdentifierIncompleteEncoding),
        }
        inner.extend_from_slice(&subidentifiers[1..]);

        Ok(ObjectIdentifier { inner })
    }
}

impl TryFrom<&ObjectIdentifier> for Vec<u8> {
    type Error = Error;

    fn try_from(oid: &ObjectIdentifier) -> Result<Self, Self::Error> {
        let [first, second, rest @ ..] = oid.inner.as_slice() else {
            return Err(Error::ObjectIdentifierTooFewComponents);
        };
        if *first > 2 || (*first < 2 && *second >= 40) {
            return Err(Error::ObjectIdentifierInvalidComponent(oid.to_string()));
        }
        let head = (first * 40)
            .checked_add(*second)
            .ok_or(Error::ObjectIdentifierArcOverflow)?;

        let mut result = Vec::new();
        for arc in std::iter::once(&head).chain(rest) {
            encode_base128(*arc, &mut result);
        }
        Ok(result)
    }
}

fn encode_base128(mut value: u64, out: &mut Vec<u8>) {
    let mut buf = [0u8; 10];
    let mut start = buf.len();
    loop {
        start -= 1;
        buf[start] = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            break;
        }
    }
    let last = buf.len() - 1;
    for b in &mut buf[start..last] {
        *b |= 0x80;
    }
    out.extend_from_slice(&buf[start..]);
}

impl Display for ObjectIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self
            .inner
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{}", s)
    }
}

impl FromStr for ObjectIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(Error::ObjectIdentifierEmptyString);
        }
        let inner = s
            .split('.')
            .map(|c| {
                c.parse::<u64>()
                    .map_err(|_| Error::ObjectIdentifierInvalidComponent(c.to_string()))
            })
            .collect::<Result<Vec<u64>, Error>>()?;
        if inner.len() < 2 {
            return Err(Error::ObjectIdentifierTooFewComponents);
        }
        Ok(ObjectIdentifier { inner })
    }
}

impl PartialEq<&str> for ObjectIdentifier {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

impl PartialEq<ObjectIdentifier> for &str {
    fn eq(&self, other: &ObjectIdentifier) -> bool {
        *self == other.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BitString {
    unused: u8,
    data: Vec<u8>,
}

impl BitString {
    /// Creates a new BitString with the specified number of unused bits and data
    pub fn new(unused: u8, data: Vec<u8>) -> Self {
        BitString { unused, data }
    }

    /// Returns the number of unused bits in the last byte
    pub fn unused_bits(&self) -> u8 {
        self.unused
    }

    /// Returns a reference to the underlying byte data
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns the total number of bits (excluding unused bits)
    pub fn bit_len(&self) -> usize {
        if self.data.is_empty() {
            0
        } else {
            self.data.len() * 8 - self.unused as usize
        }
    }
}

impl AsRef<[u8]> for BitString {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl TryFrom<&[u8]> for BitString {
    type Error = Error;
    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        match value.split_first() {
            Some((&unused, _)) if unused > 7 => Err(Error::BitStringUnusedBitsOutOfRange(unused)),
            Some((&unused, data)) => Ok(BitString {
                unused,
                data: data.to_vec(),
            }),
            None => Err(Error::BitStringNoData),
        }
    }
}

impl From<&BitString> for Vec<u8> {
    fn from(value: &BitString) -> Self {
        let mut result = Vec::with_capacity(value.data.len() + 1);
        result.push(value.unused);
        result.extend_from_slice(&value.data);
        result
    }
}

impl Display for BitString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bits = self
            .data
            .iter()
            .map(|b| format!("{:08b}", b))
            .collect::<String>();
        write!(f, "{}", &bits[..self.bit_len()])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OctetString {
    inner: Vec<u8>,
}

impl Serialize for OctetString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            // Serialize as hex string for human-readable formats (JSON, YAML, etc.)
            serializer.serialize_str(&self.to_string())
        } else {
            self.inner.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for OctetString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let hex_string = String::deserialize(deserializer)?;
            let cleaned =
                hex_string.replace(|c: char| c.is_whitespace() || c == ':' || c == '-', "");
            if cleaned.len() % 2 != 0 {
                return Err(serde::de::Error::custom("hex string must have even length"));
            }
            let inner = (0..cleaned.len())
                .step_by(2)
                .map(|i| {
                    u8::from_str_radix(&cleaned[i..i + 2], 16)
                        .map_err(|e| serde::de::Error::custom(format!("invalid hex string: {}", e)))
                })
                .collect::<Result<Vec<u8>, _>>()?;
            Ok(OctetString { inner })
        } else {
            let inner = Vec::<u8>::deserialize(deserializer)?;
            Ok(OctetString { inner })
        }
    }
}

impl OctetString {
    /// Returns the inner bytes as a slice
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }

    /// Consumes self and returns the inner bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.inner
    }
}

impl TryFrom<&OctetString> for ASN1Object {
    type Error = Error;

    fn try_from(value: &OctetString) -> Result<Self, Self::Error> {
        let der: Der = value.as_bytes().decode().map_err(Error::FailedToDecodeDer)?;
        der.decode()
    }
}

impl AsRef<[u8]> for OctetString {
    fn as_ref(&self) -> &[u8] {
        &self.inner
    }
}

impl From<Vec<u8>> for OctetString {
    fn from(value: Vec<u8>) -> Self {
        OctetString { inner: value }
    }
}

impl From<&[u8]> for OctetString {
    fn from(value: &[u8]) -> Self {
        OctetString {
            inner: value.to_vec(),
        }
    }
}

impl Display for OctetString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self
            .inner
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<String>();
        write!(f, "{}", s)
    }
}

fn decode_bmp_string(data: &[u8]) -> Result<String, Error> {
    if data.len() % 2 != 0 {
        return Err(Error::BmpStringOddLength(data.len()));
    }
    data.chunks_exact(2)
        .enumerate()
        .map(|(position, pair)| {
            let code_point = u16::from_be_bytes([pair[0], pair[1]]);
            char::from_u32(code_point as u32)
                .ok_or(Error::BmpStringInvalidCodePoint {
                    position,
                    code_point,
                })
        })
        .collect()
}

fn encode_bmp_string(s: &str) -> Result<Vec<u8>, Error> {
    s.chars()
        .map(|c| {
            u16::try_from(c as u32)
                .map(u16::to_be_bytes)
                .map_err(|_| Error::BmpStringRequiresSurrogatePair)
        })
        .collect::<Result<Vec<_>, _>>()
        .map(|pairs| pairs.concat())
}

fn parse_utc_time(data: &[u8]) -> Result<NaiveDateTime, Error> {
    let s = std::str::from_utf8(data).map_err(|_| Error::UtcTimeInvalidFormat)?;
    NaiveDateTime::parse_from_str(s, "%y%m%d%H%M%SZ").map_err(|_| Error::UtcTimeInvalidFormat)
}

fn parse_generalized_time(data: &[u8]) -> Result<NaiveDateTime, Error> {
    let s = std::str::from_utf8(data).map_err(|_| Error::GeneralizedTimeInvalidFormat)?;
    NaiveDateTime::parse_from_str(s, "%Y%m%d%H%M%SZ")
        .map_err(|_| Error::GeneralizedTimeInvalidFormat)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;
    use rstest::rstest;
    use std::str::FromStr;

    use super::*;

    #[rstest(input, expected, case(vec![0x01], "1"), case(vec![0xff], "-1"), case(vec![0x00, 0x80], "128"), case(vec![0x03, 0xd4, 0x15, 0x31, 0x8e, 0x2c, 0x57, 0x1d, 0x29, 0x05, 0xfc, 0x3e, 0x05, 0x27, 0x68, 0x9d, 0x0d, 0x09], "333504890676592408951587385614406537514249"))]
    fn test_parse_element_integer(input: Vec<u8>, expected: &str) {
        let expected_num = Integer {
            inner: BigInt::from_str(expected).unwrap(),
        };

        let value = Integer::from(input.as_slice());

        assert_eq!(expected_num, value);
        assert_eq!(input, value.to_signed_bytes_be());
    }

    #[rstest(
        input,
        expected_json,
        case(Integer::from(0i64), r#""0""#),
        case(Integer::from(255i64), r#""255""#),
        case(Integer::from(-1i64), r#""-1""#),
    )]
    fn test_integer_serialize(input: Integer, expected_json: &str) {
        let json = serde_json::to_string(&input).unwrap();
        assert_eq!(expected_json, json);

        let back: Integer = serde_json::from_str(&json).unwrap();
        assert_eq!(input, back);
    }

    #[rstest(input, expected,
        // ISO/ITU-T joint standards (1.2)
        case(vec![0x2a], "1.2"),
        case(vec![0x2b, 0x06, 0x01, 0x04, 0x01], "1.3.6.1.4.1"),
        case(vec![0x09, 0x92, 0x26, 0x89, 0x93, 0xf2, 0x2c, 0x64, 0x01, 0x01], "0.9.2342.19200300.100.1.1"),
        case(vec![0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x05], "1.2.840.113549.1.1.5"),
        // anyPolicy has a zero arc
        case(vec![0x55, 0x1d, 0x20, 0x00], "2.5.29.32.0"),
        // second arc above 47 under joint-iso-itu-t
        case(vec![0x88, 0x37, 0x01], "2.999.1"),
    )]
    fn test_object_identifier_bytes(input: Vec<u8>, expected: &str) {
        let oid = ObjectIdentifier::try_from(input.as_slice()).unwrap();
        assert_eq!(oid.to_string(), expected);
        assert_eq!(oid, ObjectIdentifier::from_str(expected).unwrap());
        assert_eq!(Vec::<u8>::try_from(&oid).unwrap(), input);
    }

    #[rstest(input,
        case(""),
        case("1"),
        case("1.x.3"),
    )]
    fn test_object_identifier_from_str_rejects(input: &str) {
        assert!(ObjectIdentifier::from_str(input).is_err());
    }

    #[test]
    fn test_object_identifier_incomplete_encoding() {
        let result = ObjectIdentifier::try_from([0x2a, 0x86].as_slice());
        assert!(matches!(result, Err(Error::ObjectIdentifierIncompleteEncoding)));
    }

    #[test]
    fn test_object_identifier_serde() {
        let oid = ObjectIdentifier::from_str("1.3.6.1.5.5.7.48.1").unwrap();
        let json = serde_json::to_string(&oid).unwrap();
        assert_eq!(json, r#""1.3.6.1.5.5.7.48.1""#);
        let back: ObjectIdentifier = serde_json::from_str(&json).unwrap();
        assert_eq!(oid, back);
    }

    #[rstest(input, expected,
        case(BitString { unused: 0, data: vec![0b10101010] }, "10101010"),
        case(BitString { unused: 2, data: vec![0b10101010, 0b11001100] }, "10101010110011"),
        case(BitString { unused: 0, data: vec![] }, ""),
        case(BitString { unused: 4, data: vec![0b10100000] }, "1010"),
    )]
    fn test_bitstring_to_string(input: BitString, expected: &str) {
        assert_eq!(expected, input.to_string());
    }

    #[test]
    fn test_bitstring_rejects_unused_bits_over_seven() {
        let result = BitString::try_from([0x08, 0xff].as_slice());
        assert!(matches!(result, Err(Error::BitStringUnusedBitsOutOfRange(8))));
    }

    #[rstest(input, expected_json,
        case(OctetString { inner: vec![] }, r#""""#),
        case(OctetString { inner: vec![0x01, 0x02, 0x03] }, r#""010203""#),
        case(OctetString { inner: vec![0xff, 0xab, 0xcd] }, r#""ffabcd""#),
    )]
    fn test_octetstring_serialize(input: OctetString, expected_json: &str) {
        let json = serde_json::to_string(&input).unwrap();
        assert_eq!(json, expected_json);
        let back: OctetString = serde_json::from_str(&json).unwrap();
        assert_eq!(input, back);
    }

    const UTC_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
    #[rstest(input, expected,
        case(b"191216030210Z".to_vec(), NaiveDateTime::parse_from_str("2019-12-16 03:02:10", UTC_TIME_FORMAT).unwrap()),
        case(b"190929163336Z".to_vec(), NaiveDateTime::parse_from_str("2019-09-29 16:33:36", UTC_TIME_FORMAT).unwrap())
    )]
    fn test_parse_der_to_utc_time(input: Vec<u8>, expected: NaiveDateTime) {
        assert_eq!(expected, parse_utc_time(&input).unwrap());
    }

    #[test]
    fn test_parse_der_to_generalized_time() {
        let expected = NaiveDateTime::parse_from_str("2019-12-28 16:33:36", UTC_TIME_FORMAT).unwrap();
        assert_eq!(expected, parse_generalized_time(b"20191228163336Z").unwrap());
    }

    #[rstest(input, expected,
        case(vec![0x01, 0x01, 0xff], Element::Boolean(true)),
        case(vec![0x02, 0x01, 0x05], Element::Integer(Integer::from(5i64))),
        case(vec![0x0a, 0x01, 0x01], Element::Enumerated(Integer::from(1i64))),
        case(vec![0x04, 0x02, 0xde, 0xad], Element::OctetString(OctetString::from(vec![0xde, 0xad]))),
        case(vec![0x05, 0x00], Element::Null),
        case(vec![0x06, 0x03, 0x55, 0x1d, 0x0e], Element::ObjectIdentifier(ObjectIdentifier::from_str("2.5.29.14").unwrap())),
        case(vec![0x13, 0x02, 0x4a, 0x50], Element::PrintableString("JP".to_string())),
        case(vec![0x16, 0x01, 0x61], Element::IA5String("a".to_string())),
        case(vec![0x1e, 0x04, 0x00, 0x41, 0x00, 0x42], Element::BMPString("AB".to_string())),
        case(vec![0x30, 0x03, 0x02, 0x01, 0x01], Element::Sequence(vec![Element::Integer(Integer::from(1i64))])),
        case(vec![0x31, 0x00], Element::Set(vec![])),
        case(vec![0x82, 0x01, 0x61], Element::ContextSpecific { slot: 2, constructed: false, element: Box::new(Element::OctetString(OctetString::from(vec![0x61]))) }),
        case(vec![0xa0, 0x03, 0x02, 0x01, 0x01], Element::explicit(0, Element::Integer(Integer::from(1i64)))),
    )]
    fn test_element_der_roundtrip(input: Vec<u8>, expected: Element) {
        let element = Element::from_der(&input).unwrap();
        assert_eq!(expected, element);
        assert_eq!(input, element.to_der().unwrap());
    }

    #[test]
    fn test_element_from_der_rejects_multiple_values() {
        let result = Element::from_der(&[0x05, 0x00, 0x05, 0x00]);
        assert!(matches!(result, Err(Error::ExpectedSingleElement(2))));
    }

    #[test]
    fn test_element_rejects_non_ascii_ia5_string() {
        let result = Element::from_der(&[0x16, 0x01, 0xe9]);
        assert!(matches!(result, Err(Error::Ia5StringInvalidEncoding)));
    }

    #[test]
    fn test_implicit_replaces_universal_tag() {
        let uri = Element::IA5String("http://a.b".to_string());
        let tagged = Element::implicit(6, &uri).unwrap();
        let bytes = tagged.to_der().unwrap();
        assert_eq!(bytes[0], 0x86);
        assert_eq!(&bytes[2..], b"http://a.b");

        assert_eq!(tagged.untag(PrimitiveTag::IA5String).unwrap(), uri);
    }

    #[test]
    fn test_implicit_sequence_keeps_members() {
        let seq = Element::Sequence(vec![
            Element::Integer(Integer::from(1i64)),
            Element::Integer(Integer::from(2i64)),
        ]);
        let tagged = Element::implicit(0, &seq).unwrap();
        assert_eq!(
            tagged.to_der().unwrap(),
            vec![0xa0, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x02]
        );
        assert_eq!(tagged.untag(PrimitiveTag::Sequence).unwrap(), seq);

        let set = tagged.untag(PrimitiveTag::Set).unwrap();
        assert!(matches!(set, Element::Set(ref members) if members.len() == 2));
    }

    #[test]
    fn test_untag_rejects_form_mismatch() {
        let primitive = Element::implicit(1, &Element::Integer(Integer::from(3i64))).unwrap();
        assert!(primitive.untag(PrimitiveTag::Sequence).is_err());

        let constructed = Element::explicit(1, Element::Null);
        assert!(constructed.untag(PrimitiveTag::Integer).is_err());

        assert!(matches!(
            Element::Null.untag(PrimitiveTag::Null),
            Err(Error::ExpectedContextSpecific)
        ));
    }

    #[test]
    fn test_explicit_inner() {
        let inner = Element::UTF8String("x".to_string());
        let tagged = Element::explicit(0, inner.clone());
        assert_eq!(tagged.explicit_inner(), Some(&inner));

        let two = Element::ContextSpecific {
            slot: 0,
            constructed: true,
            element: Box::new(Element::Sequence(vec![Element::Null, Element::Null])),
        };
        assert_eq!(two.explicit_inner(), None);
    }

    #[test]
    fn test_asn1_object_encode_decode() {
        let object = ASN1Object::new(vec![
            Element::Integer(Integer::from(7i64)),
            Element::OctetString(OctetString::from(vec![0x01])),
        ]);
        let der: Der = object.encode().unwrap();
        let bytes: Vec<u8> = der.encode().unwrap();
        assert_eq!(bytes, vec![0x02, 0x01, 0x07, 0x04, 0x01, 0x01]);

        let decoded = ASN1Object::try_from(&OctetString::from(bytes)).unwrap();
        assert_eq!(decoded.elements(), object.elements());
    }
}
