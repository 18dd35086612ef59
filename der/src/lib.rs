use codec::decoder::{DecodableFrom, Decoder};
use codec::encoder::{EncodableTo, Encoder};
use nom::{IResult, Parser};

pub mod error;

use error::Error;

pub const TAG_CONSTRUCTED: u8 = 0x20;
pub const TAG_CONTEXT_SPECIFIC: u8 = 0x80;

const TAG_CLASS_MASK: u8 = 0xc0;
const TAG_NUMBER_MASK: u8 = 0x1f;

/// A sequence of top-level TLVs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Der {
    elements: Vec<Tlv>,
}

impl Der {
    pub fn new(elements: Vec<Tlv>) -> Self {
        Der { elements }
    }

    pub fn elements(&self) -> &[Tlv] {
        &self.elements
    }
}

impl<'a> DecodableFrom<&'a [u8]> for Der {}

impl<'a> Decoder<&'a [u8], Der> for &'a [u8] {
    type Error = Error;

    fn decode(&self) -> Result<Der, Self::Error> {
        let mut input: &[u8] = self;
        let mut elements = Vec::new();
        while !input.is_empty() {
            let (rest, tlv) = Tlv::parse(input)?;
            elements.push(tlv);
            input = rest;
        }
        Ok(Der { elements })
    }
}

impl DecodableFrom<Vec<u8>> for Der {}

impl Decoder<Vec<u8>, Der> for Vec<u8> {
    type Error = Error;

    fn decode(&self) -> Result<Der, Self::Error> {
        self.as_slice().decode()
    }
}

impl EncodableTo<Der> for Vec<u8> {}

impl Encoder<Der, Vec<u8>> for Der {
    type Error = Error;

    fn encode(&self) -> Result<Vec<u8>, Self::Error> {
        let mut out = Vec::new();
        for tlv in &self.elements {
            tlv.write(&mut out);
        }
        Ok(out)
    }
}

/// Universal class tag numbers understood by the `asn1` layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTag {
    Boolean,
    Integer,
    BitString,
    OctetString,
    Null,
    ObjectIdentifier,
    Enumerated,
    UTF8String,
    Sequence,
    Set,
    PrintableString,
    IA5String,
    UTCTime,
    GeneralizedTime,
    BMPString,
    Unimplemented(u8),
}

impl From<u8> for PrimitiveTag {
    fn from(number: u8) -> Self {
        match number {
            0x01 => Self::Boolean,
            0x02 => Self::Integer,
            0x03 => Self::BitString,
            0x04 => Self::OctetString,
            0x05 => Self::Null,
            0x06 => Self::ObjectIdentifier,
            0x0a => Self::Enumerated,
            0x0c => Self::UTF8String,
            0x10 => Self::Sequence,
            0x11 => Self::Set,
            0x13 => Self::PrintableString,
            0x16 => Self::IA5String,
            0x17 => Self::UTCTime,
            0x18 => Self::GeneralizedTime,
            0x1e => Self::BMPString,
            _ => Self::Unimplemented(number),
        }
    }
}

impl From<&PrimitiveTag> for u8 {
    fn from(tag: &PrimitiveTag) -> Self {
        match tag {
            PrimitiveTag::Boolean => 0x01,
            PrimitiveTag::Integer => 0x02,
            PrimitiveTag::BitString => 0x03,
            PrimitiveTag::OctetString => 0x04,
            PrimitiveTag::Null => 0x05,
            PrimitiveTag::ObjectIdentifier => 0x06,
            PrimitiveTag::Enumerated => 0x0a,
            PrimitiveTag::UTF8String => 0x0c,
            PrimitiveTag::Sequence => 0x10,
            PrimitiveTag::Set => 0x11,
            PrimitiveTag::PrintableString => 0x13,
            PrimitiveTag::IA5String => 0x16,
            PrimitiveTag::UTCTime => 0x17,
            PrimitiveTag::GeneralizedTime => 0x18,
            PrimitiveTag::BMPString => 0x1e,
            PrimitiveTag::Unimplemented(number) => *number,
        }
    }
}

/// Identifier octet of a TLV.
///
/// `Primitive` carries universal (and, as `Unimplemented`, application and
/// private) class tags together with the raw identifier octet, so the
/// constructed bit survives a round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Primitive(PrimitiveTag, u8),
    ContextSpecific { slot: u8, constructed: bool },
}

impl Tag {
    /// Tag for a universal type, with the constructed bit set for SEQUENCE and SET.
    pub fn universal(tag: PrimitiveTag) -> Self {
        let number = u8::from(&tag);
        match tag {
            PrimitiveTag::Sequence | PrimitiveTag::Set => {
                Tag::Primitive(tag, number | TAG_CONSTRUCTED)
            }
            _ => Tag::Primitive(tag, number),
        }
    }

    pub fn is_constructed(&self) -> bool {
        match self {
            Tag::Primitive(_, raw) => raw & TAG_CONSTRUCTED == TAG_CONSTRUCTED,
            Tag::ContextSpecific { constructed, .. } => *constructed,
        }
    }

    pub fn to_byte(&self) -> u8 {
        match self {
            Tag::Primitive(_, raw) => *raw,
            Tag::ContextSpecific { slot, constructed } => {
                let constructed = if *constructed { TAG_CONSTRUCTED } else { 0 };
                TAG_CONTEXT_SPECIFIC | constructed | (slot & TAG_NUMBER_MASK)
            }
        }
    }
}

impl From<u8> for Tag {
    fn from(raw: u8) -> Self {
        match raw & TAG_CLASS_MASK {
            0x00 => Tag::Primitive(PrimitiveTag::from(raw & TAG_NUMBER_MASK), raw),
            TAG_CONTEXT_SPECIFIC => Tag::ContextSpecific {
                slot: raw & TAG_NUMBER_MASK,
                constructed: raw & TAG_CONSTRUCTED == TAG_CONSTRUCTED,
            },
            _ => Tag::Primitive(PrimitiveTag::Unimplemented(raw), raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tlv {
    tag: Tag,
    length: usize,
    value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Value {
    Tlv(Vec<Tlv>),
    Data(Vec<u8>),
}

impl Tlv {
    pub fn new_primitive(tag: Tag, data: Vec<u8>) -> Self {
        Tlv {
            tag,
            length: data.len(),
            value: Value::Data(data),
        }
    }

    pub fn new_constructed(tag: Tag, tlvs: Vec<Tlv>) -> Self {
        let length = tlvs.iter().map(Tlv::encoded_len).sum();
        Tlv {
            tag,
            length,
            value: Value::Tlv(tlvs),
        }
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// Length of the contents octets.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Contents of a primitive TLV.
    pub fn data(&self) -> Option<&[u8]> {
        match &self.value {
            Value::Data(data) => Some(data),
            Value::Tlv(_) => None,
        }
    }

    /// Children of a constructed TLV.
    pub fn tlvs(&self) -> Option<&[Tlv]> {
        match &self.value {
            Value::Tlv(tlvs) => Some(tlvs),
            Value::Data(_) => None,
        }
    }

    /// Contents octets regardless of form.
    pub fn contents(&self) -> Vec<u8> {
        match &self.value {
            Value::Data(data) => data.clone(),
            Value::Tlv(tlvs) => {
                let mut out = Vec::with_capacity(self.length);
                for tlv in tlvs {
                    tlv.write(&mut out);
                }
                out
            }
        }
    }

    pub fn encoded_len(&self) -> usize {
        1 + length_octets(self.length) + self.length
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.write(&mut out);
        out
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.push(self.tag.to_byte());
        write_length(self.length, out);
        match &self.value {
            Value::Data(data) => out.extend_from_slice(data),
            Value::Tlv(tlvs) => {
                for tlv in tlvs {
                    tlv.write(out);
                }
            }
        }
    }

    fn parse(input: &[u8]) -> IResult<&[u8], Tlv, Error> {
        let (input, tag) = parse_tag(input)?;
        let (input, length) = parse_length(input)?;
        let (input, data) = nom::bytes::complete::take::<_, _, Error>(length).parse(input)?;

        if tag.is_constructed() {
            // parse TLV recursively.
            let mut tlvs = Vec::new();
            let mut data = data;
            while !data.is_empty() {
                let (rest, v) = Self::parse(data)?;
                data = rest;
                tlvs.push(v);
            }

            return Ok((
                input,
                Tlv {
                    tag,
                    length,
                    value: Value::Tlv(tlvs),
                },
            ));
        }

        Ok((
            input,
            Tlv {
                tag,
                length,
                value: Value::Data(data.to_vec()),
            },
        ))
    }
}

fn parse_tag(input: &[u8]) -> IResult<&[u8], Tag, Error> {
    let (input, n) = nom::number::complete::be_u8::<_, Error>(input)?;
    if n & TAG_NUMBER_MASK == TAG_NUMBER_MASK {
        return Err(nom::Err::Failure(Error::UnsupportedHighTag(n)));
    }
    Ok((input, Tag::from(n)))
}

fn parse_length(input: &[u8]) -> IResult<&[u8], usize, Error> {
    let (input, n) = nom::number::complete::be_u8::<_, Error>(input)?;
    if n == 0x80 {
        return Err(nom::Err::Failure(Error::IndefiniteLength));
    }
    if n & 0x80 == 0x80 {
        // long form
        // The low 7 bits give the number of length octets that follow.
        let octets = (n & 0x7f) as usize;
        if octets > std::mem::size_of::<usize>() {
            return Err(nom::Err::Failure(Error::LengthTooLarge(octets)));
        }
        let (input, bs) = nom::bytes::complete::take::<_, _, Error>(octets).parse(input)?;
        let length = bs.iter().fold(0usize, |n, &b| (n << 8) | b as usize);
        return Ok((input, length));
    }
    // short form: 0-127
    Ok((input, n as usize))
}

fn length_octets(length: usize) -> usize {
    if length < 0x80 {
        1
    } else {
        1 + (usize::BITS as usize / 8 - length.leading_zeros() as usize / 8)
    }
}

fn write_length(length: usize, out: &mut Vec<u8>) {
    if length < 0x80 {
        out.push(length as u8);
        return;
    }
    let bytes = length.to_be_bytes();
    let skip = length.leading_zeros() as usize / 8;
    out.push(0x80 | (bytes.len() - skip) as u8);
    out.extend_from_slice(&bytes[skip..]);
}
