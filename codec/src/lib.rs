//! # codec
//!
//! Core conversion traits shared by the `der`, `asn1`, `pkix-types` and
//! `x509-ext` crates.
//!
//! ## Overview
//!
//! Every layer converts to the next one through the same pair of traits:
//! ```text
//! Vec<u8> → Der → ASN1Object / Element → GeneralName, GeneralNames, ...
//! ```
//!
//! `Decoder` walks the chain left to right and `Encoder` walks it back.
//! The marker traits `DecodableFrom` and `EncodableTo` restrict which pairs
//! are valid, so an unsupported conversion is a compile error rather than a
//! runtime failure.
//!
//! ## Example
//!
//! ```ignore
//! use codec::decoder::Decoder;
//! use codec::encoder::Encoder;
//!
//! let bytes = vec![0x30, 0x00];
//! let der: der::Der = bytes.decode().unwrap();
//! let asn1: asn1::ASN1Object = der.decode().unwrap();
//!
//! let der: der::Der = asn1.encode().unwrap();
//! let bytes: Vec<u8> = der.encode().unwrap();
//! ```

#![forbid(unsafe_code)]

pub mod decoder;
pub mod encoder;
