//! Decoder trait for type-safe conversions.
//!
//! The decoder uses a two-trait pattern:
//!
//! 1. `Decoder<T, D>` performs the conversion and is implemented on the
//!    source type.
//! 2. `DecodableFrom<T>` is a marker on the destination type that states the
//!    conversion is allowed.
//!
//! ```no_run
//! use codec::decoder::{DecodableFrom, Decoder};
//!
//! struct Raw(Vec<u8>);
//! struct Text(String);
//!
//! #[derive(Debug)]
//! struct InvalidText;
//!
//! impl DecodableFrom<Raw> for Text {}
//!
//! impl Decoder<Raw, Text> for Raw {
//!     type Error = InvalidText;
//!
//!     fn decode(&self) -> Result<Text, Self::Error> {
//!         String::from_utf8(self.0.clone()).map(Text).map_err(|_| InvalidText)
//!     }
//! }
//! ```

/// Decoder trait for converting from type `T` to type `D`.
///
/// `T` is usually `Self`. When several destinations are decodable from the
/// same source, the destination is picked by type annotation at the call
/// site:
///
/// ```ignore
/// let names: GeneralNames = element.decode()?;
/// ```
pub trait Decoder<T, D: DecodableFrom<T>> {
    /// The error type returned when decoding fails.
    type Error;

    /// Decodes `self` into type `D`.
    ///
    /// # Errors
    ///
    /// Returns an error if `self` is not a valid representation of `D`.
    fn decode(&self) -> Result<D, Self::Error>;
}

/// Marker trait indicating that type `D` can be decoded from type `T`.
pub trait DecodableFrom<T> {}
