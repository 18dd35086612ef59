//! Encoder trait, the reverse direction of [`crate::decoder::Decoder`].
//!
//! `Encoder<T, E>` is implemented on the source type `T` and produces `E`;
//! `EncodableTo<T>` marks `E` as a valid output for `T`.

/// Encoder trait for converting a `T` into an `E`.
pub trait Encoder<T, E: EncodableTo<T>> {
    /// The error type returned when encoding fails.
    type Error;

    /// Encodes `self` into type `E`.
    ///
    /// # Errors
    ///
    /// Returns an error if `self` holds a value that has no valid encoding.
    fn encode(&self) -> Result<E, Self::Error>;
}

/// Marker trait indicating that `Self` is an encoding of `T`.
pub trait EncodableTo<T> {}
