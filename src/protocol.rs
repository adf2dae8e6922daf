use nom::Finish;
use thiserror::Error;

use crate::parser::pix_payload;

/// Reasons a [`PixCharge`] cannot be serialized into a payload.
///
/// Encoding is a pure leaf computation: it either returns the complete
/// payload string or fails with one of these kinds, naming the offending
/// field where one exists. There is no partial output.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum EncodeError {
    /// The amount was negative, NaN or infinite.
    #[error("amount must be a finite, non-negative value")]
    InvalidAmount,
    /// The receiver key was empty or blank.
    #[error("a receiver key is required")]
    MissingKey,
    /// A value would not fit the 2-digit TLV length field.
    #[error("field `{field}` exceeds the 99 character TLV limit")]
    FieldTooLong { field: &'static str },
    /// A value still contained non-ASCII characters after normalization.
    #[error("field `{field}` contains characters outside the payload charset")]
    UnsupportedCharacter { field: &'static str },
}

/// A static charge to be encoded as a "Copia e Cola" payload
///
/// Built by the caller, consumed by [`build_payload`][crate::build_payload]
/// and discarded; the encoder never stores or mutates it.
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixCharge {
    /// Receiver Pix key: an e-mail, phone number, document number or random
    /// UUID key. Passed through verbatim, never normalized.
    pub key: String,
    /// Receiver display name. Normalized and truncated to 25 characters;
    /// defaults to `Recebedor` when blank.
    pub name: String,
    /// Receiver city. Normalized and truncated to 25 characters; defaults
    /// to `Cidade` when blank.
    pub city: String,
    /// Charge amount in BRL, non-negative. Always rendered with exactly two
    /// fraction digits.
    pub amount: f64,
    /// Transaction reference for the receiver's statement. `None` encodes
    /// the literal `***`, meaning "no reference".
    pub txid: Option<String>,
    /// Free-text message shown to the payer, normalized when present.
    pub description: Option<String>,
}

/// A payload decoded back into its fields
///
/// Produced by [`parser::pix_payload`][crate::parser::pix_payload] after the
/// trailing CRC has been verified against a recomputation.
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixPayload {
    /// Receiver key from merchant account sub-field `01`.
    pub key: String,
    /// Free-text message from merchant account sub-field `02`, if present.
    pub description: Option<String>,
    /// Charge amount from field `54`.
    pub amount: f64,
    /// Receiver name from field `59`.
    pub name: String,
    /// Receiver city from field `60`.
    pub city: String,
    /// Transaction reference from additional-data sub-field `05`.
    pub txid: String,
    /// CRC16 from field `63`, verified using the
    /// [CCITT-FALSE][crate::crc16] algorithm and 0x1021 polynomial.
    pub crc16: u16,
}

impl<'a> TryFrom<&'a str> for PixPayload {
    type Error = nom::error::Error<&'a str>;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        match pix_payload(value).finish() {
            Ok((_, payload)) => Ok(payload),
            Err(e) => Err(e),
        }
    }
}
