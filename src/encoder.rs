//! Serialization of a [`PixCharge`] into the static "Copia e Cola" payload.
//!
//! The payload is a flat TLV string: each field is a 2-character tag id, a
//! zero-padded 2-digit length and the value itself. Fields are emitted in the
//! canonical order mandated by the Central Bank, the merchant account block
//! (tag `26`) and the additional-data block (tag `62`) nesting their own TLV
//! sub-fields, and the whole string is sealed with a CRC16 under tag `63`.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::{crc16, EncodeError, PixCharge};

/// GUI identifying the tag-26 block as a Pix account, sub-field `00`.
pub const PIX_GUI: &str = "BR.GOV.BCB.PIX";

/// Placeholder txid meaning "no transaction reference".
pub const NO_TXID: &str = "***";

const DEFAULT_NAME: &str = "Recebedor";
const DEFAULT_CITY: &str = "Cidade";

// Name and city are capped well below the TLV limit by the BR Code spec.
const DISPLAY_FIELD_LIMIT: usize = 25;
const TLV_VALUE_LIMIT: usize = 99;

/// Encodes a single TLV field.
///
/// Produces `id + zero-padded 2-digit length + value`, the length measured
/// in characters. Values are validated against the 99-character limit by
/// [`build_payload`] before they reach this point.
pub fn field(id: &str, value: &str) -> String {
    debug_assert_eq!(id.len(), 2);
    debug_assert!(value.chars().count() <= TLV_VALUE_LIMIT);
    format!("{}{:02}{}", id, value.chars().count(), value)
}

/// Strips diacritics by decomposing to NFD and dropping combining marks.
///
/// `"João"` becomes `"Joao"`, `"ç"` becomes `"c"`. Characters that do not
/// decompose to an ASCII base (symbols, emoji) survive and are handled by
/// the caller.
pub fn normalize(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Normalizes a display field (name or city): strip diacritics, drop any
/// character still outside ASCII, truncate to 25 characters. Falls back to
/// the given default when nothing printable survives.
fn display_field(text: &str, default: &str) -> String {
    let cleaned: String = normalize(text)
        .chars()
        .filter(char::is_ascii)
        .take(DISPLAY_FIELD_LIMIT)
        .collect();
    if cleaned.trim().is_empty() {
        default.to_owned()
    } else {
        cleaned
    }
}

fn ensure_charset(name: &'static str, value: &str) -> Result<(), EncodeError> {
    if value.is_ascii() {
        Ok(())
    } else {
        Err(EncodeError::UnsupportedCharacter { field: name })
    }
}

fn ensure_fits(name: &'static str, value: &str) -> Result<(), EncodeError> {
    if value.chars().count() <= TLV_VALUE_LIMIT {
        Ok(())
    } else {
        Err(EncodeError::FieldTooLong { field: name })
    }
}

/// Builds the complete payload for a static charge.
///
/// Field order follows the Central Bank's canonical layout; receivers parse
/// positionally and some wallets reject codes with reordered fields. The
/// returned string ends with `6304` and the 4 uppercase hex digits of the
/// [CRC16][crate::crc16] computed over everything before them.
///
/// # Errors
///
/// Fails with an [`EncodeError`] when the amount is negative, non-finite or
/// too wide for a length field once rendered, the key is blank, or a
/// caller-supplied value (key, txid, description) cannot be represented: no
/// silent truncation is applied to those, only to name and city as the
/// standard prescribes.
pub fn build_payload(charge: &PixCharge) -> Result<String, EncodeError> {
    if !charge.amount.is_finite() || charge.amount < 0.0 {
        return Err(EncodeError::InvalidAmount);
    }
    if charge.key.trim().is_empty() {
        return Err(EncodeError::MissingKey);
    }
    ensure_charset("key", &charge.key)?;
    ensure_fits("key", &charge.key)?;

    // Keys pass through verbatim, display fields get normalized.
    let mut account = field("00", PIX_GUI);
    account.push_str(&field("01", &charge.key));
    if let Some(description) = charge.description.as_deref() {
        let description = normalize(description);
        ensure_charset("description", &description)?;
        ensure_fits("description", &description)?;
        account.push_str(&field("02", &description));
    }
    ensure_fits("merchant account information", &account)?;

    let txid = charge.txid.as_deref().unwrap_or(NO_TXID);
    ensure_charset("txid", txid)?;
    let additional_data = field("05", txid);
    ensure_fits("txid", &additional_data)?;

    let amount = format!("{:.2}", charge.amount);
    ensure_fits("amount", &amount)?;
    let name = display_field(&charge.name, DEFAULT_NAME);
    let city = display_field(&charge.city, DEFAULT_CITY);

    let mut payload = String::with_capacity(128 + account.len());
    // Payload format indicator, fixed "01"
    payload.push_str(&field("00", "01"));
    payload.push_str(&field("26", &account));
    // Merchant category code, always unclassified
    payload.push_str(&field("52", "0000"));
    // ISO 4217 numeric code for BRL
    payload.push_str(&field("53", "986"));
    payload.push_str(&field("54", &amount));
    payload.push_str(&field("58", "BR"));
    payload.push_str(&field("59", &name));
    payload.push_str(&field("60", &city));
    payload.push_str(&field("62", &additional_data));

    // The CRC tag and its own length are part of the checked input
    payload.push_str("6304");
    let crc = crc16(&payload);
    payload.push_str(&format!("{crc:04X}"));

    log::debug!(
        "built payload of {} chars for key {} (crc {crc:04X})",
        payload.len(),
        charge.key
    );

    Ok(payload)
}
