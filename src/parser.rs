//! nom parsers for the "Copia e Cola" payload text.
//!
//! The payload is parsed positionally in the canonical field order, the same
//! order [`build_payload`][crate::build_payload] emits. The trailing CRC is
//! recomputed over everything before it and must match, so a payload that
//! parses is also known to be intact.

use nom::{
    bytes::complete::{tag, take},
    combinator::{all_consuming, map_res, opt, verify},
    IResult,
};

use crate::encoder::PIX_GUI;
use crate::protocol::PixPayload;

/// Parse a single TLV field into its tag id and value
///
/// Takes a 2-character id, a 2-digit decimal length and `length` characters
/// of value.
pub fn tlv(input: &str) -> IResult<&str, (&str, &str)> {
    let (input, id) = verify(take(2usize), |id: &str| {
        id.bytes().all(|b| b.is_ascii_digit())
    })(input)?;
    let (input, len) = map_res(take(2usize), str::parse::<usize>)(input)?;
    let (input, value) = take(len)(input)?;
    Ok((input, (id, value)))
}

/// Parse a TLV field with a required tag id, yielding only the value
fn tlv_value<'a>(id: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    move |input| {
        let (input, _) = tag(id)(input)?;
        let (input, len) = map_res(take(2usize), str::parse::<usize>)(input)?;
        take(len)(input)
    }
}

/// Parse the merchant account information block (the value of field `26`)
///
/// The GUI sub-field must identify the block as a Pix account; the key is
/// required, the description optional.
pub fn merchant_account(input: &str) -> IResult<&str, (&str, Option<&str>)> {
    let (input, _gui) = verify(tlv_value("00"), |gui: &str| gui == PIX_GUI)(input)?;
    let (input, key) = tlv_value("01")(input)?;
    let (input, description) = opt(tlv_value("02"))(input)?;
    Ok((input, (key, description)))
}

/// Parse a complete static payload
///
/// It does 4 main error checks:
/// - Payload format indicator is `01`
/// - Category, currency and country fields carry the fixed Pix values
/// - The merchant account block carries the `BR.GOV.BCB.PIX` GUI
/// - Computes the CRC and verifies it against the trailing 4 hex digits
pub fn pix_payload(input: &str) -> IResult<&str, PixPayload> {
    let (rest, _format) = verify(tlv_value("00"), |v: &str| v == "01")(input)?;
    let (rest, account) = tlv_value("26")(rest)?;
    let (_, (key, description)) = all_consuming(merchant_account)(account)?;
    let (rest, _category) = verify(tlv_value("52"), |v: &str| v == "0000")(rest)?;
    let (rest, _currency) = verify(tlv_value("53"), |v: &str| v == "986")(rest)?;
    let (rest, amount) = map_res(tlv_value("54"), str::parse::<f64>)(rest)?;
    let (rest, _country) = verify(tlv_value("58"), |v: &str| v == "BR")(rest)?;
    let (rest, name) = tlv_value("59")(rest)?;
    let (rest, city) = tlv_value("60")(rest)?;
    let (rest, additional_data) = tlv_value("62")(rest)?;
    let (_, txid) = all_consuming(tlv_value("05"))(additional_data)?;

    let (rest, _) = tag("6304")(rest)?;
    let calculated_crc16 = crate::crc16(&input[..input.len() - rest.len()]);
    let (rest, crc16) = verify(
        map_res(take(4usize), |hex: &str| u16::from_str_radix(hex, 16)),
        |crc16| *crc16 == calculated_crc16,
    )(rest)?;

    Ok((
        rest,
        PixPayload {
            key: key.to_owned(),
            description: description.map(str::to_owned),
            amount,
            name: name.to_owned(),
            city: city.to_owned(),
            txid: txid.to_owned(),
            crc16,
        },
    ))
}
