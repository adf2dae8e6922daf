#![doc = include_str!("../README.md")]
pub mod encoder;
pub mod parser;
mod protocol;

pub use encoder::build_payload;
pub use protocol::*;

/// CRC16/CCITT-FALSE Algorithm
///
/// Uses 0x1021 polynomial with a 0xFFFF initial register, as mandated for
/// the trailing checksum of an EMV-QR payload (BR Code tag `63`).
///
/// The payload charset is restricted to ASCII, so the CRC runs over the
/// string's bytes one to one with its characters.
pub fn crc16(payload: &str) -> u16 {
    let mut crc: u16 = 0xFFFF;
    for byte in payload.bytes() {
        crc ^= (byte as u16) << 8;
        for _bit in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ 0x1021;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc16_check_value() {
        // Standard check input for the CCITT-FALSE variant
        assert_eq!(crc16("123456789"), 0x29B1);
    }

    #[test]
    fn test_crc16_of_empty_input_is_initial_register() {
        assert_eq!(crc16(""), 0xFFFF);
    }

    #[test]
    fn test_crc16_payload_prefix() {
        let input = "00020126430014BR.GOV.BCB.PIX0121contato@to-ligado.com\
                     5204000053039865406497.005802BR5918To-Ligado Solucoes\
                     6005Belem62070503***6304";
        assert_eq!(crc16(input), 0xCD82);
    }
}
