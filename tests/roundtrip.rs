use pix_brcode::*;

fn charge() -> PixCharge {
    PixCharge {
        key: "contato@to-ligado.com".to_owned(),
        name: "To-Ligado Solucoes".to_owned(),
        city: "Belem".to_owned(),
        amount: 497.00,
        txid: None,
        description: None,
    }
}

#[test]
fn build_matches_reference_vector() {
    let payload = build_payload(&charge()).unwrap();
    assert_eq!(
        payload,
        "00020126430014BR.GOV.BCB.PIX0121contato@to-ligado.com\
         5204000053039865406497.005802BR5918To-Ligado Solucoes\
         6005Belem62070503***6304CD82"
    );
}

#[test]
fn build_then_parse_round_trips() {
    let charge = PixCharge {
        key: "a1b2c3d4-e5f6-a7b8-c9d0-e1f2a3b4c5d6".to_owned(),
        name: "João da Silva".to_owned(),
        city: "São Paulo".to_owned(),
        amount: 199.9,
        txid: Some("PED1234".to_owned()),
        description: Some("Pedido 1234".to_owned()),
    };
    let payload = build_payload(&charge).unwrap();
    let parsed = PixPayload::try_from(payload.as_str()).unwrap();
    assert_eq!(
        parsed,
        PixPayload {
            key: "a1b2c3d4-e5f6-a7b8-c9d0-e1f2a3b4c5d6".to_owned(),
            description: Some("Pedido 1234".to_owned()),
            amount: 199.9,
            name: "Joao da Silva".to_owned(),
            city: "Sao Paulo".to_owned(),
            txid: "PED1234".to_owned(),
            crc16: 0xE78D,
        }
    );
}

#[test]
fn trailing_checksum_validates_against_recomputation() {
    let payload = build_payload(&charge()).unwrap();
    let (body, checksum) = payload.split_at(payload.len() - 4);
    assert_eq!(format!("{:04X}", crc16(body)), checksum);
}

#[test]
fn every_length_field_matches_its_value() {
    let payload = build_payload(&PixCharge {
        key: "12345678901".to_owned(),
        name: "Maria de Fátima Conceição".to_owned(),
        city: "Belo Horizonte".to_owned(),
        amount: 1499.0,
        txid: None,
        description: Some("Mensalidade".to_owned()),
    })
    .unwrap();

    // Walk the top-level TLV stream up to the CRC tag
    let mut rest = payload.as_str();
    let mut seen = Vec::new();
    while !rest.starts_with("6304") {
        let (after, (id, value)) = parser::tlv(rest).unwrap();
        let declared: usize = rest[2..4].parse().unwrap();
        assert_eq!(declared, value.chars().count(), "field {id}");
        seen.push(id);
        rest = after;
    }
    assert_eq!(seen, ["00", "26", "52", "53", "54", "58", "59", "60", "62"]);
    assert_eq!(rest.len(), 4 + 4);
}

#[test]
fn normalized_name_survives_round_trip_truncated() {
    let charge = PixCharge {
        key: "loja@example.com".to_owned(),
        name: "Empreendimentos Aurora do Brasil".to_owned(),
        city: "Belém".to_owned(),
        amount: 10.0,
        txid: None,
        description: None,
    };
    let parsed = PixPayload::try_from(build_payload(&charge).unwrap().as_str()).unwrap();
    assert_eq!(parsed.name, "Empreendimentos Aurora do");
    assert_eq!(parsed.name.chars().count(), 25);
    assert_eq!(parsed.city, "Belem");
}

#[test]
fn zero_amount_round_trips() {
    let charge = PixCharge {
        key: "+5591999999999".to_owned(),
        name: String::new(),
        city: String::new(),
        amount: 0.0,
        txid: None,
        description: None,
    };
    let payload = build_payload(&charge).unwrap();
    assert!(payload.contains("54040.00"));
    let parsed = PixPayload::try_from(payload.as_str()).unwrap();
    assert_eq!(parsed.amount, 0.0);
    assert_eq!(parsed.name, "Recebedor");
    assert_eq!(parsed.city, "Cidade");
    assert_eq!(parsed.txid, "***");
}

#[test]
fn identical_charges_build_identical_payloads() {
    let first = build_payload(&charge()).unwrap();
    let second = build_payload(&charge()).unwrap();
    assert_eq!(first, second);
}
