mod common;

use ::common::consideration::{
    self, series_for_height, Consideration, ConsiderationError, ConsiderationId,
};
use ::common::display::shorten_hex;

use crate::common::{signed, IDEAL, KEY_0, PASSPHRASE};

#[test]
fn test_signed_consideration_round_trips_through_json() {
    let original = signed("thanks for the plot");
    assert!(consideration::verify(&original));

    let json = serde_json::to_string(&original).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["by"], KEY_0);
    assert_eq!(value["for"], IDEAL);
    assert_eq!(value["series"], 2);
    assert!(value["signature"].is_string());

    let decoded: Consideration = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, original);
    assert!(consideration::verify(&decoded));
}

#[test]
fn test_tampering_breaks_verification() {
    let original = signed("thanks");
    let mut value = serde_json::to_value(&original).unwrap();

    value["memo"] = serde_json::Value::from("thanks a lot");
    let tampered: Consideration = serde_json::from_value(value.clone()).unwrap();
    assert!(!consideration::verify(&tampered));

    value["memo"] = serde_json::Value::from("thanks");
    value["nonce"] = serde_json::Value::from(12346);
    let tampered: Consideration = serde_json::from_value(value).unwrap();
    assert!(!consideration::verify(&tampered));
}

#[test]
fn test_unsigned_consideration_does_not_verify() {
    let unsigned = Consideration::new(
        1_700_000_000,
        1,
        KEY_0.parse().unwrap(),
        IDEAL.parse().unwrap(),
        "hello",
        1,
    )
    .unwrap();
    assert!(!consideration::verify(&unsigned));
    assert!(matches!(
        unsigned.verify(),
        Err(ConsiderationError::Unsigned)
    ));
}

#[test]
fn test_id_ignores_signature() {
    let signed = signed("hello");
    let unsigned = Consideration::new(
        signed.time(),
        signed.nonce(),
        signed.by().clone(),
        signed.for_().clone(),
        signed.memo(),
        signed.series(),
    )
    .unwrap();
    assert_eq!(signed.id().unwrap(), unsigned.id().unwrap());

    let id = signed.id().unwrap();
    let parsed: ConsiderationId = id.to_hex().parse().unwrap();
    assert_eq!(parsed, id);
    assert_eq!(shorten_hex(&id.to_hex()).len(), 12);
}

#[test]
fn test_embedded_reference() {
    let target = signed("original").id().unwrap().to_hex();
    let reply = signed(&format!("see ref/{}/ for context", target));
    assert_eq!(reply.embedded_reference(), Some(target.as_str()));
    assert_eq!(signed("no reference here").embedded_reference(), None);
}

#[test]
fn test_series_boundaries() {
    assert_eq!(series_for_height(0, 1008), Some(1));
    assert_eq!(series_for_height(1007, 1008), Some(1));
    assert_eq!(series_for_height(1008, 1008), Some(2));
    assert_eq!(series_for_height(10, 0), None);

    let current = consideration::sign(IDEAL, "now", 2016, 1, PASSPHRASE).unwrap();
    assert_eq!(current.series(), 3);
    assert!(consideration::verify(&current));
}
