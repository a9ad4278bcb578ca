//! Integration tests: Layout ↔ JSON.
//!
//! Storage backends persist whatever serde produces, so the serialized form
//! must carry every element field and the open-ended property map.

use pretty_assertions::assert_eq;
use sd_core::*;

fn load_fixture() -> Layout {
    serde_json::from_str(include_str!("fixtures/lobby.json")).unwrap()
}

#[test]
fn fixture_loads_header_fields() {
    let layout = load_fixture();
    assert_eq!(layout.id, LayoutId::from("lobby-screen"));
    assert_eq!(layout.resolution.orientation, Orientation::Portrait);
    assert_eq!(layout.background_color, Color::rgb(0x10, 0x18, 0x20));
    assert_eq!(layout.elements.len(), 3);
    assert!(layout.has_unique_ids());
}

#[test]
fn absent_keys_take_kind_defaults() {
    let layout = load_fixture();
    let headline = layout.get(ElementId::intern("headline")).unwrap();

    assert_eq!(headline.property("fontFamily"), Some("Arial".into()));
    assert_eq!(headline.property("fontSize"), Some(PropValue::Number(72.0)));
    assert!(headline.visible);
    assert!(!headline.locked);

    let backdrop = layout.get(ElementId::intern("backdrop")).unwrap();
    assert!(backdrop.locked);
    assert_eq!(backdrop.property("borderThickness"), Some(PropValue::Number(2.0)));

    let promo = layout.get(ElementId::intern("promo")).unwrap();
    assert!(!promo.visible);
    assert_eq!(promo.property("loop"), Some(PropValue::Bool(true)));
    assert_eq!(promo.property("muted"), Some(PropValue::Bool(false)));
}

#[test]
fn free_form_keys_survive_roundtrip() {
    let layout = load_fixture();
    let json = serde_json::to_string_pretty(&layout).unwrap();
    let reloaded: Layout = serde_json::from_str(&json).unwrap();

    assert_eq!(reloaded, layout);
    let headline = reloaded.get(ElementId::intern("headline")).unwrap();
    assert_eq!(headline.property("shadow"), Some(PropValue::Bool(true)));
}

#[test]
fn insertion_order_is_preserved_not_z_order() {
    let layout = load_fixture();
    let json = serde_json::to_string(&layout).unwrap();
    let reloaded: Layout = serde_json::from_str(&json).unwrap();

    let ids: Vec<&str> = reloaded.elements.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["headline", "backdrop", "promo"]);
}

#[test]
fn mistyped_known_key_is_rejected() {
    let input = r#"{
        "id": "bad", "kind": "text", "name": "Bad",
        "position": {"x": 0, "y": 0}, "size": {"width": 10, "height": 10},
        "zIndex": 0, "properties": {"fontSize": "huge"}
    }"#;
    let err = serde_json::from_str::<Element>(input).unwrap_err();
    assert!(err.to_string().contains("fontSize"), "unexpected error: {err}");
}
