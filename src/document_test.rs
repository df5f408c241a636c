use super::*;
use crate::geom::Rect;

#[test]
fn parses_full_document() {
    let text = r#"{
        "selected": "6a1f7d2e-0c4b-4f4e-9d3a-2b1c0e9f8a7b",
        "images": [
            {
                "id": "6a1f7d2e-0c4b-4f4e-9d3a-2b1c0e9f8a7b",
                "url": "plan.png",
                "name": "Plan",
                "locked": false,
                "visible": true,
                "bounds": { "x": 1, "y": 2, "width": 300, "height": 200 }
            }
        ]
    }"#;
    let doc = Document::from_json(text).unwrap();
    assert_eq!(doc.images.len(), 1);
    assert_eq!(doc.selected, doc.images[0].id);
    assert_eq!(doc.images[0].bounds, Some(Rect::new(1.0, 2.0, 300.0, 200.0)));
}

#[test]
fn missing_fields_default() {
    let doc = Document::from_json("{}").unwrap();
    assert!(doc.selected.is_none());
    assert!(doc.images.is_empty());
}

#[test]
fn images_may_be_sparse() {
    let doc = Document::from_json(r#"{"images":[{"url":"a.png"}]}"#).unwrap();
    assert_eq!(doc.images[0].url.as_deref(), Some("a.png"));
    assert!(doc.images[0].id.is_none());
}

#[test]
fn invalid_text_is_a_parse_error() {
    let err = Document::from_json("{ not json").unwrap_err();
    assert!(matches!(err, DocumentError::Parse(_)));
    assert!(err.to_string().starts_with("invalid support image document"));
}

#[test]
fn absent_selection_is_not_serialized() {
    let text = Document::default().to_json().unwrap();
    assert_eq!(text, r#"{"images":[]}"#);
}

#[test]
fn json_round_trip_preserves_document() {
    let doc = Document {
        selected: None,
        images: vec![
            OverlayDescriptor::from_url("a.png").with_bounds(Rect::new(0.0, 0.0, 10.0, 20.0)),
            OverlayDescriptor::from_url("b.png").with_name("B"),
        ],
    };
    let back = Document::from_json(&doc.to_json().unwrap()).unwrap();
    assert_eq!(back, doc);
}

#[test]
fn non_uuid_ids_round_trip() {
    let text = r#"{"selected":"bg","images":[
        {"id":"bg","url":"a.png","bounds":{"x":0,"y":0,"width":40,"height":30}},
        {"id":"layer 2","url":"b.png"}
    ]}"#;
    let doc = Document::from_json(text).unwrap();
    assert_eq!(doc.selected, Some(OverlayId::new("bg")));
    assert_eq!(doc.images[1].id.as_ref().map(OverlayId::as_str), Some("layer 2"));

    let back = Document::from_json(&doc.to_json().unwrap()).unwrap();
    assert_eq!(back, doc);
    assert!(doc.to_json().unwrap().contains(r#""selected":"bg""#));
}
