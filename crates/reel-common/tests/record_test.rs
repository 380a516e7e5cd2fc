use chrono::{Local, TimeZone};
use reel_common::{Action, ActionKind, ElementDescriptor, PopupRecord, Selector, SessionRecord};
use serde_json::json;

fn button() -> ElementDescriptor {
    ElementDescriptor {
        tag: "button".into(),
        id: "submit".into(),
        class_attribute: "btn primary".into(),
        text: "Send".into(),
        input_type: "submit".into(),
        name: "submit".into(),
        selectors: vec![Selector::id("submit"), Selector::css("[name=\"submit\"]")],
    }
}

#[test]
fn test_action_wire_shape() {
    let ts = Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let action = Action {
        id: 2,
        timestamp: ts,
        kind: ActionKind::Click { element: button() },
    };

    let value = serde_json::to_value(&action).unwrap();
    assert_eq!(value["id"], json!(2));
    assert_eq!(value["type"], json!("click"));
    assert_eq!(value["data"]["element"]["tag"], json!("button"));
    assert_eq!(value["data"]["element"]["class"], json!("btn primary"));
    assert_eq!(
        value["data"]["element"]["selectors"],
        json!(["id:submit", "css:[name=\"submit\"]"])
    );
    assert!(value["timestamp"].as_str().unwrap().starts_with("2024-05-01T12:00:00"));
}

#[test]
fn test_kind_names_match_wire_type() {
    let ts = Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let kinds = vec![
        ActionKind::Navigate {
            url: "https://x.test".into(),
        },
        ActionKind::Click { element: button() },
        ActionKind::TypeText {
            text: "hello".into(),
            element: button(),
        },
        ActionKind::Enter,
        ActionKind::PopupDetected {
            popup: PopupRecord::unknown(),
        },
    ];

    for (i, kind) in kinds.into_iter().enumerate() {
        let name = kind.name();
        let action = Action {
            id: i as u64 + 1,
            timestamp: ts,
            kind,
        };
        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(value["type"], json!(name));
    }
}

#[test]
fn test_session_record_keys_and_start_url() {
    let ts = Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let record = SessionRecord {
        session_id: "20240501_120000".into(),
        timestamp: ts,
        started_at: Some(ts),
        total_actions: 2,
        detected_popups: vec![PopupRecord::unknown()],
        actions: vec![
            Action {
                id: 1,
                timestamp: ts,
                kind: ActionKind::Navigate {
                    url: "https://x.test".into(),
                },
            },
            Action {
                id: 2,
                timestamp: ts,
                kind: ActionKind::Enter,
            },
        ],
    };

    assert_eq!(record.start_url(), Some("https://x.test"));

    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["session_id"], json!("20240501_120000"));
    assert_eq!(value["total_actions"], json!(2));
    assert_eq!(value["detected_popups"][0]["type"], json!("unknown"));
    assert_eq!(value["actions"][1]["type"], json!("enter"));
}
