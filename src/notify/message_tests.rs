//! Tests for message payload serialization.

use serde_json::{Value, json};

use super::{Attachment, AttachmentMeta, JobNotification, OutboundMessage, Severity};

fn to_json<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap()
}

mod omission {
    use super::*;

    #[test]
    fn empty_message_serializes_to_empty_object() {
        assert_eq!(to_json(&OutboundMessage::default()), json!({}));
    }

    #[test]
    fn empty_attachment_serializes_to_empty_object() {
        assert_eq!(to_json(&Attachment::default()), json!({}));
    }

    #[test]
    fn only_set_message_fields_are_emitted() {
        let message = OutboundMessage::new("build green").with_icon_emoji(":white_check_mark:");

        assert_eq!(
            to_json(&message),
            json!({ "icon_emoji": ":white_check_mark:", "text": "build green" })
        );
    }

    #[test]
    fn no_nulls_anywhere() {
        let message = OutboundMessage::new("x")
            .with_attachment(Attachment::new("danger", ""))
            .with_attachment(Attachment::default().with_timestamp(5));

        let rendered = serde_json::to_string(&message).unwrap();

        assert!(!rendered.contains("null"));
        assert!(!rendered.contains("\"\""));
    }

    #[test]
    fn zero_id_and_empty_markdown_list_are_omitted() {
        let attachment = Attachment::new("good", "fine").with_meta(AttachmentMeta {
            id: 0,
            markdown_in: Vec::new(),
            ..AttachmentMeta::default()
        });

        assert_eq!(to_json(&attachment), json!({ "color": "good", "text": "fine" }));
    }
}

mod wire_format {
    use super::*;

    #[test]
    fn full_attachment_uses_webhook_field_names() {
        let meta = AttachmentMeta {
            callback_id: "cb-1".to_string(),
            id: 7,
            author_id: "U1".to_string(),
            author_name: "ci".to_string(),
            author_subname: "runner-3".to_string(),
            author_link: "https://ci.example.com".to_string(),
            author_icon: "https://ci.example.com/icon.png".to_string(),
            title: "Nightly".to_string(),
            title_link: "https://ci.example.com/runs/9".to_string(),
            pretext: "Heads up".to_string(),
            image_url: "https://ci.example.com/graph.png".to_string(),
            thumb_url: "https://ci.example.com/thumb.png".to_string(),
            markdown_in: vec!["text".to_string(), "pretext".to_string()],
        };
        let attachment = Attachment::new("#439FE0", "*3* failures")
            .with_fallback("3 failures")
            .with_timestamp(1_700_000_000)
            .with_meta(meta);

        assert_eq!(
            to_json(&attachment),
            json!({
                "color": "#439FE0",
                "fallback": "3 failures",
                "callback_id": "cb-1",
                "id": 7,
                "author_id": "U1",
                "author_name": "ci",
                "author_subname": "runner-3",
                "author_link": "https://ci.example.com",
                "author_icon": "https://ci.example.com/icon.png",
                "title": "Nightly",
                "title_link": "https://ci.example.com/runs/9",
                "pretext": "Heads up",
                "image_url": "https://ci.example.com/graph.png",
                "thumb_url": "https://ci.example.com/thumb.png",
                "mrkdwn_in": ["text", "pretext"],
                "text": "*3* failures",
                "ts": 1_700_000_000
            })
        );
    }

    #[test]
    fn timestamp_is_a_json_number() {
        let json = to_json(&Attachment::default().with_timestamp(1_234));

        assert_eq!(json["ts"], Value::from(1_234_u64));
        assert!(json["ts"].is_u64());
    }

    #[test]
    fn message_fields_use_webhook_names() {
        let message = OutboundMessage::new("hello")
            .with_username("bot")
            .with_icon_emoji(":robot_face:")
            .with_channel("#general");

        assert_eq!(
            to_json(&message),
            json!({
                "username": "bot",
                "icon_emoji": ":robot_face:",
                "channel": "#general",
                "text": "hello"
            })
        );
    }
}

mod ordering {
    use super::*;

    #[test]
    fn attachments_keep_insertion_order() {
        let colors = ["good", "warning", "danger", "#000000", "#FFFFFF"];
        let message = colors.iter().fold(OutboundMessage::new("batch"), |m, c| {
            m.with_attachment(Attachment::new(*c, format!("event {c}")))
        });

        let json = to_json(&message);
        let rendered: Vec<&str> = json["attachments"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["color"].as_str().unwrap())
            .collect();

        assert_eq!(rendered, colors);
    }
}

mod severity {
    use super::*;

    #[test]
    fn maps_to_named_colors() {
        assert_eq!(Severity::Info.color(), "good");
        assert_eq!(Severity::Warning.color(), "warning");
        assert_eq!(Severity::Error.color(), "danger");
    }

    #[test]
    fn displays_lowercase_level() {
        assert_eq!(Severity::Info.to_string(), "info");
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert_eq!(Severity::Error.to_string(), "error");
    }
}

mod job_notification {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let job = JobNotification::new("warning", "queue depth 9000")
            .with_icon_emoji(":bell:")
            .with_text("ingest lagging");

        assert_eq!(job.color, "warning");
        assert_eq!(job.details, "queue depth 9000");
        assert_eq!(job.icon_emoji, ":bell:");
        assert_eq!(job.text, "ingest lagging");
    }
}
