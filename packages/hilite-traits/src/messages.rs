//! Messages exchanged with a controlling UI that lives in a different frame.
//!
//! The document side sends [`FrameMessage::TextSelected`] on every selection change and
//! receives [`FrameMessage::HighlightText`] / [`FrameMessage::RemoveHighlight`]. Receivers
//! must tolerate duplicate delivery.

use serde::{Deserialize, Serialize};

use crate::BoundingBox;

/// Identity and annotation of an existing highlight, as seen across a frame boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightData {
    pub id: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FrameMessage {
    #[serde(rename_all = "camelCase")]
    TextSelected {
        is_active: bool,
        rect: Option<BoundingBox>,
        #[serde(default)]
        highlight_data: Option<HighlightData>,
    },
    #[serde(rename_all = "camelCase")]
    HighlightText {
        color: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    RemoveHighlight {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        highlight_id: Option<String>,
        /// Node id of a wrapper element, for senders that share the document's node ids
        #[serde(default, skip_serializing_if = "Option::is_none")]
        element: Option<usize>,
    },
    #[serde(rename_all = "camelCase")]
    HighlightApplied { id: String },
    #[serde(rename_all = "camelCase")]
    HighlightRemoved { id: String, count: usize },
}

impl FrameMessage {
    pub fn name(&self) -> &'static str {
        match self {
            FrameMessage::TextSelected { .. } => "TEXT_SELECTED",
            FrameMessage::HighlightText { .. } => "HIGHLIGHT_TEXT",
            FrameMessage::RemoveHighlight { .. } => "REMOVE_HIGHLIGHT",
            FrameMessage::HighlightApplied { .. } => "HIGHLIGHT_APPLIED",
            FrameMessage::HighlightRemoved { .. } => "HIGHLIGHT_REMOVED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inbound_highlight_text_uses_wire_names() {
        let msg: FrameMessage =
            serde_json::from_str(r#"{"type":"HIGHLIGHT_TEXT","color":"cyan"}"#).unwrap();
        assert_eq!(
            msg,
            FrameMessage::HighlightText {
                color: "cyan".into(),
                note: None
            }
        );
    }

    #[test]
    fn remove_by_id_or_element() {
        let by_id: FrameMessage =
            serde_json::from_str(r#"{"type":"REMOVE_HIGHLIGHT","highlightId":"highlight-1-a"}"#)
                .unwrap();
        let by_element: FrameMessage =
            serde_json::from_str(r#"{"type":"REMOVE_HIGHLIGHT","element":12}"#).unwrap();

        assert!(matches!(
            by_id,
            FrameMessage::RemoveHighlight { highlight_id: Some(ref id), element: None } if id == "highlight-1-a"
        ));
        assert!(matches!(
            by_element,
            FrameMessage::RemoveHighlight {
                highlight_id: None,
                element: Some(12)
            }
        ));
    }

    #[test]
    fn text_selected_serializes_camel_case_fields() {
        let msg = FrameMessage::TextSelected {
            is_active: true,
            rect: Some(BoundingBox::new(1.0, 2.0, 3.0, 4.0)),
            highlight_data: None,
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "TEXT_SELECTED");
        assert_eq!(json["isActive"], true);
        assert_eq!(json["rect"]["left"], 1.0);
        assert!(json["highlightData"].is_null());
    }
}
