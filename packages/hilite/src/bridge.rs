//! JSON messaging with a controlling UI in another frame.
//!
//! Inbound messages are applied to the document; each one that changed something is
//! acknowledged. Duplicate delivery is harmless: a repeated `HIGHLIGHT_TEXT` finds the
//! selection already cleared, and a repeated `REMOVE_HIGHLIGHT` is absorbed by the
//! removal guard or finds nothing left to remove.

use hilite_traits::FrameMessage;
use web_time::Instant;

use crate::adapter::DocumentTreeAdapter;
use crate::observer::TextSelection;
use crate::wrapper::{self, ATTR_ID};
use crate::{BridgeError, HighlightColor, Highlighter};

pub struct FrameBridge {
    highlighter: Highlighter,
}

impl FrameBridge {
    pub fn new(highlighter: Highlighter) -> Self {
        Self { highlighter }
    }

    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    pub fn highlighter_mut(&mut self) -> &mut Highlighter {
        &mut self.highlighter
    }

    pub fn into_highlighter(self) -> Highlighter {
        self.highlighter
    }

    pub fn decode(json: &str) -> Result<FrameMessage, BridgeError> {
        serde_json::from_str(json).map_err(BridgeError::Malformed)
    }

    pub fn encode(message: &FrameMessage) -> Result<String, BridgeError> {
        serde_json::to_string(message).map_err(BridgeError::Encode)
    }

    /// Handle one inbound message, returning the encoded acknowledgement if any
    pub fn handle_inbound(
        &mut self,
        doc: &mut dyn DocumentTreeAdapter,
        json: &str,
        now: Instant,
    ) -> Option<String> {
        let message = match Self::decode(json) {
            Ok(message) => message,
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Ignoring inbound message: {_err}");
                return None;
            }
        };

        let reply = self.dispatch(doc, message, now)?;
        match Self::encode(&reply) {
            Ok(json) => Some(json),
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("{_err}");
                None
            }
        }
    }

    /// Apply a decoded message. Returns the acknowledgement to send back, if any.
    pub fn dispatch(
        &mut self,
        doc: &mut dyn DocumentTreeAdapter,
        message: FrameMessage,
        now: Instant,
    ) -> Option<FrameMessage> {
        match message {
            FrameMessage::HighlightText { color, note } => {
                let color = match color.parse::<HighlightColor>() {
                    Ok(color) => color,
                    Err(_err) => {
                        #[cfg(feature = "tracing")]
                        tracing::warn!("{_err}");
                        return None;
                    }
                };
                let applied = self
                    .highlighter
                    .try_apply_highlight(doc, color, note.as_deref(), now)
                    .ok()?;
                Some(FrameMessage::HighlightApplied { id: applied.id })
            }
            FrameMessage::RemoveHighlight {
                highlight_id: Some(id),
                ..
            } => {
                let container = doc.root();
                let count = self
                    .highlighter
                    .remove_highlight_by_id_at(doc, container, &id, now);
                (count > 0).then_some(FrameMessage::HighlightRemoved { id, count })
            }
            FrameMessage::RemoveHighlight {
                highlight_id: None,
                element: Some(element),
            } => {
                if !doc.is_connected(element) || !wrapper::is_wrapper(doc, element) {
                    return None;
                }
                let id = doc.attr(element, ATTR_ID)?.to_string();
                self.highlighter
                    .remove_highlight(doc, element)
                    .then_some(FrameMessage::HighlightRemoved { id, count: 1 })
            }
            _other => {
                #[cfg(feature = "tracing")]
                tracing::debug!("Ignoring inbound {} message", _other.name());
                None
            }
        }
    }

    /// Encode a selection state as a `TEXT_SELECTED` message
    pub fn outbound_for(
        &self,
        doc: &dyn DocumentTreeAdapter,
        selection: &TextSelection,
    ) -> Result<String, BridgeError> {
        let highlight_data = selection
            .highlight_element
            .and_then(|node| wrapper::highlight_data(doc, node));
        Self::encode(&FrameMessage::TextSelected {
            is_active: selection.is_active,
            rect: selection.rect,
            highlight_data,
        })
    }

    /// `TEXT_SELECTED` for the highlighter's current selection state
    pub fn outbound(&self, doc: &dyn DocumentTreeAdapter) -> Result<String, BridgeError> {
        self.outbound_for(doc, self.highlighter.selection())
    }
}
