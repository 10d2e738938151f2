//! Signaling frames exchanged with browser peers
//!
//! Every frame on the socket is a JSON text message of the form
//! `{"event": "offer", "data": {...}}`. The relay reads `event` to decide
//! whether the frame is a signal at all and re-emits `data` untouched.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors produced while decoding or encoding a signaling frame.
#[derive(Debug, Error)]
pub enum SignalError {
    /// The frame was not JSON or carried no string `event` field.
    #[error("malformed signaling frame: {0}")]
    Malformed(#[source] serde_json::Error),
    /// The frame named an event the relay does not forward.
    #[error("unsupported signaling event `{0}`")]
    UnknownEvent(String),
    #[error("failed to encode signal: {0}")]
    Encode(#[source] serde_json::Error),
}

/// The three negotiation events a peer may send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignalKind {
    Offer,
    Answer,
    IceCandidate,
}

impl SignalKind {
    pub const ALL: [SignalKind; 3] = [Self::Offer, Self::Answer, Self::IceCandidate];

    /// The event name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::Offer => "offer",
            SignalKind::Answer => "answer",
            SignalKind::IceCandidate => "ice-candidate",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalKind {
    type Err = SignalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| SignalError::UnknownEvent(s.to_string()))
    }
}

/// A signaling message relayed between peers.
///
/// `data` is whatever the browser attached (an SDP description, an ICE
/// candidate, or anything else). It is never parsed beyond being valid JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    pub event: SignalKind,
    pub data: Value,
}

/// Frame shape before the event name has been checked.
#[derive(Deserialize)]
struct RawFrame {
    event: String,
    #[serde(default)]
    data: Value,
}

impl Signal {
    pub fn new(event: SignalKind, data: Value) -> Signal {
        Self { event, data }
    }

    /// Parse a text frame received from a peer.
    ///
    /// A missing `data` field decodes as `null`.
    pub fn decode(text: &str) -> Result<Signal, SignalError> {
        let raw: RawFrame = serde_json::from_str(text).map_err(SignalError::Malformed)?;
        let event = raw.event.parse()?;

        Ok(Signal {
            event,
            data: raw.data,
        })
    }

    /// Serialise into the text frame sent to peers.
    pub fn encode(&self) -> Result<String, SignalError> {
        serde_json::to_string(self).map_err(SignalError::Encode)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_each_event_name() {
        for kind in SignalKind::ALL {
            let text = format!(r#"{{"event":"{kind}","data":{{"k":1}}}}"#);
            let signal = Signal::decode(&text).unwrap();
            assert_eq!(signal.event, kind);
            assert_eq!(signal.data, json!({"k": 1}));
        }
    }

    #[test]
    fn ice_candidate_uses_hyphenated_name() {
        let signal = Signal::new(SignalKind::IceCandidate, json!({"candidate": "y"}));
        let encoded: Value = serde_json::from_str(&signal.encode().unwrap()).unwrap();

        assert_eq!(encoded["event"], "ice-candidate");
        assert_eq!(encoded["data"], json!({"candidate": "y"}));
    }

    #[test]
    fn payload_passes_through_unmodified() {
        let data = json!({
            "sdp": "v=0\r\no=- 4611731400430051336 2 IN IP4 127.0.0.1\r\n",
            "type": "offer",
            "extra": [1, null, {"nested": true}],
        });
        let text = json!({"event": "offer", "data": data}).to_string();

        let signal = Signal::decode(&text).unwrap();
        let round: Value = serde_json::from_str(&signal.encode().unwrap()).unwrap();
        assert_eq!(round["data"], data);
    }

    #[test]
    fn missing_data_is_null() {
        let signal = Signal::decode(r#"{"event":"answer"}"#).unwrap();
        assert_eq!(signal.data, Value::Null);
    }

    #[test]
    fn rejects_unknown_event() {
        let err = Signal::decode(r#"{"event":"chat","data":"hi"}"#).unwrap_err();
        assert!(matches!(err, SignalError::UnknownEvent(name) if name == "chat"));
    }

    #[test]
    fn rejects_non_object_frames() {
        assert!(matches!(
            Signal::decode("not json"),
            Err(SignalError::Malformed(_))
        ));
        assert!(matches!(
            Signal::decode(r#""offer""#),
            Err(SignalError::Malformed(_))
        ));
        assert!(matches!(
            Signal::decode(r#"{"data": {}}"#),
            Err(SignalError::Malformed(_))
        ));
    }
}
