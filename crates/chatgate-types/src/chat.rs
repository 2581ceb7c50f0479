//! Wire types for a chat turn.
//!
//! Field names follow the public HTTP contract (`sessionId`, `answer`,
//! `history`, ...), so the structs here are serialized as-is by the API layer.

use serde::{Deserialize, Serialize};

use crate::message::Message;

/// Body of `POST /chat` as received.
///
/// Both fields are optional at the serde level so that a missing field can be
/// reported as a validation error instead of a generic parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
    pub query: Option<String>,
}

/// A chat turn that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub session_id: String,
    pub query: String,
}

impl ChatRequest {
    /// Check that `sessionId` and `query` are present and not blank.
    ///
    /// The query is passed through untouched; only emptiness is checked.
    pub fn validate(self) -> Result<ChatTurn, String> {
        let session_id = match self.session_id {
            Some(id) if !id.trim().is_empty() => id,
            Some(_) => return Err("sessionId must not be empty".to_string()),
            None => return Err("missing field: sessionId".to_string()),
        };
        let query = match self.query {
            Some(q) if !q.trim().is_empty() => q,
            Some(_) => return Err("query must not be empty".to_string()),
            None => return Err("missing field: query".to_string()),
        };
        Ok(ChatTurn { session_id, query })
    }
}

/// Successful chat turn: the worker's answer plus the full updated history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub answer: String,
    pub history: Vec<Message>,
}

/// Failed chat turn: the worker's error text plus the unmodified history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatFailure {
    pub error: String,
    pub history: Vec<Message>,
}

/// Acknowledgement returned by `DELETE /history/{sessionId}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAck {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(body: &str) -> ChatRequest {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_validate_accepts_complete_request() {
        let turn = request(r#"{"sessionId":"s1","query":"hi"}"#)
            .validate()
            .unwrap();
        assert_eq!(turn.session_id, "s1");
        assert_eq!(turn.query, "hi");
    }

    #[test]
    fn test_validate_reports_missing_fields() {
        let err = request(r#"{"query":"hi"}"#).validate().unwrap_err();
        assert_eq!(err, "missing field: sessionId");

        let err = request(r#"{"sessionId":"s1"}"#).validate().unwrap_err();
        assert_eq!(err, "missing field: query");
    }

    #[test]
    fn test_validate_rejects_blank_values() {
        let err = request(r#"{"sessionId":"  ","query":"hi"}"#)
            .validate()
            .unwrap_err();
        assert!(err.contains("sessionId"));

        let err = request(r#"{"sessionId":"s1","query":""}"#)
            .validate()
            .unwrap_err();
        assert!(err.contains("query"));
    }

    #[test]
    fn test_wrong_type_fails_to_parse() {
        assert!(serde_json::from_str::<ChatRequest>(r#"{"sessionId":1,"query":"hi"}"#).is_err());
    }

    #[test]
    fn test_reply_serializes_contract_fields() {
        let reply = ChatReply {
            answer: "hello".to_string(),
            history: vec![Message::user("hi"), Message::assistant("hello")],
        };
        let value = serde_json::to_value(&reply).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "answer": "hello",
                "history": [
                    {"role": "user", "content": "hi"},
                    {"role": "assistant", "content": "hello"}
                ]
            })
        );
    }
}
