/// Data structures for MailClip
use serde::{Deserialize, Serialize};

/// A captured email as stored by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CapturedEmail {
    pub id: i64,
    pub message_id: String,
    pub subject: String,
    pub sender: String,
    pub timestamp: String,
    pub body: String,
    pub url: String,
    pub captured_at: String,
    #[serde(default)]
    pub annotations: String,
}

/// A capture request before the backend assigns an id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailDraft {
    pub message_id: String,
    pub subject: String,
    pub sender: String,
    pub timestamp: String,
    pub body: String,
    pub url: String,
    pub captured_at: String,
}

/// Message sent from the content script to the background relay
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelayRequest {
    pub kind: String,
    pub email: EmailDraft,
}

/// The one request kind the relay understands
pub const CAPTURE_EMAIL: &str = "capture_email";

impl RelayRequest {
    pub fn capture(email: EmailDraft) -> RelayRequest {
        RelayRequest {
            kind: CAPTURE_EMAIL.to_string(),
            email,
        }
    }
}

/// Relay round-trip result: either the stored record or an error string
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelayResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<CapturedEmail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RelayResponse {
    pub fn ok(email: CapturedEmail) -> RelayResponse {
        RelayResponse {
            success: true,
            data: Some(email),
            error: None,
        }
    }

    pub fn err(error: String) -> RelayResponse {
        RelayResponse {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_email() -> CapturedEmail {
        CapturedEmail {
            id: 7,
            message_id: "19a2f3e8b1c".to_string(),
            subject: "Invoice #42".to_string(),
            sender: "billing@acme.com".to_string(),
            timestamp: "Mar 3, 2026, 9:14 AM".to_string(),
            body: "Please find attached the invoice for February.".to_string(),
            url: "https://mail.example.com/mail/u/0/?th=19a2f3e8b1c".to_string(),
            captured_at: "2026-03-03T17:20:05.000Z".to_string(),
            annotations: String::new(),
        }
    }

    #[test]
    fn test_serialization_round_trip() {
        let email = sample_email();

        let json = serde_json::to_string(&email).unwrap();
        let deserialized: CapturedEmail = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized, email);
    }

    #[test]
    fn test_annotations_default_when_missing() {
        // The backend omits annotations on freshly captured rows
        let json = r#"{
            "id": 1,
            "message_id": "abc",
            "subject": "Hi",
            "sender": "a@b.com",
            "timestamp": "now",
            "body": "text",
            "url": "https://mail.example.com",
            "captured_at": "2026-03-03T17:20:05.000Z"
        }"#;

        let email: CapturedEmail = serde_json::from_str(json).unwrap();

        assert_eq!(email.annotations, "");
    }

    #[test]
    fn test_relay_request_kind() {
        let draft = EmailDraft {
            message_id: "abc".to_string(),
            subject: "Hi".to_string(),
            sender: "a@b.com".to_string(),
            timestamp: "now".to_string(),
            body: "text".to_string(),
            url: "https://mail.example.com".to_string(),
            captured_at: "2026-03-03T17:20:05.000Z".to_string(),
        };

        let request = RelayRequest::capture(draft);

        assert_eq!(request.kind, CAPTURE_EMAIL);
    }

    #[test]
    fn test_relay_response_omits_empty_fields() {
        let response = RelayResponse::err("boom".to_string());
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"success\":false"));
        assert!(json.contains("\"error\":\"boom\""));
        assert!(!json.contains("\"data\""));
    }
}
