use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

use crate::app::state::{Group, Note, Student};

/// Failure surfaced by any API call. The server rejecting an operation and
/// the transport breaking underneath it both end up here; callers show the
/// message and roll back, they never branch on the kind.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Rejected(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Lightweight row returned by student search.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StudentSummary {
    pub id: String,
    pub name: String,
    #[serde(default, alias = "ability_level")]
    pub ability: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub group: Option<String>,
}

/// Full roster snapshot fetched once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct RosterPayload {
    pub program_name: String,
    pub current_week: u32,
    pub students: HashMap<String, Student>,
    pub groups: HashMap<String, Group>,
}

#[derive(Deserialize)]
struct Envelope {
    success: bool,
    message: Option<String>,
}

#[derive(Deserialize)]
struct SearchEnvelope {
    success: bool,
    message: Option<String>,
    #[serde(default)]
    results: Vec<StudentSummary>,
}

#[derive(Deserialize)]
struct NoteEnvelope {
    success: bool,
    message: Option<String>,
    note: Option<Note>,
}

fn accept(envelope: Envelope, fallback: &str) -> Result<(), ApiError> {
    if envelope.success {
        Ok(())
    } else {
        Err(ApiError::Rejected(
            envelope.message.unwrap_or_else(|| fallback.to_string()),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn fetch_roster(&self) -> Result<RosterPayload, ApiError> {
        let payload = self
            .http
            .get(format!("{}/api/roster", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json::<RosterPayload>()
            .await?;
        Ok(payload)
    }

    pub async fn search_students(&self, query: &str) -> Result<Vec<StudentSummary>, ApiError> {
        let envelope = self
            .http
            .get(format!("{}/api/students/search", self.base_url))
            .query(&[("q", query)])
            .send()
            .await?
            .json::<SearchEnvelope>()
            .await?;
        if envelope.success {
            Ok(envelope.results)
        } else {
            Err(ApiError::Rejected(
                envelope.message.unwrap_or_else(|| "Search failed".to_string()),
            ))
        }
    }

    pub async fn move_student(&self, student_id: &str, group_id: &str) -> Result<(), ApiError> {
        let envelope = self
            .http
            .post(format!("{}/api/groups/{}/students", self.base_url, group_id))
            .json(&serde_json::json!({ "student_id": student_id }))
            .send()
            .await?
            .json::<Envelope>()
            .await?;
        accept(envelope, "Failed to move student")
    }

    pub async fn rename_group(&self, group_id: &str, name: &str) -> Result<(), ApiError> {
        let envelope = self
            .http
            .put(format!("{}/api/groups/{}", self.base_url, group_id))
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await?
            .json::<Envelope>()
            .await?;
        accept(envelope, "Failed to update group name")
    }

    pub async fn delete_group(&self, group_id: &str) -> Result<(), ApiError> {
        let envelope = self
            .http
            .delete(format!("{}/api/groups/{}", self.base_url, group_id))
            .send()
            .await?
            .json::<Envelope>()
            .await?;
        accept(envelope, "Failed to delete group")
    }

    /// Appends a note; the server may echo the stored note back with its
    /// assigned timestamp and author.
    pub async fn add_note(&self, student_id: &str, note: &str) -> Result<Option<Note>, ApiError> {
        let envelope = self
            .http
            .post(format!("{}/api/students/{}/notes", self.base_url, student_id))
            .json(&serde_json::json!({ "note": note }))
            .send()
            .await?
            .json::<NoteEnvelope>()
            .await?;
        if envelope.success {
            Ok(envelope.note)
        } else {
            Err(ApiError::Rejected(
                envelope
                    .message
                    .unwrap_or_else(|| "Failed to save note".to_string()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{accept, ApiError, Envelope, NoteEnvelope, SearchEnvelope, StudentSummary};

    #[test]
    fn accept_passes_success_and_carries_server_message() {
        let ok: Envelope = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(accept(ok, "fallback").is_ok());

        let rejected: Envelope =
            serde_json::from_str(r#"{"success": false, "message": "group full"}"#).unwrap();
        match accept(rejected, "fallback") {
            Err(ApiError::Rejected(message)) => assert_eq!(message, "group full"),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn accept_falls_back_when_server_sends_no_message() {
        let rejected: Envelope = serde_json::from_str(r#"{"success": false}"#).unwrap();
        match accept(rejected, "Failed to move student") {
            Err(ApiError::Rejected(message)) => assert_eq!(message, "Failed to move student"),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn envelope_without_success_flag_is_malformed() {
        assert!(serde_json::from_str::<Envelope>(r#"{"message": "hi"}"#).is_err());
        assert!(serde_json::from_str::<Envelope>("[]").is_err());
    }

    #[test]
    fn search_envelope_parses_results() {
        let envelope: SearchEnvelope = serde_json::from_str(
            r#"{
                "success": true,
                "results": [
                    {"id": "s9", "name": "Alice", "ability": "Intermediate", "age": 9, "group": null}
                ]
            }"#,
        )
        .unwrap();
        assert!(envelope.success);
        assert_eq!(
            envelope.results,
            vec![StudentSummary {
                id: "s9".to_string(),
                name: "Alice".to_string(),
                ability: Some("Intermediate".to_string()),
                age: Some(9),
                group: None,
            }]
        );
    }

    #[test]
    fn search_envelope_tolerates_missing_results_on_failure() {
        let envelope: SearchEnvelope =
            serde_json::from_str(r#"{"success": false, "message": "bad query"}"#).unwrap();
        assert!(!envelope.success);
        assert!(envelope.results.is_empty());
    }

    #[test]
    fn note_envelope_parses_server_assigned_fields() {
        let envelope: NoteEnvelope = serde_json::from_str(
            r#"{
                "success": true,
                "note": {"timestamp": "2024-01-15T09:30:00Z", "author": "Instructor", "note": "great turns"}
            }"#,
        )
        .unwrap();
        let note = envelope.note.expect("note present");
        assert_eq!(note.author, "Instructor");
        assert_eq!(note.body, "great turns");
    }
}
