//! Review Stage - Reads the Handoff Once Per Visit

use serde::Serialize;

use crate::handoff::{HandoffChannel, SessionStore};
use crate::hashing::submission_digest;
use crate::intake::Navigation;
use crate::submission::SubmissionRecord;

pub const REVIEW_HEADING: &str = "Review Intake Payload";
pub const NO_PAYLOAD_MESSAGE: &str = "No payload found. Go back and submit the form.";
pub const GENERATE_PLAN_LABEL: &str = "Generate Plan (next step)";

/// What the review stage shows on load.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewView {
    /// Nothing usable was handed off (absent or corrupt).
    NoPayload,
    Payload {
        record: SubmissionRecord,
        digest: Option<String>,
    },
}

/// The plan-generation call-to-action. Disabled until that service exists.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NextStepAction {
    pub label: &'static str,
    pub enabled: bool,
}

impl ReviewView {
    pub fn load<S: SessionStore>(channel: &HandoffChannel<S>, key: &str) -> Self {
        match channel.get(key) {
            Some(record) => {
                let digest = submission_digest(&record).ok();
                ReviewView::Payload { record, digest }
            }
            None => ReviewView::NoPayload,
        }
    }

    pub fn record(&self) -> Option<&SubmissionRecord> {
        match self {
            ReviewView::Payload { record, .. } => Some(record),
            ReviewView::NoPayload => None,
        }
    }

    /// The only recovery from a miss is re-entering and resubmitting.
    pub fn back(&self) -> Navigation {
        Navigation::ToIntake
    }

    pub fn next_step(&self) -> NextStepAction {
        NextStepAction { label: GENERATE_PLAN_LABEL, enabled: false }
    }

    /// Body text: the no-payload notice or the pretty-printed record.
    pub fn render(&self) -> Result<String, serde_json::Error> {
        match self {
            ReviewView::NoPayload => Ok(NO_PAYLOAD_MESSAGE.to_string()),
            ReviewView::Payload { record, .. } => serde_json::to_string_pretty(record),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ReviewView::NoPayload => serde_json::json!({
                "heading": REVIEW_HEADING,
                "payload": null,
                "message": NO_PAYLOAD_MESSAGE,
                "nextStep": self.next_step(),
            }),
            ReviewView::Payload { record, digest } => serde_json::json!({
                "heading": REVIEW_HEADING,
                "payload": record,
                "digest": digest,
                "nextStep": self.next_step(),
            }),
        }
    }
}
