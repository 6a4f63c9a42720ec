use serde::{Deserialize, Serialize};

/// Values the host supplies on every refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostInputs {
    /// Comment collection text, bare array or `{ "value": [...] }`.
    pub comments_json: String,
    pub site_url: String,
    pub record_id: String,
    /// Correlated result of the external workflow, if the host has one.
    pub flow_return: Option<String>,
    pub is_loading: bool,
}

/// Request the host dispatches to the external workflow after a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RequestPayload {
    pub site_url: String,
    pub record_id: String,
    pub text: String,
    pub operation_id: String,
}

impl RequestPayload {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Host-facing outputs, recomputed after every transition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Outputs {
    #[serde(rename = "CommentsJSONOut")]
    pub comments_json: String,
    #[serde(rename = "IsBusyOut")]
    pub is_busy: bool,
    #[serde(rename = "LastError")]
    pub last_error: String,
    #[serde(rename = "OperationIdOut")]
    pub operation_id: String,
    #[serde(rename = "RequestPayloadOut")]
    pub request_payload: String,
    #[serde(rename = "NewCommentText")]
    pub new_comment_text: String,
    #[serde(rename = "NewCommentTrigger")]
    pub new_comment_trigger: u64,
}
