//! CloudCode `v1internal` envelopes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::gemini::GeminiInternalRequest;

/// Placeholder project id used while onboarding.
pub const ONBOARDING_PROJECT_PLACEHOLDER: &str = "default";

/// Tier used when the account has no tier marked as default.
pub const FALLBACK_TIER_ID: &str = "free-tier";

/// Top-level body for `generateContent` / `streamGenerateContent`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    #[serde(default)]
    pub model: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project: String,
    #[serde(rename = "user_prompt_id", default, skip_serializing_if = "Option::is_none")]
    pub user_prompt_id: Option<String>,
    #[serde(default)]
    pub request: GeminiInternalRequest,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_agent: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub request_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub request_id: String,
}

impl GenerateContentRequest {
    pub fn new(model: impl Into<String>, project: impl Into<String>, request: GeminiInternalRequest) -> Self {
        Self { model: model.into(), project: project.into(), request, ..Self::default() }
    }
}

/// IDE/platform identification sent with discovery and onboarding calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientMetadata {
    pub ide_type: String,
    pub platform: String,
    pub plugin_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duet_project: Option<String>,
}

impl Default for ClientMetadata {
    fn default() -> Self {
        Self {
            ide_type: "IDE_UNSPECIFIED".to_string(),
            platform: "PLATFORM_UNSPECIFIED".to_string(),
            plugin_type: "GEMINI".to_string(),
            duet_project: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoadCodeAssistRequest {
    pub metadata: ClientMetadata,
}

/// Service tier offered to the account.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tier {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "userDefinedCloudaicompanionProject", default)]
    pub user_defined_cloudaicompanion_project: bool,
    #[serde(default)]
    pub is_default: bool,
}

/// Discovery response from `loadCodeAssist`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadCodeAssistResponse {
    #[serde(default)]
    pub current_tier: Option<Tier>,
    #[serde(default)]
    pub allowed_tiers: Vec<Tier>,
    #[serde(rename = "cloudaicompanionProject", default)]
    pub cloudaicompanion_project: String,
    /// Absent means managed: only an explicit `false` selects the direct path.
    /// A missing field is never read as unmanaged, so an account that reports
    /// no companion project goes through onboarding.
    #[serde(default = "default_gcp_managed")]
    pub gcp_managed: bool,
    #[serde(default)]
    pub manage_subscription_uri: String,
}

fn default_gcp_managed() -> bool {
    true
}

impl LoadCodeAssistResponse {
    /// Id of the tier flagged `isDefault`, else the free tier.
    pub fn default_tier_id(&self) -> &str {
        self.allowed_tiers
            .iter()
            .find(|t| t.is_default && !t.id.is_empty())
            .map(|t| t.id.as_str())
            .unwrap_or(FALLBACK_TIER_ID)
    }
}

/// Body of `onboardUser`. Resubmitted verbatim on every poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardUserRequest {
    pub tier_id: String,
    #[serde(rename = "cloudaicompanionProject")]
    pub cloudaicompanion_project: String,
    pub metadata: ClientMetadata,
}

impl OnboardUserRequest {
    pub fn for_tier(tier_id: impl Into<String>) -> Self {
        Self {
            tier_id: tier_id.into(),
            cloudaicompanion_project: ONBOARDING_PROJECT_PLACEHOLDER.to_string(),
            metadata: ClientMetadata {
                duet_project: Some(ONBOARDING_PROJECT_PLACEHOLDER.to_string()),
                ..ClientMetadata::default()
            },
        }
    }
}

/// Long-running operation handle returned by `onboardUser`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OnboardOperation {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub response: Option<Value>,
}

impl OnboardOperation {
    /// `response.cloudaicompanionProject.id`, when present and non-empty.
    pub fn companion_project_id(&self) -> Option<&str> {
        self.response
            .as_ref()?
            .get("cloudaicompanionProject")?
            .get("id")?
            .as_str()
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FetchAvailableModelsResponse {
    #[serde(default)]
    pub models: BTreeMap<String, AvailableModel>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableModel {
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota_info: Option<Map<String, Value>>,
}
