//! Model family detection for model listing and ownership labels.

/// Provider family a CloudCode model id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFamily {
    /// Google Gemini models
    Gemini,
    /// Anthropic Claude models served through CloudCode
    Claude,
    /// Anything else; not exposed to clients
    Unsupported,
}

impl ModelFamily {
    /// Classify a model id, case-insensitively.
    pub fn from_model_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("claude") {
            Self::Claude
        } else if lower.contains("gemini") {
            Self::Gemini
        } else {
            Self::Unsupported
        }
    }

    /// Whether models of this family are listed to clients.
    pub fn is_supported(self) -> bool {
        self != Self::Unsupported
    }

    /// Value used for the OpenAI `owned_by` field.
    pub fn owner(self) -> &'static str {
        match self {
            Self::Gemini => "google",
            Self::Claude => "anthropic",
            Self::Unsupported => "unknown",
        }
    }
}
