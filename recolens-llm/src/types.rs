use serde::{Deserialize, Serialize};

/// Returned when a successful response carries no `text` field
pub const NO_RECOMMENDATIONS: &str = "No recommendations generated";

/// JSON body posted to the generation endpoint
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GenerateRequest<'a> {
    pub prompt: &'a str,
    pub system_prompt: &'a str,
    pub model: &'a str,
}

/// Expected JSON response; unknown fields are ignored
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateResponse {
    pub fn into_text(self) -> String {
        self.text.unwrap_or_else(|| NO_RECOMMENDATIONS.to_string())
    }
}
