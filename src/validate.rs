use crate::error::ApiError;
use crate::prompt::DEFAULT_TECHNIQUE;
use serde::Deserialize;

pub const NO_MESSAGE: &str = "No message provided";

/// Inbound chat body. Both fields are optional at the wire level so that `{}`
/// reaches validation instead of failing deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub technique: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ValidChat {
    pub message: String,
    pub technique: String,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Validator;

impl Validator {
    pub fn validate(&self, req: ChatRequest) -> Result<ValidChat, ApiError> {
        let message = match req.message {
            Some(m) if !m.is_empty() => m,
            _ => return Err(ApiError::Validation(NO_MESSAGE.to_string())),
        };
        let technique = req.technique.unwrap_or_else(|| DEFAULT_TECHNIQUE.to_string());
        Ok(ValidChat { message, technique })
    }
}
