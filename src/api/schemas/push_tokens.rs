use crate::domain::notification::normalize_token;
use serde::{Deserialize, Serialize};

const MAX_TOKEN_LEN: usize = 4096;

#[derive(Debug, Deserialize)]
pub struct RegisterTokenRequest {
    #[serde(default)]
    pub token: String,
}

impl RegisterTokenRequest {
    /// Validates the token registration payload.
    ///
    /// # Errors
    /// Returns an error if the token is empty or excessively large (anti-abuse).
    pub fn validate(&self) -> Result<(), String> {
        let trimmed = normalize_token(&self.token);
        if trimmed.is_empty() {
            return Err("Device token is required".into());
        }
        if trimmed.len() > MAX_TOKEN_LEN {
            return Err(format!("Token is too long (max {MAX_TOKEN_LEN} characters)"));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}

impl ApiResponse {
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_token_success() {
        let req = RegisterTokenRequest { token: "valid_fcm_token_123".into() };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_validate_token_empty() {
        let req = RegisterTokenRequest { token: "   ".into() };
        let res = req.validate();
        assert!(res.is_err());
        assert_eq!(res.unwrap_err(), "Device token is required");
    }

    #[test]
    fn test_validate_token_too_long() {
        let req = RegisterTokenRequest { token: "A".repeat(4097) };
        let res = req.validate();
        assert!(res.is_err());
        assert_eq!(res.unwrap_err(), "Token is too long (max 4096 characters)");
    }

    #[test]
    fn test_missing_token_field_defaults_to_empty() {
        let req: RegisterTokenRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_err());
    }
}
