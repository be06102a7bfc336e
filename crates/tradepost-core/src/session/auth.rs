use serde::{Deserialize, Serialize};

/// Body of `POST /auth/login`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful login response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_password() {
        let request = LoginRequest {
            email: "a@uni.edu".to_string(),
            password: "hunter22".to_string(),
        };
        let rendered = format!("{:?}", request);
        assert!(rendered.contains("a@uni.edu"));
        assert!(!rendered.contains("hunter22"));
    }
}
