//! User and authentication types

use serde::{Deserialize, Serialize};

/// Account privilege level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    #[default]
    Default,
    Admin,
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountType::Default => write!(f, "default"),
            AccountType::Admin => write!(f, "admin"),
        }
    }
}

/// User account as returned by `GET /auth/user`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub account_type: AccountType,
    pub enabled: bool,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.account_type == AccountType::Admin
    }
}

/// Access/refresh token pair held by the client
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
}

impl Session {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

// Tokens stay out of logs.
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// User login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// Ask the backend for a long-lived refresh token
    pub long_lived: bool,
}

/// Token refresh request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Body returned by both `/auth/login` and `/auth/refresh`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub id: i64,
    pub user_id: i64,
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenResponse {
    pub fn into_session(self) -> Session {
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
        }
    }
}

/// User registration request (admin only on the backend)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub account_type: AccountType,
}

/// Partial user update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_type: Option<AccountType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_type_wire_format() {
        let user: User = serde_json::from_str(
            r#"{"id":1,"username":"alice","account_type":"ADMIN","enabled":true}"#,
        )
        .unwrap();
        assert!(user.is_admin());
        assert_eq!(
            serde_json::to_value(AccountType::Default).unwrap(),
            serde_json::json!("DEFAULT")
        );
    }

    #[test]
    fn test_session_debug_hides_tokens() {
        let session = Session::new("secret-access", "secret-refresh");
        let printed = format!("{:?}", session);
        assert!(!printed.contains("secret"));
    }

    #[test]
    fn test_user_update_omits_unset_fields() {
        let update = UserUpdate {
            enabled: Some(false),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({ "enabled": false })
        );
    }
}
