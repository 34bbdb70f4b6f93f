//! Session domain model.
//!
//! The persisted shape mirrors the browser store the portal used: the state
//! object is camelCase and wrapped in a `{ state, version }` envelope.

use crate::ids::string_or_number;
use serde::{Deserialize, Serialize};

/// Storage key under which the session envelope is persisted.
pub const SESSION_STORAGE_KEY: &str = "auth-storage";

/// Current version of the persisted envelope.
pub const SESSION_STORAGE_VERSION: u32 = 0;

/// Role of the signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Student,
    Faculty,
    Admin,
    SuperAdmin,
    #[serde(other)]
    Other,
}

impl UserRole {
    /// Whether this role lands in the admin area after login.
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::SuperAdmin)
    }
}

/// Identity returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub role: UserRole,
    #[serde(default)]
    pub status: Option<String>,
}

impl AuthUser {
    /// Name shown in greetings: full name when known, username otherwise.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

/// Authentication state of the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: Option<AuthUser>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub is_authenticated: bool,
}

impl Session {
    /// Builds an authenticated session.
    pub fn authenticated(user: AuthUser, access_token: String, refresh_token: String) -> Self {
        Self {
            user: Some(user),
            access_token: Some(access_token),
            refresh_token: Some(refresh_token),
            is_authenticated: true,
        }
    }

    /// The signed-out state: every field cleared.
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn role(&self) -> Option<&UserRole> {
        self.user.as_ref().map(|u| &u.role)
    }
}

/// Envelope written to the key/value store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedSession {
    pub state: Session,
    #[serde(default)]
    pub version: u32,
}

impl PersistedSession {
    pub fn new(state: Session) -> Self {
        Self {
            state,
            version: SESSION_STORAGE_VERSION,
        }
    }
}

/// Credentials posted to the login endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Response of the login and refresh endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: AuthUser,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student() -> AuthUser {
        AuthUser {
            id: "u-1".to_string(),
            username: "asha".to_string(),
            email: "asha@campus.edu".to_string(),
            full_name: Some("Asha Rao".to_string()),
            role: UserRole::Student,
            status: Some("active".to_string()),
        }
    }

    #[test]
    fn test_persisted_shape_is_camel_case() {
        let session = Session::authenticated(student(), "a".into(), "r".into());
        let json = serde_json::to_value(PersistedSession::new(session)).unwrap();
        assert_eq!(json["state"]["isAuthenticated"], true);
        assert_eq!(json["state"]["accessToken"], "a");
        assert_eq!(json["state"]["refreshToken"], "r");
        assert_eq!(json["version"], 0);
    }

    #[test]
    fn test_unknown_role_deserializes_to_other() {
        let user: AuthUser = serde_json::from_str(
            r#"{"id": 5, "username": "x", "email": "x@y.z", "role": "librarian"}"#,
        )
        .unwrap();
        assert_eq!(user.role, UserRole::Other);
        assert_eq!(user.id, "5");
    }

    #[test]
    fn test_admin_roles() {
        assert!(UserRole::Admin.is_admin());
        assert!(UserRole::SuperAdmin.is_admin());
        assert!(!UserRole::Faculty.is_admin());
        assert!(!UserRole::Student.is_admin());
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        let mut user = student();
        assert_eq!(user.display_name(), "Asha Rao");
        user.full_name = Some("  ".to_string());
        assert_eq!(user.display_name(), "asha");
    }

    #[test]
    fn test_signed_out_is_empty() {
        let session = Session::signed_out();
        assert!(!session.is_authenticated);
        assert!(session.user.is_none());
        assert!(session.access_token.is_none());
        assert!(session.refresh_token.is_none());
    }
}
