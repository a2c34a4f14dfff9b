//! Authentication-related common types

use serde::{Deserialize, Serialize};

/// User profile as returned by the backend
///
/// Passthrough representation; the client enforces no invariants beyond
/// presence of the fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub last_login_at: String,
    #[serde(rename = "lastLoginIP")]
    pub last_login_ip: String,
    pub created_at: String,
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_matches_wire_field_names() {
        let user: User = serde_json::from_str(
            r#"{
                "id": "u-1",
                "fullName": "Jane Doe",
                "email": "jane@x.com",
                "role": "user",
                "isActive": true,
                "lastLoginAt": "2025-01-01T00:00:00Z",
                "lastLoginIP": "10.0.0.1",
                "createdAt": "2024-06-01T00:00:00Z",
                "updatedAt": "2025-01-01T00:00:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(user.full_name, "Jane Doe");
        assert_eq!(user.last_login_ip, "10.0.0.1");

        // And serializes back with the same casing the backend expects
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("fullName").is_some());
        assert!(value.get("lastLoginIP").is_some());
        assert!(value.get("isActive").is_some());
    }
}
