//! Test utilities and helpers for unit tests
//!
//! This module provides common testing utilities including:
//! - Fixture builders for users and API payloads
//! - Helper functions for temporary storage

#[cfg(test)]
pub mod test_helpers {
    use tempfile::TempDir;

    use findash_protocol::common::User;

    use crate::config::{ClientConfig, ClientConfigBuilder};

    /// Create a temporary directory for testing
    pub fn create_temp_dir() -> TempDir {
        tempfile::tempdir().expect("Failed to create temp dir")
    }

    /// Client configuration pointing at a fake host
    pub fn test_client_config() -> ClientConfig {
        ClientConfigBuilder::new()
            .base_url("https://api.test/api")
            .timeout(5)
            .build()
            .expect("test config is valid")
    }

    /// A complete user fixture
    pub fn sample_user(id: &str) -> User {
        User {
            id: id.to_string(),
            full_name: "Test User".to_string(),
            email: "user@x.com".to_string(),
            role: "user".to_string(),
            is_active: true,
            last_login_at: "2025-01-01T00:00:00Z".to_string(),
            last_login_ip: "127.0.0.1".to_string(),
            created_at: "2024-06-01T00:00:00Z".to_string(),
            updated_at: "2025-01-01T00:00:00Z".to_string(),
        }
    }

    /// The same fixture as the backend would serialize it
    pub fn sample_user_json(id: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "fullName": "Test User",
            "email": "user@x.com",
            "role": "user",
            "isActive": true,
            "lastLoginAt": "2025-01-01T00:00:00Z",
            "lastLoginIP": "127.0.0.1",
            "createdAt": "2024-06-01T00:00:00Z",
            "updatedAt": "2025-01-01T00:00:00Z"
        })
    }

    /// Wrap a payload in the standard success envelope
    pub fn enveloped(data: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "success": true,
            "message": "OK",
            "data": data
        })
    }
}
