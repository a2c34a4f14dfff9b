//! Response envelope common to most FinDash endpoints

use serde::{Deserialize, Serialize};

/// Standard `{success, message, data}` wrapper
///
/// The refresh-token and profile endpoints return their payloads bare; every
/// other endpoint wraps them in this envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}
