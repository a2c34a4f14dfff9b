//! API DTOs module
//!
//! This module contains all API data transfer objects organized by domain:
//! - `auth`: Authentication and session management
//! - `financial`: Dashboard financial data

pub mod auth;
pub mod financial;

pub use auth::*;
pub use financial::*;
