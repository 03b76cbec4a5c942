//! Scoring Domain Layer
//!
//! Core value types and trait interfaces shared by every other crate in the
//! workspace. It depends on nothing but `chrono`, and defines the concepts
//! the request pipeline speaks in.
//!
//! ## Key Concepts
//!
//! - **Auth Identity**: the account/login/token a request claims to come from
//! - **Gender**: the coded gender accepted by the scoring method
//! - **Status Code**: the outcome code carried by every response
//! - **Score Store**: the contract of the external key-value store
//!
//! ## Architecture
//!
//! - Pure data and traits only
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod gender;
pub mod identity;
pub mod status;
pub mod traits;

// Re-exports for convenience
pub use gender::Gender;
pub use identity::{AuthIdentity, DEFAULT_ADMIN_LOGIN};
pub use status::StatusCode;
pub use traits::{ScoreQuery, ScoreStore};
