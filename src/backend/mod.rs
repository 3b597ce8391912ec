//! Identity backend (Strapi Users & Permissions)
//!
//! Handles:
//! - Provider access token exchange
//! - Current user lookup

mod client;
mod models;

#[cfg(test)]
pub use client::MockIdentityBackend;
pub use client::{IdentityBackend, StrapiClient, endpoint_url};
pub use models::{AuthResponse, BackendUser};
