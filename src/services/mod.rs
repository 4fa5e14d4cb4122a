//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own validation and persistence concerns so route handlers
//! can stay focused on request decoding and status mapping.

pub mod provisioning;
pub mod store;
pub mod validation;
