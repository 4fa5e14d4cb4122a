//! Login client — the sign-up / sign-in flow that ends in user provisioning.
//!
//! DESIGN
//! ======
//! `AuthFlow` is generic over `IdentityProvider` so the flow can run against
//! the GoTrue REST API in production and a scripted double in tests. The
//! provider handle and HTTP client are built once by the caller and reused
//! for every submission.

pub mod flow;
pub mod form;
pub mod identity;

pub use flow::{AuthFlow, FlowError, FlowState};
pub use form::{AuthMode, Credentials, LoginForm};
pub use identity::{GoTrueClient, IdentityError, IdentityProvider, Session, SessionUser};
