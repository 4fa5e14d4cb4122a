//! Login form fields and the checks run before any network call.

use crate::models::Role;
use crate::services::validation::{ValidationError, ValidationErrors, validate_email};

pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    SignUp,
    SignIn,
}

impl AuthMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SignUp => "signup",
            Self::SignIn => "signin",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "signup" => Some(Self::SignUp),
            "signin" => Some(Self::SignIn),
            _ => None,
        }
    }
}

/// Raw form input, as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub mode: String,
    pub role: String,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            mode: AuthMode::SignUp.as_str().to_owned(),
            role: Role::Customer.as_str().to_owned(),
        }
    }
}

/// Form input that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub mode: AuthMode,
    pub role: Role,
}

impl LoginForm {
    /// Check every field and return typed credentials.
    ///
    /// # Errors
    ///
    /// Returns all failing fields; nothing is sent anywhere.
    pub fn validate(&self) -> Result<Credentials, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(mut e) = validate_email("email", &self.email) {
            // The form shows one message for any malformed address.
            e.message = "Invalid email address".to_owned();
            errors.push(e);
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.push(ValidationError::field(
                "password",
                "too_small",
                format!("Min {MIN_PASSWORD_LENGTH} characters"),
            ));
        }
        let mode = AuthMode::parse(&self.mode);
        if mode.is_none() {
            errors.push(ValidationError::field("mode", "invalid_value", "Choose sign up or sign in"));
        }
        let role = Role::parse(&self.role);
        if role.is_none() {
            errors.push(ValidationError::field("role", "invalid_value", "Choose customer or staff"));
        }

        match (mode, role) {
            (Some(mode), Some(role)) if errors.is_empty() => Ok(Credentials {
                email: self.email.clone(),
                password: self.password.clone(),
                mode,
                role,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
#[path = "form_test.rs"]
mod tests;
