// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client-side form validation.
//!
//! Failures are reported per field and never reach a remote call.

use std::collections::BTreeMap;
use validator::{Validate, ValidationErrors};

/// Field name -> first failing message.
pub type FormErrors = BTreeMap<String, String>;

/// A form with required fields.
///
/// Blank required fields report "required" instead of whatever the derived
/// rules would say about an empty value.
pub trait Form: Validate {
    /// `(field, value, message)` for every required field.
    fn required(&self) -> Vec<(&'static str, &str, &'static str)>;
}

#[derive(Debug, Clone, Validate)]
pub struct LoginForm {
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    pub password: String,
}

impl Form for LoginForm {
    fn required(&self) -> Vec<(&'static str, &str, &'static str)> {
        vec![
            ("email", &self.email, "Email is required"),
            ("password", &self.password, "Password is required"),
        ]
    }
}

#[derive(Debug, Clone, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    pub username: String,
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

impl Form for RegisterForm {
    fn required(&self) -> Vec<(&'static str, &str, &'static str)> {
        vec![
            ("username", &self.username, "Username is required"),
            ("email", &self.email, "Email is required"),
            ("password", &self.password, "Password is required"),
            ("confirm_password", &self.confirm_password, "Confirm your password"),
        ]
    }
}

#[derive(Debug, Clone, Validate)]
pub struct RecoverForm {
    #[validate(email(message = "Invalid email"))]
    pub email: String,
}

impl Form for RecoverForm {
    fn required(&self) -> Vec<(&'static str, &str, &'static str)> {
        vec![("email", &self.email, "Email is required")]
    }
}

/// Validate a form, keeping one message per field.
pub fn check(form: &impl Form) -> Result<(), FormErrors> {
    let mut errors = match form.validate() {
        Ok(()) => FormErrors::new(),
        Err(errors) => first_messages(&errors),
    };

    for (field, value, message) in form.required() {
        if value.is_empty() {
            errors.insert(field.to_string(), message.to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn first_messages(errors: &ValidationErrors) -> FormErrors {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            let first = errs.first()?;
            let message = first
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| first.code.to_string());
            Some((field.to_string(), message))
        })
        .collect()
}
