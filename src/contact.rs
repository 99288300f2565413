//! Contact form validation and `mailto:` link building.
//!
//! The site has no backend; submitting the form opens the visitor's mail
//! client with the message prefilled.

use thiserror::Error;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ContactError {
    #[error("name is required")]
    MissingName,
    #[error("email address is not valid")]
    InvalidEmail,
    #[error("message is required")]
    MissingMessage,
}

impl ContactError {
    /// Form field the error belongs to, matching the input `name` attributes.
    pub fn field(self) -> &'static str {
        match self {
            ContactError::MissingName => "name",
            ContactError::InvalidEmail => "email",
            ContactError::MissingMessage => "message",
        }
    }
}

impl ContactMessage {
    /// All field errors, in form order. Empty means valid.
    pub fn validate(&self) -> Vec<ContactError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(ContactError::MissingName);
        }
        if !is_plausible_email(self.email.trim()) {
            errors.push(ContactError::InvalidEmail);
        }
        if self.message.trim().is_empty() {
            errors.push(ContactError::MissingMessage);
        }
        errors
    }

    pub fn subject_line(&self) -> String {
        let subject = self.subject.trim();
        if subject.is_empty() {
            format!("Inquiry from {}", self.name.trim())
        } else {
            subject.to_string()
        }
    }

    pub fn body(&self) -> String {
        format!(
            "{}\n\n--\n{} <{}>",
            self.message.trim(),
            self.name.trim(),
            self.email.trim()
        )
    }

    /// Validated `mailto:` URL addressed to `recipient`.
    pub fn mailto_url(&self, recipient: &str) -> Result<String, Vec<ContactError>> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(format!(
            "mailto:{}?subject={}&body={}",
            recipient,
            urlencoding::encode(&self.subject_line()),
            urlencoding::encode(&self.body())
        ))
    }
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .map(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
            .unwrap_or(false)
}
