//! Form payloads and validation
//!
//! Typed bodies for the contribution and account forms, with the field
//! rules the templates surface back to the visitor.

use serde::{Deserialize, Serialize};

pub const MAX_NAME_LEN: usize = 128;
pub const MAX_TITLE_LEN: usize = 128;
pub const MAX_URL_LEN: usize = 200;

/// A single failed field check, rendered next to the form.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Collected validation failures for one submission.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct FormErrors(Vec<FieldError>);

impl FormErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Prefix scheme-less URLs so stored links always resolve.
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.is_empty() || trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub name: String,
}

impl CategoryForm {
    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::default();
        if self.name.trim().is_empty() {
            errors.add("name", "This field is required.");
        } else if self.name.len() > MAX_NAME_LEN {
            errors.add(
                "name",
                format!("Ensure this value has at most {MAX_NAME_LEN} characters."),
            );
        }
        errors
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
}

impl PageForm {
    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::default();
        if self.title.trim().is_empty() {
            errors.add("title", "This field is required.");
        } else if self.title.len() > MAX_TITLE_LEN {
            errors.add(
                "title",
                format!("Ensure this value has at most {MAX_TITLE_LEN} characters."),
            );
        }

        let url = self.normalized_url();
        if url.is_empty() {
            errors.add("url", "This field is required.");
        } else if url.len() > MAX_URL_LEN {
            errors.add(
                "url",
                format!("Ensure this value has at most {MAX_URL_LEN} characters."),
            );
        }
        errors
    }

    /// The URL as it will be stored.
    pub fn normalized_url(&self) -> String {
        normalize_url(&self.url)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrationForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub picture: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::default();
        if self.username.trim().is_empty() {
            errors.add("username", "This field is required.");
        }
        if self.email.trim().is_empty() {
            errors.add("email", "This field is required.");
        } else if !self.email.contains('@') {
            errors.add("email", "Enter a valid email address.");
        }
        if self.password.is_empty() {
            errors.add("password", "This field is required.");
        }
        errors
    }

    /// Optional profile website, normalized like page URLs.
    pub fn website_field(&self) -> Option<String> {
        let website = normalize_url(&self.website);
        if website.is_empty() { None } else { Some(website) }
    }

    /// Optional profile picture reference.
    pub fn picture_field(&self) -> Option<String> {
        let picture = self.picture.trim();
        if picture.is_empty() {
            None
        } else {
            Some(picture.to_string())
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::default();
        if self.username.trim().is_empty() {
            errors.add("username", "This field is required.");
        }
        if self.password.is_empty() {
            errors.add("password", "This field is required.");
        }
        errors
    }
}
