// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request drafts and their validation.
//!
//! Drafts hold raw client input. `validate` trims, checks every field,
//! and either returns the normalized value or a single
//! [`ResolveError::Validation`] listing every failing field.

use std::str::FromStr;
use std::sync::LazyLock;

use resolvenow_core::types::{
    Category, ComplaintFilter, ComplaintStatus, PageRequest, Priority, ProfileUpdate, UserFilter,
};
use resolvenow_core::{FieldError, ResolveError, Role};
use regex::Regex;
use serde::Deserialize;

pub const TITLE_LEN: (usize, usize) = (5, 200);
pub const DESCRIPTION_LEN: (usize, usize) = (10, 2000);
pub const MESSAGE_MAX: usize = 1000;
pub const NAME_LEN: (usize, usize) = (2, 100);
pub const ADDRESS_MAX: usize = 500;
pub const PASSWORD_MIN: usize = 6;
pub const FEEDBACK_COMMENT_MAX: usize = 1000;
pub const RATING_RANGE: (i64, i64) = (1, 5);

/// `local@domain.tld`, no whitespace, no empty domain labels.
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").unwrap());

/// Digits with optional `+`, spaces, dashes and parentheses.
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+\d\s()\-]+$").unwrap());

/// Accumulates field errors.
#[derive(Debug, Default)]
struct Errors(Vec<FieldError>);

impl Errors {
    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    fn length(&mut self, field: &str, value: &str, (min, max): (usize, usize), message: &str) {
        let len = value.chars().count();
        if len < min || len > max {
            self.push(field, message);
        }
    }

    fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, ResolveError> {
        if self.0.is_empty() {
            Ok(value())
        } else {
            Err(ResolveError::Validation { errors: self.0 })
        }
    }
}

/// Trimmed, with empty strings collapsed to `None`.
fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// --- Complaints ---

/// Raw body of a new complaint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComplaintDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
}

/// A complaint draft that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidComplaint {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
}

impl ComplaintDraft {
    pub fn validate(&self) -> Result<ValidComplaint, ResolveError> {
        let mut errors = Errors::default();
        let title = self.title.trim();
        let description = self.description.trim();
        errors.length(
            "title",
            title,
            TITLE_LEN,
            "Title must be between 5 and 200 characters",
        );
        errors.length(
            "description",
            description,
            DESCRIPTION_LEN,
            "Description must be between 10 and 2000 characters",
        );

        let category = Category::from_str(self.category.trim()).ok();
        if category.is_none() {
            errors.push("category", "Please select a valid category");
        }

        let priority = match non_empty(self.priority.as_deref()) {
            None => Some(Priority::default()),
            Some(raw) => Priority::from_str(&raw).ok(),
        };
        if priority.is_none() {
            errors.push("priority", "Please select a valid priority level");
        }

        // Free-form; only the profile phone is format-checked.
        let contact_phone = non_empty(self.contact_phone.as_deref());
        let address = non_empty(self.address.as_deref());
        if let Some(address) = &address {
            errors.length(
                "address",
                address,
                (0, ADDRESS_MAX),
                "Address cannot exceed 500 characters",
            );
        }

        errors.finish(|| ValidComplaint {
            title: title.to_string(),
            description: description.to_string(),
            category: category.unwrap_or(Category::Other),
            priority: priority.unwrap_or_default(),
            contact_phone,
            address,
        })
    }
}

/// Listing query: pagination plus optional filters, as sent in the URL.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComplaintQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub assigned_agent: Option<String>,
}

impl ComplaintQuery {
    pub fn page(&self, default_limit: u32) -> PageRequest {
        PageRequest::new(self.page, self.limit, default_limit)
    }

    /// Parse the filter fields. Blank values do not constrain.
    pub fn filter(&self) -> Result<ComplaintFilter, ResolveError> {
        let mut errors = Errors::default();
        let status = non_empty(self.status.as_deref()).and_then(|raw| {
            let parsed = ComplaintStatus::from_str(&raw).ok();
            if parsed.is_none() {
                errors.push("status", "Invalid status");
            }
            parsed
        });
        let category = non_empty(self.category.as_deref()).and_then(|raw| {
            let parsed = Category::from_str(&raw).ok();
            if parsed.is_none() {
                errors.push("category", "Please select a valid category");
            }
            parsed
        });
        let priority = non_empty(self.priority.as_deref()).and_then(|raw| {
            let parsed = Priority::from_str(&raw).ok();
            if parsed.is_none() {
                errors.push("priority", "Please select a valid priority level");
            }
            parsed
        });
        errors.finish(|| ComplaintFilter {
            owner_id: None,
            assigned_agent_id: non_empty(self.assigned_agent.as_deref()),
            status,
            category,
            priority,
        })
    }
}

/// User listing query.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

impl UserQuery {
    pub fn page(&self, default_limit: u32) -> PageRequest {
        PageRequest::new(self.page, self.limit, default_limit)
    }

    pub fn filter(&self) -> Result<UserFilter, ResolveError> {
        let role = match non_empty(self.role.as_deref()) {
            Some(raw) => Some(parse_role(&raw)?),
            None => None,
        };
        Ok(UserFilter {
            role,
            is_active: self.is_active,
        })
    }
}

/// Thread message body, trimmed, 1 to 1000 characters.
pub fn message_content(raw: &str) -> Result<String, ResolveError> {
    let mut errors = Errors::default();
    let content = raw.trim();
    errors.length(
        "content",
        content,
        (1, MESSAGE_MAX),
        "Message must be between 1 and 1000 characters",
    );
    errors.finish(|| content.to_string())
}

/// Resolution text, trimmed and non-empty.
pub fn resolution_text(raw: &str) -> Result<String, ResolveError> {
    let resolution = raw.trim();
    if resolution.is_empty() {
        return Err(ResolveError::validation(
            "resolution",
            "Resolution text is required",
        ));
    }
    Ok(resolution.to_string())
}

pub fn parse_status(raw: &str) -> Result<ComplaintStatus, ResolveError> {
    ComplaintStatus::from_str(raw.trim())
        .map_err(|_| ResolveError::InvalidStatus(format!("unknown status '{}'", raw.trim())))
}

pub fn parse_role(raw: &str) -> Result<Role, ResolveError> {
    Role::from_str(raw.trim()).map_err(|_| ResolveError::validation("role", "Invalid role"))
}

/// Raw feedback body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FeedbackDraft {
    pub rating: Option<i64>,
    pub comment: Option<String>,
}

impl FeedbackDraft {
    /// Returns the rating and the trimmed comment.
    pub fn validate(&self) -> Result<(u8, Option<String>), ResolveError> {
        let mut errors = Errors::default();
        let (min, max) = RATING_RANGE;
        let rating = self
            .rating
            .filter(|r| (min..=max).contains(r))
            .and_then(|r| u8::try_from(r).ok());
        if rating.is_none() {
            errors.push("rating", "Rating must be between 1 and 5");
        }
        let comment = non_empty(self.comment.as_deref());
        if let Some(comment) = &comment {
            errors.length(
                "comment",
                comment,
                (0, FEEDBACK_COMMENT_MAX),
                "Comment cannot exceed 1000 characters",
            );
        }
        errors.finish(|| (rating.unwrap_or(1), comment))
    }
}

// --- Accounts ---

/// Lowercased, trimmed address if it looks like `local@domain.tld`.
pub fn normalize_email(raw: &str) -> Option<String> {
    let email = raw.trim().to_ascii_lowercase();
    (email.len() <= 254 && EMAIL_PATTERN.is_match(&email)).then_some(email)
}

/// Phone characters only, with 7 to 15 digits.
pub fn is_phone(raw: &str) -> bool {
    let digits = raw.chars().filter(char::is_ascii_digit).count();
    (7..=15).contains(&digits) && PHONE_PATTERN.is_match(raw)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegistrationDraft {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// A registration that passed validation. The password is still plain text.
#[derive(Debug, Clone)]
pub struct ValidRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegistrationDraft {
    pub fn validate(&self) -> Result<ValidRegistration, ResolveError> {
        let mut errors = Errors::default();
        let name = self.name.trim();
        errors.length(
            "name",
            name,
            NAME_LEN,
            "Name must be between 2 and 100 characters",
        );
        let email = normalize_email(&self.email);
        if email.is_none() {
            errors.push("email", "Please provide a valid email address");
        }
        if self.password.chars().count() < PASSWORD_MIN {
            errors.push("password", "Password must be at least 6 characters long");
        }
        errors.finish(|| ValidRegistration {
            name: name.to_string(),
            email: email.unwrap_or_default(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginDraft {
    pub email: String,
    pub password: String,
}

impl LoginDraft {
    /// Returns the normalized email.
    pub fn validate(&self) -> Result<String, ResolveError> {
        let mut errors = Errors::default();
        let email = normalize_email(&self.email);
        if email.is_none() {
            errors.push("email", "Please provide a valid email address");
        }
        if self.password.is_empty() {
            errors.push("password", "Password is required");
        }
        errors.finish(|| email.unwrap_or_default())
    }
}

/// Raw profile update. Blank fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileDraft {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl ProfileDraft {
    pub fn validate(&self) -> Result<ProfileUpdate, ResolveError> {
        let mut errors = Errors::default();
        let name = non_empty(self.name.as_deref());
        if let Some(name) = &name {
            errors.length(
                "name",
                name,
                NAME_LEN,
                "Name must be between 2 and 100 characters",
            );
        }
        let phone = non_empty(self.phone.as_deref());
        if phone.as_deref().is_some_and(|p| !is_phone(p)) {
            errors.push("phone", "Please provide a valid phone number");
        }
        let address = non_empty(self.address.as_deref());
        if let Some(address) = &address {
            errors.length(
                "address",
                address,
                (0, ADDRESS_MAX),
                "Address cannot exceed 500 characters",
            );
        }
        errors.finish(|| ProfileUpdate {
            name,
            phone,
            address,
        })
    }
}
