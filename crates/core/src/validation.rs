//! Input validation helpers shared by request DTOs.
//!
//! DTOs derive [`validator::Validate`]; the resulting
//! [`ValidationErrors`] are flattened into [`FieldError`]s so handlers can
//! report every offending field at once.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::error::{CoreError, FieldError};

/// Minimum username length.
pub const MIN_USERNAME_LEN: u64 = 3;

/// Maximum username length.
pub const MAX_USERNAME_LEN: u64 = 64;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: u64 = 6;

/// Usernames: letters, digits, and `.`, `_`, `-`, `@`, `+`.
static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._@+-]+$").expect("valid username regex"));

/// `validator` custom function for usernames.
pub fn validate_username_chars(username: &str) -> Result<(), ValidationError> {
    if USERNAME_RE.is_match(username) {
        Ok(())
    } else {
        Err(ValidationError::new("username_chars").with_message(Cow::Borrowed(
            "Username may only contain letters, digits and . _ - @ +",
        )))
    }
}

/// `validator` custom function rejecting blank (whitespace-only) strings.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank").with_message(Cow::Borrowed("must not be blank")))
    } else {
        Ok(())
    }
}

/// Flatten nested `validator` errors into `field -> message` pairs.
///
/// Field names are reported in camelCase to match the JSON bodies. Nested
/// struct and list errors get dotted / indexed paths (`tasks[2].dueDate`).
/// Output is sorted by field for stable responses.
pub fn flatten_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    collect(errors, None, &mut out);
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

fn collect(errors: &ValidationErrors, prefix: Option<&str>, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let field = camel_case(field);
        let path = match prefix {
            Some(p) => format!("{p}.{field}"),
            None => field.to_string(),
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                for err in list {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{path} is invalid ({})", err.code));
                    out.push(FieldError::new(path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, Some(&path), out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(inner, Some(&format!("{path}[{index}]")), out);
                }
            }
        }
    }
}

/// `cover_image` -> `coverImage`.
fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl From<ValidationErrors> for CoreError {
    fn from(errors: ValidationErrors) -> Self {
        CoreError::InvalidFields(flatten_errors(&errors))
    }
}
