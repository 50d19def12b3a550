//! Field validators and input sanitization.
//!
//! Pure functions with no side effects: each either accepts its input or
//! returns an `AppError::Validation` carrying a field-specific message.
//! Free-text input is sanitized (markup stripped) before it is validated or
//! stored anywhere.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::AppError;
use crate::models::TaskStatus;

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[\w.-]+@[\w.-]+\.\w+$").unwrap();
    // Script blocks are removed before the generic tag pass so their content
    // goes with them, not just the surrounding tags.
    static ref SCRIPT_BLOCK_REGEX: Regex = Regex::new(r"(?is)<script\b[^>]*>.*?</script>").unwrap();
    static ref TAG_REGEX: Regex = Regex::new(r"<[^>]+>").unwrap();
}

pub fn validate_email(email: &str) -> Result<(), AppError> {
    if email.is_empty() {
        return Err(AppError::Validation("Email is required".into()));
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err(AppError::Validation("Invalid email format".into()));
    }
    Ok(())
}

/// Minimum 8 characters with at least one uppercase letter, one lowercase
/// letter, and one digit. No special-character or maximum-length rule.
pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.is_empty() {
        return Err(AppError::Validation("Password is required".into()));
    }
    if password.chars().count() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters".into(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(AppError::Validation(
            "Password must contain at least one uppercase letter".into(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(AppError::Validation(
            "Password must contain at least one lowercase letter".into(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(
            "Password must contain at least one number".into(),
        ));
    }
    Ok(())
}

pub fn validate_task_title(title: &str) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".into()));
    }
    if title.chars().count() > 200 {
        return Err(AppError::Validation(
            "Title must be 200 characters or less".into(),
        ));
    }
    Ok(())
}

/// Accepts exactly `pending`, `in_progress`, or `completed` (case-sensitive)
/// and returns the parsed status.
pub fn validate_task_status(status: &str) -> Result<TaskStatus, AppError> {
    status.parse().map_err(|_| {
        AppError::Validation("Status must be one of: pending, in_progress, completed".into())
    })
}

/// Strips tag-delimited markup from free-text input: `<script>...</script>`
/// blocks first (case-insensitive, spanning newlines), then any remaining
/// `<...>` tags, then surrounding whitespace.
pub fn sanitize_input(text: &str) -> String {
    let without_scripts = SCRIPT_BLOCK_REGEX.replace_all(text, "");
    let without_tags = TAG_REGEX.replace_all(&without_scripts, "");
    without_tags.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("first.last-name_1@sub.domain.io").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign.com").is_err());
        assert!(validate_email("user@nodot").is_err());
        assert!(validate_email("user with space@example.com").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("Abcd1234").is_ok());
        assert!(validate_password("LongerPassw0rdWithNoSymbols").is_ok());

        assert!(validate_password("").is_err());
        assert!(validate_password("Ab1").is_err()); // too short
        assert!(validate_password("abcd1234").is_err()); // no uppercase
        assert!(validate_password("ABCD1234").is_err()); // no lowercase
        assert!(validate_password("Abcdefgh").is_err()); // no digit
    }

    #[test]
    fn test_validate_task_title() {
        assert!(validate_task_title("Buy milk").is_ok());
        assert!(validate_task_title(&"a".repeat(200)).is_ok());

        assert!(validate_task_title("").is_err());
        assert!(validate_task_title("   ").is_err());
        assert!(validate_task_title(&"a".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_task_status() {
        assert_eq!(validate_task_status("pending").unwrap(), TaskStatus::Pending);
        assert_eq!(
            validate_task_status("in_progress").unwrap(),
            TaskStatus::InProgress
        );
        assert_eq!(
            validate_task_status("completed").unwrap(),
            TaskStatus::Completed
        );

        assert!(validate_task_status("done").is_err());
        assert!(validate_task_status("Pending").is_err()); // case-sensitive
        assert!(validate_task_status("").is_err());
    }

    #[test]
    fn test_sanitize_strips_script_blocks_with_content() {
        assert_eq!(
            sanitize_input("<script>alert(1)</script>Buy milk"),
            "Buy milk"
        );
        assert_eq!(
            sanitize_input("<SCRIPT type=\"text/javascript\">evil()\nmore()</SCRIPT>ok"),
            "ok"
        );
    }

    #[test]
    fn test_sanitize_strips_tags() {
        assert_eq!(sanitize_input("<b>bold</b> text"), "bold text");
        assert_eq!(sanitize_input("  padded  "), "padded");
        assert_eq!(sanitize_input(""), "");
        assert_eq!(sanitize_input("<img src=x onerror=alert(1)>"), "");
    }
}
