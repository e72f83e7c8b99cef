use std::sync::LazyLock;

use regex::Regex;

use crate::error::{UserError, UserResult};

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap());

/// Minimum name length in characters (not bytes), after trimming.
const MIN_NAME_CHARS: usize = 2;

const MIN_PHONE_DIGITS: usize = 10;
const MAX_PHONE_DIGITS: usize = 15;

/// Trim the name. Blank names and names shorter than
/// [`MIN_NAME_CHARS`] are distinct failures.
pub fn validate_name(raw: &str) -> UserResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(UserError::EmptyName);
    }
    if name.chars().count() < MIN_NAME_CHARS {
        return Err(UserError::InvalidName);
    }
    Ok(name.to_string())
}

/// Trim, lowercase and pattern-check the email. Blank and malformed
/// input are distinct failures; the normalized form is what gets stored
/// and compared for uniqueness.
pub fn validate_email(raw: &str) -> UserResult<String> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err(UserError::EmptyEmail);
    }
    if !EMAIL_REGEX.is_match(&email) {
        return Err(UserError::InvalidEmail);
    }
    Ok(email)
}

/// Normalize and check a phone number. Formatting separators (space,
/// hyphen, parentheses, dot) are stripped and one leading `+` is
/// preserved; any other non-digit fails. The remaining digit count must
/// be 10 to 15. Blank input means "no phone" and is always valid.
pub fn validate_phone(raw: &str) -> UserResult<Option<String>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let (has_plus, rest) = match trimmed.strip_prefix('+') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let mut digits = String::with_capacity(rest.len());
    for c in rest.chars() {
        match c {
            '0'..='9' => digits.push(c),
            ' ' | '-' | '(' | ')' | '.' => {}
            _ => return Err(UserError::InvalidPhone),
        }
    }

    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len()) {
        return Err(UserError::InvalidPhone);
    }

    Ok(Some(if has_plus {
        format!("+{}", digits)
    } else {
        digits
    }))
}
