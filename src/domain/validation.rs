//! Input validation shared by users and habits

/// A field that failed validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub(crate) fn require_min_chars(
    field: &'static str,
    value: &str,
    min: usize,
) -> Result<(), ValidationError> {
    if value.chars().count() < min {
        return Err(ValidationError::new(
            field,
            format!("must be at least {min} characters"),
        ));
    }
    Ok(())
}

pub(crate) fn require_email(value: &str) -> Result<(), ValidationError> {
    let valid = value
        .split_once('@')
        .map(|(local, domain)| {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.contains(char::is_whitespace)
        })
        .unwrap_or(false);

    if !valid {
        return Err(ValidationError::new("email", "must be a valid email address"));
    }
    Ok(())
}

/// `#RRGGBB`
pub(crate) fn require_hex_color(value: &str) -> Result<(), ValidationError> {
    let valid = value
        .strip_prefix('#')
        .map(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
        .unwrap_or(false);

    if !valid {
        return Err(ValidationError::new("color", "must look like #RRGGBB"));
    }
    Ok(())
}

/// Trimmed text, with blank values collapsed to `None`
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shapes() {
        assert!(require_email("ana@example.com").is_ok());
        assert!(require_email("a@b").is_ok());
        assert!(require_email("ana.example.com").is_err());
        assert!(require_email("@example.com").is_err());
        assert!(require_email("ana@").is_err());
        assert!(require_email("a@b@c").is_err());
        assert!(require_email("an a@example.com").is_err());
    }

    #[test]
    fn test_hex_color() {
        assert!(require_hex_color("#3B82F6").is_ok());
        assert!(require_hex_color("#10b981").is_ok());
        assert!(require_hex_color("3B82F6").is_err());
        assert!(require_hex_color("#3B82F").is_err());
        assert!(require_hex_color("#GGGGGG").is_err());
    }

    #[test]
    fn test_min_chars_counts_characters() {
        assert!(require_min_chars("name", "ab", 2).is_ok());
        assert!(require_min_chars("name", "é", 2).is_err());
        let err = require_min_chars("username", "ab", 3).unwrap_err();
        assert_eq!(err.to_string(), "username: must be at least 3 characters");
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(Some(" run ".into())), Some("run".into()));
        assert_eq!(non_blank(None), None);
    }
}
