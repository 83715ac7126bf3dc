use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// A request field that can be checked for presence.
pub trait Field {
    fn is_blank(&self) -> bool {
        false
    }
}

impl Field for String {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl Field for &str {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl Field for f64 {}
impl Field for i32 {}
impl Field for bool {}
impl<T> Field for Vec<T> {}

/// True unless the field is absent or a string that is empty after trimming.
pub fn is_valid<T: Field>(field: Option<&T>) -> bool {
    field.is_some_and(|f| !f.is_blank())
}

pub fn is_valid_name(name: &str) -> bool {
    lazy_static! {
        static ref NAME_RE: Regex = Regex::new(r"^[A-Za-z][A-Za-z .&'-]*$").unwrap();
    }
    NAME_RE.is_match(name.trim())
}

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Parses an entity id, failing with "Invalid {what} Id".
pub fn parse_id(raw: &str, what: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::validation(format!("Invalid {what} Id")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presence() {
        assert!(!is_valid::<String>(None));
        assert!(!is_valid(Some(&"   ".to_string())));
        assert!(!is_valid(Some(&String::new())));
        assert!(is_valid(Some(&"plumber".to_string())));
        assert!(is_valid(Some(&0.0_f64)));
        assert!(is_valid(Some(&false)));
        assert!(is_valid(Some(&Vec::<String>::new())));
    }

    #[test]
    fn names() {
        assert!(is_valid_name("Home Cleaning"));
        assert!(is_valid_name("Hair & Beauty"));
        assert!(is_valid_name("  Pet-Care  "));
        assert!(is_valid_name("O'Brien Repairs"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("123 Plumbing"));
        assert!(!is_valid_name("Cleaning!"));
        assert!(!is_valid_name("<script>"));
    }

    #[test]
    fn emails() {
        assert!(is_valid_email("ada@example.com"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("ada example.com"));
    }

    #[test]
    fn ids() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "Category").unwrap(), id);
        let err = parse_id("not-an-id", "Category").unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Invalid Category Id"));
    }
}
