//! Name validation for namespaces, types, and aliases.
//!
//! A valid name component:
//! - Is non-empty
//! - Contains no whitespace
//! - Contains no `.` (the qualified-path separator) or `/`
//! - Starts with an ASCII letter or `_`
//! - Continues with ASCII letters, digits, `_`, or `-`

use crate::error::{RegistryError, RegistryResult};

/// Validate a single name component, returning `Ok(())` if valid.
pub fn validate_name(name: &str) -> RegistryResult<()> {
    if name.is_empty() {
        return Err(RegistryError::InvalidName {
            name: name.to_string(),
            reason: "name must not be empty".into(),
        });
    }

    let mut chars = name.chars();
    let first = chars.next().expect("non-empty");
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(RegistryError::InvalidName {
            name: name.to_string(),
            reason: format!("must start with a letter or '_', got {first:?}"),
        });
    }

    for ch in chars {
        if !(ch.is_ascii_alphanumeric() || ch == '_' || ch == '-') {
            return Err(RegistryError::InvalidName {
                name: name.to_string(),
                reason: format!("contains forbidden character: {ch:?}"),
            });
        }
    }

    Ok(())
}

/// Validate a dotted lookup path: every component must be a valid name.
pub fn validate_path(path: &str) -> RegistryResult<()> {
    if path.is_empty() {
        return Err(RegistryError::InvalidName {
            name: path.to_string(),
            reason: "path must not be empty".into(),
        });
    }
    for component in path.split('.') {
        validate_name(component).map_err(|_| RegistryError::InvalidName {
            name: path.to_string(),
            reason: format!("invalid path component: {component:?}"),
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_simple_names() {
        assert!(validate_name("Blob").is_ok());
        assert!(validate_name("file_entry").is_ok());
        assert!(validate_name("_private").is_ok());
        assert!(validate_name("v1-compact").is_ok());
    }

    #[test]
    fn reject_empty() {
        assert!(validate_name("").is_err());
    }

    #[test]
    fn reject_leading_digit_or_dash() {
        assert!(validate_name("1type").is_err());
        assert!(validate_name("-lead").is_err());
    }

    #[test]
    fn reject_separators_and_whitespace() {
        assert!(validate_name("a.b").is_err());
        assert!(validate_name("a/b").is_err());
        assert!(validate_name("has space").is_err());
        assert!(validate_name("has\ttab").is_err());
    }

    #[test]
    fn valid_paths() {
        assert!(validate_path("fs.node.FileEntry").is_ok());
        assert!(validate_path("Blob").is_ok());
    }

    #[test]
    fn reject_bad_paths() {
        assert!(validate_path("").is_err());
        assert!(validate_path("a..b").is_err());
        assert!(validate_path(".lead").is_err());
        assert!(validate_path("trail.").is_err());
    }
}
