//! Input validation for process specifications.
//!
//! Structural integrity checks run at the boundary, before specs reach the
//! engine. The engine itself stays permissive: it coerces what it can and
//! treats malformed input as the caller's responsibility, so front ends
//! that want hard errors call [`validate_specs`] first. Detects:
//! - Duplicate explicit IDs
//! - Empty display names
//! - Zero-length bursts

use std::collections::HashSet;

use crate::models::ProcessSpec;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two specs share the same explicit ID.
    DuplicateId,
    /// A spec has an empty display name.
    EmptyName,
    /// A spec requires zero CPU ticks and could never complete normally.
    ZeroBurst,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates process specifications.
///
/// Checks:
/// 1. No duplicate explicit IDs (absent IDs are assigned later and cannot
///    collide)
/// 2. Every spec has a non-empty name
/// 3. Every burst is at least 1 tick
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_specs(specs: &[ProcessSpec]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut ids = HashSet::new();

    for (i, spec) in specs.iter().enumerate() {
        if let Some(id) = &spec.id {
            if !ids.insert(id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateId,
                    format!("Duplicate process ID: {id}"),
                ));
            }
        }

        if spec.name.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyName,
                format!("Process at index {i} has an empty name"),
            ));
        }

        if spec.burst == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroBurst,
                format!("Process '{}' has a zero burst", spec.name),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_specs() {
        let specs = vec![
            ProcessSpec::new("A", 0, 3).with_id("a"),
            ProcessSpec::new("B", 1, 2),
        ];
        assert!(validate_specs(&specs).is_ok());
    }

    #[test]
    fn test_duplicate_explicit_ids() {
        let specs = vec![
            ProcessSpec::new("A", 0, 1).with_id("same"),
            ProcessSpec::new("B", 0, 1).with_id("same"),
        ];
        let errors = validate_specs(&specs).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::DuplicateId);
    }

    #[test]
    fn test_absent_ids_do_not_collide() {
        let specs = vec![ProcessSpec::new("A", 0, 1), ProcessSpec::new("B", 0, 1)];
        assert!(validate_specs(&specs).is_ok());
    }

    #[test]
    fn test_empty_name() {
        let specs = vec![ProcessSpec::new("  ", 0, 1)];
        let errors = validate_specs(&specs).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::EmptyName);
    }

    #[test]
    fn test_zero_burst() {
        let specs = vec![ProcessSpec::new("A", 0, 0)];
        let errors = validate_specs(&specs).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::ZeroBurst);
    }

    #[test]
    fn test_all_errors_collected() {
        let specs = vec![
            ProcessSpec::new("", 0, 0).with_id("x"),
            ProcessSpec::new("B", 0, 1).with_id("x"),
        ];
        let errors = validate_specs(&specs).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_empty_input_is_valid() {
        assert!(validate_specs(&[]).is_ok());
    }
}
