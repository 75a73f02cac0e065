use rust_decimal::Decimal;
use validator::ValidationError;

/// Exclusive upper bound; salaries are stored as `NUMERIC(12, 2)`.
const SALARY_LIMIT: i64 = 10_000_000_000;

pub fn validate_salary_range(
    min: Option<Decimal>,
    max: Option<Decimal>,
) -> Result<(), ValidationError> {
    for amount in [min, max].into_iter().flatten() {
        if amount.is_sign_negative() {
            return Err(ValidationError::new("salary_negative"));
        }
        if amount >= Decimal::from(SALARY_LIMIT) {
            return Err(ValidationError::new("salary_too_large"));
        }
    }
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(ValidationError::new("salary_range")),
        _ => Ok(()),
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Drops blank entries and surrounding whitespace from a free-form list.
pub fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salary_range_rules() {
        assert!(validate_salary_range(None, None).is_ok());
        assert!(validate_salary_range(Some(Decimal::new(50_000, 0)), None).is_ok());
        assert!(
            validate_salary_range(Some(Decimal::new(50_000, 0)), Some(Decimal::new(80_000, 0)))
                .is_ok()
        );
        assert!(
            validate_salary_range(Some(Decimal::new(90_000, 0)), Some(Decimal::new(80_000, 0)))
                .is_err()
        );
        assert!(validate_salary_range(Some(Decimal::new(-1, 0)), None).is_err());
        assert!(validate_salary_range(None, Some(Decimal::new(-1, 0))).is_err());
    }

    #[test]
    fn salaries_must_fit_the_stored_precision() {
        let limit = Decimal::from(SALARY_LIMIT);
        assert!(validate_salary_range(None, Some(limit - Decimal::ONE)).is_ok());
        let err = validate_salary_range(None, Some(limit)).unwrap_err();
        assert_eq!(err.code, "salary_too_large");
        assert!(validate_salary_range(Some(Decimal::from(1_000_000_000_000_i64)), None).is_err());
    }

    #[test]
    fn emails_are_lowercased_and_trimmed() {
        assert_eq!(normalize_email("  Jane@Example.COM "), "jane@example.com");
    }

    #[test]
    fn list_cleaning_drops_blanks() {
        let cleaned = clean_list(vec![" rust ".into(), "".into(), "  ".into(), "sql".into()]);
        assert_eq!(cleaned, vec!["rust".to_string(), "sql".to_string()]);
    }
}
