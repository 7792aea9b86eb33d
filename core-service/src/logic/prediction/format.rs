//! User-facing messages

use crate::logic::error::{ModelError, SchemaError};

/// "Predicted oil production: 1834.57 litres/hectare"
pub fn format_estimate(litres_per_hectare: f64) -> String {
    format!("Predicted oil production: {:.2} litres/hectare", litres_per_hectare)
}

/// Message shown when the form is incomplete or holds a non-numeric value
pub fn rejection_message(error: &SchemaError) -> String {
    match error.field() {
        Some(field) => format!(
            "Please fill in all values to compute the prediction (missing or invalid: {}).",
            field
        ),
        None => "Please fill in all values to compute the prediction.".to_string(),
    }
}

/// Message shown on an internal fault
pub fn failure_message(cause: &ModelError) -> String {
    format!("Internal prediction error: {}", cause)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_has_two_decimals() {
        assert_eq!(format_estimate(1834.5678), "Predicted oil production: 1834.57 litres/hectare");
        assert_eq!(format_estimate(1900.0), "Predicted oil production: 1900.00 litres/hectare");
    }

    #[test]
    fn test_rejection_names_field() {
        let msg = rejection_message(&SchemaError::MissingField("humidity"));
        assert_eq!(
            msg,
            "Please fill in all values to compute the prediction (missing or invalid: humidity)."
        );
    }

    #[test]
    fn test_failure_carries_cause() {
        let msg = failure_message(&ModelError::NonFinite(f64::NAN));
        assert!(msg.starts_with("Internal prediction error: "));
        assert!(msg.contains("non-finite"));
    }
}
