//! Payload bounds checks.
//!
//! Full structural schema validation lives outside this crate; these are
//! the field-level bounds every handler still enforces at validate time
//! (string lengths, small-integer ranges), reported as structured
//! [`TxError`]s rather than panics.

use crate::errors::TxError;

pub fn require_max_len(
    errors: &mut Vec<TxError>,
    tx_id: &str,
    field: &str,
    value: &str,
    max: usize,
) {
    if value.chars().count() > max {
        errors.push(
            TxError::new(format!("`{field}` is too long"), tx_id)
                .with_field(field)
                .with_actual(value.chars().count())
                .with_expected(format!("<= {max} characters")),
        );
    }
}

pub fn require_len_range(
    errors: &mut Vec<TxError>,
    tx_id: &str,
    field: &str,
    value: &str,
    min: usize,
    max: usize,
) {
    let len = value.chars().count();
    if len < min || len > max {
        errors.push(
            TxError::new(format!("`{field}` length is out of range"), tx_id)
                .with_field(field)
                .with_actual(len)
                .with_expected(format!("{min}..={max} characters")),
        );
    }
}

pub fn require_min_u32(errors: &mut Vec<TxError>, tx_id: &str, field: &str, value: u32, min: u32) {
    if value < min {
        errors.push(
            TxError::new(format!("`{field}` is below the minimum"), tx_id)
                .with_field(field)
                .with_actual(value)
                .with_expected(format!(">= {min}")),
        );
    }
}

pub fn require_min_i64(errors: &mut Vec<TxError>, tx_id: &str, field: &str, value: i64, min: i64) {
    if value < min {
        errors.push(
            TxError::new(format!("`{field}` is below the minimum"), tx_id)
                .with_field(field)
                .with_actual(value)
                .with_expected(format!(">= {min}")),
        );
    }
}

pub fn require_non_negative_amount(
    errors: &mut Vec<TxError>,
    tx_id: &str,
    field: &str,
    value: &crate::amount::Amount,
) {
    if value.is_negative() {
        errors.push(
            TxError::new(format!("`{field}` must not be negative"), tx_id)
                .with_field(field)
                .with_actual(value)
                .with_expected(">= 0"),
        );
    }
}
