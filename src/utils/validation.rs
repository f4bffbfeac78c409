use validator::{Validate, ValidationError, ValidationErrors};

use crate::errors::AppError;

/// Validates `payload`, reporting the first failing rule of the first failing
/// field in `field_order` so clients get one stable message.
pub fn validate_payload<T: Validate>(payload: &T, field_order: &[&str]) -> Result<(), AppError> {
    payload
        .validate()
        .map_err(|errors| AppError::BadRequest(first_message(&errors, field_order)))
}

pub fn first_message(errors: &ValidationErrors, field_order: &[&str]) -> String {
    let field_errors = errors.field_errors();

    field_order
        .iter()
        .filter_map(|field| field_errors.get(field))
        .chain(field_errors.values())
        .find_map(|errs| errs.first())
        .map(describe)
        .unwrap_or_else(|| errors.to_string())
}

fn describe(err: &ValidationError) -> String {
    match &err.message {
        Some(message) => message.to_string(),
        None => err.code.to_string(),
    }
}
