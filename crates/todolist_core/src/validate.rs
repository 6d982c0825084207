use crate::error::AppError;
use crate::model::{PRIORITY_HIGHEST, PRIORITY_LOWEST};

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 32;

/// Authoritative name gate, also usable for per-keystroke feedback.
pub fn validate_name(name: &str) -> Result<(), AppError> {
    let chars = name.chars().count();
    if chars < NAME_MIN_CHARS || chars > NAME_MAX_CHARS {
        return Err(AppError::invalid_name(format!(
            "name must be {NAME_MIN_CHARS} to {NAME_MAX_CHARS} characters"
        )));
    }
    Ok(())
}

pub fn validate_priority(priority: u8) -> Result<(), AppError> {
    if !(PRIORITY_HIGHEST..=PRIORITY_LOWEST).contains(&priority) {
        return Err(AppError::invalid_input(format!(
            "priority must be between {PRIORITY_HIGHEST} and {PRIORITY_LOWEST}"
        )));
    }
    Ok(())
}
