use crate::InputMode;

pub const DEFAULT_MIN_TEXT_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("empty")]
    Empty,
    #[error("too short")]
    TooShort { min: usize, actual: usize },
}

/// Checks raw input against the mode's minimums and returns the trimmed content.
///
/// Lengths are counted in characters, not bytes.
pub fn validate(mode: InputMode, raw: &str, min_text_len: usize) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }
    if mode == InputMode::Text {
        let actual = trimmed.chars().count();
        if actual < min_text_len {
            return Err(ValidationError::TooShort {
                min: min_text_len,
                actual,
            });
        }
    }
    Ok(trimmed.to_string())
}
