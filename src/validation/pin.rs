use thiserror::Error;

pub const PIN_LENGTH: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PinError {
    #[error("PIN must be exactly 4 digits")]
    WrongLength,
    #[error("PIN must contain digits only")]
    NonDigit,
    #[error("PIN cannot use the same digit four times")]
    RepeatedDigits,
    #[error("PIN cannot be a sequence like 1234 or 4321")]
    Sequential,
}

/// Rejects PINs that are trivially guessable: one repeated digit or a
/// straight ascending/descending run.
pub fn validate_pin(pin: &str) -> Result<(), PinError> {
    if pin.chars().count() != PIN_LENGTH {
        return Err(PinError::WrongLength);
    }
    let digits: Vec<i8> = pin
        .chars()
        .map(|c| c.to_digit(10).map(|d| d as i8))
        .collect::<Option<_>>()
        .ok_or(PinError::NonDigit)?;

    if digits.windows(2).all(|w| w[0] == w[1]) {
        return Err(PinError::RepeatedDigits);
    }
    let ascending = digits.windows(2).all(|w| w[1] - w[0] == 1);
    let descending = digits.windows(2).all(|w| w[0] - w[1] == 1);
    if ascending || descending {
        return Err(PinError::Sequential);
    }
    Ok(())
}
