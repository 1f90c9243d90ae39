pub mod password;
pub mod pin;

pub use password::{password_strength, validate_password, PasswordCheck, PasswordStrength};
pub use pin::{validate_pin, PinError};
