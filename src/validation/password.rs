use serde::Serialize;

pub const MIN_PASSWORD_LENGTH: usize = 8;

const SPECIAL_CHARACTERS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?`~";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordCheck {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

struct Rules {
    long_enough: bool,
    upper: bool,
    lower: bool,
    digit: bool,
    special: bool,
}

impl Rules {
    fn of(password: &str) -> Self {
        Self {
            long_enough: password.chars().count() >= MIN_PASSWORD_LENGTH,
            upper: password.chars().any(|c| c.is_uppercase()),
            lower: password.chars().any(|c| c.is_lowercase()),
            digit: password.chars().any(|c| c.is_ascii_digit()),
            special: password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)),
        }
    }

    fn passed(&self) -> usize {
        [self.long_enough, self.upper, self.lower, self.digit, self.special]
            .iter()
            .filter(|ok| **ok)
            .count()
    }
}

/// Checks the password policy, one message per rule that is not met.
pub fn validate_password(password: &str) -> PasswordCheck {
    let rules = Rules::of(password);
    let mut errors = Vec::new();

    if !rules.long_enough {
        errors.push(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        ));
    }
    if !rules.upper {
        errors.push("Password must contain at least one uppercase letter".to_string());
    }
    if !rules.lower {
        errors.push("Password must contain at least one lowercase letter".to_string());
    }
    if !rules.digit {
        errors.push("Password must contain at least one number".to_string());
    }
    if !rules.special {
        errors.push("Password must contain at least one special character".to_string());
    }

    PasswordCheck {
        is_valid: errors.is_empty(),
        errors,
    }
}

pub fn password_strength(password: &str) -> PasswordStrength {
    let rules = Rules::of(password);
    match rules.passed() {
        5 if password.chars().count() >= 12 => PasswordStrength::Strong,
        4 | 5 => PasswordStrength::Medium,
        _ => PasswordStrength::Weak,
    }
}
