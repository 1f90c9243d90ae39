//! Domain selection between the identity service and the application API.

use serde::{Deserialize, Serialize};

/// Function names served by the identity domain.
pub const AUTH_FUNCTIONS: &[&str] = &[
    "login",
    "logout",
    "register",
    "signUp",
    "sendOtp",
    "verifyOtp",
    "resendOtp",
    "forgotPassword",
    "resetPassword",
    "changePassword",
    "refreshToken",
    "checkUserExists",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointType {
    #[default]
    App,
    Auth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Identity,
    App,
}

pub fn is_auth_function(function_name: &str) -> bool {
    let name = function_name.trim().to_lowercase();
    if name.is_empty() {
        return false;
    }
    AUTH_FUNCTIONS.iter().any(|known| {
        let known = known.to_lowercase();
        name.contains(&known) || known.contains(&name)
    })
}

pub fn select_domain(function_name: &str, endpoint_type: EndpointType) -> Domain {
    if endpoint_type == EndpointType::Auth || is_auth_function(function_name) {
        Domain::Identity
    } else {
        Domain::App
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_auth_names_route_to_identity() {
        assert_eq!(select_domain("login", EndpointType::App), Domain::Identity);
        assert_eq!(select_domain("verifyOtp", EndpointType::App), Domain::Identity);
    }

    #[test]
    fn test_match_is_case_insensitive_both_directions() {
        // function name contains a known name
        assert_eq!(select_domain("CustomerLogin", EndpointType::App), Domain::Identity);
        // known name contains the function name
        assert_eq!(select_domain("OTP", EndpointType::App), Domain::Identity);
    }

    #[test]
    fn test_endpoint_type_forces_identity() {
        assert_eq!(select_domain("getProfile", EndpointType::Auth), Domain::Identity);
    }

    #[test]
    fn test_business_functions_route_to_app() {
        assert_eq!(select_domain("validateSale", EndpointType::App), Domain::App);
        assert_eq!(select_domain("createLoan", EndpointType::App), Domain::App);
        assert_eq!(select_domain("getPromotions", EndpointType::App), Domain::App);
    }

    #[test]
    fn test_blank_name_never_matches_auth() {
        assert!(!is_auth_function(""));
        assert!(!is_auth_function("   "));
    }
}
