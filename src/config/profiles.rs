use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Development,
    Staging,
    Production,
}

impl Profile {
    pub fn from_env() -> Self {
        std::env::var("APP_PROFILE")
            .ok()
            .and_then(|s| Self::parse(&s))
            .unwrap_or(Self::Development)
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "staging" | "stage" => Some(Self::Staging),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProfileDefaults {
    pub identity_url: String,
    pub app_url: String,
    pub request_timeout_secs: u64,
    pub image_concurrency: usize,
    pub breaker_failure_threshold: u32,
}

impl ProfileDefaults {
    pub fn for_profile(profile: Profile) -> Self {
        match profile {
            Profile::Development => Self {
                identity_url: "https://identity.dev.bnpl.example.com/mobile".to_string(),
                app_url: "https://api.dev.bnpl.example.com/mobile".to_string(),
                request_timeout_secs: 60,
                image_concurrency: 2,
                breaker_failure_threshold: 10,
            },
            Profile::Staging => Self {
                identity_url: "https://identity.staging.bnpl.example.com/mobile".to_string(),
                app_url: "https://api.staging.bnpl.example.com/mobile".to_string(),
                request_timeout_secs: 30,
                image_concurrency: 4,
                breaker_failure_threshold: 5,
            },
            Profile::Production => Self {
                identity_url: "https://identity.bnpl.example.com/mobile".to_string(),
                app_url: "https://api.bnpl.example.com/mobile".to_string(),
                request_timeout_secs: 30,
                image_concurrency: 4,
                breaker_failure_threshold: 5,
            },
        }
    }
}
