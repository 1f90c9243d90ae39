use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub merchant_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub discount_percent: Option<BigDecimal>,
}

impl Promotion {
    /// Banner and logo URLs that are actually set.
    pub fn image_urls(&self) -> impl Iterator<Item = &str> {
        [self.image_url.as_deref(), self.logo_url.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditLimit {
    pub total_limit: BigDecimal,
    pub available_limit: BigDecimal,
    #[serde(default)]
    pub currency: Option<String>,
}

impl CreditLimit {
    pub fn used(&self) -> BigDecimal {
        self.total_limit.clone() - self.available_limit.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_image_urls_skip_missing_and_blank() {
        let promotion: Promotion = serde_json::from_value(serde_json::json!({
            "id": "p1",
            "title": "Spring sale",
            "imageUrl": "https://cdn.example.com/banner.png",
            "logoUrl": "  "
        }))
        .unwrap();

        let urls: Vec<&str> = promotion.image_urls().collect();
        assert_eq!(urls, vec!["https://cdn.example.com/banner.png"]);
    }

    #[test]
    fn test_credit_limit_used() {
        let limit = CreditLimit {
            total_limit: BigDecimal::from_str("1000.00").unwrap(),
            available_limit: BigDecimal::from_str("250.50").unwrap(),
            currency: None,
        };
        assert_eq!(limit.used(), BigDecimal::from_str("749.50").unwrap());
    }
}
