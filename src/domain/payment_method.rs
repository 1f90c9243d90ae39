use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(alias = "cardId")]
    pub id: String,
    #[serde(alias = "lastFour")]
    pub last4: String,
    pub brand: String,
    #[serde(default)]
    pub is_active: bool,
}

impl Card {
    pub fn masked(&self) -> String {
        format!("{} •••• {}", self.brand.to_uppercase(), self.last4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_card() {
        let card: Card = serde_json::from_value(serde_json::json!({
            "cardId": "c1",
            "lastFour": "4242",
            "brand": "visa",
            "isActive": true
        }))
        .unwrap();
        assert_eq!(card.masked(), "VISA •••• 4242");
        assert!(card.is_active);
    }
}
