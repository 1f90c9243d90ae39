use serde::Serialize;

use super::resolver::{resolve_sale_code, ResolutionSource};

pub const DEEP_LINK_SCHEME: &str = "bnplcustomer";

/// Where an OS-level deep link should take the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", rename_all = "camelCase")]
pub enum DeepLinkTarget {
    #[serde(rename_all = "camelCase")]
    Order {
        sale_code: String,
        merchant_id: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Merchant { merchant_id: String },
}

/// Maps a deep link URL to a navigation target.
///
/// Unlike scanner input, a deep link must match one of the structured
/// shapes; the raw-text fallback does not apply.
pub fn resolve_deep_link(url: &str) -> Option<DeepLinkTarget> {
    let resolution = resolve_sale_code(url);
    if !resolution.is_valid || resolution.source == ResolutionSource::RawFallback {
        tracing::debug!(url = %url, "Ignoring unrecognized deep link");
        return None;
    }

    match (resolution.order_id, resolution.merchant_id) {
        (Some(sale_code), merchant_id) => Some(DeepLinkTarget::Order {
            sale_code,
            merchant_id,
        }),
        (None, Some(merchant_id)) => Some(DeepLinkTarget::Merchant { merchant_id }),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_scheme_order_link() {
        let target = resolve_deep_link("bnplcustomer://order?saleCode=AB12&merchantId=77");
        assert_eq!(
            target,
            Some(DeepLinkTarget::Order {
                sale_code: "AB12".to_string(),
                merchant_id: Some("77".to_string()),
            })
        );
    }

    #[test]
    fn test_https_sale_link() {
        let target = resolve_deep_link("https://merchant.bnpl.hexdive.com/sale/ABC123");
        assert_eq!(
            target,
            Some(DeepLinkTarget::Order {
                sale_code: "ABC123".to_string(),
                merchant_id: None,
            })
        );
    }

    #[test]
    fn test_merchant_link() {
        let target = resolve_deep_link("https://hexdive.com/merchant/M-1");
        assert_eq!(
            target,
            Some(DeepLinkTarget::Merchant {
                merchant_id: "M-1".to_string()
            })
        );
    }

    #[test]
    fn test_unstructured_link_is_ignored() {
        assert_eq!(resolve_deep_link("bnplcustomer://home"), None);
        assert_eq!(resolve_deep_link(""), None);
    }
}
