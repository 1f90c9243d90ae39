//! Sale code resolution for QR payloads, typed codes and deep-link URLs.
//!
//! Pure string parsing, no I/O. The same sale reference comes out regardless
//! of which channel delivered it.

use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

static MERCHANT_SALE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https://merchant\.bnpl\.[A-Za-z0-9.-]+/sale/([^/?#]+)/?(?:[?#].*)?$")
        .expect("Failed to compile merchant sale pattern")
});

static LEGACY_SALE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https://bnplqr\.[A-Za-z0-9.-]+/sale/([^/?#]+)/?(?:[?#].*)?$")
        .expect("Failed to compile legacy sale pattern")
});

static MERCHANT_QR_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https://[A-Za-z0-9.-]+/merchant/([^/?#]+)/?(?:[?#].*)?$")
        .expect("Failed to compile merchant QR pattern")
});

const SALE_CODE_PARAMS: &[&str] = &["salecode", "saleCode"];
const MERCHANT_ID_PARAMS: &[&str] = &["merchantId", "merchantid"];
const JSON_ORDER_KEYS: &[&str] = &["orderId", "id", "orderNumber", "saleId"];
const JSON_MERCHANT_KEYS: &[&str] = &["merchantId", "merchantid"];

/// Which recognizer produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    MerchantSaleUrl,
    LegacySaleUrl,
    MerchantQr,
    QueryParameters,
    JsonPayload,
    /// Nothing matched and the trimmed input was taken verbatim.
    RawFallback,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleCodeResolution {
    pub is_valid: bool,
    pub order_id: Option<String>,
    pub merchant_id: Option<String>,
    pub source: ResolutionSource,
}

impl SaleCodeResolution {
    fn sale(order_id: &str, merchant_id: Option<String>, source: ResolutionSource) -> Self {
        Self {
            is_valid: true,
            order_id: Some(order_id.trim().to_string()),
            merchant_id,
            source,
        }
    }

    fn invalid() -> Self {
        Self {
            is_valid: false,
            order_id: None,
            merchant_id: None,
            source: ResolutionSource::Empty,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == ResolutionSource::RawFallback
    }
}

/// Resolves raw scanner or keyboard input to a sale reference.
///
/// Checked in order: merchant sale URL, legacy `bnplqr` URL, static merchant
/// QR, query parameters, JSON payload. Anything else is accepted as a literal
/// order id and flagged with [`ResolutionSource::RawFallback`].
pub fn resolve_sale_code(input: &str) -> SaleCodeResolution {
    let input = input.trim();
    if input.is_empty() {
        return SaleCodeResolution::invalid();
    }

    if let Some(id) = capture_id(&MERCHANT_SALE_URL, input) {
        return SaleCodeResolution::sale(&id, None, ResolutionSource::MerchantSaleUrl);
    }
    if let Some(id) = capture_id(&LEGACY_SALE_URL, input) {
        return SaleCodeResolution::sale(&id, None, ResolutionSource::LegacySaleUrl);
    }
    if let Some(merchant_id) = capture_id(&MERCHANT_QR_URL, input) {
        return SaleCodeResolution {
            is_valid: true,
            order_id: None,
            merchant_id: Some(merchant_id.trim().to_string()),
            source: ResolutionSource::MerchantQr,
        };
    }
    if let Some(resolution) = from_query(input) {
        return resolution;
    }
    if let Some(resolution) = from_json(input) {
        return resolution;
    }

    tracing::debug!("No sale code pattern matched, using raw input");
    SaleCodeResolution::sale(input, None, ResolutionSource::RawFallback)
}

/// Captured path segment, percent-decoded so it matches what the query
/// form of the same code yields.
fn capture_id(pattern: &Regex, input: &str) -> Option<String> {
    pattern
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| percent_decode_str(m.as_str()).decode_utf8_lossy().into_owned())
        .filter(|id| !id.trim().is_empty())
}

fn from_query(input: &str) -> Option<SaleCodeResolution> {
    let url = url::Url::parse(input).ok()?;
    url.query()?;

    let mut sale_code = None;
    let mut merchant_id = None;
    for (key, value) in url.query_pairs() {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        if sale_code.is_none() && SALE_CODE_PARAMS.contains(&&*key) {
            sale_code = Some(value.to_string());
        } else if merchant_id.is_none() && MERCHANT_ID_PARAMS.contains(&&*key) {
            merchant_id = Some(value.to_string());
        }
    }

    match (sale_code, merchant_id) {
        (Some(code), merchant_id) => Some(SaleCodeResolution::sale(
            &code,
            merchant_id,
            ResolutionSource::QueryParameters,
        )),
        (None, Some(merchant_id)) => Some(SaleCodeResolution {
            is_valid: true,
            order_id: None,
            merchant_id: Some(merchant_id),
            source: ResolutionSource::QueryParameters,
        }),
        (None, None) => None,
    }
}

fn from_json(input: &str) -> Option<SaleCodeResolution> {
    if !input.starts_with('{') {
        return None;
    }
    let value: Value = serde_json::from_str(input).ok()?;
    let object = value.as_object()?;

    let order_id = JSON_ORDER_KEYS
        .iter()
        .find_map(|key| object.get(*key).and_then(scalar_to_string))?;
    let merchant_id = JSON_MERCHANT_KEYS
        .iter()
        .find_map(|key| object.get(*key).and_then(scalar_to_string));

    Some(SaleCodeResolution::sale(
        &order_id,
        merchant_id,
        ResolutionSource::JsonPayload,
    ))
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
