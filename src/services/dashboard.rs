//! Home screen data: promotions, credit limit and loans, fetched together.

use serde::Serialize;
use serde_json::json;

use crate::api::MobileApiClient;
use crate::domain::{CreditLimit, Promotion};
use crate::error::AppError;
use crate::services::image_cache::ImagePreloader;
use crate::services::loans::{LoanOverview, LoanService};

pub const PROMOTIONS_FUNCTION: &str = "getPromotions";
pub const CREDIT_LIMIT_FUNCTION: &str = "getCreditLimit";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub promotions: Vec<Promotion>,
    pub credit_limit: Option<CreditLimit>,
    pub loans: Vec<LoanOverview>,
    /// User-facing messages for the sections that failed to load.
    pub errors: Vec<String>,
}

#[derive(Clone)]
pub struct DashboardService {
    api: MobileApiClient,
    loans: LoanService,
    preloader: Option<ImagePreloader>,
}

impl DashboardService {
    pub fn new(api: MobileApiClient) -> Self {
        Self {
            loans: LoanService::new(api.clone()),
            api,
            preloader: None,
        }
    }

    pub fn with_preloader(mut self, preloader: ImagePreloader) -> Self {
        self.preloader = Some(preloader);
        self
    }

    pub async fn fetch_promotions(&self) -> Result<Vec<Promotion>, AppError> {
        Ok(self.api.call(PROMOTIONS_FUNCTION, json!({})).await?.into_data()?)
    }

    pub async fn fetch_credit_limit(&self) -> Result<CreditLimit, AppError> {
        Ok(self.api.call(CREDIT_LIMIT_FUNCTION, json!({})).await?.into_data()?)
    }

    /// Fetches every section concurrently; each one fails on its own.
    pub async fn load(&self) -> Dashboard {
        let (promotions, credit_limit, loans) = tokio::join!(
            self.fetch_promotions(),
            self.fetch_credit_limit(),
            self.loans.list_loans(),
        );

        let mut dashboard = Dashboard::default();
        match promotions {
            Ok(promotions) => {
                if let Some(preloader) = &self.preloader {
                    preloader.spawn_preload(promotions.clone());
                }
                dashboard.promotions = promotions;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Promotions failed to load");
                dashboard.errors.push(e.user_message());
            }
        }
        match credit_limit {
            Ok(limit) => dashboard.credit_limit = Some(limit),
            Err(e) => {
                tracing::warn!(error = %e, "Credit limit failed to load");
                dashboard.errors.push(e.user_message());
            }
        }
        match loans {
            Ok(loans) => dashboard.loans = loans,
            Err(e) => {
                tracing::warn!(error = %e, "Loans failed to load");
                dashboard.errors.push(e.user_message());
            }
        }
        dashboard
    }
}
