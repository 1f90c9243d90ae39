mod common;

use std::sync::Arc;

use bnpl_client::api::MobileApiClient;
use bnpl_client::error::CONNECTIVITY_MESSAGE;
use bnpl_client::services::{DashboardService, HttpPrefetcher, ImagePreloader, PaymentMethodService};
use bnpl_client::storage::{MemoryStore, SessionStore};
use common::{client, envelope, mock_function};
use mockito::Server;
use serde_json::json;

#[tokio::test]
async fn test_sections_fail_independently() {
    let mut server = Server::new_async().await;
    let _promotions = mock_function(
        &mut server,
        "getPromotions",
        json!({}),
        envelope(
            200,
            "OK",
            json!([{ "id": "p1", "title": "10% off", "imageUrl": "", "discountPercent": "10" }]),
        ),
    )
    .await;
    let _limit = mock_function(
        &mut server,
        "getCreditLimit",
        json!({}),
        envelope(503, "Credit service unavailable", json!(null)),
    )
    .await;
    let _loans = mock_function(&mut server, "getLoans", json!({}), envelope(200, "OK", json!([]))).await;

    let dashboard = DashboardService::new(client(&server).await).load().await;

    assert_eq!(dashboard.promotions.len(), 1);
    assert!(dashboard.credit_limit.is_none());
    assert!(dashboard.loans.is_empty());
    assert_eq!(dashboard.errors, vec!["Credit service unavailable".to_string()]);
}

#[tokio::test]
async fn test_promotion_images_are_primed_once() {
    let mut server = Server::new_async().await;
    let banner = server
        .mock("GET", "/img/banner.png")
        .with_status(200)
        .with_body("png")
        .expect(1)
        .create_async()
        .await;
    let banner_url = format!("{}/img/banner.png", server.url());
    let _promotions = mock_function(
        &mut server,
        "getPromotions",
        json!({}),
        envelope(
            200,
            "OK",
            json!([
                { "id": "p1", "title": "A", "imageUrl": banner_url },
                { "id": "p2", "title": "B", "logoUrl": banner_url }
            ]),
        ),
    )
    .await;

    let preloader = ImagePreloader::new(Arc::new(HttpPrefetcher::new()));
    let service = DashboardService::new(client(&server).await);
    let promotions = service.fetch_promotions().await.unwrap();

    let summary = preloader.preload_promotion_images(&promotions).await;
    assert_eq!(summary.requested, 2);
    assert_eq!(summary.primed, 1);
    assert_eq!(summary.skipped, 1);
    banner.assert_async().await;
}

#[tokio::test]
async fn test_everything_down_reports_connectivity() {
    let session = SessionStore::new(Arc::new(MemoryStore::new()));
    let api = MobileApiClient::new(
        "http://127.0.0.1:1".to_string(),
        "http://127.0.0.1:1".to_string(),
        session,
    );

    let dashboard = DashboardService::new(api).load().await;
    assert_eq!(dashboard.errors.len(), 3);
    assert!(dashboard.errors.iter().all(|e| e == CONNECTIVITY_MESSAGE));
}

#[tokio::test]
async fn test_primary_card_is_first_active() {
    let mut server = Server::new_async().await;
    let _cards = mock_function(
        &mut server,
        "getCards",
        json!({}),
        envelope(
            200,
            "OK",
            json!([
                { "cardId": "c1", "lastFour": "1111", "brand": "VISA", "isActive": false },
                { "cardId": "c2", "lastFour": "4242", "brand": "MASTERCARD", "isActive": true }
            ]),
        ),
    )
    .await;

    let card = PaymentMethodService::new(client(&server).await)
        .primary_card()
        .await
        .unwrap()
        .unwrap();
    assert_eq!(card.id, "c2");
    assert_eq!(card.last4, "4242");
}
