mod common;

use bnpl_client::error::CONNECTIVITY_MESSAGE;
use bnpl_client::services::sale_validator::ADD_CARD_MESSAGE;
use bnpl_client::services::{
    installment_options, CheckoutFlow, CheckoutStep, OrderService, SaleValidator,
};
use bnpl_client::api::MobileApiClient;
use bnpl_client::storage::{MemoryStore, SessionStore};
use common::{client, envelope, mock_function};
use mockito::{Matcher, Server};
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_scan_to_order_happy_path() {
    let mut server = Server::new_async().await;
    let validate = mock_function(
        &mut server,
        "validateSale",
        json!({ "saleId": "ABC123" }),
        envelope(200, "OK", json!(true)),
    )
    .await;

    let details = mock_function(
        &mut server,
        "getOrderDetails",
        json!({ "orderId": "ABC123" }),
        envelope(200, "OK", json!({ "saleId": "ABC123", "totalAmount": "300.00" })),
    )
    .await;

    let flow = CheckoutFlow::new(client(&server).await);
    let checkout = flow
        .checkout("https://merchant.bnpl.hexdive.com/sale/ABC123")
        .await
        .unwrap();

    assert_eq!(
        checkout.step,
        CheckoutStep::Order {
            sale_code: "ABC123".to_string(),
            merchant_id: None,
        }
    );
    assert_eq!(checkout.order.unwrap().sale_id, "ABC123");
    validate.assert_async().await;
    details.assert_async().await;
}

#[tokio::test]
async fn test_card_refusal_is_rewritten() {
    let mut server = Server::new_async().await;
    let _m = mock_function(
        &mut server,
        "validateSale",
        json!({ "saleId": "S-9" }),
        envelope(400, "No active card found for customer", json!(false)),
    )
    .await;

    let validation = SaleValidator::new(client(&server).await)
        .validate_sale("S-9")
        .await;
    assert!(!validation.success);
    assert!(validation.requires_card);
    assert_eq!(validation.message, ADD_CARD_MESSAGE);
}

#[tokio::test]
async fn test_other_refusals_keep_server_message() {
    let mut server = Server::new_async().await;
    let _m = mock_function(
        &mut server,
        "validateSale",
        json!({ "saleId": "S-1" }),
        envelope(400, "Sale has expired", json!(false)),
    )
    .await;

    let step = CheckoutFlow::new(client(&server).await).start("S-1").await;
    assert_eq!(
        step,
        CheckoutStep::Blocked {
            message: "Sale has expired".to_string(),
            requires_card: false,
        }
    );
}

#[tokio::test]
async fn test_ok_status_without_true_data_is_a_refusal() {
    let mut server = Server::new_async().await;
    let _false = mock_function(
        &mut server,
        "validateSale",
        json!({ "saleId": "S-2" }),
        envelope(200, "Sale not payable", json!(false)),
    )
    .await;
    let _string = mock_function(
        &mut server,
        "validateSale",
        json!({ "saleId": "S-3" }),
        envelope(200, "Sale on hold", json!("true")),
    )
    .await;
    let validator = SaleValidator::new(client(&server).await);

    let validation = validator.validate_sale("S-2").await;
    assert!(!validation.success);
    assert!(!validation.requires_card);
    assert_eq!(validation.message, "Sale not payable");

    let validation = validator.validate_sale("S-3").await;
    assert!(!validation.success);
    assert_eq!(validation.message, "Sale on hold");
}

#[tokio::test]
async fn test_unreachable_backend_gives_connectivity_message() {
    let session = SessionStore::new(Arc::new(MemoryStore::new()));
    let api = MobileApiClient::new(
        "http://127.0.0.1:1".to_string(),
        "http://127.0.0.1:1".to_string(),
        session,
    );
    let validation = SaleValidator::new(api).validate_sale("ABC123").await;
    assert!(!validation.success);
    assert_eq!(validation.message, CONNECTIVITY_MESSAGE);
}

#[tokio::test]
async fn test_blank_input_never_calls_backend() {
    let mut server = Server::new_async().await;
    let untouched = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let step = CheckoutFlow::new(client(&server).await).start("   ").await;
    assert_eq!(step, CheckoutStep::Invalid);
    untouched.assert_async().await;
}

#[tokio::test]
async fn test_order_details_and_loan_creation() {
    let mut server = Server::new_async().await;
    let _details = mock_function(
        &mut server,
        "getOrderDetails",
        json!({ "orderId": "ABC123" }),
        envelope(
            200,
            "OK",
            json!({
                "orderId": "ABC123",
                "merchantName": "Hexdive",
                "totalAmount": "900.00",
                "currency": "EGP",
                "items": [{ "name": "Headphones", "price": "900.00" }],
                "availableInstallments": [6, 3, 3]
            }),
        ),
    )
    .await;
    let create = mock_function(
        &mut server,
        "createLoan",
        json!({ "saleId": "ABC123", "installmentCount": 3, "isPayAtOnce": false }),
        envelope(200, "Loan created", json!({ "loanId": "L-77" })),
    )
    .await;

    let orders = OrderService::new(client(&server).await);
    let details = orders.fetch_order_details("ABC123").await.unwrap();
    assert_eq!(details.sale_id, "ABC123");
    assert_eq!(details.items[0].quantity, 1);

    let counts: Vec<u32> = installment_options(&details)
        .iter()
        .map(|p| p.installment_count)
        .collect();
    assert_eq!(counts, vec![1, 3, 6]);

    let result = orders.create_loan("ABC123", 3).await.unwrap();
    assert_eq!(result.loan_id.as_deref(), Some("L-77"));
    assert_eq!(result.message.as_deref(), Some("Loan created"));
    create.assert_async().await;
}

#[tokio::test]
async fn test_loan_refusal_surfaces_server_message() {
    let mut server = Server::new_async().await;
    let _m = mock_function(
        &mut server,
        "createLoan",
        json!({ "saleId": "ABC123" }),
        envelope(422, "Credit limit exceeded", json!(null)),
    )
    .await;

    let err = OrderService::new(client(&server).await)
        .create_loan("ABC123", 6)
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Credit limit exceeded");
}
