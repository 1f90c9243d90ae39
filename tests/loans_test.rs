mod common;

use bigdecimal::BigDecimal;
use bnpl_client::domain::{InstallmentStatus, LoanStatus};
use bnpl_client::error::AppError;
use bnpl_client::services::LoanService;
use common::{client, envelope, mock_function};
use mockito::Server;
use serde_json::{json, Value};
use std::str::FromStr;

fn loan_json(id: &str) -> Value {
    json!({
        "loanId": id,
        "merchantName": "Hexdive",
        "totalAmount": "900.00",
        "numberOfInstallments": 3,
        "status": "active"
    })
}

fn installment(id: &str, sequence: u32, status: &str) -> Value {
    json!({
        "id": id,
        "installmentNumber": sequence,
        "amount": "300.00",
        "dueDate": "2026-11-01T00:00:00Z",
        "status": status
    })
}

#[tokio::test]
async fn test_failed_detail_degrades_only_that_loan() {
    let mut server = Server::new_async().await;
    let _list = mock_function(
        &mut server,
        "getLoans",
        json!({}),
        envelope(200, "OK", json!([loan_json("L1"), loan_json("L2")])),
    )
    .await;
    let _l1 = mock_function(
        &mut server,
        "getLoanDetails",
        json!({ "loanId": "L1" }),
        envelope(
            200,
            "OK",
            json!({
                "installments": [installment("i1", 1, "paid"), installment("i2", 2, "pending")],
                "paidAmount": "300.00",
                "remainingAmount": "600.00"
            }),
        ),
    )
    .await;
    let _l2 = mock_function(
        &mut server,
        "getLoanDetails",
        json!({ "loanId": "L2" }),
        envelope(500, "Internal error", json!(null)),
    )
    .await;

    let loans = LoanService::new(client(&server).await)
        .list_loans()
        .await
        .unwrap();

    assert_eq!(loans.len(), 2);
    assert_eq!(loans[0].loan.id, "L1");
    assert!(loans[0].details_loaded);
    assert_eq!(loans[0].remaining_amount, BigDecimal::from_str("600.00").unwrap());
    assert_eq!(loans[0].loan.installments.len(), 2);

    assert_eq!(loans[1].loan.id, "L2");
    assert!(!loans[1].details_loaded);
    assert_eq!(loans[1].paid_amount, BigDecimal::from(0));
    assert_eq!(loans[1].remaining_amount, BigDecimal::from(0));
}

#[tokio::test]
async fn test_missing_sums_are_computed_from_installments() {
    let mut server = Server::new_async().await;
    let _list = mock_function(
        &mut server,
        "getLoans",
        json!({}),
        envelope(200, "OK", json!([loan_json("L1")])),
    )
    .await;
    let _details = mock_function(
        &mut server,
        "getLoanDetails",
        json!({ "loanId": "L1" }),
        envelope(
            200,
            "OK",
            json!({
                "installments": [
                    installment("dp", 0, "paid"),
                    installment("i1", 1, "paid"),
                    installment("i2", 2, "pending"),
                    installment("i3", 3, "overdue")
                ]
            }),
        ),
    )
    .await;

    let loans = LoanService::new(client(&server).await)
        .list_loans()
        .await
        .unwrap();

    assert!(loans[0].details_loaded);
    assert_eq!(loans[0].paid_amount, BigDecimal::from_str("300.00").unwrap());
    assert_eq!(loans[0].remaining_amount, BigDecimal::from_str("600.00").unwrap());
}

#[tokio::test]
async fn test_list_failure_is_an_error() {
    let mut server = Server::new_async().await;
    let _list = mock_function(
        &mut server,
        "getLoans",
        json!({}),
        envelope(401, "Session expired", json!(null)),
    )
    .await;

    let err = LoanService::new(client(&server).await)
        .list_loans()
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Session expired");
}

#[tokio::test]
async fn test_paying_last_installment_completes_loan() {
    let mut server = Server::new_async().await;
    let pay = mock_function(
        &mut server,
        "payInstallment",
        json!({ "loanId": "L1", "installmentId": "i2", "amount": "300.00" }),
        envelope(200, "Payment received", json!({ "transactionId": "tx-1" })),
    )
    .await;

    let mut loan: bnpl_client::domain::Loan = serde_json::from_value(json!({
        "loanId": "L1",
        "totalAmount": "600.00",
        "status": "active",
        "installments": [
            installment("dp", 0, "paid"),
            installment("i1", 1, "paid"),
            installment("i2", 2, "overdue")
        ]
    }))
    .unwrap();

    let receipt = LoanService::new(client(&server).await)
        .pay_installment(&mut loan, "i2")
        .await
        .unwrap();

    assert_eq!(receipt.transaction_id.as_deref(), Some("tx-1"));
    assert_eq!(loan.installments[2].status, InstallmentStatus::Paid);
    assert!(loan.installments[2].settle_date.is_some());
    assert_eq!(loan.status, LoanStatus::Completed);
    pay.assert_async().await;
}

#[tokio::test]
async fn test_paid_and_down_payment_installments_are_refused_locally() {
    let server = Server::new_async().await;
    let mut loan: bnpl_client::domain::Loan = serde_json::from_value(json!({
        "id": "L1",
        "totalAmount": "600.00",
        "status": "active",
        "installments": [installment("dp", 0, "pending"), installment("i1", 1, "paid")]
    }))
    .unwrap();
    let loans = LoanService::new(client(&server).await);

    assert!(matches!(
        loans.pay_installment(&mut loan, "dp").await,
        Err(AppError::InvalidState(_))
    ));
    assert!(matches!(
        loans.pay_installment(&mut loan, "i1").await,
        Err(AppError::InvalidState(_))
    ));
    assert!(matches!(
        loans.pay_installment(&mut loan, "missing").await,
        Err(AppError::NotFound(_))
    ));
}
