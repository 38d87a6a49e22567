//! Integration tests for the REST services against a mock backend.

use rust_decimal::Decimal;
use rusty_money::iso::INR;
use serde_json::json;
use testresult::TestResult;
use wiremock::{
    Mock, MockServer, Request, ResponseTemplate,
    matchers::{method, path},
};

use torque::{
    client::{REQUEST_ID_HEADER, session::SecretToken},
    prelude::*,
};

fn client(server: &MockServer, session: SharedSession) -> Result<ApiClient, ApiError> {
    ApiClient::new(ClientConfig::new(server.uri()), session)
}

#[tokio::test]
async fn stock_listing_feeds_the_catalog() -> TestResult {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "partNumber": "OF-850", "partName": "Oil Filter", "sellingPrice": 850, "quantity": 4 },
            { "partNo": "BP-1200", "partName": "Brake Pads", "sellingPrice": 1200, "stockQuantity": 0 },
            { "id": "legacy-9", "partName": "Air Filter", "sellingPrice": "399.50", "quantity": 2 }
        ])))
        .mount(&server)
        .await;

    let stock = HttpStockService::new(client(&server, Session::anonymous().shared())?, INR);

    let mut catalog = Catalog::new();
    let ticket = catalog.begin_refresh();

    assert!(catalog.apply_refresh(ticket, stock.list_stock().await?)?);
    assert_eq!(catalog.len(), 3);

    let in_stock: Vec<_> = catalog
        .search("filter", true)
        .into_iter()
        .map(|item| item.part_no.as_str())
        .collect();

    assert_eq!(in_stock, ["legacy-9", "OF-850"]);

    Ok(())
}

#[tokio::test]
async fn requests_carry_a_fresh_request_id() -> TestResult {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&server)
        .await;

    let stock = HttpStockService::new(client(&server, Session::anonymous().shared())?, INR);

    stock.list_stock().await?;
    stock.list_stock().await?;

    let requests: Vec<Request> = server.received_requests().await.unwrap_or_default();

    let ids: Vec<String> = requests
        .iter()
        .filter_map(|request| request.headers.get(REQUEST_ID_HEADER))
        .filter_map(|value| value.to_str().ok())
        .map(str::to_string)
        .collect();

    assert_eq!(ids.len(), 2);
    assert_ne!(ids.first(), ids.get(1));
    assert!(
        requests
            .iter()
            .all(|request| request.headers.get("authorization").is_none()),
        "anonymous sessions send no credentials"
    );

    Ok(())
}

#[tokio::test]
async fn logout_stops_sending_the_bearer_token() -> TestResult {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/counter-sales/CS-1/cancel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "CS-1",
            "status": "cancelled"
        })))
        .mount(&server)
        .await;

    let mut session = Session::anonymous();
    session.login(SecretToken::new("access-1"), None, None);

    let session = session.shared();
    let sales = HttpCounterSalesService::new(client(&server, session.clone())?);

    let sale = sales.cancel_sale(SaleId::from("CS-1")).await?;
    assert_eq!(sale.status, SaleStatus::Cancelled);
    assert!(sale.status.is_terminal());

    session.write().await.logout();
    sales.cancel_sale(SaleId::from("CS-1")).await?;

    let requests = server.received_requests().await.unwrap_or_default();
    let bearers: Vec<Option<&str>> = requests
        .iter()
        .map(|request| {
            request
                .headers
                .get("authorization")
                .and_then(|value| value.to_str().ok())
        })
        .collect();

    assert_eq!(bearers, [Some("Bearer access-1"), None]);

    Ok(())
}

#[tokio::test]
async fn refund_returns_updated_sale() -> TestResult {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/counter-sales/CS-5/refund"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sale": {
                "saleId": "CS-5",
                "status": "Refunded",
                "grandTotal": "1003.00",
                "amountPaid": "1003.00",
                "createdAt": "2026-10-18T10:15:00Z"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sales = HttpCounterSalesService::new(client(&server, Session::anonymous().shared())?);

    let sale = sales.refund_sale(SaleId::from("CS-5")).await?;

    assert_eq!(sale.id, SaleId::from("CS-5"));
    assert_eq!(sale.status, SaleStatus::Refunded);
    assert_eq!(sale.amount_paid, Decimal::new(100_300, 2));

    Ok(())
}

#[tokio::test]
async fn plain_text_errors_are_surfaced_verbatim() -> TestResult {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/counter-sales/CS-2/complete"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let sales = HttpCounterSalesService::new(client(&server, Session::anonymous().shared())?);

    let Err(error) = sales.complete_sale(SaleId::from("CS-2")).await else {
        panic!("expected the backend error");
    };

    assert_eq!(error.status(), Some(503));
    assert_eq!(error.to_string(), "Service Unavailable");

    Ok(())
}

#[tokio::test]
async fn empty_error_bodies_fall_back_to_the_status() -> TestResult {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/counter-sales"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let sales = HttpCounterSalesService::new(client(&server, Session::anonymous().shared())?);

    let payload = CheckoutPayload {
        customer_name: "Ravi Kumar".to_string(),
        mobile: "9876543210".to_string(),
        registration_number: None,
        items: Vec::new(),
        payments: Vec::new(),
        bill_discount: Decimal::ZERO,
    };

    let Err(error) = sales.create_sale(payload).await else {
        panic!("expected the backend error");
    };

    assert!(
        error.to_string().contains("500"),
        "unexpected message: {error}"
    );

    Ok(())
}
