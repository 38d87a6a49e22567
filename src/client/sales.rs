//! Counter-sales service.

use async_trait::async_trait;
use mockall::automock;
use tracing::{info, instrument};

use crate::client::{
    ApiClient, ApiError,
    wire::{CheckoutPayload, CreatedSale, PaymentPayload, Sale, SaleAction, SaleId},
};

/// Counter-sales backed by the sales REST API.
#[derive(Debug, Clone)]
pub struct HttpCounterSalesService {
    client: ApiClient,
}

impl HttpCounterSalesService {
    /// Create a new service using the given client.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn sale_path(&self, sale: &SaleId, suffix: &str) -> String {
        format!(
            "{}/{}/{suffix}",
            self.client.config().sales_path.trim_end_matches('/'),
            sale
        )
    }

    async fn transition(&self, sale: SaleId, action: SaleAction) -> Result<Sale, ApiError> {
        let sale = self
            .client
            .post_empty::<Sale>(&self.sale_path(&sale, action.segment()))
            .await?;

        info!(sale = %sale.id, status = %sale.status, "sale transitioned");

        Ok(sale)
    }
}

#[async_trait]
impl CounterSalesService for HttpCounterSalesService {
    #[instrument(skip_all, fields(lines = payload.items.len()))]
    async fn create_sale(&self, payload: CheckoutPayload) -> Result<CreatedSale, ApiError> {
        let created: CreatedSale = self
            .client
            .post(&self.client.config().sales_path, &payload)
            .await?;

        match &created.id {
            Some(id) => info!(sale = %id, "counter sale created"),
            None => info!("counter sale created without an id"),
        }

        Ok(created)
    }

    #[instrument(skip(self))]
    async fn complete_sale(&self, sale: SaleId) -> Result<Sale, ApiError> {
        self.transition(sale, SaleAction::Complete).await
    }

    #[instrument(skip(self))]
    async fn cancel_sale(&self, sale: SaleId) -> Result<Sale, ApiError> {
        self.transition(sale, SaleAction::Cancel).await
    }

    #[instrument(skip(self))]
    async fn refund_sale(&self, sale: SaleId) -> Result<Sale, ApiError> {
        self.transition(sale, SaleAction::Refund).await
    }

    #[instrument(skip(self, payment), fields(method = %payment.method))]
    async fn add_payment(&self, sale: SaleId, payment: PaymentPayload) -> Result<Sale, ApiError> {
        self.client
            .post(&self.sale_path(&sale, "payments"), &payment)
            .await
    }
}

/// Operations on counter sales.
#[automock]
#[async_trait]
pub trait CounterSalesService: Send + Sync {
    /// Submit a checkout, creating a new sale.
    async fn create_sale(&self, payload: CheckoutPayload) -> Result<CreatedSale, ApiError>;

    /// Mark a pending sale complete.
    async fn complete_sale(&self, sale: SaleId) -> Result<Sale, ApiError>;

    /// Cancel a pending sale.
    async fn cancel_sale(&self, sale: SaleId) -> Result<Sale, ApiError>;

    /// Refund a completed sale.
    async fn refund_sale(&self, sale: SaleId) -> Result<Sale, ApiError>;

    /// Record an additional payment against a sale.
    async fn add_payment(&self, sale: SaleId, payment: PaymentPayload) -> Result<Sale, ApiError>;
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;
    use testresult::TestResult;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, header, header_exists, method, path},
    };

    use crate::client::{
        ClientConfig, REQUEST_ID_HEADER,
        session::{SecretToken, Session},
        wire::SaleStatus,
    };

    use super::*;

    fn service(server: &MockServer, session: Session) -> Result<HttpCounterSalesService, ApiError> {
        let client = ApiClient::new(ClientConfig::new(server.uri()), session.shared())?;

        Ok(HttpCounterSalesService::new(client))
    }

    fn empty_payload() -> CheckoutPayload {
        CheckoutPayload {
            customer_name: "Ravi Kumar".to_string(),
            mobile: "9876543210".to_string(),
            registration_number: Some("KA01AB1234".to_string()),
            items: Vec::new(),
            payments: Vec::new(),
            bill_discount: Decimal::ZERO,
        }
    }

    #[tokio::test]
    async fn create_sale_posts_payload_with_bearer() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/counter-sales"))
            .and(header("authorization", "Bearer access-1"))
            .and(header_exists(REQUEST_ID_HEADER))
            .and(body_json(json!({
                "customerName": "Ravi Kumar",
                "mobile": "9876543210",
                "registrationNumber": "KA01AB1234",
                "items": [],
                "payments": [],
                "billDiscount": 0.0
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "_id": "CS-1" })))
            .expect(1)
            .mount(&server)
            .await;

        let mut session = Session::anonymous();
        session.login(SecretToken::new("access-1"), None, None);

        let created = service(&server, session)?
            .create_sale(empty_payload())
            .await?;

        assert_eq!(created.id, Some(SaleId::from("CS-1")));

        Ok(())
    }

    #[tokio::test]
    async fn create_sale_surfaces_backend_message() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/counter-sales"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({ "message": "Insufficient stock for OF-850" })),
            )
            .mount(&server)
            .await;

        let result = service(&server, Session::anonymous())?
            .create_sale(empty_payload())
            .await;

        let Err(error) = result else {
            return Err("expected a backend error".into());
        };

        assert_eq!(error.to_string(), "Insufficient stock for OF-850");
        assert_eq!(error.status(), Some(400));

        Ok(())
    }

    #[tokio::test]
    async fn complete_sale_posts_to_transition_endpoint() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/counter-sales/CS-1/complete"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "_id": "CS-1", "status": "completed", "grandTotal": 1003 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let sale = service(&server, Session::anonymous())?
            .complete_sale(SaleId::from("CS-1"))
            .await?;

        assert_eq!(sale.status, SaleStatus::Completed);
        assert_eq!(sale.grand_total, Decimal::new(1003, 0));

        Ok(())
    }

    #[tokio::test]
    async fn add_payment_posts_to_payments_endpoint() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/counter-sales/CS-1/payments"))
            .and(body_json(json!({ "amount": 500.0, "method": "UPI", "reference": "UTR1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_id": "CS-1",
                "status": "pending",
                "grandTotal": 1003,
                "amountPaid": 500
            })))
            .expect(1)
            .mount(&server)
            .await;

        let sale = service(&server, Session::anonymous())?
            .add_payment(
                SaleId::from("CS-1"),
                PaymentPayload {
                    amount: Decimal::new(500, 0),
                    method: "UPI".to_string(),
                    reference: Some("UTR1".to_string()),
                },
            )
            .await?;

        assert_eq!(sale.amount_paid, Decimal::new(500, 0));

        Ok(())
    }
}
