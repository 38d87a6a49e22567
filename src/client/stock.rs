//! Stock service.

use async_trait::async_trait;
use mockall::automock;
use rusty_money::iso::Currency;
use tracing::{debug, instrument};

use crate::{
    catalog::StockItem,
    client::{
        ApiClient, ApiError,
        wire::{StockRecord, normalize_stock},
    },
};

/// Stock listing backed by the sales REST API.
#[derive(Debug, Clone)]
pub struct HttpStockService {
    client: ApiClient,
    currency: &'static Currency,
}

impl HttpStockService {
    /// Create a new service pricing stock in `currency`.
    #[must_use]
    pub fn new(client: ApiClient, currency: &'static Currency) -> Self {
        Self { client, currency }
    }
}

#[async_trait]
impl StockService for HttpStockService {
    #[instrument(skip(self))]
    async fn list_stock(&self) -> Result<Vec<StockItem<'static>>, ApiError> {
        let records: Vec<StockRecord> = self.client.get(&self.client.config().stock_path).await?;

        debug!(records = records.len(), "stock listing received");

        Ok(normalize_stock(records, self.currency)?)
    }
}

/// Source of sellable stock.
#[automock]
#[async_trait]
pub trait StockService: Send + Sync {
    /// Fetch and normalise the full stock listing.
    async fn list_stock(&self) -> Result<Vec<StockItem<'static>>, ApiError>;
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::INR};
    use serde_json::json;
    use testresult::TestResult;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    use crate::client::{ClientConfig, session::Session, wire::NormalizeError};

    use super::*;

    fn service(server: &MockServer) -> Result<HttpStockService, ApiError> {
        let client = ApiClient::new(
            ClientConfig::new(format!("{}/api", server.uri())),
            Session::anonymous().shared(),
        )?;

        Ok(HttpStockService::new(client, INR))
    }

    #[tokio::test]
    async fn list_stock_normalizes_wrapped_listing() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/stock"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    { "partNumber": "OF-850", "partName": "Oil Filter", "sellingPrice": 850, "quantity": 4 },
                    { "_id": "65f0c2", "partName": "Coolant 1L", "sellingPrice": 325.5, "stockQuantity": 0 }
                ]
            })))
            .mount(&server)
            .await;

        let items = service(&server)?.list_stock().await?;

        assert_eq!(items.len(), 2);
        assert_eq!(items.first().map(|item| item.part_no.as_str()), Some("OF-850"));
        assert_eq!(
            items.get(1).map(|item| item.selling_price),
            Some(Money::from_minor(32_550, INR))
        );

        Ok(())
    }

    #[tokio::test]
    async fn list_stock_rejects_malformed_records() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/stock"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "partNumber": "OF-850", "sellingPrice": 850, "quantity": 4 }
            ])))
            .mount(&server)
            .await;

        let result = service(&server)?.list_stock().await;

        assert!(
            matches!(
                result,
                Err(ApiError::Normalize(NormalizeError::MissingName(ref part))) if part == "OF-850"
            ),
            "unexpected result: {result:?}"
        );

        Ok(())
    }
}
