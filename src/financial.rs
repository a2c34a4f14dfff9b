//! Financial data service for the findash CLI and SDK
//!
//! Thin typed wrappers over the five dashboard read endpoints. All of them
//! return the standard envelope; the payload is extracted here so callers
//! work with plain DTOs.

use std::sync::Arc;

use findash_protocol::api::{
    FinancialSummary, TransactionsData, TransfersData, WalletData, WorkingCapitalData,
};
use findash_protocol::common::ApiEnvelope;

use crate::client::{ApiClient, RequestOptions};
use crate::error::{AppError, Result};

pub const SUMMARY_ENDPOINT: &str = "/financial/summary";
pub const TRANSACTIONS_ENDPOINT: &str = "/financial/transactions/recent";
pub const TRANSFERS_ENDPOINT: &str = "/financial/transfers/scheduled";
pub const WORKING_CAPITAL_ENDPOINT: &str = "/financial/working-capital";
pub const WALLET_ENDPOINT: &str = "/financial/wallet";

/// Typed access to the dashboard data endpoints
pub struct FinancialService {
    client: Arc<ApiClient>,
}

impl FinancialService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn summary(&self) -> Result<FinancialSummary> {
        let response: ApiEnvelope<FinancialSummary> = self
            .client
            .get(SUMMARY_ENDPOINT, RequestOptions::default())
            .await?;
        unwrap_data(response, "summary")
    }

    pub async fn recent_transactions(&self, limit: Option<u32>) -> Result<TransactionsData> {
        let mut query = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        let response: ApiEnvelope<TransactionsData> = self
            .client
            .get_with_query(TRANSACTIONS_ENDPOINT, query, RequestOptions::default())
            .await?;
        unwrap_data(response, "transactions")
    }

    pub async fn scheduled_transfers(&self, limit: Option<u32>) -> Result<TransfersData> {
        let mut query = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        let response: ApiEnvelope<TransfersData> = self
            .client
            .get_with_query(TRANSFERS_ENDPOINT, query, RequestOptions::default())
            .await?;
        unwrap_data(response, "transfers")
    }

    pub async fn working_capital(&self, period: Option<&str>) -> Result<WorkingCapitalData> {
        let mut query = Vec::new();
        if let Some(period) = period {
            query.push(("period".to_string(), period.to_string()));
        }
        let response: ApiEnvelope<WorkingCapitalData> = self
            .client
            .get_with_query(WORKING_CAPITAL_ENDPOINT, query, RequestOptions::default())
            .await?;
        unwrap_data(response, "working capital")
    }

    pub async fn wallet(&self) -> Result<WalletData> {
        let response: ApiEnvelope<WalletData> = self
            .client
            .get(WALLET_ENDPOINT, RequestOptions::default())
            .await?;
        unwrap_data(response, "wallet")
    }
}

fn unwrap_data<T>(envelope: ApiEnvelope<T>, what: &str) -> Result<T> {
    envelope
        .data
        .ok_or_else(|| AppError::unknown(format!("No data in {} response", what)))
}
