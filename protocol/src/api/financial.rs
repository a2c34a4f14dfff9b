//! Financial API DTOs
//!
//! This module contains data transfer objects for the dashboard data
//! endpoints: summary totals, recent transactions, scheduled transfers,
//! working capital series and wallet cards.

use serde::{Deserialize, Serialize};

// ============================================================================
// Summary
// ============================================================================

/// Direction of a period-over-period change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

/// Change of a monetary total relative to the previous period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmountChange {
    pub percentage: f64,
    pub trend: Trend,
}

/// A monetary total with its trend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoneyAmount {
    pub amount: f64,
    pub currency: String,
    pub change: AmountChange,
}

/// Payload of GET /financial/summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub total_balance: MoneyAmount,
    pub total_expense: MoneyAmount,
    pub total_savings: MoneyAmount,
    pub last_updated: String,
}

// ============================================================================
// Transactions
// ============================================================================

/// A single transaction row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub name: String,
    pub business: String,
    pub image: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: f64,
    pub currency: String,
    pub date: String,
    pub status: String,
}

/// Aggregates accompanying the transaction list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsSummary {
    pub total_income: f64,
    pub total_expense: f64,
    pub count: u32,
}

/// Payload of GET /financial/transactions/recent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionsData {
    pub transactions: Vec<Transaction>,
    pub summary: TransactionsSummary,
}

// ============================================================================
// Scheduled transfers
// ============================================================================

/// A single scheduled transfer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledTransfer {
    pub id: String,
    pub name: String,
    pub image: String,
    pub date: String,
    pub amount: f64,
    pub currency: String,
    pub status: String,
}

/// Aggregates accompanying the transfer list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransfersSummary {
    pub total_scheduled_amount: f64,
    pub count: u32,
}

/// Payload of GET /financial/transfers/scheduled
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransfersData {
    pub transfers: Vec<ScheduledTransfer>,
    pub summary: TransfersSummary,
}

// ============================================================================
// Working capital
// ============================================================================

/// One month of the working-capital series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingCapitalPoint {
    pub month: String,
    pub income: f64,
    pub expense: f64,
    pub net: f64,
}

/// Aggregates over the requested period
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingCapitalSummary {
    pub total_income: f64,
    pub total_expense: f64,
    pub net_balance: f64,
}

/// Payload of GET /financial/working-capital
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingCapitalData {
    pub period: String,
    pub currency: String,
    pub data: Vec<WorkingCapitalPoint>,
    pub summary: WorkingCapitalSummary,
}

// ============================================================================
// Wallet
// ============================================================================

/// A card in the wallet view
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletCard {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub card_number: String,
    pub bank: String,
    pub network: String,
    pub expiry_month: u8,
    pub expiry_year: u16,
    pub color: String,
    pub is_default: bool,
}

/// Payload of GET /financial/wallet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletData {
    pub cards: Vec<WalletCard>,
}
