use serde::{Deserialize, Serialize};
use time::Date;

/// The identifier the REST backend assigns to a persisted balance.
pub type BalanceId = i64;

/// A line of a company's financial statement as reported to the securities
/// regulator.
///
/// Every field is optional so that partial payloads (and the empty default
/// shown before a detail fetch completes) are representable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    /// The backend's identifier, absent for a record that was never persisted.
    pub id: Option<BalanceId>,
    /// The company's tax-registry number (CNPJ).
    pub cnpj: Option<String>,
    /// The company name.
    pub name: Option<String>,
    /// The company's code at the securities regulator (CVM).
    pub cvm_code: Option<i32>,
    /// The balance sheet group, e.g. "Ativo".
    pub category: Option<String>,
    /// The line within `category`, e.g. "Circulante".
    pub subcategory: Option<String>,
    /// The statement the line belongs to, e.g. "BPA".
    pub financial_statement: Option<String>,
    /// The last day of the accounting period, sent as `YYYY-MM-DD`.
    pub final_accounting_date: Option<Date>,
    /// The monetary amount.
    pub value: Option<f64>,
}
