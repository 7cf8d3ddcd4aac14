//! Balances: the data model, the client for the REST backend, the store
//! holding what was last fetched, and the list and detail pages.

mod balances_page;
mod client;
mod core;
mod detail_page;
mod query;
mod store;

pub use balances_page::get_balances_page;
pub use client::BalanceClient;
pub use detail_page::get_balance_page;
pub use self::core::{Balance, BalanceId};
pub use store::{BalanceState, BalanceStore};
