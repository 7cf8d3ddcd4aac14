//! The pagination and sort state of the balances list, and its encoding in
//! the page URL.
//!
//! The URL is the source of truth: the list page derives a
//! [PaginationState] from the query string and redirects to the canonical
//! encoding whenever the two disagree.

use std::{fmt::Display, str::FromStr};

use serde::Deserialize;

use crate::balance::client::PageRequest;

/// The direction of a sort key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// The opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    /// The order as it appears in `sort`, e.g. `desc`.
    pub fn as_query_value(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(()),
        }
    }
}

/// The balance fields the backend can sort by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BalanceField {
    #[default]
    Id,
    Cnpj,
    Name,
    CvmCode,
    Category,
    Subcategory,
    FinancialStatement,
    FinalAccountingDate,
    Value,
}

impl BalanceField {
    /// Every field in table column order.
    pub const ALL: [BalanceField; 9] = [
        BalanceField::Id,
        BalanceField::Cnpj,
        BalanceField::Name,
        BalanceField::CvmCode,
        BalanceField::Category,
        BalanceField::Subcategory,
        BalanceField::FinancialStatement,
        BalanceField::FinalAccountingDate,
        BalanceField::Value,
    ];

    /// The field name used by the REST API.
    pub fn as_query_value(self) -> &'static str {
        match self {
            BalanceField::Id => "id",
            BalanceField::Cnpj => "cnpj",
            BalanceField::Name => "name",
            BalanceField::CvmCode => "cvmCode",
            BalanceField::Category => "category",
            BalanceField::Subcategory => "subcategory",
            BalanceField::FinancialStatement => "financialStatement",
            BalanceField::FinalAccountingDate => "finalAccountingDate",
            BalanceField::Value => "value",
        }
    }

    /// The column heading for this field.
    pub fn label(self) -> &'static str {
        match self {
            BalanceField::Id => "ID",
            BalanceField::Cnpj => "Cnpj",
            BalanceField::Name => "Name",
            BalanceField::CvmCode => "Cvm Code",
            BalanceField::Category => "Category",
            BalanceField::Subcategory => "Subcategory",
            BalanceField::FinancialStatement => "Financial Statement",
            BalanceField::FinalAccountingDate => "Final Accounting Date",
            BalanceField::Value => "Value",
        }
    }
}

impl FromStr for BalanceField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BalanceField::ALL
            .into_iter()
            .find(|field| field.as_query_value() == s)
            .ok_or(())
    }
}

/// The raw `page` and `sort` query parameters of the list page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListQuery {
    /// The one-based page number, unvalidated.
    pub page: Option<String>,
    /// The sort key as `field,order`, unvalidated.
    pub sort: Option<String>,
}

impl ListQuery {
    /// Parse a query string (without the leading `?`).
    ///
    /// A query string that cannot be decoded is treated as empty.
    pub fn parse(query_string: &str) -> Self {
        serde_urlencoded::from_str(query_string)
            .inspect_err(|error| tracing::debug!("ignoring query {query_string:?}: {error}"))
            .unwrap_or_default()
    }
}

/// The page and sort key shown by the balances list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    /// The one-based page number.
    pub active_page: u64,
    /// How many balances make up one page.
    pub items_per_page: u64,
    /// The field the list is sorted by.
    pub sort: BalanceField,
    /// The direction of [PaginationState::sort].
    pub order: SortOrder,
}

impl PaginationState {
    /// The first page sorted by ascending id.
    pub fn new(items_per_page: u64) -> Self {
        Self {
            active_page: 1,
            items_per_page,
            sort: BalanceField::default(),
            order: SortOrder::default(),
        }
    }

    /// The default state overridden by whatever `query` specifies.
    ///
    /// A `page` below 1 is clamped to 1 and a non-numeric `page` is ignored.
    /// In `sort`, an unknown field falls back to `id` and an unknown or
    /// missing order falls back to ascending.
    pub fn from_query(query: &ListQuery, items_per_page: u64) -> Self {
        let mut state = Self::new(items_per_page);

        if let Some(page) = query.page.as_deref().and_then(|page| page.parse::<i64>().ok()) {
            state.active_page = page.max(1) as u64;
        }

        if let Some(sort) = query.sort.as_deref() {
            let (field, order) = sort.split_once(',').unwrap_or((sort, ""));
            state.sort = field.parse().unwrap_or_default();
            state.order = order.parse().unwrap_or_default();
        }

        state
    }

    /// Sort by `field`, flipping the current order.
    ///
    /// The order flips on every call, whether or not `field` is already the
    /// sort key.
    pub fn sort_by(self, field: BalanceField) -> Self {
        Self {
            sort: field,
            order: self.order.flipped(),
            ..self
        }
    }

    /// The same sort key on another page.
    pub fn with_page(self, active_page: u64) -> Self {
        Self {
            active_page,
            ..self
        }
    }

    /// The sort key as sent to the API, e.g. `name,desc`.
    pub fn sort_param(&self) -> String {
        format!(
            "{},{}",
            self.sort.as_query_value(),
            self.order.as_query_value()
        )
    }

    /// The canonical query string, e.g. `page=2&sort=id,asc`.
    pub fn to_query_string(&self) -> String {
        format!("page={}&sort={}", self.active_page, self.sort_param())
    }

    /// `route` followed by the canonical query string.
    pub fn to_url(&self, route: &str) -> String {
        format!("{route}?{}", self.to_query_string())
    }

    /// The API request for this page. The API counts pages from zero.
    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.active_page.saturating_sub(1),
            size: self.items_per_page,
            sort: Some(self.sort_param()),
        }
    }
}

impl Display for PaginationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_query_string())
    }
}
