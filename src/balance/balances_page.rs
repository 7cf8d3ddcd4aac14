//! Defines the route handler for the page that lists balances one page at a time.

use axum::{
    extract::{FromRef, RawQuery, State},
    response::{IntoResponse, Redirect, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, endpoints,
    endpoints::format_endpoint,
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, format_local_date,
    },
    pagination::{
        PaginationConfig, create_pagination_indicators, item_count_text, page_count,
        pagination_view,
    },
};

use super::{
    client::BalanceClient,
    core::Balance,
    query::{BalanceField, ListQuery, PaginationState, SortOrder},
    store::{BalanceState, BalanceStore},
};

/// The state needed for the balances page.
#[derive(Debug, Clone)]
pub struct BalancesViewState {
    /// The client each request's store fetches through.
    pub client: BalanceClient,
    /// How many balances to show per page and how many page links to show.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for BalancesViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            client: state.balance_client.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Render a page of balances.
///
/// Requests whose query string is not the canonical encoding of the page and
/// sort key are redirected to the canonical URL without contacting the
/// backend.
pub async fn get_balances_page(
    State(state): State<BalancesViewState>,
    RawQuery(raw_query): RawQuery,
) -> Response {
    let raw_query = raw_query.unwrap_or_default();
    let pagination = PaginationState::from_query(
        &ListQuery::parse(&raw_query),
        state.pagination_config.default_page_size,
    );

    if raw_query != pagination.to_query_string() {
        let canonical_url = pagination.to_url(endpoints::BALANCES_VIEW);
        tracing::debug!("redirecting {raw_query:?} to {canonical_url}");
        return Redirect::to(&canonical_url).into_response();
    }

    let store = BalanceStore::new(state.client);
    let request = pagination.page_request();
    store
        .get_entities(request.page, request.size, request.sort)
        .await;

    balances_view(
        &store.state(),
        &pagination,
        state.pagination_config.max_pages,
    )
    .into_response()
}

pub(crate) fn balances_view(
    state: &BalanceState,
    pagination: &PaginationState,
    max_pages: u64,
) -> Markup {
    let has_entities = !state.entities.is_empty();
    let show_pagination = has_entities && state.total_items > 0;

    let content = html! {
        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Balances" }
                }

                @if has_entities {
                    div class="overflow-x-auto"
                    {
                        table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                        {
                            thead class=(TABLE_HEADER_STYLE)
                            {
                                tr
                                {
                                    @for field in BalanceField::ALL {
                                        (sortable_header(field, pagination))
                                    }
                                    th scope="col" class=(TABLE_CELL_STYLE) {}
                                }
                            }

                            tbody
                            {
                                @for balance in &state.entities {
                                    (balance_row(balance))
                                }
                            }
                        }
                    }
                } @else if !state.loading {
                    div class="alert alert-warning" data-empty-state="true"
                    {
                        "No Balances found"
                    }
                }

                @if show_pagination {
                    div class="flex flex-col items-center gap-2"
                    {
                        p class="item-count text-sm"
                        {
                            (item_count_text(pagination.active_page, state.total_items, pagination.items_per_page))
                        }

                        (pagination_view(
                            &create_pagination_indicators(
                                pagination.active_page,
                                page_count(state.total_items, pagination.items_per_page),
                                max_pages,
                            ),
                            |page| pagination.with_page(page).to_url(endpoints::BALANCES_VIEW),
                        ))
                    }
                }
            }
        }
    };

    base("Balances", &content)
}

fn sortable_header(field: BalanceField, pagination: &PaginationState) -> Markup {
    let indicator = match (pagination.sort == field, pagination.order) {
        (true, SortOrder::Asc) => " ▲",
        (true, SortOrder::Desc) => " ▼",
        (false, _) => "",
    };

    html! {
        th scope="col" class=(TABLE_CELL_STYLE)
        {
            a href=(pagination.sort_by(field).to_url(endpoints::BALANCES_VIEW)) class="hover:underline"
            {
                (field.label()) (indicator)
            }
        }
    }
}

fn balance_row(balance: &Balance) -> Markup {
    let detail_url = balance
        .id
        .map(|id| format_endpoint(endpoints::BALANCE_VIEW, id));

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE)
            {
                @if let (Some(id), Some(url)) = (balance.id, &detail_url) {
                    a href=(url) class=(LINK_STYLE) { (id) }
                }
            }
            td class=(TABLE_CELL_STYLE) { (balance.cnpj.as_deref().unwrap_or_default()) }
            td class=(TABLE_CELL_STYLE) { (balance.name.as_deref().unwrap_or_default()) }
            td class=(TABLE_CELL_STYLE)
            {
                @if let Some(cvm_code) = balance.cvm_code { (cvm_code) }
            }
            td class=(TABLE_CELL_STYLE) { (balance.category.as_deref().unwrap_or_default()) }
            td class=(TABLE_CELL_STYLE) { (balance.subcategory.as_deref().unwrap_or_default()) }
            td class=(TABLE_CELL_STYLE) { (balance.financial_statement.as_deref().unwrap_or_default()) }
            td class=(TABLE_CELL_STYLE) { (format_local_date(balance.final_accounting_date)) }
            td class=(TABLE_CELL_STYLE)
            {
                @if let Some(value) = balance.value { (value) }
            }
            td class=(TABLE_CELL_STYLE)
            {
                @if let Some(url) = &detail_url {
                    a href=(url) class=(LINK_STYLE) { "View" }
                }
            }
        }
    }
}
