//! Defines the route handler for the read-only page of a single balance.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    endpoints,
    endpoints::format_endpoint,
    html::{BUTTON_SECONDARY_STYLE, PAGE_CONTAINER_STYLE, base, format_local_date},
};

use super::{
    client::BalanceClient,
    core::{Balance, BalanceId},
    store::BalanceStore,
};

/// Fetch the balance with `balance_id` into a fresh store and render it.
///
/// A failed fetch leaves the store in its initial state, so the page shows
/// an empty balance.
pub async fn get_balance_page(
    State(client): State<BalanceClient>,
    Path(balance_id): Path<BalanceId>,
) -> Response {
    let store = BalanceStore::new(client);
    store.get_entity(balance_id).await;

    balance_detail_view(&store.state().entity).into_response()
}

pub(crate) fn balance_detail_view(balance: &Balance) -> Markup {
    let optional = |value: Option<String>| value.unwrap_or_default();
    let fields = [
        ("Cnpj", optional(balance.cnpj.clone())),
        ("Name", optional(balance.name.clone())),
        ("Cvm Code", optional(balance.cvm_code.map(|code| code.to_string()))),
        ("Category", optional(balance.category.clone())),
        ("Subcategory", optional(balance.subcategory.clone())),
        (
            "Financial Statement",
            optional(balance.financial_statement.clone()),
        ),
        (
            "Final Accounting Date",
            format_local_date(balance.final_accounting_date),
        ),
        ("Value", optional(balance.value.map(|value| value.to_string()))),
    ];
    let id_text = balance.id.map(|id| id.to_string()).unwrap_or_default();

    let content = html! {
        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-md space-y-4"
            {
                h2 class="text-xl font-bold" data-entity-heading="balance"
                {
                    "Balance [" b { (id_text) } "]"
                }

                dl class="jh-entity-details grid grid-cols-[auto_1fr] gap-x-4 gap-y-2"
                {
                    @for (label, value) in &fields {
                        dt class="font-semibold" { (label) }
                        dd { (value) }
                    }
                }

                div class="flex gap-2"
                {
                    a href=(endpoints::BALANCES_VIEW) role="button" class=(BUTTON_SECONDARY_STYLE)
                    {
                        "Back"
                    }

                    @if let Some(id) = balance.id {
                        a
                            href=(format_endpoint(endpoints::EDIT_BALANCE_VIEW, id))
                            role="button"
                            class=(BUTTON_SECONDARY_STYLE)
                        {
                            "Edit"
                        }
                    }
                }
            }
        }
    };

    base("Balance", &content)
}
