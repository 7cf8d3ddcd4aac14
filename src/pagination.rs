//! This modules defines the common functionality for paging data.

use maud::{Markup, html};

use crate::html::LINK_STYLE;

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The maximum balances to display per page.
    pub default_page_size: u64,
    /// The maximum number of pages to show in the pagination indicator.
    pub max_pages: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_pages: 5,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum PaginationIndicator {
    Page(u64),
    CurrPage(u64),
    Ellipsis,
    NextButton(u64),
    BackButton(u64),
}

pub fn create_pagination_indicators(
    curr_page: u64,
    page_count: u64,
    max_pages: u64,
) -> Vec<PaginationIndicator> {
    let map_page = |page| {
        if page == curr_page {
            PaginationIndicator::CurrPage(page)
        } else {
            PaginationIndicator::Page(page)
        }
    };

    let mut indicators: Vec<PaginationIndicator> = if page_count <= max_pages {
        (1..=page_count).map(map_page).collect()
    } else if curr_page <= (max_pages / 2) {
        (1..=max_pages).map(map_page).collect()
    } else if curr_page > (page_count - max_pages / 2) {
        ((page_count - max_pages + 1)..=page_count)
            .map(map_page)
            .collect()
    } else {
        ((curr_page - max_pages / 2)..=(curr_page + max_pages / 2))
            .map(map_page)
            .collect()
    };

    if page_count > max_pages {
        if curr_page > (max_pages / 2) + 1 {
            indicators.insert(0, PaginationIndicator::Page(1));
            indicators.insert(1, PaginationIndicator::Ellipsis);
        }

        if curr_page < (page_count - max_pages / 2) {
            indicators.push(PaginationIndicator::Ellipsis);
            indicators.push(PaginationIndicator::Page(page_count));
        }
    }

    if curr_page > 1 {
        indicators.insert(0, PaginationIndicator::BackButton(curr_page - 1));
    }

    if curr_page < page_count {
        indicators.push(PaginationIndicator::NextButton(curr_page + 1));
    }

    indicators
}

/// The number of pages needed to show `total_items`, at least one.
pub fn page_count(total_items: u64, items_per_page: u64) -> u64 {
    total_items.div_ceil(items_per_page.max(1)).max(1)
}

/// The "Showing 21 - 40 of 45 items" summary for the one-based `page`.
///
/// Page numbers past the end of the range saturate instead of overflowing.
pub fn item_count_text(page: u64, total_items: u64, items_per_page: u64) -> String {
    let page = page.max(1);
    let first = (page - 1).saturating_mul(items_per_page).saturating_add(1);
    let last = page.saturating_mul(items_per_page).min(total_items);

    format!("Showing {first} - {last} of {total_items} items")
}

/// Renders `indicators` as a list of links, where `page_url` maps a page
/// number to its URL.
pub fn pagination_view(
    indicators: &[PaginationIndicator],
    page_url: impl Fn(u64) -> String,
) -> Markup {
    html! {
        nav class="pagination flex justify-center"
        {
            ul class="pagination flex items-center gap-x-2 p-0 m-0"
            {
                @for indicator in indicators {
                    li class="flex items-center"
                    {
                        @match indicator {
                            PaginationIndicator::Page(page) => {
                                a href=(page_url(*page)) class={ "block px-3 py-2 " (LINK_STYLE) } { (page) }
                            }
                            PaginationIndicator::CurrPage(page) => {
                                p
                                    aria-current="page"
                                    class="block px-3 py-2 rounded-sm font-bold text-black dark:text-white"
                                { (page) }
                            }
                            PaginationIndicator::Ellipsis => {
                                span class="block px-3 py-2 text-gray-500" { "..." }
                            }
                            PaginationIndicator::BackButton(page) => {
                                a href=(page_url(*page)) role="button" class={ "block px-3 py-2 " (LINK_STYLE) } { "Back" }
                            }
                            PaginationIndicator::NextButton(page) => {
                                a href=(page_url(*page)) role="button" class={ "block px-3 py-2 " (LINK_STYLE) } { "Next" }
                            }
                        }
                    }
                }
            }
        }
    }
}
