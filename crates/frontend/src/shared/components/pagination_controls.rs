use crate::shared::icons::icon;
use leptos::prelude::*;

/// "11–20 of 23"; "0 of 0" for an empty page
pub fn range_label(first_row: u64, last_row: u64, total: u64) -> String {
    if first_row == 0 {
        format!("0 of {}", total)
    } else {
        format!("{}–{} of {}", first_row, last_row, total)
    }
}

/// PaginationControls component - reusable pagination controls
#[component]
pub fn PaginationControls(
    /// Current page (1-indexed)
    #[prop(into)]
    current_page: Signal<u32>,

    /// Total number of pages, at least 1
    #[prop(into)]
    total_pages: Signal<u32>,

    /// Range label ("1–10 of 23")
    #[prop(into)]
    range: Signal<String>,

    /// Current page size
    #[prop(into)]
    page_size: Signal<u32>,

    /// Disables navigation while a page is loading
    #[prop(optional, into)]
    disabled: Signal<bool>,

    /// Callback when page changes (receives the 1-indexed page)
    on_page_change: Callback<u32>,

    /// Callback when page size changes
    on_page_size_change: Callback<u32>,

    /// Available page size options
    page_size_options: Vec<u32>,
) -> impl IntoView {
    let at_first = move || disabled.get() || current_page.get() <= 1;
    let at_last = move || disabled.get() || current_page.get() >= total_pages.get();

    view! {
        <div class="pagination-controls">
            <button
                class="pagination-btn"
                on:click=move |_| on_page_change.run(1)
                disabled=at_first
                title="First page"
            >
                {icon("chevrons-left")}
            </button>
            <button
                class="pagination-btn"
                on:click=move |_| {
                    let page = current_page.get();
                    if page > 1 {
                        on_page_change.run(page - 1);
                    }
                }
                disabled=at_first
                title="Previous page"
            >
                {icon("chevron-left")}
            </button>
            <span class="pagination-info">
                {move || format!("{} / {} ({})", current_page.get(), total_pages.get().max(1), range.get())}
            </span>
            <button
                class="pagination-btn"
                on:click=move |_| {
                    let page = current_page.get();
                    if page < total_pages.get() {
                        on_page_change.run(page + 1);
                    }
                }
                disabled=at_last
                title="Next page"
            >
                {icon("chevron-right")}
            </button>
            <button
                class="pagination-btn"
                on:click=move |_| on_page_change.run(total_pages.get().max(1))
                disabled=at_last
                title="Last page"
            >
                {icon("chevrons-right")}
            </button>
            <select
                class="page-size-select"
                on:change=move |ev| {
                    if let Ok(size) = event_target_value(&ev).parse::<u32>() {
                        on_page_size_change.run(size);
                    }
                }
                prop:value=move || page_size.get().to_string()
            >
                {page_size_options.iter().map(|&size| {
                    view! {
                        <option value={size.to_string()} selected=move || page_size.get() == size>
                            {size.to_string()}
                        </option>
                    }
                }).collect_view()}
            </select>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_label() {
        assert_eq!(range_label(11, 20, 23), "11–20 of 23");
        assert_eq!(range_label(21, 23, 23), "21–23 of 23");
        assert_eq!(range_label(0, 0, 0), "0 of 0");
    }
}
