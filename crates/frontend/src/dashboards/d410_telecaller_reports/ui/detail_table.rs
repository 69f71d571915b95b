use leptos::prelude::*;
use thaw::*;

use super::actions::{spawn_detail_fetch, ReportsCtx};
use crate::dashboards::d410_telecaller_reports::navigator::DetailView;
use crate::shared::components::pagination_controls::{range_label, PaginationControls};
use crate::shared::date_utils::format_created_date;
use crate::shared::icons::icon;

const COLUMN_COUNT: usize = 6;

/// Детализация одной ячейки сводки
#[component]
pub fn DetailTable(ctx: ReportsCtx) -> impl IntoView {
    let state = ctx.state;
    let page_size_options = ctx.config.with_value(|c| c.paging.page_size_options.clone());

    let go_to_page = move |page: u32| {
        if let Some(fetch) = state.try_update(|s| s.navigator.change_page(page)).flatten() {
            spawn_detail_fetch(ctx, fetch);
        }
    };

    let change_page_size = move |size: u32| {
        if let Some(fetch) = state.try_update(|s| s.navigator.set_limit(size)).flatten() {
            spawn_detail_fetch(ctx, fetch);
        }
    };

    let back = move |_| state.update(|s| s.navigator.back());

    let detail_field = move |f: fn(&DetailView) -> String| {
        Signal::derive(move || state.with(|s| s.navigator.detail().map(f).unwrap_or_default()))
    };

    let title = detail_field(|v| v.title());
    let range = detail_field(|v| match &v.page {
        Some(page) => range_label(page.first_row_number(), page.last_row_number(), page.total),
        None => String::new(),
    });

    view! {
        <div class="detail-view">
            <div class="detail-view__header">
                <Button appearance=ButtonAppearance::Secondary on_click=back>
                    {icon("arrow-left")}
                    " Back to summary"
                </Button>
                <h2 class="detail-view__title">{move || title.get()}</h2>
                <PaginationControls
                    current_page=Signal::derive(move || state.with(|s| s.navigator.detail().map(|v| v.request.page).unwrap_or(1)))
                    total_pages=Signal::derive(move || state.with(|s| s.navigator.detail().map(|v| v.total_pages()).unwrap_or(1)))
                    range=range
                    page_size=Signal::derive(move || state.with(|s| s.navigator.detail().map(|v| v.request.limit).unwrap_or(10)))
                    disabled=Signal::derive(move || state.with(|s| s.navigator.detail().is_some_and(|v| v.loading)))
                    on_page_change=Callback::new(go_to_page)
                    on_page_size_change=Callback::new(change_page_size)
                    page_size_options=page_size_options
                />
            </div>

            {move || {
                state
                    .with(|s| s.navigator.detail().and_then(|v| v.error.clone()))
                    .map(|e| view! {
                        <div class="warning-box warning-box--error">
                            <span class="warning-box__icon">"⚠"</span>
                            <span class="warning-box__text">{e.to_string()}</span>
                        </div>
                    })
            }}

            <div style="width: 100%; overflow-x: auto;">
                <Table attr:style="width: 100%;">
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCell resizable=true min_width=180.0>"Name"</TableHeaderCell>
                            <TableHeaderCell resizable=true min_width=120.0>"Phone"</TableHeaderCell>
                            <TableHeaderCell resizable=true min_width=200.0>"Email"</TableHeaderCell>
                            <TableHeaderCell resizable=true min_width=120.0>"Status"</TableHeaderCell>
                            <TableHeaderCell resizable=true min_width=140.0>"Branch"</TableHeaderCell>
                            <TableHeaderCell resizable=true min_width=110.0>"Created Date"</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        {move || {
                            let Some((records, loading, notice)) = state.with(|s| {
                                s.navigator
                                    .detail()
                                    .map(|v| (v.records().to_vec(), v.loading, v.notice()))
                            }) else {
                                return Vec::new();
                            };

                            let message = if loading && records.is_empty() {
                                Some("Loading…".to_string())
                            } else {
                                notice.map(|n| n.to_string())
                            };
                            if let Some(message) = message {
                                return vec![view! {
                                    <TableRow>
                                        <TableCell attr:colspan=COLUMN_COUNT.to_string()>
                                            <TableCellLayout>
                                                <span class="text-muted">{message}</span>
                                            </TableCellLayout>
                                        </TableCell>
                                    </TableRow>
                                }.into_any()];
                            }

                            records
                                .into_iter()
                                .map(|r| view! {
                                    <TableRow>
                                        <TableCell><TableCellLayout truncate=true>{r.candidate_name}</TableCellLayout></TableCell>
                                        <TableCell><TableCellLayout>{r.phone}</TableCellLayout></TableCell>
                                        <TableCell><TableCellLayout truncate=true>{r.email}</TableCellLayout></TableCell>
                                        <TableCell><TableCellLayout>{r.status}</TableCellLayout></TableCell>
                                        <TableCell><TableCellLayout>{r.branch_name}</TableCellLayout></TableCell>
                                        <TableCell><TableCellLayout>{format_created_date(&r.created_at)}</TableCellLayout></TableCell>
                                    </TableRow>
                                }.into_any())
                                .collect::<Vec<_>>()
                        }}
                    </TableBody>
                </Table>
            </div>
        </div>
    }
}
