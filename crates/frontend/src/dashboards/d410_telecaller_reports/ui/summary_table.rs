use contracts::dashboards::d410_telecaller_reports::{MetricColumn, SummaryRow};
use leptos::prelude::*;
use thaw::*;

use super::actions::{spawn_detail_fetch, ReportsCtx};
use crate::dashboards::d410_telecaller_reports::aggregate_pager::color_bucket;

const COLUMN_COUNT: usize = MetricColumn::ALL.len() + 2;

fn metric_cell_class(value: u64) -> String {
    format!("metric-cell metric-cell--clickable {}", color_bucket(value).css_class())
}

#[component]
pub fn SummaryTable(ctx: ReportsCtx) -> impl IntoView {
    let state = ctx.state;

    let drill_down = move |row: SummaryRow, column: MetricColumn| {
        if let Some(fetch) = state.try_update(|s| s.navigator.enter(&row, column)) {
            spawn_detail_fetch(ctx, fetch);
        }
    };

    let render_row = move |row: SummaryRow| {
        let cells = MetricColumn::ALL
            .into_iter()
            .map(|column| {
                let value = column.value(&row);
                let row = row.clone();
                view! {
                    <TableCell class="table__cell--right">
                        <TableCellLayout>
                            <span
                                class=metric_cell_class(value)
                                title=column.title()
                                on:click=move |_| drill_down(row.clone(), column)
                            >
                                {value}
                            </span>
                        </TableCellLayout>
                    </TableCell>
                }
            })
            .collect_view();

        view! {
            <TableRow>
                <TableCell><TableCellLayout truncate=true>{row.telecaller_name.clone()}</TableCellLayout></TableCell>
                <TableCell><TableCellLayout truncate=true>{row.branch_name.clone()}</TableCellLayout></TableCell>
                {cells}
            </TableRow>
        }
        .into_any()
    };

    let placeholder_row = |text: String, class: &'static str| {
        view! {
            <TableRow>
                <TableCell attr:colspan=COLUMN_COUNT.to_string()>
                    <TableCellLayout>
                        <span class=class>{text}</span>
                    </TableCellLayout>
                </TableCell>
            </TableRow>
        }
        .into_any()
    };

    view! {
        <div style="width: 100%; overflow-x: auto;">
            <Table attr:style="width: 100%;">
                <TableHeader>
                    <TableRow>
                        <TableHeaderCell resizable=true min_width=180.0>"Telecaller"</TableHeaderCell>
                        <TableHeaderCell resizable=true min_width=140.0>"Branch"</TableHeaderCell>
                        {MetricColumn::ALL
                            .into_iter()
                            .map(|column| view! {
                                <TableHeaderCell min_width=90.0>{column.title()}</TableHeaderCell>
                            })
                            .collect_view()}
                    </TableRow>
                </TableHeader>

                <TableBody>
                    {move || {
                        let (rows, loading, notice) = state.with(|s| {
                            (s.pager.rows().to_vec(), s.pager.is_loading(), s.pager.notice())
                        });
                        if loading && rows.is_empty() {
                            return vec![placeholder_row("Loading…".to_string(), "text-muted")];
                        }
                        if let Some(notice) = notice {
                            return vec![placeholder_row(notice.to_string(), "text-muted")];
                        }
                        rows.into_iter().map(render_row).collect::<Vec<_>>()
                    }}
                </TableBody>
            </Table>
        </div>
    }
}
