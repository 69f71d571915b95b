use contracts::dashboards::d410_telecaller_reports::{Facet, FilterState};
use leptos::prelude::*;
use thaw::*;

use super::actions::{
    after_commit, reload_summary, run_export, spawn_detail_fetch, spawn_summary_fetch, ReportsCtx,
};
use super::detail_table::DetailTable;
use super::reference_picker::ReferencePicker;
use super::summary_table::SummaryTable;
use crate::dashboards::d410_telecaller_reports::api::HttpReportsApi;
use crate::dashboards::d410_telecaller_reports::config::ReportsConfig;
use crate::dashboards::d410_telecaller_reports::state::{create_state, ReferenceKind};
use crate::shared::api_utils::api_url;
use crate::shared::components::date_input::DateInput;
use crate::shared::components::filter_panel::{FilterPanel, FilterTag};
use crate::shared::components::pagination_controls::{range_label, PaginationControls};
use crate::shared::icons::icon;
use crate::system::auth::AuthContext;

#[component]
fn ReportsHeader(
    #[prop(into)] total_count: Signal<u64>,
    #[prop(into)] is_loading: Signal<bool>,
    #[prop(into)] is_exporting: Signal<bool>,
    on_refresh: Callback<()>,
    on_export: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="page__header">
            <div class="page__header-left">
                {icon("users")}
                <h1 class="page__title">"Counselor Reports"</h1>
                <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Brand>
                    <span>{move || total_count.get().to_string()}</span>
                </Badge>
            </div>

            <div class="page__header-right">
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=move |_| on_export.run(())
                    disabled=is_exporting
                >
                    {icon("download")}
                    {move || if is_exporting.get() { " Exporting..." } else { " Export" }}
                </Button>
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=move |_| on_refresh.run(())
                    disabled=is_loading
                >
                    {icon("refresh")}
                    {move || if is_loading.get() { " Loading..." } else { " Refresh" }}
                </Button>
            </div>
        </div>
    }
}

/// Отчет по телекаллерам: сводка с фильтрами и детализация по ячейкам
#[component]
pub fn TelecallerReportsDashboard(config: ReportsConfig, auth: AuthContext) -> impl IntoView {
    let state = create_state(&config, auth.clone());
    let ctx = ReportsCtx {
        state,
        api: StoredValue::new(HttpReportsApi::new(api_url(&config.api.prefix), auth.clone())),
        auth: StoredValue::new(auth),
        config: StoredValue::new(config.clone()),
    };

    let is_expanded = RwSignal::new(true);
    let q = RwSignal::new(
        state.with_untracked(|s| s.coordinator.committed().search().unwrap_or_default().to_string()),
    );

    let commit_with = move |edit: Box<dyn FnOnce(&mut FilterState)>| {
        let outcome = state.try_update(|s| {
            s.coordinator.edit_draft(edit);
            s.coordinator.commit_draft()
        });
        if let Some(outcome) = outcome {
            after_commit(ctx, outcome);
        }
    };

    // Initial load (once)
    Effect::new(move |_| {
        if state.with_untracked(|s| s.pager.page().is_none() && !s.pager.is_loading()) {
            reload_summary(ctx);
        }
    });

    // q -> free_text_search; the coordinator collapses rapid edits into one refetch
    let q_first_run = StoredValue::new(true);
    Effect::new(move |_| {
        let q_now = q.get();
        if q_first_run.get_value() {
            q_first_run.set_value(false);
            return;
        }
        commit_with(Box::new(move |d: &mut FilterState| d.free_text_search = Some(q_now)));
    });

    let go_to_page = move |page: u32| {
        if let Some(fetch) = state.try_update(|s| s.pager.go_to_page(page)).flatten() {
            spawn_summary_fetch(ctx, fetch);
        }
    };

    let change_page_size = move |size: u32| {
        if let Some(fetch) = state.try_update(|s| s.pager.set_limit(size)) {
            spawn_summary_fetch(ctx, fetch);
        }
    };

    let remove_facet = move |facet: Facet| {
        if facet == Facet::Search {
            q.set(String::new());
            return;
        }
        if let Some(outcome) = state.try_update(|s| s.coordinator.remove_facet(facet)) {
            after_commit(ctx, outcome);
        }
    };

    let reset = move |_| {
        q.set(String::new());
        if let Some(outcome) = state.try_update(|s| s.coordinator.reset()) {
            after_commit(ctx, outcome);
        }
    };

    let page_size_options = config.paging.page_size_options.clone();
    let start_date = Signal::derive(move || state.with(|s| s.coordinator.committed().start_date));
    let end_date = Signal::derive(move || state.with(|s| s.coordinator.committed().end_date));

    let pagination = move || {
        let page_size_options = page_size_options.clone();
        view! {
            <PaginationControls
                current_page=Signal::derive(move || state.with(|s| s.pager.request().page))
                total_pages=Signal::derive(move || state.with(|s| s.pager.total_pages()))
                range=Signal::derive(move || state.with(|s| match s.pager.page() {
                    Some(p) => range_label(p.first_row_number(), p.last_row_number(), p.total),
                    None => String::new(),
                }))
                page_size=Signal::derive(move || state.with(|s| s.pager.request().limit))
                disabled=Signal::derive(move || state.with(|s| s.pager.is_loading()))
                on_page_change=Callback::new(go_to_page)
                on_page_size_change=Callback::new(change_page_size)
                page_size_options=page_size_options
            />
        }
    };

    let filter_content = move || {
        view! {
            <Flex gap=FlexGap::Small align=FlexAlign::End>
                <div style="min-width: 220px;">
                    <ReferencePicker
                        ctx=ctx
                        kind=ReferenceKind::Branch
                        label="Branch:"
                        all_label="All branches"
                        placeholder="Search branches…"
                    />
                </div>
                <div style="min-width: 220px;">
                    <ReferencePicker
                        ctx=ctx
                        kind=ReferenceKind::Counselor
                        label="Counselor:"
                        all_label="All counselors"
                        placeholder="Search counselors…"
                    />
                </div>
                <div style="min-width: 260px;">
                    <Flex vertical=true gap=FlexGap::Small>
                        <Label>"Search:"</Label>
                        <Input value=q placeholder="Telecaller name…" />
                    </Flex>
                </div>
                <div>
                    <Flex vertical=true gap=FlexGap::Small>
                        <Label>"From:"</Label>
                        <DateInput
                            value=start_date
                            max=end_date
                            on_change=move |date| commit_with(Box::new(move |d: &mut FilterState| d.start_date = date))
                        />
                    </Flex>
                </div>
                <div>
                    <Flex vertical=true gap=FlexGap::Small>
                        <Label>"To:"</Label>
                        <DateInput
                            value=end_date
                            min=start_date
                            on_change=move |date| commit_with(Box::new(move |d: &mut FilterState| d.end_date = date))
                        />
                    </Flex>
                </div>
                <Button appearance=ButtonAppearance::Subtle on_click=reset>
                    "Reset"
                </Button>
            </Flex>
        }
    };

    let filter_tags = move || {
        move || {
            state
                .with(|s| s.coordinator.committed().tags())
                .into_iter()
                .map(|tag| {
                    let facet = tag.facet;
                    view! {
                        <FilterTag
                            label=tag.label
                            on_remove=Callback::new(move |_| remove_facet(facet))
                        />
                    }
                })
                .collect_view()
        }
    };

    view! {
        <div class="page page--wide">
            <ReportsHeader
                total_count=Signal::derive(move || state.with(|s| s.pager.total()))
                is_loading=Signal::derive(move || state.with(|s| s.pager.is_loading()))
                is_exporting=Signal::derive(move || state.with(|s| s.exporting))
                on_refresh=Callback::new(move |_| {
                    let detail = state.try_update(|s| s.navigator.refresh()).flatten();
                    match detail {
                        Some(fetch) => spawn_detail_fetch(ctx, fetch),
                        None => reload_summary(ctx),
                    }
                })
                on_export=Callback::new(move |_| run_export(ctx))
            />

            {move || {
                let message = state.with(|s| {
                    s.message
                        .clone()
                        .or_else(|| s.pager.error().map(|e| e.to_string()))
                });
                message.map(|text| view! {
                    <div class="warning-box">
                        <span class="warning-box__icon">"⚠"</span>
                        <span class="warning-box__text">{text}</span>
                        <span
                            class="warning-box__close"
                            on:click=move |_| state.update(|s| {
                                s.message = None;
                                s.pager.dismiss_error();
                            })
                        >
                            {icon("x")}
                        </span>
                    </div>
                })
            }}

            <Show
                when=move || state.with(|s| s.navigator.state().is_detail())
                fallback=move || view! {
                    <FilterPanel
                        is_expanded=is_expanded
                        active_filters_count=Signal::derive(move || state.with(|s| s.coordinator.committed().active_facets()))
                        pagination_controls=pagination.clone()
                        filter_content=filter_content
                        filter_tags=filter_tags
                    />
                    <div class="page-content">
                        <SummaryTable ctx=ctx />
                    </div>
                }
            >
                <div class="page-content">
                    <DetailTable ctx=ctx />
                </div>
            </Show>
        </div>
    }
}
