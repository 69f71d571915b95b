//! Эффекты экрана: запросы, таймеры debounce, экспорт
//!
//! Машины состояний ничего не знают о сети и времени; здесь их запросы
//! исполняются через `spawn_local`, а ответы возвращаются обратно в состояние.

use chrono::Local;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::dashboards::d410_telecaller_reports::aggregate_pager::{PagerApply, SummaryFetch};
use crate::dashboards::d410_telecaller_reports::api::{HttpReportsApi, ReportsApi};
use crate::dashboards::d410_telecaller_reports::config::ReportsConfig;
use crate::dashboards::d410_telecaller_reports::export::ExportSerializer;
use crate::dashboards::d410_telecaller_reports::filter_coordinator::{CommitOutcome, RefetchTicket};
use crate::dashboards::d410_telecaller_reports::navigator::{DetailApply, DetailFetch};
use crate::dashboards::d410_telecaller_reports::state::{persist_state, ReferenceKind, ReportsState};
use crate::shared::export::download_tabular_file;
use crate::shared::incremental_search::SearchRequest;
use crate::system::auth::AuthContext;

/// Все, что нужно обработчикам экрана. Копируется в замыкания.
#[derive(Clone, Copy)]
pub struct ReportsCtx {
    pub state: RwSignal<ReportsState>,
    pub api: StoredValue<HttpReportsApi>,
    pub auth: StoredValue<AuthContext>,
    pub config: StoredValue<ReportsConfig>,
}

pub fn spawn_summary_fetch(ctx: ReportsCtx, fetch: SummaryFetch) {
    spawn_local(async move {
        let api = ctx.api.get_value();
        let result = api.fetch_summary(&fetch.filter, fetch.page).await;
        match ctx.state.try_update(|s| s.pager.apply(fetch.seq, result)) {
            Some(PagerApply::Refetch(clamped)) => spawn_summary_fetch(ctx, clamped),
            Some(PagerApply::Applied) => persist_state(ctx.state),
            Some(PagerApply::Stale) | None => {}
        }
    });
}

pub fn spawn_detail_fetch(ctx: ReportsCtx, fetch: DetailFetch) {
    spawn_local(async move {
        let api = ctx.api.get_value();
        let result = api.fetch_details(&fetch.key, fetch.page).await;
        if let Some(DetailApply::Refetch(clamped)) =
            ctx.state.try_update(|s| s.navigator.apply(fetch.seq, result))
        {
            spawn_detail_fetch(ctx, clamped);
        }
    });
}

pub fn spawn_reference_fetch(ctx: ReportsCtx, kind: ReferenceKind, request: SearchRequest) {
    spawn_local(async move {
        let api = ctx.api.get_value();
        let result = match kind {
            ReferenceKind::Branch => api.search_branches(&request).await,
            ReferenceKind::Counselor => api.search_telecallers(&request).await,
        };
        ctx.state.update(|s| {
            kind.search_mut(s).apply(request.seq, result);
        });
    });
}

/// Ввод в поле поиска справочника; запрос уйдет после паузы
pub fn schedule_reference_search(ctx: ReportsCtx, kind: ReferenceKind, term: String) {
    let Some(ticket) = ctx
        .state
        .try_update(|s| kind.search_mut(s).set_search_term(term))
    else {
        return;
    };
    let delay = ctx.config.with_value(|c| c.timing.search_debounce_ms);
    spawn_local(async move {
        TimeoutFuture::new(delay).await;
        if let Some(request) = ctx
            .state
            .try_update(|s| kind.search_mut(s).fire(ticket))
            .flatten()
        {
            spawn_reference_fetch(ctx, kind, request);
        }
    });
}

/// Применяет результат фиксации фильтров: сбрасывает зависимые списки и
/// планирует перезагрузку сводки
pub fn after_commit(ctx: ReportsCtx, outcome: CommitOutcome) {
    ctx.state.update(|s| {
        if outcome.branch_changed {
            s.counselors
                .rescope(outcome.filter.branch().map(str::to_string));
        }
        s.sync_selections();
        s.pager.reset_page();
    });
    schedule_refetch(ctx, outcome.ticket);
}

fn schedule_refetch(ctx: ReportsCtx, ticket: RefetchTicket) {
    let delay = ctx.config.with_value(|c| c.timing.filter_debounce_ms);
    spawn_local(async move {
        TimeoutFuture::new(delay).await;
        let fired = ctx.state.try_update(|s| match s.coordinator.fire(ticket) {
            Ok(Some(filter)) => Ok(Some(s.pager.begin(filter))),
            Ok(None) => Ok(None),
            Err(e) => {
                s.message = Some(e.to_string());
                Err(e)
            }
        });
        if let Some(Ok(Some(fetch))) = fired {
            spawn_summary_fetch(ctx, fetch);
        }
    });
}

/// Первая загрузка и кнопка "Обновить"
pub fn reload_summary(ctx: ReportsCtx) {
    let fetch = ctx.state.try_update(|s| match s.coordinator.current() {
        Ok(filter) => {
            s.message = None;
            Some(s.pager.begin(filter))
        }
        Err(e) => {
            log::warn!("summary not loaded: {}", e);
            s.message = Some(e.to_string());
            None
        }
    });
    if let Some(fetch) = fetch.flatten() {
        spawn_summary_fetch(ctx, fetch);
    }
}

pub fn run_export(ctx: ReportsCtx) {
    let Some((view, filter)) = ctx.state.try_update(|s| {
        if s.exporting {
            return None;
        }
        s.exporting = true;
        s.message = None;
        Some((s.navigator.state().clone(), s.coordinator.committed().clone()))
    }).flatten() else {
        return;
    };

    spawn_local(async move {
        let api = ctx.api.get_value();
        let auth = ctx.auth.get_value();
        let export_limit = ctx.config.with_value(|c| c.paging.export_limit);
        let today = Local::now().date_naive();

        let result = ExportSerializer::new(&api, &auth, export_limit)
            .export_current_view(&view, &filter, today)
            .await;

        let message = match result {
            Ok(file) => match download_tabular_file(&file) {
                Ok(()) => format!(
                    "Exported {} rows to {}",
                    file.rows.len(),
                    file.file_name_with_extension()
                ),
                Err(e) => {
                    log::error!("export download failed: {}", e);
                    e.to_string()
                }
            },
            Err(e) => {
                log::warn!("export failed: {}", e);
                e.to_string()
            }
        };
        ctx.state.update(|s| {
            s.exporting = false;
            s.message = Some(message);
        });
    });
}
