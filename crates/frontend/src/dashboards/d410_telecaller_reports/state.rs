use contracts::dashboards::d410_telecaller_reports::{FilterState, ReferenceOption};
use leptos::prelude::*;
use serde::{Deserialize, Serialize};

use super::aggregate_pager::AggregatePager;
use super::config::ReportsConfig;
use super::filter_coordinator::FilterCoordinator;
use super::navigator::DrillDownNavigator;
use crate::shared::incremental_search::IncrementalSearch;
use crate::system::auth::AuthContext;

const STORAGE_KEY: &str = "d410_telecaller_reports_state_v1";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    pub filter: FilterState,
    pub page_size: u32,
}

/// Состояние экрана отчетов
#[derive(Clone, Debug)]
pub struct ReportsState {
    pub coordinator: FilterCoordinator,
    pub pager: AggregatePager,
    pub navigator: DrillDownNavigator,
    pub branches: IncrementalSearch<ReferenceOption>,
    pub counselors: IncrementalSearch<ReferenceOption>,

    // export
    pub exporting: bool,
    /// Transient message shown above the grid (export result, auth problems)
    pub message: Option<String>,
}

impl ReportsState {
    pub fn new(config: &ReportsConfig, auth: AuthContext, persisted: Option<PersistedState>) -> Self {
        let paging = &config.paging;
        let (filter, page_size) = match persisted {
            Some(p) if paging.page_size_options.contains(&p.page_size) => (p.filter, p.page_size),
            Some(p) => (p.filter, paging.page_size),
            None => (FilterState::default(), paging.page_size),
        };

        let coordinator = FilterCoordinator::new(auth, filter);
        let committed = coordinator.committed().clone();

        let mut branches = IncrementalSearch::new(paging.reference_page_size);
        let mut counselors = IncrementalSearch::new(paging.reference_page_size)
            .scoped(committed.branch().map(str::to_string));
        if let Some(branch) = committed.branch() {
            branches.select(branch);
        }
        if let Some(counselor) = committed.counselor() {
            counselors.select(counselor);
        }

        Self {
            coordinator,
            pager: AggregatePager::new(page_size),
            navigator: DrillDownNavigator::new(paging.detail_page_size),
            branches,
            counselors,
            exporting: false,
            message: None,
        }
    }

    /// Выбор в списках филиалов и консультантов следует за фильтром
    /// (сброс, снятие фасета)
    pub fn sync_selections(&mut self) {
        let committed = self.coordinator.committed().clone();
        if self.branches.selection().value() != committed.branch() {
            match committed.branch() {
                Some(branch) => self.branches.select(branch),
                None => self.branches.select(""),
            };
        }
        if self.counselors.selection().value() != committed.counselor() {
            match committed.counselor() {
                Some(counselor) => self.counselors.select(counselor),
                None => self.counselors.select(""),
            };
        }
    }

    pub fn persisted(&self) -> PersistedState {
        PersistedState {
            filter: self.coordinator.committed().clone(),
            page_size: self.pager.request().limit,
        }
    }
}

/// Какой из справочников
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReferenceKind {
    Branch,
    Counselor,
}

impl ReferenceKind {
    pub fn search<'a>(&self, state: &'a ReportsState) -> &'a IncrementalSearch<ReferenceOption> {
        match self {
            ReferenceKind::Branch => &state.branches,
            ReferenceKind::Counselor => &state.counselors,
        }
    }

    pub fn search_mut<'a>(
        &self,
        state: &'a mut ReportsState,
    ) -> &'a mut IncrementalSearch<ReferenceOption> {
        match self {
            ReferenceKind::Branch => &mut state.branches,
            ReferenceKind::Counselor => &mut state.counselors,
        }
    }

    /// Записывает выбранное значение в черновик фильтра
    pub fn set_facet(&self, draft: &mut FilterState, value: Option<&str>) {
        let value = value.map(str::to_string);
        match self {
            ReferenceKind::Branch => draft.branch_name = value,
            ReferenceKind::Counselor => draft.counselor_name = value,
        }
    }
}

fn storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

fn load_persisted() -> Option<PersistedState> {
    let raw = storage()?.get_item(STORAGE_KEY).ok().flatten()?;
    serde_json::from_str::<PersistedState>(&raw).ok()
}

fn save_persisted(st: &PersistedState) {
    let Some(storage) = storage() else { return };
    let Ok(raw) = serde_json::to_string(st) else { return };
    let _ = storage.set_item(STORAGE_KEY, &raw);
}

pub fn persist_state(signal: RwSignal<ReportsState>) {
    let persisted = signal.with_untracked(ReportsState::persisted);
    save_persisted(&persisted);
}

pub fn create_state(config: &ReportsConfig, auth: AuthContext) -> RwSignal<ReportsState> {
    RwSignal::new(ReportsState::new(config, auth, load_persisted()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::incremental_search::Selection;

    #[test]
    fn test_restores_persisted_filter_and_page_size() {
        let persisted = PersistedState {
            filter: FilterState {
                branch_name: Some("Kochi".into()),
                counselor_name: Some("Anu".into()),
                ..Default::default()
            },
            page_size: 25,
        };
        let state = ReportsState::new(
            &ReportsConfig::default(),
            AuthContext::with_token("t"),
            Some(persisted.clone()),
        );
        assert_eq!(state.pager.request().limit, 25);
        assert_eq!(state.counselors.scope(), Some("Kochi"));
        assert_eq!(state.branches.selection(), &Selection::Value("Kochi".into()));
        assert_eq!(state.counselors.selection(), &Selection::Value("Anu".into()));
        assert_eq!(state.persisted(), persisted);
    }

    #[test]
    fn test_reset_clears_picker_selections() {
        let mut state = ReportsState::new(
            &ReportsConfig::default(),
            AuthContext::with_token("t"),
            Some(PersistedState {
                filter: FilterState {
                    branch_name: Some("Kochi".into()),
                    ..Default::default()
                },
                page_size: 10,
            }),
        );
        state.coordinator.reset();
        state.sync_selections();
        assert_eq!(state.branches.selection(), &Selection::All);
        assert_eq!(state.counselors.selection(), &Selection::Unset);
    }

    #[test]
    fn test_reference_kind_writes_its_facet() {
        let mut draft = FilterState::default();
        ReferenceKind::Branch.set_facet(&mut draft, Some("Kochi"));
        ReferenceKind::Counselor.set_facet(&mut draft, Some("Anu"));
        assert_eq!(draft.branch(), Some("Kochi"));
        assert_eq!(draft.counselor(), Some("Anu"));
        ReferenceKind::Counselor.set_facet(&mut draft, None);
        assert_eq!(draft.counselor(), None);
    }

    #[test]
    fn test_unknown_page_size_falls_back_to_default() {
        let persisted = PersistedState {
            filter: FilterState::default(),
            page_size: 7,
        };
        let state = ReportsState::new(
            &ReportsConfig::default(),
            AuthContext::with_token("t"),
            Some(persisted),
        );
        assert_eq!(state.pager.request().limit, 10);
        assert_eq!(state.counselors.scope(), None);
    }
}
