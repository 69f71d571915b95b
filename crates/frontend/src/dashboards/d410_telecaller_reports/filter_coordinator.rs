use contracts::dashboards::d410_telecaller_reports::{Facet, FilterState};

use super::error::ReportError;
use crate::system::auth::AuthContext;

/// Handle of a scheduled (debounced) aggregate refetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefetchTicket(u64);

/// Результат фиксации фильтров
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    /// Новое зафиксированное состояние
    pub filter: FilterState,
    /// Филиал изменился: список консультантов нужно переинициализировать
    /// под `filter.branch_name`
    pub branch_changed: bool,
    /// Отличается ли новое состояние от предыдущего
    pub changed: bool,
    pub ticket: RefetchTicket,
}

/// Владелец зафиксированного набора фильтров
///
/// Решает, что инвалидировать после изменения: сбрасывает зависимый фасет
/// консультанта при смене филиала и выдает билет на отложенную перезагрузку
/// сводки. Серия быстрых изменений схлопывается в одну перезагрузку, потому что
/// срабатывает только последний билет.
#[derive(Debug, Clone)]
pub struct FilterCoordinator {
    committed: FilterState,
    draft: FilterState,
    generation: u64,
    auth: AuthContext,
}

impl FilterCoordinator {
    pub fn new(auth: AuthContext, initial: FilterState) -> Self {
        let initial = initial.normalized();
        Self {
            draft: initial.clone(),
            committed: initial,
            generation: 0,
            auth,
        }
    }

    pub fn committed(&self) -> &FilterState {
        &self.committed
    }

    pub fn draft(&self) -> &FilterState {
        &self.draft
    }

    /// Правка черновика без перезагрузки данных
    pub fn edit_draft(&mut self, edit: impl FnOnce(&mut FilterState)) {
        edit(&mut self.draft);
    }

    pub fn commit(&mut self, draft: FilterState) -> CommitOutcome {
        let mut next = draft.normalized();
        let branch_changed = next.branch_differs(&self.committed);
        if branch_changed {
            // Старый консультант может не относиться к новому филиалу
            next.counselor_name = None;
        }
        let changed = next != self.committed;

        self.committed = next.clone();
        self.draft = next.clone();
        self.generation += 1;

        log::debug!(
            "filters committed (branch_changed={}, changed={})",
            branch_changed,
            changed
        );

        CommitOutcome {
            filter: next,
            branch_changed,
            changed,
            ticket: RefetchTicket(self.generation),
        }
    }

    /// Фиксирует текущий черновик
    pub fn commit_draft(&mut self) -> CommitOutcome {
        let draft = self.draft.clone();
        self.commit(draft)
    }

    /// Снимает один фасет (клик по "чипу" фильтра)
    pub fn remove_facet(&mut self, facet: Facet) -> CommitOutcome {
        let next = self.committed.without(facet);
        self.commit(next)
    }

    /// Все фасеты в значения по умолчанию, одна перезагрузка
    pub fn reset(&mut self) -> CommitOutcome {
        self.commit(FilterState::default())
    }

    /// Таймер debounce истек
    ///
    /// `Ok(None)` для устаревшего билета; `AuthRequired`, если нет учетных
    /// данных, тогда перезагрузка не выполняется.
    pub fn fire(&self, ticket: RefetchTicket) -> Result<Option<FilterState>, ReportError> {
        if ticket.0 != self.generation {
            return Ok(None);
        }
        self.auth.credential()?;
        Ok(Some(self.committed.clone()))
    }

    /// Текущее состояние для немедленной загрузки (первый показ, экспорт)
    pub fn current(&self) -> Result<FilterState, ReportError> {
        self.auth.credential()?;
        Ok(self.committed.clone())
    }
}
