use contracts::dashboards::d410_telecaller_reports::{
    DetailRecord, DrillDownKey, MetricColumn, SummaryRow,
};
use contracts::shared::pagination::{PageRequest, PageResult};

use super::error::ReportError;

/// Запрос страницы детализации
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailFetch {
    pub seq: u64,
    pub key: DrillDownKey,
    pub page: PageRequest,
}

/// Что сделал навигатор с ответом
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailApply {
    Applied,
    /// Ответ устарел: другая ячейка, другая страница или уже открыта сводка
    Stale,
    /// Записей стало меньше и запрошенной страницы больше нет
    Refetch(DetailFetch),
}

/// Открытая детализация одной ячейки
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub key: DrillDownKey,
    pub telecaller_name: String,
    pub column: MetricColumn,
    pub request: PageRequest,
    pub page: Option<PageResult<DetailRecord>>,
    pub loading: bool,
    pub error: Option<ReportError>,
}

impl DetailView {
    pub fn records(&self) -> &[DetailRecord] {
        self.page.as_ref().map(|p| p.items.as_slice()).unwrap_or(&[])
    }

    pub fn total_pages(&self) -> u32 {
        self.page.as_ref().map(|p| p.total_pages).unwrap_or(1)
    }

    /// Заголовок вида "Anu · Contacted"
    pub fn title(&self) -> String {
        format!("{} · {}", self.telecaller_name, self.column.title())
    }

    /// `EmptyResult`, если детализация загружена и пуста
    pub fn notice(&self) -> Option<ReportError> {
        match &self.page {
            Some(page) if page.is_empty() => Some(ReportError::EmptyResult),
            _ => None,
        }
    }
}

/// Какой экран показан
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewState {
    #[default]
    Aggregate,
    Detail(DetailView),
}

impl ViewState {
    pub fn is_detail(&self) -> bool {
        matches!(self, ViewState::Detail(_))
    }

    pub fn detail(&self) -> Option<&DetailView> {
        match self {
            ViewState::Detail(view) => Some(view),
            ViewState::Aggregate => None,
        }
    }
}

/// Переходы между сводкой и детализацией
///
/// Навигатор не трогает состояние сводки: после `back` фильтры, страница и
/// строки сводки остаются такими, какими были до перехода.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrillDownNavigator {
    state: ViewState,
    detail_limit: u32,
    seq: u64,
}

impl DrillDownNavigator {
    pub fn new(detail_limit: u32) -> Self {
        Self {
            state: ViewState::Aggregate,
            detail_limit,
            seq: 0,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn detail(&self) -> Option<&DetailView> {
        self.state.detail()
    }

    /// Переход в детализацию по клику на ячейку
    pub fn enter(&mut self, row: &SummaryRow, column: MetricColumn) -> DetailFetch {
        let key = DrillDownKey::for_cell(row, column);
        log::info!(
            "drill-down into {} for telecaller {}",
            column.key(),
            row.telecaller_id
        );
        self.state = ViewState::Detail(DetailView {
            key: key.clone(),
            telecaller_name: row.telecaller_name.clone(),
            column,
            request: PageRequest::first(self.detail_limit),
            page: None,
            loading: true,
            error: None,
        });
        self.seq += 1;
        log::debug!("detail fetch #{} page 1", self.seq);
        DetailFetch {
            seq: self.seq,
            key,
            page: PageRequest::first(self.detail_limit),
        }
    }

    /// Возврат к сводке; незавершенные запросы детализации становятся устаревшими
    pub fn back(&mut self) {
        self.seq += 1;
        self.state = ViewState::Aggregate;
    }

    pub fn change_page(&mut self, page: u32) -> Option<DetailFetch> {
        let ViewState::Detail(view) = &mut self.state else {
            return None;
        };
        let page = page.clamp(1, view.total_pages());
        if page == view.request.page && view.page.is_some() {
            return None;
        }
        view.request = view.request.with_page(page);
        self.issue()
    }

    pub fn set_limit(&mut self, limit: u32) -> Option<DetailFetch> {
        self.detail_limit = limit.max(1);
        let ViewState::Detail(view) = &mut self.state else {
            return None;
        };
        view.request = PageRequest::first(limit);
        self.issue()
    }

    /// Повторить загрузку текущей страницы детализации
    pub fn refresh(&mut self) -> Option<DetailFetch> {
        self.issue()
    }

    fn issue(&mut self) -> Option<DetailFetch> {
        let ViewState::Detail(view) = &mut self.state else {
            return None;
        };
        self.seq += 1;
        view.loading = true;
        Some(DetailFetch {
            seq: self.seq,
            key: view.key.clone(),
            page: view.request,
        })
    }

    /// Применить ответ на последний выданный запрос
    pub fn apply(
        &mut self,
        seq: u64,
        result: Result<PageResult<DetailRecord>, ReportError>,
    ) -> DetailApply {
        if seq != self.seq {
            log::debug!("discarding stale detail response #{seq}");
            return DetailApply::Stale;
        }
        let ViewState::Detail(view) = &mut self.state else {
            return DetailApply::Stale;
        };
        view.loading = false;
        match result {
            Ok(page) => {
                view.error = None;
                if page.is_empty() && page.total > 0 && view.request.page > page.total_pages {
                    view.request = view.request.clamped(page.total);
                    return self.issue().map_or(DetailApply::Applied, DetailApply::Refetch);
                }
                view.request = view.request.with_page(page.page);
                view.page = Some(page);
            }
            Err(e) => {
                log::warn!("detail fetch #{seq} failed: {e}");
                // индикатор страницы возвращается к показанным записям
                if let Some(shown) = &view.page {
                    view.request = PageRequest::new(shown.page, shown.limit);
                }
                view.error = Some(e);
            }
        }
        DetailApply::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::d410_telecaller_reports::aggregate_pager::AggregatePager;
    use contracts::dashboards::d410_telecaller_reports::{FilterState, MetricType, TelecallerId};

    fn anu() -> SummaryRow {
        SummaryRow {
            telecaller_id: TelecallerId::from(12),
            telecaller_name: "Anu".into(),
            branch_name: "Kochi".into(),
            contacted: 4,
            not_interested: 1,
            ..Default::default()
        }
    }

    fn records(n: usize) -> Vec<DetailRecord> {
        (0..n)
            .map(|i| DetailRecord {
                candidate_name: format!("Lead {i}"),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_enter_contacted_cell() {
        let mut nav = DrillDownNavigator::new(10);
        let fetch = nav.enter(&anu(), MetricColumn::Contacted);
        assert_eq!(fetch.key.telecaller_id.as_str(), "12");
        assert_eq!(fetch.key.metric_type, MetricType::Contacted);
        assert_eq!(fetch.key.sub_filter, None);
        assert_eq!(fetch.page, PageRequest::new(1, 10));

        assert_eq!(
            nav.apply(fetch.seq, Ok(PageResult::new(records(4), 1, 10, 4))),
            DetailApply::Applied
        );
        let view = nav.detail().unwrap();
        assert_eq!(view.records().len(), 4);
        assert_eq!(view.title(), "Anu · Contacted");
        assert!(!view.loading);
    }

    #[test]
    fn test_not_interested_cell_uses_status_sub_filter() {
        let mut nav = DrillDownNavigator::new(10);
        let fetch = nav.enter(&anu(), MetricColumn::NotInterested);
        assert_eq!(fetch.key.metric_type, MetricType::Contacted);
        assert_eq!(fetch.key.sub_filter.as_deref(), Some("status=not_interested"));
        assert_eq!(nav.detail().unwrap().column, MetricColumn::NotInterested);
    }

    #[test]
    fn test_back_leaves_aggregate_untouched() {
        let filter = FilterState {
            branch_name: Some("Kochi".into()),
            ..Default::default()
        };
        let mut pager = AggregatePager::new(10);
        let fetch = pager.begin(filter);
        pager.apply(fetch.seq, Ok(PageResult::new(vec![anu()], 1, 10, 23)));
        let next = pager.go_to_page(2).unwrap();
        pager.apply(next.seq, Ok(PageResult::new(vec![anu()], 2, 10, 23)));
        let before = pager.clone();

        let mut nav = DrillDownNavigator::new(10);
        let detail = nav.enter(&pager.rows()[0], MetricColumn::Won);
        nav.apply(detail.seq, Ok(PageResult::new(records(2), 1, 10, 2)));
        nav.back();

        assert_eq!(nav.state(), &ViewState::Aggregate);
        assert_eq!(pager, before);
        assert_eq!(pager.request().page, 2);
    }

    #[test]
    fn test_response_after_back_is_ignored() {
        let mut nav = DrillDownNavigator::new(10);
        let fetch = nav.enter(&anu(), MetricColumn::Contacted);
        nav.back();
        assert_eq!(
            nav.apply(fetch.seq, Ok(PageResult::new(records(4), 1, 10, 4))),
            DetailApply::Stale
        );
        assert!(!nav.state().is_detail());
    }

    #[test]
    fn test_response_for_previous_cell_is_ignored() {
        let mut nav = DrillDownNavigator::new(10);
        let first = nav.enter(&anu(), MetricColumn::Contacted);
        let second = nav.enter(&anu(), MetricColumn::Won);
        assert_eq!(
            nav.apply(first.seq, Ok(PageResult::new(records(4), 1, 10, 4))),
            DetailApply::Stale
        );
        assert_eq!(
            nav.apply(second.seq, Ok(PageResult::new(records(1), 1, 10, 1))),
            DetailApply::Applied
        );
        assert_eq!(nav.detail().unwrap().records().len(), 1);
    }

    #[test]
    fn test_detail_paging() {
        let mut nav = DrillDownNavigator::new(10);
        let fetch = nav.enter(&anu(), MetricColumn::TotalCalls);
        nav.apply(fetch.seq, Ok(PageResult::new(records(10), 1, 10, 35)));
        assert_eq!(nav.detail().unwrap().total_pages(), 4);

        let fetch = nav.change_page(4).unwrap();
        assert_eq!(fetch.page.page, 4);
        assert!(nav.detail().unwrap().loading);
        nav.apply(fetch.seq, Ok(PageResult::new(records(5), 4, 10, 35)));
        assert!(nav.change_page(4).is_none());

        let fetch = nav.set_limit(25).unwrap();
        assert_eq!(fetch.page, PageRequest::new(1, 25));
    }

    #[test]
    fn test_failed_detail_keeps_previous_records() {
        let mut nav = DrillDownNavigator::new(10);
        let fetch = nav.enter(&anu(), MetricColumn::Contacted);
        nav.apply(fetch.seq, Ok(PageResult::new(records(10), 1, 10, 12)));
        let fetch = nav.change_page(2).unwrap();
        nav.apply(fetch.seq, Err(ReportError::network("HTTP 500")));

        let view = nav.detail().unwrap();
        assert_eq!(view.records().len(), 10);
        assert_eq!(view.error, Some(ReportError::network("HTTP 500")));
    }

    #[test]
    fn test_failed_page_change_can_be_retried() {
        let mut nav = DrillDownNavigator::new(10);
        let fetch = nav.enter(&anu(), MetricColumn::Contacted);
        nav.apply(fetch.seq, Ok(PageResult::new(records(10), 1, 10, 23)));
        let fetch = nav.change_page(2).unwrap();
        nav.apply(fetch.seq, Err(ReportError::network("HTTP 500")));

        let view = nav.detail().unwrap();
        assert_eq!(view.request.page, 1);
        assert_eq!(view.page.as_ref().unwrap().page, 1);

        let retry = nav.change_page(2).unwrap();
        assert_eq!(retry.page.page, 2);
    }

    #[test]
    fn test_shrunk_detail_clamps_page() {
        let mut nav = DrillDownNavigator::new(10);
        let fetch = nav.enter(&anu(), MetricColumn::Contacted);
        nav.apply(fetch.seq, Ok(PageResult::new(records(10), 1, 10, 23)));
        let third = nav.change_page(3).unwrap();

        // пока страница грузилась, записей осталось 12
        let outcome = nav.apply(third.seq, Ok(PageResult::new(vec![], 3, 10, 12)));
        let DetailApply::Refetch(clamped) = outcome else {
            panic!("expected a clamped refetch, got {outcome:?}");
        };
        assert_eq!(clamped.page, PageRequest::new(2, 10));
        assert_eq!(clamped.key, third.key);

        let view = nav.detail().unwrap();
        assert!(view.loading);
        assert_eq!(view.notice(), None);
        assert_eq!(view.records().len(), 10);

        nav.apply(clamped.seq, Ok(PageResult::new(records(2), 2, 10, 12)));
        let view = nav.detail().unwrap();
        assert_eq!(view.request.page, 2);
        assert_eq!(view.records().len(), 2);
        assert_eq!(view.notice(), None);
    }

    #[test]
    fn test_empty_detail_notice() {
        let mut nav = DrillDownNavigator::new(10);
        let fetch = nav.enter(&anu(), MetricColumn::Won);
        nav.apply(fetch.seq, Ok(PageResult::new(vec![], 1, 10, 0)));
        assert_eq!(nav.detail().unwrap().notice(), Some(ReportError::EmptyResult));
    }
}
