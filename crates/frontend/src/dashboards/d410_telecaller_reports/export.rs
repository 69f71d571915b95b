use chrono::NaiveDate;
use contracts::dashboards::d410_telecaller_reports::{
    DetailRecord, FilterState, MetricColumn, SummaryRow,
};
use contracts::shared::pagination::PageRequest;

use super::api::ReportsApi;
use super::error::ReportError;
use super::navigator::{DetailView, ViewState};
use crate::shared::date_utils::format_created_date;
use crate::shared::export::{ExcelExportable, TabularFile};
use crate::system::auth::AuthContext;

const FILE_DATE_FORMAT: &str = "%Y-%m-%d";

impl ExcelExportable for SummaryRow {
    fn headers() -> Vec<&'static str> {
        let mut headers = vec!["Telecaller", "Branch"];
        headers.extend(MetricColumn::ALL.iter().map(MetricColumn::title));
        headers
    }

    fn to_csv_row(&self) -> Vec<String> {
        let mut row = vec![self.telecaller_name.clone(), self.branch_name.clone()];
        row.extend(
            MetricColumn::ALL
                .iter()
                .map(|column| column.value(self).to_string()),
        );
        row
    }
}

impl ExcelExportable for DetailRecord {
    fn headers() -> Vec<&'static str> {
        vec!["Name", "Phone", "Email", "Status", "Branch", "Created Date"]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.candidate_name.clone(),
            self.phone.clone(),
            self.email.clone(),
            self.status.clone(),
            self.branch_name.clone(),
            format_created_date(&self.created_at),
        ]
    }
}

/// Заменяет все символы вне `[A-Za-z0-9_-]` на `_`
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

pub fn summary_file_name(today: NaiveDate) -> String {
    format!("counselor_reports_{}", today.format(FILE_DATE_FORMAT))
}

pub fn detail_file_name(telecaller_name: &str, column: MetricColumn, today: NaiveDate) -> String {
    sanitize_file_name(&format!(
        "{}_{}_details_{}",
        telecaller_name,
        column.key(),
        today.format(FILE_DATE_FORMAT)
    ))
}

pub fn summary_table(rows: &[SummaryRow], today: NaiveDate) -> Result<TabularFile, ReportError> {
    if rows.is_empty() {
        return Err(ReportError::ExportEmpty);
    }
    Ok(TabularFile::from_items(
        summary_file_name(today),
        "Counselor Reports",
        rows,
    ))
}

pub fn detail_table(
    view: &DetailView,
    records: &[DetailRecord],
    today: NaiveDate,
) -> Result<TabularFile, ReportError> {
    if records.is_empty() {
        return Err(ReportError::ExportEmpty);
    }
    Ok(TabularFile::from_items(
        detail_file_name(&view.telecaller_name, view.column, today),
        view.column.title(),
        records,
    ))
}

/// Выгрузка текущего экрана целиком (все страницы)
pub struct ExportSerializer<'a, A: ReportsApi> {
    api: &'a A,
    auth: &'a AuthContext,
    export_limit: u32,
}

impl<'a, A: ReportsApi> ExportSerializer<'a, A> {
    pub fn new(api: &'a A, auth: &'a AuthContext, export_limit: u32) -> Self {
        Self {
            api,
            auth,
            export_limit,
        }
    }

    pub async fn export_current_view(
        &self,
        view: &ViewState,
        filter: &FilterState,
        today: NaiveDate,
    ) -> Result<TabularFile, ReportError> {
        self.auth.credential()?;
        let file = match view {
            ViewState::Aggregate => self.export_summary(filter, today).await?,
            ViewState::Detail(detail) => self.export_detail(detail, today).await?,
        };
        log::info!(
            "export prepared: {} ({} rows)",
            file.file_name,
            file.rows.len()
        );
        Ok(file)
    }

    async fn export_summary(
        &self,
        filter: &FilterState,
        today: NaiveDate,
    ) -> Result<TabularFile, ReportError> {
        let page = self
            .api
            .fetch_summary(filter, PageRequest::first(self.export_limit))
            .await?;
        if page.total > page.items.len() as u64 {
            log::warn!(
                "summary export truncated to {} of {} rows",
                page.items.len(),
                page.total
            );
        }
        summary_table(&page.items, today)
    }

    async fn export_detail(
        &self,
        view: &DetailView,
        today: NaiveDate,
    ) -> Result<TabularFile, ReportError> {
        // Если на экране уже весь набор, повторный запрос не нужен
        if let Some(page) = view.page.as_ref() {
            if page.total_pages == 1 && page.items.len() as u64 == page.total {
                return detail_table(view, &page.items, today);
            }
        }
        let page = self
            .api
            .fetch_details(&view.key, PageRequest::first(self.export_limit))
            .await?;
        detail_table(view, &page.items, today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::d410_telecaller_reports::api::ReportsApi;
    use crate::dashboards::d410_telecaller_reports::navigator::DrillDownNavigator;
    use crate::shared::incremental_search::SearchRequest;
    use async_trait::async_trait;
    use contracts::dashboards::d410_telecaller_reports::{
        DrillDownKey, ReferenceOption, TelecallerId,
    };
    use contracts::shared::pagination::PageResult;
    use futures::executor::block_on;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeApi {
        summary: Vec<SummaryRow>,
        details: Vec<DetailRecord>,
        summary_requests: RefCell<Vec<(FilterState, PageRequest)>>,
        detail_requests: RefCell<Vec<(DrillDownKey, PageRequest)>>,
    }

    #[async_trait(?Send)]
    impl ReportsApi for FakeApi {
        async fn fetch_summary(
            &self,
            filter: &FilterState,
            page: PageRequest,
        ) -> Result<PageResult<SummaryRow>, ReportError> {
            self.summary_requests
                .borrow_mut()
                .push((filter.clone(), page));
            let items: Vec<_> = self.summary.iter().take(page.limit as usize).cloned().collect();
            Ok(PageResult::new(items, page.page, page.limit, self.summary.len() as u64))
        }

        async fn fetch_details(
            &self,
            key: &DrillDownKey,
            page: PageRequest,
        ) -> Result<PageResult<DetailRecord>, ReportError> {
            self.detail_requests.borrow_mut().push((key.clone(), page));
            let items: Vec<_> = self.details.iter().take(page.limit as usize).cloned().collect();
            Ok(PageResult::new(items, page.page, page.limit, self.details.len() as u64))
        }

        async fn search_branches(
            &self,
            request: &SearchRequest,
        ) -> Result<PageResult<ReferenceOption>, ReportError> {
            Ok(PageResult::new(vec![], request.page, request.limit, 0))
        }

        async fn search_telecallers(
            &self,
            request: &SearchRequest,
        ) -> Result<PageResult<ReferenceOption>, ReportError> {
            Ok(PageResult::new(vec![], request.page, request.limit, 0))
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn anu() -> SummaryRow {
        SummaryRow {
            telecaller_id: TelecallerId::from(12),
            telecaller_name: "Anu Mathew".into(),
            branch_name: "Kochi".into(),
            total_calls: 20,
            contacted: 12,
            not_contacted: 8,
            answered: 10,
            not_answered: 2,
            won: 3,
            not_interested: 4,
            walk_in_list: 1,
            total_follow_ups: 5,
        }
    }

    fn lead(i: usize) -> DetailRecord {
        DetailRecord {
            candidate_name: format!("Lead {i}"),
            phone: "9999".into(),
            email: "lead@example.com".into(),
            status: "contacted".into(),
            branch_name: "Kochi".into(),
            created_at: "2024-03-01T10:00:00Z".into(),
        }
    }

    #[test]
    fn test_summary_headers_and_row() {
        assert_eq!(
            SummaryRow::headers(),
            vec![
                "Telecaller",
                "Branch",
                "Total Calls",
                "Contacted",
                "Not Contacted",
                "Answered",
                "Not Answered",
                "Won",
                "Not Interested",
                "Walk-in List",
                "Follow-ups",
            ]
        );
        assert_eq!(
            anu().to_csv_row(),
            vec!["Anu Mathew", "Kochi", "20", "12", "8", "10", "2", "3", "4", "1", "5"]
        );
    }

    #[test]
    fn test_detail_row_formats_created_date() {
        let row = lead(1).to_csv_row();
        assert_eq!(row.len(), DetailRecord::headers().len());
        assert_eq!(row[5], "01/03/2024");
    }

    #[test]
    fn test_file_names() {
        assert_eq!(summary_file_name(today()), "counselor_reports_2024-03-15");
        assert_eq!(
            detail_file_name("Anu Mathew", MetricColumn::Contacted, today()),
            "Anu_Mathew_contacted_details_2024-03-15"
        );
        assert_eq!(sanitize_file_name("a/b:c*d"), "a_b_c_d");
    }

    #[test]
    fn test_aggregate_export_uses_export_limit_and_filter() {
        let api = FakeApi {
            summary: vec![anu()],
            ..Default::default()
        };
        let auth = AuthContext::with_token("token");
        let filter = FilterState {
            branch_name: Some("Kochi".into()),
            ..Default::default()
        };
        let file = block_on(
            ExportSerializer::new(&api, &auth, 10_000).export_current_view(
                &ViewState::Aggregate,
                &filter,
                today(),
            ),
        )
        .unwrap();

        assert_eq!(file.file_name, "counselor_reports_2024-03-15");
        assert_eq!(file.headers.len(), 11);
        assert_eq!(file.rows.len(), 1);
        assert_eq!(
            api.summary_requests.borrow().as_slice(),
            &[(filter, PageRequest::new(1, 10_000))]
        );
    }

    #[test]
    fn test_detail_export_fetches_full_set() {
        let api = FakeApi {
            details: (0..12).map(lead).collect(),
            ..Default::default()
        };
        let auth = AuthContext::with_token("token");
        let mut nav = DrillDownNavigator::new(10);
        let fetch = nav.enter(&anu(), MetricColumn::Contacted);
        nav.apply(
            fetch.seq,
            Ok(PageResult::new((0..10).map(lead).collect(), 1, 10, 12)),
        );

        let file = block_on(
            ExportSerializer::new(&api, &auth, 10_000).export_current_view(
                nav.state(),
                &FilterState::default(),
                today(),
            ),
        )
        .unwrap();

        assert_eq!(file.rows.len(), 12);
        assert_eq!(file.file_name, "Anu_Mathew_contacted_details_2024-03-15");
        let requests = api.detail_requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, fetch.key);
        assert_eq!(requests[0].1, PageRequest::new(1, 10_000));
    }

    #[test]
    fn test_detail_export_reuses_complete_page() {
        let api = FakeApi::default();
        let auth = AuthContext::with_token("token");
        let mut nav = DrillDownNavigator::new(10);
        let fetch = nav.enter(&anu(), MetricColumn::NotInterested);
        nav.apply(fetch.seq, Ok(PageResult::new(vec![lead(1), lead(2)], 1, 10, 2)));

        let file = block_on(
            ExportSerializer::new(&api, &auth, 10_000).export_current_view(
                nav.state(),
                &FilterState::default(),
                today(),
            ),
        )
        .unwrap();
        assert_eq!(file.rows.len(), 2);
        assert_eq!(file.file_name, "Anu_Mathew_not_interested_details_2024-03-15");
        assert!(api.detail_requests.borrow().is_empty());
    }

    #[test]
    fn test_empty_export_is_rejected() {
        let api = FakeApi::default();
        let auth = AuthContext::with_token("token");
        let result = block_on(
            ExportSerializer::new(&api, &auth, 10_000).export_current_view(
                &ViewState::Aggregate,
                &FilterState::default(),
                today(),
            ),
        );
        assert_eq!(result, Err(ReportError::ExportEmpty));
    }

    #[test]
    fn test_export_without_credential() {
        let api = FakeApi {
            summary: vec![anu()],
            ..Default::default()
        };
        let auth = AuthContext::anonymous();
        let result = block_on(
            ExportSerializer::new(&api, &auth, 10_000).export_current_view(
                &ViewState::Aggregate,
                &FilterState::default(),
                today(),
            ),
        );
        assert_eq!(result, Err(ReportError::AuthRequired));
        assert!(api.summary_requests.borrow().is_empty());
    }
}
