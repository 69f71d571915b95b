use async_trait::async_trait;
use contracts::dashboards::d410_telecaller_reports::{
    ApiEnvelope, DetailRecord, DrillDownKey, FilterState, RawBranch, RawDetailRecord,
    RawSummaryRow, RawTelecaller, ReferenceOption, SummaryRow,
};
use contracts::shared::pagination::{PageRequest, PageResult};
use gloo_net::http::Request;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::ReportError;
use crate::shared::incremental_search::SearchRequest;
use crate::system::auth::{storage, AuthContext};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Граница бэкенда отчетов
///
/// Все методы возвращают уже нормализованную страницу; различия форм
/// пагинации и имен полей дальше этой границы не проходят.
#[async_trait(?Send)]
pub trait ReportsApi {
    async fn fetch_summary(
        &self,
        filter: &FilterState,
        page: PageRequest,
    ) -> Result<PageResult<SummaryRow>, ReportError>;

    async fn fetch_details(
        &self,
        key: &DrillDownKey,
        page: PageRequest,
    ) -> Result<PageResult<DetailRecord>, ReportError>;

    async fn search_branches(
        &self,
        request: &SearchRequest,
    ) -> Result<PageResult<ReferenceOption>, ReportError>;

    async fn search_telecallers(
        &self,
        request: &SearchRequest,
    ) -> Result<PageResult<ReferenceOption>, ReportError>;
}

#[derive(Serialize)]
struct SummaryQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    branch_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    telecaller_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_date: Option<String>,
    page: u32,
    limit: u32,
}

#[derive(Serialize)]
struct DetailQuery<'a> {
    report: &'a str,
    telecaller_id: &'a str,
    page: u32,
    limit: u32,
}

#[derive(Serialize)]
struct ReferenceQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    branch_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<&'a str>,
    page: u32,
    limit: u32,
}

fn encode<T: Serialize>(query: &T) -> Result<String, ReportError> {
    serde_qs::to_string(query).map_err(|e| ReportError::network(format!("bad query: {e}")))
}

/// `reports?...` для сводки; пустые фасеты не передаются
pub fn summary_query(filter: &FilterState, page: PageRequest) -> Result<String, ReportError> {
    encode(&SummaryQuery {
        branch_name: filter.branch(),
        telecaller_name: filter.counselor(),
        search: filter.search(),
        start_date: filter.start_date.map(|d| d.format(DATE_FORMAT).to_string()),
        end_date: filter.end_date.map(|d| d.format(DATE_FORMAT).to_string()),
        page: page.page,
        limit: page.limit,
    })
}

/// `reports?report=...` для детализации, с параметрами подфильтра
pub fn detail_query(key: &DrillDownKey, page: PageRequest) -> Result<String, ReportError> {
    let mut query = encode(&DetailQuery {
        report: key.metric_type.as_str(),
        telecaller_id: key.telecaller_id.as_str(),
        page: page.page,
        limit: page.limit,
    })?;
    for (name, value) in key.sub_filter_params() {
        query.push('&');
        query.push_str(&urlencoding::encode(&name));
        query.push('=');
        query.push_str(&urlencoding::encode(&value));
    }
    Ok(query)
}

/// Запрос справочника; `scope` передается как `branch_name`
pub fn reference_query(request: &SearchRequest) -> Result<String, ReportError> {
    encode(&ReferenceQuery {
        branch_name: request.scope.as_deref().filter(|s| !s.trim().is_empty()),
        search: Some(request.term.trim()).filter(|s| !s.is_empty()),
        page: request.page,
        limit: request.limit,
    })
}

fn search_page(request: &SearchRequest) -> PageRequest {
    PageRequest::new(request.page, request.limit)
}

/// HTTP реализация поверх gloo-net
#[derive(Debug, Clone)]
pub struct HttpReportsApi {
    base_url: String,
    auth: AuthContext,
}

impl HttpReportsApi {
    pub fn new(base_url: impl Into<String>, auth: AuthContext) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
        }
    }

    async fn get_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &str,
    ) -> Result<ApiEnvelope<T>, ReportError> {
        // Без учетных данных запрос не отправляется
        let credential = self.auth.credential()?;
        let url = format!("{}/{}?{}", self.base_url, path, query);
        log::debug!("GET {}", url);

        let response = Request::get(&url)
            .header("Authorization", &credential.bearer_header())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ReportError::network(format!("request failed: {e}")))?;

        match response.status() {
            401 | 403 => {
                log::warn!("{} rejected the credential ({})", path, response.status());
                storage::clear_access_token();
                return Err(ReportError::AuthRequired);
            }
            _ if !response.ok() => {
                return Err(ReportError::network(format!("HTTP {}", response.status())));
            }
            _ => {}
        }

        let envelope: ApiEnvelope<T> = response
            .json()
            .await
            .map_err(|e| ReportError::network(format!("failed to parse response: {e}")))?;

        if !envelope.is_success() {
            let message = envelope
                .message
                .clone()
                .unwrap_or_else(|| format!("backend code {:?}", envelope.code));
            return Err(ReportError::network(message));
        }
        Ok(envelope)
    }
}

#[async_trait(?Send)]
impl ReportsApi for HttpReportsApi {
    async fn fetch_summary(
        &self,
        filter: &FilterState,
        page: PageRequest,
    ) -> Result<PageResult<SummaryRow>, ReportError> {
        let query = summary_query(filter, page)?;
        let envelope = self.get_envelope::<RawSummaryRow>("reports", &query).await?;
        Ok(envelope.into_page(page, |raw| Some(SummaryRow::from(raw))))
    }

    async fn fetch_details(
        &self,
        key: &DrillDownKey,
        page: PageRequest,
    ) -> Result<PageResult<DetailRecord>, ReportError> {
        let query = detail_query(key, page)?;
        let envelope = self.get_envelope::<RawDetailRecord>("reports", &query).await?;
        Ok(envelope.into_page(page, |raw| Some(DetailRecord::from(raw))))
    }

    async fn search_branches(
        &self,
        request: &SearchRequest,
    ) -> Result<PageResult<ReferenceOption>, ReportError> {
        let query = reference_query(&SearchRequest {
            scope: None,
            ..request.clone()
        })?;
        let envelope = self.get_envelope::<RawBranch>("branches", &query).await?;
        Ok(envelope.into_page(search_page(request), RawBranch::into_option))
    }

    async fn search_telecallers(
        &self,
        request: &SearchRequest,
    ) -> Result<PageResult<ReferenceOption>, ReportError> {
        let query = reference_query(request)?;
        let envelope = self.get_envelope::<RawTelecaller>("telecallers", &query).await?;
        Ok(envelope.into_page(search_page(request), RawTelecaller::into_option))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use contracts::dashboards::d410_telecaller_reports::{MetricColumn, MetricType, TelecallerId};

    #[test]
    fn test_summary_query_omits_empty_facets() {
        let filter = FilterState {
            branch_name: Some("Kochi".into()),
            counselor_name: Some(String::new()),
            ..Default::default()
        };
        let query = summary_query(&filter, PageRequest::new(1, 10)).unwrap();
        assert_eq!(query, "branch_name=Kochi&page=1&limit=10");
    }

    #[test]
    fn test_summary_query_full() {
        let filter = FilterState {
            branch_name: Some("Kochi".into()),
            counselor_name: Some("Anu".into()),
            free_text_search: Some("walk in".into()),
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 31),
        };
        let query = summary_query(&filter, PageRequest::new(2, 25)).unwrap();
        assert!(query.starts_with("branch_name=Kochi&telecaller_name=Anu&search=walk"));
        assert!(query.ends_with("start_date=2024-03-01&end_date=2024-03-31&page=2&limit=25"));
    }

    #[test]
    fn test_detail_query_with_sub_filter() {
        let key = DrillDownKey {
            telecaller_id: TelecallerId::from("12"),
            metric_type: MetricType::Contacted,
            sub_filter: MetricColumn::NotInterested.drill_down().1.map(str::to_string),
        };
        let query = detail_query(&key, PageRequest::new(1, 10)).unwrap();
        assert_eq!(
            query,
            "report=contacted&telecaller_id=12&page=1&limit=10&status=not_interested"
        );
    }

    #[test]
    fn test_reference_query_scope() {
        let request = SearchRequest {
            seq: 1,
            term: "  ".into(),
            page: 2,
            limit: 20,
            scope: Some("Kochi".into()),
        };
        assert_eq!(
            reference_query(&request).unwrap(),
            "branch_name=Kochi&page=2&limit=20"
        );
    }
}
