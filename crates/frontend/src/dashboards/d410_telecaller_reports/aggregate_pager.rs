use contracts::dashboards::d410_telecaller_reports::{FilterState, SummaryRow};
use contracts::shared::pagination::{PageRequest, PageResult};

use super::error::ReportError;

/// Уровень "тепловой" окраски ячейки метрики. Влияет только на отображение.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorBucket {
    Neutral,
    Low,
    MediumLow,
    Medium,
    High,
    VeryHigh,
}

impl ColorBucket {
    pub fn css_class(&self) -> &'static str {
        match self {
            ColorBucket::Neutral => "metric-cell--neutral",
            ColorBucket::Low => "metric-cell--low",
            ColorBucket::MediumLow => "metric-cell--medium-low",
            ColorBucket::Medium => "metric-cell--medium",
            ColorBucket::High => "metric-cell--high",
            ColorBucket::VeryHigh => "metric-cell--very-high",
        }
    }
}

pub fn color_bucket(value: u64) -> ColorBucket {
    match value {
        0 => ColorBucket::Neutral,
        1 => ColorBucket::Low,
        2 => ColorBucket::MediumLow,
        3..=5 => ColorBucket::Medium,
        6..=10 => ColorBucket::High,
        _ => ColorBucket::VeryHigh,
    }
}

/// Запрос страницы сводки
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryFetch {
    pub seq: u64,
    pub filter: FilterState,
    pub page: PageRequest,
}

/// Что сделал пейджер с ответом
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagerApply {
    Applied,
    /// Ответ устарел и отброшен
    Stale,
    /// Набор уменьшился и запрошенной страницы больше нет: нужно загрузить
    /// зажатую страницу
    Refetch(SummaryFetch),
}

/// Пагинация сводных строк по телекаллерам
///
/// Страница всегда заменяется целиком. При ошибке остаются последние
/// успешные данные и сообщение об ошибке.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatePager {
    request: PageRequest,
    filter: FilterState,
    result: Option<PageResult<SummaryRow>>,
    loading: bool,
    seq: u64,
    error: Option<ReportError>,
}

impl AggregatePager {
    pub fn new(limit: u32) -> Self {
        Self {
            request: PageRequest::first(limit),
            filter: FilterState::default(),
            result: None,
            loading: false,
            seq: 0,
            error: None,
        }
    }

    pub fn request(&self) -> PageRequest {
        self.request
    }

    /// Фильтр, под которым загружена текущая страница
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn reset_page(&mut self) {
        self.request = self.request.with_page(1);
    }

    /// Загрузка текущей страницы под новым фильтром
    pub fn begin(&mut self, filter: FilterState) -> SummaryFetch {
        self.filter = filter;
        self.issue()
    }

    /// Повторная загрузка текущей страницы с тем же фильтром
    pub fn refresh(&mut self) -> SummaryFetch {
        self.issue()
    }

    pub fn go_to_page(&mut self, page: u32) -> Option<SummaryFetch> {
        let total_pages = self.total_pages();
        let page = page.clamp(1, total_pages);
        if page == self.request.page && self.result.is_some() {
            return None;
        }
        self.request = self.request.with_page(page);
        Some(self.issue())
    }

    /// Новый размер страницы, возврат на первую страницу
    pub fn set_limit(&mut self, limit: u32) -> SummaryFetch {
        self.request = PageRequest::first(limit);
        self.issue()
    }

    fn issue(&mut self) -> SummaryFetch {
        self.seq += 1;
        self.loading = true;
        log::debug!("summary fetch #{} page {}", self.seq, self.request.page);
        SummaryFetch {
            seq: self.seq,
            filter: self.filter.clone(),
            page: self.request,
        }
    }

    pub fn apply(
        &mut self,
        seq: u64,
        result: Result<PageResult<SummaryRow>, ReportError>,
    ) -> PagerApply {
        if seq != self.seq {
            log::debug!("discarding stale summary response #{seq}, latest is #{}", self.seq);
            return PagerApply::Stale;
        }
        self.loading = false;

        match result {
            Ok(page) => {
                self.error = None;
                if page.is_empty() && page.total > 0 && self.request.page > page.total_pages {
                    self.request = self.request.clamped(page.total);
                    return PagerApply::Refetch(self.issue());
                }
                self.request = self.request.with_page(page.page);
                self.result = Some(page);
                PagerApply::Applied
            }
            Err(e) => {
                log::warn!("summary fetch #{seq} failed: {e}");
                // индикатор страницы возвращается к показанным строкам
                if let Some(shown) = &self.result {
                    self.request = PageRequest::new(shown.page, shown.limit);
                }
                self.error = Some(e);
                PagerApply::Applied
            }
        }
    }

    pub fn rows(&self) -> &[SummaryRow] {
        self.result.as_ref().map(|r| r.items.as_slice()).unwrap_or(&[])
    }

    pub fn page(&self) -> Option<&PageResult<SummaryRow>> {
        self.result.as_ref()
    }

    pub fn total(&self) -> u64 {
        self.result.as_ref().map(|r| r.total).unwrap_or(0)
    }

    pub fn total_pages(&self) -> u32 {
        self.result.as_ref().map(|r| r.total_pages).unwrap_or(1)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Последняя ошибка загрузки (кратковременное сообщение)
    pub fn error(&self) -> Option<&ReportError> {
        self.error.as_ref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// `EmptyResult`, если загрузка прошла успешно, но строк нет
    pub fn notice(&self) -> Option<ReportError> {
        match &self.result {
            Some(page) if page.is_empty() => Some(ReportError::EmptyResult),
            _ => None,
        }
    }
}
