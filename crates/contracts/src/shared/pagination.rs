//! Каноническая модель пагинации
//!
//! Бэкенд возвращает пагинацию в разных формах (`{page, totalPages}`,
//! только `{total}`, иногда без блока вовсе). Все формы приводятся к
//! [`PageResult`] на границе загрузки, дальше по коду форма не проверяется.

use serde::{Deserialize, Serialize};

/// Запрос страницы. Страницы нумеруются с 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Создает запрос, поднимая `page` и `limit` до минимально допустимых значений
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Первая страница с заданным размером
    pub fn first(limit: u32) -> Self {
        Self::new(1, limit)
    }

    /// Тот же размер страницы, другая страница
    pub fn with_page(self, page: u32) -> Self {
        Self::new(page, self.limit)
    }

    /// Запрос, у которого страница зажата в `[1, total_pages]`
    pub fn clamped(self, total: u64) -> Self {
        self.with_page(self.page.min(total_pages(total, self.limit)))
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

/// `ceil(total / limit)`, но не меньше 1
pub fn total_pages(total: u64, limit: u32) -> u32 {
    let limit = u64::from(limit.max(1));
    let pages = total.div_ceil(limit).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Одна страница результата
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl<T> PageResult<T> {
    /// Собирает страницу, пересчитывая `total_pages` и зажимая `page`
    pub fn new(items: Vec<T>, page: u32, limit: u32, total: u64) -> Self {
        let limit = limit.max(1);
        let total_pages = total_pages(total, limit);
        Self {
            items,
            page: page.clamp(1, total_pages),
            limit,
            total,
            total_pages,
        }
    }

    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), 1, request.limit, 0)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Порядковый номер первой строки страницы (для подписи "1–10 из 23"), 0 для пустой
    pub fn first_row_number(&self) -> u64 {
        if self.items.is_empty() {
            return 0;
        }
        u64::from(self.page - 1) * u64::from(self.limit) + 1
    }

    /// Порядковый номер последней строки страницы, 0 для пустой
    pub fn last_row_number(&self) -> u64 {
        if self.items.is_empty() {
            return 0;
        }
        self.first_row_number() + self.items.len() as u64 - 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResult<U> {
        PageResult {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

/// Блок `pagination` в ответе бэкенда. Любое поле может отсутствовать.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPagination {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default, alias = "totalPages")]
    pub total_pages: Option<u32>,
    #[serde(default, alias = "hasNext")]
    pub has_next: Option<bool>,
    #[serde(default, alias = "hasPrevious")]
    pub has_previous: Option<bool>,
}

/// Приводит ответ бэкенда к [`PageResult`]
///
/// Недостающие поля берутся из исходного запроса. Если нет `total`, он
/// оценивается по `total_pages` (или по `has_next`), а при полном отсутствии
/// пагинации считается, что пришел весь набор.
pub fn normalize_page<T>(
    items: Vec<T>,
    raw: Option<&RawPagination>,
    request: PageRequest,
) -> PageResult<T> {
    let received = items.len() as u64;
    let Some(raw) = raw else {
        return PageResult::new(items, 1, request.limit.max(received as u32), received);
    };

    let page = raw.page.unwrap_or(request.page).max(1);
    let limit = raw.limit.filter(|l| *l > 0).unwrap_or(request.limit);
    let already_seen = u64::from(page - 1) * u64::from(limit);

    let total = match (raw.total, raw.total_pages, raw.has_next) {
        (Some(total), _, _) => total,
        (None, Some(pages), _) if pages > page => u64::from(pages) * u64::from(limit),
        (None, _, Some(true)) => already_seen + received + 1,
        _ => already_seen + received,
    };

    PageResult::new(items, page, limit, total)
}
