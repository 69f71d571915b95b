//! Incremental search over a remote, paginated option list
//!
//! The controller is IO-free: it hands out [`SearchRequest`]s and accepts
//! responses tagged with the request's sequence number. The component that
//! owns it performs the fetch and the debounce sleep.
//!
//! ## Lifecycle
//!
//! ```text
//! set_search_term("ko") -> ticket #1   (timer started)
//! set_search_term("koc") -> ticket #2  (ticket #1 is now stale)
//! fire(#1) -> None
//! fire(#2) -> Some(request seq=1, term="koc", page=1)
//! apply(seq=1, page) -> items replaced
//! load_more() -> Some(request seq=2, page=2) -> apply -> items appended
//! ```

use contracts::dashboards::d410_telecaller_reports::ReferenceOption;
use contracts::shared::pagination::PageResult;
use std::fmt::Display;

/// Одна загрузка страницы вариантов
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub seq: u64,
    pub term: String,
    pub page: u32,
    pub limit: u32,
    /// Parent facet the list is scoped to (e.g. branch for counselors)
    pub scope: Option<String>,
}

/// Handle of a scheduled debounced fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceTicket(u64);

/// Состояние выбора: "еще не выбрано", "Все …" или конкретное значение
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Unset,
    All,
    Value(String),
}

impl Selection {
    /// Значение для фильтра: `None` и для `Unset`, и для `All`
    pub fn value(&self) -> Option<&str> {
        match self {
            Selection::Value(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncrementalSearch<T> {
    limit: u32,
    scope: Option<String>,
    /// Text in the input (may not have reached the network yet)
    input: String,
    /// Term of the currently accumulated list
    term: String,
    items: Vec<T>,
    page: u32,
    has_more: bool,
    loaded: bool,
    debounce_generation: u64,
    issued_seq: u64,
    in_flight: Option<(u64, u32, String)>,
    selection: Selection,
    error: Option<String>,
}

impl<T: Clone> IncrementalSearch<T> {
    pub fn new(limit: u32) -> Self {
        Self {
            limit: limit.max(1),
            scope: None,
            input: String::new(),
            term: String::new(),
            items: Vec::new(),
            page: 0,
            has_more: false,
            loaded: false,
            debounce_generation: 0,
            issued_seq: 0,
            in_flight: None,
            selection: Selection::Unset,
            error: None,
        }
    }

    pub fn scoped(mut self, scope: Option<String>) -> Self {
        self.scope = scope;
        self
    }

    /// Запоминает ввод и перезапускает таймер debounce
    pub fn set_search_term(&mut self, term: impl Into<String>) -> DebounceTicket {
        self.input = term.into();
        self.debounce_generation += 1;
        DebounceTicket(self.debounce_generation)
    }

    /// Таймер истек: запрос выдается только для последнего билета
    pub fn fire(&mut self, ticket: DebounceTicket) -> Option<SearchRequest> {
        if ticket.0 != self.debounce_generation {
            return None;
        }
        let term = self.input.trim().to_string();
        Some(self.issue(term, 1))
    }

    /// Первая загрузка при открытии списка
    pub fn open(&mut self) -> Option<SearchRequest> {
        if self.loaded || self.in_flight.is_some() {
            return None;
        }
        let term = self.input.trim().to_string();
        Some(self.issue(term, 1))
    }

    /// Следующая страница того же поискового запроса
    pub fn load_more(&mut self) -> Option<SearchRequest> {
        if !self.has_more || self.in_flight.is_some() {
            return None;
        }
        let term = self.term.clone();
        let next = self.page + 1;
        Some(self.issue(term, next))
    }

    /// Решение о догрузке по положению прокрутки списка
    pub fn should_load_more(
        &self,
        scroll_top: i32,
        client_height: i32,
        scroll_height: i32,
        threshold_px: u32,
    ) -> bool {
        if !self.has_more || self.in_flight.is_some() {
            return false;
        }
        let distance_to_end = scroll_height - (scroll_top + client_height);
        i64::from(distance_to_end) <= i64::from(threshold_px)
    }

    fn issue(&mut self, term: String, page: u32) -> SearchRequest {
        self.issued_seq += 1;
        self.in_flight = Some((self.issued_seq, page, term.clone()));
        self.error = None;
        SearchRequest {
            seq: self.issued_seq,
            term,
            page,
            limit: self.limit,
            scope: self.scope.clone(),
        }
    }

    /// Применяет ответ. Возвращает `false`, если ответ устарел и отброшен.
    pub fn apply<E: Display>(&mut self, seq: u64, result: Result<PageResult<T>, E>) -> bool {
        let Some((in_flight_seq, page, term)) = self.in_flight.take() else {
            log::debug!("discarding search response #{seq}: nothing in flight");
            return false;
        };
        if in_flight_seq != seq {
            log::debug!("discarding stale search response #{seq}, latest is #{in_flight_seq}");
            self.in_flight = Some((in_flight_seq, page, term));
            return false;
        }

        match result {
            Ok(result) => {
                let total_pages = result.total_pages;
                if page > 1 && term == self.term {
                    self.items.extend(result.items);
                } else {
                    self.items = result.items;
                }
                self.term = term;
                self.page = page;
                self.has_more = page < total_pages;
                self.loaded = true;
            }
            Err(e) => {
                log::warn!("option list fetch #{seq} failed: {e}");
                self.error = Some(e.to_string());
            }
        }
        true
    }

    /// Выбор варианта; пустая строка означает "Все …"
    pub fn select(&mut self, value: &str) -> Selection {
        self.selection = if value.trim().is_empty() {
            Selection::All
        } else {
            Selection::Value(value.to_string())
        };
        self.selection.clone()
    }

    /// Сбрасывает поиск и выбор. Если список был отфильтрован, возвращает
    /// запрос на загрузку полного списка.
    pub fn clear(&mut self) -> Option<SearchRequest> {
        self.selection = Selection::Unset;
        self.debounce_generation += 1;
        let was_filtered = !self.input.trim().is_empty() || !self.term.is_empty();
        self.input.clear();
        if was_filtered && self.loaded {
            Some(self.issue(String::new(), 1))
        } else {
            None
        }
    }

    /// Переинициализация под новый родительский фасет
    ///
    /// Все накопленное состояние сбрасывается, ответы на уже отправленные
    /// запросы будут отброшены.
    pub fn rescope(&mut self, scope: Option<String>) {
        let limit = self.limit;
        let issued_seq = self.issued_seq + 1;
        let debounce_generation = self.debounce_generation + 1;
        *self = Self::new(limit).scoped(scope);
        self.issued_seq = issued_seq;
        self.debounce_generation = debounce_generation;
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl IncrementalSearch<ReferenceOption> {
    /// Подпись выбранного варианта, если он есть среди загруженных
    pub fn selected_label(&self) -> Option<&str> {
        let value = self.selection.value()?;
        self.items
            .iter()
            .find(|o| o.select_value == value)
            .map(|o| o.display_label.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(name: &str) -> ReferenceOption {
        ReferenceOption {
            id: name.to_lowercase(),
            display_label: name.to_string(),
            select_value: name.to_string(),
        }
    }

    fn page(names: &[&str], page: u32, total: u64) -> Result<PageResult<ReferenceOption>, String> {
        Ok(PageResult::new(
            names.iter().map(|n| option(n)).collect(),
            page,
            2,
            total,
        ))
    }

    #[test]
    fn test_debounce_collapses_to_last_term() {
        let mut search = IncrementalSearch::<ReferenceOption>::new(2);
        let tickets: Vec<_> = ["k", "ko", "koc", "koch"]
            .iter()
            .map(|t| search.set_search_term(*t))
            .collect();

        let requests: Vec<_> = tickets.into_iter().filter_map(|t| search.fire(t)).collect();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].term, "koch");
        assert_eq!(requests[0].page, 1);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut search = IncrementalSearch::<ReferenceOption>::new(2);
        let a = search.set_search_term("x");
        let request_a = search.fire(a).unwrap();
        let b = search.set_search_term("y");
        let request_b = search.fire(b).unwrap();

        assert!(search.apply(request_b.seq, page(&["Yamuna"], 1, 1)));
        assert!(!search.apply(request_a.seq, page(&["Xavier"], 1, 1)));

        assert_eq!(search.items(), &[option("Yamuna")]);
        assert_eq!(search.term(), "y");
    }

    #[test]
    fn test_load_more_accumulates_same_term() {
        let mut search = IncrementalSearch::<ReferenceOption>::new(2);
        let first = search.open().unwrap();
        assert!(search.apply(first.seq, page(&["Alappuzha", "Kochi"], 1, 3)));
        assert!(search.has_more());

        let more = search.load_more().unwrap();
        assert_eq!(more.page, 2);
        assert!(search.load_more().is_none(), "reentrant load-more must be ignored");
        assert!(search.apply(more.seq, page(&["Thrissur"], 2, 3)));

        assert_eq!(search.items().len(), 3);
        assert!(!search.has_more());
        assert!(search.load_more().is_none());
    }

    #[test]
    fn test_new_term_resets_accumulation() {
        let mut search = IncrementalSearch::<ReferenceOption>::new(2);
        let first = search.open().unwrap();
        search.apply(first.seq, page(&["Alappuzha", "Kochi"], 1, 4));
        let more = search.load_more().unwrap();
        search.apply(more.seq, page(&["Kollam", "Thrissur"], 2, 4));
        assert_eq!(search.items().len(), 4);

        let ticket = search.set_search_term("ko");
        let request = search.fire(ticket).unwrap();
        assert_eq!(request.page, 1);
        search.apply(request.seq, page(&["Kochi", "Kollam"], 1, 2));
        assert_eq!(search.items(), &[option("Kochi"), option("Kollam")]);
        assert_eq!(search.page(), 1);
    }

    #[test]
    fn test_failure_keeps_items() {
        let mut search = IncrementalSearch::<ReferenceOption>::new(2);
        let first = search.open().unwrap();
        search.apply(first.seq, page(&["Kochi", "Kollam"], 1, 4));
        let more = search.load_more().unwrap();
        let failed: Result<PageResult<ReferenceOption>, String> = Err("HTTP 500".into());
        assert!(search.apply(more.seq, failed));
        assert_eq!(search.items().len(), 2);
        assert_eq!(search.error(), Some("HTTP 500"));
        assert!(!search.is_loading());
    }

    #[test]
    fn test_select_all_is_distinct_from_unset() {
        let mut search = IncrementalSearch::<ReferenceOption>::new(2);
        assert_eq!(search.selection(), &Selection::Unset);
        assert_eq!(search.select(""), Selection::All);
        assert_eq!(search.selection().value(), None);
        assert_eq!(search.select("Kochi"), Selection::Value("Kochi".into()));
        search.clear();
        assert_eq!(search.selection(), &Selection::Unset);
    }

    #[test]
    fn test_clear_reloads_unfiltered_list() {
        let mut search = IncrementalSearch::<ReferenceOption>::new(2);
        let ticket = search.set_search_term("ko");
        let request = search.fire(ticket).unwrap();
        search.apply(request.seq, page(&["Kochi"], 1, 1));

        let pending = search.set_search_term("kol");
        let reload = search.clear().unwrap();
        assert_eq!(reload.term, "");
        assert!(search.fire(pending).is_none());
    }

    #[test]
    fn test_rescope_discards_in_flight() {
        let mut search =
            IncrementalSearch::<ReferenceOption>::new(2).scoped(Some("Kochi".into()));
        let request = search.open().unwrap();
        assert_eq!(request.scope.as_deref(), Some("Kochi"));
        search.select("Anu");

        search.rescope(Some("Kollam".into()));
        assert!(!search.apply(request.seq, page(&["Anu"], 1, 1)));
        assert!(search.items().is_empty());
        assert_eq!(search.selection(), &Selection::Unset);

        let next = search.open().unwrap();
        assert!(next.seq > request.seq);
        assert_eq!(next.scope.as_deref(), Some("Kollam"));
    }

    #[test]
    fn test_scroll_threshold() {
        let mut search = IncrementalSearch::<ReferenceOption>::new(2);
        let first = search.open().unwrap();
        search.apply(first.seq, page(&["A", "B"], 1, 6));

        assert!(!search.should_load_more(0, 200, 600, 40));
        assert!(search.should_load_more(370, 200, 600, 40));
        search.load_more();
        assert!(!search.should_load_more(400, 200, 600, 40));
    }

    #[test]
    fn test_selected_label() {
        let mut search = IncrementalSearch::<ReferenceOption>::new(2);
        let first = search.open().unwrap();
        search.apply(
            first.seq,
            Ok::<_, String>(PageResult::new(
                vec![ReferenceOption {
                    id: "3".into(),
                    display_label: "Kochi (Ernakulam)".into(),
                    select_value: "Kochi".into(),
                }],
                1,
                2,
                1,
            )),
        );
        search.select("Kochi");
        assert_eq!(search.selected_label(), Some("Kochi (Ernakulam)"));
    }
}
