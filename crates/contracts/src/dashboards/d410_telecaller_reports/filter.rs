use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Зафиксированный набор фильтров отчета по телекаллерам
///
/// Снимок неизменяемый: новый набор целиком заменяет предыдущий.
/// Пустая строка в любом текстовом фасете эквивалентна `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterState {
    pub branch_name: Option<String>,
    pub counselor_name: Option<String>,
    pub free_text_search: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Один независимо выбираемый фасет фильтра
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facet {
    Branch,
    Counselor,
    Search,
    StartDate,
    EndDate,
}

/// Активный фасет для отображения "чипа" в панели фильтров
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetTag {
    pub facet: Facet,
    pub label: String,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

impl FilterState {
    pub fn branch(&self) -> Option<&str> {
        non_empty(&self.branch_name)
    }

    pub fn counselor(&self) -> Option<&str> {
        non_empty(&self.counselor_name)
    }

    pub fn search(&self) -> Option<&str> {
        non_empty(&self.free_text_search)
    }

    /// Приводит пустые строки к `None`, обрезает пробелы
    pub fn normalized(&self) -> Self {
        Self {
            branch_name: self.branch().map(str::to_string),
            counselor_name: self.counselor().map(str::to_string),
            free_text_search: self.search().map(str::to_string),
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }

    /// Копия без указанного фасета
    pub fn without(&self, facet: Facet) -> Self {
        let mut next = self.clone();
        match facet {
            Facet::Branch => next.branch_name = None,
            Facet::Counselor => next.counselor_name = None,
            Facet::Search => next.free_text_search = None,
            Facet::StartDate => next.start_date = None,
            Facet::EndDate => next.end_date = None,
        }
        next
    }

    /// Отличается ли филиал (с учетом нормализации пустых значений)
    pub fn branch_differs(&self, other: &FilterState) -> bool {
        self.branch() != other.branch()
    }

    /// Количество установленных фасетов (для бейджа панели фильтров)
    pub fn active_facets(&self) -> usize {
        self.tags().len()
    }

    pub fn is_empty(&self) -> bool {
        self.active_facets() == 0
    }

    pub fn tags(&self) -> Vec<FacetTag> {
        let mut tags = Vec::new();
        if let Some(branch) = self.branch() {
            tags.push(FacetTag {
                facet: Facet::Branch,
                label: format!("Branch: {branch}"),
            });
        }
        if let Some(counselor) = self.counselor() {
            tags.push(FacetTag {
                facet: Facet::Counselor,
                label: format!("Counselor: {counselor}"),
            });
        }
        if let Some(search) = self.search() {
            tags.push(FacetTag {
                facet: Facet::Search,
                label: format!("Search: {search}"),
            });
        }
        if let Some(date) = self.start_date {
            tags.push(FacetTag {
                facet: Facet::StartDate,
                label: format!("From: {}", date.format("%Y-%m-%d")),
            });
        }
        if let Some(date) = self.end_date {
            tags.push(FacetTag {
                facet: Facet::EndDate,
                label: format!("To: {}", date.format("%Y-%m-%d")),
            });
        }
        tags
    }
}
