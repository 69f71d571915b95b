use serde::{Deserialize, Deserializer, Serialize};

use crate::shared::pagination::{normalize_page, PageRequest, PageResult, RawPagination};

/// Общая обертка ответов `{code, data, pagination}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Vec::new", deserialize_with = "null_as_empty")]
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: Option<RawPagination>,
}

/// `"data": null` читается как пустой список
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl<T> ApiEnvelope<T> {
    /// Код отсутствует или лежит в диапазоне 2xx
    pub fn is_success(&self) -> bool {
        self.code.map_or(true, |code| (200..=299).contains(&code))
    }

    /// Преобразует элементы и нормализует пагинацию к каноническому виду
    pub fn into_page<U>(
        self,
        request: PageRequest,
        convert: impl FnMut(T) -> Option<U>,
    ) -> PageResult<U> {
        let items: Vec<U> = self.data.into_iter().filter_map(convert).collect();
        normalize_page(items, self.pagination.as_ref(), request)
    }
}
