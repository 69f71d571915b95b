use serde::{Deserialize, Serialize};
use std::fmt;

use super::summary::{SummaryRow, TelecallerId};

/// Тип детального отчета, как его понимает бэкенд (`report=<metric>`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricType {
    #[serde(rename = "totalcalls")]
    TotalCalls,
    #[serde(rename = "contacted")]
    Contacted,
    #[serde(rename = "not_contacted")]
    NotContacted,
    #[serde(rename = "answered")]
    Answered,
    #[serde(rename = "not_answered")]
    NotAnswered,
    #[serde(rename = "won")]
    Won,
    #[serde(rename = "followup")]
    FollowUp,
    #[serde(rename = "walk_in_list")]
    WalkInList,
}

impl MetricType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::TotalCalls => "totalcalls",
            MetricType::Contacted => "contacted",
            MetricType::NotContacted => "not_contacted",
            MetricType::Answered => "answered",
            MetricType::NotAnswered => "not_answered",
            MetricType::Won => "won",
            MetricType::FollowUp => "followup",
            MetricType::WalkInList => "walk_in_list",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Колонка метрики в сводной таблице
///
/// Колонок больше, чем типов отчета: `NotInterested` отображается отдельно,
/// но детализируется через `contacted` с подфильтром по статусу.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricColumn {
    TotalCalls,
    Contacted,
    NotContacted,
    Answered,
    NotAnswered,
    Won,
    NotInterested,
    WalkInList,
    FollowUps,
}

impl MetricColumn {
    /// Порядок колонок на экране и в экспорте
    pub const ALL: [MetricColumn; 9] = [
        MetricColumn::TotalCalls,
        MetricColumn::Contacted,
        MetricColumn::NotContacted,
        MetricColumn::Answered,
        MetricColumn::NotAnswered,
        MetricColumn::Won,
        MetricColumn::NotInterested,
        MetricColumn::WalkInList,
        MetricColumn::FollowUps,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            MetricColumn::TotalCalls => "totalcalls",
            MetricColumn::Contacted => "contacted",
            MetricColumn::NotContacted => "not_contacted",
            MetricColumn::Answered => "answered",
            MetricColumn::NotAnswered => "not_answered",
            MetricColumn::Won => "won",
            MetricColumn::NotInterested => "not_interested",
            MetricColumn::WalkInList => "walk_in_list",
            MetricColumn::FollowUps => "followup",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            MetricColumn::TotalCalls => "Total Calls",
            MetricColumn::Contacted => "Contacted",
            MetricColumn::NotContacted => "Not Contacted",
            MetricColumn::Answered => "Answered",
            MetricColumn::NotAnswered => "Not Answered",
            MetricColumn::Won => "Won",
            MetricColumn::NotInterested => "Not Interested",
            MetricColumn::WalkInList => "Walk-in List",
            MetricColumn::FollowUps => "Follow-ups",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    /// Значение колонки в строке сводки
    pub fn value(&self, row: &SummaryRow) -> u64 {
        match self {
            MetricColumn::TotalCalls => row.total_calls,
            MetricColumn::Contacted => row.contacted,
            MetricColumn::NotContacted => row.not_contacted,
            MetricColumn::Answered => row.answered,
            MetricColumn::NotAnswered => row.not_answered,
            MetricColumn::Won => row.won,
            MetricColumn::NotInterested => row.not_interested,
            MetricColumn::WalkInList => row.walk_in_list,
            MetricColumn::FollowUps => row.total_follow_ups,
        }
    }

    /// Запрос детализации для колонки: тип отчета и подфильтр
    ///
    /// Детализируется каждая колонка метрики, поэтому кликабельны все ячейки.
    pub fn drill_down(&self) -> (MetricType, Option<&'static str>) {
        match self {
            MetricColumn::TotalCalls => (MetricType::TotalCalls, None),
            MetricColumn::Contacted => (MetricType::Contacted, None),
            MetricColumn::NotContacted => (MetricType::NotContacted, None),
            MetricColumn::Answered => (MetricType::Answered, None),
            MetricColumn::NotAnswered => (MetricType::NotAnswered, None),
            MetricColumn::Won => (MetricType::Won, None),
            MetricColumn::NotInterested => {
                (MetricType::Contacted, Some("status=not_interested"))
            }
            MetricColumn::WalkInList => (MetricType::WalkInList, None),
            MetricColumn::FollowUps => (MetricType::FollowUp, None),
        }
    }
}

/// Ключ детального набора данных: равные ключи означают один и тот же запрос
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DrillDownKey {
    pub telecaller_id: TelecallerId,
    pub metric_type: MetricType,
    pub sub_filter: Option<String>,
}

impl DrillDownKey {
    /// Ключ для ячейки сводки
    pub fn for_cell(row: &SummaryRow, column: MetricColumn) -> Self {
        let (metric_type, sub_filter) = column.drill_down();
        Self {
            telecaller_id: row.telecaller_id.clone(),
            metric_type,
            sub_filter: sub_filter.map(str::to_string),
        }
    }

    /// Подфильтр в виде пар `ключ=значение` (формат `a=b&c=d`)
    pub fn sub_filter_params(&self) -> Vec<(String, String)> {
        let Some(raw) = self.sub_filter.as_deref() else {
            return Vec::new();
        };
        raw.split('&')
            .filter_map(|pair| {
                let (key, value) = pair.split_once('=')?;
                let key = key.trim();
                if key.is_empty() {
                    return None;
                }
                Some((key.to_string(), value.trim().to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> SummaryRow {
        SummaryRow {
            telecaller_id: TelecallerId::from("12"),
            telecaller_name: "Anu".into(),
            branch_name: "Kochi".into(),
            contacted: 4,
            not_interested: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_not_interested_maps_to_contacted_with_status() {
        let key = DrillDownKey::for_cell(&row(), MetricColumn::NotInterested);
        assert_eq!(key.metric_type, MetricType::Contacted);
        assert_eq!(key.sub_filter.as_deref(), Some("status=not_interested"));
        assert_eq!(
            key.sub_filter_params(),
            vec![("status".to_string(), "not_interested".to_string())]
        );
    }

    #[test]
    fn test_column_keys_round_trip() {
        for column in MetricColumn::ALL {
            assert_eq!(MetricColumn::from_key(column.key()), Some(column));
        }
    }

    #[test]
    fn test_equal_keys_for_same_cell() {
        let a = DrillDownKey::for_cell(&row(), MetricColumn::Contacted);
        let b = DrillDownKey::for_cell(&row(), MetricColumn::Contacted);
        assert_eq!(a, b);
        assert_eq!(a.sub_filter_params(), Vec::new());
        assert_eq!(MetricColumn::Contacted.value(&row()), 4);
    }

    #[test]
    fn test_metric_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&MetricType::FollowUp).unwrap(),
            "\"followup\""
        );
        assert_eq!(MetricType::WalkInList.to_string(), "walk_in_list");
    }
}
