use serde::{Deserialize, Serialize};
use std::fmt;

/// Идентификатор сущности бэкенда. Приходит то числом, то строкой.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "IdRepr", into = "String")]
pub struct EntityId(String);

pub type TelecallerId = EntityId;

impl EntityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl From<EntityId> for String {
    fn from(value: EntityId) -> Self {
        value.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Int(i64),
    Text(String),
}

impl From<IdRepr> for EntityId {
    fn from(value: IdRepr) -> Self {
        match value {
            IdRepr::Int(v) => EntityId::from(v),
            IdRepr::Text(v) => EntityId(v.trim().to_string()),
        }
    }
}

/// Счетчик в "сыром" ответе: число, дробное число или строка с числом
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawCount {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawCount {
    /// Неотрицательное значение; нечисловые строки считаются нулем
    pub fn value(&self) -> u64 {
        let v = match self {
            RawCount::Int(v) => *v,
            RawCount::Float(v) => *v as i64,
            RawCount::Text(v) => v.trim().parse::<i64>().unwrap_or(0),
        };
        v.max(0) as u64
    }
}

/// Агрегированные метрики одного телекаллера за окно фильтра
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub telecaller_id: TelecallerId,
    pub telecaller_name: String,
    pub branch_name: String,
    pub total_calls: u64,
    pub contacted: u64,
    pub not_contacted: u64,
    pub answered: u64,
    pub not_answered: u64,
    pub won: u64,
    pub not_interested: u64,
    pub walk_in_list: u64,
    pub total_follow_ups: u64,
}

/// Строка сводки в том виде, в каком ее присылают разные версии бэкенда
///
/// Старые версии называют `won` как `qualified` или `positive`,
/// а `not_interested` как `negative`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSummaryRow {
    #[serde(default, alias = "telecallerId")]
    pub telecaller_id: Option<TelecallerId>,
    #[serde(default, alias = "telecallerName")]
    pub telecaller_name: Option<String>,
    #[serde(default, alias = "branchName")]
    pub branch_name: Option<String>,
    #[serde(default, alias = "totalCalls")]
    pub total_calls: Option<RawCount>,
    #[serde(default)]
    pub contacted: Option<RawCount>,
    #[serde(default, alias = "notContacted")]
    pub not_contacted: Option<RawCount>,
    #[serde(default)]
    pub answered: Option<RawCount>,
    #[serde(default, alias = "notAnswered")]
    pub not_answered: Option<RawCount>,
    #[serde(default)]
    pub won: Option<RawCount>,
    #[serde(default)]
    pub qualified: Option<RawCount>,
    #[serde(default)]
    pub positive: Option<RawCount>,
    #[serde(default, alias = "notInterested")]
    pub not_interested: Option<RawCount>,
    #[serde(default)]
    pub negative: Option<RawCount>,
    #[serde(default, alias = "walkInList")]
    pub walk_in_list: Option<RawCount>,
    #[serde(default, alias = "totalFollowUps", alias = "followups")]
    pub total_follow_ups: Option<RawCount>,
}

fn count(value: &Option<RawCount>) -> Option<u64> {
    value.as_ref().map(RawCount::value)
}

impl From<RawSummaryRow> for SummaryRow {
    fn from(raw: RawSummaryRow) -> Self {
        let won = count(&raw.won)
            .or_else(|| count(&raw.qualified))
            .or_else(|| count(&raw.positive))
            .unwrap_or(0);
        let not_interested = count(&raw.not_interested)
            .or_else(|| count(&raw.negative))
            .unwrap_or(0);

        Self {
            telecaller_id: raw.telecaller_id.unwrap_or_default(),
            telecaller_name: raw.telecaller_name.unwrap_or_default(),
            branch_name: raw.branch_name.unwrap_or_default(),
            total_calls: count(&raw.total_calls).unwrap_or(0),
            contacted: count(&raw.contacted).unwrap_or(0),
            not_contacted: count(&raw.not_contacted).unwrap_or(0),
            answered: count(&raw.answered).unwrap_or(0),
            not_answered: count(&raw.not_answered).unwrap_or(0),
            won,
            not_interested,
            walk_in_list: count(&raw.walk_in_list).unwrap_or(0),
            total_follow_ups: count(&raw.total_follow_ups).unwrap_or(0),
        }
    }
}
