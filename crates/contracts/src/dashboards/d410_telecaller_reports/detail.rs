use serde::{Deserialize, Serialize};

/// Одна запись (обращение/звонок) в детализации ячейки
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRecord {
    pub candidate_name: String,
    pub phone: String,
    pub email: String,
    pub status: String,
    pub branch_name: String,
    /// ISO дата/время в том виде, в каком пришло с бэкенда
    pub created_at: String,
}

/// Текстовое поле записи: строка, число (телефон) или логическое значение
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawText {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl From<RawText> for String {
    fn from(value: RawText) -> Self {
        match value {
            RawText::Text(v) => v,
            RawText::Int(v) => v.to_string(),
            RawText::Float(v) => v.to_string(),
            RawText::Bool(v) => v.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDetailRecord {
    #[serde(default, alias = "candidateName")]
    pub candidate_name: Option<RawText>,
    #[serde(default)]
    pub name: Option<RawText>,
    #[serde(default)]
    pub phone: Option<RawText>,
    #[serde(default)]
    pub mobile: Option<RawText>,
    #[serde(default)]
    pub email: Option<RawText>,
    #[serde(default)]
    pub status: Option<RawText>,
    #[serde(default, alias = "branchName")]
    pub branch_name: Option<RawText>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<RawText>,
}

fn text(value: Option<RawText>) -> String {
    value.map(String::from).unwrap_or_default()
}

impl From<RawDetailRecord> for DetailRecord {
    fn from(raw: RawDetailRecord) -> Self {
        Self {
            candidate_name: text(raw.candidate_name.or(raw.name)),
            phone: text(raw.phone.or(raw.mobile)),
            email: text(raw.email),
            status: text(raw.status),
            branch_name: text(raw.branch_name),
            created_at: text(raw.created_at),
        }
    }
}
