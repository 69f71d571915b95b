use serde::{Deserialize, Serialize};

use super::summary::EntityId;

/// Элемент выпадающего списка с поиском
///
/// `select_value` сохраняется в фильтре, `display_label` только для отображения.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceOption {
    pub id: String,
    pub display_label: String,
    pub select_value: String,
}

/// Филиал из `GET branches`
#[derive(Debug, Clone, Deserialize)]
pub struct RawBranch {
    #[serde(default)]
    pub id: Option<EntityId>,
    #[serde(default, alias = "branchName", alias = "name")]
    pub branch_name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

impl RawBranch {
    /// `None` для записей без названия: их нельзя выбрать в фильтре
    pub fn into_option(self) -> Option<ReferenceOption> {
        let name = self.branch_name?.trim().to_string();
        if name.is_empty() {
            return None;
        }
        let display_label = match self.city.as_deref().map(str::trim) {
            Some(city) if !city.is_empty() && city != name => format!("{name} ({city})"),
            _ => name.clone(),
        };
        Some(ReferenceOption {
            id: self.id.map(String::from).unwrap_or_else(|| name.clone()),
            display_label,
            select_value: name,
        })
    }
}

/// Телекаллер из `GET telecallers`
#[derive(Debug, Clone, Deserialize)]
pub struct RawTelecaller {
    #[serde(default)]
    pub id: Option<EntityId>,
    #[serde(default, alias = "telecallerName", alias = "name")]
    pub telecaller_name: Option<String>,
    #[serde(default, alias = "branchName")]
    pub branch_name: Option<String>,
}

impl RawTelecaller {
    pub fn into_option(self) -> Option<ReferenceOption> {
        let name = self.telecaller_name?.trim().to_string();
        if name.is_empty() {
            return None;
        }
        let display_label = match self.branch_name.as_deref().map(str::trim) {
            Some(branch) if !branch.is_empty() => format!("{name} · {branch}"),
            _ => name.clone(),
        };
        Some(ReferenceOption {
            id: self.id.map(String::from).unwrap_or_else(|| name.clone()),
            display_label,
            select_value: name,
        })
    }
}
