use thiserror::Error;

use crate::system::auth::AuthRequired;

/// Ошибки движка отчетов
///
/// Любая ошибка загрузки приводится к одному из этих вариантов на границе
/// компонента, который сделал запрос, и хранится как состояние представления.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// Нет учетных данных или срок их действия истек. Повтора нет.
    #[error("Authentication required. Please sign in again.")]
    AuthRequired,

    /// Запрос не удался; представление сохраняет последние успешные данные
    #[error("Failed to load data: {0}")]
    NetworkFailure(String),

    /// Успешный ответ без строк
    #[error("No data for the selected filters")]
    EmptyResult,

    /// Нечего выгружать, файл не создается
    #[error("Nothing to export")]
    ExportEmpty,
}

impl From<AuthRequired> for ReportError {
    fn from(_: AuthRequired) -> Self {
        ReportError::AuthRequired
    }
}

impl ReportError {
    pub fn network(message: impl Into<String>) -> Self {
        ReportError::NetworkFailure(message.into())
    }
}
