//! Отчет по телекаллерам (call center)
//!
//! Сводка метрик по телекаллерам с фильтрами, детализация по клику на ячейку
//! и выгрузка текущего экрана в CSV.

pub mod aggregate_pager;
pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod filter_coordinator;
pub mod navigator;
pub mod state;
pub mod ui;

pub use error::ReportError;
pub use ui::TelecallerReportsDashboard;
