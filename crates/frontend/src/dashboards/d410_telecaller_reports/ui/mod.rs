pub mod actions;
mod dashboard;
mod detail_table;
mod reference_picker;
mod summary_table;

pub use dashboard::TelecallerReportsDashboard;
