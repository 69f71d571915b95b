pub mod d410_telecaller_reports;

pub use d410_telecaller_reports::TelecallerReportsDashboard;
