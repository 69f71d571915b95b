pub mod d410_telecaller_reports;
