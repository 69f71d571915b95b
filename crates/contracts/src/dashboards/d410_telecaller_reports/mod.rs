//! Контракты отчета по телекаллерам (сводка + детализация ячеек)

pub mod detail;
pub mod envelope;
pub mod filter;
pub mod metric;
pub mod reference;
pub mod summary;

pub use detail::*;
pub use envelope::*;
pub use filter::*;
pub use metric::*;
pub use reference::*;
pub use summary::*;
