pub mod category_service;
pub mod summary_service;

pub use category_service::CategoryService;
pub use summary_service::{
    AmountBuckets, CategoryRow, CategoryTable, PeriodAmount, SummaryService, TOTAL_LABEL,
};

use crate::errors::LedgerError;

pub type ServiceResult<T> = Result<T, LedgerError>;
