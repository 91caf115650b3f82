//! Category totals split by transaction state, plus date-windowed figures.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::errors::LedgerError;
use crate::filter::{matcher::matches_pinned, DateRange, Filter};
use crate::ledger::{
    amount::{add_amounts, sub_amounts, two_decimals},
    Dimension, Ledger, Order, TransactionState,
};

use super::{CategoryService, ServiceResult};

/// Label of the ledger-wide row appended to resource tables.
pub const TOTAL_LABEL: &str = "TOTAL";

/// Sums of `amount` per state bucket.
///
/// `expected` always equals `current + in_progress + pending`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
pub struct AmountBuckets {
    #[serde(with = "two_decimals")]
    pub expected: Decimal,
    #[serde(with = "two_decimals")]
    pub current: Decimal,
    #[serde(with = "two_decimals")]
    pub in_progress: Decimal,
    #[serde(with = "two_decimals")]
    pub pending: Decimal,
}

impl AmountBuckets {
    /// Adds one order to `expected` and to its state bucket.
    pub fn record(&mut self, order: &Order) -> ServiceResult<()> {
        let amount = order.amount();
        let bucket = match order.state() {
            TransactionState::Done => &mut self.current,
            TransactionState::InProgress => &mut self.in_progress,
            TransactionState::Pending => &mut self.pending,
        };
        let state_total = add_amounts(*bucket, amount)?;
        let expected = add_amounts(self.expected, amount)?;
        *bucket = state_total;
        self.expected = expected;
        Ok(())
    }

    pub fn checked_add(&self, other: &AmountBuckets) -> ServiceResult<AmountBuckets> {
        Ok(AmountBuckets {
            expected: add_amounts(self.expected, other.expected)?,
            current: add_amounts(self.current, other.current)?,
            in_progress: add_amounts(self.in_progress, other.in_progress)?,
            pending: add_amounts(self.pending, other.pending)?,
        })
    }

    pub fn checked_sub(&self, other: &AmountBuckets) -> ServiceResult<AmountBuckets> {
        Ok(AmountBuckets {
            expected: sub_amounts(self.expected, other.expected)?,
            current: sub_amounts(self.current, other.current)?,
            in_progress: sub_amounts(self.in_progress, other.in_progress)?,
            pending: sub_amounts(self.pending, other.pending)?,
        })
    }

    pub fn is_balanced(&self) -> bool {
        add_amounts(self.current, self.in_progress)
            .and_then(|partial| add_amounts(partial, self.pending))
            .is_ok_and(|total| total == self.expected)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryRow {
    pub label: String,
    pub totals: AmountBuckets,
}

/// One row per registered label, in registry order.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryTable {
    pub dimension: Dimension,
    pub rows: Vec<CategoryRow>,
    /// Only present for resources.
    pub total: Option<CategoryRow>,
}

/// Net change of one period in a relative series.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PeriodAmount {
    pub begin: NaiveDate,
    pub end: NaiveDate,
    pub amount: Option<AmountBuckets>,
}

pub struct SummaryService;

impl SummaryService {
    /// Totals for orders the filter includes, with `dimension` pinned to `label`.
    pub fn category_totals(
        ledger: &Ledger,
        filter: &Filter,
        dimension: Dimension,
        label: &str,
    ) -> ServiceResult<AmountBuckets> {
        Self::ensure_known(ledger, dimension, label)?;
        Ok(Self::accumulate(ledger.orders(), filter, dimension, label)?.0)
    }

    pub fn category_table(
        ledger: &Ledger,
        filter: &Filter,
        dimension: Dimension,
    ) -> ServiceResult<CategoryTable> {
        let rows = CategoryService::list(ledger, dimension)
            .iter()
            .map(|label| -> ServiceResult<CategoryRow> {
                Ok(CategoryRow {
                    label: label.clone(),
                    totals: Self::accumulate(ledger.orders(), filter, dimension, label)?.0,
                })
            })
            .collect::<ServiceResult<Vec<CategoryRow>>>()?;
        let total = match dimension {
            Dimension::Resource => Some(CategoryRow {
                label: TOTAL_LABEL.to_string(),
                totals: rows.iter().try_fold(AmountBuckets::default(), |acc, row| {
                    acc.checked_add(&row.totals)
                })?,
            }),
            Dimension::Tag => None,
        };
        Ok(CategoryTable {
            dimension,
            rows,
            total,
        })
    }

    /// Cumulative totals up to and including `as_of`, whatever the filter's own range.
    pub fn absolute_amount_by_date(
        ledger: &Ledger,
        filter: &Filter,
        dimension: Dimension,
        label: &str,
        as_of: NaiveDate,
    ) -> ServiceResult<AmountBuckets> {
        Self::ensure_known(ledger, dimension, label)?;
        let mut bounded = filter.clone();
        bounded.set_date_range(DateRange::Until(as_of));
        let (totals, count) = Self::accumulate(ledger.orders(), &bounded, dimension, label)?;
        if count == 0 {
            return Err(LedgerError::NoData(format!(
                "no {} `{}` order on or before {}",
                dimension, label, as_of
            )));
        }
        Ok(totals)
    }

    /// Net change within `[begin, end]`, diffed against the day before `begin`.
    pub fn relative_amount_by_date(
        ledger: &Ledger,
        filter: &Filter,
        dimension: Dimension,
        label: &str,
        begin: NaiveDate,
        end: NaiveDate,
    ) -> ServiceResult<AmountBuckets> {
        if begin > end {
            return Err(LedgerError::InvalidRange(format!(
                "{} is after {}",
                begin, end
            )));
        }
        let baseline_date = begin
            .pred_opt()
            .ok_or_else(|| LedgerError::NoData(format!("no day before {}", begin)))?;
        let closing = Self::absolute_amount_by_date(ledger, filter, dimension, label, end)?;
        let baseline =
            Self::absolute_amount_by_date(ledger, filter, dimension, label, baseline_date)?;
        closing.checked_sub(&baseline)
    }

    /// Absolute totals at each point; points without data, or whose sums
    /// overflow, are `None`.
    pub fn absolute_series(
        ledger: &Ledger,
        filter: &Filter,
        dimension: Dimension,
        label: &str,
        dates: &[NaiveDate],
    ) -> Vec<(NaiveDate, Option<AmountBuckets>)> {
        dates
            .iter()
            .map(|date| {
                let amount =
                    Self::absolute_amount_by_date(ledger, filter, dimension, label, *date).ok();
                (*date, amount)
            })
            .collect()
    }

    /// Relative totals per period; the first period of a series usually has none.
    pub fn relative_series(
        ledger: &Ledger,
        filter: &Filter,
        dimension: Dimension,
        label: &str,
        periods: &[(NaiveDate, NaiveDate)],
    ) -> Vec<PeriodAmount> {
        periods
            .iter()
            .map(|(begin, end)| PeriodAmount {
                begin: *begin,
                end: *end,
                amount: Self::relative_amount_by_date(
                    ledger, filter, dimension, label, *begin, *end,
                )
                .ok(),
            })
            .collect()
    }

    fn ensure_known(ledger: &Ledger, dimension: Dimension, label: &str) -> ServiceResult<()> {
        CategoryService::ensure_exists(ledger, dimension, label)
            .map_err(|err| LedgerError::NoData(err.to_string()))
    }

    fn accumulate(
        orders: &[Order],
        filter: &Filter,
        dimension: Dimension,
        label: &str,
    ) -> ServiceResult<(AmountBuckets, usize)> {
        orders
            .iter()
            .filter(|order| matches_pinned(order, filter, dimension, label))
            .try_fold(
                (AmountBuckets::default(), 0),
                |(mut totals, count), order| -> ServiceResult<(AmountBuckets, usize)> {
                    totals.record(order)?;
                    Ok((totals, count + 1))
                },
            )
    }
}
