//! Decides which orders a `Filter` lets through and in which order.

use std::cmp::Ordering;

use rust_decimal::Decimal;

use super::{
    default_selection, Filter, ItemSelector, OrderingDirection, OrderingPreference,
    VisibilityFilter,
};
use crate::errors::LedgerError;
use crate::ledger::{amount::add_amounts, Dimension, Order};

/// Returns `true` if the *order* satisfies every filtering option.
pub fn matches(order: &Order, filter: &Filter) -> bool {
    base_match(order, filter)
        && dimension_match(order, filter, Dimension::Resource)
        && dimension_match(order, filter, Dimension::Tag)
}

/// Same as [`matches`] with `dimension` pinned to a single label instead of
/// the filter's own selection for it.
pub(crate) fn matches_pinned(
    order: &Order,
    filter: &Filter,
    dimension: Dimension,
    label: &str,
) -> bool {
    let pinned = match dimension {
        Dimension::Resource => order.resource() == Some(label),
        Dimension::Tag => order.has_tag(label),
    };
    let other = match dimension {
        Dimension::Resource => Dimension::Tag,
        Dimension::Tag => Dimension::Resource,
    };
    pinned && base_match(order, filter) && dimension_match(order, filter, other)
}

/// Copies the matching orders, sorted per the filter's ordering.
///
/// The sort is stable, so ties keep creation order in both directions.
pub fn filtered_and_sorted(orders: &[Order], filter: &Filter) -> Vec<Order> {
    let mut selected: Vec<Order> = orders
        .iter()
        .filter(|order| matches(order, filter))
        .cloned()
        .collect();
    selected.sort_by(|a, b| {
        let ordering = compare(a, b, filter.ordering);
        match filter.direction {
            OrderingDirection::Ascending => ordering,
            OrderingDirection::Descending => ordering.reverse(),
        }
    });
    selected
}

/// Sums each displayed order amount, failing instead of overflowing.
pub fn sum_filtered(orders: &[Order], filter: &Filter) -> Result<Decimal, LedgerError> {
    orders
        .iter()
        .filter(|order| matches(order, filter))
        .try_fold(Decimal::ZERO, |total, order| {
            add_amounts(total, order.amount())
        })
}

fn base_match(order: &Order, filter: &Filter) -> bool {
    let visibility_match = match filter.visibility {
        VisibilityFilter::VisibilityIgnored => true,
        VisibilityFilter::VisibleOnly => order.is_visible(),
        VisibilityFilter::HiddenOnly => !order.is_visible(),
    };
    let state_match = filter.state_selector(order.state()) == ItemSelector::Selected;
    let date_match = filter.date_range().contains(order.date());

    visibility_match && state_match && date_match
}

fn dimension_match(order: &Order, filter: &Filter, dimension: Dimension) -> bool {
    if !filter.is_restricted(dimension) {
        return true;
    }
    let selection = filter.category_selection(dimension);
    let default = default_selection(dimension);
    match dimension {
        Dimension::Resource => order
            .resource()
            .is_some_and(|label| selection.selector_or(label, default) == ItemSelector::Selected),
        // Any selected tag is enough; untagged orders never match.
        Dimension::Tag => order
            .tags()
            .iter()
            .any(|label| selection.selector_or(label, default) == ItemSelector::Selected),
    }
}

fn compare(a: &Order, b: &Order, ordering: OrderingPreference) -> Ordering {
    match ordering {
        OrderingPreference::ByCreation => Ordering::Equal,
        OrderingPreference::ByDate => a.date().cmp(&b.date()),
        OrderingPreference::ByAmount => a.amount().cmp(&b.amount()),
        OrderingPreference::ByDescription => a
            .description()
            .to_lowercase()
            .cmp(&b.description().to_lowercase()),
        OrderingPreference::ByState => a.state().cmp(&b.state()),
    }
}
