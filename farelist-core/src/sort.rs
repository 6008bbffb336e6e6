use std::cmp::Ordering;

use farelist_shared::FlightOffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// `"true"` (any case) sorts cheapest first, any other value most expensive first
    pub fn from_flag(flag: &str) -> Self {
        if flag.trim().eq_ignore_ascii_case("true") {
            SortOrder::Ascending
        } else {
            SortOrder::Descending
        }
    }
}

/// Stable sort on `price.total`. Offers without a readable price go last in
/// either direction.
pub fn sort_by_price(working: &mut [&FlightOffer], order: SortOrder) {
    working.sort_by(|a, b| match (a.total_price(), b.total_price()) {
        (Some(x), Some(y)) => match order {
            SortOrder::Ascending => x.total_cmp(&y),
            SortOrder::Descending => y.total_cmp(&x),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
