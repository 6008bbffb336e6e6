use farelist_shared::FlightOffer;
use serde::Serialize;
use tracing::debug;

use crate::pagination::Pagination;
use crate::params::{FilterOptions, RawFilterParams};
use crate::sort::sort_by_price;
use crate::{FilterError, FilterResult};

/// One page of the filtered result set. Offers are borrowed from the store snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredResult<'a> {
    pub data: Vec<&'a FlightOffer>,
    pub pagination: Pagination,
}

/// Filters, sorts and paginates `offers` with the default pagination options.
pub fn filter_flights<'a>(
    offers: &'a [FlightOffer],
    params: &RawFilterParams,
) -> FilterResult<FilteredResult<'a>> {
    filter_flights_with(offers, params, &FilterOptions::default())
}

/// Runs the full pipeline:
///
/// 1. empty store gate
/// 2. `page`, `limit`, departure/arrival conflict
/// 3. filter stages in order, each validated as it is reached
/// 4. optional price sort
/// 5. pagination
pub fn filter_flights_with<'a>(
    offers: &'a [FlightOffer],
    params: &RawFilterParams,
    options: &FilterOptions,
) -> FilterResult<FilteredResult<'a>> {
    if offers.is_empty() {
        return Err(FilterError::NoPriorSearch);
    }

    let page = params.page_request(options)?;
    params.check_conflicts()?;

    let mut working: Vec<&FlightOffer> = offers.iter().collect();
    for stage in params.filters() {
        let stage = stage?;
        working = stage.apply(working)?;
        debug!(?stage, remaining = working.len(), "Filter stage applied");
    }

    if let Some(order) = params.sort_order() {
        sort_by_price(&mut working, order);
    }

    let pagination = page.metadata(working.len());
    let data = page.slice(&working).to_vec();

    debug!(
        total = offers.len(),
        matched = pagination.total_flights,
        page = pagination.current_page,
        returned = data.len(),
        "Flight list filtered"
    );

    Ok(FilteredResult { data, pagination })
}
