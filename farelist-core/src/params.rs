use serde::Deserialize;

use crate::filters::{FareClass, OfferFilter};
use crate::pagination::PageRequest;
use crate::sort::SortOrder;
use crate::{FilterError, FilterResult};

/// Query parameters exactly as received. Nothing here is trusted yet.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFilterParams {
    pub airline: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
    #[serde(alias = "class")]
    pub travel_class: Option<String>,
    pub stops: Option<String>,
    pub sort_by_price: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Defaults applied when a request leaves pagination out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOptions {
    pub default_page: usize,
    pub default_limit: usize,
    pub max_limit: Option<usize>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_limit: 10,
            max_limit: None,
        }
    }
}

type StageParser = fn(&str) -> FilterResult<OfferFilter>;

impl RawFilterParams {
    /// Validates `page` then `limit`
    pub fn page_request(&self, options: &FilterOptions) -> FilterResult<PageRequest> {
        let page = match self.page.as_deref() {
            Some(raw) => parse_positive("page", raw)?,
            None => options.default_page,
        };
        let limit = match self.limit.as_deref() {
            Some(raw) => parse_positive("limit", raw)?,
            None => options.default_limit,
        };
        if let Some(max) = options.max_limit {
            if limit > max {
                return Err(FilterError::invalid(
                    "limit",
                    format!("must not be greater than {}.", max),
                ));
            }
        }
        Ok(PageRequest::new(page, limit))
    }

    /// Departure and arrival hour filters are mutually exclusive
    pub fn check_conflicts(&self) -> FilterResult<()> {
        if present(&self.departure_time).is_some() && present(&self.arrival_time).is_some() {
            return Err(FilterError::ConflictingParameters);
        }
        Ok(())
    }

    /// Active filters in pipeline order. Each one is parsed only when the
    /// iterator reaches it, so a bad value surfaces after earlier stages ran.
    pub fn filters(&self) -> impl Iterator<Item = FilterResult<OfferFilter>> + '_ {
        let stages: [(&Option<String>, StageParser); 7] = [
            (&self.airline, parse_airline),
            (&self.min_price, |raw| parse_price("minPrice", raw).map(OfferFilter::MinPrice)),
            (&self.max_price, |raw| parse_price("maxPrice", raw).map(OfferFilter::MaxPrice)),
            (&self.departure_time, |raw| {
                parse_hour("departureTime", raw).map(OfferFilter::DepartureHour)
            }),
            (&self.arrival_time, |raw| {
                parse_hour("arrivalTime", raw).map(OfferFilter::ArrivalHour)
            }),
            (&self.travel_class, |raw| FareClass::parse(raw).map(OfferFilter::TravelClass)),
            (&self.stops, parse_stops),
        ];

        stages
            .into_iter()
            .filter_map(|(raw, parse)| present(raw).map(parse))
    }

    pub fn sort_order(&self) -> Option<SortOrder> {
        present(&self.sort_by_price).map(SortOrder::from_flag)
    }
}

/// Empty values count as absent
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn parse_positive(param: &'static str, raw: &str) -> FilterResult<usize> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| FilterError::invalid(param, "must be a valid number."))?;
    if value < 1 {
        return Err(FilterError::invalid(param, "must be greater than zero."));
    }
    usize::try_from(value).map_err(|_| FilterError::invalid(param, "is out of range."))
}

fn parse_airline(raw: &str) -> FilterResult<OfferFilter> {
    Ok(OfferFilter::Airline {
        code: raw.trim().to_uppercase(),
        requested: raw.to_string(),
    })
}

fn parse_price(param: &'static str, raw: &str) -> FilterResult<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FilterError::invalid(param, "must be a valid number."))
}

/// Only the part before `:` is read
fn parse_hour(param: &'static str, raw: &str) -> FilterResult<u32> {
    let hour = raw.split(':').next().unwrap_or_default().trim();
    hour.parse::<u32>()
        .ok()
        .filter(|h| *h < 24)
        .ok_or_else(|| FilterError::invalid(param, "must be a valid time in HH:MM format."))
}

fn parse_stops(raw: &str) -> FilterResult<OfferFilter> {
    raw.trim()
        .parse::<usize>()
        .map(OfferFilter::Stops)
        .map_err(|_| FilterError::invalid("stops", "must be a valid number."))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> RawFilterParams {
        let map: serde_json::Map<String, serde_json::Value> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
            .collect();
        serde_json::from_value(serde_json::Value::Object(map))
            .expect("Failed to deserialize params")
    }

    #[test]
    fn test_pagination_defaults() {
        let req = RawFilterParams::default()
            .page_request(&FilterOptions::default())
            .unwrap();
        assert_eq!(req, PageRequest::new(1, 10));
    }

    #[test]
    fn test_page_is_validated_before_limit() {
        let err = params(&[("page", "abc"), ("limit", "xyz")])
            .page_request(&FilterOptions::default())
            .unwrap_err();
        assert_eq!(err.param(), Some("page"));

        let err = params(&[("page", "2"), ("limit", "xyz")])
            .page_request(&FilterOptions::default())
            .unwrap_err();
        assert_eq!(err.param(), Some("limit"));
    }

    #[test]
    fn test_non_positive_pagination_rejected() {
        for (key, value) in [("page", "0"), ("limit", "0"), ("limit", "-3")] {
            let err = params(&[(key, value)])
                .page_request(&FilterOptions::default())
                .unwrap_err();
            assert_eq!(err.param(), Some(key));
        }
    }

    #[test]
    fn test_limit_cap() {
        let options = FilterOptions {
            max_limit: Some(50),
            ..FilterOptions::default()
        };
        assert!(params(&[("limit", "50")]).page_request(&options).is_ok());
        let err = params(&[("limit", "51")]).page_request(&options).unwrap_err();
        assert_eq!(err.param(), Some("limit"));
    }

    #[test]
    fn test_departure_and_arrival_conflict() {
        let p = params(&[("departureTime", "09:30"), ("arrivalTime", "14:00")]);
        assert_eq!(p.check_conflicts(), Err(FilterError::ConflictingParameters));

        let p = params(&[("departureTime", "09:30"), ("arrivalTime", "")]);
        assert!(p.check_conflicts().is_ok());
    }

    #[test]
    fn test_class_alias_and_stage_order() {
        let p = params(&[
            ("stops", "1"),
            ("class", "j"),
            ("airline", "ib"),
            ("maxPrice", "300"),
        ]);
        let stages: Vec<OfferFilter> = p.filters().collect::<Result<_, _>>().unwrap();
        assert_eq!(
            stages,
            vec![
                OfferFilter::Airline { code: "IB".into(), requested: "ib".into() },
                OfferFilter::MaxPrice(300.0),
                OfferFilter::TravelClass(FareClass::J),
                OfferFilter::Stops(1),
            ]
        );
    }

    #[test]
    fn test_invalid_values_are_reported_per_stage() {
        let cases = [
            ("minPrice", "cheap"),
            ("maxPrice", "inf"),
            ("departureTime", "nine:00"),
            ("arrivalTime", "24:00"),
            ("stops", "-1"),
        ];
        for (key, value) in cases {
            let p = params(&[(key, value)]);
            let err = p.filters().next().unwrap().unwrap_err();
            assert_eq!(err.param(), Some(key), "{}={}", key, value);
        }
    }

    #[test]
    fn test_hour_ignores_minutes() {
        let p = params(&[("arrivalTime", "07:59")]);
        assert_eq!(p.filters().next().unwrap(), Ok(OfferFilter::ArrivalHour(7)));
        let p = params(&[("departureTime", "18")]);
        assert_eq!(p.filters().next().unwrap(), Ok(OfferFilter::DepartureHour(18)));
    }

    #[test]
    fn test_sort_flag() {
        assert_eq!(params(&[("sortByPrice", "TRUE")]).sort_order(), Some(SortOrder::Ascending));
        assert_eq!(params(&[("sortByPrice", "no")]).sort_order(), Some(SortOrder::Descending));
        assert_eq!(params(&[]).sort_order(), None);
    }
}
