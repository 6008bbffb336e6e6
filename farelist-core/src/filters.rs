use chrono::Timelike;
use farelist_shared::FlightOffer;

use crate::{FilterError, FilterResult};

/// Fare class letters accepted by the `travelClass` filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FareClass {
    A,
    F,
    P,
    R,
    C,
    D,
    I,
    J,
    Z,
}

impl FareClass {
    pub const ALL: [FareClass; 9] = [
        FareClass::A,
        FareClass::F,
        FareClass::P,
        FareClass::R,
        FareClass::C,
        FareClass::D,
        FareClass::I,
        FareClass::J,
        FareClass::Z,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FareClass::A => "A",
            FareClass::F => "F",
            FareClass::P => "P",
            FareClass::R => "R",
            FareClass::C => "C",
            FareClass::D => "D",
            FareClass::I => "I",
            FareClass::J => "J",
            FareClass::Z => "Z",
        }
    }

    /// Case-insensitive
    pub fn parse(raw: &str) -> FilterResult<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|class| class.as_str().eq_ignore_ascii_case(raw))
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(FareClass::as_str).collect();
                FilterError::invalid(
                    "travelClass",
                    format!("must be one of the following classes: {}.", valid.join(", ")),
                )
            })
    }
}

/// One stage of the filter pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum OfferFilter {
    /// `code` is the normalized carrier code, `requested` what the caller typed
    Airline { code: String, requested: String },
    MinPrice(f64),
    MaxPrice(f64),
    DepartureHour(u32),
    ArrivalHour(u32),
    TravelClass(FareClass),
    Stops(usize),
}

impl OfferFilter {
    pub fn matches(&self, offer: &FlightOffer) -> bool {
        match self {
            OfferFilter::Airline { code, .. } => offer.is_validated_by(code),
            OfferFilter::MinPrice(min) => offer.total_price().is_some_and(|total| total >= *min),
            OfferFilter::MaxPrice(max) => offer.total_price().is_some_and(|total| total <= *max),
            OfferFilter::DepartureHour(hour) => {
                offer.departure_at().is_some_and(|at| at.hour() == *hour)
            }
            OfferFilter::ArrivalHour(hour) => {
                offer.arrival_at().is_some_and(|at| at.hour() == *hour)
            }
            OfferFilter::TravelClass(class) => offer.has_fare_class(class.as_str()),
            OfferFilter::Stops(stops) => offer.stop_count() == Some(*stops),
        }
    }

    /// Error raised when nothing in the working set matches. Only the airline
    /// and stops stages gate on this; the rest may empty the set silently.
    pub fn no_match_error(&self) -> Option<FilterError> {
        match self {
            OfferFilter::Airline { requested, .. } => Some(FilterError::NoMatch {
                param: "airline",
                message: format!("Airline \"{}\" is not present in the search results.", requested),
            }),
            OfferFilter::Stops(stops) => Some(FilterError::NoMatch {
                param: "stops",
                message: format!(
                    "There are no flights with {} stops in the search results.",
                    stops
                ),
            }),
            _ => None,
        }
    }

    /// Narrows the working set to the offers this stage keeps
    pub fn apply<'a>(&self, working: Vec<&'a FlightOffer>) -> FilterResult<Vec<&'a FlightOffer>> {
        if let Some(err) = self.no_match_error() {
            if !working.iter().any(|offer| self.matches(offer)) {
                return Err(err);
            }
        }
        Ok(working.into_iter().filter(|offer| self.matches(offer)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn offer(carrier: &str, total: &str, departures: &[&str], class: &str) -> FlightOffer {
        let segments: Vec<_> = departures
            .iter()
            .map(|at| {
                json!({
                    "departure": { "at": at },
                    "arrival": { "at": at }
                })
            })
            .collect();
        serde_json::from_value(json!({
            "validatingAirlineCodes": [carrier],
            "price": { "total": total },
            "itineraries": [{ "segments": segments }],
            "travelerPricings": [{ "fareDetailsBySegment": [{ "class": class }] }]
        }))
        .unwrap()
    }

    #[test]
    fn test_fare_class_parse() {
        assert_eq!(FareClass::parse("j"), Ok(FareClass::J));
        assert_eq!(FareClass::parse("Z"), Ok(FareClass::Z));

        let err = FareClass::parse("x").unwrap_err();
        assert_eq!(err.param(), Some("travelClass"));
        assert!(err.to_string().contains("A, F, P, R, C, D, I, J, Z"));
    }

    #[test]
    fn test_airline_gate_uses_working_set() {
        let a = offer("AA", "100", &["2024-01-01T09:00:00"], "Y");
        let b = offer("BA", "200", &["2024-01-01T09:00:00"], "Y");
        let filter = OfferFilter::Airline { code: "BA".into(), requested: "ba".into() };

        assert_eq!(filter.apply(vec![&a, &b]).unwrap(), vec![&b]);

        // BA exists in the store but an earlier stage already removed it
        let err = filter.apply(vec![&a]).unwrap_err();
        assert_eq!(err.param(), Some("airline"));
        assert!(err.to_string().contains("\"ba\""));
    }

    #[test]
    fn test_stops_gate() {
        let direct = offer("AA", "100", &["2024-01-01T09:00:00"], "Y");
        let one_stop = offer("AA", "100", &["2024-01-01T09:00:00", "2024-01-01T12:00:00"], "Y");

        assert_eq!(OfferFilter::Stops(1).apply(vec![&direct, &one_stop]).unwrap(), vec![&one_stop]);
        let err = OfferFilter::Stops(3).apply(vec![&direct, &one_stop]).unwrap_err();
        assert_eq!(err.param(), Some("stops"));
    }

    #[test]
    fn test_ungated_filters_may_empty_the_set() {
        // Kept asymmetry: price/time/class never raise NoMatch
        let a = offer("AA", "100", &["2024-01-01T09:00:00"], "Y");
        for filter in [
            OfferFilter::MinPrice(1000.0),
            OfferFilter::MaxPrice(10.0),
            OfferFilter::DepartureHour(3),
            OfferFilter::ArrivalHour(3),
            OfferFilter::TravelClass(FareClass::F),
        ] {
            assert_eq!(filter.apply(vec![&a]), Ok(vec![]), "{:?}", filter);
        }
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let a = offer("AA", "100.00", &["2024-01-01T09:00:00"], "Y");
        assert!(OfferFilter::MinPrice(100.0).matches(&a));
        assert!(OfferFilter::MaxPrice(100.0).matches(&a));
        assert!(!OfferFilter::MinPrice(100.01).matches(&a));
    }

    #[test]
    fn test_hour_filters_read_first_and_last_segment() {
        let a = offer("AA", "100", &["2024-01-01T06:10:00", "2024-01-01T13:45:00"], "Y");
        assert!(OfferFilter::DepartureHour(6).matches(&a));
        assert!(!OfferFilter::DepartureHour(13).matches(&a));
        assert!(OfferFilter::ArrivalHour(13).matches(&a));
        assert!(!OfferFilter::ArrivalHour(6).matches(&a));
    }

    #[test]
    fn test_filter_is_idempotent() {
        let offers = [
            offer("AA", "100", &["2024-01-01T09:00:00"], "J"),
            offer("BA", "250", &["2024-01-01T10:00:00"], "Y"),
            offer("IB", "180", &["2024-01-01T09:20:00"], "J"),
        ];
        let working: Vec<&FlightOffer> = offers.iter().collect();
        for filter in [
            OfferFilter::TravelClass(FareClass::J),
            OfferFilter::DepartureHour(9),
            OfferFilter::MinPrice(150.0),
        ] {
            let once = filter.apply(working.clone()).unwrap();
            let twice = filter.apply(once.clone()).unwrap();
            assert_eq!(once, twice);
        }
    }
}
