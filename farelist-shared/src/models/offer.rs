use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Flight Offer Models (upstream flight-offers search shape)
// ============================================================================

/// A priced flight option as returned by the upstream search API.
///
/// Only the fields the filter engine reads are typed. Everything else is kept
/// in `extra` so an offer serializes back to the object the API produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlightOffer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validating_airline_codes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub itineraries: Option<Vec<Itinerary>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traveler_pricings: Option<Vec<TravelerPricing>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FlightOffer {
    /// Parsed `price.total`, if present and numeric
    pub fn total_price(&self) -> Option<f64> {
        self.price.as_ref()?.total.as_ref()?.as_f64()
    }

    pub fn first_itinerary(&self) -> Option<&Itinerary> {
        self.itineraries.as_deref()?.first()
    }

    /// Segments minus one on the first itinerary
    pub fn stop_count(&self) -> Option<usize> {
        self.first_itinerary()
            .and_then(|it| it.segments().len().checked_sub(1))
    }

    /// Departure instant of the first segment of the first itinerary
    pub fn departure_at(&self) -> Option<DateTime<Utc>> {
        self.first_itinerary()?
            .segments()
            .first()?
            .departure
            .as_ref()?
            .instant()
    }

    /// Arrival instant of the last segment of the first itinerary
    pub fn arrival_at(&self) -> Option<DateTime<Utc>> {
        self.first_itinerary()?
            .segments()
            .last()?
            .arrival
            .as_ref()?
            .instant()
    }

    /// Exact match against the validating carrier codes (callers normalize case)
    pub fn is_validated_by(&self, airline_code: &str) -> bool {
        self.validating_airline_codes
            .iter()
            .flatten()
            .any(|code| code == airline_code)
    }

    /// True when any traveler has any segment booked in `class`
    pub fn has_fare_class(&self, class: &str) -> bool {
        self.traveler_pricings.iter().flatten().any(|pricing| {
            pricing
                .fare_details_by_segment
                .iter()
                .flatten()
                .any(|detail| detail.class.as_deref() == Some(class))
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Price {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Amount>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Monetary amount. The upstream API sends decimal strings, some fixtures send numbers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Amount {
    Text(String),
    Number(serde_json::Number),
}

impl Amount {
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Amount::Text(s) => s.trim().parse::<f64>().ok()?,
            Amount::Number(n) => n.as_f64()?,
        };
        value.is_finite().then_some(value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Itinerary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<Segment>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Itinerary {
    pub fn segments(&self) -> &[Segment] {
        self.segments.as_deref().unwrap_or_default()
    }
}

/// One non-stop leg
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure: Option<FlightEndpoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival: Option<FlightEndpoint>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlightEndpoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FlightEndpoint {
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.at.as_deref().and_then(parse_timestamp)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TravelerPricing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fare_details_by_segment: Option<Vec<FareDetail>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FareDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Parses an ISO-8601 timestamp. Offset-less values are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
