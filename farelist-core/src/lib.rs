pub mod engine;
pub mod filters;
pub mod pagination;
pub mod params;
pub mod sort;

pub use engine::{filter_flights, filter_flights_with, FilteredResult};
pub use filters::{FareClass, OfferFilter};
pub use pagination::{PageRequest, Pagination};
pub use params::{FilterOptions, RawFilterParams};
pub use sort::SortOrder;

/// Reasons a filter request is rejected. All are terminal for the request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("No flights available to filter. Run a search first.")]
    NoPriorSearch,
    #[error("Parameter \"{param}\" {reason}")]
    InvalidParameter { param: &'static str, reason: String },
    #[error("Cannot filter by \"departureTime\" and \"arrivalTime\" at the same time.")]
    ConflictingParameters,
    #[error("{message}")]
    NoMatch { param: &'static str, message: String },
}

impl FilterError {
    pub(crate) fn invalid(param: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param,
            reason: reason.into(),
        }
    }

    /// HTTP status the error maps to
    pub fn status_code(&self) -> u16 {
        match self {
            FilterError::NoPriorSearch => 404,
            FilterError::InvalidParameter { .. }
            | FilterError::ConflictingParameters
            | FilterError::NoMatch { .. } => 400,
        }
    }

    /// Query parameter the error is about, when there is one
    pub fn param(&self) -> Option<&'static str> {
        match self {
            FilterError::InvalidParameter { param, .. } | FilterError::NoMatch { param, .. } => {
                Some(*param)
            }
            FilterError::NoPriorSearch | FilterError::ConflictingParameters => None,
        }
    }
}

pub type FilterResult<T> = Result<T, FilterError>;
