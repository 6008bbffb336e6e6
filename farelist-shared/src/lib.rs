pub mod models;

pub use models::offer::{
    Amount, FareDetail, FlightEndpoint, FlightOffer, Itinerary, Price, Segment, TravelerPricing,
};
