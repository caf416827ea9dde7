//! Mock record generators.
//!
//! - [`TsvOfferGenerator`]: one tab-separated offer-plus-host line per call

pub mod offer;

pub use offer::{
    FIELD_COUNT, FIELD_SEPARATOR, LIST_SEPARATOR, MAX_GUESTS, MAX_RATING, MAX_RENT, MAX_ROOMS,
    MIN_GUESTS, MIN_RATING, MIN_RENT, MIN_ROOMS, OfferGenerator, TsvOfferGenerator,
};
