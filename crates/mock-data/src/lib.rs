//! Mock data for six-cities.
//!
//! This crate turns a pool of candidate strings into tab-separated offer
//! records, parses such records back, and seeds them into the offers
//! database.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use mock_data::prelude::*;
//! use rand::SeedableRng;
//!
//! let pool = MockServerData::load("mocks/mock-data.json").await?;
//! let generator = TsvOfferGenerator::new(&pool);
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//! let line = generator.generate(&mut rng);
//! let offer = parse_offer_line(&line)?;
//! ```

pub mod db;
pub mod generators;
pub mod pool;
pub mod random;
pub mod tsv;

use rand::Rng;

use crate::generators::OfferGenerator;
use crate::tsv::TsvFileWriter;

/// Writes `count` generated lines through `writer` and returns how many were written.
pub fn write_offers(
    generator: &impl OfferGenerator,
    count: usize,
    mut writer: TsvFileWriter,
    rng: &mut impl Rng,
) -> std::io::Result<usize> {
    for _ in 0..count {
        writer.write(&generator.generate(rng))?;
    }
    writer.finish()
}

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::db::{SeedSummary, Seeder};
    pub use crate::generators::{OfferGenerator, TsvOfferGenerator};
    pub use crate::pool::MockServerData;
    pub use crate::tsv::{ParsedOffer, TsvFileReader, TsvFileWriter, parse_offer_line};
    pub use crate::write_offers;
}
