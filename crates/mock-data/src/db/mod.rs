//! Database operations for seeding imported offers.

pub mod seeder;

pub use seeder::{SeedError, SeedSummary, Seeder};
