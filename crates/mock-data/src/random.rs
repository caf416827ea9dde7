//! Random selection helpers shared by the generators.
//!
//! All helpers take the RNG from the caller, so a seeded
//! [`StdRng`](rand::rngs::StdRng) reproduces the same picks.

use rand::Rng;
use rand::distributions::uniform::SampleUniform;
use rand::seq::index;

/// Picks one element uniformly.
///
/// # Panics
///
/// Panics if `items` is empty.
pub fn random_item<'a, T>(items: &'a [T], rng: &mut impl Rng) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}

/// Picks a random non-empty subset, keeping the source order.
///
/// The subset length is uniform in `[1, n]`; the members are then drawn
/// uniformly without replacement.
///
/// # Panics
///
/// Panics if `items` is empty.
pub fn random_items<'a, T>(items: &'a [T], rng: &mut impl Rng) -> Vec<&'a T> {
    let count = rng.gen_range(1..=items.len());
    let mut picked = index::sample(rng, items.len(), count).into_vec();
    picked.sort_unstable();
    picked.into_iter().map(|i| &items[i]).collect()
}

/// Uniform value in `[min, max]`, both bounds inclusive.
pub fn random_value<T>(min: T, max: T, rng: &mut impl Rng) -> T
where
    T: SampleUniform + PartialOrd,
{
    rng.gen_range(min..=max)
}
