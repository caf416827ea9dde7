//! TSV offer generation.
//!
//! Each generated line describes one offer together with its host and is
//! the input format of the bulk import (see [`crate::tsv`]).

use rand::Rng;

use offers::models::{Amenity, CityName, OfferType, UserType};

use crate::pool::MockServerData;
use crate::random::{random_item, random_items, random_value};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

pub const MIN_ROOMS: i32 = 1;
pub const MAX_ROOMS: i32 = 8;

pub const MIN_GUESTS: i32 = 1;
pub const MAX_GUESTS: i32 = 10;

pub const MIN_RENT: i32 = 100;
pub const MAX_RENT: i32 = 100_000;

/// Separator between the fields of a line.
pub const FIELD_SEPARATOR: &str = "\t";
/// Separator inside multi-valued fields (photos, amenities, coordinates).
pub const LIST_SEPARATOR: &str = ";";
/// Number of fields in every line.
pub const FIELD_COUNT: usize = 19;

const BOOLEANS: [&str; 2] = ["true", "false"];

/// Produces one serialized offer per call.
pub trait OfferGenerator {
    fn generate(&self, rng: &mut impl Rng) -> String;

    /// Generates `count` lines.
    fn generate_batch(&self, count: usize, rng: &mut impl Rng) -> Vec<String> {
        (0..count).map(|_| self.generate(rng)).collect()
    }
}

/// Generates tab-separated offer lines from a [`MockServerData`] pool.
///
/// Field order: title, description, city, image preview, photos, premium,
/// favorite, rating, type, rooms, guests, rent, amenities, host name, host
/// email, host avatar, host password, host type, coordinates.
///
/// Every pool collection must be non-empty and free of tabs, line breaks
/// and `;` (see [`MockServerData::validate`]).
pub struct TsvOfferGenerator<'a> {
    mock_data: &'a MockServerData,
}

impl<'a> TsvOfferGenerator<'a> {
    pub fn new(mock_data: &'a MockServerData) -> Self {
        Self { mock_data }
    }
}

fn join<T: AsRef<str>>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.as_ref())
        .collect::<Vec<&str>>()
        .join(LIST_SEPARATOR)
}

impl OfferGenerator for TsvOfferGenerator<'_> {
    fn generate(&self, rng: &mut impl Rng) -> String {
        let data = self.mock_data;

        let title = random_item(&data.titles, rng);
        let description = random_item(&data.descriptions, rng);
        // City name and coordinates always come from the same catalog entry.
        let city = *random_item(&CityName::ALL, rng);
        let coordinates = city.coordinates();
        let image_preview = random_item(&data.image_previews, rng);
        let photos = join(&random_items(&data.photos, rng));
        let is_premium = random_item(&BOOLEANS, rng);
        let is_favorite = random_item(&BOOLEANS, rng);
        let rating = random_value(MIN_RATING, MAX_RATING, rng);
        let offer_type = random_item(&OfferType::ALL, rng);
        let room_count = random_value(MIN_ROOMS, MAX_ROOMS, rng);
        let guest_count = random_value(MIN_GUESTS, MAX_GUESTS, rng);
        let rent_price = random_value(MIN_RENT, MAX_RENT, rng);
        let amenities: Vec<&str> = random_items(&Amenity::ALL, rng)
            .into_iter()
            .map(Amenity::as_str)
            .collect();
        let name = random_item(&data.names, rng);
        let email = random_item(&data.emails, rng);
        let avatar_url = random_item(&data.avatars, rng);
        let password = random_item(&data.passwords, rng);
        let user_type = random_item(&UserType::ALL, rng);

        let fields: [String; FIELD_COUNT] = [
            title.clone(),
            description.clone(),
            city.to_string(),
            image_preview.clone(),
            photos,
            is_premium.to_string(),
            is_favorite.to_string(),
            rating.to_string(),
            offer_type.to_string(),
            room_count.to_string(),
            guest_count.to_string(),
            rent_price.to_string(),
            join(&amenities),
            name.clone(),
            email.clone(),
            avatar_url.clone(),
            password.clone(),
            user_type.to_string(),
            format!(
                "{}{LIST_SEPARATOR}{}",
                coordinates.latitude, coordinates.longitude
            ),
        ];

        fields.join(FIELD_SEPARATOR)
    }
}
