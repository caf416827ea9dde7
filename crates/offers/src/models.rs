use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

/// A string that does not name any variant of a closed enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: {value:?}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

fn parse_variant<T: Copy>(
    all: &[T],
    as_str: fn(&T) -> &'static str,
    kind: &'static str,
    s: &str,
) -> Result<T, ParseEnumError> {
    all.iter()
        .copied()
        .find(|v| as_str(v) == s)
        .ok_or_else(|| ParseEnumError {
            kind,
            value: s.to_string(),
        })
}

/// Geographic position of a city or an offer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Supported cities. Each one carries its fixed catalog coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum CityName {
    Paris,
    Cologne,
    Brussels,
    Amsterdam,
    Hamburg,
    Dusseldorf,
}

impl CityName {
    pub const ALL: [CityName; 6] = [
        CityName::Paris,
        CityName::Cologne,
        CityName::Brussels,
        CityName::Amsterdam,
        CityName::Hamburg,
        CityName::Dusseldorf,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CityName::Paris => "Paris",
            CityName::Cologne => "Cologne",
            CityName::Brussels => "Brussels",
            CityName::Amsterdam => "Amsterdam",
            CityName::Hamburg => "Hamburg",
            CityName::Dusseldorf => "Dusseldorf",
        }
    }

    /// City center coordinates from the catalog.
    pub fn coordinates(&self) -> Coordinates {
        let (latitude, longitude) = match self {
            CityName::Paris => (48.85661, 2.351499),
            CityName::Cologne => (50.938361, 6.959974),
            CityName::Brussels => (50.846557, 4.351697),
            CityName::Amsterdam => (52.370216, 4.895168),
            CityName::Hamburg => (53.550341, 10.000654),
            CityName::Dusseldorf => (51.225402, 6.776314),
        };
        Coordinates {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for CityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CityName {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(&Self::ALL, Self::as_str, "city", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum OfferType {
    Apartment,
    Hotel,
    House,
    Room,
}

impl OfferType {
    pub const ALL: [OfferType; 4] = [
        OfferType::Apartment,
        OfferType::Hotel,
        OfferType::House,
        OfferType::Room,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OfferType::Apartment => "Apartment",
            OfferType::Hotel => "Hotel",
            OfferType::House => "House",
            OfferType::Room => "Room",
        }
    }
}

impl fmt::Display for OfferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OfferType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(&Self::ALL, Self::as_str, "offer type", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Amenity {
    #[serde(rename = "Air conditioning")]
    AirConditioning,
    #[serde(rename = "Baby seat")]
    BabySeat,
    Breakfast,
    Fridge,
    #[serde(rename = "Laptop friendly workspace")]
    LaptopFriendlyWorkspace,
    Towels,
    Washer,
}

impl Amenity {
    /// Alphabetical by display string; generated subsets keep this order.
    pub const ALL: [Amenity; 7] = [
        Amenity::AirConditioning,
        Amenity::BabySeat,
        Amenity::Breakfast,
        Amenity::Fridge,
        Amenity::LaptopFriendlyWorkspace,
        Amenity::Towels,
        Amenity::Washer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Amenity::Breakfast => "Breakfast",
            Amenity::AirConditioning => "Air conditioning",
            Amenity::LaptopFriendlyWorkspace => "Laptop friendly workspace",
            Amenity::BabySeat => "Baby seat",
            Amenity::Washer => "Washer",
            Amenity::Towels => "Towels",
            Amenity::Fridge => "Fridge",
        }
    }
}

impl fmt::Display for Amenity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Amenity {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(&Self::ALL, Self::as_str, "amenity", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
pub enum UserType {
    #[default]
    Regular,
    Pro,
}

impl UserType {
    pub const ALL: [UserType; 2] = [UserType::Regular, UserType::Pro];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Regular => "Regular",
            UserType::Pro => "Pro",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(&Self::ALL, Self::as_str, "user type", s)
    }
}

/// Public view of a user. The password hash never leaves the database layer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub user_type: UserType,
    pub created_at: OffsetDateTime,
}

impl User {
    pub fn new(name: String, email: String, avatar_url: Option<String>, user_type: UserType) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            avatar_url,
            user_type,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub publish_date: OffsetDateTime,
    pub city: CityName,
    pub image_preview: String,
    pub photos: Vec<String>,
    pub is_premium: bool,
    pub is_favorite: bool,
    pub rating: f64,
    #[serde(rename = "type")]
    pub offer_type: OfferType,
    pub room_count: i32,
    pub guest_count: i32,
    pub rent_price: i32,
    pub amenities: Vec<Amenity>,
    pub host: User,
    pub comment_count: i32,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub comment: String,
    pub publish_date: OffsetDateTime,
    pub rating: i32,
    pub offer_id: Uuid,
    pub user: User,
}

/// Users table row, including the password hash.
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub password_hash: String,
    pub user_type: String,
    pub created_at: OffsetDateTime,
}

impl TryFrom<UserRow> for User {
    type Error = ParseEnumError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            avatar_url: row.avatar_url,
            user_type: row.user_type.parse()?,
            created_at: row.created_at,
        })
    }
}

/// Offers row joined with its host's columns (prefixed `host_`).
#[derive(Debug, FromRow)]
pub struct OfferRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub publish_date: OffsetDateTime,
    pub city: String,
    pub image_preview: String,
    pub photos: Vec<String>,
    pub is_premium: bool,
    pub is_favorite: bool,
    pub rating: f64,
    pub offer_type: String,
    pub room_count: i32,
    pub guest_count: i32,
    pub rent_price: i32,
    pub amenities: Vec<String>,
    pub comment_count: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub host_id: Uuid,
    pub host_name: String,
    pub host_email: String,
    pub host_avatar_url: Option<String>,
    pub host_user_type: String,
    pub host_created_at: OffsetDateTime,
}

impl TryFrom<OfferRow> for Offer {
    type Error = ParseEnumError;

    fn try_from(row: OfferRow) -> Result<Self, Self::Error> {
        let amenities = row
            .amenities
            .iter()
            .map(|a| a.parse())
            .collect::<Result<Vec<Amenity>, _>>()?;

        Ok(Offer {
            id: row.id,
            title: row.title,
            description: row.description,
            publish_date: row.publish_date,
            city: row.city.parse()?,
            image_preview: row.image_preview,
            photos: row.photos,
            is_premium: row.is_premium,
            is_favorite: row.is_favorite,
            rating: row.rating,
            offer_type: row.offer_type.parse()?,
            room_count: row.room_count,
            guest_count: row.guest_count,
            rent_price: row.rent_price,
            amenities,
            host: User {
                id: row.host_id,
                name: row.host_name,
                email: row.host_email,
                avatar_url: row.host_avatar_url,
                user_type: row.host_user_type.parse()?,
                created_at: row.host_created_at,
            },
            comment_count: row.comment_count,
            coordinates: Coordinates {
                latitude: row.latitude,
                longitude: row.longitude,
            },
        })
    }
}

/// Comments row joined with its author's columns (prefixed `user_`).
#[derive(Debug, FromRow)]
pub struct CommentRow {
    pub id: Uuid,
    pub comment: String,
    pub publish_date: OffsetDateTime,
    pub rating: i32,
    pub offer_id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub user_avatar_url: Option<String>,
    pub user_user_type: String,
    pub user_created_at: OffsetDateTime,
}

impl TryFrom<CommentRow> for Comment {
    type Error = ParseEnumError;

    fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
        Ok(Comment {
            id: row.id,
            comment: row.comment,
            publish_date: row.publish_date,
            rating: row.rating,
            offer_id: row.offer_id,
            user: User {
                id: row.user_id,
                name: row.user_name,
                email: row.user_email,
                avatar_url: row.user_avatar_url,
                user_type: row.user_user_type.parse()?,
                created_at: row.user_created_at,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_strings_round_trip() {
        for city in CityName::ALL {
            assert_eq!(city.as_str().parse::<CityName>().unwrap(), city);
        }
        for amenity in Amenity::ALL {
            assert_eq!(amenity.to_string().parse::<Amenity>().unwrap(), amenity);
        }
        assert_eq!("Pro".parse::<UserType>().unwrap(), UserType::Pro);
        assert_eq!("Room".parse::<OfferType>().unwrap(), OfferType::Room);
    }

    #[test]
    fn test_unknown_variant_rejected() {
        let err = "Berlin".parse::<CityName>().unwrap_err();
        assert_eq!(err.kind, "city");
        assert_eq!(err.value, "Berlin");
        assert!("apartment".parse::<OfferType>().is_err());
        assert!("Admin".parse::<UserType>().is_err());
    }

    #[test]
    fn test_serde_matches_display() {
        let json = serde_json::to_string(&Amenity::LaptopFriendlyWorkspace).unwrap();
        assert_eq!(json, "\"Laptop friendly workspace\"");

        let parsed: Amenity = serde_json::from_str("\"Baby seat\"").unwrap();
        assert_eq!(parsed, Amenity::BabySeat);
        assert!(serde_json::from_str::<CityName>("\"Berlin\"").is_err());
    }

    #[test]
    fn test_amenities_sorted_by_display_string() {
        let names: Vec<&str> = Amenity::ALL.iter().map(Amenity::as_str).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert_eq!(names[0], "Air conditioning");
        assert_eq!(names[6], "Washer");
    }

    #[test]
    fn test_city_coordinates() {
        let amsterdam = CityName::Amsterdam.coordinates();
        assert_eq!(amsterdam.latitude, 52.370216);
        assert_eq!(amsterdam.longitude, 4.895168);
    }
}
