//! Reading and writing TSV offer files.
//!
//! One line holds one offer and its host, in the field order produced by
//! [`TsvOfferGenerator`](crate::generators::TsvOfferGenerator).

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use offers::models::{Amenity, CityName, Coordinates, OfferType, ParseEnumError, UserType};

use crate::generators::{
    FIELD_COUNT, FIELD_SEPARATOR, LIST_SEPARATOR, MAX_GUESTS, MAX_RATING, MAX_RENT, MAX_ROOMS,
    MIN_GUESTS, MIN_RATING, MIN_RENT, MIN_ROOMS,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TsvError {
    #[error("expected 19 fields, found {0}")]
    FieldCount(usize),
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    #[error("{field}: invalid integer {value:?}")]
    InvalidInteger { field: &'static str, value: String },
    #[error("{field}: {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },
    #[error("{field}: {value:?} is listed more than once")]
    DuplicateValue { field: &'static str, value: String },
    #[error("{field}: expected \"true\" or \"false\", found {value:?}")]
    InvalidBoolean { field: &'static str, value: String },
    #[error("{field}: {source}")]
    InvalidVariant {
        field: &'static str,
        source: ParseEnumError,
    },
    #[error("{field}: invalid coordinates {value:?}")]
    InvalidCoordinates { field: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: {source}")]
    Line { line: usize, source: TsvError },
}

/// Host part of an imported line.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedHost {
    pub name: String,
    pub email: String,
    pub avatar_url: String,
    pub password: String,
    pub user_type: UserType,
}

/// One imported offer.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedOffer {
    pub title: String,
    pub description: String,
    pub city: CityName,
    pub image_preview: String,
    pub photos: Vec<String>,
    pub is_premium: bool,
    pub is_favorite: bool,
    pub rating: i32,
    pub offer_type: OfferType,
    pub room_count: i32,
    pub guest_count: i32,
    pub rent_price: i32,
    pub amenities: Vec<Amenity>,
    pub host: ParsedHost,
    pub coordinates: Coordinates,
}

fn text(field: &'static str, value: &str) -> Result<String, TsvError> {
    if value.is_empty() {
        return Err(TsvError::EmptyField { field });
    }
    Ok(value.to_string())
}

fn integer(field: &'static str, value: &str) -> Result<i32, TsvError> {
    value.parse().map_err(|_| TsvError::InvalidInteger {
        field,
        value: value.to_string(),
    })
}

fn bounded(field: &'static str, value: &str, min: i32, max: i32) -> Result<i32, TsvError> {
    let value = integer(field, value)?;
    if !(min..=max).contains(&value) {
        return Err(TsvError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(value)
}

fn boolean(field: &'static str, value: &str) -> Result<bool, TsvError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(TsvError::InvalidBoolean {
            field,
            value: value.to_string(),
        }),
    }
}

fn variant<T>(field: &'static str, value: &str) -> Result<T, TsvError>
where
    T: std::str::FromStr<Err = ParseEnumError>,
{
    value
        .parse()
        .map_err(|source| TsvError::InvalidVariant { field, source })
}

fn list(field: &'static str, value: &str) -> Result<Vec<String>, TsvError> {
    let items: Vec<String> = value
        .split(LIST_SEPARATOR)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if items.is_empty() {
        return Err(TsvError::EmptyField { field });
    }
    Ok(items)
}

fn coordinates(field: &'static str, value: &str) -> Result<Coordinates, TsvError> {
    let invalid = || TsvError::InvalidCoordinates {
        field,
        value: value.to_string(),
    };
    let (lat, lon) = value.split_once(LIST_SEPARATOR).ok_or_else(invalid)?;
    let latitude: f64 = lat.parse().map_err(|_| invalid())?;
    let longitude: f64 = lon.parse().map_err(|_| invalid())?;
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(invalid());
    }
    Ok(Coordinates {
        latitude,
        longitude,
    })
}

/// Parses one TSV line. A trailing `\r` or `\n` is ignored.
///
/// Numeric fields must fall in the generator's ranges and amenities must
/// not repeat, so bad lines fail here with their field name instead of at
/// insert time.
pub fn parse_offer_line(line: &str) -> Result<ParsedOffer, TsvError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let f: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if f.len() != FIELD_COUNT {
        return Err(TsvError::FieldCount(f.len()));
    }

    let mut amenities: Vec<Amenity> = Vec::new();
    for name in list("amenities", f[12])? {
        let amenity = variant("amenities", &name)?;
        if amenities.contains(&amenity) {
            return Err(TsvError::DuplicateValue {
                field: "amenities",
                value: name,
            });
        }
        amenities.push(amenity);
    }

    Ok(ParsedOffer {
        title: text("title", f[0])?,
        description: text("description", f[1])?,
        city: variant("city", f[2])?,
        image_preview: text("imagePreview", f[3])?,
        photos: list("photos", f[4])?,
        is_premium: boolean("isPremium", f[5])?,
        is_favorite: boolean("isFavorite", f[6])?,
        rating: bounded("rating", f[7], MIN_RATING, MAX_RATING)?,
        offer_type: variant("type", f[8])?,
        room_count: bounded("roomCount", f[9], MIN_ROOMS, MAX_ROOMS)?,
        guest_count: bounded("guestCount", f[10], MIN_GUESTS, MAX_GUESTS)?,
        rent_price: bounded("rentPrice", f[11], MIN_RENT, MAX_RENT)?,
        amenities,
        host: ParsedHost {
            name: text("name", f[13])?,
            email: text("email", f[14])?,
            avatar_url: text("avatarUrl", f[15])?,
            password: text("password", f[16])?,
            user_type: variant("userType", f[17])?,
        },
        coordinates: coordinates("coordinates", f[18])?,
    })
}

/// Parses every non-blank line, reporting 1-based line numbers on failure.
pub fn parse_lines(reader: impl BufRead) -> Result<Vec<ParsedOffer>, ImportError> {
    let mut offers = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let offer = parse_offer_line(&line).map_err(|source| ImportError::Line {
            line: idx + 1,
            source,
        })?;
        offers.push(offer);
    }
    Ok(offers)
}

/// Reads offers from a TSV file.
pub struct TsvFileReader {
    path: PathBuf,
}

impl TsvFileReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn read(&self) -> Result<Vec<ParsedOffer>, ImportError> {
        let file = File::open(&self.path)?;
        parse_lines(BufReader::new(file))
    }
}

/// Writes generated lines to a TSV file, one per line.
pub struct TsvFileWriter {
    writer: BufWriter<File>,
    written: usize,
}

impl TsvFileWriter {
    /// Creates or truncates the file at `path`.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self {
            writer: BufWriter::new(File::create(path)?),
            written: 0,
        })
    }

    pub fn write(&mut self, line: &str) -> io::Result<()> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Flushes and returns the number of lines written.
    pub fn finish(mut self) -> io::Result<usize> {
        self.writer.flush()?;
        Ok(self.written)
    }
}
