//! Property tests for generated TSV offer lines.

use std::collections::BTreeSet;

use mock_data::generators::{FIELD_COUNT, FIELD_SEPARATOR, OfferGenerator, TsvOfferGenerator};
use mock_data::pool::{MockServerData, PoolError};
use mock_data::tsv::{TsvFileReader, TsvFileWriter, parse_offer_line};
use mock_data::write_offers;
use offers::models::{Amenity, CityName, OfferType, UserType};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Tab-, semicolon- and newline-free values, distinct within a collection.
fn collection() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-zA-Z0-9 ./@-]{1,16}", 1..8)
        .prop_map(|set: BTreeSet<String>| set.into_iter().collect())
}

fn pool() -> impl Strategy<Value = MockServerData> {
    (
        collection(),
        collection(),
        collection(),
        collection(),
        collection(),
        collection(),
        collection(),
        collection(),
    )
        .prop_map(
            |(titles, descriptions, image_previews, photos, names, emails, avatars, passwords)| {
                MockServerData {
                    titles,
                    descriptions,
                    image_previews,
                    photos,
                    names,
                    emails,
                    avatars,
                    passwords,
                }
            },
        )
}

/// Positions of `picked` in `source`; panics on values not in `source`.
fn positions<T: PartialEq + std::fmt::Debug>(picked: &[T], source: &[T]) -> Vec<usize> {
    picked
        .iter()
        .map(|p| {
            source
                .iter()
                .position(|s| s == p)
                .unwrap_or_else(|| panic!("{p:?} not in source"))
        })
        .collect()
}

fn strictly_increasing(values: &[usize]) -> bool {
    values.windows(2).all(|w| w[0] < w[1])
}

/// A value with a tab, line break or `;` somewhere inside.
fn reserved_value() -> impl Strategy<Value = String> {
    (
        "[a-zA-Z0-9 ./@-]{0,8}",
        prop::sample::select(vec!['\t', '\n', '\r', ';']),
        "[a-zA-Z0-9 ./@-]{0,8}",
    )
        .prop_map(|(head, reserved, tail)| format!("{head}{reserved}{tail}"))
}

proptest! {
    #[test]
    fn pool_with_reserved_chars_is_rejected(
        mut pool in pool(),
        slot in 0usize..8,
        value in reserved_value(),
    ) {
        prop_assert!(pool.validate().is_ok());

        let (name, values) = match slot {
            0 => ("titles", &mut pool.titles),
            1 => ("descriptions", &mut pool.descriptions),
            2 => ("imagePreviews", &mut pool.image_previews),
            3 => ("photos", &mut pool.photos),
            4 => ("names", &mut pool.names),
            5 => ("emails", &mut pool.emails),
            6 => ("avatars", &mut pool.avatars),
            _ => ("passwords", &mut pool.passwords),
        };
        values.push(value.clone());

        match pool.validate() {
            Err(PoolError::InvalidValue { collection, value: rejected }) => {
                prop_assert_eq!(collection, name);
                prop_assert_eq!(rejected, value);
            }
            other => prop_assert!(false, "expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn generated_line_is_well_formed(pool in pool(), seed in any::<u64>()) {
        let offer_gen = TsvOfferGenerator::new(&pool);
        let mut rng = StdRng::seed_from_u64(seed);
        let line = offer_gen.generate(&mut rng);

        prop_assert!(!line.contains('\n'));
        let f: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        prop_assert_eq!(f.len(), FIELD_COUNT);

        prop_assert!(pool.titles.iter().any(|t| t == f[0]));
        prop_assert!(pool.descriptions.iter().any(|d| d == f[1]));
        prop_assert!(pool.image_previews.iter().any(|i| i == f[3]));
        prop_assert!(pool.names.iter().any(|n| n == f[13]));
        prop_assert!(pool.emails.iter().any(|e| e == f[14]));
        prop_assert!(pool.avatars.iter().any(|a| a == f[15]));
        prop_assert!(pool.passwords.iter().any(|p| p == f[16]));

        let city: CityName = f[2].parse().unwrap();
        let c = city.coordinates();
        prop_assert_eq!(f[18], format!("{};{}", c.latitude, c.longitude));

        let photos: Vec<String> = f[4].split(';').map(str::to_string).collect();
        prop_assert!(!photos.is_empty() && photos.len() <= pool.photos.len());
        prop_assert!(strictly_increasing(&positions(&photos, &pool.photos)));

        let amenities: Vec<Amenity> = f[12].split(';').map(|a| a.parse().unwrap()).collect();
        prop_assert!(!amenities.is_empty() && amenities.len() <= Amenity::ALL.len());
        prop_assert!(strictly_increasing(&positions(&amenities, &Amenity::ALL)));

        prop_assert!(f[5] == "true" || f[5] == "false");
        prop_assert!(f[6] == "true" || f[6] == "false");
        prop_assert!(f[8].parse::<OfferType>().is_ok());
        prop_assert!(f[17].parse::<UserType>().is_ok());

        let rating: i32 = f[7].parse().unwrap();
        let rooms: i32 = f[9].parse().unwrap();
        let guests: i32 = f[10].parse().unwrap();
        let rent: i32 = f[11].parse().unwrap();
        prop_assert!((1..=5).contains(&rating));
        prop_assert!((1..=8).contains(&rooms));
        prop_assert!((1..=10).contains(&guests));
        prop_assert!((100..=100_000).contains(&rent));
    }

    #[test]
    fn generated_line_parses_back(pool in pool(), seed in any::<u64>()) {
        let offer_gen = TsvOfferGenerator::new(&pool);
        let line = offer_gen.generate(&mut StdRng::seed_from_u64(seed));

        let offer = parse_offer_line(&line).unwrap();
        prop_assert_eq!(offer.coordinates, offer.city.coordinates());
        prop_assert_eq!(&offer.host.name, line.split('\t').nth(13).unwrap());
    }
}

#[test]
fn test_written_file_imports() {
    let pool = MockServerData {
        titles: vec!["Cozy Loft".to_string(), "Sunny studio".to_string()],
        descriptions: vec!["Nice place".to_string()],
        image_previews: vec!["img.png".to_string()],
        photos: (1..=6).map(|i| format!("p{i}.png")).collect(),
        names: vec!["Alice".to_string(), "Bob".to_string()],
        emails: vec!["a@x.com".to_string(), "b@x.com".to_string()],
        avatars: vec!["av.png".to_string()],
        passwords: vec!["secret".to_string()],
    };
    let offer_gen = TsvOfferGenerator::new(&pool);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("offers.tsv");

    let writer = TsvFileWriter::create(&path).unwrap();
    let written = write_offers(&offer_gen, 25, writer, &mut StdRng::seed_from_u64(1)).unwrap();
    assert_eq!(written, 25);

    let offers = TsvFileReader::new(&path).read().unwrap();
    assert_eq!(offers.len(), 25);
    assert!(offers.iter().all(|o| o.photos.len() <= 6));
}
