//! # Fixtures
//!
//! Sample directory entries and unit prices.
//!
//! These are plain values. Nothing in the crate reads them on its own: the
//! `seed` binary, `POST /api/users/initialize` callers and tests pass them in
//! explicitly, so each test can substitute its own data.

use crate::types::{BeaconPrice, User};

/// Five sample customers across four countries.
///
/// User 3 has no street address on file, and users 2 and 5 carry a
/// negotiated discount.
pub fn sample_users() -> Vec<User> {
    vec![
        User {
            id: 1,
            full_name: "Karmen Fadel".to_string(),
            address1: Some("546 Collin Vista".to_string()),
            address2: None,
            postal_code: Some("90149".to_string()),
            city: Some("Quebec".to_string()),
            country_name: "Canada".to_string(),
            country_id: "ca".to_string(),
            organisation_id: Some(1),
            discount_percent: None,
        },
        User {
            id: 2,
            full_name: "Lasonya Dietrich Sr.".to_string(),
            address1: Some("37872 Jed Centers".to_string()),
            address2: Some("Apt. 517".to_string()),
            postal_code: Some("36304".to_string()),
            city: Some("Kassandratown".to_string()),
            country_name: "Australia".to_string(),
            country_id: "au".to_string(),
            organisation_id: Some(1),
            discount_percent: Some(10.0),
        },
        User {
            id: 3,
            full_name: "Ada Stiedemann".to_string(),
            address1: None,
            address2: None,
            postal_code: None,
            city: None,
            country_name: "Denmark".to_string(),
            country_id: "dk".to_string(),
            organisation_id: Some(2),
            discount_percent: None,
        },
        User {
            id: 4,
            full_name: "Miss Ji Denesik".to_string(),
            address1: Some("540 Schmidt Trail".to_string()),
            address2: None,
            postal_code: Some("62073-4317".to_string()),
            city: Some("Port Wilfordberg".to_string()),
            country_name: "USA".to_string(),
            country_id: "us".to_string(),
            organisation_id: None,
            discount_percent: Some(0.0),
        },
        User {
            id: 5,
            full_name: "Sherwood Sipes".to_string(),
            address1: Some("967 Weissnat Expressway".to_string()),
            address2: None,
            postal_code: Some("53073".to_string()),
            city: Some("New York".to_string()),
            country_name: "USA".to_string(),
            country_id: "us".to_string(),
            organisation_id: Some(3),
            discount_percent: Some(20.0),
        },
    ]
}

/// Unit prices for the sample countries.
pub fn sample_prices() -> Vec<BeaconPrice> {
    let row = |country_id: &str, currency: &str, control, variant1, variant2| BeaconPrice {
        country_id: country_id.to_string(),
        currency: currency.to_string(),
        price_control_cents: control,
        price_variant1_cents: variant1,
        price_variant2_cents: variant2,
    };

    vec![
        row("au", "AUD", 1_500, 1_400, 1_650),
        row("ca", "CAD", 1_350, 1_250, 1_450),
        row("dk", "DKK", 7_500, 6_900, 7_900),
        row("us", "USD", 1_000, 900, 1_100),
    ]
}
