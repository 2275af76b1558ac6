//! Built-in demo data, shown only when `[ui] demo_fallback` is on.

use std::collections::BTreeMap;

use crate::api::domain::PLACEHOLDER_IMAGE;
use crate::api::{Artist, GenreComparison, GenreShares, Image, Market};

/// Demo genre shares per market, in `IN, US, GB, CA, AU` order.
const DEMO_SHARES: &[(&str, [f64; 5])] = &[
    ("Pop", [35.0, 42.0, 38.0, 40.0, 36.0]),
    ("Hip-Hop", [20.0, 35.0, 25.0, 30.0, 22.0]),
    ("Bollywood", [45.0, 5.0, 8.0, 6.0, 7.0]),
    ("Rock", [15.0, 25.0, 30.0, 28.0, 32.0]),
    ("Electronic", [12.0, 18.0, 22.0, 20.0, 25.0]),
    ("Classical", [25.0, 8.0, 12.0, 10.0, 9.0]),
];

const DEMO_MARKETS: [&str; 5] = ["IN", "US", "GB", "CA", "AU"];

fn demo_artist(n: u32, name: &str, followers: u64, popularity: u8, genres: [&str; 2]) -> Artist {
    Artist {
        id: format!("demo-{n}"),
        name: name.to_string(),
        images: vec![Image {
            url: PLACEHOLDER_IMAGE.to_string(),
            width: Some(640),
            height: Some(640),
        }],
        followers,
        popularity,
        external_url: None,
        genres: genres.iter().map(|g| g.to_string()).collect(),
    }
}

pub fn demo_artists() -> Vec<Artist> {
    vec![
        demo_artist(1, "Arijit Singh", 15_000_000, 95, ["Bollywood", "Playback Singing"]),
        demo_artist(2, "A.R. Rahman", 8_500_000, 92, ["Film Score", "World Music"]),
        demo_artist(3, "Shreya Ghoshal", 12_000_000, 90, ["Bollywood", "Classical"]),
        demo_artist(4, "Badshah", 9_800_000, 88, ["Hip-Hop", "Punjabi"]),
        demo_artist(5, "Armaan Malik", 7_200_000, 85, ["Pop", "Bollywood"]),
        demo_artist(6, "Rahat Fateh Ali Khan", 6_500_000, 82, ["Qawwali", "Sufi"]),
    ]
}

/// Demo comparison restricted to `markets`; markets without demo data
/// are simply absent (and read as zero).
pub fn demo_comparison(markets: &[Market]) -> GenreComparison {
    let rows = DEMO_SHARES
        .iter()
        .map(|(genre, values)| {
            let shares: BTreeMap<Market, f64> = markets
                .iter()
                .filter_map(|m| {
                    let idx = DEMO_MARKETS.iter().position(|code| *code == m.as_str())?;
                    Some((m.clone(), values[idx]))
                })
                .collect();
            GenreShares {
                genre: genre.to_string(),
                shares,
            }
        })
        .collect();

    GenreComparison {
        markets: markets.to_vec(),
        rows,
    }
}
