//! Testing utilities and mock implementations.
//!
//! This module provides a mock [`RemoteFetcher`](crate::fetcher::RemoteFetcher)
//! and fixture builders, allowing the repository and use cases to be tested
//! without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use pokedex_core::testing::{fixtures, MockFetcher, MockResponse};
//!
//! let fetcher = MockFetcher::new();
//! fetcher.respond("http://gifs.test/pikachu.gif", MockResponse::gif(3)).await;
//!
//! let source = fixtures::dataset_source(&[fixtures::entry(25, "Pikachu")], &[(25, "Pikachu")]);
//! ```

mod mock_fetcher;

pub use mock_fetcher::{FetchGate, MockFetcher, MockResponse};

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::io::Cursor;

    use image::codecs::gif::{GifEncoder, Repeat};
    use image::{DynamicImage, Frame, ImageOutputFormat, Rgba, RgbaImage};
    use serde_json::json;

    use crate::catalog::{BaseStats, Categories, CatalogEntry, CategoryTag, DatasetSource};

    /// Encode a solid PNG of the given size.
    pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 255]));
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(image)
            .write_to(&mut buffer, ImageOutputFormat::Png)
            .expect("encode png fixture");
        buffer.into_inner()
    }

    /// Encode a looping 2x2 GIF with `frames` frames of alternating colour.
    pub fn gif_bytes(frames: usize) -> Vec<u8> {
        let mut buffer = Vec::new();
        {
            let mut encoder = GifEncoder::new(&mut buffer);
            encoder
                .set_repeat(Repeat::Infinite)
                .expect("set gif repeat");
            for i in 0..frames {
                let shade = if i % 2 == 0 { 0 } else { 255 };
                let image = RgbaImage::from_pixel(2, 2, Rgba([shade, shade, 0, 255]));
                encoder
                    .encode_frame(Frame::new(image))
                    .expect("encode gif frame");
            }
        }
        buffer
    }

    /// Create a single-type entry with reasonable defaults.
    pub fn entry(number: u32, name: &str) -> CatalogEntry {
        CatalogEntry {
            number,
            name: name.to_string(),
            categories: Categories {
                primary: CategoryTag::Normal,
                secondary: None,
            },
            abilities: vec!["にげあし".to_string()],
            hidden_abilities: Vec::new(),
            base_stats: stats(50),
        }
    }

    /// Create an entry whose six stats are all `each`.
    pub fn entry_with_stats(number: u32, name: &str, each: u16) -> CatalogEntry {
        CatalogEntry {
            base_stats: stats(each),
            ..entry(number, name)
        }
    }

    fn stats(each: u16) -> BaseStats {
        BaseStats {
            hp: each,
            attack: each,
            defence: each,
            sp_attack: each,
            sp_defence: each,
            speed: each,
        }
    }

    /// Serialize entries in the bundled entry dataset's format.
    pub fn entries_json(entries: &[CatalogEntry]) -> String {
        let records: Vec<_> = entries
            .iter()
            .map(|e| {
                let types: Vec<_> = e.categories.iter().map(|t| t.label()).collect();
                json!({
                    "no": e.number,
                    "name": e.name,
                    "types": types,
                    "abilities": e.abilities,
                    "hiddenAbilities": e.hidden_abilities,
                    "stats": e.base_stats,
                })
            })
            .collect();
        serde_json::Value::Array(records).to_string()
    }

    /// Serialize `(id, english name)` pairs in the bundled alias dataset's format.
    pub fn aliases_json(aliases: &[(u32, &str)]) -> String {
        let records: Vec<_> = aliases
            .iter()
            .map(|(id, english)| {
                json!({
                    "id": id,
                    "name": { "english": english, "japanese": "" },
                })
            })
            .collect();
        serde_json::Value::Array(records).to_string()
    }

    /// Inline dataset source built from entries and aliases.
    pub fn dataset_source(entries: &[CatalogEntry], aliases: &[(u32, &str)]) -> DatasetSource {
        DatasetSource::Inline {
            entries: entries_json(entries),
            aliases: aliases_json(aliases),
        }
    }
}
