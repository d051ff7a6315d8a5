//! Remote asset URL templates.

use std::ops::RangeInclusive;

/// Default host for static sprites.
pub const DEFAULT_SPRITE_BASE_URL: &str =
    "https://raw.githubusercontent.com/fanzeyi/pokemon.json/master/sprites";

/// Default host for animations.
pub const DEFAULT_ANIMATION_BASE_URL: &str = "http://www.pokestadium.com/sprites/xy";

/// Numeric suffixes tried for secondary animations.
pub const SECONDARY_VARIANTS: RangeInclusive<u8> = 2..=6;

/// Builds asset URLs from the two configured hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetUrls {
    sprite_base: String,
    animation_base: String,
}

impl AssetUrls {
    pub fn new(sprite_base: impl Into<String>, animation_base: impl Into<String>) -> Self {
        Self {
            sprite_base: trim_slash(sprite_base.into()),
            animation_base: trim_slash(animation_base.into()),
        }
    }

    /// `{sprite_base}/025MS.png`
    pub fn sprite(&self, number: u32) -> String {
        format!("{}/{:03}MS.png", self.sprite_base, number)
    }

    /// `{animation_base}/pikachu.gif`
    pub fn primary_animation(&self, alias: &str) -> String {
        format!("{}/{}.gif", self.animation_base, alias.to_lowercase())
    }

    /// `{animation_base}/pikachu-2.gif`
    pub fn secondary_animation(&self, alias: &str, variant: u8) -> String {
        format!(
            "{}/{}-{}.gif",
            self.animation_base,
            alias.to_lowercase(),
            variant
        )
    }
}

impl Default for AssetUrls {
    fn default() -> Self {
        Self::new(DEFAULT_SPRITE_BASE_URL, DEFAULT_ANIMATION_BASE_URL)
    }
}

fn trim_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprite_url_is_zero_padded() {
        let urls = AssetUrls::default();
        assert_eq!(
            urls.sprite(7),
            "https://raw.githubusercontent.com/fanzeyi/pokemon.json/master/sprites/007MS.png"
        );
        assert!(urls.sprite(151).ends_with("/151MS.png"));
    }

    #[test]
    fn test_animation_urls_are_lowercase() {
        let urls = AssetUrls::default();
        assert_eq!(
            urls.primary_animation("Nidoranf"),
            "http://www.pokestadium.com/sprites/xy/nidoranf.gif"
        );
        assert_eq!(
            urls.secondary_animation("Pikachu", 3),
            "http://www.pokestadium.com/sprites/xy/pikachu-3.gif"
        );
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let urls = AssetUrls::new("http://a/sprites/", "http://b/xy//");
        assert_eq!(urls.sprite(1), "http://a/sprites/001MS.png");
        assert_eq!(urls.primary_animation("Mew"), "http://b/xy/mew.gif");
    }

    #[test]
    fn test_secondary_variants_are_two_through_six() {
        let variants: Vec<u8> = SECONDARY_VARIANTS.collect();
        assert_eq!(variants, vec![2, 3, 4, 5, 6]);
    }
}
