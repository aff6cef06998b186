use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Flag identifiers understood by the remote API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagId {
    Abrosexual,
    Ace,
    Agender,
    Aromantic,
    Bi,
    Genderfluid,
    Genderqueer,
    Intersex,
    Lesbian,
    Nb,
    Pan,
    Poc,
    #[default]
    Pride,
    Trans,
}

impl FlagId {
    pub const ALL: [FlagId; 14] = [
        FlagId::Abrosexual,
        FlagId::Ace,
        FlagId::Agender,
        FlagId::Aromantic,
        FlagId::Bi,
        FlagId::Genderfluid,
        FlagId::Genderqueer,
        FlagId::Intersex,
        FlagId::Lesbian,
        FlagId::Nb,
        FlagId::Pan,
        FlagId::Poc,
        FlagId::Pride,
        FlagId::Trans,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FlagId::Abrosexual => "abrosexual",
            FlagId::Ace => "ace",
            FlagId::Agender => "agender",
            FlagId::Aromantic => "aromantic",
            FlagId::Bi => "bi",
            FlagId::Genderfluid => "genderfluid",
            FlagId::Genderqueer => "genderqueer",
            FlagId::Intersex => "intersex",
            FlagId::Lesbian => "lesbian",
            FlagId::Nb => "nb",
            FlagId::Pan => "pan",
            FlagId::Poc => "poc",
            FlagId::Pride => "pride",
            FlagId::Trans => "trans",
        }
    }
}

/// Per-flag metadata returned by `GET flags`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagDescriptor {
    #[serde(rename = "defaultAlpha")]
    pub default_alpha: f64,
    pub tooltip: String,
}

pub type FlagResponse = BTreeMap<FlagId, FlagDescriptor>;

/// Keep the entries whose key is a known [`FlagId`]; flags added server-side
/// after this release are dropped instead of failing the whole response.
pub fn known_flags(raw: BTreeMap<String, FlagDescriptor>) -> FlagResponse {
    raw.into_iter()
        .filter_map(|(key, descriptor)| match key.parse::<FlagId>() {
            Ok(flag) => Some((flag, descriptor)),
            Err(_) => {
                log::debug!("ignoring unknown flag {:?}", key);
                None
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StaticEffect {
    #[default]
    Circle,
    Overlay,
    Square,
    Background,
}

impl StaticEffect {
    pub fn as_str(self) -> &'static str {
        match self {
            StaticEffect::Circle => "circle",
            StaticEffect::Overlay => "overlay",
            StaticEffect::Square => "square",
            StaticEffect::Background => "background",
        }
    }
}

/// Shapes accepted by the animated endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnimatedEffect {
    #[default]
    Circle,
    Square,
}

impl AnimatedEffect {
    pub fn as_str(self) -> &'static str {
        match self {
            AnimatedEffect::Circle => "circle",
            AnimatedEffect::Square => "square",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EffectStyle {
    #[default]
    Solid,
    Gradient,
}

impl EffectStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            EffectStyle::Solid => "solid",
            EffectStyle::Gradient => "gradient",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    Jpg,
    #[default]
    Png,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Jpg => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

macro_rules! impl_display_from_str {
    ($($ty:ty => [$($variant:expr),+]),+ $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            impl FromStr for $ty {
                type Err = String;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    [$($variant),+]
                        .into_iter()
                        .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
                        .ok_or_else(|| format!("unknown {}: {}", stringify!($ty), s))
                }
            }
        )+
    };
}

impl_display_from_str! {
    StaticEffect => [StaticEffect::Circle, StaticEffect::Overlay, StaticEffect::Square, StaticEffect::Background],
    AnimatedEffect => [AnimatedEffect::Circle, AnimatedEffect::Square],
    EffectStyle => [EffectStyle::Solid, EffectStyle::Gradient],
    OutputFormat => [OutputFormat::Jpg, OutputFormat::Png],
}

impl fmt::Display for FlagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlagId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FlagId::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown flag: {}", s))
    }
}

/// Image input for the effect endpoints: raw bytes, or a url fetched before upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Bytes(Vec<u8>),
    Url(String),
}

impl ImageSource {
    /// An image to download before upload.
    pub fn url(url: impl Into<String>) -> Self {
        ImageSource::Url(url.into())
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        ImageSource::Bytes(bytes)
    }
}

impl From<&[u8]> for ImageSource {
    fn from(bytes: &[u8]) -> Self {
        ImageSource::Bytes(bytes.to_vec())
    }
}

impl From<url::Url> for ImageSource {
    fn from(url: url::Url) -> Self {
        ImageSource::Url(url.into())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StaticOptions {
    pub effect: StaticEffect,
    pub style: EffectStyle,
    pub format: OutputFormat,
    pub alpha: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimatedOptions {
    pub effect: AnimatedEffect,
    pub alpha: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_ids_round_trip_through_strings() {
        for flag in FlagId::ALL {
            assert_eq!(flag.as_str().parse::<FlagId>().unwrap(), flag);
            assert_eq!(
                serde_json::to_string(&flag).unwrap(),
                format!("\"{}\"", flag)
            );
        }
        assert!("rainbow".parse::<FlagId>().is_err());
    }

    #[test]
    fn defaults_match_api_defaults() {
        assert_eq!(FlagId::default(), FlagId::Pride);
        let s = StaticOptions::default();
        assert_eq!(s.effect, StaticEffect::Circle);
        assert_eq!(s.style, EffectStyle::Solid);
        assert_eq!(s.format, OutputFormat::Png);
        assert_eq!(s.alpha, None);
        assert_eq!(AnimatedOptions::default().effect, AnimatedEffect::Circle);
    }

    #[test]
    fn descriptor_uses_camel_case_alpha() {
        let d: FlagDescriptor =
            serde_json::from_str(r#"{"defaultAlpha":0.5,"tooltip":"Pan"}"#).unwrap();
        assert_eq!(d.default_alpha, 0.5);
        assert_eq!(d.tooltip, "Pan");
    }

    #[test]
    fn unknown_flag_keys_are_skipped() {
        let raw: BTreeMap<String, FlagDescriptor> = serde_json::from_str(
            r#"{"trans":{"defaultAlpha":0.5,"tooltip":"Trans"},"demiboy":{"defaultAlpha":0.4,"tooltip":"Demiboy"}}"#,
        )
        .unwrap();
        let flags = known_flags(raw);
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[&FlagId::Trans].tooltip, "Trans");
    }

    #[test]
    fn url_constructor() {
        assert_eq!(
            ImageSource::url("https://example.com/me.png"),
            ImageSource::Url("https://example.com/me.png".to_string())
        );
    }

    #[test]
    fn effect_names_parse_case_insensitively() {
        assert_eq!("Overlay".parse::<StaticEffect>().unwrap(), StaticEffect::Overlay);
        assert_eq!("gradient".parse::<EffectStyle>().unwrap(), EffectStyle::Gradient);
        assert_eq!("JPG".parse::<OutputFormat>().unwrap(), OutputFormat::Jpg);
        assert!("overlay".parse::<AnimatedEffect>().is_err());
    }
}
