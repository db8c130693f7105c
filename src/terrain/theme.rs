//! Colour themes: ordered altitude bands mapped to RGBA.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::projector::HeightPolicy;
use super::shape::TerrainShape;

/// Height the island policy floors terrain at when the mask swallows it.
pub const ISLAND_FLOOR: f32 = 0.02;

/// Errors raised when a band table is malformed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThemeError {
    #[error("Theme '{0}' has no bands")]
    Empty(String),
    #[error("Theme '{0}' has no catch-all band")]
    MissingCatchAll(String),
    #[error("Theme '{0}': catch-all band at index {1} is not the last band")]
    CatchAllNotLast(String, usize),
    #[error("Theme '{0}': band {1} has a non-finite threshold")]
    NonFiniteThreshold(String, usize),
    #[error("Theme '{0}': band {1} threshold does not increase")]
    NotAscending(String, usize),
}

/// One colour band. A band without a threshold is the catch-all top band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThemeBand {
    /// Inclusive upper bound of the band, or `None` for the catch-all.
    pub threshold: Option<f32>,
    /// Colour in [0, 1].
    pub rgba: [f32; 4],
}

impl ThemeBand {
    pub fn new(threshold: f32, rgba: [f32; 4]) -> Self {
        Self {
            threshold: Some(threshold),
            rgba,
        }
    }

    pub fn catch_all(rgba: [f32; 4]) -> Self {
        Self {
            threshold: None,
            rgba,
        }
    }

    /// Band from 8-bit colour channels.
    pub fn from_rgba8(rgba: [u8; 4], threshold: Option<f32>) -> Self {
        Self {
            threshold,
            rgba: rgba.map(|c| c as f32 / 255.0),
        }
    }
}

/// An ordered band table plus the height policy its terrain uses.
///
/// Invariant: thresholds ascend and exactly one band, the last, is the
/// catch-all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ThemeTable")]
pub struct Theme {
    name: String,
    bands: Vec<ThemeBand>,
    height_policy: HeightPolicy,
}

/// Unchecked serialized form of a [`Theme`].
#[derive(Deserialize)]
struct ThemeTable {
    name: String,
    bands: Vec<ThemeBand>,
    height_policy: HeightPolicy,
}

impl TryFrom<ThemeTable> for Theme {
    type Error = ThemeError;

    fn try_from(table: ThemeTable) -> Result<Self, Self::Error> {
        Theme::new(table.name, table.bands, table.height_policy)
    }
}

impl Theme {
    /// Builds a theme, rejecting malformed band tables.
    pub fn new(
        name: impl Into<String>,
        bands: Vec<ThemeBand>,
        height_policy: HeightPolicy,
    ) -> Result<Self, ThemeError> {
        let name = name.into();
        if bands.is_empty() {
            return Err(ThemeError::Empty(name));
        }

        let last = bands.len() - 1;
        let mut previous: Option<f32> = None;
        for (i, band) in bands.iter().enumerate() {
            match band.threshold {
                None if i != last => return Err(ThemeError::CatchAllNotLast(name, i)),
                None => {}
                Some(_) if i == last => return Err(ThemeError::MissingCatchAll(name)),
                Some(t) if !t.is_finite() => return Err(ThemeError::NonFiniteThreshold(name, i)),
                Some(t) => {
                    if previous.is_some_and(|p| t <= p) {
                        return Err(ThemeError::NotAscending(name, i));
                    }
                    previous = Some(t);
                }
            }
        }

        Ok(Self {
            name,
            bands,
            height_policy,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bands(&self) -> &[ThemeBand] {
        &self.bands
    }

    pub fn height_policy(&self) -> HeightPolicy {
        self.height_policy
    }

    /// Index of the first band whose threshold is at or above `value`.
    pub fn band_index(&self, value: f32) -> usize {
        self.bands
            .iter()
            .position(|band| band.threshold.map_or(true, |t| value <= t))
            .unwrap_or(self.bands.len() - 1)
    }

    /// Colour of the band `value` falls into.
    pub fn color_for(&self, value: f32) -> [f32; 4] {
        self.bands[self.band_index(value)].rgba
    }

    /// Threshold of the lowest band; the floor terrain is clamped to.
    ///
    /// A theme made of only the catch-all has no floor.
    pub fn lowest_threshold(&self) -> f32 {
        self.bands[0].threshold.unwrap_or(f32::NEG_INFINITY)
    }
}

/// The built-in themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreset {
    #[default]
    Mountain,
    SnowMountain,
    Desert,
    Island,
}

impl ThemePreset {
    pub const ALL: [ThemePreset; 4] = [
        ThemePreset::Mountain,
        ThemePreset::SnowMountain,
        ThemePreset::Desert,
        ThemePreset::Island,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ThemePreset::Mountain => "mountain",
            ThemePreset::SnowMountain => "snowmountain",
            ThemePreset::Desert => "desert",
            ThemePreset::Island => "island",
        }
    }

    /// Looks a preset up by its lowercase name.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Whether the preset can be used on the given shape.
    pub fn supports(self, shape: TerrainShape) -> bool {
        !(self == ThemePreset::Island && shape == TerrainShape::Sphere)
    }

    /// Band table for this preset on the given shape.
    pub fn theme(self, shape: TerrainShape) -> Theme {
        let band = ThemeBand::from_rgba8;
        let (bands, policy) = match (self, shape) {
            (ThemePreset::Mountain, TerrainShape::Flat) => (
                vec![
                    band([25, 47, 96, 255], Some(0.55)),
                    band([38, 73, 157, 255], Some(0.6)),
                    band([111, 84, 54, 255], Some(0.63)),
                    band([0, 51, 25, 255], Some(0.8)),
                    band([0, 102, 49, 255], Some(1.0)),
                    band([0, 133, 54, 255], None),
                ],
                HeightPolicy::ClampToLowestBand,
            ),
            (ThemePreset::Mountain, TerrainShape::Sphere) => (
                vec![
                    band([25, 47, 96, 255], Some(0.68)),
                    band([38, 73, 157, 255], Some(0.73)),
                    band([111, 84, 54, 255], Some(0.75)),
                    band([0, 51, 25, 255], Some(0.8)),
                    band([0, 102, 49, 255], Some(0.95)),
                    band([0, 133, 54, 255], None),
                ],
                HeightPolicy::ClampToLowestBand,
            ),
            (ThemePreset::SnowMountain, _) => (
                vec![
                    band([3, 51, 102, 255], Some(0.43)),
                    band([38, 73, 157, 255], Some(0.5)),
                    band([130, 205, 221, 255], Some(0.6)),
                    band([102, 102, 102, 255], Some(0.8)),
                    band([51, 51, 51, 255], Some(0.9)),
                    band([255, 255, 255, 255], None),
                ],
                HeightPolicy::ClampToLowestBand,
            ),
            (ThemePreset::Desert, _) => (
                vec![
                    band([237, 209, 142, 255], Some(0.45)),
                    band([250, 197, 89, 255], Some(0.6)),
                    band([153, 96, 49, 255], Some(0.85)),
                    band([108, 53, 36, 255], Some(1.1)),
                    band([51, 39, 16, 255], None),
                ],
                HeightPolicy::ClampToLowestBand,
            ),
            (ThemePreset::Island, _) => (
                vec![
                    band([0, 104, 183, 255], Some(0.0)),
                    band([255, 247, 153, 255], Some(0.15)),
                    band([128, 120, 92, 255], Some(0.22)),
                    band([0, 102, 46, 255], Some(0.4)),
                    band([0, 128, 57, 255], None),
                ],
                HeightPolicy::Island { floor: ISLAND_FLOOR },
            ),
        };

        Self::build(self.name(), bands, policy)
    }

    fn build(name: &str, bands: Vec<ThemeBand>, policy: HeightPolicy) -> Theme {
        // Preset tables are fixed and ascending; skip re-validation.
        Theme {
            name: name.to_string(),
            bands,
            height_policy: policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_theme() -> Theme {
        Theme::new(
            "test",
            vec![
                ThemeBand::new(0.2, [1.0, 0.0, 0.0, 1.0]),
                ThemeBand::new(0.5, [0.0, 1.0, 0.0, 1.0]),
                ThemeBand::catch_all([0.0, 0.0, 1.0, 1.0]),
            ],
            HeightPolicy::ClampToLowestBand,
        )
        .unwrap()
    }

    #[test]
    fn test_color_for_uses_smallest_threshold_at_or_above() {
        let theme = simple_theme();
        assert_eq!(theme.color_for(-3.0), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(theme.color_for(0.2), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(theme.color_for(0.21), [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(theme.color_for(0.5), [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(theme.color_for(0.51), [0.0, 0.0, 1.0, 1.0]);
        assert_eq!(theme.color_for(100.0), [0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_band_index_is_monotonic_for_every_preset() {
        for preset in ThemePreset::ALL {
            for shape in [TerrainShape::Flat, TerrainShape::Sphere] {
                let theme = preset.theme(shape);
                let mut last = 0;
                for i in -100..300 {
                    let idx = theme.band_index(i as f32 * 0.01);
                    assert!(idx >= last, "{} band index went down at {}", theme.name(), i);
                    last = idx;
                }
                let top = theme.bands().len() - 1;
                assert_eq!(theme.band_index(10.0), top);
                assert_eq!(theme.color_for(10.0), theme.bands()[top].rgba);
            }
        }
    }

    #[test]
    fn test_presets_pass_validation() {
        for preset in ThemePreset::ALL {
            for shape in [TerrainShape::Flat, TerrainShape::Sphere] {
                let theme = preset.theme(shape);
                let rebuilt = Theme::new(theme.name(), theme.bands().to_vec(), theme.height_policy());
                assert!(rebuilt.is_ok(), "{} preset is malformed: {:?}", theme.name(), rebuilt);
            }
        }
    }

    #[test]
    fn test_lowest_threshold() {
        assert_eq!(simple_theme().lowest_threshold(), 0.2);
        assert_eq!(ThemePreset::Mountain.theme(TerrainShape::Sphere).lowest_threshold(), 0.68);
        assert_eq!(ThemePreset::Mountain.theme(TerrainShape::Flat).lowest_threshold(), 0.55);

        let only_top = Theme::new(
            "flat",
            vec![ThemeBand::catch_all([1.0; 4])],
            HeightPolicy::ClampToLowestBand,
        )
        .unwrap();
        assert_eq!(only_top.lowest_threshold(), f32::NEG_INFINITY);
    }

    #[test]
    fn test_rejects_malformed_tables() {
        let red = [1.0, 0.0, 0.0, 1.0];
        let policy = HeightPolicy::ClampToLowestBand;

        assert_eq!(Theme::new("e", vec![], policy), Err(ThemeError::Empty("e".into())));
        assert_eq!(
            Theme::new("m", vec![ThemeBand::new(0.1, red)], policy),
            Err(ThemeError::MissingCatchAll("m".into()))
        );
        assert_eq!(
            Theme::new("c", vec![ThemeBand::catch_all(red), ThemeBand::catch_all(red)], policy),
            Err(ThemeError::CatchAllNotLast("c".into(), 0))
        );
        assert_eq!(
            Theme::new(
                "a",
                vec![ThemeBand::new(0.5, red), ThemeBand::new(0.5, red), ThemeBand::catch_all(red)],
                policy
            ),
            Err(ThemeError::NotAscending("a".into(), 1))
        );
        assert_eq!(
            Theme::new("n", vec![ThemeBand::new(f32::NAN, red), ThemeBand::catch_all(red)], policy),
            Err(ThemeError::NonFiniteThreshold("n".into(), 0))
        );
    }

    #[test]
    fn test_deserialize_validates_bands() {
        let empty = r#"{ "name": "e", "bands": [], "height_policy": "ClampToLowestBand" }"#;
        let err = serde_json::from_str::<Theme>(empty).unwrap_err();
        assert!(err.to_string().contains("has no bands"), "{}", err);

        let no_top = r#"{
            "name": "m",
            "bands": [{ "threshold": 0.4, "rgba": [1.0, 1.0, 1.0, 1.0] }],
            "height_policy": "ClampToLowestBand"
        }"#;
        assert!(serde_json::from_str::<Theme>(no_top).is_err());

        let theme = simple_theme();
        let json = serde_json::to_string(&theme).unwrap();
        assert_eq!(serde_json::from_str::<Theme>(&json).unwrap(), theme);
    }

    #[test]
    fn test_island_preset_uses_island_policy() {
        let theme = ThemePreset::Island.theme(TerrainShape::Flat);
        assert_eq!(theme.height_policy(), HeightPolicy::Island { floor: ISLAND_FLOOR });
        assert!(!ThemePreset::Island.supports(TerrainShape::Sphere));
        assert!(ThemePreset::Desert.supports(TerrainShape::Sphere));
    }

    #[test]
    fn test_preset_lookup_by_name() {
        assert_eq!(ThemePreset::from_name("SnowMountain"), Some(ThemePreset::SnowMountain));
        assert_eq!(ThemePreset::from_name("volcano"), None);
    }
}
