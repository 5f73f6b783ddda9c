use std::path::PathBuf;
use std::time::Duration;

use bon::Builder;

use crate::error::{ClockError, Result};

// ============================================================================
// COLORS
// ============================================================================

/// Color representation for face and hand elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rgb` or `#rrggbb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if !digits.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            3 => {
                let r = channel(&digits[0..1])?;
                let g = channel(&digits[1..2])?;
                let b = channel(&digits[2..3])?;
                Some(Self::new(r * 0x11, g * 0x11, b * 0x11))
            }
            6 => Some(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => None,
        }
    }
}

// ============================================================================
// STATIC TABLES
// ============================================================================

/// Raw theme entry as written in the built-in table.
#[derive(Debug, Clone, Copy)]
pub struct ThemeSpec {
    pub name: &'static str,
    pub background: &'static str,
    pub dial: &'static str,
    pub marks: &'static str,
    pub hour_hand: &'static str,
    pub minute_hand: &'static str,
    pub second_hand: &'static str,
    pub aux_hand: &'static str,
}

/// Raw city entry as written in the built-in table.
#[derive(Debug, Clone, Copy)]
pub struct CitySpec {
    pub name: &'static str,
    pub utc_offset_hours: i32,
}

pub const THEMES: [ThemeSpec; 3] = [
    ThemeSpec {
        name: "Black",
        background: "#0b0b0b",
        dial: "#070707",
        marks: "#e9e9e9",
        hour_hand: "#dcdcdc",
        minute_hand: "#f8f8f8",
        second_hand: "#ff5555",
        aux_hand: "#aaaaee",
    },
    ThemeSpec {
        name: "Green",
        background: "#002b1f",
        dial: "#380066",
        marks: "#e9e9e9",
        hour_hand: "#ffffff",
        minute_hand: "#ccffcc",
        second_hand: "#ff3333",
        aux_hand: "#66ff66",
    },
    ThemeSpec {
        name: "Purple",
        background: "#2b003f",
        dial: "#002b66",
        marks: "#f0f0f0",
        hour_hand: "#ba66ff",
        minute_hand: "#ba66ff",
        second_hand: "#38014e",
        aux_hand: "#9c33ff",
    },
];

pub const CITIES: [CitySpec; 4] = [
    CitySpec {
        name: "Bogotá",
        utc_offset_hours: -5,
    },
    CitySpec {
        name: "New York",
        utc_offset_hours: -4,
    },
    CitySpec {
        name: "London",
        utc_offset_hours: 0,
    },
    CitySpec {
        name: "Tokyo",
        utc_offset_hours: 9,
    },
];

pub const DEFAULT_THEME: &str = "Black";
pub const DEFAULT_CITY: &str = "Bogotá";

// ============================================================================
// VALIDATED CATALOG
// ============================================================================

/// A fully parsed, immutable color theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: String,
    pub background: Color,
    pub dial: Color,
    pub marks: Color,
    pub hour_hand: Color,
    pub minute_hand: Color,
    pub second_hand: Color,
    pub aux_hand: Color,
}

impl Theme {
    pub fn from_spec(spec: &ThemeSpec) -> Result<Self> {
        let parse = |field: &'static str, value: &str| {
            Color::from_hex(value).ok_or_else(|| ClockError::InvalidColor {
                theme: spec.name.to_string(),
                field,
                value: value.to_string(),
            })
        };
        Ok(Self {
            name: spec.name.to_string(),
            background: parse("background", spec.background)?,
            dial: parse("dial", spec.dial)?,
            marks: parse("marks", spec.marks)?,
            hour_hand: parse("hour hand", spec.hour_hand)?,
            minute_hand: parse("minute hand", spec.minute_hand)?,
            second_hand: parse("second hand", spec.second_hand)?,
            aux_hand: parse("aux hand", spec.aux_hand)?,
        })
    }
}

/// A world city and its whole-hour offset from UTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityOffset {
    pub name: String,
    pub utc_offset_hours: i32,
}

impl CityOffset {
    pub const OFFSET_RANGE: std::ops::RangeInclusive<i32> = -12..=14;

    pub fn from_spec(spec: &CitySpec) -> Result<Self> {
        if !Self::OFFSET_RANGE.contains(&spec.utc_offset_hours) {
            return Err(ClockError::InvalidOffset {
                city: spec.name.to_string(),
                hours: spec.utc_offset_hours,
            });
        }
        Ok(Self {
            name: spec.name.to_string(),
            utc_offset_hours: spec.utc_offset_hours,
        })
    }
}

/// The closed set of selectable themes and cities, validated once at startup.
#[derive(Debug, Clone)]
pub struct Catalog {
    themes: Vec<Theme>,
    cities: Vec<CityOffset>,
}

impl Catalog {
    pub fn builtin() -> Result<Self> {
        Self::from_tables(&THEMES, &CITIES)
    }

    pub fn from_tables(themes: &[ThemeSpec], cities: &[CitySpec]) -> Result<Self> {
        let themes = themes
            .iter()
            .map(Theme::from_spec)
            .collect::<Result<Vec<_>>>()?;
        let cities = cities
            .iter()
            .map(CityOffset::from_spec)
            .collect::<Result<Vec<_>>>()?;

        if let Some(name) = first_duplicate(themes.iter().map(|t| t.name.as_str())) {
            return Err(ClockError::DuplicateName { kind: "theme", name });
        }
        if let Some(name) = first_duplicate(cities.iter().map(|c| c.name.as_str())) {
            return Err(ClockError::DuplicateName { kind: "city", name });
        }

        Ok(Self { themes, cities })
    }

    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    pub fn cities(&self) -> &[CityOffset] {
        &self.cities
    }

    pub fn theme_index(&self, name: &str) -> Result<usize> {
        self.themes
            .iter()
            .position(|t| t.name == name)
            .ok_or_else(|| ClockError::UnknownTheme(name.to_string()))
    }

    pub fn city_index(&self, name: &str) -> Result<usize> {
        self.cities
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| ClockError::UnknownCity(name.to_string()))
    }
}

fn first_duplicate<'a>(names: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut seen = std::collections::HashSet::new();
    names
        .into_iter()
        .find(|name| !seen.insert(*name))
        .map(str::to_string)
}

// ============================================================================
// FACE & WINDOW CONFIGURATION
// ============================================================================

/// A decorative label printed on the face, offset vertically from the center.
#[derive(Debug, Clone)]
pub struct FaceLabel {
    pub text: String,
    pub dy: f64,
    pub size: f32,
}

impl FaceLabel {
    pub fn new(text: &str, dy: f64, size: f32) -> Self {
        Self {
            text: text.to_string(),
            dy,
            size,
        }
    }
}

fn default_face_labels() -> Vec<FaceLabel> {
    vec![
        FaceLabel::new("MERIDIAN", -60.0, 22.0),
        FaceLabel::new("PERPETUAL DATE", -34.0, 9.0),
        FaceLabel::new("GMT MASTER", 36.0, 10.0),
        FaceLabel::new("MULTIZONE CERTIFIED", 54.0, 8.0),
    ]
}

#[derive(Debug, Clone, Builder)]
pub struct ClockConfig {
    #[builder(default = "World Clock".to_string())]
    pub title: String,

    // Window configuration
    #[builder(default = 480)]
    pub window_width: usize,
    #[builder(default = 640)]
    pub window_height: usize,

    // Face configuration
    #[builder(default = 200.0)]
    pub radius: f64,
    #[builder(default = 40.0)]
    pub center_lift: f64,
    #[builder(default = default_face_labels())]
    pub face_labels: Vec<FaceLabel>,

    // Tick cadence
    #[builder(default = Duration::from_millis(100))]
    pub tick_interval: Duration,

    // Initial selection
    #[builder(default = DEFAULT_THEME.to_string())]
    pub default_theme: String,
    #[builder(default = DEFAULT_CITY.to_string())]
    pub default_city: String,

    // Font configuration
    pub font_path: Option<PathBuf>,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_hex() {
        assert_eq!(Color::from_hex("#666"), Some(Color::new(0x66, 0x66, 0x66)));
        assert_eq!(Color::from_hex("#ff5555"), Some(Color::new(0xff, 0x55, 0x55)));
        assert_eq!(Color::from_hex("ff5555"), None);
        assert_eq!(Color::from_hex("#ff55"), None);
        assert_eq!(Color::from_hex("#gg0000"), None);
    }

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.themes().len(), 3);
        assert_eq!(catalog.cities().len(), 4);
        assert!(catalog.theme_index(DEFAULT_THEME).is_ok());
        assert!(catalog.city_index(DEFAULT_CITY).is_ok());
        assert_eq!(
            catalog.cities()[catalog.city_index("Tokyo").unwrap()].utc_offset_hours,
            9
        );
    }

    #[test]
    fn malformed_color_fails_validation() {
        let mut bad = THEMES[0];
        bad.second_hand = "red";
        let err = Catalog::from_tables(&[bad], &CITIES).unwrap_err();
        assert!(matches!(
            err,
            ClockError::InvalidColor { field: "second hand", .. }
        ));
    }

    #[test]
    fn out_of_range_offset_fails_validation() {
        let bad = CitySpec {
            name: "Nowhere",
            utc_offset_hours: 15,
        };
        let err = Catalog::from_tables(&THEMES, &[bad]).unwrap_err();
        assert!(matches!(err, ClockError::InvalidOffset { hours: 15, .. }));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = Catalog::from_tables(&THEMES, &[CITIES[0], CITIES[0]]).unwrap_err();
        assert!(matches!(err, ClockError::DuplicateName { kind: "city", .. }));
    }

    #[test]
    fn unknown_lookup_is_an_error() {
        let catalog = Catalog::builtin().unwrap();
        assert!(matches!(
            catalog.theme_index("Gold"),
            Err(ClockError::UnknownTheme(_))
        ));
        assert!(matches!(
            catalog.city_index("Atlantis"),
            Err(ClockError::UnknownCity(_))
        ));
    }

    #[test]
    fn builder_defaults_match_the_face_layout() {
        let config = ClockConfig::builder().radius(150.0).build();
        assert_eq!(config.window_width, 480);
        assert_eq!(config.window_height, 640);
        assert_eq!(config.radius, 150.0);
        assert_eq!(config.tick_interval, Duration::from_millis(100));
        assert_eq!(config.face_labels.len(), 4);
        assert!(config.font_path.is_none());
    }
}
