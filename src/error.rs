use std::path::PathBuf;

/// Every failure the clock can surface.
///
/// Configuration variants are raised either at startup, when the static theme
/// and city tables are validated, or at selection time, when a name that is not
/// in the catalog is requested. `ClockSource` is fatal: there is no fallback
/// clock.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    #[error("unknown theme: {0}")]
    UnknownTheme(String),
    #[error("unknown city: {0}")]
    UnknownCity(String),
    #[error("theme {theme}: invalid {field} color {value:?}")]
    InvalidColor {
        theme: String,
        field: &'static str,
        value: String,
    },
    #[error("city {city}: utc offset {hours}h is outside -12..=14")]
    InvalidOffset { city: String, hours: i32 },
    #[error("duplicate {kind} name: {name}")]
    DuplicateName { kind: &'static str, name: String },
    #[error("could not load font from {}", path.display())]
    Font { path: PathBuf },
    #[error("system time unavailable: {0}")]
    ClockSource(String),
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("window error: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("frame buffer error: {0}")]
    Pixels(#[from] pixels::Error),
}

impl ClockError {
    /// True for errors caused by the theme/city tables or a bad selection.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnknownTheme(_)
                | Self::UnknownCity(_)
                | Self::InvalidColor { .. }
                | Self::InvalidOffset { .. }
                | Self::DuplicateName { .. }
                | Self::Font { .. }
        )
    }
}

pub type Result<T, E = ClockError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_errors_are_configuration_errors() {
        assert!(ClockError::UnknownTheme("Gold".into()).is_configuration());
        assert!(ClockError::UnknownCity("Atlantis".into()).is_configuration());
        assert!(!ClockError::ClockSource("before epoch".into()).is_configuration());
    }

    #[test]
    fn messages_name_the_offending_value() {
        let err = ClockError::InvalidOffset {
            city: "Nowhere".into(),
            hours: 20,
        };
        assert_eq!(err.to_string(), "city Nowhere: utc offset 20h is outside -12..=14");
    }
}
