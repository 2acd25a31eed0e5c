use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AspectRatioError {
    #[error("aspect ratio `{0}` is not a number or a `W/H` pair")]
    Unparseable(String),
    #[error("aspect ratio must be finite and positive, got {0}")]
    NonPositive(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectPreset {
    Ratio16x9,
    Ratio21x9,
    Ratio4x3,
    Ratio1x1,
    Ratio9x16,
}

impl AspectPreset {
    pub const ALL: [AspectPreset; 5] = [
        Self::Ratio16x9,
        Self::Ratio21x9,
        Self::Ratio4x3,
        Self::Ratio1x1,
        Self::Ratio9x16,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Ratio16x9 => "16/9",
            Self::Ratio21x9 => "21/9",
            Self::Ratio4x3 => "4/3",
            Self::Ratio1x1 => "1/1",
            Self::Ratio9x16 => "9/16",
        }
    }

    pub const fn ratio(self) -> (u32, u32) {
        match self {
            Self::Ratio16x9 => (16, 9),
            Self::Ratio21x9 => (21, 9),
            Self::Ratio4x3 => (4, 3),
            Self::Ratio1x1 => (1, 1),
            Self::Ratio9x16 => (9, 16),
        }
    }

    pub fn value(self) -> f64 {
        let (width, height) = self.ratio();
        f64::from(width) / f64::from(height)
    }

    /// Preset whose ratio equals `value`, however it was written.
    fn matching(value: f64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|preset| (preset.value() - value).abs() <= PRESET_TOLERANCE * value)
    }
}

const PRESET_TOLERANCE: f64 = 1e-9;

/// Target shape of the crop rectangle, `width / height`.
///
/// Consumers pass either one of the named presets (`"16/9"`, `"21/9"`,
/// `"4/3"`, ...) or a bare float.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAspectRatio", into = "RawAspectRatio")]
pub enum AspectRatio {
    Preset(AspectPreset),
    Custom(f64),
}

impl AspectRatio {
    /// Validates a raw `width / height` value. Values equal to a preset come
    /// back as that preset so they serialize under its label.
    pub fn custom(value: f64) -> Result<Self, AspectRatioError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(AspectRatioError::NonPositive(value));
        }
        Ok(AspectPreset::matching(value).map_or(Self::Custom(value), Self::Preset))
    }

    pub fn value(self) -> f64 {
        match self {
            Self::Preset(preset) => preset.value(),
            Self::Custom(value) => value,
        }
    }

    pub const fn preset(self) -> Option<AspectPreset> {
        match self {
            Self::Preset(preset) => Some(preset),
            Self::Custom(_) => None,
        }
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::Preset(AspectPreset::Ratio16x9)
    }
}

impl From<AspectPreset> for AspectRatio {
    fn from(preset: AspectPreset) -> Self {
        Self::Preset(preset)
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preset(preset) => f.write_str(preset.label()),
            Self::Custom(value) => write!(f, "{value}"),
        }
    }
}

impl FromStr for AspectRatio {
    type Err = AspectRatioError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let unparseable = || AspectRatioError::Unparseable(input.to_string());

        let Some((width, height)) = trimmed.split_once(['/', ':']) else {
            let value = trimmed.parse::<f64>().map_err(|_| unparseable())?;
            return Self::custom(value);
        };

        let width = width.trim().parse::<f64>().map_err(|_| unparseable())?;
        let height = height.trim().parse::<f64>().map_err(|_| unparseable())?;
        if !height.is_finite() || height <= 0.0 {
            return Err(AspectRatioError::NonPositive(height));
        }
        Self::custom(width / height)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawAspectRatio {
    Number(f64),
    Text(String),
}

impl TryFrom<RawAspectRatio> for AspectRatio {
    type Error = AspectRatioError;

    fn try_from(raw: RawAspectRatio) -> Result<Self, Self::Error> {
        match raw {
            RawAspectRatio::Number(value) => Self::custom(value),
            RawAspectRatio::Text(text) => text.parse(),
        }
    }
}

impl From<AspectRatio> for RawAspectRatio {
    fn from(ratio: AspectRatio) -> Self {
        match ratio {
            AspectRatio::Preset(preset) => Self::Text(preset.label().to_string()),
            AspectRatio::Custom(value) => Self::Number(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_sixteen_by_nine() {
        assert_eq!(
            AspectRatio::default(),
            AspectRatio::Preset(AspectPreset::Ratio16x9)
        );
        assert_eq!(AspectRatio::default().to_string(), "16/9");
    }

    #[test]
    fn parses_observed_preset_strings() {
        assert_eq!(
            "16/9".parse::<AspectRatio>(),
            Ok(AspectPreset::Ratio16x9.into())
        );
        assert_eq!(
            "21/9".parse::<AspectRatio>(),
            Ok(AspectPreset::Ratio21x9.into())
        );
        assert_eq!(" 4:3 ".parse::<AspectRatio>(), Ok(AspectPreset::Ratio4x3.into()));
    }

    #[test]
    fn parses_floats_and_unknown_pairs_as_custom() {
        assert_eq!("1.5".parse::<AspectRatio>(), Ok(AspectRatio::Custom(1.5)));
        assert_eq!("3/2".parse::<AspectRatio>(), Ok(AspectRatio::Custom(1.5)));
    }

    #[test]
    fn equivalent_forms_of_a_preset_resolve_to_the_preset() {
        for input in ["32/18", "16/9.0", "1.7777777777777777", "32:18"] {
            assert_eq!(
                input.parse::<AspectRatio>(),
                Ok(AspectPreset::Ratio16x9.into()),
                "{input}"
            );
        }
        assert_eq!(AspectRatio::custom(1.0), Ok(AspectPreset::Ratio1x1.into()));

        let from_number: AspectRatio =
            serde_json::from_str("1.7777777777777777").expect("number");
        assert_eq!(
            serde_json::to_string(&from_number).expect("serialize"),
            r#""16/9""#
        );
    }

    #[test]
    fn rejects_garbage_and_non_positive_values() {
        assert!(matches!(
            "wide".parse::<AspectRatio>(),
            Err(AspectRatioError::Unparseable(_))
        ));
        assert!(matches!(
            "16/0".parse::<AspectRatio>(),
            Err(AspectRatioError::NonPositive(_))
        ));
        assert!(matches!(
            "-2".parse::<AspectRatio>(),
            Err(AspectRatioError::NonPositive(_))
        ));
        assert!(AspectRatio::custom(f64::NAN).is_err());
    }

    #[test]
    fn serde_accepts_number_or_preset_string() {
        let preset: AspectRatio = serde_json::from_str(r#""21/9""#).expect("preset string");
        assert_eq!(preset, AspectPreset::Ratio21x9.into());

        let custom: AspectRatio = serde_json::from_str("2.0").expect("number");
        assert_eq!(custom, AspectRatio::Custom(2.0));

        assert_eq!(
            serde_json::to_string(&AspectRatio::from(AspectPreset::Ratio4x3)).expect("serialize"),
            r#""4/3""#
        );
        assert!(serde_json::from_str::<AspectRatio>("0").is_err());
    }

    #[test]
    fn preset_values_match_their_pairs() {
        for preset in AspectPreset::ALL {
            let (w, h) = preset.ratio();
            assert_eq!(preset.value(), f64::from(w) / f64::from(h));
        }
    }
}
