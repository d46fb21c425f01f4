//! Parameter types for raster operations.
//!
//! These describe *what* to do, not *how*. [`OperationSpec`] is what callers
//! hand to [`ImageSession::apply`](crate::session::ImageSession::apply); the
//! pixel work lives in [`pixel_ops`](super::pixel_ops).
//!
//! ## Types
//!
//! - [`OperationSpec`]: one of the five transforms plus its parameters.
//! - [`RotateDirection`]: quarter-turn direction.
//! - [`Quality`]: JPEG encoding quality (1–100, default 90). Clamped on construction.

use crate::error::CoreError;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Threshold used when the caller gives no explicit value.
pub const DEFAULT_THRESHOLD: u8 = 128;

/// Quarter-turn rotation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotateDirection {
    /// Counter-clockwise, -90°.
    Left,
    /// Clockwise, +90°.
    Right,
}

impl RotateDirection {
    pub fn degrees(self) -> i32 {
        match self {
            Self::Left => -90,
            Self::Right => 90,
        }
    }
}

/// A transform request for [`ImageSession::apply`](crate::session::ImageSession::apply).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationSpec {
    Negative,
    Threshold { threshold: u8 },
    EdgeDetect,
    Resample { width: u32, height: u32 },
    Rotate { direction: RotateDirection },
}

impl OperationSpec {
    /// Build a threshold operation from an unchecked integer, rejecting values above 255.
    pub fn threshold(value: u32) -> Result<Self, CoreError> {
        u8::try_from(value)
            .map(|threshold| Self::Threshold { threshold })
            .map_err(|_| CoreError::InvalidThreshold(value))
    }

    /// Short human-readable name, used in audit entries and CLI output.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Negative => "negative",
            Self::Threshold { .. } => "threshold",
            Self::EdgeDetect => "edge detection",
            Self::Resample { .. } => "resize",
            Self::Rotate { .. } => "rotation",
        }
    }
}

impl fmt::Display for OperationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Negative => write!(f, "negative"),
            Self::Threshold { threshold } => write!(f, "threshold at {threshold}"),
            Self::EdgeDetect => write!(f, "edge detection"),
            Self::Resample { width, height } => write!(f, "resize to {width}x{height}"),
            Self::Rotate { direction } => write!(f, "rotate by {}°", direction.degrees()),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseOperationError {
    #[error("unknown operation '{0}' (expected negative, threshold[=N], edges, resize=WxH, rotate-left or rotate-right)")]
    Unknown(String),
    #[error("invalid threshold '{0}': expected an integer 0-255")]
    Threshold(String),
    #[error("invalid resize target '{0}': expected WIDTHxHEIGHT")]
    Resize(String),
}

/// Parses the CLI operation syntax:
/// `negative`, `threshold`, `threshold=N`, `edges`, `resize=WxH`,
/// `rotate-left`, `rotate-right`.
impl FromStr for OperationSpec {
    type Err = ParseOperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, arg) = match s.split_once('=') {
            Some((n, a)) => (n.trim(), Some(a.trim())),
            None => (s, None),
        };
        match (name.to_ascii_lowercase().as_str(), arg) {
            ("negative", None) => Ok(Self::Negative),
            ("threshold", None) => Ok(Self::Threshold {
                threshold: DEFAULT_THRESHOLD,
            }),
            ("threshold", Some(a)) => a
                .parse::<u32>()
                .ok()
                .and_then(|v| Self::threshold(v).ok())
                .ok_or_else(|| ParseOperationError::Threshold(a.to_string())),
            ("edges" | "contour", None) => Ok(Self::EdgeDetect),
            ("resize", Some(a)) => parse_dimensions(a)
                .map(|(width, height)| Self::Resample { width, height })
                .ok_or_else(|| ParseOperationError::Resize(a.to_string())),
            ("rotate-left", None) => Ok(Self::Rotate {
                direction: RotateDirection::Left,
            }),
            ("rotate-right", None) => Ok(Self::Rotate {
                direction: RotateDirection::Right,
            }),
            _ => Err(ParseOperationError::Unknown(s.to_string())),
        }
    }
}

/// Parse `WIDTHxHEIGHT` (digits only, `x` or `X` separator).
fn parse_dimensions(s: &str) -> Option<(u32, u32)> {
    let (w, h) = s.split_once(['x', 'X'])?;
    let digits = |v: &str| !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit());
    if !digits(w) || !digits(h) {
        return None;
    }
    Some((w.parse().ok()?, h.parse().ok()?))
}

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u8);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // OperationSpec::threshold
    // =========================================================================

    #[test]
    fn threshold_accepts_full_byte_range() {
        assert_eq!(
            OperationSpec::threshold(0),
            Ok(OperationSpec::Threshold { threshold: 0 })
        );
        assert_eq!(
            OperationSpec::threshold(255),
            Ok(OperationSpec::Threshold { threshold: 255 })
        );
    }

    #[test]
    fn threshold_rejects_256() {
        assert_eq!(
            OperationSpec::threshold(256),
            Err(CoreError::InvalidThreshold(256))
        );
    }

    // =========================================================================
    // FromStr
    // =========================================================================

    #[test]
    fn parse_simple_operations() {
        assert_eq!("negative".parse(), Ok(OperationSpec::Negative));
        assert_eq!("edges".parse(), Ok(OperationSpec::EdgeDetect));
        assert_eq!("contour".parse(), Ok(OperationSpec::EdgeDetect));
        assert_eq!(
            "rotate-left".parse(),
            Ok(OperationSpec::Rotate {
                direction: RotateDirection::Left
            })
        );
        assert_eq!(
            "Rotate-Right".parse(),
            Ok(OperationSpec::Rotate {
                direction: RotateDirection::Right
            })
        );
    }

    #[test]
    fn parse_threshold_defaults_to_128() {
        assert_eq!(
            "threshold".parse(),
            Ok(OperationSpec::Threshold { threshold: 128 })
        );
    }

    #[test]
    fn parse_threshold_with_value() {
        assert_eq!(
            "threshold=40".parse(),
            Ok(OperationSpec::Threshold { threshold: 40 })
        );
    }

    #[test]
    fn parse_threshold_out_of_range() {
        assert_eq!(
            "threshold=256".parse::<OperationSpec>(),
            Err(ParseOperationError::Threshold("256".into()))
        );
        assert!("threshold=-1".parse::<OperationSpec>().is_err());
    }

    #[test]
    fn parse_resize() {
        assert_eq!(
            "resize=800x600".parse(),
            Ok(OperationSpec::Resample {
                width: 800,
                height: 600
            })
        );
        assert_eq!(
            "resize=10X20".parse(),
            Ok(OperationSpec::Resample {
                width: 10,
                height: 20
            })
        );
    }

    #[test]
    fn parse_resize_rejects_malformed_targets() {
        for bad in ["resize", "resize=800", "resize=x600", "resize=+8x6", "resize=8x6x2"] {
            assert!(bad.parse::<OperationSpec>().is_err(), "{bad} should fail");
        }
    }

    #[test]
    fn parse_unknown_operation() {
        assert!(matches!(
            "blur".parse::<OperationSpec>(),
            Err(ParseOperationError::Unknown(_))
        ));
        assert!("negative=3".parse::<OperationSpec>().is_err());
    }

    // =========================================================================
    // Display / direction helpers
    // =========================================================================

    #[test]
    fn display_rotation_uses_signed_degrees() {
        let op = OperationSpec::Rotate {
            direction: RotateDirection::Left,
        };
        assert_eq!(op.to_string(), "rotate by -90°");
        assert_eq!(op.name(), "rotation");
    }

    #[test]
    fn direction_degrees() {
        assert_eq!(RotateDirection::Left.degrees(), -90);
        assert_eq!(RotateDirection::Right.degrees(), 90);
    }

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_90() {
        assert_eq!(Quality::default().value(), 90);
    }
}
