//! Lengths with units and their resolution to pixels.

use std::fmt;
use std::str::FromStr;

use crate::errors::DimensionParseError;
use crate::geometry::{greater_or_equal_to_infinity, OptionalSizeF, SizeF};

/// Length units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DimensionUnit {
    /// Physical pixels
    Px,
    /// Virtual (density independent) pixels, scaled by the dip scale
    #[default]
    Vp,
    /// Font pixels, scaled by the font scale
    Fp,
    /// Logical pixels, scaled by the design-width ratio
    Lpx,
    /// Fraction of the percent reference. Stored as a fraction (0.5 = 50%)
    Percent,
}

impl DimensionUnit {
    /// Unit suffix used in serialized lengths.
    pub fn suffix(&self) -> &'static str {
        match self {
            DimensionUnit::Px => "px",
            DimensionUnit::Vp => "vp",
            DimensionUnit::Fp => "fp",
            DimensionUnit::Lpx => "lpx",
            DimensionUnit::Percent => "%",
        }
    }
}

/// Scale factors used to convert non-pixel units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScaleProperty {
    pub vp_scale: f32,
    pub fp_scale: f32,
    pub lpx_scale: f32,
}

impl ScaleProperty {
    pub const fn new(vp_scale: f32, fp_scale: f32, lpx_scale: f32) -> Self {
        Self { vp_scale, fp_scale, lpx_scale }
    }
}

impl Default for ScaleProperty {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

/// A length value with unit. May also be used unset (as `Option<CalcLength>`),
/// which is distinct from a zero length.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalcLength {
    pub value: f64,
    pub unit: DimensionUnit,
}

impl CalcLength {
    pub const fn new(value: f64, unit: DimensionUnit) -> Self {
        Self { value, unit }
    }

    pub const fn px(value: f64) -> Self {
        Self::new(value, DimensionUnit::Px)
    }

    pub const fn vp(value: f64) -> Self {
        Self::new(value, DimensionUnit::Vp)
    }

    pub const fn fp(value: f64) -> Self {
        Self::new(value, DimensionUnit::Fp)
    }

    pub const fn lpx(value: f64) -> Self {
        Self::new(value, DimensionUnit::Lpx)
    }

    /// A percentage given as a fraction of the reference.
    pub const fn percent(fraction: f64) -> Self {
        Self::new(fraction, DimensionUnit::Percent)
    }

    pub fn is_percent(&self) -> bool {
        self.unit == DimensionUnit::Percent
    }

    pub fn is_negative(&self) -> bool {
        self.value < 0.0
    }

    /// Resolve to pixels.
    ///
    /// Returns `None` when the result is not finite, or for a percentage whose
    /// reference is negative or unbounded.
    pub fn to_px(&self, scale: &ScaleProperty, percent_reference: f32) -> Option<f32> {
        let px = match self.unit {
            DimensionUnit::Px => self.value,
            DimensionUnit::Vp => self.value * scale.vp_scale as f64,
            DimensionUnit::Fp => self.value * scale.fp_scale as f64,
            DimensionUnit::Lpx => self.value * scale.lpx_scale as f64,
            DimensionUnit::Percent => {
                if percent_reference < 0.0 || greater_or_equal_to_infinity(percent_reference) {
                    return None;
                }
                self.value * percent_reference as f64
            }
        };
        let px = px as f32;
        px.is_finite().then_some(px)
    }
}

impl fmt::Display for CalcLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = if self.is_percent() { self.value * 100.0 } else { self.value };
        write!(f, "{:.2}{}", shown, self.unit.suffix())
    }
}

impl FromStr for CalcLength {
    type Err = DimensionParseError;

    /// Parse `"12.00vp"`, `"3px"`, `"50%"`. A bare number is taken as pixels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DimensionParseError::Empty);
        }
        let split = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
            .unwrap_or(s.len());
        let (number, suffix) = s.split_at(split);
        let value: f64 = number.parse().map_err(|_| DimensionParseError::InvalidNumber {
            value: number.to_string(),
        })?;
        if !value.is_finite() {
            return Err(DimensionParseError::NonFinite { value: s.to_string() });
        }
        let unit = match suffix.trim() {
            "" | "px" => DimensionUnit::Px,
            "vp" => DimensionUnit::Vp,
            "fp" => DimensionUnit::Fp,
            "lpx" => DimensionUnit::Lpx,
            "%" => return Ok(Self::percent(value / 100.0)),
            other => {
                return Err(DimensionParseError::UnknownUnit { unit: other.to_string() });
            }
        };
        Ok(Self::new(value, unit))
    }
}

/// A width/height pair of optional lengths.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalcSize {
    pub width: Option<CalcLength>,
    pub height: Option<CalcLength>,
}

impl CalcSize {
    pub const fn new(width: Option<CalcLength>, height: Option<CalcLength>) -> Self {
        Self { width, height }
    }

    /// Both axes are set.
    pub fn is_valid(&self) -> bool {
        self.width.is_some() && self.height.is_some()
    }

    pub fn is_null(&self) -> bool {
        self.width.is_none() && self.height.is_none()
    }

    /// Overwrite the axes that `other` sets. Returns whether anything changed.
    pub fn update_size_with_check(&mut self, other: &CalcSize) -> bool {
        let merged = CalcSize::new(
            other.width.or(self.width),
            other.height.or(self.height),
        );
        if merged == *self {
            return false;
        }
        *self = merged;
        true
    }

    /// Resolve set axes to pixels. Axes that fail to resolve stay unset.
    pub fn to_optional_px(&self, scale: &ScaleProperty, percent_reference: SizeF) -> OptionalSizeF {
        OptionalSizeF::new(
            self.width.and_then(|w| w.to_px(scale, percent_reference.width)),
            self.height.and_then(|h| h.to_px(scale, percent_reference.height)),
        )
    }

    /// Resolve to pixels, using `-1` for unset or unresolvable axes.
    pub fn to_px_or_negative(&self, scale: &ScaleProperty, percent_reference: SizeF) -> SizeF {
        self.to_optional_px(scale, percent_reference)
            .with_default(SizeF::new(-1.0, -1.0))
    }
}
