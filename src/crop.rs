//! Smart crop computation.
//!
//! Fits a source of arbitrary size to a target [`SizeSpec`] by cutting away
//! the overflow on one axis. Pure geometry: no pixels are touched.
//!
//! ```
//! use platform_export_core::crop::{calculate_smart_crop, CropOptions, CropRegion};
//! use platform_export_core::SizeSpec;
//!
//! let square = SizeSpec::new("Square 1:1", 1080, 1080, "1:1");
//! let result = calculate_smart_crop(1920.0, 1080.0, &square, &CropOptions::default()).unwrap();
//!
//! assert!(result.needs_crop);
//! assert_eq!(result.crop_region, CropRegion::new(420.0, 0.0, 1080.0, 1080.0));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;
use crate::platforms::{SafeZone, SizeSpec};

/// Ratios closer than this are treated as equal.
pub const RATIO_EPSILON: f64 = 0.01;

/// How the kept window is positioned along the cropped axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropStrategy {
    /// Keep the middle.
    #[default]
    Center,
    /// Center on [`CropOptions::focus_point`], clamped to the source.
    Focus,
    /// Centered for wide sources; biased towards the top third for tall ones.
    Smart,
}

impl fmt::Display for CropStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Center => "center",
            Self::Focus => "focus",
            Self::Smart => "smart",
        })
    }
}

impl FromStr for CropStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "center" => Ok(Self::Center),
            "focus" => Ok(Self::Focus),
            "smart" => Ok(Self::Smart),
            other => Err(format!(
                "unknown crop strategy '{other}' (expected center, focus or smart)"
            )),
        }
    }
}

/// Normalized point in the source. `(0.0, 0.0)` is top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocusPoint {
    pub x: f64,
    pub y: f64,
}

impl FocusPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Default for FocusPoint {
    fn default() -> Self {
        Self { x: 0.5, y: 0.5 }
    }
}

/// Crop options. Defaults: no safe zone, focus `(0.5, 0.5)`, [`CropStrategy::Center`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropOptions {
    /// Insets in target pixels.
    #[serde(default)]
    pub safe_zone: Option<SafeZone>,
    #[serde(default)]
    pub focus_point: FocusPoint,
    #[serde(default)]
    pub strategy: CropStrategy,
}

impl CropOptions {
    pub fn with_strategy(mut self, strategy: CropStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_focus(mut self, focus: FocusPoint) -> Self {
        self.focus_point = focus;
        self
    }

    pub fn with_safe_zone(mut self, zone: SafeZone) -> Self {
        self.safe_zone = Some(zone);
        self
    }
}

/// Rectangle in source pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRegion {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropResult {
    pub crop_region: CropRegion,
    /// Multiplier from the cropped region to the target, always `> 0`.
    pub scale: f64,
    pub needs_crop: bool,
    pub safe_zone_warnings: Vec<String>,
}

/// Compute the crop window and scale for fitting a source into `target`.
///
/// Returns [`EngineError::InvalidGeometry`] for non-positive or non-finite
/// source dimensions, a non-finite focus point and zero-width targets.
pub fn calculate_smart_crop(
    source_width: f64,
    source_height: f64,
    target: &SizeSpec,
    options: &CropOptions,
) -> Result<CropResult, EngineError> {
    validate_source(source_width, source_height)?;
    let focus = options.focus_point;
    if !(focus.x.is_finite() && focus.y.is_finite()) {
        return Err(EngineError::InvalidGeometry(format!(
            "focus point must be finite, got ({}, {})",
            focus.x, focus.y
        )));
    }
    if target.width == 0 {
        return Err(EngineError::InvalidGeometry(format!(
            "target size '{}' has zero width",
            target.name
        )));
    }

    let target_width = target.width as f64;
    let full = CropRegion::new(0.0, 0.0, source_width, source_height);

    // Long-scroll: width is fixed, height follows the source.
    if target.is_long_scroll() {
        return Ok(CropResult {
            crop_region: full,
            scale: target_width / source_width,
            needs_crop: false,
            safe_zone_warnings: vec![],
        });
    }

    let target_height = target.height as f64;
    let source_ratio = source_width / source_height;
    let target_ratio = target_width / target_height;

    if (source_ratio - target_ratio).abs() < RATIO_EPSILON {
        tracing::debug!(source_ratio, target_ratio, "ratios match, no crop");
        return Ok(CropResult {
            crop_region: full,
            scale: target_width / source_width,
            needs_crop: false,
            safe_zone_warnings: vec![],
        });
    }

    let (crop_region, scale) = if source_ratio > target_ratio {
        let new_width = (source_height * target_ratio).min(source_width);
        let slack = source_width - new_width;
        let x = match options.strategy {
            CropStrategy::Center | CropStrategy::Smart => slack / 2.0,
            CropStrategy::Focus => focus.x * source_width - new_width / 2.0,
        };
        let x = x.clamp(0.0, slack);
        (
            CropRegion::new(x, 0.0, new_width, source_height),
            target_width / new_width,
        )
    } else {
        let new_height = (source_width / target_ratio).min(source_height);
        let slack = source_height - new_height;
        let y = match options.strategy {
            CropStrategy::Center => slack / 2.0,
            CropStrategy::Focus => focus.y * source_height - new_height / 2.0,
            // Faces and products tend to sit in the upper part of portrait shots.
            CropStrategy::Smart => slack / 3.0,
        };
        let y = y.clamp(0.0, slack);
        (
            CropRegion::new(0.0, y, source_width, new_height),
            target_height / new_height,
        )
    };

    tracing::debug!(
        strategy = %options.strategy,
        x = crop_region.x,
        y = crop_region.y,
        width = crop_region.width,
        height = crop_region.height,
        scale,
        "crop computed"
    );

    let safe_zone_warnings = match &options.safe_zone {
        Some(zone) => clipping_warnings(&crop_region, source_width, source_height, zone, scale),
        None => vec![],
    };

    Ok(CropResult {
        crop_region,
        scale,
        needs_crop: true,
        safe_zone_warnings,
    })
}

fn validate_source(width: f64, height: f64) -> Result<(), EngineError> {
    if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
        return Err(EngineError::InvalidGeometry(format!(
            "source dimensions must be positive, got {width}x{height}"
        )));
    }
    Ok(())
}

/// Warn for each side where more is cut away than the safe zone would have
/// hidden anyway.
fn clipping_warnings(
    region: &CropRegion,
    source_width: f64,
    source_height: f64,
    zone: &SafeZone,
    scale: f64,
) -> Vec<String> {
    let inset = zone.scaled(1.0 / scale, 1.0 / scale);
    let sides = [
        ("top", region.y, inset.top),
        ("bottom", source_height - region.bottom(), inset.bottom),
        ("left", region.x, inset.left),
        ("right", source_width - region.right(), inset.right),
    ];

    sides
        .into_iter()
        .filter(|(_, offset, allowed)| offset > allowed)
        .map(|(side, _, _)| format!("{side} content may be clipped"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(w: u32, h: u32) -> SizeSpec {
        SizeSpec::new("test", w, h, "")
    }

    #[test]
    fn test_smart_is_center_for_wide_sources() {
        let target = size(1080, 1080);
        let center =
            calculate_smart_crop(1920.0, 1080.0, &target, &CropOptions::default()).unwrap();
        let smart = calculate_smart_crop(
            1920.0,
            1080.0,
            &target,
            &CropOptions::default().with_strategy(CropStrategy::Smart),
        )
        .unwrap();
        assert_eq!(center, smart);
    }

    #[test]
    fn test_smart_biases_up_for_tall_sources() {
        let target = size(1080, 1080);
        let opts = CropOptions::default().with_strategy(CropStrategy::Smart);
        let result = calculate_smart_crop(1080.0, 1920.0, &target, &opts).unwrap();
        assert_eq!(result.crop_region, CropRegion::new(0.0, 280.0, 1080.0, 1080.0));
    }

    #[test]
    fn test_focus_clamps_to_source() {
        let target = size(1080, 1080);
        let opts = CropOptions::default()
            .with_strategy(CropStrategy::Focus)
            .with_focus(FocusPoint::new(1.0, 0.5));
        let result = calculate_smart_crop(1920.0, 1080.0, &target, &opts).unwrap();
        assert_eq!(result.crop_region.x, 840.0);

        let opts = opts.with_focus(FocusPoint::new(0.0, 0.5));
        let result = calculate_smart_crop(1920.0, 1080.0, &target, &opts).unwrap();
        assert_eq!(result.crop_region.x, 0.0);
    }

    #[test]
    fn test_long_scroll_scales_by_width() {
        let result =
            calculate_smart_crop(1500.0, 6000.0, &size(750, 0), &CropOptions::default()).unwrap();
        assert!(!result.needs_crop);
        assert_eq!(result.scale, 0.5);
        assert_eq!(result.crop_region, CropRegion::new(0.0, 0.0, 1500.0, 6000.0));
    }

    #[test]
    fn test_rejects_degenerate_geometry() {
        let opts = CropOptions::default();
        assert!(calculate_smart_crop(0.0, 100.0, &size(100, 100), &opts).is_err());
        assert!(calculate_smart_crop(100.0, -1.0, &size(100, 100), &opts).is_err());
        assert!(calculate_smart_crop(f64::NAN, 100.0, &size(100, 100), &opts).is_err());
        assert!(calculate_smart_crop(100.0, 100.0, &size(0, 100), &opts).is_err());
    }

    #[test]
    fn test_warns_on_clipped_sides() {
        // 1920x1080 -> 1080x1080 cuts 420px from each side.
        let zone = SafeZone::new(0.0, 0.0, 40.0, 500.0);
        let opts = CropOptions::default().with_safe_zone(zone);
        let result = calculate_smart_crop(1920.0, 1080.0, &size(1080, 1080), &opts).unwrap();
        assert_eq!(result.safe_zone_warnings, vec!["left content may be clipped".to_string()]);
    }

    #[test]
    fn test_no_warnings_without_crop() {
        let opts = CropOptions::default().with_safe_zone(SafeZone::new(1.0, 1.0, 1.0, 1.0));
        let result = calculate_smart_crop(1080.0, 1440.0, &size(1080, 1440), &opts).unwrap();
        assert!(result.safe_zone_warnings.is_empty());
    }

    #[test]
    fn test_center_for_tall_sources() {
        let opts = CropOptions::default();
        let result = calculate_smart_crop(1080.0, 1920.0, &size(1080, 1080), &opts).unwrap();
        assert!(result.needs_crop);
        assert_eq!(result.crop_region, CropRegion::new(0.0, 420.0, 1080.0, 1080.0));
    }

    #[test]
    fn test_focus_tall_sources() {
        let target = size(1080, 1080);
        let opts = CropOptions::default()
            .with_strategy(CropStrategy::Focus)
            .with_focus(FocusPoint::new(0.5, 0.5625));
        let result = calculate_smart_crop(1080.0, 1920.0, &target, &opts).unwrap();
        assert_eq!(result.crop_region, CropRegion::new(0.0, 540.0, 1080.0, 1080.0));

        let opts = opts.with_focus(FocusPoint::new(0.5, 0.1));
        let result = calculate_smart_crop(1080.0, 1920.0, &target, &opts).unwrap();
        assert_eq!(result.crop_region.y, 0.0);

        let opts = opts.with_focus(FocusPoint::new(0.5, 1.0));
        let result = calculate_smart_crop(1080.0, 1920.0, &target, &opts).unwrap();
        assert_eq!(result.crop_region.y, 840.0);
    }

    #[test]
    fn test_rejects_non_finite_focus() {
        let target = size(1080, 1080);
        for focus in [
            FocusPoint::new(f64::NAN, 0.5),
            FocusPoint::new(0.5, f64::NAN),
            FocusPoint::new(f64::INFINITY, 0.5),
        ] {
            let opts = CropOptions::default()
                .with_strategy(CropStrategy::Focus)
                .with_focus(focus);
            let err = calculate_smart_crop(1920.0, 1080.0, &target, &opts).unwrap_err();
            assert!(matches!(err, EngineError::InvalidGeometry(_)));
        }
    }

    #[test]
    fn test_warns_on_top_and_bottom() {
        // 1080x1920 -> 1080x1080 cuts 420px from top and bottom.
        let zone = SafeZone::new(100.0, 500.0, 0.0, 0.0);
        let opts = CropOptions::default().with_safe_zone(zone);
        let result = calculate_smart_crop(1080.0, 1920.0, &size(1080, 1080), &opts).unwrap();
        assert_eq!(result.safe_zone_warnings, vec!["top content may be clipped".to_string()]);

        let zone = SafeZone::new(500.0, 100.0, 0.0, 0.0);
        let opts = CropOptions::default().with_safe_zone(zone);
        let result = calculate_smart_crop(1080.0, 1920.0, &size(1080, 1080), &opts).unwrap();
        assert_eq!(result.safe_zone_warnings, vec!["bottom content may be clipped".to_string()]);
    }

    #[test]
    fn test_focus_shift_triggers_warning() {
        let zone = SafeZone::new(0.0, 0.0, 500.0, 0.0);
        let center = CropOptions::default().with_safe_zone(zone);
        let result = calculate_smart_crop(1920.0, 1080.0, &size(1080, 1080), &center).unwrap();
        assert!(result.safe_zone_warnings.is_empty());

        // Focus at the right edge moves the window to x = 840.
        let focus = center
            .with_strategy(CropStrategy::Focus)
            .with_focus(FocusPoint::new(1.0, 0.5));
        let result = calculate_smart_crop(1920.0, 1080.0, &size(1080, 1080), &focus).unwrap();
        assert_eq!(result.crop_region.x, 840.0);
        assert_eq!(result.safe_zone_warnings, vec!["left content may be clipped".to_string()]);
    }

    #[test]
    fn test_warning_insets_follow_scale() {
        // Scale 2: target insets are halved in source pixels; x = 420.
        let target = size(2160, 2160);
        let opts = CropOptions::default().with_safe_zone(SafeZone::new(0.0, 0.0, 900.0, 900.0));
        let result = calculate_smart_crop(1920.0, 1080.0, &target, &opts).unwrap();
        assert_eq!(result.scale, 2.0);
        assert!(result.safe_zone_warnings.is_empty());

        let opts = CropOptions::default().with_safe_zone(SafeZone::new(0.0, 0.0, 800.0, 800.0));
        let result = calculate_smart_crop(1920.0, 1080.0, &target, &opts).unwrap();
        assert_eq!(
            result.safe_zone_warnings,
            vec![
                "left content may be clipped".to_string(),
                "right content may be clipped".to_string(),
            ]
        );
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!("SMART".parse::<CropStrategy>().unwrap(), CropStrategy::Smart);
        assert!("edge".parse::<CropStrategy>().is_err());
    }
}
