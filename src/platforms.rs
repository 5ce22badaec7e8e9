//! Platform Specs - Publishing Contracts
//!
//! A platform spec is the declarative bundle of sizes, safe zone and file
//! rules an external platform publishes. Specs are values: built once,
//! looked up by id, never edited in place.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

pub type PlatformId = String;

/// One named output size.
///
/// `height == 0` marks a long-scroll size: fixed width, unconstrained height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeSpec {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Informational label such as `"3:4"`. Never used for computation.
    #[serde(default)]
    pub aspect_ratio: String,
    #[serde(default)]
    pub recommended: bool,
}

impl SizeSpec {
    pub fn new(name: &str, width: u32, height: u32, aspect_ratio: &str) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
            aspect_ratio: aspect_ratio.to_string(),
            recommended: false,
        }
    }

    pub fn recommended(mut self) -> Self {
        self.recommended = true;
        self
    }

    pub fn is_long_scroll(&self) -> bool {
        self.height == 0
    }

    /// Width over height, or `None` for long-scroll and zero-width sizes.
    pub fn ratio(&self) -> Option<f64> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        Some(self.width as f64 / self.height as f64)
    }
}

/// Edge insets, in pixels, that platform UI overlays or clips.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeZone {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SafeZone {
    pub fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
            description: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Rescale insets, e.g. from target pixels into source pixels.
    pub fn scaled(&self, sx: f64, sy: f64) -> Self {
        Self {
            top: self.top * sy,
            bottom: self.bottom * sy,
            left: self.left * sx,
            right: self.right * sx,
            description: self.description.clone(),
        }
    }

    /// True when the insets leave no interior on at least one axis.
    pub fn is_degenerate(&self, canvas_width: f64, canvas_height: f64) -> bool {
        self.top + self.bottom >= canvas_height || self.left + self.right >= canvas_width
    }

    /// The rectangle elements may occupy. Collapses to zero size, never
    /// negative, for degenerate zones.
    pub fn interior(&self, canvas_width: f64, canvas_height: f64) -> InteriorRect {
        InteriorRect {
            left: self.left,
            top: self.top,
            width: (canvas_width - self.left - self.right).max(0.0),
            height: (canvas_height - self.top - self.bottom).max(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteriorRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColorMode {
    Rgb,
    Cmyk,
    Grayscale,
}

/// File rules for uploaded assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSpec {
    pub formats: Vec<String>,
    /// Inclusive upper bound.
    #[serde(rename = "maxSizeKB")]
    pub max_size_kb: u32,
    #[serde(default, rename = "recommendedDPI", skip_serializing_if = "Option::is_none")]
    pub recommended_dpi: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_mode: Option<ColorMode>,
}

impl FileSpec {
    pub fn new(formats: &[&str], max_size_kb: u32) -> Self {
        Self {
            formats: formats.iter().map(|f| f.to_string()).collect(),
            max_size_kb,
            recommended_dpi: None,
            color_mode: None,
        }
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.recommended_dpi = Some(dpi);
        self
    }

    pub fn with_color_mode(mut self, mode: ColorMode) -> Self {
        self.color_mode = Some(mode);
        self
    }

    pub fn accepts_format(&self, format: &str) -> bool {
        self.formats.iter().any(|f| f.eq_ignore_ascii_case(format))
    }

    pub fn max_size_mb(&self) -> f64 {
        self.max_size_kb as f64 / 1024.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSpec {
    pub id: PlatformId,
    pub name: String,
    pub description: String,
    pub sizes: Vec<SizeSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safe_zone: Option<SafeZone>,
    pub file_spec: FileSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guide_url: Option<String>,
    /// Only meaningful for catalogs loaded from disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_min_version: Option<String>,
}

impl PlatformSpec {
    /// First size flagged recommended, else the first size.
    pub fn recommended_size(&self) -> Option<&SizeSpec> {
        self.sizes
            .iter()
            .find(|s| s.recommended)
            .or_else(|| self.sizes.first())
    }

    pub fn size_named(&self, name: &str) -> Option<&SizeSpec> {
        self.sizes.iter().find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Safe zone insets are given in pixels of the recommended size; this
    /// maps them onto a canvas of another size.
    pub fn safe_zone_for_canvas(&self, canvas_width: f64, canvas_height: f64) -> Option<SafeZone> {
        let zone = self.safe_zone.as_ref()?;
        match self.recommended_size() {
            Some(size) if !size.is_long_scroll() && size.width > 0 => Some(zone.scaled(
                canvas_width / size.width as f64,
                canvas_height / size.height as f64,
            )),
            _ => Some(zone.clone()),
        }
    }

    /// Checks the invariants the engine relies on.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.id.trim().is_empty() {
            return Err(EngineError::invalid_spec(&self.id, "id is empty"));
        }
        if self.sizes.is_empty() {
            return Err(EngineError::invalid_spec(&self.id, "no sizes defined"));
        }
        if let Some(size) = self.sizes.iter().find(|s| s.width == 0) {
            return Err(EngineError::invalid_spec(
                &self.id,
                format!("size '{}' has zero width", size.name),
            ));
        }
        if self.file_spec.formats.is_empty() {
            return Err(EngineError::invalid_spec(&self.id, "no file formats allowed"));
        }
        if let Some(zone) = &self.safe_zone {
            let insets = [zone.top, zone.bottom, zone.left, zone.right];
            if insets.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(EngineError::invalid_spec(
                    &self.id,
                    "safe zone insets must be finite and non-negative",
                ));
            }
        }
        Ok(())
    }
}
