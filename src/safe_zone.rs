//! Safe Zone Validation - Edge Intrusion Reports
//!
//! Every edge of every checked element is tested on its own, so one element
//! can produce up to four violations. Nothing here fails: a zone wider than
//! the canvas just flags everything.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::platforms::SafeZone;

/// Name the editor gives its own safe-zone overlay layer.
pub const SAFE_ZONE_OVERLAY_NAME: &str = "safeZoneOverlay";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];

    /// Distance `element` reaches past this edge's boundary, if it does.
    fn overflow(
        self,
        element: &ElementBounds,
        canvas_width: f64,
        canvas_height: f64,
        zone: &SafeZone,
    ) -> Option<f64> {
        let amount = match self {
            Edge::Top => zone.top - element.top,
            Edge::Bottom => element.top + element.height - (canvas_height - zone.bottom),
            Edge::Left => zone.left - element.left,
            Edge::Right => element.left + element.width - (canvas_width - zone.right),
        };
        (amount > 0.0).then_some(amount)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Edge::Top => "top",
            Edge::Bottom => "bottom",
            Edge::Left => "left",
            Edge::Right => "right",
        })
    }
}

fn default_true() -> bool { true }

/// Bounding box of one canvas element, in canvas pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementBounds {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub element_type: String,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// Background layers are not selectable and are never checked.
    #[serde(default = "default_true")]
    pub selectable: bool,
    #[serde(default)]
    pub is_overlay: bool,
}

impl ElementBounds {
    pub fn new(
        name: &str,
        element_type: &str,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            name: name.to_string(),
            element_type: element_type.to_string(),
            left,
            top,
            width,
            height,
            selectable: true,
            is_overlay: false,
        }
    }

    pub fn background(mut self) -> Self {
        self.selectable = false;
        self
    }

    pub fn overlay(mut self) -> Self {
        self.is_overlay = true;
        self
    }

    /// Flagged overlays and layers carrying the legacy overlay name.
    pub fn is_safe_zone_overlay(&self) -> bool {
        self.is_overlay || self.name == SAFE_ZONE_OVERLAY_NAME
    }

    fn is_checked(&self) -> bool {
        self.selectable && !self.is_safe_zone_overlay()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub element_name: String,
    pub element_type: String,
    pub edge: Edge,
    /// Pixels past the boundary, always positive.
    pub overflow_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationReport {
    pub is_in_safe_zone: bool,
    pub violations: Vec<Violation>,
}

impl ViolationReport {
    pub fn success() -> Self {
        Self {
            is_in_safe_zone: true,
            violations: vec![],
        }
    }

    fn from_violations(violations: Vec<Violation>) -> Self {
        Self {
            is_in_safe_zone: violations.is_empty(),
            violations,
        }
    }

    pub fn for_element<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.violations.iter().filter(move |v| v.element_name == name)
    }

    pub fn has_edge(&self, edge: Edge) -> bool {
        self.violations.iter().any(|v| v.edge == edge)
    }
}

/// Report every checked element that reaches into a forbidden edge band.
pub fn check_safe_zone(
    canvas_width: f64,
    canvas_height: f64,
    elements: &[ElementBounds],
    zone: &SafeZone,
) -> ViolationReport {
    let mut violations = vec![];

    for element in elements.iter().filter(|e| e.is_checked()) {
        for edge in Edge::ALL {
            let overflow = edge.overflow(element, canvas_width, canvas_height, zone);
            if let Some(overflow_amount) = overflow {
                violations.push(Violation {
                    element_name: element.name.clone(),
                    element_type: element.element_type.clone(),
                    edge,
                    overflow_amount,
                });
            }
        }
    }

    if !violations.is_empty() {
        tracing::debug!(count = violations.len(), "safe zone violations");
    }

    ViolationReport::from_violations(violations)
}
