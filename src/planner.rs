//! Export Planner - Single Entry Point
//!
//! Runs the full export decision for one canvas and one platform: registry
//! lookup, a crop per required size, safe zone check and file compliance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crop::{calculate_smart_crop, CropOptions, CropResult, CropStrategy, FocusPoint};
use crate::error::EngineError;
use crate::hashing::compute_request_hash;
use crate::platforms::{PlatformSpec, SizeSpec};
use crate::registry::{FileCompliance, PlatformSpecRegistry};
use crate::safe_zone::{check_safe_zone, ElementBounds, ViolationReport};
use crate::ENGINE_VERSION;

/// An encoded file the caller intends to upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileCandidate {
    #[serde(rename = "sizeKB")]
    pub size_kb: f64,
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub platform_id: String,
    pub canvas_width: f64,
    pub canvas_height: f64,
    #[serde(default)]
    pub elements: Vec<ElementBounds>,
    #[serde(default)]
    pub strategy: CropStrategy,
    #[serde(default)]
    pub focus_point: FocusPoint,
    #[serde(default)]
    pub file: Option<FileCandidate>,
}

impl ExportRequest {
    pub fn new(platform_id: &str, canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            platform_id: platform_id.to_string(),
            canvas_width,
            canvas_height,
            elements: vec![],
            strategy: CropStrategy::default(),
            focus_point: FocusPoint::default(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedTarget {
    pub size: SizeSpec,
    pub crop: CropResult,
    pub output_width: u32,
    pub output_height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPlan {
    pub id: String,
    pub platform_id: String,
    pub platform_name: String,
    pub engine_version: String,
    pub created_at: DateTime<Utc>,
    pub request_hash: String,
    pub targets: Vec<PlannedTarget>,
    pub safe_zone: Option<ViolationReport>,
    pub file_compliance: Option<FileCompliance>,
    /// No safe zone violations and, if a file was given, a compliant file.
    pub ready: bool,
}

pub struct ExportPlanner<'r> {
    registry: &'r PlatformSpecRegistry,
}

impl ExportPlanner<'static> {
    /// Planner over the bundled catalog.
    pub fn builtin() -> Self {
        Self::new(PlatformSpecRegistry::builtin())
    }
}

impl<'r> ExportPlanner<'r> {
    pub fn new(registry: &'r PlatformSpecRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &PlatformSpecRegistry {
        self.registry
    }

    #[tracing::instrument(skip(self, request), fields(platform = %request.platform_id))]
    pub fn plan(&self, request: &ExportRequest) -> Result<ExportPlan, EngineError> {
        let spec = self
            .registry
            .get_spec(&request.platform_id)
            .ok_or_else(|| EngineError::UnknownPlatform(request.platform_id.clone()))?;

        let targets = spec
            .sizes
            .iter()
            .map(|size| self.plan_target(spec, size, request))
            .collect::<Result<Vec<_>, _>>()?;

        let safe_zone = spec
            .safe_zone_for_canvas(request.canvas_width, request.canvas_height)
            .map(|zone| {
                if zone.is_degenerate(request.canvas_width, request.canvas_height) {
                    tracing::warn!("safe zone leaves no usable area on the canvas");
                }
                let (width, height) = (request.canvas_width, request.canvas_height);
                check_safe_zone(width, height, &request.elements, &zone)
            });

        let file_compliance = request.file.as_ref().map(|file| {
            self.registry
                .check_file_compliance(&request.platform_id, file.size_kb, &file.format)
        });

        let ready = safe_zone.as_ref().map_or(true, |r| r.is_in_safe_zone)
            && file_compliance.as_ref().map_or(true, |c| c.valid);

        let request_hash = compute_request_hash(&request.platform_id, request, ENGINE_VERSION)?;

        tracing::debug!(targets = targets.len(), ready, "export plan built");

        Ok(ExportPlan {
            id: Uuid::new_v4().to_string(),
            platform_id: spec.id.clone(),
            platform_name: spec.name.clone(),
            engine_version: ENGINE_VERSION.to_string(),
            created_at: Utc::now(),
            request_hash,
            targets,
            safe_zone,
            file_compliance,
            ready,
        })
    }

    fn plan_target(
        &self,
        spec: &PlatformSpec,
        size: &SizeSpec,
        request: &ExportRequest,
    ) -> Result<PlannedTarget, EngineError> {
        let options = CropOptions {
            safe_zone: spec.safe_zone.clone(),
            focus_point: request.focus_point,
            strategy: request.strategy,
        };
        let crop =
            calculate_smart_crop(request.canvas_width, request.canvas_height, size, &options)?;

        let output_height = if size.is_long_scroll() {
            (crop.crop_region.height * crop.scale).round() as u32
        } else {
            size.height
        };

        Ok(PlannedTarget {
            size: size.clone(),
            crop,
            output_width: size.width,
            output_height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn test_safe_zone_follows_canvas_size() {
        let spec = PlatformSpecRegistry::builtin().get_spec(catalog::XIAOHONGSHU).unwrap();
        let zone = spec.safe_zone_for_canvas(2160.0, 2880.0).unwrap();
        assert_eq!(zone.top, 240.0);
        assert_eq!(zone.bottom, 400.0);
        assert_eq!(zone.left, 80.0);
    }

    #[test]
    fn test_no_safe_zone_means_no_report() {
        let plan = ExportPlanner::builtin()
            .plan(&ExportRequest::new(catalog::WECHAT, 1800.0, 766.0))
            .unwrap();
        assert!(plan.safe_zone.is_none());
        assert!(plan.ready);
    }

    #[test]
    fn test_long_scroll_output_height() {
        let plan = ExportPlanner::builtin()
            .plan(&ExportRequest::new(catalog::TAOBAO, 1500.0, 9000.0))
            .unwrap();
        let detail = plan.targets.iter().find(|t| t.size.is_long_scroll()).unwrap();
        assert_eq!(detail.output_width, 750);
        assert_eq!(detail.output_height, 4500);
    }
}
