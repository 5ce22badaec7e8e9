//! Platform Export Core - Export Geometry Engine
//!
//! Decides how one design canvas is adapted for external platforms:
//! 1. Registry: what each platform accepts
//! 2. Crop: how the canvas is fitted to each required size
//! 3. Safe zone: which elements sit under platform UI
//!
//! Everything is pure computation over immutable inputs.

pub mod catalog;
pub mod crop;
pub mod error;
pub mod hashing;
pub mod planner;
pub mod platforms;
pub mod registry;
pub mod safe_zone;

pub use crop::{calculate_smart_crop, CropOptions, CropRegion, CropResult, CropStrategy, FocusPoint};
pub use error::EngineError;
pub use planner::{ExportPlan, ExportPlanner, ExportRequest, FileCandidate, PlannedTarget};
pub use platforms::{ColorMode, FileSpec, PlatformId, PlatformSpec, SafeZone, SizeSpec};
pub use registry::{FileCompliance, PlatformSpecRegistry, UNKNOWN_PLATFORM};
pub use safe_zone::{check_safe_zone, Edge, ElementBounds, Violation, ViolationReport};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
