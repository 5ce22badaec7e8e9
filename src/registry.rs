//! Platform Spec Registry - Read-Only Catalog
//!
//! Lookups never fail loudly: unknown ids come back as `None`, or as the
//! `"unknown platform"` compliance error.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use crate::catalog;
use crate::error::EngineError;
use crate::platforms::{PlatformId, PlatformSpec, SizeSpec};
use crate::ENGINE_VERSION;

/// The single error returned for unresolved platform ids.
pub const UNKNOWN_PLATFORM: &str = "unknown platform";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCompliance {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl FileCompliance {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlatformSpecRegistry {
    specs: BTreeMap<PlatformId, PlatformSpec>,
}

impl PlatformSpecRegistry {
    pub fn new() -> Self {
        Self {
            specs: BTreeMap::new(),
        }
    }

    /// Registry holding the bundled catalog.
    pub fn with_bundled() -> Self {
        let mut registry = Self::new();
        for spec in catalog::bundled_specs() {
            registry.specs.insert(spec.id.clone(), spec);
        }
        registry
    }

    /// Process-wide bundled catalog, built on first use.
    pub fn builtin() -> &'static PlatformSpecRegistry {
        static BUILTIN: OnceLock<PlatformSpecRegistry> = OnceLock::new();
        BUILTIN.get_or_init(Self::with_bundled)
    }

    pub fn load_from_dir(dir: &Path) -> Result<Self, EngineError> {
        let mut registry = Self::new();
        registry.extend_from_dir(dir)?;
        Ok(registry)
    }

    /// Overlay every `*.json` spec in `dir`. Files that fail to parse, break
    /// an invariant or need a newer engine are skipped.
    pub fn extend_from_dir(&mut self, dir: &Path) -> Result<usize, EngineError> {
        if !dir.exists() {
            tracing::debug!("catalog dir {} does not exist", dir.display());
            return Ok(0);
        }

        let mut paths: Vec<_> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().map_or(false, |e| e == "json"))
            .collect();
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            let content = fs::read_to_string(&path)?;
            let spec = match serde_json::from_str::<PlatformSpec>(&content) {
                Ok(spec) => spec,
                Err(e) => {
                    tracing::warn!("Skipping {}: {e}", path.display());
                    continue;
                }
            };
            if let Err(e) = check_engine_version(&spec).and_then(|_| spec.validate()) {
                tracing::warn!("Skipping {}: {e}", path.display());
                continue;
            }
            tracing::debug!(platform = %spec.id, "loaded platform spec");
            self.specs.insert(spec.id.clone(), spec);
            loaded += 1;
        }
        Ok(loaded)
    }

    /// Add or replace a spec. Only used while assembling a registry.
    pub fn register(&mut self, spec: PlatformSpec) -> Result<(), EngineError> {
        spec.validate()?;
        self.specs.insert(spec.id.clone(), spec);
        Ok(())
    }

    pub fn get_spec(&self, id: &str) -> Option<&PlatformSpec> {
        self.specs.get(id)
    }

    pub fn get_recommended_size(&self, id: &str) -> Option<&SizeSpec> {
        self.get_spec(id)?.recommended_size()
    }

    pub fn check_file_compliance(
        &self,
        id: &str,
        file_size_kb: f64,
        format: &str,
    ) -> FileCompliance {
        let Some(spec) = self.get_spec(id) else {
            return FileCompliance::from_errors(vec![UNKNOWN_PLATFORM.to_string()]);
        };

        let file_spec = &spec.file_spec;
        let mut errors = vec![];

        if !(file_size_kb.is_finite() && file_size_kb >= 0.0) {
            errors.push(format!(
                "File size {} is not a valid size in KB (limit {}MB)",
                file_size_kb,
                format_mb(file_spec.max_size_mb())
            ));
        } else if file_size_kb > file_spec.max_size_kb as f64 {
            errors.push(format!(
                "File size {:.1}KB exceeds the {}MB limit",
                file_size_kb,
                format_mb(file_spec.max_size_mb())
            ));
        }

        if !file_spec.accepts_format(format) {
            errors.push(format!(
                "Unsupported format '{}', allowed: {}",
                format,
                file_spec.formats.join(", ")
            ));
        }

        FileCompliance::from_errors(errors)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.specs.keys().map(String::as_str).collect()
    }

    pub fn list(&self) -> Vec<&PlatformSpec> {
        self.specs.values().collect()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// `20` rather than `20.0`, `0.5` stays `0.5`. Limits below 0.005MB keep
/// more decimals so they never print as `0`.
fn format_mb(mb: f64) -> String {
    let trimmed = |precision: usize| {
        let text = format!("{:.*}", precision, mb);
        if text.contains('.') {
            text.trim_end_matches('0').trim_end_matches('.').to_string()
        } else {
            text
        }
    };

    let short = trimmed(2);
    if short == "0" && mb > 0.0 {
        trimmed(4)
    } else {
        short
    }
}

fn check_engine_version(spec: &PlatformSpec) -> Result<(), EngineError> {
    let Some(min) = &spec.engine_min_version else {
        return Ok(());
    };

    let engine_ver = semver::Version::parse(ENGINE_VERSION)
        .map_err(|_| EngineError::invalid_spec(&spec.id, "invalid engine version"))?;
    let min_ver = semver::Version::parse(min).map_err(|_| {
        EngineError::invalid_spec(&spec.id, format!("invalid engineMinVersion '{min}'"))
    })?;

    if engine_ver < min_ver {
        return Err(EngineError::EngineVersionMismatch(
            spec.id.clone(),
            min.clone(),
            ENGINE_VERSION.to_string(),
        ));
    }
    Ok(())
}

/// Lookup in the bundled catalog.
pub fn get_spec(id: &str) -> Option<&'static PlatformSpec> {
    PlatformSpecRegistry::builtin().get_spec(id)
}

pub fn get_recommended_size(id: &str) -> Option<&'static SizeSpec> {
    PlatformSpecRegistry::builtin().get_recommended_size(id)
}

pub fn check_file_compliance(id: &str, file_size_kb: f64, format: &str) -> FileCompliance {
    PlatformSpecRegistry::builtin().check_file_compliance(id, file_size_kb, format)
}
