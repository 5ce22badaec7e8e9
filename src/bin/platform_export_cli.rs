//! Platform Export CLI - JSON bridge for editors
//!
//! Commands: platforms, spec, recommended, check-file, crop, safe-zone, plan
//! Outputs JSON to stdout, logs to stderr
//! Returns 2 when a check does not pass

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use platform_export_core::{
    calculate_smart_crop, check_safe_zone, CropOptions, CropStrategy, ElementBounds, ExportPlanner,
    ExportRequest, FocusPoint, PlatformSpecRegistry, SizeSpec,
};

#[derive(Parser)]
#[command(name = "platform-export-cli")]
#[command(about = "Platform export geometry: specs, smart crop, safe zones")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory of JSON platform specs overlaid on the bundled catalog
    #[arg(long, global = true)]
    platforms_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available platforms
    Platforms,

    /// Show a platform spec
    Spec {
        platform: String,
    },

    /// Show the recommended output size of a platform
    Recommended {
        platform: String,
    },

    /// Check an encoded file against a platform's file rules
    CheckFile {
        platform: String,

        #[arg(long)]
        size_kb: f64,

        #[arg(long)]
        format: String,
    },

    /// Compute a crop for a source size
    Crop {
        #[arg(long)]
        source_width: f64,

        #[arg(long)]
        source_height: f64,

        /// Take the target size (and safe zone) from this platform
        #[arg(long, conflicts_with_all = ["width", "height"])]
        platform: Option<String>,

        /// Size name within the platform, defaults to the recommended size
        #[arg(long, requires = "platform")]
        size: Option<String>,

        /// Explicit target width
        #[arg(long, requires = "height")]
        width: Option<u32>,

        /// Explicit target height, 0 for long-scroll
        #[arg(long, requires = "width")]
        height: Option<u32>,

        #[arg(long, default_value_t = CropStrategy::Center)]
        strategy: CropStrategy,

        #[arg(long, default_value_t = 0.5)]
        focus_x: f64,

        #[arg(long, default_value_t = 0.5)]
        focus_y: f64,
    },

    /// Check canvas elements against a platform's safe zone
    SafeZone {
        platform: String,

        /// JSON payload ({canvasWidth, canvasHeight, elements})
        #[arg(short, long)]
        payload: String,
    },

    /// Build a full export plan
    Plan {
        /// JSON payload (ExportRequest)
        #[arg(short, long)]
        payload: String,
    },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CanvasPayload {
    canvas_width: f64,
    canvas_height: f64,
    #[serde(default)]
    elements: Vec<ElementBounds>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut registry = PlatformSpecRegistry::with_bundled();
    if let Some(dir) = &cli.platforms_dir {
        if let Err(e) = registry.extend_from_dir(dir) {
            print_error(&format!("Failed to load platforms: {e}"));
            return ExitCode::FAILURE;
        }
    }

    match cli.command {
        Commands::Platforms => {
            let platforms: Vec<_> = registry
                .list()
                .iter()
                .map(|p| {
                    serde_json::json!({
                        "id": p.id,
                        "name": p.name,
                        "sizes": p.sizes.len(),
                        "hasSafeZone": p.safe_zone.is_some(),
                    })
                })
                .collect();
            exit_code(print_json(&platforms))
        }

        Commands::Spec { platform } => match registry.get_spec(&platform) {
            Some(spec) => exit_code(print_json(spec)),
            None => {
                print_error(&format!("unknown platform: {platform}"));
                ExitCode::FAILURE
            }
        },

        Commands::Recommended { platform } => match registry.get_recommended_size(&platform) {
            Some(size) => exit_code(print_json(size)),
            None => {
                print_error(&format!("unknown platform: {platform}"));
                ExitCode::FAILURE
            }
        },

        Commands::CheckFile { platform, size_kb, format } => {
            let result = registry.check_file_compliance(&platform, size_kb, &format);
            check_status(print_json(&result), result.valid)
        }

        Commands::Crop {
            source_width,
            source_height,
            platform,
            size,
            width,
            height,
            strategy,
            focus_x,
            focus_y,
        } => {
            let mut options = CropOptions::default()
                .with_strategy(strategy)
                .with_focus(FocusPoint::new(focus_x, focus_y));

            let target = match (platform, width, height) {
                (Some(id), _, _) => {
                    let Some(spec) = registry.get_spec(&id) else {
                        print_error(&format!("unknown platform: {id}"));
                        return ExitCode::FAILURE;
                    };
                    let found = match &size {
                        Some(name) => spec.size_named(name),
                        None => spec.recommended_size(),
                    };
                    let Some(found) = found else {
                        let name = size.unwrap_or_default();
                        print_error(&format!("platform {id} has no size {name:?}"));
                        return ExitCode::FAILURE;
                    };
                    options.safe_zone = spec.safe_zone.clone();
                    found.clone()
                }
                (None, Some(w), Some(h)) => SizeSpec::new("custom", w, h, ""),
                _ => {
                    print_error("either --platform or --width/--height is required");
                    return ExitCode::FAILURE;
                }
            };

            match calculate_smart_crop(source_width, source_height, &target, &options) {
                Ok(result) => exit_code(print_json(&result)),
                Err(e) => {
                    print_error(&e.to_string());
                    ExitCode::FAILURE
                }
            }
        }

        Commands::SafeZone { platform, payload } => {
            let canvas: CanvasPayload = match serde_json::from_str(&payload) {
                Ok(c) => c,
                Err(e) => {
                    print_error(&format!("Invalid payload: {e}"));
                    return ExitCode::FAILURE;
                }
            };
            let Some(spec) = registry.get_spec(&platform) else {
                print_error(&format!("unknown platform: {platform}"));
                return ExitCode::FAILURE;
            };
            let (width, height) = (canvas.canvas_width, canvas.canvas_height);
            let Some(zone) = spec.safe_zone_for_canvas(width, height) else {
                print_error(&format!("platform {platform} defines no safe zone"));
                return ExitCode::FAILURE;
            };

            let report = check_safe_zone(width, height, &canvas.elements, &zone);
            check_status(print_json(&report), report.is_in_safe_zone)
        }

        Commands::Plan { payload } => {
            let request: ExportRequest = match serde_json::from_str(&payload) {
                Ok(r) => r,
                Err(e) => {
                    print_error(&format!("Invalid payload: {e}"));
                    return ExitCode::FAILURE;
                }
            };

            match ExportPlanner::new(&registry).plan(&request) {
                Ok(plan) => check_status(print_json(&plan), plan.ready),
                Err(e) => {
                    print_error(&e.to_string());
                    ExitCode::FAILURE
                }
            }
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> bool {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            true
        }
        Err(e) => {
            print_error(&format!("Serialization failed: {e}"));
            false
        }
    }
}

fn print_error(message: &str) {
    println!("{}", serde_json::json!({ "error": message }));
}

fn exit_code(printed: bool) -> ExitCode {
    if printed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Exit 2 when the printed check did not pass.
fn check_status(printed: bool, passed: bool) -> ExitCode {
    match (printed, passed) {
        (false, _) => ExitCode::FAILURE,
        (true, true) => ExitCode::SUCCESS,
        (true, false) => ExitCode::from(2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_payload_short_flag_on_subcommands() {
        let cli = Cli::try_parse_from(["platform-export-cli", "plan", "-p", "{}"]).unwrap();
        assert!(matches!(cli.command, Commands::Plan { payload } if payload == "{}"));

        let cli = Cli::try_parse_from([
            "platform-export-cli",
            "safe-zone",
            "xiaohongshu",
            "-p",
            "{}",
            "--platforms-dir",
            "catalogs",
        ])
        .unwrap();
        assert_eq!(cli.platforms_dir, Some(PathBuf::from("catalogs")));
        assert!(matches!(
            cli.command,
            Commands::SafeZone { platform, .. } if platform == "xiaohongshu"
        ));
    }

    #[test]
    fn test_crop_target_flags() {
        let cli = Cli::try_parse_from([
            "platform-export-cli",
            "crop",
            "--source-width",
            "1920",
            "--source-height",
            "1080",
            "--width",
            "1080",
            "--height",
            "1080",
            "--strategy",
            "smart",
        ])
        .unwrap();
        match cli.command {
            Commands::Crop { width, height, strategy, platform, .. } => {
                assert_eq!((width, height), (Some(1080), Some(1080)));
                assert_eq!(strategy, CropStrategy::Smart);
                assert!(platform.is_none());
            }
            _ => panic!("expected crop"),
        }

        let conflicting = Cli::try_parse_from([
            "platform-export-cli",
            "crop",
            "--source-width",
            "1920",
            "--source-height",
            "1080",
            "--platform",
            "jd",
            "--width",
            "800",
            "--height",
            "800",
        ]);
        assert!(conflicting.is_err());
    }
}
