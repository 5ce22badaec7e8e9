//! Bundled platform catalog.

use crate::platforms::{ColorMode, FileSpec, PlatformSpec, SafeZone, SizeSpec};

pub const XIAOHONGSHU: &str = "xiaohongshu";
pub const WECHAT: &str = "wechat";
pub const TAOBAO: &str = "taobao";
pub const JD: &str = "jd";

pub fn bundled_specs() -> Vec<PlatformSpec> {
    vec![xiaohongshu(), wechat(), taobao(), jd()]
}

fn xiaohongshu() -> PlatformSpec {
    PlatformSpec {
        id: XIAOHONGSHU.to_string(),
        name: "Xiaohongshu".to_string(),
        description: "Lifestyle social feed; covers are shown as 3:4 cards".to_string(),
        sizes: vec![
            SizeSpec::new("Portrait 3:4", 1080, 1440, "3:4").recommended(),
            SizeSpec::new("Square 1:1", 1080, 1080, "1:1"),
            SizeSpec::new("Landscape 4:3", 1440, 1080, "4:3"),
        ],
        safe_zone: Some(
            SafeZone::new(120.0, 200.0, 40.0, 40.0)
                .with_description("Status bar covers the top band, likes and comments the bottom"),
        ),
        file_spec: FileSpec::new(&["jpg", "jpeg", "png", "webp"], 20 * 1024)
            .with_dpi(72)
            .with_color_mode(ColorMode::Rgb),
        notes: Some("The first image of a post becomes the feed cover".to_string()),
        guide_url: Some("https://www.xiaohongshu.com".to_string()),
        engine_min_version: None,
    }
}

fn wechat() -> PlatformSpec {
    PlatformSpec {
        id: WECHAT.to_string(),
        name: "WeChat Official Account".to_string(),
        description: "Article publishing; wide cover plus square share thumbnail".to_string(),
        sizes: vec![
            SizeSpec::new("Cover 2.35:1", 900, 383, "2.35:1").recommended(),
            SizeSpec::new("Share Thumbnail 1:1", 200, 200, "1:1"),
            SizeSpec::new("Article Image", 1080, 0, "long"),
        ],
        safe_zone: None,
        file_spec: FileSpec::new(&["jpg", "jpeg", "png", "gif", "bmp"], 10 * 1024)
            .with_color_mode(ColorMode::Rgb),
        notes: Some("The share thumbnail is cropped from the center of the cover".to_string()),
        guide_url: Some("https://mp.weixin.qq.com".to_string()),
        engine_min_version: None,
    }
}

fn taobao() -> PlatformSpec {
    PlatformSpec {
        id: TAOBAO.to_string(),
        name: "Taobao".to_string(),
        description: "Marketplace product listing".to_string(),
        sizes: vec![
            SizeSpec::new("Main Image 1:1", 800, 800, "1:1").recommended(),
            SizeSpec::new("Main Image 3:4", 750, 1000, "3:4"),
            SizeSpec::new("Detail Page", 750, 0, "long"),
        ],
        safe_zone: Some(
            SafeZone::new(0.0, 100.0, 0.0, 0.0)
                .with_description("Promotion tags overlay the bottom band of the main image"),
        ),
        file_spec: FileSpec::new(&["jpg", "jpeg", "png"], 3 * 1024)
            .with_dpi(72)
            .with_color_mode(ColorMode::Rgb),
        notes: Some("Main images above 700x700 enable the zoom viewer".to_string()),
        guide_url: Some("https://www.taobao.com".to_string()),
        engine_min_version: None,
    }
}

fn jd() -> PlatformSpec {
    PlatformSpec {
        id: JD.to_string(),
        name: "JD".to_string(),
        description: "Marketplace product listing with strict upload limits".to_string(),
        // No size is flagged: lookups fall back to the first entry.
        sizes: vec![
            SizeSpec::new("Main Image 1:1", 800, 800, "1:1"),
            SizeSpec::new("Detail Page", 990, 0, "long"),
        ],
        safe_zone: None,
        file_spec: FileSpec::new(&["jpg", "jpeg", "png"], 1024).with_color_mode(ColorMode::Rgb),
        notes: None,
        guide_url: Some("https://www.jd.com".to_string()),
        engine_min_version: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_specs_are_valid() {
        for spec in bundled_specs() {
            spec.validate().unwrap();
        }
    }

    #[test]
    fn test_bundled_ids_unique() {
        let mut ids: Vec<_> = bundled_specs().into_iter().map(|s| s.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }
}
