// config.rs — viewer configuration (JSON, every section optional)
//
// Lookup order:
// - CLI: --config <path>
// - Env: PANORAMA_CONFIG
// - <exe_dir>/assets/viewer.json, then ./assets/viewer.json
// - built-in defaults
//
// Bare positional arguments are panorama image paths and replace `panoramas`.

use crate::error::{Result, ViewerError};
use crate::marker::{MarkerAction, MarkerShape};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const MAX_PANORAMAS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub min_fov: f32,
    pub max_fov: f32,
    /// Distance of the orbit camera from the sphere center.
    pub orbit_radius: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 75.0,
            min_fov: 30.0,
            max_fov: 120.0,
            orbit_radius: 0.1,
            near: 0.1,
            far: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Radians of rotation per pixel of drag.
    pub rotate_sensitivity: f32,
    /// Degrees of field of view per wheel delta unit.
    pub zoom_sensitivity: f32,
    /// Pointer travel (px) above which a release counts as a drag, not a click.
    pub click_tolerance_px: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            rotate_sensitivity: 0.005,
            zoom_sensitivity: 0.05,
            click_tolerance_px: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub lerp_factor: f32,
    pub recenter_epsilon: f32,
    pub blend_epsilon: f32,
    pub auto_rotate: bool,
    /// Radians per second.
    pub auto_rotate_speed: f32,
    /// Seconds without interaction before auto-rotation starts.
    pub auto_rotate_delay: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            lerp_factor: 0.05,
            recenter_epsilon: 0.01,
            blend_epsilon: 0.01,
            auto_rotate: true,
            auto_rotate_speed: std::f32::consts::TAU / 30.0,
            auto_rotate_delay: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    pub position: [f32; 3],
    pub shape: MarkerShape,
    pub action: MarkerAction,
    pub label: Option<String>,
    pub icon: Option<PathBuf>,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            position: [100.0, 100.0, -200.0],
            shape: MarkerShape::default(),
            action: MarkerAction::Recenter,
            label: None,
            icon: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub panoramas: Vec<PathBuf>,
    pub sphere_radius: f32,
    pub camera: CameraConfig,
    pub input: InputConfig,
    pub animation: AnimationConfig,
    pub markers: Vec<MarkerConfig>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            panoramas: vec![PathBuf::from("assets").join("panoramas").join("day.png")],
            sphere_radius: 500.0,
            camera: CameraConfig::default(),
            input: InputConfig::default(),
            animation: AnimationConfig::default(),
            markers: vec![MarkerConfig::default()],
        }
    }
}

impl ViewerConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: ViewerConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ViewerError::AssetNotFound(path.to_path_buf()),
            _ => ViewerError::Io(e),
        })?;
        let mut config = Self::from_json(&text)?;
        config.resolve_relative_to(path.parent().unwrap_or(Path::new(".")));
        Ok(config)
    }

    /// Resolve the configuration from process arguments and environment.
    pub fn from_args() -> Result<Self> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let env_path = std::env::var("PANORAMA_CONFIG")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        Self::resolve(&args, env_path)
    }

    pub fn resolve(args: &[String], env_path: Option<PathBuf>) -> Result<Self> {
        let mut explicit = None;
        let mut images = Vec::new();

        let mut it = args.iter();
        while let Some(a) = it.next() {
            match a.as_str() {
                "--config" => explicit = it.next().map(PathBuf::from),
                // consumed by i18n
                "--lang" => {
                    it.next();
                }
                other if !other.starts_with("--") => images.push(PathBuf::from(other)),
                _ => {}
            }
        }

        let mut config = match explicit.or(env_path).or_else(find_default_config) {
            Some(path) => {
                log::info!("loading config from {}", path.display());
                Self::load(&path)?
            }
            None => Self::default(),
        };

        if !images.is_empty() {
            config.panoramas = images;
            config.validate()?;
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let cam = &self.camera;
        if !(cam.min_fov > 0.0 && cam.min_fov <= cam.max_fov && cam.max_fov < 180.0) {
            return Err(ViewerError::Config(format!(
                "fov range [{}, {}] must satisfy 0 < min <= max < 180",
                cam.min_fov, cam.max_fov
            )));
        }
        if cam.orbit_radius <= 0.0 || cam.orbit_radius >= self.sphere_radius {
            return Err(ViewerError::Config(format!(
                "orbit radius {} must lie inside the sphere (radius {})",
                cam.orbit_radius, self.sphere_radius
            )));
        }
        if self.panoramas.len() > MAX_PANORAMAS {
            return Err(ViewerError::Config(format!(
                "at most {} panoramas are supported, got {}",
                MAX_PANORAMAS,
                self.panoramas.len()
            )));
        }
        let lerp = self.animation.lerp_factor;
        if !(lerp > 0.0 && lerp <= 1.0) {
            return Err(ViewerError::Config(format!(
                "lerp factor {} must be in (0, 1]",
                lerp
            )));
        }
        Ok(())
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        for p in &mut self.panoramas {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        }
        for m in &mut self.markers {
            if let Some(icon) = m.icon.as_mut() {
                if icon.is_relative() {
                    *icon = base.join(&*icon);
                }
            }
        }
    }
}

fn find_default_config() -> Option<PathBuf> {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let p = dir.join("assets").join("viewer.json");
            if p.exists() {
                return Some(p);
            }
        }
    }

    let p = PathBuf::from("assets").join("viewer.json");
    p.exists().then_some(p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ViewerConfig::from_json(r#"{ "camera": { "fov": 60.0 } }"#).unwrap();
        assert_eq!(config.camera.fov, 60.0);
        assert_eq!(config.camera.min_fov, 30.0);
        assert_eq!(config.camera.max_fov, 120.0);
        assert_eq!(config.input.rotate_sensitivity, 0.005);
        assert_eq!(config.sphere_radius, 500.0);
    }

    #[test]
    fn rejects_inverted_fov_range() {
        let err = ViewerConfig::from_json(r#"{ "camera": { "min_fov": 90.0, "max_fov": 40.0 } }"#)
            .unwrap_err();
        assert!(matches!(err, ViewerError::Config(_)));
    }

    #[test]
    fn rejects_three_panoramas() {
        let err = ViewerConfig::from_json(r#"{ "panoramas": ["a.jpg", "b.jpg", "c.jpg"] }"#)
            .unwrap_err();
        assert!(matches!(err, ViewerError::Config(_)));
    }

    #[test]
    fn positional_args_replace_panoramas() {
        let args = vec![
            "--lang".to_string(),
            "en".to_string(),
            "one.jpg".to_string(),
            "two.jpg".to_string(),
        ];
        let config = ViewerConfig::resolve(&args, None).unwrap();
        assert_eq!(
            config.panoramas,
            vec![PathBuf::from("one.jpg"), PathBuf::from("two.jpg")]
        );
    }

    #[test]
    fn missing_explicit_config_is_asset_not_found() {
        let args = vec!["--config".to_string(), "/nonexistent/viewer.json".to_string()];
        let err = ViewerConfig::resolve(&args, None).unwrap_err();
        assert!(matches!(err, ViewerError::AssetNotFound(_)));
    }

    #[test]
    fn bundled_config_points_at_shipped_assets() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets").join("viewer.json");
        let config = ViewerConfig::load(&path).unwrap();
        assert_eq!(config.panoramas.len(), MAX_PANORAMAS);

        let icons = config.markers.iter().filter_map(|m| m.icon.clone());
        for asset in config.panoramas.iter().cloned().chain(icons) {
            let img = crate::assets::decode_image(&asset).unwrap();
            assert!(img.width() > 0, "{:?}", asset);
        }

        let default_pano = &ViewerConfig::default().panoramas[0];
        assert!(Path::new(env!("CARGO_MANIFEST_DIR")).join(default_pano).is_file());
    }
}
