use std::{fs, io::ErrorKind, path::Path};

use anyhow::{Context, Result};
use log::info;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "still_life.toml";

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub assets: AssetConfig,
    pub camera: CameraConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Still Life".to_owned(),
            width: 1000,
            height: 800,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub texture_dir: String,
    pub shader: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            texture_dir: "textures".to_owned(),
            shader: "shader/scene.wgsl".to_owned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    /// Degrees, -90 looks down -Z.
    pub yaw: f32,
    pub pitch: f32,
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
    /// Half height of the view volume in orthographic mode.
    pub ortho_height: f32,
    pub move_speed: f32,
    pub min_move_speed: f32,
    pub max_move_speed: f32,
    /// Speed change per scroll wheel line.
    pub scroll_step: f32,
    /// Degrees per pixel of mouse motion.
    pub mouse_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.5, 5.5, 10.0],
            yaw: -90.0,
            pitch: -14.0,
            fovy: 45.0,
            znear: 0.1,
            zfar: 100.0,
            ortho_height: 5.0,
            move_speed: 2.5,
            min_move_speed: 0.5,
            max_move_speed: 20.0,
            scroll_step: 0.5,
            mouse_sensitivity: 0.1,
        }
    }
}

impl Config {
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse config")
    }

    /// Reads `path`, or returns the defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => {
                info!("config loaded from {}", path.display());
                Self::from_toml(&contents).with_context(|| format!("in {}", path.display()))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(err) => {
                Err(err).with_context(|| format!("failed to read config {}", path.display()))
            }
        }
    }

    /// First CLI argument, else [`DEFAULT_CONFIG_PATH`].
    pub fn from_args() -> Result<Self> {
        let path = std::env::args()
            .nth(1)
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_owned());
        Self::load(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_toml(
            r#"
            [window]
            width = 1280

            [camera]
            position = [0.0, 2.0, 4.0]
            move_speed = 5.0
            "#,
        )
        .unwrap();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.window.height, 800);
        assert_eq!(config.window.title, "Still Life");
        assert_eq!(config.camera.position, [0.0, 2.0, 4.0]);
        assert_eq!(config.camera.move_speed, 5.0);
        assert_eq!(config.camera.fovy, 45.0);
        assert_eq!(config.assets, AssetConfig::default());
    }

    #[test]
    fn bad_types_are_rejected() {
        assert!(Config::from_toml("[window]\nwidth = \"wide\"").is_err());
    }

    #[test]
    fn missing_file_uses_defaults() {
        let config = Config::load("definitely/not/here/still_life.toml").unwrap();
        assert_eq!(config, Config::default());
    }
}
