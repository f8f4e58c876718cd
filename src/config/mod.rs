use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::geometry::{Point2, UvTransform};
use crate::mesh::TriangulationMethod;

/// Where the extruded slab sits relative to `z_position + face_offset`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    /// Slab centre moves half a depth towards +Z
    Front,
    #[default]
    Center,
    /// Slab centre moves half a depth towards -Z
    Back,
}

impl Anchor {
    /// Z centre of a slab `depth` deep anchored at `base`
    pub fn origin(self, base: f32, depth: f32) -> f32 {
        let half = depth / 2.0;
        match self {
            Self::Front => base + half,
            Self::Back => base - half,
            Self::Center => base,
        }
    }
}

fn default_side_length() -> f32 {
    1.0
}
fn default_col_depth() -> f32 {
    1.0
}
fn default_uv_scale() -> Point2 {
    (1.0, 1.0)
}
fn default_generate_side() -> bool {
    true
}

/// Extrusion and UV settings for one mesh generation call
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DrawSettings {
    /// Depth of the graphics mesh
    #[serde(default = "default_side_length")]
    pub side_length: f32,
    /// Depth of the collision mesh
    #[serde(default = "default_col_depth")]
    pub col_depth: f32,
    #[serde(default)]
    pub anchor: Anchor,
    #[serde(default)]
    pub col_anchor: Anchor,
    #[serde(default)]
    pub z_position: f32,
    #[serde(default)]
    pub face_offset: f32,
    #[serde(default)]
    pub uv_offset: Point2,
    /// Degrees
    #[serde(default)]
    pub uv_rotation: f32,
    #[serde(default = "default_uv_scale")]
    pub uv_scale: Point2,
    /// Emit side walls into the graphics mesh
    #[serde(default = "default_generate_side")]
    pub generate_side: bool,
    #[serde(default)]
    pub triangulation: TriangulationMethod,
}

impl Default for DrawSettings {
    fn default() -> Self {
        Self {
            side_length: default_side_length(),
            col_depth: default_col_depth(),
            anchor: Anchor::default(),
            col_anchor: Anchor::default(),
            z_position: 0.0,
            face_offset: 0.0,
            uv_offset: (0.0, 0.0),
            uv_rotation: 0.0,
            uv_scale: default_uv_scale(),
            generate_side: default_generate_side(),
            triangulation: TriangulationMethod::default(),
        }
    }
}

impl DrawSettings {
    /// Z centre of the graphics slab
    pub fn z_origin(&self) -> f32 {
        self.anchor
            .origin(self.z_position + self.face_offset, self.side_length)
    }

    /// Z centre of the collision slab
    pub fn collision_origin(&self) -> f32 {
        self.col_anchor
            .origin(self.z_position + self.face_offset, self.col_depth)
    }

    pub fn uv_transform(&self) -> UvTransform {
        UvTransform {
            offset: self.uv_offset,
            rotation: self.uv_rotation,
            scale: self.uv_scale,
        }
    }
}

fn default_simplify() -> f32 {
    0.0
}
fn default_verbose() -> bool {
    false
}

/// Settings read from a `polyextrude.toml` file
#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub collision_output: Option<PathBuf>,
    /// Douglas-Peucker tolerance applied to input points, 0 disables it
    #[serde(default = "default_simplify")]
    pub simplify: f32,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
    #[serde(default)]
    pub draw: DrawSettings,
}

impl FileConfig {
    pub fn load() -> Option<Self> {
        let config_paths = get_config_paths();

        for path in config_paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("polyextrude.toml"));
    paths.push(PathBuf::from(".polyextrude.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("polyextrude").join("config.toml"));
        paths.push(config_dir.join("polyextrude.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".polyextrude.toml"));
        paths.push(home.join(".config").join("polyextrude").join("config.toml"));
    }

    paths
}
