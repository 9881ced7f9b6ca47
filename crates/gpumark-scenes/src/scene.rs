use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use gpumark_engine::render::{RenderCtx, RenderTarget};

use crate::animometer::AnimometerScene;
use crate::boids::ComputeBoidsScene;
use crate::clear::ClearScene;
use crate::cube::CubeScene;
use crate::shading::{Mesh, ShadingScene};
use crate::triangle::TriangleScene;

/// A sample scene.
///
/// GPU objects are created once in the scene's constructor; `frame` only
/// writes buffers and records passes into the target encoder. Each scene
/// clears the color target itself.
pub trait Scene {
    fn kind(&self) -> SceneKind;

    /// Records one frame.
    fn frame(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>);
}

/// Every scene the harness can run.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SceneKind {
    Clear,
    Triangle,
    Animometer,
    ComputeBoids,
    Cube,
    Shading,
}

impl SceneKind {
    pub const ALL: [SceneKind; 6] = [
        SceneKind::Clear,
        SceneKind::Triangle,
        SceneKind::Animometer,
        SceneKind::ComputeBoids,
        SceneKind::Cube,
        SceneKind::Shading,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SceneKind::Clear => "clear",
            SceneKind::Triangle => "triangle",
            SceneKind::Animometer => "animometer",
            SceneKind::ComputeBoids => "boids",
            SceneKind::Cube => "cube",
            SceneKind::Shading => "shading",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SceneKind::Clear => "render-pass clear cycling through the hue wheel",
            SceneKind::Triangle => "single hard-coded red triangle",
            SceneKind::Animometer => "10000 fading triangles via dynamic uniform offsets",
            SceneKind::ComputeBoids => "flocking particles updated by a compute shader",
            SceneKind::Cube => "lit rotating cube with a depth buffer",
            SceneKind::Shading => "diffuse-lit mesh from a vertex data file (needs --mesh)",
        }
    }

    /// Runs the scene's one-time setup.
    pub fn create(self, ctx: &RenderCtx<'_>, options: &SceneOptions) -> Result<Box<dyn Scene>> {
        log::info!("setting up scene '{}'", self.name());
        Ok(match self {
            SceneKind::Clear => Box::new(ClearScene::new()),
            SceneKind::Triangle => Box::new(TriangleScene::new(ctx)),
            SceneKind::Animometer => Box::new(AnimometerScene::new(ctx, options.seed)?),
            SceneKind::ComputeBoids => Box::new(ComputeBoidsScene::new(ctx, options.seed)?),
            SceneKind::Cube => Box::new(CubeScene::new(ctx)),
            SceneKind::Shading => {
                let mesh = Mesh::load(options.require_mesh()?)?;
                Box::new(ShadingScene::new(ctx, &mesh))
            }
        })
    }
}

/// Inputs some scenes need at setup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneOptions {
    /// Drives the scenes that randomize their initial state.
    pub seed: u64,
    /// Vertex data file for the shading scene.
    pub mesh: Option<PathBuf>,
}

impl SceneOptions {
    fn require_mesh(&self) -> Result<&std::path::Path> {
        self.mesh
            .as_deref()
            .context("the shading scene needs a vertex data file (--mesh PATH)")
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SceneKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_ascii_lowercase();
        let kind = match lowered.as_str() {
            "clear" => SceneKind::Clear,
            "triangle" | "hello-triangle" => SceneKind::Triangle,
            "animometer" => SceneKind::Animometer,
            "boids" | "computeboids" | "compute-boids" => SceneKind::ComputeBoids,
            "cube" => SceneKind::Cube,
            "shading" => SceneKind::Shading,
            _ => {
                let names: Vec<&str> = SceneKind::ALL.iter().map(|k| k.name()).collect();
                anyhow::bail!("unknown scene '{s}' (expected one of: {})", names.join(", "))
            }
        };
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in SceneKind::ALL {
            assert_eq!(kind.name().parse::<SceneKind>().unwrap(), kind);
        }
    }

    #[test]
    fn parse_is_case_insensitive_and_accepts_aliases() {
        assert_eq!("ComputeBoids".parse::<SceneKind>().unwrap(), SceneKind::ComputeBoids);
        assert_eq!(" CUBE ".parse::<SceneKind>().unwrap(), SceneKind::Cube);
        assert_eq!("hello-triangle".parse::<SceneKind>().unwrap(), SceneKind::Triangle);
    }

    #[test]
    fn shading_without_mesh_is_an_error() {
        let err = SceneOptions::default().require_mesh().unwrap_err().to_string();
        assert!(err.contains("--mesh"));

        let opts = SceneOptions {
            mesh: Some(PathBuf::from("shading.data")),
            ..SceneOptions::default()
        };
        assert_eq!(opts.require_mesh().unwrap(), std::path::Path::new("shading.data"));
    }

    #[test]
    fn unknown_scene_lists_valid_names() {
        let err = "teapot".parse::<SceneKind>().unwrap_err().to_string();
        assert!(err.contains("teapot"));
        assert!(err.contains("animometer"));
        assert!(err.contains("boids"));
    }
}
