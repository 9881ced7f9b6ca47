//! Vertex data files for the shading scene.
//!
//! The format is a flat list of numbers separated by commas and/or
//! whitespace, six per vertex: position xyz, then normal xyz.

use std::path::Path;

use anyhow::{Context, Result, bail, ensure};
use bytemuck::{Pod, Zeroable};

/// Floats per vertex in the data file.
pub const FLOATS_PER_VERTEX: usize = 6;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Axis-aligned bounds of the mesh positions.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Bounds {
    fn around(vertices: &[MeshVertex]) -> Self {
        let mut min = [f32::INFINITY; 3];
        let mut max = [f32::NEG_INFINITY; 3];
        for v in vertices {
            for axis in 0..3 {
                min[axis] = min[axis].min(v.position[axis]);
                max[axis] = max[axis].max(v.position[axis]);
            }
        }
        Self { min, max }
    }

    pub fn center(&self) -> [f32; 3] {
        [0, 1, 2].map(|a| (self.min[a] + self.max[a]) * 0.5)
    }

    /// Half the diagonal: radius of the sphere through the box corners.
    pub fn radius(&self) -> f32 {
        let [dx, dy, dz] = [0, 1, 2].map(|a| self.max[a] - self.min[a]);
        (dx * dx + dy * dy + dz * dz).sqrt() * 0.5
    }
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub bounds: Bounds,
}

impl Mesh {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read vertex data from {}", path.display()))?;
        let mesh = Self::parse(&text)
            .with_context(|| format!("invalid vertex data in {}", path.display()))?;
        log::info!("loaded {} vertices from {}", mesh.vertices.len(), path.display());
        Ok(mesh)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut floats = Vec::new();
        for token in text.split(|c: char| c == ',' || c.is_whitespace()) {
            if token.is_empty() {
                continue;
            }
            let value: f32 = match token.parse() {
                Ok(v) => v,
                Err(_) => bail!("'{token}' (value #{}) is not a number", floats.len() + 1),
            };
            ensure!(value.is_finite(), "value #{} is not finite", floats.len() + 1);
            floats.push(value);
        }

        let leftover = floats.len() % FLOATS_PER_VERTEX;
        if leftover != 0 {
            log::warn!("ignoring {leftover} trailing values that do not form a whole vertex");
        }

        let vertices: Vec<MeshVertex> = floats
            .chunks_exact(FLOATS_PER_VERTEX)
            .map(|c| MeshVertex {
                position: [c[0], c[1], c[2]],
                normal: [c[3], c[4], c[5]],
            })
            .collect();
        ensure!(!vertices.is_empty(), "no vertices");
        ensure!(
            u32::try_from(vertices.len()).is_ok(),
            "{} vertices exceed the draw call limit",
            vertices.len()
        );

        let bounds = Bounds::around(&vertices);
        Ok(Self { vertices, bounds })
    }

    pub fn vertex_count(&self) -> u32 {
        // Bounded in `parse`.
        self.vertices.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_six_floats() {
        assert_eq!(std::mem::size_of::<MeshVertex>(), 24);
    }

    #[test]
    fn parses_commas_and_newlines() {
        let mesh = Mesh::parse("0, 0, 0, 0, 1, 0,\n1,2,3,0,0,1\n").unwrap();
        assert_eq!(mesh.vertex_count(), 2);
        assert_eq!(mesh.vertices[1].position, [1.0, 2.0, 3.0]);
        assert_eq!(mesh.vertices[1].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn line_break_without_comma_still_separates() {
        let mesh = Mesh::parse("1,2,3,0,0,1\n4,5,6,0,1,0").unwrap();
        assert_eq!(mesh.vertex_count(), 2);
        assert_eq!(mesh.vertices[1].position, [4.0, 5.0, 6.0]);
    }

    #[test]
    fn trailing_partial_vertex_is_dropped() {
        let mesh = Mesh::parse("1,2,3,0,0,1,9,9").unwrap();
        assert_eq!(mesh.vertex_count(), 1);
    }

    #[test]
    fn rejects_garbage_and_empty_input() {
        let err = Mesh::parse("1,2,x,0,0,1").unwrap_err().to_string();
        assert!(err.contains("'x'"));
        assert!(Mesh::parse("1,2,inf,0,0,1").is_err());
        assert!(Mesh::parse(" ,\n ").is_err());
        assert!(Mesh::parse("1,2,3").is_err());
    }

    #[test]
    fn bounds_center_and_radius() {
        let mesh = Mesh::parse("-1,-2,-2,0,1,0, 3,2,2,0,1,0").unwrap();
        assert_eq!(mesh.bounds.min, [-1.0, -2.0, -2.0]);
        assert_eq!(mesh.bounds.max, [3.0, 2.0, 2.0]);
        assert_eq!(mesh.bounds.center(), [1.0, 0.0, 0.0]);
        // Diagonal of a 4x4x4 box.
        assert!((mesh.bounds.radius() - 48f32.sqrt() * 0.5).abs() < 1e-5);
    }
}
