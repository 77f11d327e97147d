//! Vertex type for grass rendering

use bytemuck::{Pod, Zeroable};

/// One grass mesh vertex in rest pose. The shader re-derives the displayed
/// position each frame: `position.y` scales with the growth stage at `root`,
/// wind sway displaces the upper part of the blade.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct GrassVertex {
    /// Rest-pose world position (y = 0 at the roots)
    pub position: [f32; 3],
    /// Ground position (x,z) of the owning blade's base; every vertex of a
    /// blade carries the same root so the whole blade shares one growth stage
    pub root: [f32; 2],
    /// Field-space texture coordinate in [0,1]x[0,1]
    pub uv: [f32; 2],
    /// Rest height of the owning blade's tip
    pub height: f32,
}

impl GrassVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GrassVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 7]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32,
                },
            ],
        }
    }
}

/// Colors for the scene
pub mod colors {
    /// Freshly mowed grass (shader palette endpoint)
    pub const CUT: [f32; 4] = [0.62, 0.53, 0.24, 1.0];
    /// Fully grown grass (shader palette endpoint)
    pub const GROWN: [f32; 4] = [0.18, 0.55, 0.16, 1.0];
    /// Soil clear color behind the blades
    pub const GROUND: wgpu::Color = wgpu::Color {
        r: 0.16,
        g: 0.23,
        b: 0.10,
        a: 1.0,
    };
}
