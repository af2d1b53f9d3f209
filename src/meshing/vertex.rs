//! Vertex data structures and layouts for terrain rendering.
//!
//! This module defines the vertex format produced by the mesher and provides
//! the buffer layout the rendering pipeline binds it with.

/// A vertex in the terrain rendering pipeline.
///
/// Positions are baked in world space so chunks need no per-draw model
/// matrix. The layout matches the vertex shader's expected input.
///
/// # Memory Layout
/// - Position: [f32; 4] (16 bytes)
/// - Normal: [f32; 4] (16 bytes, w unused)
/// - Texture Coordinates: [f32; 2] (8 bytes)
/// - Cosine Power: f32 (4 bytes)
/// - Animation Flag: f32 (4 bytes)
///
/// Total size: 48 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Homogeneous position in world space
    pub position: [f32; 4],
    /// Outward face normal (w is always 0)
    pub normal: [f32; 4],
    /// UV texture coordinates into the block atlas (normalized 0.0-1.0)
    pub uv: [f32; 2],
    /// Blinn-Phong specular exponent for this surface
    pub cosine_power: f32,
    /// 1.0 if the shader should scroll this surface, 0.0 otherwise
    pub animation_flag: f32,
}

impl Vertex {
    /// Creates a new vertex with the given parameters.
    ///
    /// # Arguments
    /// * `position` - World-space position (w set to 1.0)
    /// * `normal` - Outward face normal (w set to 0.0)
    /// * `uv` - Normalized atlas coordinates
    /// * `cosine_power` - Specular exponent of the block's surface
    /// * `animation_flag` - Whether the shader animates the surface
    ///
    /// # Returns
    /// A new `Vertex` instance
    pub fn new(
        position: [f32; 3],
        normal: [f32; 3],
        uv: [f32; 2],
        cosine_power: f32,
        animation_flag: f32,
    ) -> Self {
        Vertex {
            position: [position[0], position[1], position[2], 1.0],
            normal: [normal[0], normal[1], normal[2], 0.0],
            uv,
            cosine_power,
            animation_flag,
        }
    }

    /// Returns the vertex buffer layout description for the shader pipeline.
    ///
    /// # Returns
    /// A `wgpu::VertexBufferLayout` describing the vertex format
    ///
    /// # Shader Attributes
    /// - `location = 0`: position (vec4<f32>)
    /// - `location = 1`: normal (vec4<f32>)
    /// - `location = 2`: uv (vec2<f32>)
    /// - `location = 3`: cosine_power (f32)
    /// - `location = 4`: animation_flag (f32)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 10]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 11]>() as wgpu::BufferAddress,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32,
                },
            ],
        }
    }
}
