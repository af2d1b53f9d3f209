//! # Terrain Renderer
//!
//! `wgpu`-backed residency and drawing for chunk meshes.
//!
//! The renderer owns one vertex/index buffer pair per pass per resident
//! chunk, keyed by the chunk's `ChunkKey`. It does not own a pipeline:
//! the host application binds its terrain pipeline (built with
//! `Vertex::desc()`) and bind groups, then asks the renderer to record the
//! draw calls for a world-space rectangle.

use std::collections::HashMap;
use std::sync::Arc;

use log::trace;
use wgpu::util::DeviceExt;

use crate::meshing::{ChunkMeshData, Vertex};
use crate::rendering::MeshUploader;
use crate::voxels::coords::{ChunkKey, CHUNK_DIM_X, CHUNK_DIM_Z};

/// One uploaded vertex/index buffer pair.
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// GPU state for one resident chunk, split by pass.
struct ChunkRenderState {
    opaque: Option<GpuMesh>,
    transparent: Option<GpuMesh>,
}

/// Uploads chunk meshes to the GPU and records their draw calls.
pub struct TerrainRenderer {
    device: Arc<wgpu::Device>,
    chunks: HashMap<ChunkKey, ChunkRenderState>,
}

impl TerrainRenderer {
    /// Creates a renderer with no resident chunks.
    ///
    /// # Arguments
    /// * `device` - The device buffers are allocated on
    pub fn new(device: Arc<wgpu::Device>) -> Self {
        Self {
            device,
            chunks: HashMap::new(),
        }
    }

    /// Returns the number of chunks with GPU state.
    pub fn resident_chunks(&self) -> usize {
        self.chunks.len()
    }

    fn make_mesh(&self, vertices: &[Vertex], indices: &[u32], label: &str) -> Option<GpuMesh> {
        if indices.is_empty() {
            return None;
        }
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        Some(GpuMesh {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        })
    }

    /// Records draw calls for the opaque pass over a world-space rectangle.
    ///
    /// Chunks without resident opaque geometry are skipped. The caller has
    /// already set the pipeline and bind groups on the pass.
    ///
    /// # Arguments
    /// * `render_pass` - The pass to record into
    /// * `min_x`, `max_x`, `min_z`, `max_z` - Inclusive world-space bounds,
    ///   stepped at chunk granularity
    pub fn draw_opaque<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        min_x: i32,
        max_x: i32,
        min_z: i32,
        max_z: i32,
    ) {
        self.draw_pass(render_pass, min_x, max_x, min_z, max_z, |state| {
            state.opaque.as_ref()
        });
    }

    /// Records draw calls for the translucent pass over a world-space
    /// rectangle. Draw this after the opaque pass with blending enabled.
    pub fn draw_transparent<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        min_x: i32,
        max_x: i32,
        min_z: i32,
        max_z: i32,
    ) {
        self.draw_pass(render_pass, min_x, max_x, min_z, max_z, |state| {
            state.transparent.as_ref()
        });
    }

    fn draw_pass<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        min_x: i32,
        max_x: i32,
        min_z: i32,
        max_z: i32,
        select: impl Fn(&ChunkRenderState) -> Option<&GpuMesh>,
    ) {
        let mut x = min_x;
        while x <= max_x {
            let mut z = min_z;
            while z <= max_z {
                if let Some(mesh) = self
                    .chunks
                    .get(&ChunkKey::chunk_at(x, z))
                    .and_then(&select)
                {
                    render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                    render_pass
                        .set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
                }
                z += CHUNK_DIM_Z;
            }
            x += CHUNK_DIM_X;
        }
    }
}

impl MeshUploader for TerrainRenderer {
    fn upload(&mut self, mesh: ChunkMeshData) {
        trace!(
            "uploading chunk {:?}: {} opaque / {} transparent indices",
            mesh.key,
            mesh.opaque_indices.len(),
            mesh.transparent_indices.len()
        );
        let state = ChunkRenderState {
            opaque: self.make_mesh(&mesh.opaque_vertices, &mesh.opaque_indices, "chunk_opaque"),
            transparent: self.make_mesh(
                &mesh.transparent_vertices,
                &mesh.transparent_indices,
                "chunk_transparent",
            ),
        };
        // Replacing the entry drops any previous buffers for this chunk.
        self.chunks.insert(mesh.key, state);
    }

    fn release(&mut self, key: ChunkKey) {
        if self.chunks.remove(&key).is_some() {
            trace!("released chunk {:?}", key);
        }
    }
}
