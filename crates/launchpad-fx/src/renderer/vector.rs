//! Lyon-backed vector surface.
//!
//! Tessellates every draw call on the CPU into a flat triangle-list vertex
//! buffer that a GPU renderer uploads as-is. Radial gradients are
//! approximated with concentric rings.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use lyon::math::point;
use lyon::path::Path;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, FillVertexConstructor,
    StrokeOptions, StrokeTessellator, StrokeVertex, StrokeVertexConstructor, VertexBuffers,
};

use super::surface::{sample_gradient, GradientStop, RenderTier, Surface};
use crate::api::types::Viewport;
use crate::core::color::Color;

/// Per-vertex data for vector/polygon rendering.
/// 6 floats = 24 bytes per vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct VectorVertex {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl VectorVertex {
    /// Number of floats per vertex.
    pub const FLOATS: usize = 6;
    /// Stride in bytes.
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4; // 24

    fn at(position: lyon::math::Point, color: Color) -> Self {
        Self {
            x: position.x,
            y: position.y,
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        }
    }
}

/// Vertex constructor for lyon fill tessellation.
struct FillVertexCtor {
    color: Color,
}

impl FillVertexConstructor<VectorVertex> for FillVertexCtor {
    fn new_vertex(&mut self, vertex: FillVertex) -> VectorVertex {
        VectorVertex::at(vertex.position(), self.color)
    }
}

/// Vertex constructor for lyon stroke tessellation.
struct StrokeVertexCtor {
    color: Color,
}

impl StrokeVertexConstructor<VectorVertex> for StrokeVertexCtor {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> VectorVertex {
        VectorVertex::at(vertex.position(), self.color)
    }
}

/// Surface that records draw calls as triangles.
///
/// Call [`VectorSurface::clear`] once per frame after the renderer consumed
/// the buffer; the trail rectangle is just another (translucent) quad.
pub struct VectorSurface {
    size: Vec2,
    fill_tess: FillTessellator,
    stroke_tess: StrokeTessellator,
    geometry: VertexBuffers<VectorVertex, u32>,
    buffer: Vec<VectorVertex>,
}

impl VectorSurface {
    /// Rings used to approximate a radial gradient.
    pub const GRADIENT_RINGS: usize = 8;

    pub fn new(viewport: Viewport) -> Self {
        Self {
            size: Vec2::new(viewport.width, viewport.height),
            fill_tess: FillTessellator::new(),
            stroke_tess: StrokeTessellator::new(),
            geometry: VertexBuffers::new(),
            buffer: Vec::with_capacity(16384),
        }
    }

    /// Drop all recorded triangles.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Number of vertices currently in the buffer.
    pub fn vertex_count(&self) -> usize {
        self.buffer.len()
    }

    pub fn vertices(&self) -> &[VectorVertex] {
        &self.buffer
    }

    /// Flat float view for upload.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.buffer)
    }

    /// Flush indexed geometry to the flat buffer as triangle list.
    fn flush_geometry(&mut self) {
        for idx in &self.geometry.indices {
            self.buffer.push(self.geometry.vertices[*idx as usize]);
        }
        self.geometry.vertices.clear();
        self.geometry.indices.clear();
    }

    fn fill_path(&mut self, path: &Path, color: Color) {
        let result = self.fill_tess.tessellate_path(
            path,
            &FillOptions::tolerance(0.5),
            &mut BuffersBuilder::new(&mut self.geometry, FillVertexCtor { color }),
        );

        match result {
            Ok(()) => self.flush_geometry(),
            Err(err) => {
                log::debug!("fill tessellation failed: {err:?}");
                self.geometry.vertices.clear();
                self.geometry.indices.clear();
            }
        }
    }

    fn stroke_path(&mut self, path: &Path, width: f32, color: Color) {
        let result = self.stroke_tess.tessellate_path(
            path,
            &StrokeOptions::tolerance(0.5).with_line_width(width),
            &mut BuffersBuilder::new(&mut self.geometry, StrokeVertexCtor { color }),
        );

        match result {
            Ok(()) => self.flush_geometry(),
            Err(err) => {
                log::debug!("stroke tessellation failed: {err:?}");
                self.geometry.vertices.clear();
                self.geometry.indices.clear();
            }
        }
    }

    fn circle_path(center: Vec2, radius: f32) -> Path {
        let mut builder = Path::builder();
        builder.add_circle(point(center.x, center.y), radius, lyon::path::Winding::Positive);
        builder.build()
    }
}

impl Surface for VectorSurface {
    fn backend(&self) -> &'static str {
        "vector"
    }

    fn tier(&self) -> RenderTier {
        RenderTier::Vector
    }

    fn size(&self) -> Vec2 {
        self.size
    }

    fn resize(&mut self, viewport: Viewport) {
        self.size = Vec2::new(viewport.width, viewport.height);
        self.clear();
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        if size.x <= 0.0 || size.y <= 0.0 {
            return;
        }
        let mut builder = Path::builder();
        builder.begin(point(origin.x, origin.y));
        builder.line_to(point(origin.x + size.x, origin.y));
        builder.line_to(point(origin.x + size.x, origin.y + size.y));
        builder.line_to(point(origin.x, origin.y + size.y));
        builder.close();
        let path = builder.build();

        self.fill_path(&path, color);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let path = Self::circle_path(center, radius);
        self.fill_path(&path, color);
    }

    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, stops: &[GradientStop]) {
        if radius <= 0.0 || stops.is_empty() {
            return;
        }
        // Outermost ring first so inner rings composite on top.
        for ring in (0..Self::GRADIENT_RINGS).rev() {
            let outer = (ring + 1) as f32 / Self::GRADIENT_RINGS as f32;
            let mid = (ring as f32 + 0.5) / Self::GRADIENT_RINGS as f32;
            let color = sample_gradient(stops, mid);
            if color.a <= 0.0 {
                continue;
            }
            let path = Self::circle_path(center, radius * outer);
            self.fill_path(&path, color.with_alpha(color.a / Self::GRADIENT_RINGS as f32 * 2.0));
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        if width <= 0.0 {
            return;
        }
        let mut builder = Path::builder();
        builder.begin(point(from.x, from.y));
        builder.line_to(point(to.x, to.y));
        builder.end(false); // open path
        let path = builder.build();

        self.stroke_path(&path, width, color);
    }
}
