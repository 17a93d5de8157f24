//! Render surface management for overlay frames.
//!
//! [`FrameRenderer`] owns one GPU surface per overlay and keeps two
//! concerns apart: the surface is (re)allocated only when the pixel size
//! changes, and the frame is redrawn only when its style changes. Most
//! position-only updates touch neither.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::{Color, Rect, Size, WindowResult};

/// A GPU drawing backend bound to a single overlay window.
pub trait RenderBackend {
    /// A drawable surface of a fixed pixel size.
    type Surface;
    /// A solid-color brush created for a surface.
    type Brush;

    /// Creates a surface of exactly `size`, with antialiasing disabled.
    fn create_surface(&mut self, size: Size) -> WindowResult<Self::Surface>;

    /// Resizes `surface` in place.
    fn resize_surface(&mut self, surface: &mut Self::Surface, size: Size) -> WindowResult<()>;

    /// Creates an opaque solid brush of `color` for `surface`.
    fn create_brush(&mut self, surface: &Self::Surface, color: Color) -> WindowResult<Self::Brush>;

    /// Clears `surface` to fully transparent, strokes `shape`, and presents.
    fn draw(
        &mut self,
        surface: &mut Self::Surface,
        shape: &Shape,
        brush: &Self::Brush,
        thickness: f32,
    ) -> WindowResult<()>;
}

/// A float rectangle in surface coordinates, stored as edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectF {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

/// The stroke path of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Rect(RectF),
    RoundedRect { rect: RectF, radius: f32 },
}

impl Shape {
    /// Builds the stroke path for a frame filling `rect`.
    ///
    /// The path is inset by half the stroke plus one device pixel on each
    /// side so the stroke is never clipped at the surface edge.
    pub fn inset(rect: Rect, thickness: i32, corner_radius: f32) -> Self {
        let inset = thickness as f32 / 2.0 + 1.0;
        let edges = RectF {
            left: rect.x as f32 + inset,
            top: rect.y as f32 + inset,
            right: rect.right() as f32 - inset,
            bottom: rect.bottom() as f32 - inset,
        };
        if corner_radius != 0.0 {
            Self::RoundedRect {
                rect: edges,
                radius: corner_radius,
            }
        } else {
            Self::Rect(edges)
        }
    }

    pub fn is_rounded(&self) -> bool {
        matches!(self, Self::RoundedRect { .. })
    }
}

/// What [`FrameRenderer::ensure_surface`] had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceChange {
    /// The existing surface already had the requested size.
    Unchanged,
    /// The existing surface was resized in place.
    Resized,
    /// A new surface was created.
    Created,
}

/// The last geometry pushed through [`FrameRenderer::set_geometry`].
#[derive(Debug, Clone, Copy, PartialEq)]
struct Scene {
    shape: Shape,
    color: Color,
    thickness: i32,
}

/// Owns the GPU surface and brush of one overlay and redraws on change.
pub struct FrameRenderer<B: RenderBackend> {
    backend: B,
    surface: Option<B::Surface>,
    size: Size,
    size_hash: u64,
    brush: Option<B::Brush>,
    scene: Option<Scene>,
}

fn size_hash(size: Size) -> u64 {
    let mut hasher = DefaultHasher::new();
    size.hash(&mut hasher);
    hasher.finish()
}

impl<B: RenderBackend> FrameRenderer<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            surface: None,
            size: Size::default(),
            size_hash: 0,
            brush: None,
            scene: None,
        }
    }

    /// Makes sure a surface of exactly `size` exists.
    ///
    /// A matching surface is left alone. A mismatched one is resized in
    /// place, and recreated only if the resize fails.
    pub fn ensure_surface(&mut self, size: Size) -> WindowResult<SurfaceChange> {
        let hash = size_hash(size);
        if let Some(surface) = self.surface.as_mut() {
            if hash == self.size_hash {
                return Ok(SurfaceChange::Unchanged);
            }
            match self.backend.resize_surface(surface, size) {
                Ok(()) => {
                    self.size = size;
                    self.size_hash = hash;
                    return Ok(SurfaceChange::Resized);
                }
                Err(e) => {
                    crate::log_debug!(
                        "surface resize to {}x{} failed, recreating: {e}",
                        size.width,
                        size.height
                    );
                }
            }
        }

        self.surface = None;
        self.brush = None;
        let surface = self.backend.create_surface(size)?;
        self.surface = Some(surface);
        self.size = size;
        self.size_hash = hash;
        Ok(SurfaceChange::Created)
    }

    /// Updates the frame geometry and style, redrawing only if needed.
    ///
    /// A redraw happens when the surface size changed or when the color,
    /// the thickness, or the corner style (plain vs rounded) changed. The
    /// brush is rebuilt only for a new color or a freshly created surface.
    pub fn set_geometry(
        &mut self,
        rect: Rect,
        color: Color,
        thickness: i32,
        corner_radius: f32,
    ) -> WindowResult<()> {
        let shape = Shape::inset(rect, thickness, corner_radius);
        let previous = self.scene;

        let color_changed = previous.is_none_or(|s| s.color != color);
        let thickness_changed = previous.is_none_or(|s| s.thickness != thickness);
        let corners_changed = previous.is_none_or(|s| s.shape.is_rounded() != shape.is_rounded());
        let needs_redraw = color_changed || thickness_changed || corners_changed;

        self.scene = Some(Scene {
            shape,
            color,
            thickness,
        });

        let change = self.ensure_surface(rect.size())?;

        if color_changed || change == SurfaceChange::Created || self.brush.is_none() {
            self.brush = None;
            if let Some(surface) = self.surface.as_ref() {
                self.brush = Some(self.backend.create_brush(surface, color)?);
            }
        }

        if change != SurfaceChange::Unchanged || needs_redraw {
            self.render()?;
        }
        Ok(())
    }

    /// Clears the surface and strokes the cached frame.
    ///
    /// Does nothing until both a surface and a brush exist. A failed draw
    /// drops the surface so the next geometry update recreates it.
    pub fn render(&mut self) -> WindowResult<()> {
        let (Some(surface), Some(brush), Some(scene)) =
            (self.surface.as_mut(), self.brush.as_ref(), self.scene.as_ref())
        else {
            return Ok(());
        };

        let result = self
            .backend
            .draw(surface, &scene.shape, brush, scene.thickness as f32);
        if result.is_err() {
            self.brush = None;
            self.surface = None;
            self.size_hash = 0;
        }
        result
    }

    /// Size of the current surface, if one exists.
    pub fn surface_size(&self) -> Option<Size> {
        self.surface.as_ref().map(|_| self.size)
    }

    /// The shape that the next render will stroke.
    pub fn shape(&self) -> Option<Shape> {
        self.scene.map(|s| s.shape)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
