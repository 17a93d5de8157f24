//! The overlay window that keeps itself glued to one tracked window.

use std::time::Duration;

use crate::registry::RegistryToken;
use crate::render::FrameRenderer;
use crate::window::{OverlayWindow, WindowSystem};
use crate::{Color, WindowResult};

/// Default gap in pixels between a tracked window's frame and the
/// outside of its overlay.
pub const DEFAULT_MARGIN: i32 = 3;

/// Default interval of the per-overlay self-refresh timer.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(100);

/// Appearance and refresh settings applied to every new overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    /// Pixels added around the tracked window's extended frame.
    pub margin: i32,
    pub color: Color,
    /// Stroke width at 100% display scale.
    pub thickness: f32,
    /// Corner radius of the stroke. Zero draws a plain rectangle.
    pub corner_radius: f32,
    pub refresh_interval: Duration,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            margin: DEFAULT_MARGIN,
            color: Color::new(0xFF, 0xA5, 0x00),
            thickness: 2.0,
            corner_radius: 0.0,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

/// A transparent companion window outlining one tracked window.
///
/// The overlay's rectangle is the target's extended frame grown by the
/// margin. Event-driven updates keep it in sync; a refresh timer re-runs
/// [`Overlay::refresh`] so a missed notification is corrected within one
/// interval.
pub struct Overlay<S: WindowSystem> {
    target: usize,
    margin: i32,
    color: Color,
    base_thickness: f32,
    thickness: i32,
    corner_radius: f32,
    hidden: bool,
    // Both are `Option` only so `Drop` can release them in order.
    renderer: Option<FrameRenderer<S::Backend>>,
    window: Option<S::Overlay>,
}

impl<S: WindowSystem> Overlay<S> {
    /// Creates, shows, and arms the refresh timer of an overlay for `target`.
    ///
    /// Fails if the target's frame cannot be queried or if the OS window
    /// or its render surface cannot be created. Nothing is left behind on
    /// failure.
    pub fn create(
        system: &S,
        target: usize,
        owner: RegistryToken,
        style: &OverlayStyle,
    ) -> WindowResult<Self> {
        let frame = system
            .frame_rect(target)
            .ok_or_else(|| format!("no extended frame for 0x{target:X}"))?;
        let rect = frame.expand(style.margin);

        let window = system.create_overlay(target, rect, owner)?;
        let mut renderer = FrameRenderer::new(system.create_backend(&window)?);
        renderer.ensure_surface(rect.size())?;

        let mut overlay = Self {
            target,
            margin: style.margin,
            color: style.color,
            base_thickness: style.thickness,
            thickness: 0,
            corner_radius: style.corner_radius,
            hidden: false,
            renderer: Some(renderer),
            window: Some(window),
        };

        overlay.show();
        overlay.refresh(system);
        if let Some(window) = overlay.window.as_ref() {
            window.arm_refresh_timer(style.refresh_interval);
            crate::log_debug!(
                "overlay 0x{:X} created for 0x{:X} at ({},{} {}x{})",
                window.hwnd(),
                target,
                rect.x,
                rect.y,
                rect.width,
                rect.height
            );
        }
        Ok(overlay)
    }

    /// Moves the overlay to the target's current frame without redrawing.
    ///
    /// When the frame is unavailable the overlay is hidden instead. It
    /// comes back on its own once the frame can be queried again.
    pub fn update_position(&mut self, system: &S) {
        let Some(window) = self.window.as_ref() else {
            return;
        };

        match system.frame_rect(self.target) {
            None => {
                if !self.hidden {
                    window.hide();
                    self.hidden = true;
                }
            }
            Some(frame) => {
                window.place(frame.expand(self.margin), self.target);
                if self.hidden {
                    self.show();
                }
            }
        }
    }

    /// Recomputes thickness from the display scale, reapplies the
    /// position, and pushes color, thickness, and corners to the renderer.
    pub fn update_properties(&mut self, system: &S) {
        let Some(frame) = system.frame_rect(self.target) else {
            return;
        };
        let rect = frame.expand(self.margin);

        if let Some(window) = self.window.as_ref() {
            window.place(rect, self.target);
        }

        self.thickness = (self.base_thickness * system.scale_factor(self.target)) as i32;

        if let Some(renderer) = self.renderer.as_mut()
            && let Err(e) =
                renderer.set_geometry(rect.local(), self.color, self.thickness, self.corner_radius)
        {
            crate::log_warn!("overlay for 0x{:X} failed to draw: {e}", self.target);
        }
    }

    /// One self-refresh tick: position first, then properties.
    pub fn refresh(&mut self, system: &S) {
        self.update_position(system);
        self.update_properties(system);
    }

    /// Changes the frame color. Applied by the next [`Self::update_properties`].
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn show(&mut self) {
        if let Some(window) = self.window.as_ref() {
            window.show();
        }
        self.hidden = false;
        if let Some(renderer) = self.renderer.as_mut()
            && let Err(e) = renderer.render()
        {
            crate::log_debug!("overlay for 0x{:X} render on show failed: {e}", self.target);
        }
    }

    pub fn target(&self) -> usize {
        self.target
    }

    /// The overlay's own window handle.
    pub fn hwnd(&self) -> usize {
        self.window.as_ref().map_or(0, |w| w.hwnd())
    }

    pub fn margin(&self) -> i32 {
        self.margin
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Stroke width in device pixels after the last property update.
    pub fn thickness(&self) -> i32 {
        self.thickness
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn window(&self) -> Option<&S::Overlay> {
        self.window.as_ref()
    }

    pub fn renderer(&self) -> Option<&FrameRenderer<S::Backend>> {
        self.renderer.as_ref()
    }
}

impl<S: WindowSystem> Drop for Overlay<S> {
    /// Hides the window, releases the render surface, then destroys the
    /// OS window. The renderer must never outlive the window it draws into.
    fn drop(&mut self) {
        if let Some(window) = self.window.as_ref() {
            window.hide();
        }
        self.renderer = None;
        self.window = None;
    }
}
