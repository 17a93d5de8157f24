use std::time::Duration;

use crate::registry::RegistryToken;
use crate::render::RenderBackend;
use crate::{Color, Notification, Rect};

/// A boxed error type for window operations.
///
/// Any error type that implements the `Error` trait can be boxed into this,
/// including `windows::core::Error` from the Win32 bindings.
pub type WindowResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Platform services consumed by the overlay engine.
///
/// Each platform crate (e.g. `halo-windows`) provides its own
/// implementation. Every method is called on the registry's owner thread.
pub trait WindowSystem {
    /// The OS window backing one overlay.
    type Overlay: OverlayWindow;
    /// The GPU renderer bound to one overlay window.
    type Backend: RenderBackend;
    /// A live window-manager notification subscription.
    type Subscription: Subscription;

    /// Returns whether `hwnd` still names a live OS window.
    fn is_window(&self, hwnd: usize) -> bool;

    /// Returns whether the window is visible and not minimized.
    fn is_drawable(&self, hwnd: usize) -> bool;

    /// Returns the compositor-extended frame of the window, or `None`
    /// when the window is gone or the compositor has no frame data.
    fn frame_rect(&self, hwnd: usize) -> Option<Rect>;

    /// Returns the display scale factor for the window's monitor.
    ///
    /// Implementations return `1.0` when the lookup fails.
    fn scale_factor(&self, hwnd: usize) -> f32;

    /// Creates a hidden overlay window covering `rect`, placed in z-order
    /// relative to `target`.
    ///
    /// `owner` is stored with the window so timer ticks can be routed
    /// back to the registry that owns it.
    fn create_overlay(
        &self,
        target: usize,
        rect: Rect,
        owner: RegistryToken,
    ) -> WindowResult<Self::Overlay>;

    /// Paints the caption bar of `hwnd` with `color`, or restores the
    /// system caption color when `color` is `None`.
    ///
    /// Failures are ignored: older systems have no caption color.
    fn set_caption_color(&self, hwnd: usize, color: Option<Color>);

    /// Creates a render backend that draws into `overlay`.
    fn create_backend(&self, overlay: &Self::Overlay) -> WindowResult<Self::Backend>;

    /// Subscribes to window-manager notifications on behalf of `owner`.
    fn subscribe(&self, owner: RegistryToken) -> WindowResult<Self::Subscription>;
}

/// The OS side of one overlay: a transparent, click-through window.
///
/// Dropping the value destroys the OS window and clears any
/// back-reference stored in it.
pub trait OverlayWindow {
    /// The overlay's own window handle.
    fn hwnd(&self) -> usize;

    /// Shows the window without activating it.
    fn show(&self);

    /// Hides the window.
    fn hide(&self);

    /// Moves and resizes the window without redrawing or activating it.
    fn place(&self, rect: Rect, target: usize);

    /// Starts the periodic self-refresh timer.
    fn arm_refresh_timer(&self, interval: Duration);
}

/// A window-manager notification subscription.
///
/// Notifications are copied into a queue by the OS callback and drained
/// on the owner thread. Dropping the subscription releases every hook.
pub trait Subscription {
    /// Returns the next queued notification without blocking.
    fn try_next(&self) -> Option<Notification>;
}
