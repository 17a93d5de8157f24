use std::ffi::c_void;
use std::mem;

use halo_core::{Color, Rect, RegistryToken, WindowResult, WindowSystem};
use windows::Win32::Foundation::COLORREF;
use windows::Win32::Graphics::Dwm::{DWMWA_CAPTION_COLOR, DwmSetWindowAttribute};
use windows::Win32::Graphics::Direct2D::{
    D2D1_FACTORY_TYPE_SINGLE_THREADED, D2D1CreateFactory, ID2D1Factory,
};

use crate::hook::WinEventSubscription;
use crate::overlay_window::OverlayHwnd;
use crate::render::D2dBackend;
use crate::{dpi, frame, window};

/// Restores the system-drawn caption color.
const DWMWA_COLOR_DEFAULT: COLORREF = COLORREF(0xFFFF_FFFF);

/// Packs a color as `0x00BBGGRR`.
fn colorref(color: Color) -> COLORREF {
    COLORREF(u32::from(color.r) | u32::from(color.g) << 8 | u32::from(color.b) << 16)
}

/// The Win32 implementation of the engine's platform services.
///
/// Holds the single-threaded Direct2D factory shared by every overlay
/// of the owner thread.
pub struct Win32System {
    factory: ID2D1Factory,
    topmost: bool,
}

impl Win32System {
    /// `topmost` keeps overlays above every window instead of directly
    /// below their targets.
    pub fn new(topmost: bool) -> WindowResult<Self> {
        let factory: ID2D1Factory =
            unsafe { D2D1CreateFactory(D2D1_FACTORY_TYPE_SINGLE_THREADED, None)? };
        Ok(Self { factory, topmost })
    }
}

impl WindowSystem for Win32System {
    type Overlay = OverlayHwnd;
    type Backend = D2dBackend;
    type Subscription = WinEventSubscription;

    fn is_window(&self, hwnd: usize) -> bool {
        window::is_window(window::hwnd(hwnd))
    }

    fn is_drawable(&self, hwnd: usize) -> bool {
        window::is_drawable(window::hwnd(hwnd))
    }

    fn frame_rect(&self, hwnd: usize) -> Option<Rect> {
        frame::extended_frame(window::hwnd(hwnd))
    }

    fn scale_factor(&self, hwnd: usize) -> f32 {
        dpi::scale_factor(window::hwnd(hwnd))
    }

    fn create_overlay(
        &self,
        target: usize,
        rect: Rect,
        owner: RegistryToken,
    ) -> WindowResult<OverlayHwnd> {
        OverlayHwnd::create(rect, target, owner, self.topmost)
    }

    fn set_caption_color(&self, hwnd: usize, color: Option<Color>) {
        let value = color.map_or(DWMWA_COLOR_DEFAULT, colorref);
        // SAFETY: Plain-value attribute write with a correctly sized buffer.
        let result = unsafe {
            DwmSetWindowAttribute(
                window::hwnd(hwnd),
                DWMWA_CAPTION_COLOR,
                &value as *const COLORREF as *const c_void,
                mem::size_of::<COLORREF>() as u32,
            )
        };
        if let Err(e) = result {
            halo_core::log_debug!("caption color for 0x{:X} not applied: {e}", hwnd);
        }
    }

    fn create_backend(&self, overlay: &OverlayHwnd) -> WindowResult<D2dBackend> {
        Ok(D2dBackend::new(self.factory.clone(), overlay.handle()))
    }

    fn subscribe(&self, owner: RegistryToken) -> WindowResult<WinEventSubscription> {
        WinEventSubscription::install(owner)
    }
}
