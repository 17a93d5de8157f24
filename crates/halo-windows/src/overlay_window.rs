use std::ffi::c_void;
use std::mem;
use std::sync::Once;
use std::time::Duration;

use halo_core::{OverlayWindow, Rect, RegistryToken, WindowResult};
use windows::Win32::Foundation::{COLORREF, HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::Graphics::Dwm::{DWMWA_EXCLUDED_FROM_PEEK, DwmSetWindowAttribute};
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, HTTRANSPARENT, HWND_TOPMOST, KillTimer,
    LWA_COLORKEY, RegisterClassW, SW_HIDE, SW_SHOWNOACTIVATE, SWP_NOACTIVATE, SWP_NOREDRAW,
    SetLayeredWindowAttributes, SetTimer, SetWindowPos, ShowWindow, WM_ERASEBKGND, WM_NCHITTEST,
    WNDCLASSW, WS_DISABLED, WS_EX_LAYERED, WS_EX_NOACTIVATE, WS_EX_TOOLWINDOW, WS_EX_TOPMOST,
    WS_EX_TRANSPARENT, WS_POPUP,
};
use windows::core::{BOOL, PCWSTR, w};

use crate::window;

/// Timer ID of every overlay's self-refresh timer.
pub const REFRESH_TIMER_ID: usize = 0x4841;

static REGISTER_CLASS: Once = Once::new();

fn ensure_class_registered() {
    REGISTER_CLASS.call_once(|| {
        let wc = WNDCLASSW {
            lpfnWndProc: Some(overlay_wnd_proc),
            lpszClassName: w!("HaloOverlay"),
            ..Default::default()
        };
        unsafe {
            RegisterClassW(&wc);
        }
    });
}

/// Keeps the overlay out of hit testing and skips background erasing;
/// the render target repaints the whole client area itself.
unsafe extern "system" fn overlay_wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_NCHITTEST => LRESULT(HTTRANSPARENT as isize),
        WM_ERASEBKGND => LRESULT(1),
        _ => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}

/// A layered, click-through popup drawn around one target window.
///
/// Black is the color key, so everything the renderer clears stays
/// invisible and only the stroke shows. The owning registry's token is
/// stored in the user-data slot for timer routing.
pub struct OverlayHwnd {
    hwnd: HWND,
    topmost: bool,
}

impl OverlayHwnd {
    /// Creates a hidden overlay covering `rect`, already in its z-order
    /// slot relative to `target`.
    pub fn create(
        rect: Rect,
        target: usize,
        owner: RegistryToken,
        topmost: bool,
    ) -> WindowResult<Self> {
        ensure_class_registered();

        let mut ex = WS_EX_LAYERED | WS_EX_TOOLWINDOW | WS_EX_TRANSPARENT | WS_EX_NOACTIVATE;
        if topmost {
            ex |= WS_EX_TOPMOST;
        }

        let hwnd = unsafe {
            CreateWindowExW(
                ex,
                w!("HaloOverlay"),
                PCWSTR::null(),
                WS_POPUP | WS_DISABLED,
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                None,
                None,
                None,
                None,
            )?
        };
        // From here on `Drop` cleans up if a later step fails.
        let overlay = Self { hwnd, topmost };

        unsafe { SetLayeredWindowAttributes(hwnd, COLORREF(0), 0, LWA_COLORKEY)? };

        let excluded = BOOL(1);
        // Aero Peek would otherwise leave the outline floating over the desktop.
        let _ = unsafe {
            DwmSetWindowAttribute(
                hwnd,
                DWMWA_EXCLUDED_FROM_PEEK,
                &excluded as *const BOOL as *const c_void,
                mem::size_of::<BOOL>() as u32,
            )
        };

        window::set_owner(hwnd, Some(owner));
        overlay.place(rect, target);
        Ok(overlay)
    }

    pub fn handle(&self) -> HWND {
        self.hwnd
    }
}

impl OverlayWindow for OverlayHwnd {
    fn hwnd(&self) -> usize {
        window::raw(self.hwnd)
    }

    fn show(&self) {
        unsafe {
            let _ = ShowWindow(self.hwnd, SW_SHOWNOACTIVATE);
        }
    }

    fn hide(&self) {
        unsafe {
            let _ = ShowWindow(self.hwnd, SW_HIDE);
        }
    }

    /// Moves the overlay over `rect`. A non-topmost overlay is slotted
    /// directly below `target`, so the target covers all but the margin.
    fn place(&self, rect: Rect, target: usize) {
        let insert_after = if self.topmost {
            HWND_TOPMOST
        } else {
            window::hwnd(target)
        };
        unsafe {
            let _ = SetWindowPos(
                self.hwnd,
                Some(insert_after),
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                SWP_NOREDRAW | SWP_NOACTIVATE,
            );
        }
    }

    fn arm_refresh_timer(&self, interval: Duration) {
        let ms = interval.as_millis().clamp(1, u32::MAX as u128) as u32;
        let id = unsafe { SetTimer(Some(self.hwnd), REFRESH_TIMER_ID, ms, None) };
        if id == 0 {
            halo_core::log_warn!("SetTimer failed for overlay 0x{:X}", self.hwnd());
        }
    }
}

impl Drop for OverlayHwnd {
    fn drop(&mut self) {
        window::set_owner(self.hwnd, None);
        unsafe {
            let _ = KillTimer(Some(self.hwnd), REFRESH_TIMER_ID);
            let _ = DestroyWindow(self.hwnd);
        }
    }
}
