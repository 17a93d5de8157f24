use std::mem;

use halo_core::Rect;
use windows::Win32::Foundation::{HWND, RECT};
use windows::Win32::Graphics::Dwm::{DWMWA_EXTENDED_FRAME_BOUNDS, DwmGetWindowAttribute};

/// Returns the visible bounds of a window using DWM extended frame bounds.
///
/// On Windows 10/11 `GetWindowRect` includes invisible drop-shadow
/// borders, so it is never used as a fallback: an outline drawn around
/// it would float several pixels away from the window. `None` means the
/// window is gone or DWM has no frame for it.
pub fn extended_frame(hwnd: HWND) -> Option<Rect> {
    let mut frame = RECT::default();
    // SAFETY: `frame` is a valid, correctly sized out-buffer for
    // DWMWA_EXTENDED_FRAME_BOUNDS.
    unsafe {
        DwmGetWindowAttribute(
            hwnd,
            DWMWA_EXTENDED_FRAME_BOUNDS,
            &mut frame as *mut RECT as *mut _,
            mem::size_of::<RECT>() as u32,
        )
    }
    .ok()?;

    Some(Rect::from_edges(
        frame.left,
        frame.top,
        frame.right,
        frame.bottom,
    ))
}
