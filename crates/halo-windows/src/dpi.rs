use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Gdi::{MONITOR_DEFAULTTONEAREST, MonitorFromWindow};
use windows::Win32::UI::HiDpi::{
    DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2, GetDpiForMonitor, MDT_EFFECTIVE_DPI,
    SetProcessDpiAwarenessContext,
};

/// DPI of a monitor at 100% scaling.
const BASE_DPI: f32 = 96.0;

/// Declares this process as per-monitor DPI aware (V2).
///
/// Without this, Windows virtualizes coordinates based on the primary
/// monitor's DPI and frame bounds come back scaled on mixed-DPI setups.
///
/// Must be called once at process startup, before creating any windows.
pub fn enable_dpi_awareness() {
    // SAFETY: SetProcessDpiAwarenessContext is safe to call once at startup.
    // If it fails (e.g. already set via manifest), we ignore the error.
    unsafe {
        let _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);
    }
}

/// Returns the scale factor of the monitor nearest to `hwnd`.
///
/// 1.0 means 96 DPI. Falls back to 1.0 when the lookup fails.
pub fn scale_factor(hwnd: HWND) -> f32 {
    let (mut dpi_x, mut dpi_y) = (0u32, 0u32);
    // SAFETY: MONITOR_DEFAULTTONEAREST always yields a monitor handle,
    // and both out-pointers are valid locals.
    let result = unsafe {
        let monitor = MonitorFromWindow(hwnd, MONITOR_DEFAULTTONEAREST);
        GetDpiForMonitor(monitor, MDT_EFFECTIVE_DPI, &mut dpi_x, &mut dpi_y)
    };

    match result {
        Ok(()) if dpi_x > 0 => dpi_x as f32 / BASE_DPI,
        _ => 1.0,
    }
}
