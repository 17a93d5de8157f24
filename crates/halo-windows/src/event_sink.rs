use std::sync::Once;

use halo_core::{RegistryToken, WindowResult};
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, PostMessageW, RegisterClassW, WM_APP,
    WNDCLASSW, WS_EX_TOOLWINDOW,
};
use windows::core::w;

use crate::window;

/// Posted to a registry's event sink after a notification was queued.
pub(crate) const WM_WAKE: u32 = WM_APP + 1;

static REGISTER_CLASS: Once = Once::new();

/// Creates the hidden helper window a registry's hooks wake up.
///
/// The window carries the owning registry's token so the message loop
/// can route `WM_WAKE` without any global instance pointer.
/// WS_EX_TOOLWINDOW keeps it out of the taskbar; without WS_VISIBLE it
/// stays hidden.
pub(crate) fn create(owner: RegistryToken) -> WindowResult<HWND> {
    REGISTER_CLASS.call_once(|| {
        let wc = WNDCLASSW {
            lpfnWndProc: Some(event_sink_proc),
            lpszClassName: w!("HaloEventSink"),
            ..Default::default()
        };
        unsafe {
            RegisterClassW(&wc);
        }
    });

    let hwnd = unsafe {
        CreateWindowExW(
            WS_EX_TOOLWINDOW,
            w!("HaloEventSink"),
            w!("HaloEventSink"),
            Default::default(),
            0,
            0,
            0,
            0,
            None,
            None,
            None,
            None,
        )?
    };
    window::set_owner(hwnd, Some(owner));
    Ok(hwnd)
}

pub(crate) fn destroy(hwnd: HWND) {
    window::set_owner(hwnd, None);
    unsafe {
        let _ = DestroyWindow(hwnd);
    }
}

/// Asks the owner thread to drain the registry's queue.
pub(crate) fn wake(hwnd: HWND) {
    unsafe {
        let _ = PostMessageW(Some(hwnd), WM_WAKE, WPARAM(0), LPARAM(0));
    }
}

unsafe extern "system" fn event_sink_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
}
