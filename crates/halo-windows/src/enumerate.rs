use halo_core::{DesktopResidency, Rect, WindowResult};
use windows::Win32::Foundation::{HWND, LPARAM};
use windows::Win32::UI::WindowsAndMessaging::{EnumWindows, IsWindowVisible};
use windows::core::BOOL;

use crate::residency::VirtualDesktopOracle;
use crate::{frame, window};

/// Enumerates visible top-level windows with a non-empty title, skipping
/// tool windows and every window of this process.
///
/// This is the periodic feed of candidate windows: the registry decides
/// for itself which of them get an overlay.
pub fn enumerate_windows() -> WindowResult<Vec<usize>> {
    let mut handles: Vec<usize> = Vec::new();

    // SAFETY: EnumWindows runs synchronously and calls our callback for
    // each top-level window. The Vec is passed as LPARAM and outlives
    // the call.
    unsafe {
        EnumWindows(
            Some(enum_window_callback),
            LPARAM(&mut handles as *mut _ as isize),
        )?;
    }

    Ok(handles)
}

unsafe extern "system" fn enum_window_callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
    // SAFETY: lparam is the Vec<usize> pointer from enumerate_windows().
    let handles = unsafe { &mut *(lparam.0 as *mut Vec<usize>) };

    if is_candidate(hwnd) {
        handles.push(window::raw(hwnd));
    }

    BOOL(1) // TRUE: continue enumerating
}

fn is_candidate(hwnd: HWND) -> bool {
    // SAFETY: Simple query that reads window state.
    unsafe { IsWindowVisible(hwnd).as_bool() }
        && !window::is_own(hwnd)
        && !window::is_tool_window(hwnd)
        && !window::title(hwnd).is_empty()
}

/// One row of `halo list`.
#[derive(Debug, Clone)]
pub struct WindowInfo {
    pub hwnd: usize,
    pub title: String,
    pub frame: Option<Rect>,
    pub drawable: bool,
    pub resident: bool,
}

impl WindowInfo {
    /// Whether the engine would outline this window right now.
    pub fn eligible(&self) -> bool {
        self.drawable && self.resident && self.frame.is_some()
    }
}

/// Enumerates the feed and describes each window as the engine sees it.
pub fn describe_windows() -> WindowResult<Vec<WindowInfo>> {
    let oracle = VirtualDesktopOracle::new();
    let infos = enumerate_windows()?
        .into_iter()
        .map(|raw| {
            let hwnd = window::hwnd(raw);
            WindowInfo {
                hwnd: raw,
                title: window::title(hwnd),
                frame: frame::extended_frame(hwnd),
                drawable: window::is_drawable(hwnd),
                resident: oracle.is_on_active_desktop(raw),
            }
        })
        .collect();
    Ok(infos)
}
