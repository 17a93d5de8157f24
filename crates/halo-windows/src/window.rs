use halo_core::RegistryToken;
use windows::Win32::Foundation::HWND;
use windows::Win32::System::Threading::GetCurrentProcessId;
use windows::Win32::UI::WindowsAndMessaging::{
    GWL_EXSTYLE, GWLP_USERDATA, GetWindowLongPtrW, GetWindowTextLengthW, GetWindowTextW,
    GetWindowThreadProcessId, IsIconic, IsWindow, IsWindowVisible, SetWindowLongPtrW,
    WS_EX_TOOLWINDOW,
};

/// Rebuilds an `HWND` from a raw handle value (pointer-sized integer).
///
/// The engine only ever sees raw values, so it never depends on the
/// `windows` crate directly.
pub fn hwnd(raw: usize) -> HWND {
    HWND(raw as *mut _)
}

/// Returns the raw handle value of `hwnd`.
pub fn raw(hwnd: HWND) -> usize {
    hwnd.0 as usize
}

/// Returns whether `hwnd` still names a live window.
pub fn is_window(hwnd: HWND) -> bool {
    // SAFETY: IsWindow accepts any handle value, including stale ones.
    unsafe { IsWindow(Some(hwnd)).as_bool() }
}

/// Returns whether the window is visible and not minimized.
pub fn is_drawable(hwnd: HWND) -> bool {
    // SAFETY: Simple query functions that read window state.
    unsafe { IsWindowVisible(hwnd).as_bool() && !IsIconic(hwnd).as_bool() }
}

/// Returns whether the window belongs to this process.
///
/// Overlays and the event sink live here, and none of them may ever be
/// fed back to a registry as a window to outline.
pub fn is_own(hwnd: HWND) -> bool {
    let mut pid = 0u32;
    // SAFETY: Reads the owning process ID into a local.
    unsafe {
        GetWindowThreadProcessId(hwnd, Some(&mut pid));
        pid != 0 && pid == GetCurrentProcessId()
    }
}

/// Returns whether the window carries `WS_EX_TOOLWINDOW`.
pub fn is_tool_window(hwnd: HWND) -> bool {
    // SAFETY: Simple style query.
    let ex_style = unsafe { GetWindowLongPtrW(hwnd, GWL_EXSTYLE) } as u32;
    ex_style & WS_EX_TOOLWINDOW.0 == WS_EX_TOOLWINDOW.0
}

/// Returns the window title, or an empty string if it has none.
pub fn title(hwnd: HWND) -> String {
    // SAFETY: The buffer is sized from GetWindowTextLengthW plus the
    // terminating NUL, and GetWindowTextW never writes past it.
    unsafe {
        let len = GetWindowTextLengthW(hwnd);
        if len <= 0 {
            return String::new();
        }
        let mut buf = vec![0u16; len as usize + 1];
        let copied = GetWindowTextW(hwnd, &mut buf);
        String::from_utf16_lossy(&buf[..copied.max(0) as usize])
    }
}

/// Stores the owning registry's token in the window's user-data slot.
///
/// `None` clears the slot so late messages no longer route anywhere.
pub(crate) fn set_owner(hwnd: HWND, owner: Option<RegistryToken>) {
    let value = owner.map_or(0, |t| t.as_raw() as isize);
    // SAFETY: GWLP_USERDATA is reserved for the application; we only
    // ever store a plain integer in it, never a pointer.
    unsafe {
        SetWindowLongPtrW(hwnd, GWLP_USERDATA, value);
    }
}

/// Reads the owning registry's token from the window's user-data slot.
pub(crate) fn owner(hwnd: HWND) -> Option<RegistryToken> {
    // SAFETY: See `set_owner`.
    let value = unsafe { GetWindowLongPtrW(hwnd, GWLP_USERDATA) };
    RegistryToken::from_raw(value as u64)
}
