//! Ctrl+C handling using `SetConsoleCtrlHandler`.
//!
//! The handler runs on a thread the console spawns, so it never touches
//! the engine: it only asks the owner thread's message loop to quit.

use std::sync::OnceLock;

use halo_core::WindowResult;
use windows::Win32::Foundation::{LPARAM, WPARAM};
use windows::Win32::System::Console::{CTRL_BREAK_EVENT, CTRL_C_EVENT, SetConsoleCtrlHandler};
use windows::Win32::UI::WindowsAndMessaging::{PostThreadMessageW, WM_QUIT};
use windows::core::BOOL;

/// Thread whose message loop receives `WM_QUIT`. Written once.
static OWNER_THREAD: OnceLock<u32> = OnceLock::new();

/// Posts `WM_QUIT` to `thread_id` on Ctrl+C or Ctrl+Break.
pub fn quit_on_ctrl_c(thread_id: u32) -> WindowResult<()> {
    OWNER_THREAD
        .set(thread_id)
        .map_err(|_| "Ctrl+C handler already registered")?;
    unsafe { SetConsoleCtrlHandler(Some(handler), true)? };
    Ok(())
}

unsafe extern "system" fn handler(ctrl_type: u32) -> BOOL {
    if (ctrl_type == CTRL_C_EVENT || ctrl_type == CTRL_BREAK_EVENT)
        && let Some(&thread_id) = OWNER_THREAD.get()
    {
        unsafe {
            let _ = PostThreadMessageW(thread_id, WM_QUIT, WPARAM(0), LPARAM(0));
        }
        return BOOL(1);
    }
    BOOL(0)
}
