use std::cell::RefCell;

use halo_core::DesktopResidency;
use windows::Win32::System::Com::{CLSCTX_ALL, CoCreateInstance};
use windows::Win32::UI::Shell::{IVirtualDesktopManager, VirtualDesktopManager};
use windows::core::GUID;

use crate::{com, window};

/// Answers residency questions through `IVirtualDesktopManager`.
///
/// The manager is created lazily on the owner thread and dropped after
/// any COM failure (e.g. Explorer restarting), so the next query starts
/// over with a fresh instance.
#[derive(Default)]
pub struct VirtualDesktopOracle {
    manager: RefCell<Option<IVirtualDesktopManager>>,
}

impl VirtualDesktopOracle {
    pub fn new() -> Self {
        Self::default()
    }

    fn manager(&self) -> Option<IVirtualDesktopManager> {
        if let Some(manager) = self.manager.borrow().as_ref() {
            return Some(manager.clone());
        }

        com::ensure_initialized();
        let created: windows::core::Result<IVirtualDesktopManager> =
            unsafe { CoCreateInstance(&VirtualDesktopManager, None, CLSCTX_ALL) };
        match created {
            Ok(manager) => {
                *self.manager.borrow_mut() = Some(manager.clone());
                Some(manager)
            }
            Err(e) => {
                halo_core::log_warn!("IVirtualDesktopManager unavailable: {e}");
                None
            }
        }
    }
}

impl DesktopResidency for VirtualDesktopOracle {
    fn is_on_active_desktop(&self, hwnd: usize) -> bool {
        let Some(manager) = self.manager() else {
            return false;
        };

        match query(&manager, hwnd) {
            Ok(resident) => resident,
            Err(e) => {
                halo_core::log_debug!("residency query for 0x{:X} failed: {e}", hwnd);
                self.manager.replace(None);
                false
            }
        }
    }
}

/// A window counts as resident only when it is on the current desktop
/// and is assigned to a desktop at all. Windows without a desktop ID
/// (shell surfaces, some tool windows) would otherwise pass.
fn query(manager: &IVirtualDesktopManager, raw: usize) -> windows::core::Result<bool> {
    let hwnd = window::hwnd(raw);
    let on_current = unsafe { manager.IsWindowOnCurrentVirtualDesktop(hwnd)? };
    if !on_current.as_bool() {
        return Ok(false);
    }
    let desktop = unsafe { manager.GetWindowDesktopId(hwnd)? };
    Ok(desktop != GUID::zeroed())
}
