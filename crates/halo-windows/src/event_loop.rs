//! The owner-thread message loop.
//!
//! Every registry, overlay window, hook, and render target lives on the
//! thread that runs [`EventLoop::run`]. Engine messages are intercepted
//! before `DispatchMessageW`, the same way hotkey messages would be.

use std::collections::HashMap;
use std::time::Duration;

use halo_core::{Registry, RegistryToken};
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, GetMessageW, KillTimer, MSG, SetTimer, TranslateMessage, WM_TIMER,
};

use crate::enumerate::enumerate_windows;
use crate::event_sink::WM_WAKE;
use crate::overlay_window::REFRESH_TIMER_ID;
use crate::residency::VirtualDesktopOracle;
use crate::system::Win32System;
use crate::window;

/// A registry driven by the Win32 backends.
pub type WinRegistry = Registry<Win32System, VirtualDesktopOracle>;

/// Drives any number of registries from one message pump.
///
/// Messages are routed by the registry token stored in the target
/// window's user-data slot.
pub struct EventLoop {
    registries: HashMap<RegistryToken, WinRegistry>,
    enumerate_interval: Duration,
}

impl EventLoop {
    pub fn new(enumerate_interval: Duration) -> Self {
        Self {
            registries: HashMap::new(),
            enumerate_interval,
        }
    }

    pub fn add(&mut self, registry: WinRegistry) {
        self.registries.insert(registry.token(), registry);
    }

    /// Feeds one enumeration pass and blocks until `WM_QUIT`.
    pub fn run(&mut self) {
        self.enumerate();

        let ms = self.enumerate_interval.as_millis().clamp(1, u32::MAX as u128) as u32;
        // A thread timer: no window, so the tick arrives with a null HWND.
        let timer = unsafe { SetTimer(None, 0, ms, None) };
        if timer == 0 {
            halo_core::log_warn!("enumeration timer not set; only startup windows are tracked");
        }

        let mut msg = MSG::default();
        while unsafe { GetMessageW(&mut msg, None, 0, 0).as_bool() } {
            if self.route(&msg, timer) {
                continue;
            }

            unsafe {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }

        if timer != 0 {
            unsafe {
                let _ = KillTimer(None, timer);
            }
        }
    }

    /// Handles engine messages. Returns `false` for anything else.
    fn route(&mut self, msg: &MSG, enumerate_timer: usize) -> bool {
        match msg.message {
            WM_TIMER if msg.hwnd.is_invalid() && msg.wParam.0 == enumerate_timer => {
                self.enumerate();
                true
            }
            WM_TIMER if msg.wParam.0 == REFRESH_TIMER_ID => {
                if let Some(registry) = self.registry_for(msg.hwnd) {
                    registry.on_refresh_timer(window::raw(msg.hwnd));
                }
                true
            }
            WM_WAKE => {
                if let Some(registry) = self.registry_for(msg.hwnd) {
                    registry.pump();
                }
                true
            }
            _ => false,
        }
    }

    fn registry_for(&mut self, hwnd: HWND) -> Option<&mut WinRegistry> {
        let token = window::owner(hwnd)?;
        self.registries.get_mut(&token)
    }

    /// Offers every enumerated window to every registry.
    fn enumerate(&mut self) {
        let handles = match enumerate_windows() {
            Ok(handles) => handles,
            Err(e) => {
                halo_core::log_warn!("EnumWindows failed: {e}");
                return;
            }
        };

        for registry in self.registries.values_mut() {
            for &hwnd in &handles {
                registry.add_window(hwnd);
            }
            halo_core::log_debug!(
                "enumerated {} windows: {} tracked, {} outlined",
                handles.len(),
                registry.len(),
                registry.overlay_count()
            );
        }
    }

    /// Tears every registry down on the owner thread.
    pub fn teardown(&mut self) {
        for registry in self.registries.values_mut() {
            registry.teardown();
        }
        self.registries.clear();
    }
}

impl Drop for EventLoop {
    fn drop(&mut self) {
        self.teardown();
    }
}
