//! Win32 realization of the Halo overlay engine.
//!
//! Everything here is compiled on Windows only; on other targets the
//! crate is empty.
#![cfg(windows)]

/// COM apartment initialization.
mod com;

/// Daemon entry point.
pub mod daemon;

/// DPI awareness and scale factors.
pub mod dpi;

/// Win32 window enumeration.
pub mod enumerate;

/// Raw WinEvent translation.
pub mod event;

/// Owner-thread message loop.
pub mod event_loop;

/// Extended frame bounds.
pub mod frame;

/// WinEvent hook subscriptions.
pub mod hook;

/// Transparent overlay windows.
pub mod overlay_window;

/// Direct2D render backend.
pub mod render;

/// Virtual desktop residency.
pub mod residency;

/// The `WindowSystem` implementation.
pub mod system;

/// Handle helpers and window queries.
pub mod window;

mod ctrl_c;
mod event_sink;

pub use enumerate::{WindowInfo, describe_windows, enumerate_windows};
pub use event_loop::{EventLoop, WinRegistry};
pub use residency::VirtualDesktopOracle;
pub use system::Win32System;
