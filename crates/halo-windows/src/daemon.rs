use halo_core::{Config, Registry, WindowResult};
use windows::Win32::System::Threading::GetCurrentThreadId;

use crate::event_loop::EventLoop;
use crate::residency::VirtualDesktopOracle;
use crate::system::Win32System;
use crate::{ctrl_c, dpi};

/// Runs the overlay engine on the calling thread until Ctrl+C.
///
/// The calling thread becomes the owner thread: hooks, overlays, and
/// render targets are created here and torn down here before returning.
pub fn run(config: &Config) -> WindowResult<()> {
    dpi::enable_dpi_awareness();

    let thread_id = unsafe { GetCurrentThreadId() };
    ctrl_c::quit_on_ctrl_c(thread_id)?;

    let system = Win32System::new(config.border.topmost)?;
    let registry = Registry::new(system, VirtualDesktopOracle::new(), config.overlay_style())?
        .with_caption_color(config.caption_color());

    let mut event_loop = EventLoop::new(config.enumerate_interval());
    event_loop.add(registry);

    halo_core::log_info!(
        "halo started (color={}, margin={}, topmost={})",
        config.border.color,
        config.border.margin,
        config.border.topmost
    );
    eprintln!("Halo running. Press Ctrl+C to stop.");

    event_loop.run();

    event_loop.teardown();
    halo_core::log_info!("halo stopped");
    eprintln!("Halo stopped.");
    Ok(())
}
