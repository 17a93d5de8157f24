//! Window-manager notifications via `SetWinEventHook`.
//!
//! Each subscription installs one out-of-context hook per event kind.
//! The callback looks up the hook's route, sends a copied
//! [`Notification`] through the registry's channel, and posts a wake
//! message to the registry's event sink. The registry drains the channel
//! on its owner thread.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, MutexGuard, OnceLock};

use halo_core::{Notification, RegistryToken, Subscription, WindowResult};
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::Accessibility::{HWINEVENTHOOK, SetWinEventHook, UnhookWinEvent};
use windows::Win32::UI::WindowsAndMessaging::{WINEVENT_OUTOFCONTEXT, WINEVENT_SKIPOWNPROCESS};

use crate::event::{self, HOOKED_EVENTS, RawEvent};
use crate::{event_sink, window};

/// Where a hook's notifications go.
struct Route {
    sender: Sender<Notification>,
    /// Raw handle of the owning registry's event sink.
    sink: usize,
}

/// Routes keyed by raw hook handle.
static ROUTES: OnceLock<Mutex<HashMap<usize, Route>>> = OnceLock::new();

fn routes() -> Option<MutexGuard<'static, HashMap<usize, Route>>> {
    ROUTES.get_or_init(Default::default).lock().ok()
}

/// A live set of WinEvent hooks feeding one registry.
///
/// Dropping it unhooks every event, forgets the routes, and destroys
/// the event sink.
pub struct WinEventSubscription {
    hooks: Vec<HWINEVENTHOOK>,
    receiver: Receiver<Notification>,
    sink: HWND,
}

impl WinEventSubscription {
    /// Installs the hooks for `owner`.
    ///
    /// Must be called on the thread that runs the message loop: out-of-
    /// context hooks are delivered through that thread's queue. Fails,
    /// leaving nothing installed, if any hook is refused.
    pub fn install(owner: RegistryToken) -> WindowResult<Self> {
        let sink = event_sink::create(owner)?;
        let (sender, receiver) = mpsc::channel();
        let mut subscription = Self {
            hooks: Vec::with_capacity(HOOKED_EVENTS.len()),
            receiver,
            sink,
        };

        for event in HOOKED_EVENTS {
            // SAFETY: WINEVENT_OUTOFCONTEXT means the callback runs in our
            // process. WINEVENT_SKIPOWNPROCESS ignores our own overlays.
            let hook = unsafe {
                SetWinEventHook(
                    event,
                    event,
                    None,
                    Some(win_event_proc),
                    0,
                    0,
                    WINEVENT_OUTOFCONTEXT | WINEVENT_SKIPOWNPROCESS,
                )
            };
            if hook.is_invalid() {
                return Err(format!("SetWinEventHook failed for event 0x{event:04X}").into());
            }
            subscription.hooks.push(hook);

            let mut routes = routes().ok_or("hook route table poisoned")?;
            routes.insert(
                hook.0 as usize,
                Route {
                    sender: sender.clone(),
                    sink: window::raw(sink),
                },
            );
        }

        halo_core::log_debug!(
            "installed {} hooks for registry {}",
            subscription.hooks.len(),
            owner.as_raw()
        );
        Ok(subscription)
    }
}

impl Subscription for WinEventSubscription {
    fn try_next(&self) -> Option<Notification> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for WinEventSubscription {
    fn drop(&mut self) {
        if let Some(mut routes) = routes() {
            for hook in &self.hooks {
                routes.remove(&(hook.0 as usize));
            }
        }
        for hook in self.hooks.drain(..) {
            unsafe {
                let _ = UnhookWinEvent(hook);
            }
        }
        event_sink::destroy(self.sink);
    }
}

/// The WinEvent callback. Copies the event out and never blocks.
unsafe extern "system" fn win_event_proc(
    hook: HWINEVENTHOOK,
    event: u32,
    hwnd: HWND,
    id_object: i32,
    id_child: i32,
    event_thread: u32,
    event_time: u32,
) {
    let Some(notification) = event::translate(RawEvent {
        event,
        hwnd: window::raw(hwnd),
        id_object,
        id_child,
        event_thread,
        event_time,
    }) else {
        return;
    };

    let sink = {
        let Some(routes) = routes() else {
            return;
        };
        match routes.get(&(hook.0 as usize)) {
            Some(route) if route.sender.send(notification).is_ok() => route.sink,
            _ => return,
        }
    };
    event_sink::wake(window::hwnd(sink));
}
