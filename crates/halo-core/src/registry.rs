//! The window tracking registry.
//!
//! Owns every tracked window and its optional overlay, and turns
//! window-manager notifications into overlay creation, destruction, and
//! geometry updates. All methods run on the registry's owner thread.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::overlay::{Overlay, OverlayStyle};
use crate::window::{OverlayWindow, Subscription, WindowSystem};
use crate::{Color, DesktopResidency, EventKind, Notification, WindowResult};

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// A stable identifier for one registry instance.
///
/// Platform code stores it in the per-window user-data slot of the
/// windows a registry owns, so messages for those windows can be routed
/// back to the right registry without a global instance pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistryToken(u64);

impl RegistryToken {
    /// Allocates a token never handed out before in this process.
    pub fn next() -> Self {
        Self(NEXT_TOKEN.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_raw(self) -> u64 {
        self.0
    }

    /// Rebuilds a token from a user-data value. Zero is never a token.
    pub fn from_raw(raw: u64) -> Option<Self> {
        (raw != 0).then_some(Self(raw))
    }
}

/// Overlay state of one tracked window.
pub enum OverlayState<S: WindowSystem> {
    /// Known but currently not outlined (minimized, off-desktop, or the
    /// overlay could not be created).
    NoOverlay,
    Active(Overlay<S>),
}

impl<S: WindowSystem> OverlayState<S> {
    pub fn overlay(&self) -> Option<&Overlay<S>> {
        match self {
            Self::NoOverlay => None,
            Self::Active(overlay) => Some(overlay),
        }
    }

    fn overlay_mut(&mut self) -> Option<&mut Overlay<S>> {
        match self {
            Self::NoOverlay => None,
            Self::Active(overlay) => Some(overlay),
        }
    }
}

/// Tracks windows and keeps one overlay per eligible window.
///
/// A window is eligible when it is drawable (visible, not minimized) and
/// resident on the active virtual desktop. Eligibility is re-evaluated on
/// every check, never cached.
pub struct Registry<S: WindowSystem, D: DesktopResidency> {
    token: RegistryToken,
    system: S,
    residency: D,
    style: OverlayStyle,
    tracked: HashMap<usize, OverlayState<S>>,
    caption_color: Option<Color>,
    /// Windows whose caption bar we painted and must restore.
    painted: HashSet<usize>,
    subscription: Option<S::Subscription>,
}

impl<S: WindowSystem, D: DesktopResidency> Registry<S, D> {
    /// Creates a registry and subscribes to window-manager notifications.
    ///
    /// Fails if the subscription cannot be installed: without event
    /// delivery the registry could never correct itself.
    pub fn new(system: S, residency: D, style: OverlayStyle) -> WindowResult<Self> {
        let token = RegistryToken::next();
        let subscription = system.subscribe(token)?;
        crate::log_info!(
            "registry {} subscribed (margin={}, color={})",
            token.as_raw(),
            style.margin,
            style.color.to_hex()
        );
        Ok(Self {
            token,
            system,
            residency,
            style,
            tracked: HashMap::new(),
            caption_color: None,
            painted: HashSet::new(),
            subscription: Some(subscription),
        })
    }

    /// Also paints the caption bar of every outlined window with `color`.
    ///
    /// Painted captions are restored at teardown.
    pub fn with_caption_color(mut self, color: Option<Color>) -> Self {
        self.caption_color = color;
        self
    }

    pub fn token(&self) -> RegistryToken {
        self.token
    }

    /// Starts tracking `hwnd` if needed and outlines it when eligible.
    ///
    /// The registry's own overlay windows are never tracked.
    pub fn add_window(&mut self, hwnd: usize) {
        if hwnd == 0 || self.is_overlay_window(hwnd) {
            return;
        }
        if !self.tracked.contains_key(&hwnd) {
            self.tracked.insert(hwnd, OverlayState::NoOverlay);
            crate::log_debug!("+track 0x{:X} (now {})", hwnd, self.tracked.len());
        }
        self.assign_overlay_if_eligible(hwnd);
    }

    /// Drops every tracked window that is no longer a live OS window.
    ///
    /// Returns how many entries were removed. Each removed overlay is
    /// destroyed exactly once, together with its entry.
    pub fn remove_closed_windows(&mut self) -> usize {
        let closed: Vec<usize> = self
            .tracked
            .keys()
            .copied()
            .filter(|hwnd| !self.system.is_window(*hwnd))
            .collect();

        for hwnd in &closed {
            self.tracked.remove(hwnd);
            self.painted.remove(hwnd);
            crate::log_debug!("-closed 0x{:X} (now {})", hwnd, self.tracked.len());
        }
        closed.len()
    }

    /// Creates an overlay for a tracked window iff it is eligible, and
    /// makes sure an ineligible window has none. An existing overlay of
    /// an eligible window is kept as is.
    pub fn assign_overlay_if_eligible(&mut self, hwnd: usize) {
        let eligible =
            self.system.is_drawable(hwnd) && self.residency.is_on_active_desktop(hwnd);
        let Some(state) = self.tracked.get_mut(&hwnd) else {
            return;
        };

        let has_overlay = matches!(state, OverlayState::Active(_));
        match (eligible, has_overlay) {
            (true, false) => {
                match Overlay::create(&self.system, hwnd, self.token, &self.style) {
                    Ok(overlay) => {
                        *state = OverlayState::Active(overlay);
                        if let Some(color) = self.caption_color {
                            self.system.set_caption_color(hwnd, Some(color));
                            self.painted.insert(hwnd);
                        }
                    }
                    Err(e) => crate::log_debug!("no overlay for 0x{:X}: {e}", hwnd),
                }
            }
            (false, true) => {
                *state = OverlayState::NoOverlay;
                crate::log_debug!("overlay for 0x{:X} dropped: not eligible", hwnd);
            }
            _ => {}
        }
    }

    /// Re-evaluates eligibility for every tracked window.
    pub fn refresh_all_tracked(&mut self) {
        let handles: Vec<usize> = self.tracked.keys().copied().collect();
        for hwnd in handles {
            self.assign_overlay_if_eligible(hwnd);
        }
    }

    /// Applies one window-manager notification.
    pub fn handle_notification(&mut self, notification: &Notification) {
        let hwnd = notification.hwnd;
        if hwnd == 0 {
            return;
        }

        self.remove_closed_windows();

        match notification.kind {
            EventKind::Geometry => {
                if let Some(overlay) = self.tracked.get_mut(&hwnd).and_then(|s| s.overlay_mut()) {
                    overlay.update_position(&self.system);
                }
            }
            EventKind::MinimizeStart => {
                // Minimized windows report stale frames; nothing to draw.
                if let Some(state) = self.tracked.get_mut(&hwnd) {
                    *state = OverlayState::NoOverlay;
                }
            }
            EventKind::MinimizeEnd => {
                if self.tracked.contains_key(&hwnd) {
                    self.assign_overlay_if_eligible(hwnd);
                }
            }
            EventKind::Foreground => {
                // No notification fires on a virtual desktop switch, and a
                // switch almost always changes the foreground window. A
                // switch without a foreground change is only picked up by
                // the next foreground change or enumeration pass.
                self.refresh_all_tracked();
            }
            EventKind::Destroyed => {
                self.painted.remove(&hwnd);
                if self.tracked.remove(&hwnd).is_some() {
                    crate::log_debug!("-destroyed 0x{:X} (now {})", hwnd, self.tracked.len());
                }
            }
            EventKind::Focus => {}
        }
    }

    /// Handles every queued notification in arrival order.
    ///
    /// Returns how many notifications were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        loop {
            let Some(notification) = self.subscription.as_ref().and_then(|s| s.try_next()) else {
                break;
            };
            self.handle_notification(&notification);
            handled += 1;
        }
        handled
    }

    /// Routes a refresh-timer tick to the overlay owning `overlay_hwnd`.
    ///
    /// Returns `false` if no live overlay owns that window.
    pub fn on_refresh_timer(&mut self, overlay_hwnd: usize) -> bool {
        let system = &self.system;
        let overlay = self
            .tracked
            .values_mut()
            .filter_map(|s| s.overlay_mut())
            .find(|o| o.window().is_some_and(|w| w.hwnd() == overlay_hwnd));

        match overlay {
            Some(overlay) => {
                overlay.refresh(system);
                true
            }
            None => false,
        }
    }

    /// Changes the color of future overlays and of every live one.
    ///
    /// Live overlays pick it up on their next refresh.
    pub fn set_color(&mut self, color: Color) {
        self.style.color = color;
        for overlay in self.tracked.values_mut().filter_map(|s| s.overlay_mut()) {
            overlay.set_color(color);
        }
    }

    /// Destroys every overlay, restores painted captions, releases the
    /// subscription, and forgets every tracked window. Safe to call more
    /// than once.
    pub fn teardown(&mut self) {
        for state in self.tracked.values_mut() {
            *state = OverlayState::NoOverlay;
        }
        self.tracked.clear();
        for hwnd in self.painted.drain() {
            if self.system.is_window(hwnd) {
                self.system.set_caption_color(hwnd, None);
            }
        }
        if self.subscription.take().is_some() {
            crate::log_info!("registry {} torn down", self.token.as_raw());
        }
    }

    /// Returns whether `hwnd` is the OS window of one of our overlays.
    pub fn is_overlay_window(&self, hwnd: usize) -> bool {
        self.tracked
            .values()
            .filter_map(|s| s.overlay())
            .any(|o| o.window().is_some_and(|w| w.hwnd() == hwnd))
    }

    pub fn is_tracked(&self, hwnd: usize) -> bool {
        self.tracked.contains_key(&hwnd)
    }

    pub fn overlay(&self, hwnd: usize) -> Option<&Overlay<S>> {
        self.tracked.get(&hwnd).and_then(|s| s.overlay())
    }

    pub fn has_overlay(&self, hwnd: usize) -> bool {
        self.overlay(hwnd).is_some()
    }

    /// Number of tracked windows, with or without an overlay.
    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    /// Number of tracked windows that currently have an overlay.
    pub fn overlay_count(&self) -> usize {
        self.tracked.values().filter(|s| s.overlay().is_some()).count()
    }

    pub fn system(&self) -> &S {
        &self.system
    }
}

impl<S: WindowSystem, D: DesktopResidency> Drop for Registry<S, D> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
