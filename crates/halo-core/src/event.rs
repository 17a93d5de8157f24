/// The window-manager notification kinds the engine reacts to.
///
/// Platform crates translate raw OS events into these variants and drop
/// everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// The window moved, resized, or finished an interactive move/size.
    Geometry,

    /// The window started minimizing.
    MinimizeStart,

    /// The window was restored from the minimized state.
    MinimizeEnd,

    /// A window became the foreground window.
    Foreground,

    /// A window was destroyed.
    Destroyed,

    /// Keyboard focus moved inside some window.
    Focus,
}

/// A window-manager notification, copied out of the OS callback.
///
/// Owns all of its data so it can cross from the hook callback to the
/// owner thread's queue. It is never kept past the handling of a single
/// notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification {
    pub kind: EventKind,
    /// Subject window handle. Zero means "no window".
    pub hwnd: usize,
    pub id_object: i32,
    pub id_child: i32,
    pub event_thread: u32,
    /// Milliseconds since system start, as reported by the OS.
    pub event_time: u32,
}

impl Notification {
    /// A notification about the window object itself with no thread or
    /// timestamp metadata.
    pub fn new(kind: EventKind, hwnd: usize) -> Self {
        Self {
            kind,
            hwnd,
            id_object: 0,
            id_child: 0,
            event_thread: 0,
            event_time: 0,
        }
    }
}
