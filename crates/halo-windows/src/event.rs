use halo_core::{EventKind, Notification};
use windows::Win32::UI::WindowsAndMessaging::{
    EVENT_OBJECT_DESTROY, EVENT_OBJECT_FOCUS, EVENT_OBJECT_LOCATIONCHANGE,
    EVENT_SYSTEM_FOREGROUND, EVENT_SYSTEM_MINIMIZEEND, EVENT_SYSTEM_MINIMIZESTART,
    EVENT_SYSTEM_MOVESIZEEND,
};

/// Object ID indicating the event applies to the window itself,
/// not a child element like a scrollbar or menu item.
const OBJID_WINDOW: i32 = 0;

/// Every event the engine installs a hook for.
pub const HOOKED_EVENTS: [u32; 7] = [
    EVENT_OBJECT_LOCATIONCHANGE,
    EVENT_SYSTEM_MINIMIZESTART,
    EVENT_SYSTEM_MINIMIZEEND,
    EVENT_SYSTEM_MOVESIZEEND,
    EVENT_SYSTEM_FOREGROUND,
    EVENT_OBJECT_DESTROY,
    EVENT_OBJECT_FOCUS,
];

/// The raw arguments of one WinEvent callback.
#[derive(Debug, Clone, Copy)]
pub struct RawEvent {
    pub event: u32,
    pub hwnd: usize,
    pub id_object: i32,
    pub id_child: i32,
    pub event_thread: u32,
    pub event_time: u32,
}

/// Maps a WinEvent code to the kind the engine reacts to.
pub fn kind_of(event: u32) -> Option<EventKind> {
    match event {
        e if e == EVENT_OBJECT_LOCATIONCHANGE || e == EVENT_SYSTEM_MOVESIZEEND => {
            Some(EventKind::Geometry)
        }
        e if e == EVENT_SYSTEM_MINIMIZESTART => Some(EventKind::MinimizeStart),
        e if e == EVENT_SYSTEM_MINIMIZEEND => Some(EventKind::MinimizeEnd),
        e if e == EVENT_SYSTEM_FOREGROUND => Some(EventKind::Foreground),
        e if e == EVENT_OBJECT_DESTROY => Some(EventKind::Destroyed),
        e if e == EVENT_OBJECT_FOCUS => Some(EventKind::Focus),
        _ => None,
    }
}

/// Translates a raw WinEvent into a [`Notification`].
///
/// Returns `None` for events on child objects (carets, scrollbars,
/// menu items) and for event codes the engine does not hook.
pub fn translate(raw: RawEvent) -> Option<Notification> {
    if raw.id_object != OBJID_WINDOW {
        return None;
    }

    Some(Notification {
        kind: kind_of(raw.event)?,
        hwnd: raw.hwnd,
        id_object: raw.id_object,
        id_child: raw.id_child,
        event_thread: raw.event_thread,
        event_time: raw.event_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(event: u32, id_object: i32) -> RawEvent {
        RawEvent {
            event,
            hwnd: 0x1234,
            id_object,
            id_child: 0,
            event_thread: 7,
            event_time: 42,
        }
    }

    #[test]
    fn location_and_move_size_end_are_geometry() {
        // Act / Assert
        assert_eq!(kind_of(EVENT_OBJECT_LOCATIONCHANGE), Some(EventKind::Geometry));
        assert_eq!(kind_of(EVENT_SYSTEM_MOVESIZEEND), Some(EventKind::Geometry));
    }

    #[test]
    fn every_hooked_event_has_a_kind() {
        for event in HOOKED_EVENTS {
            assert!(kind_of(event).is_some(), "0x{event:04X} has no kind");
        }
    }

    #[test]
    fn child_object_events_are_dropped() {
        // Arrange
        let caret = raw(EVENT_OBJECT_LOCATIONCHANGE, -8);

        // Act / Assert
        assert_eq!(translate(caret), None);
    }

    #[test]
    fn translate_copies_callback_metadata() {
        // Act
        let notification = translate(raw(EVENT_SYSTEM_FOREGROUND, OBJID_WINDOW)).unwrap();

        // Assert
        assert_eq!(notification.kind, EventKind::Foreground);
        assert_eq!(notification.hwnd, 0x1234);
        assert_eq!(notification.event_thread, 7);
        assert_eq!(notification.event_time, 42);
    }

    #[test]
    fn unhooked_events_are_dropped() {
        assert_eq!(translate(raw(0x8001, OBJID_WINDOW)), None);
    }
}
