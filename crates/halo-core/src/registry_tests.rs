use super::*;
use crate::Rect;
use crate::overlay::DEFAULT_MARGIN;
use crate::testing::{FakeDesktop, FakeSystem};

const A: usize = 0xA0;
const B: usize = 0xB0;

type TestRegistry = Registry<FakeSystem, FakeDesktop>;

fn setup() -> (TestRegistry, FakeSystem, FakeDesktop) {
    let system = FakeSystem::new();
    let desktop = FakeDesktop::default();
    let registry = Registry::new(system.clone(), desktop.clone(), OverlayStyle::default()).unwrap();
    (registry, system, desktop)
}

fn open_resident(system: &FakeSystem, desktop: &FakeDesktop, hwnd: usize, frame: Rect) {
    system.open(hwnd, frame);
    desktop.set_resident(hwnd, true);
}

fn overlay_rect(registry: &TestRegistry, hwnd: usize) -> Rect {
    *registry.overlay(hwnd).unwrap().window().unwrap().rect.borrow()
}

fn event(kind: EventKind, hwnd: usize) -> Notification {
    Notification::new(kind, hwnd)
}

// -- construction --

#[test]
fn new_subscribes_once() {
    let (registry, system, _desktop) = setup();

    assert_eq!(system.recorder.count("subscribe"), 1);
    assert!(registry.is_empty());
}

#[test]
fn new_fails_when_subscription_fails() {
    // Arrange
    let system = FakeSystem::new();
    system.state.borrow_mut().fail_subscribe = true;

    // Act
    let result = Registry::new(system, FakeDesktop::default(), OverlayStyle::default());

    // Assert
    assert!(result.is_err());
}

#[test]
fn tokens_are_unique_per_registry() {
    let (first, _, _) = setup();
    let (second, _, _) = setup();

    assert_ne!(first.token(), second.token());
    assert_eq!(RegistryToken::from_raw(first.token().as_raw()), Some(first.token()));
    assert_eq!(RegistryToken::from_raw(0), None);
}

// -- add_window / eligibility --

#[test]
fn add_window_outlines_resident_window() {
    // Arrange
    let (mut registry, system, desktop) = setup();
    open_resident(&system, &desktop, A, Rect::new(100, 100, 640, 480));

    // Act
    registry.add_window(A);

    // Assert
    assert!(registry.has_overlay(A));
    assert_eq!(overlay_rect(&registry, A), Rect::new(97, 97, 646, 486));
}

#[test]
fn add_window_is_idempotent() {
    // Arrange
    let (mut registry, system, desktop) = setup();
    open_resident(&system, &desktop, A, Rect::new(0, 0, 640, 480));

    // Act
    registry.add_window(A);
    registry.add_window(A);

    // Assert
    assert_eq!(registry.len(), 1);
    assert_eq!(system.recorder.count("create_overlay"), 1);
}

#[test]
fn add_window_tracks_non_resident_window_without_overlay() {
    // Arrange
    let (mut registry, system, _desktop) = setup();
    system.open(A, Rect::new(0, 0, 640, 480));

    // Act
    registry.add_window(A);

    // Assert
    assert!(registry.is_tracked(A));
    assert!(!registry.has_overlay(A));
}

#[test]
fn minimized_window_is_not_outlined() {
    // Arrange
    let (mut registry, system, desktop) = setup();
    open_resident(&system, &desktop, A, Rect::new(0, 0, 640, 480));
    system.set_minimized(A, true);

    // Act
    registry.add_window(A);

    // Assert
    assert!(registry.is_tracked(A));
    assert!(!registry.has_overlay(A));
}

#[test]
fn failed_overlay_creation_leaves_window_tracked_without_overlay() {
    // Arrange
    let (mut registry, system, desktop) = setup();
    open_resident(&system, &desktop, A, Rect::new(0, 0, 640, 480));
    system.state.borrow_mut().fail_overlay = true;

    // Act
    registry.add_window(A);
    let outlined_while_failing = registry.has_overlay(A);
    system.state.borrow_mut().fail_overlay = false;
    registry.refresh_all_tracked();

    // Assert
    assert!(!outlined_while_failing);
    assert!(registry.has_overlay(A));
}

#[test]
fn own_overlay_window_is_never_outlined() {
    // Arrange
    let (mut registry, system, desktop) = setup();
    open_resident(&system, &desktop, A, Rect::new(100, 100, 640, 480));
    registry.add_window(A);
    let overlay_hwnd = registry.overlay(A).unwrap().window().unwrap().hwnd();
    // The overlay looks like any other visible, resident window.
    open_resident(&system, &desktop, overlay_hwnd, overlay_rect(&registry, A));

    // Act
    registry.add_window(overlay_hwnd);
    registry.add_window(overlay_hwnd);

    // Assert
    assert!(registry.is_overlay_window(overlay_hwnd));
    assert!(!registry.is_tracked(overlay_hwnd));
    assert_eq!(registry.len(), 1);
    assert_eq!(system.recorder.count("create_overlay"), 1);
}

#[test]
fn overlay_is_created_for_its_target() {
    // Arrange
    let (mut registry, system, desktop) = setup();
    open_resident(&system, &desktop, A, Rect::new(0, 0, 640, 480));

    // Act
    registry.add_window(A);

    // Assert
    let overlay_hwnd = registry.overlay(A).unwrap().window().unwrap().hwnd();
    let expected = format!("create_overlay:{overlay_hwnd}:{A}");
    assert!(system.recorder.entries().contains(&expected));
}

#[test]
fn refresh_follows_residency_changes() {
    // Arrange
    let (mut registry, system, desktop) = setup();
    open_resident(&system, &desktop, A, Rect::new(0, 0, 800, 600));
    system.open(B, Rect::new(900, 0, 800, 600));
    registry.add_window(A);
    registry.add_window(B);

    // Act
    registry.refresh_all_tracked();
    let before = (registry.has_overlay(A), registry.has_overlay(B));
    desktop.set_resident(B, true);
    registry.refresh_all_tracked();

    // Assert
    assert_eq!(before, (true, false));
    let overlay = registry.overlay(B).unwrap();
    assert_eq!(overlay.margin(), DEFAULT_MARGIN);
    assert_eq!(overlay.margin(), 3);
    assert_eq!(overlay.color(), OverlayStyle::default().color);
    assert!(registry.has_overlay(A));
}

#[test]
fn refresh_keeps_existing_overlays() {
    // Arrange
    let (mut registry, system, desktop) = setup();
    open_resident(&system, &desktop, A, Rect::new(0, 0, 800, 600));
    registry.add_window(A);
    let hwnd = registry.overlay(A).unwrap().hwnd();

    // Act
    registry.refresh_all_tracked();

    // Assert
    assert_eq!(registry.overlay(A).unwrap().hwnd(), hwnd);
    assert_eq!(system.recorder.count("create_overlay"), 1);
}

#[test]
fn residency_is_queried_on_every_check() {
    // Arrange
    let (mut registry, system, desktop) = setup();
    open_resident(&system, &desktop, A, Rect::new(0, 0, 800, 600));
    registry.add_window(A);
    let queries = desktop.queries();

    // Act
    registry.refresh_all_tracked();
    registry.refresh_all_tracked();

    // Assert
    assert_eq!(desktop.queries(), queries + 2);
}

// -- notifications --

#[test]
fn foreground_change_drops_overlay_of_window_that_left_desktop() {
    // Arrange
    let (mut registry, system, desktop) = setup();
    open_resident(&system, &desktop, A, Rect::new(0, 0, 800, 600));
    open_resident(&system, &desktop, B, Rect::new(900, 0, 800, 600));
    registry.add_window(A);
    registry.add_window(B);
    desktop.set_resident(A, false);

    // Act
    registry.handle_notification(&event(EventKind::Foreground, B));

    // Assert
    assert!(registry.is_tracked(A));
    assert!(!registry.has_overlay(A));
    assert!(registry.has_overlay(B));
    assert_eq!(system.recorder.count("destroy"), 1);
}

#[test]
fn geometry_change_moves_overlay() {
    // Arrange
    let (mut registry, system, desktop) = setup();
    open_resident(&system, &desktop, A, Rect::new(0, 0, 800, 600));
    registry.add_window(A);
    system.set_frame(A, Some(Rect::new(50, 60, 800, 600)));

    // Act
    registry.handle_notification(&event(EventKind::Geometry, A));

    // Assert
    assert_eq!(overlay_rect(&registry, A), Rect::new(47, 57, 806, 606));
}

#[test]
fn geometry_change_of_untracked_window_is_ignored() {
    // Arrange
    let (mut registry, system, _desktop) = setup();
    system.open(A, Rect::new(0, 0, 800, 600));

    // Act
    registry.handle_notification(&event(EventKind::Geometry, A));

    // Assert
    assert!(!registry.is_tracked(A));
    assert_eq!(system.recorder.count("place"), 0);
}

#[test]
fn minimize_round_trip_restores_same_overlay_style() {
    // Arrange
    let (mut registry, system, desktop) = setup();
    open_resident(&system, &desktop, A, Rect::new(0, 0, 800, 600));
    registry.set_color(Color::new(0x00, 0xB4, 0xD8));
    registry.add_window(A);

    // Act
    system.set_minimized(A, true);
    registry.handle_notification(&event(EventKind::MinimizeStart, A));
    let outlined_while_minimized = registry.has_overlay(A);
    system.set_minimized(A, false);
    registry.handle_notification(&event(EventKind::MinimizeEnd, A));

    // Assert
    assert!(!outlined_while_minimized);
    assert!(registry.is_tracked(A));
    let overlay = registry.overlay(A).unwrap();
    assert_eq!(overlay.color(), Color::new(0x00, 0xB4, 0xD8));
    assert_eq!(overlay.margin(), 3);
}

#[test]
fn minimize_end_of_untracked_window_is_ignored() {
    // Arrange
    let (mut registry, system, desktop) = setup();
    open_resident(&system, &desktop, A, Rect::new(0, 0, 800, 600));

    // Act
    registry.handle_notification(&event(EventKind::MinimizeEnd, A));

    // Assert
    assert!(!registry.is_tracked(A));
    assert_eq!(system.recorder.count("create_overlay"), 0);
}

#[test]
fn destroy_removes_entry() {
    // Arrange
    let (mut registry, system, desktop) = setup();
    open_resident(&system, &desktop, A, Rect::new(0, 0, 800, 600));
    registry.add_window(A);

    // Act
    registry.handle_notification(&event(EventKind::Destroyed, A));

    // Assert
    assert!(!registry.is_tracked(A));
    assert_eq!(system.recorder.count("destroy"), 1);
}

#[test]
fn focus_change_is_a_no_op() {
    // Arrange
    let (mut registry, system, desktop) = setup();
    open_resident(&system, &desktop, A, Rect::new(0, 0, 800, 600));
    registry.add_window(A);
    system.recorder.clear();

    // Act
    registry.handle_notification(&event(EventKind::Focus, A));

    // Assert
    assert!(registry.has_overlay(A));
    assert!(system.recorder.entries().is_empty());
}

#[test]
fn null_handle_is_ignored() {
    // Arrange
    let (mut registry, system, desktop) = setup();
    open_resident(&system, &desktop, A, Rect::new(0, 0, 800, 600));
    registry.add_window(A);
    system.close(A);

    // Act
    registry.handle_notification(&event(EventKind::Foreground, 0));

    // Assert
    assert!(registry.is_tracked(A));
}

// -- closed windows --

#[test]
fn remove_closed_windows_destroys_overlay_once() {
    // Arrange
    let (mut registry, system, desktop) = setup();
    open_resident(&system, &desktop, A, Rect::new(0, 0, 800, 600));
    open_resident(&system, &desktop, B, Rect::new(900, 0, 800, 600));
    registry.add_window(A);
    registry.add_window(B);
    system.close(A);

    // Act
    let first = registry.remove_closed_windows();
    let second = registry.remove_closed_windows();

    // Assert
    assert_eq!((first, second), (1, 0));
    assert!(!registry.is_tracked(A));
    assert!(registry.has_overlay(B));
    assert_eq!(system.recorder.count("destroy"), 1);
}

#[test]
fn notifications_prune_closed_windows_first() {
    // Arrange
    let (mut registry, system, desktop) = setup();
    open_resident(&system, &desktop, A, Rect::new(0, 0, 800, 600));
    open_resident(&system, &desktop, B, Rect::new(900, 0, 800, 600));
    registry.add_window(A);
    registry.add_window(B);
    system.close(A);

    // Act
    registry.handle_notification(&event(EventKind::Focus, B));
    registry.handle_notification(&event(EventKind::Destroyed, A));

    // Assert
    assert!(!registry.is_tracked(A));
    assert_eq!(registry.len(), 1);
    assert_eq!(system.recorder.count("destroy"), 1);
}

// -- queue and timers --

#[test]
fn pump_handles_queued_notifications_in_order() {
    // Arrange
    let (mut registry, system, desktop) = setup();
    open_resident(&system, &desktop, A, Rect::new(0, 0, 800, 600));
    registry.add_window(A);
    system.post(event(EventKind::MinimizeStart, A));
    system.post(event(EventKind::MinimizeEnd, A));
    system.post(event(EventKind::Geometry, A));

    // Act
    let handled = registry.pump();

    // Assert
    assert_eq!(handled, 3);
    assert!(registry.has_overlay(A));
    assert_eq!(system.recorder.count("create_overlay"), 2);
    assert_eq!(registry.pump(), 0);
}

#[test]
fn refresh_timer_corrects_missed_geometry_change() {
    // Arrange
    let (mut registry, system, desktop) = setup();
    open_resident(&system, &desktop, A, Rect::new(0, 0, 800, 600));
    registry.add_window(A);
    let overlay_hwnd = registry.overlay(A).unwrap().hwnd();
    system.set_frame(A, Some(Rect::new(10, 10, 1024, 768)));

    // Act
    let routed = registry.on_refresh_timer(overlay_hwnd);

    // Assert
    assert!(routed);
    assert_eq!(overlay_rect(&registry, A), Rect::new(7, 7, 1030, 774));
    let size = registry.overlay(A).unwrap().renderer().unwrap().surface_size();
    assert_eq!(size, Some(crate::Size::new(1030, 774)));
}

#[test]
fn refresh_timer_for_unknown_window_is_not_routed() {
    let (mut registry, _system, _desktop) = setup();

    assert!(!registry.on_refresh_timer(0xDEAD));
}

#[test]
fn set_color_takes_effect_on_next_tick() {
    // Arrange
    let (mut registry, system, desktop) = setup();
    open_resident(&system, &desktop, A, Rect::new(0, 0, 800, 600));
    registry.add_window(A);
    let overlay_hwnd = registry.overlay(A).unwrap().hwnd();
    system.recorder.clear();

    // Act
    registry.set_color(Color::new(0xFF, 0x00, 0x00));
    let draws_before_tick = system.recorder.count("draw");
    registry.on_refresh_timer(overlay_hwnd);

    // Assert
    assert_eq!(draws_before_tick, 0);
    assert_eq!(system.recorder.count("create_brush"), 1);
    assert_eq!(system.recorder.count("draw"), 1);
}

// -- teardown --

#[test]
fn teardown_destroys_overlays_and_unsubscribes_once() {
    // Arrange
    let (mut registry, system, desktop) = setup();
    open_resident(&system, &desktop, A, Rect::new(0, 0, 800, 600));
    open_resident(&system, &desktop, B, Rect::new(900, 0, 800, 600));
    registry.add_window(A);
    registry.add_window(B);

    // Act
    registry.teardown();
    registry.teardown();
    drop(registry);

    // Assert
    assert_eq!(system.recorder.count("destroy"), 2);
    assert_eq!(system.recorder.count("unsubscribe"), 1);
}

#[test]
fn teardown_releases_renderers_before_windows() {
    // Arrange
    let (mut registry, system, desktop) = setup();
    open_resident(&system, &desktop, A, Rect::new(0, 0, 800, 600));
    registry.add_window(A);
    system.recorder.clear();

    // Act
    registry.teardown();

    // Assert
    let entries = system.recorder.entries();
    let release = entries.iter().position(|e| e == "release_backend").unwrap();
    let destroy = entries.iter().position(|e| e.starts_with("destroy:")).unwrap();
    let unsubscribe = entries.iter().position(|e| e == "unsubscribe").unwrap();
    assert!(release < destroy);
    assert!(destroy < unsubscribe);
}

#[test]
fn overlays_carry_the_owning_registry_token() {
    // Arrange
    let (mut registry, system, desktop) = setup();
    open_resident(&system, &desktop, A, Rect::new(0, 0, 800, 600));

    // Act
    registry.add_window(A);

    // Assert
    let window = registry.overlay(A).unwrap().window().unwrap();
    assert_eq!(window.owner, registry.token());
    assert_eq!(registry.overlay_count(), 1);
}

// -- caption color --

#[test]
fn caption_is_painted_when_overlay_is_assigned() {
    // Arrange
    let (registry, system, desktop) = setup();
    let mut registry = registry.with_caption_color(Some(Color::new(0x20, 0x40, 0x60)));
    open_resident(&system, &desktop, A, Rect::new(0, 0, 640, 480));
    open_resident(&system, &desktop, B, Rect::new(0, 0, 640, 480));
    desktop.set_resident(B, false);

    // Act
    registry.add_window(A);
    registry.add_window(B);
    registry.add_window(A);

    // Assert
    assert_eq!(system.recorder.count("caption"), 1);
    assert!(system.recorder.entries().contains(&format!("caption:{A}:#204060")));
}

#[test]
fn no_caption_color_leaves_captions_alone() {
    // Arrange
    let (mut registry, system, desktop) = setup();
    open_resident(&system, &desktop, A, Rect::new(0, 0, 640, 480));

    // Act
    registry.add_window(A);
    registry.teardown();

    // Assert
    assert_eq!(system.recorder.count("caption"), 0);
}

#[test]
fn teardown_restores_captions_of_live_windows_only() {
    // Arrange
    let (registry, system, desktop) = setup();
    let mut registry = registry.with_caption_color(Some(Color::new(0x20, 0x40, 0x60)));
    open_resident(&system, &desktop, A, Rect::new(0, 0, 640, 480));
    open_resident(&system, &desktop, B, Rect::new(700, 0, 640, 480));
    registry.add_window(A);
    registry.add_window(B);
    system.close(B);
    system.recorder.clear();

    // Act
    registry.teardown();
    registry.teardown();

    // Assert
    let entries = system.recorder.entries();
    assert_eq!(system.recorder.count("caption"), 1);
    assert!(entries.contains(&format!("caption:{A}:reset")));
}

#[test]
fn destroyed_window_caption_is_not_restored() {
    // Arrange
    let (registry, system, desktop) = setup();
    let mut registry = registry.with_caption_color(Some(Color::new(0x20, 0x40, 0x60)));
    open_resident(&system, &desktop, A, Rect::new(0, 0, 640, 480));
    registry.add_window(A);
    registry.handle_notification(&event(EventKind::Destroyed, A));
    system.recorder.clear();

    // Act
    registry.teardown();

    // Assert
    assert_eq!(system.recorder.count("caption"), 0);
}
