//! In-memory fakes of the platform seams, shared by the engine's tests.
//!
//! Every platform call is appended to a [`Recorder`] so tests can assert
//! on call counts and ordering.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use crate::registry::RegistryToken;
use crate::render::{RenderBackend, Shape};
use crate::window::{OverlayWindow, Subscription, WindowSystem};
use crate::{Color, DesktopResidency, Notification, Rect, Size, WindowResult};

/// A shared, append-only log of platform calls.
#[derive(Clone, Default)]
pub(crate) struct Recorder(Rc<RefCell<Vec<String>>>);

impl Recorder {
    pub(crate) fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    /// Number of entries equal to `name` or starting with `name:`.
    pub(crate) fn count(&self, name: &str) -> usize {
        let prefix = format!("{name}:");
        self.0
            .borrow()
            .iter()
            .filter(|e| *e == name || e.starts_with(&prefix))
            .count()
    }

    pub(crate) fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub(crate) fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

pub(crate) struct FakeBackend {
    recorder: Recorder,
    pub(crate) fail_create: bool,
    pub(crate) fail_resize: bool,
    pub(crate) fail_draw: bool,
}

impl FakeBackend {
    pub(crate) fn new(recorder: Recorder) -> Self {
        Self {
            recorder,
            fail_create: false,
            fail_resize: false,
            fail_draw: false,
        }
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.recorder.push("release_backend");
    }
}

impl RenderBackend for FakeBackend {
    type Surface = Size;
    type Brush = Color;

    fn create_surface(&mut self, size: Size) -> WindowResult<Size> {
        self.recorder.push("create_surface");
        if self.fail_create {
            return Err("surface creation refused".into());
        }
        Ok(size)
    }

    fn resize_surface(&mut self, surface: &mut Size, size: Size) -> WindowResult<()> {
        self.recorder.push("resize_surface");
        if self.fail_resize {
            return Err("resize refused".into());
        }
        *surface = size;
        Ok(())
    }

    fn create_brush(&mut self, _surface: &Size, color: Color) -> WindowResult<Color> {
        self.recorder.push("create_brush");
        Ok(color)
    }

    fn draw(
        &mut self,
        _surface: &mut Size,
        _shape: &Shape,
        _brush: &Color,
        _thickness: f32,
    ) -> WindowResult<()> {
        self.recorder.push("draw");
        if self.fail_draw {
            return Err("device lost".into());
        }
        Ok(())
    }
}

/// A fake top-level window.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FakeWindow {
    pub(crate) frame: Option<Rect>,
    pub(crate) drawable: bool,
    pub(crate) scale: f32,
}

#[derive(Default)]
pub(crate) struct FakeState {
    pub(crate) windows: HashMap<usize, FakeWindow>,
    pub(crate) queue: VecDeque<Notification>,
    pub(crate) fail_overlay: bool,
    pub(crate) fail_backend: bool,
    pub(crate) fail_subscribe: bool,
    next_overlay: usize,
}

/// A fake window system sharing its state with the test body.
#[derive(Clone)]
pub(crate) struct FakeSystem {
    pub(crate) state: Rc<RefCell<FakeState>>,
    pub(crate) recorder: Recorder,
}

impl FakeSystem {
    pub(crate) fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(FakeState {
                next_overlay: 0x9000,
                ..Default::default()
            })),
            recorder: Recorder::default(),
        }
    }

    /// Adds a visible window with the given extended frame.
    pub(crate) fn open(&self, hwnd: usize, frame: Rect) {
        self.state.borrow_mut().windows.insert(
            hwnd,
            FakeWindow {
                frame: Some(frame),
                drawable: true,
                scale: 1.0,
            },
        );
    }

    pub(crate) fn close(&self, hwnd: usize) {
        self.state.borrow_mut().windows.remove(&hwnd);
    }

    pub(crate) fn set_frame(&self, hwnd: usize, frame: Option<Rect>) {
        if let Some(w) = self.state.borrow_mut().windows.get_mut(&hwnd) {
            w.frame = frame;
        }
    }

    pub(crate) fn set_scale(&self, hwnd: usize, scale: f32) {
        if let Some(w) = self.state.borrow_mut().windows.get_mut(&hwnd) {
            w.scale = scale;
        }
    }

    /// Marks a window minimized (or restored), like the OS does.
    pub(crate) fn set_minimized(&self, hwnd: usize, minimized: bool) {
        if let Some(w) = self.state.borrow_mut().windows.get_mut(&hwnd) {
            w.drawable = !minimized;
        }
    }

    /// Queues a notification as the OS callback would.
    pub(crate) fn post(&self, notification: Notification) {
        self.state.borrow_mut().queue.push_back(notification);
    }

    fn window(&self, hwnd: usize) -> Option<FakeWindow> {
        self.state.borrow().windows.get(&hwnd).copied()
    }
}

impl WindowSystem for FakeSystem {
    type Overlay = FakeOverlay;
    type Backend = FakeBackend;
    type Subscription = FakeSubscription;

    fn is_window(&self, hwnd: usize) -> bool {
        self.window(hwnd).is_some()
    }

    fn is_drawable(&self, hwnd: usize) -> bool {
        self.window(hwnd).is_some_and(|w| w.drawable)
    }

    fn frame_rect(&self, hwnd: usize) -> Option<Rect> {
        self.window(hwnd).and_then(|w| w.frame)
    }

    fn scale_factor(&self, hwnd: usize) -> f32 {
        self.window(hwnd).map_or(1.0, |w| w.scale)
    }

    fn create_overlay(
        &self,
        target: usize,
        rect: Rect,
        owner: RegistryToken,
    ) -> WindowResult<FakeOverlay> {
        let mut state = self.state.borrow_mut();
        if state.fail_overlay {
            return Err("CreateWindowExW failed".into());
        }
        state.next_overlay += 1;
        let hwnd = state.next_overlay;
        self.recorder.push(format!("create_overlay:{hwnd}:{target}"));
        Ok(FakeOverlay {
            hwnd,
            owner,
            rect: RefCell::new(rect),
            visible: RefCell::new(false),
            timer: RefCell::new(None),
            recorder: self.recorder.clone(),
        })
    }

    fn set_caption_color(&self, hwnd: usize, color: Option<Color>) {
        let value = color.map_or_else(|| "reset".to_string(), Color::to_hex);
        self.recorder.push(format!("caption:{hwnd}:{value}"));
    }

    fn create_backend(&self, _overlay: &FakeOverlay) -> WindowResult<FakeBackend> {
        if self.state.borrow().fail_backend {
            return Err("no GPU".into());
        }
        Ok(FakeBackend::new(self.recorder.clone()))
    }

    fn subscribe(&self, owner: RegistryToken) -> WindowResult<FakeSubscription> {
        if self.state.borrow().fail_subscribe {
            return Err("SetWinEventHook failed".into());
        }
        self.recorder.push(format!("subscribe:{}", owner.as_raw()));
        Ok(FakeSubscription {
            state: self.state.clone(),
            recorder: self.recorder.clone(),
        })
    }
}

pub(crate) struct FakeOverlay {
    hwnd: usize,
    pub(crate) owner: RegistryToken,
    pub(crate) rect: RefCell<Rect>,
    pub(crate) visible: RefCell<bool>,
    pub(crate) timer: RefCell<Option<Duration>>,
    recorder: Recorder,
}

impl OverlayWindow for FakeOverlay {
    fn hwnd(&self) -> usize {
        self.hwnd
    }

    fn show(&self) {
        *self.visible.borrow_mut() = true;
        self.recorder.push(format!("show:{}", self.hwnd));
    }

    fn hide(&self) {
        *self.visible.borrow_mut() = false;
        self.recorder.push(format!("hide:{}", self.hwnd));
    }

    fn place(&self, rect: Rect, _target: usize) {
        *self.rect.borrow_mut() = rect;
        self.recorder.push(format!("place:{}", self.hwnd));
    }

    fn arm_refresh_timer(&self, interval: Duration) {
        *self.timer.borrow_mut() = Some(interval);
        self.recorder.push(format!("timer:{}", self.hwnd));
    }
}

impl Drop for FakeOverlay {
    fn drop(&mut self) {
        self.recorder.push(format!("destroy:{}", self.hwnd));
    }
}

pub(crate) struct FakeSubscription {
    state: Rc<RefCell<FakeState>>,
    recorder: Recorder,
}

impl Subscription for FakeSubscription {
    fn try_next(&self) -> Option<Notification> {
        self.state.borrow_mut().queue.pop_front()
    }
}

impl Drop for FakeSubscription {
    fn drop(&mut self) {
        self.recorder.push("unsubscribe");
    }
}

/// A residency oracle whose answers the test flips at will.
///
/// Counts queries so tests can prove answers are never cached.
#[derive(Clone, Default)]
pub(crate) struct FakeDesktop {
    resident: Rc<RefCell<HashSet<usize>>>,
    queries: Rc<RefCell<usize>>,
}

impl FakeDesktop {
    pub(crate) fn set_resident(&self, hwnd: usize, resident: bool) {
        let mut set = self.resident.borrow_mut();
        if resident {
            set.insert(hwnd);
        } else {
            set.remove(&hwnd);
        }
    }

    pub(crate) fn queries(&self) -> usize {
        *self.queries.borrow()
    }
}

impl DesktopResidency for FakeDesktop {
    fn is_on_active_desktop(&self, hwnd: usize) -> bool {
        *self.queries.borrow_mut() += 1;
        self.resident.borrow().contains(&hwnd)
    }
}
