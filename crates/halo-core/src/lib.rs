pub mod color;
pub mod config;
pub mod event;
pub mod log;
pub mod overlay;
pub mod rect;
pub mod registry;
pub mod render;
pub mod residency;
pub mod window;

#[cfg(test)]
mod testing;

pub use color::Color;
pub use config::Config;
pub use event::{EventKind, Notification};
pub use overlay::{Overlay, OverlayStyle};
pub use rect::{Rect, Size};
pub use registry::{OverlayState, Registry, RegistryToken};
pub use render::{FrameRenderer, RectF, RenderBackend, Shape, SurfaceChange};
pub use residency::DesktopResidency;
pub use window::{OverlayWindow, Subscription, WindowResult, WindowSystem};
