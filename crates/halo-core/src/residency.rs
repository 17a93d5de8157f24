/// Answers whether a window belongs to the active virtual desktop.
///
/// Implementations must not cache answers: desktop membership can change
/// between calls without any notification tied to the specific window.
/// A transiently unavailable desktop session answers `false`.
pub trait DesktopResidency {
    fn is_on_active_desktop(&self, hwnd: usize) -> bool;
}

impl<F> DesktopResidency for F
where
    F: Fn(usize) -> bool,
{
    fn is_on_active_desktop(&self, hwnd: usize) -> bool {
        self(hwnd)
    }
}
