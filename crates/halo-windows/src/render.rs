use halo_core::{Color, RectF, RenderBackend, Shape, Size, WindowResult};
use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Direct2D::Common::{
    D2D_RECT_F, D2D_SIZE_U, D2D1_ALPHA_MODE_PREMULTIPLIED, D2D1_COLOR_F, D2D1_PIXEL_FORMAT,
};
use windows::Win32::Graphics::Direct2D::{
    D2D1_ANTIALIAS_MODE_ALIASED, D2D1_FEATURE_LEVEL_DEFAULT, D2D1_HWND_RENDER_TARGET_PROPERTIES,
    D2D1_PRESENT_OPTIONS_NONE, D2D1_RENDER_TARGET_PROPERTIES, D2D1_RENDER_TARGET_TYPE_DEFAULT,
    D2D1_RENDER_TARGET_USAGE_NONE, D2D1_ROUNDED_RECT, ID2D1Factory, ID2D1HwndRenderTarget,
    ID2D1SolidColorBrush,
};
use windows::Win32::Graphics::Dxgi::Common::DXGI_FORMAT_UNKNOWN;

/// Cleared pixels; black is the overlay's color key.
const TRANSPARENT: D2D1_COLOR_F = D2D1_COLOR_F {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 0.0,
};

/// Draws into one overlay window through a Direct2D HWND render target.
pub struct D2dBackend {
    factory: ID2D1Factory,
    hwnd: HWND,
}

impl D2dBackend {
    pub fn new(factory: ID2D1Factory, hwnd: HWND) -> Self {
        Self { factory, hwnd }
    }
}

impl RenderBackend for D2dBackend {
    type Surface = ID2D1HwndRenderTarget;
    type Brush = ID2D1SolidColorBrush;

    fn create_surface(&mut self, size: Size) -> WindowResult<ID2D1HwndRenderTarget> {
        // Overlays position themselves in physical pixels, so the target
        // must not apply its own DPI scaling.
        let props = D2D1_RENDER_TARGET_PROPERTIES {
            r#type: D2D1_RENDER_TARGET_TYPE_DEFAULT,
            pixelFormat: D2D1_PIXEL_FORMAT {
                format: DXGI_FORMAT_UNKNOWN,
                alphaMode: D2D1_ALPHA_MODE_PREMULTIPLIED,
            },
            dpiX: 96.0,
            dpiY: 96.0,
            usage: D2D1_RENDER_TARGET_USAGE_NONE,
            minLevel: D2D1_FEATURE_LEVEL_DEFAULT,
        };
        let hwnd_props = D2D1_HWND_RENDER_TARGET_PROPERTIES {
            hwnd: self.hwnd,
            pixelSize: size_u(size),
            presentOptions: D2D1_PRESENT_OPTIONS_NONE,
        };

        unsafe {
            let target = self.factory.CreateHwndRenderTarget(&props, &hwnd_props)?;
            // Antialiased edges would blend with black and get color-keyed
            // into a ragged outline.
            target.SetAntialiasMode(D2D1_ANTIALIAS_MODE_ALIASED);
            Ok(target)
        }
    }

    fn resize_surface(
        &mut self,
        surface: &mut ID2D1HwndRenderTarget,
        size: Size,
    ) -> WindowResult<()> {
        unsafe { surface.Resize(&size_u(size))? };
        Ok(())
    }

    fn create_brush(
        &mut self,
        surface: &ID2D1HwndRenderTarget,
        color: Color,
    ) -> WindowResult<ID2D1SolidColorBrush> {
        let [r, g, b] = color.to_unit();
        let color = D2D1_COLOR_F { r, g, b, a: 1.0 };
        Ok(unsafe { surface.CreateSolidColorBrush(&color, None)? })
    }

    fn draw(
        &mut self,
        surface: &mut ID2D1HwndRenderTarget,
        shape: &Shape,
        brush: &ID2D1SolidColorBrush,
        thickness: f32,
    ) -> WindowResult<()> {
        unsafe {
            surface.BeginDraw();
            surface.Clear(Some(&TRANSPARENT));
            match shape {
                Shape::Rect(rect) => surface.DrawRectangle(&rect_f(rect), brush, thickness, None),
                Shape::RoundedRect { rect, radius } => {
                    let rounded = D2D1_ROUNDED_RECT {
                        rect: rect_f(rect),
                        radiusX: *radius,
                        radiusY: *radius,
                    };
                    surface.DrawRoundedRectangle(&rounded, brush, thickness, None);
                }
            }
            // D2DERR_RECREATE_TARGET surfaces here after a device loss.
            surface.EndDraw(None, None)?;
        }
        Ok(())
    }
}

fn size_u(size: Size) -> D2D_SIZE_U {
    D2D_SIZE_U {
        width: size.width,
        height: size.height,
    }
}

fn rect_f(rect: &RectF) -> D2D_RECT_F {
    D2D_RECT_F {
        left: rect.left,
        top: rect.top,
        right: rect.right,
        bottom: rect.bottom,
    }
}
