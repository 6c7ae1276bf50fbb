use winit::dpi::PhysicalSize;

use super::SurfaceErrorAction;

/// wgpu cannot configure a surface with a zero extent (minimized windows).
pub(crate) fn is_drawable(size: PhysicalSize<u32>) -> bool {
    size.width > 0 && size.height > 0
}

pub(crate) fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let first = *formats.first()?;

    let wanted = |f: &wgpu::TextureFormat| f.is_srgb() == prefer_srgb;
    Some(formats.iter().copied().find(wanted).unwrap_or(first))
}

pub(crate) fn choose_alpha_mode(
    supported: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| supported.contains(m))
        .or_else(|| supported.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Records `new_size` and reconfigures the surface if it is drawable.
///
/// Returns `true` when the surface was reconfigured.
pub(crate) fn apply_resize(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &mut wgpu::SurfaceConfiguration,
    size: &mut PhysicalSize<u32>,
    new_size: PhysicalSize<u32>,
) -> bool {
    *size = new_size;
    if !is_drawable(new_size) {
        return false;
    }

    config.width = new_size.width;
    config.height = new_size.height;

    surface.configure(device, config);
    true
}

pub(crate) fn map_surface_error(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    err: wgpu::SurfaceError,
) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
            if is_drawable(size) {
                surface.configure(device, config);
            }
            SurfaceErrorAction::Reconfigured
        }
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout => SurfaceErrorAction::SkipFrame,
        wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::{CompositeAlphaMode, TextureFormat};

    // ── drawable ──────────────────────────────────────────────────────────

    #[test]
    fn zero_extent_is_not_drawable() {
        assert!(!is_drawable(PhysicalSize::new(0, 600)));
        assert!(!is_drawable(PhysicalSize::new(800, 0)));
        assert!(is_drawable(PhysicalSize::new(1, 1)));
    }

    // ── surface format ────────────────────────────────────────────────────

    #[test]
    fn no_formats_yields_none() {
        assert_eq!(choose_surface_format(&[], true), None);
    }

    #[test]
    fn srgb_preferred_when_requested() {
        let formats = [TextureFormat::Bgra8Unorm, TextureFormat::Bgra8UnormSrgb];
        assert_eq!(
            choose_surface_format(&formats, true),
            Some(TextureFormat::Bgra8UnormSrgb)
        );
    }

    #[test]
    fn linear_preferred_when_srgb_not_requested() {
        let formats = [TextureFormat::Bgra8UnormSrgb, TextureFormat::Bgra8Unorm];
        assert_eq!(
            choose_surface_format(&formats, false),
            Some(TextureFormat::Bgra8Unorm)
        );
    }

    #[test]
    fn falls_back_to_first_format() {
        let formats = [TextureFormat::Rgba8UnormSrgb];
        assert_eq!(
            choose_surface_format(&formats, false),
            Some(TextureFormat::Rgba8UnormSrgb)
        );
    }

    // ── alpha mode ────────────────────────────────────────────────────────

    #[test]
    fn supported_alpha_request_is_honored() {
        let modes = [CompositeAlphaMode::Opaque, CompositeAlphaMode::PreMultiplied];
        assert_eq!(
            choose_alpha_mode(&modes, Some(CompositeAlphaMode::PreMultiplied)),
            CompositeAlphaMode::PreMultiplied
        );
    }

    #[test]
    fn unsupported_alpha_request_uses_first_supported() {
        let modes = [CompositeAlphaMode::Opaque];
        assert_eq!(
            choose_alpha_mode(&modes, Some(CompositeAlphaMode::PostMultiplied)),
            CompositeAlphaMode::Opaque
        );
    }

    #[test]
    fn no_supported_alpha_modes_uses_auto() {
        assert_eq!(choose_alpha_mode(&[], None), CompositeAlphaMode::Auto);
    }
}
