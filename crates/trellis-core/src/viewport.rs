//! Device presets and preview zoom.
//!
//! Fixed-size presets are scaled down (never up) so the whole device box fits
//! the preview container. The manual slider is logarithmic so small zoom
//! levels get finer control.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f64 = 0.2;
pub const MAX_ZOOM: f64 = 3.0;
/// `MAX_ZOOM / MIN_ZOOM`, the base of the slider's exponential mapping.
const SLIDER_BASE: f64 = 15.0;

/// Padding subtracted from each container dimension before fitting.
pub const DEFAULT_PADDING: f64 = 64.0;

/// Target box for a preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetSize {
    Fixed { width: u32, height: u32 },
    /// Use the whole preview container.
    Fill,
}

/// Named device preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewportPreset {
    Mobile,
    IphoneSe,
    Tablet,
    IpadPro,
    Macbook,
    #[default]
    Desktop,
    GalaxyFold,
}

impl ViewportPreset {
    pub const ALL: [ViewportPreset; 7] = [
        ViewportPreset::Mobile,
        ViewportPreset::IphoneSe,
        ViewportPreset::Tablet,
        ViewportPreset::IpadPro,
        ViewportPreset::Macbook,
        ViewportPreset::Desktop,
        ViewportPreset::GalaxyFold,
    ];

    pub fn size(self) -> PresetSize {
        let (width, height) = match self {
            ViewportPreset::Mobile | ViewportPreset::IphoneSe => (375, 667),
            ViewportPreset::Tablet => (768, 1024),
            ViewportPreset::IpadPro => (1024, 1366),
            ViewportPreset::Macbook => (1440, 900),
            ViewportPreset::GalaxyFold => (280, 653),
            ViewportPreset::Desktop => return PresetSize::Fill,
        };
        PresetSize::Fixed { width, height }
    }

    /// Id used in the viewport menu and as the frame's CSS class.
    pub fn id(self) -> &'static str {
        match self {
            ViewportPreset::Mobile => "mobile",
            ViewportPreset::IphoneSe => "iphone-se",
            ViewportPreset::Tablet => "tablet",
            ViewportPreset::IpadPro => "ipad-pro",
            ViewportPreset::Macbook => "macbook",
            ViewportPreset::Desktop => "desktop",
            ViewportPreset::GalaxyFold => "galaxy-fold",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.id() == id)
    }

    /// Menu label: first letter upper-cased, dashes as spaces.
    pub fn label(self) -> String {
        let id = self.id().replace('-', " ");
        let mut chars = id.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Font Awesome icon class for the viewport menu.
    pub fn icon(self) -> &'static str {
        match self {
            ViewportPreset::Mobile => "fas fa-mobile-alt",
            ViewportPreset::Tablet => "fas fa-tablet-alt",
            _ => "fas fa-desktop",
        }
    }

    pub fn is_fill(self) -> bool {
        self.size() == PresetSize::Fill
    }
}

impl fmt::Display for ViewportPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Pixel dimensions of an on-screen box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Zoom factor, always within [`MIN_ZOOM`, `MAX_ZOOM`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Zoom(f64);

impl Default for Zoom {
    fn default() -> Self {
        Zoom(1.0)
    }
}

impl Zoom {
    /// Clamp any value into range. NaN maps to 1.0.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Zoom(1.0);
        }
        Zoom(value.clamp(MIN_ZOOM, MAX_ZOOM))
    }

    /// Map a slider position in [0, 1] to `0.2 * 15^p`.
    pub fn from_slider(position: f64) -> Self {
        let p = if position.is_nan() {
            0.0
        } else {
            position.clamp(0.0, 1.0)
        };
        Zoom::new(MIN_ZOOM * SLIDER_BASE.powf(p))
    }

    /// Inverse of [`Zoom::from_slider`].
    pub fn slider_position(self) -> f64 {
        ((self.0 / MIN_ZOOM).ln() / SLIDER_BASE.ln()).clamp(0.0, 1.0)
    }

    pub fn get(self) -> f64 {
        self.0
    }

    /// Rounded percentage, e.g. `"90%"`.
    pub fn percent_label(self) -> String {
        format!("{}%", (self.0 * 100.0).round() as i64)
    }
}

/// Largest zoom in (0, 1] that fits `preset` into `container` minus padding.
///
/// Fill presets, and degenerate sizes on either side, yield 1.0.
pub fn auto_zoom(preset: ViewportPreset, container: Size, padding: f64) -> Zoom {
    let PresetSize::Fixed { width, height } = preset.size() else {
        return Zoom::default();
    };
    fit_zoom(
        Size::new(width as f64, height as f64),
        Size::new(container.width - padding, container.height - padding),
    )
}

/// `min(available.w / target.w, available.h / target.h, 1.0)`, clamped.
pub fn fit_zoom(target: Size, available: Size) -> Zoom {
    if target.width <= 0.0 || target.height <= 0.0 || available.width <= 0.0 || available.height <= 0.0
    {
        return Zoom::default();
    }
    let scale_x = available.width / target.width;
    let scale_y = available.height / target.height;
    Zoom::new(scale_x.min(scale_y).min(1.0))
}

/// Tracks the active preset and zoom.
#[derive(Debug, Clone)]
pub struct ZoomController {
    preset: ViewportPreset,
    zoom: Zoom,
    manual: bool,
    padding: f64,
}

impl Default for ZoomController {
    fn default() -> Self {
        Self::new(DEFAULT_PADDING)
    }
}

impl ZoomController {
    pub fn new(padding: f64) -> Self {
        Self {
            preset: ViewportPreset::default(),
            zoom: Zoom::default(),
            manual: false,
            padding,
        }
    }

    pub fn preset(&self) -> ViewportPreset {
        self.preset
    }

    pub fn zoom(&self) -> Zoom {
        self.zoom
    }

    /// Whether the current zoom came from the slider rather than auto-fit.
    pub fn is_manual(&self) -> bool {
        self.manual
    }

    /// Switch preset and recompute the fit, discarding any manual zoom.
    pub fn change_viewport(&mut self, preset: ViewportPreset, container: Size) -> Zoom {
        self.preset = preset;
        self.manual = false;
        self.zoom = auto_zoom(preset, container, self.padding);
        tracing::debug!(%preset, zoom = self.zoom.get(), "viewport changed");
        self.zoom
    }

    /// Apply a slider position. Stays in effect until the next viewport change.
    pub fn set_slider(&mut self, position: f64) -> Zoom {
        self.set_manual(Zoom::from_slider(position))
    }

    pub fn set_manual(&mut self, zoom: Zoom) -> Zoom {
        self.zoom = zoom;
        self.manual = true;
        self.zoom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mobile_fit_in_800_by_600() {
        let zoom = fit_zoom(Size::new(375.0, 667.0), Size::new(800.0, 600.0));
        assert!((zoom.get() - 600.0 / 667.0).abs() < 1e-9);
        assert_eq!(zoom.percent_label(), "90%");
    }

    #[test]
    fn test_auto_zoom_subtracts_padding() {
        let zoom = auto_zoom(ViewportPreset::Mobile, Size::new(864.0, 664.0), DEFAULT_PADDING);
        assert!((zoom.get() - 600.0 / 667.0).abs() < 1e-9);
    }

    #[test]
    fn test_auto_zoom_never_scales_up() {
        let zoom = auto_zoom(ViewportPreset::GalaxyFold, Size::new(4000.0, 4000.0), 64.0);
        assert_eq!(zoom.get(), 1.0);
    }

    #[test]
    fn test_fill_and_degenerate_give_one() {
        assert_eq!(auto_zoom(ViewportPreset::Desktop, Size::new(10.0, 10.0), 64.0).get(), 1.0);
        assert_eq!(auto_zoom(ViewportPreset::Tablet, Size::new(30.0, 900.0), 64.0).get(), 1.0);
    }

    #[test]
    fn test_tiny_container_clamps_to_min() {
        let zoom = fit_zoom(Size::new(1440.0, 900.0), Size::new(10.0, 10.0));
        assert_eq!(zoom.get(), MIN_ZOOM);
    }

    #[test]
    fn test_slider_mapping_endpoints() {
        assert!((Zoom::from_slider(0.0).get() - 0.2).abs() < 1e-12);
        assert!((Zoom::from_slider(1.0).get() - 3.0).abs() < 1e-9);
        assert!((Zoom::from_slider(0.5).get() - 0.2 * 15f64.sqrt()).abs() < 1e-12);
        assert!((Zoom::from_slider(-3.0).get() - 0.2).abs() < 1e-12);
        assert!((Zoom::from_slider(0.5).slider_position() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_manual_zoom_persists_until_viewport_change() {
        let mut ctl = ZoomController::new(DEFAULT_PADDING);
        ctl.change_viewport(ViewportPreset::Mobile, Size::new(864.0, 664.0));
        ctl.set_slider(1.0);
        assert!(ctl.is_manual());
        assert!((ctl.zoom().get() - 3.0).abs() < 1e-9);

        ctl.change_viewport(ViewportPreset::Desktop, Size::new(864.0, 664.0));
        assert!(!ctl.is_manual());
        assert_eq!(ctl.zoom().get(), 1.0);
    }

    #[test]
    fn test_preset_ids_and_labels() {
        for preset in ViewportPreset::ALL {
            assert_eq!(ViewportPreset::from_id(preset.id()), Some(preset));
        }
        assert_eq!(ViewportPreset::IphoneSe.label(), "Iphone se");
        assert_eq!(ViewportPreset::Tablet.icon(), "fas fa-tablet-alt");
    }

    #[test]
    fn test_nan_zoom() {
        assert_eq!(Zoom::new(f64::NAN).get(), 1.0);
        assert_eq!(Zoom::new(f64::INFINITY).get(), MAX_ZOOM);
    }
}
