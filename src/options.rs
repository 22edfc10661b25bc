//! Stroke options and display settings, plus the partial updates the UI sends.

use serde::{Deserialize, Serialize};

use crate::stroke::PointerKind;

/// Geometry options shared by every mark in the session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    pub size: f64,
    pub thinning: f64,
    pub smoothing: f64,
    pub streamline: f64,
    pub simulate_pressure: bool,
    pub clip: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            size: 16.0,
            thinning: 0.75,
            smoothing: 0.5,
            streamline: 0.5,
            simulate_pressure: true,
            clip: true,
        }
    }
}

impl Options {
    /// Slider range for size. Larger sizes are accepted, smaller ones are not.
    pub const SIZE_RANGE: std::ops::RangeInclusive<f64> = 1.0..=64.0;
    pub const THINNING_RANGE: std::ops::RangeInclusive<f64> = -1.0..=1.0;
    pub const SMOOTHING_RANGE: std::ops::RangeInclusive<f64> = 0.0..=2.0;
    pub const STREAMLINE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=1.0;

    /// The options to derive a path with for a mark of the given kind.
    pub fn for_kind(&self, kind: PointerKind) -> Options {
        Options {
            simulate_pressure: self.simulate_pressure && kind != PointerKind::Pen,
            ..*self
        }
    }

    /// Shallow-merge a partial update, clamping numbers into their legal ranges.
    pub fn merge(&mut self, patch: &OptionsPatch) {
        if let Some(size) = patch.size {
            self.size = clamp_logged("size", size, *Self::SIZE_RANGE.start()..=f64::MAX);
        }
        if let Some(thinning) = patch.thinning {
            self.thinning = clamp_logged("thinning", thinning, Self::THINNING_RANGE);
        }
        if let Some(smoothing) = patch.smoothing {
            self.smoothing = clamp_logged("smoothing", smoothing, Self::SMOOTHING_RANGE);
        }
        if let Some(streamline) = patch.streamline {
            self.streamline = clamp_logged("streamline", streamline, Self::STREAMLINE_RANGE);
        }
        if let Some(simulate_pressure) = patch.simulate_pressure {
            self.simulate_pressure = simulate_pressure;
        }
        if let Some(clip) = patch.clip {
            self.clip = clip;
        }
    }

    /// Like [`Options::merge`], but for a full option set (used by session hydration).
    pub fn merge_all(&mut self, other: &Options) {
        self.merge(&OptionsPatch::from(*other));
    }
}

fn clamp_logged(name: &str, value: f64, range: std::ops::RangeInclusive<f64>) -> f64 {
    if value.is_nan() {
        log::warn!("Ignoring NaN for option {}, using {}", name, range.start());
        return *range.start();
    }
    let clamped = value.clamp(*range.start(), *range.end());
    if clamped != value {
        log::warn!("Option {} = {} is out of range, clamped to {}", name, value, clamped);
    }
    clamped
}

/// A partial [`Options`] update. Unset fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OptionsPatch {
    pub size: Option<f64>,
    pub thinning: Option<f64>,
    pub smoothing: Option<f64>,
    pub streamline: Option<f64>,
    pub simulate_pressure: Option<bool>,
    pub clip: Option<bool>,
}

impl From<Options> for OptionsPatch {
    fn from(options: Options) -> Self {
        Self {
            size: Some(options.size),
            thinning: Some(options.thinning),
            smoothing: Some(options.smoothing),
            streamline: Some(options.streamline),
            simulate_pressure: Some(options.simulate_pressure),
            clip: Some(options.clip),
        }
    }
}

/// Display settings. These never affect geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub pen_mode: bool,
    pub dark_mode: bool,
    pub show_trace: bool,
    pub show_controls: bool,
    pub recompute_paths: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pen_mode: false,
            dark_mode: false,
            show_trace: false,
            show_controls: false,
            recompute_paths: true,
        }
    }
}

impl Settings {
    /// Shallow-merge a partial update. Returns true if `dark_mode` changed.
    pub fn merge(&mut self, patch: &SettingsPatch) -> bool {
        let was_dark = self.dark_mode;
        if let Some(pen_mode) = patch.pen_mode {
            self.pen_mode = pen_mode;
        }
        if let Some(dark_mode) = patch.dark_mode {
            self.dark_mode = dark_mode;
        }
        if let Some(show_trace) = patch.show_trace {
            self.show_trace = show_trace;
        }
        if let Some(show_controls) = patch.show_controls {
            self.show_controls = show_controls;
        }
        if let Some(recompute_paths) = patch.recompute_paths {
            self.recompute_paths = recompute_paths;
        }
        was_dark != self.dark_mode
    }
}

/// A partial [`Settings`] update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsPatch {
    pub pen_mode: Option<bool>,
    pub dark_mode: Option<bool>,
    pub show_trace: Option<bool>,
    pub show_controls: Option<bool>,
    pub recompute_paths: Option<bool>,
}

impl From<Settings> for SettingsPatch {
    fn from(settings: Settings) -> Self {
        Self {
            pen_mode: Some(settings.pen_mode),
            dark_mode: Some(settings.dark_mode),
            show_trace: Some(settings.show_trace),
            show_controls: Some(settings.show_controls),
            recompute_paths: Some(settings.recompute_paths),
        }
    }
}
