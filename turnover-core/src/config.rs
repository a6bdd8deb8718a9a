//! Reconciliation configuration types
//!
//! Every fallback the pipeline applies lives here as a named field with a
//! documented default. The configuration is passed explicitly into the
//! reader, the reconciler and the locator extractor.

use crate::event::ReelPreference;
use crate::locator::DEFAULT_FRAME_COUNT_START;
use crate::timecode::FrameRate;
use serde::{Deserialize, Serialize};

/// Configuration for a reconciliation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Framerate assumed for edit lists that do not declare one (default: 23.98)
    #[serde(default = "default_framerate")]
    pub default_framerate: FrameRate,

    /// Which identity wins when an event names both a tape and a source file
    #[serde(default)]
    pub reel_preference: ReelPreference,

    /// First frame number of VFX plates (default: 1009)
    #[serde(default = "default_frame_count_start")]
    pub frame_count_start: u32,

    /// Whether to parse `VFX=` locators once transitions are absorbed
    #[serde(default = "default_true")]
    pub extract_vfx: bool,
}

fn default_framerate() -> FrameRate {
    FrameRate::Fps23_98
}

fn default_frame_count_start() -> u32 {
    DEFAULT_FRAME_COUNT_START
}

fn default_true() -> bool {
    true
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            default_framerate: default_framerate(),
            reel_preference: ReelPreference::default(),
            frame_count_start: default_frame_count_start(),
            extract_vfx: true,
        }
    }
}

impl ReconcileConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the fallback framerate
    pub fn with_default_framerate(mut self, rate: FrameRate) -> Self {
        self.default_framerate = rate;
        self
    }

    /// Builder method: set the reel preference
    pub fn with_reel_preference(mut self, preference: ReelPreference) -> Self {
        self.reel_preference = preference;
        self
    }

    /// Builder method: set the VFX frame count start
    pub fn with_frame_count_start(mut self, start: u32) -> Self {
        self.frame_count_start = start;
        self
    }

    /// Builder method: enable or disable VFX locator extraction
    pub fn with_vfx_extraction(mut self, enabled: bool) -> Self {
        self.extract_vfx = enabled;
        self
    }
}
