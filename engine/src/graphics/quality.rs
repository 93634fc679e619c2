//! Adaptive render quality
//!
//! A closed-loop governor that watches frame times and steps the render
//! quality through three discrete levels. Transitions require a sustained
//! streak of qualifying frames (hysteresis) and only ever move one level
//! at a time, so a noisy frame or two never flips the visuals back and
//! forth.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::info;

/// Rolling frame-time window length; no transition is evaluated until the
/// window is full
const FRAME_WINDOW_LEN: usize = 20;
/// Average FPS below which a downgrade streak builds
const DOWNGRADE_FPS: f32 = 45.0;
/// Average FPS above which an upgrade streak builds
const UPGRADE_FPS: f32 = 56.0;
/// Consecutive qualifying frames required before a transition commits
const HYSTERESIS_FRAMES: u32 = 30;
/// Frame times above this are treated as pauses, not real frames
const MAX_PLAUSIBLE_FRAME_TIME: f32 = 1.0;

/// Discrete render quality tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualityLevel {
    High,
    Medium,
    Low,
}

impl QualityLevel {
    /// The next level down, if any
    fn lower(self) -> Option<QualityLevel> {
        match self {
            QualityLevel::High => Some(QualityLevel::Medium),
            QualityLevel::Medium => Some(QualityLevel::Low),
            QualityLevel::Low => None,
        }
    }

    /// The next level up, if any
    fn higher(self) -> Option<QualityLevel> {
        match self {
            QualityLevel::High => None,
            QualityLevel::Medium => Some(QualityLevel::High),
            QualityLevel::Low => Some(QualityLevel::Medium),
        }
    }

    /// The fixed parameter bundle for this level
    pub fn params(self) -> QualityParams {
        match self {
            QualityLevel::High => QualityParams {
                cloud_steps: 24,
                foam_enabled: true,
                atmosphere_samples: 8,
                city_lights_enabled: true,
            },
            QualityLevel::Medium => QualityParams {
                cloud_steps: 12,
                foam_enabled: true,
                atmosphere_samples: 4,
                city_lights_enabled: false,
            },
            QualityLevel::Low => QualityParams {
                cloud_steps: 4,
                foam_enabled: false,
                atmosphere_samples: 2,
                city_lights_enabled: false,
            },
        }
    }
}

/// Named quality knobs consumed by the globe shader
///
/// These are discrete presets per [`QualityLevel`], not independently
/// tunable values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityParams {
    /// Cloud-layer raymarch iteration count
    pub cloud_steps: u32,
    /// Shoreline foam effect
    pub foam_enabled: bool,
    /// Atmosphere rim sample count
    pub atmosphere_samples: u32,
    /// Night-side city lights
    pub city_lights_enabled: bool,
}

/// Frame-time driven quality state machine
#[derive(Debug)]
pub struct QualityGovernor {
    frame_times: VecDeque<f32>,
    level: QualityLevel,
    downgrade_streak: u32,
    upgrade_streak: u32,
}

impl Default for QualityGovernor {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityGovernor {
    /// Create a governor starting at [`QualityLevel::High`]
    pub fn new() -> Self {
        Self {
            frame_times: VecDeque::with_capacity(FRAME_WINDOW_LEN),
            level: QualityLevel::High,
            downgrade_streak: 0,
            upgrade_streak: 0,
        }
    }

    /// Current quality level
    pub fn level(&self) -> QualityLevel {
        self.level
    }

    /// Parameter bundle for the current level
    pub fn params(&self) -> QualityParams {
        self.level.params()
    }

    /// Feed one frame's delta time (seconds) into the governor
    ///
    /// Non-positive or implausibly large samples are pauses, not frames,
    /// and are discarded. Transitions are only evaluated once the rolling
    /// window is full.
    pub fn record_frame_time(&mut self, dt: f32) {
        if dt <= 0.0 || dt > MAX_PLAUSIBLE_FRAME_TIME {
            return;
        }

        self.frame_times.push_back(dt);
        if self.frame_times.len() > FRAME_WINDOW_LEN {
            self.frame_times.pop_front();
        }
        if self.frame_times.len() < FRAME_WINDOW_LEN {
            return;
        }

        let mean: f32 = self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
        let average_fps = 1.0 / mean;

        if average_fps < DOWNGRADE_FPS {
            self.downgrade_streak += 1;
            self.upgrade_streak = 0;
            if self.downgrade_streak >= HYSTERESIS_FRAMES {
                if let Some(next) = self.level.lower() {
                    info!(
                        from = ?self.level,
                        to = ?next,
                        average_fps,
                        "Render quality downgraded"
                    );
                    self.level = next;
                }
                self.reset_streaks();
            }
        } else if average_fps > UPGRADE_FPS {
            self.upgrade_streak += 1;
            self.downgrade_streak = 0;
            if self.upgrade_streak >= HYSTERESIS_FRAMES {
                if let Some(next) = self.level.higher() {
                    info!(
                        from = ?self.level,
                        to = ?next,
                        average_fps,
                        "Render quality upgraded"
                    );
                    self.level = next;
                }
                self.reset_streaks();
            }
        } else {
            // Dead zone between the thresholds: no partial credit
            self.reset_streaks();
        }
    }

    /// Override the level explicitly (settings menu), bypassing the
    /// automatic logic
    pub fn force_level(&mut self, level: QualityLevel) {
        if self.level != level {
            info!(from = ?self.level, to = ?level, "Render quality forced");
        }
        self.level = level;
        self.reset_streaks();
    }

    fn reset_streaks(&mut self) {
        self.downgrade_streak = 0;
        self.upgrade_streak = 0;
    }
}
