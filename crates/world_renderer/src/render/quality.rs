//! Distance-based model quality tiers

use crate::config::GraphicsConfig;

/// Model quality tier, ordered from coarsest to finest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QualityTier {
    /// Far away
    Low,
    /// Mid range
    Medium,
    /// Close to the camera
    High,
}

/// Chooses a quality tier from a squared camera-space distance.
///
/// Both thresholds are squared distances; `high_distance` is the closer one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualitySelector {
    /// Objects closer than this (squared) use at least medium quality
    pub medium_distance: f32,
    /// Objects closer than this (squared) use high quality
    pub high_distance: f32,
}

impl QualitySelector {
    /// Create a selector from the two squared-distance thresholds
    pub fn new(medium_distance: f32, high_distance: f32) -> Self {
        if high_distance > medium_distance {
            log::warn!(
                "High quality distance {} is beyond medium distance {}; medium tier will never be used",
                high_distance,
                medium_distance
            );
        }
        Self { medium_distance, high_distance }
    }

    /// Select the tier for a squared camera-space distance
    pub fn select(&self, distance_sq: f32) -> QualityTier {
        if distance_sq < self.high_distance {
            QualityTier::High
        } else if distance_sq < self.medium_distance {
            QualityTier::Medium
        } else {
            QualityTier::Low
        }
    }
}

impl Default for QualitySelector {
    fn default() -> Self {
        Self::from(&GraphicsConfig::default())
    }
}

impl From<&GraphicsConfig> for QualitySelector {
    fn from(config: &GraphicsConfig) -> Self {
        Self::new(config.medium_dist, config.high_dist)
    }
}
