#![allow(dead_code)]
//! Player configuration.
//!
//! Format variants disagree on a few points (how RotationSkewX/Y combine,
//! which way Y grows, how asset paths resolve), so those are configuration
//! rather than hardcoded behavior. Defaults match the most common export
//! profile.

use serde::{Deserialize, Serialize};

/// How a node's rotation angle is derived from its two skew components.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationPolicy {
    /// Average RotationSkewX and RotationSkewY into one angle.
    #[default]
    AverageSkew,
    /// Apply RotationSkewX alone, ignoring the Y component.
    SkewXOnly,
}

/// Which way the document's Y axis grows.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerticalAxis {
    /// Y grows upward; vertical placement is measured from the bottom edge.
    YUp,
    /// Y grows downward; vertical placement is measured from the top edge.
    YDown,
}

/// How atlas descriptors and plain texture paths are located.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathStrategy {
    /// Try the reference joined against the document base, then one and two
    /// directory levels up, then the raw relative path.
    #[default]
    RelativeSearch,
    /// Resolve every asset to `<dir>/<basename>` regardless of the path in
    /// the document (the flattened-assets export layout).
    FlatDir(String),
}

/// Configuration for a [`crate::ScenePlayer`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Rotation derivation policy.
    pub rotation: RotationPolicy,

    /// Vertical-axis override. `None` derives the convention from the root
    /// document's `CoordinateType` (`"yDown"` is top-based, anything else is
    /// Y-up). Nested documents always inherit the root's resolved convention.
    pub vertical_axis: Option<VerticalAxis>,

    /// Asset path resolution strategy.
    pub paths: PathStrategy,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            rotation: RotationPolicy::AverageSkew,
            vertical_axis: None,
            paths: PathStrategy::RelativeSearch,
        }
    }
}
