#![allow(dead_code)]
//! Per-frame pose resolution.
//!
//! A pose is the node's base state with the sampled track values overlaid on
//! top. Resolution is pure; turning the pose into stage ops (with change
//! detection against what the host already saw) happens in
//! [`crate::player`].

use hashbrown::HashMap;

use crate::config::RotationPolicy;
use crate::document::{Rgb, Vec2};
use crate::ids::TintId;
use crate::node::RenderState;
use crate::sampling::sample_track;
use crate::stage::{TintFilter, Transform, Vertical};
use crate::timeline::{KeyData, Track, TrackProperty};

/// Overlay `tracks` sampled at `frame` onto a copy of `base`.
pub fn resolve_state(base: &RenderState, tracks: &[Track], frame: f32) -> RenderState {
    let mut state = base.clone();
    for track in tracks {
        let Some(data) = sample_track(track, frame) else {
            continue;
        };
        match (track.property, data) {
            (TrackProperty::Position, KeyData::Pair(v)) => state.position = v,
            (TrackProperty::Scale, KeyData::Pair(v)) => state.scale = v,
            (TrackProperty::RotationSkew, KeyData::Pair(v)) => {
                state.rotation_x = v.x;
                state.rotation_y = v.y;
            }
            (TrackProperty::Alpha, KeyData::Scalar(v)) => state.alpha = v,
            (TrackProperty::Visibility, KeyData::Flag(v)) => state.visible = v,
            // A texture key without a file leaves the document's own image in
            // place, so a track that ends on one snaps back to it.
            (TrackProperty::Texture, KeyData::Texture(Some(file))) => state.file = Some(file),
            (TrackProperty::Texture, KeyData::Texture(None)) => {}
            (TrackProperty::Tint, KeyData::Tint(rgb)) => state.color = rgb,
            (TrackProperty::Blend, KeyData::Blend(b)) => state.blend = Some(b),
            (TrackProperty::Action, KeyData::Action(action)) => state.inner = Some(action),
            _ => {}
        }
    }
    state
}

/// Place the node rect for the resolved state.
///
/// The anchor shifts the rect so `position` lands on the anchor point, and
/// doubles as the scale/rotation origin. Under a y-up document the vertical
/// coordinate measures from the bottom edge and the origin flips.
pub fn transform_for(
    state: &RenderState,
    size: Vec2,
    y_up: bool,
    rotation: RotationPolicy,
) -> Transform {
    let anchor = state.anchor;
    let left = state.position.x - anchor.x * size.x;
    let edge = state.position.y - anchor.y * size.y;
    let vertical = if y_up {
        Vertical::Bottom(edge)
    } else {
        Vertical::Top(edge)
    };
    let origin_y = if y_up { 1.0 - anchor.y } else { anchor.y };
    let rotation_deg = match rotation {
        RotationPolicy::AverageSkew => (state.rotation_x + state.rotation_y) / 2.0,
        RotationPolicy::SkewXOnly => state.rotation_x,
    };
    Transform {
        left,
        vertical,
        origin: Vec2::new(anchor.x, origin_y),
        scale: state.scale,
        rotation_deg,
    }
}

/// Interns tint colors so hosts can build one colorize resource per color
/// and reuse it across nodes and frames.
#[derive(Debug, Clone, Default)]
pub struct TintRegistry {
    ids: HashMap<Rgb, TintId>,
}

impl TintRegistry {
    pub fn new() -> TintRegistry {
        TintRegistry::default()
    }

    pub fn filter_for(&mut self, rgb: Rgb) -> TintFilter {
        let next = TintId(self.ids.len() as u32);
        let id = *self.ids.entry(rgb).or_insert(next);
        TintFilter { id, rgb }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SceneNodeData;
    use crate::timeline::Keyframe;

    fn base() -> RenderState {
        RenderState::from_node(&SceneNodeData::default())
    }

    fn track(property: TrackProperty, keys: Vec<(f32, KeyData)>) -> Track {
        Track {
            property,
            keys: keys
                .into_iter()
                .map(|(index, data)| Keyframe {
                    index,
                    easing: None,
                    data,
                })
                .collect(),
        }
    }

    /// it should overlay sampled tracks onto the base state
    #[test]
    fn overlay_replaces_sampled_fields() {
        let tracks = vec![
            track(
                TrackProperty::Position,
                vec![
                    (0.0, KeyData::Pair(Vec2::new(0.0, 0.0))),
                    (10.0, KeyData::Pair(Vec2::new(100.0, 40.0))),
                ],
            ),
            track(TrackProperty::Alpha, vec![(0.0, KeyData::Scalar(128.0))]),
        ];
        let state = resolve_state(&base(), &tracks, 5.0);
        assert_eq!(state.position, Vec2::new(50.0, 20.0));
        assert_eq!(state.alpha, 128.0);
        // Untouched fields keep their base values.
        assert_eq!(state.scale, Vec2::new(1.0, 1.0));
        assert!(state.visible);
    }

    /// it should keep the current texture across file-less texture keys
    #[test]
    fn empty_texture_keys_hold() {
        let tracks = vec![track(
            TrackProperty::Texture,
            vec![(0.0, KeyData::Texture(None))],
        )];
        let state = resolve_state(&base(), &tracks, 0.0);
        assert!(state.file.is_none());
    }

    /// it should anchor the rect and flip the vertical axis
    #[test]
    fn transform_anchors_and_flips() {
        let mut state = base();
        state.position = Vec2::new(10.0, 20.0);
        state.anchor = Vec2::new(0.5, 0.25);

        let up = transform_for(&state, Vec2::new(100.0, 40.0), true, RotationPolicy::AverageSkew);
        assert_eq!(up.left, -40.0);
        assert_eq!(up.vertical, Vertical::Bottom(10.0));
        assert_eq!(up.origin, Vec2::new(0.5, 0.75));

        let down =
            transform_for(&state, Vec2::new(100.0, 40.0), false, RotationPolicy::AverageSkew);
        assert_eq!(down.vertical, Vertical::Top(10.0));
        assert_eq!(down.origin, Vec2::new(0.5, 0.25));
    }

    /// it should rotate by the configured skew policy
    #[test]
    fn rotation_follows_policy() {
        let mut state = base();
        state.rotation_x = 30.0;
        state.rotation_y = 10.0;
        let avg = transform_for(&state, Vec2::ZERO, true, RotationPolicy::AverageSkew);
        assert_eq!(avg.rotation_deg, 20.0);
        let x_only = transform_for(&state, Vec2::ZERO, true, RotationPolicy::SkewXOnly);
        assert_eq!(x_only.rotation_deg, 30.0);
    }

    /// it should hand out one tint id per color
    #[test]
    fn tint_ids_are_interned() {
        let mut tints = TintRegistry::new();
        let red = tints.filter_for(Rgb::new(255, 0, 0));
        let blue = tints.filter_for(Rgb::new(0, 0, 255));
        let red_again = tints.filter_for(Rgb::new(255, 0, 0));
        assert_eq!(red.id, red_again.id);
        assert_ne!(red.id, blue.id);
        assert_eq!(tints.len(), 2);
    }
}
