#![allow(dead_code)]
//! Typed keyframe tracks indexed by `(ActionTag, property)`.
//!
//! The raw [`crate::document`] frames are permissive bags of optional fields;
//! this module converts them once, at load, into closed [`KeyData`] payloads
//! so the sampler never touches `serde_json::Value` again. Conversion also
//! sorts each track by frame index, which the bracketing scan in
//! [`crate::sampling`] relies on.

use std::cmp::Ordering;
use std::sync::Arc;

use hashbrown::HashMap;
use log::warn;

use crate::document::{
    AnimationData, BlendFactors, ClipDef, EasingData, FileRef, RawFrame, Rgb, Vec2,
};

/// Closed set of animatable properties.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TrackProperty {
    Position,
    Scale,
    RotationSkew,
    Alpha,
    Visibility,
    Texture,
    Tint,
    Blend,
    Action,
}

impl TrackProperty {
    /// Map the export's property name; unknown names are logged and dropped
    /// so one stray timeline cannot take the whole document down.
    pub fn from_name(name: &str) -> Option<TrackProperty> {
        Some(match name {
            "Position" => TrackProperty::Position,
            "Scale" => TrackProperty::Scale,
            "RotationSkew" => TrackProperty::RotationSkew,
            "Alpha" => TrackProperty::Alpha,
            "VisibleForFrame" => TrackProperty::Visibility,
            "FileData" => TrackProperty::Texture,
            "CColor" => TrackProperty::Tint,
            "BlendFunc" => TrackProperty::Blend,
            "ActionValue" => TrackProperty::Action,
            other => {
                warn!("ignoring timeline with unrecognized property '{other}'");
                return None;
            }
        })
    }
}

/// Easing attached to the right-hand key of a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    /// Cubic bezier through `(0,0)`/`(1,1)` with two control points.
    Bezier { x1: f32, y1: f32, x2: f32, y2: f32 },
}

impl Easing {
    pub fn from_raw(raw: &EasingData) -> Easing {
        match raw.kind {
            0 => Easing::Linear,
            1 => Easing::QuadIn,
            2 => Easing::QuadOut,
            3 => Easing::QuadInOut,
            -1 => bezier_from_points(raw.points.as_deref()),
            _ => Easing::Linear,
        }
    }
}

/// Four-point lists carry the segment endpoints in slots 0 and 3; shorter
/// lists are already just the control points.
fn bezier_from_points(points: Option<&[crate::document::VecPair]>) -> Easing {
    let Some(pts) = points else {
        return Easing::Linear;
    };
    let (p1, p2) = match pts.len() {
        0 | 1 => return Easing::Linear,
        2 | 3 => (pts[0], pts[1]),
        _ => (pts[1], pts[2]),
    };
    Easing::Bezier {
        x1: p1.x,
        y1: p1.y,
        x2: p2.x,
        y2: p2.y,
    }
}

/// Directive payload telling an embedded project what to play.
#[derive(Debug, Clone, PartialEq)]
pub struct InnerActionRef {
    /// Clip to run; `None` falls back to the target's default clip.
    pub clip: Option<String>,
    pub kind: InnerActionKind,
    pub single_frame: Option<f64>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InnerActionKind {
    Loop,
    NoLoop,
    SingleFrame,
}

impl InnerActionKind {
    fn from_name(name: Option<&str>) -> InnerActionKind {
        match name {
            Some("LoopAction") => InnerActionKind::Loop,
            Some("SingleFrameAction") => InnerActionKind::SingleFrame,
            Some("NoLoopAction") | None => InnerActionKind::NoLoop,
            Some(other) => {
                warn!("unrecognized inner action type '{other}', playing once");
                InnerActionKind::NoLoop
            }
        }
    }
}

impl InnerActionRef {
    /// Identity of a directive as seen by the dispatch dedup: re-emitting the
    /// same key on consecutive frames must not restart the target.
    pub fn dispatch_key(&self, fallback_clip: &str) -> DispatchKey {
        let clip = self.clip.as_deref().unwrap_or(fallback_clip);
        let frame = match self.single_frame {
            Some(f) => f.to_string(),
            None => String::new(),
        };
        DispatchKey(format!("{clip}|{:?}|{frame}", self.kind))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DispatchKey(String);

/// Converted keyframe payload. The variant decides the interpolation mode.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyData {
    /// Lerped pair: position, scale, rotation skew.
    Pair(Vec2),
    /// Lerped scalar: alpha.
    Scalar(f32),
    /// Stepped boolean: visibility.
    Flag(bool),
    /// Stepped texture reference; a keyframe without one leaves the current
    /// texture in place.
    Texture(Option<Arc<FileRef>>),
    /// Held tint color.
    Tint(Rgb),
    /// Held blend factor pair.
    Blend(BlendFactors),
    /// Held playback directive for an embedded project.
    Action(Arc<InnerActionRef>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe {
    pub index: f32,
    pub easing: Option<Easing>,
    pub data: KeyData,
}

/// One property's keys for one action tag, sorted by frame index.
#[derive(Debug, Clone)]
pub struct Track {
    pub property: TrackProperty,
    pub keys: Vec<Keyframe>,
}

/// All tracks of a document, grouped by action tag.
#[derive(Debug, Clone, Default)]
pub struct TimelineIndex {
    tracks: HashMap<i64, Vec<Track>>,
}

impl TimelineIndex {
    pub fn from_animation(animation: &AnimationData) -> TimelineIndex {
        let mut tracks: HashMap<i64, Vec<Track>> = HashMap::new();
        for timeline in &animation.timelines {
            let Some(property) = TrackProperty::from_name(&timeline.property) else {
                continue;
            };
            let keys = convert_frames(property, &timeline.frames);
            if keys.is_empty() {
                continue;
            }
            tracks
                .entry(timeline.action_tag)
                .or_default()
                .push(Track { property, keys });
        }
        TimelineIndex { tracks }
    }

    #[inline]
    pub fn tracks_for(&self, tag: i64) -> &[Track] {
        self.tracks.get(&tag).map(Vec::as_slice).unwrap_or(&[])
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }
}

fn convert_frames(property: TrackProperty, frames: &[RawFrame]) -> Vec<Keyframe> {
    let mut keys: Vec<Keyframe> = frames
        .iter()
        .map(|f| Keyframe {
            index: f.frame_index as f32,
            easing: f.easing_data.as_ref().map(Easing::from_raw),
            data: convert_payload(property, f),
        })
        .collect();
    keys.sort_by(|a, b| a.index.partial_cmp(&b.index).unwrap_or(Ordering::Equal));
    keys
}

fn convert_payload(property: TrackProperty, f: &RawFrame) -> KeyData {
    match property {
        TrackProperty::Position => KeyData::Pair(Vec2::new(
            f.x.unwrap_or(0.0),
            f.y.unwrap_or(0.0),
        )),
        TrackProperty::Scale => KeyData::Pair(Vec2::new(
            f.x.unwrap_or(1.0),
            f.y.unwrap_or(1.0),
        )),
        TrackProperty::RotationSkew => {
            let x = f.x.unwrap_or(0.0);
            KeyData::Pair(Vec2::new(x, f.y.unwrap_or(x)))
        }
        TrackProperty::Alpha => {
            let value = f
                .value
                .as_ref()
                .and_then(serde_json::Value::as_f64)
                .unwrap_or(255.0);
            KeyData::Scalar(value as f32)
        }
        TrackProperty::Visibility => {
            // Only an explicit false hides, matching the static node rule.
            let hidden = f
                .value
                .as_ref()
                .and_then(serde_json::Value::as_bool)
                .map(|v| !v)
                .unwrap_or(false);
            KeyData::Flag(!hidden)
        }
        TrackProperty::Texture => {
            KeyData::Texture(f.texture_file.as_ref().map(|t| Arc::new(t.clone())))
        }
        TrackProperty::Tint => {
            let rgb = match f.color {
                Some(c) => Rgb::from(c),
                None => Rgb::new(
                    f.r.unwrap_or(255),
                    f.g.unwrap_or(255),
                    f.b.unwrap_or(255),
                ),
            };
            KeyData::Tint(rgb)
        }
        TrackProperty::Blend => KeyData::Blend(BlendFactors {
            src: f.src.unwrap_or_default(),
            dst: f.dst.unwrap_or_default(),
        }),
        TrackProperty::Action => KeyData::Action(Arc::new(InnerActionRef {
            clip: f.current_animation_name.clone(),
            kind: InnerActionKind::from_name(f.inner_action_type.as_deref()),
            single_frame: f.single_frame_index,
        })),
    }
}

/// Named clip ranges with a resolved default.
#[derive(Debug, Clone)]
pub struct Clip {
    pub name: String,
    pub start: f32,
    pub end: f32,
}

#[derive(Debug, Clone, Default)]
pub struct ClipTable {
    clips: Vec<Clip>,
    by_name: HashMap<String, usize>,
    default_idx: Option<usize>,
}

impl ClipTable {
    /// `preferred_default` is the export's `ActivedAnimationName`; when it
    /// names a missing clip there simply is no default, same as nothing to
    /// autoplay. Duplicate names resolve to the last definition.
    pub fn new(defs: &[ClipDef], preferred_default: Option<&str>) -> ClipTable {
        let mut clips = Vec::with_capacity(defs.len());
        let mut by_name = HashMap::with_capacity(defs.len());
        for (idx, def) in defs.iter().enumerate() {
            clips.push(Clip {
                name: def.name.clone(),
                start: def.start_index as f32,
                end: def.end_index as f32,
            });
            by_name.insert(def.name.clone(), idx);
        }
        let default_idx = match preferred_default {
            Some(name) => by_name.get(name).copied(),
            None => (!clips.is_empty()).then_some(0),
        };
        ClipTable {
            clips,
            by_name,
            default_idx,
        }
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&Clip> {
        self.by_name.get(name).map(|&idx| &self.clips[idx])
    }

    #[inline]
    pub fn default_clip(&self) -> Option<&Clip> {
        self.default_idx.map(|idx| &self.clips[idx])
    }

    /// Clip names in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.clips.iter().map(|c| c.name.as_str())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }
}
