#![allow(dead_code)]
//! Stage command stream.
//!
//! The engine never touches a rendering surface. Every visual mutation is
//! queued as a [`StageOp`] on [`TickOutputs`]; hosts drain the queue after
//! `update()` (or after any API call that applies frames) and translate the
//! ops to their surface of choice. Node identity is stable for the lifetime
//! of the scene, so hosts can keep a flat `NodeId -> element` table.

use serde::{Deserialize, Serialize};

use crate::atlas::SpritePlacement;
use crate::document::{NodeKind, Rgb, Vec2};
use crate::ids::{NodeId, PlayerId, TintId};

/// Everything needed to create one visual node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDecl {
    pub kind: NodeKind,
    pub name: Option<String>,
    /// Draw order; strictly increases along the depth-first build, so later
    /// siblings and deeper nodes draw above earlier ones.
    pub z: u32,
    pub size: Vec2,
    /// Initial text styling, present for text nodes only.
    pub text: Option<TextDecl>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextDecl {
    pub content: String,
    pub font_size: f32,
    pub color: Rgb,
    pub weight: String,
    /// Font family name derived from the font resource path.
    pub family: Option<String>,
}

/// Anchor-relative rectangle transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub left: f32,
    pub vertical: Vertical,
    /// Rotation/scale origin as anchor fractions of the node rect.
    pub origin: Vec2,
    pub scale: Vec2,
    pub rotation_deg: f32,
}

/// Which edge the vertical coordinate is measured from, following the
/// document's coordinate convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Vertical {
    Top(f32),
    Bottom(f32),
}

/// Texture assignment for a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Texture {
    /// Whole image file stretched to the node rect.
    Image { path: String },
    /// Cropped sheet region with trim and rotation baked in.
    Sprite { placement: SpritePlacement },
}

/// Deduplicated multiplicative tint. Hosts may build one colorize resource
/// per [`TintId`] and reuse it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TintFilter {
    pub id: TintId,
    pub rgb: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StageOp {
    CreateNode {
        node: NodeId,
        parent: Option<NodeId>,
        decl: NodeDecl,
    },
    SetSize {
        node: NodeId,
        size: Vec2,
    },
    SetTransform {
        node: NodeId,
        transform: Transform,
    },
    SetOpacity {
        node: NodeId,
        opacity: f32,
    },
    SetVisibility {
        node: NodeId,
        visible: bool,
    },
    SetAdditiveBlend {
        node: NodeId,
        additive: bool,
    },
    SetTexture {
        node: NodeId,
        texture: Texture,
    },
    /// `None` clears any tint on the node.
    SetTintFilter {
        node: NodeId,
        filter: Option<TintFilter>,
    },
    SetText {
        node: NodeId,
        text: String,
    },
    SetTextStyle {
        node: NodeId,
        color: Option<Rgb>,
        font_size: Option<f32>,
    },
}

/// Playback lifecycle notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum PlaybackEvent {
    /// A playback reached its end, or was superseded/stopped before it
    /// could (`completed: false`).
    ClipFinished {
        player: PlayerId,
        clip: String,
        generation: u64,
        completed: bool,
    },
}

/// Ops and events produced since the last drain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickOutputs {
    pub ops: Vec<StageOp>,
    pub events: Vec<PlaybackEvent>,
}

impl TickOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_op(&mut self, op: StageOp) {
        self.ops.push(op);
    }

    #[inline]
    pub fn push_event(&mut self, event: PlaybackEvent) {
        self.events.push(event);
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty() && self.events.is_empty()
    }
}
