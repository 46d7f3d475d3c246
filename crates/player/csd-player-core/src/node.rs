#![allow(dead_code)]
//! Visual node arena.
//!
//! Every node of every document in a scene, nested projects included, lives
//! in one flat arena in depth-first build order. That makes the arena index
//! double as the draw order and keeps traversals allocation-free.

use std::ops::{Index, IndexMut};
use std::sync::Arc;

use crate::document::{BlendFactors, FileRef, NodeKind, Rgb, SceneNodeData, Vec2};
use crate::ids::{NodeId, PlayerId};
use crate::timeline::{DispatchKey, InnerActionRef};

/// The animatable state of one node.
///
/// `from_node` builds the static base; the pose resolver clones it each frame
/// and overlays the sampled tracks. The base carries the document's own
/// texture and blend references, so a texture key without a file resolves
/// back to the document's image. Only `inner` starts empty.
#[derive(Debug, Clone)]
pub struct RenderState {
    pub position: Vec2,
    pub scale: Vec2,
    pub rotation_x: f32,
    pub rotation_y: f32,
    /// Anchor as fractions of the node rect.
    pub anchor: Vec2,
    /// 0..=255.
    pub alpha: f32,
    pub visible: bool,
    pub color: Rgb,
    /// Current texture reference: the document's own at rest, the active
    /// texture key's while a texture track drives it.
    pub file: Option<Arc<FileRef>>,
    pub blend: Option<BlendFactors>,
    /// Playback directive for an embedded project.
    pub inner: Option<Arc<InnerActionRef>>,
}

impl RenderState {
    pub fn from_node(data: &SceneNodeData) -> RenderState {
        RenderState {
            position: data.position.map(Vec2::from).unwrap_or(Vec2::ZERO),
            scale: data
                .scale
                .map(|s| Vec2::new(s.x.unwrap_or(1.0), s.y.unwrap_or(1.0)))
                .unwrap_or(Vec2::new(1.0, 1.0)),
            rotation_x: data.rotation_skew_x.unwrap_or(0.0),
            rotation_y: data.rotation_skew_y.unwrap_or(0.0),
            // A missing anchor block means centered; a present block
            // defaults each missing component to 0 during parsing.
            anchor: data
                .anchor_point
                .map(|a| Vec2::new(a.x, a.y))
                .unwrap_or(Vec2::new(0.5, 0.5)),
            alpha: data.alpha.unwrap_or(255.0),
            visible: data.visible_for_frame != Some(false),
            color: data.ccolor.map(Rgb::from).unwrap_or(Rgb::WHITE),
            file: data.file_data.as_ref().map(|f| Arc::new(f.clone())),
            blend: data.blend_func,
            inner: None,
        }
    }
}

/// What the host was last told, per concern that is change-detected.
///
/// `file` compares by `Arc` identity: every texture keyframe owns a distinct
/// `Arc`, so pointer equality is exactly "same keyframe as last time". A
/// directive is recorded here before any atlas work happens, which keeps a
/// failing sheet from being re-fetched every frame.
#[derive(Debug, Clone, Default)]
pub struct AppliedVisual {
    pub file: Option<Arc<FileRef>>,
    pub color: Option<Rgb>,
    pub additive: bool,
    /// Whether the node currently shows any texture; tint filters only make
    /// sense on top of one.
    pub has_texture: bool,
}

#[derive(Debug, Clone)]
pub struct VisualNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub kind: NodeKind,
    pub name: Option<String>,
    /// Action tag linking this node to its timelines.
    pub tag: Option<i64>,
    pub size: Vec2,
    /// Draw order; equals the arena index.
    pub z: u32,
    pub base: RenderState,
    /// Player driving an embedded project mounted at this node.
    pub sub_player: Option<PlayerId>,
    /// Host-forced directive that overrides the action track until cleared.
    pub manual_action: Option<Arc<InnerActionRef>>,
    pub last_dispatch: Option<DispatchKey>,
    pub applied: AppliedVisual,
}

#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    nodes: Vec<VisualNode>,
}

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    /// Reserve the next id and insert the node built for it.
    pub fn push(&mut self, make: impl FnOnce(NodeId) -> VisualNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let node = make(id);
        self.nodes.push(node);
        id
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&VisualNode> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut VisualNode> {
        self.nodes.get_mut(id.index())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VisualNode> {
        self.nodes.iter()
    }

    /// Depth-first descendants of `root`, not including `root` itself.
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        let mut stack = Vec::new();
        if let Some(node) = self.get(root) {
            stack.extend(node.children.iter().rev().copied());
        }
        Descendants { arena: self, stack }
    }
}

impl Index<NodeId> for NodeArena {
    type Output = VisualNode;

    #[inline]
    fn index(&self, id: NodeId) -> &VisualNode {
        &self.nodes[id.index()]
    }
}

impl IndexMut<NodeId> for NodeArena {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut VisualNode {
        &mut self.nodes[id.index()]
    }
}

pub struct Descendants<'a> {
    arena: &'a NodeArena,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        if let Some(node) = self.arena.get(id) {
            self.stack.extend(node.children.iter().rev().copied());
        }
        Some(id)
    }
}
