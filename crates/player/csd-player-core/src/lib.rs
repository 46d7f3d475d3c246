#![allow(dead_code)]
//! CSD Player Core (renderer-agnostic)
//!
//! Plays back Cocos Studio JSON scene exports: builds a visual-node tree from
//! the document's ObjectData, indexes the per-tag property timelines, samples
//! keyframes per tick, and emits an ordered batch of stage operations plus
//! playback events. The rendering surface and asset I/O stay outside the
//! crate: hosts implement [`Assets`] for fetching and apply [`StageOp`]
//! batches to whatever scene graph they own (DOM, canvas, test recorder).

pub mod assets;
pub mod atlas;
mod build;
pub mod config;
pub mod document;
pub mod error;
pub mod ids;
pub mod node;
pub mod paths;
pub mod player;
pub mod pose;
pub mod sampling;
pub mod stage;
pub mod timeline;

// Re-exports for consumers (hosts and adapters)
pub use assets::{load_document_with_base, load_export, Assets, MemoryAssets};
pub use atlas::{AtlasCache, AtlasDescriptor, Rect, ResolvedSprite, SpriteFrame, SpritePlacement};
pub use config::{PathStrategy, PlayerConfig, RotationPolicy, VerticalAxis};
pub use document::{BlendFactors, ClipDef, ExportDocument, FileKind, FileRef, NodeKind, Rgb, Vec2};
pub use error::{LoadError, PlayerError, Result};
pub use ids::{NodeId, PlayerId, TintId};
pub use node::{RenderState, VisualNode};
pub use player::{LabelUpdate, PlaybackTicket, ScenePlayer, FRAMES_PER_SECOND};
pub use sampling::sample_track;
pub use stage::{
    NodeDecl, PlaybackEvent, StageOp, TextDecl, Texture, TickOutputs, TintFilter, Transform,
    Vertical,
};
pub use timeline::{ClipTable, Easing, InnerActionKind, KeyData, TimelineIndex, TrackProperty};
