#![allow(dead_code)]
//! Identifiers for runtime entities.
//!
//! Dense indices improve cache locality; IDs are opaque externally. A
//! `NodeId` indexes the scene's visual-node arena, a `PlayerId` indexes the
//! per-document player slab (the root document is always `PlayerId(0)`), and
//! a `TintId` names one deduplicated color-transform resource on the host.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TintId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl PlayerId {
    /// The root document's player.
    pub const ROOT: PlayerId = PlayerId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
