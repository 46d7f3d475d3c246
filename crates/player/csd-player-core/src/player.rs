#![allow(dead_code)]
//! Scene player: document loading, clip scheduling, and the frame pass.
//!
//! A [`ScenePlayer`] owns one root document plus a player per embedded
//! project document. `update` advances every active clip, re-resolves poses,
//! and queues [`StageOp`]s; ops also accumulate from the immediate-apply API
//! calls (`play_nested`, `set_color`, ...) and are handed to the host in one
//! batch by the next `update` or an explicit [`ScenePlayer::drain_outputs`].
//!
//! Clip completion is reported through [`PlaybackEvent::ClipFinished`]
//! carrying a generation counter; a [`PlaybackTicket`] from a `play` call can
//! be checked against it (or [`ScenePlayer::is_settled`]) without keeping any
//! callback state.

use std::collections::VecDeque;
use std::sync::Arc;

use hashbrown::HashMap;
use log::{error, warn};
use serde::{Deserialize, Serialize};

use crate::assets::{load_document_with_base, Assets};
use crate::atlas::AtlasCache;
use crate::build;
use crate::config::{PlayerConfig, VerticalAxis};
use crate::document::{FileKind, FileRef, NodeKind, Rgb, Vec2};
use crate::error::{PlayerError, Result};
use crate::ids::{NodeId, PlayerId};
use crate::node::{NodeArena, RenderState, VisualNode};
use crate::paths;
use crate::pose::{self, TintRegistry};
use crate::stage::{PlaybackEvent, StageOp, Texture, TickOutputs};
use crate::timeline::{ClipTable, InnerActionKind, InnerActionRef, TimelineIndex};

/// Fixed timeline rate of the export format.
pub const FRAMES_PER_SECOND: f64 = 60.0;

/// Handle to one `play` call, for polling completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackTicket {
    pub player: PlayerId,
    pub generation: u64,
}

/// Styling update for [`ScenePlayer::set_label`]; absent fields are left
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelUpdate {
    pub text: Option<String>,
    pub color: Option<Rgb>,
    pub font_size: Option<f32>,
}

/// Per-document playback state.
pub(crate) struct PlayerCore {
    pub(crate) id: PlayerId,
    /// Base directory the document's asset references resolve against.
    pub(crate) base_path: String,
    pub(crate) timelines: TimelineIndex,
    pub(crate) clips: ClipTable,
    /// Nodes this document contributed, in build order.
    pub(crate) nodes: Vec<NodeId>,
    pub(crate) active: Option<ActiveClip>,
    pub(crate) generation: u64,
}

pub(crate) struct ActiveClip {
    pub(crate) clip: String,
    pub(crate) start: f32,
    pub(crate) end: f32,
    pub(crate) looped: bool,
    /// Start-frame offset added on top of `start`.
    pub(crate) offset: f32,
    pub(crate) elapsed: f64,
    pub(crate) duration_s: f64,
    pub(crate) generation: u64,
}

/// A sampled inner-action directive waiting to start a nested clip. Queued
/// during the frame pass and drained afterwards, so a dispatch chain settles
/// within the same update.
pub(crate) struct QueuedDispatch {
    pub(crate) player: PlayerId,
    pub(crate) clip: String,
    pub(crate) kind: InnerActionKind,
    pub(crate) offset: Option<f64>,
}

pub struct ScenePlayer {
    pub(crate) config: PlayerConfig,
    pub(crate) y_up: bool,
    pub(crate) design_size: Vec2,
    pub(crate) arena: NodeArena,
    /// Node lookup by document `Name`, shared across nested documents.
    pub(crate) names: HashMap<String, Vec<NodeId>>,
    pub(crate) players: Vec<PlayerCore>,
    pub(crate) atlas: AtlasCache,
    pub(crate) tints: TintRegistry,
    pub(crate) outputs: TickOutputs,
    pub(crate) dispatches: VecDeque<QueuedDispatch>,
}

impl ScenePlayer {
    /// Load a scene document, build its node tree (nested projects included),
    /// and apply frame 0 of every document.
    pub fn load(
        assets: &mut dyn Assets,
        config: PlayerConfig,
        candidates: &[&str],
    ) -> Result<ScenePlayer> {
        let (doc, base) = load_document_with_base(assets, candidates)?;
        let origin = candidates.first().copied().unwrap_or_default();
        let Some(content) = doc.into_content() else {
            return Err(PlayerError::parse(origin, "export has no content block"));
        };
        let y_up = match config.vertical_axis {
            Some(VerticalAxis::YUp) => true,
            Some(VerticalAxis::YDown) => false,
            None => content.coordinate_type.as_deref() != Some("yDown"),
        };
        let design_size = content
            .object_data
            .as_ref()
            .and_then(|o| o.size)
            .map(Vec2::from)
            .unwrap_or(Vec2::ZERO);

        let mut scene = ScenePlayer {
            config,
            y_up,
            design_size,
            arena: NodeArena::new(),
            names: HashMap::new(),
            players: Vec::new(),
            atlas: AtlasCache::new(),
            tints: TintRegistry::new(),
            outputs: TickOutputs::new(),
            dispatches: VecDeque::new(),
        };
        if build::instantiate(&mut scene, assets, content, &base, None).is_none() {
            return Err(PlayerError::parse(origin, "export has no ObjectData or Animation"));
        }
        scene.drain_dispatches(assets);
        Ok(scene)
    }

    /// Advance every active clip by `dt` seconds, settle queued nested
    /// dispatches, and return the accumulated op/event batch.
    pub fn update(&mut self, assets: &mut dyn Assets, dt: f64) -> TickOutputs {
        let dt = dt.max(0.0);
        for idx in 0..self.players.len() {
            let pid = PlayerId(idx as u32);
            let (frame, finished) = {
                let Some(active) = self.players[idx].active.as_mut() else {
                    continue;
                };
                active.elapsed += dt;
                let t = active.elapsed / active.duration_s;
                let span = active.end - active.start;
                let at = |progress: f32| active.start + active.offset + progress * span;
                if active.looped {
                    (at(t.fract() as f32), None)
                } else if t < 1.0 {
                    (at(t as f32), None)
                } else {
                    (at(1.0), Some((active.clip.clone(), active.generation)))
                }
            };
            if finished.is_some() {
                self.players[idx].active = None;
            }
            self.apply_player_frame(assets, pid, frame);
            if let Some((clip, generation)) = finished {
                self.outputs.push_event(PlaybackEvent::ClipFinished {
                    player: pid,
                    clip,
                    generation,
                    completed: true,
                });
            }
        }
        self.drain_dispatches(assets);
        std::mem::take(&mut self.outputs)
    }

    /// Take the ops and events accumulated by API calls without ticking.
    pub fn drain_outputs(&mut self) -> TickOutputs {
        std::mem::take(&mut self.outputs)
    }

    /// Start a root clip. Any playback already running is superseded (its
    /// completion event fires with `completed: false`). The first frame shows
    /// on the next `update`.
    pub fn play(&mut self, name: &str) -> Result<PlaybackTicket> {
        let root = PlayerId::ROOT.index();
        let Some(clip) = self.players[root].clips.get(name) else {
            return Err(PlayerError::UnknownClip {
                name: name.to_string(),
            });
        };
        let (clip_name, start, end) = (clip.name.clone(), clip.start, clip.end);
        self.supersede(PlayerId::ROOT);
        Ok(self.start_clip(PlayerId::ROOT, clip_name, start, end, false, 0.0))
    }

    /// Stop the root clip, if any, superseding its completion.
    pub fn stop(&mut self) {
        self.supersede(PlayerId::ROOT);
    }

    /// Drive the embedded project under the first node named `name`: force
    /// the directive on every such node (so action keyframes stop competing
    /// until [`ScenePlayer::clear_nested`]) and start the clip immediately.
    /// `clip: None` plays the project's default clip; `offset` shifts the
    /// start frame.
    pub fn play_nested(
        &mut self,
        assets: &mut dyn Assets,
        name: &str,
        clip: Option<&str>,
        kind: InnerActionKind,
        offset: Option<f64>,
    ) -> Result<PlaybackTicket> {
        let Some(sub) = self.sub_player(name) else {
            return Err(PlayerError::SubPlayerNotFound {
                name: name.to_string(),
            });
        };
        let action = Arc::new(InnerActionRef {
            clip: clip.map(str::to_string),
            kind,
            single_frame: offset,
        });
        let fallback = self.players[sub.index()]
            .clips
            .default_clip()
            .map(|c| c.name.clone())
            .unwrap_or_default();
        let ids = self.names.get(name).cloned().unwrap_or_default();
        for id in ids {
            let node = &mut self.arena[id];
            if node.sub_player.is_some() {
                node.last_dispatch = Some(action.dispatch_key(&fallback));
                node.manual_action = Some(action.clone());
            }
        }
        let ticket = self.play_for(assets, sub, clip, kind, offset)?;
        self.drain_dispatches(assets);
        Ok(ticket)
    }

    /// Lift the forced directive from `play_nested`; the next sampled action
    /// keyframe takes over again. The nested clip keeps running.
    pub fn clear_nested(&mut self, name: &str) {
        let ids = self.names.get(name).cloned().unwrap_or_default();
        for id in ids {
            let node = &mut self.arena[id];
            if node.sub_player.is_some() {
                node.manual_action = None;
                node.last_dispatch = None;
            }
        }
    }

    /// Whether the playback behind `ticket` is no longer running, either
    /// completed or superseded.
    pub fn is_settled(&self, ticket: PlaybackTicket) -> bool {
        match self
            .players
            .get(ticket.player.index())
            .and_then(|core| core.active.as_ref())
        {
            Some(active) => active.generation != ticket.generation,
            None => true,
        }
    }

    /// Root clip names, in definition order.
    pub fn animations(&self) -> impl Iterator<Item = &str> {
        self.players[PlayerId::ROOT.index()].clips.names()
    }

    /// Clip names of any document's player.
    pub fn animations_for(&self, player: PlayerId) -> impl Iterator<Item = &str> {
        self.players
            .get(player.index())
            .into_iter()
            .flat_map(|core| core.clips.names())
    }

    /// Whether the root document defines a clip named `name`.
    pub fn has_animation(&self, name: &str) -> bool {
        self.players[PlayerId::ROOT.index()].clips.get(name).is_some()
    }

    /// First node carrying the document `Name`.
    pub fn node(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).and_then(|ids| ids.first().copied())
    }

    /// All nodes carrying the document `Name`, in build order.
    pub fn nodes_named(&self, name: &str) -> &[NodeId] {
        self.names.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Player of the embedded project under the first node named `name`.
    pub fn sub_player(&self, name: &str) -> Option<PlayerId> {
        self.names.get(name).and_then(|ids| {
            ids.iter()
                .find_map(|&id| self.arena[id].sub_player)
        })
    }

    pub fn visual(&self, id: NodeId) -> Option<&VisualNode> {
        self.arena.get(id)
    }

    /// Root document's `ObjectData` size.
    pub fn design_size(&self) -> Vec2 {
        self.design_size
    }

    pub fn y_up(&self) -> bool {
        self.y_up
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Replace the text shown under every node named `name` (the node itself
    /// when it is a text node, otherwise its first text descendant).
    pub fn set_text(&mut self, name: &str, text: &str) -> bool {
        let ids = self.names.get(name).cloned().unwrap_or_default();
        if ids.is_empty() {
            return false;
        }
        for host in ids {
            let target = self.text_target(host);
            self.outputs.push_op(StageOp::SetText {
                node: target,
                text: text.to_string(),
            });
        }
        true
    }

    /// Update text content and styling under every node named `name`.
    pub fn set_label(&mut self, name: &str, update: &LabelUpdate) -> bool {
        let ids = self.names.get(name).cloned().unwrap_or_default();
        if ids.is_empty() {
            return false;
        }
        let mut changed = false;
        for host in ids {
            let target = self.text_target(host);
            if let Some(text) = &update.text {
                self.outputs.push_op(StageOp::SetText {
                    node: target,
                    text: text.clone(),
                });
                changed = true;
            }
            if update.color.is_some() || update.font_size.is_some() {
                self.outputs.push_op(StageOp::SetTextStyle {
                    node: target,
                    color: update.color,
                    font_size: update.font_size,
                });
                changed = true;
            }
        }
        changed
    }

    /// Tint every node named `name` and, recursively, its sprite descendants.
    /// Text nodes keep their own color. The tint becomes part of the nodes'
    /// base state, so it survives frame passes until a tint track overrides
    /// it.
    pub fn set_color(&mut self, name: &str, rgb: Rgb) -> bool {
        let ids = self.names.get(name).cloned().unwrap_or_default();
        if ids.is_empty() {
            return false;
        }
        for host in ids {
            self.arena[host].base.color = rgb;
            self.refresh_tint(host, rgb);
            let descendants: Vec<NodeId> = self.arena.descendants(host).collect();
            for id in descendants {
                if self.arena[id].kind == NodeKind::Sprite {
                    self.arena[id].base.color = rgb;
                    self.refresh_tint(id, rgb);
                }
            }
        }
        true
    }

    /// [`ScenePlayer::set_color`] with a `"#RRGGBB"` color.
    pub fn set_color_hex(&mut self, name: &str, hex: &str) -> bool {
        match Rgb::from_hex(hex) {
            Some(rgb) => self.set_color(name, rgb),
            None => false,
        }
    }

    /// Start a clip on one document's player with the nested-play semantics:
    /// the start frame is applied immediately.
    pub(crate) fn play_for(
        &mut self,
        assets: &mut dyn Assets,
        player: PlayerId,
        clip: Option<&str>,
        kind: InnerActionKind,
        offset: Option<f64>,
    ) -> Result<PlaybackTicket> {
        let core = &self.players[player.index()];
        let resolved = match clip {
            Some(name) => core.clips.get(name),
            None => core.clips.default_clip(),
        };
        let Some(found) = resolved else {
            return Err(PlayerError::UnknownClip {
                name: clip.unwrap_or_default().to_string(),
            });
        };
        let (clip_name, start, end) = (found.name.clone(), found.start, found.end);
        self.supersede(player);
        let offset = offset.unwrap_or(0.0) as f32;
        let ticket = self.start_clip(
            player,
            clip_name,
            start,
            end,
            kind == InnerActionKind::Loop,
            offset,
        );
        self.apply_player_frame(assets, player, start + offset);
        Ok(ticket)
    }

    fn start_clip(
        &mut self,
        player: PlayerId,
        clip: String,
        start: f32,
        end: f32,
        looped: bool,
        offset: f32,
    ) -> PlaybackTicket {
        let core = &mut self.players[player.index()];
        core.generation += 1;
        let generation = core.generation;
        core.active = Some(ActiveClip {
            clip,
            start,
            end,
            looped,
            offset,
            elapsed: 0.0,
            duration_s: (end - start).max(1.0) as f64 / FRAMES_PER_SECOND,
            generation,
        });
        PlaybackTicket { player, generation }
    }

    /// End the player's active playback early, if any.
    fn supersede(&mut self, player: PlayerId) {
        if let Some(active) = self.players[player.index()].active.take() {
            self.outputs.push_event(PlaybackEvent::ClipFinished {
                player,
                clip: active.clip,
                generation: active.generation,
                completed: false,
            });
        }
    }

    fn drain_dispatches(&mut self, assets: &mut dyn Assets) {
        while let Some(dispatch) = self.dispatches.pop_front() {
            if let Err(err) = self.play_for(
                assets,
                dispatch.player,
                Some(&dispatch.clip),
                dispatch.kind,
                dispatch.offset,
            ) {
                warn!("nested dispatch for clip '{}' failed: {err}", dispatch.clip);
            }
        }
    }

    /// Resolve and apply one document's pose at `frame` to all its nodes.
    pub(crate) fn apply_player_frame(&mut self, assets: &mut dyn Assets, player: PlayerId, frame: f32) {
        let ids = self.players[player.index()].nodes.clone();
        for id in ids {
            let state = {
                let node = &self.arena[id];
                let core = &self.players[player.index()];
                let tracks = match node.tag {
                    Some(tag) => core.timelines.tracks_for(tag),
                    None => &[],
                };
                pose::resolve_state(&node.base, tracks, frame)
            };
            self.apply_state(assets, player, id, &state);
        }
    }

    fn apply_state(&mut self, assets: &mut dyn Assets, player: PlayerId, id: NodeId, state: &RenderState) {
        // Directive dispatch runs before the visual pass, as in the frame
        // being shown.
        let directive = {
            let node = &self.arena[id];
            node.sub_player
                .map(|sub| (node.manual_action.clone().or_else(|| state.inner.clone()), sub))
        };
        if let Some((Some(action), sub)) = directive {
            let fallback = self.players[sub.index()]
                .clips
                .default_clip()
                .map(|c| c.name.clone());
            let target = action
                .clip
                .clone()
                .or(fallback)
                .filter(|t| !t.is_empty());
            if let Some(target) = target {
                let key = action.dispatch_key(&target);
                let node = &mut self.arena[id];
                if node.last_dispatch.as_ref() != Some(&key) {
                    node.last_dispatch = Some(key);
                    self.dispatches.push_back(QueuedDispatch {
                        player: sub,
                        clip: target,
                        kind: action.kind,
                        offset: action.single_frame,
                    });
                }
            }
        }

        let transform =
            pose::transform_for(state, self.arena[id].size, self.y_up, self.config.rotation);
        self.outputs.push_op(StageOp::SetTransform { node: id, transform });
        self.outputs.push_op(StageOp::SetOpacity {
            node: id,
            opacity: state.alpha / 255.0,
        });
        self.outputs.push_op(StageOp::SetVisibility {
            node: id,
            visible: state.visible,
        });

        if let Some(blend) = state.blend {
            let additive = blend.is_additive();
            let node = &mut self.arena[id];
            if node.applied.additive != additive {
                node.applied.additive = additive;
                self.outputs.push_op(StageOp::SetAdditiveBlend { node: id, additive });
            }
        }

        // Texture keys compare by Arc identity against the last applied one.
        let swap = {
            let node = &mut self.arena[id];
            match &state.file {
                Some(file)
                    if !node
                        .applied
                        .file
                        .as_ref()
                        .is_some_and(|prev| Arc::ptr_eq(prev, file)) =>
                {
                    // Recorded up front so a failing resolve is not retried
                    // every frame.
                    node.applied.file = Some(file.clone());
                    Some(file.clone())
                }
                _ => None,
            }
        };
        match swap {
            Some(file) => {
                if self.swap_texture(assets, player, id, &file) {
                    self.force_tint(id, state.color);
                }
            }
            None => self.refresh_tint(id, state.color),
        }
    }

    /// Apply a texture directive to a node. Returns whether a texture was
    /// actually assigned.
    fn swap_texture(
        &mut self,
        assets: &mut dyn Assets,
        player: PlayerId,
        id: NodeId,
        file: &FileRef,
    ) -> bool {
        if file.is_atlas_ref() {
            let base = self.players[player.index()].base_path.clone();
            match self.atlas.resolve(assets, file, &base, &self.config.paths) {
                Ok(sprite) => {
                    self.outputs.push_op(StageOp::SetTexture {
                        node: id,
                        texture: Texture::Sprite {
                            placement: sprite.placement(),
                        },
                    });
                    self.arena[id].applied.has_texture = true;
                    true
                }
                Err(err) => {
                    error!("sprite resolve failed for '{}': {err}", file.path);
                    false
                }
            }
        } else if file.kind == FileKind::Normal && !file.path.is_empty() {
            let base = self.players[player.index()].base_path.clone();
            let path = paths::texture_path(&base, &file.path, &self.config.paths);
            self.outputs.push_op(StageOp::SetTexture {
                node: id,
                texture: Texture::Image { path },
            });
            self.arena[id].applied.has_texture = true;
            true
        } else {
            false
        }
    }

    /// Change-detected tint application. Text nodes track the color but never
    /// get a filter; nodes without a texture only ever get the filter
    /// cleared.
    fn refresh_tint(&mut self, id: NodeId, rgb: Rgb) {
        let (first, is_text, has_texture) = {
            let node = &mut self.arena[id];
            if node.applied.color == Some(rgb) {
                return;
            }
            let first = node.applied.color.is_none();
            node.applied.color = Some(rgb);
            (first, node.kind == NodeKind::Text, node.applied.has_texture)
        };
        if is_text {
            return;
        }
        let filter = if has_texture && !rgb.is_white() {
            Some(self.tints.filter_for(rgb))
        } else {
            None
        };
        // Nothing to clear on the very first application.
        if first && filter.is_none() {
            return;
        }
        self.outputs.push_op(StageOp::SetTintFilter { node: id, filter });
    }

    /// Unconditional tint re-application after a texture swap.
    fn force_tint(&mut self, id: NodeId, rgb: Rgb) {
        let (is_text, has_texture) = {
            let node = &mut self.arena[id];
            node.applied.color = Some(rgb);
            (node.kind == NodeKind::Text, node.applied.has_texture)
        };
        if is_text {
            return;
        }
        let filter = if has_texture && !rgb.is_white() {
            Some(self.tints.filter_for(rgb))
        } else {
            None
        };
        self.outputs.push_op(StageOp::SetTintFilter { node: id, filter });
    }

    fn text_target(&self, host: NodeId) -> NodeId {
        if self.arena[host].kind == NodeKind::Text {
            return host;
        }
        self.arena
            .descendants(host)
            .find(|&id| self.arena[id].kind == NodeKind::Text)
            .unwrap_or(host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ClipDef;
    use crate::error::LoadError;

    struct NoAssets;

    impl Assets for NoAssets {
        fn fetch_text(&mut self, path: &str) -> core::result::Result<String, LoadError> {
            Err(LoadError::new(path, "unavailable"))
        }
    }

    fn bare_scene(clips: &[(&str, i64, i64)]) -> ScenePlayer {
        let defs: Vec<ClipDef> = clips
            .iter()
            .map(|&(name, start, end)| ClipDef {
                name: name.to_string(),
                start_index: start,
                end_index: end,
            })
            .collect();
        ScenePlayer {
            config: PlayerConfig::default(),
            y_up: true,
            design_size: Vec2::ZERO,
            arena: NodeArena::new(),
            names: HashMap::new(),
            players: vec![PlayerCore {
                id: PlayerId::ROOT,
                base_path: String::new(),
                timelines: TimelineIndex::default(),
                clips: ClipTable::new(&defs, None),
                nodes: Vec::new(),
                active: None,
                generation: 0,
            }],
            atlas: AtlasCache::new(),
            tints: TintRegistry::new(),
            outputs: TickOutputs::new(),
            dispatches: VecDeque::new(),
        }
    }

    fn finished_events(batch: &TickOutputs) -> Vec<(String, bool)> {
        batch
            .events
            .iter()
            .map(|event| match event {
                PlaybackEvent::ClipFinished { clip, completed, .. } => {
                    (clip.clone(), *completed)
                }
            })
            .collect()
    }

    /// it should reject unknown root clips
    #[test]
    fn unknown_clip_is_an_error() {
        let mut scene = bare_scene(&[("intro", 0, 30)]);
        assert!(matches!(
            scene.play("nope"),
            Err(PlayerError::UnknownClip { .. })
        ));
        assert!(scene.play("intro").is_ok());
    }

    /// it should complete a one-shot clip exactly once and then idle
    #[test]
    fn one_shot_completes_once() {
        let mut scene = bare_scene(&[("intro", 0, 30)]);
        let ticket = scene.play("intro").unwrap();
        assert!(!scene.is_settled(ticket));

        // 30 frames at 60 fps last half a second.
        let batch = scene.update(&mut NoAssets, 0.25);
        assert!(batch.events.is_empty());
        assert!(!scene.is_settled(ticket));

        let batch = scene.update(&mut NoAssets, 0.3);
        assert_eq!(finished_events(&batch), vec![("intro".to_string(), true)]);
        assert!(scene.is_settled(ticket));

        let batch = scene.update(&mut NoAssets, 0.3);
        assert!(batch.events.is_empty());
    }

    /// it should supersede a running clip when a new one starts
    #[test]
    fn play_supersedes_the_running_clip() {
        let mut scene = bare_scene(&[("a", 0, 30), ("b", 31, 60)]);
        let first = scene.play("a").unwrap();
        let second = scene.play("b").unwrap();
        assert_ne!(first.generation, second.generation);
        assert!(scene.is_settled(first));
        assert!(!scene.is_settled(second));

        let batch = scene.drain_outputs();
        assert_eq!(finished_events(&batch), vec![("a".to_string(), false)]);

        // Only "b" ever completes.
        let batch = scene.update(&mut NoAssets, 10.0);
        assert_eq!(finished_events(&batch), vec![("b".to_string(), true)]);
    }

    /// it should keep looping clips alive indefinitely
    #[test]
    fn looping_clips_do_not_complete() {
        let mut scene = bare_scene(&[("spin", 0, 12)]);
        let ticket = scene
            .play_for(&mut NoAssets, PlayerId::ROOT, Some("spin"), InnerActionKind::Loop, None)
            .unwrap();
        let batch = scene.update(&mut NoAssets, 5.0);
        assert!(batch.events.is_empty());
        assert!(!scene.is_settled(ticket));
    }

    /// it should play the default clip when none is named
    #[test]
    fn nested_play_falls_back_to_the_default_clip() {
        let mut scene = bare_scene(&[("first", 0, 10), ("second", 11, 20)]);
        scene
            .play_for(&mut NoAssets, PlayerId::ROOT, None, InnerActionKind::NoLoop, None)
            .unwrap();
        let active = scene.players[0].active.as_ref().unwrap();
        assert_eq!(active.clip, "first");
        assert!(!active.looped);
    }

    /// it should floor the clip length at one frame
    #[test]
    fn degenerate_clips_still_have_a_duration() {
        let mut scene = bare_scene(&[("hold", 5, 5)]);
        scene.play("hold").unwrap();
        let active = scene.players[0].active.as_ref().unwrap();
        assert!((active.duration_s - 1.0 / FRAMES_PER_SECOND).abs() < 1e-9);
    }
}
