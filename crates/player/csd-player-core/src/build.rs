#![allow(dead_code)]
//! Scene construction.
//!
//! Builds the visual-node arena from a parsed export: one node per document
//! node in depth-first order, one player per document, and an eagerly
//! mounted player for every embedded project reference. Failures below the
//! root (a missing nested document, an unresolvable sheet) are logged and
//! skipped so the rest of the scene still comes up.

use log::{error, warn};

use crate::assets::{load_export, Assets};
use crate::document::{ContentData, FileKind, FileRef, FontWeight, NodeKind, SceneNodeData, Vec2};
use crate::error::{PlayerError, Result};
use crate::ids::{NodeId, PlayerId};
use crate::node::{AppliedVisual, RenderState, VisualNode};
use crate::paths;
use crate::player::{PlayerCore, ScenePlayer};
use crate::stage::{NodeDecl, StageOp, TextDecl, Texture};
use crate::timeline::{ClipTable, InnerActionKind, TimelineIndex};

/// Build one document's player and subtree, then apply its frame 0.
///
/// Returns `None` when the export carries no `ObjectData` or no `Animation`;
/// the root caller treats that as an error, a project node as "no
/// sub-player".
pub(crate) fn instantiate(
    scene: &mut ScenePlayer,
    assets: &mut dyn Assets,
    content: ContentData,
    base_path: &str,
    mount: Option<NodeId>,
) -> Option<PlayerId> {
    let (Some(object), Some(animation)) = (&content.object_data, &content.animation) else {
        return None;
    };
    let clips = ClipTable::new(content.clip_list(), animation.actived_animation_name.as_deref());
    let timelines = TimelineIndex::from_animation(animation);

    let pid = PlayerId(scene.players.len() as u32);
    scene.players.push(PlayerCore {
        id: pid,
        base_path: base_path.to_string(),
        timelines,
        clips,
        nodes: Vec::new(),
        active: None,
        generation: 0,
    });
    build_node(scene, assets, pid, object, mount, base_path);
    scene.apply_player_frame(assets, pid, 0.0);
    Some(pid)
}

fn build_node(
    scene: &mut ScenePlayer,
    assets: &mut dyn Assets,
    player: PlayerId,
    data: &SceneNodeData,
    parent: Option<NodeId>,
    base_path: &str,
) {
    let kind = data.kind();
    let size = data.size.map(Vec2::from).unwrap_or(Vec2::ZERO);
    let base = RenderState::from_node(data);
    let text = (kind == NodeKind::Text).then(|| text_decl(data, &base));
    let name = data.name.clone().filter(|n| !n.is_empty());

    // The document's own texture counts as already applied, so the frame
    // pass only swaps when a texture key brings a different reference.
    let applied = AppliedVisual {
        file: base.file.clone(),
        ..AppliedVisual::default()
    };
    let node_name = name.clone();
    let id = scene.arena.push(|id| VisualNode {
        id,
        parent,
        children: Vec::new(),
        kind,
        name: node_name,
        tag: data.action_tag,
        size,
        z: id.0,
        base,
        sub_player: None,
        manual_action: None,
        last_dispatch: None,
        applied,
    });
    if let Some(p) = parent {
        scene.arena[p].children.push(id);
    }
    scene.players[player.index()].nodes.push(id);
    scene.outputs.push_op(StageOp::CreateNode {
        node: id,
        parent,
        decl: NodeDecl {
            kind,
            name: name.clone(),
            z: id.0,
            size,
            text,
        },
    });
    if let Some(n) = name {
        scene.names.entry(n).or_default().push(id);
    }

    if kind == NodeKind::Project {
        if let Some(file) = &data.file_data {
            if !file.path.is_empty() {
                if let Err(err) = mount_project(scene, assets, id, &file.path, base_path) {
                    error!("embedded project '{}' failed to mount: {err}", file.path);
                }
            }
        }
    } else if let Some(file) = &data.file_data {
        attach_texture(scene, assets, id, file, base_path);
    }

    for child in &data.children {
        build_node(scene, assets, player, child, Some(id), base_path);
    }
}

/// Build-time texture for a node's own file reference. An atlas-backed node
/// is resized to the sub-image's untrimmed footprint; a plain image keeps
/// the document size and stretches.
fn attach_texture(
    scene: &mut ScenePlayer,
    assets: &mut dyn Assets,
    id: NodeId,
    file: &FileRef,
    base_path: &str,
) {
    match file.kind {
        FileKind::PlistSubImage => {
            match scene.atlas.resolve(assets, file, base_path, &scene.config.paths) {
                Ok(sprite) => {
                    let footprint = sprite.footprint();
                    scene.arena[id].size = footprint;
                    scene.arena[id].applied.has_texture = true;
                    scene.outputs.push_op(StageOp::SetSize {
                        node: id,
                        size: footprint,
                    });
                    scene.outputs.push_op(StageOp::SetTexture {
                        node: id,
                        texture: Texture::Sprite {
                            placement: sprite.placement(),
                        },
                    });
                }
                Err(err) => error!("sprite resolve failed for '{}': {err}", file.path),
            }
        }
        FileKind::Normal if !file.path.is_empty() => {
            let path = paths::texture_path(base_path, &file.path, &scene.config.paths);
            scene.arena[id].applied.has_texture = true;
            scene.outputs.push_op(StageOp::SetTexture {
                node: id,
                texture: Texture::Image { path },
            });
        }
        _ => {}
    }
}

/// Load and mount the document referenced by a project node under it. The
/// mounted player shares the scene's name index, inherits the host's name
/// and action tag on its root (so the host's timelines drive it), and
/// autoplays its default clip in a loop.
fn mount_project(
    scene: &mut ScenePlayer,
    assets: &mut dyn Assets,
    host: NodeId,
    reference: &str,
    base_path: &str,
) -> Result<()> {
    let nested_path = paths::resolve_relative(reference, base_path);
    let nested_base = paths::dir_of(&nested_path).to_string();
    let doc = load_export(assets, &nested_path)?;
    let Some(mut content) = doc.into_content() else {
        return Err(PlayerError::parse(&nested_path, "export has no content block"));
    };
    if let Some(object) = content.object_data.as_mut() {
        let hosting = &scene.arena[host];
        if hosting.name.is_some() {
            object.name = hosting.name.clone();
        }
        object.action_tag = hosting.tag.or(object.action_tag);
    }
    let Some(sub) = instantiate(scene, assets, content, &nested_base, Some(host)) else {
        return Ok(());
    };
    scene.arena[host].sub_player = Some(sub);
    if scene.players[sub.index()].clips.default_clip().is_some() {
        if let Err(err) = scene.play_for(assets, sub, None, InnerActionKind::Loop, None) {
            warn!("autoplay for '{nested_path}' failed: {err}");
        }
    }
    Ok(())
}

fn text_decl(data: &SceneNodeData, base: &RenderState) -> TextDecl {
    let weight = data
        .font_resource
        .as_ref()
        .and_then(|r| r.font_style.as_ref())
        .or(data.font_style.as_ref())
        .map(FontWeight::as_css)
        .unwrap_or_else(|| "300".to_string());
    let family = data
        .font_resource
        .as_ref()
        .and_then(|r| r.path.as_deref())
        .filter(|p| !p.is_empty())
        .map(font_stem)
        .filter(|s| !s.is_empty());
    TextDecl {
        content: data.label_text.clone().unwrap_or_default(),
        font_size: data.font_size.unwrap_or(24.0),
        color: base.color,
        weight,
        family,
    }
}

/// Font family from a resource path: basename with the extension stripped.
fn font_stem(path: &str) -> String {
    let name = paths::basename(path);
    match name.rfind('.') {
        Some(idx) => name[..idx].to_string(),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    use hashbrown::HashMap;

    use crate::atlas::AtlasCache;
    use crate::config::PlayerConfig;
    use crate::error::LoadError;
    use crate::node::NodeArena;
    use crate::pose::TintRegistry;
    use crate::stage::TickOutputs;

    struct NoAssets;

    impl Assets for NoAssets {
        fn fetch_text(&mut self, path: &str) -> core::result::Result<String, LoadError> {
            Err(LoadError::new(path, "unavailable"))
        }
    }

    fn empty_scene() -> ScenePlayer {
        ScenePlayer {
            config: PlayerConfig::default(),
            y_up: true,
            design_size: Vec2::ZERO,
            arena: NodeArena::new(),
            names: HashMap::new(),
            players: Vec::new(),
            atlas: AtlasCache::new(),
            tints: TintRegistry::new(),
            outputs: TickOutputs::new(),
            dispatches: VecDeque::new(),
        }
    }

    fn content(json: &str) -> ContentData {
        serde_json::from_str(json).unwrap()
    }

    /// it should strip only the extension from font resource paths
    #[test]
    fn font_stem_keeps_inner_dots() {
        assert_eq!(font_stem("fonts/ChakraPetch-Bold.ttf"), "ChakraPetch-Bold");
        assert_eq!(font_stem("arial.bold.ttf"), "arial.bold");
        assert_eq!(font_stem("bare"), "bare");
    }

    /// it should refuse documents missing object data or animation
    #[test]
    fn incomplete_documents_build_nothing() {
        let mut scene = empty_scene();
        let got = instantiate(
            &mut scene,
            &mut NoAssets,
            content(r#"{"ObjectData": {"ctype": "GameNodeObjectData"}}"#),
            "res/",
            None,
        );
        assert!(got.is_none());
        assert!(scene.players.is_empty());
        assert!(scene.arena.is_empty());
    }

    /// it should build nodes in depth-first order with the arena index as z
    #[test]
    fn build_registers_nodes_and_emits_creates() {
        let mut scene = empty_scene();
        let pid = instantiate(
            &mut scene,
            &mut NoAssets,
            content(
                r#"{
                    "ObjectData": {"ctype": "GameNodeObjectData", "Name": "root", "Children": [
                        {"ctype": "SpriteObjectData", "Name": "glow", "ActionTag": 7,
                         "Size": {"X": 10.0, "Y": 10.0}},
                        {"ctype": "TextObjectData", "Name": "label",
                         "LabelText": "SCORE", "FontSize": 18.0}
                    ]},
                    "Animation": {"Timelines": []},
                    "AnimationList": [{"Name": "idle", "StartIndex": 0, "EndIndex": 10}]
                }"#,
            ),
            "res/",
            None,
        )
        .unwrap();

        assert_eq!(pid, PlayerId::ROOT);
        assert_eq!(scene.arena.len(), 3);
        assert_eq!(scene.players[0].nodes.len(), 3);
        assert_eq!(scene.node("glow"), Some(NodeId(1)));

        let creates: Vec<(NodeId, Option<NodeId>, NodeDecl)> = scene
            .outputs
            .ops
            .iter()
            .filter_map(|op| match op {
                StageOp::CreateNode { node, parent, decl } => {
                    Some((*node, *parent, decl.clone()))
                }
                _ => None,
            })
            .collect();
        assert_eq!(creates.len(), 3);
        assert_eq!(creates[0].1, None);
        assert_eq!(creates[1].1, Some(creates[0].0));
        assert_eq!(creates[2].1, Some(creates[0].0));
        let z_order: Vec<u32> = creates.iter().map(|(_, _, d)| d.z).collect();
        assert_eq!(z_order, vec![0, 1, 2]);

        // Frame 0 is applied to every node right after the build.
        let transforms = scene
            .outputs
            .ops
            .iter()
            .filter(|op| matches!(op, StageOp::SetTransform { .. }))
            .count();
        assert_eq!(transforms, 3);

        let text = creates[2].2.text.as_ref().unwrap();
        assert_eq!(text.content, "SCORE");
        assert_eq!(text.font_size, 18.0);
        assert_eq!(text.weight, "300");
        assert!(text.family.is_none());
        assert!(creates[1].2.text.is_none());
    }

    /// it should keep building when a node's sheet cannot be resolved
    #[test]
    fn unresolvable_sheets_are_not_fatal() {
        let mut scene = empty_scene();
        instantiate(
            &mut scene,
            &mut NoAssets,
            content(
                r#"{
                    "ObjectData": {"ctype": "GameNodeObjectData", "Children": [
                        {"ctype": "SpriteObjectData", "Name": "broken",
                         "FileData": {"Type": "PlistSubImage", "Path": "a.png", "Plist": "a.plist"}},
                        {"ctype": "SpriteObjectData", "Name": "flat",
                         "FileData": {"Type": "Normal", "Path": "ok.png"}}
                    ]},
                    "Animation": {"Timelines": []}
                }"#,
            ),
            "res/",
            None,
        )
        .unwrap();

        assert_eq!(scene.arena.len(), 3);
        let broken = scene.node("broken").unwrap();
        assert!(!scene.visual(broken).unwrap().applied.has_texture);
        let textures: Vec<&Texture> = scene
            .outputs
            .ops
            .iter()
            .filter_map(|op| match op {
                StageOp::SetTexture { texture, .. } => Some(texture),
                _ => None,
            })
            .collect();
        assert_eq!(textures, vec![&Texture::Image { path: "res/ok.png".into() }]);
    }
}
