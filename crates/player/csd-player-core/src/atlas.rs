#![allow(dead_code)]
//! Sprite sheet descriptors: plist parsing, candidate-path resolution, and
//! rotated-frame placement math.
//!
//! Descriptors are parsed once and cached by path; resolved sprites are
//! cached by `(descriptor path, frame name)`. Both caches are append-only,
//! so a second resolution of the same request returns the same `Arc`.
//!
//! Frame rectangles are normalized to physical sheet extents at parse time:
//! the descriptor stores a rotated sub-image's rect with width/height as laid
//! out in the texture, and [`ResolvedSprite::placement`] derives the logical
//! box and the center shift from it.

use std::sync::Arc;

use hashbrown::HashMap;
use log::warn;
use serde::{Deserialize, Serialize};
use xml::reader::{EventReader, XmlEvent};

use crate::assets::Assets;
use crate::config::PathStrategy;
use crate::document::{FileRef, Vec2};
use crate::error::{LoadError, PlayerError, Result};
use crate::paths;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// One named sub-image of a sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteFrame {
    /// Physical placement in the sheet; extents are post-rotation.
    pub rect: Rect,
    /// Trim rect in the logical (untrimmed, unrotated) footprint.
    pub color_rect: Rect,
    /// Untrimmed logical size.
    pub source_size: Vec2,
    pub rotated: bool,
}

/// Parsed sheet descriptor.
#[derive(Debug, Clone)]
pub struct AtlasDescriptor {
    /// Texture path, resolved next to the descriptor.
    pub texture: String,
    /// Sheet canvas size from the metadata block; zero when absent.
    pub canvas: Vec2,
    frames: HashMap<String, SpriteFrame>,
}

impl AtlasDescriptor {
    pub fn parse(text: &str, path: &str) -> Result<AtlasDescriptor> {
        let root = parse_xml_tree(text, path)?;
        let top = root
            .children
            .iter()
            .find(|c| c.name == "dict")
            .ok_or_else(|| PlayerError::parse(path, "descriptor has no top-level dict"))?;

        let mut frames = HashMap::new();
        let mut texture_name = String::new();
        let mut canvas = Vec2::ZERO;
        for (key, value) in dict_pairs(top) {
            match key {
                "frames" if value.name == "dict" => {
                    for (frame_name, entry) in dict_pairs(value) {
                        if entry.name != "dict" {
                            continue;
                        }
                        match parse_frame(entry) {
                            Some(frame) => {
                                frames.insert(frame_name.to_string(), frame);
                            }
                            None => warn!("descriptor {path}: frame '{frame_name}' has no rect"),
                        }
                    }
                }
                "metadata" if value.name == "dict" => {
                    for (meta_key, meta_value) in dict_pairs(value) {
                        match meta_key {
                            "textureFileName" => {
                                texture_name = meta_value.text.trim().to_string();
                            }
                            "size" => canvas = parse_size(&meta_value.text),
                            _ => {}
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(AtlasDescriptor {
            texture: texture_path_for(path, &texture_name),
            canvas,
            frames,
        })
    }

    #[inline]
    pub fn frame(&self, name: &str) -> Option<&SpriteFrame> {
        self.frames.get(name)
    }

    pub fn frame_names(&self) -> impl Iterator<Item = &str> {
        self.frames.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// A sub-image resolved against a loaded descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSprite {
    pub texture: String,
    pub canvas: Vec2,
    pub frame: SpriteFrame,
}

impl ResolvedSprite {
    /// Draw parameters for the stage: where to crop the sheet, where the
    /// cropped rect sits inside the node's logical footprint, and the fixed
    /// -90 degree correction for rotated frames (about the image's center).
    pub fn placement(&self) -> SpritePlacement {
        let physical = Vec2::new(self.frame.rect.w, self.frame.rect.h);
        let logical = if self.frame.rotated {
            Vec2::new(physical.y, physical.x)
        } else {
            physical
        };
        let mut offset = Vec2::new(self.frame.color_rect.x, self.frame.color_rect.y);
        if self.frame.rotated {
            offset.x += (logical.x - physical.x) / 2.0;
            offset.y += (logical.y - physical.y) / 2.0;
        }
        SpritePlacement {
            texture: self.texture.clone(),
            canvas: self.canvas,
            sheet_pos: Vec2::new(self.frame.rect.x, self.frame.rect.y),
            physical,
            logical,
            offset,
            rotation_deg: if self.frame.rotated { -90.0 } else { 0.0 },
        }
    }

    /// The untrimmed footprint the owning node should size itself to.
    #[inline]
    pub fn footprint(&self) -> Vec2 {
        self.frame.source_size
    }
}

/// Everything the stage needs to draw one atlas-backed sprite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpritePlacement {
    pub texture: String,
    pub canvas: Vec2,
    /// Top-left of the physical rect in the sheet.
    pub sheet_pos: Vec2,
    /// Extents of the crop as laid out in the sheet.
    pub physical: Vec2,
    /// Extents after undoing the sheet rotation.
    pub logical: Vec2,
    /// Placement of the crop inside the node footprint, trim and center
    /// shift combined.
    pub offset: Vec2,
    pub rotation_deg: f32,
}

/// Append-only descriptor and sprite caches.
#[derive(Debug, Default)]
pub struct AtlasCache {
    descriptors: HashMap<String, Arc<AtlasDescriptor>>,
    sprites: HashMap<(String, String), Arc<ResolvedSprite>>,
}

impl AtlasCache {
    pub fn new() -> AtlasCache {
        AtlasCache::default()
    }

    /// Load and cache the descriptor at `path`.
    pub fn descriptor(
        &mut self,
        assets: &mut dyn Assets,
        path: &str,
    ) -> Result<Arc<AtlasDescriptor>> {
        if let Some(hit) = self.descriptors.get(path) {
            return Ok(hit.clone());
        }
        let text = assets.fetch_text(path)?;
        let descriptor = Arc::new(AtlasDescriptor::parse(&text, path)?);
        self.descriptors
            .insert(path.to_string(), descriptor.clone());
        Ok(descriptor)
    }

    /// Resolve an atlas sub-image reference, trying each candidate descriptor
    /// location in order and skipping descriptors that load but do not carry
    /// the requested frame.
    pub fn resolve(
        &mut self,
        assets: &mut dyn Assets,
        file: &FileRef,
        base_path: &str,
        strategy: &PathStrategy,
    ) -> Result<Arc<ResolvedSprite>> {
        let frame_name = file.path.as_str();
        let mut last_err: Option<PlayerError> = None;
        let mut missing_in: Option<String> = None;
        for candidate in paths::atlas_candidates(base_path, &file.plist, strategy) {
            let key = (candidate.clone(), frame_name.to_string());
            if let Some(hit) = self.sprites.get(&key) {
                return Ok(hit.clone());
            }
            let descriptor = match self.descriptor(assets, &candidate) {
                Ok(d) => d,
                Err(err) => {
                    last_err = Some(err);
                    continue;
                }
            };
            let Some(frame) = descriptor.frame(frame_name) else {
                missing_in = Some(candidate);
                continue;
            };
            let resolved = Arc::new(ResolvedSprite {
                texture: descriptor.texture.clone(),
                canvas: descriptor.canvas,
                frame: frame.clone(),
            });
            self.sprites.insert(key, resolved.clone());
            return Ok(resolved);
        }
        match missing_in {
            Some(atlas) => Err(PlayerError::FrameNotFound {
                frame: frame_name.to_string(),
                atlas,
            }),
            None => Err(last_err
                .unwrap_or_else(|| LoadError::new(&file.plist, "no descriptor candidates").into())),
        }
    }
}

struct XmlTreeNode {
    name: String,
    text: String,
    children: Vec<XmlTreeNode>,
}

fn parse_xml_tree(text: &str, path: &str) -> Result<XmlTreeNode> {
    let parser = EventReader::from_str(text);
    let mut stack: Vec<XmlTreeNode> = Vec::new();
    let mut root: Option<XmlTreeNode> = None;
    for event in parser {
        match event {
            Ok(XmlEvent::StartElement { name, .. }) => {
                stack.push(XmlTreeNode {
                    name: name.local_name,
                    text: String::new(),
                    children: Vec::new(),
                });
            }
            Ok(XmlEvent::EndElement { .. }) => {
                if let Some(done) = stack.pop() {
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(done),
                        None => root = Some(done),
                    }
                }
            }
            Ok(XmlEvent::Characters(chunk)) | Ok(XmlEvent::CData(chunk)) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&chunk);
                }
            }
            Err(e) => {
                return Err(PlayerError::parse(path, format!("descriptor XML: {e}")));
            }
            _ => {}
        }
    }
    root.ok_or_else(|| PlayerError::parse(path, "empty descriptor"))
}

/// Walk a plist `<dict>`: `<key>` elements pair with the following value
/// element.
fn dict_pairs(dict: &XmlTreeNode) -> Vec<(&str, &XmlTreeNode)> {
    let mut pairs = Vec::new();
    let mut pending: Option<&str> = None;
    for child in &dict.children {
        if child.name == "key" {
            pending = Some(child.text.trim());
        } else if let Some(key) = pending.take() {
            pairs.push((key, child));
        }
    }
    pairs
}

fn parse_frame(dict: &XmlTreeNode) -> Option<SpriteFrame> {
    let mut frame_text: Option<&str> = None;
    let mut color_text: Option<&str> = None;
    let mut source_text: Option<&str> = None;
    let mut rotated = false;
    for (key, value) in dict_pairs(dict) {
        match key {
            "frame" => frame_text = Some(&value.text),
            "sourceColorRect" => color_text = Some(&value.text),
            "sourceSize" => source_text = Some(&value.text),
            "rotated" => rotated = value.name == "true",
            _ => {}
        }
    }
    let raw = parse_rect(frame_text?);
    // Normalize extents to the physical sheet layout.
    let rect = if rotated {
        Rect {
            x: raw.x,
            y: raw.y,
            w: raw.h,
            h: raw.w,
        }
    } else {
        raw
    };
    let color_rect = match color_text {
        Some(text) => parse_rect(text),
        None => Rect {
            x: 0.0,
            y: 0.0,
            w: raw.w,
            h: raw.h,
        },
    };
    let source_size = match source_text {
        Some(text) => parse_size(text),
        None => Vec2::new(raw.w, raw.h),
    };
    Some(SpriteFrame {
        rect,
        color_rect,
        source_size,
        rotated,
    })
}

/// Pull the numbers out of plist tuple strings like `{{2,2},{64,32}}`.
fn parse_tuple(text: &str) -> Vec<f32> {
    let mut nums = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        if ch.is_ascii_digit() || ch == '.' || (ch == '-' && current.is_empty()) {
            current.push(ch);
        } else if !current.is_empty() {
            if let Ok(v) = current.parse::<f32>() {
                nums.push(v);
            }
            current.clear();
        }
    }
    if let Ok(v) = current.parse::<f32>() {
        nums.push(v);
    }
    nums
}

fn parse_rect(text: &str) -> Rect {
    let nums = parse_tuple(text);
    Rect {
        x: nums.first().copied().unwrap_or(0.0),
        y: nums.get(1).copied().unwrap_or(0.0),
        w: nums.get(2).copied().unwrap_or(0.0),
        h: nums.get(3).copied().unwrap_or(0.0),
    }
}

fn parse_size(text: &str) -> Vec2 {
    let nums = parse_tuple(text);
    Vec2::new(
        nums.first().copied().unwrap_or(0.0),
        nums.get(1).copied().unwrap_or(0.0),
    )
}

fn texture_path_for(descriptor_path: &str, texture_name: &str) -> String {
    let name = if texture_name.is_empty() {
        let base = paths::basename(descriptor_path);
        match base.strip_suffix(".plist") {
            Some(stem) => format!("{stem}.png"),
            None => base.to_string(),
        }
    } else {
        texture_name.to_string()
    };
    format!("{}{name}", paths::dir_of(descriptor_path))
}
