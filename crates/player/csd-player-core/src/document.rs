#![allow(dead_code)]
//! Serde model of the Cocos Studio JSON scene export.
//!
//! The export is permissive: almost every field can be absent, and absent
//! fields have per-field defaults that differ from a present-but-partial
//! object (notably `AnchorPoint`, where a missing object means the centered
//! `(0.5, 0.5)` anchor but a present object defaults each missing component
//! to `0`). The structs here keep `Option`s wherever that distinction is
//! observable and leave defaulting to the consumers.
//!
//! Dynamic `ctype` strings are mapped to closed enums ([`NodeKind`],
//! [`FileKind`]); unrecognized tags are logged and mapped to a safe variant
//! instead of silently flowing through.

use log::warn;
use serde::{Deserialize, Serialize};

/// Outer wrapper of every export: `{ "Content": { "Content": {...} } }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportDocument {
    #[serde(rename = "Content")]
    pub content: Option<ContentEnvelope>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentEnvelope {
    #[serde(rename = "Content")]
    pub content: Option<ContentData>,
}

impl ExportDocument {
    /// Unwrap the doubly-nested content block.
    pub fn into_content(self) -> Option<ContentData> {
        self.content.and_then(|c| c.content)
    }
}

/// The payload of an export: node tree, animation document, clip list.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentData {
    #[serde(rename = "ObjectData")]
    pub object_data: Option<SceneNodeData>,
    #[serde(rename = "Animation")]
    pub animation: Option<AnimationData>,
    /// Some exports list clips here, some under `Animation.AnimationList`.
    #[serde(rename = "AnimationList")]
    pub animation_list: Option<Vec<ClipDef>>,
    #[serde(rename = "CoordinateType")]
    pub coordinate_type: Option<String>,
}

impl ContentData {
    /// Clip list, preferring the outer placement over the one nested in the
    /// animation block.
    pub fn clip_list(&self) -> &[ClipDef] {
        if let Some(list) = &self.animation_list {
            return list;
        }
        self.animation
            .as_ref()
            .and_then(|a| a.animation_list.as_deref())
            .unwrap_or(&[])
    }
}

/// One node of the scene tree.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SceneNodeData {
    pub ctype: String,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "ActionTag")]
    pub action_tag: Option<i64>,
    #[serde(rename = "Size")]
    pub size: Option<VecPair>,
    #[serde(rename = "Position")]
    pub position: Option<VecPair>,
    #[serde(rename = "Scale")]
    pub scale: Option<ScalePair>,
    #[serde(rename = "RotationSkewX")]
    pub rotation_skew_x: Option<f32>,
    #[serde(rename = "RotationSkewY")]
    pub rotation_skew_y: Option<f32>,
    #[serde(rename = "AnchorPoint")]
    pub anchor_point: Option<AnchorPair>,
    #[serde(rename = "Alpha")]
    pub alpha: Option<f32>,
    #[serde(rename = "VisibleForFrame")]
    pub visible_for_frame: Option<bool>,
    #[serde(rename = "FileData")]
    pub file_data: Option<FileRef>,
    #[serde(rename = "BlendFunc")]
    pub blend_func: Option<BlendFactors>,
    #[serde(rename = "CColor")]
    pub ccolor: Option<ColorData>,
    #[serde(rename = "LabelText")]
    pub label_text: Option<String>,
    #[serde(rename = "FontSize")]
    pub font_size: Option<f32>,
    #[serde(rename = "FontStyle")]
    pub font_style: Option<FontWeight>,
    #[serde(rename = "FontResource")]
    pub font_resource: Option<FontResource>,
    #[serde(rename = "Children")]
    pub children: Vec<SceneNodeData>,
}

impl SceneNodeData {
    #[inline]
    pub fn kind(&self) -> NodeKind {
        NodeKind::from_ctype(&self.ctype)
    }
}

/// Closed set of node kinds derived from the export's `ctype` tag.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Container,
    Sprite,
    Text,
    /// A node embedding another whole exported document.
    Project,
}

impl NodeKind {
    pub fn from_ctype(ctype: &str) -> NodeKind {
        match ctype {
            "SpriteObjectData" => NodeKind::Sprite,
            "TextObjectData" => NodeKind::Text,
            "ProjectNodeObjectData" => NodeKind::Project,
            "" | "GameNodeObjectData" | "SingleNodeObjectData" | "PanelObjectData"
            | "GameLayerObjectData" => NodeKind::Container,
            other => {
                warn!("unrecognized node ctype '{other}', treating as container");
                NodeKind::Container
            }
        }
    }
}

/// `{X, Y}` pair used for sizes, positions, and easing control points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct VecPair {
    #[serde(rename = "X")]
    pub x: f32,
    #[serde(rename = "Y")]
    pub y: f32,
}

/// Scale block; missing components default to 1 at the point of use.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct ScalePair {
    #[serde(rename = "X")]
    pub x: Option<f32>,
    #[serde(rename = "Y")]
    pub y: Option<f32>,
}

/// Anchor block; a present object defaults missing components to 0, while a
/// missing object entirely means the centered anchor. See
/// [`crate::node::RenderState`].
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct AnchorPair {
    #[serde(rename = "ScaleX")]
    pub x: f32,
    #[serde(rename = "ScaleY")]
    pub y: f32,
}

/// Document-side color block with per-component white defaults.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ColorData {
    #[serde(rename = "R")]
    pub r: u8,
    #[serde(rename = "G")]
    pub g: u8,
    #[serde(rename = "B")]
    pub b: u8,
}

impl Default for ColorData {
    fn default() -> Self {
        Self {
            r: 255,
            g: 255,
            b: 255,
        }
    }
}

/// Runtime tint color. Exact integer triples key the tint registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub fn is_white(self) -> bool {
        self == Self::WHITE
    }

    /// Parse `"#RRGGBB"` or `"RRGGBB"`.
    pub fn from_hex(hex: &str) -> Option<Rgb> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Rgb { r, g, b })
    }
}

impl From<ColorData> for Rgb {
    fn from(c: ColorData) -> Self {
        Rgb {
            r: c.r,
            g: c.g,
            b: c.b,
        }
    }
}

/// Source/destination blend factor pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendFactors {
    #[serde(rename = "Src")]
    pub src: i64,
    #[serde(rename = "Dst")]
    pub dst: i64,
}

impl BlendFactors {
    /// The one factor pair the format uses for additive glow layers.
    #[inline]
    pub fn is_additive(self) -> bool {
        self.src == 770 && (self.dst == 1 || self.dst == 771)
    }
}

/// Texture reference: either a plain image path or an atlas sub-image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRef {
    #[serde(rename = "Type")]
    pub kind: FileKind,
    #[serde(rename = "Path")]
    pub path: String,
    #[serde(rename = "Plist")]
    pub plist: String,
}

impl FileRef {
    #[inline]
    pub fn is_atlas_ref(&self) -> bool {
        self.kind == FileKind::PlistSubImage && !self.plist.is_empty()
    }
}

/// Closed set of texture reference types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileKind {
    /// Standalone image file.
    Normal,
    /// Named sub-image inside a plist-described sprite sheet.
    PlistSubImage,
    /// Anything else; yields no texture.
    #[default]
    #[serde(other)]
    Unknown,
}

/// Font weight appears as both a string and a bare number across exports.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FontWeight {
    Text(String),
    Number(f64),
}

impl FontWeight {
    pub fn as_css(&self) -> String {
        match self {
            FontWeight::Text(s) => s.clone(),
            FontWeight::Number(n) => format!("{n}"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FontResource {
    #[serde(rename = "Path")]
    pub path: Option<String>,
    #[serde(rename = "FontStyle")]
    pub font_style: Option<FontWeight>,
}

/// The animation block: per-tag property timelines plus playback metadata.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnimationData {
    #[serde(rename = "Duration")]
    pub duration: Option<f64>,
    #[serde(rename = "Speed")]
    pub speed: Option<f64>,
    #[serde(rename = "ActivedAnimationName")]
    pub actived_animation_name: Option<String>,
    #[serde(rename = "Timelines")]
    pub timelines: Vec<TimelineData>,
    #[serde(rename = "AnimationList")]
    pub animation_list: Option<Vec<ClipDef>>,
}

/// One (tag, property) keyframe sequence.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TimelineData {
    #[serde(rename = "ActionTag")]
    pub action_tag: i64,
    #[serde(rename = "Property")]
    pub property: String,
    /// Exports disagree on the plural; accept both.
    #[serde(rename = "Frames", alias = "Frame")]
    pub frames: Vec<RawFrame>,
}

/// Named `[startFrame, endFrame]` range over the shared frame timeline.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClipDef {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "StartIndex")]
    pub start_index: i64,
    #[serde(rename = "EndIndex")]
    pub end_index: i64,
}

/// Raw keyframe before ctype dispatch. Every payload field is optional; the
/// conversion in [`crate::timeline`] picks the ones its ctype defines.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawFrame {
    pub ctype: String,
    #[serde(rename = "FrameIndex")]
    pub frame_index: i64,
    #[serde(rename = "EasingData")]
    pub easing_data: Option<EasingData>,
    #[serde(rename = "X")]
    pub x: Option<f32>,
    #[serde(rename = "Y")]
    pub y: Option<f32>,
    /// Scalar for `IntFrameData`, boolean for `BoolFrameData`.
    #[serde(rename = "Value")]
    pub value: Option<serde_json::Value>,
    #[serde(rename = "TextureFile")]
    pub texture_file: Option<FileRef>,
    #[serde(rename = "Color")]
    pub color: Option<ColorData>,
    // Some color frames carry the channels at the top level instead.
    #[serde(rename = "R")]
    pub r: Option<u8>,
    #[serde(rename = "G")]
    pub g: Option<u8>,
    #[serde(rename = "B")]
    pub b: Option<u8>,
    #[serde(rename = "Src")]
    pub src: Option<i64>,
    #[serde(rename = "Dst")]
    pub dst: Option<i64>,
    #[serde(rename = "InnerActionType")]
    pub inner_action_type: Option<String>,
    // The misspelling is the format's own; accept the corrected form too.
    #[serde(rename = "CurrentAniamtionName", alias = "CurrentAnimationName")]
    pub current_animation_name: Option<String>,
    #[serde(rename = "SingleFrameIndex")]
    pub single_frame_index: Option<f64>,
}

/// Raw easing descriptor: a kind integer plus optional bezier control points.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EasingData {
    #[serde(rename = "Type")]
    pub kind: i64,
    #[serde(rename = "Points")]
    pub points: Option<Vec<VecPair>>,
}

/// Plain runtime pair for sizes and placements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<VecPair> for Vec2 {
    fn from(p: VecPair) -> Self {
        Vec2 { x: p.x, y: p.y }
    }
}
