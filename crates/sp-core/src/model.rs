//! Core data model for store floor plans.
//!
//! A plan is an ordered list of [`SpatialElement`]s authored in plan space
//! (pixel-equivalent units, top-left origin). Order is z-order. Everything
//! the 2D and 3D layers draw is derived from these records; neither layer
//! keeps its own copy of element coordinates.

use crate::geometry::{Bounds, normalize_degrees};
use crate::id::ElementId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0], serialized as hex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

fn hex_pair(hi: u8, lo: u8) -> Option<f32> {
    Some((hex_val(hi)? << 4 | hex_val(lo)?) as f32 / 255.0)
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from a packed `0xRRGGBB` literal.
    pub const fn from_rgb24(rgb: u32) -> Self {
        Self::rgba(
            ((rgb >> 16) & 0xFF) as f32 / 255.0,
            ((rgb >> 8) & 0xFF) as f32 / 255.0,
            (rgb & 0xFF) as f32 / 255.0,
            1.0,
        )
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA`; the `#` is optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();
        match bytes.len() {
            3 => {
                let expand = |c: u8| Some((hex_val(c)? * 17) as f32 / 255.0);
                Some(Self::rgba(
                    expand(bytes[0])?,
                    expand(bytes[1])?,
                    expand(bytes[2])?,
                    1.0,
                ))
            }
            6 | 8 => {
                let a = if bytes.len() == 8 {
                    hex_pair(bytes[6], bytes[7])?
                } else {
                    1.0
                };
                Some(Self::rgba(
                    hex_pair(bytes[0], bytes[1])?,
                    hex_pair(bytes[2], bytes[3])?,
                    hex_pair(bytes[4], bytes[5])?,
                    a,
                ))
            }
            _ => None,
        }
    }

    /// `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }

    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Lighten (positive) or darken (negative) each channel by `amount` / 255.
    pub fn shade(self, amount: i16) -> Self {
        let step = amount as f32 / 255.0;
        Self {
            r: (self.r + step).clamp(0.0, 1.0),
            g: (self.g + step).clamp(0.0, 1.0),
            b: (self.b + step).clamp(0.0, 1.0),
            a: self.a,
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color `{s}`")))
    }
}

// ─── Element types ───────────────────────────────────────────────────────

/// The closed set of things that can be placed on a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    Wall,
    Door,
    Window,
    Shelf,
    Rack,
    Display,
    Table,
    Fridge,
    DairyFridge,
    Planogram,
    Gondola,
    Line,
    Rectangle,
    Circle,
    Chair,
    Sofa,
    Bed,
    Plant,
    Counter,
    Cashier,
    Mannequin,
    Cube,
}

impl ElementType {
    pub const ALL: [ElementType; 22] = [
        Self::Wall,
        Self::Door,
        Self::Window,
        Self::Shelf,
        Self::Rack,
        Self::Display,
        Self::Table,
        Self::Fridge,
        Self::DairyFridge,
        Self::Planogram,
        Self::Gondola,
        Self::Line,
        Self::Rectangle,
        Self::Circle,
        Self::Chair,
        Self::Sofa,
        Self::Bed,
        Self::Plant,
        Self::Counter,
        Self::Cashier,
        Self::Mannequin,
        Self::Cube,
    ];

    /// Stable snake_case key, identical to the serialized form.
    pub fn key(self) -> &'static str {
        match self {
            Self::Wall => "wall",
            Self::Door => "door",
            Self::Window => "window",
            Self::Shelf => "shelf",
            Self::Rack => "rack",
            Self::Display => "display",
            Self::Table => "table",
            Self::Fridge => "fridge",
            Self::DairyFridge => "dairy_fridge",
            Self::Planogram => "planogram",
            Self::Gondola => "gondola",
            Self::Line => "line",
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
            Self::Chair => "chair",
            Self::Sofa => "sofa",
            Self::Bed => "bed",
            Self::Plant => "plant",
            Self::Counter => "counter",
            Self::Cashier => "cashier",
            Self::Mannequin => "mannequin",
            Self::Cube => "cube",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.key() == key)
    }

    /// Doors and windows must be validated against walls before commit.
    pub fn is_constrained(self) -> bool {
        matches!(self, Self::Door | Self::Window)
    }
}

// ─── Spatial elements ────────────────────────────────────────────────────

/// One placed object on the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpatialElement {
    #[serde(default = "ElementId::generate")]
    pub id: ElementId,
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Vertical extent off the floor; only the 3D view reads it.
    #[serde(default)]
    pub depth: f32,
    /// Degrees about the element's own center.
    #[serde(default)]
    pub rotation: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Weak back-reference to the wall a window is cut into.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_wall_id: Option<ElementId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_top_distance: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_bottom_distance: Option<f32>,
}

impl SpatialElement {
    /// A fresh element with a generated id and no type-specific extras.
    pub fn new(element_type: ElementType, bounds: Bounds, depth: f32) -> Self {
        Self {
            id: ElementId::generate(),
            element_type,
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            depth,
            rotation: 0.0,
            name: None,
            parent_wall_id: None,
            window_top_distance: None,
            window_bottom_distance: None,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }

    pub fn center(&self) -> (f32, f32) {
        self.bounds().center()
    }

    /// Apply a patch, returning which fields actually changed.
    pub fn apply(&mut self, patch: &ElementPatch) -> ChangeSet {
        let mut changes = ChangeSet::default();

        fn set(slot: &mut f32, value: Option<f32>) -> bool {
            match value {
                Some(v) if *slot != v => {
                    *slot = v;
                    true
                }
                _ => false,
            }
        }

        let moved_x = set(&mut self.x, patch.x);
        let moved_y = set(&mut self.y, patch.y);
        if moved_x || moved_y {
            changes.insert(ElementField::Position);
        }
        let resized_w = set(&mut self.width, patch.width);
        let resized_h = set(&mut self.height, patch.height);
        if resized_w || resized_h {
            changes.insert(ElementField::Size);
        }
        if set(&mut self.depth, patch.depth) {
            changes.insert(ElementField::Depth);
        }
        if let Some(rotation) = patch.rotation.map(normalize_degrees)
            && set(&mut self.rotation, Some(rotation))
        {
            changes.insert(ElementField::Rotation);
        }
        if let Some(name) = &patch.name
            && self.name.as_ref() != Some(name)
        {
            self.name = Some(name.clone());
            changes.insert(ElementField::Name);
        }
        if let Some(parent) = patch.parent_wall_id
            && self.parent_wall_id != parent
        {
            self.parent_wall_id = parent;
            changes.insert(ElementField::WindowAttachment);
        }
        let mut set_opt = |slot: &mut Option<f32>, value: Option<f32>| {
            if let Some(v) = value
                && *slot != Some(v)
            {
                *slot = Some(v);
                changes.insert(ElementField::WindowAttachment);
            }
        };
        set_opt(&mut self.window_top_distance, patch.window_top_distance);
        set_opt(&mut self.window_bottom_distance, patch.window_bottom_distance);

        changes
    }
}

/// Partial update for [`SpatialElement`]; `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub depth: Option<f32>,
    pub rotation: Option<f32>,
    pub name: Option<String>,
    /// `Some(None)` detaches a window from its wall.
    pub parent_wall_id: Option<Option<ElementId>>,
    pub window_top_distance: Option<f32>,
    pub window_bottom_distance: Option<f32>,
}

impl ElementPatch {
    pub fn position(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn bounds(bounds: Bounds) -> Self {
        Self {
            x: Some(bounds.x),
            y: Some(bounds.y),
            width: Some(bounds.width),
            height: Some(bounds.height),
            ..Self::default()
        }
    }

    pub fn rotation(degrees: f32) -> Self {
        Self {
            rotation: Some(degrees),
            ..Self::default()
        }
    }
}

/// Groups of fields that downstream layers react to differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementField {
    Position,
    Size,
    Depth,
    Rotation,
    Name,
    WindowAttachment,
}

/// The set of field groups touched by one update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet(SmallVec<[ElementField; 4]>);

impl ChangeSet {
    pub fn insert(&mut self, field: ElementField) {
        if !self.0.contains(&field) {
            self.0.push(field);
        }
    }

    pub fn contains(&self, field: ElementField) -> bool {
        self.0.contains(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ElementField> + '_ {
        self.0.iter().copied()
    }

    /// True when the derived 3D geometry must be rebuilt, not just moved.
    pub fn needs_resynthesis(&self) -> bool {
        self.contains(ElementField::Size)
            || self.contains(ElementField::Depth)
            || self.contains(ElementField::WindowAttachment)
    }
}

impl FromIterator<ElementField> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = ElementField>>(iter: I) -> Self {
        let mut set = ChangeSet::default();
        for field in iter {
            set.insert(field);
        }
        set
    }
}

// ─── Ghost preview ───────────────────────────────────────────────────────

/// Non-committed placement preview shown while a tool is armed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GhostElement {
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub rotation: f32,
    /// Whether committing here would pass the placement rules.
    pub valid: bool,
}

impl GhostElement {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }
}

// ─── Persisted plan ──────────────────────────────────────────────────────

/// A saved floor plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorPlan {
    pub id: String,
    pub name: String,
    pub elements: Vec<SpatialElement>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FloorPlan {
    /// A plan stamped with `now` for both timestamps.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        elements: Vec<SpatialElement>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            elements,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn wall() -> SpatialElement {
        let mut el = SpatialElement::new(
            ElementType::Wall,
            Bounds::new(0.0, 0.0, 200.0, 10.0),
            100.0,
        );
        el.id = ElementId::intern("wall-a");
        el
    }

    #[test]
    fn color_hex_parse_and_emit() {
        let c = Color::from_hex("#8B4513").unwrap();
        assert_eq!(c.to_hex(), "#8B4513");
        assert_eq!(Color::from_hex("fff").unwrap(), Color::WHITE);
        assert!(Color::from_hex("#12345").is_none());
        let translucent = Color::from_hex("#00000080").unwrap();
        assert_eq!(translucent.to_hex(), "#00000080");
        assert_eq!(Color::from_rgb24(0x8B4513), c);
    }

    #[test]
    fn shade_clamps_channels() {
        let c = Color::from_hex("#F0F0F0").unwrap().shade(40);
        assert_eq!(c.to_hex(), "#FFFFFF");
    }

    #[test]
    fn element_type_keys_match_serde() {
        for ty in ElementType::ALL {
            let json = serde_json::to_string(&ty).unwrap();
            assert_eq!(json, format!("\"{}\"", ty.key()));
            assert_eq!(ElementType::from_key(ty.key()), Some(ty));
        }
    }

    #[test]
    fn element_json_uses_camel_case() {
        let mut window = wall();
        window.element_type = ElementType::Window;
        window.parent_wall_id = Some(ElementId::intern("wall-a"));
        window.window_top_distance = Some(20.0);
        let json = serde_json::to_value(&window).unwrap();
        assert_eq!(json["type"], "window");
        assert_eq!(json["parentWallId"], "wall-a");
        assert_eq!(json["windowTopDistance"], 20.0);
        assert!(json.get("name").is_none());
    }

    #[test]
    fn element_without_id_gets_generated_one() {
        let el: SpatialElement = serde_json::from_str(
            r#"{"type":"shelf","x":10,"y":20,"width":120,"height":40,"depth":60}"#,
        )
        .unwrap();
        assert!(el.id.as_str().starts_with("element-"));
        assert_eq!(el.rotation, 0.0);
    }

    #[test]
    fn apply_reports_changed_groups() {
        let mut el = wall();
        let changes = el.apply(&ElementPatch::position(40.0, 0.0));
        assert!(changes.contains(ElementField::Position));
        assert!(!changes.needs_resynthesis());

        let changes = el.apply(&ElementPatch {
            width: Some(300.0),
            ..ElementPatch::default()
        });
        assert!(changes.needs_resynthesis());
        assert_eq!(el.width, 300.0);
    }

    #[test]
    fn apply_is_empty_when_nothing_differs() {
        let mut el = wall();
        let changes = el.apply(&ElementPatch::bounds(el.bounds()));
        assert!(changes.is_empty());
    }

    #[test]
    fn apply_normalizes_rotation() {
        let mut el = wall();
        el.apply(&ElementPatch::rotation(-45.0));
        assert_eq!(el.rotation, 315.0);
    }
}
