//! Collaborators consumed by the packer and an in-memory sheet document implementing them.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::config::Constraints;
use crate::error::{Result, SheetPackerError};
use crate::model::{Layout, Meta, Placement, Position, Rect};
use crate::packer::GrowthPolicy;

/// A sprite as seen by the packer: a size to read and a position to write back.
pub trait Sprite {
    /// Sprite size. A source that is not ready must fail rather than report `(0, 0)`.
    fn size(&self) -> Result<(u32, u32)>;
    fn position(&self) -> Position;
    fn set_position(&mut self, position: Position);
}

/// The sheet being packed.
pub trait SpriteSheet {
    type Sprite: Sprite;

    fn constraints(&self) -> &Constraints;
    /// Sprites to pack, in document order. Container nodes are not included.
    fn sprites_mut(&mut self) -> Vec<&mut Self::Sprite>;
    /// Commits the final sheet size.
    fn set_size(&mut self, width: u32, height: u32);
}

/// A sprite leaf of a `Sheet`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpriteEntry<K = String> {
    pub key: K,
    /// `None` while the image source is not ready.
    pub size: Option<(u32, u32)>,
    #[serde(default)]
    pub position: Position,
}

impl<K> SpriteEntry<K> {
    pub fn new(key: K, w: u32, h: u32) -> Self {
        Self {
            key,
            size: Some((w, h)),
            position: Position::UNPLACED,
        }
    }

    /// A sprite whose image has not been loaded.
    pub fn pending(key: K) -> Self {
        Self {
            key,
            size: None,
            position: Position::UNPLACED,
        }
    }

    /// Placed bounds, or `None` while the sprite sits at the sentinel position.
    pub fn bounds(&self) -> Option<Rect> {
        let (w, h) = self.size?;
        if !self.position.is_placed() {
            return None;
        }
        Some(Rect::new(self.position.x as u32, self.position.y as u32, w, h))
    }
}

impl<K: Display> Sprite for SpriteEntry<K> {
    fn size(&self) -> Result<(u32, u32)> {
        match self.size {
            Some((w, h)) if w > 0 && h > 0 => Ok((w, h)),
            _ => Err(SheetPackerError::SpriteUnavailable {
                key: self.key.to_string(),
            }),
        }
    }
    fn position(&self) -> Position {
        self.position
    }
    fn set_position(&mut self, position: Position) {
        self.position = position;
    }
}

/// Node of the sheet document: a sprite or a named group of nodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum SheetNode<K = String> {
    Sprite(SpriteEntry<K>),
    Group {
        name: String,
        children: Vec<SheetNode<K>>,
    },
}

/// In-memory sprite sheet: constraints, committed size and a tree of sprites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sheet<K = String> {
    pub constraints: Constraints,
    pub width: u32,
    pub height: u32,
    pub nodes: Vec<SheetNode<K>>,
}

impl<K> Sheet<K> {
    pub fn new(constraints: Constraints) -> Self {
        Self {
            constraints,
            width: 0,
            height: 0,
            nodes: Vec::new(),
        }
    }

    pub fn push_sprite(&mut self, key: K, w: u32, h: u32) -> &mut Self {
        self.nodes.push(SheetNode::Sprite(SpriteEntry::new(key, w, h)));
        self
    }

    pub fn push_group(&mut self, name: impl Into<String>, children: Vec<SheetNode<K>>) -> &mut Self {
        self.nodes.push(SheetNode::Group {
            name: name.into(),
            children,
        });
        self
    }

    /// Sprites in document order (depth-first through groups).
    pub fn sprites(&self) -> Vec<&SpriteEntry<K>> {
        let mut out = Vec::new();
        collect(&self.nodes, &mut out);
        out
    }

    /// Moves every sprite back to the sentinel position.
    pub fn reset_positions(&mut self) {
        for s in self.sprites_entries_mut() {
            s.position = Position::UNPLACED;
        }
    }

    fn sprites_entries_mut(&mut self) -> Vec<&mut SpriteEntry<K>> {
        let mut out = Vec::new();
        collect_mut(&mut self.nodes, &mut out);
        out
    }
}

impl<K: Clone> Sheet<K> {
    /// Snapshot of the placed sprites and the committed size.
    pub fn to_layout(&self) -> Layout<K> {
        let sprites = self
            .sprites()
            .into_iter()
            .filter_map(|s| {
                s.bounds().map(|frame| Placement {
                    key: s.key.clone(),
                    frame,
                })
            })
            .collect();
        let c = &self.constraints;
        Layout {
            width: self.width,
            height: self.height,
            sprites,
            meta: Meta {
                schema_version: "1".into(),
                app: "sheet-packer".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                policy: GrowthPolicy::for_constraints(c).name().into(),
                power_of_two: c.power_of_two(),
                maintain_aspect_ratio: c.maintain_aspect_ratio(),
                max_dim: c.max_size(),
            },
        }
    }
}

impl<K: Display> SpriteSheet for Sheet<K> {
    type Sprite = SpriteEntry<K>;

    fn constraints(&self) -> &Constraints {
        &self.constraints
    }
    fn sprites_mut(&mut self) -> Vec<&mut SpriteEntry<K>> {
        self.sprites_entries_mut()
    }
    fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}

fn collect<'a, K>(nodes: &'a [SheetNode<K>], out: &mut Vec<&'a SpriteEntry<K>>) {
    for node in nodes {
        match node {
            SheetNode::Sprite(s) => out.push(s),
            SheetNode::Group { children, .. } => collect(children, out),
        }
    }
}

fn collect_mut<'a, K>(nodes: &'a mut [SheetNode<K>], out: &mut Vec<&'a mut SpriteEntry<K>>) {
    for node in nodes {
        match node {
            SheetNode::Sprite(s) => out.push(s),
            SheetNode::Group { children, .. } => collect_mut(children, out),
        }
    }
}
