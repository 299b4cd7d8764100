//! World obstacles
//!
//! Categories are closed; capability flags are computed once from the
//! category when an obstacle is built.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Aabb;
use super::hostile::Hostile;

/// Obstacle category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Ground block the hero jumps over
    Jumpable,
    /// Raised bar the hero slides under
    Slidable,
    /// Floating platform: slide under it or jump onto it
    JumpableSlidable,
    Wolf,
    Golem,
    Witch,
}

/// What the hero can do to get past an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities {
    pub is_jumpable: bool,
    pub is_slideable: bool,
    pub is_multiple_slideable: bool,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Jumpable,
        Category::Slidable,
        Category::JumpableSlidable,
        Category::Wolf,
        Category::Golem,
        Category::Witch,
    ];

    pub fn is_hostile(self) -> bool {
        matches!(self, Category::Wolf | Category::Golem | Category::Witch)
    }

    /// Size before any spawn-time resizing
    pub fn base_size(self) -> Vec2 {
        match self {
            Category::Jumpable => Vec2::new(24.0, 20.0),
            Category::Slidable => Vec2::new(30.0, 40.0),
            Category::JumpableSlidable => Vec2::new(60.0, 16.0),
            Category::Wolf => Vec2::new(32.0, 20.0),
            Category::Golem => Vec2::new(36.0, 36.0),
            Category::Witch => Vec2::new(24.0, 32.0),
        }
    }

    pub fn capabilities(self) -> Capabilities {
        match self {
            Category::Jumpable | Category::Wolf | Category::Golem => Capabilities {
                is_jumpable: true,
                ..Capabilities::default()
            },
            Category::Slidable => Capabilities {
                is_slideable: true,
                ..Capabilities::default()
            },
            Category::JumpableSlidable => Capabilities {
                is_jumpable: true,
                is_slideable: true,
                is_multiple_slideable: true,
            },
            Category::Witch => Capabilities::default(),
        }
    }
}

/// An obstacle in the active set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub category: Category,
    pub bbox: Aabb,
    pub caps: Capabilities,
    /// Horizontal extent touches the viewport
    pub visible: bool,
    /// Present for hostile categories only
    pub hostile: Option<Hostile>,
}

impl Obstacle {
    /// Obstacle of `category` at its base size with bottom-left at `pos`
    pub fn new(id: u32, category: Category, pos: Vec2) -> Self {
        Self::with_size(id, category, pos, category.base_size())
    }

    pub fn with_size(id: u32, category: Category, pos: Vec2, size: Vec2) -> Self {
        Self {
            id,
            category,
            bbox: Aabb::from_min_size(pos, size),
            caps: category.capabilities(),
            visible: false,
            hostile: category.is_hostile().then(Hostile::default),
        }
    }

    pub fn is_hostile(&self) -> bool {
        self.hostile.is_some()
    }

    /// Recompute the visibility flag for a viewport of `viewport_width`
    pub fn refresh_visibility(&mut self, viewport_width: f32) {
        self.visible = self.bbox.is_x_visible(viewport_width);
    }
}
