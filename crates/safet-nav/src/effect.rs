// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::NavItemId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restyle {
    pub item_id: NavItemId,
    pub active: bool,
}

impl Restyle {
    pub const fn active(item_id: NavItemId) -> Self {
        Self {
            item_id,
            active: true,
        }
    }

    pub const fn inactive(item_id: NavItemId) -> Self {
        Self {
            item_id,
            active: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidthAnimation {
    pub from: u16,
    pub to: u16,
}

impl WidthAnimation {
    pub const fn reversed(self) -> Self {
        Self {
            from: self.to,
            to: self.from,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeightAnimation {
    pub parent_id: NavItemId,
    pub from: u32,
    pub to: u32,
}

impl HeightAnimation {
    pub const fn is_expanding(self) -> bool {
        self.to > self.from
    }
}

/// Everything the view layer has to do after one transition.
///
/// `height_animations` holds at most one entry per parent; a single activation
/// may close the submenu it leaves and open the one it enters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavEffect {
    pub view_index: Option<usize>,
    pub items_to_restyle: Vec<Restyle>,
    pub width_animation: Option<WidthAnimation>,
    pub height_animations: Vec<HeightAnimation>,
}

impl NavEffect {
    pub fn is_empty(&self) -> bool {
        self.view_index.is_none()
            && self.items_to_restyle.is_empty()
            && self.width_animation.is_none()
            && self.height_animations.is_empty()
    }

    pub fn height_animation_for(&self, parent_id: NavItemId) -> Option<HeightAnimation> {
        self.height_animations
            .iter()
            .copied()
            .find(|animation| animation.parent_id == parent_id)
    }

    pub fn restyle_for(&self, item_id: NavItemId) -> Option<bool> {
        self.items_to_restyle
            .iter()
            .find(|restyle| restyle.item_id == item_id)
            .map(|restyle| restyle.active)
    }
}
