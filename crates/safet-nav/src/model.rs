// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::{NavError, NavItemId, TreeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemKind {
    Leaf,
    Parent { has_own_page: bool },
    Child { parent: NavItemId },
}

impl ItemKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Leaf => "leaf",
            Self::Parent { .. } => "parent",
            Self::Child { .. } => "child",
        }
    }
}

/// Static description of one sidebar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    pub id: NavItemId,
    pub label: String,
    #[serde(default)]
    pub icon: String,
    pub view_index: Option<usize>,
    #[serde(flatten)]
    pub kind: ItemKind,
}

impl NavItem {
    pub fn leaf(id: impl Into<NavItemId>, label: impl Into<String>, view_index: usize) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: String::new(),
            view_index: Some(view_index),
            kind: ItemKind::Leaf,
        }
    }

    pub fn parent(id: impl Into<NavItemId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: String::new(),
            view_index: None,
            kind: ItemKind::Parent {
                has_own_page: false,
            },
        }
    }

    pub fn parent_with_page(
        id: impl Into<NavItemId>,
        label: impl Into<String>,
        view_index: usize,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: String::new(),
            view_index: Some(view_index),
            kind: ItemKind::Parent { has_own_page: true },
        }
    }

    pub fn child(
        id: impl Into<NavItemId>,
        parent: impl Into<NavItemId>,
        label: impl Into<String>,
        view_index: usize,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: String::new(),
            view_index: Some(view_index),
            kind: ItemKind::Child {
                parent: parent.into(),
            },
        }
    }

    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub const fn is_parent(&self) -> bool {
        matches!(self.kind, ItemKind::Parent { .. })
    }

    pub const fn is_child(&self) -> bool {
        matches!(self.kind, ItemKind::Child { .. })
    }

    pub const fn parent_id(&self) -> Option<NavItemId> {
        match self.kind {
            ItemKind::Child { parent } => Some(parent),
            ItemKind::Leaf | ItemKind::Parent { .. } => None,
        }
    }

    pub const fn has_own_page(&self) -> bool {
        matches!(self.kind, ItemKind::Parent { has_own_page: true })
    }

    /// Whether `activate` accepts this item.
    pub const fn is_selectable(&self) -> bool {
        match self.kind {
            ItemKind::Leaf | ItemKind::Child { .. } => true,
            ItemKind::Parent { has_own_page } => has_own_page,
        }
    }

    /// The submenu this item belongs to: its parent for a child, itself for a
    /// parent, nothing for a top-level leaf.
    pub const fn submenu_owner(&self) -> Option<NavItemId> {
        match self.kind {
            ItemKind::Leaf => None,
            ItemKind::Parent { .. } => Some(self.id),
            ItemKind::Child { parent } => Some(parent),
        }
    }
}

/// Pixel-like geometry shared by the controller and the animation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarMetrics {
    pub collapsed_width: u16,
    pub expanded_width: u16,
    pub item_height: u16,
    pub item_spacing: u16,
}

impl Default for SidebarMetrics {
    fn default() -> Self {
        Self {
            collapsed_width: 50,
            expanded_width: 250,
            item_height: 40,
            item_spacing: 0,
        }
    }
}

impl SidebarMetrics {
    /// Height of a fully open submenu holding `children` rows.
    pub fn submenu_height(&self, children: usize) -> u32 {
        if children == 0 {
            return 0;
        }
        let count = u32::try_from(children).unwrap_or(u32::MAX);
        count
            .saturating_mul(u32::from(self.item_height))
            .saturating_add((count - 1).saturating_mul(u32::from(self.item_spacing)))
    }
}

/// Validated, ordered navigation tree. Children always follow their parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavTree {
    items: Vec<NavItem>,
    positions: BTreeMap<NavItemId, usize>,
    children: BTreeMap<NavItemId, Vec<NavItemId>>,
    start: NavItemId,
}

impl NavTree {
    pub fn new(items: Vec<NavItem>) -> Result<Self, TreeError> {
        if items.is_empty() {
            return Err(TreeError::Empty);
        }

        let mut positions = BTreeMap::new();
        let mut children: BTreeMap<NavItemId, Vec<NavItemId>> = BTreeMap::new();
        let mut views: BTreeMap<usize, NavItemId> = BTreeMap::new();

        for (position, item) in items.iter().enumerate() {
            if positions.insert(item.id, position).is_some() {
                return Err(TreeError::DuplicateId { id: item.id });
            }

            match item.kind {
                ItemKind::Leaf => {
                    if item.view_index.is_none() {
                        return Err(TreeError::MissingView { id: item.id });
                    }
                }
                ItemKind::Parent { has_own_page } => {
                    if has_own_page != item.view_index.is_some() {
                        return Err(TreeError::PagePolicyMismatch {
                            id: item.id,
                            has_own_page,
                            view: item.view_index,
                        });
                    }
                    children.entry(item.id).or_default();
                }
                ItemKind::Child { parent } => {
                    if item.view_index.is_none() {
                        return Err(TreeError::MissingView { id: item.id });
                    }
                    let Some(parent_item) = items.iter().find(|other| other.id == parent) else {
                        return Err(TreeError::UnknownParent {
                            child: item.id,
                            parent,
                        });
                    };
                    if !parent_item.is_parent() {
                        return Err(TreeError::ParentNotSubmenu {
                            child: item.id,
                            parent,
                        });
                    }
                    if !positions.contains_key(&parent) {
                        return Err(TreeError::ChildBeforeParent {
                            child: item.id,
                            parent,
                        });
                    }
                    children.entry(parent).or_default().push(item.id);
                }
            }

            if let Some(view) = item.view_index
                && let Some(first) = views.insert(view, item.id)
            {
                return Err(TreeError::SharedView {
                    view,
                    first,
                    second: item.id,
                });
            }
        }

        let start = items
            .iter()
            .find(|item| !item.is_child() && item.is_selectable())
            .map(|item| item.id)
            .ok_or(TreeError::NoStartItem)?;

        Ok(Self {
            items,
            positions,
            children,
            start,
        })
    }

    pub fn items(&self) -> &[NavItem] {
        &self.items
    }

    pub fn get(&self, id: NavItemId) -> Result<&NavItem, NavError> {
        self.positions
            .get(&id)
            .and_then(|position| self.items.get(*position))
            .ok_or(NavError::NotFound { id })
    }

    pub fn contains(&self, id: NavItemId) -> bool {
        self.positions.contains_key(&id)
    }

    /// First top-level item that has a page of its own.
    pub const fn start_item(&self) -> NavItemId {
        self.start
    }

    pub fn top_level(&self) -> impl Iterator<Item = &NavItem> {
        self.items.iter().filter(|item| !item.is_child())
    }

    pub fn children(&self, parent: NavItemId) -> &[NavItemId] {
        self.children
            .get(&parent)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn child_count(&self, parent: NavItemId) -> usize {
        self.children(parent).len()
    }

    pub fn parent_ids(&self) -> BTreeSet<NavItemId> {
        self.children.keys().copied().collect()
    }

    pub fn max_view_index(&self) -> Option<usize> {
        self.items.iter().filter_map(|item| item.view_index).max()
    }

    pub fn item_for_view(&self, view_index: usize) -> Option<&NavItem> {
        self.items
            .iter()
            .find(|item| item.view_index == Some(view_index))
    }
}
