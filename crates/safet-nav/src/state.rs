// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeSet;

use crate::{NavItemId, NavTree};

/// Runtime navigation truth. Only `NavController` mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavState {
    pub active_item_id: Option<NavItemId>,
    pub sidebar_expanded: bool,
    pub expanded_parent_ids: BTreeSet<NavItemId>,
}

impl NavState {
    pub fn initial(tree: &NavTree) -> Self {
        Self {
            active_item_id: Some(tree.start_item()),
            sidebar_expanded: false,
            expanded_parent_ids: BTreeSet::new(),
        }
    }

    pub fn is_submenu_expanded(&self, parent_id: NavItemId) -> bool {
        self.expanded_parent_ids.contains(&parent_id)
    }

    /// Items drawn in the active style, parent first. A child drags its
    /// parent along.
    pub fn rendered_active(&self, tree: &NavTree) -> Vec<NavItemId> {
        rendered_active_for(tree, self.active_item_id)
    }

    pub fn is_rendered_active(&self, tree: &NavTree, item_id: NavItemId) -> bool {
        self.rendered_active(tree).contains(&item_id)
    }
}

pub(crate) fn rendered_active_for(tree: &NavTree, active: Option<NavItemId>) -> Vec<NavItemId> {
    let Some(active) = active else {
        return Vec::new();
    };
    match tree.get(active).ok().and_then(|item| item.parent_id()) {
        Some(parent) => vec![parent, active],
        None => vec![active],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    /// Raw click on a sidebar row; routed by item kind.
    Click(NavItemId),
    Activate(NavItemId),
    ToggleSubmenu(NavItemId),
    ToggleSidebar,
}
