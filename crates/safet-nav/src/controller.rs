// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use tracing::{debug, warn};

use crate::state::rendered_active_for;
use crate::{
    HeightAnimation, NavCommand, NavEffect, NavError, NavItem, NavItemId, NavState, NavTree,
    Restyle, SidebarMetrics, WidthAnimation,
};

/// Owns the navigation state and turns UI events into effects.
///
/// Every operation validates its input before touching anything and works on a
/// copy of the state, so a rejected call leaves the controller exactly as it
/// was. State is committed immediately; animations in the effect only tween
/// toward what has already been decided.
#[derive(Debug, Clone)]
pub struct NavController {
    tree: NavTree,
    metrics: SidebarMetrics,
    state: NavState,
}

impl NavController {
    pub fn new(tree: NavTree, metrics: SidebarMetrics) -> Self {
        let state = NavState::initial(&tree);
        Self {
            tree,
            metrics,
            state,
        }
    }

    pub const fn state(&self) -> &NavState {
        &self.state
    }

    pub const fn tree(&self) -> &NavTree {
        &self.tree
    }

    pub const fn metrics(&self) -> SidebarMetrics {
        self.metrics
    }

    pub fn submenu_height(&self, parent_id: NavItemId) -> u32 {
        self.metrics
            .submenu_height(self.tree.child_count(parent_id))
    }

    /// Effect that brings a freshly built view layer in line with the current
    /// state: shows the active page and styles the active rows.
    pub fn initial_effect(&self) -> NavEffect {
        let view_index = self
            .state
            .active_item_id
            .and_then(|id| self.tree.get(id).ok())
            .and_then(|item| item.view_index);
        NavEffect {
            view_index,
            items_to_restyle: self
                .state
                .rendered_active(&self.tree)
                .into_iter()
                .map(Restyle::active)
                .collect(),
            ..NavEffect::default()
        }
    }

    pub fn dispatch(&mut self, command: NavCommand) -> Result<NavEffect, NavError> {
        match command {
            NavCommand::Click(id) => self.click(id),
            NavCommand::Activate(id) => self.activate(id),
            NavCommand::ToggleSubmenu(id) => self.toggle_submenu(id),
            NavCommand::ToggleSidebar => Ok(self.toggle_sidebar()),
        }
    }

    /// Parents toggle their submenu; every other row activates its page.
    pub fn click(&mut self, item_id: NavItemId) -> Result<NavEffect, NavError> {
        if self.lookup(item_id)?.is_parent() {
            self.toggle_submenu(item_id)
        } else {
            self.activate(item_id)
        }
    }

    pub fn activate(&mut self, item_id: NavItemId) -> Result<NavEffect, NavError> {
        let item = self.lookup(item_id)?;
        if !item.is_selectable() {
            return Err(self.reject(item_id, "parent item has no page of its own"));
        }
        if self.state.active_item_id == Some(item_id) {
            debug!(item = %item_id, "navigation item already active");
            return Ok(NavEffect::default());
        }

        let mut next = self.state.clone();
        let mut effect = NavEffect::default();
        self.plan_activation(&mut next, &mut effect, item);
        self.commit(next, &effect);
        Ok(effect)
    }

    pub fn toggle_submenu(&mut self, parent_id: NavItemId) -> Result<NavEffect, NavError> {
        let parent = self.lookup(parent_id)?;
        if !parent.is_parent() {
            return Err(self.reject(parent_id, "item does not own a submenu"));
        }

        let height = self.submenu_height(parent_id);
        let mut next = self.state.clone();
        let mut effect = NavEffect::default();

        if next.expanded_parent_ids.remove(&parent_id) {
            effect.height_animations.push(HeightAnimation {
                parent_id,
                from: height,
                to: 0,
            });

            let active_child = next
                .active_item_id
                .and_then(|id| self.tree.get(id).ok())
                .is_some_and(|item| item.parent_id() == Some(parent_id));
            if active_child {
                let fallback = if parent.has_own_page() {
                    parent
                } else {
                    self.lookup(self.tree.start_item())?
                };
                self.plan_activation(&mut next, &mut effect, fallback);
            }
        } else {
            next.expanded_parent_ids.insert(parent_id);
            effect.height_animations.push(HeightAnimation {
                parent_id,
                from: 0,
                to: height,
            });

            if parent.has_own_page() && next.active_item_id != Some(parent_id) {
                self.plan_activation(&mut next, &mut effect, parent);
            }
        }

        self.commit(next, &effect);
        Ok(effect)
    }

    pub fn toggle_sidebar(&mut self) -> NavEffect {
        let collapsed = self.metrics.collapsed_width;
        let expanded = self.metrics.expanded_width;
        let animation = if self.state.sidebar_expanded {
            WidthAnimation {
                from: expanded,
                to: collapsed,
            }
        } else {
            WidthAnimation {
                from: collapsed,
                to: expanded,
            }
        };

        let mut next = self.state.clone();
        next.sidebar_expanded = !next.sidebar_expanded;
        let effect = NavEffect {
            width_animation: Some(animation),
            ..NavEffect::default()
        };
        self.commit(next, &effect);
        effect
    }

    /// Moves `next` onto `item` and records the restyle, submenu and view
    /// consequences. `item` must be selectable and not already active.
    fn plan_activation(&self, next: &mut NavState, effect: &mut NavEffect, item: &NavItem) {
        let previous = next.active_item_id;
        let before = rendered_active_for(&self.tree, previous);
        let after = rendered_active_for(&self.tree, Some(item.id));

        for id in before.iter().rev().filter(|id| !after.contains(id)) {
            effect.items_to_restyle.push(Restyle::inactive(*id));
        }
        for id in after.iter().filter(|id| !before.contains(id)) {
            effect.items_to_restyle.push(Restyle::active(*id));
        }

        let previous_owner = previous
            .and_then(|id| self.tree.get(id).ok())
            .and_then(NavItem::submenu_owner);
        if let Some(owner) = previous_owner
            && Some(owner) != item.submenu_owner()
            && next.expanded_parent_ids.remove(&owner)
        {
            effect.height_animations.push(HeightAnimation {
                parent_id: owner,
                from: self.submenu_height(owner),
                to: 0,
            });
        }

        if let Some(parent) = item.parent_id()
            && next.expanded_parent_ids.insert(parent)
        {
            effect.height_animations.push(HeightAnimation {
                parent_id: parent,
                from: 0,
                to: self.submenu_height(parent),
            });
        }

        next.active_item_id = Some(item.id);
        effect.view_index = item.view_index;
    }

    fn commit(&mut self, next: NavState, effect: &NavEffect) {
        debug!(
            active = ?next.active_item_id.map(NavItemId::get),
            sidebar_expanded = next.sidebar_expanded,
            expanded = next.expanded_parent_ids.len(),
            view = ?effect.view_index,
            restyled = effect.items_to_restyle.len(),
            "navigation transition"
        );
        self.state = next;
    }

    fn lookup(&self, item_id: NavItemId) -> Result<&NavItem, NavError> {
        self.tree.get(item_id).inspect_err(|error| {
            warn!(%error, "navigation event for unknown item");
        })
    }

    fn reject(&self, id: NavItemId, reason: &'static str) -> NavError {
        let error = NavError::InvalidTransition { id, reason };
        warn!(%error, "navigation transition rejected");
        error
    }
}
