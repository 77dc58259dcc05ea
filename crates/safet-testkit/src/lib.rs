// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use safet_nav::{NavController, NavEffect, NavItem, NavItemId, NavTree, SidebarMetrics};

pub mod warehouse {
    use safet_nav::NavItemId;

    pub const HOME: NavItemId = NavItemId::new(1);
    pub const ALMACEN: NavItemId = NavItemId::new(2);
    pub const CATEGORIA: NavItemId = NavItemId::new(3);
    pub const PRODUCTO: NavItemId = NavItemId::new(4);
    pub const USUARIOS: NavItemId = NavItemId::new(5);
}

pub mod home_submenu {
    use safet_nav::NavItemId;

    pub const INICIO: NavItemId = NavItemId::new(1);
    pub const SUB_1: NavItemId = NavItemId::new(2);
    pub const SUB_2: NavItemId = NavItemId::new(3);
    pub const SUB_3: NavItemId = NavItemId::new(4);
    pub const REPORTES: NavItemId = NavItemId::new(5);
}

/// Home, a two-entry warehouse submenu, and users.
pub fn warehouse_tree() -> Result<NavTree> {
    use warehouse::*;

    Ok(NavTree::new(vec![
        NavItem::leaf(HOME, "Home", 0).with_icon("🏠"),
        NavItem::parent(ALMACEN, "Almacen").with_icon("📦"),
        NavItem::child(CATEGORIA, ALMACEN, "Categoria", 1),
        NavItem::child(PRODUCTO, ALMACEN, "Producto", 2),
        NavItem::leaf(USUARIOS, "Usuarios", 3).with_icon("👥"),
    ])?)
}

/// A home entry that both owns a page and opens a three-entry submenu.
pub fn home_submenu_tree() -> Result<NavTree> {
    use home_submenu::*;

    Ok(NavTree::new(vec![
        NavItem::parent_with_page(INICIO, "Inicio", 0).with_icon("🏠"),
        NavItem::child(SUB_1, INICIO, "Submenú 1", 2).with_icon("▷"),
        NavItem::child(SUB_2, INICIO, "Submenú 2", 3).with_icon("▷"),
        NavItem::child(SUB_3, INICIO, "Submenú 3", 4).with_icon("▷"),
        NavItem::leaf(REPORTES, "Reportes", 1).with_icon("📊"),
    ])?)
}

/// Full point-of-sale menu with several submenus.
pub fn pos_tree() -> Result<NavTree> {
    Ok(NavTree::new(vec![
        NavItem::leaf(1, "Inicio", 0).with_icon("🏠"),
        NavItem::parent(10, "Almacén").with_icon("📦"),
        NavItem::child(11, 10, "Categoría", 1),
        NavItem::child(12, 10, "Producto", 2),
        NavItem::parent(20, "Ventas").with_icon("🛒"),
        NavItem::child(21, 20, "Nueva venta", 3),
        NavItem::child(22, 20, "Historial", 4),
        NavItem::leaf(30, "Compras", 5).with_icon("🚚"),
        NavItem::leaf(40, "Caja", 6).with_icon("💵"),
        NavItem::leaf(50, "Facturas", 7).with_icon("🧾"),
        NavItem::leaf(60, "Usuarios", 8).with_icon("👥"),
    ])?)
}

pub fn metrics(item_height: u16, item_spacing: u16) -> SidebarMetrics {
    SidebarMetrics {
        item_height,
        item_spacing,
        ..SidebarMetrics::default()
    }
}

pub fn controller(tree: NavTree) -> NavController {
    NavController::new(tree, SidebarMetrics::default())
}

pub fn selectable_ids(tree: &NavTree) -> Vec<NavItemId> {
    tree.items()
        .iter()
        .filter(|item| item.is_selectable())
        .map(|item| item.id)
        .collect()
}

pub fn restyle_pairs(effect: &NavEffect) -> Vec<(u32, bool)> {
    effect
        .items_to_restyle
        .iter()
        .map(|restyle| (restyle.item_id.get(), restyle.active))
        .collect()
}

/// Checks the state invariants that must hold after every transition.
pub fn check_invariants(controller: &NavController) -> Result<()> {
    let tree = controller.tree();
    let state = controller.state();
    let rendered = state.rendered_active(tree);

    let Some(active) = state.active_item_id else {
        bail!("no active item");
    };
    let item = tree.get(active)?;
    if !item.is_selectable() {
        bail!("active item {active} has no page");
    }

    match item.parent_id() {
        Some(parent) => {
            if !state.is_submenu_expanded(parent) {
                bail!("active child {active} is hidden inside collapsed parent {parent}");
            }
            if rendered != vec![parent, active] {
                bail!("expected {parent} and {active} rendered active, got {rendered:?}");
            }
        }
        None => {
            if rendered != vec![active] {
                bail!("expected only {active} rendered active, got {rendered:?}");
            }
        }
    }

    for parent in &state.expanded_parent_ids {
        if !tree.get(*parent)?.is_parent() {
            bail!("expanded id {parent} is not a parent");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{check_invariants, controller, home_submenu_tree, pos_tree, warehouse_tree};
    use anyhow::Result;

    #[test]
    fn fixture_trees_validate() -> Result<()> {
        for tree in [warehouse_tree()?, home_submenu_tree()?, pos_tree()?] {
            check_invariants(&controller(tree))?;
        }
        Ok(())
    }
}
