// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use safet_nav::{HeightAnimation, NavCommand, NavController, NavError, NavItemId, WidthAnimation};
use safet_testkit::{
    check_invariants, controller, home_submenu, home_submenu_tree, metrics, pos_tree,
    restyle_pairs, selectable_ids, warehouse, warehouse_tree,
};

#[test]
fn warehouse_scenario_produces_documented_effects() -> Result<()> {
    use warehouse::*;

    let mut nav = NavController::new(warehouse_tree()?, metrics(40, 0));
    assert_eq!(nav.state().active_item_id, Some(HOME));
    assert!(!nav.state().sidebar_expanded);

    let effect = nav.activate(CATEGORIA)?;
    assert_eq!(effect.view_index, Some(1));
    assert_eq!(restyle_pairs(&effect), vec![(1, false), (2, true), (3, true)]);
    assert_eq!(
        effect.height_animations,
        vec![HeightAnimation {
            parent_id: ALMACEN,
            from: 0,
            to: 80,
        }]
    );

    let effect = nav.activate(HOME)?;
    assert_eq!(effect.view_index, Some(0));
    assert_eq!(restyle_pairs(&effect), vec![(3, false), (2, false), (1, true)]);
    assert_eq!(
        effect.height_animations,
        vec![HeightAnimation {
            parent_id: ALMACEN,
            from: 80,
            to: 0,
        }]
    );
    check_invariants(&nav)
}

#[test]
fn activate_is_idempotent_for_every_selectable_item() -> Result<()> {
    let tree = pos_tree()?;
    for id in selectable_ids(&tree) {
        let mut nav = controller(tree.clone());
        nav.activate(id)?;
        let second = nav.activate(id)?;
        assert!(second.is_empty(), "second activation of {id} was {second:?}");
        assert_eq!(nav.state().active_item_id, Some(id));
    }
    Ok(())
}

#[test]
fn children_render_their_parent_active() -> Result<()> {
    let tree = pos_tree()?;
    for item in tree.items().iter().filter(|item| item.is_child()) {
        let Some(parent) = item.parent_id() else {
            continue;
        };
        let mut nav = controller(tree.clone());
        let effect = nav.activate(item.id)?;
        assert_eq!(effect.restyle_for(item.id), Some(true));
        assert_eq!(effect.restyle_for(parent), Some(true));
        assert!(nav.state().is_rendered_active(nav.tree(), parent));
        check_invariants(&nav)?;
    }
    Ok(())
}

#[test]
fn leaves_under_different_parents_exclude_each_other() -> Result<()> {
    let tree = pos_tree()?;
    let ids = selectable_ids(&tree);
    for a in &ids {
        for b in &ids {
            let owner_a = tree.get(*a)?.submenu_owner();
            let owner_b = tree.get(*b)?.submenu_owner();
            if a == b || (owner_a.is_some() && owner_a == owner_b) {
                continue;
            }
            let mut nav = controller(tree.clone());
            nav.activate(*a)?;
            nav.activate(*b)?;
            assert!(
                !nav.state().is_rendered_active(nav.tree(), *a),
                "{a} still active after activating {b}"
            );
            check_invariants(&nav)?;
        }
    }
    Ok(())
}

#[test]
fn selecting_a_hidden_child_expands_its_parent() -> Result<()> {
    let tree = pos_tree()?;
    let mut nav = NavController::new(tree, metrics(45, 5));
    let ventas = NavItemId::new(20);
    assert!(!nav.state().is_submenu_expanded(ventas));

    let effect = nav.activate(NavItemId::new(22))?;
    assert_eq!(
        effect.height_animation_for(ventas),
        Some(HeightAnimation {
            parent_id: ventas,
            from: 0,
            to: 95,
        })
    );
    assert!(nav.state().is_submenu_expanded(ventas));
    Ok(())
}

#[test]
fn moving_between_submenus_closes_one_and_opens_the_other() -> Result<()> {
    let mut nav = controller(pos_tree()?);
    nav.activate(NavItemId::new(11))?;

    let effect = nav.activate(NavItemId::new(21))?;
    assert_eq!(
        effect.height_animations,
        vec![
            HeightAnimation {
                parent_id: NavItemId::new(10),
                from: 80,
                to: 0,
            },
            HeightAnimation {
                parent_id: NavItemId::new(20),
                from: 0,
                to: 80,
            },
        ]
    );
    assert_eq!(restyle_pairs(&effect), vec![(11, false), (10, false), (20, true), (21, true)]);
    check_invariants(&nav)
}

#[test]
fn expand_height_uses_fixed_rows_and_spacing() -> Result<()> {
    for (height, spacing) in [(40, 0), (45, 5), (30, 3)] {
        let mut nav = NavController::new(home_submenu_tree()?, metrics(height, spacing));
        let effect = nav.toggle_submenu(home_submenu::INICIO)?;
        let expected = 3 * u32::from(height) + 2 * u32::from(spacing);
        assert_eq!(
            effect.height_animation_for(home_submenu::INICIO),
            Some(HeightAnimation {
                parent_id: home_submenu::INICIO,
                from: 0,
                to: expected,
            })
        );
        assert_eq!(nav.submenu_height(home_submenu::INICIO), expected);
    }
    Ok(())
}

#[test]
fn sidebar_toggle_is_symmetric() -> Result<()> {
    let mut nav = controller(warehouse_tree()?);
    let original = nav.state().clone();

    let first = nav.dispatch(NavCommand::ToggleSidebar)?;
    let second = nav.dispatch(NavCommand::ToggleSidebar)?;

    assert_eq!(nav.state(), &original);
    assert_eq!(first.width_animation, Some(WidthAnimation { from: 50, to: 250 }));
    assert_eq!(
        second.width_animation,
        first.width_animation.map(WidthAnimation::reversed)
    );
    assert!(first.items_to_restyle.is_empty() && second.items_to_restyle.is_empty());
    Ok(())
}

#[test]
fn home_submenu_click_sequence_keeps_invariants() -> Result<()> {
    use home_submenu::*;

    let mut nav = controller(home_submenu_tree()?);
    let clicks = [
        REPORTES, INICIO, SUB_2, SUB_3, INICIO, REPORTES, SUB_1, INICIO, INICIO, SUB_1,
    ];
    for id in clicks {
        nav.click(id)?;
        check_invariants(&nav)?;
    }
    assert_eq!(nav.state().active_item_id, Some(SUB_1));
    Ok(())
}

#[test]
fn mixed_command_walk_keeps_invariants() -> Result<()> {
    let tree = pos_tree()?;
    let ids: Vec<NavItemId> = tree.items().iter().map(|item| item.id).collect();
    let mut nav = controller(tree);

    // Deterministic stride walk so every item gets clicked from many states.
    let mut cursor = 0usize;
    for step in 0..200 {
        cursor = (cursor + 7) % ids.len();
        let command = if step % 13 == 0 {
            NavCommand::ToggleSidebar
        } else {
            NavCommand::Click(ids[cursor])
        };
        nav.dispatch(command)?;
        check_invariants(&nav)?;
    }
    Ok(())
}

#[test]
fn errors_name_the_offending_item() -> Result<()> {
    let mut nav = controller(warehouse_tree()?);
    let error = nav
        .dispatch(NavCommand::Activate(NavItemId::new(404)))
        .expect_err("unknown item");
    assert_eq!(error.id(), NavItemId::new(404));
    assert_eq!(error.to_string(), "navigation item #404 not found");

    let error = nav
        .dispatch(NavCommand::ToggleSubmenu(warehouse::USUARIOS))
        .expect_err("leaf has no submenu");
    assert!(matches!(error, NavError::InvalidTransition { .. }));
    check_invariants(&nav)
}
