// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::NavItem;

const ARROW_OPEN: &str = "▼";
const ARROW_CLOSED: &str = "►";
const GLYPH_MENU: &str = "☰";
const GLYPH_BACK: &str = "←";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemLabel {
    pub text: String,
    pub tooltip: Option<String>,
}

/// Text a sidebar row shows. Depends only on static item data and the two
/// expansion flags, so views can recompute it at will.
pub fn item_label(item: &NavItem, sidebar_expanded: bool, submenu_expanded: bool) -> ItemLabel {
    if !sidebar_expanded {
        let text = if item.icon.is_empty() {
            item.label.chars().take(1).collect()
        } else {
            item.icon.clone()
        };
        return ItemLabel {
            text,
            tooltip: Some(item.label.clone()),
        };
    }

    let mut text = if item.icon.is_empty() {
        item.label.clone()
    } else {
        format!("{} {}", item.icon, item.label)
    };
    if item.is_parent() {
        text.push(' ');
        text.push_str(if submenu_expanded {
            ARROW_OPEN
        } else {
            ARROW_CLOSED
        });
    }
    ItemLabel {
        text,
        tooltip: None,
    }
}

pub const fn toggle_glyph(sidebar_expanded: bool) -> &'static str {
    if sidebar_expanded {
        GLYPH_BACK
    } else {
        GLYPH_MENU
    }
}
