// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::NavItemId;
use thiserror::Error;

/// Rejected navigation operation.
///
/// Both variants point at a mismatch between the configured tree and whatever
/// is emitting events, so callers should surface them instead of retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("navigation item {id} not found")]
    NotFound { id: NavItemId },
    #[error("invalid transition for navigation item {id}: {reason}")]
    InvalidTransition { id: NavItemId, reason: &'static str },
}

impl NavError {
    pub const fn id(&self) -> NavItemId {
        match self {
            Self::NotFound { id } | Self::InvalidTransition { id, .. } => *id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("navigation tree has no items")]
    Empty,
    #[error("navigation item {id} is defined more than once")]
    DuplicateId { id: NavItemId },
    #[error("child {child} references unknown parent {parent}")]
    UnknownParent { child: NavItemId, parent: NavItemId },
    #[error("child {child} references {parent}, which is not a parent item")]
    ParentNotSubmenu { child: NavItemId, parent: NavItemId },
    #[error("child {child} is listed before its parent {parent}")]
    ChildBeforeParent { child: NavItemId, parent: NavItemId },
    #[error("navigation item {id} needs a view index")]
    MissingView { id: NavItemId },
    #[error("parent {id} has has_own_page = {has_own_page} but view index {view:?}")]
    PagePolicyMismatch {
        id: NavItemId,
        has_own_page: bool,
        view: Option<usize>,
    },
    #[error("view index {view} is used by both {first} and {second}")]
    SharedView {
        view: usize,
        first: NavItemId,
        second: NavItemId,
    },
    #[error("navigation tree has no top-level item with a page to start on")]
    NoStartItem,
}
