// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use safet_nav::{
    NavController, NavEffect, NavItemId, NavTree, SidebarMetrics, ViewRouter, item_label,
    toggle_glyph,
};
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const IDLE_POLL: Duration = Duration::from_millis(250);
const FRAME_POLL: Duration = Duration::from_millis(16);
const CHILD_INDENT: &str = "   ";
const MIN_SIDEBAR_COLUMNS: u16 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub body: String,
}

impl Page {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellOptions {
    pub logo: String,
    pub title: String,
    pub user_label: String,
    pub width_duration: Duration,
    pub height_duration: Duration,
    /// Sidebar width units per terminal column.
    pub units_per_column: u16,
}

impl Default for ShellOptions {
    fn default() -> Self {
        Self {
            logo: "SATEF".to_owned(),
            title: "Panel de control".to_owned(),
            user_label: String::new(),
            width_duration: Duration::from_millis(300),
            height_duration: Duration::from_millis(200),
            units_per_column: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    InOutQuad,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: f64,
    pub to: f64,
    pub started: Instant,
    pub duration: Duration,
    pub easing: Easing,
}

impl Tween {
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn value_at(&self, now: Instant) -> f64 {
        let eased = self.easing.apply(self.progress(now));
        self.from + (self.to - self.from) * eased
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}

/// One animated property. A new start while a tween is running retargets
/// from wherever the running tween currently is.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisAnimator {
    resting: f64,
    tween: Option<Tween>,
    duration: Duration,
    easing: Easing,
}

impl AxisAnimator {
    pub fn new(initial: f64, duration: Duration) -> Self {
        Self {
            resting: initial,
            tween: None,
            duration,
            easing: Easing::InOutQuad,
        }
    }

    pub fn start(&mut self, from: f64, to: f64, now: Instant) {
        let from = match self.tween {
            Some(tween) if !tween.is_finished(now) => tween.value_at(now),
            _ => from,
        };
        self.resting = to;
        self.tween = Some(Tween {
            from,
            to,
            started: now,
            duration: self.duration,
            easing: self.easing,
        });
    }

    pub fn value_at(&self, now: Instant) -> f64 {
        match self.tween {
            Some(tween) => tween.value_at(now),
            None => self.resting,
        }
    }

    pub const fn target(&self) -> f64 {
        self.resting
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.tween.is_some_and(|tween| !tween.is_finished(now))
    }

    pub fn settle(&mut self, now: Instant) {
        if self.tween.is_some_and(|tween| tween.is_finished(now)) {
            self.tween = None;
        }
    }
}

/// View router for the terminal shell: a stack of pages, row styling, and
/// the width and per-submenu height animations. It only follows effects.
#[derive(Debug, Clone)]
pub struct ShellRouter {
    pages: Vec<Page>,
    current_view: Option<usize>,
    active_rows: BTreeSet<NavItemId>,
    sidebar_expanded: bool,
    width: AxisAnimator,
    heights: BTreeMap<NavItemId, AxisAnimator>,
    height_duration: Duration,
    now: Instant,
}

impl ShellRouter {
    pub fn new(
        pages: Vec<Page>,
        metrics: SidebarMetrics,
        options: &ShellOptions,
        now: Instant,
    ) -> Self {
        Self {
            pages,
            current_view: None,
            active_rows: BTreeSet::new(),
            sidebar_expanded: false,
            width: AxisAnimator::new(f64::from(metrics.collapsed_width), options.width_duration),
            heights: BTreeMap::new(),
            height_duration: options.height_duration,
            now,
        }
    }

    /// Moves the animation clock forward and drops finished tweens.
    pub fn advance(&mut self, now: Instant) {
        self.now = now;
        self.width.settle(now);
        for animator in self.heights.values_mut() {
            animator.settle(now);
        }
    }

    pub const fn current_view(&self) -> Option<usize> {
        self.current_view
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.current_view.and_then(|index| self.pages.get(index))
    }

    pub fn is_row_active(&self, item_id: NavItemId) -> bool {
        self.active_rows.contains(&item_id)
    }

    pub const fn sidebar_expanded(&self) -> bool {
        self.sidebar_expanded
    }

    pub fn is_submenu_open(&self, parent_id: NavItemId) -> bool {
        self.heights
            .get(&parent_id)
            .is_some_and(|animator| animator.target() > 0.0)
    }

    pub fn sidebar_width(&self) -> f64 {
        self.width.value_at(self.now)
    }

    pub fn submenu_height(&self, parent_id: NavItemId) -> f64 {
        self.heights
            .get(&parent_id)
            .map_or(0.0, |animator| animator.value_at(self.now))
    }

    pub fn is_animating(&self) -> bool {
        self.width.is_animating(self.now)
            || self
                .heights
                .values()
                .any(|animator| animator.is_animating(self.now))
    }
}

impl ViewRouter for ShellRouter {
    fn on_effect(&mut self, effect: &NavEffect) {
        if let Some(view) = effect.view_index {
            self.current_view = Some(view);
        }
        for restyle in &effect.items_to_restyle {
            if restyle.active {
                self.active_rows.insert(restyle.item_id);
            } else {
                self.active_rows.remove(&restyle.item_id);
            }
        }
        if let Some(animation) = effect.width_animation {
            self.sidebar_expanded = animation.to > animation.from;
            self.width
                .start(f64::from(animation.from), f64::from(animation.to), self.now);
        }
        for animation in &effect.height_animations {
            let duration = self.height_duration;
            self.heights
                .entry(animation.parent_id)
                .or_insert_with(|| AxisAnimator::new(0.0, duration))
                .start(f64::from(animation.from), f64::from(animation.to), self.now);
        }
        debug!(
            view = ?self.current_view,
            active_rows = self.active_rows.len(),
            sidebar_expanded = self.sidebar_expanded,
            "applied navigation effect"
        );
    }
}

/// Every view index in the tree needs a page behind it.
pub fn validate_pages(tree: &NavTree, pages: &[Page]) -> Result<()> {
    if let Some(max) = tree.max_view_index()
        && max >= pages.len()
    {
        let owner = tree
            .item_for_view(max)
            .map(|item| item.label.as_str())
            .unwrap_or("?");
        bail!(
            "navigation item {owner:?} points at view {max} but only {} pages are defined",
            pages.len()
        );
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SidebarRow {
    item_id: NavItemId,
    depth: u8,
}

#[derive(Debug, Clone)]
struct ViewData {
    router: ShellRouter,
    options: ShellOptions,
    cursor: NavItemId,
}

impl ViewData {
    fn new(controller: &NavController, pages: Vec<Page>, options: ShellOptions, now: Instant) -> Self {
        let mut router = ShellRouter::new(pages, controller.metrics(), &options, now);
        router.on_effect(&controller.initial_effect());
        Self {
            router,
            options,
            cursor: controller.tree().start_item(),
        }
    }
}

pub fn run_app(controller: &mut NavController, pages: Vec<Page>, options: ShellOptions) -> Result<()> {
    validate_pages(controller.tree(), &pages)?;

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::new(controller, pages, options, Instant::now());
    info!(items = controller.tree().items().len(), "shell started");

    let mut result = Ok(());
    loop {
        view_data.router.advance(Instant::now());

        if let Err(error) = terminal.draw(|frame| render(frame, controller, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let timeout = if view_data.router.is_animating() {
            FRAME_POLL
        } else {
            IDLE_POLL
        };
        let has_event = match event::poll(timeout).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if !has_event {
            continue;
        }

        match event::read().context("read event") {
            Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                match handle_key_event(controller, &mut view_data, key) {
                    Ok(true) => break,
                    Ok(false) => {}
                    Err(error) => {
                        result = Err(error);
                        break;
                    }
                }
            }
            Ok(_) => {}
            Err(error) => {
                result = Err(error);
                break;
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    info!("shell stopped");
    result
}

/// Returns `Ok(true)` when the shell should exit. Controller errors are
/// returned as-is: they mean the tree and the event source disagree.
fn handle_key_event(
    controller: &mut NavController,
    view_data: &mut ViewData,
    key: KeyEvent,
) -> Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Ok(true);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
        KeyCode::Up | KeyCode::Char('k') => move_cursor(controller.tree(), view_data, -1),
        KeyCode::Down | KeyCode::Char('j') => move_cursor(controller.tree(), view_data, 1),
        KeyCode::Enter | KeyCode::Char(' ') => {
            let effect = controller
                .click(view_data.cursor)
                .with_context(|| format!("click navigation item {}", view_data.cursor))?;
            view_data.router.on_effect(&effect);
            keep_cursor_visible(controller.tree(), view_data);
        }
        KeyCode::Tab | KeyCode::Char('b') => {
            let effect = controller.toggle_sidebar();
            view_data.router.on_effect(&effect);
        }
        _ => {}
    }
    Ok(false)
}

/// Rows currently drawn in the sidebar. A submenu row shows once the
/// animated height reaches its top edge.
fn sidebar_rows(tree: &NavTree, metrics: SidebarMetrics, router: &ShellRouter) -> Vec<SidebarRow> {
    let pitch = f64::from(metrics.item_height) + f64::from(metrics.item_spacing);
    let mut rows = Vec::new();
    for item in tree.top_level() {
        rows.push(SidebarRow {
            item_id: item.id,
            depth: 0,
        });
        if !item.is_parent() {
            continue;
        }
        let height = router.submenu_height(item.id);
        for (index, child) in tree.children(item.id).iter().enumerate() {
            let top = pitch * index as f64;
            if top >= height {
                break;
            }
            rows.push(SidebarRow {
                item_id: *child,
                depth: 1,
            });
        }
    }
    rows
}

fn move_cursor(tree: &NavTree, view_data: &mut ViewData, delta: isize) {
    let rows = settled_rows(tree, view_data);
    if rows.is_empty() {
        return;
    }
    let current = rows
        .iter()
        .position(|row| row.item_id == view_data.cursor)
        .unwrap_or(0) as isize;
    let len = rows.len() as isize;
    let next = (current + delta).rem_euclid(len) as usize;
    view_data.cursor = rows[next].item_id;
}

fn keep_cursor_visible(tree: &NavTree, view_data: &mut ViewData) {
    let rows = settled_rows(tree, view_data);
    if rows.iter().any(|row| row.item_id == view_data.cursor) {
        return;
    }
    if let Ok(item) = tree.get(view_data.cursor)
        && let Some(parent) = item.parent_id()
    {
        view_data.cursor = parent;
    }
}

/// Cursor movement follows where rows are heading, not the mid-tween frame.
fn settled_rows(tree: &NavTree, view_data: &ViewData) -> Vec<SidebarRow> {
    let mut rows = Vec::new();
    for item in tree.top_level() {
        rows.push(SidebarRow {
            item_id: item.id,
            depth: 0,
        });
        if item.is_parent() && view_data.router.is_submenu_open(item.id) {
            rows.extend(tree.children(item.id).iter().map(|child| SidebarRow {
                item_id: *child,
                depth: 1,
            }));
        }
    }
    rows
}

fn sidebar_columns(router: &ShellRouter, options: &ShellOptions) -> u16 {
    let per_column = f64::from(options.units_per_column.max(1));
    let columns = (router.sidebar_width() / per_column).round();
    (columns as u16).max(MIN_SIDEBAR_COLUMNS)
}

fn render(frame: &mut ratatui::Frame<'_>, controller: &NavController, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(render_header_text(view_data))
        .style(Style::default().fg(Color::White))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, layout[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(sidebar_columns(&view_data.router, &view_data.options)),
            Constraint::Min(1),
        ])
        .split(layout[1]);
    render_sidebar(frame, body[0], controller, view_data);
    render_page(frame, body[1], &view_data.router);

    let status = Paragraph::new(status_text(controller, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);
}

fn render_header_text(view_data: &ViewData) -> String {
    let glyph = toggle_glyph(view_data.router.sidebar_expanded());
    let mut text = format!(
        "{} {}  {}",
        view_data.options.logo, glyph, view_data.options.title
    );
    if !view_data.options.user_label.is_empty() {
        text.push_str("  |  ");
        text.push_str(&view_data.options.user_label);
    }
    text
}

fn render_sidebar(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    controller: &NavController,
    view_data: &ViewData,
) {
    let tree = controller.tree();
    let router = &view_data.router;
    let lines = sidebar_rows(tree, controller.metrics(), router)
        .into_iter()
        .filter_map(|row| {
            let item = tree.get(row.item_id).ok()?;
            let label = item_label(
                item,
                router.sidebar_expanded(),
                router.is_submenu_open(item.id),
            );
            let indent = if row.depth > 0 && router.sidebar_expanded() {
                CHILD_INDENT
            } else {
                ""
            };
            let mut style = Style::default().fg(Color::White);
            if router.is_row_active(item.id) {
                style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
            }
            if row.item_id == view_data.cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Some(Line::from(Span::styled(
                format!("{indent}{}", label.text),
                style,
            )))
        })
        .collect::<Vec<Line<'_>>>();

    let sidebar = Paragraph::new(lines).block(Block::default().borders(Borders::RIGHT));
    frame.render_widget(sidebar, area);
}

fn render_page(frame: &mut ratatui::Frame<'_>, area: Rect, router: &ShellRouter) {
    let (title, body) = match router.current_page() {
        Some(page) => (page.title.as_str(), page.body.as_str()),
        None => ("", ""),
    };
    let page = Paragraph::new(body)
        .wrap(Wrap { trim: false })
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(page, area);
}

fn status_text(controller: &NavController, view_data: &ViewData) -> String {
    let hints = "j/k move  enter select  b sidebar  q quit";
    let tooltip = if view_data.router.sidebar_expanded() {
        None
    } else {
        controller
            .tree()
            .get(view_data.cursor)
            .ok()
            .and_then(|item| item_label(item, false, false).tooltip)
    };
    match tooltip {
        Some(tooltip) => format!("{tooltip}  ·  {hints}"),
        None => hints.to_owned(),
    }
}
