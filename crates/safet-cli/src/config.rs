// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use safet_nav::{ItemKind, NavItem, NavItemId, NavTree, SidebarMetrics};
use safet_tui::{Page, ShellOptions};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_NAME: &str = "safet";
const CONFIG_VERSION: i64 = 1;
const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub sidebar: Sidebar,
    #[serde(default)]
    pub submenu: Submenu,
    #[serde(default)]
    pub animation: Animation,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub log: Log,
    #[serde(default, rename = "page")]
    pub pages: Vec<PageConfig>,
    #[serde(default)]
    pub nav: Nav,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            sidebar: Sidebar::default(),
            submenu: Submenu::default(),
            animation: Animation::default(),
            ui: Ui::default(),
            log: Log::default(),
            pages: Vec::new(),
            nav: Nav::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sidebar {
    pub collapsed_width: Option<u16>,
    pub expanded_width: Option<u16>,
}

impl Default for Sidebar {
    fn default() -> Self {
        let metrics = SidebarMetrics::default();
        Self {
            collapsed_width: Some(metrics.collapsed_width),
            expanded_width: Some(metrics.expanded_width),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Submenu {
    pub item_height: Option<u16>,
    pub item_spacing: Option<u16>,
}

impl Default for Submenu {
    fn default() -> Self {
        let metrics = SidebarMetrics::default();
        Self {
            item_height: Some(metrics.item_height),
            item_spacing: Some(metrics.item_spacing),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Animation {
    pub sidebar: Option<String>,
    pub submenu: Option<String>,
}

impl Default for Animation {
    fn default() -> Self {
        Self {
            sidebar: Some("300ms".to_owned()),
            submenu: Some("200ms".to_owned()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ui {
    pub title: Option<String>,
    pub user: Option<String>,
    pub units_per_column: Option<u16>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: Some("info".to_owned()),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageConfig {
    pub title: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Nav {
    #[serde(default, rename = "item")]
    pub items: Vec<ItemConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKindConfig {
    Leaf,
    Parent,
    Child,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemConfig {
    pub id: u32,
    pub label: String,
    #[serde(default)]
    pub icon: String,
    pub kind: ItemKindConfig,
    pub view: Option<usize>,
    pub parent: Option<u32>,
    pub has_own_page: Option<bool>,
}

impl ItemConfig {
    fn to_nav_item(&self) -> Result<NavItem> {
        let id = NavItemId::new(self.id);
        if self.kind != ItemKindConfig::Parent && self.has_own_page.is_some() {
            bail!("nav item {id} sets has_own_page but only parent items own submenus");
        }
        if self.kind != ItemKindConfig::Child && self.parent.is_some() {
            bail!("nav item {id} sets parent but is not kind = \"child\"");
        }

        let kind = match self.kind {
            ItemKindConfig::Leaf => ItemKind::Leaf,
            ItemKindConfig::Parent => ItemKind::Parent {
                has_own_page: self.has_own_page.unwrap_or(self.view.is_some()),
            },
            ItemKindConfig::Child => ItemKind::Child {
                parent: self
                    .parent
                    .map(NavItemId::new)
                    .ok_or_else(|| anyhow!("nav item {id} is a child but has no parent"))?,
            },
        };

        Ok(NavItem {
            id,
            label: self.label.clone(),
            icon: self.icon.clone(),
            view_index: self.view,
            kind,
        })
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("SAFET_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set SAFET_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no `version`; add `version = 1` at the top",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let metrics = self.metrics();
        if metrics.expanded_width <= metrics.collapsed_width {
            bail!(
                "sidebar.expanded_width in {} must be larger than collapsed_width ({} <= {})",
                path.display(),
                metrics.expanded_width,
                metrics.collapsed_width
            );
        }

        if metrics.item_height == 0 {
            bail!("submenu.item_height in {} must be positive", path.display());
        }

        if self.ui.units_per_column == Some(0) {
            bail!("ui.units_per_column in {} must be positive", path.display());
        }

        self.sidebar_duration()
            .with_context(|| format!("animation.sidebar in {}", path.display()))?;
        self.submenu_duration()
            .with_context(|| format!("animation.submenu in {}", path.display()))?;

        let level = self.log_level();
        if !LOG_LEVELS.contains(&level) {
            bail!(
                "log.level in {} must be one of {}, got {level:?}",
                path.display(),
                LOG_LEVELS.join(", ")
            );
        }

        self.nav_tree()
            .with_context(|| format!("invalid [[nav.item]] entries in {}", path.display()))?;
        Ok(())
    }

    pub fn metrics(&self) -> SidebarMetrics {
        let defaults = SidebarMetrics::default();
        SidebarMetrics {
            collapsed_width: self
                .sidebar
                .collapsed_width
                .unwrap_or(defaults.collapsed_width),
            expanded_width: self
                .sidebar
                .expanded_width
                .unwrap_or(defaults.expanded_width),
            item_height: self.submenu.item_height.unwrap_or(defaults.item_height),
            item_spacing: self.submenu.item_spacing.unwrap_or(defaults.item_spacing),
        }
    }

    pub fn sidebar_duration(&self) -> Result<Duration> {
        parse_duration(self.animation.sidebar.as_deref().unwrap_or("300ms"))
    }

    pub fn submenu_duration(&self) -> Result<Duration> {
        parse_duration(self.animation.submenu.as_deref().unwrap_or("200ms"))
    }

    pub fn nav_tree(&self) -> Result<NavTree> {
        let items = if self.nav.items.is_empty() {
            default_nav_items()
        } else {
            self.nav
                .items
                .iter()
                .map(ItemConfig::to_nav_item)
                .collect::<Result<Vec<_>>>()?
        };
        Ok(NavTree::new(items)?)
    }

    /// Configured pages, or one placeholder per view index of the tree.
    pub fn pages(&self, tree: &NavTree) -> Vec<Page> {
        if !self.pages.is_empty() {
            return self
                .pages
                .iter()
                .map(|page| Page::new(page.title.clone(), page.body.clone()))
                .collect();
        }

        let count = tree.max_view_index().map_or(0, |max| max + 1);
        (0..count)
            .map(|view| {
                let title = tree
                    .item_for_view(view)
                    .map(|item| item.label.clone())
                    .unwrap_or_else(|| format!("Vista {view}"));
                Page::new(title.clone(), format!("{title} (vista {view})"))
            })
            .collect()
    }

    pub fn shell_options(&self) -> Result<ShellOptions> {
        let defaults = ShellOptions::default();
        Ok(ShellOptions {
            title: self.ui.title.clone().unwrap_or(defaults.title),
            user_label: self.ui.user.clone().unwrap_or(defaults.user_label),
            units_per_column: self
                .ui
                .units_per_column
                .unwrap_or(defaults.units_per_column),
            width_duration: self.sidebar_duration()?,
            height_duration: self.submenu_duration()?,
            logo: defaults.logo,
        })
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or("info")
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.log.file {
            return Ok(PathBuf::from(path));
        }
        let root = dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .ok_or_else(|| anyhow!("cannot resolve a log directory; set [log].file"))?;
        Ok(root.join(APP_NAME).join(format!("{APP_NAME}.log")))
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# safet config\n# Place this file at: {}\n\nversion = 1\n\n[sidebar]\ncollapsed_width = 50\nexpanded_width = 250\n\n[submenu]\nitem_height = 40\nitem_spacing = 0\n\n[animation]\nsidebar = \"300ms\"\nsubmenu = \"200ms\"\n\n[ui]\ntitle = \"Panel de control\"\nuser = \"Admin\"\nunits_per_column = 10\n\n[log]\nlevel = \"info\"\n# file = \"/absolute/path/to/safet.log\"\n\n# Pages are addressed by position; omit [[page]] to get one placeholder per view.\n[[page]]\ntitle = \"Panel principal\"\n\n[[page]]\ntitle = \"Categorías\"\n\n[[page]]\ntitle = \"Productos\"\n\n[[page]]\ntitle = \"Usuarios\"\n\n[[nav.item]]\nid = 1\nlabel = \"Inicio\"\nicon = \"🏠\"\nkind = \"leaf\"\nview = 0\n\n[[nav.item]]\nid = 2\nlabel = \"Almacén\"\nicon = \"📦\"\nkind = \"parent\"\n# has_own_page = true together with view = N makes the parent select a page too\n\n[[nav.item]]\nid = 3\nlabel = \"Categoría\"\nkind = \"child\"\nparent = 2\nview = 1\n\n[[nav.item]]\nid = 4\nlabel = \"Producto\"\nkind = \"child\"\nparent = 2\nview = 2\n\n[[nav.item]]\nid = 5\nlabel = \"Usuarios\"\nicon = \"👥\"\nkind = \"leaf\"\nview = 3\n",
            path.display(),
        )
    }
}

fn default_nav_items() -> Vec<NavItem> {
    vec![
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
    ]
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid animation duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid animation duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }

    bail!("invalid duration {raw:?}; use <N>ms or <N>s (for example 300ms)")
}

#[cfg(test)]
mod tests {
    use super::{Config, parse_duration};
    use anyhow::Result;
    use safet_nav::{NavItemId, SidebarMetrics};
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};
    use std::time::Duration;

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_default_pos_menu() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert_eq!(config.metrics(), SidebarMetrics::default());

        let tree = config.nav_tree()?;
        assert_eq!(tree.start_item(), NavItemId::new(1));
        assert_eq!(tree.children(NavItemId::new(20)).len(), 2);

        let pages = config.pages(&tree);
        assert_eq!(pages.len(), 9);
        assert_eq!(pages[6].title, "Caja");
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[sidebar]\nexpanded_width = 300\n")?;
        let error = Config::load(&path).expect_err("missing version should fail");
        assert!(error.to_string().contains("version = 1"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 2\n")?;
        let error = Config::load(&path).expect_err("v2 config should fail");
        assert!(error.to_string().contains("unsupported config version 2"));
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn custom_nav_tree_parses() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[submenu]\nitem_height = 45\nitem_spacing = 5\n\n[[nav.item]]\nid = 1\nlabel = \"Inicio\"\nkind = \"parent\"\nview = 0\n\n[[nav.item]]\nid = 2\nlabel = \"Sub 1\"\nkind = \"child\"\nparent = 1\nview = 2\n\n[[nav.item]]\nid = 3\nlabel = \"Reportes\"\nkind = \"leaf\"\nview = 1\n",
        )?;
        let config = Config::load(&path)?;
        let tree = config.nav_tree()?;
        assert!(tree.get(NavItemId::new(1))?.has_own_page());
        assert_eq!(config.metrics().item_height, 45);
        assert_eq!(config.pages(&tree).len(), 3);
        Ok(())
    }

    #[test]
    fn invalid_tree_is_reported_with_file_context() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[[nav.item]]\nid = 1\nlabel = \"Inicio\"\nkind = \"leaf\"\nview = 0\n\n[[nav.item]]\nid = 2\nlabel = \"Huerfano\"\nkind = \"child\"\nparent = 9\nview = 1\n",
        )?;
        let error = Config::load(&path).expect_err("orphan child should fail");
        let message = format!("{error:#}");
        assert!(message.contains("[[nav.item]]"));
        assert!(message.contains("unknown parent #9"));
        Ok(())
    }

    #[test]
    fn child_without_parent_is_rejected() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[[nav.item]]\nid = 1\nlabel = \"Inicio\"\nkind = \"child\"\nview = 0\n",
        )?;
        let error = Config::load(&path).expect_err("child needs parent");
        assert!(format!("{error:#}").contains("has no parent"));
        Ok(())
    }

    #[test]
    fn own_page_flag_on_leaf_is_rejected() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[[nav.item]]\nid = 1\nlabel = \"Inicio\"\nkind = \"leaf\"\nview = 0\nhas_own_page = true\n",
        )?;
        let error = Config::load(&path).expect_err("leaf cannot own a page flag");
        assert!(format!("{error:#}").contains("has_own_page"));
        Ok(())
    }

    #[test]
    fn sidebar_widths_are_validated() -> Result<()> {
        let (_temp, path) =
            write_config("version = 1\n[sidebar]\ncollapsed_width = 200\nexpanded_width = 100\n")?;
        let error = Config::load(&path).expect_err("inverted widths should fail");
        assert!(error.to_string().contains("must be larger than collapsed_width"));
        Ok(())
    }

    #[test]
    fn log_level_is_validated() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[log]\nlevel = \"loud\"\n")?;
        let error = Config::load(&path).expect_err("unknown level should fail");
        assert!(error.to_string().contains("log.level"));
        Ok(())
    }

    #[test]
    fn durations_parse_ms_and_seconds() -> Result<()> {
        assert_eq!(parse_duration("300ms")?, Duration::from_millis(300));
        assert_eq!(parse_duration("1s")?, Duration::from_secs(1));
        let error = parse_duration("fast").expect_err("invalid duration should fail");
        assert!(error.to_string().contains("invalid duration"));
        Ok(())
    }

    #[test]
    fn invalid_animation_duration_names_the_field() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[animation]\nsubmenu = \"soon\"\n")?;
        let error = Config::load(&path).expect_err("bad duration should fail");
        assert!(error.to_string().contains("animation.submenu"));
        Ok(())
    }

    #[test]
    fn shell_options_follow_ui_section() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[ui]\ntitle = \"Caja\"\nuser = \"Admin: Rodrigo\"\nunits_per_column = 5\n[animation]\nsidebar = \"1s\"\n",
        )?;
        let options = Config::load(&path)?.shell_options()?;
        assert_eq!(options.title, "Caja");
        assert_eq!(options.user_label, "Admin: Rodrigo");
        assert_eq!(options.units_per_column, 5);
        assert_eq!(options.width_duration, Duration::from_secs(1));
        assert_eq!(options.height_duration, Duration::from_millis(200));
        Ok(())
    }

    #[test]
    fn log_path_prefers_configured_file() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[log]\nfile = \"/tmp/safet-test.log\"\n")?;
        let config = Config::load(&path)?;
        assert_eq!(config.log_path()?, PathBuf::from("/tmp/safet-test.log"));
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("SAFET_CONFIG_PATH", &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("SAFET_CONFIG_PATH");
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn example_config_loads_cleanly() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, Config::example_config(&path))?;

        let config = Config::load(&path)?;
        let tree = config.nav_tree()?;
        assert_eq!(tree.items().len(), 5);
        assert_eq!(config.pages(&tree).len(), 4);
        safet_tui::validate_pages(&tree, &config.pages(&tree))?;
        Ok(())
    }
}
