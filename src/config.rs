use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::render::{DEFAULT_MAX_WIDTH, StyleConfig};
use crate::ui::style::{Background, Palette};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Auto,
    Light,
    Dark,
}

impl ThemeMode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Resolve to a concrete background, asking the environment for `auto`.
    pub fn background(self) -> Background {
        match self {
            Self::Auto => Background::detect(),
            Self::Light => Background::Light,
            Self::Dark => Background::Dark,
        }
    }
}

/// Flags that can come from the command line or a config file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub presentation: bool,
    pub line_numbers: bool,
    pub preserve_new_lines: bool,
    pub no_render: bool,
    pub mouse: bool,
    pub width: Option<u16>,
    pub theme: Option<ThemeMode>,
    pub log_file: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge `other` over `self`: switches are OR-ed, options from `other` win.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            presentation: self.presentation || other.presentation,
            line_numbers: self.line_numbers || other.line_numbers,
            preserve_new_lines: self.preserve_new_lines || other.preserve_new_lines,
            no_render: self.no_render || other.no_render,
            mouse: self.mouse || other.mouse,
            width: other.width.or(self.width),
            theme: other.theme.or(self.theme),
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
        }
    }

    /// Turn the merged flags into the settings the pager runs with.
    pub fn resolve(&self) -> Settings {
        let background = self.theme.unwrap_or(ThemeMode::Auto).background();
        Settings {
            style: StyleConfig {
                enabled: !self.no_render,
                max_width: self.width.unwrap_or(DEFAULT_MAX_WIDTH),
                preserve_newlines: self.preserve_new_lines,
                show_line_numbers: self.line_numbers,
                palette: Palette::new(background),
            },
            presentation: self.presentation,
            mouse: self.mouse,
            log_file: self.log_file.clone(),
        }
    }
}

/// Immutable settings resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub style: StyleConfig,
    pub presentation: bool,
    pub mouse: bool,
    pub log_file: Option<PathBuf>,
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("mdpager").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("mdpager")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("mdpager").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config").join("mdpager").join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".mdpagerrc")
}

/// Read flag tokens from `path`. A missing file yields no flags.
///
/// # Errors
/// Returns an error if the file exists but cannot be read.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// Write `flags` to `path`, one flag per line.
///
/// # Errors
/// Returns an error if the directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# mdpager defaults (saved with --save)".to_string()];
    let switches = [
        (flags.presentation, "--presentation"),
        (flags.line_numbers, "--line-numbers"),
        (flags.preserve_new_lines, "--preserve-new-lines"),
        (flags.no_render, "--no-render"),
        (flags.mouse, "--mouse"),
    ];
    lines.extend(
        switches
            .iter()
            .filter(|(on, _)| *on)
            .map(|(_, flag)| (*flag).to_string()),
    );
    if let Some(width) = flags.width {
        lines.push(format!("--width {width}"));
    }
    if let Some(theme) = flags.theme {
        lines.push(format!("--theme {}", theme.as_str()));
    }
    if let Some(path) = &flags.log_file {
        lines.push(format!("--log-file {}", path.display()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// # Errors
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick known flags out of `tokens`, skipping anything else.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline) = match token.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (token, None),
        };
        match name {
            "--presentation" => flags.presentation = true,
            "--line-numbers" => flags.line_numbers = true,
            "--preserve-new-lines" => flags.preserve_new_lines = true,
            "--no-render" => flags.no_render = true,
            "--mouse" => flags.mouse = true,
            "--width" | "--theme" | "--log-file" => {
                let value = match inline {
                    Some(value) => Some(value),
                    None => {
                        let next = tokens.get(i + 1).map(String::as_str);
                        if next.is_some() {
                            i += 1;
                        }
                        next
                    }
                };
                if let Some(value) = value {
                    match name {
                        "--width" => flags.width = value.parse().ok(),
                        "--theme" => flags.theme = parse_theme(value),
                        _ => flags.log_file = Some(PathBuf::from(value)),
                    }
                }
            }
            _ => {}
        }
        i += 1;
    }
    flags
}

fn parse_theme(s: &str) -> Option<ThemeMode> {
    match s {
        "auto" => Some(ThemeMode::Auto),
        "light" => Some(ThemeMode::Light),
        "dark" => Some(ThemeMode::Dark),
        _ => None,
    }
}
