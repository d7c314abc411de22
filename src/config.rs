//! User configuration: keybindings, animation tuning and remote ranking.
//!
//! Layers, later wins: built-in defaults, the key-value file at
//! `$XDG_CONFIG_HOME/folio/config.toml` (default `~/.config/folio/config.toml`),
//! then environment variables.  CLI flags are applied on top by `main`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::animate::CurveTuning;
use crate::core::carousel::InteractionTuning;
use crate::core::progress::ProgressTuning;
use crate::core::rerank::parse_flag;
pub use crate::core::rerank::RemoteRankConfig;

// ───────────────────────────────────────── actions ───────────

/// All configurable page actions.  Keys inside the focused search input are
/// fixed and not listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    JumpTop,
    JumpBottom,
    FocusSearch,
    CarouselUp,
    CarouselDown,
    Quit,
}

impl Action {
    pub const ALL: &[Action] = &[
        Action::ScrollUp,
        Action::ScrollDown,
        Action::PageUp,
        Action::PageDown,
        Action::JumpTop,
        Action::JumpBottom,
        Action::FocusSearch,
        Action::CarouselUp,
        Action::CarouselDown,
        Action::Quit,
    ];

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::ScrollUp => "scroll_up",
            Action::ScrollDown => "scroll_down",
            Action::PageUp => "page_up",
            Action::PageDown => "page_down",
            Action::JumpTop => "jump_top",
            Action::JumpBottom => "jump_bottom",
            Action::FocusSearch => "focus_search",
            Action::CarouselUp => "carousel_up",
            Action::CarouselDown => "carousel_down",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding: key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Only CTRL/ALT are compared.  SHIFT is implied by the character for
    /// `Char` keys, so it is ignored there.
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = match self.code {
            KeyCode::Char(_) => KeyModifiers::CONTROL | KeyModifiers::ALT,
            _ => KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT,
        };
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// User-friendly display string (e.g. `"Ctrl+c"`, `"PgDn"`, `"/"`).
    pub fn display(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "↑".into(),
            KeyCode::Down => "↓".into(),
            KeyCode::Enter => "Enter".into(),
            KeyCode::Esc => "Esc".into(),
            KeyCode::Home => "Home".into(),
            KeyCode::End => "End".into(),
            KeyCode::PageUp => "PgUp".into(),
            KeyCode::PageDown => "PgDn".into(),
            other => format!("{other:?}"),
        });
        s
    }

    /// Parse a key string like `"Ctrl+c"`, `"PageDown"`, `"j"`, `"Space"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let key_part = parts.last()?;

        for &part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            // Single characters keep their case (`G` differs from `g`).
            _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    pub progress: ProgressTuning,
    pub interaction: InteractionTuning,
    pub curves: CurveTuning,
    /// Idle time after the last keystroke before a search runs.
    pub debounce_ms: u64,
    /// Page scroll per wheel notch / arrow key, in px.
    pub scroll_step_px: f64,
    /// Let page scroll progress nudge the projects carousel.
    pub drive_carousel: bool,
    /// Wrap the carousel instead of clamping it.
    pub loop_carousel: bool,
    /// Autoplay speed in px per frame (loop mode only, `0` disables).
    pub autoplay_speed: f64,
    pub remote: RemoteRankConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            progress: ProgressTuning::default(),
            interaction: InteractionTuning::default(),
            curves: CurveTuning::default(),
            debounce_ms: 300,
            scroll_step_px: 48.0,
            drive_carousel: false,
            loop_carousel: false,
            autoplay_speed: 0.5,
            remote: RemoteRankConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        let key = |code| KeyBind::new(code, KeyModifiers::NONE);
        let ch = |c| key(KeyCode::Char(c));
        let mut m = HashMap::new();

        m.insert(ScrollUp, vec![key(KeyCode::Up), ch('k')]);
        m.insert(ScrollDown, vec![key(KeyCode::Down), ch('j')]);
        m.insert(PageUp, vec![key(KeyCode::PageUp), ch('b')]);
        m.insert(PageDown, vec![key(KeyCode::PageDown), ch(' ')]);
        m.insert(JumpTop, vec![key(KeyCode::Home), ch('g')]);
        m.insert(JumpBottom, vec![key(KeyCode::End), ch('G')]);
        m.insert(FocusSearch, vec![ch('/')]);
        m.insert(CarouselUp, vec![ch('[')]);
        m.insert(CarouselDown, vec![ch(']')]);
        m.insert(Quit, vec![ch('q')]);

        m
    }

    /// Find the action that matches a key event.  When multiple bindings
    /// match, the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for (&action, binds) in &self.bindings {
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Short display of the first binding only (for the status bar).
    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}/{}: scroll | {}: page | {}: search | {}/{}: projects | {}: quit",
            self.short_binding(Action::ScrollUp),
            self.short_binding(Action::ScrollDown),
            self.short_binding(Action::PageDown),
            self.short_binding(Action::FocusSearch),
            self.short_binding(Action::CarouselUp),
            self.short_binding(Action::CarouselDown),
            self.short_binding(Action::Quit),
        )
    }

    // ── loading ─────────────────────────────────────────────────

    /// Load config from disk and the environment, falling back to defaults.
    pub fn load() -> Self {
        let mut config = Self::read_file(&config_path());
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Parse the file at `path`.  A missing or unreadable file yields the
    /// defaults.
    fn read_file(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse_config(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                tracing::warn!("cannot read {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Parse the `key = value` file format.  Unknown keys and unparsable
    /// values are ignored.
    pub fn parse_config(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');

            if config.apply_setting(key, value) {
                continue;
            }

            let Some(action) = Action::from_config_key(key) else {
                tracing::debug!("unknown config key {key:?}");
                continue;
            };

            let parsed: Vec<KeyBind> = value
                .split(',')
                .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                .collect();
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        config
    }

    /// Apply one tuning key.  Returns `false` when `key` is not a setting.
    fn apply_setting(&mut self, key: &str, value: &str) -> bool {
        let float = |lo: f64, hi: f64| value.parse::<f64>().ok().map(|v| v.clamp(lo, hi));
        let p = &mut self.progress;
        let i = &mut self.interaction;
        let c = &mut self.curves;
        match key {
            "content_span" => set(&mut p.content_span, float(0.1, 10.0)),
            "release_threshold" => set(&mut p.release_threshold, float(0.5, 3.0)),
            "follow_span" => set(&mut p.follow_span, float(0.1, 10.0)),
            "follow_lead" => set(&mut p.follow_lead, float(0.0, 1.0)),
            "pin_lead" => set(&mut p.pin_lead, float(-1.0, 0.0)),
            "exit_start" => set(&mut c.exit_start, float(0.5, 5.0)),
            "exit_window" => set(&mut c.exit_window, float(0.01, 2.0)),
            "max_translate" => set(&mut c.max_translate, float(0.0, 400.0)),
            "reverse_window" => set(&mut c.reverse_window, float(0.0, 1.0)),
            "fade_start" => set(&mut c.fade_start, float(0.0, 1.5)),
            "fade_end" => set(&mut c.fade_end, float(0.0, 1.5)),
            "reveal_start" => set(&mut c.reveal_start, float(0.0, 1.5)),
            "reveal_span" => set(&mut c.reveal_span, float(0.0, 3.0)),
            "wheel_multiplier" => set(&mut i.wheel_multiplier, float(0.0, 100.0)),
            "drag_multiplier" => set(&mut i.drag_multiplier, float(0.0, 100.0)),
            "drive_px_per_unit" => set(&mut i.drive_px_per_unit, float(0.0, 10_000.0)),
            "drive_factor" => set(&mut i.drive_factor, float(-10.0, 10.0)),
            "scroll_step_px" => set(&mut self.scroll_step_px, float(1.0, 1000.0)),
            "autoplay_speed" => set(&mut self.autoplay_speed, float(-50.0, 50.0)),
            "debounce_ms" => set(
                &mut self.debounce_ms,
                value.parse::<u64>().ok().map(|v| v.min(5000)),
            ),
            "drive_carousel" => self.drive_carousel = parse_flag(value),
            "loop_carousel" => self.loop_carousel = parse_flag(value),
            "remote_rank" => self.remote.enabled = parse_flag(value),
            "rank_endpoint" => self.remote.endpoint = value.to_string(),
            "rank_model" => self.remote.model = value.to_string(),
            "rank_timeout_secs" => set(
                &mut self.remote.timeout_secs,
                value.parse::<u64>().ok().map(|v| v.clamp(1, 120)),
            ),
            _ => return false,
        }
        true
    }

    /// Overlay environment values.  The credential is never read from the
    /// config file.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("FOLIO_REMOTE_RANK") {
            self.remote.enabled = parse_flag(&v);
        }
        if let Some(key) = lookup("FOLIO_RANK_API_KEY").or_else(|| lookup("OPENAI_API_KEY")) {
            self.remote.api_key = Some(key);
        }
        if let Some(v) = lookup("FOLIO_RANK_ENDPOINT") {
            self.remote.endpoint = v;
        }
        if let Some(v) = lookup("FOLIO_RANK_MODEL") {
            self.remote.model = v;
        }
    }
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/folio/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("folio").join("config.toml")
}
