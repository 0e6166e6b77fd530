//! User settings.
//!
//! Settings are owned and persisted by the backend. The launcher loads them once
//! at startup and replaces them wholesale on every save.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub general: GeneralSettings,
    pub activation: ActivationSettings,
    pub search: SearchSettings,
    pub theme: ThemeSettings,
    #[serde(default)]
    pub web_searches: Vec<WebSearch>,
    #[serde(default)]
    pub file_search: FileSearchSettings,
}

impl Settings {
    /// Web searches that would block a save.
    pub fn invalid_web_searches(&self) -> impl Iterator<Item = &WebSearch> {
        self.web_searches.iter().filter(|ws| !ws.is_valid())
    }

    /// Whether the settings may be sent to the backend.
    pub fn can_save(&self) -> bool {
        self.invalid_web_searches().next().is_none()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            activation: ActivationSettings::default(),
            search: SearchSettings::default(),
            theme: ThemeSettings::default(),
            web_searches: default_web_searches(),
            file_search: FileSearchSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralSettings {
    #[serde(default = "default_true")]
    pub launch_at_login: bool,
    #[serde(default)]
    pub show_in_dock: bool,
    #[serde(default)]
    pub show_in_taskbar: bool,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            launch_at_login: true,
            show_in_dock: false,
            show_in_taskbar: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationSettings {
    /// Global hotkey, e.g. "Alt+Space".
    #[serde(default = "default_hotkey")]
    pub hotkey: String,
    #[serde(default = "default_true")]
    pub show_tray_icon: bool,
}

impl Default for ActivationSettings {
    fn default() -> Self {
        Self {
            hotkey: default_hotkey(),
            show_tray_icon: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_true")]
    pub show_recently_used: bool,
    #[serde(default = "default_threshold")]
    pub fuzzy_match_threshold: f64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            show_recently_used: true,
            fuzzy_match_threshold: default_threshold(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeSettings {
    /// "light", "dark" or "system".
    #[serde(default = "default_system")]
    pub mode: String,
    #[serde(default = "default_system")]
    pub accent_color: String,
    #[serde(default)]
    pub custom: Option<CustomTheme>,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            mode: default_system(),
            accent_color: default_system(),
            custom: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomTheme {
    pub background: Option<String>,
    pub foreground: Option<String>,
    pub border: Option<String>,
    pub selected_background: Option<String>,
    pub input_background: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<u32>,
    pub border_radius: Option<u32>,
}

/// A keyword-triggered web search, e.g. `g rust` → Google.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSearch {
    pub name: String,
    pub keyword: String,
    /// URL template with `{query}` and optionally `{instance}` placeholders.
    pub url: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub requires_setup: bool,
    #[serde(default)]
    pub instance: Option<String>,
}

impl WebSearch {
    /// Names of required fields that are blank or malformed.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.keyword.trim().is_empty() || self.keyword.contains(char::is_whitespace) {
            missing.push("keyword");
        }
        if self.url.trim().is_empty() {
            missing.push("url");
        }
        missing
    }

    pub fn is_valid(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSearchSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_indexed_paths")]
    pub indexed_paths: Vec<String>,
    #[serde(default = "default_excluded_patterns")]
    pub excluded_patterns: Vec<String>,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for FileSearchSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            indexed_paths: default_indexed_paths(),
            excluded_patterns: default_excluded_patterns(),
            max_depth: default_max_depth(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_hotkey() -> String {
    "Alt+Space".to_string()
}

fn default_max_results() -> usize {
    8
}

fn default_threshold() -> f64 {
    0.6
}

fn default_system() -> String {
    "system".to_string()
}

fn default_max_depth() -> usize {
    5
}

fn default_indexed_paths() -> Vec<String> {
    ["~/Documents", "~/Downloads", "~/Desktop"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_excluded_patterns() -> Vec<String> {
    [
        "node_modules",
        ".git",
        ".cache",
        "__pycache__",
        "target",
        ".DS_Store",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn web_search(name: &str, keyword: &str, url: &str, icon: &str) -> WebSearch {
    WebSearch {
        name: name.to_string(),
        keyword: keyword.to_string(),
        url: url.to_string(),
        icon: Some(icon.to_string()),
        requires_setup: false,
        instance: None,
    }
}

fn default_web_searches() -> Vec<WebSearch> {
    vec![
        web_search("Google", "g", "https://www.google.com/search?q={query}", "google"),
        web_search("DuckDuckGo", "ddg", "https://duckduckgo.com/?q={query}", "duckduckgo"),
        web_search(
            "YouTube",
            "yt",
            "https://www.youtube.com/results?search_query={query}",
            "youtube",
        ),
        web_search("GitHub", "gh", "https://github.com/search?q={query}", "github"),
        web_search(
            "Wikipedia",
            "wiki",
            "https://en.wikipedia.org/wiki/Special:Search?search={query}",
            "wikipedia",
        ),
        web_search(
            "Stack Overflow",
            "so",
            "https://stackoverflow.com/search?q={query}",
            "stackoverflow",
        ),
        WebSearch {
            requires_setup: true,
            ..web_search(
                "Jira",
                "jira",
                "https://{instance}.atlassian.net/browse/{query}",
                "jira",
            )
        },
    ]
}
