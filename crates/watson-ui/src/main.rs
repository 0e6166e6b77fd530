//! Watson launcher - console driver.
//!
//! Runs the launcher against the in-process backend. Each stdin line is a
//! keystroke ("down", "shift+tab", "n") or a command:
//!
//! - `type <text>`: type each character
//! - `title <text>` / `content <text>`: edit the open note
//! - `scratch <text>`: write the scratchpad
//! - `show`, `hide`, `reindex`, `quit`
//!
//! The launcher state is printed after every line.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use watson_core::{launcher_config_path, load_config, LauncherConfig};
use watson_ui::{KeymapRegistry, Keystroke, Launcher, LocalBackend, ViewMode};

// =============================================================================
// Configuration
// =============================================================================

/// Load launcher.toml, falling back to defaults on any error.
fn load_launcher_config() -> LauncherConfig {
    match launcher_config_path() {
        Some(path) if path.exists() => tracing::info!("Loading config from: {}", path.display()),
        _ => tracing::info!("No launcher.toml found - using default configuration"),
    }

    match load_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{} - continuing with default configuration", e);
            LauncherConfig::default()
        }
    }
}

fn build_keymap(config: &LauncherConfig) -> KeymapRegistry {
    let mut keymap = KeymapRegistry::with_defaults();
    for e in keymap.apply_config(&config.keymap) {
        tracing::warn!("Skipping keybinding: {}", e);
    }
    tracing::info!("Keymap: {} bindings", keymap.binding_count());
    keymap
}

// =============================================================================
// Driver
// =============================================================================

fn render(launcher: &Launcher, window: &LocalBackend) {
    let height = launcher.window_height();
    let state = launcher.state();

    let mode = match state.mode() {
        ViewMode::Results => "results".to_string(),
        ViewMode::Settings => "settings".to_string(),
        ViewMode::Scratchpad => format!("scratchpad: {:?}", state.scratch_content()),
        ViewMode::NoteEditor(editor) => format!(
            "note editor ({}): {:?}",
            editor.note().map_or("new", |note| note.id.as_str()),
            editor.draft.title
        ),
    };

    println!("[{}] query={:?} height={}", mode, state.query(), height);
    if !window.is_visible() {
        println!("(window hidden, last height {})", window.height());
    }
    for (i, result) in state.results().iter().enumerate() {
        let marker = if i == state.selected_index() { '>' } else { ' ' };
        println!("{} {} - {}", marker, result.name, result.description);
    }
}

/// Handle one input line. Returns false to stop.
async fn handle_line(launcher: &Launcher, line: &str) -> bool {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));

    match command {
        "quit" | "exit" => return false,
        "show" => launcher.show().await,
        "hide" => launcher.hide().await,
        "reindex" => {
            launcher.reindex_apps().await;
            launcher.reindex_files().await;
        }
        "type" => {
            for c in rest.chars() {
                launcher.handle_key(&Keystroke::typed(c)).await;
            }
        }
        "title" => launcher.set_note_title(rest),
        "content" => launcher.set_note_content(rest),
        "scratch" => launcher.save_scratchpad(rest).await,
        _ => match Keystroke::parse(line) {
            Ok(keystroke) => {
                let outcome = launcher.handle_key(&keystroke).await;
                tracing::debug!("{} -> {:?}", keystroke, outcome);
            }
            Err(e) => eprintln!("{}", e),
        },
    }
    true
}

async fn run(launcher: Launcher, window: Arc<LocalBackend>) -> std::io::Result<()> {
    launcher.initialize().await;
    launcher.show().await;
    render(&launcher, &window);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !handle_line(&launcher, line).await {
            break;
        }
        render(&launcher, &window);
    }
    Ok(())
}

// =============================================================================
// Entry Point
// =============================================================================

fn main() {
    // Logs go to stderr; stdout carries the rendered state.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Watson launcher starting...");

    let config = load_launcher_config();
    let keymap = build_keymap(&config);

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to create tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    let backend = Arc::new(LocalBackend::new());
    let launcher = Launcher::new(backend.clone())
        .with_layout(config.layout)
        .with_keymap(keymap);

    if let Err(e) = rt.block_on(run(launcher, backend)) {
        tracing::error!("Input error: {}", e);
        std::process::exit(1);
    }
}
