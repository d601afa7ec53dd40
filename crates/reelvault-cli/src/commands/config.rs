use crate::output::Output;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use serde_json::json;
use watchlist_sync_config::{Config, PathManager, SessionStore};

pub async fn run_config(cmd: crate::ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        crate::ConfigCommands::Show { full } => show_config(full, output).await,
        crate::ConfigCommands::Server { url } => set_server(url, output).await,
    }
}

async fn show_config(full: bool, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    let config_file = paths.config_file();
    let config = Config::load_or_default(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

    let mut session_store = SessionStore::new(paths.session_file());
    session_store.load().ok();
    let session = session_store.session();

    match output.format() {
        crate::output::OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }

            let mut table = Table::new();
            table.set_header(vec![
                Cell::new("Setting").add_attribute(comfy_table::Attribute::Bold),
                Cell::new("Value").add_attribute(comfy_table::Attribute::Bold),
            ]);
            table.add_row(vec![
                Cell::new("Config file"),
                Cell::new(config_file.display().to_string()),
            ]);
            table.add_row(vec![
                Cell::new("Server URL"),
                Cell::new(&config.server.base_url),
            ]);
            table.add_row(vec![
                Cell::new("Request timeout"),
                Cell::new(format!("{}s", config.server.timeout_secs)),
            ]);
            table.add_row(vec![
                Cell::new("Pull on login"),
                Cell::new(config.sync.pull_on_login.to_string()),
            ]);
            match &session {
                Some(session) => {
                    let token_display = if full {
                        session.token.clone()
                    } else {
                        mask_string(&session.token)
                    };
                    table.add_row(vec![Cell::new("Signed in as"), Cell::new(&session.user.email)]);
                    table.add_row(vec![Cell::new("Token"), Cell::new(token_display)]);
                }
                None => {
                    table.add_row(vec![Cell::new("Session"), Cell::new("not signed in")]);
                }
            }
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            println!("{}", table);
        }
        _ => {
            output.json(&json!({
                "config_file": config_file.display().to_string(),
                "server": {
                    "base_url": config.server.base_url,
                    "timeout_secs": config.server.timeout_secs,
                },
                "sync": {
                    "pull_on_login": config.sync.pull_on_login,
                },
                "signed_in_as": session.as_ref().map(|s| s.user.email.clone()),
            }));
        }
    }

    Ok(())
}

async fn set_server(url: String, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    let config_file = paths.config_file();

    let mut config = Config::load_or_default(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
    config.server.base_url = url;
    config
        .validate()
        .map_err(|e| color_eyre::eyre::eyre!("Invalid configuration: {}", e))?;
    config
        .save_to_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save config to {}: {}", config_file.display(), e))?;

    output.success(format!("Server URL set to {}", config.server.base_url));
    Ok(())
}

fn mask_string(s: &str) -> String {
    if s.len() <= 4 {
        "****".to_string()
    } else {
        format!("{}****", &s[..4])
    }
}
