use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Context;
use lamp_client::LampApp;
use lamp_common::{ClientConfig, SettingsField, TransportKind};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};

const HELP: &str = "commands: on | off | toggle | poll | mode <name> | set <field> <value> | save | reset | reload | show | help | quit";

pub async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config_path = std::env::var("LAMP_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./lamp.json"));
    let mut config = load_config(&config_path).await.unwrap_or_else(|err| {
        warn!("failed to load config from {}: {err:#}", config_path.display());
        ClientConfig::default()
    });
    apply_env_overrides(&mut config);

    let mut app = LampApp::new(config);
    app.start().await;

    let mut stdout = tokio::io::stdout();
    stdout.write_all(format!("{HELP}\n").as_bytes()).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("failed to read stdin")?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };

        match handle_command(&app, line.trim()).await {
            Reply::Quit => break,
            Reply::Text(text) => {
                stdout.write_all(format!("{text}\n").as_bytes()).await?;
            }
            Reply::View => {
                let view = app.view().await;
                let body = serde_json::to_string_pretty(&view)?;
                stdout.write_all(format!("{body}\n").as_bytes()).await?;
            }
        }
        stdout.flush().await?;
    }

    app.stop();
    info!("bye");
    Ok(())
}

enum Reply {
    View,
    Text(String),
    Quit,
}

async fn handle_command(app: &LampApp, line: &str) -> Reply {
    let mut parts = line.splitn(3, char::is_whitespace);
    let command = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).unwrap_or_default();
    let rest = parts.next().map(str::trim).unwrap_or_default();

    match command {
        "" | "show" => {}
        "on" => {
            app.status().request_led_state(true).await;
        }
        "off" => {
            app.status().request_led_state(false).await;
        }
        "toggle" => {
            app.status().toggle().await;
        }
        "poll" => {
            app.status().poll().await;
        }
        "mode" if !arg.is_empty() => {
            if !app.mode().select(arg).await {
                return Reply::Text(app.mode().view().await.hint.to_string());
            }
        }
        "set" => match SettingsField::parse(arg, rest) {
            Some(field) => {
                app.settings().edit([field]).await;
            }
            None => return Reply::Text(format!("unknown setting {arg:?} or value {rest:?}")),
        },
        "save" => {
            app.settings().save().await;
        }
        "reset" => app.settings().reset().await,
        "reload" => {
            app.settings().load().await;
        }
        "quit" | "exit" => return Reply::Quit,
        _ => return Reply::Text(HELP.to_string()),
    }
    Reply::View
}

async fn load_config(path: &Path) -> anyhow::Result<ClientConfig> {
    match tokio::fs::read(path).await {
        Ok(raw) => serde_json::from_slice::<ClientConfig>(&raw)
            .with_context(|| format!("invalid config json in {}", path.display())),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(ClientConfig::default()),
        Err(err) => Err(err.into()),
    }
}

fn apply_env_overrides(config: &mut ClientConfig) {
    if let Ok(url) = std::env::var("LAMP_URL") {
        config.base_url = Some(url);
    }
    match std::env::var("LAMP_TRANSPORT").as_deref() {
        Ok("live") => config.transport = Some(TransportKind::Live),
        Ok("simulated") | Ok("mock") => config.transport = Some(TransportKind::Simulated),
        Ok(other) => warn!("ignoring unknown LAMP_TRANSPORT={other}"),
        Err(_) => {}
    }
    if let Some(ms) = std::env::var("LAMP_POLL_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
    {
        config.poll_interval_ms = ms;
    }
}
