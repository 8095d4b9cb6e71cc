use orbview::command::ConsoleCommand;
use orbview::config::AppConfig;
use orbview::logging;
use orbview::{HeadlessScene, HttpSatelliteClient, SessionView, VisibilitySession};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = if std::path::Path::new(&config_path).exists() {
        AppConfig::from_file(&config_path)?
    } else {
        eprintln!("{} not found, using defaults", config_path);
        AppConfig::default()
    };

    let _logging_guard = logging::init_logging(&config.log_dir, "orbview", &config.log_level)?;

    tracing::info!("Orbview starting...");

    let client = Arc::new(HttpSatelliteClient::new(&config.service)?);
    let scene = HeadlessScene::new(&config.scene);
    let session = Arc::new(VisibilitySession::from_config(client, scene, &config));

    // Print every newly published session
    let mut updates = session.subscribe();
    tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            println!("{}", SessionView::render(&snapshot));
        }
    });

    println!("{}", ConsoleCommand::help_text());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match ConsoleCommand::parse(&line) {
            ConsoleCommand::Submit(a, b) => {
                // Spawned so a newer line can supersede it
                let session = session.clone();
                tokio::spawn(async move {
                    if let Err(e) = session.submit(&a, &b).await {
                        println!("{}", e);
                    }
                });
            }
            ConsoleCommand::Focus(slot) => match session.focus(slot).await {
                Ok(true) => println!("Camera moved to satellite {}", slot),
                Ok(false) => println!("Satellite {} has no position to focus on", slot),
                Err(e) => tracing::error!("Focus failed: {}", e),
            },
            ConsoleCommand::Show => println!("{}", SessionView::render(&session.current())),
            ConsoleCommand::Help => println!("{}", ConsoleCommand::help_text()),
            ConsoleCommand::Quit => break,
            ConsoleCommand::Unknown(text) => {
                println!("Unrecognized input {:?}", text);
                println!("{}", ConsoleCommand::help_text());
            }
        }
    }

    tracing::info!("Orbview shutting down");
    Ok(())
}
