use anyhow::Result;
use clap::Parser;
use log::LevelFilter;
use otimer_client::{ClientHandle, SessionClient};
use otimer_core::ClientSettings;
use std::path::PathBuf;
use std::process::ExitCode;

mod login;
mod prompt;
mod render;

#[derive(Parser, Debug)]
#[clap(
    name = "odoo-timer",
    version,
    about = "Log in to an Odoo server and list your project tasks"
)]
struct Cli {
    #[clap(long, help = "Server base address, e.g. https://my.odoo.com")]
    url: Option<String>,

    #[clap(long, short, help = "Database name")]
    database: Option<String>,

    #[clap(long, short, help = "Login name")]
    username: Option<String>,

    #[clap(long, help = "YAML file with client settings (timeout, user agent, task limit)")]
    settings: Option<PathBuf>,

    #[clap(long, short, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let log_level_filter = cli.log_level.parse().unwrap_or(LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(log_level_filter)
        .target(env_logger::Target::Stderr)
        .init();

    let settings = ClientSettings::load(cli.settings.as_deref()).await?;
    let config = prompt::collect_credentials(prompt::KnownFields {
        url: cli.url,
        database: cli.database,
        username: cli.username,
    })?;

    let handle = ClientHandle::spawn(SessionClient::http(settings)?);

    let mut terminal = prompt::TerminalPrompt;
    if login::login_until_accepted(&handle, config, &mut terminal)
        .await?
        .is_none()
    {
        return Ok(ExitCode::FAILURE);
    }

    // a failed listing is reported by its own error line
    let outcome = handle.fetch_tasks().await;
    for line in render::listing_lines(&outcome) {
        println!("{}", line);
    }

    Ok(if outcome.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
