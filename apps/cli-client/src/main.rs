use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use client_sdk::ViewerClient;
use common::{FileKey, TabGroupKind};
use tokio::task::JoinSet;
use viewer_core::{FetchOutcome, FetchTicket, Viewer, ViewerEvent};

#[derive(Debug, Parser)]
#[command(name = "paperview")]
#[command(about = "Read-only viewer for Paper server configuration and scripts")]
struct Cli {
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    server_url: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List every file key the server knows.
    Keys,
    /// Print one file.
    Get { key: String },
    /// Render both tab groups the way the web page does.
    View {
        #[arg(long)]
        config: Option<String>,
        #[arg(long)]
        script: Option<String>,
    },
    /// Print the server health report.
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = ViewerClient::new(&cli.server_url);

    match cli.command {
        Commands::Keys => print!("{}", render_keys()),
        Commands::Get { key } => match client.load(&key).await {
            FetchOutcome::Content(text) => print!("{text}"),
            outcome => {
                eprintln!("{}", outcome.panel_text());
                std::process::exit(1);
            }
        },
        Commands::View { config, script } => {
            let mut clicks = Vec::new();
            if let Some(key) = config {
                clicks.push(group_key(&key, TabGroupKind::Config)?);
            }
            if let Some(key) = script {
                clicks.push(group_key(&key, TabGroupKind::Scripts)?);
            }

            let viewer = run_viewer(&client, &clicks).await?;
            print!("{}", render_viewer(&viewer));
        }
        Commands::Health => {
            let health = client.health().await?;
            println!("{}", serde_json::to_string_pretty(&health)?);
        }
    }

    Ok(())
}

fn render_keys() -> String {
    FileKey::ALL
        .into_iter()
        .map(|key| {
            format!(
                "{:<18} {:<8} {}\n",
                key.as_str(),
                key.group().as_str(),
                key.label()
            )
        })
        .collect()
}

fn group_key(raw: &str, group: TabGroupKind) -> Result<FileKey> {
    let key = raw
        .parse::<FileKey>()
        .with_context(|| format!("cannot open '{raw}' in the {group} group"))?;
    if key.group() != group {
        bail!("key '{key}' belongs to the {} group, not {group}", key.group());
    }
    Ok(key)
}

/// Loads the page, applies `clicks` in order, and settles every fetch as it
/// completes. Fetches race; the viewer drops superseded results.
async fn run_viewer(client: &ViewerClient, clicks: &[FileKey]) -> Result<Viewer> {
    let mut viewer = Viewer::new();
    let mut tickets = viewer.handle(ViewerEvent::PageLoaded)?;
    for key in clicks {
        tickets.extend(viewer.handle(ViewerEvent::TabClicked(*key))?);
    }

    let mut fetches: JoinSet<(FetchTicket, FetchOutcome)> = JoinSet::new();
    for ticket in tickets {
        let client = client.clone();
        fetches.spawn(async move {
            let outcome = client.load(ticket.key.as_str()).await;
            (ticket, outcome)
        });
    }

    while let Some(joined) = fetches.join_next().await {
        let (ticket, outcome) = joined.context("fetch task failed")?;
        viewer.handle(ViewerEvent::FetchSettled(ticket, outcome))?;
    }

    Ok(viewer)
}

fn render_viewer(viewer: &Viewer) -> String {
    let mut out = String::new();
    for kind in TabGroupKind::ALL {
        let group = viewer.group(kind);
        let active = group.active().map(FileKey::as_str).unwrap_or("none");
        out.push_str(&format!("== {kind} [{active}] ==\n"));
        out.push_str(group.panel());
        if !group.panel().ends_with('\n') {
            out.push('\n');
        }
    }
    out
}
