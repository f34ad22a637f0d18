use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use emoji_cli::download::download;
use emoji_cli::render::{render_gallery, render_item};
use emoji_cli::{GallerySync, HttpGalleryApi};

#[derive(Debug, Parser)]
#[command(name = "emoji-cli", version, about = "Generate emojis and follow the shared gallery")]
struct Cli {
    /// Base URL of the emoji-maker service.
    #[arg(long, env = "EMOJI_CLI_BASE_URL", default_value = "http://localhost:3000")]
    base_url: String,
    /// Session token issued by the identity provider.
    #[arg(long, env = "EMOJI_CLI_SESSION_TOKEN", hide_env_values = true)]
    session_token: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate an emoji from a prompt.
    Generate { prompt: String },
    /// Print the gallery, newest first.
    Gallery,
    /// Print the gallery, then follow new emojis until interrupted.
    Watch,
    /// Toggle the like flag on an emoji.
    Like { id: i64 },
    /// Save an emoji image as `emoji.png`.
    Download {
        url: String,
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,emoji_cli=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let api = Arc::new(HttpGalleryApi::new(
        reqwest::Client::new(),
        &cli.base_url,
        cli.session_token,
    )?);

    match cli.command {
        Command::Generate { prompt } => {
            let url = api.generate(&prompt).await?;
            println!("{url}");
        }
        Command::Gallery => {
            let sync = GallerySync::new(api);
            sync.load().await?;
            println!("{}", render_gallery(&sync.items()));
        }
        Command::Watch => {
            let sync = GallerySync::new(api);
            sync.load().await?;
            println!("{}", render_gallery(&sync.items()));

            let mut subscription = sync.subscribe_inserts().await?;
            loop {
                tokio::select! {
                    insert = subscription.next_insert() => match insert {
                        Some(record) => println!("{}", render_item(&record)),
                        None => break,
                    },
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
            subscription.close();
        }
        Command::Like { id } => {
            let sync = GallerySync::new(api);
            match sync.toggle_like(id).await {
                Some(record) => println!("{}", render_item(&record)),
                None => std::process::exit(1),
            }
        }
        Command::Download { url, dir } => {
            let path = download(api.as_ref(), &url, &dir).await?;
            println!("{}", path.display());
        }
    }

    Ok(())
}
