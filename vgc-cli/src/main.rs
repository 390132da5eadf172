//! vgc - Video Guide Curator
//!
//! Attended command-line front end for the curation engine: guide playlist
//! generation, model training sessions, playlist listing, and session
//! quota display. One process is one session; the quota ledger and session
//! exclusions live only as long as the process.

mod io;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use vgc_common::{config, Domain};
use vgc_engine::history::HistoryStore;
use vgc_engine::playlist::GuideBuilder;
use vgc_engine::provider::OperatorIo;
use vgc_engine::store::{self, ModelStore};
use vgc_engine::training::{TrainingContext, TrainingSession};
use vgc_engine::youtube::YouTubeProvider;
use vgc_engine::{ContentProvider, QuotaLedger};

use crate::io::StdOperatorIo;

#[derive(Parser)]
#[command(name = "vgc", about = "Search, rank, and curate game guide videos")]
struct Cli {
    /// Root folder for the database (overrides VGC_ROOT_FOLDER and config)
    #[arg(long)]
    root_folder: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Build a curated guide playlist for a game
    Generate,
    /// Run an interactive model training session
    Train,
    /// List your own playlists
    Playlists,
    /// Store the provider API key
    SetKey,
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    let root = config::resolve_root_folder(cli.root_folder.as_deref(), "VGC_ROOT_FOLDER")
        .map_err(|e| anyhow!("{e}"))?;
    config::ensure_root_folder(&root).map_err(|e| anyhow!("{e}"))?;
    let db_path = config::database_path(&root);
    info!(db = %db_path.display(), "Opening database");

    let pool = store::init_database_pool(&db_path).await?;
    let mut app = App {
        model_store: ModelStore::new(pool.clone()),
        history: HistoryStore::new(pool.clone()),
        pool,
        io: StdOperatorIo,
        ledger: QuotaLedger::new(),
        training_ctx: TrainingContext::new(),
    };

    match cli.command {
        Some(Command::Generate) => app.generate().await?,
        Some(Command::Train) => app.train().await?,
        Some(Command::Playlists) => app.list_playlists().await?,
        Some(Command::SetKey) => app.set_key().await?,
        None => app.menu().await?,
    }

    Ok(())
}

struct App {
    pool: sqlx::SqlitePool,
    model_store: ModelStore,
    history: HistoryStore,
    io: StdOperatorIo,
    ledger: QuotaLedger,
    training_ctx: TrainingContext,
}

impl App {
    /// Interactive main menu; one process keeps one quota session alive.
    async fn menu(&mut self) -> Result<()> {
        loop {
            self.io.say("\n=== Video Guide Curator ===");
            self.io.say("1. Generate guide playlist");
            self.io.say("2. Training session");
            self.io.say("3. List my playlists");
            self.io.say("4. Quota status");
            self.io.say("5. Set API key");
            self.io.say("6. Exit");

            let choice = self.io.ask("\nEnter choice (1-6): ").await?;
            let result = match choice.trim() {
                "1" => self.generate().await,
                "2" => self.train().await,
                "3" => self.list_playlists().await,
                "4" => {
                    self.show_quota();
                    Ok(())
                }
                "5" => self.set_key().await,
                "6" => return Ok(()),
                _ => {
                    self.io.say("Invalid choice");
                    Ok(())
                }
            };
            if let Err(e) = result {
                self.io.say(&format!("Error: {e}"));
            }
        }
    }

    async fn generate(&mut self) -> Result<()> {
        let provider = self.provider().await?;
        let (game_name, domain) = self.prompt_game().await?;

        let mut model = self.model_store.load(domain).await;
        if self.training_ctx.enter_game(&game_name, &mut model) {
            self.io
                .say("\nNew game detected, clearing session-specific exclusions...");
        }

        let builder = GuideBuilder {
            provider: &provider,
            io: &self.io,
            history: &self.history,
        };
        match builder
            .generate_guide(&mut self.ledger, &model, &game_name, domain)
            .await
        {
            Ok(Some(playlist_id)) => {
                info!(%playlist_id, game = %game_name, "Guide playlist created");
            }
            Ok(None) => {}
            Err(e) if e.is_quota_declined() => {
                self.io.say("Generation cancelled (quota charge declined)");
            }
            Err(e) => return Err(e.into()),
        }
        self.show_quota();
        Ok(())
    }

    async fn train(&mut self) -> Result<()> {
        let provider = self.provider().await?;
        let (game_name, domain) = self.prompt_game().await?;

        let mut model = self.model_store.load(domain).await;
        let mut session = TrainingSession {
            provider: &provider,
            store: &self.model_store,
            io: &self.io,
            ledger: &mut self.ledger,
        };
        match session
            .run(&game_name, domain, &mut model, &mut self.training_ctx)
            .await
        {
            Ok(outcome) => info!(?outcome, game = %game_name, "Training session finished"),
            Err(e) if e.is_quota_declined() => {
                self.io.say("Training cancelled (quota charge declined)");
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    async fn list_playlists(&mut self) -> Result<()> {
        let provider = self.provider().await?;
        let query = vgc_engine::orchestrator::PagedQuery::MyContainers;
        let playlists = vgc_engine::orchestrator::fetch_paginated(
            &provider,
            &query,
            &vgc_engine::orchestrator::FetchOptions::default(),
        )
        .await?;

        if playlists.is_empty() {
            self.io.say("\nNo playlists found.");
            return Ok(());
        }

        self.io.say(&format!("\nYour playlists ({}):", playlists.len()));
        for (index, playlist) in playlists.iter().enumerate() {
            self.io
                .say(&format!("{}. {} ({})", index + 1, playlist.title, playlist.id));
        }

        let recent = self.history.list().await;
        if !recent.is_empty() {
            self.io.say("\nRecently used:");
            for entry in recent {
                self.io.say(&format!("- {} ({})", entry.title, entry.id));
            }
        }
        Ok(())
    }

    async fn set_key(&mut self) -> Result<()> {
        let key = self.io.ask("Enter YouTube API key: ").await?;
        if key.is_empty() {
            self.io.say("No key entered");
            return Ok(());
        }
        store::set_api_key(&self.pool, &key).await?;
        self.io.say("API key stored");
        Ok(())
    }

    fn show_quota(&self) {
        let status = self.ledger.status();
        self.io.say(&format!(
            "\nQuota: {} used / {} total ({:.1}% of daily budget), {} remaining",
            status.used, status.total, status.percent_used, status.remaining
        ));
    }

    /// Construct the provider from stored credentials, prompting for a key
    /// on first use.
    async fn provider(&mut self) -> Result<impl ContentProvider> {
        let api_key = match store::get_api_key(&self.pool).await? {
            Some(key) => key,
            None => {
                self.io.say("\nNo API key stored yet.");
                let key = self.io.ask("Enter YouTube API key: ").await?;
                if key.is_empty() {
                    return Err(anyhow!("an API key is required"));
                }
                store::set_api_key(&self.pool, &key).await?;
                key
            }
        };
        let token = std::env::var("VGC_OAUTH_TOKEN").ok();
        Ok(YouTubeProvider::new(api_key, token).map_err(|e| anyhow!("{e}"))?)
    }

    async fn prompt_game(&mut self) -> Result<(String, Domain)> {
        let domain = loop {
            self.io.say("\nGame type:");
            self.io.say("1. Video Game");
            self.io.say("2. Board Game");
            match self.io.ask("\nChoose type (1-2): ").await?.trim() {
                "1" => break Domain::Video,
                "2" => break Domain::Board,
                _ => self.io.say("Invalid choice."),
            }
        };

        loop {
            let name = self.io.ask("\nEnter game name: ").await?;
            if !name.trim().is_empty() {
                return Ok((name.trim().to_string(), domain));
            }
            self.io.say("Game name cannot be empty");
        }
    }
}
