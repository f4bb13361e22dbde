//! Jar of Awesome bot binary.
//!
//! Start the bot with:
//! ```bash
//! TELEGRAM_BOT_TOKEN=xxx TELEGRAM_USER_ID=123 cargo run -p jar-telegram
//! ```
//!
//! Or serve the HTTP trigger endpoint for an external cron service:
//! ```bash
//! cargo run -p jar-telegram -- --http --port 8080
//! ```

use std::sync::Arc;

use clap::Parser;
use teloxide::Bot;
use tracing_subscriber::EnvFilter;

use jar_core::config::Settings;
use jar_core::render::{GenerativeRenderer, PregeneratedRenderer, Renderer};
use jar_core::{load_milestones, load_pregenerated, ConfigError};
use jar_telegram::server::{self, AppState};
use jar_telegram::{create_shared_state, DeliveryPipeline, MilestoneBot, TelegramMessenger};

/// Jar of Awesome - a bot that delivers your own milestones back to you
#[derive(Parser, Debug)]
#[command(name = "jar-telegram")]
#[command(about = "Telegram bot that delivers your recorded milestones back to you")]
struct Args {
    /// Serve the HTTP trigger endpoint instead of long polling
    /// (for an external scheduler such as a managed cron service)
    #[arg(long)]
    http: bool,

    /// HTTP port for --http mode (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load environment variables from a local .env file if present.
    let _ = dotenvy::from_filename(".env.local").or_else(|_| dotenvy::dotenv());

    let settings = Settings::from_env()?;

    // Initialize logging from verbosity flags, with JAR_DEBUG as a floor.
    let filter = match (args.verbose, settings.debug) {
        (0, false) => "jar_telegram=info,jar_core=info,teloxide=warn",
        (0, true) | (1, _) => "jar_telegram=debug,jar_core=debug,teloxide=info",
        (2, _) => "jar_telegram=trace,jar_core=trace,teloxide=debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load the jar. A missing file is fatal with a descriptive message.
    let milestones = Arc::new(load_milestones(&settings.milestone_file)?);
    tracing::info!(
        milestones = milestones.len(),
        categories = milestones.categories().len(),
        "jar loaded"
    );
    let mut stats = milestones.category_stats();
    stats.sort_by(|a, b| b.1.cmp(&a.1));
    for (category, count) in stats.iter().take(5) {
        tracing::info!(category = %category, count = *count, "category");
    }

    // Choose the rendering strategy.
    let renderer: Arc<dyn Renderer> = if settings.use_pregenerated {
        let pregenerated = load_pregenerated(&settings.pregenerated_file)?;
        tracing::info!(
            messages = pregenerated.len(),
            "pregenerated mode, no generation API needed"
        );
        Arc::new(PregeneratedRenderer::new(&pregenerated))
    } else {
        let api_key = settings
            .anthropic_api_key
            .clone()
            .ok_or(ConfigError::MissingVar("ANTHROPIC_API_KEY"))?;
        tracing::info!(model = %settings.model, "generative mode");
        Arc::new(GenerativeRenderer::new(api_key, settings.model.clone()))
    };

    let bot = Bot::new(settings.telegram_bot_token.clone());
    let messenger = Arc::new(TelegramMessenger::new(bot.clone()));
    let pipeline = DeliveryPipeline::new(
        milestones,
        renderer,
        messenger,
        settings.telegram_user_id,
        settings.utc_offset,
    );
    let state = create_shared_state(pipeline, &settings);

    if args.http {
        let port = args.port.unwrap_or(settings.port);
        println!("\n[jar] Jar of Awesome trigger endpoint");
        println!("   Port: {}", port);
        println!("   POST /cron/send-milestone to deliver\n");
        server::serve(port, AppState { bot_state: state }).await?;
    } else {
        let milestone_bot = MilestoneBot::new(bot, state.clone());
        match milestone_bot.get_me().await {
            Ok(username) => {
                tracing::info!(username = %username, "bot initialized");
                println!("\n[jar] Jar of Awesome Bot");
                println!("   Bot: @{}", username);
                println!("   Deliveries: {}", state.schedule_display());
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to get bot info");
                return Err(e.into());
            }
        }

        println!("\n[phone] Open Telegram and send /start to begin");
        println!("   Press Ctrl+C to stop\n");

        milestone_bot.start_polling().await?;
    }

    Ok(())
}
