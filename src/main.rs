use anyhow::Result;
use clap::Parser;
use postcraft::api::{self, AppState};
use postcraft::config::Config;
use postcraft::fallback::FallbackOrchestrator;
use postcraft::history::{HistoryStore, SavedPost};
use postcraft::prompts::{build_hook_prompt, build_post_prompt};
use postcraft::types::{HooksPayload, PostLength, PostsPayload, Tone};
use postcraft::validation::{GenerateRequest, HookRequest, validate_generate, validate_hook};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "postcraft",
    about = "AI LinkedIn post generator — multi-provider fallback over Kimi and OpenRouter"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the HTTP API server
    Serve {
        /// Path to config file
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,

        /// Bind address override, e.g. 0.0.0.0:8787
        #[arg(long)]
        bind: Option<String>,
    },

    /// Generate posts for a topic and print them as JSON
    Generate {
        /// Topic to write about
        topic: String,

        /// Writing tone
        #[arg(long, value_enum, default_value = "professional")]
        tone: Tone,

        /// Target post length
        #[arg(long, value_enum, default_value = "medium")]
        length: PostLength,

        /// Reference post for brand-voice mimicry
        #[arg(long)]
        reference_post: Option<String>,

        /// Post structure template: story-lesson, contrarian-take, listicle, how-to
        #[arg(long)]
        template: Option<String>,

        /// Save generated posts to local history
        #[arg(long)]
        save: bool,

        /// Path to config file
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,
    },

    /// Generate 3 alternative hooks for an existing post body
    Hooks {
        /// The post body to write hooks for
        body: String,

        /// Writing tone
        #[arg(long, value_enum, default_value = "professional")]
        tone: Tone,

        /// Path to config file
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,
    },

    /// Manage the local saved-post history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(clap::Subcommand)]
enum HistoryAction {
    /// Print saved posts as JSON
    List,
    /// Remove a saved post by id
    Remove { id: String },
    /// Toggle the favorite flag on a saved post
    Favorite { id: String },
    /// Delete all saved posts
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "postcraft=info".parse().unwrap()),
        )
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { config, bind } => {
            let cfg = Config::load(&config).unwrap_or_default();
            let bind = bind.unwrap_or_else(|| cfg.server.bind.clone());
            let orchestrator = FallbackOrchestrator::from_config(&cfg)?;
            let state = Arc::new(AppState { orchestrator });
            api::serve(state, &bind).await?;
            Ok(())
        }
        Command::Generate {
            topic,
            tone,
            length,
            reference_post,
            template,
            save,
            config,
        } => {
            let cfg = Config::load(&config).unwrap_or_default();
            let request = GenerateRequest {
                topic,
                tone: tone.as_str().into(),
                length: Some(length.as_str().into()),
                reference_post,
                template_id: template,
            };
            let validated = validate_generate(&request)?;

            let prompts = build_post_prompt(
                &validated.topic,
                validated.tone,
                validated.length,
                validated.reference_post.as_deref(),
                validated.template_id.as_deref(),
            );

            let orchestrator = FallbackOrchestrator::from_config(&cfg)?;
            let outcome = orchestrator
                .generate::<PostsPayload>(&prompts.system, &prompts.user)
                .await?;

            if save {
                let store = HistoryStore::open_default();
                for draft in &outcome.payload.posts {
                    store.save_post(SavedPost::from_draft(
                        draft,
                        &validated.topic,
                        validated.tone,
                    ))?;
                }
            }

            let json = serde_json::to_string_pretty(&json!({
                "posts": outcome.payload.posts,
                "modelUsed": outcome.model_used,
            }))?;
            println!("{json}");
            Ok(())
        }
        Command::Hooks { body, tone, config } => {
            let cfg = Config::load(&config).unwrap_or_default();
            let request = HookRequest {
                body,
                tone: tone.as_str().into(),
            };
            let validated = validate_hook(&request)?;
            let prompts = build_hook_prompt(&validated.body, validated.tone);
            let orchestrator = FallbackOrchestrator::from_config(&cfg)?;
            let outcome = orchestrator
                .generate::<HooksPayload>(&prompts.system, &prompts.user)
                .await?;

            let json = serde_json::to_string_pretty(&json!({
                "hooks": outcome.payload.hooks,
                "modelUsed": outcome.model_used,
            }))?;
            println!("{json}");
            Ok(())
        }
        Command::History { action } => {
            let store = HistoryStore::open_default();
            match action {
                HistoryAction::List => {
                    let posts = store.load();
                    println!("{}", serde_json::to_string_pretty(&posts)?);
                }
                HistoryAction::Remove { id } => {
                    store.remove(&id)?;
                    println!("Removed {id}");
                }
                HistoryAction::Favorite { id } => match store.toggle_favorite(&id)? {
                    Some(true) => println!("Favorited {id}"),
                    Some(false) => println!("Unfavorited {id}"),
                    None => println!("No saved post with id {id}"),
                },
                HistoryAction::Clear => {
                    store.clear()?;
                    println!("History cleared");
                }
            }
            Ok(())
        }
    }
}
