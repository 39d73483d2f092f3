use std::sync::Arc;

use clap::{Parser, Subcommand};

use behealthy::app;
use behealthy::client::{terminal, ChatForm, ChatLog, HttpTransport, NutritionChatClient};
use behealthy::config::AppConfig;
use behealthy::messages::dto::DEFAULT_HISTORY_LIMIT;
use behealthy::state::AppState;

#[derive(Parser)]
#[command(name = "behealthy")]
#[command(about = "Nutrition lookup service and chat client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the nutrition service (configured from the environment)
    Serve,
    /// Interactive chat: type `<food>` or `<food> | <grams>`
    Chat {
        #[arg(long, env = "NUTRITION_API_URL", default_value = "http://localhost:5000")]
        server: String,
    },
    /// Ask a single question and print the conversation
    Ask {
        /// Food to look up
        query: String,
        /// Weight in grams
        #[arg(long, short, default_value = "")]
        weight: String,
        #[arg(long, env = "NUTRITION_API_URL", default_value = "http://localhost:5000")]
        server: String,
    },
    /// Show the newest stored conversation lines
    History {
        #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT)]
        limit: i64,
        #[arg(long, env = "NUTRITION_API_URL", default_value = "http://localhost:5000")]
        server: String,
    },
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "behealthy=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn chat_client(server: &str) -> anyhow::Result<NutritionChatClient> {
    let transport = Arc::new(HttpTransport::new(server)?);
    let log = ChatLog::with_surface(Arc::new(terminal::TerminalSurface));
    Ok(NutritionChatClient::new(transport, log))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Commands::Serve => {
            let config = AppConfig::from_env()?;
            let addr = config.bind_addr();
            let state = AppState::init(&config).await?;
            app::serve(app::build_app(state), &addr).await?;
        }
        Commands::Chat { server } => {
            let client = Arc::new(chat_client(&server)?);
            terminal::run(client).await?;
        }
        Commands::Ask {
            query,
            weight,
            server,
        } => {
            let client = chat_client(&server)?;
            if !client.submit(&mut ChatForm::new(query, weight)).await {
                anyhow::bail!("query is empty");
            }
        }
        Commands::History { limit, server } => {
            let transport = HttpTransport::new(&server)?;
            let history = transport.history(limit).await?;
            for m in history.messages.iter().rev() {
                println!("[{}] {}: {}", m.created_at, m.role, m.text);
            }
        }
    }

    Ok(())
}
