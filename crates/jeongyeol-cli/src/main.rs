use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use jeongyeol_chat::ChatClient;
use jeongyeol_store::KnowledgeBase;
use tracing_subscriber::EnvFilter;

mod display;
mod page;
mod serve;

#[derive(Parser)]
#[command(name = "jeongyeol", version, about = "Approval-authority reference browser")]
struct Cli {
    /// Directory holding the rule documents
    #[arg(
        long,
        global = true,
        env = "JEONGYEOL_KNOWLEDGE_BASE",
        default_value = "knowledge_base"
    )]
    knowledge_base: PathBuf,

    #[command(subcommand)]
    command: Command,
}

/// Connection settings for the conversational API.
#[derive(Args, Debug, Clone, Default)]
struct ChatArgs {
    #[arg(long, env = "MISO_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "MISO_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

impl ChatArgs {
    fn client(&self) -> Result<ChatClient, jeongyeol_chat::ChatError> {
        ChatClient::from_settings(self.api_url.as_deref(), self.api_key.as_deref())
    }
}

#[derive(Subcommand)]
enum Command {
    /// Serve the reference page and JSON API
    Serve {
        #[arg(long, env = "JEONGYEOL_HOST", default_value = "0.0.0.0")]
        host: String,

        #[arg(long, env = "JEONGYEOL_PORT", default_value_t = 5000)]
        port: u16,

        #[command(flatten)]
        chat: ChatArgs,
    },
    /// Rule counts per section
    Summary,
    /// Print one section as a card
    Show {
        /// Tab id, display name, or file stem (e.g. tab-purchase, 구매, 03_구매)
        key: String,
    },
    /// Write the assembled payload as JSON to stdout
    Export {
        #[arg(long)]
        pretty: bool,
    },
    /// Ask the conversational API one question
    Ask {
        message: String,

        #[arg(long)]
        conversation_id: Option<String>,

        #[command(flatten)]
        chat: ChatArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let root = cli.knowledge_base;
    let open = || {
        KnowledgeBase::open(&root)
            .with_context(|| format!("opening knowledge base {}", root.display()))
    };

    match cli.command {
        Command::Serve { host, port, chat } => {
            let client = match chat.client() {
                Ok(client) => Some(client),
                Err(e) => {
                    tracing::warn!(error = %e, "chat endpoint disabled");
                    None
                }
            };
            serve::run(&format!("{host}:{port}"), open()?, client).await
        }
        Command::Summary => {
            print!("{}", display::summary(&open()?.assemble()));
            Ok(())
        }
        Command::Show { key } => {
            let section = open()?
                .section(&key)?
                .with_context(|| format!("no document present for {key}"))?;
            print!("{}", display::section_card(&section));
            Ok(())
        }
        Command::Export { pretty } => {
            let reference = open()?.assemble();
            let json = if pretty {
                serde_json::to_string_pretty(&reference)?
            } else {
                serde_json::to_string(&reference)?
            };
            println!("{json}");
            Ok(())
        }
        Command::Ask {
            message,
            conversation_id,
            chat,
        } => {
            let client = chat.client()?;
            let reply = client.ask(&message, conversation_id.as_deref()).await?;
            println!("{}", reply.message);
            if !reply.conversation_id.is_empty() {
                println!();
                println!("conversation_id: {}", reply.conversation_id);
            }
            Ok(())
        }
    }
}
