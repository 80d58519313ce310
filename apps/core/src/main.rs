// RealTalk command-line entry point

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use realtalk_core::config::AppConfig;
use realtalk_core::database::SqliteUsageLedger;
use realtalk_core::llm::OpenRouterClient;
use realtalk_core::models::{RewriteRequest, SmoothRequest};
use realtalk_core::rewrite::RewriteMode;
use realtalk_core::risk::{AnalysisInput, RiskAnalyzer, RiskContext};
use realtalk_core::telemetry::init_tracing;
use realtalk_core::usage::{InMemoryUsageLedger, Plan, UsageLedger};
use realtalk_core::RewriteService;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "realtalk")]
#[command(about = "Assess and rewrite messages before you send them", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the risk engine only (no model call, no usage charge)
    Assess {
        text: String,
        #[arg(short, long)]
        platform: Option<String>,
        /// Page URL the draft was written on
        #[arg(short, long)]
        url: Option<String>,
    },
    /// Produce three rewrite alternatives
    Rewrite {
        text: String,
        #[arg(long)]
        user: String,
        #[arg(short, long)]
        platform: Option<String>,
        #[arg(short, long)]
        url: Option<String>,
        /// Force a mode, e.g. deEscalation
        #[arg(short, long)]
        mode: Option<RewriteMode>,
        /// Use the safest strategy regardless of mode
        #[arg(long)]
        panic: bool,
    },
    /// Produce a single polished message
    Smooth {
        text: String,
        #[arg(long)]
        user: String,
        /// 0 = friendly, 100 = firm
        #[arg(short, long, default_value = "50")]
        tone: u8,
    },
    /// Show, or change, a user's monthly allowance
    Usage {
        #[arg(long)]
        user: String,
        #[arg(long)]
        set_plan: Option<Plan>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env().context("Failed to load configuration")?;
    init_tracing(config.log_format, "info")?;

    let cli = Cli::parse();

    match cli.command {
        Command::Assess { text, platform, url } => {
            let input = AnalysisInput {
                text: Some(text),
                platform,
                context: RiskContext { url },
            };
            print_json(&RiskAnalyzer::new().assess_input(&input))?;
        }
        Command::Rewrite {
            text,
            user,
            platform,
            url,
            mode,
            panic,
        } => {
            let service = build_service(&config).await?;
            let response = service
                .rewrite(RewriteRequest {
                    text,
                    user_id: user,
                    platform,
                    url,
                    mode,
                    panic,
                })
                .await?;
            print_json(&response)?;
        }
        Command::Smooth { text, user, tone } => {
            let service = build_service(&config).await?;
            let response = service
                .smooth(SmoothRequest {
                    text,
                    user_id: user,
                    tone_value: tone,
                })
                .await?;
            print_json(&response)?;
        }
        Command::Usage { user, set_plan } => {
            let ledger = build_ledger(&config).await?;
            let status = match set_plan {
                Some(plan) => ledger.set_plan(&user, plan).await?,
                None => ledger.check_usage(&user).await?,
            };
            print_json(&status)?;
        }
    }

    Ok(())
}

async fn build_ledger(config: &AppConfig) -> Result<Arc<dyn UsageLedger>> {
    match &config.database_url {
        Some(url) => {
            let ledger = SqliteUsageLedger::connect(url, config.limits)
                .await
                .context("Failed to open usage database")?;
            Ok(Arc::new(ledger))
        }
        None => {
            info!("DATABASE_URL not set; usage is tracked in memory for this run only");
            Ok(Arc::new(InMemoryUsageLedger::new(config.limits)))
        }
    }
}

async fn build_service(config: &AppConfig) -> Result<RewriteService> {
    let llm = OpenRouterClient::new(&config.llm)?;
    let ledger = build_ledger(config).await?;
    // Room for every rate-limit retry plus its backoff.
    let deadline = config.llm.timeout * config.llm.max_retries + Duration::from_secs(10);
    Ok(RewriteService::new(Arc::new(llm), ledger, deadline))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
