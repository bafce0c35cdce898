//! Command-line front-end for a running Post Optimizer API.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Days, NaiveDateTime, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use post_optimizer::client::{
    AccountSession, ClientError, Composer, DedupPolicy, GatewayClient, GenerationState, PostGateway,
    GENERIC_FAILURE_MESSAGE,
};
use post_optimizer::generation::tone::Tone;

#[derive(Parser, Debug)]
#[command(name = "post-optimizer")]
#[command(version)]
#[command(about = "Rewrite rough drafts into zero-cringe posts.", long_about = None)]
struct Cli {
    /// Root URL of the Post Optimizer API
    #[arg(long, env = "POST_OPTIMIZER_API_URL", default_value = "http://localhost:8080")]
    api_url: String,

    /// Seconds to wait for any single gateway call
    #[arg(long, env = "POST_OPTIMIZER_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Where the account session is stored
    #[arg(
        long,
        env = "POST_OPTIMIZER_SESSION_FILE",
        default_value = ".post-optimizer-session.json"
    )]
    session_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate rewritten variants of a draft
    Generate {
        /// The rough draft to rewrite
        #[arg(short, long)]
        draft: String,

        /// Persona: Builder, Student or Founder
        #[arg(short, long, default_value = "Builder")]
        tone: Tone,

        /// Ask for extra hashtags for every variant
        #[arg(long)]
        boost: bool,

        /// Treat #Tag and #tag as the same hashtag
        #[arg(long)]
        ignore_case: bool,

        /// Schedule a variant (RFC 3339 or YYYY-MM-DDTHH:MM in UTC; default tomorrow 09:00)
        #[arg(long, num_args = 0..=1, default_missing_value = "tomorrow")]
        schedule: Option<String>,

        /// Which variant to schedule, starting at 1
        #[arg(long, default_value_t = 1)]
        pick: usize,
    },

    /// Suggest hashtags for finished post text
    Hashtags {
        #[arg(short, long)]
        content: String,
    },

    /// Mark the account as connected
    Connect { profile_url: String },

    /// Forget the connected account
    Disconnect,

    /// Show whether an account is connected
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let timeout = Duration::from_secs(cli.timeout_secs);
    let gateway = Arc::new(GatewayClient::new(&cli.api_url, timeout)?);
    let mut session = AccountSession::load(&cli.session_file)
        .with_context(|| format!("Failed to read {}", cli.session_file.display()))?;

    match cli.command {
        Commands::Generate {
            draft,
            tone,
            boost,
            ignore_case,
            schedule,
            pick,
        } => {
            let policy = if ignore_case {
                DedupPolicy::CaseInsensitive
            } else {
                DedupPolicy::CaseSensitive
            };
            // Bad scheduling input must fail before any paid call.
            let schedule = schedule_request(schedule.as_deref(), pick, Utc::now())?;
            let composer = Composer::new(gateway)
                .with_timeout(timeout)
                .with_dedup_policy(policy);
            tokio::select! {
                result = run_generate(&composer, &draft, tone, boost, schedule) => result?,
                _ = tokio::signal::ctrl_c() => {
                    composer.cancel_generation();
                    if let GenerationState::Ready(cards) = composer.state() {
                        for index in 0..cards.len() {
                            composer.cancel_boost(index);
                        }
                    }
                    bail!("Cancelled");
                }
            }
            if session.is_connected() {
                println!("Connected as {}", session.profile_url().unwrap_or("unknown profile"));
            }
        }
        Commands::Hashtags { content } => {
            for tag in gateway.suggest_hashtags(&content).await {
                println!("{tag}");
            }
        }
        Commands::Connect { profile_url } => {
            session.connect(&profile_url)?;
            println!("Connected {profile_url} (saved to {})", session.path().display());
        }
        Commands::Disconnect => {
            session.disconnect()?;
            println!("Disconnected");
        }
        Commands::Status => match session.profile_url() {
            Some(url) if session.is_connected() => println!("Connected as {url}"),
            _ => println!("Not connected"),
        },
    }

    Ok(())
}

/// Validated `--schedule` / `--pick`: the time and the zero-based variant index.
fn schedule_request(
    schedule: Option<&str>,
    pick: usize,
    now: DateTime<Utc>,
) -> Result<Option<(DateTime<Utc>, usize)>> {
    let Some(when) = schedule else {
        return Ok(None);
    };
    let Some(index) = pick.checked_sub(1) else {
        bail!("--pick starts at 1");
    };
    Ok(Some((parse_schedule_time(when, now)?, index)))
}

async fn run_generate(
    composer: &Composer,
    draft: &str,
    tone: Tone,
    boost: bool,
    schedule: Option<(DateTime<Utc>, usize)>,
) -> Result<()> {
    match composer.generate(draft, tone).await {
        Ok(_) => {}
        Err(ClientError::Cancelled) => bail!("Cancelled"),
        Err(_) => bail!(GENERIC_FAILURE_MESSAGE),
    }
    let GenerationState::Ready(cards) = composer.state() else {
        bail!(GENERIC_FAILURE_MESSAGE);
    };

    // The variant count is only known once the model has answered.
    if let Some((_, index)) = schedule {
        if index >= cards.len() {
            bail!("--pick must be between 1 and {}", cards.len());
        }
    }

    for (index, card) in cards.iter().enumerate() {
        if boost {
            composer.boost_hashtags(index).await?;
        }
        println!("── Option {:02} ──", index + 1);
        println!("{}", composer.full_text(index)?);
        println!("Why it works: {}\n", card.post.tone_explanation);
    }

    if let Some((at, index)) = schedule {
        let scheduled = composer.schedule(&cards[index].post, at);
        println!(
            "Scheduled option {:02} for {} (id {})",
            index + 1,
            scheduled.scheduled_date.to_rfc3339(),
            scheduled.id
        );
        for entry in composer.scheduled_posts() {
            println!(
                "  {}  {}",
                entry.scheduled_date.format("%a %d %b %H:%M UTC"),
                entry.post.headline
            );
        }
    }

    Ok(())
}

/// `tomorrow` (09:00 UTC the next day), an RFC 3339 timestamp, or a bare
/// `YYYY-MM-DDTHH:MM` read as UTC.
fn parse_schedule_time(raw: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("tomorrow") {
        let nine = NaiveTime::from_hms_opt(9, 0, 0).context("invalid default time")?;
        let day = now
            .date_naive()
            .checked_add_days(Days::new(1))
            .context("date out of range")?;
        return Ok(day.and_time(nine).and_utc());
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .map(|naive| naive.and_utc())
        .with_context(|| format!("Unrecognised schedule time '{raw}'"))
}
