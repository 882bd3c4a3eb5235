mod config;

use bristle_humanize::Humanizer;
use bristle_reply::Responder;
use bristle_score::ScoreEngine;
use clap::{Parser, Subcommand};
use config::BristleConfig;
use serde::Deserialize;

#[derive(Parser)]
#[command(name = "bristle")]
#[command(about = "Score sender behavior for bot likelihood and humanize outbound text")]
struct Cli {
    #[arg(
        short = 'f',
        long,
        global = true,
        default_value = "bristle.toml",
        help = "Path to config file"
    )]
    config: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Score {
        #[arg(short, long, help = "Sender identifier")]
        sender: String,
        #[arg(short, long, help = "Message text to score")]
        text: String,
        #[arg(long, default_value = "0", help = "Observation timestamp in seconds")]
        now: f64,
        #[arg(long, help = "Emit the result as JSON")]
        json: bool,
    },
    Replay {
        #[arg(help = "JSON-lines file of {sender, text, ts?} records")]
        file: String,
        #[arg(
            long,
            default_value = "0",
            help = "Refit the novelty detector every N records (0 = never)"
        )]
        retrain_every: u64,
        #[arg(long, help = "Emit one JSON line per record")]
        json: bool,
    },
    Humanize {
        #[arg(short, long, help = "Text to perturb")]
        text: String,
        #[arg(long, help = "RNG seed for reproducible output")]
        seed: Option<u64>,
    },
    Reply {
        #[arg(short, long, help = "Incoming message text")]
        text: String,
        #[arg(short, long, default_value = "friendly", help = "Reply persona")]
        persona: String,
        #[arg(long, help = "RNG seed for reproducible output")]
        seed: Option<u64>,
        #[arg(long, help = "Cycle category messages in order instead of sampling")]
        sequential: bool,
    },
}

#[derive(Deserialize)]
struct ReplayRecord {
    sender: String,
    text: String,
    ts: Option<f64>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bristle=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match BristleConfig::from_file(&cli.config) {
        Err(e) => Err(format!("failed to load config {}: {}", cli.config, e).into()),
        Ok(cfg) => match cli.command {
            Commands::Score {
                sender,
                text,
                now,
                json,
            } => run_score(cfg, sender, text, now, json),
            Commands::Replay {
                file,
                retrain_every,
                json,
            } => run_replay(cfg, file, retrain_every, json),
            Commands::Humanize { text, seed } => run_humanize(cfg, text, seed),
            Commands::Reply {
                text,
                persona,
                seed,
                sequential,
            } => run_reply(cfg, text, persona, seed, sequential),
        },
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run_score(
    cfg: BristleConfig,
    sender: String,
    text: String,
    now: f64,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = ScoreEngine::new(cfg.score);
    let result = engine.observe_and_score(&sender, &text, now);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let verdict = if engine.classify(result.score) {
        "bot"
    } else {
        "human"
    };
    println!("score: {:.2}", result.score);
    println!("verdict: {}", verdict);
    println!("reasons: {}", result.reasons.join(", "));
    Ok(())
}

fn run_replay(
    cfg: BristleConfig,
    file: String,
    retrain_every: u64,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = ScoreEngine::new(cfg.score);
    let content = std::fs::read_to_string(&file)?;

    let mut records = 0u64;
    for (file_line, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let record: ReplayRecord =
            serde_json::from_str(line).map_err(|e| format!("line {}: {}", file_line + 1, e))?;

        // a missing timestamp falls back to the record index as seconds
        let now = record.ts.unwrap_or(records as f64);
        let result = engine.observe_and_score(&record.sender, &record.text, now);
        records += 1;

        if json {
            println!(
                "{}",
                serde_json::json!({
                    "sender": record.sender,
                    "score": result.score,
                    "reasons": result.reasons,
                })
            );
        } else {
            let marker = if engine.classify(result.score) {
                "!"
            } else {
                "ok"
            };
            println!(
                "  [{}] {:.2} {} - {}",
                marker,
                result.score,
                record.sender,
                result.reasons.join(" | ")
            );
        }

        if retrain_every > 0 && records % retrain_every == 0 {
            engine.refit_detector();
        }
    }

    let stats = engine.stats();
    if json {
        println!("{}", serde_json::to_string(&stats)?);
    } else {
        println!("\n--- replay summary ---");
        println!("records: {}", stats.messages_observed);
        println!("senders: {}", stats.senders);
        println!("flagged: {}", stats.flagged);
        println!("training samples: {}", stats.training_samples);
        println!(
            "detector: {}",
            if stats.detector_ready {
                "ready"
            } else {
                "untrained"
            }
        );
    }

    Ok(())
}

fn run_humanize(
    cfg: BristleConfig,
    text: String,
    seed: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut humanizer = match seed {
        Some(seed) => Humanizer::seeded(cfg.humanizer, seed),
        None => Humanizer::new(cfg.humanizer),
    };
    println!("{}", humanizer.apply(&text));
    Ok(())
}

fn run_reply(
    cfg: BristleConfig,
    text: String,
    persona: String,
    seed: Option<u64>,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut responder = match seed {
        Some(seed) => Responder::seeded(&cfg.reply, Humanizer::seeded(cfg.humanizer, seed), seed)?,
        None => Responder::new(&cfg.reply, Humanizer::new(cfg.humanizer))?,
    };
    let reply = if sequential {
        responder.respond_in_order(&text, &persona)
    } else {
        responder.respond(&text, &persona)
    };
    println!("{}", reply);
    Ok(())
}
