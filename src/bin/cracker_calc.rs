//! Animal Cracker Calculator CLI
//!
//! Fetches a creature, weighs it in animal crackers and judges its
//! tire-changing talent. `assess` and `batch` work offline.
//!
//! Run with: cargo run --features cli --bin cracker_calc -- random

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use cracker_calc::batch::{assess_entries, load_profiles, summarize};
use cracker_calc::config::{DEFAULT_API_BASE_URL, DEFAULT_MAX_CREATURE_ID};
use cracker_calc::shell::{IdPicker, RandomIdPicker};
use cracker_calc::utils::format_grouped;
use cracker_calc::{
    CalcConfig, CreatureRecord, PokeApiSource, RuleChain, Shell, ShellState,
    DEFAULT_CRACKER_WEIGHT_G,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cracker_calc", version, about = "Weigh creatures in animal crackers")]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Settings {
    /// Reference animal cracker weight in grams
    #[arg(long, env = "CRACKER_WEIGHT_G", default_value_t = DEFAULT_CRACKER_WEIGHT_G, global = true)]
    cracker_weight: f64,

    #[arg(long, env = "POKEAPI_BASE_URL", default_value = DEFAULT_API_BASE_URL, global = true)]
    api_base_url: String,

    /// Highest creature id a random draw may pick
    #[arg(long, env = "MAX_CREATURE_ID", default_value_t = DEFAULT_MAX_CREATURE_ID, global = true)]
    max_id: u32,

    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value_t = 10, global = true)]
    timeout_secs: u64,

    /// JSON rule table replacing the standard chain
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch a random creature
    Random {
        /// Seed the id draw for a reproducible pick
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Fetch a creature by id
    Show { id: u32 },
    /// Assess a creature described on the command line
    Assess {
        #[arg(long)]
        mass_hg: f64,
        #[arg(long)]
        height_dm: f64,
        /// Type tag, repeatable. Lowercased to match upstream tags.
        #[arg(long = "type")]
        types: Vec<String>,
        /// Base stat as name=value, repeatable
        #[arg(long = "stat", value_parser = parse_stat)]
        stats: Vec<(String, i64)>,
    },
    /// Assess every profile in a JSON file
    Batch { file: PathBuf },
    /// Print the active rule table
    Rules,
}

fn parse_stat(raw: &str) -> Result<(String, i64), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))?;
    let value = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid value for {name}: {e}"))?;
    Ok((name.trim().to_string(), value))
}

impl Settings {
    fn config(&self) -> CalcConfig {
        CalcConfig {
            api_base_url: self.api_base_url.clone(),
            cracker_weight_g: self.cracker_weight,
            max_creature_id: self.max_id,
            http_timeout_secs: self.timeout_secs,
            ..CalcConfig::default()
        }
    }

    fn chain(&self) -> Result<RuleChain> {
        match &self.rules {
            Some(path) => RuleChain::load(path),
            None => Ok(RuleChain::standard()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("cracker_calc=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.settings.config();
    config.validate()?;
    let chain = cli.settings.chain()?;

    match cli.command {
        Command::Random { seed } => {
            let source = PokeApiSource::new(&config)?;
            let mut shell = Shell::from_config(&config, chain)?;
            match seed {
                Some(seed) => {
                    shell.fetch_next(&source, &mut RandomIdPicker::seeded(seed)).await;
                }
                None => {
                    // ThreadRng is not Send; draw before awaiting.
                    let id = RandomIdPicker::thread().pick(shell.max_creature_id());
                    shell.fetch_id(&source, id).await;
                }
            }
            print_shell(&shell, cli.settings.json)
        }
        Command::Show { id } => {
            let source = PokeApiSource::new(&config)?;
            let mut shell = Shell::from_config(&config, chain)?;
            shell.fetch_id(&source, id).await;
            print_shell(&shell, cli.settings.json)
        }
        Command::Assess { mass_hg, height_dm, types, stats } => {
            let mut record = CreatureRecord::new(mass_hg, height_dm);
            for t in &types {
                record.add_category(&t.to_lowercase());
            }
            for (name, value) in stats {
                record.attributes.insert(name, value);
            }

            let crackers = cracker_calc::to_novelty_units(mass_hg, config.cracker_weight_g)?;
            let assessment = chain.assess(&record)?;

            if cli.settings.json {
                let out = serde_json::json!({ "crackers": crackers, "assessment": assessment });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("In Animal Crackers: {} crackers", format_grouped(crackers));
                println!(
                    "Helpful: {}  (confidence {}/100)",
                    if assessment.helpful { "yes" } else { "no" },
                    assessment.display_confidence()
                );
                println!("{}", assessment.justification);
                for step in assessment.trace.iter().filter(|s| s.matched) {
                    println!("  {:<14} {:+4} → {}", step.rule, step.applied, step.score);
                }
            }
            Ok(())
        }
        Command::Batch { file } => {
            let entries = load_profiles(&file)
                .with_context(|| format!("Failed to load batch from {:?}", file))?;
            let rows = assess_entries(&chain, &entries, config.cracker_weight_g);
            let summary = summarize(&rows);

            if cli.settings.json {
                let out = serde_json::json!({ "rows": rows, "summary": summary });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                for row in &rows {
                    match (&row.assessment, &row.crackers) {
                        (Some(a), Some(c)) => println!(
                            "#{:<4} {:<16} {:>14} crackers  {:<3}  {}",
                            row.id,
                            row.name,
                            format_grouped(*c),
                            if a.helpful { "yes" } else { "no" },
                            a.justification
                        ),
                        _ => println!(
                            "#{:<4} {:<16} error: {}",
                            row.id,
                            row.name,
                            row.error.as_deref().unwrap_or("unknown")
                        ),
                    }
                }
                println!(
                    "\n{} creatures: {} helpful, {} unhelpful, {} failed (top rule: {})",
                    summary.total,
                    summary.helpful,
                    summary.unhelpful,
                    summary.failed,
                    summary.top_rule.as_deref().unwrap_or("-")
                );
            }
            Ok(())
        }
        Command::Rules => {
            println!("{}", serde_json::to_string_pretty(chain.rules())?);
            Ok(())
        }
    }
}

fn print_shell(shell: &Shell, json: bool) -> Result<()> {
    match shell.state() {
        ShellState::Loaded(card) => {
            if json {
                println!("{}", serde_json::to_string_pretty(card)?);
            } else {
                print!("{}", card.render_text());
            }
            Ok(())
        }
        ShellState::Failed { message, .. } => bail!("{}", message),
        ShellState::Idle | ShellState::Loading { .. } => bail!("no creature loaded"),
    }
}
