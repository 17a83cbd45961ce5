use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use briefing_core::{calendar, output, sectors, BriefingConfig};
use briefing_news::heuristics::{extract_names_from_title, extract_reason_from_title};
use briefing_news::{build_briefing, GoogleNewsClient};

mod logging;

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "briefing",
    about = "Morning market briefing — headlines, limit-up guesses, sectors",
    version,
    long_about = None,
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    generate: GenerateArgs,

    /// Config file (default: $BRIEFING_CONFIG or ~/.config/briefing/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging (overridden by RUST_LOG).
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch feeds and write the briefing (the default).
    Generate(GenerateArgs),

    /// Run the headline heuristics on titles without fetching anything.
    Parse {
        #[arg(required = true)]
        titles: Vec<String>,
    },

    /// Print the resolved configuration as TOML.
    Config,
}

#[derive(Args, Debug, Default)]
struct GenerateArgs {
    /// Output file (overrides [output] path).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Sector list JSON (overrides [output] sectors_path).
    #[arg(long)]
    sectors: Option<PathBuf>,

    /// Print the briefing to stdout instead of writing a file.
    #[arg(long)]
    stdout: bool,

    /// Never fetch article pages for titles that name no stock.
    #[arg(long)]
    no_article_fallback: bool,
}

// ─── Main ────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => BriefingConfig::load_from(path),
        None => BriefingConfig::load(),
    }
    .context("failed to load config")?;

    logging::init(cli.debug, &config.logging.level);

    match cli.command {
        None => generate(config, cli.generate).await?,
        Some(Commands::Generate(args)) => generate(config, args).await?,
        Some(Commands::Parse { titles }) => parse_titles(&titles)?,
        Some(Commands::Config) => print!("{}", config.to_toml()?),
    }

    Ok(())
}

async fn generate(mut config: BriefingConfig, args: GenerateArgs) -> Result<()> {
    let start = Instant::now();

    if let Some(path) = args.output {
        config.output.path = path;
    }
    if let Some(path) = args.sectors {
        config.output.sectors_path = path;
    }
    if args.no_article_fallback {
        config.limit_up.article_fallback = false;
    }

    let now = calendar::now_kst();
    let source = GoogleNewsClient::new(&config.news, &config.http)
        .context("failed to build HTTP client")?;
    let sectors = sectors::load_sectors(&config.output.sectors_path);

    let briefing = build_briefing(&source, &config, sectors, now).await;

    if args.stdout {
        println!("{}", output::to_json(&briefing)?);
    } else {
        output::write_briefing(&config.output.path, &briefing).with_context(|| {
            format!("failed to write {}", config.output.path.display())
        })?;
        println!("Wrote {}", config.output.path.display());
    }

    info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        limit_up = briefing.limit_up.len(),
        "briefing done"
    );
    Ok(())
}

fn parse_titles(titles: &[String]) -> Result<()> {
    let rows = titles
        .iter()
        .map(|title| {
            serde_json::json!({
                "title": title,
                "names": extract_names_from_title(title),
                "reason": extract_reason_from_title(title),
            })
        })
        .collect::<Vec<_>>();
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_flags_work_without_subcommand() {
        let cli = Cli::try_parse_from([
            "briefing",
            "--stdout",
            "--output",
            "x.json",
            "--sectors",
            "s.json",
            "--no-article-fallback",
        ])
        .unwrap();

        assert!(cli.command.is_none());
        assert!(cli.generate.stdout);
        assert!(cli.generate.no_article_fallback);
        assert_eq!(cli.generate.output, Some(PathBuf::from("x.json")));
        assert_eq!(cli.generate.sectors, Some(PathBuf::from("s.json")));
    }

    #[test]
    fn generate_subcommand_takes_same_flags() {
        let cli = Cli::try_parse_from(["briefing", "generate", "--stdout"]).unwrap();
        match cli.command {
            Some(Commands::Generate(args)) => assert!(args.stdout),
            _ => panic!("expected generate subcommand"),
        }
    }

    #[test]
    fn global_flags_reach_subcommands() {
        let cli =
            Cli::try_parse_from(["briefing", "parse", "풍산 상한가", "--debug"]).unwrap();
        assert!(cli.debug);
        assert!(matches!(cli.command, Some(Commands::Parse { ref titles }) if titles.len() == 1));
    }

    #[test]
    fn parse_requires_a_title() {
        assert!(Cli::try_parse_from(["briefing", "parse"]).is_err());
    }
}
