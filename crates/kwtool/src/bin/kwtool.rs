use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};
use kwtool::{best_keywords, find_repository, render};
use kwtool_repo::Repository;
use tracing_subscriber::EnvFilter;

/// Query keyword information for packages in a Gentoo repository
#[derive(Parser)]
#[clap(version)]
struct Opts {
    /// Repository to read, instead of $KWTOOL_REPO, $PORTDIR or /var/db/repos/gentoo
    #[clap(long, global = true)]
    repo: Option<PathBuf>,

    /// Log more; repeat for more detail. RUST_LOG takes precedence.
    #[clap(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[clap(subcommand)]
    subcmd: SubCommand,
}

#[derive(Parser)]
enum SubCommand {
    BestKeywords(BestKeywords),
}

/// Print the best keywords a package's dependencies allow, one per architecture
#[derive(Parser)]
struct BestKeywords {
    /// Atom or bare package name; the newest matching version is used
    query: String,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();
    init_tracing(opts.verbose);

    let root = find_repository(opts.repo)?;
    let repo = Repository::open(&root)
        .with_context(|| format!("failed to load repository {}", root.display()))?;

    match opts.subcmd {
        SubCommand::BestKeywords(args) => {
            let keywords = best_keywords(&repo, &args.query)?;
            println!("{}", render(keywords.as_ref()));
        }
    }

    Ok(())
}
