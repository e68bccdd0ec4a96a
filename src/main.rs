// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

mod catalog;
mod cli;
mod collector;
mod config;
mod error;
mod expr;
mod matching;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use catalog::Request;
use cli::Args;
use collector::Client;
use output::{LongFormatter, TableFormatter};

/// Initialize stderr logging; --debug widens the default filter,
/// RUST_LOG overrides it entirely.
fn init_logging(debug: bool) {
    let filter = if debug { "gridq=debug" } else { "gridq=warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    // Positional argument and --pool are equivalent; positional wins.
    let pool = args.pool_arg.as_deref().or(args.pool.as_deref());
    let endpoint = config::resolve_endpoint(pool)?;
    debug!(%endpoint, "resolved collector endpoint");

    let client = Client::new(endpoint);
    let ads = client.fetch_sites()?;

    let request = Request::new(args.cpus, args.memory, args.vo.clone());
    let predicates = matching::enabled_predicates(&request, args.walltime, args.requirements);
    let matched = matching::filter(catalog::resources(ads), predicates);

    if args.long {
        for resource in matched {
            println!("{}\n", LongFormatter::format(&resource?));
        }
    } else {
        // Table layout needs every surviving row before it can print.
        let resources = matched.collect::<error::Result<Vec<_>>>()?;
        let width = args.width.unwrap_or_else(output_width);
        println!("{}", TableFormatter::format(&resources, width));
    }

    Ok(())
}

/// Current terminal width, or 80 when stdout is not a terminal.
fn output_width() -> usize {
    let term = console::Term::stdout();
    if term.is_term() {
        term.size().1 as usize
    } else {
        80
    }
}
