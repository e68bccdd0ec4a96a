// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "gridq")]
#[command(author, version, about = "Query a collector for schedulable grid resources")]
pub struct Args {
    /// Requested CPU count
    #[arg(long, default_value_t = 1, value_name = "N")]
    pub cpus: i64,

    /// Requested memory in MB
    #[arg(long, default_value_t = 1, value_name = "MB")]
    pub memory: i64,

    /// Requested wall time in minutes (0 = unconstrained)
    #[arg(long, default_value_t = 0, value_name = "MINUTES")]
    pub walltime: i64,

    /// Only show resources whose AllowedVOs admit this affiliation tag
    #[arg(long, value_name = "TAG")]
    pub vo: Option<String>,

    /// Evaluate each resource's Requirements expression against the request
    #[arg(long)]
    pub requirements: bool,

    /// Output width (default: terminal width, or 80)
    #[arg(long, value_name = "COLS")]
    pub width: Option<usize>,

    /// Collector to query, as HOST[:PORT]
    #[arg(long, value_name = "HOST[:PORT]")]
    pub pool: Option<String>,

    /// Print full resource records instead of a table
    #[arg(short, long)]
    pub long: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Collector to query, as HOST[:PORT] (same as --pool)
    #[arg(value_name = "HOST[:PORT]")]
    pub pool_arg: Option<String>,
}
