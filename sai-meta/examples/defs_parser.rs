use std::time::Instant;

use clap::Parser;
use sai_meta::{MetadataRegistry, ObjectType, Registry};

use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::prelude::*;

// Simple program loading an attribute definition file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Definition file to open
    name: String,

    /// Print the value kind of this `OBJECT_TYPE:ATTR_ID` pair after loading
    #[arg(short, long, value_name = "OT:ID")]
    query: Option<String>,

    #[arg(short, long)]
    log_level: Option<LevelFilter>,
}

fn main() -> miette::Result<()> {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(stdout_log.with_filter(args.log_level.unwrap_or(LevelFilter::INFO)))
        .init();

    let start = Instant::now();
    let registry = Registry::load(&args.name)?;
    info!(
        "{} attributes loaded in {:?}",
        registry.len(),
        start.elapsed()
    );

    if let Some(query) = args.query {
        let Some((ot, id)) = query.split_once(':') else {
            return Err(miette::miette!("query must be OBJECT_TYPE:ATTR_ID"));
        };

        let ot = ot.trim().parse::<i32>().map_err(|e| miette::miette!("{e}"))?;
        let id = id.trim().parse::<u32>().map_err(|e| miette::miette!("{e}"))?;

        match registry.lookup(ObjectType(ot), id) {
            Some(md) => println!("{md}"),
            None => println!("attribute {id} of object type {ot} not found"),
        }
    }

    Ok(())
}
