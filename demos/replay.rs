use std::fs;
use std::io;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tab_hash::Config;
use tab_hash::Event;
use tab_hash::HashTable;
use tab_hash::TabulationHasher;
use tab_hash::command::parse_commands;

/// Replays a command file against a table and writes the execution log.
#[derive(Parser, Debug)]
struct Args {
    /// Command file, one `INC|BUS|REM <key>` per line.
    input: PathBuf,

    /// Where to write the execution log. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    #[arg(short = 'c', long = "capacity", default_value_t = 4)]
    capacity: usize,

    #[arg(short = 'g', long = "grow_threshold", default_value_t = 0.75)]
    grow_threshold: f64,

    #[arg(short = 's', long = "shrink_threshold", default_value_t = 0.25)]
    shrink_threshold: f64,

    /// Seed for the hash tables. Seeds from OS entropy when omitted.
    #[arg(long = "seed")]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;

    let config = Config::default()
        .with_capacity(args.capacity)
        .with_grow_threshold(args.grow_threshold)
        .with_shrink_threshold(args.shrink_threshold);
    let hasher = match args.seed {
        Some(seed) => TabulationHasher::with_seed(seed),
        None => TabulationHasher::default(),
    };
    let mut table = HashTable::with_observer(config, hasher, Vec::<Event>::new())?;

    for command in parse_commands(&text) {
        let command = command.with_context(|| format!("parsing {}", args.input.display()))?;
        table.apply(command);
    }

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            fs::File::create(path).with_context(|| format!("creating {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    for event in table.observer() {
        writeln!(out, "{event}")?;
    }
    out.flush()?;

    eprintln!(
        "{} keys in {} slots ({} tombstones)",
        table.len(),
        table.capacity(),
        table.tombstones()
    );

    #[cfg(feature = "stats")]
    {
        table.debug_stats().print();
        table.print_probe_histogram();
    }

    Ok(())
}
