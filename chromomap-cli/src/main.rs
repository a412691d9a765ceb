use std::collections::{BTreeSet, HashSet};
use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use chromomap_core::io::{read_table_file, write_segments, write_segments_file, TableOptions};
use chromomap_core::{ChromosomeKey, LayoutFilter, LayoutResult, RowError, Session};

mod config;
use config::Config;

#[derive(Parser)]
#[command(name = "chromomap")]
#[command(about = "Chromosome map layout and statistics for DNA comparison segments")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Optional chromomap.toml with layout parameters and
    /// chromosome-length overrides
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Field delimiter of the input table
    #[arg(short, long, global = true, default_value = ";")]
    delimiter: char,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the layout and write it as JSON for an external renderer
    Layout {
        /// Input segment table (Chr;Start;End;Comparison), .gz accepted
        input: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only these chromosomes, e.g. "1,2,X"
        #[arg(long)]
        chromosomes: Option<String>,

        /// Only these comparison labels, comma-separated
        #[arg(long)]
        labels: Option<String>,
    },

    /// Print the coverage statistics table
    Stats {
        input: PathBuf,

        #[arg(long)]
        chromosomes: Option<String>,

        #[arg(long)]
        labels: Option<String>,
    },

    /// Re-emit the normalized segment table
    Export {
        input: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Delimiter for the output table
        #[arg(long, default_value = ";")]
        output_delimiter: char,
    },

    /// Validate a segment table and report per-row errors
    Check { input: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let options = TableOptions {
        delimiter: cli.delimiter,
    };

    match cli.command {
        Commands::Layout {
            input,
            output,
            chromosomes,
            labels,
        } => {
            let filter = parse_filter(chromosomes.as_deref(), labels.as_deref())?;
            let mut session = load_session(&input, &config, &options)?;
            let result = session.render(&filter)?;
            report_dropped(&result);
            let json = serde_json::to_string_pretty(&result)?;
            match output {
                Some(path) => std::fs::write(&path, json)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => println!("{}", json),
            }
        }

        Commands::Stats {
            input,
            chromosomes,
            labels,
        } => {
            let filter = parse_filter(chromosomes.as_deref(), labels.as_deref())?;
            let mut session = load_session(&input, &config, &options)?;
            let result = session.render(&filter)?;
            report_dropped(&result);
            print_stats(&result)?;
        }

        Commands::Export {
            input,
            output,
            output_delimiter,
        } => {
            let session = load_session(&input, &config, &options)?;
            let out_options = TableOptions {
                delimiter: output_delimiter,
            };
            match output {
                Some(path) => {
                    write_segments_file(&path, session.segments().iter(), &out_options)?
                }
                None => {
                    let stdout = std::io::stdout();
                    write_segments(stdout.lock(), session.segments().iter(), &out_options)?;
                }
            }
        }

        Commands::Check { input } => {
            let report = read_table_file(&input, &options)?;
            print_row_errors(&report.errors);
            println!(
                "{} row(s) read, {} valid, {} rejected",
                report.rows_read,
                report.segments.len(),
                report.errors.len()
            );
            if !report.errors.is_empty() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Import the table into a fresh session configured from the TOML file.
fn load_session(input: &PathBuf, config: &Config, options: &TableOptions) -> Result<Session> {
    let mut session = Session::with_lengths(config.chromosome_lengths()?);
    session.set_params(config.layout_params());

    let report = read_table_file(input, options)?;
    print_row_errors(&report.errors);
    for segment in report.segments {
        session.add_segment(segment);
    }
    Ok(session)
}

fn parse_filter(chromosomes: Option<&str>, labels: Option<&str>) -> Result<LayoutFilter> {
    let chromosomes = match chromosomes {
        Some(list) => {
            let mut set = BTreeSet::new();
            for token in list.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                let key: ChromosomeKey = match token.parse() {
                    Ok(key) => key,
                    Err(_) => bail!("invalid chromosome in --chromosomes: {:?}", token),
                };
                set.insert(key);
            }
            Some(set)
        }
        None => None,
    };

    let labels = labels.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect::<HashSet<_>>()
    });

    Ok(LayoutFilter {
        chromosomes,
        labels,
    })
}

fn print_row_errors(errors: &[RowError]) {
    for RowError { row, error } in errors {
        eprintln!("warning: row {}: {}", row, error);
    }
}

fn report_dropped(result: &LayoutResult) {
    if result.dropped > 0 {
        eprintln!(
            "warning: {} segment(s) dropped: chromosome not in the length table",
            result.dropped
        );
    }
}

fn print_stats(result: &LayoutResult) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(
        stdout,
        "{:<20} {:>4} {:>9} {:>14} {:>9}",
        "Comparison", "Chr", "Segments", "Total bp", "Coverage"
    )?;
    for stat in &result.stats {
        writeln!(
            stdout,
            "{:<20} {:>4} {:>9} {:>14} {:>8.2}%",
            stat.label,
            stat.chromosome.to_string(),
            stat.segment_count,
            stat.total_length,
            stat.coverage_pct
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_parsing() {
        let filter = parse_filter(Some("1, 2,X"), Some("a,b")).unwrap();
        let chromosomes = filter.chromosomes.unwrap();
        assert!(chromosomes.contains(&ChromosomeKey::Autosome(1)));
        assert!(chromosomes.contains(&ChromosomeKey::X));
        assert_eq!(chromosomes.len(), 3);
        assert_eq!(filter.labels.unwrap().len(), 2);

        assert!(parse_filter(Some("1,chr2"), None).is_err());

        let open = parse_filter(None, None).unwrap();
        assert!(open.chromosomes.is_none());
        assert!(open.labels.is_none());
    }
}
