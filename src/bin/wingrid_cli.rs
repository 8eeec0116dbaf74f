//! CLI tool for wingrid - projects a data file through the grid and prints
//! the nine regions
//!
//! Usage:
//!   wingrid_cli <data.csv|data.tsv|data.json>            # Text grid to stdout
//!   wingrid_cli <data> --config cfg.json --top 40        # Custom layout, scrolled
//!   wingrid_cli <data> --json                            # Projection as JSON
//!   wingrid_cli <data> -v                                # Debug logging to stderr

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::rc::Rc;

use simplelog::{Config, LevelFilter, SimpleLogger};
use wingrid::csv::{parse_delimited, Delimiter};
use wingrid::{ColumnBand, DataMatrix, Region, RowBand, Table, TableConfig, WingridError};

const USAGE: &str =
    "Usage: wingrid_cli <data.csv|data.json> [--config cfg.json] [--top N] [--left N] [--json] [-v]";

struct Args {
    input: String,
    config: Option<String>,
    top: Option<usize>,
    left: Option<usize>,
    json: bool,
    verbose: u8,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut input = None;
    let mut parsed = Args {
        input: String::new(),
        config: None,
        top: None,
        left: None,
        json: false,
        verbose: 0,
    };
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => parsed.config = Some(next_value(&mut iter, arg)?),
            "--top" => parsed.top = Some(parse_offset(&next_value(&mut iter, arg)?)?),
            "--left" => parsed.left = Some(parse_offset(&next_value(&mut iter, arg)?)?),
            "--json" => parsed.json = true,
            "-v" => parsed.verbose += 1,
            "-vv" => parsed.verbose += 2,
            flag if flag.starts_with('-') => return Err(format!("Unknown option {flag}")),
            path => input = Some(path.to_string()),
        }
    }
    parsed.input = input.ok_or_else(|| USAGE.to_string())?;
    Ok(parsed)
}

fn next_value<'a>(iter: &mut impl Iterator<Item = &'a String>, flag: &str) -> Result<String, String> {
    iter.next()
        .cloned()
        .ok_or_else(|| format!("{flag} needs a value"))
}

fn parse_offset(value: &str) -> Result<usize, String> {
    value
        .parse()
        .map_err(|_| format!("Invalid offset {value}"))
}

fn load_data(path: &str) -> Result<DataMatrix, WingridError> {
    let bytes = fs::read(path)?;
    let is_json = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Ok(serde_json::from_slice(&bytes)?)
    } else {
        Ok(parse_delimited(&bytes, Delimiter::for_path(path)))
    }
}

fn load_config(path: Option<&str>) -> Result<TableConfig, WingridError> {
    match path {
        Some(path) => TableConfig::from_json(&fs::read_to_string(path)?),
        None => Ok(TableConfig::default()),
    }
}

fn cell_text(table: &Table, region: Region, row: usize, col: usize) -> String {
    table
        .region(region)
        .cell(row, col)
        .filter(|cell| cell.data.is_some())
        .map(|cell| cell.value.to_string())
        .unwrap_or_default()
}

/// Render the regions as a text grid: column names, then the header, middle
/// and footer rows, each prefixed by its row number when enabled.
fn render_text(table: &Table) -> String {
    let width = 10;
    let partition = table.partition();
    let row_numbers = partition.has_row_numbers();
    let mut out = String::new();

    if partition.show_column_names() {
        if row_numbers {
            out.push_str(&format!("{:>5} ", ""));
        }
        for (i, band) in ColumnBand::ALL.into_iter().enumerate() {
            if i > 0 {
                out.push_str("| ");
            }
            for name in table.column_names(band) {
                out.push_str(&format!("{name:<width$.width$} "));
            }
        }
        out.push('\n');
    }

    for rows in RowBand::ALL {
        let numbers = table.row_numbers(rows);
        for r in 0..partition.row_count(rows) {
            if row_numbers {
                let number = numbers.get(r).map(ToString::to_string).unwrap_or_default();
                out.push_str(&format!("{number:>5} "));
            }
            for (i, columns) in ColumnBand::ALL.into_iter().enumerate() {
                if i > 0 {
                    out.push_str("| ");
                }
                let region = Region::new(rows, columns);
                for c in 0..partition.column_count(columns) {
                    let text = cell_text(table, region, r, c);
                    out.push_str(&format!("{text:<width$.width$} "));
                }
            }
            out.push('\n');
        }
        if rows != RowBand::Footer && partition.row_count(rows) > 0 {
            out.push_str(&"-".repeat(out.lines().last().map_or(0, str::len)));
            out.push('\n');
        }
    }
    out
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let args = match parse_args(&args) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    };

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let _ = SimpleLogger::init(level, Config::default());

    let data = match load_data(&args.input) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error loading {}: {}", args.input, e);
            std::process::exit(1);
        }
    };
    let mut config = match load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };
    if args.top.is_some() {
        config.scroll_top_position = args.top;
    }
    if args.left.is_some() {
        config.scroll_left_position = args.left;
    }

    let table = Table::new(config, Rc::new(data));
    log::debug!(
        "projected {} cells at offset {:?}",
        table.projection().cell_count(),
        table.scroll_position()
    );

    let output = if args.json {
        match serde_json::to_string_pretty(table.projection()) {
            Ok(j) => j,
            Err(e) => {
                eprintln!("Error serializing JSON: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        render_text(&table)
    };

    io::stdout().write_all(output.as_bytes()).unwrap();
    println!();
}
