//! soundex-csv CLI - Add German Soundex columns to CSV files
//!
//! ```bash
//! soundex-csv run kunden.csv -c Name,Ort   # Write kunden_soundex.csv
//! soundex-csv run kunden.csv               # Pick columns interactively
//! soundex-csv columns kunden.csv           # Show encoding, delimiter, columns
//! soundex-csv encode Meyer Maier --explain # Encode words, show rule steps
//! soundex-csv serve                        # Start HTTP server (port 3000)
//! ```

use clap::{Parser, Subcommand};
use soundex_csv::{
    classify, german_soundex, inspect_csv, normalize_trace, parse_delimiter, server::start_server,
    soundex_csv, transform::format_delimiter, ColumnClass, TransformOptions,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "soundex-csv")]
#[command(about = "Add German-phonetics Soundex columns to CSV files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add Soundex columns to a CSV file
    Run {
        /// Input CSV file
        input: PathBuf,

        /// Comma-separated columns to encode (interactive picker if omitted)
        #[arg(short, long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Output file (default: <input>_soundex.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Suffix for Soundex column names
        #[arg(short, long)]
        suffix: Option<String>,

        /// CSV delimiter, e.g. ';' or 'tab' (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<String>,
    },

    /// Show encoding, delimiter and columns of a CSV file
    Columns {
        /// Input CSV file
        input: PathBuf,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<String>,
    },

    /// Encode words and print their Soundex codes
    Encode {
        /// Words to encode
        #[arg(required = true)]
        words: Vec<String>,

        /// Print every normalization step
        #[arg(long)]
        explain: bool,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            input,
            columns,
            output,
            suffix,
            delimiter,
        } => cmd_run(&input, columns, output, suffix, delimiter.as_deref()),

        Commands::Columns { input, delimiter } => cmd_columns(&input, delimiter.as_deref()),

        Commands::Encode { words, explain } => cmd_encode(&words, explain),

        Commands::Serve { port } => cmd_serve(port).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn delimiter_arg(value: Option<&str>) -> CliResult<Option<char>> {
    match value {
        None => Ok(None),
        Some(v) => parse_delimiter(v)
            .map(Some)
            .ok_or_else(|| format!("Invalid delimiter '{}': expected one character or 'tab'", v).into()),
    }
}

fn cmd_run(
    input: &Path,
    columns: Vec<String>,
    output: Option<PathBuf>,
    suffix: Option<String>,
    delimiter: Option<&str>,
) -> CliResult<()> {
    let mut options = TransformOptions::from_env();
    if let Some(d) = delimiter_arg(delimiter)? {
        options.delimiter = Some(d);
    }
    if let Some(s) = suffix {
        options.suffix = s;
    }
    options.output_path = output;

    let columns = if columns.is_empty() {
        pick_columns(input, options.delimiter)?
    } else {
        columns
    };

    let result = soundex_csv(input, &columns, &options)?;
    println!("{}", result.output_path.display());
    Ok(())
}

/// Console column picker: list numbered columns, read a selection.
fn pick_columns(input: &Path, delimiter: Option<char>) -> CliResult<Vec<String>> {
    let info = inspect_csv(input, delimiter)?;

    eprintln!("Columns in {}:", input.display());
    for (i, name) in info.headers.iter().enumerate() {
        eprintln!("  {:>3}. {}", i + 1, name);
    }
    eprint!("Columns to encode (numbers or names, comma-separated): ");
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    let picked = resolve_selection(&line, &info.headers)?;
    if picked.is_empty() {
        return Err("No columns selected".into());
    }
    Ok(picked)
}

/// Map `1,3` or `Name,Ort` (or a mix) onto column names.
fn resolve_selection(line: &str, headers: &[String]) -> CliResult<Vec<String>> {
    line.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|item| -> CliResult<String> {
            match item.parse::<usize>() {
                Ok(n) if n >= 1 && n <= headers.len() => Ok(headers[n - 1].clone()),
                Ok(n) if !headers.iter().any(|h| h == item) => {
                    Err(format!("Column number {} out of range 1-{}", n, headers.len()).into())
                }
                _ => Ok(item.to_string()),
            }
        })
        .collect()
}

fn cmd_columns(input: &Path, delimiter: Option<&str>) -> CliResult<()> {
    let info = inspect_csv(input, delimiter_arg(delimiter)?)?;

    println!("Encoding:  {}", info.encoding);
    println!("Delimiter: '{}'", format_delimiter(info.delimiter));
    println!("Rows:      {}", info.row_count);
    println!("Columns:");
    for (i, name) in info.headers.iter().enumerate() {
        println!("  {:>3}. {}", i + 1, name);
    }
    Ok(())
}

fn cmd_encode(words: &[String], explain: bool) -> CliResult<()> {
    for word in words {
        match classify(Some(word.as_str())) {
            ColumnClass::Phonetic => {
                let (normalized, steps) = normalize_trace(word);
                println!("{}\t{}\t{}", word, normalized, german_soundex(word));
                if explain {
                    for step in steps {
                        println!("    {:<16} {} → {}", step.rule, step.before, step.after);
                    }
                }
            }
            ColumnClass::PassThrough => println!("{}\t(pass-through)\t{}", word, word),
            ColumnClass::Empty => println!("{}\t(empty)\t", word),
        }
    }
    Ok(())
}

async fn cmd_serve(port: u16) -> CliResult<()> {
    start_server(port).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<String> {
        ["id", "Name", "2024"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_selection_numbers_and_names() {
        let picked = resolve_selection("2, id\n", &headers()).unwrap();
        assert_eq!(picked, vec!["Name", "id"]);
    }

    #[test]
    fn test_resolve_selection_numeric_header_name() {
        let picked = resolve_selection("2024", &headers()).unwrap();
        assert_eq!(picked, vec!["2024"]);
    }

    #[test]
    fn test_resolve_selection_out_of_range() {
        assert!(resolve_selection("7", &headers()).is_err());
    }

    #[test]
    fn test_delimiter_arg() {
        assert_eq!(delimiter_arg(Some("tab")).unwrap(), Some('\t'));
        assert_eq!(delimiter_arg(None).unwrap(), None);
        assert!(delimiter_arg(Some(";;")).is_err());
    }
}
