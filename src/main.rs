use std::io::{self, BufWriter, Write};
use std::time::Instant;

use aes_uuid::config::{load_config_or_default, AppConfig, OutputFormat};
use aes_uuid::format::{to_string, UUID_LEN};
use aes_uuid::is_well_formed;
use aes_uuid::observability::{init_tracing, log_batch_complete};
use aes_uuid::pool::global::init_global;
use aes_uuid::{GeneratorPool, InitError};
use serde::Serializer as _;

const CONFIG_ENV: &str = "AES_UUID_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";
const EXIT_USAGE: i32 = 2;
const EXIT_NO_ENTROPY: i32 = 3;

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Generate { count: Option<usize> },
    Check { inputs: Vec<String> },
}

fn main() {
    let command = parse_args(std::env::args().skip(1)).unwrap_or_else(|msg| {
        eprintln!("{msg}");
        eprintln!("Usage: aes-uuid [COUNT] | aes-uuid check <UUID>...");
        std::process::exit(EXIT_USAGE);
    });

    let config_path =
        std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = load_config_or_default(&config_path).unwrap_or_else(|e| {
        eprintln!("Failed to load configuration from '{config_path}': {e}");
        std::process::exit(1);
    });

    init_tracing(&config.features.log_level);

    let result = match command {
        Command::Generate { count } => run_generate(&config, count),
        Command::Check { inputs } => run_check(&inputs),
    };
    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            // a closed stdout (e.g. `| head`) is not an error worth reporting
            if err.kind() != io::ErrorKind::BrokenPipe {
                eprintln!("Failed to write output: {err}");
                std::process::exit(1);
            }
        }
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Command, String> {
    let Some(first) = args.next() else {
        return Ok(Command::Generate { count: None });
    };
    if first == "check" {
        let inputs: Vec<String> = args.collect();
        if inputs.is_empty() {
            return Err("check needs at least one argument".to_string());
        }
        return Ok(Command::Check { inputs });
    }
    let count = first
        .parse::<usize>()
        .map_err(|_| format!("COUNT must be a non-negative integer, got '{first}'"))?;
    if let Some(extra) = args.next() {
        return Err(format!("unexpected argument '{extra}'"));
    }
    Ok(Command::Generate { count: Some(count) })
}

fn run_generate(config: &AppConfig, count: Option<usize>) -> io::Result<bool> {
    let pool = init_global(&config.pool).unwrap_or_else(|e| {
        eprintln!("Failed to initialize generator pool: {e}");
        std::process::exit(init_failure_exit_code(&e));
    });
    let count = count.unwrap_or(config.output.count);

    let start = Instant::now();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match config.output.format {
        OutputFormat::Text => write_text(pool, count, &mut out)?,
        OutputFormat::Json => write_json(pool, count, &mut out)?,
    }
    out.flush()?;
    log_batch_complete(count, pool.size(), start.elapsed());
    Ok(true)
}

fn write_text(pool: &GeneratorPool, count: usize, out: &mut impl Write) -> io::Result<()> {
    let mut buf = [0u8; UUID_LEN];
    for _ in 0..count {
        pool.fill(&mut buf);
        out.write_all(&buf)?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

/// Entropy or cipher failures mean the host cannot generate at all; anything
/// else is a configuration mistake.
fn init_failure_exit_code(err: &InitError) -> i32 {
    if err.is_fatal() {
        EXIT_NO_ENTROPY
    } else {
        1
    }
}

fn write_json(pool: &GeneratorPool, count: usize, out: &mut impl Write) -> io::Result<()> {
    let mut buf = [0u8; UUID_LEN];
    let ids = (0..count).map(|_| {
        pool.fill(&mut buf);
        to_string(&buf)
    });
    let mut serializer = serde_json::Serializer::new(&mut *out);
    serializer.collect_seq(ids)?;
    out.write_all(b"\n")
}

fn run_check(inputs: &[String]) -> io::Result<bool> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut all_valid = true;
    for input in inputs {
        let valid = is_well_formed(input);
        all_valid &= valid;
        let verdict = if valid { "valid" } else { "invalid" };
        writeln!(out, "{input}\t{verdict}")?;
    }
    Ok(all_valid)
}
