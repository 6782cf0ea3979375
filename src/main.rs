/*!
 * Command-line interface for codecopy
 */

use std::env;
use std::io;
use std::process;
use std::time::{Duration, Instant};

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;

use codecopy::config::{Args, Config};
use codecopy::report::{Reporter, ScanReport};
use codecopy::scanner::Scanner;
use codecopy::writer::ContentWriter;
use codecopy::{emit, select, Destination};

fn main() {
    if let Err(e) = run() {
        eprintln!("[!] {}", e);
        process::exit(1);
    }
}

fn run() -> io::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        let mut cmd = Args::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    init_logging(args.verbose);

    // The only place the process working directory is consulted
    let invocation_dir = env::current_dir()?;
    let config = Config::from_args(args, invocation_dir);
    config.validate()?;

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos} files")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_prefix("Selecting");

    let start_time = Instant::now();

    let scanner = Scanner::new(config.scan_options())?.with_progress(progress.clone());
    let selection = select(&config, &scanner)?;

    progress.set_prefix("Formatting");
    let writer = ContentWriter::new(config.format, config.tree);
    let output = writer.format(&selection);
    progress.finish_and_clear();

    let destination = emit(&config, &output.render())?;
    let duration = start_time.elapsed();

    match &destination {
        Destination::Clipboard => eprintln!("Copied {} files to clipboard", output.files.len()),
        Destination::File(path) => {
            eprintln!("Wrote {} files to {}", output.files.len(), path.display())
        }
        Destination::FileFallback(path) => eprintln!(
            "Clipboard unavailable; wrote {} files to {} instead. Install xclip, xsel or wl-copy, or omit --clipboard.",
            output.files.len(),
            path.display()
        ),
    }

    if config.report {
        let report = ScanReport::from_output(&output, destination.to_string(), duration);
        Reporter::new().with_max_rows(15).print_report(&report);
    }

    Ok(())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    // RUST_LOG still wins when set
    builder.parse_env("RUST_LOG");
    builder.init();
}
