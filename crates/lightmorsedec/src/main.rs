use std::io;

use anyhow::{anyhow, Context};
use byteorder::{NativeEndian, ReadBytesExt};
use clap::Parser;
use log::{info, LevelFilter};

use lightmorse::DecoderBuilder;

mod app;
mod cli;
mod digitizer;

use cli::{Args, CliError};
use digitizer::{Digitizer, PollClock};

fn main() {
    match lightmorsedec() {
        Ok(()) => {}
        Err(cli_error) => cli_error.exit(),
    }
}

fn lightmorsedec() -> Result<(), CliError> {
    // Parse options and start logging
    let args = Args::try_parse()?;
    log_setup(&args);

    // create the decoder
    let mut decoder = DecoderBuilder::new()
        .with_debounce_window(args.debounce_window())
        .with_short_long_threshold(args.short_long_threshold())
        .with_next_letter_threshold(args.next_letter_threshold())
        .with_letter_word_threshold(args.letter_word_threshold())
        .with_fallback(args.fallback)
        .build()
        .context("Invalid timing options")?;

    // file setup: locks stdin in case we need it
    let stdin = io::stdin();
    let stdin_handle = stdin.lock();
    let mut inbuf = file_setup(&args, stdin_handle)?;

    // processing: read u16 from the input source, one per poll
    let digitizer = Digitizer::new(args.threshold, args.invert);
    let mut clock = PollClock::new(args.rate);
    let stdout = io::stdout();
    app::run(
        &args,
        &mut decoder,
        std::iter::from_fn(|| {
            let level = inbuf.read_u16::<NativeEndian>().ok()?;
            Some(clock.sample(&digitizer, level))
        }),
        &mut stdout.lock(),
    )
    .context("Unable to write decoded text")?;
    info!("end of input after {} readings", clock.count());

    Ok(())
}

fn log_setup(args: &Args) {
    if args.quiet {
        // no logging
        return;
    } else if std::env::var_os("RUST_LOG").is_none() {
        // parameter controls
        let log_filter = match args.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };

        pretty_env_logger::formatted_builder()
            .filter_module("lightmorse", log_filter)
            .filter_module("lightmorsedec", log_filter)
            .init();
    } else {
        // environment controls
        pretty_env_logger::init();
    }
}

fn file_setup<'stdin>(
    args: &Args,
    stdin: std::io::StdinLock<'stdin>,
) -> Result<Box<dyn io::BufRead + 'stdin>, anyhow::Error> {
    if args.input_is_stdin() {
        info!("Morse decoder reading standard input");
        if !is_terminal(&std::io::stdin()) {
            Ok(Box::new(io::BufReader::new(stdin)))
        } else {
            Err(anyhow!(
                "cowardly refusing to read sensor readings from a terminal.

Pipe a stream of raw u16 readings from a serial port, a capture
file, or similar into this program."
            ))
        }
    } else {
        info!("Morse decoder reading file: \"{}\"", &args.file);
        Ok(Box::new(io::BufReader::new(
            std::fs::File::open(&args.file)
                .with_context(|| format!("Unable to open --file \"{}\"", args.file))?,
        )))
    }
}

#[cfg(not(target_os = "windows"))]
fn is_terminal<S>(stream: &S) -> bool
where
    S: std::os::fd::AsRawFd,
{
    terminal_size::terminal_size_using_fd(stream.as_raw_fd()).is_some()
}

#[cfg(target_os = "windows")]
fn is_terminal<S>(stream: &S) -> bool
where
    S: std::os::windows::io::AsRawHandle,
{
    terminal_size::terminal_size_using_handle(stream.as_raw_handle()).is_some()
}
