//! State machine logic for printing transmissions
//!
//! The state machine has two states:
//!
//! 1. `Listening`: Waiting for the first symbol of a transmission
//!
//! 2. `Receiving`: A transmission is in progress. Letters (and,
//!    with `--symbols`, dots and dashes) are echoed if `--live` is
//!    set.
//!
//! ```txt
//!   start
//!   ||
//!   \/
//! +-------------+                    +--------------+
//! |  Listening  | ===== symbol ====> |  Receiving   |
//! +-------------+                    +--------------+
//!   ||      /\                            ||
//!   ||      ||=== sequence end, EOF ======||
//!   ||
//!   \/
//!   EOF
//! ```
//!
//! At EOF, the `Receiving` state flushes the decoder so that a
//! transmission in progress is still printed. The `Listening` state
//! exits when the input iterator is exhausted.

use std::io::{self, Write};

use chrono::{DateTime, SecondsFormat, Utc};
use lightmorse::{DecodeEvent, MorseDecoder, Sample, Symbol};
use log::{debug, trace};

use crate::cli::Args;

/// Run the application
///
/// Runs the `lightmorsedec` state machine with the given
/// command-line `args`, a fully-initialized `decoder`, and an
/// `input` iterator which returns each digitized [`Sample`] from
/// some input source until it is exhausted. Decoded text is
/// written to `out`.
///
/// Fails only if `out` cannot be written.
pub fn run<I, W>(
    args: &Args,
    decoder: &mut MorseDecoder,
    mut input: I,
    out: &mut W,
) -> io::Result<()>
where
    I: Iterator<Item = Sample>,
    W: Write,
{
    let cfg = Config::from(args);

    let mut listening = State::<Listening>::new();
    while let Some(receiving) = listening.until_sequence_start(decoder, &mut input) {
        listening = receiving.until_sequence_end(&cfg, decoder, &mut input, out)?;
    }

    Ok(())
}

/// Configuration
#[derive(Clone, Debug)]
struct Config {
    quiet: bool,
    live: bool,
    symbols: bool,
    timestamps: bool,
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Self {
            quiet: args.quiet,
            live: (args.live || args.symbols) && !args.quiet,
            symbols: args.symbols && !args.quiet,
            timestamps: args.timestamps,
        }
    }
}

#[derive(Debug)]
struct State<S> {
    state: S,
}

#[derive(Debug)]
struct Listening {}

#[derive(Debug)]
struct Receiving {
    started: DateTime<Utc>,

    // symbol which started the transmission, not yet shown
    first: Option<Symbol>,

    // the live echo has printed something on this line
    echoed: bool,
}

impl<S> State<S> {
    /// Create initial state
    pub fn new() -> State<Listening> {
        State { state: Listening {} }
    }
}

impl State<Listening> {
    /// Look for start of transmission
    ///
    /// Consumes values from `input` until the first symbol of a
    /// transmission is decoded or the iterator is exhausted.
    pub fn until_sequence_start<I>(
        self,
        decoder: &mut MorseDecoder,
        input: &mut I,
    ) -> Option<State<Receiving>>
    where
        I: Iterator<Item = Sample>,
    {
        for evt in decoder.iter(input) {
            match evt {
                DecodeEvent::Symbol(sym) => {
                    trace!("first symbol: \"{}\"", sym);
                    return Some((Utc::now(), sym).into());
                }
                other => debug!("ignoring {} while listening", other),
            }
        }

        None
    }
}

impl State<Receiving> {
    /// Look for end of transmission
    ///
    /// Consumes values from `input` until the transmission ends or
    /// the iterator is exhausted. Prints the transmission to `out`
    /// either way.
    pub fn until_sequence_end<I, W>(
        mut self,
        config: &Config,
        decoder: &mut MorseDecoder,
        input: &mut I,
        out: &mut W,
    ) -> io::Result<State<Listening>>
    where
        I: Iterator<Item = Sample>,
        W: Write,
    {
        if config.live && config.timestamps {
            let prefix = format!("{} ", format_timestamp(&self.state.started));
            self.echo(out, &prefix)?;
        }

        if let Some(sym) = self.state.first.take() {
            self.show(config, DecodeEvent::Symbol(sym), out)?;
        }

        for evt in decoder.iter(input) {
            if self.show(config, evt, out)? {
                return Ok(self.into()); // → Listening
            }
        }

        // input exhausted
        let mut remaining = vec![];
        decoder.flush(&mut remaining);
        for evt in remaining {
            if self.show(config, evt, out)? {
                return Ok(self.into());
            }
        }

        if self.state.echoed {
            writeln!(out)?;
        }
        Ok(self.into())
    }

    // Print one event; returns true at the end of the transmission
    fn show<W>(&mut self, config: &Config, evt: DecodeEvent, out: &mut W) -> io::Result<bool>
    where
        W: Write,
    {
        match evt {
            DecodeEvent::Symbol(sym) => {
                trace!("symbol: \"{}\"", sym);
                if config.symbols {
                    self.echo(out, sym.as_ref())?;
                }
            }
            DecodeEvent::Letter(c) if config.symbols => self.echo(out, &format!("[{}] ", c))?,
            DecodeEvent::Letter(c) if config.live => {
                self.echo(out, c.encode_utf8(&mut [0u8; 4]))?
            }
            DecodeEvent::Letter(_) => {}
            DecodeEvent::WordBreak if config.symbols => self.echo(out, "/ ")?,
            DecodeEvent::WordBreak if config.live => self.echo(out, " ")?,
            DecodeEvent::WordBreak => {}
            DecodeEvent::SequenceEnd(text) => {
                if config.live {
                    writeln!(out)?;
                } else if !config.quiet {
                    let started = config.timestamps.then_some(&self.state.started);
                    writeln!(out, "{}", sequence_line(&text, started))?;
                }
                out.flush()?;
                return Ok(true);
            }
        }

        Ok(false)
    }

    // Print without a newline, right away
    fn echo<W>(&mut self, out: &mut W, text: &str) -> io::Result<()>
    where
        W: Write,
    {
        out.write_all(text.as_bytes())?;
        out.flush()?;
        self.state.echoed = true;
        Ok(())
    }
}

impl From<(DateTime<Utc>, Symbol)> for State<Receiving> {
    fn from((started, first): (DateTime<Utc>, Symbol)) -> Self {
        debug!("new state: receiving");
        Self {
            state: Receiving {
                started,
                first: Some(first),
                echoed: false,
            },
        }
    }
}

impl From<State<Receiving>> for State<Listening> {
    fn from(_state: State<Receiving>) -> Self {
        debug!("new state: listening");
        Self { state: Listening {} }
    }
}

// One line of output for a completed transmission
fn sequence_line(text: &str, started: Option<&DateTime<Utc>>) -> String {
    match started {
        Some(at) => format!("{} {}", format_timestamp(at), text),
        None => text.to_owned(),
    }
}

// UTC timestamp, to the second
fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use chrono::TimeZone;
    use clap::Parser;
    use lightmorse::DecoderBuilder;

    const QUIET: Config = Config {
        quiet: true,
        live: false,
        symbols: false,
        timestamps: false,
    };

    // one dash from 100 ms to 700 ms, then `silence_ms` of dark
    fn dash(silence_ms: u64) -> impl Iterator<Item = Sample> {
        (0..(700 + silence_ms) / 10).map(|tick| {
            Sample::new((10..70).contains(&tick), Duration::from_millis(tick * 10))
        })
    }

    // "N E" followed by `silence_ms` of dark, polled every 10 ms
    fn n_e(silence_ms: u64) -> Vec<Sample> {
        let steps = [
            (false, 100),
            (true, 600),
            (false, 200),
            (true, 200),
            (false, 1600),
            (true, 200),
            (false, silence_ms),
        ];

        let mut out = vec![];
        let mut now = 0u64;
        for (level, duration) in steps {
            for _ in 0..duration / 10 {
                out.push(Sample::new(level, Duration::from_millis(now)));
                now += 10;
            }
        }
        out
    }

    // decode `input` with the program's arguments, returning the output
    fn run_with(argv: &[&str], input: Vec<Sample>) -> String {
        let args = Args::try_parse_from(argv).expect("bad test arguments");
        let mut decoder = DecoderBuilder::default().build().unwrap();
        let mut out = vec![];
        run(&args, &mut decoder, input.into_iter(), &mut out).expect("write failed");
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_format_timestamp() {
        let tm = Utc.with_ymd_and_hms(2020, 12, 31, 23, 22, 0).unwrap();
        assert_eq!("2020-12-31T23:22:00Z", format_timestamp(&tm));
        assert_eq!("2020-12-31T23:22:00Z CQ", sequence_line("CQ", Some(&tm)));
        assert_eq!("CQ", sequence_line("CQ", None));
    }

    #[test]
    fn test_output_modes() {
        assert_eq!("N E\n", run_with(&["lightmorsedec"], n_e(5000)));
        assert_eq!("N E\n", run_with(&["lightmorsedec", "--live"], n_e(5000)));
        assert_eq!(
            "-.[N] / .[E] \n",
            run_with(&["lightmorsedec", "--symbols"], n_e(5000))
        );
        assert_eq!("", run_with(&["lightmorsedec", "-q", "--live"], n_e(5000)));

        // input ends before the silence timeout
        assert_eq!(
            "-.[N] / .[E] \n",
            run_with(&["lightmorsedec", "--symbols"], n_e(100))
        );
    }

    #[test]
    fn test_timestamps() {
        let tm = Utc.with_ymd_and_hms(2020, 12, 31, 23, 22, 0).unwrap();
        let mut decoder = DecoderBuilder::default().build().unwrap();
        let mut input = dash(5000);

        let first = State::<Listening>::new()
            .until_sequence_start(&mut decoder, &mut input)
            .expect("expected a transmission");
        assert_eq!(Some(Symbol::Dash), first.state.first);

        let cfg = Config {
            timestamps: true,
            ..QUIET
        };
        let mut out = vec![];
        State::<Receiving>::from((tm, Symbol::Dash))
            .until_sequence_end(&cfg, &mut decoder, &mut input, &mut out)
            .unwrap();
        assert_eq!(b"", out.as_slice());

        let cfg = Config {
            quiet: false,
            ..cfg
        };
        let mut input = dash(5000).map(|sa| {
            Sample::new(sa.raw, sa.timestamp + Duration::from_secs(10))
        });
        State::<Listening>::new()
            .until_sequence_start(&mut decoder, &mut input)
            .expect("expected a transmission");
        State::<Receiving>::from((tm, Symbol::Dash))
            .until_sequence_end(&cfg, &mut decoder, &mut input, &mut out)
            .unwrap();
        assert_eq!("2020-12-31T23:22:00Z T\n", String::from_utf8(out).unwrap());

        // live mode prints the start time before the first letter
        let cfg = Config { live: true, ..cfg };
        let mut out = vec![];
        let mut input = dash(5000).map(|sa| {
            Sample::new(sa.raw, sa.timestamp + Duration::from_secs(20))
        });
        State::<Listening>::new()
            .until_sequence_start(&mut decoder, &mut input)
            .expect("expected a transmission");
        State::<Receiving>::from((tm, Symbol::Dash))
            .until_sequence_end(&cfg, &mut decoder, &mut input, &mut out)
            .unwrap();
        assert_eq!("2020-12-31T23:22:00Z T\n", String::from_utf8(out).unwrap());
    }

    #[test]
    fn test_write_error() {
        struct Broken;

        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::ErrorKind::BrokenPipe.into())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let args = Args::try_parse_from(["lightmorsedec", "--live"]).unwrap();
        let mut decoder = DecoderBuilder::default().build().unwrap();
        let err = run(&args, &mut decoder, n_e(5000).into_iter(), &mut Broken).unwrap_err();
        assert_eq!(io::ErrorKind::BrokenPipe, err.kind());
    }

    #[test]
    fn test_states() {
        let mut decoder = DecoderBuilder::default().build().unwrap();
        let mut input = dash(5000);

        let receiving = State::<Listening>::new()
            .until_sequence_start(&mut decoder, &mut input)
            .expect("expected a transmission");

        let listening = receiving
            .until_sequence_end(&QUIET, &mut decoder, &mut input, &mut io::sink())
            .unwrap();
        assert_eq!("", decoder.sentence());
        assert!(listening
            .until_sequence_start(&mut decoder, &mut input)
            .is_none());
    }

    #[test]
    fn test_flush_at_eof() {
        let mut decoder = DecoderBuilder::default().build().unwrap();

        // input ends before the silence timeout
        let mut input = dash(200);
        let receiving = State::<Listening>::new()
            .until_sequence_start(&mut decoder, &mut input)
            .expect("expected a transmission");
        assert_eq!(1, decoder.pending_symbols().len());

        receiving
            .until_sequence_end(&QUIET, &mut decoder, &mut input, &mut io::sink())
            .unwrap();
        assert!(decoder.pending_symbols().is_empty());
        assert_eq!(None, decoder.flush(&mut lightmorse::NullSink));
    }

    #[test]
    fn test_silence() {
        let mut decoder = DecoderBuilder::default().build().unwrap();
        let mut input = (0..1000u64).map(|t| Sample::new(false, Duration::from_millis(t)));
        assert!(State::<Listening>::new()
            .until_sequence_start(&mut decoder, &mut input)
            .is_none());
    }
}
