use std::fmt::Display;
use std::time::Duration;

use clap::{error::ErrorKind, value_parser, CommandFactory, Parser};

/// Standard input filename
const STDIN_FILE: &str = "-";

const USAGE_SHORT: &str = r#"
This program accepts raw light-sensor readings in unsigned 16-bit (u16) format, one per poll at the given --rate, and decodes any Morse code that is flashed at the sensor. Each completed transmission is printed on its own line.

See --help for more details.
"#;

const USAGE_LONG: &str = r#"
This program accepts raw light-sensor readings in unsigned 16-bit (u16) format, one per poll at the given --rate, and decodes any Morse code that is flashed at the sensor. Each completed transmission is printed on its own line.

Readings above the --threshold are light. If your sensor reads lower in the light, as a photoresistor on the high side of a voltage divider does, use --invert.

You can stream readings from a microcontroller over a serial port:

    stty -F /dev/ttyACM0 raw 115200
    cat /dev/ttyACM0 | lightmorsedec --rate 1000 --live

A transmission ends after the lamp has been dark for twice the --letter-word-ms threshold. Any transmission still in progress at the end of the input is printed too.

The timing thresholds must satisfy

    0 < debounce < short/long < next letter < letter/word

Slow or hesitant operators will want to raise all of them.
"#;

const ADVANCED: &str = "Advanced Timing Options";

/// Top-level program arguments
#[derive(Parser, Clone, Debug)]
#[command(author = "lightmorse contributors")]
#[command(version)]
#[command(about, long_about = None)]
#[command(after_help = USAGE_SHORT, after_long_help = USAGE_LONG)]
#[command(max_term_width = 100)]
pub struct Args {
    /// Verbosity level (-vvv for more)
    #[arg(short, long, default_value_t = 0, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print NOTHING, not even decoded text
    #[arg(short, long)]
    pub quiet: bool,

    /// Polling rate (Hz)
    ///
    /// Set to the rate at which the sensor was sampled. Timing
    /// is derived from the number of readings, so this must be
    /// accurate.
    #[arg(short, long, default_value_t = 1000)]
    #[arg(value_parser = value_parser!(u32).range(1..))]
    pub rate: u32,

    /// Input file (or "-" for stdin)
    ///
    /// The input must be unsigned 16-bit native-endian sensor
    /// readings at --rate.
    #[arg(long, default_value_t = STDIN_FILE.to_string())]
    pub file: String,

    /// Light threshold (raw reading)
    ///
    /// Readings strictly above this level are light.
    #[arg(short, long, default_value_t = 400)]
    pub threshold: u16,

    /// Readings strictly below --threshold are light
    #[arg(long)]
    pub invert: bool,

    /// Echo letters as they are decoded
    ///
    /// Letters and word breaks are printed as soon as they
    /// resolve. The line is finished when the transmission ends.
    #[arg(long)]
    pub live: bool,

    /// Also echo dots and dashes as each mark ends
    ///
    /// Each letter follows its symbols in brackets. Use this to
    /// tune --short-long-ms. Implies --live.
    #[arg(long)]
    pub symbols: bool,

    /// Prefix each transmission with its UTC start time
    ///
    /// The start time is taken when the first symbol is decoded.
    #[arg(long)]
    pub timestamps: bool,

    /// Character printed for unrecognized letters
    #[arg(long, default_value_t = '?')]
    pub fallback: char,

    /// Debounce window (ms)
    #[arg(long, default_value_t = 50)]
    #[arg(hide_short_help = true)]
    #[arg(help_heading = ADVANCED)]
    pub debounce_ms: u64,

    /// Marks longer than this are dashes (ms)
    #[arg(long, default_value_t = 300)]
    #[arg(hide_short_help = true)]
    #[arg(help_heading = ADVANCED)]
    pub short_long_ms: u64,

    /// Spaces longer than this end a letter (ms)
    #[arg(long, default_value_t = 500)]
    #[arg(hide_short_help = true)]
    #[arg(help_heading = ADVANCED)]
    pub next_letter_ms: u64,

    /// Spaces longer than this end a word (ms)
    #[arg(long, default_value_t = 1500)]
    #[arg(hide_short_help = true)]
    #[arg(help_heading = ADVANCED)]
    pub letter_word_ms: u64,
}

impl Args {
    /// Return true if the user requests input from stdin
    pub fn input_is_stdin(&self) -> bool {
        self.file == STDIN_FILE
    }

    /// Debounce window
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Short/long mark threshold
    pub fn short_long_threshold(&self) -> Duration {
        Duration::from_millis(self.short_long_ms)
    }

    /// Next-letter threshold
    pub fn next_letter_threshold(&self) -> Duration {
        Duration::from_millis(self.next_letter_ms)
    }

    /// Letter/word threshold
    pub fn letter_word_threshold(&self) -> Duration {
        Duration::from_millis(self.letter_word_ms)
    }
}

/// A program-level error with exit code
#[derive(Debug)]
pub struct CliError {
    error: anyhow::Error,
    exit_code: i32,
}

impl CliError {
    /// Create new error with a custom exit code
    pub fn new(error: anyhow::Error, code: i32) -> CliError {
        CliError {
            error,
            exit_code: code,
        }
    }

    /// Print this error to the terminal
    ///
    /// Errors from clap are printed verbatim. Other types of errors
    /// are printed indirectly via clap's fancy formatter.
    pub fn print(&self) -> std::io::Result<()> {
        if let Some(e) = self.error.downcast_ref::<clap::Error>() {
            e.print()
        } else {
            Args::command()
                .error(ErrorKind::Format, self.to_string())
                .print()
        }
    }

    /// Print this error to the terminal and exit
    pub fn exit(&self) -> ! {
        drop(self.print());
        std::process::exit(self.exit_code);
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.error)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> CliError {
        CliError::new(err, 1)
    }
}

impl From<clap::Error> for CliError {
    fn from(err: clap::Error) -> CliError {
        let code = if err.use_stderr() { 1 } else { 0 };
        CliError::new(err.into(), code)
    }
}
