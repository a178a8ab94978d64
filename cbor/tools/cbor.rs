/*!
CBOR Tools - A CLI for working with CBOR data

# Commands

- `inspect`: Display CBOR data as diagnostic notation, JSON or hex
- `compose`: Convert JSON to CBOR binary

# Examples

```bash
# Inspect a CBOR file as diagnostic notation
cbor inspect data.cbor

# Single line output, with byte strings shown by length
cbor inspect --compact --bytes-length-only data.cbor

# Inspect as JSON (lossy)
cbor inspect --format json data.cbor

# Convert JSON to CBOR
echo '{"name": "Alice", "age": 30}' | cbor compose -o data.cbor -

# Round trip
cbor compose input.json | cbor inspect -
```
*/

use clap::{Parser, Subcommand, ValueEnum};

mod compose;
mod inspect;
mod io;

/// A CLI tool for working with CBOR data
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "A CLI tool for inspecting and composing CBOR data",
    long_about = "CBOR Tools provides utilities for working with CBOR (RFC 8949) data.\n\n\
                  Features:\n\
                  - Inspect CBOR data and CBOR sequences as diagnostic notation\n\
                  - Lossy projection of CBOR to JSON\n\
                  - Conversion of JSON documents to CBOR"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Inspect and display CBOR data in various formats
    Inspect(inspect::Command),

    /// Convert JSON to CBOR binary
    Compose(compose::Command),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Verbosity {
    /// Designates very low priority, often extremely verbose, information.
    #[value(name = "trace")]
    Trace,

    /// Designates lower priority information.
    #[value(name = "debug")]
    Debug,

    /// Designates useful information.
    #[value(name = "info")]
    Info,

    /// Designates hazardous situations.
    #[value(name = "warn")]
    Warn,

    /// Designates very serious errors.
    #[value(name = "error")]
    Error,
}

impl From<Verbosity> for tracing::Level {
    fn from(value: Verbosity) -> Self {
        match value {
            Verbosity::Trace => tracing::Level::TRACE,
            Verbosity::Debug => tracing::Level::DEBUG,
            Verbosity::Info => tracing::Level::INFO,
            Verbosity::Warn => tracing::Level::WARN,
            Verbosity::Error => tracing::Level::ERROR,
        }
    }
}

/// Install a `fmt` subscriber if `-v` was given
pub fn init_logging(verbose: Option<Verbosity>) -> anyhow::Result<()> {
    if let Some(level) = verbose.map(tracing::Level::from) {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(level > tracing::Level::INFO)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| anyhow::anyhow!("Failed to set global default subscriber: {e}"))?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    match Cli::parse().command {
        Commands::Inspect(args) => args.exec(),
        Commands::Compose(args) => args.exec(),
    }
}
