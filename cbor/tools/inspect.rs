/*!
Inspect command - display CBOR data in various formats
*/

use super::Verbosity;
use super::io::{Input, Output};
use clap::Parser;
use mdoc_cbor::DiagnosticOptions;

/// Inspect and display CBOR data
#[derive(Parser, Debug)]
#[command(about = "Inspect and display CBOR information", long_about = None)]
pub struct Command {
    /// Output format
    #[arg(
        long,
        default_value = "diag",
        value_name = "FORMAT",
        help = "Output format: diag/diagnostic (human-readable), json (lossy), hex"
    )]
    format: OutputFormat,

    /// Print diagnostic notation on a single line
    #[arg(long)]
    compact: bool,

    /// Show byte strings as their length only
    #[arg(long)]
    bytes_length_only: bool,

    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<Output>,

    /// Output additional information, default 'info'.
    #[arg(short, long, num_args = 0..=1, require_equals = true, default_missing_value = "info")]
    verbose: Option<Verbosity>,

    /// Input CBOR file (use '-' for stdin)
    input: Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    /// CBOR Diagnostic Notation (human-readable)
    #[value(alias = "diagnostic")]
    Diag,
    /// JSON format (lossy - loses CBOR tags, types, etc.)
    Json,
    /// Hexadecimal dump
    Hex,
}

impl Command {
    pub fn exec(self) -> anyhow::Result<()> {
        super::init_logging(self.verbose)?;

        let cbor_bytes = self.input.read_all()?;
        tracing::info!("Read {} bytes", cbor_bytes.len());

        let options = DiagnosticOptions {
            pretty: !self.compact,
            bytes_length_only: self.bytes_length_only,
        };

        let output_text = match self.format {
            OutputFormat::Diag => mdoc_cbor::decode_sequence(&cbor_bytes)?
                .iter()
                .map(|item| item.to_diagnostic(&options))
                .collect::<Vec<_>>()
                .join("\n"),
            OutputFormat::Json => {
                let json = mdoc_cbor::decode(&cbor_bytes)?.to_json()?;
                if self.compact {
                    serde_json::to_string(&json)?
                } else {
                    serde_json::to_string_pretty(&json)?
                }
            }
            OutputFormat::Hex => hex::encode(&cbor_bytes),
        };

        let output = self.output.unwrap_or(Output::Stdout);
        output.write_str(&output_text)?;

        // Add newline for better terminal output
        if matches!(output, Output::Stdout) {
            println!();
        }

        Ok(())
    }
}
