/*!
Compose command - convert JSON to CBOR
*/

use crate::Verbosity;
use crate::io::{Input, Output};
use clap::Parser;
use mdoc_cbor::{CborType, Native};

/// Convert JSON to CBOR binary
#[derive(Parser, Debug)]
#[command(
    about = "Convert JSON to CBOR binary",
    long_about = "Parse a JSON document and convert it to CBOR binary.\n\n\
                  Integers map to CBOR integers, other numbers to 64-bit floats,\n\
                  and objects to maps keyed by text strings."
)]
pub struct Command {
    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<Output>,

    /// Output additional information, default 'info'.
    #[arg(short, long, num_args = 0..=1, require_equals = true, default_missing_value = "info")]
    verbose: Option<Verbosity>,

    /// Input JSON file (use '-' for stdin)
    input: Input,
}

impl Command {
    pub fn exec(self) -> anyhow::Result<()> {
        crate::init_logging(self.verbose)?;

        let input_text = self.input.read_to_string()?;
        let json_value: serde_json::Value = serde_json::from_str(&input_text)?;

        let item = CborType::Any.create(Native::from(json_value))?;
        let cbor_bytes = mdoc_cbor::encode(&item);
        tracing::info!("Composed {} bytes of {}", cbor_bytes.len(), item.type_name());

        let output = self.output.unwrap_or(Output::Stdout);
        output.write_all(&cbor_bytes)?;

        Ok(())
    }
}
