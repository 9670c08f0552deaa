use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};

use anyhow::{Result, bail};
use clap::Args;
use protolens::{Inspector, core::DecodeResult};
use tracing::debug;

use crate::format::OutputFormat;

#[derive(Args)]
pub struct DecodeArgs {
    /// Path to the binary payload ("-" reads stdin)
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Path to a serialized FileDescriptorSet
    #[arg(short, long)]
    schema: PathBuf,

    /// Fully-qualified message name
    #[arg(short, long)]
    message: String,

    /// Path to a JSON converter configuration
    #[arg(short, long)]
    converters: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Output file path (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl DecodeArgs {
    pub fn run(self) -> Result<()> {
        let mut builder = Inspector::builder().with_descriptor_file(&self.schema)?;
        if let Some(path) = &self.converters {
            builder = builder.with_converter_file(path)?;
        }
        let inspector = builder.build()?;

        let payload = self.read_payload()?;
        debug!(bytes = payload.len(), message = %self.message, "decoding payload");

        match inspector.deserialize(&payload, &self.message) {
            DecodeResult::Valid { value } => {
                let text = self.format.render(value)?;
                match self.output {
                    Some(path) => fs::write(path, format!("{text}\n"))?,
                    None => println!("{text}"),
                }
                Ok(())
            }
            DecodeResult::Invalid { raw, error } => {
                if let Some(raw) = raw {
                    eprintln!("{raw}");
                }
                bail!(error)
            }
        }
    }

    fn read_payload(&self) -> Result<Vec<u8>> {
        if self.input.as_os_str() == "-" {
            let mut buf = Vec::new();
            io::stdin().lock().read_to_end(&mut buf)?;
            return Ok(buf);
        }
        Ok(fs::read(&self.input)?)
    }
}
