use std::{fs, path::PathBuf};

use anyhow::{Result, anyhow};
use clap::Args;
use protolens::Inspector;

#[derive(Args)]
pub struct SchemaArgs {
    /// Path to a serialized FileDescriptorSet
    #[arg(short, long)]
    schema: PathBuf,

    /// Fully-qualified message name
    #[arg(short, long)]
    message: String,

    /// Output file path (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl SchemaArgs {
    pub fn run(self) -> Result<()> {
        let inspector = Inspector::builder()
            .with_descriptor_file(&self.schema)?
            .build()?;
        let message_type = inspector
            .message_type(&self.message)
            .ok_or_else(|| anyhow!("message '{}' not found in schema", self.message))?;
        let text = message_type.to_string();
        let text = text.trim_end();

        match self.output {
            Some(path) => fs::write(path, format!("{text}\n"))?,
            None => println!("{text}"),
        }
        Ok(())
    }
}
