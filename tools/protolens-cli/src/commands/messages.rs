use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use protolens::Inspector;

#[derive(Args)]
pub struct MessagesArgs {
    /// Path to a serialized FileDescriptorSet
    #[arg(short, long)]
    schema: PathBuf,
}

impl MessagesArgs {
    pub fn run(self) -> Result<()> {
        let inspector = Inspector::builder()
            .with_descriptor_file(&self.schema)?
            .build()?;
        for name in inspector.message_names() {
            println!("{name}");
        }
        Ok(())
    }
}
