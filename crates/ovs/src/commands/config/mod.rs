pub mod from_json;
pub mod to_json;

#[derive(clap::Subcommand)]
pub enum ConfigCommands {
    /// Convert config assets to JSON
    ToJson(to_json::ToJsonArgs),
    /// Build config assets from JSON
    FromJson(from_json::FromJsonArgs),
}

impl ConfigCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            ConfigCommands::ToJson(args) => args.handle(),
            ConfigCommands::FromJson(args) => args.handle(),
        }
    }
}

/// Pretty print JSON indented with tabs.
pub(crate) fn to_pretty_json(value: &serde_json::Value) -> miette::Result<Vec<u8>> {
    use miette::IntoDiagnostic;
    use serde::Serialize;

    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer).into_diagnostic()?;
    Ok(out)
}
