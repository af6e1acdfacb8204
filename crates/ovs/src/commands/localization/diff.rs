use std::fmt::Display;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use itertools::Itertools;
use miette::Result;
use ovs_dat1::Localization;
use owo_colors::OwoColorize;
use similar::{ChangeTag, TextDiff};

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum Mode {
    /// Only list the keys that differ
    #[default]
    Keys,
    /// Also show how each value changed
    Full,
}

#[derive(Debug, Eq, PartialEq)]
enum Change {
    Added(String, String),
    Removed(String, String),
    Flags(String, u8, u8),
    Modified(String, Vec<String>),
}

impl Display for Change {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Change::Added(key, value) => writeln!(f, "✅ {}: {}", key.green(), value.dimmed()),
            Change::Removed(key, value) => writeln!(f, "❌ {}: {}", key.red(), value.dimmed()),
            Change::Flags(key, old, new) => {
                writeln!(
                    f,
                    "🔃 {}: flags {} vs {}",
                    key.blue(),
                    format!("{old:#04X}").red(),
                    format!("{new:#04X}").green()
                )
            }
            Change::Modified(key, context) => {
                writeln!(f, "🔃 {}", key.blue())?;
                if !context.is_empty() {
                    writeln!(f, "{}", context.iter().map(|l| format!("  {l}")).join("\n"))?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Args)]
pub struct DiffArgs {
    /// An input localization asset
    #[arg(short, long, value_name = "FILE")]
    left: PathBuf,

    /// An input localization asset
    #[arg(short, long, value_name = "FILE")]
    right: PathBuf,

    /// Comparison mode
    #[arg(short, long, value_enum, default_value_t = Mode::Keys)]
    mode: Mode,
}

impl DiffArgs {
    fn inline(&self, old: &str, new: &str) -> Vec<String> {
        if self.mode != Mode::Full {
            return Vec::new();
        }

        let diff = TextDiff::from_words(old, new);
        let mut line = String::new();
        for op in diff.ops() {
            for change in diff.iter_inline_changes(op) {
                for (emphasized, value) in change.iter_strings_lossy() {
                    let text = match (change.tag(), emphasized) {
                        (ChangeTag::Insert, true) => value.green().underline().to_string(),
                        (ChangeTag::Delete, true) => value.red().underline().to_string(),
                        (ChangeTag::Insert, false) => value.green().to_string(),
                        (ChangeTag::Delete, false) => value.red().to_string(),
                        (ChangeTag::Equal, _) => value.dimmed().to_string(),
                    };
                    line.push_str(&text);
                }
            }
        }
        vec![line]
    }

    fn compare(&self, left: &Localization, right: &Localization) -> Vec<Change> {
        let mut result = Vec::new();

        right
            .iter()
            .filter(|(k, _)| left.get(k).is_none())
            .sorted_by_key(|(k, _)| *k)
            .map(|(k, v)| Change::Added(k.to_string(), v.value.clone()))
            .for_each(|c| result.push(c));

        left.iter()
            .filter(|(k, _)| right.get(k).is_none())
            .sorted_by_key(|(k, _)| *k)
            .map(|(k, v)| Change::Removed(k.to_string(), v.value.clone()))
            .for_each(|c| result.push(c));

        left.iter()
            .filter_map(|(k, old)| Some((k, old, right.get(k)?, right.flags(k)?)))
            .sorted_by_key(|(k, _, _, _)| *k)
            .flat_map(|(k, old, value, flags)| {
                let mut changes = Vec::new();
                if old.value != value {
                    changes.push(Change::Modified(
                        k.to_string(),
                        self.inline(&old.value, value),
                    ));
                }
                if old.flags != flags {
                    changes.push(Change::Flags(k.to_string(), old.flags, flags));
                }
                changes
            })
            .for_each(|c| result.push(c));

        result
    }

    pub fn handle(&self) -> Result<()> {
        let (_, left) = super::load(&self.left)?;
        let (_, right) = super::load(&self.right)?;

        let changes = self.compare(&left, &right);
        if changes.is_empty() {
            println!("{}", "no differences".dimmed());
            return Ok(());
        }

        changes.iter().for_each(|c| print!("{c}"));
        println!(
            "{} keys compared, {} changes",
            left.keys().chain(right.keys()).unique().count(),
            changes.len()
        );
        Ok(())
    }
}
