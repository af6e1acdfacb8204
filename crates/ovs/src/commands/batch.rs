//! Running a command over a single file or every file below a directory.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use miette::{miette, Context, IntoDiagnostic, Result};
use tracing::{error, info};
use walkdir::WalkDir;

/// Inputs of a command and where its outputs go.
///
/// A directory input is walked recursively and its layout is mirrored below the output directory.
/// Without an output, results are written next to their inputs.
pub struct Batch<'a> {
    input: &'a Path,
    output: Option<&'a Path>,
}

impl<'a> Batch<'a> {
    pub fn new(input: &'a Path, output: Option<&'a Path>) -> Self {
        Batch { input, output }
    }

    pub fn is_directory(&self) -> bool {
        self.input.is_dir()
    }

    /// Every input file, sorted
    pub fn files(&self) -> Vec<PathBuf> {
        if !self.is_directory() {
            return vec![self.input.to_path_buf()];
        }

        let mut files = WalkDir::new(self.input)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| !e.file_type().is_dir())
            .map(|e| e.into_path())
            .collect::<Vec<_>>();
        files.sort();
        files
    }

    /// Output path for `file`, given the name it gets when written next to its input.
    pub fn target(&self, file: &Path, renamed: PathBuf) -> Result<PathBuf> {
        match self.output {
            None => Ok(renamed),
            Some(output) if self.is_directory() => {
                let relative = renamed
                    .strip_prefix(self.input)
                    .into_diagnostic()
                    .context(format!("placing {}", file.display()))?;
                Ok(output.join(relative))
            }
            Some(output) => Ok(output.to_path_buf()),
        }
    }

    /// Run `handle` on every input file.
    ///
    /// A single file input fails with its own error. For a directory every file is attempted and
    /// failures are logged and counted.
    pub fn run(&self, mut handle: impl FnMut(&Path) -> Result<()>) -> Result<()> {
        let files = self.files();
        if !self.is_directory() {
            return handle(self.input);
        }
        if files.is_empty() {
            return Err(miette!("{} holds no files", self.input.display()));
        }

        let mut failed = 0usize;
        for file in &files {
            if let Err(err) = handle(file) {
                failed += 1;
                error!("{}: {err:?}", file.display());
            }
        }

        info!("processed {} files, {failed} failed", files.len());
        match failed {
            0 => Ok(()),
            _ => Err(miette!("{failed} of {} files failed", files.len())),
        }
    }
}

/// Append an extension, keeping the existing one.
pub fn add_extension(path: &Path, extension: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

pub fn read(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path)
        .into_diagnostic()
        .context(format!("reading {}", path.display()))
}

/// Write a file, creating its directory.
pub fn write(path: &Path, data: &[u8], overwrite: bool) -> Result<()> {
    info!("writing {}", path.display());

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .into_diagnostic()
            .context(format!("creating {}", parent.display()))?;
    }

    let mut out = if !overwrite {
        File::create_new(path)
            .into_diagnostic()
            .context(format!("creating {}", path.display()))?
    } else {
        File::create(path)
            .into_diagnostic()
            .context(format!("creating {}", path.display()))?
    };

    out.write_all(data)
        .into_diagnostic()
        .context(format!("writing {}", path.display()))
}

#[cfg(test)]
mod test {
    use std::path::{Path, PathBuf};

    use pretty_assertions::assert_eq;

    use super::{add_extension, Batch};

    #[test]
    fn single_file_targets() -> miette::Result<()> {
        let batch = Batch::new(Path::new("a/b.config"), None);
        assert_eq!(
            batch.target(Path::new("a/b.config"), PathBuf::from("a/b.json"))?,
            PathBuf::from("a/b.json")
        );

        let batch = Batch::new(Path::new("a/b.config"), Some(Path::new("out.json")));
        assert_eq!(
            batch.target(Path::new("a/b.config"), PathBuf::from("a/b.json"))?,
            PathBuf::from("out.json")
        );

        Ok(())
    }

    #[test]
    fn extensions() {
        assert_eq!(
            add_extension(Path::new("dir/asset.localization"), "json"),
            PathBuf::from("dir/asset.localization.json")
        );
    }
}
