//! `chapbook migrate` command implementation.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use chapbook_reverse::recover;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the migrate command.
#[derive(Args)]
pub(crate) struct MigrateArgs {
    /// Chapter number to recover.
    pub(crate) order: i64,

    /// Directory receiving the recovered Markdown.
    #[arg(short, long, default_value = "content")]
    pub(crate) content_dir: PathBuf,

    /// Directory containing the generated modules.
    #[arg(short, long, default_value = "src/chapters")]
    pub(crate) output_dir: PathBuf,

    /// Overwrite an existing Markdown file.
    #[arg(long)]
    pub(crate) force: bool,
}

impl MigrateArgs {
    /// Execute the migrate command.
    ///
    /// # Errors
    ///
    /// Returns an error if the module cannot be read or the destination
    /// already exists without `--force`.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let module_path = self.output_dir.join(format!("chapter-{}.js", self.order));
        let source = fs::read_to_string(&module_path)?;

        let recovered = recover(&source);
        if recovered.title.is_empty() {
            output.warning(&format!(
                "No title recovered from {}",
                module_path.display()
            ));
        }

        let dest = self.content_dir.join(format!("chapter-{}.md", self.order));
        if dest.exists() && !self.force {
            return Err(CliError::Validation(format!(
                "{} already exists (use --force to overwrite)",
                dest.display()
            )));
        }

        fs::create_dir_all(&self.content_dir)?;
        fs::write(&dest, recovered.to_markdown())?;
        output.success(&format!(
            "Recovered {} -> {}",
            module_path.display(),
            dest.display()
        ));
        output.warning("Recovery is lossy: review the draft before committing it.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use tempfile::tempdir;

    use crate::commands::convert::ConvertArgs;

    use super::*;

    fn convert(content: &Path, out: &Path) {
        ConvertArgs {
            content_dir: content.to_owned(),
            output_dir: out.to_owned(),
            verbose: false,
        }
        .execute(&Output::new())
        .unwrap();
    }

    #[test]
    fn test_convert_then_migrate() {
        let dir = tempdir().unwrap();
        let content = dir.path().join("content");
        let out = dir.path().join("chapters");
        fs::create_dir(&content).unwrap();
        fs::write(
            content.join("03-shaders.md"),
            "---\ntitle: Shaders\ndescription: Shader basics.\norder: 3\n---\n## Intro\n\nShaders draw pixels.\n",
        )
        .unwrap();
        convert(&content, &out);

        MigrateArgs {
            order: 3,
            content_dir: content.clone(),
            output_dir: out.clone(),
            force: false,
        }
        .execute(&Output::new())
        .unwrap();

        let draft = fs::read_to_string(content.join("chapter-3.md")).unwrap();
        assert!(draft.starts_with("---\n"));
        assert!(draft.contains("title: Shaders"));
        assert!(draft.contains("## Intro"));
        assert!(draft.contains("Shaders draw pixels."));
    }

    #[test]
    fn test_refuses_overwrite_without_force() {
        let dir = tempdir().unwrap();
        let content = dir.path().join("content");
        let out = dir.path().join("chapters");
        fs::create_dir(&content).unwrap();
        fs::write(
            content.join("01-a.md"),
            "---\ntitle: A\ndescription: A.\norder: 1\n---\nHi.\n",
        )
        .unwrap();
        convert(&content, &out);
        fs::write(content.join("chapter-1.md"), "existing draft").unwrap();

        let migrate = |force| MigrateArgs {
            order: 1,
            content_dir: content.clone(),
            output_dir: out.clone(),
            force,
        };
        let err = migrate(false).execute(&Output::new()).unwrap_err();
        assert!(matches!(err, CliError::Validation(_)));

        migrate(true).execute(&Output::new()).unwrap();
        let draft = fs::read_to_string(content.join("chapter-1.md")).unwrap();
        assert!(draft.contains("title: A"));
    }

    #[test]
    fn test_missing_module_is_io_error() {
        let dir = tempdir().unwrap();
        let err = MigrateArgs {
            order: 9,
            content_dir: dir.path().to_owned(),
            output_dir: dir.path().to_owned(),
            force: false,
        }
        .execute(&Output::new())
        .unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }
}
