//! The iscp batch job: load, mask, export, document, archive, publish.

pub mod report;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use iscp_config::Config;
use iscp_core::{Dataset, DatasetLoader};
use iscp_export::ReadmeContext;
use iscp_security::{MaskSummary, PiiMasker};
use iscp_vcs::{CommandRunner, GitClient, PublishOutcome, PublishRequest, RemoteSpec};
use time::OffsetDateTime;

pub use report::{OutputFile, PublishSummary, RunReport};

/// Git client plus the credential it pushes with
pub struct Publisher<R: CommandRunner> {
    pub client: GitClient<R>,
    pub token: String,
}

impl<R: CommandRunner> Publisher<R> {
    pub fn new(client: GitClient<R>, token: impl Into<String>) -> Self {
        Self {
            client,
            token: token.into(),
        }
    }
}

/// Result of the load-mask-export step
#[derive(Debug, Clone)]
pub struct CleanOutcome {
    pub rows: usize,
    pub columns: usize,
    pub masking: MaskSummary,
    pub spreadsheet: PathBuf,
}

pub struct Pipeline {
    config: Config,
    workdir: PathBuf,
    masker: PiiMasker,
}

impl Pipeline {
    pub fn new(config: Config, workdir: impl Into<PathBuf>) -> Self {
        let masker =
            PiiMasker::with_columns(&config.dataset.email_column, &config.dataset.phone_column);
        Self {
            config,
            workdir: workdir.into(),
            masker,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        iscp_config::resolve(&self.workdir, path)
    }

    pub fn input_path(&self) -> PathBuf {
        self.resolve(&self.config.dataset.input)
    }

    pub fn spreadsheet_path(&self) -> PathBuf {
        self.resolve(&self.config.output.spreadsheet)
    }

    pub fn diagram_path(&self) -> PathBuf {
        self.resolve(&self.config.output.diagram)
    }

    pub fn readme_path(&self) -> PathBuf {
        self.resolve(&self.config.output.readme)
    }

    pub fn archive_path(&self) -> PathBuf {
        self.resolve(&self.config.output.archive)
    }

    pub fn load(&self) -> Result<Dataset> {
        let input = self.input_path();
        let delimiter = self.config.dataset.delimiter_byte()?;

        DatasetLoader::new()
            .with_delimiter(delimiter)
            .with_trim(self.config.dataset.trim)
            .load_path(&input)
            .with_context(|| format!("Failed to load dataset {}", input.display()))
    }

    pub fn mask(&self, dataset: Dataset) -> (Dataset, MaskSummary) {
        self.masker.mask_dataset(dataset)
    }

    /// Load the input, mask it and write the spreadsheet
    pub fn clean(&self) -> Result<CleanOutcome> {
        let dataset = self.load()?;
        let (masked, masking) = self.mask(dataset);

        tracing::info!(
            rows = masking.rows,
            emails = masking.emails_masked,
            phones = masking.phones_masked,
            "Masked dataset"
        );

        let spreadsheet = self.spreadsheet_path();
        iscp_export::write_xlsx(&masked, &spreadsheet)
            .with_context(|| format!("Failed to write spreadsheet {}", spreadsheet.display()))?;

        Ok(CleanOutcome {
            rows: masked.len(),
            columns: masked.columns().len(),
            masking,
            spreadsheet,
        })
    }

    pub fn write_docs(&self) -> Result<(PathBuf, PathBuf)> {
        let diagram = self.diagram_path();
        let readme = self.readme_path();

        iscp_export::write_diagram(&diagram)
            .with_context(|| format!("Failed to write diagram {}", diagram.display()))?;
        iscp_export::write_readme(&readme, &self.readme_context())
            .with_context(|| format!("Failed to write README {}", readme.display()))?;

        Ok((diagram, readme))
    }

    fn readme_context(&self) -> ReadmeContext {
        let name = |p: &Path| {
            p.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| p.display().to_string())
        };
        ReadmeContext {
            spreadsheet: name(&self.config.output.spreadsheet),
            diagram: name(&self.config.output.diagram),
            readme: name(&self.config.output.readme),
        }
    }

    pub fn archive(&self) -> Result<Vec<String>> {
        let archive = self.archive_path();
        let inputs = [self.spreadsheet_path(), self.diagram_path(), self.readme_path()];

        iscp_export::build_archive(&archive, &inputs)
            .with_context(|| format!("Failed to build archive {}", archive.display()))
    }

    /// Everything except publishing
    pub fn package(&self) -> Result<RunReport> {
        let started_at = OffsetDateTime::now_utc();

        let cleaned = self.clean()?;
        let (diagram, readme) = self.write_docs()?;
        let archive_entries = self.archive()?;

        let outputs = [cleaned.spreadsheet, diagram, readme, self.archive_path()]
            .iter()
            .map(|p| OutputFile::inspect(p))
            .collect::<Result<Vec<_>>>()?;

        Ok(RunReport {
            input: self.input_path(),
            columns: cleaned.columns,
            masking: cleaned.masking,
            outputs,
            archive_entries,
            published: None,
            started_at,
            finished_at: OffsetDateTime::now_utc(),
        })
    }

    /// Push the working directory to the configured remote
    pub fn publish<R: CommandRunner>(&self, publisher: &Publisher<R>) -> Result<PublishOutcome> {
        let settings = &self.config.publish;

        if settings.ignore_input {
            self.ignore_input()?;
        }

        let request = PublishRequest {
            workdir: self.workdir.clone(),
            remote: RemoteSpec::new(&settings.host, settings.user()?, &settings.repository),
            remote_name: settings.remote.clone(),
            branch: settings.branch.clone(),
            commit_message: settings.commit_message.clone(),
            token: publisher.token.clone(),
        };

        publisher
            .client
            .publish(&request)
            .context("Failed to publish to remote repository")
    }

    /// Whole job: package, then publish
    pub fn run<R: CommandRunner>(&self, publisher: &Publisher<R>) -> Result<RunReport> {
        let mut report = self.package()?;
        let outcome = self.publish(publisher)?;

        report.published = Some(PublishSummary {
            url: outcome.public_url,
            initialized: outcome.initialized,
            committed: outcome.committed,
        });
        report.finished_at = OffsetDateTime::now_utc();

        Ok(report)
    }

    /// Keep the unmasked input out of the pushed tree when it lives in the
    /// working directory.
    fn ignore_input(&self) -> Result<()> {
        let input = self.input_path();
        let Ok(relative) = input.strip_prefix(&self.workdir) else {
            return Ok(());
        };
        let entry = format!(
            "/{}",
            relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/")
        );

        let gitignore = self.workdir.join(".gitignore");
        let existing = match std::fs::read_to_string(&gitignore) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", gitignore.display()));
            }
        };

        if existing.lines().any(|line| line.trim() == entry) {
            return Ok(());
        }

        let mut content = existing;
        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }
        content.push_str(&entry);
        content.push('\n');
        std::fs::write(&gitignore, content)
            .with_context(|| format!("Failed to write {}", gitignore.display()))?;

        tracing::info!(entry = %entry, "Excluded raw input from version control");
        Ok(())
    }
}
