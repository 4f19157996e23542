//! `vaultpub publish` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use vaultpub_config::{CliSettings, Config};
use vaultpub_core::{
    Action, Collaborators, DocumentSource, OutputSink, PublishReport, Publisher,
};
use vaultpub_storage::FsStorage;
use vaultpub_upload::HttpUploader;

use crate::error::CliError;
use crate::host::{FileDocument, FileSink, StdoutSink, TerminalNotifier, VaultLinkIndex};
use crate::output::Output;

/// Arguments for the publish command.
#[derive(Args)]
pub(crate) struct PublishArgs {
    /// Path to the markdown file.
    file: PathBuf,

    /// Path to configuration file (default: auto-discover vaultpub.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Vault root directory (overrides config).
    #[arg(long)]
    vault: Option<PathBuf>,

    /// Upload endpoint URL (overrides config).
    #[arg(long, env = "VAULTPUB_ENDPOINT")]
    endpoint: Option<String>,

    /// Write the published text to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the rewritten text back into the source file.
    #[arg(long)]
    replace_original: bool,

    /// PUBLISH writes to the output, REPLACE rewrites the source file.
    #[arg(short, long, default_value = "PUBLISH")]
    action: String,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl PublishArgs {
    /// Execute the publish command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration, the action or the document is
    /// invalid, or if writing the result fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let action: Action = self.action.parse()?;

        let cli_settings = CliSettings {
            vault_root: self.vault.clone(),
            replace_original_doc: self.replace_original.then_some(true),
            endpoint: self.endpoint.clone(),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        config.uploader.require_endpoint()?;

        if !self.file.is_file() {
            return Err(CliError::Validation(format!(
                "document not found: {}",
                self.file.display()
            )));
        }

        let storage = FsStorage::new(config.vault_root.clone());
        let uploader = HttpUploader::from_config(&config.uploader)?;
        let document = FileDocument::new(&self.file);
        let text = document.current_text().unwrap_or_default();
        let source_dir = vault_relative_dir(&self.file, &config.vault_root);
        let links = VaultLinkIndex::new(&storage, &text, &source_dir)?;
        let notifier = TerminalNotifier::new();
        let sink: Box<dyn OutputSink> = match &self.output {
            Some(path) => Box::new(FileSink::new(path)),
            None => Box::new(StdoutSink),
        };

        output.info(&format!("Config: {}", config_source(&config)));
        output.info(&format!("Publishing {}...", self.file.display()));

        let publisher = Publisher::new(
            config.publish.clone(),
            Collaborators {
                document: &document,
                storage: &storage,
                uploader: &uploader,
                links: &links,
                notifier: &notifier,
                sink: sink.as_ref(),
            },
        );
        let report = publisher.process(&action.to_string())?;

        print_report(&output, &report);
        Ok(())
    }
}

/// Directory of `file` relative to the vault root, or the root itself if
/// the file lies outside the vault.
fn vault_relative_dir(file: &Path, vault_root: &Path) -> PathBuf {
    let (Ok(file), Ok(root)) = (file.canonicalize(), vault_root.canonicalize()) else {
        return PathBuf::new();
    };
    file.parent()
        .and_then(|dir| dir.strip_prefix(&root).ok())
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

/// Where the configuration came from, for the run header.
fn config_source(config: &Config) -> String {
    match &config.config_path {
        Some(path) => path.display().to_string(),
        None => "defaults (no vaultpub.toml found)".to_owned(),
    }
}

fn print_report(output: &Output, report: &PublishReport) {
    output.highlight(&format!("\n{} complete", report.action));
    output.info(&format!(
        "Images: {} found, {} uploaded, {} replaced",
        report.references, report.uploads.uploaded, report.images_rewritten
    ));
    if report.uploads.failed > 0 {
        output.warning(&format!("Failed uploads: {}", report.uploads.failed));
    }
    if let Some(path) = &report.uploads.aborted_at {
        output.warning(&format!(
            "Stopped at missing image: {}",
            path.display()
        ));
    }
    output.info(&format!(
        "Links: {} resolved, {} replaced with text",
        report.links.resolved, report.links.stripped
    ));
    if report.committed {
        output.success("Source document updated");
    }
}
