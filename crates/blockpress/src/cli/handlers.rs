//! Command handlers.

use blockpress::{
    BlockpressResult, Document, EditingSession, HttpReferenceFetcher, HttpUploadGateway,
    JsonError, JsonFilePersister, PermanentPrefixes, PersistError, RewriteReport, RewriterConfig,
    SaveOutcome, SavePolicy, StdoutPersister, UploadConfig, classify, upload_image_file,
};
use std::path::{Path, PathBuf};

fn load_config(path: Option<&Path>) -> BlockpressResult<UploadConfig> {
    match path {
        Some(path) => UploadConfig::from_file(path),
        None => UploadConfig::load(),
    }
}

fn rewriter_config(config: &UploadConfig, folder: Option<String>) -> RewriterConfig {
    let rewriter = RewriterConfig::from(config);
    match folder {
        Some(folder) => rewriter.with_folder(Some(folder)),
        None => rewriter,
    }
}

fn print_outcomes(report: &RewriteReport) {
    for outcome in report.outcomes() {
        eprintln!("{:<10} {:<12} {}", outcome.path().to_string(), outcome.kind().to_string(), outcome.status());
    }
    eprintln!(
        "{}: {} processed, {} uploads, {} failed",
        report.status(),
        report.processed_count(),
        report.upload_count(),
        report.failures().count()
    );
}

/// Print the classification of `value`.
pub fn classify_reference(
    config_path: Option<&Path>,
    value: &str,
    extra_prefixes: Vec<String>,
) -> BlockpressResult<()> {
    let config = load_config(config_path)?;
    let prefixes = PermanentPrefixes::new(
        config
            .permanent_prefixes()
            .iter()
            .cloned()
            .chain(extra_prefixes),
    );
    println!("{}", classify(value, &prefixes));
    Ok(())
}

/// Upload one image file and print the durable URL.
pub async fn upload_file(
    config_path: Option<&Path>,
    file: &Path,
    folder: Option<String>,
) -> BlockpressResult<()> {
    let config = load_config(config_path)?;
    let gateway = HttpUploadGateway::new(&config)?;

    let url = upload_image_file(&gateway, file, folder.as_deref()).await?;
    println!("{}", url);
    Ok(())
}

/// Rewrite a JSON document and save it to `output` (or stdout).
pub async fn rewrite_document(
    config_path: Option<&Path>,
    input: &Path,
    output: Option<PathBuf>,
    allow_partial: bool,
    folder: Option<String>,
) -> BlockpressResult<()> {
    let config = load_config(config_path)?;

    let json = tokio::fs::read_to_string(input)
        .await
        .map_err(|e| JsonError::new(format!("{}: {}", input.display(), e)))?;
    let document = Document::from_json(&json)?;

    let session = EditingSession::new(
        HttpUploadGateway::new(&config)?,
        rewriter_config(&config, folder),
    )
    .with_fetcher(HttpReferenceFetcher::new(config.timeout())?);

    let policy = if allow_partial {
        SavePolicy::AllowPartial
    } else {
        SavePolicy::RequireComplete
    };

    let outcome = match output {
        Some(path) => {
            session
                .save(&document, &JsonFilePersister::new(path), policy)
                .await?
        }
        None => session.save(&document, &StdoutPersister, policy).await?,
    };

    print_outcomes(outcome.report());
    match outcome {
        SaveOutcome::Saved { .. } => Ok(()),
        SaveOutcome::Blocked { report } => Err(PersistError::new(format!(
            "save blocked: {} media node(s) unresolved; rerun or pass --allow-partial",
            report.failures().count()
        ))
        .into()),
    }
}
