//! Validation command handler and related utilities

use crate::cli::ValidateArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use contentkit_schemas::check::{check_source, CheckConfig, CheckReport, EntryOutcome};
use contentkit_schemas::loader::{ContentLoader, SourceFile};
use contentkit_schemas::{content_collections, CollectionRegistry, ValidationContext};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn, Instrument};

/// Handle the validate command
#[instrument(skip(config, output), fields(path = ?args.path, strict = args.strict))]
pub async fn handle_validate(
    args: ValidateArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let path = args.path.clone().unwrap_or_else(|| config.content_dir.clone());
    let timer = Timer::with_details("validate_command", &format!("path: {}", path.display()));
    info!("Starting validation process");

    if !path.exists() {
        return Err(Error::FileNotFound { path });
    }

    let check_config = check_config(&args, config);
    debug!(?check_config, "Using check configuration");
    let registry = Arc::new(content_collections());

    let report = if path.is_file() {
        output.info(&format!("Validating entry: {}", path.display()))?;
        validate_file(&registry, &path, args.collection.as_deref(), &check_config)?
    } else {
        if args.collection.is_some() {
            return Err(Error::invalid_args(
                "--collection only applies when validating a single file",
            ));
        }
        output.info(&format!("Validating content in {}", path.display()))?;
        let jobs = jobs(&args, config);
        validate_tree(registry, &path, &check_config, jobs, output)
            .instrument(timer.span().clone())
            .await?
    };

    for failure in &report.failures {
        output.entry_failure(failure)?;
    }

    if let Some(emit) = &args.emit {
        if report.is_success() {
            emit_entries(&report, emit)?;
            output.info(&format!("Wrote normalized entries to {}", emit.display()))?;
        } else {
            warn!(path = %emit.display(), "Not writing entries of a failed check");
            output.warning(&format!("Skipped writing {}: validation failed", emit.display()))?;
        }
    }

    output.check_report(&report)?;

    info!(
        valid = report.entries.len(),
        failed = report.failures.len(),
        elapsed_ms = timer.elapsed().as_millis() as u64,
        "Validation finished"
    );

    if report.is_success() {
        Ok(())
    } else {
        Err(Error::ValidationFailed {
            failed: report.failures.len(),
            total: report.total(),
        })
    }
}

/// Merge command-line flags over the `[validation]` config section
fn check_config(args: &ValidateArgs, config: &Config) -> CheckConfig {
    let mut check = if args.strict || config.validation.strict {
        CheckConfig::strict()
    } else {
        CheckConfig::standard()
    };
    if args.fail_fast || config.validation.fail_fast {
        check = check.with_fail_fast();
    }
    check.with_max_errors(args.max_errors.unwrap_or(config.validation.max_errors))
}

/// Number of concurrent validation workers
fn jobs(args: &ValidateArgs, config: &Config) -> usize {
    args.jobs
        .or(config.validation.jobs)
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        })
        .max(1)
}

/// Validate one file against an explicit or inferred collection
fn validate_file(
    registry: &CollectionRegistry,
    path: &Path,
    collection: Option<&str>,
    check_config: &CheckConfig,
) -> Result<CheckReport> {
    let collection = match collection {
        Some(name) => name.to_string(),
        None => infer_collection(path).ok_or_else(|| {
            Error::invalid_args(format!(
                "Cannot infer the collection of {}; pass --collection",
                path.display()
            ))
        })?,
    };
    registry.lookup(&collection)?;

    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let source = SourceFile {
        collection,
        path: path.to_path_buf(),
        id: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };

    let loader = ContentLoader::new(parent);
    let outcome = check_source(registry, &loader, &source, &check_config.context());

    let mut report = CheckReport::new();
    report.push_outcome(outcome);
    Ok(report.finalize())
}

/// Name of the directory directly holding the file
fn infer_collection(path: &Path) -> Option<String> {
    path.parent()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
}

/// Validate every entry of a content tree on a pool of blocking workers
///
/// Sources are dealt round-robin to `jobs` workers; outcomes flow back over
/// a channel so progress can be reported as they arrive.
async fn validate_tree(
    registry: Arc<CollectionRegistry>,
    root: &Path,
    check_config: &CheckConfig,
    jobs: usize,
    output: &mut OutputWriter,
) -> Result<CheckReport> {
    let loader = ContentLoader::new(root);
    let sources = loader.discover(&registry)?;
    let total = sources.len();
    if total == 0 {
        output.warning(&format!("No content entries found under {}", root.display()))?;
    }

    let workers = jobs.min(total).max(1);
    debug!(entries = total, workers, "Dispatching validation");
    output.debug(&format!("Checking {} entries with {} worker(s)", total, workers))?;

    let mut batches: Vec<Vec<SourceFile>> = (0..workers).map(|_| Vec::new()).collect();
    for (index, source) in sources.into_iter().enumerate() {
        batches[index % workers].push(source);
    }

    let loader = Arc::new(loader);
    let ctx: ValidationContext = check_config.context();
    let stop = Arc::new(AtomicBool::new(false));
    let fail_fast = check_config.fail_fast;
    let (tx, mut rx) = mpsc::unbounded_channel::<EntryOutcome>();

    let mut tasks = JoinSet::new();
    for batch in batches {
        let registry = Arc::clone(&registry);
        let loader = Arc::clone(&loader);
        let stop = Arc::clone(&stop);
        let ctx = ctx.clone();
        let tx = tx.clone();

        tasks.spawn_blocking(move || {
            for source in batch {
                if stop.load(Ordering::Relaxed) {
                    break;
                }
                let outcome = check_source(&registry, &loader, &source, &ctx);
                if fail_fast && !outcome.is_valid() {
                    stop.store(true, Ordering::Relaxed);
                }
                if tx.send(outcome).is_err() {
                    break;
                }
            }
        });
    }
    drop(tx);

    let progress = output.progress_bar(total as u64, "Validating entries");
    let mut report = CheckReport::new();
    while let Some(outcome) = rx.recv().await {
        if let Some(pb) = &progress {
            pb.inc(1);
        }
        report.push_outcome(outcome);
    }

    while let Some(joined) = tasks.join_next().await {
        joined.map_err(|e| Error::other(format!("Validation worker failed: {}", e)))?;
    }
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    Ok(report.finalize())
}

/// Write normalized entries, keyed by collection, as pretty JSON
fn emit_entries(report: &CheckReport, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(&report.to_collections_value())?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn args(path: &Path) -> ValidateArgs {
        ValidateArgs {
            path: Some(path.to_path_buf()),
            collection: None,
            strict: false,
            fail_fast: false,
            max_errors: None,
            emit: None,
            jobs: Some(2),
        }
    }

    fn quiet_output() -> OutputWriter {
        OutputWriter::with_writer(OutputFormat::Json, false, true, 0, Box::new(std::io::sink()))
    }

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    const POST: &str = "---\ntitle: T\nsubtitle: S\ndescription: D\npubDate: 2024-02-29\n---\nBody\n";

    #[test]
    fn test_flags_override_config() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.validation.max_errors = 7;

        let mut cli_args = args(dir.path());
        let check = check_config(&cli_args, &config);
        assert_eq!(check.max_errors, 7);
        assert!(!check.fail_fast);

        cli_args.max_errors = Some(1);
        cli_args.strict = true;
        let check = check_config(&cli_args, &config);
        assert_eq!(check.max_errors, 1);
        assert_eq!(check.mode, contentkit_schemas::ValidationMode::Strict);
    }

    #[test]
    fn test_jobs_never_zero() {
        let dir = TempDir::new().unwrap();
        let mut cli_args = args(dir.path());
        cli_args.jobs = Some(0);
        assert_eq!(jobs(&cli_args, &Config::default()), 1);
    }

    #[test]
    fn test_infer_collection_from_parent() {
        assert_eq!(
            infer_collection(Path::new("src/content/blog/post.md")),
            Some("blog".to_string())
        );
    }

    #[tokio::test]
    async fn test_valid_tree_with_emit() {
        let dir = TempDir::new().unwrap();
        let content = dir.path().join("content");
        for i in 0..5 {
            write(&content, &format!("blog/post-{}.md", i), POST);
        }
        let emit = dir.path().join("out").join("entries.json");

        let mut cli_args = args(&content);
        cli_args.emit = Some(emit.clone());
        handle_validate(cli_args, &Config::default(), &mut quiet_output())
            .await
            .unwrap();

        let emitted: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(emit).unwrap()).unwrap();
        assert_eq!(emitted["blog"].as_array().unwrap().len(), 5);
        assert_eq!(emitted["blog"][0]["slug"], "post-0");
        assert_eq!(emitted["blog"][0]["data"]["pubDate"], "2024-02-29T00:00:00Z");
    }

    #[tokio::test]
    async fn test_invalid_tree_fails_and_skips_emit() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "blog/good.md", POST);
        write(dir.path(), "blog/bad.md", "---\ntitle: T\n---\n");
        let emit = dir.path().join("entries.json");

        let mut cli_args = args(dir.path());
        cli_args.emit = Some(emit.clone());
        let err = handle_validate(cli_args, &Config::default(), &mut quiet_output())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ValidationFailed { failed: 1, total: 2 }));
        assert!(!emit.exists());
    }

    #[tokio::test]
    async fn test_single_file_inferred_and_explicit_collection() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "blog/post.md", POST);
        write(dir.path(), "drafts/post.md", POST);

        handle_validate(args(&dir.path().join("blog/post.md")), &Config::default(), &mut quiet_output())
            .await
            .unwrap();

        let err = handle_validate(args(&dir.path().join("drafts/post.md")), &Config::default(), &mut quiet_output())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Registry(_)));

        let mut explicit = args(&dir.path().join("drafts/post.md"));
        explicit.collection = Some("blog".to_string());
        handle_validate(explicit, &Config::default(), &mut quiet_output())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_missing_path() {
        let dir = TempDir::new().unwrap();
        let err = handle_validate(args(&dir.path().join("nope")), &Config::default(), &mut quiet_output())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn test_fail_fast_stops_workers() {
        let dir = TempDir::new().unwrap();
        for i in 0..20 {
            write(dir.path(), &format!("blog/bad-{:02}.md", i), "---\ntitle: T\n---\n");
        }

        let registry = Arc::new(content_collections());
        let report = validate_tree(
            registry,
            dir.path(),
            &CheckConfig::default().with_fail_fast(),
            1,
            &mut quiet_output(),
        )
        .await
        .unwrap();
        assert_eq!(report.failures.len(), 1);
    }
}
