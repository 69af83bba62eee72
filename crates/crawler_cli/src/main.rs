//! Batch driver: resolves input sources, runs the extraction pipeline per
//! document, downloads referenced images and writes the importable outputs.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::Utc;
use clap::Parser;
use log::{error, info, warn, LevelFilter};

use crawler_engine::{
    ensure_output_dir, extract_and_convert, resolve_sources, write_content_json,
    write_markdown_previews, AtomicFileWriter, ExerciseRecord, Fetch, FetchSettings, ImageRef,
    InputSource, ReqwestFetcher, SourceKind,
};
use crawler_logging::LogDestination;

/// Parse legacy WordPress pages into database-ready JSON and Markdown.
#[derive(Parser, Debug)]
#[command(name = "crawler")]
#[command(about = "Parse legacy HTML pages into importable JSON and Markdown", long_about = None)]
struct Args {
    /// HTML file path, URL, or .txt file listing sources (one per line,
    /// `#` comments allowed)
    #[arg(value_name = "SOURCE")]
    source: String,

    /// Exercise type id stamped into every exported record
    #[arg(long, default_value = "")]
    exercise_type_id: String,

    /// Output directory (default: parsed-data/<UTC timestamp>)
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    crawler_logging::initialize(LogDestination::Terminal, LevelFilter::Info);

    let sources = resolve_sources(&args.source).context("resolving input sources")?;
    info!("Found {} source(s) to process", sources.len());

    let output_dir = args.output_dir.unwrap_or_else(default_output_dir);
    ensure_output_dir(&output_dir)
        .with_context(|| format!("preparing output directory {}", output_dir.display()))?;
    info!("Output directory: {}", output_dir.display());

    let fetcher = ReqwestFetcher::new(FetchSettings::default())?;

    let mut records = Vec::new();
    for source in &sources {
        match process_source(&fetcher, source, &output_dir, &args.exercise_type_id).await {
            Ok(record) => records.push(record),
            // A bad document must not sink the batch.
            Err(err) => error!("Failed to process {}: {err:#}", source.value),
        }
    }

    if records.is_empty() {
        bail!("no sources were processed successfully");
    }

    let json_path = write_content_json(&output_dir, &records)?;
    info!("Saved JSON data to {}", json_path.display());
    let previews = write_markdown_previews(&output_dir, &records)?;
    info!("Saved {} markdown preview(s)", previews.len());
    info!(
        "Processed {}/{} source(s) into {}",
        records.len(),
        sources.len(),
        output_dir.display()
    );
    Ok(())
}

async fn process_source(
    fetcher: &ReqwestFetcher,
    source: &InputSource,
    output_dir: &Path,
    exercise_type_id: &str,
) -> anyhow::Result<ExerciseRecord> {
    info!("Processing: {}", source.value);

    let html = match source.kind {
        SourceKind::Url => fetcher.fetch_page(&source.value).await?,
        SourceKind::HtmlFile => std::fs::read_to_string(&source.value)
            .with_context(|| format!("reading {}", source.value))?,
        SourceKind::ListFile => bail!("nested list files are not supported: {}", source.value),
    };

    let parsed = extract_and_convert(&html)?;
    info!(
        "  Title: \"{}\" ({} characters, {} image(s))",
        parsed.header,
        parsed.body.len(),
        parsed.images.len()
    );

    download_images(fetcher, &parsed.images, output_dir).await;

    Ok(ExerciseRecord {
        header: parsed.header,
        body: parsed.body,
        exercise_type_id: exercise_type_id.to_string(),
    })
}

/// Download each referenced image next to the text outputs. Individual
/// failures are logged and skipped; the record itself is already complete.
async fn download_images(fetcher: &ReqwestFetcher, images: &[ImageRef], output_dir: &Path) {
    if images.is_empty() {
        return;
    }
    let writer = AtomicFileWriter::new(output_dir.to_path_buf());
    let total = images.len();
    for (index, image) in images.iter().enumerate() {
        let result = fetcher
            .fetch_bytes(&image.original_url)
            .await
            .map_err(anyhow::Error::from)
            .and_then(|bytes| Ok(writer.write_bytes(&image.local_path, &bytes)?));
        match result {
            Ok(_) => info!("  [{}/{}] downloaded {}", index + 1, total, image.local_path),
            Err(err) => warn!(
                "  [{}/{}] failed {}: {err:#}",
                index + 1,
                total,
                image.original_url
            ),
        }
    }
}

fn default_output_dir() -> PathBuf {
    let timestamp = Utc::now().format("%Y-%m-%d_%H-%M-%SZ").to_string();
    PathBuf::from("parsed-data").join(timestamp)
}
