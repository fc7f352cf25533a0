//! Document extraction commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::Settings;
use crate::export::write_records;
use crate::models::{OcrQuality, VoterRecord};
use crate::ocr::{AcquisitionMethod, PageOcr};
use crate::parse::extract_records;

/// Collect `*.pdf` files in a directory, sorted so the output order is
/// deterministic regardless of worker scheduling.
fn list_pdfs(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("reading {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Records carry the bare filename as their source identifier, like
/// the rolls they were scanned from.
fn source_id(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Acquire one document's text and run the segmentation engine.
///
/// Acquisition failures are logged and yield zero records; the batch
/// keeps going.
fn process_document(ocr: &PageOcr, path: &Path) -> Vec<VoterRecord> {
    let id = source_id(path);
    match ocr.acquire(path) {
        Ok(acquired) => {
            tracing::info!(
                "{}: {} pages via {}",
                id,
                acquired.page_count,
                acquired.method.as_str()
            );
            extract_records(&acquired.text, &id)
        }
        Err(e) => {
            tracing::warn!("{}: text acquisition failed: {}", id, e);
            Vec::new()
        }
    }
}

pub async fn cmd_extract(
    settings: &Settings,
    pdf_dir: Option<PathBuf>,
    output: Option<PathBuf>,
    lang: Option<String>,
    workers: Option<usize>,
    force_ocr: bool,
) -> anyhow::Result<()> {
    let pdf_dir = pdf_dir.unwrap_or_else(|| settings.pdf_dir.clone());
    let output = output.unwrap_or_else(|| settings.output.clone());
    let language = lang.unwrap_or_else(|| settings.language.clone());
    let workers = workers.unwrap_or(settings.workers).max(1);

    let files = list_pdfs(&pdf_dir)?;
    if files.is_empty() {
        println!(
            "{} No PDF files found in {}",
            style("!").yellow(),
            pdf_dir.display()
        );
        return Ok(());
    }

    let ocr = PageOcr::new()
        .with_language(&language)
        .with_dpi(settings.dpi)
        .with_min_chars(settings.min_chars_per_page)
        .with_force_ocr(force_ocr);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")
            .unwrap()
            .progress_chars("█▓░"),
    );
    pb.set_message("Extracting records...");

    let start = Instant::now();
    let semaphore = Arc::new(Semaphore::new(workers));
    let mut set: JoinSet<(usize, Vec<VoterRecord>)> = JoinSet::new();

    for (index, path) in files.iter().cloned().enumerate() {
        let permit = semaphore.clone().acquire_owned().await?;
        let ocr = ocr.clone();
        let pb = pb.clone();
        set.spawn(async move {
            let _permit = permit;
            let records = tokio::task::spawn_blocking(move || process_document(&ocr, &path))
                .await
                .unwrap_or_default();
            pb.inc(1);
            (index, records)
        });
    }

    let mut per_document: Vec<(usize, Vec<VoterRecord>)> = Vec::with_capacity(files.len());
    while let Some(result) = set.join_next().await {
        match result {
            Ok(entry) => per_document.push(entry),
            Err(e) => tracing::error!("extraction worker failed: {e}"),
        }
    }
    pb.finish_and_clear();

    // Parallelism must not change the output: restore input order
    // before concatenating the per-document sequences.
    per_document.sort_by_key(|(index, _)| *index);
    let records: Vec<VoterRecord> = per_document
        .into_iter()
        .flat_map(|(_, records)| records)
        .collect();

    let low_quality = records
        .iter()
        .filter(|r| r.ocr_quality == OcrQuality::Low)
        .count();

    write_records(&output, &records)?;

    println!(
        "{} Extracted {} records from {} documents in {:.1}s",
        style("✓").green(),
        records.len(),
        files.len(),
        start.elapsed().as_secs_f64()
    );
    if low_quality > 0 {
        println!(
            "  {} {} records flagged low OCR quality",
            style("!").yellow(),
            low_quality
        );
    }
    println!(
        "  Results saved in: {}",
        style(output.display().to_string()).cyan()
    );

    Ok(())
}

pub async fn cmd_preview(
    settings: &Settings,
    file: PathBuf,
    lang: Option<String>,
    force_ocr: bool,
) -> anyhow::Result<()> {
    let language = lang.unwrap_or_else(|| settings.language.clone());
    let ocr = PageOcr::new()
        .with_language(&language)
        .with_dpi(settings.dpi)
        .with_min_chars(settings.min_chars_per_page)
        .with_force_ocr(force_ocr);

    let id = source_id(&file);
    let acquired = {
        let file = file.clone();
        tokio::task::spawn_blocking(move || ocr.acquire(&file))
            .await
            .context("preview task failed")??
    };

    let method_note = if acquired.method == AcquisitionMethod::Ocr {
        format!("OCR, {} pages", acquired.page_count)
    } else {
        format!("text layer, {} pages", acquired.page_count)
    };
    println!("{} {} ({})", style("→").cyan(), id, method_note);

    let records = extract_records(&acquired.text, &id);
    println!("{}", serde_json::to_string_pretty(&records)?);
    println!("{} {} records", style("✓").green(), records.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_pdfs_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.pdf", "a.PDF", "notes.txt", "c.pdf"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        let files = list_pdfs(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.PDF", "b.pdf", "c.pdf"]);
    }

    #[test]
    fn test_source_id_is_bare_filename() {
        assert_eq!(source_id(Path::new("/data/pdfs/roll-7.pdf")), "roll-7.pdf");
    }
}
