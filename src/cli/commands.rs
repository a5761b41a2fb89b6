//! Command implementations

use super::OutputFormat;
use crate::classify::{categorize, subcategorize, Category};
use crate::compare::{
    compare_documents, compare_folders, csv_field, inspect_entry, inspectable, render_csv,
    render_json, render_text, ComparisonRequest, DocumentComparison,
};
use crate::config::Config;
use crate::diff::generate_html_diff;
use crate::extract::{describe as describe_document, PdfTextExtractor};
use crate::inventory::{
    latest_versions, CacheKey, DocumentRecord, InventoryBuilder, InventoryFilter,
    InventorySummary, JsonAnnotationStore, RemoteMap, ReviewStatus, ScanCache,
};
use crate::naming::{extract_base_name, extract_version, version_number};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Inventory selection options for the scan command
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Map file to scan instead of the local tree
    pub remote_map: Option<String>,
    /// Keep only the latest version of each document
    pub latest: bool,
    pub project: Option<String>,
    /// Category label, matched case-insensitively
    pub category: Option<String>,
    /// Review status label
    pub status: Option<String>,
}

impl ScanOptions {
    fn filter(&self) -> Result<InventoryFilter> {
        let category = self
            .category
            .as_deref()
            .map(str::parse::<Category>)
            .transpose()
            .map_err(anyhow::Error::msg)?;
        let status = self
            .status
            .as_deref()
            .map(str::parse::<ReviewStatus>)
            .transpose()
            .map_err(anyhow::Error::msg)?;

        Ok(InventoryFilter {
            project: self.project.clone(),
            category,
            status,
        })
    }
}

/// Build the inventory of a document root
///
/// Raw records are reused from `cache` while the source is unchanged and the
/// entry is younger than the cache lifetime. Filters are applied afterwards.
pub fn scan(
    root: &Path,
    config: &Config,
    options: &ScanOptions,
    cache: &mut ScanCache,
) -> Result<Vec<DocumentRecord>> {
    let filter = options.filter()?;
    let annotations = JsonAnnotationStore::load(&config.annotations_path(root));

    let records = match options.remote_map {
        Some(ref map_path) => {
            let map_path = Path::new(map_path);
            if !map_path.exists() {
                anyhow::bail!("Remote map not found: {:?}", map_path);
            }
            let map = RemoteMap::load(map_path);
            cache
                .get_or_insert_with(CacheKey::for_map(map_path, &map), || {
                    builder(&annotations, config).scan_remote(&map)
                })
                .to_vec()
        }
        None => {
            if !root.is_dir() {
                anyhow::bail!("Document root is not a directory: {:?}", root);
            }
            cache
                .get_or_insert_with(CacheKey::for_dir(root), || {
                    let links = RemoteMap::load(&config.remote_map_path(root));
                    builder(&annotations, config)
                        .with_remote_links(&links)
                        .scan_directory(root)
                })
                .to_vec()
        }
    };

    let selected: Vec<DocumentRecord> = if options.latest {
        latest_versions(&records).into_iter().cloned().collect()
    } else {
        records
    };

    let filtered: Vec<DocumentRecord> = selected
        .into_iter()
        .filter(|r| filter.matches(r))
        .collect();

    info!("Inventory contains {} documents", filtered.len());
    Ok(filtered)
}

fn builder<'a>(annotations: &'a JsonAnnotationStore, config: &Config) -> InventoryBuilder<'a> {
    InventoryBuilder::new(annotations)
        .with_extensions(&config.allowed_extensions)
        .with_defaults(&config.default_project, &config.default_owner)
}

/// Print an inventory in the requested format
pub fn print_records(records: &[DocumentRecord], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(records)?;
            println!("{}", json);
        }
        OutputFormat::Csv => print!("{}", records_csv(records)),
        OutputFormat::Text => print_records_text(records),
    }
    Ok(())
}

fn print_records_text(records: &[DocumentRecord]) {
    if records.is_empty() {
        println!("No documents found.");
        return;
    }

    println!("Document Inventory");
    println!("==================\n");

    for record in records {
        println!("{} [{}] {}", record.version, record.category.label(), record.id);
        println!(
            "   Project: {}  Date: {}  Owner: {}",
            record.project, record.date, record.owner
        );
        println!(
            "   Element: {}  Status: {}",
            record.subcategory, record.status
        );
        if let Some(ref link) = record.remote_link {
            println!("   Link: {}", link);
        }
        if !record.notes.is_empty() {
            println!("   Notes: {}", record.notes);
        }
        println!();
    }

    let summary = InventorySummary::from_records(records);
    println!(
        "{} documents in {} projects",
        summary.total, summary.projects
    );
    for (category, count) in &summary.by_category {
        println!("  {:<22} {}", category.label(), count);
    }
}

fn records_csv(records: &[DocumentRecord]) -> String {
    let mut out = String::from(
        "ID,Proyecto,Fecha,Responsable,Documento,Ext,Version,Categoria,Subcategoria,Estado,Revisado,Notas,Descripcion,Link\n",
    );
    for r in records {
        let fields = [
            r.id.clone(),
            r.project.clone(),
            r.date.clone(),
            r.owner.clone(),
            r.file_name.clone(),
            r.extension.clone(),
            r.version.clone(),
            r.category.label().to_string(),
            r.subcategory.clone(),
            r.status.to_string(),
            r.reviewed.to_string(),
            r.notes.clone(),
            r.description.clone(),
            r.remote_link.clone().unwrap_or_default(),
        ];
        let line: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

/// Classification of a single file name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub file_name: String,
    pub category: Category,
    pub subcategory: String,
    pub version: String,
    /// Numeric part of `version`
    pub version_number: u64,
    pub base_name: String,
}

/// Classify a file name with optional folder context and description
pub fn classify(file_name: &str, context: Option<&str>, description: Option<&str>) -> Classification {
    let category = categorize(file_name, context.unwrap_or(""), description.unwrap_or(""));
    let version = extract_version(file_name);

    Classification {
        file_name: file_name.to_string(),
        category,
        subcategory: subcategorize(file_name, category),
        version_number: version_number(&version),
        version,
        base_name: extract_base_name(file_name),
    }
}

/// Print a classification in the requested format
pub fn print_classification(result: &Classification, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => {
            println!("Documento,Categoria,Subcategoria,Version,BaseName");
            println!(
                "{},{},{},{},{}",
                csv_field(&result.file_name),
                csv_field(result.category.label()),
                csv_field(&result.subcategory),
                csv_field(&result.version),
                csv_field(&result.base_name)
            );
        }
        OutputFormat::Text => {
            println!("File:        {}", result.file_name);
            println!("Category:    {}", result.category.label());
            println!("Subcategory: {}", result.subcategory);
            println!("Version:     {}", result.version);
            println!("Base name:   {}", result.base_name);
        }
    }
    Ok(())
}

/// Compare two folder versions or two documents and print the outcome
pub fn compare(
    config: &Config,
    v1: &Path,
    v2: &Path,
    inspect: Option<&str>,
    html: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let request = ComparisonRequest::resolve(v1, v2)?;
    let extractor = PdfTextExtractor::new();

    match request {
        ComparisonRequest::Folders { v1, v2 } => {
            let entries = compare_folders(&v1, &v2);

            let Some(target) = inspect else {
                if html.is_some() {
                    anyhow::bail!("--html needs a document comparison or --inspect");
                }
                match format {
                    OutputFormat::Json => println!("{}", render_json(&entries)?),
                    OutputFormat::Csv => print!("{}", render_csv(&entries)),
                    OutputFormat::Text => {
                        print!("{}", render_text(&entries));
                        let candidates = inspectable(&entries);
                        if !candidates.is_empty() {
                            println!("\nPDFs to inspect for text changes:");
                            for entry in candidates {
                                println!("  {} ({})", entry.relative_path, entry.status);
                            }
                        }
                    }
                }
                return Ok(());
            };

            let wanted = target.replace('\\', "/");
            let entry = entries
                .iter()
                .find(|e| e.relative_path == wanted)
                .ok_or_else(|| anyhow::anyhow!("File not found in either version: {}", target))?;

            let result = inspect_entry(&extractor, entry, config.max_pages);
            print_document_comparison(&entry.relative_path, &result, config.summary_limit, format)?;
            write_html(html, &result)?;
        }
        ComparisonRequest::Documents { v1, v2 } => {
            if inspect.is_some() {
                anyhow::bail!("--inspect only applies to folder comparisons");
            }
            let result = compare_documents(&extractor, &v1, &v2, config.max_pages);
            let label = v2
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            print_document_comparison(&label, &result, config.summary_limit, format)?;
            write_html(html, &result)?;
        }
    }

    Ok(())
}

fn print_document_comparison(
    label: &str,
    result: &DocumentComparison,
    limit: usize,
    format: OutputFormat,
) -> Result<()> {
    let report = result.summary.report(limit);

    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "document": label,
                "removed": result.summary.removed,
                "added": result.summary.added,
                "report": report,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Csv => {
            println!("Documento,Cambio,Linea");
            for line in &result.summary.removed {
                println!("{},REMOVED,{}", csv_field(label), csv_field(line));
            }
            for line in &result.summary.added {
                println!("{},ADDED,{}", csv_field(label), csv_field(line));
            }
        }
        OutputFormat::Text => {
            println!("Text changes in {}", label);
            println!("{}\n", "=".repeat(16 + label.chars().count()));
            for line in report {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

fn write_html(out: Option<&Path>, result: &DocumentComparison) -> Result<()> {
    let Some(out) = out else {
        return Ok(());
    };

    let html = generate_html_diff(&result.text_v1, &result.text_v2);
    std::fs::write(out, html).with_context(|| format!("Failed to write HTML diff: {:?}", out))?;
    info!("Wrote HTML diff to {:?}", out);
    Ok(())
}

/// Suggest a description for a PDF from its first page
pub fn describe(path: &Path) -> Result<String> {
    if !path.is_file() {
        anyhow::bail!("Document not found: {:?}", path);
    }
    Ok(describe_document(&PdfTextExtractor::new(), path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_classify_command() {
        let result = classify("MC-01_calculo_losa_v3.pdf", Some("Puente/20240115"), None);
        assert_eq!(result.category, Category::Memorias);
        assert_eq!(result.subcategory, "MEMORIA");
        assert_eq!(result.version, "V3");
        assert_eq!(result.version_number, 3);
        assert_eq!(result.base_name, "MC-01_calculo_losa");
    }

    #[test]
    fn test_scan_with_filters() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        for rel in [
            "Puente/20240115/Ana/GE-plano_v1.pdf",
            "Puente/20240120/Ana/GE-plano_v2.pdf",
            "Tunel/20240120/Luis/MC-memoria.pdf",
            "Tunel/notas.txt",
        ] {
            let path = root.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "x").unwrap();
        }
        let config = Config::default();
        let mut cache = ScanCache::from_config(&config);

        let all = scan(root, &config, &ScanOptions::default(), &mut cache).unwrap();
        assert_eq!(all.len(), 3);

        let latest = scan(
            root,
            &config,
            &ScanOptions {
                latest: true,
                project: Some("Puente".to_string()),
                ..ScanOptions::default()
            },
            &mut cache,
        )
        .unwrap();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].version, "V2");

        let memorias = scan(
            root,
            &config,
            &ScanOptions {
                category: Some("memorias".to_string()),
                ..ScanOptions::default()
            },
            &mut cache,
        )
        .unwrap();
        assert_eq!(memorias.len(), 1);
        assert_eq!(memorias[0].project, "Tunel");

        let bad = ScanOptions {
            status: Some("unknown".to_string()),
            ..ScanOptions::default()
        };
        assert!(scan(root, &config, &bad, &mut cache).is_err());
    }

    #[test]
    fn test_scan_reuses_cached_records() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let first = root.join("Puente/20240115/Ana/plano_v1.pdf");
        fs::create_dir_all(first.parent().unwrap()).unwrap();
        fs::write(&first, "x").unwrap();

        let config = Config::default();
        let mut cache = ScanCache::from_config(&config);
        let options = ScanOptions::default();
        assert_eq!(scan(root, &config, &options, &mut cache).unwrap().len(), 1);

        // A nested addition leaves the root mtime as it was
        fs::write(first.with_file_name("plano_v2.pdf"), "x").unwrap();
        assert_eq!(scan(root, &config, &options, &mut cache).unwrap().len(), 1);

        cache.invalidate(root);
        assert_eq!(scan(root, &config, &options, &mut cache).unwrap().len(), 2);

        // Caching disabled
        let mut uncached = ScanCache::from_config(&Config {
            cache_ttl_secs: 0,
            ..Config::default()
        });
        assert_eq!(scan(root, &config, &options, &mut uncached).unwrap().len(), 2);
    }

    #[test]
    fn test_scan_remote_map_keyed_by_content() {
        let dir = TempDir::new().unwrap();
        let map_path = dir.path().join("drive_map.json");
        fs::write(&map_path, r#"{"Puente/20240115/Ana/plano_v1.pdf": "https://x/1"}"#).unwrap();

        let config = Config::default();
        let mut cache = ScanCache::from_config(&config);
        let options = ScanOptions {
            remote_map: Some(map_path.to_string_lossy().to_string()),
            ..ScanOptions::default()
        };
        assert_eq!(scan(dir.path(), &config, &options, &mut cache).unwrap().len(), 1);

        fs::write(
            &map_path,
            r#"{"Puente/20240115/Ana/plano_v1.pdf": "https://x/1",
                "Puente/20240115/Ana/plano_v2.pdf": "https://x/2"}"#,
        )
        .unwrap();
        assert_eq!(scan(dir.path(), &config, &options, &mut cache).unwrap().len(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_records_csv_quotes_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("P/plano, corte.pdf");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "x").unwrap();

        let config = Config::default();
        let mut cache = ScanCache::from_config(&config);
        let records = scan(dir.path(), &config, &ScanOptions::default(), &mut cache).unwrap();
        let csv = records_csv(&records);
        assert!(csv.starts_with("ID,Proyecto,"));
        assert!(csv.contains("\"P/plano, corte.pdf\""));
    }
}
