use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use anyhow::Context as _;
use chrono::{DateTime, Utc};

use crate::cli::BuildArgs;
use crate::index::{INDEX_PATH, build_index, serialize_index};
use crate::render::{Page, SiteConfig, render_site};

/// Browser assets shipped with every build.
pub const STATIC_ASSETS: &[(&str, &str)] = &[
    ("assets/css/style.css", include_str!("../assets/css/style.css")),
    ("assets/js/app.js", include_str!("../assets/js/app.js")),
    ("assets/js/home.js", include_str!("../assets/js/home.js")),
    ("assets/js/search.js", include_str!("../assets/js/search.js")),
    ("assets/js/record.js", include_str!("../assets/js/record.js")),
];

/// `SOURCE_DATE_EPOCH` pins the footer timestamp for reproducible output.
pub fn generation_time() -> anyhow::Result<DateTime<Utc>> {
    match std::env::var("SOURCE_DATE_EPOCH") {
        Ok(raw) => {
            let secs: i64 = raw
                .trim()
                .parse()
                .with_context(|| format!("parse SOURCE_DATE_EPOCH: {raw}"))?;
            DateTime::from_timestamp(secs, 0)
                .ok_or_else(|| anyhow::anyhow!("SOURCE_DATE_EPOCH out of range: {secs}"))
        }
        Err(_) => Ok(Utc::now()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub records: usize,
    pub pages: usize,
}

pub fn run(args: BuildArgs) -> anyhow::Result<()> {
    let mut config = SiteConfig::new(args.title.clone(), generation_time()?);
    config.spotlight = args.spotlight;
    config.shelf_size = args.shelf_size;
    config.top_genres = args.top_genres;

    let summary = build_site(
        &PathBuf::from(&args.records),
        &PathBuf::from(&args.out),
        &config,
        args.mirror_index.as_deref().map(Path::new),
    )?;
    println!(
        "Built site with {} record{} ({} pages).",
        summary.records,
        if summary.records == 1 { "" } else { "s" },
        summary.pages
    );
    Ok(())
}

pub fn build_site(
    records_dir: &Path,
    out_dir: &Path,
    config: &SiteConfig,
    mirror_index: Option<&Path>,
) -> anyhow::Result<BuildSummary> {
    tracing::info!(records = %records_dir.display(), out = %out_dir.display(), "build: load");
    let records = crate::load::load_records(records_dir).context("load records")?;

    tracing::info!("build: index");
    let rows = build_index(&records);
    let index_json = serialize_index(&rows)?;

    tracing::info!("build: render");
    let pages = render_site(&records, &rows, config).context("render pages")?;
    ensure_unique_paths(&pages)?;

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("create output dir: {}", out_dir.display()))?;
    for page in &pages {
        write_file(&out_dir.join(&page.path), &page.html)?;
    }
    write_file(&out_dir.join(INDEX_PATH), &index_json)?;
    if let Some(mirror) = mirror_index {
        write_file(mirror, &index_json)?;
    }
    for (path, contents) in STATIC_ASSETS {
        write_file(&out_dir.join(path), contents)?;
    }
    write_file(
        &out_dir.join("sw.js"),
        &crate::offline::service_worker(&index_json)?,
    )?;

    tracing::info!(records = records.len(), pages = pages.len(), "build: done");
    Ok(BuildSummary {
        records: records.len(),
        pages: pages.len(),
    })
}

fn ensure_unique_paths(pages: &[Page]) -> anyhow::Result<()> {
    let mut seen = HashSet::new();
    for page in pages {
        if !Path::new(&page.path)
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
        {
            anyhow::bail!("page path leaves the output directory: {}", page.path);
        }
        if !seen.insert(page.path.as_str()) {
            anyhow::bail!("two pages render to the same path: {}", page.path);
        }
    }
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create dir: {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("write: {}", path.display()))
}
