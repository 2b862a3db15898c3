use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use pulldown_cmark::{Options, Parser};

use crate::derive::{is_safe_segment, normalize_permalink, title_order};
use crate::formats::{Record, RecordDocument};
use crate::validate::{self, Level};

pub const RECORD_EXTENSIONS: [&str; 2] = ["json", "md"];

/// One metadata file after parsing, before validation.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub file: String,
    pub document: RecordDocument,
    pub body_md: Option<String>,
}

/// Metadata files in `dir`, sorted by file name.
pub fn record_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("read records dir: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if !RECORD_EXTENSIONS.contains(&ext) || !path.is_file() {
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

pub fn parse_file(path: &Path) -> anyhow::Result<ParsedFile> {
    let file = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("read record: {}", path.display()))?;

    let (document, body_md) = match path.extension().and_then(|e| e.to_str()) {
        Some("md") => {
            let (yaml, body) = split_front_matter(&contents)
                .with_context(|| format!("parse front matter: {}", path.display()))?;
            let document: RecordDocument = serde_yaml::from_str(yaml)
                .with_context(|| format!("deserialize front matter: {}", path.display()))?;
            let body = body.trim();
            (document, (!body.is_empty()).then(|| body.to_owned()))
        }
        _ => {
            let document: RecordDocument = serde_json::from_str(&contents)
                .with_context(|| format!("parse record json: {}", path.display()))?;
            (document, None)
        }
    };

    Ok(ParsedFile {
        file,
        document,
        body_md,
    })
}

/// Split `---`-delimited YAML front matter from the Markdown body.
pub fn split_front_matter(contents: &str) -> anyhow::Result<(&str, &str)> {
    let contents = contents.strip_prefix('\u{feff}').unwrap_or(contents);
    let Some(first_line_end) = contents.find('\n') else {
        anyhow::bail!("record must start with YAML front matter ('---')");
    };
    if contents[..first_line_end].trim_end() != "---" {
        anyhow::bail!("record must start with YAML front matter ('---')");
    }

    let rest = &contents[first_line_end + 1..];
    let mut offset = 0usize;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok((yaml, body));
        }
        offset += line.len();
    }

    anyhow::bail!("front matter is not closed with '---'")
}

pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_FOOTNOTES);
    let parser = Parser::new_ext(markdown, options);
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    html
}

/// Normalize a validated document. Fails only when a required field is absent.
pub fn to_record(parsed: ParsedFile) -> anyhow::Result<Record> {
    let ParsedFile {
        file,
        document,
        body_md,
    } = parsed;

    let id = document
        .record_id()
        .ok_or_else(|| anyhow::anyhow!("{file}: missing record_id"))?;
    if !is_safe_segment(&id) {
        anyhow::bail!("{file}: record_id `{id}` cannot be used as a page directory");
    }
    let title = document
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| anyhow::anyhow!("{file}: missing title"))?
        .to_owned();
    let rights = document
        .rights
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| anyhow::anyhow!("{file}: missing rights"))?
        .to_owned();
    let year = document.date.as_ref().and_then(|date| date.as_year());

    let permalink = normalize_permalink(
        document
            .identifiers
            .as_ref()
            .and_then(|ids| ids.permalink.as_deref()),
        &id,
    );

    Ok(Record {
        id,
        title,
        creators: clean_list(document.creators),
        subjects: clean_list(document.subjects),
        collection: non_empty(document.collection),
        genres: clean_list(document.genres),
        record_type: non_empty(document.record_type),
        year,
        language: non_empty(document.language),
        summary: non_empty(document.abstract_text).or_else(|| non_empty(document.summary)),
        quality: document
            .quality_grade
            .filter(|grade| !grade.is_blank())
            .map(|grade| grade.to_string()),
        rights,
        source_url: non_empty(document.source_url),
        downloads: document.downloads.unwrap_or_default(),
        contributors: document.contributors.unwrap_or_default(),
        citation: document.citation.unwrap_or_default(),
        permalink,
        body_html: body_md.map(|md| render_markdown(&md)),
        source_file: file,
    })
}

fn clean_list(values: Option<Vec<String>>) -> Vec<String> {
    values
        .unwrap_or_default()
        .into_iter()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Descending year (undated last), then ascending title.
pub fn sort_records(records: &mut [Record]) {
    records.sort_by(|a, b| {
        b.year
            .unwrap_or(0)
            .cmp(&a.year.unwrap_or(0))
            .then_with(|| title_order(&a.title, &b.title))
    });
}

/// Read every record in `dir`. A malformed file aborts immediately; missing
/// required fields are collected across all files before failing.
pub fn load_records(dir: &Path) -> anyhow::Result<Vec<Record>> {
    let files = record_files(dir)?;
    let mut parsed = Vec::with_capacity(files.len());
    for path in &files {
        parsed.push(parse_file(path)?);
    }

    let mut errors = Vec::new();
    let mut seen_ids = HashSet::new();
    for file in &parsed {
        for issue in validate::check_document(&file.file, &file.document, None) {
            match issue.level {
                Level::Error => errors.push(issue.to_string()),
                Level::Warning => {
                    tracing::warn!(file = %issue.file, "{}", issue.message);
                }
            }
        }
        if let Some(id) = file.document.record_id()
            && !seen_ids.insert(id.clone())
        {
            errors.push(validate::duplicate_id_issue(&file.file, &id).to_string());
        }
    }
    if !errors.is_empty() {
        anyhow::bail!(
            "{} record error(s) in {}:\n{}",
            errors.len(),
            dir.display(),
            errors.join("\n")
        );
    }

    let mut records = parsed
        .into_iter()
        .map(to_record)
        .collect::<anyhow::Result<Vec<_>>>()?;
    sort_records(&mut records);

    tracing::info!(count = records.len(), dir = %dir.display(), "loaded records");
    Ok(records)
}
