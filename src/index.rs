use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::cli::IndexArgs;
use crate::derive::genres;
use crate::formats::{IndexRow, Record, RelatedPayload};

/// Site-relative path of the published index.
pub const INDEX_PATH: &str = "search/index.json";

pub fn index_row(record: &Record) -> IndexRow {
    IndexRow {
        id: record.id.clone(),
        title: record.title.clone(),
        creators: record.creators.clone(),
        subjects: record.subjects.clone(),
        genres: genres(record),
        collection: record.collection.clone(),
        year: record.year,
        lang: record.language.clone(),
        quality: record.quality.clone(),
        permalink: record.permalink.clone(),
    }
}

/// One row per record, in loader order.
pub fn build_index(records: &[Record]) -> Vec<IndexRow> {
    records.iter().map(index_row).collect()
}

pub fn related_payload(row: &IndexRow) -> RelatedPayload {
    RelatedPayload {
        id: row.id.clone(),
        subjects: row.subjects.clone(),
        genres: row.genres.clone(),
        collection: row.collection.clone(),
    }
}

pub fn serialize_index(rows: &[IndexRow]) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(rows).context("serialize search index")?;
    json.push('\n');
    Ok(json)
}

pub fn write_index(rows: &[IndexRow], path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create index dir: {}", parent.display()))?;
    }
    std::fs::write(path, serialize_index(rows)?)
        .with_context(|| format!("write search index: {}", path.display()))?;
    tracing::info!(rows = rows.len(), path = %path.display(), "wrote search index");
    Ok(())
}

pub fn parse_index(json: &str) -> anyhow::Result<Vec<IndexRow>> {
    serde_json::from_str(json).context("parse search index")
}

pub fn read_index(path: &Path) -> anyhow::Result<Vec<IndexRow>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read search index: {}", path.display()))?;
    parse_index(&json).with_context(|| format!("search index: {}", path.display()))
}

pub fn run(args: IndexArgs) -> anyhow::Result<()> {
    let records = crate::load::load_records(&PathBuf::from(&args.records)).context("load records")?;
    let rows = build_index(&records);
    write_index(&rows, &PathBuf::from(&args.out))?;
    println!("Wrote {} records to {}", rows.len(), args.out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashSet};

    use super::*;
    use crate::derive::era;
    use crate::formats::Downloads;

    fn record(id: &str, year: Option<i32>, subjects: &[&str]) -> Record {
        Record {
            id: id.to_owned(),
            title: format!("Title {id}"),
            creators: vec!["Anon".to_owned()],
            subjects: subjects.iter().map(|s| (*s).to_owned()).collect(),
            collection: None,
            genres: Vec::new(),
            record_type: Some("book".to_owned()),
            year,
            language: Some("la".to_owned()),
            summary: None,
            quality: Some("A".to_owned()),
            rights: "Public domain".to_owned(),
            source_url: None,
            downloads: Downloads::default(),
            contributors: Vec::new(),
            citation: BTreeMap::new(),
            permalink: format!("record/{id}/"),
            body_html: None,
            source_file: format!("{id}.json"),
        }
    }

    #[test]
    fn index_has_one_unique_row_per_record_in_order() {
        let records = vec![
            record("a", Some(1900), &["Poetry"]),
            record("b", Some(540), &["Monasticism"]),
            record("c", None, &[]),
        ];
        let rows = build_index(&records);
        assert_eq!(rows.len(), records.len());
        let ids: HashSet<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), rows.len());
        assert_eq!(rows[0].id, "a");
        assert_eq!(rows[2].genres, vec!["Book".to_owned()]);
    }

    #[test]
    fn written_index_rederives_the_same_eras_and_genres() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        let records = vec![
            record("a", Some(1900), &["English poetry"]),
            record("b", Some(540), &["Monasticism"]),
        ];
        let rows = build_index(&records);
        let path = dir.path().join(INDEX_PATH);
        write_index(&rows, &path)?;

        let reread = read_index(&path)?;
        assert_eq!(reread, rows);
        for (row, record) in reread.iter().zip(&records) {
            assert_eq!(era(row.year), era(record.year));
            assert_eq!(row.genres, genres(record));
        }
        Ok(())
    }
}
