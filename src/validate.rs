use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::cli::ValidateArgs;
use crate::derive::{is_safe_segment, permalink_segments};
use crate::formats::RecordDocument;
use crate::load::{parse_file, record_files};

pub const REQUIRED_FIELDS: [&str; 4] = ["record_id", "title", "date", "rights"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub file: String,
    pub level: Level,
    pub message: String,
}

impl Issue {
    fn error(file: &str, message: impl Into<String>) -> Self {
        Self {
            file: file.to_owned(),
            level: Level::Error,
            message: message.into(),
        }
    }

    fn warning(file: &str, message: impl Into<String>) -> Self {
        Self {
            file: file.to_owned(),
            level: Level::Warning,
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.level {
            Level::Error => "ERROR",
            Level::Warning => "WARN ",
        };
        write!(f, "{tag} {}: {}", self.file, self.message)
    }
}

pub fn duplicate_id_issue(file: &str, id: &str) -> Issue {
    Issue::error(file, format!("duplicate record id `{id}`"))
}

/// Field-level checks for one document. Duplicate ids are checked by the caller.
pub fn check_document(
    file: &str,
    document: &RecordDocument,
    vocabulary: Option<&BTreeSet<String>>,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    let present = [
        document.record_id().is_some(),
        document
            .title
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty()),
        document.date.as_ref().is_some_and(|d| !d.is_blank()),
        document
            .rights
            .as_deref()
            .is_some_and(|r| !r.trim().is_empty()),
    ];
    for (field, present) in REQUIRED_FIELDS.iter().zip(present) {
        if !present {
            issues.push(Issue::error(file, format!("missing required field `{field}`")));
        }
    }

    if let Some(id) = document.record_id()
        && !is_safe_segment(&id)
    {
        issues.push(Issue::error(
            file,
            format!("record_id `{id}` cannot be used as a page directory"),
        ));
    }
    if let Some(permalink) = document
        .identifiers
        .as_ref()
        .and_then(|ids| ids.permalink.as_deref())
        && permalink_segments(permalink).is_none()
    {
        issues.push(Issue::warning(
            file,
            format!("permalink `{permalink}` is unusable; record/<id>/ will be used"),
        ));
    }

    if let Some(date) = &document.date
        && !date.is_blank()
        && date.as_year().is_none()
    {
        issues.push(Issue::warning(
            file,
            format!("date `{date}` is not a year; era will be omitted"),
        ));
    }

    let subjects = document.subjects.as_deref().unwrap_or_default();
    if subjects.is_empty() {
        issues.push(Issue::warning(file, "record has no subjects"));
    }
    if document.creators.as_deref().unwrap_or_default().is_empty() {
        issues.push(Issue::warning(file, "record has no creators"));
    }

    if let Some(vocabulary) = vocabulary {
        for subject in subjects {
            if !vocabulary.contains(subject) {
                issues.push(Issue::warning(
                    file,
                    format!("subject \"{subject}\" not in controlled vocabulary"),
                ));
            }
        }
    }

    issues
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub files: Vec<String>,
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.level == Level::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues.len() - self.error_count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    fn file_has_errors(&self, file: &str) -> bool {
        self.issues
            .iter()
            .any(|i| i.file == file && i.level == Level::Error)
    }

    /// Issues grouped per file in enumeration order, then an `OK` line for each
    /// file without errors.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for file in &self.files {
            lines.extend(
                self.issues
                    .iter()
                    .filter(|i| &i.file == file)
                    .map(ToString::to_string),
            );
        }
        for file in &self.files {
            if !self.file_has_errors(file) {
                lines.push(format!("OK    {file}"));
            }
        }
        lines
    }
}

pub fn read_vocabulary(path: &Path) -> anyhow::Result<BTreeSet<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("read vocabulary: {}", path.display()))?;
    let subjects: Vec<String> = serde_json::from_str(&contents)
        .with_context(|| format!("parse vocabulary: {}", path.display()))?;
    Ok(subjects.into_iter().collect())
}

/// Check every file in `dir`; unlike the loader, a malformed file is recorded
/// and enumeration continues.
pub fn validate_dir(
    dir: &Path,
    vocabulary: Option<&BTreeSet<String>>,
) -> anyhow::Result<ValidationReport> {
    let mut report = ValidationReport::default();
    let mut first_seen: HashMap<String, String> = HashMap::new();

    for path in record_files(dir)? {
        let file = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        report.files.push(file.clone());

        let parsed = match parse_file(&path) {
            Ok(parsed) => parsed,
            Err(err) => {
                let cause = err.root_cause().to_string();
                report
                    .issues
                    .push(Issue::error(&file, format!("unreadable record: {cause}")));
                continue;
            }
        };

        report
            .issues
            .extend(check_document(&file, &parsed.document, vocabulary));
        if let Some(id) = parsed.document.record_id() {
            if let Some(original) = first_seen.get(&id) {
                tracing::debug!(%id, %original, duplicate = %file, "duplicate record id");
                report.issues.push(duplicate_id_issue(&file, &id));
            } else {
                first_seen.insert(id, file);
            }
        }
    }

    Ok(report)
}

pub fn run(args: ValidateArgs) -> anyhow::Result<()> {
    let records_dir = PathBuf::from(&args.records);
    let vocabulary = args
        .vocabulary
        .as_deref()
        .map(|path| read_vocabulary(Path::new(path)))
        .transpose()?;

    let report = validate_dir(&records_dir, vocabulary.as_ref())?;
    for line in report.lines() {
        println!("{line}");
    }
    tracing::info!(
        files = report.files.len(),
        errors = report.error_count(),
        warnings = report.warning_count(),
        "validation finished"
    );

    if report.has_errors() {
        anyhow::bail!(
            "validation failed: {} error(s) in {}",
            report.error_count(),
            records_dir.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(json: &str) -> RecordDocument {
        serde_json::from_str(json).expect("parse test document")
    }

    #[test]
    fn missing_rights_is_a_single_error() {
        let doc = document(
            r#"{"record_id":"a","title":"A","date":540,"subjects":["Monasticism"],"creators":["Benedict"]}"#,
        );
        let issues = check_document("a.json", &doc, None);
        assert_eq!(
            issues,
            vec![Issue::error("a.json", "missing required field `rights`")]
        );
    }

    #[test]
    fn path_like_ids_and_permalinks_are_flagged() {
        let doc = document(
            r#"{"record_id":"../x","title":"A","date":540,"rights":"PD","subjects":["S"],"creators":["C"]}"#,
        );
        assert_eq!(
            check_document("a.json", &doc, None),
            vec![Issue::error(
                "a.json",
                "record_id `../x` cannot be used as a page directory"
            )]
        );

        let doc = document(
            r#"{"record_id":"a","title":"A","date":540,"rights":"PD","subjects":["S"],"creators":["C"],"identifiers":{"permalink":"../../escaped"}}"#,
        );
        assert_eq!(
            check_document("a.json", &doc, None),
            vec![Issue::warning(
                "a.json",
                "permalink `../../escaped` is unusable; record/<id>/ will be used"
            )]
        );
    }

    #[test]
    fn id_alias_satisfies_record_id() {
        let doc = document(
            r#"{"id":"a","title":"A","date":"540","rights":"PD","subjects":["S"],"creators":["C"]}"#,
        );
        assert!(check_document("a.json", &doc, None).is_empty());
    }

    #[test]
    fn empty_subjects_and_unknown_vocabulary_are_warnings() {
        let doc = document(
            r#"{"record_id":"a","title":"A","date":540,"rights":"PD","subjects":["Alchemy"],"creators":["C"]}"#,
        );
        let vocabulary: BTreeSet<String> = ["Monasticism".to_owned()].into_iter().collect();
        let issues = check_document("a.json", &doc, Some(&vocabulary));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].level, Level::Warning);

        let doc = document(r#"{"record_id":"b","title":"B","date":540,"rights":"PD"}"#);
        let issues = check_document("b.json", &doc, None);
        assert!(issues.iter().all(|i| i.level == Level::Warning));
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn report_lines_list_errors_then_ok_files() {
        let report = ValidationReport {
            files: vec!["a.json".to_owned(), "b.json".to_owned()],
            issues: vec![Issue::error("b.json", "missing required field `rights`")],
        };
        assert_eq!(
            report.lines(),
            vec![
                "ERROR b.json: missing required field `rights`".to_owned(),
                "OK    a.json".to_owned(),
            ]
        );
        assert!(report.has_errors());
    }

    #[test]
    fn validate_dir_keeps_going_after_unreadable_files() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        std::fs::write(dir.path().join("a.json"), "{ nope")?;
        std::fs::write(
            dir.path().join("b.json"),
            r#"{"record_id":"b","title":"B","date":1900,"rights":"PD","subjects":["S"],"creators":["C"]}"#,
        )?;
        let report = validate_dir(dir.path(), None)?;
        assert_eq!(report.error_count(), 1);
        assert!(report.lines().contains(&"OK    b.json".to_owned()));
        Ok(())
    }
}
