use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::formats::{IndexRow, Record, RelatedPayload};

/// Labels inferred from subject keywords, matched case-insensitively as substrings.
pub const GENRE_HINTS: &[&str] = &[
    "Fiction",
    "Novel",
    "Romance",
    "Drama",
    "Poetry",
    "Biography",
    "Memoir",
    "Theology",
    "History",
    "Philosophy",
    "Autobiography",
];

/// Genres that put a record on the fiction shelf.
pub const FICTION_GENRES: &[&str] = &["Fiction", "Novel", "Romance", "Drama", "Poetry"];

/// Subject fragments that put a record on the fiction shelf.
pub const FICTION_SUBJECT_HINTS: &[&str] = &[
    "fiction", "novel", "stories", "romance", "drama", "poetry", "poems", "tales", "verse",
];

/// Related-records panels show at most this many entries.
pub const RELATED_LIMIT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Era {
    Ancient,
    Medieval,
    Renaissance,
    #[serde(rename = "Early Modern")]
    EarlyModern,
    Modern,
    Contemporary,
}

/// Inclusive upper year bound of each era; anything later is contemporary.
const ERA_BOUNDS: [(i32, Era); 5] = [
    (500, Era::Ancient),
    (1500, Era::Medieval),
    (1650, Era::Renaissance),
    (1800, Era::EarlyModern),
    (1945, Era::Modern),
];

impl Era {
    pub const ALL: [Era; 6] = [
        Era::Ancient,
        Era::Medieval,
        Era::Renaissance,
        Era::EarlyModern,
        Era::Modern,
        Era::Contemporary,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Era::Ancient => "Ancient",
            Era::Medieval => "Medieval",
            Era::Renaissance => "Renaissance",
            Era::EarlyModern => "Early Modern",
            Era::Modern => "Modern",
            Era::Contemporary => "Contemporary",
        }
    }

    pub fn from_label(label: &str) -> Option<Era> {
        let label = label.trim();
        Era::ALL
            .into_iter()
            .find(|era| era.label().eq_ignore_ascii_case(label))
    }
}

pub fn era(year: Option<i32>) -> Option<Era> {
    let year = year?;
    let era = ERA_BOUNDS
        .iter()
        .find(|(bound, _)| year <= *bound)
        .map(|(_, era)| *era)
        .unwrap_or(Era::Contemporary);
    Some(era)
}

/// Explicit genres first, then hints found in subjects, then the capitalized
/// record type when nothing else applies.
pub fn genres(record: &Record) -> Vec<String> {
    genres_from(
        &record.genres,
        &record.subjects,
        record.record_type.as_deref(),
    )
}

pub fn genres_from(explicit: &[String], subjects: &[String], record_type: Option<&str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for genre in explicit {
        push_label(&mut out, genre);
    }
    for subject in subjects {
        let subject = subject.to_lowercase();
        for hint in GENRE_HINTS {
            if subject.contains(&hint.to_lowercase()) {
                push_label(&mut out, hint);
            }
        }
    }

    if out.is_empty()
        && let Some(record_type) = record_type
    {
        push_label(&mut out, &capitalize(record_type));
    }
    out
}

fn push_label(out: &mut Vec<String>, label: &str) {
    let label = label.trim();
    if !label.is_empty() && !out.iter().any(|existing| existing == label) {
        out.push(label.to_owned());
    }
}

pub fn capitalize(value: &str) -> String {
    let value = value.trim();
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn is_fiction(genres: &[String], subjects: &[String]) -> bool {
    if genres
        .iter()
        .any(|genre| FICTION_GENRES.iter().any(|hint| genre.eq_ignore_ascii_case(hint)))
    {
        return true;
    }
    subjects.iter().any(|subject| {
        let subject = subject.to_lowercase();
        FICTION_SUBJECT_HINTS
            .iter()
            .any(|hint| contains_word(&subject, hint))
    })
}

/// `needle` occurs in `haystack` with no letter or digit on either side.
fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// `true` when `id` can stand alone as one directory name under `record/`.
pub fn is_safe_segment(id: &str) -> bool {
    let id = id.trim();
    !id.is_empty() && id != "." && id != ".." && !id.contains(['/', '\\'])
}

/// Directory segments of a permalink, with empty and `.` segments dropped.
/// `None` when nothing is left or a `..` segment would climb out of the site.
pub fn permalink_segments(input: &str) -> Option<Vec<&str>> {
    let segments: Vec<&str> = input
        .split(['/', '\\'])
        .map(str::trim)
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect();
    if segments.is_empty() || segments.contains(&"..") {
        return None;
    }
    Some(segments)
}

/// Relative page directory with a single trailing slash; falls back to
/// `record/<id>/` when the given path is missing or unusable.
pub fn normalize_permalink(input: Option<&str>, record_id: &str) -> String {
    match input.and_then(permalink_segments) {
        Some(segments) => format!("{}/", segments.join("/")),
        None => format!("record/{}/", record_id.trim()),
    }
}

/// Title ordering used everywhere a tie needs breaking.
pub fn title_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Anything that carries the fields relatedness is computed from.
pub trait Classified {
    fn subjects(&self) -> &[String];
    fn genres(&self) -> &[String];
    fn collection(&self) -> Option<&str>;
}

impl Classified for IndexRow {
    fn subjects(&self) -> &[String] {
        &self.subjects
    }
    fn genres(&self) -> &[String] {
        &self.genres
    }
    fn collection(&self) -> Option<&str> {
        self.collection.as_deref()
    }
}

impl Classified for RelatedPayload {
    fn subjects(&self) -> &[String] {
        &self.subjects
    }
    fn genres(&self) -> &[String] {
        &self.genres
    }
    fn collection(&self) -> Option<&str> {
        self.collection.as_deref()
    }
}

pub fn relatedness(a: &impl Classified, b: &impl Classified) -> u32 {
    let shared = |left: &[String], right: &[String]| {
        let left: BTreeSet<&str> = left.iter().map(String::as_str).collect();
        let right: BTreeSet<&str> = right.iter().map(String::as_str).collect();
        left.intersection(&right).count() as u32
    };

    let mut score = shared(a.subjects(), b.subjects()) * 3;
    score += shared(a.genres(), b.genres()) * 4;
    if let (Some(left), Some(right)) = (a.collection(), b.collection())
        && left == right
    {
        score += 2;
    }
    score
}

/// Highest-scoring rows other than `current`, ties by title, capped at `limit`.
pub fn related<'a>(
    current: &RelatedPayload,
    rows: &'a [IndexRow],
    limit: usize,
) -> Vec<(&'a IndexRow, u32)> {
    let mut scored: Vec<(&IndexRow, u32)> = rows
        .iter()
        .filter(|row| row.id != current.id)
        .map(|row| (row, relatedness(current, row)))
        .filter(|(_, score)| *score > 0)
        .collect();
    scored.sort_by(|(a, a_score), (b, b_score)| {
        b_score
            .cmp(a_score)
            .then_with(|| title_order(&a.title, &b.title))
    });
    scored.truncate(limit);
    scored
}
