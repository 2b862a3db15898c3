use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization as _;
use unicode_normalization::char::is_combining_mark;

use crate::derive::{era, title_order};
use crate::engine::state::FilterState;
use crate::formats::IndexRow;

/// Query rewrites tried alongside the literal query, in both directions.
pub const SYNONYMS: &[(&str, &str)] = &[
    ("patristics", "church fathers"),
    ("monasticism", "monastic life"),
    ("scripture", "bible"),
];

/// Lower is better.
pub const EXACT_TITLE: f64 = -1.0;
pub const TITLE: f64 = 0.05;
pub const CREATOR: f64 = 0.2;
pub const SUBJECT: f64 = 0.3;
pub const COLLECTION: f64 = 0.4;
pub const COMBINED: f64 = 0.6;
/// Score given to every row when nothing matches the query at all.
pub const FALLBACK: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranked<'a> {
    pub row: &'a IndexRow,
    pub score: f64,
}

/// Lowercase, strip diacritics, collapse whitespace.
pub fn normalize(text: &str) -> String {
    let stripped: String = text.nfd().filter(|c| !is_combining_mark(*c)).collect();
    stripped
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// The normalized query plus every synonym rewrite of it.
pub fn expand(query: &str) -> Vec<String> {
    let query = normalize(query);
    let mut variants = vec![query.clone()];
    for (left, right) in SYNONYMS {
        for (from, to) in [(left, right), (right, left)] {
            if query.contains(from) {
                let variant = query.replace(from, to);
                if !variants.contains(&variant) {
                    variants.push(variant);
                }
            }
        }
    }
    variants
}

fn score_variant(row: &IndexRow, variant: &str) -> Option<f64> {
    let title = normalize(&row.title);
    if title == variant {
        return Some(EXACT_TITLE);
    }
    if title.contains(variant) {
        return Some(TITLE);
    }
    if row.creators.iter().any(|c| normalize(c).contains(variant)) {
        return Some(CREATOR);
    }
    if row.subjects.iter().any(|s| normalize(s).contains(variant)) {
        return Some(SUBJECT);
    }
    if row
        .collection
        .as_deref()
        .is_some_and(|c| normalize(c).contains(variant))
    {
        return Some(COLLECTION);
    }

    let mut combined = vec![title];
    combined.extend(row.creators.iter().map(|c| normalize(c)));
    combined.extend(row.subjects.iter().map(|s| normalize(s)));
    combined.extend(row.genres.iter().map(|g| normalize(g)));
    combined.extend(row.collection.iter().map(|c| normalize(c)));
    let combined = combined.join(" ");
    if variant.split(' ').all(|token| combined.contains(token)) {
        return Some(COMBINED);
    }
    None
}

/// Best score of `row` across all query variants, or `None` if none match.
pub fn score(row: &IndexRow, variants: &[String]) -> Option<f64> {
    variants
        .iter()
        .filter_map(|variant| score_variant(row, variant))
        .min_by(f64::total_cmp)
}

/// Rank every row against `query`. An empty query keeps index order at a
/// neutral score; a query nothing matches returns every row at `FALLBACK`.
pub fn search<'a>(rows: &'a [IndexRow], query: &str) -> Vec<Ranked<'a>> {
    let variants = expand(query);
    if variants[0].is_empty() {
        return rows.iter().map(|row| Ranked { row, score: 0.0 }).collect();
    }

    let mut ranked: Vec<Ranked<'a>> = rows
        .iter()
        .filter_map(|row| score(row, &variants).map(|score| Ranked { row, score }))
        .collect();
    if ranked.is_empty() {
        ranked = rows
            .iter()
            .map(|row| Ranked {
                row,
                score: FALLBACK,
            })
            .collect();
    }
    order(&mut ranked);
    ranked
}

/// Ascending score, ties by ascending title.
pub fn order(ranked: &mut [Ranked<'_>]) {
    ranked.sort_by(|a, b| match a.score.total_cmp(&b.score) {
        Ordering::Equal => title_order(&a.row.title, &b.row.title),
        other => other,
    });
}

pub fn matches_filters(row: &IndexRow, state: &FilterState) -> bool {
    if let Some(collection) = &state.collection
        && row.collection.as_ref() != Some(collection)
    {
        return false;
    }
    if !state.subjects().all(|subject| row.subjects.contains(subject)) {
        return false;
    }
    if let Some(author) = &state.author {
        let author = normalize(author);
        if !row.creators.iter().any(|c| normalize(c).contains(&author)) {
            return false;
        }
    }
    if let Some(genre) = &state.genre
        && !row.genres.contains(genre)
    {
        return false;
    }
    if let Some(wanted) = state.era
        && era(row.year) != Some(wanted)
    {
        return false;
    }
    true
}

pub fn apply_filters<'a>(rows: &'a [IndexRow], state: &FilterState) -> Vec<&'a IndexRow> {
    rows.iter().filter(|row| matches_filters(row, state)).collect()
}

/// Search the whole index, then keep the rows the filters allow.
pub fn run<'a>(rows: &'a [IndexRow], state: &FilterState) -> Vec<Ranked<'a>> {
    search(rows, &state.query)
        .into_iter()
        .filter(|ranked| matches_filters(ranked.row, state))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::Era;

    fn row(id: &str, title: &str, creators: &[&str], subjects: &[&str], collection: Option<&str>, year: Option<i32>) -> IndexRow {
        IndexRow {
            id: id.to_owned(),
            title: title.to_owned(),
            creators: creators.iter().map(|s| (*s).to_owned()).collect(),
            subjects: subjects.iter().map(|s| (*s).to_owned()).collect(),
            genres: Vec::new(),
            collection: collection.map(str::to_owned),
            year,
            lang: None,
            quality: None,
            permalink: format!("record/{id}/"),
        }
    }

    fn catalog() -> Vec<IndexRow> {
        let mut rows = vec![row(
            "rule",
            "The Rule of Saint Benedict",
            &["Benedict of Nursia"],
            &["Monasticism"],
            Some("Patristics"),
            Some(540),
        )];
        for i in 0..9 {
            rows.push(row(
                &format!("other-{i}"),
                &format!("Unrelated Volume {i}"),
                &["Anonymous"],
                &["Benedictines"],
                Some("Benedict Collection"),
                Some(1800 + i),
            ));
        }
        rows
    }

    #[test]
    fn normalize_strips_diacritics_and_case() {
        assert_eq!(normalize("  Émile   Zola "), "emile zola");
        assert_eq!(normalize("Città di Dio"), "citta di dio");
    }

    #[test]
    fn expand_applies_synonyms_both_ways() {
        assert_eq!(expand("Patristics"), vec!["patristics", "church fathers"]);
        assert_eq!(expand("church fathers"), vec!["church fathers", "patristics"]);
        assert_eq!(expand("benedict"), vec!["benedict"]);
    }

    #[test]
    fn empty_query_keeps_index_order() {
        let rows = catalog();
        let ranked = search(&rows, "   ");
        assert_eq!(ranked.len(), rows.len());
        assert!(ranked.iter().zip(&rows).all(|(r, row)| r.row.id == row.id && r.score == 0.0));
    }

    #[test]
    fn title_substring_outranks_subject_and_collection_matches() {
        let rows = catalog();
        let ranked = search(&rows, "benedict");
        assert_eq!(ranked[0].row.id, "rule");
        assert_eq!(ranked[0].score, TITLE);
        assert!(ranked[1..].iter().all(|r| r.score > TITLE));
    }

    #[test]
    fn exact_title_match_sorts_first() {
        let mut rows = catalog();
        rows.push(row("exact", "Benedictines", &[], &[], None, None));
        let ranked = search(&rows, "benedictines");
        assert_eq!(ranked[0].row.id, "exact");
        assert_eq!(ranked[0].score, EXACT_TITLE);
    }

    #[test]
    fn synonym_variant_can_win() {
        let rows = vec![
            row("a", "Sayings of the Church Fathers", &[], &[], None, None),
            row("b", "Miscellany", &[], &["Patristics"], None, None),
        ];
        let ranked = search(&rows, "patristics");
        assert_eq!(ranked[0].row.id, "a");
        assert_eq!(ranked[0].score, TITLE);
        assert_eq!(ranked[1].score, SUBJECT);
    }

    #[test]
    fn combined_match_needs_every_token() {
        let rows = vec![row("a", "Confessions", &["Augustine"], &["Theology"], None, None)];
        assert_eq!(search(&rows, "augustine confessions")[0].score, COMBINED);
        let ranked = search(&rows, "augustine geology");
        assert_eq!(ranked[0].score, FALLBACK);
    }

    #[test]
    fn no_match_falls_back_to_every_row() {
        let rows = catalog();
        let ranked = search(&rows, "zzzz");
        assert_eq!(ranked.len(), rows.len());
        assert!(ranked.iter().all(|r| r.score == FALLBACK));
        let titles: Vec<&str> = ranked.iter().map(|r| r.row.title.as_str()).collect();
        let mut sorted = titles.clone();
        sorted.sort_by(|a, b| title_order(a, b));
        assert_eq!(titles, sorted);
    }

    #[test]
    fn subject_filter_requires_every_selected_subject() {
        let rows = vec![row("a", "A", &[], &["A"], None, None)];
        let state = FilterState {
            subject: Some("A".to_owned()),
            selected_subjects: vec!["B".to_owned()],
            ..FilterState::default()
        };
        assert!(apply_filters(&rows, &state).is_empty());

        let rows = vec![row("ab", "AB", &[], &["A", "B"], None, None)];
        assert_eq!(apply_filters(&rows, &state).len(), 1);
    }

    #[test]
    fn author_collection_and_era_filters_intersect() {
        let rows = catalog();
        let state = FilterState {
            author: Some("NURSIA".to_owned()),
            collection: Some("Patristics".to_owned()),
            era: Some(Era::Medieval),
            ..FilterState::default()
        };
        let out = apply_filters(&rows, &state);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "rule");

        let state = FilterState {
            era: Some(Era::Modern),
            ..state
        };
        assert!(apply_filters(&rows, &state).is_empty());
    }

    #[test]
    fn run_filters_after_ranking() {
        let rows = catalog();
        let state = FilterState {
            query: "benedict".to_owned(),
            collection: Some("Benedict Collection".to_owned()),
            ..FilterState::default()
        };
        let ranked = run(&rows, &state);
        assert_eq!(ranked.len(), 9);
        assert!(ranked.iter().all(|r| r.row.id != "rule"));
    }
}
