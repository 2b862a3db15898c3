use std::collections::{BTreeMap, BTreeSet};

use crate::derive::{Era, era};
use crate::formats::IndexRow;

/// Dropdown options, always drawn from the full index so filters never
/// shrink their own choices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetOptions {
    pub collections: Vec<String>,
    pub subjects: Vec<String>,
    pub genres: Vec<String>,
    pub eras: Vec<Era>,
}

fn sorted(values: BTreeSet<&String>) -> Vec<String> {
    let mut out: Vec<String> = values.into_iter().cloned().collect();
    out.sort_by(|a, b| crate::derive::title_order(a, b));
    out
}

pub fn hydrate(rows: &[IndexRow]) -> FacetOptions {
    let collections = rows.iter().filter_map(|r| r.collection.as_ref()).collect();
    let subjects = rows.iter().flat_map(|r| &r.subjects).collect();
    let genres = rows.iter().flat_map(|r| &r.genres).collect();
    let present: BTreeSet<Era> = rows.iter().filter_map(|r| era(r.year)).collect();

    FacetOptions {
        collections: sorted(collections),
        subjects: sorted(subjects),
        genres: sorted(genres),
        eras: Era::ALL.into_iter().filter(|e| present.contains(e)).collect(),
    }
}

/// Occurrence counts per facet value over a (possibly filtered) row set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetCounts {
    pub subjects: BTreeMap<String, usize>,
    pub collections: BTreeMap<String, usize>,
    pub languages: BTreeMap<String, usize>,
    pub quality: BTreeMap<String, usize>,
}

impl FacetCounts {
    /// `(facet name, value counts)` in display order.
    pub fn groups(&self) -> [(&'static str, &BTreeMap<String, usize>); 4] {
        [
            ("subject", &self.subjects),
            ("collection", &self.collections),
            ("language", &self.languages),
            ("quality", &self.quality),
        ]
    }
}

fn bump(map: &mut BTreeMap<String, usize>, value: &str) {
    *map.entry(value.to_owned()).or_default() += 1;
}

pub fn facet_counts<'a>(rows: impl IntoIterator<Item = &'a IndexRow>) -> FacetCounts {
    let mut counts = FacetCounts::default();
    for row in rows {
        for subject in &row.subjects {
            bump(&mut counts.subjects, subject);
        }
        if let Some(collection) = &row.collection {
            bump(&mut counts.collections, collection);
        }
        if let Some(lang) = &row.lang {
            bump(&mut counts.languages, lang);
        }
        if let Some(quality) = &row.quality {
            bump(&mut counts.quality, quality);
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, subjects: &[&str], collection: Option<&str>, year: Option<i32>, lang: Option<&str>) -> IndexRow {
        IndexRow {
            id: id.to_owned(),
            title: id.to_owned(),
            creators: Vec::new(),
            subjects: subjects.iter().map(|s| (*s).to_owned()).collect(),
            genres: vec!["History".to_owned()],
            collection: collection.map(str::to_owned),
            year,
            lang: lang.map(str::to_owned),
            quality: None,
            permalink: String::new(),
        }
    }

    #[test]
    fn hydrate_collects_unique_sorted_options() {
        let rows = vec![
            row("a", &["zoology", "Agriculture"], Some("Science"), Some(1900), None),
            row("b", &["Agriculture"], Some("Arts"), Some(300), None),
            row("c", &[], None, None, None),
        ];
        let facets = hydrate(&rows);
        assert_eq!(facets.collections, vec!["Arts", "Science"]);
        assert_eq!(facets.subjects, vec!["Agriculture", "zoology"]);
        assert_eq!(facets.genres, vec!["History"]);
        assert_eq!(facets.eras, vec![Era::Ancient, Era::Modern]);
    }

    #[test]
    fn counts_tally_each_facet() {
        let rows = vec![
            row("a", &["History"], Some("Arts"), None, Some("en")),
            row("b", &["History", "Law"], Some("Arts"), None, Some("la")),
        ];
        let counts = facet_counts(&rows);
        assert_eq!(counts.subjects.get("History"), Some(&2));
        assert_eq!(counts.subjects.get("Law"), Some(&1));
        assert_eq!(counts.collections.get("Arts"), Some(&2));
        assert_eq!(counts.languages.len(), 2);
        assert!(counts.quality.is_empty());
    }
}
