use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::derive::is_fiction;
use crate::formats::{IndexRow, Record};
use crate::render::{CardData, Layout, SiteConfig, book_card, escape_html, json_attr, layout};

/// Cards shown at once in the hero; the client rotates through the rest.
pub const SPOTLIGHT_WINDOW: usize = 4;

/// Members embedded per genre in the genre browser.
pub const GENRE_MEMBERS: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogStats {
    pub records: usize,
    pub subjects: usize,
    pub collections: usize,
    pub earliest: Option<i32>,
    pub latest: Option<i32>,
}

pub fn catalog_stats(rows: &[IndexRow]) -> CatalogStats {
    let subjects: BTreeSet<&str> = rows
        .iter()
        .flat_map(|row| row.subjects.iter().map(String::as_str))
        .collect();
    let collections: BTreeSet<&str> = rows
        .iter()
        .filter_map(|row| row.collection.as_deref())
        .collect();
    CatalogStats {
        records: rows.len(),
        subjects: subjects.len(),
        collections: collections.len(),
        earliest: rows.iter().filter_map(|row| row.year).min(),
        latest: rows.iter().filter_map(|row| row.year).max(),
    }
}

/// Fiction and non-fiction shelves, each in loader order.
pub fn shelves(rows: &[IndexRow], size: usize) -> (Vec<&IndexRow>, Vec<&IndexRow>) {
    let (fiction, nonfiction): (Vec<&IndexRow>, Vec<&IndexRow>) = rows
        .iter()
        .partition(|row| is_fiction(&row.genres, &row.subjects));
    (
        fiction.into_iter().take(size).collect(),
        nonfiction.into_iter().take(size).collect(),
    )
}

/// The `k` largest genres, ties broken alphabetically, each with its first
/// `GENRE_MEMBERS` rows.
pub fn top_genres(rows: &[IndexRow], k: usize) -> Vec<(String, usize, Vec<&IndexRow>)> {
    let mut groups: BTreeMap<&str, Vec<&IndexRow>> = BTreeMap::new();
    for row in rows {
        for genre in &row.genres {
            groups.entry(genre.as_str()).or_default().push(row);
        }
    }
    let mut groups: Vec<(String, usize, Vec<&IndexRow>)> = groups
        .into_iter()
        .map(|(genre, members)| {
            let count = members.len();
            (
                genre.to_owned(),
                count,
                members.into_iter().take(GENRE_MEMBERS).collect(),
            )
        })
        .collect();
    groups.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    groups.truncate(k);
    groups
}

pub fn render(records: &[Record], rows: &[IndexRow], config: &SiteConfig) -> anyhow::Result<String> {
    let by_id: HashMap<&str, &Record> = records.iter().map(|r| (r.id.as_str(), r)).collect();
    let card_for = |row: &IndexRow| match by_id.get(row.id.as_str()) {
        Some(record) => CardData::new(record),
        None => CardData {
            id: row.id.clone(),
            title: row.title.clone(),
            creators: row.creators.clone(),
            year: row.year,
            collection: row.collection.clone(),
            subjects: row.subjects.iter().take(3).cloned().collect(),
            quality: row.quality.clone(),
            permalink: row.permalink(),
            summary: None,
        },
    };

    let mut content = String::new();

    let spotlight: Vec<CardData> = rows.iter().take(config.spotlight).map(&card_for).collect();
    let initial: String = spotlight
        .iter()
        .take(SPOTLIGHT_WINDOW)
        .map(|card| format!("<div role=\"listitem\">{}</div>", book_card(card, "")))
        .collect();
    content.push_str(&format!(
        r#"<section class="hero" data-spotlight-root data-spotlight-records="{payload}" data-spotlight-window="{SPOTLIGHT_WINDOW}">
  <div>
    <h2>Scholarly editions, ready for the web.</h2>
    <p>Waypoint Digital Library curates open-access texts with reliable metadata, downloadable formats, and clean reading experiences. Everything here is generated ahead of time.</p>
    <p class="notice">Browse the shelves below or jump to the <a href="search/">search interface</a> to filter by subject, collection, genre, or era.</p>
  </div>
  <div class="spotlight">
    <div class="spotlight__header"><h3>Spotlight</h3><button type="button" class="button" data-spotlight-shuffle>Show more</button></div>
    <div class="spotlight__grid" role="list" data-spotlight-grid>{initial}</div>
  </div>
</section>
"#,
        payload = json_attr(&spotlight)?,
    ));

    let stats = catalog_stats(rows);
    let span = match (stats.earliest, stats.latest) {
        (Some(earliest), Some(latest)) => format!("{earliest}–{latest}"),
        _ => "—".to_owned(),
    };
    content.push_str(&format!(
        r#"<section class="stats" aria-label="Catalog at a glance">
  <dl>
    <div><dt>Records</dt><dd data-stat="records">{}</dd></div>
    <div><dt>Subjects</dt><dd data-stat="subjects">{}</dd></div>
    <div><dt>Collections</dt><dd data-stat="collections">{}</dd></div>
    <div><dt>Years</dt><dd data-stat="years">{span}</dd></div>
  </dl>
</section>
"#,
        stats.records, stats.subjects, stats.collections,
    ));

    let (fiction, nonfiction) = shelves(rows, config.shelf_size);
    for (key, heading, members) in [
        ("fiction", "Fiction & literature", fiction),
        ("nonfiction", "Non-fiction", nonfiction),
    ] {
        if members.is_empty() {
            continue;
        }
        let cards: Vec<CardData> = members.into_iter().map(&card_for).collect();
        content.push_str(&render_shelf(key, heading, &cards));
    }

    let genres = top_genres(rows, config.top_genres);
    if !genres.is_empty() {
        content.push_str(&render_genre_browser(&genres, &card_for)?);
    }

    Ok(layout(
        config,
        &Layout {
            title: &config.title,
            description: "A pre-built static library site with dependable metadata and multi-format downloads.",
            base_path: "",
            extra_head: "",
            scripts: &["assets/js/home.js"],
            content: &content,
        },
    ))
}

fn render_shelf(key: &str, heading: &str, cards: &[CardData]) -> String {
    let items: String = cards
        .iter()
        .enumerate()
        .map(|(idx, card)| {
            let (tabindex, selected) = if idx == 0 { (0, true) } else { (-1, false) };
            format!(
                "<div class=\"shelf__item\" role=\"option\" data-shelf-item tabindex=\"{tabindex}\" aria-selected=\"{selected}\">{}</div>",
                book_card(card, "")
            )
        })
        .collect();
    format!(
        r#"<section class="shelf" data-shelf="{key}" aria-labelledby="shelf-{key}">
  <div class="shelf__header">
    <h2 id="shelf-{key}">{heading}</h2>
    <div class="shelf__controls">
      <button type="button" data-shelf-prev aria-label="Previous">&larr;</button>
      <button type="button" data-shelf-next aria-label="Next">&rarr;</button>
    </div>
  </div>
  <div class="shelf__track" role="listbox" aria-orientation="horizontal" data-shelf-track>{items}</div>
</section>
"#,
        heading = escape_html(heading),
    )
}

fn render_genre_browser<F>(genres: &[(String, usize, Vec<&IndexRow>)], card_for: &F) -> anyhow::Result<String>
where
    F: Fn(&IndexRow) -> CardData,
{
    let mut options = String::new();
    let mut initial = String::new();
    for (idx, (genre, count, members)) in genres.iter().enumerate() {
        let cards: Vec<CardData> = members.iter().map(|row| card_for(row)).collect();
        options.push_str(&format!(
            "<button type=\"button\" class=\"chip\" data-genre-option=\"{}\" data-genre-payload=\"{}\" aria-pressed=\"{}\">{} <span class=\"count\">{count}</span></button>",
            escape_html(genre),
            json_attr(&cards)?,
            idx == 0,
            escape_html(genre),
        ));
        if idx == 0 {
            initial = cards
                .iter()
                .map(|card| format!("<div role=\"listitem\">{}</div>", book_card(card, "")))
                .collect();
        }
    }
    Ok(format!(
        r#"<section class="genres" data-genre-browser>
  <h2>Browse by genre</h2>
  <div class="genres__options" role="group" aria-label="Genres">{options}</div>
  <div class="genres__panel" role="list" data-genre-panel aria-live="polite">{initial}</div>
</section>
"#
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, year: Option<i32>, subjects: &[&str], genres: &[&str], collection: Option<&str>) -> IndexRow {
        IndexRow {
            id: id.to_owned(),
            title: id.to_uppercase(),
            creators: Vec::new(),
            subjects: subjects.iter().map(|s| (*s).to_owned()).collect(),
            genres: genres.iter().map(|s| (*s).to_owned()).collect(),
            collection: collection.map(str::to_owned),
            year,
            lang: None,
            quality: None,
            permalink: format!("record/{id}/"),
        }
    }

    #[test]
    fn stats_count_distinct_values_and_year_span() {
        let rows = vec![
            row("a", Some(1900), &["X", "Y"], &[], Some("C1")),
            row("b", Some(540), &["X"], &[], Some("C1")),
            row("c", None, &[], &[], None),
        ];
        assert_eq!(
            catalog_stats(&rows),
            CatalogStats {
                records: 3,
                subjects: 2,
                collections: 1,
                earliest: Some(540),
                latest: Some(1900),
            }
        );
    }

    #[test]
    fn top_genres_break_count_ties_alphabetically() {
        let rows = vec![
            row("a", None, &[], &["Poetry", "History"], None),
            row("b", None, &[], &["History"], None),
            row("c", None, &[], &["Drama"], None),
            row("d", None, &[], &["Poetry"], None),
        ];
        let names: Vec<(String, usize)> = top_genres(&rows, 2)
            .into_iter()
            .map(|(genre, count, _)| (genre, count))
            .collect();
        assert_eq!(names, vec![("History".to_owned(), 2), ("Poetry".to_owned(), 2)]);
    }

    #[test]
    fn shelves_split_on_fiction_heuristic() {
        let rows = vec![
            row("a", None, &["Short stories"], &[], None),
            row("b", None, &["Monasticism"], &["Theology"], None),
            row("c", None, &[], &["Novel"], None),
        ];
        let (fiction, nonfiction) = shelves(&rows, 12);
        assert_eq!(fiction.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(nonfiction.len(), 1);
    }
}
