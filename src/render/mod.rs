//! HTML templating. Every function here is a pure transform from catalog data
//! to markup; writing files is left to [`crate::build`].

use chrono::{DateTime, Datelike as _, SecondsFormat, Utc};
use serde::Serialize;

use crate::formats::{IndexRow, Record};

pub mod home;
pub mod policies;
pub mod record;
pub mod redirect;
pub mod search;

#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub spotlight: usize,
    pub shelf_size: usize,
    pub top_genres: usize,
}

impl SiteConfig {
    pub fn new(title: impl Into<String>, generated_at: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            generated_at,
            spotlight: 8,
            shelf_size: 12,
            top_genres: 6,
        }
    }
}

/// One output file, relative to the site root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub path: String,
    pub html: String,
}

/// Render every page of the site. Records are expected in loader order and
/// `rows` must be the index built from them.
pub fn render_site(
    records: &[Record],
    rows: &[IndexRow],
    config: &SiteConfig,
) -> anyhow::Result<Vec<Page>> {
    let mut pages = Vec::with_capacity(records.len() + 8);
    pages.push(Page {
        path: "index.html".to_owned(),
        html: home::render(records, rows, config)?,
    });
    for (record, row) in records.iter().zip(rows) {
        pages.push(Page {
            path: format!("{}index.html", record.permalink),
            html: record::render(record, row, rows, config)?,
        });
    }
    pages.push(Page {
        path: "search/index.html".to_owned(),
        html: search::render(config),
    });
    pages.push(Page {
        path: "policies.html".to_owned(),
        html: policies::render(config),
    });
    pages.extend(redirect::stubs());
    Ok(pages)
}

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Serialize a payload for a `data-*` attribute.
pub fn json_attr<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    let json = serde_json::to_string(value)?;
    Ok(escape_html(&json))
}

/// Prefix site-relative targets with `base_path`; absolute URLs and fragments
/// pass through.
pub fn with_base(base_path: &str, target: &str) -> String {
    let has_scheme = target
        .split_once(':')
        .is_some_and(|(scheme, _)| !scheme.is_empty() && scheme.chars().all(|c| c.is_ascii_alphabetic()));
    if has_scheme || target.starts_with("//") || target.starts_with('#') {
        return target.to_owned();
    }
    format!("{base_path}{}", target.trim_start_matches('/'))
}

/// `../` once per directory level of a permalink such as `record/a/`.
pub fn base_path_for(permalink: &str) -> String {
    let depth = permalink
        .split('/')
        .filter(|segment| !segment.is_empty())
        .count();
    "../".repeat(depth)
}

pub struct Layout<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub base_path: &'a str,
    pub extra_head: &'a str,
    pub scripts: &'a [&'a str],
    pub content: &'a str,
}

pub fn layout(config: &SiteConfig, page: &Layout<'_>) -> String {
    let base = page.base_path;
    let nav = [("index.html", "Home"), ("search/", "Search"), ("policies.html", "Policies")]
        .iter()
        .map(|(href, label)| format!("<a href=\"{}\">{label}</a>", with_base(base, href)))
        .collect::<Vec<_>>()
        .join("\n            ");

    let mut scripts = String::new();
    for script in ["assets/js/app.js"].iter().chain(page.scripts) {
        scripts.push_str(&format!(
            "\n    <script type=\"module\" src=\"{}\"></script>",
            with_base(base, script)
        ));
    }

    let year = config.generated_at.year();
    let generated = config
        .generated_at
        .to_rfc3339_opts(SecondsFormat::Secs, true);

    format!(
        r#"<!doctype html>
<html lang="en" data-base-path="{base}">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>{title}</title>
    <meta name="description" content="{description}" />
    <link rel="stylesheet" href="{stylesheet}" />{extra_head}{scripts}
  </head>
  <body>
    <header>
      <div class="container">
        <nav>
          <h1><a href="{home}" class="site-title">{site_title}</a></h1>
          <div class="links">
            {nav}
          </div>
        </nav>
      </div>
    </header>
    <main>
      <div class="container">
        {content}
      </div>
    </main>
    <footer>
      <div class="container">
        <p>&copy; {year} Waypoint Institute Library Editions · Built as a static site.</p>
        <p class="meta" data-generated>Generated {generated}</p>
      </div>
    </footer>
  </body>
</html>
"#,
        base = escape_html(base),
        title = escape_html(page.title),
        description = escape_html(page.description),
        stylesheet = with_base(base, "assets/css/style.css"),
        extra_head = page.extra_head,
        home = with_base(base, "index.html"),
        site_title = escape_html(&config.title),
        content = page.content,
    )
}

/// Card data embedded in home-page payloads and rendered by `book_card`.
#[derive(Debug, Clone, Serialize)]
pub struct CardData {
    pub id: String,
    pub title: String,
    pub creators: Vec<String>,
    pub year: Option<i32>,
    pub collection: Option<String>,
    pub subjects: Vec<String>,
    pub quality: Option<String>,
    pub permalink: String,
    pub summary: Option<String>,
}

impl CardData {
    pub fn new(record: &Record) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            creators: record.creators.clone(),
            year: record.year,
            collection: record.collection.clone(),
            subjects: record.subjects.iter().take(3).cloned().collect(),
            quality: record.quality.clone(),
            permalink: record.permalink.clone(),
            summary: record.summary.clone(),
        }
    }
}

fn card_dom_id(id: &str) -> String {
    let mut out = String::from("book-");
    let mut dash = false;
    for ch in id.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
            dash = false;
        } else if !dash {
            out.push('-');
            dash = true;
        }
    }
    out
}

/// A flippable book card; the back face only exists when there is a summary.
pub fn book_card(card: &CardData, base_path: &str) -> String {
    let title = escape_html(&card.title);
    let dom_id = card_dom_id(&card.id);
    let href = escape_html(&with_base(base_path, &card.permalink));
    let preview_id = format!("{dom_id}-preview");
    let summary = card
        .summary
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let byline = match (card.creators.is_empty(), card.year) {
        (false, Some(year)) => format!("{} · {year}", escape_html(&card.creators.join(", "))),
        (false, None) => escape_html(&card.creators.join(", ")),
        (true, Some(year)) => year.to_string(),
        (true, None) => String::new(),
    };
    let tags: String = card
        .subjects
        .iter()
        .map(|s| format!("<span role=\"listitem\" class=\"chip\">{}</span>", escape_html(s)))
        .collect();
    let quality = match &card.quality {
        Some(grade) => format!("<span class=\"chip\">Quality {}</span>", escape_html(grade)),
        None => "<span class=\"card__meta\">Digital edition</span>".to_owned(),
    };

    let mut html = format!(
        "<article class=\"book\" data-book-card{}>\n  <div class=\"book__wrapper\">\n    <div class=\"book__face book__face--front\">\n      <a class=\"book__stretched\" href=\"{href}\" aria-labelledby=\"{dom_id}\"><span class=\"sr-only\">Open record: {title}</span></a>\n      <div class=\"book__info\">\n        <h3 id=\"{dom_id}\" class=\"book__title\">{title}</h3>\n",
        if summary.is_some() { " data-has-preview=\"true\"" } else { "" },
    );
    if !byline.is_empty() {
        html.push_str(&format!("        <p class=\"book__author\">{byline}</p>\n"));
    }
    if let Some(collection) = &card.collection {
        html.push_str(&format!(
            "        <p class=\"card__meta\">{}</p>\n",
            escape_html(collection)
        ));
    }
    if !tags.is_empty() {
        html.push_str(&format!("        <div class=\"book__tags\" role=\"list\">{tags}</div>\n"));
    }
    html.push_str("      </div>\n      <div class=\"book__footer\">\n        ");
    html.push_str(&quality);
    if summary.is_some() {
        html.push_str(&format!(
            "\n        <button type=\"button\" class=\"book__preview-button\" data-book-toggle aria-expanded=\"false\" aria-controls=\"{preview_id}\">Preview</button>"
        ));
    }
    html.push_str("\n      </div>\n    </div>\n");
    if let Some(summary) = summary {
        html.push_str(&format!(
            "    <div class=\"book__face book__face--back\" id=\"{preview_id}\" role=\"region\" aria-label=\"Synopsis of {title}\">\n      <p class=\"book__summary\" tabindex=\"-1\">{}</p>\n      <div class=\"book__actions\">\n        <a class=\"button\" href=\"{href}\">Open record</a>\n        <button type=\"button\" class=\"book__preview-close\" data-book-toggle aria-expanded=\"true\" aria-controls=\"{preview_id}\">Return to cover</button>\n      </div>\n    </div>\n",
            escape_html(summary)
        ));
    }
    html.push_str("  </div>\n</article>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_html_covers_attribute_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn with_base_leaves_absolute_targets_alone() {
        assert_eq!(with_base("../../", "search/"), "../../search/");
        assert_eq!(with_base("../../", "/editions/a.html"), "../../editions/a.html");
        assert_eq!(with_base("../", "https://example.org"), "https://example.org");
        assert_eq!(with_base("../", "mailto:library@waypoint.example"), "mailto:library@waypoint.example");
        assert_eq!(with_base("../", "#top"), "#top");
    }

    #[test]
    fn base_path_counts_permalink_depth() {
        assert_eq!(base_path_for("record/a/"), "../../");
        assert_eq!(base_path_for("a/"), "../");
        assert_eq!(base_path_for(""), "");
    }

    #[test]
    fn book_card_without_summary_has_no_back_face() {
        let card = CardData {
            id: "Rule of St. Benedict".to_owned(),
            title: "Rule".to_owned(),
            creators: vec![],
            year: Some(540),
            collection: None,
            subjects: vec![],
            quality: None,
            permalink: "record/rule/".to_owned(),
            summary: None,
        };
        let html = book_card(&card, "");
        assert!(html.contains("id=\"book-rule-of-st-benedict\""));
        assert!(!html.contains("book__face--back"));
        assert!(html.contains(">540<"));
    }
}
