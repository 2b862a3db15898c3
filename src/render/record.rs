use serde_json::json;

use crate::derive::{RELATED_LIMIT, era, related};
use crate::formats::{IndexRow, Record};
use crate::index::related_payload;
use crate::render::{Layout, SiteConfig, base_path_for, escape_html, json_attr, layout, with_base};

/// schema.org `Book` description embedded as JSON-LD.
pub fn book_json_ld(record: &Record, base_path: &str) -> serde_json::Value {
    let encodings = [
        (record.downloads.html.as_deref(), "text/html"),
        (record.downloads.pdf.as_deref(), "application/pdf"),
        (record.downloads.epub.as_deref(), "application/epub+zip"),
    ];
    let offers: Vec<serde_json::Value> = encodings
        .into_iter()
        .filter_map(|(href, encoding)| {
            href.filter(|h| !h.trim().is_empty()).map(|href| {
                json!({
                    "@type": "Offer",
                    "url": with_base(base_path, href),
                    "itemOffered": { "@type": "DigitalDocument", "encodingFormat": encoding },
                })
            })
        })
        .collect();

    let page_url = with_base(base_path, &record.permalink);
    json!({
        "@context": "https://schema.org",
        "@type": "Book",
        "@id": page_url,
        "url": page_url,
        "name": record.title,
        "inLanguage": record.language,
        "author": record.creators.iter().map(|name| json!({ "@type": "Person", "name": name })).collect::<Vec<_>>(),
        "datePublished": record.year,
        "description": record.summary,
        "isAccessibleForFree": true,
        "offers": offers,
    })
}

fn or_dash(value: Option<String>) -> String {
    value
        .map(|v| escape_html(&v))
        .unwrap_or_else(|| "—".to_owned())
}

pub fn render(
    record: &Record,
    row: &IndexRow,
    rows: &[IndexRow],
    config: &SiteConfig,
) -> anyhow::Result<String> {
    let base = base_path_for(&record.permalink);
    let title = escape_html(&record.title);

    let downloads = record.downloads.present();
    let download_links = if downloads.is_empty() {
        "<span>No downloads available.</span>".to_owned()
    } else {
        downloads
            .iter()
            .map(|(format, label, href)| {
                format!(
                    "<a class=\"button\" data-format=\"{format}\" href=\"{}\">{label}</a>",
                    escape_html(&with_base(&base, href))
                )
            })
            .collect::<Vec<_>>()
            .join("\n          ")
    };
    let reading_room = match record.downloads.html.as_deref().filter(|h| !h.trim().is_empty()) {
        Some(href) => format!(
            "\n          <button type=\"button\" class=\"button\" data-reading-room-open data-reading-room-src=\"{}\">Open reading room</button>",
            escape_html(&with_base(&base, href))
        ),
        None => String::new(),
    };

    let contributors = record
        .contributors
        .iter()
        .map(|c| {
            if c.role.trim().is_empty() {
                escape_html(&c.name)
            } else {
                format!("{} ({})", escape_html(&c.name), escape_html(&c.role))
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    let byline = [
        escape_html(&record.creators.join(", ")),
        contributors,
        record.year.map(|y| y.to_string()).unwrap_or_default(),
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" · ");

    let subjects: String = record
        .subjects
        .iter()
        .map(|s| {
            format!(
                "<a class=\"chip\" href=\"{}\">{}</a>",
                escape_html(&format!(
                    "{}?{}",
                    with_base(&base, "search/"),
                    url::form_urlencoded::Serializer::new(String::new())
                        .append_pair("subject", s)
                        .finish()
                )),
                escape_html(s)
            )
        })
        .collect();

    let source = match &record.source_url {
        Some(url) => format!("<a href=\"{0}\">{0}</a>", escape_html(url)),
        None => "—".to_owned(),
    };
    let metadata_rows = [
        ("Year", or_dash(record.year.map(|y| y.to_string()))),
        ("Era", or_dash(era(record.year).map(|e| e.label().to_owned()))),
        ("Language", or_dash(record.language.clone())),
        ("Collection", or_dash(record.collection.clone())),
        ("Genres", or_dash(Some(row.genres.join(", ")).filter(|g| !g.is_empty()))),
        ("Type", or_dash(record.record_type.clone())),
        ("Rights", escape_html(&record.rights)),
        ("Source", source),
    ]
    .iter()
    .map(|(label, value)| format!("<tr><th scope=\"row\">{label}</th><td>{value}</td></tr>"))
    .collect::<Vec<_>>()
    .join("\n              ");

    let mut content = format!(
        r#"<article class="record-hero">
        <div>
          <h2>{title}</h2>
          <p class="meta">{byline}</p>
          <div class="downloads">{download_links}{reading_room}</div>
"#
    );
    if !subjects.is_empty() {
        content.push_str(&format!("          <p class=\"meta tags\">{subjects}</p>\n"));
    }
    if let Some(summary) = &record.summary {
        content.push_str(&format!("          <p class=\"summary\">{}</p>\n", escape_html(summary)));
    }
    content.push_str(&format!(
        r#"        </div>
        <aside class="record-meta">
          <table>
            <tbody>
              {metadata_rows}
            </tbody>
          </table>
"#
    ));
    if let Some(grade) = &record.quality {
        content.push_str(&format!(
            "          <p class=\"badge\">Quality grade: {}</p>\n",
            escape_html(grade)
        ));
    }
    content.push_str("        </aside>\n      </article>\n");

    if let Some(body) = &record.body_html {
        content.push_str(&format!("      <section class=\"record-body\">\n{body}      </section>\n"));
    }

    if !record.citation.is_empty() {
        let items: String = record
            .citation
            .iter()
            .map(|(style, text)| {
                format!(
                    "<p><strong>{}:</strong> {}</p>",
                    escape_html(&style.to_uppercase()),
                    escape_html(text)
                )
            })
            .collect();
        content.push_str(&format!(
            r##"      <section class="citation">
        <h3>Citation</h3>
        <div id="citation-text">{items}</div>
        <button type="button" class="button" data-copy-citation data-copy-target="#citation-text">Copy citation</button>
        <span class="meta" role="status" data-copy-status></span>
      </section>
"##
        ));
    }

    let payload = related_payload(row);
    let prefilled: String = related(&payload, rows, RELATED_LIMIT)
        .into_iter()
        .map(|(other, _)| compact_card(other, &base))
        .collect();
    content.push_str(&format!(
        r#"      <section class="related" data-related data-related-payload="{}">
        <h3>Related titles</h3>
        <div class="cards cards--compact" data-related-list>{prefilled}</div>
      </section>
"#,
        json_attr(&payload)?
    ));

    if !reading_room.is_empty() {
        content.push_str(
            r#"      <div class="reading-room" role="dialog" aria-modal="true" aria-labelledby="reading-room-title" data-reading-room hidden>
        <div class="reading-room__bar">
          <h3 id="reading-room-title">Reading room</h3>
          <button type="button" class="button" data-reading-room-close>Close</button>
        </div>
        <div class="reading-room__content" data-reading-room-content tabindex="-1"></div>
      </div>
"#,
        );
    }

    let json_ld = serde_json::to_string(&book_json_ld(record, &base))?.replace("</", "<\\/");
    let extra_head = format!("\n    <script type=\"application/ld+json\">{json_ld}</script>");
    let page_title = format!("{} — {}", record.title, config.title);
    let description = record.summary.as_deref().unwrap_or(&record.title);

    Ok(layout(
        config,
        &Layout {
            title: &page_title,
            description,
            base_path: &base,
            extra_head: &extra_head,
            scripts: &["assets/js/record.js"],
            content: &content,
        },
    ))
}

pub fn compact_card(row: &IndexRow, base_path: &str) -> String {
    let meta = [
        row.creators.join(", "),
        row.year.map(|y| y.to_string()).unwrap_or_default(),
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" · ");
    let href = escape_html(&with_base(base_path, &row.permalink()));
    let mut html = format!(
        "<article class=\"card card--compact\"><h4><a href=\"{href}\">{}</a></h4>",
        escape_html(&row.title)
    );
    if !meta.is_empty() {
        html.push_str(&format!("<p class=\"meta\">{}</p>", escape_html(&meta)));
    }
    html.push_str(&format!("<a class=\"badge\" href=\"{href}\">Open record</a></article>"));
    html
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::TimeZone as _;

    use super::*;
    use crate::formats::{Contributor, Downloads};
    use crate::index::build_index;

    fn benedict() -> Record {
        Record {
            id: "rule-benedict".to_owned(),
            title: "The Rule of Saint Benedict".to_owned(),
            creators: vec!["Benedict of Nursia".to_owned()],
            subjects: vec!["Monasticism".to_owned()],
            collection: Some("Patristics".to_owned()),
            genres: Vec::new(),
            record_type: None,
            year: Some(540),
            language: Some("la".to_owned()),
            summary: Some("A rule for <monks>.".to_owned()),
            quality: Some("A".to_owned()),
            rights: "Public domain".to_owned(),
            source_url: None,
            downloads: Downloads {
                html: Some("editions/rule.html".to_owned()),
                epub: None,
                pdf: Some("editions/rule.pdf".to_owned()),
            },
            contributors: vec![Contributor {
                name: "Leonard Doyle".to_owned(),
                role: "translator".to_owned(),
            }],
            citation: BTreeMap::from([("mla".to_owned(), "Benedict. Rule.".to_owned())]),
            permalink: "record/rule-benedict/".to_owned(),
            body_html: None,
            source_file: "rule.json".to_owned(),
        }
    }

    fn config() -> SiteConfig {
        let at = chrono::Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).single().expect("valid time");
        SiteConfig::new("Waypoint Digital Library", at)
    }

    #[test]
    fn detail_page_lists_present_downloads_and_metadata() -> anyhow::Result<()> {
        let record = benedict();
        let rows = build_index(std::slice::from_ref(&record));
        let html = render(&record, &rows[0], &rows, &config())?;

        assert!(html.contains("href=\"../../editions/rule.html\">Read Online</a>"));
        assert!(html.contains("Download PDF"));
        assert!(!html.contains("Download EPUB"));
        assert!(html.contains("<td>Medieval</td>"));
        assert!(html.contains("A rule for &lt;monks&gt;."));
        assert!(html.contains("Leonard Doyle (translator)"));
        assert!(html.contains("data-copy-citation"));
        assert!(html.contains(r##"data-copy-target="#citation-text""##));
        assert!(html.contains("data-reading-room-open"));
        assert!(html.contains("&quot;id&quot;:&quot;rule-benedict&quot;"));
        assert!(html.contains("application/ld+json"));
        Ok(())
    }

    #[test]
    fn detail_page_degrades_without_optional_fields() -> anyhow::Result<()> {
        let mut record = benedict();
        record.downloads = Downloads::default();
        record.citation.clear();
        record.summary = None;
        record.year = None;
        let rows = build_index(std::slice::from_ref(&record));
        let html = render(&record, &rows[0], &rows, &config())?;
        assert!(html.contains("No downloads available."));
        assert!(!html.contains("data-copy-citation"));
        assert!(!html.contains("data-reading-room"));
        Ok(())
    }

    #[test]
    fn json_ld_lists_offers_for_present_formats() {
        let value = book_json_ld(&benedict(), "../../");
        let offers = value["offers"].as_array().expect("offers array");
        assert_eq!(offers.len(), 2);
        assert_eq!(offers[0]["itemOffered"]["encodingFormat"], "text/html");
        assert_eq!(value["datePublished"], 540);
    }

    #[test]
    fn json_ld_page_url_resolves_from_the_page() {
        let record = benedict();
        let value = book_json_ld(&record, "../../");
        let expected = format!("../../{}", record.permalink);
        assert_eq!(value["@id"], expected.as_str());
        assert_eq!(value["url"], expected.as_str());
        assert_eq!(value["offers"][0]["url"], "../../editions/rule.html");
    }
}
