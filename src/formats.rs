use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A string-or-number field. Front matter writes `date: 540` and
/// `record_id: "rule-benedict"` interchangeably.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl Scalar {
    pub fn is_blank(&self) -> bool {
        match self {
            Scalar::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    pub fn as_year(&self) -> Option<i32> {
        match self {
            Scalar::Int(value) => i32::try_from(*value).ok(),
            Scalar::Float(value) if value.fract() == 0.0 => Some(*value as i32),
            Scalar::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(value) => write!(f, "{value}"),
            Scalar::Float(value) => write!(f, "{value}"),
            Scalar::Text(text) => f.write_str(text.trim()),
            Scalar::Bool(value) => write!(f, "{value}"),
        }
    }
}

/// One metadata file as written by editors, before normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordDocument {
    pub record_id: Option<Scalar>,
    pub id: Option<Scalar>,
    pub title: Option<String>,
    pub creators: Option<Vec<String>>,
    pub subjects: Option<Vec<String>>,
    pub collection: Option<String>,
    pub genres: Option<Vec<String>>,
    #[serde(rename = "type")]
    pub record_type: Option<String>,
    pub date: Option<Scalar>,
    pub language: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub summary: Option<String>,
    pub quality_grade: Option<Scalar>,
    pub rights: Option<String>,
    pub source_url: Option<String>,
    pub downloads: Option<Downloads>,
    pub contributors: Option<Vec<Contributor>>,
    pub citation: Option<BTreeMap<String, String>>,
    pub identifiers: Option<Identifiers>,
}

impl RecordDocument {
    pub fn record_id(&self) -> Option<String> {
        self.record_id
            .as_ref()
            .or(self.id.as_ref())
            .filter(|id| !id.is_blank())
            .map(ToString::to_string)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Identifiers {
    pub permalink: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Downloads {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epub: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf: Option<String>,
}

impl Downloads {
    /// Present formats in display order, with their button labels.
    pub fn present(&self) -> Vec<(&'static str, &'static str, &str)> {
        [
            ("html", "Read Online", self.html.as_deref()),
            ("epub", "Download EPUB", self.epub.as_deref()),
            ("pdf", "Download PDF", self.pdf.as_deref()),
        ]
        .into_iter()
        .filter_map(|(format, label, href)| {
            href.filter(|href| !href.trim().is_empty())
                .map(|href| (format, label, href))
        })
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contributor {
    pub name: String,
    #[serde(default)]
    pub role: String,
}

/// The canonical in-memory record, produced by the loader.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: String,
    pub title: String,
    pub creators: Vec<String>,
    pub subjects: Vec<String>,
    pub collection: Option<String>,
    pub genres: Vec<String>,
    pub record_type: Option<String>,
    pub year: Option<i32>,
    pub language: Option<String>,
    pub summary: Option<String>,
    pub quality: Option<String>,
    pub rights: String,
    pub source_url: Option<String>,
    pub downloads: Downloads,
    pub contributors: Vec<Contributor>,
    pub citation: BTreeMap<String, String>,
    pub permalink: String,
    pub body_html: Option<String>,
    pub source_file: String,
}

/// The narrow projection shipped to the browser as `search/index.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRow {
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub creators: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subjects: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub genres: Vec<String>,
    #[serde(default)]
    pub collection: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub permalink: String,
}

impl IndexRow {
    pub fn permalink(&self) -> String {
        if self.permalink.trim().is_empty() {
            crate::derive::normalize_permalink(None, &self.id)
        } else {
            self.permalink.clone()
        }
    }
}

/// Embedded on record pages so the browser can compute related titles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedPayload {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subjects: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub genres: Vec<String>,
    #[serde(default)]
    pub collection: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
