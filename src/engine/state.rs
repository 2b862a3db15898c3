use url::form_urlencoded;

use crate::derive::Era;

/// Everything the search page filters on. Mirrored to the URL on every change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub query: String,
    pub collection: Option<String>,
    /// Value of the subject dropdown.
    pub subject: Option<String>,
    pub genre: Option<String>,
    pub author: Option<String>,
    pub era: Option<Era>,
    /// Subjects added from result tags, required alongside `subject`.
    pub selected_subjects: Vec<String>,
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

impl FilterState {
    /// Decode `q`, `collection`, `subject` (repeatable), `genre`, `author`,
    /// `era`. Unknown keys and unknown era labels are ignored.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut state = FilterState::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "q" => state.query = value.trim().to_owned(),
                "collection" => state.collection = non_empty(&value),
                "subject" => {
                    if let Some(subject) = non_empty(&value) {
                        state.add_subject(subject);
                    }
                }
                "genre" => state.genre = non_empty(&value),
                "author" => state.author = non_empty(&value),
                "era" => state.era = Era::from_label(&value),
                _ => {}
            }
        }
        state
    }

    /// Encode as a query string without the leading `?`; empty when no filter is set.
    pub fn to_query(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        if !self.query.is_empty() {
            out.append_pair("q", &self.query);
        }
        if let Some(collection) = &self.collection {
            out.append_pair("collection", collection);
        }
        for subject in self.subjects() {
            out.append_pair("subject", subject);
        }
        if let Some(genre) = &self.genre {
            out.append_pair("genre", genre);
        }
        if let Some(author) = &self.author {
            out.append_pair("author", author);
        }
        if let Some(era) = self.era {
            out.append_pair("era", era.label());
        }
        out.finish()
    }

    /// The URL the page should `history.replaceState` to.
    pub fn to_url(&self, pathname: &str) -> String {
        let query = self.to_query();
        if query.is_empty() {
            pathname.to_owned()
        } else {
            format!("{pathname}?{query}")
        }
    }

    /// Every subject that must be present, dropdown value first.
    pub fn subjects(&self) -> impl Iterator<Item = &String> {
        self.subject.iter().chain(self.selected_subjects.iter())
    }

    pub fn add_subject(&mut self, subject: String) {
        if self.subjects().any(|s| *s == subject) {
            return;
        }
        if self.subject.is_none() {
            self.subject = Some(subject);
        } else {
            self.selected_subjects.push(subject);
        }
    }

    pub fn remove_subject(&mut self, subject: &str) {
        if self.subject.as_deref() == Some(subject) {
            self.subject = if self.selected_subjects.is_empty() {
                None
            } else {
                Some(self.selected_subjects.remove(0))
            };
        } else {
            self.selected_subjects.retain(|s| s != subject);
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == FilterState::default()
    }
}
