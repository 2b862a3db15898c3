use std::time::{Duration, Instant};

use crate::derive::Era;
use crate::engine::facets::{FacetOptions, hydrate};
use crate::engine::rank::{self, Ranked};
use crate::engine::state::FilterState;
use crate::formats::IndexRow;

/// Quiet period before a typed query is applied.
pub const DEBOUNCE: Duration = Duration::from_millis(150);

/// Holds the latest keystroke until the input has been quiet long enough.
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    pending: Option<(String, Instant)>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    /// Every keystroke restarts the quiet period.
    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        self.pending = Some((text.into(), now));
    }

    /// Returns the pending text once `quiet` has elapsed since the last input.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, at)) if now.duration_since(*at) >= self.quiet => {
                self.pending.take().map(|(text, _)| text)
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Query(String),
    Collection(Option<String>),
    Subject(Option<String>),
    /// Tag click on a result row.
    AddSubject(String),
    /// Chip removal in the active-filter strip.
    RemoveSubject(String),
    Genre(Option<String>),
    Author(Option<String>),
    Era(Option<Era>),
    Clear,
}

/// What the results region shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultsView<'a> {
    Results(Vec<Ranked<'a>>),
    /// The index could not be loaded. Shown as one inline row; never retried.
    Unavailable(String),
}

impl ResultsView<'_> {
    pub fn total_label(&self) -> String {
        match self {
            ResultsView::Results(rows) => match rows.len() {
                1 => "1 record".to_owned(),
                n => format!("{n} records"),
            },
            ResultsView::Unavailable(_) => "Search unavailable".to_owned(),
        }
    }

    pub fn counter_disabled(&self) -> bool {
        matches!(self, ResultsView::Unavailable(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ResultsView::Results(rows) if rows.is_empty())
    }
}

/// One synchronous re-render worth of output.
#[derive(Debug, Clone, PartialEq)]
pub struct Update<'a> {
    pub view: ResultsView<'a>,
    /// Target of `history.replaceState`.
    pub url: String,
}

/// The search page: index rows, hydrated facets and the current filters.
#[derive(Debug, Clone)]
pub struct Session {
    index: Result<Vec<IndexRow>, String>,
    facets: FacetOptions,
    state: FilterState,
    pathname: String,
}

impl Session {
    /// Starts from the page URL; a failed index load yields a session that
    /// only ever renders `ResultsView::Unavailable`.
    pub fn open(
        index: anyhow::Result<Vec<IndexRow>>,
        pathname: impl Into<String>,
        query: &str,
    ) -> Self {
        let index = index.map_err(|err| format!("{err:#}"));
        let facets = match &index {
            Ok(rows) => hydrate(rows),
            Err(_) => FacetOptions::default(),
        };
        Self {
            index,
            facets,
            state: FilterState::from_query(query),
            pathname: pathname.into(),
        }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn facets(&self) -> &FacetOptions {
        &self.facets
    }

    pub fn rows(&self) -> &[IndexRow] {
        match &self.index {
            Ok(rows) => rows,
            Err(_) => &[],
        }
    }

    pub fn dispatch(&mut self, action: Action) -> Update<'_> {
        let state = &mut self.state;
        match action {
            Action::Query(query) => state.query = query.trim().to_owned(),
            Action::Collection(value) => state.collection = value,
            Action::Subject(value) => state.subject = value,
            Action::AddSubject(subject) => state.add_subject(subject),
            Action::RemoveSubject(subject) => state.remove_subject(&subject),
            Action::Genre(value) => state.genre = value,
            Action::Author(value) => state.author = value.filter(|a| !a.trim().is_empty()),
            Action::Era(value) => state.era = value,
            Action::Clear => *state = FilterState::default(),
        }
        self.render()
    }

    pub fn render(&self) -> Update<'_> {
        let view = match &self.index {
            Ok(rows) => ResultsView::Results(rank::run(rows, &self.state)),
            Err(message) => ResultsView::Unavailable(message.clone()),
        };
        Update {
            view,
            url: self.state.to_url(&self.pathname),
        }
    }
}
