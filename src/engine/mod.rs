//! The search page's engine: filter state and its URL form, ranking,
//! facets and the session that ties them together. `assets/js/search.js`
//! runs the same rules in the browser; the `search` subcommand runs them here.

pub mod facets;
pub mod rank;
pub mod session;
pub mod state;

use std::path::Path;

use crate::cli::SearchArgs;
use crate::derive::Era;
use crate::engine::session::{ResultsView, Session};
use crate::engine::state::FilterState;

/// Start from `--state`, then let individual flags override it.
pub fn state_from_args(args: &SearchArgs) -> anyhow::Result<FilterState> {
    let mut state = FilterState::from_query(args.state.as_deref().unwrap_or_default());
    if let Some(q) = &args.q {
        state.query = q.trim().to_owned();
    }
    if let Some(collection) = &args.collection {
        state.collection = Some(collection.clone());
    }
    for subject in &args.subject {
        state.add_subject(subject.clone());
    }
    if let Some(genre) = &args.genre {
        state.genre = Some(genre.clone());
    }
    if let Some(author) = &args.author {
        state.author = Some(author.clone());
    }
    if let Some(label) = &args.era {
        let Some(era) = Era::from_label(label) else {
            let known: Vec<&str> = Era::ALL.iter().map(|e| e.label()).collect();
            anyhow::bail!("unknown era `{label}` (expected one of: {})", known.join(", "));
        };
        state.era = Some(era);
    }
    Ok(state)
}

pub fn run(args: SearchArgs) -> anyhow::Result<()> {
    let state = state_from_args(&args)?;
    let index = crate::index::read_index(Path::new(&args.index));
    let session = Session::open(index, "search/", &state.to_query());
    let update = session.render();
    tracing::debug!(url = %update.url, "search state");

    let ranked = match &update.view {
        ResultsView::Results(ranked) => ranked,
        ResultsView::Unavailable(message) => {
            println!("{}", update.view.total_label());
            anyhow::bail!("load search index {}: {message}", args.index);
        }
    };

    println!("{}", update.view.total_label());
    if update.view.is_empty() {
        println!("No records match these filters.");
    }
    for hit in ranked.iter().take(args.limit) {
        let creators = if hit.row.creators.is_empty() {
            String::new()
        } else {
            format!(" ({})", hit.row.creators.join(", "))
        };
        println!(
            "{:>6.2}  {}  {}{}",
            hit.score, hit.row.id, hit.row.title, creators
        );
    }

    if args.facets {
        let counts = facets::facet_counts(ranked.iter().map(|hit| hit.row));
        for (name, values) in counts.groups() {
            if values.is_empty() {
                continue;
            }
            println!("\n[{name}]");
            for (value, count) in values {
                println!("{count:>4}  {value}");
            }
        }
    }
    Ok(())
}
