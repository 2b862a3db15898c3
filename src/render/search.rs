use crate::derive::Era;
use crate::render::{Layout, SiteConfig, layout};

/// Control markup only; results are produced in the browser from the index.
pub fn render(config: &SiteConfig) -> String {
    let eras: String = Era::ALL
        .iter()
        .map(|era| format!("\n              <option value=\"{0}\">{0}</option>", era.label()))
        .collect();

    let content = format!(
        r#"<section class="grid-two" data-search-root>
        <form class="search-panel" role="search" data-search-form>
          <div>
            <label for="search-input">Keyword</label>
            <input id="search-input" name="q" type="search" autocomplete="off" placeholder="Search by title, author, or subject" data-search-input />
          </div>
          <div>
            <label for="author-input">Author</label>
            <input id="author-input" name="author" type="text" autocomplete="off" data-filter-author />
          </div>
          <div>
            <label for="collection-select">Collection</label>
            <select id="collection-select" name="collection" data-filter-collection>
              <option value="">Any collection</option>
            </select>
          </div>
          <div>
            <label for="subject-select">Subject</label>
            <select id="subject-select" name="subject" data-filter-subject>
              <option value="">Any subject</option>
            </select>
          </div>
          <div>
            <label for="genre-select">Genre</label>
            <select id="genre-select" name="genre" data-filter-genre>
              <option value="">Any genre</option>
            </select>
          </div>
          <div>
            <label for="era-select">Era</label>
            <select id="era-select" name="era" data-filter-era>
              <option value="">Any era</option>{eras}
            </select>
          </div>
          <button type="button" class="button" data-clear>Clear filters</button>
          <p class="meta" role="status" data-total>Loading…</p>
        </form>
        <div>
          <div class="chips" data-active-filters hidden></div>
          <ul class="results-list" data-results aria-live="polite"></ul>
          <p data-empty hidden>No records match your filters yet. Try widening your search.</p>
        </div>
      </section>"#
    );

    layout(
        config,
        &Layout {
            title: &format!("Search — {}", config.title),
            description: "Search open-access records across the Waypoint Digital Library.",
            base_path: "../",
            extra_head: "",
            scripts: &["assets/js/search.js"],
            content: &content,
        },
    )
}
