use scraper::{ElementRef, Html, Node, Selector};

use crate::render::escape_html;

/// Containers tried in order when lifting the readable part of an edition.
pub const FRAGMENT_SELECTORS: &[&str] = &["main", "article", "body"];

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];
const DROPPED_ELEMENTS: &[&str] = &["script", "style", "noscript"];

fn is_outbound(href: &str) -> bool {
    if href.starts_with("//") {
        return true;
    }
    url::Url::parse(href).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}

fn write_element(element: ElementRef<'_>, out: &mut String) {
    let name = element.value().name();
    if DROPPED_ELEMENTS.contains(&name) {
        return;
    }
    let outbound = name == "a" && element.value().attr("href").is_some_and(is_outbound);

    out.push('<');
    out.push_str(name);
    for (attr, value) in element.value().attrs() {
        if outbound && (attr == "target" || attr == "rel") {
            continue;
        }
        out.push_str(&format!(" {attr}=\"{}\"", escape_html(value)));
    }
    if outbound {
        out.push_str(" target=\"_blank\" rel=\"noopener\"");
    }
    out.push('>');
    if VOID_ELEMENTS.contains(&name) {
        return;
    }
    write_children(element, out);
    out.push_str(&format!("</{name}>"));
}

fn write_children(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(child) = ElementRef::wrap(child) {
            write_element(child, out);
        } else if let Node::Text(text) = child.value() {
            out.push_str(&escape_html(text));
        }
    }
}

/// Inner markup of the first of `main`, `article`, `body` with outbound links
/// opening in a new tab. `None` when the document has no readable content.
pub fn extract_main_fragment(document: &str) -> Option<String> {
    let html = Html::parse_document(document);
    for css in FRAGMENT_SELECTORS {
        let Ok(selector) = Selector::parse(css) else {
            continue;
        };
        if let Some(container) = html.select(&selector).next() {
            let mut out = String::new();
            write_children(container, &mut out);
            let out = out.trim().to_owned();
            if !out.is_empty() {
                return Some(out);
            }
        }
    }
    None
}

/// Rewrites every outbound anchor in a fragment to open in a new tab.
pub fn rewrite_outbound_links(fragment: &str) -> String {
    let html = Html::parse_fragment(fragment);
    let mut out = String::new();
    for child in html.root_element().children() {
        if let Some(child) = ElementRef::wrap(child) {
            write_element(child, &mut out);
        } else if let Node::Text(text) = child.value() {
            out.push_str(&escape_html(text));
        }
    }
    out
}

/// A fetch the dialog wants issued. The response must come back with the same token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub token: u64,
    pub src: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Empty,
    Loading,
    Ready(String),
    Failed(String),
}

/// The modal reader on a record page. Content is fetched lazily on the first
/// open; a failed fetch is retried on the next open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingRoom {
    src: String,
    token: u64,
    open: bool,
    content: Content,
}

impl ReadingRoom {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            token: 0,
            open: false,
            content: Content::Empty,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Opens the dialog, returning a fetch to start when content is missing.
    pub fn open(&mut self) -> Option<Request> {
        self.open = true;
        match self.content {
            Content::Ready(_) => None,
            Content::Empty | Content::Loading | Content::Failed(_) => {
                self.token += 1;
                self.content = Content::Loading;
                Some(Request {
                    token: self.token,
                    src: self.src.clone(),
                })
            }
        }
    }

    /// Applies a fetch result. Responses for any token but the latest are
    /// dropped and `false` is returned.
    pub fn loaded(&mut self, token: u64, response: Result<String, String>) -> bool {
        if token != self.token {
            tracing::debug!(token, current = self.token, "reading room: stale response");
            return false;
        }
        self.content = match response {
            Ok(document) => match extract_main_fragment(&document) {
                Some(fragment) => Content::Ready(fragment),
                None => Content::Failed("The edition is empty.".to_owned()),
            },
            Err(message) => Content::Failed(message),
        };
        true
    }

    /// Closes the dialog. Focus goes back to the button that opened it.
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }
}

/// Keeps Tab inside the dialog by wrapping at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusTrap {
    focusable: usize,
}

impl FocusTrap {
    pub fn new(focusable: usize) -> Self {
        Self { focusable }
    }

    /// Index to focus after Tab (or Shift+Tab) from `current`. `None` means
    /// focus the dialog container itself.
    pub fn tab(&self, current: Option<usize>, shift: bool) -> Option<usize> {
        if self.focusable == 0 {
            return None;
        }
        let last = self.focusable - 1;
        Some(match (current, shift) {
            (None, false) => 0,
            (None, true) => last,
            (Some(i), false) if i >= last => 0,
            (Some(i), false) => i + 1,
            (Some(0), true) => last,
            (Some(i), true) => (i - 1).min(last),
        })
    }
}
