use crate::render::{Page, escape_html};

/// Conventional top-level paths and the nested output they forward to,
/// relative to the stub's own directory.
pub const REDIRECTS: &[(&str, &str)] = &[
    ("search.html", "search/"),
    ("policies/index.html", "../policies.html"),
    ("record/index.html", "../search/"),
];

pub fn redirect_html(target: &str) -> String {
    let target = escape_html(target);
    format!(
        r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <title>Redirecting…</title>
    <meta http-equiv="refresh" content="0; url={target}" />
    <link rel="canonical" href="{target}" />
  </head>
  <body>
    <p>This page has moved to <a href="{target}">{target}</a>.</p>
  </body>
</html>
"#
    )
}

pub fn stubs() -> Vec<Page> {
    REDIRECTS
        .iter()
        .map(|(path, target)| Page {
            path: (*path).to_owned(),
            html: redirect_html(target),
        })
        .collect()
}
