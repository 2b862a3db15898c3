use sha2::{Digest as _, Sha256};

use crate::index::INDEX_PATH;

/// Top-level files cached by the service worker in addition to the index.
pub const SHELL_ASSETS: &[&str] = &[
    "./",
    "index.html",
    "search/",
    "policies.html",
    "assets/css/style.css",
    "assets/js/app.js",
    "assets/js/home.js",
    "assets/js/search.js",
    "assets/js/record.js",
];

/// Cache name changes whenever the published index does, so a rebuild
/// never serves a stale catalog from the shell cache.
pub fn cache_name(index_json: &str) -> String {
    let digest = Sha256::digest(index_json.as_bytes());
    format!("waypoint-shell-{}", &hex::encode(digest)[..12])
}

pub fn service_worker(index_json: &str) -> anyhow::Result<String> {
    let mut assets: Vec<&str> = SHELL_ASSETS.to_vec();
    assets.push(INDEX_PATH);
    let assets = serde_json::to_string(&assets)?;
    let cache = serde_json::to_string(&cache_name(index_json))?;

    Ok(format!(
        r#"const CACHE = {cache};
const SHELL = {assets};

self.addEventListener('install', (event) => {{
  event.waitUntil(caches.open(CACHE).then((cache) => cache.addAll(SHELL)));
}});

self.addEventListener('activate', (event) => {{
  event.waitUntil(
    caches.keys().then((keys) =>
      Promise.all(keys.filter((key) => key !== CACHE).map((key) => caches.delete(key))),
    ),
  );
}});

self.addEventListener('fetch', (event) => {{
  event.respondWith(caches.match(event.request).then((cached) => cached || fetch(event.request)));
}});
"#
    ))
}
