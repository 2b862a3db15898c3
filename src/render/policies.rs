use crate::render::{Layout, SiteConfig, layout};

const POLICIES: &str = r#"<section class="hero">
        <div>
          <h2>Collection development &amp; rights</h2>
          <p>We focus on public-domain and openly licensed texts suitable for research and teaching. Every item is vetted for provenance, rights status, and editorial quality before publication.</p>
        </div>
      </section>
      <section>
        <h3>Acquisition principles</h3>
        <ul>
          <li>Preference for texts with established scholarly value or instructional demand.</li>
          <li>Source materials must be public domain or released under an open license compatible with redistribution.</li>
          <li>Digital assets over 25&nbsp;MB are mirrored to long-term repositories such as Zenodo or the Internet Archive.</li>
        </ul>
        <h3>Editorial guarantees</h3>
        <ul>
          <li>Each edition is proofed and assigned a quality grade (A–C).</li>
          <li>Downloads include EPUB, PDF, and an accessible HTML reading view.</li>
          <li>Metadata is checked for completeness and accuracy prior to deployment.</li>
        </ul>
        <h3>Takedowns</h3>
        <p>To request a takedown or raise a rights concern, open an issue using the <em>Takedown request</em> template or email <a href="mailto:library@waypoint.example">library@waypoint.example</a>. We respond within five business days.</p>
      </section>"#;

pub fn render(config: &SiteConfig) -> String {
    layout(
        config,
        &Layout {
            title: &format!("Policies — {}", config.title),
            description: "Rights, preservation, and acquisition policies for the Waypoint Digital Library.",
            base_path: "",
            extra_head: "",
            scripts: &[],
            content: POLICIES,
        },
    )
}
