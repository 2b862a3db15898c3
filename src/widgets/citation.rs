use std::time::Duration;

/// How long the success message stays up.
pub const STATUS_CLEAR: Duration = Duration::from_millis(2000);

/// Where copied text goes. `navigator.clipboard` in the browser.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStatus {
    /// Nothing to copy; the button does nothing.
    Skipped,
    Copied,
    Failed,
}

impl CopyStatus {
    /// Text for the `[data-copy-status]` live region.
    pub fn message(self) -> &'static str {
        match self {
            CopyStatus::Skipped => "",
            CopyStatus::Copied => "Citation copied",
            CopyStatus::Failed => "Copy failed",
        }
    }

    /// Only the success message is cleared automatically.
    pub fn clear_after(self) -> Option<Duration> {
        matches!(self, CopyStatus::Copied).then_some(STATUS_CLEAR)
    }
}

/// Copies the trimmed citation text. Clipboard errors are logged and
/// reported through the status, never returned.
pub fn copy_citation(clipboard: &mut impl Clipboard, text: &str) -> CopyStatus {
    let text = text.trim();
    if text.is_empty() {
        return CopyStatus::Skipped;
    }
    match clipboard.write_text(text) {
        Ok(()) => CopyStatus::Copied,
        Err(err) => {
            tracing::warn!(error = %format!("{err:#}"), "copy citation failed");
            CopyStatus::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recording {
        copied: Vec<String>,
        deny: bool,
    }

    impl Clipboard for Recording {
        fn write_text(&mut self, text: &str) -> anyhow::Result<()> {
            if self.deny {
                anyhow::bail!("permission denied");
            }
            self.copied.push(text.to_owned());
            Ok(())
        }
    }

    #[test]
    fn copies_trimmed_text_and_clears_later() {
        let mut clipboard = Recording::default();
        let status = copy_citation(&mut clipboard, "  Benedict. Rule.\n");
        assert_eq!(status, CopyStatus::Copied);
        assert_eq!(status.message(), "Citation copied");
        assert_eq!(status.clear_after(), Some(Duration::from_secs(2)));
        assert_eq!(clipboard.copied, vec!["Benedict. Rule.".to_owned()]);
    }

    #[test]
    fn failure_is_a_status_not_an_error() {
        let mut clipboard = Recording {
            deny: true,
            ..Recording::default()
        };
        let status = copy_citation(&mut clipboard, "Benedict. Rule.");
        assert_eq!(status.message(), "Copy failed");
        assert_eq!(status.clear_after(), None);
    }

    #[test]
    fn empty_citation_is_skipped() {
        let mut clipboard = Recording::default();
        assert_eq!(copy_citation(&mut clipboard, "   "), CopyStatus::Skipped);
        assert!(clipboard.copied.is_empty());
    }
}
