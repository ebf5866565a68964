//! Copy a finding's link (or a citation when it has none) to the system clipboard.

use anyhow::{Context, Result};
use arboard::Clipboard;

use crate::models::Finding;

/// Citations longer than this are refused
const MAX_CLIPBOARD_SIZE: usize = 64 * 1024;

/// Clipboard seam so tests never touch the system clipboard
trait ClipboardProvider {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

struct SystemClipboard {
    clipboard: Clipboard,
}

impl SystemClipboard {
    fn new() -> Result<Self> {
        let clipboard = Clipboard::new().context("Failed to initialize clipboard")?;
        Ok(Self { clipboard })
    }
}

impl ClipboardProvider for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.clipboard.set_text(text).context("Failed to set clipboard contents")?;
        Ok(())
    }
}

/// What gets copied for a finding: its URL, or "Title. Source (date)."
pub fn finding_reference(finding: &Finding) -> String {
    if let Some(url) = &finding.url {
        return url.clone();
    }

    if finding.date_published.is_empty() {
        format!("{}. {}.", finding.title, finding.source)
    } else {
        format!("{}. {} ({}).", finding.title, finding.source, finding.date_published)
    }
}

fn copy_with_provider(text: &str, provider: &mut dyn ClipboardProvider) -> Result<()> {
    if text.trim().is_empty() {
        anyhow::bail!("Nothing to copy");
    }
    if text.len() > MAX_CLIPBOARD_SIZE {
        anyhow::bail!("Text too large for clipboard ({} bytes)", text.len());
    }
    provider.set_text(text)
}

/// Copy the reference for `finding`, returning what was copied.
///
/// Fails when no system clipboard is available (headless sessions, SSH
/// without forwarding).
pub fn copy_finding(finding: &Finding) -> Result<String> {
    let text = finding_reference(finding);
    let mut clipboard = SystemClipboard::new()?;
    copy_with_provider(&text, &mut clipboard)?;
    Ok(text)
}
