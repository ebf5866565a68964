//! Display sanitization for agent-supplied text.
//!
//! Finding titles, summaries and messages come from a remote service and are
//! drawn straight into the terminal. Escape sequences and control characters
//! are removed first so a reply cannot move the cursor or recolor the screen.

/// Remove ANSI CSI/OSC sequences and control characters other than `\n` and `\t`
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\x1b' => match chars.peek() {
                // CSI: ESC [ params final-byte
                Some('[') => {
                    chars.next();
                    for next in chars.by_ref() {
                        if ('\x40'..='\x7e').contains(&next) {
                            break;
                        }
                    }
                }
                // OSC: ESC ] ... terminated by BEL or ESC \
                Some(']') => {
                    chars.next();
                    while let Some(next) = chars.next() {
                        if next == '\x07' {
                            break;
                        }
                        if next == '\x1b' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            },
            '\n' | '\t' => out.push(ch),
            '\r' => {}
            c if c.is_control() => {}
            c => out.push(c),
        }
    }

    out
}

/// Sanitize and cut to `max` characters, marking the cut with an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    let clean = sanitize(text);
    if clean.chars().count() <= max {
        return clean;
    }
    let mut cut: String = clean.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_color_codes() {
        assert_eq!(sanitize("\x1b[31mHigh\x1b[0m credibility"), "High credibility");
    }

    #[test]
    fn test_sanitize_strips_cursor_movement() {
        assert_eq!(sanitize("\x1b[2J\x1b[HCleared"), "Cleared");
    }

    #[test]
    fn test_sanitize_strips_osc_title() {
        assert_eq!(sanitize("\x1b]0;pwned\x07Title"), "Title");
        assert_eq!(sanitize("\x1b]8;;https://x\x1b\\link"), "link");
    }

    #[test]
    fn test_sanitize_keeps_newlines_and_tabs() {
        assert_eq!(sanitize("a\nb\tc\r\n"), "a\nb\tc\n");
    }

    #[test]
    fn test_sanitize_drops_bell_and_backspace() {
        assert_eq!(sanitize("Alert\x07\x08!"), "Alert!");
    }

    #[test]
    fn test_sanitize_unicode_untouched() {
        assert_eq!(sanitize("Omega-3 ±30 min 👶"), "Omega-3 ±30 min 👶");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("longer than ten", 10), "longer th…");
        assert_eq!(truncate("\x1b[1mbold\x1b[0m", 4), "bold");
    }
}
