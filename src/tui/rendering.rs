use chrono::{DateTime, Utc};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

use super::app::{MessageType, StatusMessage};
use super::events::Focus;
use super::layout::AppLayout;
use super::timestamps::format_last_generated;
use crate::models::{DigestData, Finding};
use crate::session::{EmailForm, Notification, NotificationKind};
use crate::utils::{sanitize, truncate};
use crate::view::{EmptyState, TopicGroup};

const MUTED: Color = Color::Rgb(113, 113, 122);
const BRIGHT: Color = Color::Rgb(250, 250, 250);
const ACCENT: Color = Color::Rgb(13, 148, 136); // Teal
const BAR_BG: Color = Color::Rgb(24, 24, 27);
const SUCCESS: Color = Color::Rgb(22, 163, 74);
const ERROR: Color = Color::Rgb(239, 68, 68);

/// Everything needed to draw one frame
pub struct RenderState<'a> {
    pub focus: Focus,
    pub email: &'a EmailForm,
    pub notification: Option<&'a Notification>,
    pub digest: Option<&'a DigestData>,
    pub topics: &'a [TopicGroup],
    pub selected_topic: Option<&'a str>,
    pub findings: &'a [&'a Finding],
    pub selected_idx: usize,
    pub empty_state: Option<EmptyState>,
    pub generating: bool,
    pub last_generated: Option<DateTime<Utc>>,
    pub status_message: Option<&'a StatusMessage>,
}

/// Render the entire UI
pub fn render_ui(frame: &mut Frame, state: &RenderState) {
    let layout = AppLayout::new(frame.area(), state.notification.is_some());

    render_email(frame, layout.email_area, state.email, state.focus == Focus::Email);
    if let Some(notification) = state.notification {
        render_banner(frame, layout.banner_area, notification);
    }
    render_topics(frame, layout.topics_area, state);
    render_findings(frame, layout.findings_area, state);
    render_detail(
        frame,
        layout.detail_area,
        state.findings.get(state.selected_idx).copied(),
        state.digest,
    );
    render_status_bar(frame, layout.status_area, state);
}

fn border_style(focused: bool) -> Style {
    Style::default().fg(if focused { ACCENT } else { MUTED })
}

fn render_email(frame: &mut Frame, area: Rect, form: &EmailForm, focused: bool) {
    let mut title = " Your Email Address ".to_string();
    if form.is_saving() {
        title = " Your Email Address | Saving... ".to_string();
    } else if form.has_unsaved_changes() {
        title = " Your Email Address | unsaved ".to_string();
    }

    let mut spans = vec![Span::raw(form.draft().to_string())];
    if focused {
        spans.push(Span::styled("▏", Style::default().fg(ACCENT)));
    }
    if form.draft().is_empty() && !focused {
        spans = vec![Span::styled("parent@example.com", Style::default().fg(MUTED))];
    }
    if let Some(error) = form.error() {
        spans.push(Span::styled(format!("  {}", error), Style::default().fg(ERROR)));
    }

    let block_style = if form.error().is_some() {
        Style::default().fg(ERROR)
    } else {
        border_style(focused)
    };

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).border_style(block_style).title(title));
    frame.render_widget(paragraph, area);
}

fn render_banner(frame: &mut Frame, area: Rect, notification: &Notification) {
    let (icon, color) = match notification.kind {
        NotificationKind::Success => ("✓", SUCCESS),
        NotificationKind::Error => ("✗", ERROR),
    };

    let line = Line::from(vec![
        Span::styled(format!("{} ", icon), Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled(sanitize(&notification.message), Style::default().fg(color)),
    ]);

    let paragraph = Paragraph::new(line)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(" x: dismiss "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn pill<'a>(label: String, count: usize, active: bool) -> Span<'a> {
    let style = if active {
        Style::default().fg(BRIGHT).bg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(MUTED)
    };
    Span::styled(format!(" {} {} ", label, count), style)
}

fn render_topics(frame: &mut Frame, area: Rect, state: &RenderState) {
    let total = state.digest.map(|d| d.findings().len()).unwrap_or(0);

    let mut spans = vec![pill("All Topics".to_string(), total, state.selected_topic.is_none())];
    for group in state.topics {
        spans.push(Span::raw(" "));
        spans.push(pill(
            truncate(&group.label, 24),
            group.count,
            state.selected_topic == Some(group.key.as_str()),
        ));
    }

    let title = format!(" Topics | {} findings ", state.findings.len());
    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default().borders(Borders::ALL).border_style(border_style(false)).title(title),
    );
    frame.render_widget(paragraph, area);
}

fn render_findings(frame: &mut Frame, area: Rect, state: &RenderState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(state.focus == Focus::Digest))
        .title(" Research Findings ");

    if let Some(empty) = state.empty_state {
        let paragraph = Paragraph::new(Text::from(empty.message()))
            .style(Style::default().fg(MUTED))
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = state
        .findings
        .iter()
        .enumerate()
        .map(|(idx, finding)| {
            let label = format!(
                "{} | {} | {}",
                finding.topic_area, finding.credibility_score, finding.title
            );
            let content = truncate(&label, width.max(8));
            let style = if idx == state.selected_idx {
                Style::default().fg(BRIGHT).bg(ACCENT).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(MUTED)
            };
            ListItem::new(content).style(style)
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn labeled<'a>(label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![Span::styled(label, Style::default().fg(MUTED)), Span::raw(value)])
}

fn phase(done: bool) -> &'static str {
    if done { "Complete" } else { "Pending" }
}

fn render_detail(
    frame: &mut Frame,
    area: Rect,
    finding: Option<&Finding>,
    digest: Option<&DigestData>,
) {
    let mut lines: Vec<Line> = Vec::new();

    if let Some(finding) = finding {
        lines.push(Line::from(Span::styled(
            sanitize(&finding.title),
            Style::default().fg(BRIGHT).add_modifier(Modifier::BOLD),
        )));
        let mut byline = sanitize(&finding.source);
        if !finding.date_published.is_empty() {
            byline = format!("{} • {}", byline, sanitize(&finding.date_published));
        }
        lines.push(Line::from(Span::styled(byline, Style::default().fg(MUTED))));
        lines.push(Line::from(""));
        lines.push(Line::from(sanitize(&finding.key_finding)));

        if let Some(implication) = &finding.actionable_implication {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "What You Can Do",
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(sanitize(implication)));
        }

        lines.push(Line::from(""));
        lines.push(labeled("Topic: ", sanitize(&finding.topic_area)));
        lines.push(labeled("Credibility: ", sanitize(&finding.credibility_score)));
        if let Some(url) = &finding.url {
            lines.push(labeled("Read full study: ", sanitize(url)));
        }
    }

    if let Some(digest) = digest {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        push_digest_summary(&mut lines, digest);
    }

    let content =
        if lines.is_empty() { Text::from("No finding selected") } else { Text::from(lines) };
    let block =
        Block::default().borders(Borders::ALL).border_style(border_style(false)).title(" Details ");
    let paragraph = Paragraph::new(content).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn push_digest_summary(lines: &mut Vec<Line>, digest: &DigestData) {
    if let Some(workflow) = &digest.workflow {
        lines.push(Line::from(Span::styled(
            sanitize(&workflow.digest_title),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )));
        let phases = &workflow.phases_completed;
        lines.push(labeled("Research Discovery: ", phase(phases.research_discovery).to_string()));
        lines.push(labeled("Insights Synthesis: ", phase(phases.insights_synthesis).to_string()));
        lines.push(labeled("Email Delivery: ", phase(phases.email_delivery).to_string()));
        lines.push(labeled("Sent to: ", sanitize(&workflow.email_sent_to)));
        if !workflow.topics_covered.is_empty() {
            lines.push(labeled("Topics covered: ", sanitize(&workflow.topics_covered.join(", "))));
        }
        if !workflow.summary_message.is_empty() {
            lines.push(Line::from(sanitize(&workflow.summary_message)));
        }
    }

    if let Some(research) = &digest.research {
        lines.push(labeled("Total findings: ", research.total_findings.to_string()));
        if !research.sources_searched.is_empty() {
            lines.push(labeled("Sources: ", sanitize(&research.sources_searched.join(", "))));
        }
    }
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &RenderState) {
    let base = Style::default().fg(BRIGHT).bg(BAR_BG);

    if let Some(message) = state.status_message {
        let color = match message.message_type {
            MessageType::Success => SUCCESS,
            MessageType::Error => ERROR,
        };
        let paragraph = Paragraph::new(format!(" {} ", message.text)).style(base.fg(color));
        frame.render_widget(paragraph, area);
        return;
    }

    let mut parts = vec![];
    if state.generating {
        parts.push("Researching credible sources...".to_string());
    } else if state.email.saved().is_none() {
        parts.push("Please save your email address first".to_string());
    } else if let Some(ts) = state.last_generated {
        parts.push(format!("Last generated: {}", format_last_generated(&ts, &Utc::now())));
    }

    match state.focus {
        Focus::Email => {
            parts.push("Enter: save".to_string());
            parts.push("Tab: digest".to_string());
        }
        Focus::Digest => {
            if !state.generating && state.email.saved().is_some() {
                parts.push("g: generate".to_string());
            }
            parts.push("←/→: topic".to_string());
            parts.push("y: copy link".to_string());
            parts.push("e: email".to_string());
            parts.push("q: quit".to_string());
        }
    }

    let paragraph = Paragraph::new(format!(" {} ", parts.join(" | "))).style(base);
    frame.render_widget(paragraph, area);
}
