use crate::app::App;
use crate::news::Article;
use crate::util::{strip_control_chars, trim_truncation_marker, truncate_to_width};
use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Number of frames in the loading spinner animation.
pub(super) const SPINNER_FRAMES: usize = SPINNER.len();

/// Render the current article as a full-screen card, or the loading/empty
/// placeholder when there is nothing to show yet.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let title = format!(" {} ", app.source_label);
    let mut block = Block::default().borders(Borders::ALL).title(title);

    let Some(article) = app.current_article() else {
        f.render_widget(placeholder(app).block(block), area);
        return;
    };

    let mut position = position_label(app);
    if app.feed.fetch_in_flight {
        position = format!(
            " {} loading more {}",
            SPINNER[app.spinner_frame % SPINNER_FRAMES],
            position
        );
    }
    block = block.title_bottom(Line::from(position).alignment(Alignment::Right));

    let inner_width = area.width.saturating_sub(2) as usize;
    let paragraph = Paragraph::new(card_lines(article, inner_width))
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}

/// " 3/20 · 1 page " for the bottom border.
fn position_label(app: &App) -> String {
    let pages = app.feed.pages_loaded();
    format!(
        " {}/{} · {} page{} ",
        app.viewer.index() + 1,
        app.feed.len(),
        pages,
        if pages == 1 { "" } else { "s" }
    )
}

fn placeholder(app: &App) -> Paragraph<'static> {
    let lines = if app.feed.fetch_in_flight {
        vec![
            Line::from(""),
            Line::from(format!(
                "{} Loading headlines...",
                SPINNER[app.spinner_frame % SPINNER_FRAMES]
            )),
        ]
    } else {
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "No news found",
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ];
        if let Some(error) = &app.feed.last_error {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                strip_control_chars(error).into_owned(),
                Style::default().fg(Color::Red),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press r to try again",
            Style::default().fg(Color::DarkGray),
        )));
        lines
    };

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
}

/// Build the styled lines of one card.
///
/// Everything from the API goes through `strip_control_chars` first.
pub(super) fn card_lines(article: &Article, width: usize) -> Vec<Line<'static>> {
    let clean = |s: &str| strip_control_chars(s).into_owned();

    let mut lines = vec![Line::from(Span::styled(
        clean(&article.title),
        Style::default()
            .add_modifier(Modifier::BOLD)
            .fg(Color::Cyan),
    ))];

    let meta = meta_line(article);
    if !meta.is_empty() {
        lines.push(Line::from(Span::styled(
            meta,
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::from(""));

    if let Some(image) = &article.image_url {
        let label = format!("[Image: {}]", clean(image));
        lines.push(Line::from(Span::styled(
            truncate_to_width(&label, width).into_owned(),
            Style::default().fg(Color::Blue),
        )));
        lines.push(Line::from(""));
    }

    if let Some(description) = &article.description {
        lines.push(Line::from(Span::styled(
            clean(description),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
        lines.push(Line::from(""));
    }

    let body = clean(trim_truncation_marker(&article.content));
    lines.extend(body.lines().map(|l| Line::from(l.to_string())));
    lines.push(Line::from(""));

    if article.link_url.is_empty() {
        lines.push(Line::from(Span::styled(
            "(no link for this article)",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.push(Line::from(vec![
            Span::styled("Read more [o]: ", Style::default().fg(Color::Yellow)),
            Span::raw(clean(&article.link_url)),
        ]));
    }

    lines
}

fn meta_line(article: &Article) -> String {
    let source = article.source_name.as_deref().map(strip_control_chars);
    let when = format_relative_time(article.published_at, Utc::now());

    match (source, when.is_empty()) {
        (Some(s), false) => format!("{} • {}", s, when),
        (Some(s), true) => s.into_owned(),
        (None, false) => when,
        (None, true) => String::new(),
    }
}

/// "5m ago", "3h ago", "2d ago", or a date for anything older than a week.
pub(super) fn format_relative_time(
    published: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> String {
    let Some(published) = published else {
        return String::new();
    };

    let diff = (now - published).num_seconds();

    // Future dates from skewed clocks
    if diff < 60 {
        return "just now".to_string();
    }
    if diff < 3600 {
        return format!("{}m ago", diff / 60);
    }
    if diff < 86400 {
        return format!("{}h ago", diff / 3600);
    }
    if diff < 604800 {
        return format!("{}d ago", diff / 86400);
    }
    published.format("%b %d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn text_of(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    fn article() -> Article {
        Article {
            title: "Title\x1b[31m".to_string(),
            image_url: Some("https://img.example.com/a.jpg".to_string()),
            content: "First line\nSecond line… [+120 chars]".to_string(),
            link_url: "https://example.com/a".to_string(),
            source_name: Some("BBC News".to_string()),
            published_at: None,
            description: None,
        }
    }

    #[test]
    fn test_card_contains_all_parts() {
        let text = text_of(&card_lines(&article(), 80));

        assert_eq!(text[0], "Title");
        assert_eq!(text[1], "BBC News");
        assert!(text.contains(&"[Image: https://img.example.com/a.jpg]".to_string()));
        assert!(text.contains(&"First line".to_string()));
        assert!(text.contains(&"Second line…".to_string()));
        assert_eq!(
            text.last().map(String::as_str),
            Some("Read more [o]: https://example.com/a")
        );
    }

    #[test]
    fn test_card_without_link() {
        let mut a = article();
        a.link_url.clear();
        let text = text_of(&card_lines(&a, 80));
        assert_eq!(
            text.last().map(String::as_str),
            Some("(no link for this article)")
        );
    }

    #[test]
    fn test_card_shows_description() {
        let mut a = article();
        a.description = Some("Lead paragraph".to_string());
        let text = text_of(&card_lines(&a, 80));
        assert!(text.contains(&"Lead paragraph".to_string()));
    }

    #[test]
    fn test_position_label_counts_pages() {
        let (mut app, _) = crate::app::tests::test_app();
        app.apply_feed_state(crate::app::tests::state_with(4));
        app.advance();
        assert_eq!(position_label(&app), " 2/4 · 1 page ");

        let mut state = crate::app::tests::state_with(4);
        state.next_page = 4;
        app.apply_feed_state(state);
        assert_eq!(position_label(&app), " 2/4 · 3 pages ");
    }

    #[test]
    fn test_relative_time() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let at = |secs: i64| Some(now - chrono::Duration::seconds(secs));

        assert_eq!(format_relative_time(None, now), "");
        assert_eq!(format_relative_time(at(-300), now), "just now");
        assert_eq!(format_relative_time(at(30), now), "just now");
        assert_eq!(format_relative_time(at(300), now), "5m ago");
        assert_eq!(format_relative_time(at(7200), now), "2h ago");
        assert_eq!(format_relative_time(at(3 * 86400), now), "3d ago");
        assert_eq!(format_relative_time(at(30 * 86400), now), "Feb 09, 2024");
    }
}
