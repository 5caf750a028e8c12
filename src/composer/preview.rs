//! Read-only preview card for a quoted post

use chrono::{DateTime, Utc};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::models::{QuotedPost, relative_time_since};
use crate::theme::ThemeColors;

/// Content lines shown before the preview is cut off
pub const DEFAULT_MAX_LINES: usize = 3;

/// Quoted post card: author, age, clamped content, media indicator
pub struct QuotePreview<'a> {
    post: &'a QuotedPost,
    colors: ThemeColors,
    max_lines: usize,
    now: DateTime<Utc>,
}

impl<'a> QuotePreview<'a> {
    /// Preview `post` with the given colors
    pub fn new(post: &'a QuotedPost, colors: ThemeColors) -> Self {
        Self {
            post,
            colors,
            max_lines: DEFAULT_MAX_LINES,
            now: Utc::now(),
        }
    }

    /// Clamp content to `max_lines` wrapped lines
    pub fn max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = max_lines.max(1);
        self
    }

    /// Reference time for the relative timestamp
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Lines of the card body for an inner width of `width` columns
    pub fn lines(&self, width: u16) -> Vec<Line<'static>> {
        let author = &self.post.author;
        let mut lines = vec![Line::from(vec![
            Span::styled(author.display_label().to_string(), self.colors.author()),
            Span::styled(format!(" {}", author.handle()), self.colors.text_muted()),
            Span::styled(
                format!(" · {}", relative_time_since(self.post.created_at, self.now)),
                self.colors.text_muted(),
            ),
        ])];

        for line in clamp_lines(&self.post.content, usize::from(width), self.max_lines) {
            lines.push(Line::styled(line, self.colors.text()));
        }

        if let Some(url) = &self.post.image_url {
            lines.push(Line::styled(format!("🖼 {url}"), self.colors.media()));
        }

        lines
    }

    /// Rows needed to show the whole card, borders included
    pub fn height(&self, width: u16) -> u16 {
        let inner = width.saturating_sub(2);
        u16::try_from(self.lines(inner).len()).unwrap_or(u16::MAX).saturating_add(2)
    }
}

impl Widget for QuotePreview<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.colors.card_border())
            .style(self.colors.card());
        let inner = block.inner(area);

        Paragraph::new(self.lines(inner.width))
            .block(block)
            .render(area, buf);
    }
}

/// Wrap `text` to `width` columns and keep at most `max_lines` lines,
/// ending with an ellipsis when something was cut
fn clamp_lines(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }

    let mut wrapped: Vec<String> = textwrap::wrap(text.trim(), width)
        .into_iter()
        .map(|line| line.into_owned())
        .collect();

    if wrapped.len() <= max_lines {
        return wrapped;
    }

    wrapped.truncate(max_lines);
    if let Some(last) = wrapped.last_mut() {
        while !last.is_empty() && last.width() + 1 > width {
            last.pop();
        }
        let kept = last.trim_end().len();
        last.truncate(kept);
        last.push('…');
    }

    wrapped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Profile;
    use crate::theme::Theme;
    use chrono::Duration;
    use uuid::Uuid;

    fn post(content: &str, image_url: Option<&str>) -> QuotedPost {
        QuotedPost {
            id: Uuid::new_v4(),
            content: content.to_string(),
            image_url: image_url.map(str::to_string),
            created_at: Utc::now(),
            author: Profile {
                username: "frank".to_string(),
                display_name: None,
                avatar_url: None,
            },
        }
    }

    fn plain(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn test_short_content_is_not_clamped() {
        assert_eq!(clamp_lines("hello world", 20, 3), vec!["hello world"]);
    }

    #[test]
    fn test_long_content_is_clamped_with_ellipsis() {
        let lines = clamp_lines("one two three four five six seven eight", 9, 2);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "one two");
        assert!(lines[1].ends_with('…'));
        assert!(lines[1].width() <= 9);
    }

    #[test]
    fn test_header_falls_back_to_username() {
        let quoted = post("hi", None);
        let now = quoted.created_at + Duration::hours(2);
        let preview = QuotePreview::new(&quoted, Theme::default().colors()).at(now);

        let lines = preview.lines(40);
        assert_eq!(plain(&lines[0]), "frank @frank · 2 hours ago");
        assert_eq!(plain(&lines[1]), "hi");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_media_indicator() {
        let quoted = post("look", Some("https://cdn.test/a.png"));
        let preview = QuotePreview::new(&quoted, Theme::default().colors());

        let lines = preview.lines(40);
        assert_eq!(plain(lines.last().unwrap()), "🖼 https://cdn.test/a.png");
        assert_eq!(preview.height(42), 5);
    }

    #[test]
    fn test_renders_into_buffer() {
        let quoted = post("rendered text", None);
        let preview = QuotePreview::new(&quoted, Theme::default().colors());
        let area = Rect::new(0, 0, 30, 4);
        let mut buf = Buffer::empty(area);

        preview.render(area, &mut buf);

        let row = |y: u16| -> String { (0..area.width).map(|x| buf[(x, y)].symbol()).collect() };
        assert!(row(1).contains("frank @frank"));
        assert!(row(2).contains("rendered text"));
    }
}
