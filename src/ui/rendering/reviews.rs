//! Review card for the clue currently in view.

use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::{storage::KeyValueStore, ui::app::App};

impl<S: KeyValueStore> App<S> {
    pub(in crate::ui) fn draw_review(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let visible = self.engine.visible_reviews();

        let Some(review) = visible.get(self.review_index) else {
            f.render_widget(
                Paragraph::new("No reviews available")
                    .block(Block::default().borders(Borders::ALL).title("Review")),
                area,
            );
            return;
        };

        let mut header = vec![Span::styled(
            review.username.clone(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )];
        if let Some(stars) = review.stars() {
            header.push(Span::styled(format!("  {}", stars), Style::default().fg(Color::Green)));
        }
        if review.liked {
            header.push(Span::styled("  ♥", Style::default().fg(Color::Red)));
        }

        let text = if review.collapsed {
            format!("(contains spoilers) {}", review.text)
        } else {
            review.text.clone()
        };

        let lines = vec![
            Line::from(header),
            Line::from(Span::styled(review.date.clone(), Style::default().fg(Color::DarkGray))),
            Line::from(""),
            Line::from(text),
            Line::from(""),
            Line::from(Span::styled(
                format!("{} likes · {} comments", review.num_likes, review.num_comments),
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let title = format!(
            "Review {}/{} | ←/→ to switch",
            self.review_index + 1,
            visible.len()
        );

        f.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).title(title)),
            area,
        );
    }
}
