use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::app::Feedback;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

/// The rendered item, the answer line and feedback for the last attempt.
pub struct PromptPanel<'a> {
    rendered: &'a str,
    input: &'a LineInput,
    feedback: Option<Feedback>,
    theme: &'a Theme,
}

impl<'a> PromptPanel<'a> {
    pub fn new(
        rendered: &'a str,
        input: &'a LineInput,
        feedback: Option<Feedback>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            rendered,
            input,
            feedback,
            theme,
        }
    }
}

impl Widget for PromptPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered().border_style(Style::default().fg(colors.border()));

        let (before, at, after) = self.input.render_parts();
        let cursor_style = Style::default().fg(colors.cursor_fg()).bg(colors.cursor_bg());
        let cursor = at.map_or_else(|| " ".to_string(), |ch| ch.to_string());
        let answer_line = Line::from(vec![
            Span::styled("> ", Style::default().fg(colors.muted())),
            Span::styled(before, Style::default().fg(colors.fg())),
            Span::styled(cursor, cursor_style),
            Span::styled(after, Style::default().fg(colors.fg())),
        ]);

        let feedback_line = match self.feedback {
            Some(Feedback::Missed) => Line::from(Span::styled(
                "not quite, try again (a lone space gives up)",
                Style::default().fg(colors.incorrect()),
            )),
            Some(Feedback::Correct) => Line::from(Span::styled(
                "correct",
                Style::default().fg(colors.correct()),
            )),
            Some(Feedback::Corrected) => Line::from(Span::styled(
                "got it, counted as a miss",
                Style::default().fg(colors.muted()),
            )),
            None => Line::from(""),
        };

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                self.rendered,
                Style::default()
                    .fg(colors.prompt())
                    .add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
            Line::from(""),
            answer_line,
            feedback_line,
        ];

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
