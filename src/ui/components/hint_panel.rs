use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::engine::mnemonic::Hint;
use crate::ui::theme::Theme;

pub struct HintPanel<'a> {
    rendered: &'a str,
    answer: &'a str,
    hints: &'a [Hint],
    theme: &'a Theme,
}

impl<'a> HintPanel<'a> {
    pub fn new(rendered: &'a str, answer: &'a str, hints: &'a [Hint], theme: &'a Theme) -> Self {
        Self {
            rendered,
            answer,
            hints,
            theme,
        }
    }
}

impl Widget for HintPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(" Mnemonics ")
            .border_style(Style::default().fg(colors.accent()));

        let mut lines = vec![
            Line::from(vec![
                Span::styled(self.rendered, Style::default().fg(colors.prompt())),
                Span::styled("  is  ", Style::default().fg(colors.muted())),
                Span::styled(
                    self.answer,
                    Style::default()
                        .fg(colors.correct())
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
        ];
        for hint in self.hints {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {} = {}   ", hint.cipher, hint.plain),
                    Style::default().fg(colors.fg()),
                ),
                Span::styled(hint.mnemonic.as_str(), Style::default().fg(colors.accent())),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "press any key to continue",
            Style::default().fg(colors.muted()),
        )));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
