use ratatui::{
    layout::Alignment,
    prelude::{Color, Style},
    widgets::{Block, BorderType, Paragraph},
};

use super::UiComponent;

impl UiComponent {
    pub fn help(text: &str) -> Paragraph<'_> {
        Paragraph::new(text)
            .block(
                Block::bordered()
                    .title("Controls")
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::Yellow))
            )
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center)
    }
}
