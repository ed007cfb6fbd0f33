//! Chapter cover: comic and chapter info plus the available actions.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use crate::api::ChapterDetail;
use crate::sequencer::ChapterIndex;
use crate::settings::ReadingMode;

use super::centered_rows;

pub(crate) fn render(
    frame: &mut Frame,
    area: Rect,
    chapter: &ChapterDetail,
    index: &ChapterIndex,
    mode: ReadingMode,
) {
    let dim = Style::default().fg(Color::DarkGray);
    let action = Style::default().fg(Color::Gray);

    let prev_style = if index.has_prev(chapter.number) { action } else { dim };
    let next_style = if index.has_next(chapter.number) { action } else { dim };

    let lines = vec![
        Line::styled(
            chapter.comic_info.name.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Line::styled(
            format!("Chapter {}: {}", chapter.number, chapter.title),
            Style::default().fg(Color::White),
        ),
        Line::styled(
            format!(
                "{} pages · {} views · {} chapters in this comic",
                chapter.image_refs.len(),
                chapter.views,
                index.len()
            ),
            dim,
        ),
        Line::raw(""),
        Line::styled("Enter  start reading", action),
        Line::styled("p      previous chapter", prev_style),
        Line::styled("n      next chapter", next_style),
        Line::styled(format!("m      reading mode: {}", mode.as_str()), action),
        Line::styled("q      quit", action),
    ];

    let body = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(body, centered_rows(area, 9));
}
