//! Phone mode: one page rendered at a time, with the overlay header and the
//! page-counter footer.

use std::collections::HashMap;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Paragraph;
use ratatui_image::StatefulImage;
use ratatui_image::picker::Picker;
use ratatui_image::protocol::StatefulProtocol;

use crate::app::PhoneView;
use crate::navigation::Position;
use crate::preload::PreloadService;
use crate::settings::ReadingMode;

use super::{cover, ensure_protocol, page_cell_size, render_page_placeholder};

#[allow(clippy::too_many_arguments)]
pub(crate) fn render(
    frame: &mut Frame,
    area: Rect,
    view: &PhoneView,
    mode: ReadingMode,
    preload: &PreloadService,
    protocols: &mut HashMap<String, StatefulProtocol>,
    picker: &Option<Picker>,
) {
    let page = match view.nav.position() {
        Position::Cover => {
            cover::render(frame, area, &view.chapter, &view.index, mode);
            return;
        }
        Position::Reading(page) => page,
    };

    let header_rows = if view.nav.header_visible() { 1 } else { 0 };
    let [header_area, body, footer] = Layout::vertical([
        Constraint::Length(header_rows),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    if view.nav.header_visible() {
        let header = Paragraph::new(format!(
            " {} · Chapter {} · Esc back to cover",
            view.chapter.comic_info.name, view.chapter.number
        ))
        .style(Style::default().fg(Color::White).bg(Color::DarkGray));
        frame.render_widget(header, header_area);
    }

    render_page(frame, body, view, page, preload, protocols, picker);

    let total = view.chapter.image_refs.len();
    let footer_text = format!("‹ {}/{} ›   ←/→ page · Home/End · m mode", page + 1, total);
    let footer_widget = Paragraph::new(footer_text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer_widget, footer);
}

fn render_page(
    frame: &mut Frame,
    body: Rect,
    view: &PhoneView,
    page: usize,
    preload: &PreloadService,
    protocols: &mut HashMap<String, StatefulProtocol>,
    picker: &Option<Picker>,
) {
    if body.width == 0 || body.height == 0 {
        return;
    }
    let Some(image_ref) = view.chapter.image_refs.get(page) else {
        return;
    };

    let Some(surface) = preload.is_preloaded(image_ref) else {
        // Still decoding, or failed for good: either way the placeholder.
        render_page_placeholder(frame, placeholder_rect(body), page);
        return;
    };

    let target = match picker.as_ref() {
        Some(picker) => {
            let (cols, rows) = page_cell_size(&surface, picker, body.width);
            let cols = cols.min(body.width);
            let rows = rows.min(body.height);
            Rect::new(
                body.x + (body.width - cols) / 2,
                body.y + (body.height.saturating_sub(rows)) / 2,
                cols,
                rows,
            )
        }
        None => body,
    };

    match ensure_protocol(protocols, picker, &surface, image_ref) {
        Some(protocol) => {
            frame.render_stateful_widget(StatefulImage::default(), target, protocol);
        }
        None => {
            // No graphics support at all; describe the page instead.
            let text = Paragraph::new(format!(
                "[page {} · {}x{} px]",
                page + 1,
                surface.width(),
                surface.height()
            ))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray).add_modifier(Modifier::DIM));
            frame.render_widget(text, super::centered_rows(body, 1));
        }
    }
}

fn placeholder_rect(body: Rect) -> Rect {
    let width = body.width.min(40).max(1);
    let height = body.height.min(9).max(1);
    Rect::new(
        body.x + (body.width - width) / 2,
        body.y + (body.height - height) / 2,
        width,
        height,
    )
}
