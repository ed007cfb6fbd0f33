//! Classic mode: the chapter as a vertical strip of pages.
//!
//! Until the preload settles the view is a progress gauge; afterwards every
//! page is looked up independently in the cache, with a placeholder standing
//! in for anything that failed to decode.

use std::collections::HashMap;

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Gauge, Paragraph};
use ratatui_image::StatefulImage;
use ratatui_image::picker::Picker;
use ratatui_image::protocol::StatefulProtocol;

use crate::app::ClassicView;
use crate::navigation::Position;
use crate::preload::PreloadService;

use super::{centered_rows, ensure_protocol, page_cell_size, render_page_placeholder};

const INFO_BLOCK_ROWS: u16 = 5;
const PLACEHOLDER_ROWS: u16 = 9;
const PAGE_GAP_ROWS: u16 = 1;

pub(crate) fn render(
    frame: &mut Frame,
    area: Rect,
    view: &ClassicView,
    preload: &PreloadService,
    protocols: &mut HashMap<String, StatefulProtocol>,
    picker: &Option<Picker>,
) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    if !preload.is_complete() {
        render_progress(frame, area, preload.progress());
        return;
    }

    let mut y = area.y;
    let first_page = match view.scroll {
        Position::Cover => {
            let info = Rect::new(area.x, y, area.width, INFO_BLOCK_ROWS.min(area.height));
            render_info_block(frame, info, view);
            y += INFO_BLOCK_ROWS + PAGE_GAP_ROWS;
            0
        }
        Position::Reading(page) => page,
    };

    for page in first_page..view.chapter.image_refs.len() {
        if y >= area.bottom() {
            break;
        }
        let avail = area.bottom() - y;
        let image_ref = &view.chapter.image_refs[page];

        let used = match preload.is_preloaded(image_ref) {
            Some(surface) => match picker.as_ref() {
                Some(p) => {
                    let (cols, rows) = page_cell_size(&surface, p, area.width);
                    let rows = rows.min(avail);
                    let rect = Rect::new(area.x + (area.width - cols.min(area.width)) / 2, y, cols.min(area.width), rows);
                    if let Some(protocol) = ensure_protocol(protocols, picker, &surface, image_ref) {
                        frame.render_stateful_widget(StatefulImage::default(), rect, protocol);
                    }
                    rows
                }
                None => {
                    let rows = avail.min(1);
                    let text = Paragraph::new(format!(
                        "[page {} · {}x{} px]",
                        page + 1,
                        surface.width(),
                        surface.height()
                    ))
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::Gray).add_modifier(Modifier::DIM));
                    frame.render_widget(text, Rect::new(area.x, y, area.width, rows));
                    rows
                }
            },
            None => {
                let rows = PLACEHOLDER_ROWS.min(avail);
                let width = area.width.min(40).max(1);
                let rect = Rect::new(area.x + (area.width - width) / 2, y, width, rows);
                render_page_placeholder(frame, rect, page);
                rows
            }
        };

        y += used + PAGE_GAP_ROWS;
    }
}

fn render_progress(frame: &mut Frame, area: Rect, progress: u8) {
    let band = centered_rows(area, 3);
    let label = Paragraph::new(format!("Loading pages... {progress}%"))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(label, Rect::new(band.x, band.y, band.width, 1));

    if band.height < 3 {
        return;
    }
    let gauge_width = band.width.min(64).max(1);
    let gauge_area = Rect::new(
        band.x + (band.width - gauge_width) / 2,
        band.y + 2,
        gauge_width,
        1,
    );
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Blue).bg(Color::Black))
        .percent(u16::from(progress))
        .label("");
    frame.render_widget(gauge, gauge_area);
}

fn render_info_block(frame: &mut Frame, area: Rect, view: &ClassicView) {
    let chapter = &view.chapter;
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
                "{} pages · p/n chapter · m mode · q quit",
                chapter.image_refs.len()
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    let body = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(body, area);
}
