//! Terminal rendering for every screen

mod classic;
mod cover;
mod phone;

use std::collections::HashMap;
use std::sync::Arc;

use image::{DynamicImage, RgbaImage};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui_image::picker::Picker;
use ratatui_image::protocol::StatefulProtocol;

use crate::app::{App, Screen};
use crate::notification::{NotificationLevel, NotificationManager};

/// Detect the terminal's graphics protocol. Half-blocks when the query
/// fails, None only when even that is unavailable.
pub fn create_picker() -> Option<Picker> {
    Some(Picker::from_query_stdio().unwrap_or_else(|_| Picker::halfblocks()))
}

pub fn render(frame: &mut Frame, app: &mut App) {
    app.view_width = frame.area().width;
    let area = frame.area();

    let (main, chrome) = if app.chrome_visible {
        let [main, bar] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
        (main, Some(bar))
    } else {
        (area, None)
    };

    let App {
        screen,
        preload,
        protocols,
        picker,
        notifications,
        route,
        ..
    } = app;

    match screen {
        Screen::Loading => render_loading(frame, main),
        Screen::Failed(message) => render_failed(frame, main, message),
        Screen::Phone(view) => phone::render(frame, main, view, route.mode, preload, protocols, picker),
        Screen::Classic(view) => classic::render(frame, main, view, preload, protocols, picker),
    }

    if let Some(bar) = chrome {
        render_chrome(frame, bar);
    }
    render_notifications(frame, area, notifications);
}

fn render_loading(frame: &mut Frame, area: Rect) {
    let body = Paragraph::new("Loading chapter...")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(body, centered_rows(area, 1));
}

fn render_failed(frame: &mut Frame, area: Rect, message: &str) {
    let lines = vec![
        Line::styled(
            "Error loading chapter. Please try again later.",
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        ),
        Line::raw(""),
        Line::styled(message.to_string(), Style::default().fg(Color::DarkGray)),
        Line::raw(""),
        Line::styled("r retry · q quit", Style::default().fg(Color::Gray)),
    ];
    let body = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(body, centered_rows(area, 5));
}

fn render_chrome(frame: &mut Frame, bar: Rect) {
    let status = Paragraph::new(" komikrat · q quit")
        .style(Style::default().fg(Color::DarkGray).bg(Color::Black));
    frame.render_widget(status, bar);
}

fn render_notifications(frame: &mut Frame, area: Rect, notifications: &NotificationManager) {
    let Some(notification) = notifications.current() else {
        return;
    };

    let style = match notification.level {
        NotificationLevel::Info => Style::default().fg(Color::Black).bg(Color::Blue),
        NotificationLevel::Warning => Style::default().fg(Color::Black).bg(Color::Yellow),
    };

    let width = (notification.message.len() as u16 + 2).min(area.width);
    let rect = Rect::new(area.right().saturating_sub(width), area.y, width, 1);
    let hud = Paragraph::new(format!(" {} ", notification.message)).style(style);
    frame.render_widget(hud, rect);
}

/// A horizontally full, vertically centered band of `rows` rows.
pub(crate) fn centered_rows(area: Rect, rows: u16) -> Rect {
    let rows = rows.min(area.height);
    let top = area.y + (area.height - rows) / 2;
    Rect::new(area.x, top, area.width, rows)
}

/// Look up (or lazily create) the graphics protocol for a cached surface.
/// Returns None without a picker - callers fall back to a text placeholder.
pub(crate) fn ensure_protocol<'a>(
    protocols: &'a mut HashMap<String, StatefulProtocol>,
    picker: &Option<Picker>,
    surface: &Arc<RgbaImage>,
    image_ref: &str,
) -> Option<&'a mut StatefulProtocol> {
    let picker = picker.as_ref()?;
    if !protocols.contains_key(image_ref) {
        let img = DynamicImage::ImageRgba8(surface.as_ref().clone());
        protocols.insert(image_ref.to_string(), picker.new_resize_protocol(img));
    }
    protocols.get_mut(image_ref)
}

/// Terminal-cell footprint of a surface scaled (down only) to fit a width.
pub(crate) fn page_cell_size(
    surface: &RgbaImage,
    picker: &Picker,
    max_cols: u16,
) -> (u16, u16) {
    let font_size = picker.font_size();
    let cols_native = (surface.width() as f32 / font_size.0 as f32).ceil();
    let rows_native = (surface.height() as f32 / font_size.1 as f32).ceil();
    let scale = (max_cols as f32 / cols_native).min(1.0);

    let cols = (cols_native * scale).round().max(1.0) as u16;
    let rows = (rows_native * scale).ceil().max(1.0) as u16;
    (cols, rows)
}

/// Bordered placeholder for a page whose surface is not available - still
/// decoding, or failed and left to show the placeholder for the session.
pub(crate) fn render_page_placeholder(frame: &mut Frame, area: Rect, page: usize) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let label = Paragraph::new(format!("Loading page {}...", page + 1))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(label, centered_rows(inner, 1));
}
