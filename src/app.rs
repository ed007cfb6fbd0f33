//! Application state and event dispatch
//!
//! One `App` owns the chapter loader, the preload service and the current
//! screen. Chapter jumps and reading-mode switches are full navigations: the
//! route changes, the whole fetch sequence re-runs, and the view state is
//! rebuilt for the new target. The two reading modes never share view state.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use log::info;
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui_image::picker::Picker;
use ratatui_image::protocol::StatefulProtocol;

use crate::api::{ChapterDetail, ChapterLoader, ChapterRequest, ComicClient, LoadedChapter};
use crate::event_source::EventSource;
use crate::navigation::{self, NavCommand, PageNavigator, Position};
use crate::notification::NotificationManager;
use crate::preload::{HttpImageFetcher, PreloadService};
use crate::sequencer::{ChapterIndex, Route, mode_switch_route};
use crate::settings::{self, ReadingMode};
use crate::ui;

/// Phone mode: one page at a time, driven by the page navigator.
pub struct PhoneView {
    pub chapter: ChapterDetail,
    pub index: ChapterIndex,
    pub nav: PageNavigator,
}

impl PhoneView {
    fn new(loaded: LoadedChapter, position: Position) -> Self {
        let mut nav = PageNavigator::new(loaded.chapter.image_refs.len());
        if let Position::Reading(page) = position {
            let _ = nav.resume_at(page);
        }
        Self {
            chapter: loaded.chapter,
            index: loaded.index,
            nav,
        }
    }
}

/// Classic mode: the whole chapter as a vertical strip. Bypasses the page
/// navigator; the only state is which part of the strip is at the top -
/// the info block (`Cover`) or a page.
pub struct ClassicView {
    pub chapter: ChapterDetail,
    pub index: ChapterIndex,
    pub scroll: Position,
}

impl ClassicView {
    fn new(loaded: LoadedChapter, position: Position) -> Self {
        let pages = loaded.chapter.image_refs.len();
        let scroll = match position {
            Position::Reading(page) if pages > 0 => {
                Position::Reading(page.min(pages - 1))
            }
            _ => Position::Cover,
        };
        Self {
            chapter: loaded.chapter,
            index: loaded.index,
            scroll,
        }
    }

    pub fn scroll_down(&mut self) -> bool {
        let pages = self.chapter.image_refs.len();
        let next = match self.scroll {
            Position::Cover if pages > 0 => Position::Reading(0),
            Position::Reading(i) if i + 1 < pages => Position::Reading(i + 1),
            other => other,
        };
        let changed = next != self.scroll;
        self.scroll = next;
        changed
    }

    pub fn scroll_up(&mut self) -> bool {
        let prev = match self.scroll {
            Position::Reading(0) => Position::Cover,
            Position::Reading(i) => Position::Reading(i - 1),
            Position::Cover => Position::Cover,
        };
        let changed = prev != self.scroll;
        self.scroll = prev;
        changed
    }

    pub fn scroll_to_top(&mut self) -> bool {
        let changed = self.scroll != Position::Cover;
        self.scroll = Position::Cover;
        changed
    }

    pub fn scroll_to_end(&mut self) -> bool {
        let pages = self.chapter.image_refs.len();
        if pages == 0 {
            return self.scroll_to_top();
        }
        let end = Position::Reading(pages - 1);
        let changed = self.scroll != end;
        self.scroll = end;
        changed
    }
}

/// What the terminal currently shows.
pub enum Screen {
    /// Chapter fetch sequence in flight.
    Loading,
    /// Transport failure; offers a retry that re-runs the whole sequence.
    Failed(String),
    Phone(PhoneView),
    Classic(ClassicView),
}

pub struct App {
    pub(crate) loader: ChapterLoader,
    pub(crate) preload: PreloadService,
    pub(crate) route: Route,
    pub(crate) screen: Screen,
    /// App-shell chrome (status bar). Hidden while any reading view is
    /// active, restored on the loading/error screens.
    pub(crate) chrome_visible: bool,
    pub(crate) notifications: NotificationManager,
    pub(crate) picker: Option<Picker>,
    pub(crate) protocols: HashMap<String, StatefulProtocol>,
    pub(crate) view_width: u16,
    pub(crate) should_quit: bool,
}

impl App {
    /// Wire up the app against a content service and kick off the first
    /// chapter load.
    pub fn new(client: Arc<ComicClient>, comic_id: i64, chapter_id: i64, picker: Option<Picker>) -> Self {
        let preload = PreloadService::with_config(
            Arc::new(HttpImageFetcher::new()),
            settings::get_decode_workers(),
            settings::get_cache_capacity(),
        );
        let mut app = Self::with_services(
            ChapterLoader::new(client),
            preload,
            Route::chapter_entry(comic_id, chapter_id, settings::get_reading_mode()),
            picker,
        );
        app.reload();
        app
    }

    /// Constructor seam for tests: inject the loader and preload service.
    /// Does not start a load; call [`reload`](Self::reload) for that.
    pub fn with_services(
        loader: ChapterLoader,
        preload: PreloadService,
        route: Route,
        picker: Option<Picker>,
    ) -> Self {
        Self {
            loader,
            preload,
            route,
            screen: Screen::Loading,
            chrome_visible: true,
            notifications: NotificationManager::new(),
            picker,
            protocols: HashMap::new(),
            view_width: 0,
            should_quit: false,
        }
    }

    /// Run (or re-run, for the retry affordance) the full fetch sequence for
    /// the current route. Opening a chapter this way counts as a read.
    pub fn reload(&mut self) {
        self.start_load(true);
    }

    /// Enter an already-fetched chapter directly, bypassing the loader.
    /// Offline fixtures and integration tests use this.
    pub fn open_loaded_chapter(&mut self, loaded: LoadedChapter) {
        self.enter_chapter(loaded);
    }

    #[must_use]
    pub fn route(&self) -> Route {
        self.route
    }

    #[must_use]
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Pump background work: finished chapter loads, settled page decodes,
    /// expiring notifications. Returns true if the screen needs a redraw.
    pub fn tick(&mut self) -> bool {
        let mut dirty = false;

        if let Some(result) = self.loader.poll() {
            match result {
                Ok(loaded) => self.enter_chapter(loaded),
                Err(err) => {
                    info!("chapter load failed: {err}");
                    self.screen = Screen::Failed(err.to_string());
                    self.chrome_visible = true;
                }
            }
            dirty = true;
        }

        if !self.preload.poll_responses().is_empty() {
            dirty = true;
        }

        if self.notifications.update() {
            dirty = true;
        }

        dirty
    }

    /// A chapter finished loading: preload its pages and build the view the
    /// current route asks for. Entering a reading view hides the app chrome.
    fn enter_chapter(&mut self, loaded: LoadedChapter) {
        self.protocols.clear();
        self.preload.preload(&loaded.chapter.image_refs);

        self.screen = match self.route.mode {
            ReadingMode::Phone => Screen::Phone(PhoneView::new(loaded, self.route.position)),
            ReadingMode::Classic => Screen::Classic(ClassicView::new(loaded, self.route.position)),
        };
        self.chrome_visible = false;
    }

    fn start_load(&mut self, mark_viewed: bool) {
        self.screen = Screen::Loading;
        self.chrome_visible = true;
        self.loader.load(ChapterRequest {
            comic_id: self.route.comic_id,
            chapter_id: self.route.chapter_id,
            mark_viewed,
        });
    }

    /// Handle one terminal event. Returns true if a redraw is needed.
    pub fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(_, _) => true,
            _ => false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return false;
            }
            KeyCode::Char('m') => return self.switch_mode(),
            KeyCode::Char('n') => return self.goto_neighbor(1),
            KeyCode::Char('p') => return self.goto_neighbor(-1),
            _ => {}
        }

        match &mut self.screen {
            Screen::Failed(_) => {
                if key.code == KeyCode::Char('r') {
                    info!("retrying chapter {}", self.route.chapter_id);
                    self.reload();
                    return true;
                }
                false
            }

            Screen::Phone(view) => {
                let cmd = match key.code {
                    KeyCode::Enter if view.nav.position() == Position::Cover => {
                        Some(NavCommand::StartReading)
                    }
                    KeyCode::Esc => Some(NavCommand::BackToCover),
                    code => navigation::command_for_key(code),
                };
                match cmd {
                    Some(cmd) => !view.nav.apply(cmd).is_empty(),
                    None => false,
                }
            }

            Screen::Classic(view) => match key.code {
                KeyCode::Down | KeyCode::Char('j') | KeyCode::PageDown => view.scroll_down(),
                KeyCode::Up | KeyCode::Char('k') | KeyCode::PageUp => view.scroll_up(),
                KeyCode::Home => view.scroll_to_top(),
                KeyCode::End => view.scroll_to_end(),
                _ => false,
            },

            Screen::Loading => false,
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        match &mut self.screen {
            Screen::Phone(view) => match mouse.kind {
                MouseEventKind::ScrollDown | MouseEventKind::ScrollUp => {
                    match navigation::command_for_wheel(mouse.kind) {
                        Some(cmd) => !view.nav.apply(cmd).is_empty(),
                        None => false,
                    }
                }
                MouseEventKind::Down(MouseButton::Left) => {
                    // Click zones only exist on the page surface; the cover
                    // has its own keyboard-driven actions.
                    if view.nav.position() == Position::Cover || self.view_width == 0 {
                        return false;
                    }
                    let cmd = navigation::command_for_click(mouse.column, self.view_width);
                    !view.nav.apply(cmd).is_empty()
                }
                _ => false,
            },

            Screen::Classic(view) => match mouse.kind {
                MouseEventKind::ScrollDown => view.scroll_down(),
                MouseEventKind::ScrollUp => view.scroll_up(),
                _ => false,
            },

            Screen::Loading | Screen::Failed(_) => false,
        }
    }

    /// Switch Phone <-> Classic: persist the preference, then perform a full
    /// navigation to the equivalent position in the other mode's view.
    fn switch_mode(&mut self) -> bool {
        let position = match &self.screen {
            Screen::Phone(view) => view.nav.position(),
            Screen::Classic(view) => view.scroll,
            Screen::Loading | Screen::Failed(_) => return false,
        };

        let target = mode_switch_route(Route {
            position,
            ..self.route
        });
        settings::set_reading_mode(target.mode);
        self.notifications
            .info(format!("Reading mode: {}", target.mode.as_str()));

        self.route = target;
        // A mode switch re-enters the same chapter; it does not count as a
        // new read.
        self.start_load(false);
        true
    }

    /// Jump to the chapter numbered exactly one above/below the current one.
    /// A missing neighbor disables the jump.
    fn goto_neighbor(&mut self, delta: i64) -> bool {
        let number = match &self.screen {
            Screen::Phone(view) => view.chapter.number,
            Screen::Classic(view) => view.chapter.number,
            Screen::Loading | Screen::Failed(_) => return false,
        };
        self.goto_chapter(number + delta)
    }

    /// Jump to the chapter with exactly this number in the comic's index.
    /// A full identity change: new fetch sequence, position reset to the
    /// cover, fresh preload for the new chapter's pages.
    pub fn goto_chapter(&mut self, number: i64) -> bool {
        let index = match &self.screen {
            Screen::Phone(view) => &view.index,
            Screen::Classic(view) => &view.index,
            Screen::Loading | Screen::Failed(_) => return false,
        };

        let Some(target) = index.by_number(number) else {
            self.notifications
                .warn(format!("No chapter numbered {number}"));
            return true;
        };

        info!("navigating to chapter {} ({})", target.number, target.id);
        self.route = Route {
            chapter_id: target.id,
            position: Position::Cover,
            ..self.route
        };
        self.start_load(true);
        true
    }
}

/// Main loop: pump background work, feed terminal events to the app, redraw
/// when something changed.
pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &mut dyn EventSource,
) -> Result<()>
where
    <B as Backend>::Error: Send + Sync + 'static,
{
    terminal.draw(|frame| ui::render(frame, app))?;

    while !app.should_quit() {
        let mut dirty = app.tick();

        if events.poll(Duration::from_millis(50))? {
            let event = events.read()?;
            dirty |= app.handle_event(event);
        }

        if dirty {
            terminal.draw(|frame| ui::render(frame, app))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ChapterSummary, ComicInfo};

    fn chapter(pages: usize, number: i64) -> ChapterDetail {
        ChapterDetail {
            id: 345,
            number,
            title: "The Long Night".into(),
            views: 7,
            comic_info: ComicInfo {
                id: 12,
                name: "Moonrise".into(),
            },
            image_refs: (0..pages)
                .map(|i| format!("img.test/c/{number}/{i}.png"))
                .collect(),
        }
    }

    fn loaded(pages: usize, numbers: &[i64], current: i64) -> LoadedChapter {
        let summaries = numbers
            .iter()
            .map(|&number| ChapterSummary {
                id: 1000 + number,
                number,
                title: format!("Chapter {number}"),
                views: 0,
                comic_info: ComicInfo {
                    id: 12,
                    name: "Moonrise".into(),
                },
            })
            .collect();
        LoadedChapter {
            chapter: chapter(pages, current),
            index: ChapterIndex::new(summaries),
        }
    }

    #[test]
    fn classic_scroll_walks_from_info_block_through_pages() {
        let mut view = ClassicView::new(loaded(2, &[1], 1), Position::Cover);
        assert_eq!(view.scroll, Position::Cover);

        assert!(view.scroll_down());
        assert_eq!(view.scroll, Position::Reading(0));
        assert!(view.scroll_down());
        assert_eq!(view.scroll, Position::Reading(1));
        assert!(!view.scroll_down(), "clamped at the last page");

        assert!(view.scroll_up());
        assert!(view.scroll_up());
        assert_eq!(view.scroll, Position::Cover);
        assert!(!view.scroll_up());
    }

    #[test]
    fn classic_view_resumes_at_a_clamped_position() {
        let view = ClassicView::new(loaded(3, &[1], 1), Position::Reading(99));
        assert_eq!(view.scroll, Position::Reading(2));

        let view = ClassicView::new(loaded(0, &[1], 1), Position::Reading(4));
        assert_eq!(view.scroll, Position::Cover);
    }

    #[test]
    fn phone_view_resumes_mid_chapter() {
        let view = PhoneView::new(loaded(5, &[1], 1), Position::Reading(3));
        assert_eq!(view.nav.position(), Position::Reading(3));

        let view = PhoneView::new(loaded(5, &[1], 1), Position::Cover);
        assert_eq!(view.nav.position(), Position::Cover);
    }

    #[test]
    fn classic_end_scroll_handles_empty_chapters() {
        let mut view = ClassicView::new(loaded(0, &[1], 1), Position::Cover);
        assert!(!view.scroll_to_end());
        assert_eq!(view.scroll, Position::Cover);
    }
}
