//! Reader flow tests: drive the app with simulated input over an offline
//! fixture chapter and check the position model end to end.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyModifiers, MouseEventKind};
use ratatui::Terminal;
use ratatui::backend::TestBackend;

use komikrat::api::{
    ChapterDetail, ChapterLoader, ChapterSummary, ComicClient, ComicInfo, LoadedChapter,
};
use komikrat::app::{App, Screen, run_app};
use komikrat::event_source::SimulatedEventSource;
use komikrat::navigation::Position;
use komikrat::preload::{DecodeFault, ImageFetcher, PreloadService};
use komikrat::sequencer::{ChapterIndex, Route};
use komikrat::settings::ReadingMode;

/// Everything fails fast; these tests only exercise the position model.
struct OfflineFetcher;

impl ImageFetcher for OfflineFetcher {
    fn fetch(&self, _url: &str) -> Result<Vec<u8>, DecodeFault> {
        Err(DecodeFault::generic("offline"))
    }
}

fn offline_app(mode: ReadingMode) -> App {
    // Port 9 (discard) is reliably refused; the loader only matters for the
    // transport-failure test.
    let client = Arc::new(ComicClient::new("http://127.0.0.1:9"));
    App::with_services(
        ChapterLoader::new(client),
        PreloadService::with_config(Arc::new(OfflineFetcher), 1, 16),
        Route::chapter_entry(12, 345, mode),
        None,
    )
}

/// Chapter 2 of a comic numbered [1, 2, 4]: has a previous chapter, but no
/// chapter 3, so no next.
fn sample_loaded(pages: usize) -> LoadedChapter {
    let comic = ComicInfo {
        id: 12,
        name: "Moonrise".into(),
    };
    let summaries = [1i64, 2, 4]
        .iter()
        .map(|&number| ChapterSummary {
            id: 1000 + number,
            number,
            title: format!("Chapter {number}"),
            views: 0,
            comic_info: comic.clone(),
        })
        .collect();

    LoadedChapter {
        chapter: ChapterDetail {
            id: 345,
            number: 2,
            title: "The Long Night".into(),
            views: 7,
            comic_info: comic,
            image_refs: (0..pages).map(|i| format!("img.test/c/2/{i}.png")).collect(),
        },
        index: ChapterIndex::new(summaries),
    }
}

fn run_events(app: &mut App, events: Vec<crossterm::event::Event>) {
    let mut terminal = Terminal::new(TestBackend::new(90, 30)).unwrap();
    let mut source = SimulatedEventSource::new(events);
    run_app(&mut terminal, app, &mut source).unwrap();
}

fn key(code: KeyCode) -> crossterm::event::Event {
    SimulatedEventSource::key_event(code, KeyModifiers::empty())
}

#[test]
fn start_reading_then_clamp_at_the_last_page() {
    let mut app = offline_app(ReadingMode::Phone);
    app.open_loaded_chapter(sample_loaded(3));

    run_events(
        &mut app,
        vec![
            key(KeyCode::Enter),
            key(KeyCode::Right),
            key(KeyCode::Right),
            key(KeyCode::Right),
            SimulatedEventSource::char_key('q'),
        ],
    );

    match app.screen() {
        Screen::Phone(view) => assert_eq!(view.nav.position(), Position::Reading(2)),
        _ => panic!("expected the phone view"),
    }
}

#[test]
fn wheel_and_click_channels_both_obey_the_transition_table() {
    let mut app = offline_app(ReadingMode::Phone);
    app.open_loaded_chapter(sample_loaded(3));

    // Enter -> 0, wheel-down x2 -> 2, wheel-up -> 1, left-third click -> 2,
    // right-third click -> 1, middle click toggles the header only.
    run_events(
        &mut app,
        vec![
            key(KeyCode::Enter),
            SimulatedEventSource::wheel(MouseEventKind::ScrollDown, 45, 10),
            SimulatedEventSource::wheel(MouseEventKind::ScrollDown, 45, 10),
            SimulatedEventSource::wheel(MouseEventKind::ScrollUp, 45, 10),
            SimulatedEventSource::left_click(5, 10),
            SimulatedEventSource::left_click(85, 10),
            SimulatedEventSource::left_click(45, 10),
            SimulatedEventSource::char_key('q'),
        ],
    );

    match app.screen() {
        Screen::Phone(view) => {
            assert_eq!(view.nav.position(), Position::Reading(1));
            assert!(view.nav.header_visible());
        }
        _ => panic!("expected the phone view"),
    }
}

#[test]
fn home_end_and_back_to_cover() {
    let mut app = offline_app(ReadingMode::Phone);
    app.open_loaded_chapter(sample_loaded(5));

    run_events(
        &mut app,
        vec![
            key(KeyCode::Enter),
            key(KeyCode::End),
            key(KeyCode::Home),
            key(KeyCode::End),
            key(KeyCode::Esc),
            SimulatedEventSource::char_key('q'),
        ],
    );

    match app.screen() {
        Screen::Phone(view) => assert_eq!(view.nav.position(), Position::Cover),
        _ => panic!("expected the phone view"),
    }
}

#[test]
fn missing_neighbor_disables_the_jump() {
    let mut app = offline_app(ReadingMode::Phone);
    app.open_loaded_chapter(sample_loaded(3));

    // No chapter is numbered 3, so 'n' must not navigate anywhere.
    run_events(
        &mut app,
        vec![
            SimulatedEventSource::char_key('n'),
            SimulatedEventSource::char_key('q'),
        ],
    );

    assert_eq!(app.route().chapter_id, 345);
    assert!(matches!(app.screen(), Screen::Phone(_)));
}

#[test]
fn existing_neighbor_starts_a_full_navigation() {
    let mut app = offline_app(ReadingMode::Phone);
    app.open_loaded_chapter(sample_loaded(3));

    run_events(
        &mut app,
        vec![
            SimulatedEventSource::char_key('p'),
            SimulatedEventSource::char_key('q'),
        ],
    );

    // Chapter 1 has id 1001; the fetch itself fails offline, but the
    // navigation happened and reset the position to the cover.
    assert_eq!(app.route().chapter_id, 1001);
    assert_eq!(app.route().position, Position::Cover);
    assert!(matches!(app.screen(), Screen::Loading | Screen::Failed(_)));
}

#[test]
fn classic_strip_scrolls_by_page() {
    let mut app = offline_app(ReadingMode::Classic);
    app.open_loaded_chapter(sample_loaded(3));

    run_events(
        &mut app,
        vec![
            SimulatedEventSource::wheel(MouseEventKind::ScrollDown, 45, 10),
            SimulatedEventSource::wheel(MouseEventKind::ScrollDown, 45, 10),
            SimulatedEventSource::wheel(MouseEventKind::ScrollUp, 45, 10),
            SimulatedEventSource::char_key('q'),
        ],
    );

    match app.screen() {
        Screen::Classic(view) => assert_eq!(view.scroll, Position::Reading(0)),
        _ => panic!("expected the classic view"),
    }
}

#[test]
fn transport_failure_surfaces_with_a_retry() {
    let mut app = offline_app(ReadingMode::Phone);
    app.reload();

    let deadline = Instant::now() + Duration::from_secs(30);
    while !matches!(app.screen(), Screen::Failed(_)) {
        app.tick();
        assert!(Instant::now() < deadline, "load never failed");
        thread::sleep(Duration::from_millis(10));
    }

    // Retry re-runs the whole fetch sequence.
    app.handle_event(SimulatedEventSource::char_key('r'));
    assert!(matches!(app.screen(), Screen::Loading));
}
