//! Page-position state machine for the phone reading view
//!
//! One chapter, one navigator. The position is either the cover (chapter
//! info, not yet reading) or a page index; indices clamp at the ends, they
//! never wrap. Keyboard, wheel and click-zone input all funnel into the same
//! command set. The click-zone mapping intentionally disagrees with the
//! wheel mapping (left-third click advances, wheel-down advances too); both
//! channels are kept exactly as shipped.

use crossterm::event::{KeyCode, MouseEventKind};

/// Current position inside a chapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    /// Chapter cover/info screen, not yet reading.
    Cover,
    /// Reading page `i`, `0 <= i < page_count`.
    Reading(usize),
}

impl Position {
    /// Page index, if reading.
    #[must_use]
    pub fn page(self) -> Option<usize> {
        match self {
            Self::Cover => None,
            Self::Reading(i) => Some(i),
        }
    }
}

/// Commands that modify navigation state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavCommand {
    /// Leave the cover and open the first page.
    StartReading,
    /// Advance one page; from the cover this opens the first page.
    NextPage,
    /// Go back one page; no-op on the first page and on the cover.
    PrevPage,
    /// Jump to the first page.
    FirstPage,
    /// Jump to the last page.
    LastPage,
    /// Return to the cover.
    BackToCover,
    /// Toggle the overlay header; never touches the page index.
    ToggleHeader,
}

/// Effects produced by applying a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavEffect {
    PositionChanged,
    HeaderToggled,
}

/// Navigation state for one chapter of `page_count` pages.
#[derive(Clone, Debug)]
pub struct PageNavigator {
    position: Position,
    page_count: usize,
    header_visible: bool,
}

impl PageNavigator {
    /// Start at the cover with the overlay header hidden.
    #[must_use]
    pub fn new(page_count: usize) -> Self {
        Self {
            position: Position::Cover,
            page_count,
            header_visible: false,
        }
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    #[must_use]
    pub fn header_visible(&self) -> bool {
        self.header_visible
    }

    /// Jump straight to a page, clamped. Used when re-entering a chapter at
    /// a known position (reading-mode switch); normal paging goes through
    /// [`apply`](Self::apply).
    pub fn resume_at(&mut self, page: usize) -> Vec<NavEffect> {
        self.go_to(page)
    }

    /// Apply a command and return resulting effects.
    pub fn apply(&mut self, cmd: NavCommand) -> Vec<NavEffect> {
        match cmd {
            NavCommand::StartReading | NavCommand::FirstPage => self.go_to(0),

            NavCommand::NextPage => match self.position {
                Position::Cover => self.go_to(0),
                Position::Reading(i) => self.go_to(i.saturating_add(1)),
            },

            NavCommand::PrevPage => match self.position {
                Position::Cover | Position::Reading(0) => vec![],
                Position::Reading(i) => self.go_to(i - 1),
            },

            NavCommand::LastPage => self.go_to(self.page_count.saturating_sub(1)),

            NavCommand::BackToCover => {
                if self.position == Position::Cover {
                    vec![]
                } else {
                    self.position = Position::Cover;
                    vec![NavEffect::PositionChanged]
                }
            }

            NavCommand::ToggleHeader => {
                self.header_visible = !self.header_visible;
                vec![NavEffect::HeaderToggled]
            }
        }
    }

    /// Move to a page, clamped to the valid range. A chapter without pages
    /// has no `Reading` states at all, so the position stays on the cover.
    fn go_to(&mut self, page: usize) -> Vec<NavEffect> {
        if self.page_count == 0 {
            return vec![];
        }
        let clamped = page.min(self.page_count - 1);
        if self.position == Position::Reading(clamped) {
            vec![]
        } else {
            self.position = Position::Reading(clamped);
            vec![NavEffect::PositionChanged]
        }
    }
}

/// Keyboard channel: arrow keys page, Home/End jump.
#[must_use]
pub fn command_for_key(code: KeyCode) -> Option<NavCommand> {
    match code {
        KeyCode::Right => Some(NavCommand::NextPage),
        KeyCode::Left => Some(NavCommand::PrevPage),
        KeyCode::Home => Some(NavCommand::FirstPage),
        KeyCode::End => Some(NavCommand::LastPage),
        _ => None,
    }
}

/// Wheel channel: scrolling down advances, scrolling up goes back.
#[must_use]
pub fn command_for_wheel(kind: MouseEventKind) -> Option<NavCommand> {
    match kind {
        MouseEventKind::ScrollDown => Some(NavCommand::NextPage),
        MouseEventKind::ScrollUp => Some(NavCommand::PrevPage),
        _ => None,
    }
}

/// Click channel, by horizontal thirds of the view: the left third advances
/// (reading-order convention), the right third goes back, the middle toggles
/// the overlay header.
#[must_use]
pub fn command_for_click(column: u16, view_width: u16) -> NavCommand {
    let third = view_width / 3;
    if column < third {
        NavCommand::NextPage
    } else if column >= view_width.saturating_sub(third) {
        NavCommand::PrevPage
    } else {
        NavCommand::ToggleHeader
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(nav: &PageNavigator) -> Option<usize> {
        nav.position().page()
    }

    #[test]
    fn starts_on_cover_with_header_hidden() {
        let nav = PageNavigator::new(5);
        assert_eq!(nav.position(), Position::Cover);
        assert!(!nav.header_visible());
    }

    #[test]
    fn start_reading_opens_first_page() {
        let mut nav = PageNavigator::new(3);
        let effects = nav.apply(NavCommand::StartReading);
        assert_eq!(nav.position(), Position::Reading(0));
        assert_eq!(effects, vec![NavEffect::PositionChanged]);
    }

    #[test]
    fn next_from_cover_opens_first_page() {
        let mut nav = PageNavigator::new(3);
        nav.apply(NavCommand::NextPage);
        assert_eq!(reading(&nav), Some(0));
    }

    #[test]
    fn next_clamps_at_last_page() {
        // Three pages, start reading, then three nexts: ends clamped on the
        // last page, never past it.
        let mut nav = PageNavigator::new(3);
        nav.apply(NavCommand::StartReading);
        for _ in 0..3 {
            nav.apply(NavCommand::NextPage);
        }
        assert_eq!(reading(&nav), Some(2));

        let effects = nav.apply(NavCommand::NextPage);
        assert_eq!(reading(&nav), Some(2));
        assert!(effects.is_empty());
    }

    #[test]
    fn prev_is_a_no_op_on_first_page_and_cover() {
        let mut nav = PageNavigator::new(3);
        assert!(nav.apply(NavCommand::PrevPage).is_empty());
        assert_eq!(nav.position(), Position::Cover);

        nav.apply(NavCommand::StartReading);
        assert!(nav.apply(NavCommand::PrevPage).is_empty());
        assert_eq!(reading(&nav), Some(0));
    }

    #[test]
    fn prev_steps_back_one_page() {
        let mut nav = PageNavigator::new(5);
        nav.apply(NavCommand::LastPage);
        nav.apply(NavCommand::PrevPage);
        assert_eq!(reading(&nav), Some(3));
    }

    #[test]
    fn home_and_end_are_idempotent() {
        let mut nav = PageNavigator::new(7);
        nav.apply(NavCommand::FirstPage);
        assert_eq!(reading(&nav), Some(0));
        assert!(nav.apply(NavCommand::FirstPage).is_empty());

        nav.apply(NavCommand::LastPage);
        assert_eq!(reading(&nav), Some(6));
        assert!(nav.apply(NavCommand::LastPage).is_empty());
    }

    #[test]
    fn home_and_end_work_from_cover() {
        let mut nav = PageNavigator::new(4);
        nav.apply(NavCommand::LastPage);
        assert_eq!(reading(&nav), Some(3));

        let mut nav = PageNavigator::new(4);
        nav.apply(NavCommand::FirstPage);
        assert_eq!(reading(&nav), Some(0));
    }

    #[test]
    fn header_toggle_never_moves_the_page() {
        let mut nav = PageNavigator::new(3);
        nav.apply(NavCommand::StartReading);
        nav.apply(NavCommand::NextPage);

        let effects = nav.apply(NavCommand::ToggleHeader);
        assert_eq!(effects, vec![NavEffect::HeaderToggled]);
        assert!(nav.header_visible());
        assert_eq!(reading(&nav), Some(1));

        // Navigation never implicitly resets header visibility.
        nav.apply(NavCommand::NextPage);
        nav.apply(NavCommand::BackToCover);
        assert!(nav.header_visible());
    }

    #[test]
    fn back_to_cover_from_any_page() {
        let mut nav = PageNavigator::new(3);
        nav.apply(NavCommand::LastPage);
        let effects = nav.apply(NavCommand::BackToCover);
        assert_eq!(nav.position(), Position::Cover);
        assert_eq!(effects, vec![NavEffect::PositionChanged]);
    }

    #[test]
    fn empty_chapter_stays_on_cover() {
        let mut nav = PageNavigator::new(0);
        assert!(nav.apply(NavCommand::StartReading).is_empty());
        assert!(nav.apply(NavCommand::NextPage).is_empty());
        assert!(nav.apply(NavCommand::LastPage).is_empty());
        assert_eq!(nav.position(), Position::Cover);
    }

    #[test]
    fn key_channel_mapping() {
        assert_eq!(command_for_key(KeyCode::Right), Some(NavCommand::NextPage));
        assert_eq!(command_for_key(KeyCode::Left), Some(NavCommand::PrevPage));
        assert_eq!(command_for_key(KeyCode::Home), Some(NavCommand::FirstPage));
        assert_eq!(command_for_key(KeyCode::End), Some(NavCommand::LastPage));
        assert_eq!(command_for_key(KeyCode::Char('x')), None);
    }

    #[test]
    fn wheel_channel_mapping() {
        assert_eq!(
            command_for_wheel(MouseEventKind::ScrollDown),
            Some(NavCommand::NextPage)
        );
        assert_eq!(
            command_for_wheel(MouseEventKind::ScrollUp),
            Some(NavCommand::PrevPage)
        );
    }

    #[test]
    fn click_zones_by_thirds() {
        // 90 columns: [0,30) next, [30,60) header, [60,90) prev.
        assert_eq!(command_for_click(0, 90), NavCommand::NextPage);
        assert_eq!(command_for_click(29, 90), NavCommand::NextPage);
        assert_eq!(command_for_click(30, 90), NavCommand::ToggleHeader);
        assert_eq!(command_for_click(59, 90), NavCommand::ToggleHeader);
        assert_eq!(command_for_click(60, 90), NavCommand::PrevPage);
        assert_eq!(command_for_click(89, 90), NavCommand::PrevPage);
    }
}
