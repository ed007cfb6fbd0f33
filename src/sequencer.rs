//! Chapter sequencing within one comic
//!
//! Neighbor lookup is by exact chapter number: chapter `n` has a previous
//! chapter only if some chapter is numbered exactly `n - 1`, and a next one
//! only for `n + 1`. Gaps in the numbering silently disable the
//! corresponding jump; no gap-bridging is attempted.

use crate::api::types::ChapterSummary;
use crate::navigation::Position;
use crate::settings::ReadingMode;

/// The comic's full chapter index, ordered by chapter number. Used for the
/// cover listing and for neighbor lookup; refetched per comic.
#[derive(Debug, Clone)]
pub struct ChapterIndex {
    chapters: Vec<ChapterSummary>,
}

impl ChapterIndex {
    /// Build an index from the service's summary list.
    #[must_use]
    pub fn new(mut chapters: Vec<ChapterSummary>) -> Self {
        chapters.sort_by_key(|ch| ch.number);
        Self { chapters }
    }

    /// Chapter with exactly this number, if present.
    #[must_use]
    pub fn by_number(&self, number: i64) -> Option<&ChapterSummary> {
        self.chapters.iter().find(|ch| ch.number == number)
    }

    /// The chapter numbered exactly one below.
    #[must_use]
    pub fn prev_of(&self, number: i64) -> Option<&ChapterSummary> {
        self.by_number(number - 1)
    }

    /// The chapter numbered exactly one above.
    #[must_use]
    pub fn next_of(&self, number: i64) -> Option<&ChapterSummary> {
        self.by_number(number + 1)
    }

    #[must_use]
    pub fn has_prev(&self, number: i64) -> bool {
        self.prev_of(number).is_some()
    }

    #[must_use]
    pub fn has_next(&self, number: i64) -> bool {
        self.next_of(number).is_some()
    }

    /// All chapters, ordered by number.
    #[must_use]
    pub fn chapters(&self) -> &[ChapterSummary] {
        &self.chapters
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }
}

/// A fully resolved view target: which chapter of which comic, in which
/// reading mode, at which position. Chapter jumps and mode switches are
/// full navigations to a new route, never in-place state surgery - the two
/// reading modes have structurally incompatible view state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Route {
    pub comic_id: i64,
    pub chapter_id: i64,
    pub mode: ReadingMode,
    pub position: Position,
}

impl Route {
    /// Entry route for a chapter: cover position, caller's mode.
    #[must_use]
    pub fn chapter_entry(comic_id: i64, chapter_id: i64, mode: ReadingMode) -> Self {
        Self {
            comic_id,
            chapter_id,
            mode,
            position: Position::Cover,
        }
    }
}

/// Mode switch as a pure function: same chapter, same logical position,
/// the other mode. Applying it twice returns the original route.
#[must_use]
pub fn mode_switch_route(route: Route) -> Route {
    Route {
        mode: route.mode.toggled(),
        ..route
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::ComicInfo;

    fn summary(number: i64) -> ChapterSummary {
        ChapterSummary {
            id: 1000 + number,
            number,
            title: format!("Chapter {number}"),
            views: 0,
            comic_info: ComicInfo {
                id: 12,
                name: "Moonrise".into(),
            },
        }
    }

    fn index(numbers: &[i64]) -> ChapterIndex {
        ChapterIndex::new(numbers.iter().copied().map(summary).collect())
    }

    #[test]
    fn orders_chapters_by_number() {
        let index = index(&[4, 1, 2]);
        let numbers: Vec<i64> = index.chapters().iter().map(|ch| ch.number).collect();
        assert_eq!(numbers, vec![1, 2, 4]);
    }

    #[test]
    fn neighbor_lookup_is_exact_match() {
        // Numbers [1, 2, 4]: from chapter 2 there is a previous chapter but
        // no next one - nothing is numbered 3 and the gap is not bridged.
        let index = index(&[1, 2, 4]);
        assert!(index.has_prev(2));
        assert!(!index.has_next(2));
        assert!(!index.has_prev(4));
        assert!(index.has_next(1));
    }

    #[test]
    fn edges_have_no_neighbors() {
        let index = index(&[1, 2, 3]);
        assert!(!index.has_prev(1));
        assert!(!index.has_next(3));
    }

    #[test]
    fn neighbor_resolves_to_the_chapter_record() {
        let index = index(&[1, 2]);
        assert_eq!(index.next_of(1).map(|ch| ch.id), Some(1002));
        assert_eq!(index.prev_of(2).map(|ch| ch.id), Some(1001));
    }

    #[test]
    fn mode_switch_round_trips_position() {
        let route = Route {
            comic_id: 12,
            chapter_id: 345,
            mode: ReadingMode::Phone,
            position: Position::Reading(5),
        };

        let classic = mode_switch_route(route);
        assert_eq!(classic.mode, ReadingMode::Classic);
        assert_eq!(classic.position, Position::Reading(5));
        assert_eq!(classic.chapter_id, 345);

        assert_eq!(mode_switch_route(classic), route);
    }

    #[test]
    fn mode_switch_preserves_the_cover_position() {
        let route = Route::chapter_entry(12, 345, ReadingMode::Classic);
        let phone = mode_switch_route(route);
        assert_eq!(phone.position, Position::Cover);
        assert_eq!(mode_switch_route(phone), route);
    }
}
