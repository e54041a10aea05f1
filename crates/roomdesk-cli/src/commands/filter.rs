//! Offline room filter over a saved page.

use std::path::Path;

use roomdesk_calendar::PageInputs;
use roomdesk_calendar::view::{external_sources_view, room_filter_view};
use roomdesk_core::{
    ExternalSource, ReservationEvent, RoomFilter, filter_events, filter_external_sources,
};

use crate::error::CliResult;

/// Loads a page description, applies `raw` as the room filter and prints
/// the result.
pub fn run(page: &Path, raw: i64, html: bool) -> CliResult<()> {
    let content = std::fs::read_to_string(page)?;
    let inputs = PageInputs::from_json(&content)?;
    let selection = RoomFilter::from_raw(raw);

    let (events, sources) = apply(inputs.clone(), selection);

    if html {
        if let Some(rooms) = inputs.rooms.as_deref() {
            println!("{}", room_filter_view(rooms, selection).render());
        }
        if let Some(sources) = sources.as_deref() {
            println!("{}", external_sources_view(sources).render());
        }
        return Ok(());
    }

    println!("Filter: {}", selection);
    for line in describe(&events) {
        println!("{}", line);
    }
    Ok(())
}

/// Filters the page's events and external sources.
fn apply(
    inputs: PageInputs,
    selection: RoomFilter,
) -> (Vec<ReservationEvent>, Option<Vec<ExternalSource>>) {
    let mut events: Vec<ReservationEvent> = inputs.events.into_iter().map(Into::into).collect();
    filter_events(events.iter_mut(), selection);

    let mut sources = inputs.external_sources;
    if let Some(sources) = sources.as_mut() {
        filter_external_sources(sources.iter_mut(), selection);
    }
    (events, sources)
}

fn describe(events: &[ReservationEvent]) -> Vec<String> {
    events
        .iter()
        .map(|e| {
            format!(
                "{:<7} room {:<4} {}  {}",
                e.visibility.class_name(),
                e.room.0,
                e.span(),
                e.title
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomdesk_core::{RoomId, Visibility};

    const PAGE: &str = r#"{
        "csrf_token": "tok",
        "events": [
            {"pk": 1, "title": "Blue", "room": 3,
             "start": "2024-05-06T09:00:00Z", "end": "2024-05-06T10:00:00Z"},
            {"pk": 2, "title": "Red", "room": 5,
             "start": "2024-05-06T09:00:00Z", "end": "2024-05-06T10:00:00Z"}
        ],
        "external_sources": [{"title": "Blue", "room": 3}, {"title": "Red", "room": 5}]
    }"#;

    #[test]
    fn filter_by_room() {
        let inputs = PageInputs::from_json(PAGE).unwrap();
        let (events, sources) = apply(inputs, RoomFilter::Room(RoomId(3)));

        let tags: Vec<_> = events.iter().map(|e| e.visibility).collect();
        assert_eq!(tags, vec![Visibility::Visible, Visibility::Hidden]);
        let draggable: Vec<_> = sources.unwrap().iter().map(|s| s.draggable).collect();
        assert_eq!(draggable, vec![true, false]);

        let lines = describe(&events);
        assert!(lines[0].starts_with("visible room 3"));
        assert!(lines[1].starts_with("hidden  room 5"));
    }

    #[test]
    fn all_rooms_shows_everything() {
        let inputs = PageInputs::from_json(PAGE).unwrap();
        let (events, _) = apply(inputs, RoomFilter::from_raw(-1));
        assert!(events.iter().all(|e| e.visibility.is_visible()));
    }

    #[test]
    fn run_reads_page_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.json");
        std::fs::write(&path, PAGE).unwrap();
        run(&path, 5, false).unwrap();
        run(&path, 5, true).unwrap();
        assert!(run(&dir.path().join("missing.json"), 5, false).is_err());
    }
}
