//! crates/study_dashboard_core/src/timetable.rs
//!
//! Lays weekly events out on an hourly grid and works out what comes next.
//!
//! An event sits in the cell of its day whose hour equals its start hour, and spans
//! `ceil(duration in hours)` rows (at least one, clipped at the bottom of the grid).
//! Rows under a spanning event are marked covered. When two events want the same cell
//! the earlier start wins and the other is reported as a conflict instead of vanishing.

use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{ClockTime, DayOfWeek, TimetableEvent};

const FIRST_HOUR: u8 = 8;
const LAST_HOUR: u8 = 19;

/// Number of hourly rows an event occupies.
pub fn row_span(event: &TimetableEvent) -> usize {
    let minutes = event
        .end_time
        .minutes_since_midnight()
        .saturating_sub(event.start_time.minutes_since_midnight());
    (minutes.div_ceil(60) as usize).max(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GridCell {
    #[serde(rename_all = "camelCase")]
    Event { event_id: Uuid, span: usize },
    /// Hidden under an event that started in an earlier row.
    #[serde(rename_all = "camelCase")]
    Covered { event_id: Uuid },
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridRow {
    pub slot: ClockTime,
    /// One cell per grid day, in grid order.
    pub cells: Vec<GridCell>,
}

/// An event that could not be drawn because its start cell was already taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridConflict {
    pub event_id: Uuid,
    pub day: DayOfWeek,
    pub slot: ClockTime,
    pub occupied_by: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridLayout {
    pub days: Vec<DayOfWeek>,
    /// Row labels, one per entry in `rows`.
    pub slots: Vec<ClockTime>,
    pub rows: Vec<GridRow>,
    pub conflicts: Vec<GridConflict>,
    /// Events whose day or start hour is not on the grid.
    pub unplaced: Vec<Uuid>,
}

impl GridLayout {
    pub fn cell(&self, day: DayOfWeek, hour: u8) -> Option<&GridCell> {
        let column = self.days.iter().position(|d| *d == day)?;
        let row = self.slots.iter().position(|s| s.hour() == hour)?;
        self.rows.get(row)?.cells.get(column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableGrid {
    days: Vec<DayOfWeek>,
    slots: Vec<ClockTime>,
}

impl Default for TimetableGrid {
    /// Monday to Sunday, 08:00 to 19:00.
    fn default() -> Self {
        Self::hourly(DayOfWeek::ALL.to_vec(), FIRST_HOUR, LAST_HOUR)
    }
}

impl TimetableGrid {
    /// A grid with one row per hour from `first_hour` to `last_hour`, inclusive.
    pub fn hourly(days: Vec<DayOfWeek>, first_hour: u8, last_hour: u8) -> Self {
        let slots = (first_hour..=last_hour.min(23))
            .filter_map(|hour| ClockTime::new(hour, 0).ok())
            .collect();
        Self { days, slots }
    }

    pub fn days(&self) -> &[DayOfWeek] {
        &self.days
    }

    pub fn slots(&self) -> &[ClockTime] {
        &self.slots
    }

    pub fn layout(&self, events: &[TimetableEvent]) -> GridLayout {
        let mut rows: Vec<GridRow> = self
            .slots
            .iter()
            .map(|slot| GridRow {
                slot: *slot,
                cells: vec![GridCell::Empty; self.days.len()],
            })
            .collect();
        let mut conflicts = Vec::new();
        let mut unplaced = Vec::new();

        // Stable sort keeps list order among events with identical start times.
        let mut ordered: Vec<&TimetableEvent> = events.iter().collect();
        ordered.sort_by_key(|e| e.start_time);

        for event in ordered {
            let column = self.days.iter().position(|d| *d == event.day);
            let row = self
                .slots
                .iter()
                .position(|s| s.hour() == event.start_time.hour());
            let (Some(column), Some(row)) = (column, row) else {
                unplaced.push(event.id);
                continue;
            };

            match rows[row].cells[column] {
                GridCell::Event { event_id, .. } | GridCell::Covered { event_id } => {
                    conflicts.push(GridConflict {
                        event_id: event.id,
                        day: event.day,
                        slot: rows[row].slot,
                        occupied_by: event_id,
                    });
                    continue;
                }
                GridCell::Empty => {}
            }

            let span = row_span(event).min(rows.len() - row);
            rows[row].cells[column] = GridCell::Event {
                event_id: event.id,
                span,
            };
            for covered in &mut rows[row + 1..row + span] {
                if covered.cells[column] == GridCell::Empty {
                    covered.cells[column] = GridCell::Covered { event_id: event.id };
                }
            }
        }

        GridLayout {
            days: self.days.clone(),
            slots: self.slots.clone(),
            rows,
            conflicts,
            unplaced,
        }
    }
}

//=========================================================================================
// Upcoming events
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingEvent {
    #[serde(flatten)]
    pub event: TimetableEvent,
    pub starts_at: NaiveDateTime,
}

/// The next `limit` occurrences of the weekly events, soonest first. An event later
/// today counts as today; one whose start has already passed today moves to next week.
pub fn upcoming_events(
    events: &[TimetableEvent],
    now: NaiveDateTime,
    limit: usize,
) -> Vec<UpcomingEvent> {
    let today = now.weekday().num_days_from_monday();
    let mut upcoming: Vec<UpcomingEvent> = events
        .iter()
        .map(|event| {
            let start = NaiveTime::from_hms_opt(
                u32::from(event.start_time.hour()),
                u32::from(event.start_time.minute()),
                0,
            )
            .unwrap_or_default();
            let mut days_ahead = (event.day.weekday().num_days_from_monday() + 7 - today) % 7;
            if days_ahead == 0 && start < now.time() {
                days_ahead = 7;
            }
            let date = now.date() + Duration::days(i64::from(days_ahead));
            UpcomingEvent {
                event: event.clone(),
                starts_at: date.and_time(start),
            }
        })
        .collect();

    upcoming.sort_by_key(|u| u.starts_at);
    upcoming.truncate(limit);
    upcoming
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn event(day: DayOfWeek, start: &str, end: &str) -> TimetableEvent {
        TimetableEvent {
            id: Uuid::new_v4(),
            course_id: Uuid::new_v4(),
            course_name: Some("Net-Centric & Internet Programming".to_string()),
            course_color: Some("bg-primary".to_string()),
            day,
            start_time: start.parse().unwrap(),
            end_time: end.parse().unwrap(),
            description: "Lecture in Tech Hall 101".to_string(),
        }
    }

    #[test]
    fn span_rounds_up_to_whole_hours() {
        assert_eq!(row_span(&event(DayOfWeek::Monday, "09:00", "10:30")), 2);
        assert_eq!(row_span(&event(DayOfWeek::Monday, "09:00", "10:00")), 1);
        assert_eq!(row_span(&event(DayOfWeek::Monday, "09:30", "10:00")), 1);
        assert_eq!(row_span(&event(DayOfWeek::Monday, "13:00", "16:01")), 4);
        assert_eq!(row_span(&event(DayOfWeek::Monday, "10:00", "09:00")), 1);
    }

    #[test]
    fn ninety_minute_event_spans_two_rows_and_covers_the_next() {
        let lecture = event(DayOfWeek::Monday, "09:00", "10:30");
        let layout = TimetableGrid::default().layout(std::slice::from_ref(&lecture));

        assert_eq!(
            layout.cell(DayOfWeek::Monday, 9),
            Some(&GridCell::Event {
                event_id: lecture.id,
                span: 2
            })
        );
        assert_eq!(
            layout.cell(DayOfWeek::Monday, 10),
            Some(&GridCell::Covered {
                event_id: lecture.id
            })
        );
        assert_eq!(layout.cell(DayOfWeek::Monday, 11), Some(&GridCell::Empty));
        assert_eq!(layout.cell(DayOfWeek::Tuesday, 9), Some(&GridCell::Empty));
        assert!(layout.conflicts.is_empty());
    }

    #[test]
    fn default_grid_has_twelve_hourly_rows_for_seven_days() {
        let layout = TimetableGrid::default().layout(&[]);
        assert_eq!(layout.rows.len(), 12);
        assert_eq!(layout.slots.len(), 12);
        assert_eq!(layout.slots[0].to_string(), "08:00");
        assert_eq!(layout.slots[11].to_string(), "19:00");
        assert_eq!(layout.days, DayOfWeek::ALL.to_vec());
        assert!(layout
            .rows
            .iter()
            .zip(&layout.slots)
            .all(|(r, slot)| r.slot == *slot && r.cells.len() == 7));
    }

    #[test]
    fn overlapping_events_are_reported_not_hidden() {
        let long = event(DayOfWeek::Wednesday, "10:00", "12:00");
        let same_start = event(DayOfWeek::Wednesday, "10:15", "11:00");
        let inside = event(DayOfWeek::Wednesday, "11:00", "11:30");
        let layout =
            TimetableGrid::default().layout(&[inside.clone(), same_start.clone(), long.clone()]);

        assert_eq!(
            layout.cell(DayOfWeek::Wednesday, 10),
            Some(&GridCell::Event {
                event_id: long.id,
                span: 2
            })
        );
        let hidden: Vec<Uuid> = layout.conflicts.iter().map(|c| c.event_id).collect();
        assert_eq!(hidden, vec![same_start.id, inside.id]);
        assert!(layout.conflicts.iter().all(|c| c.occupied_by == long.id));
    }

    #[test]
    fn spans_are_clipped_and_off_grid_events_reported() {
        let late = event(DayOfWeek::Friday, "18:00", "21:00");
        let early = event(DayOfWeek::Friday, "07:00", "08:30");
        let layout = TimetableGrid::default().layout(&[late.clone(), early.clone()]);

        assert_eq!(
            layout.cell(DayOfWeek::Friday, 18),
            Some(&GridCell::Event {
                event_id: late.id,
                span: 2
            })
        );
        assert_eq!(layout.unplaced, vec![early.id]);

        let weekdays = TimetableGrid::hourly(DayOfWeek::ALL[..5].to_vec(), 8, 19);
        let sunday = event(DayOfWeek::Sunday, "09:00", "10:00");
        assert_eq!(weekdays.layout(&[sunday.clone()]).unplaced, vec![sunday.id]);
    }

    #[test]
    fn upcoming_events_roll_over_to_next_week() {
        // 2024-01-15 is a Monday.
        let now = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let past_today = event(DayOfWeek::Monday, "09:00", "10:30");
        let later_today = event(DayOfWeek::Monday, "11:00", "12:30");
        let tuesday = event(DayOfWeek::Tuesday, "14:00", "15:30");
        let thursday = event(DayOfWeek::Thursday, "15:00", "16:30");
        let events = vec![past_today.clone(), thursday, tuesday.clone(), later_today.clone()];

        let next = upcoming_events(&events, now, 3);
        let ids: Vec<Uuid> = next.iter().map(|u| u.event.id).collect();
        assert_eq!(ids[0], later_today.id);
        assert_eq!(ids[1], tuesday.id);
        assert_eq!(next.len(), 3);

        let all = upcoming_events(&events, now, 10);
        let rolled = all.iter().find(|u| u.event.id == past_today.id).unwrap();
        assert_eq!(
            rolled.starts_at,
            NaiveDate::from_ymd_opt(2024, 1, 22)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap()
        );
        assert_eq!(all.last().unwrap().event.id, past_today.id);
    }
}
