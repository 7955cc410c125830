//! Per-channel dashboard state.
//!
//! Each channel holds one `DashboardState`: the researcher's selection plus
//! the display state derived from the last committed responses. Selection
//! changes go through `DashboardEvent`s. Every fetch takes a `RequestTicket`
//! first, and only the most recently issued ticket of a kind may commit, so
//! a slow response to an older request can never overwrite a newer one.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::models::{AdherenceReport, DisplayPoint, Metric};

/// What the researcher is looking at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub user_id: i64,
    pub metric: Metric,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Default for Selection {
    fn default() -> Self {
        Selection {
            user_id: 1,
            metric: Metric::HeartRate,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 7).unwrap_or_default(),
        }
    }
}

/// Input changes accepted by a dashboard
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    SelectUser(i64),
    SelectMetric(Metric),
    SetStart(NaiveDate),
    SetEnd(NaiveDate),
    SetRange(NaiveDate, NaiveDate),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Series,
    Adherence,
}

/// Proof that a request was issued; carries the selection it was issued for
#[derive(Debug, Clone, PartialEq)]
pub struct RequestTicket {
    pub channel_id: u64,
    pub kind: RequestKind,
    pub seq: u64,
    pub selection: Selection,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub selection: Selection,
    pub points: Option<Vec<DisplayPoint>>,
    pub adherence: Option<AdherenceReport>,
    series_seq: u64,
    adherence_seq: u64,
}

impl DashboardState {
    /// Apply an event. Invalid events leave the state untouched.
    pub fn apply(&mut self, event: DashboardEvent) -> Result<(), String> {
        let mut next = self.selection.clone();
        match event {
            DashboardEvent::SelectUser(user_id) => {
                if user_id < 0 {
                    return Err(format!("❌ Invalid participant id: {}", user_id));
                }
                next.user_id = user_id;
            }
            DashboardEvent::SelectMetric(metric) => next.metric = metric,
            DashboardEvent::SetStart(date) => next.start_date = date,
            DashboardEvent::SetEnd(date) => next.end_date = date,
            DashboardEvent::SetRange(start, end) => {
                next.start_date = start;
                next.end_date = end;
            }
        }

        if next.end_date < next.start_date {
            return Err(format!(
                "❌ End date {} is earlier than start date {}",
                next.end_date, next.start_date
            ));
        }

        if next != self.selection {
            let adherence_changed = next.user_id != self.selection.user_id
                || next.start_date != self.selection.start_date
                || next.end_date != self.selection.end_date;

            self.points = None;
            if adherence_changed {
                self.adherence = None;
            }
            self.selection = next;
        }
        Ok(())
    }

    fn seq_mut(&mut self, kind: RequestKind) -> &mut u64 {
        match kind {
            RequestKind::Series => &mut self.series_seq,
            RequestKind::Adherence => &mut self.adherence_seq,
        }
    }

    fn latest(&self, kind: RequestKind) -> u64 {
        match kind {
            RequestKind::Series => self.series_seq,
            RequestKind::Adherence => self.adherence_seq,
        }
    }
}

/// All dashboards, keyed by channel id
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<u64, DashboardState>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a channel's dashboard (a fresh default one if unseen)
    pub fn state(&self, channel_id: u64) -> DashboardState {
        self.sessions.get(&channel_id).cloned().unwrap_or_default()
    }

    pub fn apply(&mut self, channel_id: u64, event: DashboardEvent) -> Result<Selection, String> {
        let state = self.sessions.entry(channel_id).or_default();
        state.apply(event)?;
        Ok(state.selection.clone())
    }

    /// Apply several events as one change: either all of them take effect
    /// or none do
    pub fn apply_all(&mut self, channel_id: u64, events: Vec<DashboardEvent>) -> Result<Selection, String> {
        let mut next = self.state(channel_id);
        for event in events {
            next.apply(event)?;
        }
        let selection = next.selection.clone();
        self.sessions.insert(channel_id, next);
        Ok(selection)
    }

    /// Issue a ticket for a new request of `kind`, superseding older ones
    pub fn begin(&mut self, channel_id: u64, kind: RequestKind) -> RequestTicket {
        let state = self.sessions.entry(channel_id).or_default();
        let seq = state.seq_mut(kind);
        *seq += 1;
        RequestTicket {
            channel_id,
            kind,
            seq: *seq,
            selection: state.selection.clone(),
        }
    }

    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.sessions
            .get(&ticket.channel_id)
            .is_some_and(|state| state.latest(ticket.kind) == ticket.seq)
    }

    /// Store a series response. Returns false (and stores nothing) when the
    /// ticket has been superseded.
    pub fn commit_series(&mut self, ticket: &RequestTicket, points: Vec<DisplayPoint>) -> bool {
        if ticket.kind != RequestKind::Series || !self.is_current(ticket) {
            return false;
        }
        match self.sessions.get_mut(&ticket.channel_id) {
            Some(state) if state.selection == ticket.selection => {
                state.points = Some(points);
                true
            }
            _ => false,
        }
    }

    pub fn commit_adherence(&mut self, ticket: &RequestTicket, report: AdherenceReport) -> bool {
        if ticket.kind != RequestKind::Adherence || !self.is_current(ticket) {
            return false;
        }
        match self.sessions.get_mut(&ticket.channel_id) {
            Some(state)
                if state.selection.user_id == ticket.selection.user_id
                    && state.selection.start_date == ticket.selection.start_date
                    && state.selection.end_date == ticket.selection.end_date =>
            {
                state.adherence = Some(report);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn point(label: &str) -> DisplayPoint {
        DisplayPoint {
            timestamp_iso: label.to_string(),
            label: label.to_string(),
            value: Some(1.0),
            is_imputed: false,
            show_imputed_marker: false,
        }
    }

    fn report(wear: f64) -> AdherenceReport {
        AdherenceReport {
            no_token: false,
            last_upload: None,
            sleep_upload_pct: 90.0,
            wear_time_pct: wear,
        }
    }

    #[test]
    fn test_default_selection() {
        let store = SessionStore::new();
        let state = store.state(42);
        assert_eq!(state.selection.user_id, 1);
        assert_eq!(state.selection.metric, Metric::HeartRate);
        assert_eq!(state.selection.start_date, date(2024, 1, 1));
        assert_eq!(state.selection.end_date, date(2024, 1, 7));
        assert!(state.points.is_none());
    }

    #[test]
    fn test_inverted_range_rejected_without_change() {
        let mut store = SessionStore::new();
        let err = store
            .apply(1, DashboardEvent::SetRange(date(2024, 2, 1), date(2024, 1, 1)))
            .unwrap_err();
        assert!(err.contains("earlier"));
        assert_eq!(store.state(1).selection, Selection::default());

        assert!(store.apply(1, DashboardEvent::SetStart(date(2024, 1, 8))).is_err());
        assert!(store.apply(1, DashboardEvent::SetEnd(date(2023, 12, 31))).is_err());
        assert_eq!(store.state(1).selection, Selection::default());
    }

    #[test]
    fn test_single_day_range_allowed() {
        let mut store = SessionStore::new();
        let selection = store
            .apply(1, DashboardEvent::SetRange(date(2024, 3, 5), date(2024, 3, 5)))
            .unwrap();
        assert_eq!(selection.start_date, selection.end_date);
    }

    #[test]
    fn test_later_ticket_wins() {
        let mut store = SessionStore::new();
        let first = store.begin(7, RequestKind::Series);
        let second = store.begin(7, RequestKind::Series);
        assert!(second.seq > first.seq);

        // The later request finishes first
        assert!(store.commit_series(&second, vec![point("new")]));
        // The slow, older response arrives afterwards and is discarded
        assert!(!store.commit_series(&first, vec![point("old")]));

        let points = store.state(7).points.unwrap();
        assert_eq!(points[0].label, "new");
    }

    #[test]
    fn test_kinds_sequence_independently() {
        let mut store = SessionStore::new();
        let series = store.begin(7, RequestKind::Series);
        let adherence = store.begin(7, RequestKind::Adherence);
        assert!(store.is_current(&series));
        assert!(store.is_current(&adherence));
        assert!(store.commit_adherence(&adherence, report(50.0)));
        assert!(store.commit_series(&series, vec![]));
    }

    #[test]
    fn test_ticket_kind_must_match() {
        let mut store = SessionStore::new();
        let adherence = store.begin(7, RequestKind::Adherence);
        assert!(!store.commit_series(&adherence, vec![point("x")]));
        assert!(store.state(7).points.is_none());
    }

    #[test]
    fn test_channels_are_isolated() {
        let mut store = SessionStore::new();
        let a = store.begin(1, RequestKind::Series);
        let _b = store.begin(2, RequestKind::Series);
        assert!(store.commit_series(&a, vec![point("a")]));
        assert!(store.state(2).points.is_none());
    }

    #[test]
    fn test_unknown_ticket_not_current() {
        let store = SessionStore::new();
        let ticket = RequestTicket {
            channel_id: 99,
            kind: RequestKind::Series,
            seq: 1,
            selection: Selection::default(),
        };
        assert!(!store.is_current(&ticket));
    }

    #[test]
    fn test_selection_change_clears_derived_state() {
        let mut store = SessionStore::new();
        let series = store.begin(3, RequestKind::Series);
        let adherence = store.begin(3, RequestKind::Adherence);
        store.commit_series(&series, vec![point("hr")]);
        store.commit_adherence(&adherence, report(80.0));

        // Metric change invalidates the series but not adherence
        store.apply(3, DashboardEvent::SelectMetric(Metric::Spo2)).unwrap();
        let state = store.state(3);
        assert!(state.points.is_none());
        assert!(state.adherence.is_some());

        // Participant change invalidates both
        store.apply(3, DashboardEvent::SelectUser(2)).unwrap();
        assert!(store.state(3).adherence.is_none());
    }

    #[test]
    fn test_commit_for_stale_selection_discarded() {
        let mut store = SessionStore::new();
        let ticket = store.begin(5, RequestKind::Series);
        store.apply(5, DashboardEvent::SelectUser(9)).unwrap();
        assert!(!store.commit_series(&ticket, vec![point("user 1")]));
    }

    #[test]
    fn test_reapplying_same_value_keeps_state() {
        let mut store = SessionStore::new();
        let ticket = store.begin(5, RequestKind::Series);
        store.commit_series(&ticket, vec![point("kept")]);
        store.apply(5, DashboardEvent::SelectUser(1)).unwrap();
        assert!(store.state(5).points.is_some());
    }

    #[test]
    fn test_apply_all_is_atomic() {
        let mut store = SessionStore::new();
        let err = store.apply_all(
            4,
            vec![
                DashboardEvent::SelectUser(8),
                DashboardEvent::SetEnd(date(2023, 1, 1)),
            ],
        );
        assert!(err.is_err());
        assert_eq!(store.state(4).selection.user_id, 1);

        let selection = store
            .apply_all(
                4,
                vec![
                    DashboardEvent::SelectUser(8),
                    DashboardEvent::SelectMetric(Metric::BreathingRate),
                ],
            )
            .unwrap();
        assert_eq!(selection.user_id, 8);
        assert_eq!(selection.metric, Metric::BreathingRate);
    }

    #[test]
    fn test_apply_all_keeps_sequence_numbers() {
        let mut store = SessionStore::new();
        let old = store.begin(4, RequestKind::Series);
        store.apply_all(4, vec![DashboardEvent::SelectUser(2)]).unwrap();
        let new = store.begin(4, RequestKind::Series);
        assert!(new.seq > old.seq);
        assert!(!store.is_current(&old));
    }

    #[test]
    fn test_negative_user_rejected() {
        let mut store = SessionStore::new();
        assert!(store.apply(1, DashboardEvent::SelectUser(-3)).is_err());
    }
}
