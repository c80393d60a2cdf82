use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;

use ttdb_core::{Database, Record, RecordId};

use crate::config::EngineConfig;
use crate::discovery::DiscoveryTracker;
use crate::globe::{DragOutcome, GlobeView};
use crate::layout::{ForceLayout, LayoutParams};
use crate::links::{self, LinkTarget};
use crate::parse::parse_database;
use crate::search::SearchIndex;
use crate::store::{DiscoveryStore, Preferences, PreferencesStore, StorePaths};
use crate::tour::{TourAudio, TourScheduler, TourState, AUDIO_PATH_KEY, AUDIO_SPECIAL_KIND};
use crate::transition::{self, TransitionAnimation};
use crate::watch::{SourceEvent, SourceWatcher};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Reloaded,
    SelectionChanged {
        from: Option<RecordId>,
        to: Option<RecordId>,
        from_tour: bool,
    },
}

#[derive(Debug)]
struct PendingSearch {
    term: String,
    deadline: Instant,
}

// Owns the whole pipeline: parse -> discover -> filter -> position. All
// state mutation happens through method calls on one logical event loop;
// `tick` runs whatever timers are due, in order, to completion.
pub struct Session {
    cfg: EngineConfig,
    watcher: SourceWatcher,
    db: Database,
    discovery: DiscoveryTracker,
    index: SearchIndex,
    prefs_store: PreferencesStore,
    pub globe: GlobeView,
    tour: TourScheduler,
    layout: ForceLayout,
    selected: Option<RecordId>,
    transition: Option<TransitionAnimation>,
    filtered: Vec<RecordId>,
    search_term: String,
    pending_search: Option<PendingSearch>,
    status: String,
    search_meta: String,
    tour_note: &'static str,
    tour_audio: TourAudio,
    next_poll: Instant,
    next_animation: Instant,
    events: Vec<SessionEvent>,
}

impl Session {
    pub fn open(db_path: impl Into<PathBuf>, cfg: EngineConfig) -> Self {
        let path = db_path.into();
        let stores = StorePaths::beside_database(&path);
        Self::with_stores(path, cfg, stores)
    }

    pub fn with_stores(db_path: PathBuf, cfg: EngineConfig, stores: StorePaths) -> Self {
        let prefs_store = PreferencesStore::new(stores.preferences);
        let prefs = prefs_store.load_or_default();
        let mut globe = GlobeView::new();
        globe.invert_drag_y = prefs.invert_drag_y;

        let now = Instant::now();
        let mut session = Self {
            cfg,
            watcher: SourceWatcher::new(db_path),
            db: Database::default(),
            discovery: DiscoveryTracker::new(DiscoveryStore::new(stores.discovery)),
            index: SearchIndex::default(),
            prefs_store,
            globe,
            tour: TourScheduler::new(prefs.guided_tour, prefs.guided_tour_slow),
            layout: ForceLayout::default(),
            selected: None,
            transition: None,
            filtered: Vec::new(),
            search_term: String::new(),
            pending_search: None,
            status: String::new(),
            search_meta: String::new(),
            tour_note: "",
            tour_audio: TourAudio::default(),
            next_poll: now + cfg.refresh_interval,
            next_animation: now,
            events: Vec::new(),
        };
        session.poll_source(now, true);
        session
    }

    // ---- timer-driven pipeline ----

    pub fn tick(&mut self, now: Instant) {
        if now >= self.next_poll {
            self.next_poll = now + self.cfg.refresh_interval;
            self.poll_source(now, false);
        }

        if let Some(pending) = self.pending_search.take() {
            if now >= pending.deadline {
                self.search_term = pending.term;
                self.apply_search(true, now);
                self.note_interaction(now);
            } else {
                self.pending_search = Some(pending);
            }
        }

        if now >= self.next_animation {
            self.next_animation = now + self.cfg.animation_tick;
            if self.globe.rotation.step() {
                self.reproject();
            }
            if self
                .transition
                .as_ref()
                .is_some_and(|animation| animation.frame(now).done)
            {
                self.transition = None;
            }
        }

        if self.tour.fire_due(now) {
            self.advance_tour(now);
        }
    }

    fn poll_source(&mut self, now: Instant, force: bool) {
        match self.watcher.poll(force) {
            SourceEvent::Loaded(text) => self.reload(&text, now),
            SourceEvent::Missing => self.reset_missing(now),
            SourceEvent::Failed(message) => {
                tracing::warn!(%message, "source poll failed");
                self.status = message;
            }
            SourceEvent::Unchanged => {}
        }
    }

    fn reload(&mut self, text: &str, now: Instant) {
        self.db = parse_database(text);
        tracing::debug!(
            records = self.db.len(),
            specials = self.db.specials.len(),
            "database reloaded"
        );
        self.discovery.reload(&self.db);
        self.tour_audio.path = self
            .db
            .special(AUDIO_SPECIAL_KIND)
            .and_then(|config| config.get(AUDIO_PATH_KEY))
            .map(|path| path.trim().to_string())
            .filter(|path| !path.is_empty());

        let previous = self.selected.take();
        self.selected = previous
            .filter(|id| self.db.contains(id))
            .or_else(|| {
                self.db
                    .cursor_selected
                    .clone()
                    .filter(|id| self.db.contains(id))
            })
            .or_else(|| self.db.first_id().cloned());
        if let Some(id) = self.selected.clone() {
            self.discovery.discover(&self.db, &id);
        }

        self.index.rebuild(&self.db);
        self.apply_search(true, now);
        self.schedule_tour(now);
        self.events.push(SessionEvent::Reloaded);
    }

    fn reset_missing(&mut self, now: Instant) {
        self.status = format!("File not found: {}", self.watcher.path().display());
        tracing::warn!(path = %self.watcher.path().display(), "database file missing");
        self.db = Database::default();
        self.discovery.clear();
        self.index = SearchIndex::default();
        self.selected = None;
        self.transition = None;
        self.filtered.clear();
        self.globe.clear_points();
        self.tour_audio = TourAudio::default();
        self.update_search_meta();
        self.schedule_tour(now);
        self.events.push(SessionEvent::Reloaded);
    }

    // Filter over the discovered order; when the selection falls outside
    // the visible set, move it to the first visible record.
    fn apply_search(&mut self, prefer_visible_selection: bool, now: Instant) {
        self.filtered = self
            .index
            .filter(&self.search_term, self.discovery.discovered_order());

        if prefer_visible_selection
            && !self.filtered.is_empty()
            && self
                .selected
                .as_ref()
                .map_or(true, |id| !self.filtered.contains(id))
        {
            let previous = self.selected.clone();
            let next = self.filtered[0].clone();
            self.begin_transition(previous.as_ref(), &next, false, now);
            self.selected = Some(next.clone());
            self.events.push(SessionEvent::SelectionChanged {
                from: previous,
                to: Some(next),
                from_tour: false,
            });
        }

        self.center_on_selected();
        self.reproject();
        self.update_search_meta();
        self.update_status();
    }

    fn begin_transition(
        &mut self,
        from: Option<&RecordId>,
        to: &RecordId,
        from_tour: bool,
        now: Instant,
    ) {
        let Some(from) = from else {
            self.transition = None;
            return;
        };
        self.transition = transition::plan(&self.db, from, to, from_tour, self.tour.slow_pace)
            .map(|plan| TransitionAnimation::new(plan, now));
    }

    // ---- selection ----

    pub fn select(&mut self, id: &RecordId, now: Instant) -> bool {
        let selected = self.select_inner(id, false, now);
        if selected {
            self.note_interaction(now);
        }
        selected
    }

    fn select_inner(&mut self, id: &RecordId, from_tour: bool, now: Instant) -> bool {
        if !self.db.contains(id) {
            return false;
        }
        let previous = self.selected.clone();
        self.discovery.discover(&self.db, id);
        self.begin_transition(previous.as_ref(), id, from_tour, now);
        self.selected = Some(id.clone());
        self.apply_search(false, now);
        self.events.push(SessionEvent::SelectionChanged {
            from: previous,
            to: Some(id.clone()),
            from_tour,
        });
        true
    }

    pub fn open_link(&mut self, target: &str, now: Instant) -> LinkTarget {
        let resolved = links::resolve(&self.db, target);
        if let LinkTarget::Internal(id) = &resolved {
            let id = id.clone();
            self.select(&id, now);
        }
        resolved
    }

    // ---- search ----

    // Debounced: rapid edits collapse into one filter pass.
    pub fn search_input(&mut self, raw: &str, now: Instant) {
        self.pending_search = Some(PendingSearch {
            term: raw.trim().to_lowercase(),
            deadline: now + self.cfg.search_debounce,
        });
    }

    pub fn search_focus_changed(&mut self, focused: bool, now: Instant) {
        self.tour.set_search_focus(focused);
        if focused {
            self.tour.cancel();
            self.tour_audio.should_play = false;
        } else if self.tour.enabled {
            self.schedule_tour(now);
        }
    }

    // ---- tour ----

    pub fn toggle_tour_pause(&mut self, now: Instant) {
        if self.tour.search_focused() || !self.tour.enabled {
            return;
        }
        self.tour.set_paused(!self.tour.is_paused());
        self.schedule_tour(now);
    }

    pub fn set_tour_enabled(&mut self, enabled: bool, now: Instant) {
        self.tour.enabled = enabled;
        if enabled {
            self.tour.set_paused(false);
        }
        self.persist_prefs();
        self.schedule_tour(now);
    }

    pub fn set_slow_pace(&mut self, slow: bool, now: Instant) {
        self.tour.slow_pace = slow;
        self.persist_prefs();
        if self.tour.enabled {
            self.schedule_tour(now);
        }
    }

    pub fn set_invert_drag(&mut self, invert: bool) {
        self.globe.invert_drag_y = invert;
        self.persist_prefs();
    }

    fn persist_prefs(&mut self) {
        self.prefs_store.save(&Preferences {
            guided_tour: self.tour.enabled,
            guided_tour_slow: self.tour.slow_pace,
            invert_drag_y: self.globe.invert_drag_y,
        });
    }

    fn schedule_tour(&mut self, now: Instant) {
        self.tour_note = self.tour.schedule(now, self.discovery.len());
        self.tour_audio.should_play = self.tour.audio_should_play(self.discovery.len());
    }

    fn advance_tour(&mut self, now: Instant) {
        if !self.tour.enabled {
            return;
        }
        let next = {
            let order = self.discovery.discovered_order();
            if order.is_empty() {
                return;
            }
            let idx = self
                .selected
                .as_ref()
                .and_then(|id| order.iter().position(|other| other == id))
                .unwrap_or(0);
            order[(idx + 1) % order.len()].clone()
        };
        self.select_inner(&next, true, now);
        self.schedule_tour(now);
    }

    // Manual interaction unpauses the tour and rearms its timer.
    fn note_interaction(&mut self, now: Instant) {
        if self.tour.enabled {
            self.tour.set_paused(false);
            self.schedule_tour(now);
        }
    }

    // ---- globe interactions ----

    pub fn zoom_step(&mut self, direction: i32, now: Instant) -> bool {
        let changed = self.globe.zoom_step(direction);
        if changed {
            self.reproject();
            self.note_interaction(now);
        }
        changed
    }

    pub fn reset_zoom(&mut self, now: Instant) -> bool {
        let changed = self.globe.reset_zoom();
        if changed {
            self.reproject();
            self.note_interaction(now);
        }
        changed
    }

    pub fn begin_drag(&mut self, x: f64, y: f64) {
        self.globe.begin_drag(x, y);
    }

    pub fn drag_to(&mut self, x: f64, y: f64) {
        if self.globe.drag_to(x, y) {
            self.reproject();
        }
    }

    // Release after a drag snaps to the record nearest the globe center;
    // release without movement is a click pick.
    pub fn end_drag(&mut self, x: f64, y: f64, now: Instant) -> Option<RecordId> {
        let target = match self.globe.end_drag() {
            DragOutcome::Dragged => self.globe.nearest_to_center(),
            DragOutcome::Click => self.globe.hit_test(x, y),
        };
        if let Some(id) = &target {
            let id = id.clone();
            self.select(&id, now);
        }
        target
    }

    // ---- maintenance ----

    pub fn forget_discoveries(&mut self, now: Instant) {
        self.discovery.reset(&self.db);
        self.apply_search(true, now);
        self.note_interaction(now);
    }

    pub fn refresh(&mut self, now: Instant) {
        self.poll_source(now, true);
        self.note_interaction(now);
    }

    // ---- positioning ----

    fn center_on_selected(&mut self) {
        let Some(id) = &self.selected else {
            return;
        };
        let Some(coord) = self.db.coords.get(id) else {
            return;
        };
        self.globe.center_on(*coord);
    }

    fn reproject(&mut self) {
        self.globe.reproject(&self.db.coords, &self.filtered);
    }

    // Force-directed fallback for a visible subgraph with no coordinates.
    pub fn fallback_layout(
        &mut self,
        params: &LayoutParams,
    ) -> Option<&HashMap<RecordId, (f64, f64)>> {
        if self.filtered.is_empty()
            || self
                .filtered
                .iter()
                .any(|id| self.db.coords.contains_key(id))
        {
            return None;
        }
        let nodes = self.filtered.clone();
        let edges: Vec<(RecordId, RecordId)> = nodes
            .iter()
            .filter_map(|id| self.db.get(id))
            .flat_map(|record| {
                record
                    .edges
                    .iter()
                    .map(move |edge| (record.id.clone(), edge.target.clone()))
            })
            .collect();
        self.layout.run(params, &nodes, &edges);
        Some(self.layout.positions())
    }

    // ---- status lines ----

    fn update_status(&mut self) {
        self.status = format!(
            "DB: {} · {}/{} discovered",
            self.watcher.path().display(),
            self.discovery.len(),
            self.db.len()
        );
    }

    fn update_search_meta(&mut self) {
        if self.db.is_empty() {
            self.search_meta = String::from("No records.");
            return;
        }
        let discovered = self.discovery.len();
        self.search_meta = if self.search_term.is_empty() {
            format!("{discovered} discovered of {} terms.", self.db.len())
        } else {
            format!(
                "{} matches within {discovered} discovered terms for \"{}\".",
                self.filtered.len(),
                self.search_term
            )
        };
    }

    // ---- accessors ----

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn search_meta(&self) -> &str {
        &self.search_meta
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn tour_note(&self) -> &str {
        self.tour_note
    }

    pub fn tour_state(&self) -> TourState {
        self.tour.state()
    }

    pub fn tour_audio(&self) -> &TourAudio {
        &self.tour_audio
    }

    pub fn selected(&self) -> Option<&RecordId> {
        self.selected.as_ref()
    }

    pub fn selected_record(&self) -> Option<&Record> {
        self.selected.as_ref().and_then(|id| self.db.get(id))
    }

    pub fn filtered_order(&self) -> &[RecordId] {
        &self.filtered
    }

    pub fn discovered_order(&self) -> &[RecordId] {
        self.discovery.discovered_order()
    }

    pub fn transition(&self) -> Option<&TransitionAnimation> {
        self.transition.as_ref()
    }

    pub fn resolve_link(&self, target: &str) -> LinkTarget {
        links::resolve(&self.db, target)
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::tempdir;

    const SAMPLE: &str = "\
@alpha relates: blocks>@beta
## Alpha
First term, about widgets.
---
@beta
## Beta
Second term, about gears.
---
@gamma
## Gamma
Third term, widgets again.
";

    fn session_with(dir: &tempfile::TempDir, text: &str) -> Session {
        let db_path = dir.path().join("db.md");
        fs::write(&db_path, text).expect("write db");
        Session::open(db_path, EngineConfig::default())
    }

    fn id(name: &str) -> RecordId {
        RecordId::new(name)
    }

    #[test]
    fn initial_load_discovers_the_first_record() {
        let dir = tempdir().expect("tempdir");
        let mut session = session_with(&dir, SAMPLE);
        assert_eq!(session.selected(), Some(&id("@alpha")));
        assert_eq!(session.discovered_order(), &[id("@alpha")]);
        assert_eq!(session.filtered_order(), &[id("@alpha")]);
        assert!(session.status().contains("1/3 discovered"));
        let events = session.drain_events();
        assert!(events.contains(&SessionEvent::Reloaded));
    }

    #[test]
    fn selection_discovers_and_transitions() {
        let dir = tempdir().expect("tempdir");
        let mut session = session_with(&dir, SAMPLE);
        let now = Instant::now();

        assert!(session.select(&id("@gamma"), now));
        assert_eq!(session.selected(), Some(&id("@gamma")));
        assert_eq!(session.discovered_order(), &[id("@alpha"), id("@gamma")]);
        let animation = session.transition().expect("transition planned");
        assert_eq!(animation.plan().from, id("@alpha"));
        assert_eq!(animation.plan().to, id("@gamma"));
        assert!(!animation.plan().from_tour);
    }

    #[test]
    fn selecting_unknown_record_is_refused() {
        let dir = tempdir().expect("tempdir");
        let mut session = session_with(&dir, SAMPLE);
        assert!(!session.select(&id("@missing"), Instant::now()));
        assert_eq!(session.selected(), Some(&id("@alpha")));
    }

    #[test]
    fn search_debounce_applies_on_tick() {
        let dir = tempdir().expect("tempdir");
        let mut session = session_with(&dir, SAMPLE);
        let now = Instant::now();
        session.select(&id("@beta"), now);
        session.select(&id("@gamma"), now);

        session.search_input("WIDGETS", now);
        session.search_input("gears", now);
        assert_eq!(session.search_term(), "");

        session.tick(now + Duration::from_millis(99));
        assert_eq!(session.search_term(), "");
        session.tick(now + Duration::from_millis(100));
        assert_eq!(session.search_term(), "gears");
        assert_eq!(session.filtered_order(), &[id("@beta")]);
        assert_eq!(session.selected(), Some(&id("@beta")));
        assert!(session.search_meta().contains("1 matches"));
    }

    #[test]
    fn empty_search_lists_the_discovered_order() {
        let dir = tempdir().expect("tempdir");
        let mut session = session_with(&dir, SAMPLE);
        let now = Instant::now();
        session.select(&id("@gamma"), now);

        session.search_input("", now);
        session.tick(now + Duration::from_millis(150));
        assert_eq!(session.filtered_order(), &[id("@alpha"), id("@gamma")]);
    }

    #[test]
    fn tour_cycles_each_discovered_record_once() {
        let dir = tempdir().expect("tempdir");
        let mut session = session_with(&dir, SAMPLE);
        let now = Instant::now();
        session.select(&id("@beta"), now);
        session.select(&id("@gamma"), now);
        session.select(&id("@alpha"), now);
        assert_eq!(session.discovered_order().len(), 3);

        let mut visited = Vec::new();
        for _ in 0..3 {
            session.advance_tour(now);
            visited.push(session.selected().expect("selection present").clone());
        }
        assert_eq!(visited, vec![id("@beta"), id("@gamma"), id("@alpha")]);

        session.advance_tour(now);
        assert_eq!(session.selected(), Some(&id("@beta")));
    }

    #[test]
    fn tour_fires_after_its_delay() {
        let dir = tempdir().expect("tempdir");
        let mut session = session_with(&dir, SAMPLE);
        let now = Instant::now();
        session.select(&id("@beta"), now);

        session.tick(now + Duration::from_millis(11_000));
        let before = session.selected().cloned();
        session.tick(now + Duration::from_millis(13_000));
        assert_ne!(session.selected().cloned(), before);
        let events = session.drain_events();
        assert!(events.iter().any(|event| matches!(
            event,
            SessionEvent::SelectionChanged { from_tour: true, .. }
        )));
    }

    #[test]
    fn search_focus_suspends_the_tour_timer() {
        let dir = tempdir().expect("tempdir");
        let mut session = session_with(&dir, SAMPLE);
        let now = Instant::now();
        session.select(&id("@beta"), now);
        assert!(session.tour_audio().should_play);

        session.search_focus_changed(true, now);
        assert!(!session.tour_audio().should_play);
        let before = session.selected().cloned();
        session.tick(now + Duration::from_secs(60));
        assert_eq!(session.selected().cloned(), before);

        session.search_focus_changed(false, now + Duration::from_secs(60));
        session.tick(now + Duration::from_secs(80));
        assert_ne!(session.selected().cloned(), before);
    }

    #[test]
    fn pause_toggle_is_ignored_while_search_focused() {
        let dir = tempdir().expect("tempdir");
        let mut session = session_with(&dir, SAMPLE);
        let now = Instant::now();
        session.select(&id("@beta"), now);

        session.search_focus_changed(true, now);
        session.toggle_tour_pause(now);
        assert_eq!(session.tour_state(), TourState::Running);

        session.search_focus_changed(false, now);
        session.toggle_tour_pause(now);
        assert_eq!(session.tour_state(), TourState::Paused);
        session.toggle_tour_pause(now);
        assert_eq!(session.tour_state(), TourState::Running);
    }

    #[test]
    fn disabling_the_tour_persists_preferences() {
        let dir = tempdir().expect("tempdir");
        let db_path = dir.path().join("db.md");
        fs::write(&db_path, SAMPLE).expect("write db");
        let now = Instant::now();
        {
            let mut session = Session::open(&db_path, EngineConfig::default());
            session.set_tour_enabled(false, now);
            session.set_slow_pace(true, now);
        }
        let session = Session::open(&db_path, EngineConfig::default());
        assert_eq!(session.tour_state(), TourState::Off);
    }

    #[test]
    fn missing_file_degrades_to_empty_state() {
        let dir = tempdir().expect("tempdir");
        let db_path = dir.path().join("absent.md");
        let mut session = Session::open(&db_path, EngineConfig::default());
        assert!(session.status().starts_with("File not found:"));
        assert!(session.database().is_empty());
        assert_eq!(session.selected(), None);
        assert_eq!(session.search_meta(), "No records.");

        fs::write(&db_path, SAMPLE).expect("write db");
        session.refresh(Instant::now());
        assert_eq!(session.selected(), Some(&id("@alpha")));
    }

    #[test]
    fn reload_keeps_selection_when_it_survives() {
        let dir = tempdir().expect("tempdir");
        let db_path = dir.path().join("db.md");
        fs::write(&db_path, SAMPLE).expect("write db");
        let mut session = Session::open(&db_path, EngineConfig::default());
        let now = Instant::now();
        session.select(&id("@beta"), now);

        fs::write(&db_path, format!("{SAMPLE}---\n@delta\n## Delta\n")).expect("extend db");
        session.refresh(now);
        assert_eq!(session.selected(), Some(&id("@beta")));
        assert_eq!(session.database().len(), 4);
    }

    #[test]
    fn reload_falls_back_to_cursor_selection() {
        let dir = tempdir().expect("tempdir");
        let text = format!("{SAMPLE}---\n```cursor\nselected:\n- @beta\n```\n");
        let mut session = session_with(&dir, &text);
        assert_eq!(session.selected(), Some(&id("@beta")));
        // the cursor-selected record counts as discovered
        assert_eq!(
            session.discovered_order(),
            &[id("@alpha"), id("@beta")]
        );
        session.drain_events();
    }

    #[test]
    fn forget_discoveries_resets_to_the_first_record() {
        let dir = tempdir().expect("tempdir");
        let mut session = session_with(&dir, SAMPLE);
        let now = Instant::now();
        session.select(&id("@beta"), now);
        session.select(&id("@gamma"), now);
        assert_eq!(session.discovered_order().len(), 3);

        session.forget_discoveries(now);
        assert_eq!(session.discovered_order(), &[id("@alpha")]);
        assert_eq!(session.selected(), Some(&id("@alpha")));
    }

    #[test]
    fn tour_audio_cue_follows_the_special_config() {
        let dir = tempdir().expect("tempdir");
        let text = format!(
            "{SAMPLE}---\n@LAT-90LON0\n```ttdb-special\nkind: tour_sound\naudio_path: \"x.wav\"\n```\n"
        );
        let mut session = session_with(&dir, &text);
        let now = Instant::now();
        assert_eq!(session.tour_audio().path.as_deref(), Some("x.wav"));
        assert!(!session.tour_audio().should_play, "one discovered record");

        session.select(&id("@beta"), now);
        assert!(session.tour_audio().should_play);
    }

    #[test]
    fn fallback_layout_only_without_coordinates() {
        let dir = tempdir().expect("tempdir");
        let mut session = session_with(&dir, SAMPLE);
        let now = Instant::now();
        session.select(&id("@beta"), now);
        let params = LayoutParams::default();
        let positions = session.fallback_layout(&params).expect("layout produced");
        assert_eq!(positions.len(), 2);

        let coords_text = "@LAT10LON20\n## Pinned\n---\n@plain\n## Plain\n";
        let dir2 = tempdir().expect("tempdir");
        let mut coords_session = session_with(&dir2, coords_text);
        assert!(coords_session.fallback_layout(&params).is_none());
    }

    #[test]
    fn internal_link_selects_and_discovers() {
        let dir = tempdir().expect("tempdir");
        let mut session = session_with(&dir, SAMPLE);
        let now = Instant::now();

        let resolved = session.open_link("ttdb://@beta", now);
        assert_eq!(resolved, LinkTarget::Internal(id("@beta")));
        assert_eq!(session.selected(), Some(&id("@beta")));
        assert_eq!(session.open_link("javascript:alert(1)", now), LinkTarget::Inert);
    }

    #[test]
    fn transition_clears_after_its_duration() {
        let dir = tempdir().expect("tempdir");
        let mut session = session_with(&dir, SAMPLE);
        let now = Instant::now();
        session.select(&id("@gamma"), now);
        assert!(session.transition().is_some());

        session.tick(now + Duration::from_secs(5));
        assert!(session.transition().is_none());
    }
}
