use std::collections::BTreeMap;
use std::fmt;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::modal::{ModalPresenter, OverlayHost};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MediaId(pub u32);

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "media#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loaded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayState {
    Paused,
    Playing,
}

/// What a play request produced right away. Late rejections arrive through
/// [`MediaController::on_play_rejected`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayOutcome {
    Started,
    Rejected(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Loaded,
    Playing,
    Paused,
    Unchanged,
}

/// The operations the controller needs from a `<video>`.
pub trait MediaElement {
    fn assign_source(&mut self, url: &str);
    fn load(&mut self);
    fn play(&mut self) -> PlayOutcome;
    fn pause(&mut self);
    fn rewind(&mut self);
    fn position(&self) -> f64;
    /// Has enough data to show the current frame.
    fn is_ready(&self) -> bool;
    fn is_paused(&self) -> bool;
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MediaSpec {
    pub deferred_source: Option<String>,
    pub remote_id: Option<String>,
    pub orientation: Orientation,
}

pub struct MediaItem<E> {
    element: E,
    spec: MediaSpec,
    load: LoadState,
    play: PlayState,
}

impl<E> MediaItem<E> {
    #[cfg(test)]
    pub fn load_state(&self) -> LoadState {
        self.load
    }

    #[cfg(test)]
    pub fn play_state(&self) -> PlayState {
        self.play
    }

    pub fn orientation(&self) -> Orientation {
        self.spec.orientation
    }

    pub fn remote_id(&self) -> Option<&str> {
        self.spec.remote_id.as_deref()
    }

    #[cfg(test)]
    pub fn element(&self) -> &E {
        &self.element
    }

    #[cfg(test)]
    fn consistent(&self) -> bool {
        self.play == PlayState::Paused || self.load == LoadState::Loaded
    }
}

/// Owns the playback state of every preview video on the page.
pub struct MediaController<E> {
    items: BTreeMap<MediaId, MediaItem<E>>,
}

impl<E> Default for MediaController<E> {
    fn default() -> Self {
        Self { items: BTreeMap::new() }
    }
}

impl<E: MediaElement> MediaController<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: MediaId, spec: MediaSpec, element: E) {
        let load = if spec.deferred_source.is_some() {
            LoadState::Unloaded
        } else {
            LoadState::Loaded
        };
        let item = MediaItem {
            element,
            spec,
            load,
            play: PlayState::Paused,
        };
        if self.items.insert(id, item).is_some() {
            debug!("{} registered again, previous element replaced", id);
        }
    }

    pub fn unregister(&mut self, id: MediaId) -> bool {
        self.items.remove(&id).is_some()
    }

    #[cfg(test)]
    pub fn item(&self, id: MediaId) -> Option<&MediaItem<E>> {
        self.items.get(&id)
    }

    #[cfg(test)]
    pub fn invariant_holds(&self) -> bool {
        self.items.values().all(MediaItem::consistent)
    }

    fn item_mut(&mut self, id: MediaId) -> Option<&mut MediaItem<E>> {
        let item = self.items.get_mut(&id);
        if item.is_none() {
            warn!("{} is not registered", id);
        }
        item
    }

    pub fn on_enter_viewport(&mut self, id: MediaId) -> Transition {
        let Some(item) = self.item_mut(id) else {
            return Transition::Unchanged;
        };
        if item.load == LoadState::Loaded {
            return Transition::Unchanged;
        }
        let Some(url) = item.spec.deferred_source.clone() else {
            return Transition::Unchanged;
        };

        item.element.assign_source(&url);
        item.element.load();
        item.load = LoadState::Loaded;
        debug!("{} loaded", id);
        Transition::Loaded
    }

    pub fn on_exit_viewport(&mut self, id: MediaId) -> Transition {
        let Some(item) = self.item_mut(id) else {
            return Transition::Unchanged;
        };
        if item.load != LoadState::Loaded {
            return Transition::Unchanged;
        }
        // The element decides, the tracked state can lag behind a late promise
        let was_playing = item.play == PlayState::Playing || !item.element.is_paused();
        stop(item);
        if was_playing {
            debug!("{} left the viewport, stopped", id);
            Transition::Paused
        } else {
            Transition::Unchanged
        }
    }

    pub fn on_hover_enter(&mut self, id: MediaId) -> Transition {
        let Some(item) = self.item_mut(id) else {
            return Transition::Unchanged;
        };
        if item.load != LoadState::Loaded || item.play == PlayState::Playing {
            return Transition::Unchanged;
        }
        if !item.element.is_ready() {
            debug!("{} not buffered yet, preview skipped", id);
            return Transition::Unchanged;
        }

        match item.element.play() {
            PlayOutcome::Started => {
                item.play = PlayState::Playing;
                Transition::Playing
            }
            PlayOutcome::Rejected(reason) => {
                debug!("{} preview rejected: {}", id, reason);
                item.play = PlayState::Paused;
                Transition::Unchanged
            }
        }
    }

    pub fn on_hover_leave(&mut self, id: MediaId) -> Transition {
        let Some(item) = self.item_mut(id) else {
            return Transition::Unchanged;
        };
        let was_playing = item.play == PlayState::Playing;
        if item.load == LoadState::Loaded {
            stop(item);
        }
        if was_playing {
            Transition::Paused
        } else {
            Transition::Unchanged
        }
    }

    /// The element reported that an earlier play request failed after all.
    pub fn on_play_rejected(&mut self, id: MediaId, reason: &str) -> Transition {
        let Some(item) = self.item_mut(id) else {
            return Transition::Unchanged;
        };
        debug!("{} playback rejected late: {}", id, reason);
        // A newer play() may already be running
        if item.play == PlayState::Playing && item.element.is_paused() {
            item.play = PlayState::Paused;
            Transition::Paused
        } else {
            Transition::Unchanged
        }
    }

    /// Opens the full video for `id` in the modal. Returns whether a modal opened.
    pub fn on_click<H: OverlayHost>(&self, id: MediaId, modal: &mut ModalPresenter<H>) -> bool {
        let Some(item) = self.items.get(&id) else {
            warn!("{} is not registered", id);
            return false;
        };
        match item.remote_id() {
            Some(remote_id) => modal.open_video(remote_id, item.orientation()),
            None => false,
        }
    }

    /// Stops every playing preview. Returns how many were stopped.
    pub fn pause_all(&mut self) -> usize {
        let mut stopped = 0;
        for item in self.items.values_mut() {
            if item.play == PlayState::Playing {
                stop(item);
                stopped += 1;
            }
        }
        stopped
    }

    /// Tab hidden: pause every element whatever its tracked state, then take
    /// the elements' word for what is playing.
    pub fn suspend_all(&mut self) {
        for item in self.items.values_mut() {
            item.element.pause();
        }
        for (id, item) in self.items.iter_mut() {
            let playing = item.load == LoadState::Loaded && !item.element.is_paused();
            let refreshed = if playing { PlayState::Playing } else { PlayState::Paused };
            if refreshed != item.play {
                debug!("{} resynced to {:?} after suspend", id, refreshed);
            }
            item.play = refreshed;
        }
    }
}

fn stop<E: MediaElement>(item: &mut MediaItem<E>) {
    item.element.pause();
    item.element.rewind();
    item.play = PlayState::Paused;
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::modal::tests::RecordingHost;
    use crate::modal::{ModalKind, ModalPhase};

    #[derive(Debug, Default)]
    pub struct FakeVideo {
        pub src: Option<String>,
        pub loads: usize,
        pub ready: bool,
        pub paused: bool,
        pub position: f64,
        pub reject_with: Option<String>,
        pub ignore_pause: bool,
    }

    impl FakeVideo {
        pub fn ready() -> Self {
            Self {
                ready: true,
                paused: true,
                ..Self::default()
            }
        }
    }

    impl MediaElement for FakeVideo {
        fn assign_source(&mut self, url: &str) {
            self.src = Some(url.to_string());
        }

        fn load(&mut self) {
            self.loads += 1;
        }

        fn play(&mut self) -> PlayOutcome {
            match &self.reject_with {
                Some(reason) => PlayOutcome::Rejected(reason.clone()),
                None => {
                    self.paused = false;
                    self.position = 1.5;
                    PlayOutcome::Started
                }
            }
        }

        fn pause(&mut self) {
            if !self.ignore_pause {
                self.paused = true;
            }
        }

        fn rewind(&mut self) {
            self.position = 0.0;
        }

        fn position(&self) -> f64 {
            self.position
        }

        fn is_ready(&self) -> bool {
            self.ready
        }

        fn is_paused(&self) -> bool {
            self.paused
        }
    }

    fn lazy(url: &str) -> MediaSpec {
        MediaSpec {
            deferred_source: Some(url.to_string()),
            ..MediaSpec::default()
        }
    }

    fn controller_with(id: MediaId, spec: MediaSpec) -> MediaController<FakeVideo> {
        let mut controller = MediaController::new();
        controller.register(id, spec, FakeVideo::ready());
        controller
    }

    fn state(controller: &MediaController<FakeVideo>, id: MediaId) -> (LoadState, PlayState) {
        let item = controller.item(id).unwrap();
        (item.load_state(), item.play_state())
    }

    #[test]
    fn preview_lifecycle_ends_loaded_and_paused() {
        let a = MediaId(0);
        let mut controller = controller_with(a, lazy("/previews/a.mp4"));
        assert_eq!(state(&controller, a), (LoadState::Unloaded, PlayState::Paused));

        assert_eq!(controller.on_enter_viewport(a), Transition::Loaded);
        assert_eq!(controller.item(a).unwrap().element().src.as_deref(), Some("/previews/a.mp4"));
        assert_eq!(controller.item(a).unwrap().element().loads, 1);
        assert!(controller.invariant_holds());

        assert_eq!(controller.on_hover_enter(a), Transition::Playing);
        assert_eq!(state(&controller, a), (LoadState::Loaded, PlayState::Playing));
        assert!(controller.invariant_holds());

        assert_eq!(controller.on_hover_leave(a), Transition::Paused);
        assert_eq!(controller.item(a).unwrap().element().position, 0.0);
        assert!(controller.item(a).unwrap().element().paused);

        assert_eq!(controller.on_exit_viewport(a), Transition::Unchanged);
        assert_eq!(state(&controller, a), (LoadState::Loaded, PlayState::Paused));
        assert!(controller.invariant_holds());
    }

    #[test]
    fn second_viewport_entry_does_not_reload() {
        let a = MediaId(0);
        let mut controller = controller_with(a, lazy("/a.mp4"));
        controller.on_enter_viewport(a);
        assert_eq!(controller.on_enter_viewport(a), Transition::Unchanged);
        assert_eq!(controller.item(a).unwrap().element().loads, 1);
    }

    #[test]
    fn inline_source_starts_loaded() {
        let a = MediaId(4);
        let mut controller = controller_with(a, MediaSpec::default());
        assert_eq!(state(&controller, a).0, LoadState::Loaded);
        assert_eq!(controller.on_enter_viewport(a), Transition::Unchanged);
        assert_eq!(controller.item(a).unwrap().element().loads, 0);
    }

    #[test]
    fn hover_before_load_never_plays() {
        let a = MediaId(0);
        let mut controller = controller_with(a, lazy("/a.mp4"));
        assert_eq!(controller.on_hover_enter(a), Transition::Unchanged);
        assert_eq!(state(&controller, a), (LoadState::Unloaded, PlayState::Paused));
        assert!(controller.invariant_holds());
    }

    #[test]
    fn hover_waits_for_buffered_data() {
        let a = MediaId(0);
        let mut controller = MediaController::new();
        controller.register(a, MediaSpec::default(), FakeVideo::default());
        assert_eq!(controller.on_hover_enter(a), Transition::Unchanged);
        assert_eq!(state(&controller, a).1, PlayState::Paused);
    }

    #[test]
    fn rejected_play_stays_paused() {
        let a = MediaId(0);
        let mut controller = MediaController::new();
        controller.register(
            a,
            MediaSpec::default(),
            FakeVideo {
                reject_with: Some("NotAllowedError".to_string()),
                ..FakeVideo::ready()
            },
        );
        assert_eq!(controller.on_hover_enter(a), Transition::Unchanged);
        assert_eq!(state(&controller, a).1, PlayState::Paused);
    }

    #[test]
    fn late_rejection_reverts_to_paused() {
        let a = MediaId(0);
        let mut controller = controller_with(a, MediaSpec::default());
        controller.on_hover_enter(a);
        controller.items.get_mut(&a).unwrap().element.paused = true;
        assert_eq!(controller.on_play_rejected(a, "AbortError"), Transition::Paused);
        assert_eq!(state(&controller, a).1, PlayState::Paused);
        assert_eq!(controller.on_play_rejected(a, "AbortError"), Transition::Unchanged);
    }

    #[test]
    fn stale_rejection_does_not_hide_running_playback() {
        let a = MediaId(0);
        let mut controller = controller_with(a, MediaSpec::default());
        controller.on_hover_enter(a);
        controller.on_hover_leave(a);
        controller.on_hover_enter(a);

        // The first request's AbortError lands after the second play started
        assert_eq!(controller.on_play_rejected(a, "AbortError"), Transition::Unchanged);
        assert_eq!(state(&controller, a).1, PlayState::Playing);

        assert_eq!(controller.on_exit_viewport(a), Transition::Paused);
        let video = controller.item(a).unwrap().element();
        assert!(video.paused);
        assert_eq!(video.position, 0.0);
    }

    #[test]
    fn exit_pauses_element_even_when_tracked_paused() {
        let a = MediaId(0);
        let mut controller = controller_with(a, MediaSpec::default());
        controller.on_hover_enter(a);
        controller.items.get_mut(&a).unwrap().play = PlayState::Paused;

        assert_eq!(controller.on_exit_viewport(a), Transition::Paused);
        assert!(controller.item(a).unwrap().element().paused);
        assert_eq!(state(&controller, a).1, PlayState::Paused);
    }

    #[test]
    fn exit_always_leaves_item_paused_at_start() {
        let a = MediaId(0);
        let mut controller = controller_with(a, MediaSpec::default());

        controller.on_hover_enter(a);
        assert_eq!(controller.on_exit_viewport(a), Transition::Paused);
        let video = controller.item(a).unwrap().element();
        assert!(video.paused);
        assert_eq!(video.position, 0.0);

        // Paused mid-clip by something else: exit still rewinds.
        controller.on_hover_enter(a);
        controller.suspend_all();
        assert_eq!(controller.item(a).unwrap().element().position, 1.5);
        assert_eq!(controller.on_exit_viewport(a), Transition::Unchanged);
        assert_eq!(controller.item(a).unwrap().element().position, 0.0);
        assert_eq!(state(&controller, a).1, PlayState::Paused);
    }

    #[test]
    fn unknown_items_are_ignored() {
        let mut controller: MediaController<FakeVideo> = MediaController::new();
        assert_eq!(controller.on_enter_viewport(MediaId(9)), Transition::Unchanged);
        assert_eq!(controller.on_hover_enter(MediaId(9)), Transition::Unchanged);
        assert_eq!(controller.on_hover_leave(MediaId(9)), Transition::Unchanged);
        assert_eq!(controller.on_exit_viewport(MediaId(9)), Transition::Unchanged);
    }

    #[test]
    fn suspend_sweeps_everything_and_resyncs() {
        let (a, b) = (MediaId(0), MediaId(1));
        let mut controller = MediaController::new();
        controller.register(a, MediaSpec::default(), FakeVideo::ready());
        controller.register(
            b,
            MediaSpec::default(),
            FakeVideo {
                ignore_pause: true,
                ..FakeVideo::ready()
            },
        );
        controller.on_hover_enter(a);
        controller.on_hover_enter(b);

        controller.suspend_all();
        assert_eq!(state(&controller, a).1, PlayState::Paused);
        assert!(controller.item(a).unwrap().element().paused);
        // The element refused to pause, so the tracked state follows it.
        assert_eq!(state(&controller, b).1, PlayState::Playing);
        assert!(controller.invariant_holds());
    }

    #[test]
    fn pause_all_counts_stopped_previews() {
        let (a, b) = (MediaId(0), MediaId(1));
        let mut controller = MediaController::new();
        controller.register(a, MediaSpec::default(), FakeVideo::ready());
        controller.register(b, MediaSpec::default(), FakeVideo::ready());
        controller.on_hover_enter(b);
        assert_eq!(controller.pause_all(), 1);
        assert_eq!(state(&controller, b).1, PlayState::Paused);
    }

    #[test]
    fn click_opens_vertical_video_modal() {
        let b = MediaId(1);
        let mut controller = MediaController::new();
        controller.register(
            b,
            MediaSpec {
                deferred_source: None,
                remote_id: Some("abc123".to_string()),
                orientation: Orientation::Vertical,
            },
            FakeVideo::ready(),
        );
        let mut modal = ModalPresenter::new(RecordingHost::default());

        assert!(controller.on_click(b, &mut modal));
        assert_eq!(modal.phase(), ModalPhase::Open);
        assert_eq!(modal.session().kind, Some(ModalKind::Video));
        assert_eq!(modal.session().active_media_id.as_deref(), Some("abc123"));
        let mounted = &modal.host().video_mounts;
        assert_eq!(mounted.len(), 1);
        assert_eq!(mounted[0].remote_id, "abc123");
        assert_eq!(mounted[0].orientation, Orientation::Vertical);
        assert_eq!(state(&controller, b).1, PlayState::Paused);
    }

    #[test]
    fn click_without_remote_id_does_nothing() {
        let a = MediaId(0);
        let controller = controller_with(a, MediaSpec::default());
        let mut modal = ModalPresenter::new(RecordingHost::default());
        assert!(!controller.on_click(a, &mut modal));
        assert_eq!(modal.phase(), ModalPhase::Closed);
    }
}
