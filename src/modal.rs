use log::{debug, warn};

use crate::error::SiteError;
use crate::media::Orientation;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModalKind {
    Video,
    Game,
}

impl ModalKind {
    pub fn element_id(self) -> &'static str {
        match self {
            ModalKind::Video => "videoModal",
            ModalKind::Game => "gameModal",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModalPhase {
    Closed,
    Opening,
    Open,
    Closing,
}

/// The one overlay the page may show.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModalSession {
    pub kind: Option<ModalKind>,
    pub active_media_id: Option<String>,
}

/// What the embed player needs to render a remote video.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoEmbed {
    pub remote_id: String,
    pub orientation: Orientation,
}

impl VideoEmbed {
    pub fn src(&self, template: &str) -> String {
        template.replace("{id}", &urlencoding::encode(&self.remote_id))
    }

    pub fn aspect_ratio(&self) -> &'static str {
        match self.orientation {
            Orientation::Horizontal => "16 / 9",
            Orientation::Vertical => "9 / 16",
        }
    }

    pub fn frame_class(&self) -> &'static str {
        match self.orientation {
            Orientation::Horizontal => "embed-horizontal",
            Orientation::Vertical => "embed-vertical",
        }
    }
}

/// DOM side of the overlays. The presenter decides, the host renders.
pub trait OverlayHost {
    fn has_node(&self, kind: ModalKind) -> bool;
    /// Reflect `phase` onto the modal's classes.
    fn project(&mut self, kind: ModalKind, phase: ModalPhase);
    fn set_scroll_lock(&mut self, locked: bool);
    fn mount_video(&mut self, embed: &VideoEmbed) -> Result<(), SiteError>;
    fn unmount_video(&mut self);
    fn mount_game(&mut self) -> Result<(), SiteError>;
    fn suspend_game(&mut self);
    fn resume_game(&mut self);
    fn focus(&mut self, kind: ModalKind);
    fn restore_focus(&mut self);
}

pub struct ModalPresenter<H> {
    host: H,
    phase: ModalPhase,
    session: ModalSession,
    game_mounted: bool,
}

impl<H: OverlayHost> ModalPresenter<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            phase: ModalPhase::Closed,
            session: ModalSession::default(),
            game_mounted: false,
        }
    }

    #[cfg(test)]
    pub fn phase(&self) -> ModalPhase {
        self.phase
    }

    #[cfg(test)]
    pub fn session(&self) -> &ModalSession {
        &self.session
    }

    pub fn is_open(&self) -> bool {
        self.phase == ModalPhase::Open
    }

    #[cfg(test)]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn open_video(&mut self, remote_id: &str, orientation: Orientation) -> bool {
        let embed = VideoEmbed {
            remote_id: remote_id.to_string(),
            orientation,
        };
        self.open(ModalKind::Video, Some(embed))
    }

    pub fn open_game(&mut self) -> bool {
        self.open(ModalKind::Game, None)
    }

    fn open(&mut self, kind: ModalKind, embed: Option<VideoEmbed>) -> bool {
        if !self.host.has_node(kind) {
            warn!("#{} missing, not opening", kind.element_id());
            return false;
        }
        if self.is_open() {
            self.close();
        }

        self.enter(kind, ModalPhase::Opening);
        if let Err(err) = self.mount(kind, embed.as_ref()) {
            warn!("{:?} modal content unavailable: {}", kind, err);
            self.enter(kind, ModalPhase::Closed);
            return false;
        }

        self.host.set_scroll_lock(true);
        self.session = ModalSession {
            kind: Some(kind),
            active_media_id: embed.map(|embed| embed.remote_id),
        };
        self.enter(kind, ModalPhase::Open);
        self.host.focus(kind);
        true
    }

    fn mount(&mut self, kind: ModalKind, embed: Option<&VideoEmbed>) -> Result<(), SiteError> {
        match (kind, embed) {
            (ModalKind::Video, Some(embed)) => self.host.mount_video(embed),
            (ModalKind::Video, None) => Err(SiteError::Unavailable("video embed")),
            (ModalKind::Game, _) if self.game_mounted => {
                self.host.resume_game();
                Ok(())
            }
            (ModalKind::Game, _) => {
                self.host.mount_game()?;
                self.game_mounted = true;
                Ok(())
            }
        }
    }

    pub fn close(&mut self) -> bool {
        let Some(kind) = self.session.kind else {
            return false;
        };
        if !self.is_open() {
            return false;
        }
        if !self.host.has_node(kind) {
            warn!("#{} missing, not closing", kind.element_id());
            return false;
        }

        if let Some(remote_id) = &self.session.active_media_id {
            debug!("stopping embed {}", remote_id);
        }
        self.enter(kind, ModalPhase::Closing);
        match kind {
            ModalKind::Video => self.host.unmount_video(),
            ModalKind::Game => self.host.suspend_game(),
        }
        self.host.set_scroll_lock(false);
        self.session = ModalSession::default();
        self.enter(kind, ModalPhase::Closed);
        self.host.restore_focus();
        true
    }

    /// Keyboard hook. Only Escape on an open modal does anything.
    pub fn on_key(&mut self, key: &str) -> bool {
        key == "Escape" && self.is_open() && self.close()
    }

    fn enter(&mut self, kind: ModalKind, phase: ModalPhase) {
        debug!("{:?} modal {:?} -> {:?}", kind, self.phase, phase);
        self.phase = phase;
        self.host.project(kind, phase);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Debug, Default)]
    pub struct RecordingHost {
        pub missing: Vec<ModalKind>,
        pub fail_video: bool,
        pub phases: Vec<(ModalKind, ModalPhase)>,
        pub video_mounts: Vec<VideoEmbed>,
        pub video_unmounts: usize,
        pub game_mounts: usize,
        pub game_suspends: usize,
        pub game_resumes: usize,
        pub scroll_locked: bool,
        pub focused: Option<ModalKind>,
    }

    impl OverlayHost for RecordingHost {
        fn has_node(&self, kind: ModalKind) -> bool {
            !self.missing.contains(&kind)
        }

        fn project(&mut self, kind: ModalKind, phase: ModalPhase) {
            self.phases.push((kind, phase));
        }

        fn set_scroll_lock(&mut self, locked: bool) {
            self.scroll_locked = locked;
        }

        fn mount_video(&mut self, embed: &VideoEmbed) -> Result<(), SiteError> {
            if self.fail_video {
                return Err(SiteError::Unavailable("embed player"));
            }
            self.video_mounts.push(embed.clone());
            Ok(())
        }

        fn unmount_video(&mut self) {
            self.video_unmounts += 1;
        }

        fn mount_game(&mut self) -> Result<(), SiteError> {
            self.game_mounts += 1;
            Ok(())
        }

        fn suspend_game(&mut self) {
            self.game_suspends += 1;
        }

        fn resume_game(&mut self) {
            self.game_resumes += 1;
        }

        fn focus(&mut self, kind: ModalKind) {
            self.focused = Some(kind);
        }

        fn restore_focus(&mut self) {
            self.focused = None;
        }
    }

    fn presenter() -> ModalPresenter<RecordingHost> {
        ModalPresenter::new(RecordingHost::default())
    }

    #[test]
    fn video_modal_opens_and_escape_closes() {
        let mut modal = presenter();
        assert!(modal.open_video("abc123", Orientation::Vertical));

        assert_eq!(
            modal.host().phases,
            vec![(ModalKind::Video, ModalPhase::Opening), (ModalKind::Video, ModalPhase::Open)]
        );
        assert_eq!(modal.host().video_mounts.len(), 1);
        assert_eq!(modal.host().video_mounts[0].remote_id, "abc123");
        assert_eq!(modal.host().video_mounts[0].aspect_ratio(), "9 / 16");
        assert!(modal.host().scroll_locked);
        assert_eq!(modal.host().focused, Some(ModalKind::Video));

        assert!(modal.on_key("Escape"));
        assert_eq!(
            modal.host().phases[2..],
            [(ModalKind::Video, ModalPhase::Closing), (ModalKind::Video, ModalPhase::Closed)]
        );
        assert_eq!(modal.host().video_unmounts, 1);
        assert!(!modal.host().scroll_locked);
        assert_eq!(modal.host().focused, None);
        assert_eq!(modal.session(), &ModalSession::default());
        assert_eq!(modal.phase(), ModalPhase::Closed);
    }

    #[test]
    fn escape_without_open_modal_is_ignored() {
        let mut modal = presenter();
        assert!(!modal.on_key("Escape"));
        assert!(modal.host().phases.is_empty());
        assert_eq!(modal.phase(), ModalPhase::Closed);
        assert!(!modal.close());
    }

    #[test]
    fn other_keys_leave_modal_open() {
        let mut modal = presenter();
        modal.open_game();
        assert!(!modal.on_key("Enter"));
        assert!(modal.is_open());
    }

    #[test]
    fn opening_a_second_modal_closes_the_first() {
        let mut modal = presenter();
        modal.open_video("abc123", Orientation::Horizontal);
        assert!(modal.open_game());

        assert_eq!(modal.phase(), ModalPhase::Open);
        assert_eq!(modal.session().kind, Some(ModalKind::Game));
        assert_eq!(modal.session().active_media_id, None);
        assert_eq!(modal.host().video_unmounts, 1);
        assert_eq!(
            modal.host().phases,
            vec![
                (ModalKind::Video, ModalPhase::Opening),
                (ModalKind::Video, ModalPhase::Open),
                (ModalKind::Video, ModalPhase::Closing),
                (ModalKind::Video, ModalPhase::Closed),
                (ModalKind::Game, ModalPhase::Opening),
                (ModalKind::Game, ModalPhase::Open),
            ]
        );
        assert!(modal.host().scroll_locked);
    }

    #[test]
    fn reopening_a_video_swaps_the_embed() {
        let mut modal = presenter();
        modal.open_video("first", Orientation::Horizontal);
        modal.open_video("second", Orientation::Vertical);
        assert_eq!(modal.host().video_mounts.len(), 2);
        assert_eq!(modal.host().video_unmounts, 1);
        assert_eq!(modal.session().active_media_id.as_deref(), Some("second"));
    }

    #[test]
    fn game_content_is_built_once() {
        let mut modal = presenter();
        for _ in 0..4 {
            assert!(modal.open_game());
            assert!(modal.close());
        }
        assert_eq!(modal.host().game_mounts, 1);
        assert_eq!(modal.host().game_resumes, 3);
        assert_eq!(modal.host().game_suspends, 4);
        assert!(!modal.host().scroll_locked);
    }

    #[test]
    fn missing_node_is_a_no_op() {
        let mut modal = ModalPresenter::new(RecordingHost {
            missing: vec![ModalKind::Game],
            ..RecordingHost::default()
        });
        assert!(!modal.open_game());
        assert_eq!(modal.phase(), ModalPhase::Closed);
        assert!(modal.host().phases.is_empty());

        modal.open_video("abc123", Orientation::Horizontal);
        assert!(!modal.open_game());
        assert_eq!(modal.session().kind, Some(ModalKind::Video));
    }

    #[test]
    fn failed_embed_rolls_back_to_closed() {
        let mut modal = ModalPresenter::new(RecordingHost {
            fail_video: true,
            ..RecordingHost::default()
        });
        assert!(!modal.open_video("abc123", Orientation::Horizontal));
        assert_eq!(modal.phase(), ModalPhase::Closed);
        assert!(!modal.host().scroll_locked);
        assert_eq!(modal.session().kind, None);
        assert_eq!(modal.host().phases.last(), Some(&(ModalKind::Video, ModalPhase::Closed)));
    }

    #[test]
    fn embed_src_encodes_identifier() {
        let embed = VideoEmbed {
            remote_id: "a b/c".to_string(),
            orientation: Orientation::Horizontal,
        };
        assert_eq!(embed.src("https://player.example/video/{id}?autoplay=1"), "https://player.example/video/a%20b%2Fc?autoplay=1");
        assert_eq!(embed.frame_class(), "embed-horizontal");
    }
}
