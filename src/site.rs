use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlMediaElement};
use yew::Callback;

use crate::config::SiteConfig;
use crate::effects::{self, EffectsOrchestrator, Effect, Scene};
use crate::media::{MediaController, MediaId, MediaSpec, Orientation, Transition};
use crate::modal::{ModalKind, ModalPresenter};
use crate::web::gsap::GsapEngine;
use crate::web::overlay::DomOverlay;
use crate::web::video::WebVideo;

/// Everything the page's behaviors share. Only reachable through [`SiteHandle`].
pub struct Site {
    media: MediaController<WebVideo>,
    modal: ModalPresenter<DomOverlay>,
    effects: EffectsOrchestrator,
    engine: GsapEngine,
}

#[derive(Clone)]
pub struct SiteHandle {
    inner: Rc<RefCell<Site>>,
    config: Rc<SiteConfig>,
}

impl PartialEq for SiteHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

fn preview_selector(id: MediaId) -> String {
    format!("[data-media-id=\"{}\"] video", id.0)
}

impl SiteHandle {
    pub fn new(document: Document, config: SiteConfig, reduced_motion: bool) -> Self {
        let overlay = DomOverlay::new(document, config.embed_url_template.clone(), config.game_url.clone());
        let site = Site {
            media: MediaController::new(),
            modal: ModalPresenter::new(overlay),
            effects: EffectsOrchestrator::new(reduced_motion),
            engine: GsapEngine::detect(),
        };
        Self {
            inner: Rc::new(RefCell::new(site)),
            config: Rc::new(config),
        }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Runs `f` on the site unless another callback already holds it.
    fn with<R>(&self, f: impl FnOnce(&mut Site) -> R) -> Option<R> {
        match self.inner.try_borrow_mut() {
            Ok(mut site) => Some(f(&mut site)),
            Err(_) => {
                warn!("site busy, event dropped");
                None
            }
        }
    }

    pub fn install_effects(&self, scenes: &[Scene]) -> usize {
        self.with(|site| site.effects.install(&mut site.engine, scenes)).unwrap_or(0)
    }

    pub fn animate(&self, effect: &Effect) {
        self.with(|site| site.effects.animate(&mut site.engine, effect));
    }

    pub fn register_video(&self, id: MediaId, spec: MediaSpec, element: web_sys::HtmlVideoElement) {
        let on_rejected = {
            let handle = self.clone();
            Callback::from(move |(id, reason): (MediaId, String)| {
                handle.with(|site| site.media.on_play_rejected(id, &reason));
            })
        };
        let video = WebVideo::new(id, element, on_rejected);
        self.with(|site| site.media.register(id, spec, video));
    }

    pub fn unregister_video(&self, id: MediaId) {
        self.with(|site| site.media.unregister(id));
    }

    pub fn viewport_entered(&self, id: MediaId) {
        self.with(|site| site.media.on_enter_viewport(id));
    }

    pub fn viewport_exited(&self, id: MediaId) {
        self.with(|site| site.media.on_exit_viewport(id));
    }

    pub fn hover_enter(&self, id: MediaId) {
        self.with(|site| {
            if site.media.on_hover_enter(id) == Transition::Playing {
                site.effects.animate(&mut site.engine, &effects::hover_scale(&preview_selector(id), 1.05));
            }
        });
    }

    pub fn hover_leave(&self, id: MediaId) {
        self.with(|site| {
            site.media.on_hover_leave(id);
            site.effects.animate(&mut site.engine, &effects::hover_scale(&preview_selector(id), 1.0));
        });
    }

    pub fn click(&self, id: MediaId) {
        self.with(|site| {
            if site.media.on_click(id, &mut site.modal) {
                site.media.pause_all();
                site.entrance(ModalKind::Video);
            }
        });
    }

    pub fn open_video(&self, remote_id: &str, orientation: Orientation) {
        self.with(|site| {
            if site.modal.open_video(remote_id, orientation) {
                site.media.pause_all();
                site.entrance(ModalKind::Video);
            }
        });
    }

    pub fn open_game(&self) {
        self.with(|site| {
            if site.modal.open_game() {
                site.media.pause_all();
                site.entrance(ModalKind::Game);
            }
        });
    }

    pub fn close_modal(&self) {
        self.with(|site| {
            if site.modal.close() {
                // The pointer may have landed on a card while the overlay was up
                site.media.pause_all();
            }
        });
    }

    pub fn key(&self, key: &str) {
        self.with(|site| {
            if site.modal.on_key(key) {
                site.media.pause_all();
            }
        });
    }

    /// Tab hidden: stop every video on the page, tracked or not.
    pub fn suspend(&self, document: &Document) {
        self.with(|site| site.media.suspend_all());
        if let Ok(videos) = document.query_selector_all("video") {
            for index in 0..videos.length() {
                if let Some(video) = videos.item(index).and_then(|node| node.dyn_into::<HtmlMediaElement>().ok()) {
                    let _ = video.pause();
                }
            }
        }
        debug!("page hidden, media suspended");
    }
}

impl Site {
    fn entrance(&mut self, kind: ModalKind) {
        let target = format!("#{} .modal-content", kind.element_id());
        self.effects.animate(&mut self.engine, &effects::modal_entrance(&target));
    }
}
