use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{HtmlMediaElement, HtmlVideoElement};
use yew::Callback;

use crate::error::describe_js;
use crate::media::{MediaElement, MediaId, PlayOutcome};

/// A preview `<video>` as the controller sees it.
pub struct WebVideo {
    id: MediaId,
    element: HtmlVideoElement,
    on_rejected: Callback<(MediaId, String)>,
}

impl WebVideo {
    pub fn new(id: MediaId, element: HtmlVideoElement, on_rejected: Callback<(MediaId, String)>) -> Self {
        // Previews are silent loops, browsers only autoplay muted media
        element.set_muted(true);
        element.set_loop(true);
        Self { id, element, on_rejected }
    }
}

impl MediaElement for WebVideo {
    fn assign_source(&mut self, url: &str) {
        self.element.set_src(url);
    }

    fn load(&mut self) {
        self.element.load();
    }

    fn play(&mut self) -> PlayOutcome {
        match self.element.play() {
            Ok(promise) => {
                let id = self.id;
                let on_rejected = self.on_rejected.clone();
                spawn_local(async move {
                    if let Err(err) = JsFuture::from(promise).await {
                        on_rejected.emit((id, describe_js(&err)));
                    }
                });
                PlayOutcome::Started
            }
            Err(err) => PlayOutcome::Rejected(describe_js(&err)),
        }
    }

    fn pause(&mut self) {
        let _ = self.element.pause();
    }

    fn rewind(&mut self) {
        self.element.set_current_time(0.0);
    }

    fn position(&self) -> f64 {
        self.element.current_time()
    }

    fn is_ready(&self) -> bool {
        self.element.ready_state() >= HtmlMediaElement::HAVE_CURRENT_DATA
    }

    fn is_paused(&self) -> bool {
        self.element.paused()
    }
}
