use log::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element, HtmlElement, HtmlIFrameElement};

use crate::error::SiteError;
use crate::modal::{ModalKind, ModalPhase, OverlayHost, VideoEmbed};

const EMBED_HOST: &str = ".modal-embed";
const GAME_HOST: &str = ".modal-game-host";
const PHASE_CLASSES: [&str; 3] = ["active", "is-opening", "is-closing"];

/// The modal markup rendered by `components::modals`, driven imperatively.
pub struct DomOverlay {
    document: Document,
    embed_url_template: String,
    game_url: String,
    game_frame: Option<HtmlIFrameElement>,
    previous_focus: Option<HtmlElement>,
}

impl DomOverlay {
    pub fn new(document: Document, embed_url_template: String, game_url: String) -> Self {
        Self {
            document,
            embed_url_template,
            game_url,
            game_frame: None,
            previous_focus: None,
        }
    }

    fn modal(&self, kind: ModalKind) -> Option<Element> {
        self.document.get_element_by_id(kind.element_id())
    }

    fn host(&self, kind: ModalKind, selector: &str) -> Result<Element, SiteError> {
        self.modal(kind)
            .and_then(|modal| modal.query_selector(selector).ok().flatten())
            .ok_or_else(|| SiteError::MissingNode(format!("#{} {}", kind.element_id(), selector)))
    }

    fn frame(&self, src: &str, class: &str) -> Result<HtmlIFrameElement, SiteError> {
        let frame: HtmlIFrameElement = self.document.create_element("iframe")?.unchecked_into();
        frame.set_src(src);
        frame.set_class_name(class);
        frame.set_attribute("allow", "autoplay; fullscreen; picture-in-picture")?;
        frame.set_attribute("allowfullscreen", "")?;
        frame.set_attribute("frameborder", "0")?;
        Ok(frame)
    }

    fn post_to_game(&self, message: &str) {
        let Some(window) = self.game_frame.as_ref().and_then(|frame| frame.content_window()) else {
            return;
        };
        if let Err(err) = window.post_message(&JsValue::from_str(message), "*") {
            warn!("game did not accept {}: {}", message, SiteError::from(err));
        }
    }
}

impl OverlayHost for DomOverlay {
    fn has_node(&self, kind: ModalKind) -> bool {
        self.modal(kind).is_some()
    }

    fn project(&mut self, kind: ModalKind, phase: ModalPhase) {
        let Some(modal) = self.modal(kind) else {
            return;
        };
        let classes = modal.class_list();
        for class in PHASE_CLASSES {
            let _ = classes.remove_1(class);
        }
        let added: &[&str] = match phase {
            ModalPhase::Opening => &["active", "is-opening"],
            ModalPhase::Open => &["active"],
            ModalPhase::Closing => &["is-closing"],
            ModalPhase::Closed => &[],
        };
        for class in added {
            let _ = classes.add_1(class);
        }
        let hidden = if phase == ModalPhase::Closed { "true" } else { "false" };
        let _ = modal.set_attribute("aria-hidden", hidden);
    }

    fn set_scroll_lock(&mut self, locked: bool) {
        let Some(body) = self.document.body() else {
            return;
        };
        let style = body.style();
        let result = if locked {
            style.set_property("overflow", "hidden")
        } else {
            style.remove_property("overflow").map(|_| ())
        };
        if let Err(err) = result {
            warn!("scroll lock not applied: {}", SiteError::from(err));
        }
    }

    fn mount_video(&mut self, embed: &VideoEmbed) -> Result<(), SiteError> {
        let host = self.host(ModalKind::Video, EMBED_HOST)?;
        let frame = self.frame(&embed.src(&self.embed_url_template), "embed-frame")?;
        host.set_inner_html("");
        host.set_class_name(&format!("modal-embed {}", embed.frame_class()));
        host.set_attribute("style", &format!("aspect-ratio: {};", embed.aspect_ratio()))?;
        host.append_child(&frame)?;
        Ok(())
    }

    fn unmount_video(&mut self) {
        // Dropping the iframe is the only way to fully stop the remote player
        if let Ok(host) = self.host(ModalKind::Video, EMBED_HOST) {
            host.set_inner_html("");
        }
    }

    fn mount_game(&mut self) -> Result<(), SiteError> {
        let host = self.host(ModalKind::Game, GAME_HOST)?;
        let frame = self.frame(&self.game_url, "game-frame")?;
        host.append_child(&frame)?;
        self.game_frame = Some(frame);
        Ok(())
    }

    fn suspend_game(&mut self) {
        self.post_to_game("pause");
    }

    fn resume_game(&mut self) {
        self.post_to_game("resume");
    }

    fn focus(&mut self, kind: ModalKind) {
        self.previous_focus = self
            .document
            .active_element()
            .and_then(|element| element.dyn_into::<HtmlElement>().ok());

        let target = match kind {
            ModalKind::Game => self.game_frame.clone().map(HtmlElement::from),
            ModalKind::Video => None,
        }
        .or_else(|| {
            self.host(kind, ".modal-close")
                .ok()
                .and_then(|button| button.dyn_into::<HtmlElement>().ok())
        });
        if let Some(target) = target {
            let _ = target.focus();
        }
    }

    fn restore_focus(&mut self) {
        if let Some(element) = self.previous_focus.take() {
            let _ = element.focus();
        }
    }
}
