use web_sys::MouseEvent;
use yew::prelude::*;

use crate::modal::ModalKind;
use crate::site::SiteHandle;

// Phase classes (`active`, `is-opening`, `is-closing`) are applied by the
// overlay host, these components only render the static structure.

#[derive(Properties, PartialEq)]
pub struct ModalProps {
    pub site: SiteHandle,
}

fn close_callback(site: &SiteHandle) -> Callback<MouseEvent> {
    let site = site.clone();
    Callback::from(move |_: MouseEvent| site.close_modal())
}

#[function_component(VideoModal)]
pub fn video_modal(props: &ModalProps) -> Html {
    let close = close_callback(&props.site);
    html! {
        <div id={ModalKind::Video.element_id()} class="video-modal" aria-hidden="true">
            <div class="modal-backdrop" onclick={close.clone()}></div>
            <div class="modal-content" role="dialog" aria-modal="true" aria-label="Video player">
                <button class="modal-close" aria-label="Close" onclick={close}>{"×"}</button>
                <div class="modal-embed"></div>
            </div>
        </div>
    }
}

#[function_component(GameModal)]
pub fn game_modal(props: &ModalProps) -> Html {
    let close = close_callback(&props.site);
    html! {
        <div id={ModalKind::Game.element_id()} class="game-modal" aria-hidden="true">
            <div class="modal-backdrop" onclick={close.clone()}></div>
            <div class="modal-content" role="dialog" aria-modal="true" aria-label="Snake">
                <button class="modal-close" aria-label="Close" onclick={close}>{"×"}</button>
                <div class="modal-game-host"></div>
            </div>
        </div>
    }
}
