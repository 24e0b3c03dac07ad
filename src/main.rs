use log::info;
use wasm_bindgen::JsCast;
use web_sys::{window, Event, KeyboardEvent};
use yew::prelude::*;

mod config;
mod effects;
mod error;
mod media;
mod modal;
mod scramble;
mod site;
mod visibility;
mod web;
mod components {
    pub mod hero;
    pub mod media_grid;
    pub mod modals;
    pub mod nav;
    pub mod section_title;
}
mod pages {
    pub mod landing;
}

use components::nav::Nav;
use config::SiteConfig;
use pages::landing::Landing;
use site::SiteHandle;
use web::Listener;

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub site: SiteHandle,
}

#[function_component]
fn App(props: &AppProps) -> Html {
    let site = props.site.clone();

    {
        let site = site.clone();
        use_effect_with_deps(move |_| {
            let registered = site.install_effects(&effects::landing_scenes());
            info!("{} scroll effects registered", registered);

            let listeners: Vec<Listener> = match window().and_then(|window| window.document()) {
                Some(document) => {
                    let on_key = {
                        let site = site.clone();
                        Listener::new(&document, "keydown", move |event: Event| {
                            if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                                site.key(&event.key());
                            }
                        })
                    };
                    // Safety net: whatever the per-item state says, nothing plays in a hidden tab
                    let on_visibility = {
                        let site = site.clone();
                        let hidden_document = document.clone();
                        Listener::new(&document, "visibilitychange", move |_| {
                            if hidden_document.hidden() {
                                site.suspend(&hidden_document);
                            }
                        })
                    };
                    [on_key, on_visibility].into_iter().flatten().collect()
                }
                None => Vec::new(),
            };

            move || drop(listeners)
        }, ());
    }

    html! {
        <>
            <Nav scroll_threshold={site.config().nav_scroll_threshold} />
            <Landing site={site.clone()} />
        </>
    }
}

fn prefers_reduced_motion(window: &web_sys::Window) -> bool {
    window
        .match_media("(prefers-reduced-motion: reduce)")
        .ok()
        .flatten()
        .map(|query| query.matches())
        .unwrap_or(false)
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(config::log_level()).expect("error initializing log");

    let window = window().expect("no window");
    let document = window.document().expect("no document");
    let config = SiteConfig::load();
    info!(
        "Starting showreel with {} previews",
        config.portfolio.len() + config.editing.len()
    );

    let site = SiteHandle::new(document, config, prefers_reduced_motion(&window));
    yew::Renderer::<App>::with_props(AppProps { site }).render();
}
