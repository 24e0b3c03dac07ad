use web_sys::{window, MouseEvent, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};
use yew::prelude::*;

use crate::web::Listener;

const LINKS: &[(&str, &str)] = &[
    ("#work", "Work"),
    ("#editing", "Editing"),
    ("#services", "Services"),
    ("#process", "Process"),
    ("#contact", "Contact"),
];

/// Smoothly scrolls to the element an in-page `#anchor` points at.
pub fn scroll_to_anchor(anchor: &str) {
    let Some(target) = window()
        .and_then(|window| window.document())
        .and_then(|document| document.query_selector(anchor).ok().flatten())
    else {
        return;
    };
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    options.set_block(ScrollLogicalPosition::Start);
    target.scroll_into_view_with_scroll_into_view_options(&options);
}

#[derive(Properties, PartialEq)]
pub struct NavProps {
    pub scroll_threshold: f64,
}

#[function_component(Nav)]
pub fn nav(props: &NavProps) -> Html {
    let menu_open = use_state(|| false);
    let is_scrolled = use_state(|| false);

    {
        let is_scrolled = is_scrolled.clone();
        let threshold = props.scroll_threshold;
        use_effect_with_deps(move |_| {
            let listener = window().and_then(|window| {
                let scrolled_window = window.clone();
                Listener::new(&window, "scroll", move |_| {
                    let offset = scrolled_window.scroll_y().unwrap_or(0.0);
                    is_scrolled.set(offset > threshold);
                })
            });

            move || drop(listener)
        }, ());
    }

    let toggle_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            menu_open.set(!*menu_open);
        })
    };

    let menu_class = if *menu_open {
        "nav-right mobile-menu-open"
    } else {
        "nav-right"
    };

    html! {
        <nav class={classes!("main-nav", (*is_scrolled).then(|| "scrolled"))}>
            <div class="nav-content">
                <a href="#top" class="nav-logo" onclick={Callback::from(|e: MouseEvent| {
                    e.prevent_default();
                    scroll_to_anchor("#top");
                })}>
                    {"DANILO"}
                </a>

                <button class="burger-menu" onclick={toggle_menu}>
                    <span></span>
                    <span></span>
                    <span></span>
                </button>
                <div class={menu_class}>
                    { for LINKS.iter().map(|(anchor, label)| {
                        let menu_open = menu_open.clone();
                        let onclick = Callback::from(move |e: MouseEvent| {
                            e.prevent_default();
                            menu_open.set(false);
                            scroll_to_anchor(anchor);
                        });
                        html! {
                            <a href={*anchor} class="nav-link" {onclick}>{*label}</a>
                        }
                    }) }
                </div>
            </div>
        </nav>
    }
}
