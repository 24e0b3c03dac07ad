use web_sys::MouseEvent;
use yew::prelude::*;

use crate::components::nav::scroll_to_anchor;
use crate::effects;
use crate::site::SiteHandle;

#[derive(Properties, PartialEq)]
pub struct HeroProps {
    pub site: SiteHandle,
}

#[function_component(Hero)]
pub fn hero(props: &HeroProps) -> Html {
    let video_loaded = use_state(|| false);

    let on_loaded = {
        let video_loaded = video_loaded.clone();
        Callback::from(move |_: Event| video_loaded.set(true))
    };

    let open_showreel = {
        let site = props.site.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(reel) = site.config().showreel.clone() {
                site.open_video(&reel.id, reel.orientation);
            }
        })
    };

    let open_game = {
        let site = props.site.clone();
        Callback::from(move |_: MouseEvent| site.open_game())
    };

    let headline_hover = |line: &'static str, scale: f64| {
        let site = props.site.clone();
        Callback::from(move |_: MouseEvent| {
            site.animate(&effects::pulse(line, scale, 0.3));
        })
    };

    let lines = [
        (".headline-line-1", "headline-line headline-line-1", "Cuts"),
        (".headline-line-2", "headline-line headline-line-2", "that move"),
        (".headline-line-3", "headline-line headline-line-3", "people."),
    ];

    html! {
        <section id="top" class="hero-section">
            <video
                class={classes!("hero-video", (*video_loaded).then(|| "loaded"))}
                src="/assets/hero.mp4"
                autoplay={true}
                muted={true}
                loop={true}
                playsinline={true}
                onloadeddata={on_loaded}
            />
            <div class="hero-overlay"></div>
            <div class="hero-content">
                <span class="hero-badge">{"Video Editor & Motion Designer"}</span>
                <h1 class="hero-headline">
                    { for lines.iter().map(|(selector, class, text)| html! {
                        <span
                            class={*class}
                            onmouseenter={headline_hover(*selector, 1.02)}
                            onmouseleave={headline_hover(*selector, 1.0)}
                        >
                            {*text}
                        </span>
                    }) }
                </h1>
                <p class="hero-subline">
                    {"Editing, colour and motion for brands, artists and creators."}
                </p>
                <div class="hero-cta-group">
                    <button class="cta-showreel" onclick={open_showreel}>{"Watch showreel"}</button>
                    <a href="#contact" class="cta-contact" onclick={Callback::from(|e: MouseEvent| {
                        e.prevent_default();
                        scroll_to_anchor("#contact");
                    })}>
                        {"Book a call"}
                    </a>
                    <button class="cta-game" onclick={open_game}>{"Take a break"}</button>
                </div>
                <div class="hero-stats">
                    <div class="stat-item"><strong>{"8+"}</strong><span>{"years editing"}</span></div>
                    <div class="stat-item"><strong>{"300+"}</strong><span>{"projects delivered"}</span></div>
                    <div class="stat-item"><strong>{"40M"}</strong><span>{"views generated"}</span></div>
                </div>
            </div>
        </section>
    }
}
