use web_sys::MouseEvent;
use yew::prelude::*;

use crate::components::hero::Hero;
use crate::components::media_grid::{GridVariant, MediaGrid};
use crate::components::modals::{GameModal, VideoModal};
use crate::components::section_title::SectionTitle;
use crate::effects;
use crate::site::SiteHandle;

const SERVICES: &[(&str, &str)] = &[
    ("Editing", "Story-first cuts for commercials, music videos and documentaries."),
    ("Motion Design", "Titles, kinetic type and animated graphics that match your brand."),
    ("Colour", "Grading that keeps every shot consistent across the whole piece."),
    ("Short Form", "Vertical edits built for the first three seconds of the feed."),
];

const PROCESS: &[(&str, &str)] = &[
    ("Brief", "We talk through goals, audience and references."),
    ("Rough Cut", "A first pass on structure and pacing within days."),
    ("Polish", "Sound, colour and motion details on the approved cut."),
    ("Delivery", "Masters and social versions in every format you need."),
];

#[derive(Properties, PartialEq)]
pub struct LandingProps {
    pub site: SiteHandle,
}

#[function_component(Landing)]
pub fn landing(props: &LandingProps) -> Html {
    let site = &props.site;
    let config = site.config();
    let reveal = config.reveal_threshold;

    let shapes_hover = |index: usize, scale: f64| {
        let site = site.clone();
        Callback::from(move |_: MouseEvent| {
            let target = format!(".service-card:nth-child({}) .abstract-shape", index + 1);
            site.animate(&effects::pulse(&target, scale, 0.4).stagger(0.05));
        })
    };

    html! {
        <main class="landing">
            <Hero site={site.clone()} />

            <section id="work" class="portfolio-section">
                <div class="section-header">
                    <SectionTitle text="Selected Work" reveal_threshold={reveal} />
                    <p class="section-subtitle">{"Hover to preview, click to watch the full cut."}</p>
                </div>
                <MediaGrid site={site.clone()} variant={GridVariant::Portfolio} entries={config.portfolio_entries()} />
            </section>

            <section id="editing" class="video-editing-section">
                <div class="section-header">
                    <SectionTitle text="Short Form" reveal_threshold={reveal} />
                </div>
                <MediaGrid site={site.clone()} variant={GridVariant::Editing} entries={config.editing_entries()} />
            </section>

            <section id="services" class="services-section">
                <div class="section-header">
                    <SectionTitle text="Services" reveal_threshold={reveal} />
                </div>
                <div class="services-container">
                    { for SERVICES.iter().enumerate().map(|(index, (title, body))| html! {
                        <div
                            class="service-card"
                            onmouseenter={shapes_hover(index, 1.2)}
                            onmouseleave={shapes_hover(index, 1.0)}
                        >
                            <div class="service-shapes">
                                <span class="abstract-shape"></span>
                                <span class="abstract-shape"></span>
                                <span class="abstract-shape"></span>
                            </div>
                            <h3>{*title}</h3>
                            <p>{*body}</p>
                        </div>
                    }) }
                </div>
            </section>

            <section id="process" class="process-section">
                <div class="process-intro">
                    <SectionTitle text="Process" reveal_threshold={reveal} />
                </div>
                <div class="process-layout">
                    <ol class="process-timeline">
                        { for PROCESS.iter().enumerate().map(|(index, (step, body))| html! {
                            <li class="timeline-item">
                                <span class="timeline-index">{format!("{:02}", index + 1)}</span>
                                <div class="timeline-body">
                                    <h4>{*step}</h4>
                                    <p>{*body}</p>
                                </div>
                                <span class="timeline-line"></span>
                            </li>
                        }) }
                    </ol>
                    <div class="process-visual">
                        <div class="portrait-frame">
                            <img src="/assets/portrait.jpg" alt="Danilo at the edit desk" loading="lazy" />
                        </div>
                    </div>
                </div>
            </section>

            <section id="contact" class="contact-section">
                <h2 class="contact-title">{"Let's make something."}</h2>
                <div class="contact-content">
                    <div class="calendly-container" data-url="https://calendly.com/danilo-motion/intro"></div>
                    <p class="contact-alternative">
                        {"Prefer email? "}
                        <a href="mailto:hello@danilomotion.com">{"hello@danilomotion.com"}</a>
                    </p>
                </div>
            </section>

            <VideoModal site={site.clone()} />
            <GameModal site={site.clone()} />
        </main>
    }
}
