use web_sys::{Element, HtmlVideoElement, MouseEvent};
use yew::prelude::*;

use crate::config::MediaEntry;
use crate::media::MediaId;
use crate::site::SiteHandle;
use crate::visibility::ObserveConfig;
use crate::web::observer::ViewportObserver;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum GridVariant {
    Portfolio,
    Editing,
}

impl GridVariant {
    fn item_class(self) -> &'static str {
        match self {
            GridVariant::Portfolio => "portfolio-item",
            GridVariant::Editing => "video-editing-item",
        }
    }

    fn video_class(self) -> &'static str {
        match self {
            GridVariant::Portfolio => "portfolio-video",
            GridVariant::Editing => "video-editing-video",
        }
    }

    fn grid_class(self) -> &'static str {
        match self {
            GridVariant::Portfolio => "portfolio-grid",
            GridVariant::Editing => "video-editing-grid",
        }
    }
}

/// Media id of the card a preview video sits in.
fn media_id_of(video: &Element) -> Option<MediaId> {
    video
        .closest("[data-media-id]")
        .ok()
        .flatten()
        .and_then(|card| card.get_attribute("data-media-id"))
        .and_then(|raw| raw.parse().ok())
        .map(MediaId)
}

#[derive(Properties, PartialEq)]
pub struct MediaGridProps {
    pub site: SiteHandle,
    pub variant: GridVariant,
    pub entries: Vec<(MediaId, MediaEntry)>,
}

#[function_component(MediaGrid)]
pub fn media_grid(props: &MediaGridProps) -> Html {
    let video_refs = use_state(|| props.entries.iter().map(|_| NodeRef::default()).collect::<Vec<_>>());

    {
        let site = props.site.clone();
        let entries = props.entries.clone();
        let video_refs = (*video_refs).clone();
        use_effect_with_deps(move |_| {
            let lazy = {
                let site = site.clone();
                ViewportObserver::new(
                    ObserveConfig::lazy_load(&site.config().lazy_root_margin),
                    Callback::from(move |(video, entered): (Element, bool)| {
                        if let (true, Some(id)) = (entered, media_id_of(&video)) {
                            site.viewport_entered(id);
                        }
                    }),
                )
            };
            let presence = {
                let site = site.clone();
                ViewportObserver::new(
                    ObserveConfig::presence(site.config().presence_threshold),
                    Callback::from(move |(video, entered): (Element, bool)| {
                        if let (false, Some(id)) = (entered, media_id_of(&video)) {
                            site.viewport_exited(id);
                        }
                    }),
                )
            };

            let mut registered = Vec::new();
            for ((id, entry), node) in entries.iter().zip(video_refs.iter()) {
                let Some(video) = node.cast::<HtmlVideoElement>() else {
                    continue;
                };
                // Register before observing, a degraded observer reports entry right away
                site.register_video(*id, entry.spec(), video.clone());
                lazy.observe(&video);
                presence.observe(&video);
                registered.push(*id);
            }

            move || {
                drop(lazy);
                drop(presence);
                for id in registered {
                    site.unregister_video(id);
                }
            }
        }, ());
    }

    let variant = props.variant;
    html! {
        <div class={variant.grid_class()}>
            { for props.entries.iter().zip(video_refs.iter()).map(|((id, entry), node)| {
                let id = *id;
                let on_enter = {
                    let site = props.site.clone();
                    Callback::from(move |_: MouseEvent| site.hover_enter(id))
                };
                let on_leave = {
                    let site = props.site.clone();
                    Callback::from(move |_: MouseEvent| site.hover_leave(id))
                };
                let on_click = {
                    let site = props.site.clone();
                    Callback::from(move |_: MouseEvent| site.click(id))
                };
                let preload = if entry.lazy { "none" } else { "auto" };

                html! {
                    <div
                        class={classes!(variant.item_class(), entry.remote_id.is_some().then(|| "has-full-cut"))}
                        data-media-id={id.0.to_string()}
                        onmouseenter={on_enter}
                        onmouseleave={on_leave}
                        onclick={on_click}
                    >
                        <div class="media-frame">
                            <video
                                ref={node.clone()}
                                class={variant.video_class()}
                                src={(!entry.lazy).then(|| entry.preview.clone())}
                                poster={entry.poster.clone()}
                                preload={preload}
                                muted={true}
                                playsinline={true}
                            />
                        </div>
                        <div class="item-meta">
                            <span class="item-category">{&entry.category}</span>
                            <h3 class="item-title">{&entry.title}</h3>
                        </div>
                    </div>
                }
            }) }
        </div>
    }
}
