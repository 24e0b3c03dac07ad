use gloo_timers::callback::Timeout;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use web_sys::Element;
use yew::prelude::*;

use crate::scramble::{Cell, TextScramble};
use crate::visibility::ObserveConfig;
use crate::web::observer::ViewportObserver;

const FRAME_MS: u32 = 16;

fn seed() -> u64 {
    (js_sys::Math::random() * u64::MAX as f64) as u64
}

fn next_frame(mut scramble: TextScramble, mut rng: SmallRng, cells: UseStateHandle<Option<Vec<Cell>>>) {
    let (frame, done) = scramble.tick(&mut rng);
    cells.set(Some(frame));
    if !done {
        Timeout::new(FRAME_MS, move || next_frame(scramble, rng, cells)).forget();
    }
}

#[derive(Properties, PartialEq)]
pub struct SectionTitleProps {
    pub text: AttrValue,
    pub reveal_threshold: f64,
}

/// Section heading that decodes itself the first time it is half on screen.
#[function_component(SectionTitle)]
pub fn section_title(props: &SectionTitleProps) -> Html {
    let node = use_node_ref();
    let cells = use_state(|| None::<Vec<Cell>>);

    {
        let node = node.clone();
        let cells = cells.clone();
        let text = props.text.clone();
        let threshold = props.reveal_threshold;
        use_effect_with_deps(move |_| {
            let observer = node.cast::<Element>().map(|title| {
                let observer = ViewportObserver::new(
                    ObserveConfig::reveal(threshold),
                    Callback::from(move |(_, entered): (Element, bool)| {
                        if entered {
                            let mut rng = SmallRng::seed_from_u64(seed());
                            let scramble = TextScramble::new(&text, &text, &mut rng);
                            next_frame(scramble, rng, cells.clone());
                        }
                    }),
                );
                observer.observe(&title);
                observer
            });

            move || drop(observer)
        }, ());
    }

    let content = match &*cells {
        Some(cells) => cells
            .iter()
            .map(|cell| match cell {
                Cell::Settled(c) => html! { {c.to_string()} },
                Cell::Noise(c) => html! { <span class="scramble-char">{c.to_string()}</span> },
            })
            .collect::<Html>(),
        None => html! { {props.text.clone()} },
    };

    html! {
        <h2 ref={node} class="section-title">{content}</h2>
    }
}
