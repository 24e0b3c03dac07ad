use js_sys::Reflect;
use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::effects::{AnimationEngine, Direction, Effect, Timeline};
use crate::error::SiteError;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = gsap, js_name = from, catch)]
    fn gsap_from(target: &JsValue, vars: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = gsap, js_name = to, catch)]
    fn gsap_to(target: &JsValue, vars: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = gsap, js_name = timeline, catch)]
    fn gsap_timeline(vars: &JsValue) -> Result<GsapTimeline, JsValue>;

    #[wasm_bindgen(js_namespace = gsap, js_name = registerPlugin, catch)]
    fn gsap_register_plugin(plugin: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(js_namespace = ["gsap", "globalTimeline"], js_name = pause, catch)]
    fn gsap_pause_global() -> Result<JsValue, JsValue>;

    type GsapTimeline;

    #[wasm_bindgen(method, js_name = from, catch)]
    fn add_from(this: &GsapTimeline, target: &JsValue, vars: &JsValue, position: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, js_name = to, catch)]
    fn add_to(this: &GsapTimeline, target: &JsValue, vars: &JsValue, position: &JsValue) -> Result<JsValue, JsValue>;
}

fn global(name: &str) -> Option<JsValue> {
    Reflect::get(&js_sys::global(), &JsValue::from_str(name))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

fn to_js(vars: &Value) -> Result<JsValue, SiteError> {
    Ok(vars.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?)
}

/// GSAP as loaded by the page's `<script>` tags.
pub struct GsapEngine {
    available: bool,
}

impl GsapEngine {
    pub fn detect() -> Self {
        let available = global("gsap").is_some();
        if available {
            match global("ScrollTrigger") {
                Some(plugin) => {
                    if let Err(err) = gsap_register_plugin(&plugin) {
                        warn!("ScrollTrigger registration failed: {}", SiteError::from(err));
                    }
                }
                None => warn!("ScrollTrigger plugin missing, scroll effects will play immediately"),
            }
        }
        debug!("gsap available: {}", available);
        Self { available }
    }

    fn elements(selector: &str) -> Result<Vec<Element>, SiteError> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or(SiteError::Unavailable("document"))?;
        let nodes = document.query_selector_all(selector)?;
        Ok((0..nodes.length())
            .filter_map(|index| nodes.item(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect())
    }

    fn run(direction: Direction, target: &JsValue, vars: &JsValue) -> Result<(), SiteError> {
        match direction {
            Direction::From => gsap_from(target, vars)?,
            Direction::To => gsap_to(target, vars)?,
        };
        Ok(())
    }
}

impl AnimationEngine for GsapEngine {
    fn is_available(&self) -> bool {
        self.available
    }

    fn tween(&mut self, effect: &Effect) -> Result<(), SiteError> {
        let vars = effect.vars();
        if !effect.each {
            return Self::run(effect.direction, &JsValue::from_str(&effect.target), &to_js(&vars)?);
        }

        // One tween per element, each element triggering its own scroll animation
        for element in Self::elements(&effect.target)? {
            let vars = to_js(&vars)?;
            if effect.scroll.is_some() {
                let trigger = Reflect::get(&vars, &JsValue::from_str("scrollTrigger"))?;
                Reflect::set(&trigger, &JsValue::from_str("trigger"), &element)?;
            }
            Self::run(effect.direction, &element, &vars)?;
        }
        Ok(())
    }

    fn timeline(&mut self, timeline: &Timeline) -> Result<(), SiteError> {
        let handle = gsap_timeline(&to_js(&timeline.vars())?)?;
        for step in &timeline.steps {
            let target = JsValue::from_str(&step.target);
            let vars = to_js(&step.vars())?;
            let position = step
                .position
                .as_deref()
                .map(JsValue::from_str)
                .unwrap_or(JsValue::UNDEFINED);
            match step.direction {
                Direction::From => handle.add_from(&target, &vars, &position)?,
                Direction::To => handle.add_to(&target, &vars, &position)?,
            };
        }
        Ok(())
    }

    fn freeze(&mut self) {
        if let Err(err) = gsap_pause_global() {
            warn!("could not pause animations: {}", SiteError::from(err));
        }
    }
}
