use std::collections::{BTreeMap, BTreeSet};

use log::{debug, info, warn};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::SiteError;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropValue {
    Number(f64),
    Text(String),
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Number(value)
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Text(value.to_string())
    }
}

/// Scroll-linked trigger for a tween. `trigger: None` means the animated
/// element triggers itself.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollTrigger {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
    pub start: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scrub: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toggle_actions: Option<String>,
}

impl ScrollTrigger {
    pub fn on(trigger: &str, start: &str) -> Self {
        Self {
            trigger: Some(trigger.to_string()),
            start: start.to_string(),
            ..Self::default()
        }
    }

    pub fn on_self(start: &str) -> Self {
        Self {
            start: start.to_string(),
            ..Self::default()
        }
    }

    pub fn until(mut self, end: &str) -> Self {
        self.end = Some(end.to_string());
        self
    }

    pub fn scrub(mut self, smoothing: f64) -> Self {
        self.scrub = Some(smoothing);
        self
    }

    pub fn toggle(mut self, actions: &str) -> Self {
        self.toggle_actions = Some(actions.to_string());
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Animate from the given props to the element's natural state.
    From,
    To,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Effect {
    pub target: String,
    pub direction: Direction,
    pub props: BTreeMap<String, PropValue>,
    pub duration: Option<f64>,
    pub delay: Option<f64>,
    pub stagger: Option<f64>,
    pub ease: Option<String>,
    pub scroll: Option<ScrollTrigger>,
    /// Timeline position, e.g. `"-=0.4"`.
    pub position: Option<String>,
    /// Run a separate tween for every element the target matches.
    pub each: bool,
}

impl Effect {
    fn new(target: &str, direction: Direction) -> Self {
        Self {
            target: target.to_string(),
            direction,
            props: BTreeMap::new(),
            duration: None,
            delay: None,
            stagger: None,
            ease: None,
            scroll: None,
            position: None,
            each: false,
        }
    }

    pub fn tween_from(target: &str) -> Self {
        Self::new(target, Direction::From)
    }

    pub fn tween_to(target: &str) -> Self {
        Self::new(target, Direction::To)
    }

    pub fn prop(mut self, name: &str, value: impl Into<PropValue>) -> Self {
        self.props.insert(name.to_string(), value.into());
        self
    }

    pub fn duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn delay(mut self, seconds: f64) -> Self {
        self.delay = Some(seconds);
        self
    }

    pub fn stagger(mut self, seconds: f64) -> Self {
        self.stagger = Some(seconds);
        self
    }

    pub fn ease(mut self, ease: &str) -> Self {
        self.ease = Some(ease.to_string());
        self
    }

    pub fn scroll(mut self, trigger: ScrollTrigger) -> Self {
        self.scroll = Some(trigger);
        self
    }

    pub fn at(mut self, position: &str) -> Self {
        self.position = Some(position.to_string());
        self
    }

    pub fn each(mut self) -> Self {
        self.each = true;
        self
    }

    /// The engine's vars object for this tween.
    pub fn vars(&self) -> Value {
        let mut vars = Map::new();
        for (name, value) in &self.props {
            vars.insert(name.clone(), json_value(value));
        }
        if let Some(duration) = self.duration {
            vars.insert("duration".to_string(), Value::from(duration));
        }
        if let Some(delay) = self.delay {
            vars.insert("delay".to_string(), Value::from(delay));
        }
        if let Some(stagger) = self.stagger {
            vars.insert("stagger".to_string(), Value::from(stagger));
        }
        if let Some(ease) = &self.ease {
            vars.insert("ease".to_string(), Value::from(ease.as_str()));
        }
        if let Some(scroll) = &self.scroll {
            let mut trigger = serde_json::to_value(scroll).unwrap_or(Value::Null);
            if scroll.trigger.is_none() && !self.each {
                if let Value::Object(fields) = &mut trigger {
                    fields.insert("trigger".to_string(), Value::from(self.target.as_str()));
                }
            }
            vars.insert("scrollTrigger".to_string(), trigger);
        }
        Value::Object(vars)
    }
}

fn json_value(value: &PropValue) -> Value {
    match value {
        PropValue::Number(number) => Value::from(*number),
        PropValue::Text(text) => Value::from(text.as_str()),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Timeline {
    pub ease: Option<String>,
    pub steps: Vec<Effect>,
}

impl Timeline {
    pub fn vars(&self) -> Value {
        match &self.ease {
            Some(ease) => serde_json::json!({ "defaults": { "ease": ease } }),
            None => serde_json::json!({}),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Motion {
    Tween(Effect),
    Timeline(Timeline),
}

/// A named, register-once animation.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub name: &'static str,
    pub motion: Motion,
}

impl Scene {
    pub fn tween(name: &'static str, effect: Effect) -> Self {
        Self { name, motion: Motion::Tween(effect) }
    }

    pub fn timeline(name: &'static str, ease: &str, steps: Vec<Effect>) -> Self {
        Self {
            name,
            motion: Motion::Timeline(Timeline {
                ease: Some(ease.to_string()),
                steps,
            }),
        }
    }
}

/// The animation library, whatever executes the tweens.
pub trait AnimationEngine {
    fn is_available(&self) -> bool;
    fn tween(&mut self, effect: &Effect) -> Result<(), SiteError>;
    fn timeline(&mut self, timeline: &Timeline) -> Result<(), SiteError>;
    /// Stop everything the engine is running or will run.
    fn freeze(&mut self);
}

#[derive(Debug, Default)]
pub struct EffectsOrchestrator {
    registered: BTreeSet<&'static str>,
    reduced_motion: bool,
    reported_missing: bool,
}

impl EffectsOrchestrator {
    pub fn new(reduced_motion: bool) -> Self {
        Self {
            reduced_motion,
            ..Self::default()
        }
    }

    #[cfg(test)]
    pub fn is_registered(&self, name: &str) -> bool {
        self.registered.contains(name)
    }

    fn usable<E: AnimationEngine>(&mut self, engine: &E) -> bool {
        if self.reduced_motion {
            return false;
        }
        if !engine.is_available() {
            if !self.reported_missing {
                warn!("animation engine not loaded, effects skipped");
                self.reported_missing = true;
            }
            return false;
        }
        true
    }

    pub fn register<E: AnimationEngine>(&mut self, engine: &mut E, scene: &Scene) -> bool {
        if self.registered.contains(scene.name) || !self.usable(engine) {
            return false;
        }
        let result = match &scene.motion {
            Motion::Tween(effect) => engine.tween(effect),
            Motion::Timeline(timeline) => engine.timeline(timeline),
        };
        match result {
            Ok(()) => {
                debug!("registered effect {}", scene.name);
                self.registered.insert(scene.name);
                true
            }
            Err(err) => {
                warn!("effect {} skipped: {}", scene.name, err);
                false
            }
        }
    }

    pub fn install<E: AnimationEngine>(&mut self, engine: &mut E, scenes: &[Scene]) -> usize {
        if self.reduced_motion {
            info!("reduced motion requested, entrance effects disabled");
            if engine.is_available() {
                engine.freeze();
            }
            return 0;
        }
        scenes.iter().filter(|scene| self.register(engine, scene)).count()
    }

    /// Fire-and-forget tween, e.g. a hover response.
    pub fn animate<E: AnimationEngine>(&mut self, engine: &mut E, effect: &Effect) {
        if !self.usable(engine) {
            return;
        }
        if let Err(err) = engine.tween(effect) {
            debug!("tween on {} failed: {}", effect.target, err);
        }
    }
}

pub fn pulse(target: &str, scale: f64, duration: f64) -> Effect {
    Effect::tween_to(target)
        .prop("scale", scale)
        .duration(duration)
        .ease("power2.out")
}

pub fn hover_scale(target: &str, scale: f64) -> Effect {
    pulse(target, scale, 0.6)
}

pub fn modal_entrance(target: &str) -> Effect {
    Effect::tween_from(target)
        .prop("scale", 0.9)
        .prop("opacity", 0.0)
        .duration(0.4)
        .ease("power2.out")
}

fn rise(target: &str, y: f64, duration: f64) -> Effect {
    Effect::tween_from(target)
        .prop("y", y)
        .prop("opacity", 0.0)
        .duration(duration)
}

fn drift(target: &str) -> Effect {
    Effect::tween_from(target)
        .prop("y", 50.0)
        .prop("opacity", 0.8)
        .scroll(ScrollTrigger::on_self("top 85%").until("top 50%").scrub(1.0))
        .each()
}

/// Entrance and scroll-linked effects for the landing page.
pub fn landing_scenes() -> Vec<Scene> {
    vec![
        Scene::timeline(
            "hero-entrance",
            "power3.out",
            vec![
                rise(".hero-badge", 30.0, 0.8).delay(0.2),
                rise(".headline-line-1", 50.0, 1.0).at("-=0.4"),
                rise(".headline-line-2", 80.0, 1.2).at("-=0.8"),
                rise(".headline-line-3", 30.0, 0.8).at("-=0.6"),
                rise(".hero-subline", 20.0, 0.8).at("-=0.4"),
                rise(".hero-cta-group", 20.0, 0.8).at("-=0.4"),
                rise(".stat-item", 20.0, 0.6).stagger(0.1).at("-=0.4"),
            ],
        ),
        Scene::tween(
            "hero-headline-parallax",
            Effect::tween_to(".hero-headline")
                .prop("y", 100.0)
                .prop("opacity", 0.3)
                .scroll(ScrollTrigger::on(".hero-section", "top top").until("bottom top").scrub(1.0)),
        ),
        Scene::tween(
            "hero-video-parallax",
            Effect::tween_to(".hero-video")
                .prop("scale", 1.1)
                .prop("filter", "blur(5px)")
                .scroll(ScrollTrigger::on(".hero-section", "top top").until("bottom top").scrub(1.0)),
        ),
        Scene::tween("portfolio-drift", drift(".portfolio-item")),
        Scene::tween("editing-drift", drift(".video-editing-item")),
        Scene::tween(
            "service-cards",
            rise(".service-card", 60.0, 0.8)
                .stagger(0.15)
                .ease("power3.out")
                .scroll(ScrollTrigger::on(".services-container", "top 80%")),
        ),
        Scene::tween(
            "process-steps",
            Effect::tween_from(".timeline-item")
                .prop("x", -30.0)
                .prop("opacity", 0.0)
                .duration(0.6)
                .stagger(0.2)
                .ease("power3.out")
                .scroll(ScrollTrigger::on(".process-timeline", "top 80%")),
        ),
        Scene::tween(
            "process-lines",
            Effect::tween_from(".timeline-item:not(:last-child) .timeline-line")
                .prop("scaleY", 0.0)
                .prop("transformOrigin", "top")
                .scroll(ScrollTrigger::on_self("top 70%").until("bottom 70%").scrub(1.0))
                .each(),
        ),
        Scene::tween(
            "portrait",
            Effect::tween_from(".portrait-frame")
                .prop("scale", 0.9)
                .prop("opacity", 0.8)
                .scroll(ScrollTrigger::on(".process-visual", "top 80%").until("center center").scrub(1.0)),
        ),
        Scene::tween(
            "section-reveal",
            rise(".section-header, .process-intro", 30.0, 0.8)
                .ease("power3.out")
                .scroll(ScrollTrigger::on_self("top 85%").toggle("play none none reverse"))
                .each(),
        ),
        Scene::tween(
            "contact-title",
            rise(".contact-title", 50.0, 1.0)
                .ease("power3.out")
                .scroll(ScrollTrigger::on(".contact-section", "top 70%")),
        ),
        Scene::tween(
            "contact-widget",
            rise(".calendly-container", 40.0, 0.8)
                .delay(0.2)
                .ease("power3.out")
                .scroll(ScrollTrigger::on(".contact-content", "top 80%")),
        ),
        Scene::tween(
            "contact-alternative",
            rise(".contact-alternative", 30.0, 0.8)
                .delay(0.4)
                .ease("power3.out")
                .scroll(ScrollTrigger::on(".contact-content", "top 80%")),
        ),
    ]
}
