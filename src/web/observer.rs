use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::Array;
use log::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};
use yew::Callback;

use crate::error::describe_js;
use crate::visibility::{ObserveConfig, VisibilityChange, VisibilityRecord, VisibilityTracker};

type Watched = Rc<RefCell<Vec<(u32, Element)>>>;

/// IntersectionObserver plus the tracker that turns its raw entries into
/// enter/exit flips. Disconnects on drop.
pub struct ViewportObserver {
    observer: Option<IntersectionObserver>,
    tracker: Rc<RefCell<VisibilityTracker<u32>>>,
    watched: Watched,
    next_key: Cell<u32>,
    on_change: Callback<(Element, bool)>,
    _callback: Option<Closure<dyn FnMut(Array, IntersectionObserver)>>,
}

impl ViewportObserver {
    pub fn new(config: ObserveConfig, on_change: Callback<(Element, bool)>) -> Self {
        let watched: Watched = Rc::new(RefCell::new(Vec::new()));
        let tracker = Rc::new(RefCell::new(VisibilityTracker::new(config.clone())));

        let callback = {
            let tracker = tracker.clone();
            let watched = watched.clone();
            let on_change = on_change.clone();
            Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
                let mut changes = Vec::new();
                for entry in entries.iter() {
                    let entry: IntersectionObserverEntry = entry.unchecked_into();
                    let target = entry.target();
                    let Some(key) = key_of(&watched, &target) else {
                        continue;
                    };
                    let record = VisibilityRecord {
                        is_intersecting: entry.is_intersecting(),
                        ratio: entry.intersection_ratio(),
                    };
                    let mut tracker = tracker.borrow_mut();
                    let change = tracker.record(&key, record);
                    if !tracker.is_observing(&key) {
                        observer.unobserve(&target);
                        watched.borrow_mut().retain(|(k, _)| *k != key);
                    }
                    if let Some(change) = change {
                        changes.push((target, change));
                    }
                }
                for (target, change) in changes {
                    on_change.emit((target, change == VisibilityChange::Entered));
                }
            }) as Box<dyn FnMut(Array, IntersectionObserver)>)
        };

        let init = IntersectionObserverInit::new();
        init.set_root_margin(&config.root_margin);
        let thresholds: Array = config.thresholds.iter().map(|t| JsValue::from_f64(*t)).collect();
        init.set_threshold(&thresholds);

        match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) {
            Ok(observer) => Self {
                observer: Some(observer),
                tracker,
                watched,
                next_key: Cell::new(0),
                on_change,
                _callback: Some(callback),
            },
            Err(err) => {
                warn!("IntersectionObserver unavailable ({}), treating everything as visible", describe_js(&err));
                Self {
                    observer: None,
                    tracker: Rc::new(RefCell::new(VisibilityTracker::degraded(config))),
                    watched,
                    next_key: Cell::new(0),
                    on_change,
                    _callback: None,
                }
            }
        }
    }

    pub fn observe(&self, element: &Element) {
        if key_of(&self.watched, element).is_some() {
            return;
        }
        let key = self.next_key.get();
        self.next_key.set(key + 1);

        let immediate = self.tracker.borrow_mut().observe(key);
        if self.tracker.borrow().is_observing(&key) {
            self.watched.borrow_mut().push((key, element.clone()));
            if let Some(observer) = &self.observer {
                observer.observe(element);
            }
        }
        if let Some(change) = immediate {
            self.on_change.emit((element.clone(), change.is_entered()));
        }
    }

    pub fn unobserve(&self, element: &Element) {
        let Some(key) = key_of(&self.watched, element) else {
            return;
        };
        self.tracker.borrow_mut().unobserve(&key);
        self.watched.borrow_mut().retain(|(k, _)| *k != key);
        if let Some(observer) = &self.observer {
            observer.unobserve(element);
        }
    }
}

impl Drop for ViewportObserver {
    fn drop(&mut self) {
        if let Some(observer) = &self.observer {
            observer.disconnect();
        }
    }
}

fn key_of(watched: &Watched, element: &Element) -> Option<u32> {
    watched
        .borrow()
        .iter()
        .find(|(_, watched)| watched.is_same_node(Some(element.as_ref())))
        .map(|(key, _)| *key)
}
