//! Headless intersection observers

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Weak};

use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::events::{
    IntersectionCallback, IntersectionEntry, IntersectionObserver, IntersectionObserverFactory,
    ObserverInit,
};
use crate::host::{Element, ElementId, ElementRef};

/// Observer whose entries are driven by the test, not by layout
pub struct HeadlessObserver {
    init: ObserverInit,
    callback: IntersectionCallback,
    /// Observed targets with the last `is_intersecting` delivered for each
    targets: Mutex<FxHashMap<ElementId, Option<bool>>>,
    connected: AtomicBool,
}

impl HeadlessObserver {
    pub fn init(&self) -> &ObserverInit {
        &self.init
    }

    pub fn is_observing(&self, target: ElementId) -> bool {
        self.connected.load(Ordering::SeqCst) && self.targets.lock().unwrap().contains_key(&target)
    }

    fn deliver(&self, target: ElementId, ratio: f64) {
        if !self.connected.load(Ordering::SeqCst) {
            return;
        }

        let is_intersecting = ratio > 0.0 && ratio >= self.init.min_threshold();
        let changed = {
            let mut targets = self.targets.lock().unwrap();
            match targets.get_mut(&target) {
                Some(last) if *last != Some(is_intersecting) => {
                    *last = Some(is_intersecting);
                    true
                }
                _ => false,
            }
        };

        if changed {
            (self.callback)(&[IntersectionEntry {
                target,
                is_intersecting,
                intersection_ratio: ratio,
            }]);
        }
    }
}

impl IntersectionObserver for HeadlessObserver {
    fn observe(&self, target: &ElementRef) {
        self.connected.store(true, Ordering::SeqCst);
        self.targets
            .lock()
            .unwrap()
            .entry(target.id())
            .or_insert(None);
    }

    fn unobserve(&self, target: &ElementRef) {
        self.targets.lock().unwrap().remove(&target.id());
    }

    fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
        self.targets.lock().unwrap().clear();
    }
}

/// Factory recording every observer it creates
#[derive(Default)]
pub struct HeadlessObserverFactory {
    observers: Mutex<Vec<Weak<HeadlessObserver>>>,
    created: AtomicUsize,
}

impl HeadlessObserverFactory {
    /// Number of observers ever constructed
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    /// Whether any live, connected observer watches `target`
    pub fn is_observed(&self, target: ElementId) -> bool {
        self.live().iter().any(|o| o.is_observing(target))
    }

    fn live(&self) -> Vec<Arc<HeadlessObserver>> {
        let mut observers = self.observers.lock().unwrap();
        observers.retain(|o| o.strong_count() > 0);
        observers.iter().filter_map(Weak::upgrade).collect()
    }

    pub(crate) fn deliver(&self, target: ElementId, ratio: f64) {
        // Callbacks may unobserve or create observers; never hold the list lock
        for observer in self.live() {
            observer.deliver(target, ratio);
        }
    }
}

impl IntersectionObserverFactory for HeadlessObserverFactory {
    fn create(
        &self,
        init: ObserverInit,
        callback: IntersectionCallback,
    ) -> Result<Arc<dyn IntersectionObserver>> {
        init.validate()?;

        let observer = Arc::new(HeadlessObserver {
            init,
            callback,
            targets: Mutex::new(FxHashMap::default()),
            connected: AtomicBool::new(true),
        });
        self.observers.lock().unwrap().push(Arc::downgrade(&observer));
        self.created.fetch_add(1, Ordering::SeqCst);
        tracing::trace!(created = self.created(), "headless observer created");

        Ok(observer)
    }
}
