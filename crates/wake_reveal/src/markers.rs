//! Development trigger markers
//!
//! A line at the trigger threshold and a label describing the trigger,
//! drawn inside the revealed element. Only attached in development builds.

use wake_core::{Element, Overlay};

use crate::options::RevealOptions;

pub const LINE_KEY: &str = "wake-reveal-marker-line";
pub const LABEL_KEY: &str = "wake-reveal-marker-label";

/// Label text, e.g. `reveal 15% | 0px 0px -10% 0px | once`
pub fn label(options: &RevealOptions) -> String {
    format!(
        "reveal {:.0}% | {} | {}",
        options.threshold * 100.0,
        options.root_margin,
        if options.once { "once" } else { "repeat" }
    )
}

pub fn attach(element: &dyn Element, options: &RevealOptions) {
    element.attach_overlay(Overlay::line(LINE_KEY, options.threshold * 100.0));
    element.attach_overlay(Overlay::label(LABEL_KEY, label(options)));
}

pub fn detach(element: &dyn Element) {
    element.detach_overlay(LINE_KEY);
    element.detach_overlay(LABEL_KEY);
}
