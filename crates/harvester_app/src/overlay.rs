//! Renders the status overlay.
//!
//! The delivery mechanism is plain stdout; the content mirrors the
//! floating overlay the harvester shows in the host page.

use harvester_core::OverlayViewModel;

pub fn render(view: &OverlayViewModel) {
    for line in view.status_lines() {
        println!("[harvest] {line}");
    }
}
