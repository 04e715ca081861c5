use launchpad_fx::OrbitalTimeline;
use wasm_bindgen::prelude::*;

launchpad_web::export_effect!(OrbitalTimeline, "orbital-timeline");
