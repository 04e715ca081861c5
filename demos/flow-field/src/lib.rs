use launchpad_fx::FlowField;
use wasm_bindgen::prelude::*;

launchpad_web::export_effect!(FlowField, "flow-field");
