use launchpad_fx::AiTools;
use wasm_bindgen::prelude::*;

launchpad_web::export_effect!(AiTools, "ai-tools");
