pub mod canvas;
pub mod host;
pub mod runner;
pub mod scene;
pub mod text;

pub use launchpad_fx as fx;

pub use canvas::CanvasSurface;
pub use host::WebHost;
pub use runner::EffectMount;
pub use scene::WebScene;
pub use text::CanvasTextRasterizer;

use wasm_bindgen::JsValue;

/// Best-effort message for a thrown JS value.
pub(crate) fn js_error(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

/// Seed for a mount's random generator, from the clock and `Math.random`.
pub fn entropy_seed() -> u64 {
    let now = js_sys::Date::now() as u64;
    let noise = (js_sys::Math::random() * u32::MAX as f64) as u64;
    (now << 20) ^ noise
}

/// Generate the `#[wasm_bindgen]` exports for one effect.
///
/// Generates a `thread_local!` map of mounts keyed by container id and the
/// `fx_mount`, `fx_unmount` and `fx_reconfigure` exports. Configs are JSON;
/// an empty string means defaults.
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use launchpad_fx::FlowField;
///
/// launchpad_web::export_effect!(FlowField, "flow-field");
/// ```
///
/// Effects that need more than `Type::new(config)` pass a constructor
/// returning `FxResult<Type>`:
///
/// ```ignore
/// launchpad_web::export_effect!(MyEffect, "my-effect", |config| MyEffect::build(config));
/// ```
#[macro_export]
macro_rules! export_effect {
    ($effect_type:ty, $effect_name:literal) => {
        $crate::export_effect!($effect_type, $effect_name, |config| Ok(<$effect_type>::new(config)));
    };

    ($effect_type:ty, $effect_name:literal, |$config:ident| $ctor:expr) => {
        use std::cell::RefCell;
        use std::collections::HashMap;

        thread_local! {
            static MOUNTS: RefCell<HashMap<String, $crate::EffectMount<$effect_type>>> =
                RefCell::new(HashMap::new());
        }

        fn build_effect(json: &str) -> $crate::fx::FxResult<$effect_type> {
            let $config: <$effect_type as $crate::fx::Effect>::Config = $crate::fx::parse_config(json)?;
            $ctor
        }

        /// Mount the effect on a new canvas inside `#container_id`.
        /// Returns false (and logs why) if it could not start.
        #[wasm_bindgen]
        pub fn fx_mount(container_id: &str, config_json: &str) -> bool {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            fx_unmount(container_id);
            let mounted = build_effect(config_json).and_then(|effect| {
                $crate::EffectMount::mount(container_id, effect, $crate::entropy_seed())
            });
            match mounted {
                Ok(mount) => {
                    MOUNTS.with(|cell| {
                        cell.borrow_mut().insert(container_id.to_string(), mount);
                    });
                    log::info!("{}: mounted in #{}", $effect_name, container_id);
                    true
                }
                Err(err) => {
                    log::warn!("{}: mount failed: {}", $effect_name, err);
                    false
                }
            }
        }

        #[wasm_bindgen]
        pub fn fx_unmount(container_id: &str) {
            let removed = MOUNTS.with(|cell| cell.borrow_mut().remove(container_id));
            if let Some(mount) = removed {
                mount.unmount();
            }
        }

        /// Returns true when the new config differs and was applied.
        #[wasm_bindgen]
        pub fn fx_reconfigure(container_id: &str, config_json: &str) -> bool {
            let config = match $crate::fx::parse_config::<<$effect_type as $crate::fx::Effect>::Config>(config_json) {
                Ok(config) => config,
                Err(err) => {
                    log::warn!("{}: {}", $effect_name, err);
                    return false;
                }
            };
            MOUNTS.with(|cell| {
                cell.borrow()
                    .get(container_id)
                    .map_or(false, |mount| mount.reconfigure(config))
            })
        }
    };
}
