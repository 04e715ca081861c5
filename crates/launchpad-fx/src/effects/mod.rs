//! The canvas effects. Each one is an [`Effect`](crate::api::effect::Effect)
//! with a serde config; the frame driver runs them.

pub mod ai_tools;
pub mod flow_field;
pub mod orbital;
pub mod text_morph;

pub use ai_tools::{AiTools, AiToolsConfig, Phase};
pub use flow_field::{FlowField, FlowFieldConfig};
pub use orbital::{OrbitalConfig, OrbitalTimeline, TimelineItem};
pub use text_morph::{TextMorph, TextMorphConfig};
