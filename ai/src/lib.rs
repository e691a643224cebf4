//! Umbrella crate that re-exports the `ai-*` building blocks.
//!
//! - [`core`]: actions, results, the event and query trees, and `Behavior`
//! - [`tools`]: transition trace events and sinks
//! - [`intention`]: components, throttling, bots and the per-frame manager

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

#[cfg(feature = "core")]
#[cfg_attr(docsrs, doc(cfg(feature = "core")))]
pub use ai_core as core;

#[cfg(feature = "tools")]
#[cfg_attr(docsrs, doc(cfg(feature = "tools")))]
pub use ai_tools as tools;

#[cfg(feature = "intention")]
#[cfg_attr(docsrs, doc(cfg(feature = "intention")))]
pub use ai_intention as intention;

/// The names most hosts need.
#[cfg(feature = "core")]
#[cfg_attr(docsrs, doc(cfg(feature = "core")))]
pub mod prelude {
    pub use ai_core::{
        Action, ActionId, ActionResult, Actor, Behavior, BotEvent, ContextualQuery,
        EventPriority, EventResponder, EventResult, QueryAnswer, ResultKind,
    };

    #[cfg(feature = "intention")]
    pub use ai_intention::{Bot, BotManager, Component, DriverConfig, Intention};
}
