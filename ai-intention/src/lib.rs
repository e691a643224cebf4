//! Driving loop for [`ai_core::Behavior`] stacks.
//!
//! A [`Bot`] owns one actor and an ordered list of [`Component`]s. The host calls
//! [`BotManager::frame`] once per server frame; each bot decrements its countdowns and,
//! when its update rate allows, updates every component whose own interval has elapsed.
//! [`Intention`] is the component that owns an action stack.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod bot;
pub mod component;
pub mod config;
pub mod error;
pub mod intention;
pub mod manager;
pub mod throttle;

pub use bot::Bot;
pub use component::{Component, DEFAULT_UPDATE_INTERVAL};
pub use config::DriverConfig;
pub use error::{ConfigError, RegistryError};
pub use intention::{ActionFactory, Intention, INTENTION_UPDATE_INTERVAL};
pub use manager::BotManager;
pub use throttle::{time_to_ticks, UpdateThrottle};
