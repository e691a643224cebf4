#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Tags used by the engine for lifecycle transitions.
pub mod tags {
    pub const STARTING: &str = "STARTING";
    pub const ENDING: &str = "ENDING";
    pub const SUSPENDING: &str = "SUSPENDING";
    pub const RESUMING: &str = "RESUMING";
    pub const CHANGE_TO: &str = "CHANGE_TO";
    pub const SUSPEND_FOR: &str = "SUSPEND_FOR";
    pub const DONE: &str = "DONE";
}

/// One recorded transition.
///
/// Plain data so it can be captured during simulation and rendered later. `action` is
/// the node the transition happened to; `other` is the node on the far side of it
/// (the replacement, the interrupter, the one being resumed).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceEvent {
    pub tick: u64,
    pub actor: u64,
    pub tag: Cow<'static, str>,
    pub action: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub other: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub reason: Option<String>,
}

impl TraceEvent {
    pub fn new(tick: u64, tag: impl Into<Cow<'static, str>>, action: impl Into<String>) -> Self {
        Self {
            tick,
            actor: 0,
            tag: tag.into(),
            action: action.into(),
            other: None,
            reason: None,
        }
    }

    pub fn with_actor(mut self, actor: u64) -> Self {
        self.actor = actor;
        self
    }

    pub fn with_other(mut self, other: impl Into<String>) -> Self {
        self.other = Some(other.into());
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

pub trait TraceSink {
    fn emit(&mut self, event: TraceEvent);
}

#[derive(Debug, Default)]
pub struct NullTraceSink;

impl TraceSink for NullTraceSink {
    fn emit(&mut self, _event: TraceEvent) {}
}

#[derive(Debug, Default)]
pub struct VecTraceSink {
    pub events: Vec<TraceEvent>,
}

impl TraceSink for VecTraceSink {
    fn emit(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceLog {
    pub events: Vec<TraceEvent>,
}

impl TraceLog {
    pub fn push(&mut self, event: TraceEvent) {
        self.events.push(event);
    }

    /// Events carrying `tag`, in recording order.
    pub fn with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a TraceEvent> + 'a {
        self.events.iter().filter(move |e| e.tag == tag)
    }

    /// `"TAG action"` per event; handy for asserting on a whole run.
    pub fn lines(&self) -> Vec<String> {
        self.events
            .iter()
            .map(|e| format!("{} {}", e.tag, e.action))
            .collect()
    }
}

impl TraceSink for TraceLog {
    fn emit(&mut self, event: TraceEvent) {
        self.push(event);
    }
}
