//! Tooling primitives for inspecting action stacks.
//!
//! Nothing here depends on the engine. The engine turns its transitions into
//! [`TraceEvent`]s and hands them to whatever [`TraceSink`] the host installed.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{tags, NullTraceSink, TraceEvent, TraceLog, TraceSink, VecTraceSink};
