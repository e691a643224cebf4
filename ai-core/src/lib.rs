//! Hierarchical action-stack engine for autonomous agents.
//!
//! An agent's behavior is a stack of [`Action`]s owned by a [`Behavior`]. Each tick the
//! top action runs and answers with an [`ActionResult`]: keep going, replace itself,
//! push an interrupting action on top, or finish and resume whatever it covered.
//! Events arrive through [`EventResponder`] and are arbitrated by [`EventPriority`]
//! before the next tick applies them; [`ContextualQuery`] answers questions from the
//! innermost active action outwards.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod action;
pub mod actor;
pub mod arena;
pub mod behavior;
pub mod error;
mod node;
pub mod query;
pub mod responder;
pub mod result;

pub use action::Action;
pub use actor::Actor;
pub use arena::ActionId;
pub use behavior::{Behavior, MAX_CHAINED_TRANSITIONS};
pub use error::TransitionError;
pub use node::ActionView;
pub use query::{first_answer, first_value, ContextualQuery, QueryAnswer};
pub use responder::{propagate, BotEvent, EventResponder};
pub use result::{ActionResult, EventPriority, EventResult, Reason, ResultKind};
