use std::borrow::Cow;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Action, Actor};

/// What an action callback asks the owning stack to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ResultKind {
    /// Keep the current action running.
    #[default]
    Continue,
    /// End the current action and start the target in its place.
    ChangeTo,
    /// Pause the current top of the stack and run the target above it.
    SuspendFor,
    /// End the current action and resume whatever it covered.
    Done,
    /// Keep running, and hold a stored event result so lower priorities cannot replace it.
    Sustain,
}

impl ResultKind {
    pub fn is_continue(self) -> bool {
        self == ResultKind::Continue
    }

    pub fn is_done(self) -> bool {
        self == ResultKind::Done
    }

    pub fn is_requesting_change(self) -> bool {
        matches!(
            self,
            ResultKind::ChangeTo | ResultKind::SuspendFor | ResultKind::Done
        )
    }

    pub fn carries_target(self) -> bool {
        matches!(self, ResultKind::ChangeTo | ResultKind::SuspendFor)
    }

    pub fn name(self) -> &'static str {
        match self {
            ResultKind::Continue => "CONTINUE",
            ResultKind::ChangeTo => "CHANGE_TO",
            ResultKind::SuspendFor => "SUSPEND_FOR",
            ResultKind::Done => "DONE",
            ResultKind::Sustain => "SUSTAIN",
        }
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Arbitration level of an event result waiting on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EventPriority {
    #[default]
    None,
    Try,
    Important,
    Critical,
}

pub type Reason = Cow<'static, str>;

/// Scheduling decision returned by `OnStart`, `Update`, `OnSuspend` and `OnResume`.
pub struct ActionResult<A: Actor> {
    kind: ResultKind,
    action: Option<Box<dyn Action<A>>>,
    reason: Option<Reason>,
}

impl<A: Actor> ActionResult<A> {
    /// Raw constructor. `ChangeTo` and `SuspendFor` need a target; a missing one is
    /// logged and the transition ignored when the result is applied.
    pub fn new(
        kind: ResultKind,
        action: Option<Box<dyn Action<A>>>,
        reason: Option<Reason>,
    ) -> Self {
        Self {
            kind,
            action,
            reason,
        }
    }

    pub fn continue_() -> Self {
        Self::new(ResultKind::Continue, None, None)
    }

    pub fn change_to(action: Box<dyn Action<A>>, reason: impl Into<Reason>) -> Self {
        Self::new(ResultKind::ChangeTo, Some(action), Some(reason.into()))
    }

    pub fn suspend_for(action: Box<dyn Action<A>>, reason: impl Into<Reason>) -> Self {
        Self::new(ResultKind::SuspendFor, Some(action), Some(reason.into()))
    }

    pub fn done(reason: impl Into<Reason>) -> Self {
        Self::new(ResultKind::Done, None, Some(reason.into()))
    }

    pub fn sustain(reason: impl Into<Reason>) -> Self {
        Self::new(ResultKind::Sustain, None, Some(reason.into()))
    }

    pub fn kind(&self) -> ResultKind {
        self.kind
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn action(&self) -> Option<&dyn Action<A>> {
        self.action.as_deref()
    }

    pub(crate) fn into_parts(self) -> (ResultKind, Option<Box<dyn Action<A>>>, Option<Reason>) {
        (self.kind, self.action, self.reason)
    }
}

impl<A: Actor> Default for ActionResult<A> {
    fn default() -> Self {
        Self::continue_()
    }
}

impl<A: Actor> fmt::Debug for ActionResult<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionResult")
            .field("kind", &self.kind)
            .field("action", &self.action.as_ref().map(|a| a.name().to_owned()))
            .field("reason", &self.reason)
            .finish()
    }
}

/// Transition request produced by an event callback.
///
/// Event results are never applied on the spot: the engine stores the winning one on
/// the responding node and converts it into a transition at the start of the next update.
pub struct EventResult<A: Actor> {
    kind: ResultKind,
    action: Option<Box<dyn Action<A>>>,
    priority: EventPriority,
    reason: Option<Reason>,
}

impl<A: Actor> EventResult<A> {
    pub fn new(
        kind: ResultKind,
        action: Option<Box<dyn Action<A>>>,
        priority: EventPriority,
        reason: Option<Reason>,
    ) -> Self {
        Self {
            kind,
            action,
            priority,
            reason,
        }
    }

    pub fn try_continue() -> Self {
        Self::new(ResultKind::Continue, None, EventPriority::Try, None)
    }

    pub fn try_change_to(
        action: Box<dyn Action<A>>,
        priority: EventPriority,
        reason: impl Into<Reason>,
    ) -> Self {
        Self::new(
            ResultKind::ChangeTo,
            Some(action),
            priority,
            Some(reason.into()),
        )
    }

    pub fn try_suspend_for(
        action: Box<dyn Action<A>>,
        priority: EventPriority,
        reason: impl Into<Reason>,
    ) -> Self {
        Self::new(
            ResultKind::SuspendFor,
            Some(action),
            priority,
            Some(reason.into()),
        )
    }

    pub fn try_done(priority: EventPriority, reason: impl Into<Reason>) -> Self {
        Self::new(ResultKind::Done, None, priority, Some(reason.into()))
    }

    pub fn try_to_sustain(priority: EventPriority, reason: impl Into<Reason>) -> Self {
        Self::new(ResultKind::Sustain, None, priority, Some(reason.into()))
    }

    /// The empty pending slot: nothing requested, lowest priority.
    pub(crate) fn empty() -> Self {
        Self::new(ResultKind::Continue, None, EventPriority::None, None)
    }

    pub fn kind(&self) -> ResultKind {
        self.kind
    }

    pub fn priority(&self) -> EventPriority {
        self.priority
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn action(&self) -> Option<&dyn Action<A>> {
        self.action.as_deref()
    }

    pub(crate) fn into_parts(self) -> (ResultKind, Option<Box<dyn Action<A>>>, Option<Reason>) {
        (self.kind, self.action, self.reason)
    }
}

impl<A: Actor> Default for EventResult<A> {
    fn default() -> Self {
        Self::try_continue()
    }
}

impl<A: Actor> fmt::Debug for EventResult<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventResult")
            .field("kind", &self.kind)
            .field("action", &self.action.as_ref().map(|a| a.name().to_owned()))
            .field("priority", &self.priority)
            .field("reason", &self.reason)
            .finish()
    }
}

impl<A: Actor> From<ActionResult<A>> for EventResult<A> {
    fn from(value: ActionResult<A>) -> Self {
        let (kind, action, reason) = value.into_parts();
        Self::new(kind, action, EventPriority::Try, reason)
    }
}
