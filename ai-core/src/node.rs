use crate::{Action, ActionId, Actor, EventPriority, EventResult, ResultKind};

/// Engine-side state of one action.
pub(crate) struct ActionNode<A: Actor> {
    pub(crate) name: String,
    /// Taken out while one of the action's own callbacks runs.
    pub(crate) action: Option<Box<dyn Action<A>>>,
    pub(crate) started: bool,
    pub(crate) suspended: bool,
    pub(crate) parent: Option<ActionId>,
    pub(crate) child: Option<ActionId>,
    pub(crate) buried: Option<ActionId>,
    pub(crate) covering: Option<ActionId>,
    pub(crate) pending: EventResult<A>,
}

impl<A: Actor> ActionNode<A> {
    pub(crate) fn new(action: Box<dyn Action<A>>) -> Self {
        Self {
            name: action.name().to_owned(),
            action: Some(action),
            started: false,
            suspended: false,
            parent: None,
            child: None,
            buried: None,
            covering: None,
            pending: EventResult::empty(),
        }
    }

    pub(crate) fn pending_kind(&self) -> ResultKind {
        self.pending.kind()
    }

    pub(crate) fn pending_priority(&self) -> EventPriority {
        self.pending.priority()
    }

    pub(crate) fn take_pending(&mut self) -> EventResult<A> {
        std::mem::replace(&mut self.pending, EventResult::empty())
    }
}

/// Read-only view of a node for hosts and tests.
pub struct ActionView<'a, A: Actor> {
    pub(crate) id: ActionId,
    pub(crate) node: &'a ActionNode<A>,
}

impl<'a, A: Actor> ActionView<'a, A> {
    pub fn id(&self) -> ActionId {
        self.id
    }

    pub fn name(&self) -> &'a str {
        &self.node.name
    }

    pub fn is_started(&self) -> bool {
        self.node.started
    }

    pub fn is_suspended(&self) -> bool {
        self.node.suspended
    }

    pub fn parent(&self) -> Option<ActionId> {
        self.node.parent
    }

    pub fn active_child(&self) -> Option<ActionId> {
        self.node.child
    }

    pub fn buried_under(&self) -> Option<ActionId> {
        self.node.buried
    }

    pub fn covering(&self) -> Option<ActionId> {
        self.node.covering
    }

    pub fn pending_kind(&self) -> ResultKind {
        self.node.pending_kind()
    }

    pub fn pending_priority(&self) -> EventPriority {
        self.node.pending_priority()
    }

    pub fn pending_target_name(&self) -> Option<&'a str> {
        self.node.pending.action().map(|a| a.name())
    }

    pub fn action(&self) -> Option<&'a dyn Action<A>> {
        self.node.action.as_deref()
    }
}
