use crate::{ActionResult, Actor, ContextualQuery, EventResult};

/// One unit of schedulable behavior.
///
/// Every callback is optional except [`name`](Action::name). The engine invokes them
/// only while the action is attached to a stack; none of them may assume anything about
/// the stack shape beyond what the arguments say. Neighbouring actions are passed as
/// `Option<&dyn Action<A>>` and are `None` when the neighbour is the receiver itself.
///
/// Query answers come from the [`ContextualQuery`] supertrait; an action that has no
/// opinion implements it with an empty `impl` block.
pub trait Action<A: Actor>: ContextualQuery<A> + 'static {
    fn name(&self) -> &str;

    fn is_named(&self, name: &str) -> bool {
        self.name() == name
    }

    /// Delegated sub-stack installed once when this action starts.
    fn initial_contained_action(&mut self, _me: &mut A) -> Option<Box<dyn Action<A>>> {
        None
    }

    fn on_start(&mut self, _me: &mut A, _prior: Option<&dyn Action<A>>) -> ActionResult<A> {
        ActionResult::continue_()
    }

    fn update(&mut self, _me: &mut A, _interval: f32) -> ActionResult<A> {
        ActionResult::continue_()
    }

    fn on_end(&mut self, _me: &mut A, _next: Option<&dyn Action<A>>) {}

    /// Only a `Done` answer is honoured: the action is ended instead of paused.
    fn on_suspend(
        &mut self,
        _me: &mut A,
        _interrupting: Option<&dyn Action<A>>,
    ) -> ActionResult<A> {
        ActionResult::continue_()
    }

    fn on_resume(
        &mut self,
        _me: &mut A,
        _interrupting: Option<&dyn Action<A>>,
    ) -> ActionResult<A> {
        ActionResult::continue_()
    }

    fn on_stuck(&mut self, _me: &mut A) -> EventResult<A> {
        EventResult::try_continue()
    }

    fn on_unstuck(&mut self, _me: &mut A) -> EventResult<A> {
        EventResult::try_continue()
    }

    fn on_sight(&mut self, _me: &mut A, _subject: A::Entity) -> EventResult<A> {
        EventResult::try_continue()
    }

    fn on_lost_sight(&mut self, _me: &mut A, _subject: A::Entity) -> EventResult<A> {
        EventResult::try_continue()
    }
}
