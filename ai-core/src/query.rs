#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Actor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum QueryAnswer {
    No,
    Yes,
    #[default]
    Undefined,
}

impl QueryAnswer {
    pub fn is_definite(self) -> bool {
        self != QueryAnswer::Undefined
    }

    /// `Some(self)` for a definitive answer.
    pub fn definite(self) -> Option<Self> {
        self.is_definite().then_some(self)
    }
}

impl From<bool> for QueryAnswer {
    fn from(value: bool) -> Self {
        if value {
            QueryAnswer::Yes
        } else {
            QueryAnswer::No
        }
    }
}

/// Typed questions a decision-making collaborator can ask an agent.
///
/// Every method is a pure read. The defaults walk `contained_query` (same indexing
/// contract as `EventResponder::contained_responder`) and return the first definitive
/// answer, so a leaf that contains nothing answers `Undefined` / `None`.
pub trait ContextualQuery<A: Actor> {
    fn contained_query(&self, _index: usize) -> Option<&dyn ContextualQuery<A>> {
        None
    }

    /// Should the actor pick up `item`?
    fn should_pick_up(&self, me: &A, item: A::Entity) -> QueryAnswer {
        first_answer(self, |q| q.should_pick_up(me, item))
    }

    /// Should the actor attack `them`?
    fn should_attack(&self, me: &A, them: A::Entity) -> QueryAnswer {
        first_answer(self, |q| q.should_attack(me, them))
    }

    /// Is the actor in a hurry?
    fn should_hurry(&self, me: &A) -> QueryAnswer {
        first_answer(self, |q| q.should_hurry(me))
    }

    fn should_retreat(&self, me: &A) -> QueryAnswer {
        first_answer(self, |q| q.should_retreat(me))
    }

    /// Should the actor wander around the map?
    fn should_roam(&self, me: &A) -> QueryAnswer {
        first_answer(self, |q| q.should_roam(me))
    }

    fn should_use(&self, me: &A, entity: A::Entity) -> QueryAnswer {
        first_answer(self, |q| q.should_use(me, entity))
    }

    /// Should the actor wait for `blocker`, which stands in its path?
    fn is_hindrance(&self, me: &A, blocker: A::Entity) -> QueryAnswer {
        first_answer(self, |q| q.is_hindrance(me, blocker))
    }

    /// Where to aim at `subject`.
    fn select_target_point(&self, me: &A, subject: A::Entity) -> Option<A::Point> {
        first_value(self, |q| q.select_target_point(me, subject))
    }

    fn select_more_dangerous_threat(
        &self,
        me: &A,
        threat1: A::Entity,
        threat2: A::Entity,
    ) -> Option<A::Entity> {
        first_value(self, |q| q.select_more_dangerous_threat(me, threat1, threat2))
    }
}

/// Ask each contained query in order; return the first definitive answer.
pub fn first_answer<A, Q>(
    container: &Q,
    mut ask: impl FnMut(&dyn ContextualQuery<A>) -> QueryAnswer,
) -> QueryAnswer
where
    A: Actor,
    Q: ContextualQuery<A> + ?Sized,
{
    first_value(container, |q| ask(q).definite()).unwrap_or(QueryAnswer::Undefined)
}

/// Ask each contained query in order; return the first `Some`.
pub fn first_value<A, Q, T>(
    container: &Q,
    mut ask: impl FnMut(&dyn ContextualQuery<A>) -> Option<T>,
) -> Option<T>
where
    A: Actor,
    Q: ContextualQuery<A> + ?Sized,
{
    let mut index = 0;
    while let Some(sub) = container.contained_query(index) {
        if let Some(value) = ask(sub) {
            return Some(value);
        }
        index += 1;
    }
    None
}
