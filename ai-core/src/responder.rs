use crate::Actor;

/// Stimuli a perception or locomotion collaborator pushes into an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotEvent<E> {
    Stuck,
    Unstuck,
    Sight(E),
    LostSight(E),
}

impl<E> BotEvent<E> {
    pub fn name(&self) -> &'static str {
        match self {
            BotEvent::Stuck => "OnStuck",
            BotEvent::Unstuck => "OnUnstuck",
            BotEvent::Sight(_) => "OnSight",
            BotEvent::LostSight(_) => "OnLostSight",
        }
    }
}

/// A member of the event fan-out tree.
///
/// Containers expose their members through `contained_responder`: index `0` is the
/// first contained responder and `index + 1` the sibling after `index`; `None` ends the
/// walk. The default `on_event` forwards to every member in order. Override it to absorb
/// an event (leaf semantics), or call [`propagate`] from the override to keep
/// forwarding (container semantics).
pub trait EventResponder<A: Actor> {
    fn contained_responder(&mut self, _index: usize) -> Option<&mut dyn EventResponder<A>> {
        None
    }

    fn on_event(&mut self, me: &mut A, event: &BotEvent<A::Entity>) {
        propagate(self, me, event);
    }

    fn on_stuck(&mut self, me: &mut A) {
        self.on_event(me, &BotEvent::Stuck);
    }

    fn on_unstuck(&mut self, me: &mut A) {
        self.on_event(me, &BotEvent::Unstuck);
    }

    fn on_sight(&mut self, me: &mut A, subject: A::Entity) {
        self.on_event(me, &BotEvent::Sight(subject));
    }

    fn on_lost_sight(&mut self, me: &mut A, subject: A::Entity) {
        self.on_event(me, &BotEvent::LostSight(subject));
    }
}

/// Forward `event` to every responder contained in `responder`.
pub fn propagate<A, R>(responder: &mut R, me: &mut A, event: &BotEvent<A::Entity>)
where
    A: Actor,
    R: EventResponder<A> + ?Sized,
{
    let mut index = 0;
    while let Some(sub) = responder.contained_responder(index) {
        sub.on_event(me, event);
        index += 1;
    }
}
