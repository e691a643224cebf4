use std::borrow::Cow;

use ai_core::{Action, Actor, Behavior, ContextualQuery, EventResponder};

use crate::Component;

/// Seconds between intention updates.
pub const INTENTION_UPDATE_INTERVAL: f32 = 0.07;

/// Builds the action a fresh stack starts from.
pub type ActionFactory<A> = Box<dyn Fn() -> Box<dyn Action<A>>>;

/// The component that decides what the bot is doing: one [`Behavior`] plus the factory
/// for its initial action.
///
/// Events and queries pass straight through to the behavior.
pub struct Intention<A: Actor> {
    behavior: Behavior<A>,
    factory: ActionFactory<A>,
    interval: f32,
}

impl<A: Actor> Intention<A> {
    pub fn new(factory: impl Fn() -> Box<dyn Action<A>> + 'static) -> Self {
        Self::named("Intention", factory)
    }

    pub fn named(
        name: impl Into<Cow<'static, str>>,
        factory: impl Fn() -> Box<dyn Action<A>> + 'static,
    ) -> Self {
        let behavior = Behavior::named(name, factory());
        Self {
            behavior,
            factory: Box::new(factory),
            interval: INTENTION_UPDATE_INTERVAL,
        }
    }

    pub fn with_update_interval(mut self, seconds: f32) -> Self {
        self.interval = seconds;
        self
    }

    pub fn behavior(&self) -> &Behavior<A> {
        &self.behavior
    }

    pub fn behavior_mut(&mut self) -> &mut Behavior<A> {
        &mut self.behavior
    }
}

impl<A: Actor> EventResponder<A> for Intention<A> {
    fn contained_responder(&mut self, index: usize) -> Option<&mut dyn EventResponder<A>> {
        match index {
            0 => Some(&mut self.behavior),
            _ => None,
        }
    }
}

impl<A: Actor> ContextualQuery<A> for Intention<A> {
    fn contained_query(&self, index: usize) -> Option<&dyn ContextualQuery<A>> {
        match index {
            0 => Some(&self.behavior),
            _ => None,
        }
    }
}

impl<A: Actor> Component<A> for Intention<A> {
    fn name(&self) -> &str {
        self.behavior.name()
    }

    fn update(&mut self, me: &mut A) {
        self.behavior.update(me, self.interval);
    }

    fn reset(&mut self, me: &mut A) {
        let initial = (self.factory)();
        self.behavior.reset(me, initial);
    }

    fn update_interval(&self) -> f32 {
        self.interval
    }

    fn set_debug(&mut self, enabled: bool) {
        self.behavior.set_debug(enabled);
    }
}
