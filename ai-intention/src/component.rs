use ai_core::{Actor, ContextualQuery, EventResponder};

/// Seconds between updates for components that do not say otherwise.
pub const DEFAULT_UPDATE_INTERVAL: f32 = 0.1;

/// A piece of a bot that is updated on its own cadence.
///
/// Components are members of the bot's event and query trees, so every event the bot
/// receives reaches every component, and queries poll them in registration order.
pub trait Component<A: Actor>: EventResponder<A> + ContextualQuery<A> {
    fn name(&self) -> &str;

    fn update(&mut self, me: &mut A);

    /// Return to the initial state, e.g. after the actor respawns.
    fn reset(&mut self, _me: &mut A) {}

    /// Called every server frame, whether or not the component is due an update.
    fn upkeep(&mut self, _me: &mut A) {}

    fn update_interval(&self) -> f32 {
        DEFAULT_UPDATE_INTERVAL
    }

    fn set_debug(&mut self, _enabled: bool) {}
}
