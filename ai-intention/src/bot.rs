use ai_core::{Actor, BotEvent, ContextualQuery, EventResponder, QueryAnswer};
use tracing::debug;

use crate::{Component, ConfigError, DriverConfig, UpdateThrottle};

struct Slot<A: Actor> {
    component: Box<dyn Component<A>>,
    throttle: UpdateThrottle,
}

/// One agent: the actor plus its components, in update and broadcast order.
///
/// The bot is the root of the actor's event and query trees. Events reach every
/// component; queries stop at the first component with a definitive answer.
pub struct Bot<A: Actor> {
    actor: A,
    components: Vec<Slot<A>>,
    config: DriverConfig,
    throttle: UpdateThrottle,
}

impl<A: Actor> Bot<A> {
    /// Fails if `config` does not pass [`DriverConfig::validate`].
    pub fn new(actor: A, config: DriverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            actor,
            components: Vec::new(),
            config,
            throttle: UpdateThrottle::new(),
        })
    }

    pub fn with_component(mut self, component: impl Component<A> + 'static) -> Self {
        self.add_component(Box::new(component));
        self
    }

    pub fn add_component(&mut self, mut component: Box<dyn Component<A>>) {
        component.set_debug(self.config.debug_enabled);
        self.components.push(Slot {
            component,
            throttle: UpdateThrottle::new(),
        });
    }

    pub fn id(&self) -> u64 {
        self.actor.stable_id()
    }

    pub fn actor(&self) -> &A {
        &self.actor
    }

    pub fn actor_mut(&mut self) -> &mut A {
        &mut self.actor
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn set_debug(&mut self, enabled: bool) {
        self.config.debug_enabled = enabled;
        for slot in &mut self.components {
            slot.component.set_debug(enabled);
        }
    }

    pub fn components(&self) -> impl Iterator<Item = &dyn Component<A>> {
        self.components.iter().map(|slot| slot.component.as_ref())
    }

    pub fn component(&self, name: &str) -> Option<&dyn Component<A>> {
        self.components().find(|c| c.name() == name)
    }

    /// Reset every component and make every countdown fire on the next frame.
    pub fn reset(&mut self) {
        self.throttle.reset();
        for slot in &mut self.components {
            slot.component.reset(&mut self.actor);
            slot.throttle.reset();
        }
    }

    /// Per-frame bookkeeping; runs whether or not an update is due.
    pub fn upkeep(&mut self) {
        for slot in &mut self.components {
            slot.throttle.upkeep();
            slot.component.upkeep(&mut self.actor);
        }
    }

    /// Update if the bot's update rate allows. Returns whether it did.
    ///
    /// The bot's own countdown only runs down on frames it skips, so at the default
    /// 0.06 s rate it updates every fifth frame.
    pub fn begin_update(&mut self) -> bool {
        if !self
            .throttle
            .poll(self.config.update_rate, self.config.tick_interval)
        {
            return false;
        }
        self.update();
        true
    }

    /// Update every component whose own interval has elapsed.
    pub fn update(&mut self) {
        let tick_interval = self.config.tick_interval;
        for slot in &mut self.components {
            if slot
                .throttle
                .should_update(slot.component.update_interval(), tick_interval)
            {
                slot.component.update(&mut self.actor);
            }
        }
    }

    pub fn on_event(&mut self, event: &BotEvent<A::Entity>) {
        if let BotEvent::Sight(subject) | BotEvent::LostSight(subject) = event {
            debug!(bot = self.actor.stable_id(), ?subject, "{}", event.name());
        }
        for slot in &mut self.components {
            slot.component.on_event(&mut self.actor, event);
        }
    }

    pub fn on_stuck(&mut self) {
        self.on_event(&BotEvent::Stuck);
    }

    pub fn on_unstuck(&mut self) {
        self.on_event(&BotEvent::Unstuck);
    }

    pub fn on_sight(&mut self, subject: A::Entity) {
        self.on_event(&BotEvent::Sight(subject));
    }

    pub fn on_lost_sight(&mut self, subject: A::Entity) {
        self.on_event(&BotEvent::LostSight(subject));
    }

    fn first_answer(&self, ask: impl Fn(&dyn Component<A>, &A) -> QueryAnswer) -> QueryAnswer {
        self.first_value(|c, me| ask(c, me).definite())
            .unwrap_or_default()
    }

    fn first_value<T>(&self, ask: impl Fn(&dyn Component<A>, &A) -> Option<T>) -> Option<T> {
        self.components()
            .find_map(|component| ask(component, &self.actor))
    }

    pub fn should_pick_up(&self, item: A::Entity) -> QueryAnswer {
        self.first_answer(|c, me| c.should_pick_up(me, item))
    }

    pub fn should_attack(&self, them: A::Entity) -> QueryAnswer {
        self.first_answer(|c, me| c.should_attack(me, them))
    }

    pub fn should_hurry(&self) -> QueryAnswer {
        self.first_answer(|c, me| c.should_hurry(me))
    }

    pub fn should_retreat(&self) -> QueryAnswer {
        self.first_answer(|c, me| c.should_retreat(me))
    }

    pub fn should_roam(&self) -> QueryAnswer {
        self.first_answer(|c, me| c.should_roam(me))
    }

    pub fn should_use(&self, entity: A::Entity) -> QueryAnswer {
        self.first_answer(|c, me| c.should_use(me, entity))
    }

    pub fn is_hindrance(&self, blocker: A::Entity) -> QueryAnswer {
        self.first_answer(|c, me| c.is_hindrance(me, blocker))
    }

    pub fn select_target_point(&self, subject: A::Entity) -> Option<A::Point> {
        self.first_value(|c, me| c.select_target_point(me, subject))
    }

    pub fn select_more_dangerous_threat(
        &self,
        threat1: A::Entity,
        threat2: A::Entity,
    ) -> Option<A::Entity> {
        self.first_value(|c, me| c.select_more_dangerous_threat(me, threat1, threat2))
    }
}
