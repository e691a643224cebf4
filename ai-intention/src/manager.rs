use ai_core::Actor;
use tracing::{debug, warn};

use crate::{Bot, RegistryError};

/// Drives every registered bot once per server frame.
pub struct BotManager<A: Actor> {
    bots: Vec<Bot<A>>,
    frame: u64,
}

impl<A: Actor> Default for BotManager<A> {
    fn default() -> Self {
        Self {
            bots: Vec::new(),
            frame: 0,
        }
    }
}

impl<A: Actor> BotManager<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bot` under its actor's stable id. A second bot with the same id is
    /// rejected and dropped.
    pub fn register(&mut self, bot: Bot<A>) -> Result<u64, RegistryError> {
        let id = bot.id();
        if self.contains(id) {
            warn!(bot = id, "bot is already registered");
            return Err(RegistryError::DuplicateBot { id });
        }
        debug!(bot = id, "registered bot");
        self.bots.push(bot);
        Ok(id)
    }

    pub fn unregister(&mut self, id: u64) -> Option<Bot<A>> {
        let index = self.bots.iter().position(|bot| bot.id() == id)?;
        debug!(bot = id, "unregistered bot");
        Some(self.bots.remove(index))
    }

    pub fn contains(&self, id: u64) -> bool {
        self.bots.iter().any(|bot| bot.id() == id)
    }

    pub fn get(&self, id: u64) -> Option<&Bot<A>> {
        self.bots.iter().find(|bot| bot.id() == id)
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut Bot<A>> {
        self.bots.iter_mut().find(|bot| bot.id() == id)
    }

    pub fn len(&self) -> usize {
        self.bots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bot<A>> {
        self.bots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Bot<A>> {
        self.bots.iter_mut()
    }

    /// Frames run so far.
    pub fn frames(&self) -> u64 {
        self.frame
    }

    /// Upkeep then a throttled update for every bot, in registration order.
    pub fn frame(&mut self) {
        self.frame += 1;
        for bot in &mut self.bots {
            bot.upkeep();
            bot.begin_update();
        }
    }

    pub fn reset_all(&mut self) {
        for bot in &mut self.bots {
            bot.reset();
        }
    }
}
