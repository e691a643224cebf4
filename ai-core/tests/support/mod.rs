#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::io;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use ai_core::{Action, ActionResult, Actor, ContextualQuery, EventResult};
use ai_tools::{TraceEvent, TraceLog, TraceSink};
use tracing_subscriber::fmt::MakeWriter;

/// Test actor that records every lifecycle callback it sees.
#[derive(Debug, Default)]
pub struct Bot {
    pub id: u64,
    pub log: Vec<String>,
}

impl Bot {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            log: Vec::new(),
        }
    }

    pub fn take_log(&mut self) -> Vec<String> {
        std::mem::take(&mut self.log)
    }
}

impl Actor for Bot {
    type Entity = u32;
    type Point = (i32, i32);

    fn stable_id(&self) -> u64 {
        self.id
    }
}

pub type Hook = Box<dyn FnMut(&mut Bot) -> ActionResult<Bot>>;
pub type EventHook = Box<dyn FnMut(&mut Bot) -> EventResult<Bot>>;
pub type Factory = Box<dyn FnMut() -> Box<dyn Action<Bot>>>;

/// An action whose callbacks are supplied by the test.
///
/// Lifecycle callbacks log `Name:start`, `Name:update` and so on into the actor.
/// A start with a prior action logs `Name:start<Prior>`.
pub struct Scripted {
    name: &'static str,
    child: Option<Factory>,
    start: Option<Hook>,
    update: Option<Hook>,
    suspend: Option<Hook>,
    resume: Option<Hook>,
    stuck: Option<EventHook>,
    unstuck: Option<EventHook>,
    sight: Option<EventHook>,
    drops: Option<Rc<Cell<usize>>>,
}

impl Scripted {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            child: None,
            start: None,
            update: None,
            suspend: None,
            resume: None,
            stuck: None,
            unstuck: None,
            sight: None,
            drops: None,
        }
    }

    pub fn boxed(self) -> Box<dyn Action<Bot>> {
        Box::new(self)
    }

    pub fn containing(mut self, f: impl FnMut() -> Box<dyn Action<Bot>> + 'static) -> Self {
        self.child = Some(Box::new(f));
        self
    }

    pub fn starting(mut self, f: impl FnMut(&mut Bot) -> ActionResult<Bot> + 'static) -> Self {
        self.start = Some(Box::new(f));
        self
    }

    pub fn updating(mut self, f: impl FnMut(&mut Bot) -> ActionResult<Bot> + 'static) -> Self {
        self.update = Some(Box::new(f));
        self
    }

    pub fn suspending(mut self, f: impl FnMut(&mut Bot) -> ActionResult<Bot> + 'static) -> Self {
        self.suspend = Some(Box::new(f));
        self
    }

    pub fn resuming(mut self, f: impl FnMut(&mut Bot) -> ActionResult<Bot> + 'static) -> Self {
        self.resume = Some(Box::new(f));
        self
    }

    pub fn when_stuck(mut self, f: impl FnMut(&mut Bot) -> EventResult<Bot> + 'static) -> Self {
        self.stuck = Some(Box::new(f));
        self
    }

    pub fn when_unstuck(mut self, f: impl FnMut(&mut Bot) -> EventResult<Bot> + 'static) -> Self {
        self.unstuck = Some(Box::new(f));
        self
    }

    pub fn when_sighted(mut self, f: impl FnMut(&mut Bot) -> EventResult<Bot> + 'static) -> Self {
        self.sight = Some(Box::new(f));
        self
    }

    pub fn counting_drops(mut self, drops: &Rc<Cell<usize>>) -> Self {
        self.drops = Some(Rc::clone(drops));
        self
    }
}

impl Drop for Scripted {
    fn drop(&mut self) {
        if let Some(drops) = &self.drops {
            drops.set(drops.get() + 1);
        }
    }
}

fn run(hook: &mut Option<Hook>, me: &mut Bot) -> ActionResult<Bot> {
    match hook {
        Some(f) => f(me),
        None => ActionResult::continue_(),
    }
}

fn run_event(hook: &mut Option<EventHook>, me: &mut Bot) -> EventResult<Bot> {
    match hook {
        Some(f) => f(me),
        None => EventResult::try_continue(),
    }
}

impl ContextualQuery<Bot> for Scripted {}

impl Action<Bot> for Scripted {
    fn name(&self) -> &str {
        self.name
    }

    fn initial_contained_action(&mut self, _me: &mut Bot) -> Option<Box<dyn Action<Bot>>> {
        self.child.as_mut().map(|f| f())
    }

    fn on_start(&mut self, me: &mut Bot, prior: Option<&dyn Action<Bot>>) -> ActionResult<Bot> {
        match prior {
            Some(prior) => me.log.push(format!("{}:start<{}", self.name, prior.name())),
            None => me.log.push(format!("{}:start", self.name)),
        }
        run(&mut self.start, me)
    }

    fn update(&mut self, me: &mut Bot, _interval: f32) -> ActionResult<Bot> {
        me.log.push(format!("{}:update", self.name));
        run(&mut self.update, me)
    }

    fn on_end(&mut self, me: &mut Bot, _next: Option<&dyn Action<Bot>>) {
        me.log.push(format!("{}:end", self.name));
    }

    fn on_suspend(
        &mut self,
        me: &mut Bot,
        _interrupting: Option<&dyn Action<Bot>>,
    ) -> ActionResult<Bot> {
        me.log.push(format!("{}:suspend", self.name));
        run(&mut self.suspend, me)
    }

    fn on_resume(
        &mut self,
        me: &mut Bot,
        _interrupting: Option<&dyn Action<Bot>>,
    ) -> ActionResult<Bot> {
        me.log.push(format!("{}:resume", self.name));
        run(&mut self.resume, me)
    }

    fn on_stuck(&mut self, me: &mut Bot) -> EventResult<Bot> {
        run_event(&mut self.stuck, me)
    }

    fn on_unstuck(&mut self, me: &mut Bot) -> EventResult<Bot> {
        run_event(&mut self.unstuck, me)
    }

    fn on_sight(&mut self, me: &mut Bot, _subject: u32) -> EventResult<Bot> {
        run_event(&mut self.sight, me)
    }
}

/// Trace sink whose log stays readable after the sink is boxed into a behavior.
#[derive(Clone, Default)]
pub struct SharedLog(pub Rc<RefCell<TraceLog>>);

impl TraceSink for SharedLog {
    fn emit(&mut self, event: TraceEvent) {
        self.0.borrow_mut().push(event);
    }
}

/// Formatted `tracing` output, kept for assertions.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Run `f` under a subscriber that writes records at `level` and above here.
    pub fn during<R>(&self, level: tracing::Level, f: impl FnOnce() -> R) -> R {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(false)
            .with_writer(self.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("log buffer")).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log buffer").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
