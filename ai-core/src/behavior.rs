use std::borrow::Cow;
use std::collections::VecDeque;

use ai_tools::{tags, TraceEvent, TraceSink};
use tracing::{debug, error, warn};

use crate::arena::Arena;
use crate::node::{ActionNode, ActionView};
use crate::result::Reason;
use crate::{
    Action, ActionId, ActionResult, Actor, BotEvent, ContextualQuery, EventPriority,
    EventResponder, EventResult, QueryAnswer, ResultKind, TransitionError,
};

/// Upper bound on transitions applied back to back inside one `update`.
///
/// An action whose `on_start` keeps answering `ChangeTo` would otherwise never reach a
/// fixed point.
pub const MAX_CHAINED_TRANSITIONS: usize = 256;

/// A result whose target has been moved into the arena.
struct Transition {
    kind: ResultKind,
    target: Option<ActionId>,
    reason: Option<Reason>,
}

impl Transition {
    fn continue_() -> Self {
        Self {
            kind: ResultKind::Continue,
            target: None,
            reason: None,
        }
    }

    fn change_to(target: ActionId, reason: &'static str) -> Self {
        Self {
            kind: ResultKind::ChangeTo,
            target: Some(target),
            reason: Some(Cow::Borrowed(reason)),
        }
    }

    fn done(reason: &'static str) -> Self {
        Self {
            kind: ResultKind::Done,
            target: None,
            reason: Some(Cow::Borrowed(reason)),
        }
    }
}

fn peek<A: Actor>(nodes: &Arena<ActionNode<A>>, id: Option<ActionId>) -> Option<&dyn Action<A>> {
    nodes.get(id?)?.action.as_deref()
}

/// Owner of one agent's action stack.
///
/// `Behavior` holds the top of the suspension chain, every node reachable from it and
/// the queue of retired nodes. Retired nodes stay allocated until the start of the
/// next [`update`](Behavior::update) so no node is freed while its own callback may
/// still be on the call stack.
///
/// The initial action is not started on construction: the first `update` starts it
/// through the regular `ChangeTo` path.
pub struct Behavior<A: Actor> {
    name: Cow<'static, str>,
    nodes: Arena<ActionNode<A>>,
    active: Option<ActionId>,
    retired: VecDeque<ActionId>,
    debug: bool,
    tick: u64,
    actor_id: u64,
    trace_sink: Option<Box<dyn TraceSink>>,
}

impl<A: Actor> Behavior<A> {
    pub fn new(initial: Box<dyn Action<A>>) -> Self {
        Self::named("Behavior", initial)
    }

    pub fn named(name: impl Into<Cow<'static, str>>, initial: Box<dyn Action<A>>) -> Self {
        let mut nodes = Arena::default();
        let active = nodes.insert(ActionNode::new(initial));
        Self {
            name: name.into(),
            nodes,
            active: Some(active),
            retired: VecDeque::new(),
            debug: false,
            tick: 0,
            actor_id: 0,
            trace_sink: None,
        }
    }

    /// Enable verbose transition tracing. Has no effect on scheduling.
    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    pub fn with_trace_sink(mut self, sink: Box<dyn TraceSink>) -> Self {
        self.trace_sink = Some(sink);
        self
    }

    pub fn set_debug(&mut self, enabled: bool) {
        self.debug = enabled;
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn set_trace_sink(&mut self, sink: Option<Box<dyn TraceSink>>) {
        self.trace_sink = sink;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of completed `update` calls that found a non-empty stack.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// `true` once the last action finished without anything to resume.
    pub fn is_empty(&self) -> bool {
        self.active.is_none()
    }

    pub fn active(&self) -> Option<ActionId> {
        self.active
    }

    pub fn active_name(&self) -> Option<&str> {
        self.nodes.get(self.active?).map(|n| n.name.as_str())
    }

    pub fn get(&self, id: ActionId) -> Option<ActionView<'_, A>> {
        self.nodes.get(id).map(|node| ActionView { id, node })
    }

    pub fn contains(&self, id: ActionId) -> bool {
        self.nodes.contains(id)
    }

    /// First live (not retired) node whose action is called `name`.
    pub fn find_by_name(&self, name: &str) -> Option<ActionId> {
        self.nodes
            .iter()
            .find(|(id, node)| node.name == name && !self.retired.contains(id))
            .map(|(id, _)| id)
    }

    pub fn actions(&self) -> impl Iterator<Item = ActionView<'_, A>> {
        self.nodes.iter().map(|(id, node)| ActionView { id, node })
    }

    /// Allocated nodes, retired ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn retired_len(&self) -> usize {
        self.retired.len()
    }

    pub fn is_retired(&self, id: ActionId) -> bool {
        self.retired.contains(&id)
    }

    /// Render the stack as `Outer( Child )<<Buried`.
    pub fn decorated_name(&self) -> String {
        let mut out = String::new();
        if let Some(active) = self.active {
            self.decorate(&mut out, active);
        }
        out
    }

    fn decorate(&self, out: &mut String, id: ActionId) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };

        out.push_str(&node.name);
        if let Some(child) = node.child {
            out.push_str("( ");
            self.decorate(out, child);
            out.push_str(" )");
        }
        if let Some(buried) = node.buried {
            out.push_str("<<");
            self.decorate(out, buried);
        }
    }

    /// Advance the stack by one tick.
    ///
    /// Must not be re-entered for the same behavior from inside an action callback.
    pub fn update(&mut self, me: &mut A, interval: f32) {
        self.drain_retired();

        let Some(active) = self.active else {
            return;
        };

        self.actor_id = me.stable_id();
        self.tick += 1;

        let result = self.invoke_update(me, active, interval);
        self.active = self.apply_result(me, active, result);
    }

    /// Run the active action's `on_resume` with no interrupting action and apply the answer.
    pub fn resume(&mut self, me: &mut A) {
        let Some(active) = self.active else {
            return;
        };

        self.actor_id = me.stable_id();
        let result = self
            .call(active, |action, _| action.on_resume(me, None))
            .unwrap_or_default();
        let result = self.adopt(active, result);
        self.active = self.apply_result(me, active, result);
    }

    /// Replace the whole stack. The old one is ended and freed first; `action` starts on
    /// the next `update`.
    pub fn reset(&mut self, me: &mut A, action: Box<dyn Action<A>>) {
        self.teardown(me);
        self.active = Some(self.nodes.insert(ActionNode::new(action)));
    }

    /// End every started node and free the whole stack, leaving the behavior empty.
    pub fn teardown(&mut self, me: &mut A) {
        self.actor_id = me.stable_id();

        if let Some(active) = self.active.take() {
            // Ending the bottom node cascades up through every covering node.
            let mut bottom = active;
            while let Some(below) = self.nodes.get(bottom).and_then(|n| n.buried) {
                bottom = below;
            }
            self.invoke_on_end(me, bottom, None);
        }

        self.retired.clear();
        self.nodes.clear();
    }

    fn call<R>(
        &mut self,
        id: ActionId,
        f: impl FnOnce(&mut dyn Action<A>, &Arena<ActionNode<A>>) -> R,
    ) -> Option<R> {
        let mut action = self.nodes.get_mut(id)?.action.take()?;
        let out = f(action.as_mut(), &self.nodes);
        if let Some(node) = self.nodes.get_mut(id) {
            node.action = Some(action);
        }
        Some(out)
    }

    /// Move a callback's result into the arena. Returning `SuspendFor` from one's own
    /// callback discards whatever event result was pending on that node.
    fn adopt(&mut self, owner: ActionId, result: ActionResult<A>) -> Transition {
        let (kind, action, reason) = result.into_parts();
        if kind == ResultKind::SuspendFor {
            if let Some(node) = self.nodes.get_mut(owner) {
                node.take_pending();
            }
        }
        self.resolve(kind, action, reason)
    }

    fn resolve_event(&mut self, result: EventResult<A>) -> Transition {
        let (kind, action, reason) = result.into_parts();
        self.resolve(kind, action, reason)
    }

    fn resolve(
        &mut self,
        kind: ResultKind,
        action: Option<Box<dyn Action<A>>>,
        reason: Option<Reason>,
    ) -> Transition {
        let target = match action {
            Some(action) if kind.carries_target() => {
                Some(self.nodes.insert(ActionNode::new(action)))
            }
            _ => None,
        };
        Transition {
            kind,
            target,
            reason,
        }
    }

    fn usable_target(&self, current: ActionId, result: &Transition) -> Option<ActionId> {
        if let Some(target) = result.target.filter(|t| self.nodes.contains(*t)) {
            return Some(target);
        }

        let err = TransitionError::MissingTarget {
            kind: result.kind,
            action: self.name_of(current),
        };
        error!(behavior = %self.name, actor = self.actor_id, error = %err, "transition ignored");
        None
    }

    fn apply_result(
        &mut self,
        me: &mut A,
        current: ActionId,
        result: Transition,
    ) -> Option<ActionId> {
        let mut current = current;
        let mut result = result;

        for _ in 0..MAX_CHAINED_TRANSITIONS {
            match result.kind {
                ResultKind::Continue | ResultKind::Sustain => return Some(current),

                ResultKind::ChangeTo => {
                    let Some(target) = self.usable_target(current, &result) else {
                        return Some(current);
                    };

                    self.trace(tags::CHANGE_TO, current, Some(target), result.reason.as_deref());

                    self.invoke_on_end(me, current, Some(target));
                    let buried = self.nodes.get(current).and_then(|n| n.buried);
                    let started = self.invoke_on_start(me, target, Some(current), buried);

                    if current != target {
                        self.retire(current);
                    }

                    current = target;
                    result = started;
                }

                ResultKind::SuspendFor => {
                    let Some(target) = self.usable_target(current, &result) else {
                        return Some(current);
                    };

                    let mut top = current;
                    while let Some(covering) = self
                        .nodes
                        .get(top)
                        .and_then(|n| n.covering)
                        .filter(|c| self.nodes.get(*c).is_some_and(|n| n.started))
                    {
                        top = covering;
                    }

                    if self.debug && top != current {
                        debug!(
                            behavior = %self.name,
                            cause = %self.name_of(current),
                            "suspension requested from below the top of the stack"
                        );
                    }
                    self.trace(tags::SUSPEND_FOR, top, Some(target), result.reason.as_deref());

                    let survivor = self.invoke_on_suspend(me, top, Some(target));
                    let started = self.invoke_on_start(me, target, survivor.or(Some(top)), survivor);

                    current = target;
                    result = started;
                }

                ResultKind::Done => {
                    let resumed = self.nodes.get(current).and_then(|n| n.buried);

                    self.trace(tags::DONE, current, resumed, result.reason.as_deref());
                    self.invoke_on_end(me, current, resumed);

                    let Some(resumed) = resumed else {
                        self.retire(current);
                        return None;
                    };

                    let resumed_result = self.invoke_on_resume(me, resumed, Some(current));
                    self.retire(current);

                    current = resumed;
                    result = resumed_result;
                }
            }
        }

        let err = TransitionError::Runaway {
            action: self.name_of(current),
            limit: MAX_CHAINED_TRANSITIONS,
        };
        error!(behavior = %self.name, actor = self.actor_id, error = %err, "transition chain cut short");

        if let Some(stray) = result.target.filter(|t| *t != current) {
            if self.nodes.get(stray).is_some_and(|n| !n.started) {
                self.retire(stray);
            }
        }
        Some(current)
    }

    fn invoke_on_start(
        &mut self,
        me: &mut A,
        id: ActionId,
        prior: Option<ActionId>,
        buried: Option<ActionId>,
    ) -> Transition {
        self.trace(tags::STARTING, id, prior.filter(|p| *p != id), None);

        let inherited = prior.and_then(|p| self.nodes.get(p)).map(|n| n.parent);

        // Must be in place before any callback runs: starting the contained child can
        // already suspend or end nodes around this one.
        let (parent, stale_child) = {
            let Some(node) = self.nodes.get_mut(id) else {
                return Transition::continue_();
            };
            node.started = true;
            node.suspended = false;
            if let Some(parent) = inherited {
                node.parent = parent;
            }
            node.buried = buried;
            node.covering = None;
            (node.parent, node.child.take())
        };

        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(p)) {
            parent.child = Some(id);
        }
        if let Some(below) = buried.and_then(|b| self.nodes.get_mut(b)) {
            below.covering = Some(id);
        }
        if let Some(stale) = stale_child {
            self.retire_chain(stale);
        }

        let contained = self
            .call(id, |action, _| action.initial_contained_action(me))
            .flatten();
        if let Some(contained) = contained {
            let child = self.nodes.insert(ActionNode::new(contained));
            if let Some(node) = self.nodes.get_mut(child) {
                node.parent = Some(id);
            }
            if let Some(node) = self.nodes.get_mut(id) {
                node.child = Some(child);
            }

            let started =
                self.apply_result(me, child, Transition::change_to(child, "Starting child Action"));
            if let Some(node) = self.nodes.get_mut(id) {
                node.child = started;
            }
        }

        let result = self
            .call(id, |action, nodes| action.on_start(me, peek(nodes, prior)))
            .unwrap_or_default();
        self.adopt(id, result)
    }

    fn invoke_update(&mut self, me: &mut A, id: ActionId, interval: f32) -> Transition {
        if self.is_out_of_scope(id) {
            return Transition::done("Out of scope");
        }

        let Some(node) = self.nodes.get(id) else {
            return Transition::continue_();
        };
        if !node.started {
            return Transition::change_to(id, "Starting Action");
        }

        let pending = self.process_pending_events(id);
        if !pending.kind.is_continue() {
            return pending;
        }

        if let Some(child) = self.nodes.get(id).and_then(|n| n.child) {
            let result = self.invoke_update(me, child, interval);
            let child = self.apply_result(me, child, result);
            if let Some(node) = self.nodes.get_mut(id) {
                node.child = child;
            }
        }

        let result = self
            .call(id, |action, _| action.update(me, interval))
            .unwrap_or_default();
        self.adopt(id, result)
    }

    fn invoke_on_end(&mut self, me: &mut A, id: ActionId, next: Option<ActionId>) {
        let child = {
            let Some(node) = self.nodes.get_mut(id) else {
                return;
            };
            if !node.started {
                return;
            }
            node.started = false;
            node.child
        };

        self.trace(tags::ENDING, id, next, None);

        let mut child = child;
        while let Some(current) = child {
            child = self.nodes.get(current).and_then(|n| n.buried);
            self.invoke_on_end(me, current, next);
        }

        self.call(id, |action, nodes| action.on_end(me, peek(nodes, next)));

        if let Some(covering) = self.nodes.get(id).and_then(|n| n.covering) {
            self.invoke_on_end(me, covering, next);
        }
    }

    /// Returns the node that now sits where `id` was: `id` itself, or whatever it
    /// covered when `on_suspend` answered `Done`.
    fn invoke_on_suspend(
        &mut self,
        me: &mut A,
        id: ActionId,
        interrupting: Option<ActionId>,
    ) -> Option<ActionId> {
        let child = self.nodes.get(id)?.child;

        self.trace(tags::SUSPENDING, id, interrupting, None);

        if let Some(child) = child {
            let survivor = self.invoke_on_suspend(me, child, interrupting);
            if let Some(node) = self.nodes.get_mut(id) {
                node.child = survivor;
            }
        }

        if let Some(node) = self.nodes.get_mut(id) {
            node.suspended = true;
        }

        let result = self
            .call(id, |action, nodes| action.on_suspend(me, peek(nodes, interrupting)))
            .unwrap_or_default();

        if result.kind().is_done() {
            self.invoke_on_end(me, id, None);
            let buried = self.nodes.get(id).and_then(|n| n.buried);
            self.retire(id);
            return buried;
        }

        Some(id)
    }

    fn invoke_on_resume(
        &mut self,
        me: &mut A,
        id: ActionId,
        interrupting: Option<ActionId>,
    ) -> Transition {
        self.trace(tags::RESUMING, id, interrupting, None);

        let (parent, child) = {
            let Some(node) = self.nodes.get_mut(id) else {
                return Transition::continue_();
            };
            if !node.suspended || node.pending_kind().is_requesting_change() {
                return Transition::continue_();
            }
            node.suspended = false;
            node.covering = None;
            (node.parent, node.child)
        };

        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(p)) {
            parent.child = Some(id);
        }

        if let Some(child) = child {
            let result = self.invoke_on_resume(me, child, interrupting);
            let child = self.apply_result(me, child, result);
            if let Some(node) = self.nodes.get_mut(id) {
                node.child = child;
            }
        }

        let result = self
            .call(id, |action, nodes| action.on_resume(me, peek(nodes, interrupting)))
            .unwrap_or_default();
        self.adopt(id, result)
    }

    /// A node is out of scope once something it covers has asked to be replaced or ended.
    fn is_out_of_scope(&self, id: ActionId) -> bool {
        let mut under = self.nodes.get(id).and_then(|n| n.buried);
        while let Some(below) = under {
            let Some(node) = self.nodes.get(below) else {
                break;
            };
            if matches!(node.pending_kind(), ResultKind::ChangeTo | ResultKind::Done) {
                return true;
            }
            under = node.buried;
        }
        false
    }

    fn process_pending_events(&mut self, id: ActionId) -> Transition {
        let Some(node) = self.nodes.get_mut(id) else {
            return Transition::continue_();
        };

        if node.pending_kind().is_requesting_change() {
            let pending = node.take_pending();
            return self.resolve_event(pending);
        }

        // A suspension requested further down is honoured in place: the new action
        // goes on top of the whole stack.
        let mut under = node.buried;
        while let Some(below) = under {
            let Some(node) = self.nodes.get_mut(below) else {
                break;
            };
            if node.pending_kind() == ResultKind::SuspendFor {
                let pending = node.take_pending();
                return self.resolve_event(pending);
            }
            under = node.buried;
        }

        Transition::continue_()
    }

    fn dispatch_event(&mut self, me: &mut A, id: ActionId, event: &BotEvent<A::Entity>) {
        if !self.nodes.get(id).is_some_and(|n| n.started) {
            return;
        }

        let mut responder = Some(id);
        let mut result = EventResult::try_continue();
        while let Some(current) = responder {
            result = self
                .call(current, |action, _| match *event {
                    BotEvent::Stuck => action.on_stuck(me),
                    BotEvent::Unstuck => action.on_unstuck(me),
                    BotEvent::Sight(subject) => action.on_sight(me, subject),
                    BotEvent::LostSight(subject) => action.on_lost_sight(me, subject),
                })
                .unwrap_or_default();
            if !result.kind().is_continue() {
                break;
            }
            responder = self.nodes.get(current).and_then(|n| n.buried);
        }

        if let Some(current) = responder {
            self.store_pending_event_result(current, result, event.name());
        }

        if let Some(child) = self.nodes.get(id).and_then(|n| n.child) {
            self.dispatch_event(me, child, event);
        }
    }

    /// Keep `result` if it is at least as urgent as what is already waiting; whichever
    /// result loses is dropped together with its target.
    fn store_pending_event_result(&mut self, id: ActionId, result: EventResult<A>, event: &str) {
        if result.kind().is_continue() {
            return;
        }

        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };

        if result.priority() < node.pending_priority() {
            return;
        }

        if node.pending_priority() == EventPriority::Critical {
            warn!(
                behavior = %self.name,
                actor = self.actor_id,
                action = %node.name,
                event,
                "critical event result collision"
            );
        }
        node.pending = result;
    }

    fn retire(&mut self, id: ActionId) {
        if !self.retired.contains(&id) {
            self.retired.push_back(id);
        }
    }

    fn retire_chain(&mut self, top: ActionId) {
        let mut next = Some(top);
        while let Some(current) = next {
            next = self.nodes.get(current).and_then(|n| n.buried);
            self.retire(current);
        }
    }

    fn drain_retired(&mut self) {
        while let Some(id) = self.retired.pop_front() {
            self.destroy(id);
        }
    }

    fn destroy(&mut self, id: ActionId) {
        let Some(node) = self.nodes.remove(id) else {
            return;
        };

        if let Some(parent) = node.parent.and_then(|p| self.nodes.get_mut(p)) {
            if parent.child == Some(id) {
                parent.child = node.buried;
            }
        }

        if let Some(below) = node.buried.and_then(|b| self.nodes.get_mut(b)) {
            if below.covering == Some(id) {
                below.covering = None;
            }
        }

        let mut child = node.child;
        while let Some(current) = child {
            child = self.nodes.get(current).and_then(|n| n.buried);
            self.destroy(current);
        }

        if let Some(covering) = node
            .covering
            .filter(|c| self.nodes.get(*c).is_some_and(|n| !n.started))
        {
            self.destroy(covering);
        }
    }

    fn name_of(&self, id: ActionId) -> String {
        self.nodes
            .get(id)
            .map(|n| n.name.clone())
            .unwrap_or_else(|| String::from("<released>"))
    }

    fn trace(&mut self, tag: &'static str, id: ActionId, other: Option<ActionId>, reason: Option<&str>) {
        if !self.debug {
            return;
        }

        let action = self.name_of(id);
        let other = other.map(|o| self.name_of(o));
        debug!(
            behavior = %self.name,
            actor = self.actor_id,
            tick = self.tick,
            action = %action,
            other = ?other,
            reason = ?reason,
            "{}",
            tag
        );

        if let Some(sink) = self.trace_sink.as_mut() {
            let mut event = TraceEvent::new(self.tick, tag, action).with_actor(self.actor_id);
            if let Some(other) = other {
                event = event.with_other(other);
            }
            if let Some(reason) = reason {
                event = event.with_reason(reason);
            }
            sink.emit(event);
        }
    }

    /// Innermost child first, then down its suspension chain, then out to the container.
    fn walk<R>(&self, mut ask: impl FnMut(&dyn Action<A>) -> Option<R>) -> Option<R> {
        let mut innermost = self.active?;
        while let Some(child) = self.nodes.get(innermost).and_then(|n| n.child) {
            innermost = child;
        }

        let mut container = Some(innermost);
        while let Some(current) = container {
            container = self.nodes.get(current).and_then(|n| n.parent);

            let mut under = Some(current);
            while let Some(id) = under {
                let Some(node) = self.nodes.get(id) else {
                    break;
                };
                if let Some(action) = node.action.as_deref() {
                    if let Some(answer) = ask(action) {
                        return Some(answer);
                    }
                }
                under = node.buried;
            }
        }

        None
    }
}

impl<A: Actor> EventResponder<A> for Behavior<A> {
    fn on_event(&mut self, me: &mut A, event: &BotEvent<A::Entity>) {
        let Some(active) = self.active else {
            return;
        };
        self.actor_id = me.stable_id();
        self.dispatch_event(me, active, event);
    }
}

impl<A: Actor> ContextualQuery<A> for Behavior<A> {
    fn should_pick_up(&self, me: &A, item: A::Entity) -> QueryAnswer {
        self.walk(|a| a.should_pick_up(me, item).definite())
            .unwrap_or_default()
    }

    fn should_attack(&self, me: &A, them: A::Entity) -> QueryAnswer {
        self.walk(|a| a.should_attack(me, them).definite())
            .unwrap_or_default()
    }

    fn should_hurry(&self, me: &A) -> QueryAnswer {
        self.walk(|a| a.should_hurry(me).definite()).unwrap_or_default()
    }

    fn should_retreat(&self, me: &A) -> QueryAnswer {
        self.walk(|a| a.should_retreat(me).definite())
            .unwrap_or_default()
    }

    fn should_roam(&self, me: &A) -> QueryAnswer {
        self.walk(|a| a.should_roam(me).definite()).unwrap_or_default()
    }

    fn should_use(&self, me: &A, entity: A::Entity) -> QueryAnswer {
        self.walk(|a| a.should_use(me, entity).definite())
            .unwrap_or_default()
    }

    fn is_hindrance(&self, me: &A, blocker: A::Entity) -> QueryAnswer {
        self.walk(|a| a.is_hindrance(me, blocker).definite())
            .unwrap_or_default()
    }

    fn select_target_point(&self, me: &A, subject: A::Entity) -> Option<A::Point> {
        self.walk(|a| a.select_target_point(me, subject))
    }

    fn select_more_dangerous_threat(
        &self,
        me: &A,
        threat1: A::Entity,
        threat2: A::Entity,
    ) -> Option<A::Entity> {
        self.walk(|a| a.select_more_dangerous_threat(me, threat1, threat2))
    }
}
