//! 仿真器
//!
//! 维护当前虚拟时间与待执行事件队列。

use super::event::Event;
use super::scheduled_event::ScheduledEvent;
use super::time::SimTime;
use super::world::World;
use std::collections::BinaryHeap;
use tracing::{debug, info, trace};

/// 事件驱动仿真器。
#[derive(Default)]
pub struct Simulator {
    now: SimTime,
    next_seq: u64,
    executed: u64,
    q: BinaryHeap<ScheduledEvent>,
}

impl Simulator {
    /// 当前仿真时间
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// 已执行的事件数
    pub fn events_executed(&self) -> u64 {
        self.executed
    }

    /// 队列中尚未执行的事件数
    pub fn pending(&self) -> usize {
        self.q.len()
    }

    /// 调度事件在 `at` 执行。`at` 早于当前时间时按当前时间处理。
    #[tracing::instrument(level = "trace", skip(self, ev), fields(event_type = std::any::type_name::<E>(), at = ?at))]
    pub fn schedule<E: Event>(&mut self, at: SimTime, ev: E) {
        let at = at.max(self.now);
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.q.push(ScheduledEvent {
            at,
            seq,
            ev: Box::new(ev),
        });
        trace!(seq, queue_size = self.q.len(), "事件已入队");
    }

    /// 在当前时刻之后 `delay` 调度事件。
    pub fn schedule_in<E: Event>(&mut self, delay: SimTime, ev: E) {
        let at = self.now.after(delay);
        self.schedule(at, ev);
    }

    /// 运行直到队列为空或下一个事件晚于 `until`；结束时时间推进到 `until`。
    pub fn run_until(&mut self, until: SimTime, world: &mut dyn World) {
        debug!(now = ?self.now, until = ?until, queue_size = self.q.len(), "run_until");
        while self.q.peek().is_some_and(|top| top.at <= until) {
            if let Some(item) = self.q.pop() {
                self.step(item, world);
            }
        }
        self.now = self.now.max(until);
    }

    /// 运行所有事件直到队列为空。
    #[tracing::instrument(skip(self, world))]
    pub fn run(&mut self, world: &mut dyn World) {
        info!(queue_size = self.q.len(), "▶️  开始运行仿真");
        while let Some(item) = self.q.pop() {
            self.step(item, world);
        }
        info!(
            total_events = self.executed,
            final_time = ?self.now,
            "✅ 仿真完成"
        );
    }

    fn step(&mut self, item: ScheduledEvent, world: &mut dyn World) {
        self.now = item.at;
        self.executed += 1;
        trace!(seq = item.seq, now = ?self.now, remaining = self.q.len(), "执行事件");
        item.ev.execute(self, world);
        world.on_tick(self);
    }
}
