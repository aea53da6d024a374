//! Motion domain: per-tick snapshots for debugging feel issues.

use std::collections::VecDeque;

use serde::Serialize;

use super::controller::MotionCore;
use super::strategy::StrategyKind;
use super::wall::WallSide;

/// Observable motion state after one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MotionSnapshot {
    pub tick: u64,
    pub strategy: StrategyKind,
    pub vertical_velocity: f32,
    pub ball_velocity: f32,
    pub grounded: bool,
    pub move_x: f32,
    pub wall_side: WallSide,
    pub coyote_remaining: f32,
    pub buffer_remaining: f32,
    pub roll_angle_degrees: f32,
}

impl MotionCore {
    pub fn snapshot(&self) -> MotionSnapshot {
        MotionSnapshot {
            tick: self.tick_count(),
            strategy: self.strategy(),
            vertical_velocity: self.vertical_velocity(),
            ball_velocity: self.ball_velocity(),
            grounded: self.state().grounded,
            move_x: self.input().move_axis.x,
            wall_side: self.wall_side(),
            coyote_remaining: self.timer().coyote_remaining(),
            buffer_remaining: self.timer().buffer_remaining(),
            roll_angle_degrees: self.roll_visual().angle_degrees,
        }
    }
}

/// Bounded history of snapshots, oldest dropped first.
#[derive(Debug, Clone)]
pub struct MotionTrace {
    capacity: usize,
    snapshots: VecDeque<MotionSnapshot>,
}

impl Default for MotionTrace {
    fn default() -> Self {
        Self::with_capacity(600)
    }
}

impl MotionTrace {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            snapshots: VecDeque::with_capacity(capacity),
        }
    }

    pub fn record(&mut self, snapshot: MotionSnapshot) {
        if self.snapshots.len() == self.capacity {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(snapshot);
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn latest(&self) -> Option<&MotionSnapshot> {
        self.snapshots.back()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        let snapshots: Vec<&MotionSnapshot> = self.snapshots.iter().collect();
        serde_json::to_string_pretty(&snapshots)
    }
}
