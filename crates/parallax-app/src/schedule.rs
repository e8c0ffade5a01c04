//! Host schedule stages and the fixed-step runner.

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::{IntoSystemConfigs, ScheduleLabel};
use tracing::debug;

/// Host execution stages, run in this order every frame.
#[derive(ScheduleLabel, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostStage {
    /// Variable-rate frame logic (world switching, camera follow).
    Update,
    /// Fixed-rate simulation (locomotion, physics).
    FixedUpdate,
    /// After simulation (follow target refresh).
    PostUpdate,
}

/// The three host schedules plus the fixed-step accumulator.
///
/// `FixedUpdate` is driven by *scaled* frame time, so a slowed time scale
/// runs fewer fixed steps per frame.
pub struct HostSchedules {
    update: Schedule,
    fixed_update: Schedule,
    post_update: Schedule,
    fixed_accumulator: f64,
    fixed_dt: f64,
    max_fixed_steps: u32,
}

impl HostSchedules {
    pub fn new(fixed_dt: f32, max_fixed_steps: u32) -> Self {
        Self {
            update: Schedule::new(HostStage::Update),
            fixed_update: Schedule::new(HostStage::FixedUpdate),
            post_update: Schedule::new(HostStage::PostUpdate),
            fixed_accumulator: 0.0,
            fixed_dt: f64::from(fixed_dt),
            max_fixed_steps,
        }
    }

    /// Register a system (or system tuple) into a stage.
    pub fn add_system<M>(&mut self, stage: HostStage, system: impl IntoSystemConfigs<M>) {
        self.schedule_mut(stage).add_systems(system);
    }

    pub fn schedule_mut(&mut self, stage: HostStage) -> &mut Schedule {
        match stage {
            HostStage::Update => &mut self.update,
            HostStage::FixedUpdate => &mut self.fixed_update,
            HostStage::PostUpdate => &mut self.post_update,
        }
    }

    pub fn run_update(&mut self, world: &mut World) {
        self.update.run(world);
    }

    /// Runs the fixed steps owed for `scaled_dt` more seconds of simulation,
    /// at most `max_fixed_steps`. Time owed beyond the cap is dropped.
    ///
    /// `before_step` runs ahead of each step, e.g. to publish the step index.
    pub fn run_fixed(
        &mut self,
        world: &mut World,
        scaled_dt: f32,
        mut before_step: impl FnMut(&mut World),
    ) -> u32 {
        self.fixed_accumulator += f64::from(scaled_dt);
        let mut steps = 0;
        while self.fixed_accumulator >= self.fixed_dt && steps < self.max_fixed_steps {
            before_step(world);
            self.fixed_update.run(world);
            self.fixed_accumulator -= self.fixed_dt;
            steps += 1;
        }
        if self.fixed_accumulator >= self.fixed_dt {
            debug!(
                dropped = self.fixed_accumulator,
                steps, "fixed step cap reached, dropping owed time"
            );
            self.fixed_accumulator %= self.fixed_dt;
        }
        steps
    }

    pub fn run_post_update(&mut self, world: &mut World) {
        self.post_update.run(world);
    }

    /// Returns the current fixed-update accumulator value in seconds.
    pub fn fixed_accumulator(&self) -> f64 {
        self.fixed_accumulator
    }

    /// Force-initialize all schedules, validating the dependency graph.
    pub fn initialize_all(&mut self, world: &mut World) {
        for schedule in [
            &mut self.update,
            &mut self.fixed_update,
            &mut self.post_update,
        ] {
            let _ = schedule.initialize(world);
        }
    }
}
