//! Player domain: motion outbox forwarded as messages.

use bevy::ecs::message::Message;
use bevy::prelude::*;

use crate::motion::StrategyKind;

/// Fired when a ground, buffered, coyote or wall jump launches.
#[derive(Debug, Clone, Copy)]
pub struct JumpMessage {
    pub entity: Entity,
    pub velocity: f32,
    pub from_wall: bool,
}

impl Message for JumpMessage {}

#[derive(Debug, Clone, Copy)]
pub struct LandMessage {
    pub entity: Entity,
}

impl Message for LandMessage {}

/// Fired once per qualifying rock landing.
#[derive(Debug, Clone, Copy)]
pub struct SmashMessage {
    pub entity: Entity,
    pub impact_speed: f32,
}

impl Message for SmashMessage {}

#[derive(Debug, Clone, Copy)]
pub struct BounceMessage {
    pub entity: Entity,
    pub velocity: f32,
    pub impact_speed: f32,
}

impl Message for BounceMessage {}

#[derive(Debug, Clone, Copy)]
pub struct FormChangedMessage {
    pub entity: Entity,
    pub from: StrategyKind,
    pub to: StrategyKind,
}

impl Message for FormChangedMessage {}
