//! Tether and damage attribution engine.
//!
//! Rebuilds tether intervals from a report's buff events, attributes direct
//! and snapshotted periodic damage to each interval and ranks who should have
//! received the tether. All provider access goes through [`LogProvider`].

pub mod analysis;
pub mod config;
pub mod damage;
pub mod error;
pub mod fight;
pub mod ids;
pub mod provider;
pub mod ranking;
pub mod tether;

#[cfg(test)]
mod testing;

pub use analysis::{Analysis, analyze, resolve_last_fight};
pub use config::AppConfig;
pub use error::{Result, TetherError};
pub use fight::FightSelector;
pub use provider::{LogClient, LogProvider};
