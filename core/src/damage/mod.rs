//! Per-window damage attribution
//!
//! - **direct**: provider-aggregated non-periodic damage
//! - **ticks**: periodic damage credited to the window its snapshot fell in
//! - **persistent**: legacy persistent-effect reconciliation used by `ticks`

pub mod direct;
pub mod persistent;
pub mod ticks;
mod totals;


pub use direct::direct_damage;
pub use persistent::{PersistentEffectRecord, Placement};
pub use ticks::{ActiveDebuffKey, TickAttribution, attribute_ticks, tick_damage};
pub use totals::DamageTotals;
