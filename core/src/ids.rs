//! Ability ids and fixed tuning values for the tether analysis.
//!
//! Buff and debuff ids carry the provider's `1000000` offset; plain action ids
//! (like [`SHARED_DAMAGE_ABILITY`]) do not.

/// The tether buff placed on the recipient (Left Eye).
pub const TETHER_BUFF: i64 = 1001454;

/// Damage amplification the tether grants its recipient.
pub const TETHER_DAMAGE_BONUS: f64 = 1.05;

/// Lookback used when the provider lost a tether's apply event.
pub const TETHER_LOOKBACK_MS: i64 = 20_000;

/// Extra time scanned after a window for ticks of debuffs applied inside it.
/// Covers the longest periodic effect in the game.
pub const TICK_EXTENSION_MS: i64 = 60_000;

/// Debuffs with no periodic damage that flood the event stream.
pub const NOISE_DEBUFFS: &[i64] = &[
    1000493, // Foe Requiem
    1000819, 1000820, 1001203, 1000821, 1000140, 1001195, 1001291, 1001221,
];

/// Ground effects whose ticks are logged against a buff rather than a debuff.
pub const GROUND_EFFECT_BUFFS: &[i64] = &[
    1000190, // Shadow Flare
    1000749, // Salted Earth
    1000501, // Doton
    1001205, // Flamethrower
    1002706, // Slipstream
];

/// Damage dealt by this ability belongs to the actor in `supportID`.
pub const SHARED_DAMAGE_ABILITY: i64 = 799; // Radiant Shield

/// Legacy persistent effect reconciled through aggregate queries (Wildfire).
pub const PERSISTENT_EFFECT: i64 = 1000861;

/// Logs older than this version track the persistent effect separately.
pub const PERSISTENT_EFFECT_MAX_LOG_VERSION: i64 = 20;

/// The persistent effect stops contributing this long before its removal is logged.
pub const PERSISTENT_EFFECT_END_OFFSET_MS: i64 = 750;

/// Share of the owner's damage the persistent effect adds while active.
pub const PERSISTENT_EFFECT_FRACTION: f64 = 0.25;

/// Whether a log of this version uses the legacy persistent effect handling.
pub fn is_legacy_log(log_version: i64) -> bool {
    log_version < PERSISTENT_EFFECT_MAX_LOG_VERSION
}
