//! Persistent meta-progression
//!
//! Gold, the highest completed level, and five upgrade tiers, persisted as
//! one JSON record in LocalStorage. Missing or corrupt records fall back to
//! defaults - loading never fails. Every field carries a serde default so a
//! partial record from an older version backfills cleanly.

use serde::{Deserialize, Deserializer, Serialize};

use crate::consts::{MAX_SPEED, MIN_FIRE_SECONDS};
use crate::sim::level::{derived_fire_seconds, derived_speed};

fn default_tier() -> u32 {
    1
}

/// Tiers are 1-based; a stored 0 (written by older builds) reads as 1
fn deserialize_tier<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(u32::deserialize(deserializer)?.max(1))
}

/// The five purchasable upgrade tiers, each starting at 1
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upgrades {
    #[serde(default = "default_tier", deserialize_with = "deserialize_tier")]
    pub speed: u32,
    #[serde(default = "default_tier", deserialize_with = "deserialize_tier")]
    pub fire_rate: u32,
    #[serde(default = "default_tier", deserialize_with = "deserialize_tier")]
    pub damage: u32,
    #[serde(default = "default_tier", deserialize_with = "deserialize_tier")]
    pub hp: u32,
    /// Bullets per volley (1-3); raised through the fire-rate ladder once
    /// the interval is floored
    #[serde(default = "default_tier", deserialize_with = "deserialize_tier")]
    pub shot: u32,
}

impl Default for Upgrades {
    fn default() -> Self {
        Self {
            speed: 1,
            fire_rate: 1,
            damage: 1,
            hp: 1,
            shot: 1,
        }
    }
}

/// Stats a player can spend gold on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeKind {
    Speed,
    FireRate,
    Damage,
    Hp,
}

/// Why a purchase was refused. Refusal never mutates the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeError {
    /// Not enough gold for the quoted cost
    InsufficientGold { cost: u64 },
    /// The stat is already at its cap
    Maxed,
}

impl std::fmt::Display for UpgradeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpgradeError::InsufficientGold { cost } => {
                write!(f, "not enough gold (need {cost})")
            }
            UpgradeError::Maxed => write!(f, "upgrade already at maximum"),
        }
    }
}

impl std::error::Error for UpgradeError {}

/// Persistent progress record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Progress {
    #[serde(default)]
    pub gold: u64,
    #[serde(default)]
    pub highest_level_completed: u32,
    #[serde(default)]
    pub upgrades: Upgrades,
}

/// Gold cost of the 2nd volley barrel
const SECOND_BARREL_COST: u64 = 500;
/// Gold cost of the 3rd volley barrel
const THIRD_BARREL_COST: u64 = 1000;
/// Hard cap on bullets per volley
const MAX_SHOT: u32 = 3;

impl Progress {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "duck_blast_progress";

    /// Standard cost curve for tiered upgrades
    pub fn upgrade_cost(tier: u32) -> u64 {
        100 + (tier as u64 - 1) * 50
    }

    /// Cost of the next purchase for a stat, or None once it is maxed.
    /// For `FireRate` this follows the ladder: interval tiers first, then
    /// the 2nd and 3rd barrels.
    pub fn next_cost(&self, kind: UpgradeKind) -> Option<u64> {
        match kind {
            UpgradeKind::Speed => {
                if derived_speed(self.upgrades.speed) >= MAX_SPEED {
                    None
                } else {
                    Some(Self::upgrade_cost(self.upgrades.speed))
                }
            }
            UpgradeKind::FireRate => {
                if derived_fire_seconds(self.upgrades.fire_rate) > MIN_FIRE_SECONDS {
                    Some(Self::upgrade_cost(self.upgrades.fire_rate))
                } else {
                    match self.upgrades.shot {
                        1 => Some(SECOND_BARREL_COST),
                        2 => Some(THIRD_BARREL_COST),
                        _ => None,
                    }
                }
            }
            UpgradeKind::Damage => Some(Self::upgrade_cost(self.upgrades.damage)),
            UpgradeKind::Hp => Some(Self::upgrade_cost(self.upgrades.hp)),
        }
    }

    /// Buy one tier of an upgrade. Atomic: on success the cost is deducted
    /// and the tier incremented together, on error nothing changes.
    /// Returns the gold spent; the caller must persist after a success.
    pub fn buy_upgrade(&mut self, kind: UpgradeKind) -> Result<u64, UpgradeError> {
        let cost = self.next_cost(kind).ok_or(UpgradeError::Maxed)?;
        if self.gold < cost {
            return Err(UpgradeError::InsufficientGold { cost });
        }

        self.gold -= cost;
        match kind {
            UpgradeKind::Speed => self.upgrades.speed += 1,
            UpgradeKind::Damage => self.upgrades.damage += 1,
            UpgradeKind::Hp => self.upgrades.hp += 1,
            UpgradeKind::FireRate => {
                if derived_fire_seconds(self.upgrades.fire_rate) > MIN_FIRE_SECONDS {
                    self.upgrades.fire_rate += 1;
                } else {
                    self.upgrades.shot = (self.upgrades.shot + 1).min(MAX_SHOT);
                }
            }
        }
        Ok(cost)
    }

    /// Load progress from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(progress) => {
                        log::info!("Loaded saved progress");
                        return progress;
                    }
                    Err(e) => log::warn!("Corrupt progress record, starting fresh: {e}"),
                }
            }
        }

        log::info!("No saved progress, starting fresh");
        Self::default()
    }

    /// Save progress to LocalStorage (WASM only). Called synchronously
    /// after every purchase and level win.
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Progress saved (gold {})", self.gold);
            }
        }
    }

    /// Wipe the stored record (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn clear_saved() {
        if let Some(storage) = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
        {
            let _ = storage.remove_item(Self::STORAGE_KEY);
            log::info!("Saved progress cleared");
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn clear_saved() {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_curve() {
        assert_eq!(Progress::upgrade_cost(1), 100);
        assert_eq!(Progress::upgrade_cost(2), 150);
        assert_eq!(Progress::upgrade_cost(10), 550);
    }

    #[test]
    fn purchase_deducts_and_increments_together() {
        let mut progress = Progress {
            gold: 100,
            ..Default::default()
        };
        let spent = progress.buy_upgrade(UpgradeKind::Damage).unwrap();
        assert_eq!(spent, 100);
        assert_eq!(progress.gold, 0);
        assert_eq!(progress.upgrades.damage, 2);
    }

    #[test]
    fn refused_purchase_mutates_nothing() {
        let mut progress = Progress {
            gold: 99,
            ..Default::default()
        };
        let before = progress.clone();
        let err = progress.buy_upgrade(UpgradeKind::Hp).unwrap_err();
        assert_eq!(err, UpgradeError::InsufficientGold { cost: 100 });
        assert_eq!(progress, before);
    }

    #[test]
    fn gold_never_goes_negative_over_purchase_sequences() {
        let mut progress = Progress {
            gold: 400,
            ..Default::default()
        };
        let kinds = [
            UpgradeKind::Damage,
            UpgradeKind::Hp,
            UpgradeKind::Speed,
            UpgradeKind::FireRate,
            UpgradeKind::Damage,
            UpgradeKind::Hp,
        ];
        for kind in kinds {
            let _ = progress.buy_upgrade(kind);
            // u64 can't be negative; make sure refusals also left a
            // consistent record behind
            let spent_tiers: u32 = progress.upgrades.damage
                + progress.upgrades.hp
                + progress.upgrades.speed
                + progress.upgrades.fire_rate;
            assert!(spent_tiers >= 4);
        }
        assert!(progress.gold < 400);
    }

    #[test]
    fn speed_maxes_at_the_cap() {
        let mut progress = Progress {
            gold: u64::MAX,
            ..Default::default()
        };
        // Tier 16 derives exactly 5.0 px/frame
        while progress.upgrades.speed < 16 {
            progress.buy_upgrade(UpgradeKind::Speed).unwrap();
        }
        assert_eq!(progress.buy_upgrade(UpgradeKind::Speed), Err(UpgradeError::Maxed));
        assert_eq!(progress.next_cost(UpgradeKind::Speed), None);
    }

    #[test]
    fn fire_rate_ladder_rolls_into_barrels() {
        let mut progress = Progress {
            gold: 10_000,
            ..Default::default()
        };
        // Tiers 1..=5 shorten the interval; tier 6 hits the 0.5 s floor
        for _ in 0..5 {
            progress.buy_upgrade(UpgradeKind::FireRate).unwrap();
        }
        assert_eq!(progress.upgrades.fire_rate, 6);
        assert_eq!(progress.upgrades.shot, 1);

        // Floored: next purchases buy barrels instead
        assert_eq!(progress.next_cost(UpgradeKind::FireRate), Some(500));
        progress.buy_upgrade(UpgradeKind::FireRate).unwrap();
        assert_eq!(progress.upgrades.shot, 2);
        assert_eq!(progress.next_cost(UpgradeKind::FireRate), Some(1000));
        progress.buy_upgrade(UpgradeKind::FireRate).unwrap();
        assert_eq!(progress.upgrades.shot, 3);
        assert_eq!(progress.upgrades.fire_rate, 6, "interval tier stays put");

        assert_eq!(progress.buy_upgrade(UpgradeKind::FireRate), Err(UpgradeError::Maxed));
    }

    #[test]
    fn partial_record_backfills_defaults() {
        let progress: Progress = serde_json::from_str(r#"{"gold": 250}"#).unwrap();
        assert_eq!(progress.gold, 250);
        assert_eq!(progress.highest_level_completed, 0);
        assert_eq!(progress.upgrades, Upgrades::default());

        // An older record missing some upgrade fields
        let progress: Progress =
            serde_json::from_str(r#"{"gold": 1, "upgrades": {"speed": 3}}"#).unwrap();
        assert_eq!(progress.upgrades.speed, 3);
        assert_eq!(progress.upgrades.shot, 1);
    }

    #[test]
    fn zero_tier_record_reads_as_tier_one() {
        // Explicit zeros bypass the serde defaults; they must still come
        // out 1-based or the cost curve underflows
        let progress: Progress =
            serde_json::from_str(r#"{"gold": 50, "upgrades": {"speed": 0, "hp": 0}}"#).unwrap();
        assert_eq!(progress.upgrades.speed, 1);
        assert_eq!(progress.upgrades.hp, 1);
        assert_eq!(progress.next_cost(UpgradeKind::Speed), Some(100));
        assert_eq!(progress.next_cost(UpgradeKind::Hp), Some(100));
    }

    #[test]
    fn record_round_trips() {
        let mut progress = Progress {
            gold: 777,
            highest_level_completed: 9,
            ..Default::default()
        };
        progress.upgrades.damage = 4;
        let json = serde_json::to_string(&progress).unwrap();
        let back: Progress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, progress);
    }
}
