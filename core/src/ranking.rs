//! Combine per-window damage and pick the tether's correct target.

use tethercalc_types::{ActorId, CorrectTarget, Friends};

use crate::damage::DamageTotals;
use crate::ids::TETHER_DAMAGE_BONUS;
use crate::tether::TetherInterval;

/// Damage ranking of one tether window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranking {
    /// Highest damage first; ties keep first-credit order.
    pub damages: Vec<(ActorId, i64)>,
    pub correct: CorrectTarget,
}

/// Strip the tether's own amplification from its recipient's damage.
///
/// Non-positive totals are returned unchanged.
pub fn remove_tether_bonus(amount: i64) -> i64 {
    if amount <= 0 {
        return amount;
    }
    (amount as f64 / TETHER_DAMAGE_BONUS) as i64
}

/// Merge direct and tick damage, correct the recipient, and rank.
///
/// The correct target is the highest-ranked actor that is neither the caster
/// nor a limit break. Actors missing from `friends` stay eligible.
pub fn combine_and_rank(
    direct: &DamageTotals,
    ticks: &DamageTotals,
    tether: &TetherInterval,
    friends: &Friends,
) -> Ranking {
    let mut merged = direct.clone();
    merged.merge(ticks);
    merged.update(tether.target, remove_tether_bonus);

    let mut damages: Vec<(ActorId, i64)> = merged.iter().collect();
    // stable: equal totals stay in first-credit order
    damages.sort_by(|a, b| b.1.cmp(&a.1));

    let correct = damages
        .iter()
        .map(|&(id, _)| id)
        .filter(|&id| id != tether.source)
        .find(|id| !friends.get(id).is_some_and(|a| a.is_limit_break()))
        .map(|id| CorrectTarget::Actor {
            id,
            name: friends
                .get(&id)
                .map(|a| a.name.clone())
                .unwrap_or_else(|| format!("Unknown ({id})")),
        })
        .unwrap_or(CorrectTarget::Nobody);

    Ranking { damages, correct }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::actor;

    const A: ActorId = 1;
    const B: ActorId = 2;
    const C: ActorId = 3;
    const LB: ActorId = 9;

    fn friends() -> Friends {
        [
            actor(A, "Alpha", "Dragoon"),
            actor(B, "Bravo", "Samurai"),
            actor(C, "Charlie", "Bard"),
            actor(LB, "Limit Break", "LimitBreak"),
        ]
        .into_iter()
        .map(|a| (a.id, a))
        .collect()
    }

    fn tether(source: ActorId, target: ActorId) -> TetherInterval {
        TetherInterval {
            source,
            target,
            start: 1_000,
            end: 5_000,
        }
    }

    fn totals(entries: &[(ActorId, i64)]) -> DamageTotals {
        entries.iter().copied().collect()
    }

    #[test]
    fn recipient_is_corrected_and_ranked() {
        let ranking = combine_and_rank(
            &totals(&[(A, 5_000), (B, 3_000)]),
            &totals(&[(A, 1_000)]),
            &tether(C, A),
            &friends(),
        );
        assert_eq!(ranking.damages, vec![(A, 5_714), (B, 3_000)]);
        assert_eq!(
            ranking.correct,
            CorrectTarget::Actor { id: A, name: "Alpha".into() }
        );
    }

    #[test]
    fn caster_is_never_the_correct_target() {
        let ranking = combine_and_rank(
            &totals(&[(A, 5_000), (B, 3_000)]),
            &totals(&[(A, 1_000)]),
            &tether(A, A),
            &friends(),
        );
        assert_eq!(ranking.correct.actor_id(), Some(B));
    }

    #[test]
    fn limit_break_is_skipped() {
        let ranking = combine_and_rank(
            &totals(&[(LB, 90_000), (C, 2_000), (B, 1_000)]),
            &DamageTotals::new(),
            &tether(A, B),
            &friends(),
        );
        assert_eq!(ranking.damages[0], (LB, 90_000));
        assert_eq!(ranking.correct.actor_id(), Some(C));
    }

    #[test]
    fn no_candidate_is_nobody() {
        let ranking = combine_and_rank(
            &totals(&[(A, 4_000), (LB, 10_000)]),
            &DamageTotals::new(),
            &tether(A, B),
            &friends(),
        );
        assert_eq!(ranking.correct, CorrectTarget::Nobody);

        let empty = combine_and_rank(
            &DamageTotals::new(),
            &DamageTotals::new(),
            &tether(A, B),
            &friends(),
        );
        assert!(empty.damages.is_empty());
        assert_eq!(empty.correct, CorrectTarget::Nobody);
    }

    #[test]
    fn ties_keep_first_credit_order() {
        let ranking = combine_and_rank(
            &totals(&[(C, 1_000), (B, 2_000)]),
            &totals(&[(A, 2_000), (C, 1_000)]),
            &tether(LB, LB),
            &friends(),
        );
        assert_eq!(ranking.damages, vec![(C, 2_000), (B, 2_000), (A, 2_000)]);
        assert_eq!(ranking.correct.actor_id(), Some(C));
    }

    #[test]
    fn actor_outside_roster_is_eligible() {
        let ranking = combine_and_rank(
            &totals(&[(42, 100)]),
            &DamageTotals::new(),
            &tether(A, B),
            &friends(),
        );
        assert_eq!(
            ranking.correct,
            CorrectTarget::Actor { id: 42, name: "Unknown (42)".into() }
        );
    }

    #[test]
    fn tether_bonus_removal_never_goes_negative() {
        for amount in [0, 1, 20, 1_049, 1_050, 6_000, 123_456_789] {
            let corrected = remove_tether_bonus(amount);
            assert!(corrected >= 0, "{amount} -> {corrected}");
            assert!(corrected <= amount);
        }
        assert_eq!(remove_tether_bonus(6_000), 5_714);
        assert_eq!(remove_tether_bonus(0), 0);
    }

    #[test]
    fn zero_damage_recipient_is_untouched() {
        let ranking = combine_and_rank(
            &totals(&[(B, 0), (C, 10)]),
            &DamageTotals::new(),
            &tether(A, B),
            &friends(),
        );
        assert_eq!(ranking.damages, vec![(C, 10), (B, 0)]);
    }

    #[test]
    fn ranking_is_idempotent() {
        let direct = totals(&[(A, 700), (B, 700), (C, 900)]);
        let ticks = totals(&[(B, 200), (LB, 50)]);
        let first = combine_and_rank(&direct, &ticks, &tether(C, A), &friends());
        for _ in 0..5 {
            assert_eq!(combine_and_rank(&direct, &ticks, &tether(C, A), &friends()), first);
        }
    }
}
