use std::collections::HashMap;

use tethercalc_types::ActorId;

/// Damage per actor, remembering the order actors were first credited.
///
/// First-credit order is the provider's response order, which is what breaks
/// ties when totals are ranked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DamageTotals {
    order: Vec<ActorId>,
    amounts: HashMap<ActorId, i64>,
}

impl DamageTotals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn credit(&mut self, actor: ActorId, amount: i64) {
        match self.amounts.get_mut(&actor) {
            Some(total) => *total += amount,
            None => {
                self.order.push(actor);
                self.amounts.insert(actor, amount);
            }
        }
    }

    pub fn get(&self, actor: ActorId) -> Option<i64> {
        self.amounts.get(&actor).copied()
    }

    /// Replace an existing total; absent actors are left absent.
    pub fn update(&mut self, actor: ActorId, f: impl FnOnce(i64) -> i64) {
        if let Some(total) = self.amounts.get_mut(&actor) {
            *total = f(*total);
        }
    }

    /// Add every total of `other`, keeping this map's order first.
    pub fn merge(&mut self, other: &DamageTotals) {
        for (actor, amount) in other.iter() {
            self.credit(actor, amount);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActorId, i64)> + '_ {
        self.order.iter().map(|id| (*id, self.amounts[id]))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl FromIterator<(ActorId, i64)> for DamageTotals {
    fn from_iter<I: IntoIterator<Item = (ActorId, i64)>>(iter: I) -> Self {
        let mut totals = Self::new();
        for (actor, amount) in iter {
            totals.credit(actor, amount);
        }
        totals
    }
}
