// ═══════════════════════════════════════════════════════════════════════
// Odds — Monte Carlo table of full-battle win chances
// ═══════════════════════════════════════════════════════════════════════

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use risk_engine::combat::estimate_win_probability;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsTable {
    pub max_attackers: u32,
    pub max_defenders: u32,
    pub trials: u32,
    /// `rows[a - 1][d - 1]` is the chance that `a` committed attackers
    /// wipe out `d` defenders.
    pub rows: Vec<Vec<f64>>,
}

impl OddsTable {
    pub fn get(&self, attackers: u32, defenders: u32) -> Option<f64> {
        let a = attackers.checked_sub(1)? as usize;
        let d = defenders.checked_sub(1)? as usize;
        self.rows.get(a)?.get(d).copied()
    }
}

/// Every cell gets its own generator derived from `seed`, so the table is
/// the same however rayon splits the work.
pub fn probability_table(max_attackers: u32, max_defenders: u32, trials: u32, seed: u64) -> OddsTable {
    let rows = (1..=max_attackers)
        .into_par_iter()
        .map(|a| {
            (1..=max_defenders)
                .map(|d| {
                    let cell_seed = seed ^ (u64::from(a) << 32 | u64::from(d));
                    let mut rng = ChaCha8Rng::seed_from_u64(cell_seed);
                    estimate_win_probability(a, d, trials, &mut rng)
                })
                .collect()
        })
        .collect();

    OddsTable { max_attackers, max_defenders, trials, rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_shape_and_lookup() {
        let table = probability_table(4, 3, 200, 1);
        assert_eq!(table.rows.len(), 4);
        assert!(table.rows.iter().all(|r| r.len() == 3));
        assert!(table.get(0, 1).is_none());
        assert!(table.get(5, 1).is_none());
        assert!(table.get(4, 3).is_some());
    }

    #[test]
    fn table_is_reproducible() {
        assert_eq!(probability_table(5, 5, 100, 9), probability_table(5, 5, 100, 9));
    }

    #[test]
    fn more_attackers_win_more_often() {
        let table = probability_table(12, 2, 2000, 3);
        let weak = table.get(1, 2).unwrap();
        let strong = table.get(12, 2).unwrap();
        assert!(strong > 0.9);
        assert!(weak < 0.2);
    }
}
