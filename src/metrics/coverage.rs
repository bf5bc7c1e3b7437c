use hashbrown::HashSet;

use crate::io::ItemId;
use crate::metrics::RankingMetric;

/// Share of the item axis that shows up in at least one top `length` list.
pub struct Coverage {
    qty_training_items: usize,
    recommended_items: HashSet<ItemId>,
    length: usize,
}

impl Coverage {
    pub fn new(qty_training_items: usize, length: usize) -> Coverage {
        Coverage {
            qty_training_items,
            recommended_items: HashSet::new(),
            length,
        }
    }
}

impl RankingMetric for Coverage {
    fn add(&mut self, recommendations: &[ItemId], _held_out_items: &[ItemId]) {
        for item_id in recommendations.iter().take(self.length) {
            self.recommended_items.insert(item_id.clone());
        }
    }

    fn result(&self) -> f64 {
        if self.qty_training_items > 0 {
            self.recommended_items.len() as f64 / self.qty_training_items as f64
        } else {
            0.0
        }
    }

    fn get_name(&self) -> String {
        format!("Coverage@{}", self.length)
    }
}

#[cfg(test)]
mod coverage_test {
    use super::*;
    use crate::metrics::ids;

    #[test]
    fn should_count_distinct_recommended_items() {
        let mut undertest = Coverage::new(10, 2);
        undertest.add(&ids(&["1", "2", "3"]), &[]);
        undertest.add(&ids(&["2", "4"]), &[]);
        assert!((0.3 - undertest.result()).abs() < 1e-12);
        assert_eq!("Coverage@2", undertest.get_name());
    }
}
