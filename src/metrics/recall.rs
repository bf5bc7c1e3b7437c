use crate::io::ItemId;
use crate::metrics::RankingMetric;

pub struct Recall {
    sum_of_scores: f64,
    qty: usize,
    length: usize,
}

impl Recall {
    /// Returns a Recall evaluation metric: the share of held out items that
    /// made it into the top `length` recommendations.
    pub fn new(length: usize) -> Recall {
        Recall {
            sum_of_scores: 0_f64,
            qty: 0,
            length,
        }
    }
}

impl RankingMetric for Recall {
    fn add(&mut self, recommendations: &[ItemId], held_out_items: &[ItemId]) {
        self.qty += 1;
        if held_out_items.is_empty() {
            return;
        }
        let hits = recommendations
            .iter()
            .take(self.length)
            .filter(|item_id| held_out_items.contains(item_id))
            .count();
        self.sum_of_scores += hits as f64 / held_out_items.len() as f64
    }

    fn result(&self) -> f64 {
        if self.qty > 0 {
            self.sum_of_scores / self.qty as f64
        } else {
            0.0
        }
    }

    fn get_name(&self) -> String {
        format!("Recall@{}", self.length)
    }
}
