use crate::io::ItemId;
use crate::metrics::RankingMetric;

pub struct Mrr {
    sum_of_scores: f64,
    qty: usize,
    length: usize,
}

impl Mrr {
    pub fn new(length: usize) -> Mrr {
        Mrr {
            sum_of_scores: 0_f64,
            qty: 0,
            length,
        }
    }
}

impl RankingMetric for Mrr {
    /// Reciprocal rank of the first recommendation that was held out.
    fn add(&mut self, recommendations: &[ItemId], held_out_items: &[ItemId]) {
        self.qty += 1;
        let index = recommendations
            .iter()
            .take(self.length)
            .position(|item_id| held_out_items.contains(item_id));
        if let Some(rank) = index {
            self.sum_of_scores += 1_f64 / (rank as f64 + 1_f64)
        }
    }

    fn result(&self) -> f64 {
        if self.qty > 0 {
            self.sum_of_scores / self.qty as f64
        } else {
            0.0
        }
    }

    fn get_name(&self) -> String {
        format!("Mrr@{}", self.length)
    }
}
