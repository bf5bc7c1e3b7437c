use crate::io::ItemId;
use crate::metrics::RankingMetric;

pub struct Ndcg {
    sum_of_scores: f64,
    qty: usize,
    length: usize,
}

impl Ndcg {
    /// Calculate Ndcg for the recommendations against the held out items,
    /// with binary relevance.
    pub fn new(length: usize) -> Ndcg {
        Ndcg {
            sum_of_scores: 0_f64,
            qty: 0,
            length,
        }
    }

    fn gain(position: usize) -> f64 {
        1_f64 / ((position as f64) + 2_f64).log2()
    }
}

impl RankingMetric for Ndcg {
    fn add(&mut self, recommendations: &[ItemId], held_out_items: &[ItemId]) {
        self.qty += 1;
        let dcg: f64 = recommendations
            .iter()
            .take(self.length)
            .enumerate()
            .filter(|(_, item_id)| held_out_items.contains(item_id))
            .map(|(position, _)| Ndcg::gain(position))
            .sum();
        let dcg_max: f64 = (0..held_out_items.len().min(self.length))
            .map(Ndcg::gain)
            .sum();
        if dcg_max > 0.0 {
            self.sum_of_scores += dcg / dcg_max;
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
        format!("Ndcg@{}", self.length)
    }
}
