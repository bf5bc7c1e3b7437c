use crate::io::ItemId;

pub mod coverage;
pub mod evaluation_reporter;
pub mod hitrate;
pub mod mrr;
pub mod ndcg;
pub mod precision;
pub mod recall;

/// Offline ranking metric, fed one hold-out case at a time.
pub trait RankingMetric {
    fn add(&mut self, recommendations: &[ItemId], held_out_items: &[ItemId]);
    fn result(&self) -> f64;
    fn get_name(&self) -> String;
}

#[cfg(test)]
pub(crate) fn ids(values: &[&str]) -> Vec<ItemId> {
    values.iter().map(|value| value.to_string()).collect()
}
