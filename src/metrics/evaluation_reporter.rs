use crate::io::ItemId;
use crate::metrics::coverage::Coverage;
use crate::metrics::hitrate::HitRate;
use crate::metrics::mrr::Mrr;
use crate::metrics::ndcg::Ndcg;
use crate::metrics::precision::Precision;
use crate::metrics::recall::Recall;
use crate::metrics::RankingMetric;

pub struct EvaluationReporter {
    metrics: Vec<Box<dyn RankingMetric + Send>>,
}

impl EvaluationReporter {
    pub fn new(qty_training_items: usize, length: usize) -> EvaluationReporter {
        EvaluationReporter {
            metrics: vec![
                Box::new(Mrr::new(length)),
                Box::new(Ndcg::new(length)),
                Box::new(HitRate::new(length)),
                Box::new(Precision::new(length)),
                Box::new(Recall::new(length)),
                Box::new(Coverage::new(qty_training_items, length)),
            ],
        }
    }

    pub fn add(&mut self, recommendations: &[ItemId], held_out_items: &[ItemId]) {
        for metric in self.metrics.iter_mut() {
            metric.add(recommendations, held_out_items);
        }
    }

    pub fn result(&self) -> String {
        self.metrics
            .iter()
            .map(|metric| format!("{:.4}", metric.result()))
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn get_name(&self) -> String {
        self.metrics
            .iter()
            .map(|metric| metric.get_name())
            .collect::<Vec<_>>()
            .join(",")
    }
}
