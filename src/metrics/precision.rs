use crate::io::ItemId;
use crate::metrics::RankingMetric;

pub struct Precision {
    sum_of_scores: f64,
    qty: usize,
    length: usize,
}

impl Precision {
    /// Returns a Precision evaluation metric: the share of the `length`
    /// recommendation slots filled with a held out item.
    ///
    /// # Arguments
    ///
    /// * `length` - the length aka 'k' that will be used for evaluation.
    ///
    pub fn new(length: usize) -> Precision {
        Precision {
            sum_of_scores: 0_f64,
            qty: 0,
            length,
        }
    }
}

impl RankingMetric for Precision {
    fn add(&mut self, recommendations: &[ItemId], held_out_items: &[ItemId]) {
        self.qty += 1;
        let hits = recommendations
            .iter()
            .take(self.length)
            .filter(|item_id| held_out_items.contains(item_id))
            .count();
        if self.length > 0 {
            self.sum_of_scores += hits as f64 / self.length as f64
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
        format!("Precision@{}", self.length)
    }
}

#[cfg(test)]
mod precision_test {
    use super::*;
    use crate::metrics::ids;

    #[test]
    fn should_calculate_precision() {
        let length = 4;
        let mut mymetric = Precision::new(length);
        mymetric.add(&ids(&["1", "2", "3", "4", "5"]), &ids(&["3", "55", "5", "4"]));
        assert!((2.0 / length as f64 - mymetric.result()).abs() < f64::EPSILON);
        assert_eq!("Precision@4", mymetric.get_name());
    }

    #[test]
    fn should_stay_finite_for_zero_length() {
        let mut mymetric = Precision::new(0);
        mymetric.add(&ids(&["1", "2"]), &ids(&["1"]));
        assert!((0.0 - mymetric.result()).abs() < f64::EPSILON);
    }
}
