use crate::models::match_model::{Prediction, Scores};
use rand::Rng;

pub const MAX_MOCK_SCORE: u32 = 9;

/// Placeholder scoring: every submitting user gets a uniform draw in
/// `0..=MAX_MOCK_SCORE`, unrelated to their answers.
///
/// A user who submitted more than once keeps the position of their first
/// submission and the score of their last.
pub fn mock_scores<R: Rng>(predictions: &[Prediction], rng: &mut R) -> Scores {
    let mut scores = Scores::new();
    for prediction in predictions {
        scores.insert(prediction.user_id.clone(), rng.gen_range(0..=MAX_MOCK_SCORE));
    }
    scores
}

/// Highest score wins; on a tie the user earliest in `scores` wins.
/// Returns `None` for an empty map.
pub fn select_winner(scores: &Scores) -> Option<&str> {
    let mut best: Option<(&str, u32)> = None;
    for (user_id, &score) in scores {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((user_id.as_str(), score)),
        }
    }
    best.map(|(user_id, _)| user_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;
    use uuid::Uuid;

    fn prediction(user_id: &str) -> Prediction {
        Prediction {
            prediction_id: Uuid::new_v4(),
            match_id: Uuid::nil(),
            user_id: user_id.to_string(),
            predictions: HashMap::from([("Q1".to_string(), "A".to_string())]),
            created_at: Utc::now(),
        }
    }

    fn scores(entries: &[(&str, u32)]) -> Scores {
        entries.iter().map(|(u, s)| (u.to_string(), *s)).collect()
    }

    #[test]
    fn every_submitter_gets_a_score_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let predictions: Vec<_> = (0..50).map(|i| prediction(&format!("u{i}"))).collect();

        let scores = mock_scores(&predictions, &mut rng);

        assert_eq!(scores.len(), 50);
        assert!(scores.values().all(|&s| s <= MAX_MOCK_SCORE));
    }

    #[test]
    fn repeat_submitter_keeps_first_position() {
        let mut rng = StdRng::seed_from_u64(1);
        let predictions = vec![prediction("u1"), prediction("u2"), prediction("u1")];

        let scores = mock_scores(&predictions, &mut rng);

        let order: Vec<_> = scores.keys().cloned().collect();
        assert_eq!(order, vec!["u1".to_string(), "u2".to_string()]);
    }

    #[test]
    fn highest_score_wins() {
        let s = scores(&[("a", 3), ("b", 8), ("c", 5)]);
        assert_eq!(select_winner(&s), Some("b"));
    }

    #[test]
    fn tie_goes_to_earliest_entry() {
        let s = scores(&[("a", 2), ("b", 9), ("c", 9), ("d", 9)]);
        assert_eq!(select_winner(&s), Some("b"));

        let all_zero = scores(&[("x", 0), ("y", 0)]);
        assert_eq!(select_winner(&all_zero), Some("x"));
    }

    #[test]
    fn no_scores_means_no_winner() {
        assert_eq!(select_winner(&Scores::new()), None);
    }

    #[test]
    fn winner_is_always_a_scored_user() {
        let mut rng = StdRng::seed_from_u64(42);
        for round in 0..20 {
            let predictions: Vec<_> = (0..=round).map(|i| prediction(&format!("u{i}"))).collect();
            let scores = mock_scores(&predictions, &mut rng);
            let winner = select_winner(&scores).unwrap();
            let top = scores.values().copied().max().unwrap();
            assert_eq!(scores.get(winner), Some(&top));
        }
    }
}
