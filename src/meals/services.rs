use serde::Serialize;

use crate::meals::repo_types::Meal;

/// Aggregate view over a user's meals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealMetrics {
    pub total_meals: u64,
    pub total_meals_on_diet: u64,
    pub total_meals_off_diet: u64,
    pub best_on_diet_sequence: u64,
}

/// Computes metrics over `meals` in the order given. The streak is the longest
/// contiguous run of on-diet meals in that order; callers pass the same
/// date-descending order the list endpoint uses.
pub fn compute_metrics(meals: &[Meal]) -> MealMetrics {
    tally(meals.iter().map(|m| m.on_diet))
}

fn tally(flags: impl IntoIterator<Item = bool>) -> MealMetrics {
    let mut metrics = MealMetrics::default();
    let mut current = 0u64;
    for on_diet in flags {
        metrics.total_meals += 1;
        if on_diet {
            metrics.total_meals_on_diet += 1;
            current += 1;
        } else {
            metrics.total_meals_off_diet += 1;
            current = 0;
        }
        metrics.best_on_diet_sequence = metrics.best_on_diet_sequence.max(current);
    }
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn meal(on_diet: bool, date: i64) -> Meal {
        Meal {
            id: Uuid::new_v4(),
            owner: Uuid::nil(),
            name: "meal".into(),
            description: String::new(),
            on_diet,
            date,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn empty_input_is_all_zero() {
        assert_eq!(compute_metrics(&[]), MealMetrics::default());
    }

    #[test]
    fn longest_run_wins() {
        let flags = [true, true, false, true, true, true, false];
        let meals: Vec<Meal> = flags
            .iter()
            .enumerate()
            .map(|(i, &f)| meal(f, 1_000 - i as i64))
            .collect();
        assert_eq!(
            compute_metrics(&meals),
            MealMetrics {
                total_meals: 7,
                total_meals_on_diet: 5,
                total_meals_off_diet: 2,
                best_on_diet_sequence: 3,
            }
        );
    }

    #[test]
    fn all_off_diet_has_no_streak() {
        let m = tally([false, false, false]);
        assert_eq!(m.total_meals_off_diet, 3);
        assert_eq!(m.best_on_diet_sequence, 0);
    }

    #[test]
    fn trailing_run_is_counted() {
        assert_eq!(tally([false, true, true, true, true]).best_on_diet_sequence, 4);
        assert_eq!(tally([true]).best_on_diet_sequence, 1);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(tally([true, false])).unwrap();
        assert_eq!(json["totalMeals"], 2);
        assert_eq!(json["totalMealsOnDiet"], 1);
        assert_eq!(json["totalMealsOffDiet"], 1);
        assert_eq!(json["bestOnDietSequence"], 1);
    }
}
