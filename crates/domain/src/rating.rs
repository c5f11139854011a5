//! Rating aggregation.

use rust_decimal::Decimal;
use store::BookRelation;

/// The arithmetic mean of all non-absent rates, rounded to 2 decimal
/// places (the decimal library's default midpoint rounding).
///
/// Returns `None` when no relation carries a rate; a book nobody has
/// rated has no rating, not a zero one.
pub fn average_rating(relations: &[BookRelation]) -> Option<Decimal> {
    let rates: Vec<i64> = relations
        .iter()
        .filter_map(|r| r.rate.map(i64::from))
        .collect();

    if rates.is_empty() {
        return None;
    }

    let sum: i64 = rates.iter().sum();
    let mean = Decimal::from(sum) / Decimal::from(rates.len() as i64);
    Some(mean.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{BookId, UserId};

    fn relation(rate: Option<i32>) -> BookRelation {
        BookRelation {
            rate,
            ..BookRelation::new(UserId::new(), BookId::new())
        }
    }

    #[test]
    fn no_rates_means_no_rating() {
        assert_eq!(average_rating(&[]), None);
        assert_eq!(average_rating(&[relation(None), relation(None)]), None);
    }

    #[test]
    fn averages_only_present_rates() {
        let relations = [relation(Some(4)), relation(None), relation(Some(2))];
        assert_eq!(average_rating(&relations), Some("3.00".parse().unwrap()));
    }

    #[test]
    fn rounds_to_two_decimal_places() {
        // 5, 5, 4 -> 14 / 3 = 4.666... -> 4.67
        let relations = [relation(Some(5)), relation(Some(5)), relation(Some(4))];
        assert_eq!(average_rating(&relations), Some("4.67".parse().unwrap()));
    }

    #[test]
    fn single_rate_is_its_own_average() {
        assert_eq!(
            average_rating(&[relation(Some(1))]),
            Some("1.00".parse::<Decimal>().unwrap())
        );
    }
}
