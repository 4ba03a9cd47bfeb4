use std::collections::HashMap;

use super::model::{GradeTable, GroupStatistic};

// ---------------------------------------------------------------------------
// Aggregation: exam type → mean / median / std
// ---------------------------------------------------------------------------

/// Group scores by exam type and summarise each group.
///
/// Groups come out in the order their exam type first appears in the table.
pub fn aggregate(table: &GradeTable) -> Vec<GroupStatistic> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<f64>)> = Vec::new();

    for rec in &table.records {
        let slot = *index.entry(rec.exam_type.as_str()).or_insert_with(|| {
            groups.push((rec.exam_type.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(rec.score);
    }

    groups
        .into_iter()
        .filter_map(|(exam_type, scores)| summarize(exam_type, scores))
        .collect()
}

fn summarize(exam_type: &str, mut scores: Vec<f64>) -> Option<GroupStatistic> {
    let mean = mean(&scores)?;
    let std = sample_std(&scores, mean);
    let median = median(&mut scores)?;

    Some(GroupStatistic {
        exam_type: exam_type.to_string(),
        count: scores.len(),
        mean: round2(mean),
        median: round2(median),
        std: std.map(round2),
    })
}

/// Running mean; stays finite for any finite input, however large.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut m = 0.0;
    for (i, v) in values.iter().enumerate() {
        let k = (i + 1) as f64;
        m += v / k - m / k;
    }
    Some(m)
}

/// Middle value, or the average of the two middle values. Sorts in place.
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let n = values.len();
    Some(if n % 2 == 0 {
        values[n / 2 - 1] / 2.0 + values[n / 2] / 2.0
    } else {
        values[n / 2]
    })
}

/// Sample standard deviation (n − 1 denominator); undefined below two values.
pub fn sample_std(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    // Deviations are scaled by the largest one so the squares cannot overflow.
    let scale = values
        .iter()
        .map(|v| (v / 2.0 - mean / 2.0).abs())
        .fold(0.0, f64::max);
    if scale == 0.0 {
        return Some(0.0);
    }
    let ss: f64 = values
        .iter()
        .map(|v| ((v / 2.0 - mean / 2.0) / scale).powi(2))
        .sum();
    Some((ss / (values.len() - 1) as f64).sqrt() * scale * 2.0)
}

/// Round to 2 decimals, ties to even (`0.125 → 0.12`, `0.375 → 0.38`).
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        // Far beyond two decimals of precision already.
        return value;
    }
    scaled.round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnNames;
    use crate::data::model::Record;

    fn table(rows: &[(&str, f64, &str)]) -> GradeTable {
        GradeTable::from_records(
            rows.iter()
                .map(|&(s, n, t)| Record::new(s, n, t))
                .collect(),
            ColumnNames::default(),
        )
    }

    #[test]
    fn parcial_and_final_example() {
        let stats = aggregate(&table(&[
            ("Ana", 8.0, "Parcial"),
            ("Luis", 6.0, "Parcial"),
            ("Ana", 9.0, "Final"),
        ]));

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].exam_type, "Parcial");
        assert_eq!(stats[0].mean, 7.0);
        assert_eq!(stats[0].median, 7.0);
        assert_eq!(stats[0].std, Some(1.41));

        assert_eq!(stats[1].exam_type, "Final");
        assert_eq!(stats[1].mean, 9.0);
        assert_eq!(stats[1].median, 9.0);
        assert_eq!(stats[1].std, None);
    }

    #[test]
    fn one_row_per_distinct_exam_type_in_first_appearance_order() {
        let stats = aggregate(&table(&[
            ("A", 4.0, "Tarea"),
            ("B", 5.0, "Final"),
            ("C", 6.0, "Tarea"),
            ("D", 7.0, "Parcial"),
            ("E", 8.0, "Final"),
        ]));
        let order: Vec<&str> = stats.iter().map(|s| s.exam_type.as_str()).collect();
        assert_eq!(order, vec!["Tarea", "Final", "Parcial"]);
        assert_eq!(stats.iter().map(|s| s.count).sum::<usize>(), 5);
    }

    #[test]
    fn std_is_non_negative_and_zero_only_for_identical_scores() {
        let stats = aggregate(&table(&[
            ("A", 5.0, "Same"),
            ("B", 5.0, "Same"),
            ("C", 1.0, "Spread"),
            ("D", 9.0, "Spread"),
            ("E", 4.0, "Spread"),
        ]));
        assert_eq!(stats[0].std, Some(0.0));
        assert!(stats[1].std.unwrap() > 0.0);
    }

    #[test]
    fn even_and_odd_medians() {
        assert_eq!(median(&mut [3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&mut [4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&mut []), None);
    }

    #[test]
    fn rounding_is_half_to_even() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(6.666_666), 6.67);
        assert_eq!(round2(-1.005_1), -1.01);
    }

    #[test]
    fn huge_scores_stay_finite() {
        let stats = aggregate(&table(&[
            ("A", 1e308, "Same"),
            ("B", 1e308, "Same"),
            ("C", 1e308, "Same"),
            ("D", 1.5e308, "Spread"),
            ("E", 1.7e308, "Spread"),
        ]));

        assert_eq!(stats[0].mean, 1e308);
        assert_eq!(stats[0].median, 1e308);
        assert_eq!(stats[0].std, Some(0.0));

        let spread = &stats[1];
        assert!(spread.mean.is_finite() && spread.median.is_finite());
        assert!((spread.mean / 1.6e308 - 1.0).abs() < 1e-12);
        let std = spread.std.unwrap();
        assert!(std.is_finite());
        assert!((std / (0.2e308 / 2f64.sqrt()) - 1.0).abs() < 1e-9);

        let json = serde_json::to_value(spread).unwrap();
        assert!(json["mean"].is_number());
        assert!(json["std"].is_number());
    }

    #[test]
    fn round2_keeps_values_too_large_to_scale() {
        assert_eq!(round2(f64::MAX), f64::MAX);
        assert_eq!(round2(-1e307), -1e307);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let t = table(&[
            ("A", 3.3, "X"),
            ("B", 7.1, "Y"),
            ("C", 5.9, "X"),
            ("D", 6.4, "X"),
        ]);
        assert_eq!(aggregate(&t), aggregate(&t));
    }

    #[test]
    fn empty_table_yields_no_groups() {
        assert!(aggregate(&table(&[])).is_empty());
    }
}
