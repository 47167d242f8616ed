use super::super::domain::{Rank, ScoreValue};
use super::super::schema::AssessmentSchema;
use super::super::store::ScoreStore;
use super::views::{
    AssessmentResult, BarPoint, CategoryBarSeries, ChartSeries, GaugeView, RadarPoint, RadarView,
};

pub(crate) fn build_chart_series(
    schema: &AssessmentSchema,
    store: &ScoreStore,
    result: &AssessmentResult,
) -> ChartSeries {
    ChartSeries {
        gauge: gauge(result),
        radar: radar(result),
        bars: schema
            .categories()
            .iter()
            .map(|category| CategoryBarSeries {
                category_id: category.id,
                points: category
                    .criteria
                    .iter()
                    .map(|criterion| {
                        let score = store.score(category.id, criterion.id);
                        bar_point(criterion.id, criterion.text, score)
                    })
                    .collect(),
            })
            .collect(),
    }
}

fn gauge(result: &AssessmentResult) -> GaugeView {
    let max = f64::from(result.max_score);
    let proportion = if max > 0.0 {
        (result.total_score / max).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let rounded_score = result.badge_score();

    GaugeView {
        score: result.total_score,
        max: result.max_score,
        proportion,
        rounded_score,
        color: gauge_color(result.total_score),
        accessible_label: format!(
            "Tachometerdiagramm: Aktueller Punktestand ist {rounded_score} von {} möglichen Punkten.",
            result.max_score
        ),
    }
}

/// Gauge fill follows the rank tiers.
fn gauge_color(total_score: f64) -> &'static str {
    match Rank::classify(total_score) {
        Rank::Top => "#10b981",
        Rank::Good => "#3b82f6",
        Rank::Critical => "#f59e0b",
        Rank::Failed => "#ef4444",
    }
}

fn radar(result: &AssessmentResult) -> RadarView {
    let points: Vec<RadarPoint> = result
        .category_scores
        .iter()
        .map(|category| RadarPoint {
            subject: format!(
                "Cat {}",
                category.id.strip_prefix('c').unwrap_or(category.id)
            ),
            full_subject: category.title,
            value: category.percentage.round() as i64,
            full_mark: 100,
        })
        .collect();

    let accessible_summary = points
        .iter()
        .map(|point| format!("{}: {}%", point.full_subject, point.value))
        .collect::<Vec<_>>()
        .join(", ");

    RadarView {
        points,
        accessible_summary,
    }
}

fn bar_point(criterion_id: &'static str, label: &'static str, score: ScoreValue) -> BarPoint {
    BarPoint {
        criterion_id,
        label,
        score,
        scale_label: score.label(),
        color: score.color(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::report::compute;

    #[test]
    fn gauge_tracks_rank_colors_and_rounds_label() {
        let schema = AssessmentSchema::standard();
        let mut store = ScoreStore::seeded(&schema);
        for id in ["5.1", "5.2", "5.3", "5.4", "5.5"] {
            store
                .set_score("c5", id, ScoreValue::Met)
                .expect("c5 criterion");
        }
        store
            .set_score("c1", "1.1", ScoreValue::Partial)
            .expect("c1 criterion");

        let result = compute(&schema, &store);
        let charts = build_chart_series(&schema, &store, &result);

        assert!((charts.gauge.score - 43.0).abs() < 1e-9);
        assert_eq!(charts.gauge.rounded_score, 43);
        assert_eq!(charts.gauge.color, "#ef4444");
        assert!(charts
            .gauge
            .accessible_label
            .contains("43 von 300 möglichen Punkten"));
        assert!((charts.gauge.proportion - 43.0 / 300.0).abs() < 1e-9);
    }

    #[test]
    fn gauge_color_boundaries() {
        assert_eq!(gauge_color(119.9), "#ef4444");
        assert_eq!(gauge_color(120.0), "#f59e0b");
        assert_eq!(gauge_color(180.0), "#3b82f6");
        assert_eq!(gauge_color(240.0), "#10b981");
    }

    #[test]
    fn radar_uses_short_subjects_and_rounded_percentages() {
        let schema = AssessmentSchema::standard();
        let mut store = ScoreStore::seeded(&schema);
        store
            .set_score("c6", "6.1", ScoreValue::Met)
            .expect("c6 criterion");

        let result = compute(&schema, &store);
        let charts = build_chart_series(&schema, &store, &result);

        let c6 = &charts.radar.points[5];
        assert_eq!(c6.subject, "Cat 6");
        assert_eq!(c6.full_subject, "6. Akzeptanz und Organisation");
        assert_eq!(c6.value, 22);
        assert_eq!(c6.full_mark, 100);
        assert!(charts
            .radar
            .accessible_summary
            .contains("6. Akzeptanz und Organisation: 22%"));
    }

    #[test]
    fn bars_follow_schema_order_with_scale_colors() {
        let schema = AssessmentSchema::standard();
        let mut store = ScoreStore::seeded(&schema);
        store
            .set_score("c7", "7.2", ScoreValue::Exceeded)
            .expect("c7 criterion");

        let result = compute(&schema, &store);
        let charts = build_chart_series(&schema, &store, &result);

        let c7 = charts
            .bars
            .iter()
            .find(|series| series.category_id == "c7")
            .expect("c7 series");
        let ids: Vec<_> = c7.points.iter().map(|point| point.criterion_id).collect();
        assert_eq!(ids, ["7.1", "7.2", "7.3"]);
        assert_eq!(c7.points[0].color, "#ef4444");
        assert_eq!(c7.points[1].color, "#3b82f6");
        assert_eq!(c7.points[1].scale_label, "Übertroffen");
    }
}
