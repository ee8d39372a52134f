use crate::models::analysis_models::{AnalysisData, CalculatedMetrics};

pub const DIGITALIZATION_THRESHOLD: f64 = 70.0;
pub const AUTOMATION_THRESHOLD: f64 = 60.0;
pub const DATA_QUALITY_THRESHOLD: f64 = 70.0;
pub const CONVERSION_THRESHOLD: f64 = 80.0;
pub const PROCESS_EFFICIENCY_THRESHOLD: f64 = 75.0;

pub const RECOMMEND_DIGITALIZATION: &str =
    "Digitaliser vos processus de souscription pour gagner en rapidité";
pub const RECOMMEND_AUTOMATION: &str =
    "Automatiser les tâches répétitives pour libérer du temps commercial";
pub const RECOMMEND_DATA_QUALITY: &str =
    "Améliorer la qualité de vos données pour des analyses plus précises";
pub const RECOMMEND_CONVERSION: &str =
    "Optimiser votre parcours client pour améliorer la conversion";
pub const RECOMMEND_PROCESS: &str =
    "Revoir vos processus internes pour éliminer les goulots d'étranglement";

// Share of the conversion gap we claim can be recovered.
const CONVERSION_IMPROVEMENT: f64 = 0.3;
const SAVINGS_PER_EMPLOYEE_POINT: f64 = 50.0;

/// Rounds like `Math.round`: halves go toward positive infinity. NaN and
/// infinities pass through.
pub fn js_round(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// `Math.min` for two operands: NaN wins.
pub fn js_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

/// Finite rounded values become scores; NaN becomes `None` (JSON `null`).
pub fn to_score(value: f64) -> Option<i64> {
    value.is_finite().then_some(value as i64)
}

fn field(value: Option<f64>) -> f64 {
    value.unwrap_or(f64::NAN)
}

fn score(value: Option<i64>) -> f64 {
    value.map(|v| v as f64).unwrap_or(f64::NAN)
}

pub fn employee_multiplier(bucket: &str) -> f64 {
    match bucket {
        "1-5" => 5.0,
        "6-20" => 15.0,
        "21-50" => 35.0,
        _ => 50.0,
    }
}

// A missing field never crosses a threshold, the same way NaN compares false.
fn below(value: Option<f64>, threshold: f64) -> bool {
    field(value) < threshold
}

pub fn recommendations(data: &AnalysisData) -> Vec<String> {
    let checks = [
        (below(data.digitalization_level, DIGITALIZATION_THRESHOLD), RECOMMEND_DIGITALIZATION),
        (below(data.automation_level, AUTOMATION_THRESHOLD), RECOMMEND_AUTOMATION),
        (below(data.data_quality, DATA_QUALITY_THRESHOLD), RECOMMEND_DATA_QUALITY),
        (below(data.conversion_rate, CONVERSION_THRESHOLD), RECOMMEND_CONVERSION),
        (below(data.process_efficiency, PROCESS_EFFICIENCY_THRESHOLD), RECOMMEND_PROCESS),
    ];

    checks
        .into_iter()
        .filter(|(crossed, _)| *crossed)
        .map(|(_, message)| message.to_string())
        .collect()
}

pub fn calculate_metrics(data: &AnalysisData) -> CalculatedMetrics {
    let digitalization = field(data.digitalization_level);
    let automation = field(data.automation_level);
    let data_quality = field(data.data_quality);
    let process_efficiency = field(data.process_efficiency);

    let digital_maturity_score =
        to_score(js_round((digitalization + automation + data_quality + process_efficiency) / 4.0));

    let time_efficiency_score = to_score(js_round((process_efficiency + automation) / 2.0));

    let inefficiency_gap = 100.0 - process_efficiency;
    let potential_monthly_savings = to_score(js_round(
        employee_multiplier(&data.employee_count) * inefficiency_gap * SAVINGS_PER_EMPLOYEE_POINT / 100.0,
    ));

    let conversion_improvement = (100.0 - field(data.conversion_rate)) * CONVERSION_IMPROVEMENT;
    let additional_revenue_opportunity = to_score(js_round(
        field(data.contracts_per_month) * field(data.average_premium) * (conversion_improvement / 100.0),
    ));

    let overall_optimization_score = to_score(js_round(
        (score(digital_maturity_score)
            + score(time_efficiency_score)
            + js_min(score(potential_monthly_savings) / 100.0, 100.0)
            + js_min(score(additional_revenue_opportunity) / 1000.0, 100.0))
            / 4.0,
    ));

    CalculatedMetrics {
        digital_maturity_score,
        time_efficiency_score,
        potential_monthly_savings,
        additional_revenue_opportunity,
        overall_optimization_score,
        recommendations: recommendations(data),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::analysis_models::ContactDetails;

    pub(crate) fn sample_data() -> AnalysisData {
        AnalysisData {
            digitalization_level: Some(40.0),
            automation_level: Some(30.0),
            data_quality: Some(50.0),
            process_efficiency: Some(60.0),
            extranets_count: Some(4.0),
            collect_parc: Some(0.5),
            collect_ri: Some(1.0),
            saisie_extranet: Some(0.5),
            contracts_per_month: Some(15.0),
            average_premium: Some(15000.0),
            conversion_rate: Some(60.0),
            employee_count: "6-20".to_string(),
            contact: ContactDetails {
                first_name: "Marie".to_string(),
                last_name: "Durand".to_string(),
                email: "marie@cabinet.fr".to_string(),
                company: Some("Cabinet Durand".to_string()),
                phone: None,
                message: None,
            },
            timestamp: "2026-10-18T09:30:00.000Z".to_string(),
        }
    }

    #[test]
    fn js_round_matches_math_round() {
        assert_eq!(js_round(2.5), 3.0);
        assert_eq!(js_round(2.4999), 2.0);
        assert_eq!(js_round(-2.5), -2.0);
        assert_eq!(js_round(-2.6), -3.0);
        assert_eq!(js_round(0.0), 0.0);
        assert!(js_round(f64::NAN).is_nan());
    }

    #[test]
    fn largest_double_below_one_half_rounds_down() {
        // Adding 0.5 to this value rounds up to exactly 1.0 in binary64.
        assert_eq!(js_round(0.49999999999999994), 0.0);
        assert_eq!(js_round(-0.49999999999999994), -0.0);
        assert_eq!(js_round(4503599627370497.0), 4503599627370497.0);
    }

    #[test]
    fn js_min_lets_nan_through() {
        assert_eq!(js_min(3.0, 100.0), 3.0);
        assert!(js_min(f64::NAN, 100.0).is_nan());
        assert_eq!(to_score(f64::NAN), None);
        assert_eq!(to_score(12.0), Some(12));
    }

    #[test]
    fn employee_buckets_map_to_multipliers() {
        assert_eq!(employee_multiplier("1-5"), 5.0);
        assert_eq!(employee_multiplier("6-20"), 15.0);
        assert_eq!(employee_multiplier("21-50"), 35.0);
        assert_eq!(employee_multiplier("50+"), 50.0);
        assert_eq!(employee_multiplier(""), 50.0);
    }

    #[test]
    fn metrics_follow_closed_form() {
        let metrics = calculate_metrics(&sample_data());

        // (40 + 30 + 50 + 60) / 4 = 45
        assert_eq!(metrics.digital_maturity_score, Some(45));
        // (60 + 30) / 2 = 45
        assert_eq!(metrics.time_efficiency_score, Some(45));
        // 15 * 40 * 50 / 100 = 300
        assert_eq!(metrics.potential_monthly_savings, Some(300));
        // 15 * 15000 * (40 * 0.3 / 100) = 27000
        assert_eq!(metrics.additional_revenue_opportunity, Some(27000));
        // (45 + 45 + 3 + 27) / 4 = 30
        assert_eq!(metrics.overall_optimization_score, Some(30));
    }

    #[test]
    fn optimization_caps_savings_and_revenue_terms_at_100() {
        let mut data = sample_data();
        data.contracts_per_month = Some(40.0);
        data.average_premium = Some(30000.0);
        data.conversion_rate = Some(0.0);
        data.process_efficiency = Some(0.0);
        data.employee_count = "50+".to_string();

        let metrics = calculate_metrics(&data);
        // 40 * 30000 * 0.3 = 360000, divided by 1000 => 360 then capped.
        assert_eq!(metrics.additional_revenue_opportunity, Some(360000));
        // 50 * 100 * 50 / 100 = 2500, divided by 100 => 25.
        assert_eq!(metrics.potential_monthly_savings, Some(2500));
        // maturity (40 + 30 + 50 + 0) / 4 = 30, time eff (0 + 30) / 2 = 15
        // (30 + 15 + 25 + 100) / 4 = 42.5
        assert_eq!(metrics.overall_optimization_score, Some(43));
    }

    #[test]
    fn missing_maturity_levels_leave_dependent_scores_empty() {
        let mut data = sample_data();
        data.digitalization_level = None;
        data.automation_level = None;
        data.data_quality = None;
        data.process_efficiency = None;

        let metrics = calculate_metrics(&data);
        assert_eq!(metrics.digital_maturity_score, None);
        assert_eq!(metrics.time_efficiency_score, None);
        assert_eq!(metrics.potential_monthly_savings, None);
        assert_eq!(metrics.additional_revenue_opportunity, Some(27000));
        assert_eq!(metrics.overall_optimization_score, None);
        assert_eq!(metrics.recommendations, vec![RECOMMEND_CONVERSION]);
    }

    #[test]
    fn all_thresholds_crossed_yield_fixed_order() {
        let recs = recommendations(&sample_data());
        assert_eq!(
            recs,
            vec![
                RECOMMEND_DIGITALIZATION,
                RECOMMEND_AUTOMATION,
                RECOMMEND_DATA_QUALITY,
                RECOMMEND_CONVERSION,
                RECOMMEND_PROCESS,
            ]
        );
    }

    #[test]
    fn no_threshold_crossed_yields_no_recommendation() {
        let mut data = sample_data();
        data.digitalization_level = Some(70.0);
        data.automation_level = Some(60.0);
        data.data_quality = Some(70.0);
        data.conversion_rate = Some(80.0);
        data.process_efficiency = Some(75.0);
        assert!(recommendations(&data).is_empty());
    }

    #[test]
    fn thresholds_are_tested_independently() {
        let mut data = sample_data();
        data.digitalization_level = Some(90.0);
        data.data_quality = Some(90.0);
        data.process_efficiency = Some(90.0);
        assert_eq!(recommendations(&data), vec![RECOMMEND_AUTOMATION, RECOMMEND_CONVERSION]);
    }
}
