//! Static narrative text accompanying the charts.

pub const PROBLEM_TITLE: &str = "1. THE PROBLEM: Climate Change Impact on Agriculture";
pub const ANALYSIS_TITLE: &str = "2. ANALYSIS: Long-term Climate Trends";
pub const INSIGHTS_TITLE: &str = "3. INTERACTIVE INSIGHTS: Deep Dive Analysis";
pub const CONCLUSION_TITLE: &str = "4. Conclusion";

pub const PROBLEM_CONTEXT: &str = "**Context:** Over the past 35 years, climate change has \
significantly impacted agricultural conditions. This analysis examines temperature trends, \
precipitation patterns, and extreme weather events to understand how farming conditions have \
evolved and what challenges farmers face today.";

pub fn temperature_trend(first_year: i32, last_year: i32, warming_delta: Option<f64>) -> String {
    let increase = match warming_delta {
        Some(delta) => format!("With an average increase of {delta:.1}°C, farmers"),
        None => "Farmers".to_string(),
    };
    format!(
        "**Temperature Trend Analysis ({first_year}-{last_year}):** The annual average \
temperature shows a clear upward trend over the past 35 years. This warming pattern indicates a \
significant change in growing conditions for crops. {increase} must now adapt to longer growing \
seasons but also face increased risks of heat stress during critical growth phases."
    )
}

pub const PRECIPITATION_TREND: &str = "**Precipitation Pattern Analysis:** The annual \
precipitation data reveals increasing variability in rainfall patterns. While the total annual \
precipitation hasn't changed dramatically, its distribution throughout the year has become more \
erratic. This unpredictability poses challenges for agricultural planning and irrigation \
management, potentially affecting crop yields and farming strategies.";

pub const DISTRIBUTION_SHIFT: &str = "**Temperature Distribution Impact:** Comparing the two \
periods (1989-2004 vs 2005-2024) shows a clear shift in temperature distribution. The more \
recent period exhibits both higher average temperatures and more extreme temperature events. \
This shift affects crop selection decisions and necessitates adjustments in planting and \
harvesting schedules to optimize agricultural productivity.";

pub const SEASONAL_EVOLUTION: &str = "**Seasonal Temperature Evolution:** The heatmap reveals \
intensifying summer temperatures and milder winters over the 35-year period. This seasonal shift \
has extended the growing season but also increased the risk of early spring frosts damaging \
crops that start growing too soon. The changing pattern requires farmers to reconsider \
traditional crop calendars and variety selection.";

pub const PRECIPITATION_DISTRIBUTION: &str = "**Precipitation Distribution Analysis:** Monthly \
precipitation patterns show increasing variability, with more intense rainfall events and longer \
dry periods. This change in precipitation distribution impacts soil moisture levels and erosion \
risks, requiring adaptation in soil management practices and potentially investment in \
irrigation systems to ensure crop resilience.";

pub fn annual_profile(year: i32) -> String {
    format!(
        "**Annual Climate Profile Impact:** The detailed temperature profile for {year} compared \
to historical patterns highlights the evolving challenges in agricultural planning. The increased \
temperature variability and shifting seasonal patterns require more adaptive farming practices \
and careful monitoring of crop development stages."
    )
}

pub const DECADAL_EVOLUTION: &str = "**Decadal Climate Evolution:** The decade-by-decade \
comparison reveals a progressive warming trend and changing precipitation patterns. Each \
successive decade shows warmer temperatures and more erratic rainfall, indicating a long-term \
shift in agricultural conditions that requires strategic adaptation in farming practices and \
crop selection.";

pub fn seasonal_changes(season: &str) -> String {
    format!(
        "**Seasonal Pattern Changes:** The detailed seasonal analysis shows that {season} has \
experienced significant changes over the 35-year period. These seasonal shifts affect crucial \
agricultural phases such as planting times, growing periods, and harvest windows. Farmers must \
now adapt their agricultural calendar and techniques to these new seasonal patterns to maintain \
productivity."
    )
}

pub const CONCLUSION_HEADING: &str = "Implications & Agricultural Adaptation Strategies";

pub const CONCLUSION_PARAGRAPHS: [&str; 3] = [
    "**The analysis reveals critical implications for agricultural sustainability.** For \
farmers, immediate adaptations are essential: they must carefully select crops better suited to \
warmer conditions, implement robust irrigation systems to counter irregular rainfall patterns, \
and modify traditional planting and harvesting schedules to align with shifting seasonal \
patterns.",
    "**On the agricultural planning front,** research and development efforts should focus on \
developing heat-resistant crop varieties that can withstand temperature extremes, while \
establishing sophisticated early warning systems for extreme weather events. Additionally, \
implementing effective soil conservation practices becomes crucial to maintain soil health \
under changing climatic conditions.",
    "**Moving forward,** maintaining vigilant monitoring of climate trends to anticipate \
further changes, conducting field trials of adaptive farming techniques to validate their \
effectiveness, and fostering knowledge-sharing networks within farming communities will be \
crucial for ensuring agricultural resilience in the face of ongoing climate change.",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_trend_formats_delta_with_one_decimal() {
        let text = temperature_trend(1989, 2024, Some(1.26));
        assert!(text.contains("(1989-2024)"));
        assert!(text.contains("increase of 1.3°C"));
    }

    #[test]
    fn temperature_trend_without_delta_omits_number() {
        let text = temperature_trend(2020, 2020, None);
        assert!(!text.contains("increase of"));
    }
}
