use crate::Rule;

/// The four soybean rules, in firing-report order.
pub(crate) fn get() -> Vec<Rule> {
    vec![
        rule! {
            name: "dry_and_mild",
            when: is!("chuva", "baixa") & is!("temperatura", "media"),
            then: ("crescimento", "medio"),
        },
        rule! {
            name: "mild_and_regular_rain",
            when: is!("temperatura", "media") & is!("chuva", "regular"),
            then: ("crescimento", "alto"),
        },
        rule! {
            name: "hot_and_regular_rain",
            when: is!("temperatura", "alta") & is!("chuva", "regular"),
            then: ("crescimento", "medio"),
        },
        rule! {
            name: "dry_or_cold",
            when: is!("chuva", "baixa") | is!("temperatura", "baixa"),
            then: ("crescimento", "baixo"),
        },
    ]
}
