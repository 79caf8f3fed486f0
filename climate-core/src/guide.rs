//! Rule-based explanation sentences and the fixed action-guide table.

use crate::{
    model::ClimateObservation,
    risk::{RiskTier, TargetGroup},
};

/// Action guides for a tier and audience, most important first.
pub fn action_guides(tier: RiskTier, target: TargetGroup) -> &'static [&'static str] {
    use RiskTier::*;
    use TargetGroup::*;

    match (tier, target) {
        (Safe, General) => &["야외 활동에 적합한 날씨입니다", "평소처럼 생활하셔도 됩니다"],
        (Safe, Elderly) => &["산책하기 좋은 날씨입니다", "물을 충분히 드세요"],
        (Safe, Child) => &["밖에서 놀아도 좋아요", "모자를 쓰면 더 좋아요"],
        (Safe, OutdoorWorker) => &["작업하기 좋은 날씨입니다", "수분 섭취를 잊지 마세요"],

        (Caution, General) => &["장시간 야외 활동은 주의하세요", "수분 섭취를 늘리세요"],
        (Caution, Elderly) => &["외출 시 그늘로 다니세요", "무리한 활동은 피하세요"],
        (Caution, Child) => &["그늘에서 놀게 해주세요", "물을 자주 마시게 하세요"],
        (Caution, OutdoorWorker) => &["1시간마다 휴식하세요", "시원한 물을 자주 드세요"],

        (Warning, General) => &["가급적 실내에 머무르세요", "외출 시 양산/모자 필수"],
        (Warning, Elderly) => &["에어컨이 있는 곳에 계세요", "어지러우면 즉시 휴식하세요"],
        (Warning, Child) => &["실내 놀이를 권장합니다", "야외 체육 활동 자제"],
        (Warning, OutdoorWorker) => &["30분마다 그늘 휴식 필수", "이상 증상 시 작업 중단"],

        (Danger, General) => &["외출을 삼가세요", "냉방 시설을 이용하세요", "응급상황 대비 119"],
        (Danger, Elderly) => &["절대 외출하지 마세요", "시원한 곳에서 휴식하세요", "가족에게 연락 유지"],
        (Danger, Child) => &["야외 활동 금지", "시원한 실내에 있게 하세요", "수분/염분 섭취 중요"],
        (Danger, OutdoorWorker) => &["야외 작업 중단 권고", "실내로 대피하세요", "동료 상태 서로 확인"],
    }
}

fn temperature_phrase(apparent: f64) -> (&'static str, &'static str) {
    if apparent >= 35.0 {
        ("매우 무더운", "실외 활동을 자제하고 시원한 실내에서 휴식하세요.")
    } else if apparent >= 31.0 {
        ("무더운", "장시간 야외 활동은 피하고 충분한 수분을 섭취하세요.")
    } else if apparent >= 27.0 {
        ("다소 더운", "야외 활동 시 그늘에서 휴식을 취하세요.")
    } else if apparent >= 20.0 {
        ("쾌적한", "야외 활동하기 좋은 날씨입니다.")
    } else {
        ("선선한", "가벼운 겉옷을 챙기세요.")
    }
}

fn dust_phrase(pm10: f64, pm25: f64) -> (&'static str, &'static str) {
    if pm25 >= 36.0 || pm10 >= 81.0 {
        ("미세먼지가 나쁨 상태입니다. ", "마스크를 착용하고 외출을 줄이세요.")
    } else if pm25 >= 16.0 || pm10 >= 31.0 {
        ("미세먼지가 보통 수준입니다. ", "")
    } else {
        ("", "")
    }
}

fn target_phrase(tier: RiskTier, target: TargetGroup) -> &'static str {
    if !tier.is_elevated() {
        return "";
    }

    match target {
        TargetGroup::General => "",
        TargetGroup::Elderly => {
            " 어르신께서는 특히 무리하지 마시고 주변에 이상 증상이 있으면 즉시 알려주세요."
        }
        TargetGroup::Child => " 아이들의 야외 놀이 시간을 줄이고 충분한 물을 마시게 해주세요.",
        TargetGroup::OutdoorWorker => {
            " 야외 작업 시 매시간 10분 이상 그늘에서 휴식하고 물을 자주 드세요."
        }
    }
}

/// Templated explanation used when no text-generation service is available.
///
/// `score` is the displayed score; it is not repeated in the sentence but kept
/// so every explainer shares one signature.
pub fn template_explanation(
    region: &str,
    observation: &ClimateObservation,
    _score: u8,
    tier: RiskTier,
    target: TargetGroup,
) -> String {
    let apparent = observation.resolved_apparent_temperature();
    let (temp_status, temp_advice) = temperature_phrase(apparent);
    let (dust_status, dust_advice) =
        dust_phrase(observation.pm10_or_default(), observation.pm25_or_default());

    let risk_warning = match tier {
        RiskTier::Danger => format!("현재 {region}은 기후 위험 단계입니다. "),
        RiskTier::Warning => format!("현재 {region}은 기후 경고 단계입니다. "),
        _ => String::new(),
    };

    format!(
        "오늘 {region}은 체감온도 {apparent:.1}도로 {temp_status} 날씨입니다. \
         {risk_warning}{dust_status}{temp_advice}{dust_advice}{}",
        target_phrase(tier, target)
    )
    .trim()
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tier_and_target_has_guides() {
        for tier in RiskTier::all() {
            for target in TargetGroup::all() {
                let guides = action_guides(*tier, *target);
                assert!(!guides.is_empty());
            }
        }
    }

    #[test]
    fn danger_guides_have_three_entries() {
        for target in TargetGroup::all() {
            assert_eq!(action_guides(RiskTier::Danger, *target).len(), 3);
        }
        assert_eq!(action_guides(RiskTier::Danger, TargetGroup::General)[2], "응급상황 대비 119");
    }

    #[test]
    fn template_mentions_region_and_temperature() {
        let obs = ClimateObservation::new().with_apparent_temperature(33.0);
        let text = template_explanation("수원시", &obs, 40, RiskTier::Caution, TargetGroup::General);

        assert!(text.starts_with("오늘 수원시은 체감온도 33.0도로 무더운 날씨입니다."));
        assert!(!text.contains("경고 단계"));
    }

    #[test]
    fn template_adds_warning_dust_and_target_sentences() {
        let obs = ClimateObservation::new()
            .with_apparent_temperature(36.0)
            .with_pm10(90.0)
            .with_pm25(20.0);
        let text = template_explanation("화성시", &obs, 80, RiskTier::Danger, TargetGroup::Elderly);

        assert!(text.contains("현재 화성시은 기후 위험 단계입니다."));
        assert!(text.contains("미세먼지가 나쁨 상태입니다."));
        assert!(text.contains("마스크를 착용하고"));
        assert!(text.ends_with("즉시 알려주세요."));
    }

    #[test]
    fn target_sentence_only_for_elevated_tiers() {
        let obs = ClimateObservation::new().with_apparent_temperature(22.0).with_pm10(10.0).with_pm25(5.0);
        let text = template_explanation("가평군", &obs, 20, RiskTier::Safe, TargetGroup::Child);

        assert_eq!(text, "오늘 가평군은 체감온도 22.0도로 쾌적한 날씨입니다. 야외 활동하기 좋은 날씨입니다.");
    }
}
