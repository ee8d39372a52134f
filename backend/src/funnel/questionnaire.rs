use serde::{Deserialize, Serialize};

use super::slider::SliderConfig;

pub const EXTRANETS_COUNT: SliderConfig = SliderConfig::new(1.0, 7.0, 1.0);
pub const COLLECT_PARC: SliderConfig = SliderConfig::new(0.25, 2.0, 0.25);
pub const COLLECT_RI: SliderConfig = SliderConfig::new(0.25, 2.5, 0.25);
pub const SAISIE_EXTRANET: SliderConfig = SliderConfig::new(0.2, 1.5, 0.1);
pub const MATURITY_LEVEL: SliderConfig = SliderConfig::new(0.0, 100.0, 5.0);

pub const CONTRACTS_PER_MONTH: SliderConfig = SliderConfig::new(3.0, 40.0, 1.0);
pub const AVERAGE_PREMIUM: SliderConfig = SliderConfig::new(7000.0, 30000.0, 100.0);
pub const CONVERSION_RATE: SliderConfig = SliderConfig::new(0.0, 100.0, 5.0);

/// "Parlez-nous de votre organisation actuelle"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step1Answers {
    pub extranets_count: f64,
    pub collect_parc: f64,
    #[serde(rename = "collectRI")]
    pub collect_ri: f64,
    pub saisie_extranet: f64,
    pub digitalization_level: f64,
    pub automation_level: f64,
    pub data_quality: f64,
    pub process_efficiency: f64,
}

impl Default for Step1Answers {
    fn default() -> Self {
        Self {
            extranets_count: 4.0,
            collect_parc: 0.5,
            collect_ri: 1.0,
            saisie_extranet: 0.5,
            digitalization_level: 50.0,
            automation_level: 50.0,
            data_quality: 50.0,
            process_efficiency: 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step1Field {
    ExtranetsCount,
    CollectParc,
    CollectRi,
    SaisieExtranet,
    DigitalizationLevel,
    AutomationLevel,
    DataQuality,
    ProcessEfficiency,
}

impl Step1Field {
    pub fn config(&self) -> SliderConfig {
        match self {
            Step1Field::ExtranetsCount => EXTRANETS_COUNT,
            Step1Field::CollectParc => COLLECT_PARC,
            Step1Field::CollectRi => COLLECT_RI,
            Step1Field::SaisieExtranet => SAISIE_EXTRANET,
            Step1Field::DigitalizationLevel
            | Step1Field::AutomationLevel
            | Step1Field::DataQuality
            | Step1Field::ProcessEfficiency => MATURITY_LEVEL,
        }
    }
}

impl Step1Answers {
    pub fn set(&mut self, field: Step1Field, value: f64) {
        let value = field.config().snap(value);
        let slot = match field {
            Step1Field::ExtranetsCount => &mut self.extranets_count,
            Step1Field::CollectParc => &mut self.collect_parc,
            Step1Field::CollectRi => &mut self.collect_ri,
            Step1Field::SaisieExtranet => &mut self.saisie_extranet,
            Step1Field::DigitalizationLevel => &mut self.digitalization_level,
            Step1Field::AutomationLevel => &mut self.automation_level,
            Step1Field::DataQuality => &mut self.data_quality,
            Step1Field::ProcessEfficiency => &mut self.process_efficiency,
        };
        *slot = value;
    }
}

/// "Vous concernant"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step2Answers {
    pub contracts_per_month: f64,
    pub average_premium: f64,
    pub conversion_rate: f64,
    pub employee_count: String,
}

impl Default for Step2Answers {
    fn default() -> Self {
        Self {
            contracts_per_month: 15.0,
            average_premium: 15000.0,
            conversion_rate: 80.0,
            employee_count: String::new(),
        }
    }
}

impl Step2Answers {
    pub fn set_contracts(&mut self, value: f64) {
        self.contracts_per_month = CONTRACTS_PER_MONTH.snap(value);
    }

    pub fn set_premium(&mut self, value: f64) {
        self.average_premium = AVERAGE_PREMIUM.snap(value);
    }

    pub fn set_conversion_rate(&mut self, value: f64) {
        self.conversion_rate = CONVERSION_RATE.snap(value);
    }

    pub fn set_headcount(&mut self, headcount: u32) {
        self.employee_count = employee_bucket(headcount).to_string();
    }

    pub fn is_valid(&self) -> bool {
        self.average_premium > 0.0
    }
}

/// Headcount bucket understood by the backend multiplier table.
pub fn employee_bucket(headcount: u32) -> &'static str {
    match headcount {
        0..=5 => "1-5",
        6..=20 => "6-20",
        21..=50 => "21-50",
        _ => "50+",
    }
}
