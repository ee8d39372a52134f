use serde::{Deserialize, Serialize};

use super::counter::{format_fr_locale, to_fixed};
use super::slider::SliderConfig;

/// Hours a contract takes once Little John handles it.
pub const HOURS_WITH_TOOL: f64 = 0.5;
/// Share of signed contracts that go through the tool.
pub const PRODUCTIVITY_SHARE: f64 = 0.75;
/// Fraction of the premium kept as commission.
pub const COMMISSION_FRACTION: f64 = 1.0 / 3.0;
pub const MONTHS_PER_YEAR: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InsuranceProduct {
    #[default]
    #[serde(rename = "flotte automobile")]
    FlotteAutomobile,
    #[serde(rename = "RC Pro")]
    RcPro,
    #[serde(rename = "Multirisque")]
    Multirisque,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductBounds {
    pub contracts: SliderConfig,
    pub premium: SliderConfig,
    pub hours_without_tool: SliderConfig,
}

impl InsuranceProduct {
    pub const ALL: [InsuranceProduct; 3] = [
        InsuranceProduct::FlotteAutomobile,
        InsuranceProduct::RcPro,
        InsuranceProduct::Multirisque,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            InsuranceProduct::FlotteAutomobile => "flotte automobile",
            InsuranceProduct::RcPro => "RC Pro",
            InsuranceProduct::Multirisque => "Multirisque",
        }
    }

    pub fn bounds(&self) -> ProductBounds {
        match self {
            InsuranceProduct::FlotteAutomobile => ProductBounds {
                contracts: SliderConfig::new(0.0, 30.0, 1.0),
                premium: SliderConfig::new(7000.0, 25000.0, 500.0),
                hours_without_tool: SliderConfig::new(1.5, 5.0, 0.25),
            },
            InsuranceProduct::RcPro => ProductBounds {
                contracts: SliderConfig::new(0.0, 60.0, 1.0),
                premium: SliderConfig::new(500.0, 5000.0, 100.0),
                hours_without_tool: SliderConfig::new(0.5, 3.0, 0.25),
            },
            InsuranceProduct::Multirisque => ProductBounds {
                contracts: SliderConfig::new(0.0, 40.0, 1.0),
                premium: SliderConfig::new(1000.0, 15000.0, 250.0),
                hours_without_tool: SliderConfig::new(1.0, 4.0, 0.25),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub annual_commission: f64,
    pub time_saved: f64,
}

/// Contracts/month and hours without tool to annual commission and monthly
/// hours saved.
pub fn compute_projection(contracts_per_month: f64, average_premium: f64, hours_without_tool: f64) -> Projection {
    let annual_commission = contracts_per_month * COMMISSION_FRACTION * MONTHS_PER_YEAR * average_premium;

    let time_with_tool = contracts_per_month * PRODUCTIVITY_SHARE * HOURS_WITH_TOOL;
    let time_without_tool = contracts_per_month * PRODUCTIVITY_SHARE * hours_without_tool;

    Projection {
        annual_commission,
        time_saved: time_without_tool - time_with_tool,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorState {
    product: InsuranceProduct,
    contracts_per_month: f64,
    average_premium: f64,
    hours_without_tool: f64,
    pub dropdown_open: bool,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            product: InsuranceProduct::FlotteAutomobile,
            contracts_per_month: 15.0,
            average_premium: 14500.0,
            hours_without_tool: 3.0,
            dropdown_open: false,
        }
    }
}

impl CalculatorState {
    pub fn product(&self) -> InsuranceProduct {
        self.product
    }

    pub fn contracts_per_month(&self) -> f64 {
        self.contracts_per_month
    }

    pub fn average_premium(&self) -> f64 {
        self.average_premium
    }

    pub fn hours_without_tool(&self) -> f64 {
        self.hours_without_tool
    }

    pub fn bounds(&self) -> ProductBounds {
        self.product.bounds()
    }

    pub fn toggle_dropdown(&mut self) {
        self.dropdown_open = !self.dropdown_open;
    }

    /// Switches product and pulls every input back inside the new bounds,
    /// contracts first, then premium, then time.
    pub fn select_product(&mut self, product: InsuranceProduct) {
        self.product = product;
        self.dropdown_open = false;

        let bounds = product.bounds();
        self.contracts_per_month = bounds.contracts.clamp(self.contracts_per_month);
        self.average_premium = bounds.premium.clamp(self.average_premium);
        self.hours_without_tool = bounds.hours_without_tool.clamp(self.hours_without_tool);
    }

    pub fn set_contracts(&mut self, value: f64) {
        self.contracts_per_month = self.bounds().contracts.snap(value);
    }

    pub fn set_premium(&mut self, value: f64) {
        self.average_premium = self.bounds().premium.snap(value);
    }

    pub fn set_hours_without_tool(&mut self, value: f64) {
        self.hours_without_tool = self.bounds().hours_without_tool.snap(value);
    }

    pub fn projection(&self) -> Projection {
        compute_projection(self.contracts_per_month, self.average_premium, self.hours_without_tool)
    }

    pub fn premium_label(&self) -> String {
        format!("Prime moyenne d'un contrat {} (€)", self.product.label())
    }

    pub fn summary(&self) -> String {
        let projection = self.projection();
        format!(
            "Économisez {}h par mois et générez {} € de commissions annuelles supplémentaires avec Little John.",
            to_fixed(projection.time_saved, 1),
            format_fr_locale(projection.annual_commission),
        )
    }
}
