use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::calculator::{CalculatorState, InsuranceProduct};
use super::counter::{format_fr_locale, to_fixed};
use crate::error::FunnelError;

pub const OPEN_BUTTON_LABEL: &str = "Découvrez comment éliminer ces coûts";
pub const PARAMETERS_TITLE: &str = "Analyse détaillée";
pub const CONTACT_TITLE: &str = "Demande d'analyse approfondie";
pub const ACKNOWLEDGEMENT: &str = "Merci ! Nous vous enverrons l'analyse approfondie par mail.";

pub const DEFAULT_EMPLOYEES: i64 = 5;
pub const DEFAULT_INSURANCE_SHARE: i64 = 30;

static LEADING_INT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("static regex"));

// Same shape a browser accepts for `<input type="email">`.
static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("static regex")
});

/// Integer prefix of a number input, 0 when there is none.
pub fn parse_int_or_zero(raw: &str) -> i64 {
    LEADING_INT
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map(|v| v as i64)
        .unwrap_or(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RevenueRange {
    #[serde(rename = "0-300K")]
    UpTo300K,
    #[serde(rename = "300K-500K")]
    From300KTo500K,
    #[default]
    #[serde(rename = "500K-750K")]
    From500KTo750K,
    #[serde(rename = "750K-1M")]
    From750KTo1M,
    #[serde(rename = "1M-2M")]
    From1MTo2M,
    #[serde(rename = "2M-5M")]
    From2MTo5M,
    #[serde(rename = "+5M")]
    Above5M,
}

impl RevenueRange {
    pub const ALL: [RevenueRange; 7] = [
        RevenueRange::UpTo300K,
        RevenueRange::From300KTo500K,
        RevenueRange::From500KTo750K,
        RevenueRange::From750KTo1M,
        RevenueRange::From1MTo2M,
        RevenueRange::From2MTo5M,
        RevenueRange::Above5M,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RevenueRange::UpTo300K => "0-300K",
            RevenueRange::From300KTo500K => "300K-500K",
            RevenueRange::From500KTo750K => "500K-750K",
            RevenueRange::From750KTo1M => "750K-1M",
            RevenueRange::From1MTo2M => "1M-2M",
            RevenueRange::From2MTo5M => "2M-5M",
            RevenueRange::Above5M => "+5M",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailContact {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl DetailContact {
    pub fn validate(&self) -> Result<(), FunnelError> {
        let missing: Vec<&'static str> = [("name", &self.name), ("email", &self.email)]
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| name)
            .collect();
        if !missing.is_empty() {
            return Err(FunnelError::MissingContactFields(missing));
        }
        if !EMAIL.is_match(&self.email) {
            return Err(FunnelError::InvalidEmail);
        }
        Ok(())
    }
}

/// "Vos résultats actuels": read from the calculator on every render, so the
/// figures follow the sliders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentResults {
    pub annual_commission: f64,
    pub time_saved: f64,
    pub product: InsuranceProduct,
}

impl CurrentResults {
    pub fn from_calculator(calculator: &CalculatorState) -> Self {
        let projection = calculator.projection();
        Self {
            annual_commission: projection.annual_commission,
            time_saved: projection.time_saved,
            product: calculator.product(),
        }
    }

    pub fn commission_text(&self) -> String {
        format!("{} €", format_fr_locale(self.annual_commission))
    }

    pub fn time_saved_text(&self) -> String {
        format!("{} heures", to_fixed(self.time_saved, 1))
    }

    pub fn share_label(&self) -> String {
        format!("Part des {} dans vos contrats (%)", self.product.label())
    }
}

/// Modal opened from the calculator. Closing only hides it: the extra
/// parameters, the contact draft and the current view survive until the
/// next opening.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailModal {
    open: bool,
    show_contact_form: bool,
    employees: i64,
    insurance_share: i64,
    revenue_range: RevenueRange,
    revenue_dropdown_open: bool,
    pub contact: DetailContact,
}

impl Default for DetailModal {
    fn default() -> Self {
        Self {
            open: false,
            show_contact_form: false,
            employees: DEFAULT_EMPLOYEES,
            insurance_share: DEFAULT_INSURANCE_SHARE,
            revenue_range: RevenueRange::default(),
            revenue_dropdown_open: false,
            contact: DetailContact::default(),
        }
    }
}

impl DetailModal {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_showing_contact_form(&self) -> bool {
        self.show_contact_form
    }

    pub fn employees(&self) -> i64 {
        self.employees
    }

    pub fn insurance_share(&self) -> i64 {
        self.insurance_share
    }

    pub fn revenue_range(&self) -> RevenueRange {
        self.revenue_range
    }

    pub fn revenue_dropdown_open(&self) -> bool {
        self.revenue_dropdown_open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Close button and overlay click.
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn title(&self) -> &'static str {
        if self.show_contact_form {
            CONTACT_TITLE
        } else {
            PARAMETERS_TITLE
        }
    }

    /// `None` while the modal is closed: nothing is rendered.
    pub fn current_results(&self, calculator: &CalculatorState) -> Option<CurrentResults> {
        self.open.then(|| CurrentResults::from_calculator(calculator))
    }

    // The inputs carry min/max hints only; typed values are not clamped.
    pub fn set_employees_input(&mut self, raw: &str) {
        self.employees = parse_int_or_zero(raw);
    }

    pub fn set_insurance_share_input(&mut self, raw: &str) {
        self.insurance_share = parse_int_or_zero(raw);
    }

    pub fn toggle_revenue_dropdown(&mut self) {
        self.revenue_dropdown_open = !self.revenue_dropdown_open;
    }

    pub fn select_revenue(&mut self, range: RevenueRange) {
        self.revenue_range = range;
        self.revenue_dropdown_open = false;
    }

    /// "Estimer l'impact de l'IA sur mon cabinet".
    pub fn request_analysis(&mut self) {
        self.show_contact_form = true;
    }

    /// "Retour" from the contact form.
    pub fn back(&mut self) {
        self.show_contact_form = false;
    }

    /// Validates the contact form and closes the modal. Nothing is sent
    /// anywhere; the returned text is the acknowledgement shown to the user.
    pub fn submit(&mut self) -> Result<&'static str, FunnelError> {
        self.contact.validate()?;

        tracing::info!(
            "Detailed analysis requested: {} employees, {}% share, revenue {}",
            self.employees,
            self.insurance_share,
            self.revenue_range.label()
        );
        self.open = false;
        self.show_contact_form = false;
        Ok(ACKNOWLEDGEMENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_contact() -> DetailContact {
        DetailContact {
            name: "Marie Durand".to_string(),
            email: "marie@cabinet.fr".to_string(),
            phone: String::new(),
            message: String::new(),
        }
    }

    #[test]
    fn defaults_match_first_opening() {
        let modal = DetailModal::default();
        assert!(!modal.is_open());
        assert!(!modal.is_showing_contact_form());
        assert_eq!(modal.employees(), 5);
        assert_eq!(modal.insurance_share(), 30);
        assert_eq!(modal.revenue_range(), RevenueRange::From500KTo750K);
        assert_eq!(modal.title(), PARAMETERS_TITLE);
    }

    #[test]
    fn closed_modal_renders_nothing() {
        let calculator = CalculatorState::default();
        let mut modal = DetailModal::default();
        assert!(modal.current_results(&calculator).is_none());

        modal.open();
        let results = modal.current_results(&calculator).unwrap();
        assert_eq!(results.commission_text(), "870\u{202F}000 €");
        assert_eq!(results.time_saved_text(), "28.1 heures");
        assert_eq!(results.share_label(), "Part des flotte automobile dans vos contrats (%)");
    }

    #[test]
    fn results_follow_the_calculator() {
        let mut calculator = CalculatorState::default();
        let mut modal = DetailModal::default();
        modal.open();

        calculator.select_product(InsuranceProduct::RcPro);
        let results = modal.current_results(&calculator).unwrap();
        assert_eq!(results.product, InsuranceProduct::RcPro);
        assert_eq!(results.annual_commission, calculator.projection().annual_commission);
    }

    #[test]
    fn number_inputs_read_like_parse_int() {
        assert_eq!(parse_int_or_zero("12"), 12);
        assert_eq!(parse_int_or_zero(" 7 salariés"), 7);
        assert_eq!(parse_int_or_zero("12.9"), 12);
        assert_eq!(parse_int_or_zero("-3"), -3);
        assert_eq!(parse_int_or_zero(""), 0);
        assert_eq!(parse_int_or_zero("abc"), 0);

        let mut modal = DetailModal::default();
        modal.set_employees_input("250");
        modal.set_insurance_share_input("");
        assert_eq!(modal.employees(), 250);
        assert_eq!(modal.insurance_share(), 0);
    }

    #[test]
    fn picking_a_revenue_range_closes_the_dropdown() {
        let mut modal = DetailModal::default();
        modal.toggle_revenue_dropdown();
        assert!(modal.revenue_dropdown_open());

        modal.select_revenue(RevenueRange::Above5M);
        assert_eq!(modal.revenue_range(), RevenueRange::Above5M);
        assert!(!modal.revenue_dropdown_open());
        assert_eq!(serde_json::to_string(&RevenueRange::Above5M).unwrap(), "\"+5M\"");
        assert_eq!(RevenueRange::ALL.map(|r| r.label())[0], "0-300K");
    }

    #[test]
    fn contact_form_round_trip_keeps_state() {
        let mut modal = DetailModal::default();
        modal.open();
        modal.request_analysis();
        assert_eq!(modal.title(), CONTACT_TITLE);

        modal.back();
        assert_eq!(modal.title(), PARAMETERS_TITLE);

        // closing does not reset the view
        modal.request_analysis();
        modal.close();
        modal.open();
        assert!(modal.is_showing_contact_form());
    }

    #[test]
    fn submit_requires_name_and_valid_email() {
        let mut modal = DetailModal::default();
        modal.open();
        modal.request_analysis();

        assert_eq!(
            modal.submit().unwrap_err(),
            FunnelError::MissingContactFields(vec!["name", "email"])
        );
        modal.contact = filled_contact();
        modal.contact.email = "marie.cabinet.fr".to_string();
        assert_eq!(modal.submit().unwrap_err(), FunnelError::InvalidEmail);
        assert!(modal.is_open());
        assert!(modal.is_showing_contact_form());
    }

    #[test]
    fn successful_submit_closes_and_resets_view() {
        let mut modal = DetailModal::default();
        modal.open();
        modal.set_employees_input("12");
        modal.request_analysis();
        modal.contact = filled_contact();

        assert_eq!(modal.submit().unwrap(), ACKNOWLEDGEMENT);
        assert!(!modal.is_open());
        assert!(!modal.is_showing_contact_form());
        // the draft survives for the next opening
        assert_eq!(modal.employees(), 12);
        assert_eq!(modal.contact.name, "Marie Durand");
    }
}
