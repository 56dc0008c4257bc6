use serde::{Deserialize, Serialize};

use super::rates::{
    ENGLAND_TAX_BANDS, PLAN1_LOAN, PLAN2_LOAN, PLAN4_LOAN, PLAN5_LOAN, POSTGRADUATE_LOAN,
    SCOTLAND_TAX_BANDS,
};

/// One slice of a progressive table. The lower bound is the previous band's
/// `upper_limit` (0 for the first band).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateBand {
    pub label: &'static str,
    pub upper_limit: f64,
    pub rate: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    England,
    Scotland,
}

impl Location {
    pub fn tax_bands(self) -> &'static [RateBand] {
        match self {
            Location::England => &ENGLAND_TAX_BANDS,
            Location::Scotland => &SCOTLAND_TAX_BANDS,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StudentLoanTerms {
    pub threshold: f64,
    pub rate: f64,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StudentLoanPlan {
    #[default]
    None,
    Plan1,
    Plan2,
    Plan4,
    Plan5,
    Postgraduate,
}

impl StudentLoanPlan {
    pub fn terms(self) -> Option<StudentLoanTerms> {
        match self {
            StudentLoanPlan::None => None,
            StudentLoanPlan::Plan1 => Some(PLAN1_LOAN),
            StudentLoanPlan::Plan2 => Some(PLAN2_LOAN),
            StudentLoanPlan::Plan4 => Some(PLAN4_LOAN),
            StudentLoanPlan::Plan5 => Some(PLAN5_LOAN),
            StudentLoanPlan::Postgraduate => Some(POSTGRADUATE_LOAN),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Scenario {
    Permanent,
    #[serde(rename = "insideIR35")]
    InsideIr35,
    #[serde(rename = "outsideIR35")]
    OutsideIr35,
}

impl Scenario {
    pub fn title(self) -> &'static str {
        match self {
            Scenario::Permanent => "Permanent Employee",
            Scenario::InsideIr35 => "Inside IR35 (Umbrella)",
            Scenario::OutsideIr35 => "Outside IR35 (Limited Co)",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmploymentType {
    Permanent,
    Contract,
}

impl EmploymentType {
    /// Scenarios that apply to this kind of engagement, in display order.
    pub fn scenarios(self) -> &'static [Scenario] {
        match self {
            EmploymentType::Permanent => &[Scenario::Permanent],
            EmploymentType::Contract => &[Scenario::InsideIr35, Scenario::OutsideIr35],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GrossIncomeSource {
    AnnualSalary(f64),
    DayRate { day_rate: f64, weeks_per_year: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioInput {
    pub gross_income: f64,
    pub location: Location,
    pub student_loan_plan: StudentLoanPlan,
    pub pension_contribution_percent: f64,
    pub employer_ni_borne: bool,
    pub monthly_umbrella_fee: f64,
    pub annual_business_expenses: f64,
}

/// Net pay breakdown for one scenario. Optional fields are only computed by
/// the scenarios they belong to and are left out of serialized output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub scenario: Scenario,
    pub gross: f64,
    pub net: f64,
    pub tax: f64,
    pub ni: f64,
    pub student_loan: f64,
    pub pension: f64,
    #[serde(rename = "employerNI", skip_serializing_if = "Option::is_none")]
    pub employer_ni: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub umbrella_fee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_expenses: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corporation_tax: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dividend: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dividend_tax: Option<f64>,
}

impl CalculationResult {
    pub fn net_monthly(&self) -> f64 {
        self.net / 12.0
    }

    pub fn net_weekly(&self) -> f64 {
        self.net / 52.0
    }
}
