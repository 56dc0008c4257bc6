mod engine;
pub mod rates;
mod scenario;
mod types;

pub use engine::{band_slices, banded_tax, calculate_ni, calculate_student_loan, calculate_tax};
pub use scenario::{
    corporation_tax, dividend_tax, inside_ir35, outside_ir35, permanent, run_scenario,
    run_scenarios,
};
pub use types::{
    CalculationResult, EmploymentType, GrossIncomeSource, Location, RateBand, Scenario,
    ScenarioInput, StudentLoanPlan, StudentLoanTerms,
};
