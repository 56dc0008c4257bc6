use super::engine::{calculate_ni, calculate_student_loan, calculate_tax};
use super::rates::{
    CORPORATION_TAX_LOWER_LIMIT, CORPORATION_TAX_MAIN_RATE, CORPORATION_TAX_SMALL_PROFITS_RATE,
    CORPORATION_TAX_UPPER_LIMIT, DIRECTOR_SALARY, DIVIDEND_ADDITIONAL_RATE, DIVIDEND_ALLOWANCE,
    DIVIDEND_BASIC_RATE, DIVIDEND_HIGHER_RATE, EMPLOYEE_NI_BANDS, EMPLOYER_NI_BANDS,
    MARGINAL_RELIEF_FRACTION,
};
use super::types::{
    CalculationResult, EmploymentType, GrossIncomeSource, Location, Scenario, ScenarioInput,
};

const WORKING_DAYS_PER_WEEK: f64 = 5.0;

impl GrossIncomeSource {
    pub fn annual_gross(self) -> f64 {
        match self {
            GrossIncomeSource::AnnualSalary(salary) => salary.max(0.0),
            GrossIncomeSource::DayRate {
                day_rate,
                weeks_per_year,
            } => day_rate.max(0.0) * WORKING_DAYS_PER_WEEK * weeks_per_year.max(0.0),
        }
    }
}

pub fn run_scenario(scenario: Scenario, input: &ScenarioInput) -> CalculationResult {
    match scenario {
        Scenario::Permanent => permanent(input),
        Scenario::InsideIr35 => inside_ir35(input),
        Scenario::OutsideIr35 => outside_ir35(input),
    }
}

pub fn run_scenarios(
    employment_type: EmploymentType,
    input: &ScenarioInput,
) -> Vec<CalculationResult> {
    employment_type
        .scenarios()
        .iter()
        .map(|scenario| run_scenario(*scenario, input))
        .collect()
}

/// PAYE employment. Pension comes out before income tax, while NI and
/// student loan are assessed on the full gross.
pub fn permanent(input: &ScenarioInput) -> CalculationResult {
    let gross = input.gross_income;
    let pension = gross * input.pension_contribution_percent / 100.0;
    let taxable_income = gross - pension;

    let tax = calculate_tax(taxable_income, input.location);
    let ni = calculate_ni(gross, &EMPLOYEE_NI_BANDS);
    let student_loan = calculate_student_loan(gross, input.student_loan_plan);
    let net = gross - tax - ni - student_loan - pension;

    CalculationResult {
        scenario: Scenario::Permanent,
        gross,
        net,
        tax,
        ni,
        student_loan,
        pension,
        employer_ni: None,
        umbrella_fee: None,
        business_expenses: None,
        salary: None,
        corporation_tax: None,
        dividend: None,
        dividend_tax: None,
    }
}

/// Contract paid through an umbrella company. The umbrella fee and, when the
/// contractor bears it, employer NI come off the assignment rate before the
/// employee's own deductions are worked out.
pub fn inside_ir35(input: &ScenarioInput) -> CalculationResult {
    let gross = input.gross_income;
    let umbrella_fee = input.monthly_umbrella_fee * 12.0;
    let income_after_umbrella = gross - umbrella_fee;

    let employer_ni = if input.employer_ni_borne {
        calculate_ni(income_after_umbrella, &EMPLOYER_NI_BANDS)
    } else {
        0.0
    };
    let taxable_before_pension = income_after_umbrella - employer_ni;
    let pension = taxable_before_pension * input.pension_contribution_percent / 100.0;
    let final_taxable = taxable_before_pension - pension;

    let tax = calculate_tax(final_taxable, input.location);
    let ni = calculate_ni(taxable_before_pension, &EMPLOYEE_NI_BANDS);
    let student_loan = calculate_student_loan(taxable_before_pension, input.student_loan_plan);
    let net = gross - tax - ni - student_loan - pension - employer_ni - umbrella_fee;

    CalculationResult {
        scenario: Scenario::InsideIr35,
        gross,
        net,
        tax,
        ni,
        student_loan,
        pension,
        employer_ni: Some(employer_ni),
        umbrella_fee: Some(umbrella_fee),
        business_expenses: None,
        salary: None,
        corporation_tax: None,
        dividend: None,
        dividend_tax: None,
    }
}

/// Contract paid through a personal limited company: a salary at the
/// personal allowance, with the remaining profit paid out as dividends after
/// corporation tax.
pub fn outside_ir35(input: &ScenarioInput) -> CalculationResult {
    let gross = input.gross_income;
    let business_expenses = input.annual_business_expenses;
    let profit = gross - business_expenses - DIRECTOR_SALARY;

    let corporation_tax = corporation_tax(profit);
    let dividend = (profit - corporation_tax).max(0.0);
    let dividend_tax = dividend_tax(dividend, input.location);
    let net = DIRECTOR_SALARY + dividend - dividend_tax;

    CalculationResult {
        scenario: Scenario::OutsideIr35,
        gross,
        net,
        tax: 0.0,
        ni: 0.0,
        student_loan: 0.0,
        pension: 0.0,
        employer_ni: None,
        umbrella_fee: None,
        business_expenses: Some(business_expenses),
        salary: Some(DIRECTOR_SALARY),
        corporation_tax: Some(corporation_tax),
        dividend: Some(dividend),
        dividend_tax: Some(dividend_tax),
    }
}

pub fn corporation_tax(profit: f64) -> f64 {
    if profit <= CORPORATION_TAX_LOWER_LIMIT {
        profit * CORPORATION_TAX_SMALL_PROFITS_RATE
    } else if profit <= CORPORATION_TAX_UPPER_LIMIT {
        let marginal_relief = (CORPORATION_TAX_UPPER_LIMIT - profit) * MARGINAL_RELIEF_FRACTION;
        profit * CORPORATION_TAX_MAIN_RATE - marginal_relief
    } else {
        profit * CORPORATION_TAX_MAIN_RATE
    }
}

/// Dividend bands are taken from the location's income-tax limits, with the
/// basic band reduced by the salary already drawn.
pub fn dividend_tax(dividend: f64, location: Location) -> f64 {
    let bands = location.tax_bands();
    let basic_limit = bands[1].upper_limit - DIRECTOR_SALARY;
    let higher_limit = bands[2].upper_limit - bands[1].upper_limit;

    let mut remaining = (dividend - DIVIDEND_ALLOWANCE).max(0.0);
    let mut tax = 0.0;

    if remaining > 0.0 {
        let in_basic = remaining.min(basic_limit);
        tax += in_basic * DIVIDEND_BASIC_RATE;
        remaining -= in_basic;
    }
    if remaining > 0.0 {
        let in_higher = remaining.min(higher_limit);
        tax += in_higher * DIVIDEND_HIGHER_RATE;
        remaining -= in_higher;
    }
    if remaining > 0.0 {
        tax += remaining * DIVIDEND_ADDITIONAL_RATE;
    }

    tax
}
