//! Static rate tables for the 2024/25 tax year.

use super::types::{RateBand, StudentLoanTerms};

const fn band(label: &'static str, upper_limit: f64, rate: f64) -> RateBand {
    RateBand {
        label,
        upper_limit,
        rate,
    }
}

pub const PERSONAL_ALLOWANCE: f64 = 12_570.0;
pub const ALLOWANCE_TAPER_THRESHOLD: f64 = 100_000.0;

pub const ENGLAND_TAX_BANDS: [RateBand; 4] = [
    band("Personal Allowance", PERSONAL_ALLOWANCE, 0.0),
    band("Basic Rate", 50_270.0, 0.20),
    band("Higher Rate", 125_140.0, 0.40),
    band("Additional Rate", f64::INFINITY, 0.45),
];

pub const SCOTLAND_TAX_BANDS: [RateBand; 6] = [
    band("Personal Allowance", PERSONAL_ALLOWANCE, 0.0),
    band("Starter Rate", 14_732.0, 0.19),
    band("Basic Rate", 25_688.0, 0.20),
    band("Intermediate Rate", 43_662.0, 0.21),
    band("Higher Rate", 125_140.0, 0.42),
    band("Top Rate", f64::INFINITY, 0.47),
];

pub const EMPLOYEE_NI_BANDS: [RateBand; 4] = [
    band("Lower Earnings Limit", 6_396.0, 0.0),
    band("Primary Threshold", 12_570.0, 0.0),
    band("Upper Earnings Limit", 50_270.0, 0.08),
    band("Above Upper Earnings Limit", f64::INFINITY, 0.02),
];

pub const EMPLOYER_NI_BANDS: [RateBand; 2] = [
    band("Secondary Threshold", 9_100.0, 0.0),
    band("Above Secondary Threshold", f64::INFINITY, 0.138),
];

pub const PLAN1_LOAN: StudentLoanTerms = StudentLoanTerms {
    threshold: 24_990.0,
    rate: 0.09,
};
pub const PLAN2_LOAN: StudentLoanTerms = StudentLoanTerms {
    threshold: 27_295.0,
    rate: 0.09,
};
pub const PLAN4_LOAN: StudentLoanTerms = StudentLoanTerms {
    threshold: 31_395.0,
    rate: 0.09,
};
pub const PLAN5_LOAN: StudentLoanTerms = StudentLoanTerms {
    threshold: 25_000.0,
    rate: 0.09,
};
pub const POSTGRADUATE_LOAN: StudentLoanTerms = StudentLoanTerms {
    threshold: 21_000.0,
    rate: 0.06,
};

pub const CORPORATION_TAX_SMALL_PROFITS_RATE: f64 = 0.19;
pub const CORPORATION_TAX_MAIN_RATE: f64 = 0.25;
pub const CORPORATION_TAX_LOWER_LIMIT: f64 = 50_000.0;
pub const CORPORATION_TAX_UPPER_LIMIT: f64 = 250_000.0;
pub const MARGINAL_RELIEF_FRACTION: f64 = 3.0 / 200.0;

pub const DIVIDEND_ALLOWANCE: f64 = 500.0;
pub const DIVIDEND_BASIC_RATE: f64 = 0.0875;
pub const DIVIDEND_HIGHER_RATE: f64 = 0.3375;
pub const DIVIDEND_ADDITIONAL_RATE: f64 = 0.3935;

/// Director's salary drawn through a limited company; sits at the personal
/// allowance so it attracts neither income tax nor employee NI.
pub const DIRECTOR_SALARY: f64 = PERSONAL_ALLOWANCE;
