use super::rates::ALLOWANCE_TAPER_THRESHOLD;
use super::types::{Location, RateBand, StudentLoanPlan};

/// Portion of `amount` that falls into each band, walking the bands in
/// ascending order until the amount is used up.
pub fn band_slices(amount: f64, bands: &[RateBand]) -> Vec<f64> {
    let mut slices = Vec::with_capacity(bands.len());
    let mut remaining = amount;
    let mut lower_limit = 0.0;

    for band in bands {
        if remaining <= 0.0 {
            break;
        }
        let width = remaining.min(band.upper_limit - lower_limit).max(0.0);
        slices.push(width);
        remaining -= width;
        lower_limit = band.upper_limit;
    }

    slices
}

pub fn banded_tax(amount: f64, bands: &[RateBand]) -> f64 {
    band_slices(amount, bands)
        .into_iter()
        .zip(bands)
        .map(|(width, band)| width * band.rate)
        .sum()
}

/// Income tax for `taxable_income`, with the personal allowance tapered by
/// half of every pound above the taper threshold.
pub fn calculate_tax(taxable_income: f64, location: Location) -> f64 {
    let mut bands = location.tax_bands().to_vec();

    if taxable_income > ALLOWANCE_TAPER_THRESHOLD {
        let reduction = (taxable_income - ALLOWANCE_TAPER_THRESHOLD) / 2.0;
        if let Some(allowance) = bands.first_mut() {
            allowance.upper_limit = (allowance.upper_limit - reduction).max(0.0);
        }
    }

    banded_tax(taxable_income, &bands)
}

/// National Insurance on `income` under either the employee or employer
/// table. A band only applies once income has passed its lower limit.
pub fn calculate_ni(income: f64, bands: &[RateBand]) -> f64 {
    let mut total = 0.0;
    let mut remaining = income;
    let mut previous_limit = 0.0;

    for band in bands {
        if income > previous_limit {
            let in_band = remaining.min(band.upper_limit - previous_limit);
            total += in_band * band.rate;
            remaining -= in_band;
        }
        if remaining <= 0.0 {
            break;
        }
        previous_limit = band.upper_limit;
    }

    total
}

pub fn calculate_student_loan(income: f64, plan: StudentLoanPlan) -> f64 {
    let Some(terms) = plan.terms() else {
        return 0.0;
    };
    if income > terms.threshold {
        (income - terms.threshold) * terms.rate
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rates::{
        EMPLOYEE_NI_BANDS, EMPLOYER_NI_BANDS, ENGLAND_TAX_BANDS, SCOTLAND_TAX_BANDS,
    };
    use proptest::prelude::{prop_assert, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn zero_amount_pays_nothing_on_any_table() {
        for bands in [
            &ENGLAND_TAX_BANDS[..],
            &SCOTLAND_TAX_BANDS[..],
            &EMPLOYEE_NI_BANDS[..],
            &EMPLOYER_NI_BANDS[..],
        ] {
            assert_approx(banded_tax(0.0, bands), 0.0);
            assert_approx(calculate_ni(0.0, bands), 0.0);
            assert!(band_slices(0.0, bands).is_empty());
        }
    }

    #[test]
    fn negative_amounts_produce_no_tax() {
        assert_approx(banded_tax(-5_000.0, &ENGLAND_TAX_BANDS), 0.0);
        assert_approx(calculate_tax(-5_000.0, Location::England), 0.0);
        assert_approx(calculate_ni(-5_000.0, &EMPLOYEE_NI_BANDS), 0.0);
        assert_approx(calculate_student_loan(-5_000.0, StudentLoanPlan::Plan2), 0.0);
    }

    #[test]
    fn band_slices_split_income_across_england_bands() {
        let slices = band_slices(60_000.0, &ENGLAND_TAX_BANDS);
        assert_eq!(slices.len(), 3);
        assert_approx(slices[0], 12_570.0);
        assert_approx(slices[1], 37_700.0);
        assert_approx(slices[2], 9_730.0);
    }

    #[test]
    fn income_tax_at_taper_threshold_has_full_allowance() {
        assert_approx(calculate_tax(100_000.0, Location::England), 27_432.0);
    }

    #[test]
    fn income_tax_mid_higher_band() {
        assert_approx(calculate_tax(60_000.0, Location::England), 11_432.0);
    }

    #[test]
    fn income_tax_tapers_personal_allowance_above_threshold() {
        // Allowance shrinks to 12570 - 25000 -> 0, so the basic band widens
        // to the full 50270 and the rest lands in the higher band.
        assert_approx(calculate_tax(150_000.0, Location::England), 51_189.0);
    }

    #[test]
    fn income_tax_does_not_mutate_shared_table() {
        let _ = calculate_tax(180_000.0, Location::England);
        assert_approx(ENGLAND_TAX_BANDS[0].upper_limit, 12_570.0);
        assert_approx(calculate_tax(100_000.0, Location::England), 27_432.0);
    }

    #[test]
    fn scottish_bands_apply_starter_and_intermediate_rates() {
        // 2162 @ 19% + 10956 @ 20% + 4312 @ 21%
        assert_approx(calculate_tax(30_000.0, Location::Scotland), 3_507.5);
    }

    #[test]
    fn employee_ni_uses_main_and_upper_rates() {
        // 37700 @ 8% + 29730 @ 2%
        assert_approx(calculate_ni(80_000.0, &EMPLOYEE_NI_BANDS), 3_610.6);
    }

    #[test]
    fn employer_ni_starts_at_secondary_threshold() {
        assert_approx(calculate_ni(9_000.0, &EMPLOYER_NI_BANDS), 0.0);
        assert_approx(calculate_ni(142_800.0, &EMPLOYER_NI_BANDS), 18_450.6);
    }

    #[test]
    fn student_loan_plan2_above_threshold() {
        assert_approx(calculate_student_loan(30_000.0, StudentLoanPlan::Plan2), 243.45);
    }

    #[test]
    fn student_loan_below_threshold_or_without_plan_is_zero() {
        assert_approx(calculate_student_loan(20_000.0, StudentLoanPlan::Plan2), 0.0);
        assert_approx(calculate_student_loan(90_000.0, StudentLoanPlan::None), 0.0);
    }

    #[test]
    fn postgraduate_loan_uses_lower_rate() {
        assert_approx(
            calculate_student_loan(31_000.0, StudentLoanPlan::Postgraduate),
            600.0,
        );
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_banded_tax_is_monotonic(
            lower in 0u32..400_000,
            extra in 0u32..400_000,
            scotland in proptest::bool::ANY,
        ) {
            let bands = if scotland { &SCOTLAND_TAX_BANDS[..] } else { &ENGLAND_TAX_BANDS[..] };
            let a1 = lower as f64;
            let a2 = a1 + extra as f64;
            prop_assert!(banded_tax(a1, bands) <= banded_tax(a2, bands) + EPS);
            prop_assert!(calculate_ni(a1, &EMPLOYEE_NI_BANDS) <= calculate_ni(a2, &EMPLOYEE_NI_BANDS) + EPS);
        }

        #[test]
        fn prop_band_slices_never_exceed_amount(amount in 0u32..1_000_000) {
            let amount = amount as f64;
            for bands in [&ENGLAND_TAX_BANDS[..], &SCOTLAND_TAX_BANDS[..], &EMPLOYER_NI_BANDS[..]] {
                let slices = band_slices(amount, bands);
                prop_assert!(slices.iter().all(|w| *w >= 0.0));
                prop_assert!(slices.iter().sum::<f64>() <= amount + EPS);
            }
        }

        #[test]
        fn prop_ni_matches_banded_calculator(income in 0u32..500_000) {
            let income = income as f64;
            let via_ni = calculate_ni(income, &EMPLOYEE_NI_BANDS);
            let via_bands = banded_tax(income, &EMPLOYEE_NI_BANDS);
            prop_assert!((via_ni - via_bands).abs() <= EPS);
        }

        #[test]
        fn prop_income_tax_is_non_negative_and_below_income(income in 0u32..1_000_000) {
            let income = income as f64;
            for location in [Location::England, Location::Scotland] {
                let tax = calculate_tax(income, location);
                prop_assert!(tax >= 0.0);
                prop_assert!(tax <= income);
            }
        }
    }
}
