use crate::core::{CalculationResult, Scenario};

const LABEL_WIDTH: usize = 22;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum LineKind {
    Income,
    Deduction,
    Total,
}

#[derive(Debug, Clone, PartialEq)]
struct ReportLine {
    label: &'static str,
    amount: f64,
    kind: LineKind,
}

impl ReportLine {
    fn income(label: &'static str, amount: f64) -> Self {
        ReportLine {
            label,
            amount,
            kind: LineKind::Income,
        }
    }

    fn deduction(label: &'static str, amount: f64) -> Self {
        ReportLine {
            label,
            amount,
            kind: LineKind::Deduction,
        }
    }

    fn total(label: &'static str, amount: f64) -> Self {
        ReportLine {
            label,
            amount,
            kind: LineKind::Total,
        }
    }
}

fn report_lines(result: &CalculationResult, employer_ni_borne: bool) -> Vec<ReportLine> {
    let mut lines = vec![ReportLine::income("Gross Income", result.gross)];

    match result.scenario {
        Scenario::Permanent => {
            lines.push(ReportLine::deduction("Income Tax", result.tax));
            lines.push(ReportLine::deduction("National Insurance", result.ni));
            lines.push(ReportLine::deduction("Pension", result.pension));
        }
        Scenario::InsideIr35 => {
            lines.push(ReportLine::deduction("Income Tax", result.tax));
            lines.push(ReportLine::deduction("Employee's NI", result.ni));
            if let (true, Some(employer_ni)) = (employer_ni_borne, result.employer_ni) {
                lines.push(ReportLine::deduction("Employer's NI", employer_ni));
            }
            if let Some(fee) = result.umbrella_fee {
                lines.push(ReportLine::deduction("Umbrella Fee", fee));
            }
            if result.pension > 0.0 {
                lines.push(ReportLine::deduction("Pension", result.pension));
            }
        }
        Scenario::OutsideIr35 => {
            if let Some(expenses) = result.business_expenses {
                lines.push(ReportLine::deduction("Business Expenses", expenses));
            }
            if let Some(salary) = result.salary {
                lines.push(ReportLine::income("Salary Taken", salary));
            }
            if let Some(corporation_tax) = result.corporation_tax {
                lines.push(ReportLine::deduction("Corporation Tax", corporation_tax));
            }
            if let Some(dividend) = result.dividend {
                lines.push(ReportLine::income("Dividends", dividend));
            }
            if let Some(dividend_tax) = result.dividend_tax {
                lines.push(ReportLine::deduction("Dividend Tax", dividend_tax));
            }
        }
    }

    if result.scenario != Scenario::OutsideIr35 && result.student_loan > 0.0 {
        lines.push(ReportLine::deduction("Student Loan", result.student_loan));
    }

    lines.push(ReportLine::total("Net Annual Pay", result.net));
    lines.push(ReportLine::total("Net Monthly Pay", result.net_monthly()));
    lines.push(ReportLine::total("Net Weekly Pay", result.net_weekly()));
    lines
}

/// Plain-text rendering of one result card per scenario.
pub fn render_report(results: &[CalculationResult], employer_ni_borne: bool) -> String {
    let cards: Vec<String> = results
        .iter()
        .map(|result| render_card(result, employer_ni_borne))
        .collect();
    cards.join("\n")
}

fn render_card(result: &CalculationResult, employer_ni_borne: bool) -> String {
    let mut out = format!("{}\n", result.scenario.title());
    let mut separated = false;

    for line in report_lines(result, employer_ni_borne) {
        if line.kind == LineKind::Total && !separated {
            out.push_str(&format!("  {}\n", "-".repeat(LABEL_WIDTH + 16)));
            separated = true;
        }
        let sign = if line.kind == LineKind::Deduction { "- " } else { "  " };
        let label = format!("{}:", line.label);
        out.push_str(&format!(
            "  {label:<width$}{sign}£{amount:>12.2}\n",
            width = LABEL_WIDTH,
            amount = line.amount
        ));
    }

    out
}
