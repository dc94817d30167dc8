use crate::infra::{demo_snapshot, today_or_local};
use chrono::NaiveDate;
use clap::Args;
use std::collections::BTreeMap;
use std::path::PathBuf;
use talent_pulse::config::AppConfig;
use talent_pulse::error::AppError;
use talent_pulse::evaluations::{
    individual_report, organization_report, EvaluationRecord, ExpectationProfile,
    IndividualReport, OrganizationReport, PeriodToken, PersonId, Scope, SeniorityBand,
};
use talent_pulse::snapshot::EvaluationSnapshot;
use talent_pulse::telemetry;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// JSON snapshot with `records` and `expected_skills`
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    /// Person to report on (subject id)
    #[arg(long)]
    pub(crate) subject: String,
    /// Period token such as `all`, `previous_quarter` or `last_6_months`
    #[arg(long)]
    pub(crate) period: Option<PeriodToken>,
    /// Seniority band the person is expected to hold
    #[arg(long)]
    pub(crate) expected_band: SeniorityBand,
    /// Role used for the expected-skill lookup
    #[arg(long)]
    pub(crate) role: String,
    /// Area used for the expected-skill lookup. Defaults to the person's area.
    #[arg(long)]
    pub(crate) area: Option<String>,
    /// Evaluation date for the report (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the reporting date (defaults to today).
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Only print the organization trajectory section.
    #[arg(long)]
    pub(crate) organization_only: bool,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        snapshot,
        subject,
        period,
        expected_band,
        role,
        area,
        today,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let today = today_or_local(today);
    let snapshot = EvaluationSnapshot::from_path(snapshot)?;
    let subject = PersonId(subject.trim().to_string());
    let area = area
        .or_else(|| subject_area(&snapshot.records, &subject))
        .unwrap_or_default();
    let table = snapshot.expected_table();
    let profile = ExpectationProfile {
        table: &table,
        band: expected_band,
        role: role.trim(),
        area: area.trim(),
    };

    let report = individual_report(
        &snapshot.records,
        &subject,
        &profile,
        period.unwrap_or(config.dashboard.default_period),
        today,
        config.dashboard.label_width,
    );
    render_individual_report(&report);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        today,
        organization_only,
    } = args;

    let config = AppConfig::load()?;
    let today = today_or_local(today);
    let snapshot = demo_snapshot(today);
    let table = snapshot.expected_table();

    println!("Evaluation dashboard demo ({today})");

    if !organization_only {
        let mut people: BTreeMap<&PersonId, &str> = BTreeMap::new();
        for record in &snapshot.records {
            people.entry(&record.subject_id).or_insert(&record.area);
        }

        for (subject, area) in people {
            let profile = ExpectationProfile {
                table: &table,
                band: SeniorityBand::SemiSenior,
                role: "Analyst",
                area,
            };
            let report = individual_report(
                &snapshot.records,
                subject,
                &profile,
                config.dashboard.default_period,
                today,
                config.dashboard.label_width,
            );
            println!();
            render_individual_report(&report);
        }
    }

    let organization = organization_report(
        &snapshot.records,
        &Scope::Organization,
        today,
        config.dashboard.label_width,
    );
    println!();
    render_organization_report(&organization);
    Ok(())
}

fn subject_area(records: &[EvaluationRecord], subject: &PersonId) -> Option<String> {
    records
        .iter()
        .find(|record| &record.subject_id == subject)
        .map(|record| record.area.trim().to_string())
}

fn score(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |value| format!("{value:.2}"))
}

pub(crate) fn render_individual_report(report: &IndividualReport) {
    let name = report
        .subject_name
        .as_deref()
        .unwrap_or(report.subject_id.0.as_str());
    println!("Individual dashboard: {} ({})", name, report.subject_id);
    println!(
        "Period: {} | as of {} | {} evaluations",
        report.period, report.today, report.record_count
    );

    if report.record_count == 0 {
        println!("No evaluations in this period.");
        return;
    }

    let assessment = &report.assessment;
    println!(
        "General average {:.2} -> {} (expected {}): {}",
        assessment.general_average,
        assessment.achieved_label,
        assessment.expected_label,
        assessment.status_label
    );
    println!(
        "Technical {:.2} | Behavioral {:.2}",
        report.categories.technical, report.categories.behavioral
    );

    println!("\nSkills (self / manager / composite / expected)");
    for row in &report.radar {
        println!(
            "- {}: {} / {} / {} / {}",
            row.label,
            score(row.self_score),
            score(row.manager_score),
            score(row.composite),
            score(row.expected)
        );
    }

    if !report.trend.is_empty() {
        println!("\nQuarterly trend");
        for row in &report.trend {
            println!(
                "- {}: self {} | manager {} | composite {}",
                row.bucket_label,
                score(row.self_score),
                score(row.manager_score),
                score(row.composite)
            );
        }
    }

    if report.comparison.is_empty() {
        println!("\n{}: no evaluations this quarter", report.comparison_label);
    } else {
        println!("\n{}", report.comparison_label);
        for bar in &report.comparison {
            let delta = bar
                .delta
                .map_or_else(|| "new".to_string(), |delta| format!("{delta:+.2}"));
            println!(
                "- {}: {} -> {} ({}, {})",
                bar.label,
                score(bar.before),
                score(bar.after),
                delta,
                bar.trend_label
            );
        }
    }

    if !report.breakdown.notable_improvements.is_empty() {
        println!("\nNotable improvements");
        for entry in &report.breakdown.notable_improvements {
            println!("- {} ({:+.2})", entry.skill_name, entry.delta.unwrap_or(0.0));
        }
    }
    if !report.breakdown.needs_attention.is_empty() {
        println!("\nNeeds attention");
        for entry in &report.breakdown.needs_attention {
            println!("- {} ({:+.2})", entry.skill_name, entry.delta.unwrap_or(0.0));
        }
    }

    if !report.gaps.is_empty() {
        println!("\nPerception gaps");
        for gap in &report.gaps {
            println!(
                "- {}: self {:.2} vs manager {:.2} (gap {:.2}, {})",
                gap.label, gap.self_score, gap.manager_score, gap.gap, gap.perception_label
            );
        }
    }
}

pub(crate) fn render_organization_report(report: &OrganizationReport) {
    println!("Organization trajectories: {}", report.scheme_label);
    if let Some(windows) = &report.windows {
        println!(
            "Previous {} to {} | current {} to {}",
            windows.previous.start,
            windows.previous.end,
            windows.current.start,
            windows.current.end
        );
    }
    println!(
        "{} people | {} changed seniority band",
        report.people, report.level_jumps
    );

    for comet in &report.comets {
        let jump = if comet.salto_nivel {
            match (comet.previous_band, comet.current_band) {
                (Some(before), Some(after)) => {
                    format!(" [{} -> {}]", before.label(), after.label())
                }
                _ => String::new(),
            }
        } else {
            String::new()
        };
        let delta = comet
            .delta
            .map_or_else(|| "n/a".to_string(), |delta| format!("{delta:+.2}"));
        println!(
            "- {} ({}): {} -> {} ({}){}",
            comet.label,
            comet.area,
            score(comet.before),
            score(comet.after),
            delta,
            jump
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use talent_pulse::evaluations::projection::DEFAULT_LABEL_WIDTH;

    #[test]
    fn demo_snapshot_feeds_both_reports() {
        let today = NaiveDate::from_ymd_opt(2024, 8, 15).expect("valid date");
        let snapshot = demo_snapshot(today);
        let table = snapshot.expected_table();
        let profile = ExpectationProfile {
            table: &table,
            band: SeniorityBand::SemiSenior,
            role: "Analyst",
            area: "Data",
        };

        let individual = individual_report(
            &snapshot.records,
            &PersonId("p-ana".to_string()),
            &profile,
            PeriodToken::AllTime,
            today,
            DEFAULT_LABEL_WIDTH,
        );
        assert_eq!(individual.subject_name.as_deref(), Some("Ana Ruiz"));
        assert_eq!(individual.radar.len(), 4);
        assert!(individual.radar.iter().all(|row| row.expected == Some(2.5)));
        render_individual_report(&individual);

        let organization = organization_report(
            &snapshot.records,
            &Scope::Organization,
            today,
            DEFAULT_LABEL_WIDTH,
        );
        assert_eq!(organization.people, 4);
        render_organization_report(&organization);
    }

    #[test]
    fn subject_area_uses_first_matching_record() {
        let snapshot = demo_snapshot(NaiveDate::from_ymd_opt(2024, 8, 15).expect("valid date"));
        assert_eq!(
            subject_area(&snapshot.records, &PersonId("p-mia".to_string())).as_deref(),
            Some("Product")
        );
        assert!(subject_area(&snapshot.records, &PersonId("nobody".to_string())).is_none());
    }
}
