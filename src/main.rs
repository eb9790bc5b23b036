use anyhow::Context;
use clap::Parser;
use std::io::Write;
use uninest_gpa::domain::ports::ConfigProvider;
use uninest_gpa::utils::error::EntryKind;
use uninest_gpa::utils::{logger, validation::Validate};
use uninest_gpa::{
    export_report, format_gpa, CliCommand, CliConfig, GpaCalculator, GpaError, GradeConfiguration,
    LocalStorage, ReportFormat, YearReport,
};

type Calculator = GpaCalculator<LocalStorage, GradeConfiguration>;

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    // 載入成績配置，無法使用時退回示範資料
    let grades = GradeConfiguration::load_or_demo(config.config.as_deref());
    let storage = LocalStorage::new(config.data_dir.clone());
    let calculator = GpaCalculator::new(storage, grades);

    if let Err(e) = run(&calculator, config.command) {
        let Some(gpa_error) = e.downcast_ref::<GpaError>() else {
            return Err(e);
        };

        // 記錄詳細錯誤信息
        tracing::error!(
            "Command failed: {} (Category: {:?}, Severity: {:?})",
            gpa_error,
            gpa_error.category(),
            gpa_error.severity()
        );
        // 輸出用戶友好的錯誤信息
        eprintln!("❌ {}", gpa_error.user_friendly_message());
        eprintln!("💡 {}", gpa_error.recovery_suggestion());

        std::process::exit(gpa_error.exit_code());
    }

    Ok(())
}

fn run(calculator: &Calculator, command: CliCommand) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let grades = calculator.config();

    match command {
        CliCommand::Scale => {
            writeln!(out, "{:<6} {}", "Letter", "Points")?;
            for (letter, points) in grades.scale().ranked() {
                writeln!(out, "{:<6} {}", letter, points)?;
            }
        }
        CliCommand::Years => {
            for year in grades.year_labels() {
                writeln!(out, "{}: {}", year, grades.term_names(year).join(", "))?;
            }
        }
        CliCommand::Subjects { year, term } => {
            let report = calculator.report(&year)?;
            let term_report = report.term(&term).ok_or_else(|| GpaError::UnknownEntry {
                kind: EntryKind::Term,
                name: term.clone(),
            })?;
            writeln!(out, "{:<3} {:<24} {:<5} {:>7}  {}", "#", "Subject", "Grade", "Credits", "Type")?;
            for (idx, row) in term_report.subjects.iter().enumerate() {
                writeln!(
                    out,
                    "{:<3} {:<24} {:<5} {:>7}  {}",
                    idx + 1,
                    row.name,
                    row.letter.as_deref().unwrap_or("–"),
                    row.credits,
                    row.kind
                )?;
            }
            writeln!(out, "Options: {}", grades.grade_options().join(" "))?;
        }
        CliCommand::Set {
            year,
            term,
            subject,
            grade,
        } => {
            let report = calculator.set_grade(&year, &term, &subject, &grade)?;
            print_report(&mut out, &report)?;
        }
        CliCommand::Clear { year, term, subject } => {
            let report = calculator.clear_grade(&year, &term, &subject)?;
            print_report(&mut out, &report)?;
        }
        CliCommand::Report { year } => {
            let report = calculator.report(&year)?;
            print_report(&mut out, &report)?;
        }
        CliCommand::Overall => {
            writeln!(out, "Overall GPA: {}", format_gpa(calculator.overall_gpa()))?;
        }
        CliCommand::Export {
            year,
            output,
            format,
        } => {
            let format: ReportFormat = format.parse()?;
            let report = calculator.report(&year)?;
            let path = export_report(&report, &output, format)
                .with_context(|| format!("exporting {} to {}", year, output.display()))?;
            writeln!(out, "✅ Report saved to: {}", path.display())?;
        }
    }

    Ok(())
}

fn print_report(out: &mut impl Write, report: &YearReport) -> anyhow::Result<()> {
    writeln!(out, "Year {}", report.year)?;
    for term in &report.terms {
        writeln!(
            out,
            "  {:<16} GPA {}  ({} graded credits)",
            term.term,
            format_gpa(term.gpa),
            term.graded_credits
        )?;
    }
    writeln!(
        out,
        "Cumulative GPA {}  [{:.0}%]",
        format_gpa(report.cumulative_gpa),
        report.gauge_percent
    )?;
    Ok(())
}
