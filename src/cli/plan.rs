use std::{
    fs::File,
    io::{self, BufWriter},
    num::NonZeroUsize,
    path::PathBuf,
    process,
};

use anyhow::Context;
use clap::Parser;
use curriculum::{
    Config, CurriculumBuilder, PlanReport, Planner, StudentTable, read_rows_from_path,
    write_plans,
};
use tracing::instrument;

use super::{DomainOrderArgs, terminal::Paint};

#[derive(Debug, Parser)]
#[command(about = "Build a remediation curriculum for every student")]
pub struct Plan {
    #[command(flatten)]
    domain_order: DomainOrderArgs,

    /// The student table: a header of standards, then one row per student
    #[arg(short, long, value_name = "FILE")]
    students: PathBuf,

    /// Where to write the curriculum table [default: stdout]
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Maximum number of units per student [default: from config]
    #[arg(short, long, value_name = "N")]
    max_length: Option<NonZeroUsize>,
}

impl Plan {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, mut config: Config) -> anyhow::Result<()> {
        self.domain_order.apply(&mut config);
        if let Some(max_length) = self.max_length {
            config.max_curriculum_length = max_length;
        }

        let ranks = config.ranks();
        let mapper = self.domain_order.load_mapper(&config, &ranks)?;

        let rows = read_rows_from_path(&self.students, config.delimiter)?;
        let table = StudentTable::from_rows(&rows)
            .with_context(|| format!("Invalid student table {}", self.students.display()))?;

        let builder =
            CurriculumBuilder::new(&mapper, &ranks).with_max_length(config.max_curriculum_length);
        let report = Planner::new(builder).plan(&table);

        match &self.output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                write_plans(BufWriter::new(file), &report.plans, config.delimiter)?;
            }
            None => write_plans(io::stdout().lock(), &report.plans, config.delimiter)?,
        }

        if !report.is_complete() {
            Self::print_failures(&report);
            process::exit(2);
        }

        Ok(())
    }

    fn print_failures(report: &PlanReport) {
        eprintln!(
            "{}",
            format!(
                "⚠️  Skipped {} of {} students:",
                report.failures.len(),
                report.failures.len() + report.plans.len()
            )
            .warning()
        );
        for failure in &report.failures {
            eprintln!("  • {failure}");
        }
    }
}
