use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::{info, instrument, warn};

use crate::domain::{
    Curriculum, CurriculumBuilder, StudentError, StudentRecord, StudentTable,
};

/// The curriculum recommended for one student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentPlan {
    /// The student id.
    pub student_id: String,
    /// The recommended units, in order.
    pub curriculum: Curriculum,
}

/// The outcome of planning a whole student table.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PlanReport {
    /// One plan per readable student, in table order.
    pub plans: Vec<StudentPlan>,
    /// Students that could not be planned, in table order.
    pub failures: Vec<StudentError>,
}

impl PlanReport {
    /// Whether every student was planned.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Plans every student in a table against a shared [`CurriculumBuilder`].
#[derive(Debug, Clone, Copy)]
pub struct Planner<'a> {
    builder: CurriculumBuilder<'a>,
}

impl<'a> Planner<'a> {
    /// Creates a planner.
    #[must_use]
    pub const fn new(builder: CurriculumBuilder<'a>) -> Self {
        Self { builder }
    }

    /// Plans every student in the table.
    ///
    /// Students are planned in parallel. A student whose row could not be read
    /// or whose record cannot be ranked is reported as a failure; the rest of
    /// the table is still planned.
    #[instrument(level = "debug", skip_all, fields(students = table.len()))]
    pub fn plan(&self, table: &StudentTable) -> PlanReport {
        let results: Vec<Result<StudentPlan, StudentError>> = table
            .students()
            .par_iter()
            .map(|student| match student {
                Ok(student) => self.plan_student(student),
                Err(error) => Err(error.clone()),
            })
            .collect();

        let mut report = PlanReport::default();
        for result in results {
            match result {
                Ok(plan) => report.plans.push(plan),
                Err(error) => {
                    warn!("skipping student: {error}");
                    report.failures.push(error);
                }
            }
        }

        info!(
            planned = report.plans.len(),
            skipped = report.failures.len(),
            "planned students"
        );
        report
    }

    /// Plans a single student.
    ///
    /// # Errors
    ///
    /// Returns [`StudentError::Rank`] if a tested domain cannot be ranked.
    pub fn plan_student(&self, student: &StudentRecord) -> Result<StudentPlan, StudentError> {
        let curriculum =
            self.builder
                .resolve(&student.proficiency)
                .map_err(|source| StudentError::Rank {
                    student: student.id.clone(),
                    source,
                })?;

        if curriculum.is_empty() {
            warn!(student = %student.id, "no tested standards; curriculum is empty");
        }

        Ok(StudentPlan {
            student_id: student.id.clone(),
            curriculum,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        DomainRanks, RankError,
        mapper::tests::{reading_mapper, table},
    };

    fn students() -> StudentTable {
        StudentTable::from_rows(&table(&[
            &["Student Name", "RF", "RL", "RI", "L"],
            &["Albin Stanton", "2", "3", "K", "3"],
            &["Erik Purdy", "3", "1", "1", "1"],
            &["Aimee Cole", "K", "K", "K", "K"],
            &["Kaden Sipes", "2", "3", "3", "K"],
        ]))
        .unwrap()
    }

    fn units(plan: &StudentPlan) -> Vec<String> {
        plan.curriculum.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn plans_every_student_in_order() {
        let mapper = reading_mapper();
        let ranks = DomainRanks::default();
        let planner = Planner::new(CurriculumBuilder::new(&mapper, &ranks));

        let report = planner.plan(&students());

        assert!(report.is_complete());
        let ids: Vec<&str> = report.plans.iter().map(|p| p.student_id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["Albin Stanton", "Erik Purdy", "Aimee Cole", "Kaden Sipes"]
        );

        assert_eq!(
            units(&report.plans[0]),
            vec!["K.RI", "1.RI", "2.RF", "2.RI", "3.RF"]
        );
        assert_eq!(
            units(&report.plans[1]),
            vec!["1.RL", "1.RI", "2.RI", "2.RL", "2.L"]
        );
        assert_eq!(
            units(&report.plans[2]),
            vec!["K.RF", "K.RL", "K.RI", "1.RF", "1.RL"]
        );
        assert_eq!(
            units(&report.plans[3]),
            vec!["2.RF", "2.L", "3.RF", "3.RL", "3.RI"]
        );
    }

    #[test]
    fn unrankable_student_is_skipped() {
        let mapper = reading_mapper();
        let ranks = DomainRanks::default();
        let planner = Planner::new(CurriculumBuilder::new(&mapper, &ranks));
        let table = StudentTable::from_rows(&table(&[
            &["id", "RF", "RL"],
            &["a", "2", "X"],
            &["b", "1", "1"],
            &["c", "1", "2", "3"],
        ]))
        .unwrap();

        let report = planner.plan(&table);

        assert_eq!(report.plans.len(), 1);
        assert_eq!(report.plans[0].student_id, "b");
        assert_eq!(report.failures.len(), 2);
        assert!(matches!(
            &report.failures[0],
            StudentError::Rank { student, source: RankError(_) } if student == "a"
        ));
        assert!(matches!(
            report.failures[1],
            StudentError::TooManyCells { row: 4, .. }
        ));
    }

    #[test]
    fn incomparable_starts_follow_header_order() {
        // 6.RF and 6.L are both outside the sequence; RF heads the earlier column.
        let mapper = reading_mapper();
        let ranks = DomainRanks::default();
        let planner = Planner::new(CurriculumBuilder::new(&mapper, &ranks));
        let table = StudentTable::from_rows(&table(&[
            &["id", "RF", "RL", "RI", "L"],
            &["s", "6", "", "", "6"],
        ]))
        .unwrap();

        let report = planner.plan(&table);

        assert!(report.is_complete());
        assert_eq!(units(&report.plans[0]), vec!["6.RF"]);
    }

    #[test]
    fn student_without_scores_gets_empty_curriculum() {
        let mapper = reading_mapper();
        let ranks = DomainRanks::default();
        let planner = Planner::new(CurriculumBuilder::new(&mapper, &ranks));
        let table = StudentTable::from_rows(&table(&[&["id", "RF"], &["a", ""]])).unwrap();

        let report = planner.plan(&table);

        assert!(report.is_complete());
        assert!(report.plans[0].curriculum.is_empty());
    }
}
