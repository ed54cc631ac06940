//! Remediation Curriculum Planning
//!
//! A domain-order table lists, for each domain (e.g. a grade level), the
//! standards taught there in mastery order. From it this crate infers a single
//! linear sequence of `domain.standard` units, then recommends to each student
//! the next few units they have not yet mastered.

pub mod domain;
pub use domain::{
    Config, Curriculum, CurriculumBuilder, Domain, DomainMapper, DomainRanks, DomainStandard,
    PlanReport, Planner, ProficiencyRecord, Standard, StudentPlan, StudentTable,
};

/// Reading and writing delimited tables.
pub mod storage;
pub use storage::{read_rows, read_rows_from_path, write_plans};
