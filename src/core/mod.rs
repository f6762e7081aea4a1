/// Core module for analyzer renaming
///
/// This module contains the renaming pipeline: name validation, the literal
/// substitution rules, planning every change in memory, and applying the plan.

pub mod apply;
pub mod names;
pub mod plan;
pub mod substitution;
