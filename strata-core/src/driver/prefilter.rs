//! Syntax prefilter for tolerant runs

use crate::compiler::parser::Parser;
use crate::compiler::{CompilationResult, SourceUnit};
use std::sync::Arc;
use strata_log::{debug, warn, Logger};

use super::DRIVER_TARGET;

/// Drop every unit that fails a standalone parse
///
/// Each survivor keeps its position relative to the others. Dropped units are
/// only reported through a warning. The parser is reset afterwards whatever
/// the outcome. `max_problems` caps each trial result like a registered unit's.
pub fn prefilter(
    units: Vec<SourceUnit>,
    parser: &mut Parser,
    max_problems: usize,
    logger: &Arc<Logger>,
) -> Vec<SourceUnit> {
    let mut session = parser.session();
    let total = units.len();
    let mut kept = Vec::with_capacity(total);

    for (index, unit) in units.into_iter().enumerate() {
        let result = CompilationResult::new(unit.name(), index, total, max_problems);
        let tree = session.parse_standalone(&unit, result);
        if tree.has_errors() {
            warn!(logger, target: DRIVER_TARGET, "Syntax error detected in: {}", unit.name());
        } else {
            kept.push(unit);
        }
    }

    debug!(
        logger,
        target: DRIVER_TARGET,
        "prefilter kept {} of {} units",
        kept.len(),
        total
    );
    kept
}
