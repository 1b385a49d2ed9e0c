//! Constraint evaluation.
//!
//! Interprets the constraint algebra against the engine's function registry.

use tracing::{trace, warn};

use super::function::{Dispatch, FunctionRegistry};
use super::PolicyContext;
use crate::model::{AtomicConstraint, Constraint, RuleRef};

/// Evaluates constraints guarding one rule.
pub(crate) struct ConstraintEvaluator<'e, 'r> {
    functions: &'e FunctionRegistry,
    rule: RuleRef<'r>,
}

impl<'e, 'r> ConstraintEvaluator<'e, 'r> {
    pub(crate) fn new(functions: &'e FunctionRegistry, rule: RuleRef<'r>) -> Self {
        Self { functions, rule }
    }

    /// Evaluate all constraints of the rule. Every constraint is evaluated
    /// so that each failure is reported.
    pub(crate) fn evaluate_all(&self, context: &mut PolicyContext<'_>) -> bool {
        self.rule
            .constraints()
            .iter()
            .fold(true, |holds, constraint| self.evaluate(constraint, context) && holds)
    }

    /// Evaluate one constraint tree.
    pub(crate) fn evaluate(
        &self,
        constraint: &Constraint,
        context: &mut PolicyContext<'_>,
    ) -> bool {
        match constraint {
            Constraint::Atomic(atomic) => self.evaluate_atomic(atomic, context),
            // No short-circuit: every failing child gets to report.
            Constraint::And(children) => children
                .iter()
                .fold(true, |holds, child| self.evaluate(child, context) && holds),
            Constraint::Or(children) => children.iter().any(|child| self.evaluate(child, context)),
            Constraint::Xone(children) => {
                children
                    .iter()
                    .filter(|child| self.evaluate(child, context))
                    .count()
                    == 1
            }
        }
    }

    fn evaluate_atomic(&self, atomic: &AtomicConstraint, context: &mut PolicyContext<'_>) -> bool {
        let rule_type = self.rule.rule_type();
        let key = atomic.left_key();
        let left = atomic.left.value();
        let right = atomic.right.value();

        let result = match self.functions.resolve(rule_type, &key, left) {
            Some(Dispatch::Exact(function)) => {
                function.evaluate(atomic.operator, right, self.rule, context)
            }
            Some(Dispatch::Dynamic(function)) => {
                function.evaluate(left, atomic.operator, right, self.rule, context)
            }
            None => {
                warn!(
                    "No function registered for constraint '{}' on {} {}",
                    key,
                    rule_type,
                    self.rule.uid()
                );
                context.report_problem(format!(
                    "No function registered for constraint '{}' on {} '{}'",
                    key,
                    rule_type,
                    self.rule.uid()
                ));
                false
            }
        };

        trace!("Constraint {} evaluated to {}", atomic, result);
        result
    }
}
