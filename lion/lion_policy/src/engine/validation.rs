//! Static policy validation.

use super::function::FunctionRegistry;
use crate::model::{Duty, Policy, Rule};

/// Collect one problem per atomic constraint whose left operand has no
/// function registered for the rule type it appears in.
pub(crate) fn unbound_constraints(functions: &FunctionRegistry, policy: &Policy) -> Vec<String> {
    let mut problems = Vec::new();

    for permission in &policy.permissions {
        check_rule(functions, permission, &mut problems);
        for duty in &permission.duties {
            check_duty(functions, duty, &mut problems);
        }
    }
    for prohibition in &policy.prohibitions {
        check_rule(functions, prohibition, &mut problems);
    }
    for duty in &policy.obligations {
        check_duty(functions, duty, &mut problems);
    }

    problems
}

fn check_duty(functions: &FunctionRegistry, duty: &Duty, problems: &mut Vec<String>) {
    check_rule(functions, duty, problems);
    for consequence in &duty.consequences {
        check_duty(functions, consequence, problems);
    }
}

fn check_rule<R: Rule>(functions: &FunctionRegistry, rule: &R, problems: &mut Vec<String>) {
    for constraint in rule.constraints() {
        for atomic in constraint.atomics() {
            let key = atomic.left_key();
            if functions
                .resolve(R::RULE_TYPE, &key, atomic.left.value())
                .is_none()
            {
                problems.push(format!(
                    "No function registered for constraint '{}' on {} '{}'",
                    key,
                    R::RULE_TYPE,
                    rule.uid()
                ));
            }
        }
    }
}
