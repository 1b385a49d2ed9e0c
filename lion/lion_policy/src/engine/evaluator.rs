//! Policy evaluation engine.
//!
//! This module provides the engine that decides whether a policy is
//! satisfied for a participant.

use std::sync::Arc;

use lion_core::error::{PolicyError, Result};
use tracing::{debug, trace, warn};

use super::constraint::ConstraintEvaluator;
use super::function::{
    DynamicAtomicConstraintFunction, DynamicFn, FunctionRegistry, PolicyValidator,
};
use super::validation::unbound_constraints;
use super::PolicyContext;
use crate::model::{
    Duty, Evaluation, Literal, Operator, ParticipantAgent, Permission, Policy, Prohibition, Rule,
    RuleType,
};

/// Policy evaluation engine.
///
/// Functions and validators are registered at startup through `&mut self`;
/// evaluation only needs `&self`, so a configured engine can be shared
/// between threads behind an `Arc`.
#[derive(Default)]
pub struct PolicyEngine {
    /// Constraint and rule functions.
    functions: FunctionRegistry,

    /// Validators run before any rule is evaluated.
    pre_validators: Vec<PolicyValidator>,

    /// Validators run after all rules were evaluated.
    post_validators: Vec<PolicyValidator>,
}

impl PolicyEngine {
    /// Create a new policy engine with nothing registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an atomic constraint function for rules of type `R`.
    ///
    /// # Arguments
    ///
    /// * `key` - The string form of the left operand the function evaluates.
    /// * `function` - Called with the operator, the right operand, the rule
    ///   and the evaluation context.
    ///
    /// Registering a second function for the same rule type and key
    /// replaces the first.
    pub fn register_function<R, F>(&mut self, key: impl Into<String>, function: F)
    where
        R: Rule,
        F: Fn(Operator, &Literal, &R, &mut PolicyContext<'_>) -> bool + Send + Sync + 'static,
    {
        let key = key.into();
        debug!("Registering {} function for '{}'", R::RULE_TYPE, key);
        self.functions.register_atomic::<R, F>(key, function);
    }

    /// Register a function evaluating any atomic constraint of rules of type
    /// `R` that has no exact function registered.
    pub fn register_dynamic_function<R, F>(&mut self, function: F)
    where
        R: Rule,
        F: Fn(&Literal, Operator, &Literal, &R, &mut PolicyContext<'_>) -> bool
            + Send
            + Sync
            + 'static,
    {
        self.register_dynamic_handler::<R, _>(DynamicFn(function));
    }

    /// Register a [`DynamicAtomicConstraintFunction`] for rules of type `R`.
    ///
    /// Dynamic functions are consulted in registration order; the first one
    /// whose `can_handle` accepts the left operand is used.
    pub fn register_dynamic_handler<R, D>(&mut self, handler: D)
    where
        R: Rule,
        D: DynamicAtomicConstraintFunction<R> + 'static,
    {
        debug!("Registering dynamic {} function", R::RULE_TYPE);
        self.functions.register_dynamic::<R, D>(handler);
    }

    /// Register a function invoked once for every evaluated rule of type `R`.
    ///
    /// Its result is combined with the rule's constraints by logical AND.
    pub fn register_rule_function<R, F>(&mut self, function: F)
    where
        R: Rule,
        F: Fn(&R, &mut PolicyContext<'_>) -> bool + Send + Sync + 'static,
    {
        debug!("Registering {} rule function", R::RULE_TYPE);
        self.functions.register_rule::<R, F>(function);
    }

    /// Register a validator run before the rules are evaluated. A validator
    /// returning `false` stops the evaluation.
    pub fn register_pre_validator<F>(&mut self, validator: F)
    where
        F: Fn(&Policy, &mut PolicyContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.pre_validators.push(Arc::new(validator));
    }

    /// Register a validator run after the rules were evaluated.
    pub fn register_post_validator<F>(&mut self, validator: F)
    where
        F: Fn(&Policy, &mut PolicyContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.post_validators.push(Arc::new(validator));
    }

    /// Evaluate a policy for a participant.
    ///
    /// # Arguments
    ///
    /// * `policy` - The policy to evaluate.
    /// * `agent` - The requesting participant.
    ///
    /// # Returns
    ///
    /// The evaluation. It succeeded iff no problem was recorded.
    pub fn evaluate(&self, policy: &Policy, agent: &ParticipantAgent) -> Evaluation {
        self.evaluate_with_context(policy, PolicyContext::new(agent))
    }

    /// Evaluate a policy with a caller-prepared context.
    ///
    /// Problems already present in the context count as failures.
    pub fn evaluate_with_context(
        &self,
        policy: &Policy,
        mut context: PolicyContext<'_>,
    ) -> Evaluation {
        debug!(
            "Evaluating policy {} ({} permissions, {} prohibitions, {} obligations)",
            policy.uid,
            policy.permissions.len(),
            policy.prohibitions.len(),
            policy.obligations.len()
        );

        // Run the pre-validators; the first rejection ends the evaluation
        for validator in &self.pre_validators {
            if !validator(policy, &mut context) {
                warn!("Policy {} rejected by pre-validator", policy.uid);
                context.report_problem(format!(
                    "Policy '{}' rejected by pre-validator",
                    policy.uid
                ));
                return self.finish(policy, context);
            }
        }

        // Evaluate the rules
        for permission in &policy.permissions {
            self.evaluate_permission(permission, &mut context);
        }

        for prohibition in &policy.prohibitions {
            self.evaluate_prohibition(prohibition, &mut context);
        }

        for duty in &policy.obligations {
            if !self.duty_holds(duty, &mut context) {
                context.report_problem(format!(
                    "Duty '{}' not satisfied for action '{}'",
                    duty.uid, duty.action
                ));
            }
        }

        // Every post-validator runs, even after a rejection
        for validator in &self.post_validators {
            if !validator(policy, &mut context) {
                warn!("Policy {} rejected by post-validator", policy.uid);
                context.report_problem(format!(
                    "Policy '{}' rejected by post-validator",
                    policy.uid
                ));
            }
        }

        self.finish(policy, context)
    }

    /// Check that every atomic constraint in the policy can be dispatched.
    ///
    /// No registered function is invoked.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Every left operand has a function.
    /// * `Err(PolicyError::Invalid)` - One problem per unbound left operand.
    pub fn validate(&self, policy: &Policy) -> Result<()> {
        let problems = unbound_constraints(&self.functions, policy);
        if problems.is_empty() {
            Ok(())
        } else {
            warn!("Policy {} has {} unbound constraints", policy.uid, problems.len());
            Err(PolicyError::Invalid(problems).into())
        }
    }

    fn evaluate_permission(&self, permission: &Permission, context: &mut PolicyContext<'_>) {
        let mut granted = self.rule_holds(permission, context);

        // Attached duties must all hold for the permission to be granted
        for duty in &permission.duties {
            if !self.duty_holds(duty, context) {
                context.report_problem(format!(
                    "Duty '{}' of permission '{}' not satisfied for action '{}'",
                    duty.uid, permission.uid, duty.action
                ));
                granted = false;
            }
        }

        trace!("Permission {} granted: {}", permission.uid, granted);
        if !granted {
            context.report_problem(format!(
                "Permission '{}' not granted for action '{}'",
                permission.uid, permission.action
            ));
        }
    }

    fn evaluate_prohibition(&self, prohibition: &Prohibition, context: &mut PolicyContext<'_>) {
        // Without constraints or rule functions there is nothing that could
        // trigger the prohibition
        let unconditional = prohibition.constraints.is_empty()
            && self.functions.rule_functions(RuleType::Prohibition).is_empty();

        let triggered = !unconditional && self.rule_holds(prohibition, context);

        trace!("Prohibition {} triggered: {}", prohibition.uid, triggered);
        if triggered {
            context.report_problem(format!(
                "Prohibition '{}' triggered for action '{}'",
                prohibition.uid, prohibition.action
            ));
        }
    }

    fn duty_holds(&self, duty: &Duty, context: &mut PolicyContext<'_>) -> bool {
        let satisfied = self.rule_holds(duty, context);
        trace!("Duty {} satisfied: {}", duty.uid, satisfied);
        satisfied
    }

    /// Constraints AND rule functions; both sides always run.
    fn rule_holds<R: Rule>(&self, rule: &R, context: &mut PolicyContext<'_>) -> bool {
        let rule_ref = rule.as_rule_ref();
        let constraints_hold =
            ConstraintEvaluator::new(&self.functions, rule_ref).evaluate_all(context);

        let functions_hold = self
            .functions
            .rule_functions(R::RULE_TYPE)
            .iter()
            .fold(true, |holds, function| function.evaluate(rule_ref, context) && holds);

        constraints_hold && functions_hold
    }

    fn finish(&self, policy: &Policy, context: PolicyContext<'_>) -> Evaluation {
        let evaluation = Evaluation::from_problems(policy.uid, context.into_problems());
        debug!(
            "Policy {} evaluated: {} ({} problems)",
            policy.uid,
            evaluation.result,
            evaluation.problems.len()
        );
        evaluation
    }
}
