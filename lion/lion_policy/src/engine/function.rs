//! Function registry.
//!
//! Registered functions give meaning to abstract constraint keys. The
//! registry is keyed by rule type and, for atomic constraint functions, by
//! the string form of the constraint's left operand. Typed functions are
//! stored behind erased trait objects that recover the concrete rule from a
//! [`RuleRef`] before calling the user's code.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use super::PolicyContext;
use crate::model::{Literal, Operator, Policy, Rule, RuleRef, RuleType};

/// A pre- or post-validator run against the whole policy.
pub type PolicyValidator = Arc<dyn Fn(&Policy, &mut PolicyContext<'_>) -> bool + Send + Sync>;

/// A constraint function registered for a rule type without a key.
///
/// It receives the raw left operand and is consulted when no function is
/// registered for the exact left-operand key.
pub trait DynamicAtomicConstraintFunction<R: Rule>: Send + Sync {
    /// Evaluate `left operator right` for the given rule.
    fn evaluate(
        &self,
        left_value: &Literal,
        operator: Operator,
        right_value: &Literal,
        rule: &R,
        context: &mut PolicyContext<'_>,
    ) -> bool;

    /// Whether this function evaluates constraints with the given left operand.
    fn can_handle(&self, _left_value: &Literal) -> bool {
        true
    }
}

/// Adapter turning a closure into a [`DynamicAtomicConstraintFunction`]
/// that handles every left operand.
pub(crate) struct DynamicFn<F>(pub(crate) F);

impl<R, F> DynamicAtomicConstraintFunction<R> for DynamicFn<F>
where
    R: Rule,
    F: Fn(&Literal, Operator, &Literal, &R, &mut PolicyContext<'_>) -> bool + Send + Sync,
{
    fn evaluate(
        &self,
        left_value: &Literal,
        operator: Operator,
        right_value: &Literal,
        rule: &R,
        context: &mut PolicyContext<'_>,
    ) -> bool {
        (self.0)(left_value, operator, right_value, rule, context)
    }
}

pub(crate) trait ErasedAtomicFunction: Send + Sync {
    fn evaluate(
        &self,
        operator: Operator,
        right_value: &Literal,
        rule: RuleRef<'_>,
        context: &mut PolicyContext<'_>,
    ) -> bool;
}

pub(crate) trait ErasedDynamicFunction: Send + Sync {
    fn evaluate(
        &self,
        left_value: &Literal,
        operator: Operator,
        right_value: &Literal,
        rule: RuleRef<'_>,
        context: &mut PolicyContext<'_>,
    ) -> bool;

    fn can_handle(&self, left_value: &Literal) -> bool;
}

pub(crate) trait ErasedRuleFunction: Send + Sync {
    fn evaluate(&self, rule: RuleRef<'_>, context: &mut PolicyContext<'_>) -> bool;
}

struct TypedAtomic<R, F> {
    function: F,
    _rule: PhantomData<fn(&R)>,
}

impl<R, F> ErasedAtomicFunction for TypedAtomic<R, F>
where
    R: Rule,
    F: Fn(Operator, &Literal, &R, &mut PolicyContext<'_>) -> bool + Send + Sync,
{
    fn evaluate(
        &self,
        operator: Operator,
        right_value: &Literal,
        rule: RuleRef<'_>,
        context: &mut PolicyContext<'_>,
    ) -> bool {
        match R::from_rule_ref(rule) {
            Some(rule) => (self.function)(operator, right_value, rule, context),
            None => false,
        }
    }
}

struct TypedDynamic<R, D> {
    function: D,
    _rule: PhantomData<fn(&R)>,
}

impl<R, D> ErasedDynamicFunction for TypedDynamic<R, D>
where
    R: Rule,
    D: DynamicAtomicConstraintFunction<R>,
{
    fn evaluate(
        &self,
        left_value: &Literal,
        operator: Operator,
        right_value: &Literal,
        rule: RuleRef<'_>,
        context: &mut PolicyContext<'_>,
    ) -> bool {
        match R::from_rule_ref(rule) {
            Some(rule) => self
                .function
                .evaluate(left_value, operator, right_value, rule, context),
            None => false,
        }
    }

    fn can_handle(&self, left_value: &Literal) -> bool {
        self.function.can_handle(left_value)
    }
}

struct TypedRule<R, F> {
    function: F,
    _rule: PhantomData<fn(&R)>,
}

impl<R, F> ErasedRuleFunction for TypedRule<R, F>
where
    R: Rule,
    F: Fn(&R, &mut PolicyContext<'_>) -> bool + Send + Sync,
{
    fn evaluate(&self, rule: RuleRef<'_>, context: &mut PolicyContext<'_>) -> bool {
        match R::from_rule_ref(rule) {
            Some(rule) => (self.function)(rule, context),
            None => false,
        }
    }
}

/// The function resolved for an atomic constraint.
pub(crate) enum Dispatch<'r> {
    /// Registered for the exact (rule type, left-operand key) pair.
    Exact(&'r dyn ErasedAtomicFunction),

    /// Registered for the rule type only.
    Dynamic(&'r dyn ErasedDynamicFunction),
}

/// Functions registered with a policy engine.
#[derive(Default)]
pub(crate) struct FunctionRegistry {
    atomic: HashMap<(RuleType, String), Arc<dyn ErasedAtomicFunction>>,
    dynamic: HashMap<RuleType, Vec<Arc<dyn ErasedDynamicFunction>>>,
    rule: HashMap<RuleType, Vec<Arc<dyn ErasedRuleFunction>>>,
}

impl FunctionRegistry {
    pub(crate) fn register_atomic<R, F>(&mut self, key: String, function: F)
    where
        R: Rule,
        F: Fn(Operator, &Literal, &R, &mut PolicyContext<'_>) -> bool + Send + Sync + 'static,
    {
        let erased = TypedAtomic {
            function,
            _rule: PhantomData::<fn(&R)>,
        };
        self.atomic.insert((R::RULE_TYPE, key), Arc::new(erased));
    }

    pub(crate) fn register_dynamic<R, D>(&mut self, function: D)
    where
        R: Rule,
        D: DynamicAtomicConstraintFunction<R> + 'static,
    {
        let erased = TypedDynamic {
            function,
            _rule: PhantomData::<fn(&R)>,
        };
        self.dynamic
            .entry(R::RULE_TYPE)
            .or_default()
            .push(Arc::new(erased));
    }

    pub(crate) fn register_rule<R, F>(&mut self, function: F)
    where
        R: Rule,
        F: Fn(&R, &mut PolicyContext<'_>) -> bool + Send + Sync + 'static,
    {
        let erased = TypedRule {
            function,
            _rule: PhantomData::<fn(&R)>,
        };
        self.rule.entry(R::RULE_TYPE).or_default().push(Arc::new(erased));
    }

    /// Resolve the function for an atomic constraint: exact key first, then
    /// the first dynamic function for the rule type that can handle the
    /// left operand.
    pub(crate) fn resolve(
        &self,
        rule_type: RuleType,
        key: &str,
        left_value: &Literal,
    ) -> Option<Dispatch<'_>> {
        if let Some(function) = self.atomic.get(&(rule_type, key.to_string())) {
            return Some(Dispatch::Exact(function.as_ref()));
        }

        self.dynamic
            .get(&rule_type)
            .and_then(|functions| {
                functions
                    .iter()
                    .find(|function| function.can_handle(left_value))
            })
            .map(|function| Dispatch::Dynamic(function.as_ref()))
    }

    pub(crate) fn rule_functions(&self, rule_type: RuleType) -> &[Arc<dyn ErasedRuleFunction>] {
        self.rule
            .get(&rule_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ParticipantAgent, Permission, Prohibition};

    struct RegionPrefix;

    impl DynamicAtomicConstraintFunction<Permission> for RegionPrefix {
        fn evaluate(
            &self,
            _left_value: &Literal,
            _operator: Operator,
            _right_value: &Literal,
            _rule: &Permission,
            _context: &mut PolicyContext<'_>,
        ) -> bool {
            true
        }

        fn can_handle(&self, left_value: &Literal) -> bool {
            left_value
                .as_str()
                .map(|key| key.starts_with("region:"))
                .unwrap_or(false)
        }
    }

    fn never(
        _: &Literal,
        _: Operator,
        _: &Literal,
        _: &Permission,
        _: &mut PolicyContext<'_>,
    ) -> bool {
        false
    }

    #[test]
    fn test_exact_before_dynamic() {
        let mut registry = FunctionRegistry::default();
        registry.register_dynamic::<Permission, _>(DynamicFn(never));
        registry.register_atomic::<Permission, _>(
            "region".to_string(),
            |_: Operator, _: &Literal, _: &Permission, _: &mut PolicyContext<'_>| true,
        );

        let left = Literal::from("region");
        assert!(matches!(
            registry.resolve(RuleType::Permission, "region", &left),
            Some(Dispatch::Exact(_))
        ));

        let other = Literal::from("purpose");
        assert!(matches!(
            registry.resolve(RuleType::Permission, "purpose", &other),
            Some(Dispatch::Dynamic(_))
        ));
        assert!(registry
            .resolve(RuleType::Prohibition, "region", &left)
            .is_none());
    }

    #[test]
    fn test_dynamic_can_handle() {
        let mut registry = FunctionRegistry::default();
        registry.register_dynamic::<Permission, _>(RegionPrefix);

        let handled = Literal::from("region:eu");
        let unhandled = Literal::from("purpose");
        assert!(registry
            .resolve(RuleType::Permission, "region:eu", &handled)
            .is_some());
        assert!(registry
            .resolve(RuleType::Permission, "purpose", &unhandled)
            .is_none());
    }

    #[test]
    fn test_typed_function_ignores_other_rule_kinds() {
        let mut registry = FunctionRegistry::default();
        registry.register_rule::<Permission, _>(|_: &Permission, _: &mut PolicyContext<'_>| true);

        let agent = ParticipantAgent::default();
        let mut context = PolicyContext::new(&agent);
        let prohibition = Prohibition::new("use");
        let permission = Permission::new("use");

        let functions = registry.rule_functions(RuleType::Permission);
        assert_eq!(functions.len(), 1);
        assert!(functions[0].evaluate(permission.as_rule_ref(), &mut context));
        assert!(!functions[0].evaluate(prohibition.as_rule_ref(), &mut context));
        assert!(registry.rule_functions(RuleType::Duty).is_empty());
    }
}
