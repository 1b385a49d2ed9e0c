use tracing::trace;

use crate::binding::RuleBindingRegistry;
use crate::model::{Constraint, Duty, Permission, Policy, Prohibition};

/// Produces copies of policy nodes restricted to a scope.
///
/// Rules are kept only if their action type is in scope; atomic
/// constraints only if the string form of their left operand is. The
/// input is never modified.
#[derive(Debug, Clone)]
pub struct ScopeFilter<R> {
    /// The registry deciding what is in scope.
    registry: R,
}

impl<R> ScopeFilter<R>
where
    R: RuleBindingRegistry,
{
    /// Create a new scope filter.
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    /// The registry this filter consults.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Filter any filterable node.
    ///
    /// # Returns
    ///
    /// * `Some(node)` - A filtered copy of the node.
    /// * `None` - If the node itself is not in scope.
    pub fn apply_scope<N: ScopeFilterable>(&self, node: &N, scope: &str) -> Option<N> {
        node.filter_scope(self, scope)
    }

    /// Filter a policy. A policy is always returned, possibly without rules.
    pub fn apply_policy_scope(&self, policy: &Policy, scope: &str) -> Policy {
        self.filter_policy(policy, scope)
    }

    /// Filter every rule list of a policy; the policy's own fields are copied.
    pub(crate) fn filter_policy(&self, policy: &Policy, scope: &str) -> Policy {
        Policy {
            uid: policy.uid,
            policy_type: policy.policy_type,
            permissions: policy
                .permissions
                .iter()
                .filter_map(|permission| self.filter_permission(permission, scope))
                .collect(),
            prohibitions: policy
                .prohibitions
                .iter()
                .filter_map(|prohibition| self.filter_prohibition(prohibition, scope))
                .collect(),
            obligations: policy
                .obligations
                .iter()
                .filter_map(|duty| self.filter_duty(duty, scope))
                .collect(),
            assigner: policy.assigner.clone(),
            assignee: policy.assignee.clone(),
            target: policy.target.clone(),
            inherits_from: policy.inherits_from.clone(),
            profiles: policy.profiles.clone(),
            extensible_properties: policy.extensible_properties.clone(),
        }
    }

    /// Filter a permission and its attached duties.
    pub(crate) fn filter_permission(
        &self,
        permission: &Permission,
        scope: &str,
    ) -> Option<Permission> {
        // The action type gates the whole rule
        if !self.action_in_scope(&permission.action.action_type, scope) {
            trace!("Pruning permission {} from scope '{}'", permission.uid, scope);
            return None;
        }

        Some(Permission {
            uid: permission.uid,
            action: permission.action.clone(),
            // A rule whose constraints are all pruned is still kept
            constraints: self.filter_constraints(&permission.constraints, scope),
            assigner: permission.assigner.clone(),
            assignee: permission.assignee.clone(),
            target: permission.target.clone(),
            duties: permission
                .duties
                .iter()
                .filter_map(|duty| self.filter_duty(duty, scope))
                .collect(),
        })
    }

    /// Filter a prohibition.
    pub(crate) fn filter_prohibition(
        &self,
        prohibition: &Prohibition,
        scope: &str,
    ) -> Option<Prohibition> {
        if !self.action_in_scope(&prohibition.action.action_type, scope) {
            trace!("Pruning prohibition {} from scope '{}'", prohibition.uid, scope);
            return None;
        }

        Some(Prohibition {
            uid: prohibition.uid,
            action: prohibition.action.clone(),
            constraints: self.filter_constraints(&prohibition.constraints, scope),
            assigner: prohibition.assigner.clone(),
            assignee: prohibition.assignee.clone(),
            target: prohibition.target.clone(),
        })
    }

    /// Filter a duty and its consequences.
    pub(crate) fn filter_duty(&self, duty: &Duty, scope: &str) -> Option<Duty> {
        if !self.action_in_scope(&duty.action.action_type, scope) {
            trace!("Pruning duty {} from scope '{}'", duty.uid, scope);
            return None;
        }

        Some(Duty {
            uid: duty.uid,
            action: duty.action.clone(),
            constraints: self.filter_constraints(&duty.constraints, scope),
            assigner: duty.assigner.clone(),
            assignee: duty.assignee.clone(),
            target: duty.target.clone(),
            consequences: duty
                .consequences
                .iter()
                .filter_map(|consequence| self.filter_duty(consequence, scope))
                .collect(),
        })
    }

    /// Filter a constraint. Composite constraints are always kept, even
    /// when every child is pruned.
    pub(crate) fn filter_constraint(
        &self,
        constraint: &Constraint,
        scope: &str,
    ) -> Option<Constraint> {
        match constraint {
            Constraint::Atomic(atomic) => {
                let key = atomic.left_key();
                if self.registry.is_in_scope(&key, scope) {
                    Some(constraint.clone())
                } else {
                    trace!("Pruning constraint {} from scope '{}'", atomic, scope);
                    None
                }
            }
            // Composites survive even with no children left
            Constraint::And(children) | Constraint::Or(children) | Constraint::Xone(children) => {
                Some(constraint.with_children(self.filter_constraints(children, scope)))
            }
        }
    }

    fn filter_constraints(&self, constraints: &[Constraint], scope: &str) -> Vec<Constraint> {
        constraints
            .iter()
            .filter_map(|constraint| self.filter_constraint(constraint, scope))
            .collect()
    }

    fn action_in_scope(&self, action_type: &str, scope: &str) -> bool {
        self.registry.is_in_scope(action_type, scope)
    }
}

/// A policy node the scope filter can restrict.
pub trait ScopeFilterable: Sized {
    /// Produce a copy of this node restricted to `scope`, or `None` if the
    /// node itself is out of scope.
    fn filter_scope<R: RuleBindingRegistry>(
        &self,
        filter: &ScopeFilter<R>,
        scope: &str,
    ) -> Option<Self>;
}

impl ScopeFilterable for Policy {
    fn filter_scope<R: RuleBindingRegistry>(
        &self,
        filter: &ScopeFilter<R>,
        scope: &str,
    ) -> Option<Self> {
        Some(filter.filter_policy(self, scope))
    }
}

impl ScopeFilterable for Permission {
    fn filter_scope<R: RuleBindingRegistry>(
        &self,
        filter: &ScopeFilter<R>,
        scope: &str,
    ) -> Option<Self> {
        filter.filter_permission(self, scope)
    }
}

impl ScopeFilterable for Prohibition {
    fn filter_scope<R: RuleBindingRegistry>(
        &self,
        filter: &ScopeFilter<R>,
        scope: &str,
    ) -> Option<Self> {
        filter.filter_prohibition(self, scope)
    }
}

impl ScopeFilterable for Duty {
    fn filter_scope<R: RuleBindingRegistry>(
        &self,
        filter: &ScopeFilter<R>,
        scope: &str,
    ) -> Option<Self> {
        filter.filter_duty(self, scope)
    }
}

impl ScopeFilterable for Constraint {
    fn filter_scope<R: RuleBindingRegistry>(
        &self,
        filter: &ScopeFilter<R>,
        scope: &str,
    ) -> Option<Self> {
        filter.filter_constraint(self, scope)
    }
}
