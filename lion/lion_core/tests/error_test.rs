use lion_core::error::{BindingError, Error, PolicyError};
use lion_core::id::{PolicyId, RuleId};

fn deny(problems: &[&str]) -> lion_core::Result<()> {
    let problems = problems.iter().map(|p| p.to_string()).collect();
    Err(PolicyError::Denied(problems).into())
}

#[test]
fn test_policy_error_propagates_into_root_error() {
    let error = deny(&["Permission not granted", "Duty not satisfied"]).unwrap_err();
    assert_eq!(
        error.to_string(),
        "Policy error: Policy denied: Permission not granted; Duty not satisfied"
    );

    match error {
        Error::Policy(policy_error) => assert_eq!(policy_error.problems().len(), 2),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_binding_error_display() {
    let error: Error = BindingError::MalformedScope("catalog.".to_string()).into();
    assert_eq!(error.to_string(), "Binding error: Malformed scope: 'catalog.'");
}

#[test]
fn test_ids_are_distinct_types() {
    let policy_id = PolicyId::new();
    let rule_id = RuleId::from_uuid(policy_id.uuid());
    assert_eq!(policy_id.to_string(), rule_id.to_string());
}
