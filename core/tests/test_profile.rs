//! Tests for the profile model and its collection

use std::sync::Arc;

use nbody_studio_core::{Agent, ModelError, Profile, ProfileSet};

#[test]
fn test_with_new_agent_derives_sequential_ids() {
    let profile = Profile::empty();
    let (profile, first) = profile.with_new_agent();
    let (profile, second) = profile.with_new_agent();

    assert_eq!(first, "Body1");
    assert_eq!(second, "Body2");
    assert_eq!(
        profile.agent_ids().collect::<Vec<_>>(),
        vec!["Body1", "Body2"]
    );
}

#[test]
fn test_with_new_agent_disambiguates_taken_ids() {
    // A single agent the user already named "Body2": the derived id
    // "Body2" is taken, so the counter bumps to the next free name.
    let profile = Profile {
        agents: vec![Agent::new("Body2")],
    };
    let (profile, id) = profile.with_new_agent();

    assert_eq!(id, "Body3");
    assert_eq!(profile.agents.len(), 2);
}

#[test]
fn test_with_new_agent_is_pure() {
    let original = Profile::empty();
    let (updated, _) = original.with_new_agent();

    assert_eq!(original.agents.len(), 0);
    assert_eq!(updated.agents.len(), 1);
}

#[test]
fn test_with_agent_replaced_by_position() {
    let profile = Profile {
        agents: vec![Agent::new("Body1"), Agent::new("Body2")],
    };
    let updated = profile
        .with_agent_replaced(1, Agent::new("Moon"))
        .expect("index in range");

    assert_eq!(
        updated.agent_ids().collect::<Vec<_>>(),
        vec!["Body1", "Moon"]
    );
    // Input untouched
    assert_eq!(profile.agents[1].id, "Body2");
}

#[test]
fn test_with_agent_replaced_out_of_range() {
    let profile = Profile::empty();
    assert_eq!(
        profile.with_agent_replaced(0, Agent::new("X")),
        Err(ModelError::AgentIndexOutOfRange { index: 0, len: 0 })
    );
}

#[test]
fn test_rename_moves_key_and_keeps_contents() {
    let (profile, _) = Profile::empty().with_new_agent();
    let set = ProfileSet::new().with_profile("Profile 1", profile.clone());

    let renamed = set.renamed("Profile 1", "Alpha");

    assert!(!renamed.contains("Profile 1"));
    let moved = renamed.get("Alpha").expect("moved profile");
    assert_eq!(Profile::clone(moved), profile);
    assert_eq!(renamed.len(), 1);
}

#[test]
fn test_rename_overwrites_existing_target() {
    let (one_agent, _) = Profile::empty().with_new_agent();
    let set = ProfileSet::new()
        .with_profile("A", one_agent)
        .with_profile("B", Profile::empty());

    // Last write wins: B's previous value is silently replaced
    let renamed = set.renamed("A", "B");

    assert_eq!(renamed.len(), 1);
    assert_eq!(renamed.get("B").expect("B").agents.len(), 1);
}

#[test]
fn test_rename_missing_source_is_noop() {
    let set = ProfileSet::new().with_profile("A", Profile::empty());
    let renamed = set.renamed("ghost", "B");

    assert!(renamed.contains("A"));
    assert!(!renamed.contains("B"));
}

#[test]
fn test_untouched_profiles_keep_pointer_identity() {
    let set = ProfileSet::new()
        .with_profile("A", Profile::empty())
        .with_profile("B", Profile::empty());
    let before = Arc::clone(set.get("A").expect("A"));

    let updated = set.with_profile("B", Profile::empty().with_new_agent().0);

    assert!(Arc::ptr_eq(&before, updated.get("A").expect("A")));
}
