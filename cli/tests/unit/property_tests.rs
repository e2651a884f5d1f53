//! Property-based tests for ownership wrapping and rendering invariants.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used)]

use proptest::prelude::*;

use taskspec_cli::domain::archive::{Archive, ArchiveItem, ItemKind};
use taskspec_cli::domain::credentials::is_credential_path;
use taskspec_cli::domain::{AgentUserGroup, CONTAINER_WORK_DIR};

use crate::helpers::{keys, train_command};

fn arb_item() -> impl Strategy<Value = ArchiveItem> {
    (
        "[a-z]{1,8}(/[a-z]{1,8}){0,3}",
        proptest::collection::vec(any::<u8>(), 0..64),
        prop_oneof![Just(0o644u32), Just(0o755u32), Just(0o600u32)],
        any::<bool>(),
        any::<u32>(),
        any::<u32>(),
    )
        .prop_map(|(path, content, mode, is_dir, uid, gid)| {
            let kind = if is_dir { ItemKind::Directory } else { ItemKind::RegularFile };
            let content = if is_dir { Vec::new() } else { content };
            ArchiveItem { path, content, mode, kind, uid, gid }
        })
}

fn arb_archive() -> impl Strategy<Value = Archive> {
    proptest::collection::vec(arb_item(), 0..16).prop_map(Archive::from)
}

fn arb_owner() -> impl Strategy<Value = AgentUserGroup> {
    ("[a-z]{1,8}", any::<u32>(), "[a-z]{1,8}", any::<u32>())
        .prop_map(|(user, uid, group, gid)| AgentUserGroup { user, uid, group, gid })
}

// ============================================================================
// own_archive() property tests
// ============================================================================

proptest! {
    /// Wrapping twice with the same owner equals wrapping once.
    #[test]
    fn prop_own_archive_is_idempotent(archive in arb_archive(), owner in arb_owner()) {
        let once = owner.own_archive(&archive);
        let twice = owner.own_archive(&once);
        prop_assert_eq!(once, twice);
    }

    /// Only uid/gid change; order, paths, contents, modes and kinds are kept.
    #[test]
    fn prop_own_archive_only_touches_ownership(archive in arb_archive(), owner in arb_owner()) {
        let owned = owner.own_archive(&archive);
        prop_assert_eq!(owned.len(), archive.len());
        for (before, after) in archive.iter().zip(owned.iter()) {
            prop_assert_eq!(&after.path, &before.path);
            prop_assert_eq!(&after.content, &before.content);
            prop_assert_eq!(after.mode, before.mode);
            prop_assert_eq!(after.kind, before.kind);
            prop_assert_eq!(after.uid, owner.uid);
            prop_assert_eq!(after.gid, owner.gid);
        }
    }
}

// ============================================================================
// to_task_spec() property tests
// ============================================================================

proptest! {
    /// Arbitrary user files stay under the working directory, carry the
    /// agent's ownership, and never bring credential entries along.
    #[test]
    fn prop_user_files_are_anchored_and_owned(user_files in arb_archive(), owner in arb_owner()) {
        let mut spec = train_command();
        spec.base.agent_user_group = owner.clone();
        spec.user_files = user_files.clone();

        let task = spec.to_task_spec(None, "tok").expect("render");
        let user = &task.archives[0];
        prop_assert_eq!(&user.path, CONTAINER_WORK_DIR);
        prop_assert_eq!(user.archive.len(), user_files.len());
        prop_assert!(owner.owns(&user.archive));
        for run in &task.archives {
            prop_assert!(run.archive.iter().all(|i| !is_credential_path(&i.path)));
        }
    }

    /// Keys always add exactly five entries to the platform fragment and
    /// leave the user fragment alone.
    #[test]
    fn prop_keys_add_five_entries(user_files in arb_archive(), extra in arb_archive()) {
        let mut spec = train_command();
        spec.user_files = user_files;
        spec.additional_files = extra.clone();

        let plain = spec.to_task_spec(None, "tok").expect("render");
        let keyed = spec.to_task_spec(Some(&keys()), "tok").expect("render");
        prop_assert_eq!(&keyed.archives[0], &plain.archives[0]);
        prop_assert_eq!(keyed.archives[1].archive.len(), extra.len() + 5);
    }

    /// Same inputs, same output.
    #[test]
    fn prop_render_is_deterministic(
        entrypoint in proptest::collection::vec("[a-z./-]{1,12}", 0..5),
        token in "[A-Za-z0-9]{0,32}",
        with_keys in any::<bool>(),
    ) {
        let mut spec = train_command();
        spec.config.entrypoint = entrypoint.clone();
        let k = keys();
        let keys = with_keys.then_some(&k);

        let a = spec.to_task_spec(keys, &token).expect("render");
        let b = spec.to_task_spec(keys, &token).expect("render");
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(&a.entrypoint, &entrypoint);
        prop_assert_eq!(&a.task_token, &token);
    }
}

// ============================================================================
// Path containment
// ============================================================================

fn arb_dotted_path() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![Just("..".to_string()), Just(".".to_string()), "[a-z]{1,4}"],
        1..8,
    )
    .prop_map(|segments| segments.join("/"))
}

proptest! {
    /// `.` and `..` segments in user files never lead out of the working
    /// directory.
    #[test]
    fn prop_user_files_never_escape_workdir(paths in proptest::collection::vec(arb_dotted_path(), 1..8)) {
        let mut spec = train_command();
        spec.user_files = paths.iter().map(|p| ArchiveItem::file(p.as_str(), "x")).collect();

        let task = spec.to_task_spec(None, "tok").expect("render");
        for resolved in task.archives[0].resolved_paths() {
            prop_assert!(resolved.starts_with(CONTAINER_WORK_DIR), "{}", resolved);
            prop_assert!(resolved.split('/').all(|s| s != ".." && s != "."), "{}", resolved);
        }
    }
}
