use assetdedupe::actions::{DeletionGate, SafeZone, DEFAULT_SAFE_ZONES};
use assetdedupe::pipeline::{
    Action, Orchestrator, PipelineError, PipelineOptions, RunSummary, Scope,
};
use assetdedupe::rename::{ConflictDecision, ConflictPolicy, ResolveError, ScriptedDecision};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write(root: &Path, rel: &str, content: &[u8]) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    File::create(&path).unwrap().write_all(content).unwrap();
    path
}

fn run(options: PipelineOptions) -> RunSummary {
    Orchestrator::new(options)
        .run(&mut ScriptedDecision::default())
        .unwrap()
}

fn remove(root: &Path) -> PipelineOptions {
    PipelineOptions::new(root).with_action(Some(Action::Remove))
}

#[test]
fn test_later_copy_is_deleted() {
    let dir = tempdir().unwrap();
    let first = write(dir.path(), "dir1/x.jpg", b"pixels");
    let second = write(dir.path(), "dir2/x.jpg", b"pixels");

    let summary = run(remove(dir.path()));

    assert!(first.exists());
    assert!(!second.exists());
    assert_eq!(summary.passes[0].pairs[0].canonical, first);
    assert_eq!(summary.passes[0].pairs[0].duplicate, second);
    assert_eq!(summary.counters.deleted_count, 1);
}

#[test]
fn test_three_copies_keep_first() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "a/x.png", b"same");
    let b = write(dir.path(), "b/x.png", b"same");
    let c = write(dir.path(), "c/x.png", b"same");
    write(dir.path(), "c/y.png", b"other");

    let summary = run(remove(dir.path()));

    assert!(a.exists());
    assert!(!b.exists());
    assert!(!c.exists());
    assert_eq!(summary.passes.len(), 1);
    assert_eq!(summary.passes[0].deleted, 2);
    assert_eq!(summary.counters.initial_count, 4);
    assert_eq!(summary.counters.deleted_count, 2);
    assert_eq!(summary.counters.remaining_count, 2);
}

#[test]
fn test_list_mode_changes_nothing() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "a.jpg", b"same");
    let b = write(dir.path(), "b.jpg", b"same");

    let summary = run(PipelineOptions::new(dir.path()).with_action(Some(Action::List)));

    assert!(a.exists() && b.exists());
    assert_eq!(summary.all_pairs().count(), 1);
    assert_eq!(summary.counters.deleted_count, 0);
    assert_eq!(summary.counters.remaining_count, summary.counters.initial_count);
}

#[test]
fn test_non_media_and_hidden_files_ignored() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"same");
    write(dir.path(), "b.txt", b"same");
    write(dir.path(), ".thumb.jpg", b"img");
    let visible = write(dir.path(), "thumb.jpg", b"img");

    let summary = run(remove(dir.path()));

    assert!(!summary.duplicates_found());
    assert!(visible.exists());
    assert_eq!(summary.counters.remaining_count, 4);
}

#[test]
fn test_gate_skips_outside_and_deletes_inside() {
    let dir = tempdir().unwrap();
    // canonical outside the zone, duplicate inside
    let theme = write(dir.path(), "a-theme/logo.png", b"logo");
    let inside = write(dir.path(), "images/logo.png", b"logo");
    // canonical inside the zone, duplicate outside
    let kept = write(dir.path(), "images/x.png", b"x");
    let outside = write(dir.path(), "wp-admin/x.png", b"x");

    let zone = SafeZone::under_root(dir.path(), DEFAULT_SAFE_ZONES);
    let summary = run(remove(dir.path()).with_gate(DeletionGate::Gated(zone)));

    assert!(theme.exists());
    assert!(!inside.exists());
    assert!(kept.exists());
    assert!(outside.exists());
    assert_eq!(summary.skipped, vec![outside]);
    assert_eq!(summary.counters.deleted_count, 1);
    // second pass only finds the gated pair and stops
    assert_eq!(summary.passes.len(), 2);
    assert_eq!(summary.passes[1].deleted, 0);
}

#[test]
fn test_uploads_scope_leaves_rest_alone() {
    let dir = tempdir().unwrap();
    let outside_a = write(dir.path(), "theme/a.jpg", b"same");
    let outside_b = write(dir.path(), "theme/b.jpg", b"same");
    write(dir.path(), "wp-content/uploads/2020/a.jpg", b"same");
    let upload_dup = write(dir.path(), "wp-content/uploads/2021/a.jpg", b"same");

    let summary = run(remove(dir.path()).with_scope(Scope::Uploads));

    assert!(outside_a.exists() && outside_b.exists());
    assert!(!upload_dup.exists());
    assert_eq!(summary.counters.initial_count, 2);
    assert_eq!(summary.analysis_dir, dir.path().join("wp-content/uploads"));
}

#[test]
fn test_missing_uploads_dir_is_fatal() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.jpg", b"x");

    let result = Orchestrator::new(remove(dir.path()).with_scope(Scope::Uploads))
        .run(&mut ScriptedDecision::default());

    assert!(matches!(result, Err(PipelineError::Scan(_))));
}

#[test]
fn test_clean_renames_then_dedupes() {
    let dir = tempdir().unwrap();
    write(dir.path(), "cat_ssl=1.jpg", b"cat");
    write(dir.path(), "photo.png.webp", b"photo");
    write(dir.path(), "copy/photo.webp", b"photo");

    let summary = run(remove(dir.path()).with_rename(Some(ConflictPolicy::DeleteLosingFile)));

    assert!(dir.path().join("cat.jpg").exists());
    assert!(!dir.path().join("cat_ssl=1.jpg").exists());
    assert!(dir.path().join("copy/photo.webp").exists());
    assert!(!dir.path().join("photo.webp").exists());
    assert_eq!(summary.counters.renamed_count, 2);
    assert_eq!(summary.counters.deleted_count, 1);
    assert_eq!(summary.counters.remaining_count, 2);
}

#[test]
fn test_rename_conflict_delete_losing_file() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.jpg_ssl=1", b"first");
    write(dir.path(), "a_ssl=1.jpg", b"second");

    let summary = run(PipelineOptions::new(dir.path())
        .with_action(None)
        .with_rename(Some(ConflictPolicy::DeleteLosingFile)));

    assert_eq!(fs::read(dir.path().join("a.jpg")).unwrap(), b"first");
    assert!(!dir.path().join("a_ssl=1.jpg").exists());
    assert_eq!(summary.counters.renamed_count, 1);
    assert_eq!(summary.renames.len(), 2);
}

#[test]
fn test_rename_conflict_overwrite() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.jpg_ssl=1", b"first");
    write(dir.path(), "a_ssl=1.jpg", b"second");

    let summary = run(PipelineOptions::new(dir.path())
        .with_action(None)
        .with_rename(Some(ConflictPolicy::Overwrite)));

    assert_eq!(fs::read(dir.path().join("a.jpg")).unwrap(), b"second");
    assert_eq!(summary.counters.renamed_count, 2);
    assert_eq!(summary.counters.remaining_count, 1);
}

#[test]
fn test_ask_each_time_uses_decisions() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.jpg", b"old");
    write(dir.path(), "a_ssl=1.jpg", b"new");

    let mut decisions = ScriptedDecision::new([ConflictDecision::Overwrite]);
    let summary = Orchestrator::new(
        PipelineOptions::new(dir.path())
            .with_action(None)
            .with_rename(Some(ConflictPolicy::AskEachTime)),
    )
    .run(&mut decisions)
    .unwrap();

    assert_eq!(fs::read(dir.path().join("a.jpg")).unwrap(), b"new");
    assert_eq!(summary.counters.renamed_count, 1);
}

#[test]
fn test_unanswered_conflict_aborts_run() {
    let dir = tempdir().unwrap();
    let existing = write(dir.path(), "a.jpg", b"old");
    let candidate = write(dir.path(), "a_ssl=1.jpg", b"new");

    let result = Orchestrator::new(
        remove(dir.path()).with_rename(Some(ConflictPolicy::AskEachTime)),
    )
    .run(&mut ScriptedDecision::exhausting([]));

    assert!(matches!(
        result,
        Err(PipelineError::Resolve(ResolveError::ConflictUnresolved { .. }))
    ));
    assert!(existing.exists());
    assert!(candidate.exists());
}

#[test]
fn test_unnormalizable_names_are_reported() {
    let dir = tempdir().unwrap();
    let notes = write(dir.path(), "notes_ssl=1.txt", b"text");

    let summary = run(PipelineOptions::new(dir.path())
        .with_action(None)
        .with_rename(Some(ConflictPolicy::Overwrite)));

    assert!(notes.exists());
    assert_eq!(summary.unnormalizable, vec![notes]);
    assert!(!summary.has_failures());
    assert_eq!(summary.counters.renamed_count, 0);
}

#[test]
fn test_rename_only_has_no_passes() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.jpg", b"same");
    write(dir.path(), "b.jpg", b"same");

    let summary = run(PipelineOptions::new(dir.path())
        .with_action(None)
        .with_rename(Some(ConflictPolicy::Overwrite)));

    assert!(summary.passes.is_empty());
    assert_eq!(summary.counters.remaining_count, 2);
}

#[cfg(unix)]
#[test]
fn test_non_utf8_names_are_left_alone() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempdir().unwrap();
    let grave = dir.path().join(OsStr::from_bytes(b"caf\xE8.jpg"));
    let acute = dir.path().join(OsStr::from_bytes(b"caf\xE9.jpg"));
    fs::write(&grave, b"BBB").unwrap();
    fs::write(&acute, b"AAA").unwrap();
    let marked = write(dir.path(), "dog_ssl=1.jpg", b"woof");

    let summary = run(PipelineOptions::new(dir.path())
        .with_action(None)
        .with_rename(Some(ConflictPolicy::DeleteLosingFile)));

    assert_eq!(fs::read(&grave).unwrap(), b"BBB");
    assert_eq!(fs::read(&acute).unwrap(), b"AAA");
    assert!(!marked.exists());
    assert!(dir.path().join("dog.jpg").exists());
    assert_eq!(summary.unnormalizable, vec![grave, acute]);
    assert_eq!(summary.renames.len(), 1);
    assert_eq!(summary.counters.renamed_count, 1);
    assert_eq!(summary.counters.remaining_count, 3);
}

#[test]
fn test_second_remove_run_finds_nothing() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/x.jpg", b"same");
    write(dir.path(), "b/x.jpg", b"same");
    write(dir.path(), "b/y.png", b"same");
    write(dir.path(), "c/z.gif", b"unique");

    let first = run(remove(dir.path()));
    assert!(first.duplicates_found());
    assert_eq!(first.counters.deleted_count, 2);

    let second = run(remove(dir.path()));

    assert!(!second.duplicates_found());
    assert_eq!(second.counters.deleted_count, 0);
    assert_eq!(second.counters.initial_count, 2);
    assert_eq!(second.counters.remaining_count, 2);
}
