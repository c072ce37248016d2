use assetdedupe::actions::{can_delete, DeletionGate, SafeZone, DEFAULT_SAFE_ZONES};
use assetdedupe::pipeline::{Action, Orchestrator, PipelineOptions};
use assetdedupe::rename::ScriptedDecision;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

#[test]
fn test_default_zone_under_real_root() {
    let dir = tempdir().unwrap();
    let zone = SafeZone::under_root(dir.path(), DEFAULT_SAFE_ZONES);

    assert!(can_delete(&dir.path().join("wp-content/uploads/a.jpg"), &zone));
    assert!(can_delete(&dir.path().join("uploads/a.jpg"), &zone));
    assert!(can_delete(&dir.path().join("images/nested/a.jpg"), &zone));
    assert!(!can_delete(&dir.path().join("wp-content/a.jpg"), &zone));
    assert!(!can_delete(&dir.path().join("imagesbackup/a.jpg"), &zone));
}

#[test]
fn test_gate_is_only_consulted_for_duplicates() {
    let dir = tempdir().unwrap();
    for rel in ["admin/a.png", "admin/b.png"] {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        File::create(&path).unwrap().write_all(b"same").unwrap();
    }

    let options = PipelineOptions::new(dir.path())
        .with_action(Some(Action::Remove))
        .with_gate(DeletionGate::Gated(SafeZone::under_root(
            dir.path(),
            DEFAULT_SAFE_ZONES,
        )));
    let summary = Orchestrator::new(options)
        .run(&mut ScriptedDecision::default())
        .unwrap();

    assert!(dir.path().join("admin/a.png").exists());
    assert!(dir.path().join("admin/b.png").exists());
    assert_eq!(summary.skipped, vec![dir.path().join("admin/b.png")]);
    assert!(summary.duplicates_found());
    assert_eq!(summary.counters.deleted_count, 0);
}

#[test]
fn test_custom_zone_prefix() {
    let zone = SafeZone::under_root(Path::new("/site"), ["media/2020"]);
    let gate = DeletionGate::Gated(zone);

    assert!(gate.can_delete(Path::new("/site/media/2020/01/a.jpg")));
    assert!(!gate.can_delete(Path::new("/site/media/2021/a.jpg")));
}
