use assetdedupe::duplicates::DuplicateIndex;
use assetdedupe::progress::NoProgress;
use assetdedupe::scanner::{AssetRules, Hasher, ScanError, ScanFilter, Walker, WalkerConfig};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

fn media_walker(root: &Path) -> Walker {
    Walker::new(root, WalkerConfig::new(ScanFilter::Media, AssetRules::default()))
}

fn index(root: &Path) -> DuplicateIndex {
    let walker = media_walker(root);
    DuplicateIndex::build(walker.walk().unwrap(), &Hasher::new(), &NoProgress)
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();

    let index = index(dir.path());

    assert!(!index.has_duplicates());
    assert_eq!(index.files_indexed(), 0);
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    File::create(dir.path().join("a.jpg"))
        .unwrap()
        .write_all(b"content a")
        .unwrap();
    File::create(dir.path().join("b.jpg"))
        .unwrap()
        .write_all(b"content b")
        .unwrap();

    let index = index(dir.path());

    assert!(!index.has_duplicates());
    assert_eq!(index.distinct_count(), 2);
}

#[test]
fn test_scan_nested_duplicates_in_traversal_order() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("b/deep")).unwrap();
    fs::create_dir_all(dir.path().join("a")).unwrap();
    for rel in ["b/deep/x.png", "a/x.png", "c.png"] {
        File::create(dir.path().join(rel))
            .unwrap()
            .write_all(b"duplicate")
            .unwrap();
    }

    let index = index(dir.path());
    let pairs = index.pairs();

    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0].canonical, dir.path().join("a/x.png"));
    assert_eq!(pairs[0].duplicate, dir.path().join("b/deep/x.png"));
    assert_eq!(pairs[1].duplicate, dir.path().join("c.png"));
}

#[test]
fn test_index_is_deterministic_across_builds() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("z/inner")).unwrap();
    fs::create_dir_all(dir.path().join("m")).unwrap();
    for (rel, content) in [
        ("z/inner/a.jpg", &b"one"[..]),
        ("m/b.jpg", b"one"),
        ("m/c.png", b"two"),
        ("d.png", b"two"),
        ("z/e.webp", b"one"),
        ("f.gif", b"three"),
    ] {
        File::create(dir.path().join(rel))
            .unwrap()
            .write_all(content)
            .unwrap();
    }

    let first = index(dir.path());
    let second = index(dir.path());

    assert_eq!(first.pairs().len(), 3);
    assert_eq!(first.pairs(), second.pairs());
    assert_eq!(first.distinct_count(), second.distinct_count());
}

#[test]
fn test_empty_media_files_are_duplicates() {
    let dir = tempdir().unwrap();
    File::create(dir.path().join("a.gif")).unwrap();
    File::create(dir.path().join("b.gif")).unwrap();

    let index = index(dir.path());

    assert_eq!(index.pairs().len(), 1);
}

#[test]
fn test_walk_missing_root() {
    let dir = tempdir().unwrap();
    let walker = media_walker(&dir.path().join("missing"));

    assert!(matches!(walker.walk().err(), Some(ScanError::NotFound(_))));
}

#[test]
fn test_walk_file_root() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("a.jpg");
    File::create(&file).unwrap();

    assert!(matches!(
        media_walker(&file).walk().err(),
        Some(ScanError::NotADirectory(_))
    ));
}

#[cfg(unix)]
#[test]
fn test_symlinks_not_followed() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("a.jpg");
    File::create(&target).unwrap().write_all(b"img").unwrap();
    std::os::unix::fs::symlink(&target, dir.path().join("b.jpg")).unwrap();

    let index = index(dir.path());

    assert_eq!(index.files_indexed(), 1);
    assert!(!index.has_duplicates());
}

#[test]
fn test_rename_candidate_filter_on_disk() {
    let dir = tempdir().unwrap();
    for name in ["cat_ssl=1.jpg", "notes.txt", "photo.jpg.tmp", "README"] {
        File::create(dir.path().join(name)).unwrap();
    }

    let walker = Walker::new(
        dir.path(),
        WalkerConfig::new(ScanFilter::RenameCandidates, AssetRules::default()),
    );
    let names: Vec<String> = walker
        .walk()
        .unwrap()
        .filter_map(Result::ok)
        .map(|r| r.file_name())
        .collect();

    assert_eq!(names, vec!["cat_ssl=1.jpg", "photo.jpg.tmp"]);
}
