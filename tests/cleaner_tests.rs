// Tests for the cleanup orchestration engine

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use filetime::FileTime;
use tempfile::TempDir;

use dustbuster::preview::{Confirm, TargetPreview};
use dustbuster::{Cleaner, RuntimeOptions};

fn age_entry(path: &Path, age: Duration) {
    let mtime = FileTime::from_system_time(SystemTime::now() - age);
    filetime::set_symlink_file_times(path, mtime, mtime).unwrap();
}

fn target(dir: &TempDir) -> Vec<PathBuf> {
    vec![dir.path().to_path_buf()]
}

const DAY: Duration = Duration::from_secs(86_400);

#[tokio::test]
async fn test_dry_run_reports_without_touching_the_tree() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("one.txt"), b"11111").unwrap();
    fs::write(dir.path().join("two.txt"), b"222").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub").join("three.txt"), b"3").unwrap();

    let mut options = RuntimeOptions::new();
    options.dry_run = true;
    let mut cleaner = Cleaner::new(options);
    let report = cleaner.run_on(target(&dir)).await;

    assert!(report.dry_run);
    assert_eq!(report.totals.files, 3);
    assert_eq!(report.totals.dirs, 1);
    assert_eq!(report.totals.bytes, 9);
    assert_eq!(report.totals.errors, 0);

    // Byte-for-byte unchanged afterwards.
    assert_eq!(fs::read(dir.path().join("one.txt")).unwrap(), b"11111");
    assert_eq!(fs::read(dir.path().join("two.txt")).unwrap(), b"222");
    assert_eq!(
        fs::read(dir.path().join("sub").join("three.txt")).unwrap(),
        b"3"
    );
}

#[tokio::test]
async fn test_real_run_empties_the_target() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("junk.bin"), vec![0u8; 128]).unwrap();
    fs::create_dir_all(dir.path().join("nested").join("deeper")).unwrap();
    fs::write(
        dir.path().join("nested").join("deeper").join("junk2.bin"),
        vec![0u8; 64],
    )
    .unwrap();

    let mut cleaner = Cleaner::new(RuntimeOptions::new());
    let report = cleaner.run_on(target(&dir)).await;

    assert_eq!(report.totals.files, 2);
    assert_eq!(report.totals.dirs, 2);
    assert_eq!(report.totals.bytes, 192);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    assert!(dir.path().exists(), "the target itself survives");
}

#[tokio::test]
async fn test_max_age_keeps_fresh_entries() {
    let dir = TempDir::new().unwrap();
    let old = dir.path().join("old.txt");
    let fresh = dir.path().join("fresh.txt");
    fs::write(&old, b"old").unwrap();
    fs::write(&fresh, b"fresh").unwrap();
    age_entry(&old, 3 * DAY);

    let mut options = RuntimeOptions::new();
    options.max_age = Some(2 * DAY);
    let mut cleaner = Cleaner::new(options);
    let report = cleaner.run_on(target(&dir)).await;

    assert!(!old.exists());
    assert!(fresh.exists());
    assert_eq!(report.totals.files, 1);
    assert_eq!(report.totals.skipped, 1);
    assert_eq!(report.totals.skipped_by.max_age, 1);
}

#[tokio::test]
async fn test_excluded_subtree_is_never_visited() {
    let dir = TempDir::new().unwrap();
    let keep = dir.path().join("keep");
    fs::create_dir(&keep).unwrap();
    fs::write(keep.join("secret.txt"), b"precious").unwrap();
    fs::write(dir.path().join("junk.txt"), b"junkjunk").unwrap();

    let mut options = RuntimeOptions::new();
    options.add_exclusion(&keep);
    let mut cleaner = Cleaner::new(options);
    let report = cleaner.run_on(target(&dir)).await;

    assert!(keep.join("secret.txt").exists());
    assert!(!dir.path().join("junk.txt").exists());
    assert_eq!(report.totals.skipped_by.excluded, 1);
    // Totals reflect only the removed entry, nothing under keep/.
    assert_eq!(report.totals.files, 1);
    assert_eq!(report.totals.bytes, 8);
}

#[tokio::test]
async fn test_excluded_whole_target_leaves_totals_alone() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("contents.txt"), b"anything").unwrap();

    let mut options = RuntimeOptions::new();
    options.add_exclusion(dir.path());
    let mut cleaner = Cleaner::new(options);
    let report = cleaner.run_on(target(&dir)).await;

    assert!(dir.path().join("contents.txt").exists());
    assert_eq!(report.totals.files, 0);
    assert_eq!(report.totals.bytes, 0);
    assert_eq!(report.totals.skipped, 0);
    assert!(report.targets.is_empty());
}

#[tokio::test]
async fn test_end_to_end_age_and_exclusion_policy() {
    let dir = TempDir::new().unwrap();
    let old = dir.path().join("old.txt");
    let new = dir.path().join("new.txt");
    let keep = dir.path().join("keep");
    fs::write(&old, b"stale").unwrap();
    fs::write(&new, b"fresh").unwrap();
    fs::create_dir(&keep).unwrap();
    fs::write(keep.join("secret.txt"), b"precious").unwrap();
    age_entry(&old, 3 * DAY);
    age_entry(&keep, 3 * DAY);

    let mut options = RuntimeOptions::new();
    options.max_age = Some(2 * DAY);
    options.add_exclusion(&keep);
    let mut cleaner = Cleaner::new(options);
    let report = cleaner.run_on(target(&dir)).await;

    assert!(!old.exists(), "only the stale entry goes");
    assert!(new.exists());
    assert!(keep.join("secret.txt").exists());
    assert!(report.totals.skipped >= 2);
    assert_eq!(report.totals.skipped_by.excluded, 1);
    assert_eq!(report.totals.skipped_by.max_age, 1);
    assert_eq!(report.totals.files, 1);
}

#[tokio::test]
async fn test_vanished_target_is_non_fatal() {
    let here = TempDir::new().unwrap();
    let gone = TempDir::new().unwrap();
    fs::write(here.path().join("junk.txt"), b"junk").unwrap();
    let gone_path = gone.path().to_path_buf();
    drop(gone);

    let mut cleaner = Cleaner::new(RuntimeOptions::new());
    let report = cleaner
        .run_on(vec![gone_path, here.path().to_path_buf()])
        .await;

    // The dead target contributes one error; the live one is still cleaned.
    assert_eq!(report.totals.errors, 1);
    assert_eq!(report.totals.files, 1);
    assert!(!here.path().join("junk.txt").exists());
}

struct DeclineAll {
    prompts: std::sync::Arc<std::sync::atomic::AtomicUsize>,
}

impl Confirm for DeclineAll {
    fn confirm(&mut self, _preview: &TargetPreview) -> bool {
        self.prompts
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        false
    }
}

struct AcceptAll;

impl Confirm for AcceptAll {
    fn confirm(&mut self, _preview: &TargetPreview) -> bool {
        true
    }
}

#[tokio::test]
async fn test_preview_decline_everything_deletes_nothing() {
    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();
    fs::write(a.path().join("x"), b"x").unwrap();
    fs::write(b.path().join("y"), b"y").unwrap();

    let prompts = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let mut options = RuntimeOptions::new();
    options.interactive_preview = true;
    let mut cleaner = Cleaner::new(options).with_confirm(Box::new(DeclineAll {
        prompts: std::sync::Arc::clone(&prompts),
    }));
    let report = cleaner
        .run_on(vec![a.path().to_path_buf(), b.path().to_path_buf()])
        .await;

    assert_eq!(prompts.load(std::sync::atomic::Ordering::SeqCst), 2);
    assert_eq!(report.totals.files, 0);
    assert_eq!(report.totals.bytes, 0);
    assert_eq!(report.totals.skipped, 2);
    assert_eq!(report.totals.skipped_by.preview, 2);
    assert!(a.path().join("x").exists());
    assert!(b.path().join("y").exists());
}

#[tokio::test]
async fn test_preview_confirmed_targets_are_cleaned() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("x"), b"xx").unwrap();

    let mut options = RuntimeOptions::new();
    options.interactive_preview = true;
    let mut cleaner = Cleaner::new(options).with_confirm(Box::new(AcceptAll));
    let report = cleaner.run_on(target(&dir)).await;

    assert_eq!(report.totals.files, 1);
    assert_eq!(report.totals.skipped_by.preview, 0);
    assert!(!dir.path().join("x").exists());
}

#[tokio::test]
async fn test_parallel_targets_aggregate_like_sequential() {
    let dirs: Vec<TempDir> = (0..4).map(|_| TempDir::new().unwrap()).collect();
    for (index, dir) in dirs.iter().enumerate() {
        for file in 0..=index {
            fs::write(dir.path().join(format!("f{file}")), vec![0u8; 10]).unwrap();
        }
    }
    let targets: Vec<PathBuf> = dirs.iter().map(|d| d.path().to_path_buf()).collect();

    let mut options = RuntimeOptions::new();
    options.dry_run = true;
    options.set_concurrency(Some(2));
    let mut cleaner = Cleaner::new(options);
    let report = cleaner.run_on(targets.clone()).await;

    // 1 + 2 + 3 + 4 files across the four targets.
    assert_eq!(report.totals.files, 10);
    assert_eq!(report.totals.bytes, 100);
    assert_eq!(report.targets.len(), 4);

    // Per-target summaries keep the scheduling order.
    let reported: Vec<PathBuf> = report.targets.iter().map(|t| t.path.clone()).collect();
    assert_eq!(reported, targets);
}

#[cfg(unix)]
#[tokio::test]
async fn test_permission_denied_paths_are_recorded() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("held.txt"), b"held").unwrap();
    // Remove write and traversal rights so deletion of the child fails.
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

    let mut cleaner = Cleaner::new(RuntimeOptions::new());
    let report = cleaner.run_on(target(&dir)).await;

    if !locked.exists() {
        // Privileged processes ignore the permission bits; the removal
        // went through and there is nothing to assert.
        return;
    }
    // Restore rights so TempDir can clean up after the assertions.
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert!(report.totals.errors >= 1);
    assert!(report.totals.permission_denied.contains(&locked));
}
