use std::fs;
use std::path::Path;

use fsutil_core::size::{directory_size, directory_size_bounded, file_size_with, DirectorySize};
use fsutil_util::alloc::{CountingAllocator, SystemAllocator};
use fsutil_util::diag::{CollectingSink, DiagnosticSink};
use fsutil_util::errors::FsError;
use tempfile::TempDir;

fn write_bytes(path: &Path, len: usize) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, vec![b'x'; len]).unwrap();
}

/// a (1) + s1/b (2) + s1/s2/c (4) + s1/s2/s3/d (8)
fn nested_tree() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_bytes(&tmp.path().join("a"), 1);
    write_bytes(&tmp.path().join("s1").join("b"), 2);
    write_bytes(&tmp.path().join("s1").join("s2").join("c"), 4);
    write_bytes(&tmp.path().join("s1").join("s2").join("s3").join("d"), 8);
    tmp
}

#[test]
fn test_empty_directory_is_zero_without_diagnostics() {
    let tmp = TempDir::new().unwrap();
    let sink = CollectingSink::new();
    let report = DirectorySize::new(tmp.path(), &SystemAllocator)
        .diagnostics(&sink)
        .run();
    assert_eq!(report.bytes, 0);
    assert!(report.is_complete());
    assert!(sink.is_empty(), "unexpected: {:?}", sink.lines());
}

#[test]
fn test_single_file() {
    let tmp = TempDir::new().unwrap();
    write_bytes(&tmp.path().join("a.bin"), 100);
    assert_eq!(directory_size(tmp.path(), &SystemAllocator), 100);
}

#[test]
fn test_depth_cap_excludes_inner_file() {
    let tmp = TempDir::new().unwrap();
    write_bytes(&tmp.path().join("a"), 10);
    write_bytes(&tmp.path().join("sub").join("b"), 20);

    let alloc = SystemAllocator;
    assert_eq!(directory_size_bounded(tmp.path(), 1, &alloc), 10);
    assert_eq!(directory_size_bounded(tmp.path(), 2, &alloc), 30);
    assert_eq!(directory_size_bounded(tmp.path(), 0, &alloc), 30);
}

#[test]
fn test_directory_size_equals_depth_one() {
    let tmp = nested_tree();
    let alloc = SystemAllocator;
    assert_eq!(
        directory_size(tmp.path(), &alloc),
        directory_size_bounded(tmp.path(), 1, &alloc)
    );
}

#[test]
fn test_each_level_adds_its_files() {
    let tmp = nested_tree();
    let alloc = SystemAllocator;
    assert_eq!(directory_size_bounded(tmp.path(), 1, &alloc), 1);
    assert_eq!(directory_size_bounded(tmp.path(), 2, &alloc), 3);
    assert_eq!(directory_size_bounded(tmp.path(), 3, &alloc), 7);
    assert_eq!(directory_size_bounded(tmp.path(), 4, &alloc), 15);
    assert_eq!(directory_size_bounded(tmp.path(), 9, &alloc), 15);
    assert_eq!(directory_size_bounded(tmp.path(), 0, &alloc), 15);
}

#[test]
fn test_depth_monotonicity() {
    let tmp = nested_tree();
    let alloc = SystemAllocator;
    let unbounded = directory_size_bounded(tmp.path(), 0, &alloc);
    let mut previous = 0;
    for depth in 1..=6 {
        let size = directory_size_bounded(tmp.path(), depth, &alloc);
        assert!(previous <= size, "depth {depth}: {previous} > {size}");
        assert!(size <= unbounded);
        previous = size;
    }
}

#[test]
fn test_size_is_idempotent() {
    let tmp = nested_tree();
    let alloc = SystemAllocator;
    for depth in [0, 1, 2, 3] {
        assert_eq!(
            directory_size_bounded(tmp.path(), depth, &alloc),
            directory_size_bounded(tmp.path(), depth, &alloc)
        );
    }
}

#[test]
fn test_non_directory_input() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("a.bin");
    write_bytes(&file, 100);

    let sink = CollectingSink::new();
    let report = DirectorySize::new(&file, &SystemAllocator)
        .diagnostics(&sink)
        .run();
    assert_eq!(report.bytes, 0);
    assert!(matches!(report.error, Some(FsError::NotADirectory { .. })));
    assert_eq!(
        sink.lines(),
        vec![format!("Path is not a directory: {}", file.display())]
    );
}

#[test]
fn test_missing_root_is_not_a_directory() {
    let tmp = TempDir::new().unwrap();
    assert_eq!(
        directory_size_bounded(tmp.path().join("missing"), 0, &SystemAllocator),
        0
    );
}

#[test]
fn test_memory_balance_after_walk() {
    let tmp = nested_tree();
    let alloc = CountingAllocator::new();
    assert_eq!(directory_size_bounded(tmp.path(), 0, &alloc), 15);
    assert_eq!(alloc.live_bytes(), 0);
    assert_eq!(alloc.live_allocations(), 0);
    assert!(alloc.attempts() > 0);
}

#[test]
fn test_root_node_allocation_failure() {
    let tmp = nested_tree();
    let alloc = CountingAllocator::failing_after(0);
    let sink = CollectingSink::new();
    let report = DirectorySize::new(tmp.path(), &alloc)
        .max_depth(0)
        .diagnostics(&sink)
        .run();
    assert_eq!(report.bytes, 0);
    assert!(matches!(report.error, Some(FsError::OutOfMemory)));
    assert_eq!(sink.lines(), vec!["Failed to allocate memory !".to_string()]);
    assert_eq!(alloc.live_bytes(), 0);
}

#[test]
fn test_root_path_duplication_failure() {
    let tmp = nested_tree();
    let alloc = CountingAllocator::failing_after(1);
    let sink = CollectingSink::new();
    let report = DirectorySize::new(tmp.path(), &alloc)
        .diagnostics(&sink)
        .run();
    assert!(!report.is_complete());
    assert_eq!(
        sink.lines(),
        vec!["Failed to duplicate directory path !".to_string()]
    );
    assert_eq!(alloc.live_bytes(), 0);
}

#[test]
fn test_child_join_failure() {
    let tmp = nested_tree();
    let alloc = CountingAllocator::failing_after(2);
    let sink = CollectingSink::new();
    let report = DirectorySize::new(tmp.path(), &alloc)
        .max_depth(0)
        .diagnostics(&sink)
        .run();
    assert_eq!(report.bytes, 0);
    assert_eq!(sink.lines(), vec!["rcutils_join_path return NULL !".to_string()]);
    assert_eq!(alloc.live_allocations(), 0);
}

#[test]
fn test_allocation_failure_anywhere_returns_balanced_partial_sum() {
    let tmp = nested_tree();
    let full = directory_size_bounded(tmp.path(), 0, &SystemAllocator);

    let mut completed = false;
    for budget in 0..64 {
        let alloc = CountingAllocator::failing_after(budget);
        let sink = CollectingSink::new();
        let report = DirectorySize::new(tmp.path(), &alloc)
            .max_depth(0)
            .diagnostics(&sink)
            .run();
        assert!(report.bytes <= full, "budget {budget}");
        assert_eq!(alloc.live_bytes(), 0, "budget {budget}");
        assert_eq!(alloc.live_allocations(), 0, "budget {budget}");
        if report.is_complete() {
            assert_eq!(report.bytes, full);
            assert!(sink.is_empty());
            completed = true;
            break;
        }
        assert_eq!(sink.lines().len(), 1, "budget {budget}: {:?}", sink.lines());
    }
    assert!(completed, "walk never completed within the budget range");
}

#[test]
fn test_into_result_strict_mode() {
    let tmp = nested_tree();
    let ok = DirectorySize::new(tmp.path(), &SystemAllocator)
        .max_depth(0)
        .run()
        .into_result()
        .unwrap();
    assert_eq!(ok, 15);

    let sink = CollectingSink::new();
    let err = DirectorySize::new(&tmp.path().join("a"), &SystemAllocator)
        .diagnostics(&sink)
        .run()
        .into_result()
        .unwrap_err();
    assert!(matches!(err, FsError::NotADirectory { .. }));
}

#[cfg(unix)]
#[test]
fn test_unopenable_subdirectory_returns_partial_sum() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    write_bytes(&tmp.path().join("sibling"), 11);
    let locked = tmp.path().join("locked");
    write_bytes(&locked.join("inner"), 50);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can open it regardless of the mode bits.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        eprintln!("skipping: mode 000 does not stop this user from reading directories");
        return;
    }

    let alloc = CountingAllocator::new();
    let sink = CollectingSink::new();
    let report = DirectorySize::new(tmp.path(), &alloc)
        .max_depth(0)
        .diagnostics(&sink)
        .run();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert!(matches!(
        report.error,
        Some(FsError::OpenDirectory { code, .. }) if code == 13
    ));
    assert_eq!(report.bytes, 11);
    assert!(sink.contains(&format!(
        "Can't open directory {}. Error code: 13",
        locked.display()
    )));
    assert_eq!(alloc.live_bytes(), 0);
}

/// Records diagnostics and deletes `doomed` on the first one, so queued
/// directories disappear before the walk reaches them.
#[cfg(unix)]
struct RemoveOnEmit {
    lines: CollectingSink,
    doomed: Vec<std::path::PathBuf>,
}

#[cfg(unix)]
impl DiagnosticSink for RemoveOnEmit {
    fn emit(&self, line: &str) {
        for dir in &self.doomed {
            let _ = fs::remove_dir_all(dir);
        }
        self.lines.emit(line);
    }
}

#[cfg(unix)]
#[test]
fn test_vanished_subdirectory_returns_partial_sum() {
    // Both d1 and d2 are queued while the root drains. Whichever is opened
    // first reports its dangling link, which removes the other one.
    let tmp = TempDir::new().unwrap();
    write_bytes(&tmp.path().join("sibling"), 11);
    let d1 = tmp.path().join("d1");
    let d2 = tmp.path().join("d2");
    for dir in [&d1, &d2] {
        fs::create_dir(dir).unwrap();
        std::os::unix::fs::symlink(tmp.path().join("nowhere"), dir.join("dangling")).unwrap();
    }

    let alloc = CountingAllocator::new();
    let sink = RemoveOnEmit {
        lines: CollectingSink::new(),
        doomed: vec![d1, d2],
    };
    let report = DirectorySize::new(tmp.path(), &alloc)
        .max_depth(0)
        .diagnostics(&sink)
        .run();

    assert!(
        matches!(
            report.error,
            Some(FsError::OpenDirectory { code, .. }) if code == 2
        ),
        "{:?}",
        report.error
    );
    assert_eq!(report.bytes, 11);
    assert!(sink.lines.contains("Can't open directory"));
    assert!(sink.lines.contains("Error code: 2"));
    assert_eq!(alloc.live_bytes(), 0);
}

#[cfg(unix)]
#[test]
fn test_dangling_symlink_counts_zero() {
    let tmp = TempDir::new().unwrap();
    write_bytes(&tmp.path().join("real"), 7);
    let dangling = tmp.path().join("dangling");
    std::os::unix::fs::symlink(tmp.path().join("nowhere"), &dangling).unwrap();

    let sink = CollectingSink::new();
    let report = DirectorySize::new(tmp.path(), &SystemAllocator)
        .diagnostics(&sink)
        .run();
    assert_eq!(report.bytes, 7);
    assert!(report.is_complete());
    assert!(sink.contains(&format!("Path is not a file: {}", dangling.display())));
}

#[cfg(unix)]
#[test]
fn test_symlinked_directory_is_followed() {
    let tmp = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    write_bytes(&target.path().join("linked"), 5);
    std::os::unix::fs::symlink(target.path(), tmp.path().join("link")).unwrap();

    let alloc = SystemAllocator;
    assert_eq!(directory_size_bounded(tmp.path(), 1, &alloc), 0);
    assert_eq!(directory_size_bounded(tmp.path(), 0, &alloc), 5);
}

#[test]
fn test_file_size_of_file_and_directory() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("f");
    write_bytes(&file, 42);

    let sink = CollectingSink::new();
    assert_eq!(file_size_with(&file, &sink), 42);
    assert!(sink.is_empty());

    assert_eq!(file_size_with(tmp.path(), &sink), 0);
    assert_eq!(
        sink.lines(),
        vec![format!("Path is not a file: {}", tmp.path().display())]
    );
}
