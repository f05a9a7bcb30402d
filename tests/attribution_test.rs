//! Integration tests for commit metadata extraction and attribution.

mod common;

use common::{FakeHistory, diff_fixture, lines};
use hunkdex::commit::{assign_by_proximity, extract_commits};
use hunkdex::{Change, CommitRecord, Reconciler, parse_unified_diff};

fn record(hash: &str, message: &str) -> CommitRecord {
    CommitRecord {
        hash: hash.to_string(),
        author: Some("Eve <eve@example.com>".to_string()),
        date: Some("Fri Jan 5 09:00:00 2024 +0000".to_string()),
        message: message.to_string(),
    }
}

// =============================================================================
// METADATA EXTRACTION
// =============================================================================

#[test]
fn test_extract_commits_from_log() {
    let commits = extract_commits(&diff_fixture("commit_before.patch"));
    assert_eq!(commits.len(), 2);

    assert_eq!(commits[0].hash, "aaaaaaa1111111");
    assert_eq!(commits[0].author.as_deref(), Some("Ann <ann@example.com>"));
    assert_eq!(commits[0].message, "feat: raise limits\n\nBody text here.");
    assert_eq!(commits[0].subject(), "feat: raise limits");

    assert_eq!(commits[1].hash, "bbbbbbb2222222");
    assert_eq!(commits[1].message, "fix: rename service");
}

#[test]
fn test_extract_commits_after_diff() {
    let commits = extract_commits(&diff_fixture("commit_after.patch"));
    let hashes: Vec<&str> = commits.iter().map(|c| c.hash.as_str()).collect();
    assert_eq!(hashes, vec!["ccccccc3333333", "ddddddd4444444"]);
    assert_eq!(commits[0].message, "docs: retitle readme");
    assert_eq!(commits[1].message, "ci: check formatting");
}

// =============================================================================
// RECONCILER
// =============================================================================

#[test]
fn test_commit_before_diff_gets_messages() {
    let text = diff_fixture("commit_before.patch");
    let mut changes = parse_unified_diff(&text);
    Reconciler::new(&text).run(&mut changes);

    assert_eq!(changes[0].commit.message.as_deref(), Some("feat: raise limits"));
    assert_eq!(changes[1].commit.message.as_deref(), Some("feat: raise limits"));
    assert_eq!(changes[2].commit.message.as_deref(), Some("fix: rename service"));
    assert_eq!(changes[2].commit.author.as_deref(), Some("Bob <bob@example.com>"));
}

#[test]
fn test_commit_after_diff_gets_messages() {
    let text = diff_fixture("commit_after.patch");
    let mut changes = parse_unified_diff(&text);
    Reconciler::new(&text).run(&mut changes);

    assert_eq!(changes[0].file, "README.md");
    assert_eq!(changes[0].commit.hash.as_deref(), Some("ccccccc3333333"));
    assert_eq!(changes[0].commit.message.as_deref(), Some("docs: retitle readme"));
    assert_eq!(changes[1].file, "Makefile");
    assert_eq!(changes[1].commit.hash.as_deref(), Some("ddddddd4444444"));
    assert_eq!(changes[1].commit.message.as_deref(), Some("ci: check formatting"));
}

#[test]
fn test_single_commit_fills_unhashed_changes() {
    let text = "\
--- a/a.txt
+++ b/a.txt
@@ -1 +1 @@
-x
+y
";
    let log = format!(
        "commit 9999999aaaaaaa\nAuthor: Ann <ann@example.com>\nDate:   today\n\n    chore: only one\n\n{}",
        text
    );
    // Drop the header so the parsed change carries no hash of its own.
    let mut changes = parse_unified_diff(text);
    assert_eq!(changes[0].commit.hash, None);

    Reconciler::new(&log).run(&mut changes);
    assert_eq!(changes[0].commit.hash.as_deref(), Some("9999999aaaaaaa"));
    assert_eq!(changes[0].commit.message.as_deref(), Some("chore: only one"));
}

#[test]
fn test_history_backfills_plain_diff() {
    let text = diff_fixture("plain.diff");
    let mut changes = parse_unified_diff(&text);
    let history = FakeHistory::default().with_commit(
        "src/lib.rs",
        record("1234567abcdef", "refactor: io imports\n\nDetails."),
    );

    Reconciler::new(&text)
        .with_history(&history)
        .refetch_subjects(true)
        .run(&mut changes);

    for change in changes.iter().filter(|c| c.file == "src/lib.rs") {
        assert_eq!(change.commit.hash.as_deref(), Some("1234567abcdef"));
        assert_eq!(change.commit.author.as_deref(), Some("Eve <eve@example.com>"));
        assert_eq!(change.commit.message.as_deref(), Some("refactor: io imports"));
    }
    let notes = changes.iter().find(|c| c.file == "notes.txt").unwrap();
    assert_eq!(notes.commit.hash, None);
    assert_eq!(notes.commit.message, None);
}

#[test]
fn test_history_does_not_override_text_attribution() {
    let text = diff_fixture("commit_before.patch");
    let mut changes = parse_unified_diff(&text);
    let history =
        FakeHistory::default().with_commit("config.yml", record("fffffff0000000", "other"));

    Reconciler::new(&text).with_history(&history).run(&mut changes);
    assert_eq!(changes[0].commit.hash.as_deref(), Some("aaaaaaa1111111"));
}

#[test]
fn test_consolidation_is_opt_in() {
    let text = "\
commit aaaaaaa1111111
Author: Ann <ann@example.com>
Date:   Mon Jan 1 10:00:00 2024 +0000

    feat: first

diff --git a/a.txt b/a.txt
--- a/a.txt
+++ b/a.txt
@@ -1 +1 @@
-one
+two
commit bbbbbbb2222222
Author: Bob <bob@example.com>
Date:   Tue Jan 2 11:00:00 2024 +0000

    fix: second

diff --git a/a.txt b/a.txt
--- a/a.txt
+++ b/a.txt
@@ -5 +5 @@
-five
+FIVE
";
    let mut kept = parse_unified_diff(text);
    Reconciler::new(text).run(&mut kept);
    assert_eq!(kept[0].commit.hash.as_deref(), Some("aaaaaaa1111111"));
    assert_eq!(kept[1].commit.hash.as_deref(), Some("bbbbbbb2222222"));

    let mut consolidated = parse_unified_diff(text);
    Reconciler::new(text)
        .consolidate_per_file(true)
        .run(&mut consolidated);
    assert_eq!(consolidated[0].commit.hash.as_deref(), Some("bbbbbbb2222222"));
    assert_eq!(consolidated[0].commit.message.as_deref(), Some("fix: second"));
    assert_eq!(consolidated[1].commit.hash.as_deref(), Some("bbbbbbb2222222"));
}

#[test]
fn test_proximity_uses_first_header_after_file() {
    let text = "\
diff --git a/a.txt b/a.txt
@@ -1 +1 @@
-x
+y
commit 1111111aaaaaaa

    first

diff --git a/b.txt b/b.txt
commit 2222222bbbbbbb
";
    let mut changes = vec![
        Change::block("b.txt", lines(&["p"]), lines(&["q"]), Some(1), Some(1)),
        Change::block("a.txt", lines(&["x"]), lines(&["y"]), Some(1), Some(1)),
        Change::block("c.txt", lines(&["m"]), Vec::new(), Some(1), None),
    ];
    let commits = extract_commits(text);
    assign_by_proximity(text, &mut changes, &commits);

    assert_eq!(changes[0].commit.hash.as_deref(), Some("2222222bbbbbbb"));
    assert_eq!(changes[1].commit.hash.as_deref(), Some("1111111aaaaaaa"));
    assert_eq!(changes[1].commit.message.as_deref(), Some("first"));
    assert_eq!(changes[2].commit.hash, None);
}
