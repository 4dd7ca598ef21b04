use commit_summary::{self, Error, FileState, MessageSource};
use std::fs;
use std::path::Path;
use std::process::Command;
use tree_fs::{Tree, TreeBuilder};

fn git(root: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(root)
        .output()
        .expect("Failed to run git");
    String::from_utf8(output.stdout)
        .expect("Git output is not UTF-8")
        .trim()
        .to_string()
}

fn setup_test_repo() -> Tree {
    // Create a temporary workspace for the test repository
    let tree = TreeBuilder::default()
        .add_file("file1.txt", "original content\n")
        .add_file("dir1/file2.txt", "file 2 content\n")
        .create()
        .expect("Failed to create test repo tree");

    git(&tree.root, &["init"]);
    git(&tree.root, &["config", "user.name", "Test User"]);
    git(&tree.root, &["config", "user.email", "test@example.com"]);
    git(&tree.root, &["config", "commit.gpgsign", "false"]);
    git(&tree.root, &["add", "."]);
    git(&tree.root, &["commit", "-m", "Initial commit"]);

    // Modify an existing file
    fs::write(tree.root.join("file1.txt"), "modified content\n")
        .expect("Failed to modify file1.txt");

    // Add a new, untracked file
    fs::create_dir_all(tree.root.join("dir2")).expect("Failed to create dir2");
    fs::write(tree.root.join("dir2/file3.txt"), "new file content\n")
        .expect("Failed to create file3.txt");

    tree
}

#[test]
fn test_list_changes() {
    let tree = setup_test_repo();
    let session = commit_summary::open(Some(tree.root.as_path())).expect("Failed to open session");

    let records = session.list_changes().expect("Failed to list changes");

    let paths: Vec<&str> = records.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(paths, vec!["file1.txt", "dir2/file3.txt"]);
    assert!(records.iter().all(|r| !r.staged && r.modified));
    assert!(records.iter().all(|r| r.state() == FileState::Modified));
}

#[test]
fn test_open_outside_repository() {
    let tree = TreeBuilder::default()
        .add_file("plain.txt", "not tracked")
        .create()
        .expect("Failed to create tree");

    let result = commit_summary::open(Some(tree.root.as_path()));
    assert!(matches!(result, Err(Error::NotARepository(_))));
}

#[tokio::test]
async fn test_generate_message_for_selected_files() {
    let tree = setup_test_repo();
    let mut session = commit_summary::open(Some(tree.root.as_path())).expect("Failed to open session");

    let selected = vec!["file1.txt".to_string(), "dir2/file3.txt".to_string()];
    let generated = session
        .generate_message(&selected, None, &MessageSource::Local)
        .await
        .expect("Failed to generate message");

    // git orders the staged diff by path
    assert_eq!(
        generated.message,
        "Update: Changes in multiple files (file3.txt, file1.txt) (+2 -1)"
    );
    assert_eq!(generated.facts.additions, 2);
    assert_eq!(generated.facts.deletions, 1);

    let staged = git(&tree.root, &["diff", "--cached", "--name-only"]);
    assert_eq!(staged, "dir2/file3.txt\nfile1.txt");
}

#[tokio::test]
async fn test_generate_with_instructions_and_commit() {
    let tree = setup_test_repo();
    let mut session = commit_summary::open(Some(tree.root.as_path())).expect("Failed to open session");

    let generated = session
        .generate_message(&["file1.txt".to_string()], Some("fix"), &MessageSource::Local)
        .await
        .expect("Failed to generate message");
    assert_eq!(generated.message, "fix: Changes in file1.txt (+1 -1)");

    session
        .commit(&generated.message)
        .expect("Failed to commit");

    let subject = git(&tree.root, &["log", "-1", "--format=%s"]);
    assert_eq!(subject, "fix: Changes in file1.txt (+1 -1)");

    let records = session.list_changes().expect("Failed to list changes");
    let paths: Vec<&str> = records.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(paths, vec!["dir2/file3.txt"]);
}

#[tokio::test]
async fn test_empty_selection_does_not_stage() {
    let tree = setup_test_repo();
    let mut session = commit_summary::open(Some(tree.root.as_path())).expect("Failed to open session");

    let result = session
        .generate_message(&[], Some("fix"), &MessageSource::Local)
        .await;

    assert!(matches!(result, Err(Error::NoSelection)));
    assert!(git(&tree.root, &["diff", "--cached", "--name-only"]).is_empty());
}

#[tokio::test]
async fn test_deleted_file_is_named() {
    let tree = setup_test_repo();
    fs::remove_file(tree.root.join("dir1/file2.txt")).expect("Failed to delete file2.txt");
    let mut session = commit_summary::open(Some(tree.root.as_path())).expect("Failed to open session");

    let generated = session
        .generate_message(&["dir1/file2.txt".to_string()], None, &MessageSource::Local)
        .await
        .expect("Failed to generate message");

    assert_eq!(generated.message, "Update: Changes in file2.txt (+0 -1)");
}

#[test]
fn test_commit_without_staged_changes_fails() {
    let tree = setup_test_repo();
    let session = commit_summary::open(Some(tree.root.as_path())).expect("Failed to open session");

    let result = session.commit("Update: Changes in repository");
    match result {
        Err(Error::GitCommandError(message)) => {
            assert!(!message.is_empty(), "git's reason should be forwarded");
        }
        other => panic!("Expected git command error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_generate_message_for_latin1_file() {
    let tree = setup_test_repo();
    fs::write(tree.root.join("f.txt"), "cafe\n").expect("Failed to create f.txt");
    git(&tree.root, &["add", "f.txt"]);
    git(&tree.root, &["commit", "-m", "Add f.txt"]);

    // "café" in Latin-1, not valid UTF-8
    fs::write(tree.root.join("f.txt"), b"caf\xe9\n").expect("Failed to rewrite f.txt");
    let mut session = commit_summary::open(Some(tree.root.as_path())).expect("Failed to open session");

    let generated = session
        .generate_message(&["f.txt".to_string()], None, &MessageSource::Local)
        .await
        .expect("Failed to generate message");

    assert_eq!(generated.message, "Update: Changes in f.txt (+1 -1)");
}
