use std::path::{Path, PathBuf};

use crate::{
    config::ConflictPolicy,
    errors::{FileOperation, IoError},
    tree::{Directory, File, Node, NodeKind},
};

/// Terminal state of a single node once the walk has visited it.
#[derive(Debug)]
pub enum Status {
    /// The directory was created, or the file was written. `with_content` is set for seeded files.
    Created { with_content: bool },
    /// The path already existed with the same type and overwriting was not requested.
    SkippedExisting,
    /// The create or write failed; the walk carried on regardless.
    Failed(IoError),
}

/// What happened to one node, recorded in walk order.
#[derive(Debug)]
pub struct Outcome {
    pub path: PathBuf,
    pub kind: NodeKind,
    pub status: Status,
}

/// All outcomes of a materialization, in pre-order.
#[derive(Debug, Default)]
pub struct Report {
    outcomes: Vec<Outcome>,
}
impl Report {
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn created(&self) -> usize {
        self.count(|status| matches!(status, Status::Created { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|status| matches!(status, Status::SkippedExisting))
    }

    pub fn failed(&self) -> usize {
        self.count(|status| matches!(status, Status::Failed(_)))
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    fn count(&self, predicate: impl Fn(&Status) -> bool) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| predicate(&outcome.status))
            .count()
    }

    fn record(&mut self, path: PathBuf, kind: NodeKind, status: Status) {
        log::debug!("{:?} {} -> {:?}", kind, path.display(), status);

        self.outcomes.push(Outcome { path, kind, status });
    }
}

/// Creates `root` and everything below it under `base`.
///
/// The walk is depth-first and pre-order, so a directory exists before its children
/// are written. Failures are recorded per node and never stop the walk.
pub fn materialize(root: &Directory, base: &Path, policy: ConflictPolicy) -> Report {
    let mut report = Report::default();

    let current = base.join(&root.name);
    let status = directory_status(&current, policy);
    report.record(current.clone(), NodeKind::Directory, status);

    visit_children(root, &current, policy, &mut report);

    report
}

fn visit(node: &Node, base: &Path, policy: ConflictPolicy, report: &mut Report) {
    let current = base.join(node.name());

    let status = match node {
        Node::Directory(_) => directory_status(&current, policy),
        Node::File(file) => file_status(file, &current, policy),
    };

    report.record(current.clone(), node.kind(), status);

    if let Node::Directory(dir) = node {
        visit_children(dir, &current, policy, report);
    }
}

// Children are visited even when the directory was skipped, so an existing
// directory still receives new entries.
fn visit_children(dir: &Directory, current: &Path, policy: ConflictPolicy, report: &mut Report) {
    for child in &dir.children {
        visit(child, current, policy, report);
    }
}

fn directory_status(current: &Path, policy: ConflictPolicy) -> Status {
    if current.is_dir() && policy == ConflictPolicy::SkipExisting {
        return Status::SkippedExisting;
    }

    match create_directory(current) {
        Ok(()) => Status::Created {
            with_content: false,
        },
        Err(error) => Status::Failed(error),
    }
}

fn file_status(file: &File, current: &Path, policy: ConflictPolicy) -> Status {
    if current.is_file() && policy == ConflictPolicy::SkipExisting {
        return Status::SkippedExisting;
    }

    let contents = file.content.as_deref().unwrap_or_default();

    match write_file(current, contents) {
        Ok(()) => Status::Created {
            with_content: !contents.is_empty(),
        },
        Err(error) => Status::Failed(error),
    }
}

/// Creates the directory and any missing parents; a no-op when it already exists.
fn create_directory(path: &Path) -> Result<(), IoError> {
    std::fs::create_dir_all(path)
        .map_err(|error| IoError::new(FileOperation::Mkdir, path.into(), error))
}

/// Writes `contents` to `path`, creating or truncating the file.
fn write_file(path: &Path, contents: &str) -> Result<(), IoError> {
    std::fs::write(path, contents)
        .map_err(|error| IoError::new(FileOperation::Write, path.into(), error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sample() -> Directory {
        Directory::new("project")
            .with(Directory::new("src").with(File::with_content("main.txt", "hello")))
            .with(Directory::new("empty"))
            .with(File::new("README.md"))
    }

    #[test]
    fn test_materialize_creates_tree_in_pre_order() {
        let temp = tempfile::tempdir().unwrap();

        let report = materialize(&sample(), temp.path(), ConflictPolicy::SkipExisting);

        let paths: Vec<PathBuf> = report
            .outcomes()
            .iter()
            .map(|outcome| outcome.path.strip_prefix(temp.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            paths,
            vec![
                PathBuf::from("project"),
                PathBuf::from("project/src"),
                PathBuf::from("project/src/main.txt"),
                PathBuf::from("project/empty"),
                PathBuf::from("project/README.md"),
            ]
        );
        assert_eq!(report.created(), 5);
        assert!(temp.path().join("project/empty").is_dir());
    }

    #[test]
    fn test_content_fidelity() {
        let temp = tempfile::tempdir().unwrap();

        let report = materialize(&sample(), temp.path(), ConflictPolicy::SkipExisting);

        assert_eq!(
            fs::read_to_string(temp.path().join("project/src/main.txt")).unwrap(),
            "hello"
        );
        assert_eq!(
            fs::metadata(temp.path().join("project/README.md"))
                .unwrap()
                .len(),
            0
        );
        assert!(matches!(
            report.outcomes()[2].status,
            Status::Created { with_content: true }
        ));
        assert!(matches!(
            report.outcomes()[4].status,
            Status::Created {
                with_content: false
            }
        ));
    }

    #[test]
    fn test_second_run_skips_everything() {
        let temp = tempfile::tempdir().unwrap();
        let tree = sample();

        materialize(&tree, temp.path(), ConflictPolicy::SkipExisting);
        fs::write(temp.path().join("project/README.md"), "edited by hand").unwrap();

        let report = materialize(&tree, temp.path(), ConflictPolicy::SkipExisting);

        assert_eq!(report.skipped(), report.outcomes().len());
        assert_eq!(report.created(), 0);
        assert_eq!(
            fs::read_to_string(temp.path().join("project/README.md")).unwrap(),
            "edited by hand"
        );
    }

    #[test]
    fn test_overwrite_replaces_existing_files() {
        let temp = tempfile::tempdir().unwrap();
        let tree = sample();

        materialize(&tree, temp.path(), ConflictPolicy::SkipExisting);
        fs::write(temp.path().join("project/src/main.txt"), "stale").unwrap();

        let report = materialize(&tree, temp.path(), ConflictPolicy::Overwrite);

        assert_eq!(report.created(), 5);
        assert_eq!(
            fs::read_to_string(temp.path().join("project/src/main.txt")).unwrap(),
            "hello"
        );
    }

    #[test]
    fn test_skipped_directory_still_receives_new_children() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp.path().join("project/src")).unwrap();

        let report = materialize(&sample(), temp.path(), ConflictPolicy::SkipExisting);

        assert_eq!(report.skipped(), 2);
        assert_eq!(report.created(), 3);
        assert!(temp.path().join("project/src/main.txt").is_file());
    }

    #[test]
    fn test_failure_is_isolated_to_the_node() {
        let temp = tempfile::tempdir().unwrap();
        // A directory where the tree wants a file.
        fs::create_dir_all(temp.path().join("project/README.md")).unwrap();
        // A file where the tree wants a directory.
        fs::create_dir_all(temp.path().join("project")).unwrap();
        fs::write(temp.path().join("project/empty"), "").unwrap();

        let report = materialize(&sample(), temp.path(), ConflictPolicy::SkipExisting);

        assert_eq!(report.failed(), 2);
        assert!(report.has_failures());
        for outcome in report.outcomes() {
            let name = outcome.path.file_name().unwrap().to_string_lossy();
            match name.as_ref() {
                "README.md" | "empty" => {
                    assert!(matches!(outcome.status, Status::Failed(_)), "{}", name)
                }
                _ => assert!(!matches!(outcome.status, Status::Failed(_)), "{}", name),
            }
        }
        assert_eq!(
            fs::read_to_string(temp.path().join("project/src/main.txt")).unwrap(),
            "hello"
        );
    }

    #[test]
    fn test_children_of_a_failed_directory_record_their_own_failure() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp.path().join("project")).unwrap();
        fs::write(temp.path().join("project/src"), "not a directory").unwrap();

        let report = materialize(&sample(), temp.path(), ConflictPolicy::SkipExisting);

        let failed: Vec<PathBuf> = report
            .outcomes()
            .iter()
            .filter(|outcome| matches!(outcome.status, Status::Failed(_)))
            .map(|outcome| outcome.path.clone())
            .collect();

        assert_eq!(
            failed,
            vec![
                temp.path().join("project/src"),
                temp.path().join("project/src/main.txt"),
            ]
        );
        assert!(temp.path().join("project/README.md").is_file());
    }
}
