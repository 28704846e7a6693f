//! Local disk access

use super::{DirEntry, FileSystem, Metadata};
use crate::types::MirrorError;
use camino::Utf8Path;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::time::SystemTime;
use tracing::{debug, warn};

/// The local file system
///
/// Usually the source side of a mirror, but it implements every write
/// operation too so a local directory can stand in for a remote one.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

fn to_metadata(meta: &fs::Metadata) -> Result<Metadata, MirrorError> {
    Ok(Metadata {
        is_dir: meta.is_dir(),
        size: meta.len(),
        modified: meta.modified()?,
    })
}

impl FileSystem for LocalFs {
    fn stat(&self, path: &str) -> Result<Metadata, MirrorError> {
        to_metadata(&fs::metadata(path)?)
    }

    fn walk(&self, root: &str) -> Result<Vec<DirEntry>, MirrorError> {
        // Plain traversal: no .gitignore or hidden-file rules, links are not followed
        let walker = ignore::WalkBuilder::new(root)
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        let mut entries = Vec::new();
        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "error during local traversal, continuing");
                    continue;
                }
            };

            if entry.depth() == 0 {
                continue;
            }

            let Some(path) = entry.path().to_str() else {
                warn!(path = %entry.path().display(), "skipping non UTF-8 path");
                continue;
            };

            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(e) => {
                    warn!(path, error = %e, "failed to read metadata, skipping");
                    continue;
                }
            };

            // A link is listed as the file it points to, since that is what gets uploaded
            let metadata = if entry.path_is_symlink() {
                match fs::metadata(entry.path()) {
                    Ok(target) if target.is_dir() => {
                        warn!(path, "symlink to directory is not followed, skipping");
                        continue;
                    }
                    Ok(target) => target,
                    Err(e) => {
                        warn!(path, error = %e, "broken symlink, skipping");
                        continue;
                    }
                }
            } else {
                metadata
            };

            entries.push(DirEntry {
                path: path.to_string(),
                metadata: to_metadata(&metadata)?,
            });
        }

        debug!(root, count = entries.len(), "walked local tree");
        Ok(entries)
    }

    fn open(&self, path: &str) -> Result<Box<dyn Read + '_>, MirrorError> {
        Ok(Box::new(File::open(path)?))
    }

    fn create(&self, path: &str) -> Result<Box<dyn Write + '_>, MirrorError> {
        Ok(Box::new(File::create(path)?))
    }

    fn mkdir(&self, path: &str) -> Result<(), MirrorError> {
        fs::create_dir(path)?;
        Ok(())
    }

    fn remove(&self, path: &str) -> Result<(), MirrorError> {
        if fs::symlink_metadata(path)?.is_dir() {
            fs::remove_dir(path)?;
        } else {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn set_modified_time(&self, path: &str, modified: SystemTime) -> Result<(), MirrorError> {
        filetime::set_file_mtime(path, filetime::FileTime::from_system_time(modified))?;
        Ok(())
    }

    fn join(&self, root: &str, relative: &str) -> String {
        Utf8Path::new(root).join(relative).into_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::TempDir;

    fn root_str(dir: &TempDir) -> String {
        dir.path().to_str().expect("utf-8 temp path").to_string()
    }

    #[test]
    fn test_walk_reports_parents_before_children() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir_all(temp_dir.path().join("a/b")).expect("create dirs");
        fs::write(temp_dir.path().join("a/b/file.txt"), b"x").expect("write file");

        let root = root_str(&temp_dir);
        let entries = LocalFs.walk(&root).expect("walk");
        let paths: Vec<_> = entries
            .iter()
            .map(|e| e.path[root.len()..].replace('\\', "/"))
            .collect();

        assert_eq!(paths, vec!["/a", "/a/b", "/a/b/file.txt"]);
        assert!(entries[0].metadata.is_dir);
        assert!(!entries[2].metadata.is_dir);
        assert_eq!(entries[2].metadata.size, 1);
    }

    #[test]
    fn test_walk_includes_hidden_and_gitignored_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir(temp_dir.path().join(".git")).expect("create .git");
        fs::write(temp_dir.path().join(".gitignore"), "*.log\n").expect("write .gitignore");
        fs::write(temp_dir.path().join("debug.log"), b"log").expect("write log");

        let entries = LocalFs.walk(&root_str(&temp_dir)).expect("walk");
        assert!(entries.iter().any(|e| e.path.ends_with("debug.log")));
        assert!(entries.iter().any(|e| e.path.ends_with(".gitignore")));
    }

    #[test]
    fn test_write_operations_round_trip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let fs_ = LocalFs::new();
        let root = root_str(&temp_dir);

        let dir = fs_.join(&root, "sub");
        fs_.mkdir(&dir).expect("mkdir");
        let file = fs_.join(&root, "sub/data.bin");
        {
            let mut out = fs_.create(&file).expect("create");
            out.write_all(b"payload").expect("write");
        }

        let mtime = UNIX_EPOCH + Duration::from_secs(1_500_000_000);
        fs_.set_modified_time(&file, mtime).expect("set mtime");
        let meta = fs_.stat(&file).expect("stat");
        assert_eq!(meta.size, 7);
        assert_eq!(meta.modified, mtime);

        let mut content = String::new();
        fs_.open(&file)
            .expect("open")
            .read_to_string(&mut content)
            .expect("read");
        assert_eq!(content, "payload");

        fs_.remove(&file).expect("remove file");
        fs_.remove(&dir).expect("remove empty dir");
        assert!(!temp_dir.path().join("sub").exists());
    }

    #[test]
    fn test_remove_non_empty_directory_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir(temp_dir.path().join("full")).expect("create dir");
        fs::write(temp_dir.path().join("full/f"), b"x").expect("write");

        let path = LocalFs.join(&root_str(&temp_dir), "full");
        assert!(LocalFs.remove(&path).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_lists_symlink_with_target_metadata() {
        use std::os::unix::fs::symlink;

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join("big.txt"), vec![b'x'; 5000]).expect("write target");
        fs::create_dir(temp_dir.path().join("dir")).expect("create dir");
        symlink("big.txt", temp_dir.path().join("link")).expect("create file link");
        symlink("dir", temp_dir.path().join("dir_link")).expect("create dir link");
        symlink("missing", temp_dir.path().join("dangling")).expect("create broken link");

        let entries = LocalFs.walk(&root_str(&temp_dir)).expect("walk");

        let link = entries
            .iter()
            .find(|e| e.path.ends_with("/link"))
            .expect("file link should be listed");
        assert_eq!(link.metadata.size, 5000);
        assert!(!link.metadata.is_dir);
        assert!(!entries.iter().any(|e| e.path.ends_with("dir_link")));
        assert!(!entries.iter().any(|e| e.path.ends_with("dangling")));
    }

    #[cfg(unix)]
    #[test]
    fn test_stat_follows_links_and_remove_unlinks() {
        use std::os::unix::fs::symlink;

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir(temp_dir.path().join("real")).expect("create dir");
        fs::write(temp_dir.path().join("real/f"), b"x").expect("write");
        symlink("real", temp_dir.path().join("alias")).expect("create link");

        let alias = LocalFs.join(&root_str(&temp_dir), "alias");
        assert!(LocalFs.stat(&alias).expect("stat through link").is_dir);

        LocalFs.remove(&alias).expect("remove link");
        assert!(!temp_dir.path().join("alias").exists());
        assert!(temp_dir.path().join("real/f").exists());
    }

    #[test]
    fn test_stat_missing_path_is_io_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = LocalFs.join(&root_str(&temp_dir), "missing");
        assert!(matches!(LocalFs.stat(&path), Err(MirrorError::Io(_))));
    }
}
