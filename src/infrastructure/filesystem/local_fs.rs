use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Directory operations the retriever needs
#[cfg_attr(test, mockall::automock)]
pub trait FileSystem: Send + Sync {
    /// Recursively remove `path`; a missing directory is not an error
    fn remove_directory(&self, path: &Path) -> io::Result<()>;

    /// Recursively copy the contents of `from` into `to`, creating `to`
    fn copy_contents(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// [`FileSystem`] backed by the host filesystem
#[derive(Debug, Default, Clone)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for LocalFileSystem {
    fn remove_directory(&self, path: &Path) -> io::Result<()> {
        debug!("Removing directory {}", path.display());
        match fs::remove_dir_all(path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    fn copy_contents(&self, from: &Path, to: &Path) -> io::Result<()> {
        debug!("Copying {} to {}", from.display(), to.display());

        if !from.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not a directory", from.display()),
            ));
        }

        fs::create_dir_all(to)?;

        for entry in WalkDir::new(from).min_depth(1).follow_links(false) {
            let entry = entry?;
            let relative = entry
                .path()
                .strip_prefix(from)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            let dest = to.join(relative);
            let file_type = entry.file_type();

            if file_type.is_dir() {
                fs::create_dir_all(&dest)?;
            } else if file_type.is_symlink() {
                copy_symlink(entry.path(), &dest)?;
            } else {
                fs::copy(entry.path(), &dest)?;
            }
        }

        Ok(())
    }
}

#[cfg(unix)]
fn copy_symlink(from: &Path, to: &Path) -> io::Result<()> {
    let target = fs::read_link(from)?;
    std::os::unix::fs::symlink(target, to)
}

#[cfg(not(unix))]
fn copy_symlink(from: &Path, to: &Path) -> io::Result<()> {
    fs::copy(from, to).map(|_| ())
}
