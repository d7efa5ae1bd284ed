//! Zip compression and extraction, run as background jobs.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use tokio::sync::oneshot;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use burrow_core::{FsError, FsResult, extension_of};

use crate::conflict::{ensure_free, resolve_unique_name};
use crate::copy::source_name;
use crate::delete::try_delete_recursive;
use crate::progress::OperationType;

/// Outcome of a compress or extract job, delivered exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveComplete {
    /// Compress or Extract.
    pub operation_type: OperationType,
    /// The folder or archive the job was started on.
    pub source: PathBuf,
    /// The archive or directory produced, on success.
    pub output: Option<PathBuf>,
    /// Why the job failed, on failure.
    pub error: Option<String>,
}

impl ArchiveComplete {
    fn from_result(
        operation_type: OperationType,
        source: PathBuf,
        result: FsResult<PathBuf>,
    ) -> Self {
        match result {
            Ok(output) => Self {
                operation_type,
                source,
                output: Some(output),
                error: None,
            },
            Err(e) => Self {
                operation_type,
                source,
                output: None,
                error: Some(e.to_string()),
            },
        }
    }

    /// Check if the job succeeded.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Handle to a compress or extract job running on a blocking worker.
///
/// Inside a Tokio runtime the worker is a `spawn_blocking` task; outside one it
/// is a dedicated thread, and [`ArchiveJob::try_complete`] polls it.
///
/// The job cannot be cancelled once started. Its completion arrives through a
/// single-shot channel: either a success or a failure, never both, and a
/// worker that dies before reporting is reported as a failure.
#[derive(Debug)]
pub struct ArchiveJob {
    operation_type: OperationType,
    source: PathBuf,
    rx: oneshot::Receiver<ArchiveComplete>,
}

impl ArchiveJob {
    fn spawn<F>(operation_type: OperationType, source: PathBuf, work: F) -> Self
    where
        F: FnOnce(&Path) -> FsResult<PathBuf> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let job_source = source.clone();
        let task = move || {
            let result = work(&job_source);
            let _ = tx.send(ArchiveComplete::from_result(operation_type, job_source, result));
        };

        // Without a runtime the job gets its own thread. If that cannot start
        // either, the sender is dropped and the job reports as lost.
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(task);
            }
            Err(_) => {
                if let Err(e) = std::thread::Builder::new()
                    .name(format!("burrow-{}", operation_type.to_string().to_lowercase()))
                    .spawn(task)
                {
                    tracing::error!("failed to start {operation_type} worker: {e}");
                }
            }
        }

        Self {
            operation_type,
            source,
            rx,
        }
    }

    fn failed(operation_type: OperationType, source: PathBuf, error: FsError) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(ArchiveComplete::from_result(
            operation_type,
            source.clone(),
            Err(error),
        ));
        Self {
            operation_type,
            source,
            rx,
        }
    }

    /// The folder or archive this job works on.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Wait for the job to finish.
    pub async fn wait(self) -> ArchiveComplete {
        let Self {
            operation_type,
            source,
            rx,
        } = self;
        match rx.await {
            Ok(complete) => complete,
            Err(_) => Self::lost(operation_type, source),
        }
    }

    /// Check for completion without waiting.
    pub fn try_complete(&mut self) -> Option<ArchiveComplete> {
        match self.rx.try_recv() {
            Ok(complete) => Some(complete),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => {
                Some(Self::lost(self.operation_type, self.source.clone()))
            }
        }
    }

    fn lost(operation_type: OperationType, source: PathBuf) -> ArchiveComplete {
        tracing::error!(
            path = %source.display(),
            "{operation_type} worker stopped without reporting"
        );
        ArchiveComplete {
            operation_type,
            source,
            output: None,
            error: Some("worker stopped before reporting".into()),
        }
    }
}

/// Start compressing a directory into a sibling `<name>.zip` in the background.
pub fn start_compress(folder: impl Into<PathBuf>) -> ArchiveJob {
    let folder = folder.into();
    if !folder.is_dir() {
        let error = FsError::NotADirectory {
            path: folder.clone(),
        };
        return ArchiveJob::failed(OperationType::Compress, folder, error);
    }
    ArchiveJob::spawn(OperationType::Compress, folder, compress_to_zip)
}

/// Start extracting a `.zip` archive into a sibling directory in the background.
pub fn start_extract(archive: impl Into<PathBuf>) -> ArchiveJob {
    let archive = archive.into();
    if !is_zip(&archive) {
        let error = FsError::NotAnArchive {
            path: archive.clone(),
        };
        return ArchiveJob::failed(OperationType::Extract, archive, error);
    }
    ArchiveJob::spawn(OperationType::Extract, archive, extract_zip)
}

/// Whether the path names a zip archive.
pub fn is_zip(path: &Path) -> bool {
    extension_of(path) == "zip"
}

/// Compress `folder` into a uniquely named sibling `<folder>.zip`.
///
/// Entries are rooted at the folder name and directories are stored as
/// zero-length entries ending in `/`. Links are skipped. A failed run removes
/// its partial archive.
pub fn compress_to_zip(folder: &Path) -> FsResult<PathBuf> {
    if !folder.is_dir() {
        return Err(FsError::NotADirectory {
            path: folder.to_path_buf(),
        });
    }
    let name = source_name(folder)?;
    let parent = folder.parent().ok_or_else(|| FsError::NotFound {
        path: folder.to_path_buf(),
    })?;
    let zip_path = resolve_unique_name(parent, &format!("{name}.zip"));
    ensure_free(&zip_path)?;
    tracing::debug!(folder = %folder.display(), archive = %zip_path.display(), "compress");

    let result = write_archive(folder, &name, &zip_path);
    if result.is_err() {
        let _ = fs::remove_file(&zip_path);
    }
    result.map(|()| zip_path)
}

fn write_archive(folder: &Path, name: &str, zip_path: &Path) -> FsResult<()> {
    let file = File::create(zip_path).map_err(|e| FsError::io(zip_path, e))?;
    let mut writer = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    writer
        .add_directory(format!("{name}/"), options)
        .map_err(|e| FsError::archive(zip_path, e))?;
    zip_folder(&mut writer, folder, name, options, zip_path)?;
    let mut inner = writer.finish().map_err(|e| FsError::archive(zip_path, e))?;
    inner.flush().map_err(|e| FsError::io(zip_path, e))
}

fn zip_folder<W: Write + io::Seek>(
    writer: &mut ZipWriter<W>,
    dir: &Path,
    prefix: &str,
    options: SimpleFileOptions,
    zip_path: &Path,
) -> FsResult<()> {
    let mut entries = fs::read_dir(dir)
        .map_err(|e| FsError::io(dir, e))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| FsError::io(dir, e))?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let entry_path = format!("{prefix}/{}", entry.file_name().to_string_lossy());
        let file_type = entry.file_type().map_err(|e| FsError::io(&path, e))?;

        if file_type.is_symlink() {
            tracing::debug!(path = %path.display(), "skipping link");
        } else if file_type.is_dir() {
            writer
                .add_directory(format!("{entry_path}/"), options)
                .map_err(|e| FsError::archive(zip_path, e))?;
            zip_folder(writer, &path, &entry_path, options, zip_path)?;
        } else {
            let len = entry.metadata().map_err(|e| FsError::io(&path, e))?.len();
            writer
                .start_file(entry_path, options.large_file(len >= u64::from(u32::MAX)))
                .map_err(|e| FsError::archive(zip_path, e))?;
            let mut source = File::open(&path).map_err(|e| FsError::io(&path, e))?;
            io::copy(&mut source, writer).map_err(|e| FsError::io(&path, e))?;
        }
    }

    Ok(())
}

/// Extract `archive` into a uniquely named sibling directory named after it.
///
/// Every entry must resolve inside the target directory. The first entry that
/// escapes aborts the whole extraction, and a failed run removes the target
/// directory it created.
pub fn extract_zip(archive: &Path) -> FsResult<PathBuf> {
    if !is_zip(archive) {
        return Err(FsError::NotAnArchive {
            path: archive.to_path_buf(),
        });
    }
    let parent = archive.parent().ok_or_else(|| FsError::NotFound {
        path: archive.to_path_buf(),
    })?;
    let stem = archive
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let file = File::open(archive).map_err(|e| FsError::io(archive, e))?;
    let mut zip = ZipArchive::new(file).map_err(|e| FsError::archive(archive, e))?;

    let target = resolve_unique_name(parent, &stem);
    ensure_free(&target)?;
    fs::create_dir(&target).map_err(|e| FsError::io(&target, e))?;
    tracing::debug!(archive = %archive.display(), target = %target.display(), "extract");

    let result = fs::canonicalize(&target)
        .map_err(|e| FsError::io(&target, e))
        .and_then(|root| unpack(&mut zip, archive, &root));

    match result {
        Ok(()) => Ok(target),
        Err(e) => {
            if e.is_security_violation() {
                tracing::error!(archive = %archive.display(), "{e}");
            }
            if let Err(cleanup) = try_delete_recursive(&target) {
                tracing::warn!(
                    target = %target.display(),
                    "could not remove partial extraction: {cleanup}"
                );
            }
            Err(e)
        }
    }
}

fn unpack(zip: &mut ZipArchive<File>, archive: &Path, root: &Path) -> FsResult<()> {
    for index in 0..zip.len() {
        let mut entry = zip.by_index(index).map_err(|e| FsError::archive(archive, e))?;
        let name = entry.name().to_owned();
        let out = contained_path(root, &name).ok_or_else(|| FsError::UnsafeArchiveEntry {
            entry: name.clone(),
            target: root.to_path_buf(),
        })?;

        if entry.is_dir() {
            fs::create_dir_all(&out).map_err(|e| FsError::io(&out, e))?;
        } else {
            if let Some(dir) = out.parent() {
                fs::create_dir_all(dir).map_err(|e| FsError::io(dir, e))?;
            }
            let file = File::create(&out).map_err(|e| FsError::io(&out, e))?;
            let mut writer = BufWriter::new(file);
            io::copy(&mut entry, &mut writer).map_err(|e| FsError::io(&out, e))?;
            writer.flush().map_err(|e| FsError::io(&out, e))?;
        }
    }
    Ok(())
}

/// Resolve an entry name under `root` lexically, or `None` if it would escape.
pub fn contained_path(root: &Path, entry_name: &str) -> Option<PathBuf> {
    let mut relative = PathBuf::new();
    for component in Path::new(entry_name).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !relative.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    let resolved = root.join(relative);
    resolved.starts_with(root).then_some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_contained_path() {
        let root = Path::new("/out");
        assert_eq!(contained_path(root, "a/b.txt"), Some(PathBuf::from("/out/a/b.txt")));
        assert_eq!(contained_path(root, "a/../b.txt"), Some(PathBuf::from("/out/b.txt")));
        assert_eq!(contained_path(root, "./a/"), Some(PathBuf::from("/out/a")));
        assert_eq!(contained_path(root, "../evil.txt"), None);
        assert_eq!(contained_path(root, "a/../../evil.txt"), None);
        assert_eq!(contained_path(root, "/etc/passwd"), None);
    }

    #[test]
    fn test_compress_layout() {
        let temp = TempDir::new().unwrap();
        let folder = temp.path().join("docs");
        fs::create_dir_all(folder.join("empty")).unwrap();
        fs::write(folder.join("readme.md"), b"# hi").unwrap();

        let zip_path = compress_to_zip(&folder).unwrap();
        assert_eq!(zip_path, temp.path().join("docs.zip"));

        let mut archive = ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
        let names: Vec<String> = archive.file_names().map(str::to_owned).collect();
        assert!(names.contains(&"docs/".to_string()));
        assert!(names.contains(&"docs/empty/".to_string()));
        assert!(names.contains(&"docs/readme.md".to_string()));

        let empty = archive.by_name("docs/empty/").unwrap();
        assert!(empty.is_dir());
        assert_eq!(empty.size(), 0);
    }

    #[test]
    fn test_compress_resolves_collision() {
        let temp = TempDir::new().unwrap();
        let folder = temp.path().join("docs");
        fs::create_dir(&folder).unwrap();
        fs::write(temp.path().join("docs.zip"), b"not mine").unwrap();

        let zip_path = compress_to_zip(&folder).unwrap();
        assert_eq!(zip_path, temp.path().join("docs(1).zip"));
        assert_eq!(fs::read(temp.path().join("docs.zip")).unwrap(), b"not mine");
    }

    #[test]
    fn test_compress_rejects_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.txt");
        fs::write(&file, b"a").unwrap();
        assert!(matches!(
            compress_to_zip(&file),
            Err(FsError::NotADirectory { .. })
        ));
    }

    #[test]
    fn test_extract_rejects_non_zip() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.tar");
        fs::write(&file, b"a").unwrap();
        assert!(matches!(extract_zip(&file), Err(FsError::NotAnArchive { .. })));
    }

    #[test]
    fn test_extract_corrupt_archive_leaves_nothing() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("broken.zip");
        fs::write(&file, b"definitely not a zip").unwrap();

        assert!(matches!(extract_zip(&file), Err(FsError::Archive { .. })));
        assert!(!temp.path().join("broken").exists());
    }

    #[test]
    fn test_extract_aborts_on_absolute_entry() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("abs.zip");
        let mut writer = ZipWriter::new(File::create(&archive).unwrap());
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        writer.start_file("ok.txt", options).unwrap();
        writer.write_all(b"ok").unwrap();
        writer.start_file("/abs.txt", options).unwrap();
        writer.write_all(b"bad").unwrap();
        writer.finish().unwrap();

        let err = extract_zip(&archive).unwrap_err();
        assert!(err.is_security_violation());
        assert!(!temp.path().join("abs").exists());
    }

    #[test]
    fn test_failed_job_reports_once() {
        let temp = TempDir::new().unwrap();
        let mut job = start_compress(temp.path().join("missing"));
        let complete = job.try_complete().unwrap();
        assert!(!complete.is_success());
        assert_eq!(complete.operation_type, OperationType::Compress);
    }

    fn poll(mut job: ArchiveJob) -> ArchiveComplete {
        for _ in 0..500 {
            if let Some(complete) = job.try_complete() {
                return complete;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        panic!("job did not finish");
    }

    #[test]
    fn test_compress_outside_runtime() {
        let temp = TempDir::new().unwrap();
        let folder = temp.path().join("album");
        fs::create_dir(&folder).unwrap();
        fs::write(folder.join("track.mp3"), b"ID3").unwrap();

        let complete = poll(start_compress(&folder));
        assert!(complete.is_success(), "{:?}", complete.error);
        assert_eq!(complete.output, Some(temp.path().join("album.zip")));

        let complete = poll(start_extract(temp.path().join("album.zip")));
        assert!(complete.is_success(), "{:?}", complete.error);
        assert_eq!(fs::read(temp.path().join("album(1)/album/track.mp3")).unwrap(), b"ID3");
    }

    const LARGE_LEN: u64 = u32::MAX as u64 + 16;

    fn sparse_folder(temp: &TempDir) -> PathBuf {
        let folder = temp.path().join("videos");
        fs::create_dir(&folder).unwrap();
        File::create(folder.join("huge.bin"))
            .unwrap()
            .set_len(LARGE_LEN)
            .unwrap();
        folder
    }

    #[test]
    fn test_compress_file_over_four_gib() {
        let temp = TempDir::new().unwrap();
        let folder = sparse_folder(&temp);

        let zip_path = compress_to_zip(&folder).unwrap();
        let mut archive = ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
        let entry = archive.by_name("videos/huge.bin").unwrap();
        assert_eq!(entry.size(), LARGE_LEN);
    }

    #[test]
    #[ignore = "writes more than 4 GiB to disk"]
    fn test_extract_file_over_four_gib() {
        let temp = TempDir::new().unwrap();
        let folder = sparse_folder(&temp);

        let zip_path = compress_to_zip(&folder).unwrap();
        fs::remove_dir_all(&folder).unwrap();
        let target = extract_zip(&zip_path).unwrap();
        let len = fs::metadata(target.join("videos/huge.bin")).unwrap().len();
        assert_eq!(len, LARGE_LEN);
    }
}
