//! File intake: validate a dropped or typed path and swap the loaded resource

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::ResourceId;
use super::AppController;

/// Bytes read from the head of a file for media type sniffing
const SNIFF_LEN: u64 = 8192;

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("no file path given")]
    EmptyPath,
    #[error("file not found: {0}")]
    NotFound(PathBuf),
    #[error("not a regular file: {0}")]
    NotAFile(PathBuf),
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{name} is not an audio file (detected {})", .detected.as_deref().unwrap_or("unknown type"))]
    NotAudio {
        name: String,
        detected: Option<String>,
    },
}

impl IntakeError {
    /// Title and description for the rejection notification
    pub fn user_message(&self) -> (&'static str, String) {
        match self {
            IntakeError::NotAudio { .. } => (
                "Invalid file type",
                "Please upload an audio file (.mp3, .wav, etc.).".to_string(),
            ),
            IntakeError::EmptyPath => ("No file selected", "Type or drop the path of an audio file.".to_string()),
            IntakeError::NotFound(path) => ("File not found", path.display().to_string()),
            IntakeError::NotAFile(path) => ("Not a file", path.display().to_string()),
            IntakeError::Io { path, source } => ("Cannot read file", format!("{}: {}", path.display(), source)),
        }
    }
}

/// A file that passed validation
#[derive(Debug, Clone)]
pub struct InspectedFile {
    pub name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub mime_type: String,
}

/// Turn what a terminal pastes for a dropped file into a plain path.
///
/// Handles surrounding quotes, `file://` URIs and backslash-escaped spaces.
pub fn normalize_dropped_path(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = ['\'', '"']
        .iter()
        .find_map(|q| trimmed.strip_prefix(*q).and_then(|s| s.strip_suffix(*q)))
        .unwrap_or(trimmed);
    let without_scheme = unquoted.strip_prefix("file://").unwrap_or(unquoted);

    let mut out = String::with_capacity(without_scheme.len());
    let mut chars = without_scheme.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next == ' ' || next == '\'' || next == '"' || next == '(' || next == ')' {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// Accept only files whose content sniffs as `audio/*`.
pub fn inspect_file(path: &Path) -> Result<InspectedFile, IntakeError> {
    let metadata = std::fs::metadata(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            IntakeError::NotFound(path.to_path_buf())
        } else {
            IntakeError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    if !metadata.is_file() {
        return Err(IntakeError::NotAFile(path.to_path_buf()));
    }

    let io_err = |source| IntakeError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut head = Vec::with_capacity(SNIFF_LEN as usize);
    File::open(path)
        .map_err(io_err)?
        .take(SNIFF_LEN)
        .read_to_end(&mut head)
        .map_err(io_err)?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    match infer::get(&head) {
        Some(kind) if kind.matcher_type() == infer::MatcherType::Audio => Ok(InspectedFile {
            name,
            path: path.to_path_buf(),
            size_bytes: metadata.len(),
            mime_type: kind.mime_type().to_string(),
        }),
        other => Err(IntakeError::NotAudio {
            name,
            detected: other.map(|k| k.mime_type().to_string()),
        }),
    }
}

impl AppController {
    /// Submit whatever is in the upload field.
    pub async fn submit_path_input(&self) -> Result<ResourceId, IntakeError> {
        let raw = self.model.lock().await.take_path_input();
        self.load_file(&raw).await
    }

    /// Validate `raw` and, on success, make it the active resource.
    ///
    /// A rejected file leaves every piece of state untouched apart from the
    /// notification.
    pub async fn load_file(&self, raw: &str) -> Result<ResourceId, IntakeError> {
        let normalized = normalize_dropped_path(raw);
        let inspected = if normalized.is_empty() {
            Err(IntakeError::EmptyPath)
        } else {
            inspect_file(Path::new(&normalized))
        };

        let inspected = match inspected {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(path = %normalized, error = %e, "Upload rejected");
                let (title, description) = e.user_message();
                self.model.lock().await.notify_error(title, description);
                return Err(e);
            }
        };

        let mut model = self.model.lock().await;
        let (resource, previous) = model.replace_resource(
            inspected.name,
            &inspected.path,
            inspected.size_bytes,
            inspected.mime_type,
        );
        if let Some(previous) = previous {
            tracing::debug!(resource = %previous.id, url = %previous.url, "Released previous resource");
        }

        // Every timer of the old resource ends here
        let scope = self.scheduler.begin(resource.id);
        self.stop_animation();

        model.notify_success(
            "File uploaded successfully",
            format!("{} ({:.2} MB)", resource.name, resource.size_mb()),
        );

        {
            let mut backend = self.audio_backend.lock().await;
            match backend.load(&resource) {
                Ok(info) => {
                    model.set_duration(resource.id, info.duration.unwrap_or(0.0));
                }
                Err(e) => {
                    model.notify_error("Cannot decode audio", Self::format_error(&e));
                }
            }
            backend.set_volume(model.playback().effective_volume());
        }
        drop(model);

        self.spawn_visuals(&scope, &resource).await;
        self.start_media_listener(&scope);

        Ok(resource.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::write_wav;

    #[test]
    fn test_normalize_strips_quotes_and_scheme() {
        assert_eq!(normalize_dropped_path("  '/tmp/a b.mp3'  "), "/tmp/a b.mp3");
        assert_eq!(normalize_dropped_path("\"/tmp/a.mp3\"\n"), "/tmp/a.mp3");
        assert_eq!(normalize_dropped_path("file:///tmp/a.mp3"), "/tmp/a.mp3");
        assert_eq!(normalize_dropped_path("/tmp/my\\ song\\ \\(live\\).wav"), "/tmp/my song (live).wav");
        assert_eq!(normalize_dropped_path("C:\\Music\\a.wav"), "C:\\Music\\a.wav");
    }

    #[test]
    fn test_inspect_accepts_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        write_wav(&path, 1);

        let file = inspect_file(&path).unwrap();
        assert_eq!(file.name, "tone.wav");
        assert!(file.mime_type.starts_with("audio/"));
        assert!(file.size_bytes > 0);
    }

    #[test]
    fn test_inspect_rejects_text_even_with_audio_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.mp3");
        std::fs::write(&path, "just some text").unwrap();

        let err = inspect_file(&path).unwrap_err();
        assert!(matches!(err, IntakeError::NotAudio { detected: None, .. }));
        assert_eq!(err.user_message().0, "Invalid file type");
    }

    #[test]
    fn test_inspect_rejects_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0]).unwrap();

        match inspect_file(&path).unwrap_err() {
            IntakeError::NotAudio { detected, .. } => assert_eq!(detected.as_deref(), Some("image/png")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_inspect_missing_and_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            inspect_file(&dir.path().join("missing.wav")),
            Err(IntakeError::NotFound(_))
        ));
        assert!(matches!(inspect_file(dir.path()), Err(IntakeError::NotAFile(_))));
    }
}
