//! Output naming and video file discovery helpers

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// Containers the batch walker picks up
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "mkv", "m4v", "webm", "avi"];

/// Prefix of files this tool writes; the batch walker skips them
pub const EDITED_PREFIX: &str = "edited_";

const FALLBACK_EXTENSION: &str = "mp4";

/// Lowercased extension of `path`, or `mp4` when it has none
pub fn container_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string())
}

/// `<output_dir>/edited_<stem>_<YYYYmmdd_HHMMSS>.<ext>`
pub fn default_output_path(input: &Path, output_dir: &Path, now: DateTime<Local>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "video".to_string());
    let file_name = format!(
        "{}{}_{}.{}",
        EDITED_PREFIX,
        stem,
        now.format("%Y%m%d_%H%M%S"),
        container_extension(input)
    );
    output_dir.join(file_name)
}

/// `candidate`, or the first free `<stem>_<n>.<ext>` with n counting from 2
pub fn unique_path(candidate: PathBuf, taken: impl Fn(&Path) -> bool) -> PathBuf {
    if !taken(&candidate) {
        return candidate;
    }
    let stem = candidate
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default();
    let extension = candidate
        .extension()
        .map(|ext| ext.to_string_lossy().to_string());

    let mut n: u32 = 2;
    loop {
        let file_name = match &extension {
            Some(ext) => format!("{}_{}.{}", stem, n, ext),
            None => format!("{}_{}", stem, n),
        };
        let path = candidate.with_file_name(file_name);
        if !taken(&path) {
            return path;
        }
        n += 1;
    }
}

/// `<output stem>_result.json` beside the output
pub fn default_result_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "edit".to_string());
    output.with_file_name(format!("{}_result.json", stem))
}

/// Video container not produced by a previous edit
pub fn is_editable_video(path: &Path) -> bool {
    let known = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false);
    let already_edited = path
        .file_name()
        .map(|name| name.to_string_lossy().starts_with(EDITED_PREFIX))
        .unwrap_or(false);
    known && !already_edited
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_container_extension() {
        assert_eq!(container_extension(Path::new("talk.MOV")), "mov");
        assert_eq!(container_extension(Path::new("talk")), "mp4");
    }

    #[test]
    fn test_default_output_path() {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        let path = default_output_path(Path::new("/rec/demo take.mkv"), Path::new("output"), now);
        assert_eq!(path, PathBuf::from("output/edited_demo take_20240309_070501.mkv"));
    }

    #[test]
    fn test_unique_path_counts_past_taken_names() {
        let taken = [
            PathBuf::from("out/edited_talk.mp4"),
            PathBuf::from("out/edited_talk_2.mp4"),
        ];
        let is_taken = |p: &Path| taken.iter().any(|t| t == p);

        assert_eq!(
            unique_path(PathBuf::from("out/edited_intro.mp4"), is_taken),
            PathBuf::from("out/edited_intro.mp4")
        );
        assert_eq!(
            unique_path(PathBuf::from("out/edited_talk.mp4"), is_taken),
            PathBuf::from("out/edited_talk_3.mp4")
        );
        assert_eq!(
            unique_path(PathBuf::from("out/raw"), |p| p == Path::new("out/raw")),
            PathBuf::from("out/raw_2")
        );
    }

    #[test]
    fn test_default_result_path() {
        assert_eq!(
            default_result_path(Path::new("output/edited_demo.mp4")),
            PathBuf::from("output/edited_demo_result.json")
        );
    }

    #[test]
    fn test_is_editable_video() {
        assert!(is_editable_video(Path::new("a/raw.MP4")));
        assert!(is_editable_video(Path::new("clip.webm")));
        assert!(!is_editable_video(Path::new("notes.txt")));
        assert!(!is_editable_video(Path::new("edited_raw.mp4")));
        assert!(!is_editable_video(Path::new("noext")));
    }
}
