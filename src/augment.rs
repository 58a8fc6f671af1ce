//! Dataset augmentation through an external time-stretch / pitch-shift tool.
//!
//! Source files follow the `audio_<text>_<variant>.wav` naming used by the
//! speech generation step. Files sharing the `audio_<text>` prefix form a
//! group; every file in a group is rendered once per (tempo, pitch) pair and
//! the results are numbered consecutively from [`FIRST_OUTPUT_INDEX`], so they
//! continue after the original variants.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::EqError;

/// Variant number given to the first rendered file of each group.
pub const FIRST_OUTPUT_INDEX: u32 = 6;

/// Tempo changes (percent) and pitch shifts (semitones) to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AugmentGrid {
    pub tempos: Vec<i32>,
    pub pitches: Vec<i32>,
}

impl Default for AugmentGrid {
    fn default() -> Self {
        Self {
            tempos: (-20..=200).step_by(20).collect(),
            pitches: (-5..=10).step_by(3).collect(),
        }
    }
}

impl AugmentGrid {
    /// Number of renders per source file.
    pub fn combinations(&self) -> usize {
        self.tempos.len() * self.pitches.len()
    }
}

/// Source files sharing one `audio_<text>` prefix, in name order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceGroup {
    pub prefix: String,
    pub files: Vec<PathBuf>,
}

/// Returns the group prefix of an `audio_*_*.wav` file name.
pub fn source_prefix(file_name: &str) -> Option<&str> {
    let stem = file_name.strip_suffix(".wav")?;
    let rest = stem.strip_prefix("audio_")?;
    if !rest.contains('_') {
        return None;
    }
    stem.rsplit_once('_').map(|(prefix, _)| prefix)
}

/// Groups matching paths by prefix. Non-matching paths are ignored.
pub fn group_sources(paths: &[PathBuf]) -> Vec<SourceGroup> {
    let mut groups: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    for path in paths {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(prefix) = source_prefix(name) {
            groups.entry(prefix.to_string()).or_default().push(path.clone());
        }
    }
    groups
        .into_iter()
        .map(|(prefix, mut files)| {
            files.sort();
            SourceGroup { prefix, files }
        })
        .collect()
}

/// Lists `dir` and groups the `audio_*_*.wav` files found there.
pub fn discover_sources(dir: &Path) -> Result<Vec<SourceGroup>, EqError> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| EqError::IoError(format!("{}: {}", dir.display(), e)))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    Ok(group_sources(&paths))
}

/// An external program that renders one tempo/pitch variant of a file.
pub trait StretchTool {
    /// Renders `src` into `dst`. Returns [`EqError::ToolNotFound`] when the
    /// program cannot be launched at all.
    fn render(&mut self, src: &Path, dst: &Path, tempo: i32, pitch: i32) -> Result<(), EqError>;
}

/// Runs the SoundTouch `soundstretch` command-line utility.
#[derive(Debug, Clone)]
pub struct SoundStretch {
    executable: PathBuf,
}

impl SoundStretch {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Arguments passed for one render.
    pub fn args(src: &Path, dst: &Path, tempo: i32, pitch: i32) -> Vec<String> {
        vec![
            src.display().to_string(),
            dst.display().to_string(),
            format!("-tempo={}", tempo),
            format!("-pitch={}", pitch),
        ]
    }
}

impl Default for SoundStretch {
    fn default() -> Self {
        Self::new("soundstretch")
    }
}

impl StretchTool for SoundStretch {
    fn render(&mut self, src: &Path, dst: &Path, tempo: i32, pitch: i32) -> Result<(), EqError> {
        let status = Command::new(&self.executable)
            .args(Self::args(src, dst, tempo, pitch))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    EqError::ToolNotFound(self.executable.display().to_string())
                }
                _ => EqError::IoError(format!("{}: {}", self.executable.display(), e)),
            })?;
        if !status.success() {
            return Err(EqError::ToolFailed(format!(
                "{} exited with {} for {}",
                self.executable.display(),
                status,
                src.display()
            )));
        }
        Ok(())
    }
}

/// Outcome for one source group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupReport {
    pub prefix: String,
    pub created: usize,
    pub failed: usize,
}

impl GroupReport {
    /// Variant number of the last file written, if any.
    pub fn last_index(&self) -> Option<u32> {
        (self.created > 0).then(|| FIRST_OUTPUT_INDEX + self.created as u32 - 1)
    }
}

/// Outcome of a whole augmentation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AugmentReport {
    pub groups: Vec<GroupReport>,
}

impl AugmentReport {
    pub fn total_created(&self) -> usize {
        self.groups.iter().map(|g| g.created).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.groups.iter().map(|g| g.failed).sum()
    }
}

/// Output path for variant `index` of `prefix`.
pub fn output_path(output_dir: &Path, prefix: &str, index: u32) -> PathBuf {
    output_dir.join(format!("{}_{:05}.wav", prefix, index))
}

/// Renders every file of every group over the whole grid into `output_dir`.
///
/// Variant numbers only advance on success, so a failed render leaves no gap.
/// A failed render is logged and skipped; an unlaunchable tool aborts the run.
pub fn run_augmentation(
    groups: &[SourceGroup],
    grid: &AugmentGrid,
    output_dir: &Path,
    tool: &mut dyn StretchTool,
) -> Result<AugmentReport, EqError> {
    std::fs::create_dir_all(output_dir)?;
    let mut report = AugmentReport::default();

    for group in groups {
        log::info!(
            "augmenting group {} ({} file(s), {} render(s) each)",
            group.prefix,
            group.files.len(),
            grid.combinations()
        );
        let mut group_report = GroupReport {
            prefix: group.prefix.clone(),
            created: 0,
            failed: 0,
        };
        let mut next_index = FIRST_OUTPUT_INDEX;

        for src in &group.files {
            for &tempo in &grid.tempos {
                for &pitch in &grid.pitches {
                    let dst = output_path(output_dir, &group.prefix, next_index);
                    match tool.render(src, &dst, tempo, pitch) {
                        Ok(()) => {
                            next_index += 1;
                            group_report.created += 1;
                        }
                        Err(e @ EqError::ToolNotFound(_)) => return Err(e),
                        Err(e) => {
                            log::warn!(
                                "render failed for {} (tempo={}, pitch={}): {}",
                                src.display(),
                                tempo,
                                pitch,
                                e
                            );
                            group_report.failed += 1;
                        }
                    }
                }
            }
        }

        log::info!("group {}: {} file(s) created", group.prefix, group_report.created);
        report.groups.push(group_report);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid() {
        let grid = AugmentGrid::default();
        assert_eq!(grid.tempos.len(), 12);
        assert_eq!(grid.tempos[0], -20);
        assert_eq!(*grid.tempos.last().unwrap(), 200);
        assert_eq!(grid.pitches, vec![-5, -2, 1, 4, 7, 10]);
        assert_eq!(grid.combinations(), 72);
    }

    #[test]
    fn test_source_prefix() {
        assert_eq!(source_prefix("audio_00001_00003.wav"), Some("audio_00001"));
        assert_eq!(source_prefix("audio_a_b_c.wav"), Some("audio_a_b"));
        assert_eq!(source_prefix("audio_00001.wav"), None);
        assert_eq!(source_prefix("audio_00001_00003.mp3"), None);
        assert_eq!(source_prefix("speech_00001_00003.wav"), None);
    }

    #[test]
    fn test_group_sources_sorted() {
        let paths: Vec<PathBuf> = [
            "in/audio_00002_00001.wav",
            "in/audio_00001_00002.wav",
            "in/notes.txt",
            "in/audio_00001_00001.wav",
        ]
        .iter()
        .map(PathBuf::from)
        .collect();
        let groups = group_sources(&paths);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].prefix, "audio_00001");
        assert_eq!(
            groups[0].files,
            vec![
                PathBuf::from("in/audio_00001_00001.wav"),
                PathBuf::from("in/audio_00001_00002.wav")
            ]
        );
        assert_eq!(groups[1].prefix, "audio_00002");
    }

    #[test]
    fn test_output_path_format() {
        let p = output_path(Path::new("out"), "audio_00001", 6);
        assert_eq!(p, PathBuf::from("out/audio_00001_00006.wav"));
    }

    #[test]
    fn test_soundstretch_args() {
        let args = SoundStretch::args(Path::new("a.wav"), Path::new("b.wav"), -20, 4);
        assert_eq!(args, vec!["a.wav", "b.wav", "-tempo=-20", "-pitch=4"]);
    }

    #[test]
    fn test_last_index() {
        let report = GroupReport {
            prefix: "audio_00001".to_string(),
            created: 0,
            failed: 0,
        };
        assert_eq!(report.last_index(), None);
        let report = GroupReport {
            created: 72,
            ..report
        };
        assert_eq!(report.last_index(), Some(77));
    }
}
