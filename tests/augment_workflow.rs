//! Augmentation planning and runner behavior with a scripted stretch tool.

mod common;

use std::path::{Path, PathBuf};

use common::scratch_dir;
use spectral_eq::augment::{
    discover_sources, output_path, run_augmentation, AugmentGrid, SourceGroup, StretchTool,
    FIRST_OUTPUT_INDEX,
};
use spectral_eq::EqError;

/// Records every call and writes the destination file on success.
#[derive(Default)]
struct FakeTool {
    calls: Vec<(PathBuf, PathBuf, i32, i32)>,
    fail_pitch: Option<i32>,
    missing: bool,
}

impl StretchTool for FakeTool {
    fn render(&mut self, src: &Path, dst: &Path, tempo: i32, pitch: i32) -> Result<(), EqError> {
        if self.missing {
            return Err(EqError::ToolNotFound("fake".to_string()));
        }
        self.calls
            .push((src.to_path_buf(), dst.to_path_buf(), tempo, pitch));
        if self.fail_pitch == Some(pitch) {
            return Err(EqError::ToolFailed(format!("pitch {}", pitch)));
        }
        std::fs::write(dst, b"rendered")?;
        Ok(())
    }
}

fn small_grid() -> AugmentGrid {
    AugmentGrid {
        tempos: vec![-20, 0],
        pitches: vec![-5, 1, 7],
    }
}

fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"RIFF").unwrap();
    path
}

#[test]
fn test_discover_groups_sorted_sources() {
    let dir = scratch_dir("augment_discover");
    touch(&dir, "audio_00002_00001.wav");
    touch(&dir, "audio_00001_00003.wav");
    touch(&dir, "audio_00001_00001.wav");
    touch(&dir, "notes.txt");
    touch(&dir, "audio_orphan.wav");
    std::fs::create_dir_all(dir.join("audio_00009_00001.wav")).unwrap();

    let groups = discover_sources(&dir).unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].prefix, "audio_00001");
    let names: Vec<_> = groups[0]
        .files
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["audio_00001_00001.wav", "audio_00001_00003.wav"]);
    assert_eq!(groups[1].prefix, "audio_00002");
    assert_eq!(groups[1].files.len(), 1);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_discover_missing_directory() {
    let dir = std::env::temp_dir().join("spectral_eq_no_such_source_dir");
    assert!(matches!(discover_sources(&dir), Err(EqError::IoError(_))));
}

#[test]
fn test_run_numbers_outputs_consecutively() {
    let src_dir = scratch_dir("augment_run_src");
    let out_dir = scratch_dir("augment_run_out").join("nested");
    let a = touch(&src_dir, "audio_00001_00001.wav");
    let b = touch(&src_dir, "audio_00001_00002.wav");
    let groups = vec![SourceGroup {
        prefix: "audio_00001".to_string(),
        files: vec![a.clone(), b],
    }];

    let mut tool = FakeTool::default();
    let report = run_augmentation(&groups, &small_grid(), &out_dir, &mut tool).unwrap();

    assert_eq!(report.total_created(), 12);
    assert_eq!(report.total_failed(), 0);
    assert_eq!(report.groups[0].last_index(), Some(FIRST_OUTPUT_INDEX + 11));
    assert_eq!(tool.calls.len(), 12);

    // Tempo is the outer loop, pitch the inner one
    assert_eq!(tool.calls[0].0, a);
    assert_eq!((tool.calls[0].2, tool.calls[0].3), (-20, -5));
    assert_eq!((tool.calls[1].2, tool.calls[1].3), (-20, 1));
    assert_eq!((tool.calls[3].2, tool.calls[3].3), (0, -5));

    for index in FIRST_OUTPUT_INDEX..FIRST_OUTPUT_INDEX + 12 {
        assert!(output_path(&out_dir, "audio_00001", index).is_file());
    }
    assert!(out_dir.join("audio_00001_00006.wav").is_file());
    assert!(out_dir.join("audio_00001_00017.wav").is_file());
    assert!(!out_dir.join("audio_00001_00018.wav").exists());

    let _ = std::fs::remove_dir_all(&src_dir);
    let _ = std::fs::remove_dir_all(out_dir.parent().unwrap());
}

#[test]
fn test_failed_renders_do_not_consume_indices() {
    let out_dir = scratch_dir("augment_failures");
    let groups = vec![
        SourceGroup {
            prefix: "audio_00001".to_string(),
            files: vec![PathBuf::from("audio_00001_00001.wav")],
        },
        SourceGroup {
            prefix: "audio_00002".to_string(),
            files: vec![PathBuf::from("audio_00002_00001.wav")],
        },
    ];

    let mut tool = FakeTool {
        fail_pitch: Some(1),
        ..FakeTool::default()
    };
    let report = run_augmentation(&groups, &small_grid(), &out_dir, &mut tool).unwrap();

    assert_eq!(report.groups.len(), 2);
    for group in &report.groups {
        assert_eq!(group.created, 4);
        assert_eq!(group.failed, 2);
        assert_eq!(group.last_index(), Some(FIRST_OUTPUT_INDEX + 3));
    }
    assert_eq!(report.total_failed(), 4);

    // The failed render's slot is reused by the next successful one
    assert_eq!(tool.calls[0].1, output_path(&out_dir, "audio_00001", 6));
    assert_eq!(tool.calls[1].1, output_path(&out_dir, "audio_00001", 7));
    assert_eq!(tool.calls[2].1, output_path(&out_dir, "audio_00001", 7));

    // Each group restarts its numbering
    let second_group_first = tool
        .calls
        .iter()
        .find(|c| c.0 == Path::new("audio_00002_00001.wav"))
        .unwrap();
    assert_eq!(second_group_first.1, output_path(&out_dir, "audio_00002", 6));

    let _ = std::fs::remove_dir_all(&out_dir);
}

#[test]
fn test_missing_tool_aborts_run() {
    let out_dir = scratch_dir("augment_missing_tool");
    let groups = vec![SourceGroup {
        prefix: "audio_00001".to_string(),
        files: vec![PathBuf::from("audio_00001_00001.wav")],
    }];
    let mut tool = FakeTool {
        missing: true,
        ..FakeTool::default()
    };
    let result = run_augmentation(&groups, &small_grid(), &out_dir, &mut tool);
    assert_eq!(result, Err(EqError::ToolNotFound("fake".to_string())));

    let _ = std::fs::remove_dir_all(&out_dir);
}

#[test]
fn test_empty_group_list() {
    let out_dir = scratch_dir("augment_empty");
    let mut tool = FakeTool::default();
    let report = run_augmentation(&[], &AugmentGrid::default(), &out_dir, &mut tool).unwrap();
    assert!(report.groups.is_empty());
    assert!(tool.calls.is_empty());
    let _ = std::fs::remove_dir_all(&out_dir);
}
