//! Classifier and rewriter against fake ffprobe / ffmpeg shell scripts.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use tempfile::TempDir;
use vid_faststart::{AspectRatio, MediaTools, PrepError};

struct Fixtures {
    dir: TempDir,
}

impl Fixtures {
    fn tool(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn args_of(&self, name: &str) -> Vec<String> {
        let recorded = fs::read_to_string(self.dir.path().join(format!("{}.args", name)))
            .expect("fake tool did not record its arguments");
        recorded.lines().map(str::to_string).collect()
    }
}

fn write_script(dir: &Path, name: &str, body: &str) {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn probe_script(json: &str) -> String {
    format!(
        "printf '%s\\n' \"$@\" > \"$0.args\"\necho 'ffprobe banner' >&2\nprintf '%s' '{}'",
        json
    )
}

/// Every script is written before any test spawns a process, so no child
/// can inherit a script file still open for writing (ETXTBSY).
fn fixtures() -> &'static Fixtures {
    static FIXTURES: OnceLock<Fixtures> = OnceLock::new();
    FIXTURES.get_or_init(|| {
        let dir = TempDir::new().unwrap();
        let d = dir.path();

        write_script(d, "probe_landscape", &probe_script(r#"{"streams":[{"index":0,"codec_type":"video","width":1920,"height":1080}]}"#));
        write_script(d, "probe_landscape_json", &probe_script(r#"{"streams":[{"width":1920,"height":1080}]}"#));
        write_script(d, "probe_portrait", &probe_script(r#"{"streams":[{"width":1080,"height":1920}]}"#));
        write_script(d, "probe_square", &probe_script(r#"{"streams":[{"width":1000,"height":1000}]}"#));
        write_script(d, "probe_prepare", &probe_script(r#"{"streams":[{"width":720,"height":1280}]}"#));
        write_script(d, "probe_empty", &probe_script(r#"{"streams":[]}"#));
        write_script(d, "probe_zero_width", &probe_script(r#"{"streams":[{"width":0,"height":1080}]}"#));
        write_script(d, "probe_garbage", "echo 'this is not json'");
        write_script(d, "probe_fails", "printf '%s' '{\"streams\":[{\"width\":1920,\"height\":1080}]}'\necho 'clip.mp4: No such file or directory' >&2\nexit 1");

        // records its arguments and creates the output file (last argument)
        write_script(
            d,
            "ffmpeg_ok",
            "printf '%s\\n' \"$@\" > \"$0.args\"\nfor last; do :; done\necho 'Stream mapping: copy' >&2\n: > \"$last\"",
        );
        write_script(
            d,
            "ffmpeg_prepare",
            "printf '%s\\n' \"$@\" > \"$0.args\"\nfor last; do :; done\n: > \"$last\"",
        );
        // writes a partial file then fails
        write_script(
            d,
            "ffmpeg_fails",
            "for last; do :; done\necho partial > \"$last\"\necho 'Error opening output file' >&2\nexit 1",
        );
        // must never run
        write_script(d, "ffmpeg_unreachable", "touch \"$0.ran\"\nexit 0");

        Fixtures { dir }
    })
}

fn probe_with(name: &str) -> MediaTools {
    MediaTools::new().with_ffprobe(fixtures().tool(name))
}

#[test]
fn classifies_landscape_and_passes_probe_arguments() {
    let fx = fixtures();
    let tools = probe_with("probe_landscape");

    let ratio = tools.classify_aspect_ratio("/videos/clip.mp4").unwrap();
    assert_eq!(ratio, AspectRatio::Landscape);
    assert_eq!(
        fx.args_of("probe_landscape"),
        ["-v", "error", "-print_format", "json", "-show_streams", "/videos/clip.mp4"]
    );
}

#[test]
fn classifies_portrait_and_other() {
    assert_eq!(
        probe_with("probe_portrait")
            .classify_aspect_ratio("clip.mp4")
            .unwrap(),
        AspectRatio::Portrait
    );
    assert_eq!(
        probe_with("probe_square")
            .classify_aspect_ratio("clip.mp4")
            .unwrap(),
        AspectRatio::Other
    );
}

#[test]
fn empty_stream_list_is_no_streams_found() {
    let result = probe_with("probe_empty").classify_aspect_ratio("clip.mp4");
    assert!(matches!(result, Err(PrepError::NoStreamsFound)));
}

#[test]
fn zero_width_is_invalid_dimensions() {
    let err = probe_with("probe_zero_width")
        .classify_aspect_ratio("clip.mp4")
        .unwrap_err();
    assert!(matches!(
        err,
        PrepError::InvalidDimensions {
            width: 0,
            height: 1080
        }
    ));
    assert_eq!(err.to_string(), "invalid dimensions in video file: 0x1080");
}

#[test]
fn non_json_output_is_parse_error() {
    let result = probe_with("probe_garbage").classify_aspect_ratio("clip.mp4");
    assert!(matches!(result, Err(PrepError::ProbeOutputParse(_))));
}

#[test]
fn non_zero_probe_exit_is_execution_error() {
    // valid JSON on stdout does not rescue a failed run
    let err = probe_with("probe_fails")
        .classify_aspect_ratio("clip.mp4")
        .unwrap_err();
    match err {
        PrepError::ProbeExecution(cause) => assert_eq!(cause.exit_code(), Some(1)),
        other => panic!("expected ProbeExecution, got {:?}", other),
    }
}

#[test]
fn rewrite_writes_processing_file() {
    let fx = fixtures();
    let work = TempDir::new().unwrap();
    let input = work.path().join("clip.mp4");
    fs::write(&input, b"not really a video").unwrap();

    let tools = MediaTools::new().with_ffmpeg(fx.tool("ffmpeg_ok"));
    let output = tools.rewrite_for_fast_start(&input).unwrap();

    assert_eq!(output, work.path().join("clip.mp4.processing"));
    assert!(output.exists());
    let input_str = input.to_str().unwrap();
    let output_str = output.to_str().unwrap();
    assert_eq!(
        fx.args_of("ffmpeg_ok"),
        ["-i", input_str, "-c", "copy", "-f", "mp4", "-movflags", "faststart", output_str]
    );
}

#[test]
fn rewrite_failure_keeps_partial_output() {
    let fx = fixtures();
    let work = TempDir::new().unwrap();
    let input = work.path().join("clip.mp4");

    let tools = MediaTools::new().with_ffmpeg(fx.tool("ffmpeg_fails"));
    let err = tools.rewrite_for_fast_start(&input).unwrap_err();

    match err {
        PrepError::TranscodeExecution(cause) => assert_eq!(cause.exit_code(), Some(1)),
        other => panic!("expected TranscodeExecution, got {:?}", other),
    }
    assert!(work.path().join("clip.mp4.processing").exists());
}

#[test]
fn prepare_classifies_then_rewrites() {
    let fx = fixtures();
    let work = TempDir::new().unwrap();
    let input = work.path().join("vertical.mov");

    let tools = MediaTools::new()
        .with_ffprobe(fx.tool("probe_prepare"))
        .with_ffmpeg(fx.tool("ffmpeg_prepare"));
    let report = tools.prepare(&input).unwrap();

    assert_eq!(report.input, input);
    assert_eq!(report.aspect_ratio, AspectRatio::Portrait);
    assert_eq!(report.prefix, "portrait/");
    assert_eq!(report.output, work.path().join("vertical.mov.processing"));
    assert!(report.output.exists());
}

#[test]
fn prepare_does_not_rewrite_unclassifiable_video() {
    let fx = fixtures();
    let tools = MediaTools::new()
        .with_ffprobe(fx.tool("probe_empty"))
        .with_ffmpeg(fx.tool("ffmpeg_unreachable"));

    let result = tools.prepare("clip.mp4");
    assert!(matches!(result, Err(PrepError::NoStreamsFound)));
    assert!(!fx.tool("ffmpeg_unreachable.ran").exists());
}

#[test]
fn cli_prints_prefix_and_label() {
    let fx = fixtures();
    let logs = TempDir::new().unwrap();
    let bin = env!("CARGO_BIN_EXE_vid-faststart");

    let out = Command::new(bin)
        .args(["--log-dir"])
        .arg(logs.path())
        .args(["prefix", "9:16"])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "portrait/");

    let out = Command::new(bin)
        .args(["--log-dir"])
        .arg(logs.path())
        .arg("--ffprobe")
        .arg(fx.tool("probe_square"))
        .args(["classify", "clip.mp4"])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "other");

    let out = Command::new(bin)
        .env_remove("RUST_LOG")
        .args(["--log-dir"])
        .arg(logs.path())
        .arg("--ffprobe")
        .arg(fx.tool("probe_empty"))
        .args(["classify", "clip.mp4"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert_eq!(stderr.matches("no streams found").count(), 1, "stderr: {}", stderr);
}

#[test]
fn cli_json_output_accepts_non_utf8_file_name() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let fx = fixtures();
    let logs = TempDir::new().unwrap();
    let input = OsStr::from_bytes(b"clip\xff.mp4");

    let out = Command::new(env!("CARGO_BIN_EXE_vid-faststart"))
        .args(["--log-dir"])
        .arg(logs.path())
        .arg("--ffprobe")
        .arg(fx.tool("probe_landscape_json"))
        .arg("classify")
        .arg(input)
        .args(["-o", "json"])
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["aspect_ratio"], "16:9");
    assert_eq!(json["prefix"], "landscape/");
    assert_eq!(json["input"], "clip\u{FFFD}.mp4");
}
