use async_trait::async_trait;
use log::info;
use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

use super::{AudioToolkit, CompositionJob, Compositor, run_tool};
use crate::app_config::{RenderConfig, SubtitleConfig};
use crate::errors::ToolError;
use crate::subtitles::TrackFormat;

// @module: ffmpeg/ffprobe backed audio and video operations

/// Escape a path for use as a filter option value inside `-filter_complex`.
///
/// Backslashes become forward slashes; `:` and `'` are escaped for both the
/// option and the graph level; graph separators are backslash-escaped.
pub fn escape_filter_path(path: &Path) -> String {
    let mut escaped = String::new();
    for c in path.to_string_lossy().chars() {
        match c {
            '\\' => escaped.push('/'),
            ':' => escaped.push_str("\\\\:"),
            '\'' => escaped.push_str("\\\\\\'"),
            ',' | ';' | '[' | ']' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Parse ffprobe's bare `format=duration` output
pub fn parse_probe_duration(tool: &str, stdout: &str) -> Result<f64, ToolError> {
    let value = stdout.trim();
    match value.parse::<f64>() {
        Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => Ok(seconds),
        _ => Err(ToolError::InvalidOutput {
            tool: tool.to_string(),
            message: format!("unparsable duration {:?}", value),
        }),
    }
}

/// Audio concatenation with ffmpeg and duration probing with ffprobe
#[derive(Debug, Clone)]
pub struct FfmpegAudio {
    ffmpeg: String,
    ffprobe: String,
    timeout: Duration,
}

impl FfmpegAudio {
    pub fn new(ffmpeg: &str, ffprobe: &str, timeout: Duration) -> Self {
        Self {
            ffmpeg: ffmpeg.to_string(),
            ffprobe: ffprobe.to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl AudioToolkit for FfmpegAudio {
    async fn concatenate(&self, first: &Path, second: &Path, output: &Path) -> Result<(), ToolError> {
        let mut command = Command::new(&self.ffmpeg);
        command
            .args(["-y", "-loglevel", "error", "-i"])
            .arg(first)
            .arg("-i")
            .arg(second)
            .args([
                "-filter_complex",
                "[0:a][1:a]concat=n=2:v=0:a=1[aout]",
                "-map",
                "[aout]",
            ])
            .arg(output);

        run_tool(command, &self.ffmpeg, self.timeout).await?;
        info!("Narration saved as {:?}", output);
        Ok(())
    }

    async fn duration(&self, clip: &Path) -> Result<f64, ToolError> {
        let mut command = Command::new(&self.ffprobe);
        command
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(clip);

        let output = run_tool(command, &self.ffprobe, self.timeout).await?;
        parse_probe_duration(&self.ffprobe, &String::from_utf8_lossy(&output.stdout))
    }
}

/// Final video rendering with a fixed ffmpeg filter graph
#[derive(Debug, Clone)]
pub struct FfmpegCompositor {
    ffmpeg: String,
    timeout: Duration,
    render: RenderConfig,
    style: SubtitleConfig,
}

impl FfmpegCompositor {
    pub fn new(ffmpeg: &str, timeout: Duration, render: RenderConfig, style: SubtitleConfig) -> Self {
        Self {
            ffmpeg: ffmpeg.to_string(),
            timeout,
            render,
            style,
        }
    }

    /// Background cover-scale and crop, centred title overlay limited to the
    /// title window, then burnt-in subtitles
    pub fn build_filter_graph(&self, job: &CompositionJob) -> String {
        let w = self.render.width;
        let h = self.render.height;
        let ow = self.render.overlay_max_width;

        let mut subtitles = format!(
            "subtitles=filename={}:fontsdir={}",
            escape_filter_path(&job.subtitles),
            escape_filter_path(&job.fonts_dir)
        );
        if job.subtitle_format == TrackFormat::Srt {
            subtitles.push_str(&format!(":force_style='{}'", self.style.force_style()));
        }

        format!(
            "[0:v]scale=iw*max({w}/iw\\,{h}/ih):ih*max({w}/iw\\,{h}/ih),crop={w}:{h}[v0];\
             [2:v]scale=iw*min({ow}/iw\\,1):ih*min({ow}/iw\\,1)[v2];\
             [v0][v2]overlay=(main_w-overlay_w)/2:(main_h-overlay_h)/2:enable='between(t,0,{cutoff:.3})':format=auto[vout];\
             [vout]{subtitles}[vfinal]",
            cutoff = job.title_cutoff.max(0.0),
        )
    }

    /// Full ffmpeg argument list for a job
    pub fn build_args(&self, job: &CompositionJob) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-y", "-loglevel", "error", "-i"]
            .iter()
            .map(OsString::from)
            .collect();
        args.push(job.background.clone().into_os_string());
        args.push("-i".into());
        args.push(job.narration.clone().into_os_string());
        args.push("-i".into());
        args.push(job.title_image.clone().into_os_string());

        let graph = self.build_filter_graph(job);
        let sample_rate = self.render.sample_rate.to_string();
        let tail: [&str; 18] = [
            "-filter_complex",
            graph.as_str(),
            "-map",
            "[vfinal]",
            "-map",
            "1:a",
            "-shortest",
            "-c:v",
            self.render.video_codec.as_str(),
            "-c:a",
            self.render.audio_codec.as_str(),
            "-b:a",
            self.render.audio_bitrate.as_str(),
            "-ar",
            sample_rate.as_str(),
            "-pix_fmt",
            self.render.pixel_format.as_str(),
            "-movflags",
        ];
        args.extend(tail.iter().map(OsString::from));
        args.push("+faststart".into());
        args.push(job.output.clone().into_os_string());
        args
    }
}

#[async_trait]
impl Compositor for FfmpegCompositor {
    async fn compose(&self, job: &CompositionJob) -> Result<(), ToolError> {
        let mut command = Command::new(&self.ffmpeg);
        command.args(self.build_args(job));

        run_tool(command, &self.ffmpeg, self.timeout).await?;
        info!("Final video saved as {:?}", job.output);
        Ok(())
    }
}
