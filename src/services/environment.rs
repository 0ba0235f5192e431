//! Collecting the [`EnvironmentFacts`] configurations are matched against.
//!
//! [`SystemProbe`] queries the machine through external tools:
//!
//! - VRAM: `nvidia-smi`, then the amdgpu sysfs counters on Linux or
//!   `Win32_VideoController` through PowerShell on Windows
//! - Screen resolution: `xrandr` on Linux, `Win32_VideoController` on Windows
//! - Language: `LC_ALL` / `LC_MESSAGES` / `LANG`, then `Get-Culture` on Windows
//!
//! Every query degrades to "unknown" (`0` / empty string) instead of failing.
//! [`Overrides`] replace individual facts, e.g. from the command line.

use crate::models::{EnvironmentFacts, screen_ratio};
use regex::Regex;
use std::fs;
use std::process::Command;

/// Source of machine facts.
#[cfg_attr(test, mockall::automock)]
pub trait EnvironmentProbe {
    /// Total VRAM in whole gigabytes, `0` if unknown.
    fn vram_gb(&self) -> u32;

    /// Screen aspect ratio as `"<x>:<y>"`, empty if unknown.
    fn aspect_ratio(&self) -> String;

    /// Two-letter language code, empty if unknown.
    fn system_language(&self) -> String;
}

/// Facts that replace probed values when set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub vram_gb: Option<u32>,
    pub aspect_ratio: Option<String>,
    pub system_language: Option<String>,
}

/// Gather facts from `probe`, skipping any query an override answers.
pub fn collect_facts(probe: &dyn EnvironmentProbe, overrides: &Overrides) -> EnvironmentFacts {
    let vram_gb = overrides.vram_gb.unwrap_or_else(|| probe.vram_gb());
    let aspect_ratio = overrides
        .aspect_ratio
        .clone()
        .unwrap_or_else(|| probe.aspect_ratio());
    let system_language = overrides
        .system_language
        .clone()
        .unwrap_or_else(|| probe.system_language());

    EnvironmentFacts {
        vram_gb,
        aspect_ratio,
        system_language,
    }
}

/// Probe backed by the operating system and vendor tools.
pub struct SystemProbe {
    /// Matches `current 2560 x 1440` in `xrandr` output.
    xrandr_pattern: Regex,

    /// Matches a `<width>x<height>` resolution string.
    resolution_pattern: Regex,
}

impl SystemProbe {
    pub fn new() -> Self {
        Self {
            xrandr_pattern: Regex::new(r"current\s+(\d+)\s*x\s*(\d+)").expect("Invalid xrandr regex"),
            resolution_pattern: Regex::new(r"^\s*(\d+)\s*[xX]\s*(\d+)\s*$").expect("Invalid resolution regex"),
        }
    }

    /// Parse `<width>x<height>`, e.g. `2560x1440`.
    pub fn parse_resolution(&self, value: &str) -> Option<(u32, u32)> {
        let caps = self.resolution_pattern.captures(value)?;
        Some((caps[1].parse().ok()?, caps[2].parse().ok()?))
    }

    /// Extract the current screen size from `xrandr --current` output.
    pub fn parse_xrandr(&self, output: &str) -> Option<(u32, u32)> {
        let caps = self.xrandr_pattern.captures(output)?;
        Some((caps[1].parse().ok()?, caps[2].parse().ok()?))
    }

    fn screen_resolution(&self) -> Option<(u32, u32)> {
        if cfg!(target_os = "windows") {
            let width = run_powershell("(Get-CimInstance Win32_VideoController | Select-Object -First 1).CurrentHorizontalResolution")?;
            let height = run_powershell("(Get-CimInstance Win32_VideoController | Select-Object -First 1).CurrentVerticalResolution")?;
            Some((width.trim().parse().ok()?, height.trim().parse().ok()?))
        } else {
            let output = run_command("xrandr", &["--current"])?;
            self.parse_xrandr(&output)
        }
    }
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvironmentProbe for SystemProbe {
    fn vram_gb(&self) -> u32 {
        if let Some(vram) = run_command(
            "nvidia-smi",
            &["--query-gpu=memory.total", "--format=csv,nounits,noheader"],
        )
        .and_then(|output| parse_nvidia_smi(&output))
        {
            return vram;
        }

        let fallback = if cfg!(target_os = "windows") {
            run_powershell("[math]::Round((Get-CimInstance Win32_VideoController).AdapterRAM / 1GB)")
                .and_then(|output| parse_first_number(&output))
        } else {
            amdgpu_vram_gb()
        };

        fallback.unwrap_or_else(|| {
            tracing::error!("Error during querying VRAM: no supported GPU query succeeded");
            0
        })
    }

    fn aspect_ratio(&self) -> String {
        match self.screen_resolution() {
            Some((width, height)) => screen_ratio(width, height),
            None => {
                tracing::warn!("Could not determine screen resolution");
                String::new()
            }
        }
    }

    fn system_language(&self) -> String {
        for var in ["LC_ALL", "LC_MESSAGES", "LANG"] {
            if let Some(language) = std::env::var(var).ok().and_then(|v| language_from_locale(&v)) {
                return language;
            }
        }

        if cfg!(target_os = "windows") {
            if let Some(language) = run_powershell("(Get-Culture).Name").and_then(|v| language_from_locale(&v)) {
                return language;
            }
        }

        String::new()
    }
}

/// First GPU's total memory from `nvidia-smi` (MiB) converted to whole GB.
pub fn parse_nvidia_smi(output: &str) -> Option<u32> {
    let mib: u32 = output.lines().next()?.trim().parse().ok()?;
    Some(mib / 1024)
}

/// Language code from a locale such as `pl_PL.UTF-8` or `en-US`.
///
/// `C` and `POSIX` carry no language and yield `None`.
pub fn language_from_locale(locale: &str) -> Option<String> {
    let language = locale
        .trim()
        .split(['_', '-', '.', '@'])
        .next()
        .unwrap_or_default();

    if language.is_empty() || language == "C" || language == "POSIX" {
        None
    } else {
        Some(language.to_string())
    }
}

fn parse_first_number(output: &str) -> Option<u32> {
    output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())?
        .parse()
        .ok()
}

/// Largest `mem_info_vram_total` of the DRM cards, in whole GB.
fn amdgpu_vram_gb() -> Option<u32> {
    let cards = fs::read_dir("/sys/class/drm").ok()?;
    cards
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| fs::read_to_string(entry.path().join("device/mem_info_vram_total")).ok())
        .filter_map(|bytes| bytes.trim().parse::<u64>().ok())
        .max()
        .and_then(|bytes| u32::try_from(bytes / (1024 * 1024 * 1024)).ok())
}

fn run_powershell(script: &str) -> Option<String> {
    run_command("powershell", &["-NoProfile", "-Command", script])
}

/// Run `program` and return its stdout if it exits successfully.
fn run_command(program: &str, args: &[&str]) -> Option<String> {
    match Command::new(program).args(args).output() {
        Ok(output) if output.status.success() => {
            let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if stdout.is_empty() { None } else { Some(stdout) }
        }
        Ok(output) => {
            tracing::debug!("{} exited with {}", program, output.status);
            None
        }
        Err(e) => {
            tracing::debug!("Failed to run {}: {}", program, e);
            None
        }
    }
}
