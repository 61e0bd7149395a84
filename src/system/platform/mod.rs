use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug)]
pub struct IoStats {
    pub read_bytes: u64,
    pub write_bytes: u64,
}

pub trait PlatformExtensions {
    /// Human readable description baked into the executable, if the
    /// platform has such a thing.
    fn file_description(path: &Path) -> Option<String>;
    /// Directory holding OS binaries; processes running from it are protected.
    fn system_directory() -> Option<PathBuf>;
    fn process_priority(pid: u32) -> Option<i32>;
    fn process_io(pid: u32) -> Option<IoStats>;
    /// Whether a working set of 0 means the memory counters could not be
    /// opened rather than that the process really holds no pages.
    fn zero_working_set_is_unreadable() -> bool;
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(target_os = "macos")]
use macos as platform_impl;
#[cfg(target_os = "windows")]
use windows as platform_impl;

pub fn file_description(path: &Path) -> Option<String> {
    platform_impl::Platform::file_description(path)
}

pub fn system_directory() -> Option<PathBuf> {
    platform_impl::Platform::system_directory()
}

pub fn process_priority(pid: u32) -> Option<i32> {
    platform_impl::Platform::process_priority(pid)
}

pub fn process_io(pid: u32) -> Option<IoStats> {
    platform_impl::Platform::process_io(pid)
}

pub fn zero_working_set_is_unreadable() -> bool {
    platform_impl::Platform::zero_working_set_is_unreadable()
}
