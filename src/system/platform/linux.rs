use std::path::{Path, PathBuf};

use super::{IoStats, PlatformExtensions};

pub struct Platform;

impl PlatformExtensions for Platform {
    fn file_description(_path: &Path) -> Option<String> {
        // ELF binaries carry no version resource
        None
    }

    fn system_directory() -> Option<PathBuf> {
        None
    }

    fn process_priority(pid: u32) -> Option<i32> {
        let contents = std::fs::read_to_string(format!("/proc/{pid}/stat")).ok()?;
        // comm may contain spaces and parens, so split after the last ')'
        let after_comm = contents.rfind(')')? + 1;
        let fields: Vec<&str> = contents[after_comm..].split_whitespace().collect();
        // state(0) ppid(1) ... utime(11) stime(12) cutime(13) cstime(14) priority(15)
        fields.get(15)?.parse().ok()
    }

    fn process_io(pid: u32) -> Option<IoStats> {
        let contents = std::fs::read_to_string(format!("/proc/{pid}/io")).ok()?;
        let mut read_bytes = None;
        let mut write_bytes = None;
        for line in contents.lines() {
            if let Some(val) = line.strip_prefix("read_bytes: ") {
                read_bytes = val.trim().parse().ok();
            } else if let Some(val) = line.strip_prefix("write_bytes: ") {
                write_bytes = val.trim().parse().ok();
            }
        }
        Some(IoStats {
            read_bytes: read_bytes?,
            write_bytes: write_bytes?,
        })
    }

    fn zero_working_set_is_unreadable() -> bool {
        // Kernel threads genuinely have no resident pages
        false
    }
}
