use std::path::{Path, PathBuf};

use super::{IoStats, PlatformExtensions};

pub struct Platform;

impl PlatformExtensions for Platform {
    fn file_description(path: &Path) -> Option<String> {
        // Closest thing to a file description: the enclosing .app bundle name
        path.ancestors()
            .filter_map(|p| p.file_name()?.to_str())
            .find_map(|name| name.strip_suffix(".app"))
            .map(str::to_string)
    }

    fn system_directory() -> Option<PathBuf> {
        None
    }

    fn process_priority(pid: u32) -> Option<i32> {
        // getpriority returns -1 both on error and as a valid value, so go by errno
        unsafe { *libc::__error() = 0 };
        let prio = unsafe { libc::getpriority(libc::PRIO_PROCESS, pid as libc::id_t) };
        let errno = unsafe { *libc::__error() };
        if prio == -1 && errno != 0 {
            None
        } else {
            Some(prio)
        }
    }

    fn process_io(_pid: u32) -> Option<IoStats> {
        None
    }

    fn zero_working_set_is_unreadable() -> bool {
        false
    }
}
