use std::ffi::{OsStr, c_void};
use std::os::windows::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use windows_sys::Win32::{
    Foundation::CloseHandle,
    Storage::FileSystem::{GetFileVersionInfoSizeW, GetFileVersionInfoW, VerQueryValueW},
    System::Threading::{
        GetPriorityClass, GetProcessIoCounters, IO_COUNTERS, OpenProcess, PROCESS_QUERY_INFORMATION,
    },
};

use super::{IoStats, PlatformExtensions};

pub struct Platform;

// en-US, Unicode: used when the resource has no translation table
const FALLBACK_TRANSLATION: (u16, u16) = (0x0409, 0x04b0);

impl PlatformExtensions for Platform {
    fn file_description(path: &Path) -> Option<String> {
        let block = version_block(path)?;
        let (lang, codepage) = first_translation(&block).unwrap_or(FALLBACK_TRANSLATION);
        query_string(
            &block,
            &format!("\\StringFileInfo\\{lang:04x}{codepage:04x}\\FileDescription"),
        )
    }

    fn system_directory() -> Option<PathBuf> {
        std::env::var_os("SystemRoot")
            .or_else(|| std::env::var_os("windir"))
            .map(PathBuf::from)
    }

    fn process_priority(pid: u32) -> Option<i32> {
        unsafe {
            let handle = OpenProcess(PROCESS_QUERY_INFORMATION, 0, pid);
            if handle.is_null() {
                return None;
            }
            let prio = GetPriorityClass(handle);
            CloseHandle(handle);
            if prio == 0 { None } else { Some(prio as i32) }
        }
    }

    fn process_io(pid: u32) -> Option<IoStats> {
        unsafe {
            let handle = OpenProcess(PROCESS_QUERY_INFORMATION, 0, pid);
            if handle.is_null() {
                return None;
            }
            let mut counters = std::mem::zeroed::<IO_COUNTERS>();
            let ok = GetProcessIoCounters(handle, &mut counters);
            CloseHandle(handle);
            if ok == 0 {
                return None;
            }
            Some(IoStats {
                read_bytes: counters.ReadTransferCount,
                write_bytes: counters.WriteTransferCount,
            })
        }
    }

    fn zero_working_set_is_unreadable() -> bool {
        // sysinfo reports 0 when OpenProcess is refused
        true
    }
}

fn to_wide(s: &OsStr) -> Vec<u16> {
    s.encode_wide().chain(std::iter::once(0)).collect()
}

/// Loads the raw version resource. Backed by `u32`s so the `u16` views
/// handed out by `VerQueryValueW` are aligned.
fn version_block(path: &Path) -> Option<Vec<u32>> {
    let wide_path = to_wide(path.as_os_str());
    let mut ignored = 0u32;
    let size = unsafe { GetFileVersionInfoSizeW(wide_path.as_ptr(), &mut ignored) };
    if size == 0 {
        return None;
    }
    let mut block = vec![0u32; (size as usize).div_ceil(4)];
    let ok = unsafe {
        GetFileVersionInfoW(
            wide_path.as_ptr(),
            0,
            size,
            block.as_mut_ptr().cast::<c_void>(),
        )
    };
    if ok == 0 { None } else { Some(block) }
}

fn query_value(block: &[u32], sub_block: &str) -> Option<(*const u16, usize)> {
    let sub_block = to_wide(OsStr::new(sub_block));
    let mut value: *mut c_void = std::ptr::null_mut();
    let mut len = 0u32;
    let ok = unsafe {
        VerQueryValueW(
            block.as_ptr().cast::<c_void>(),
            sub_block.as_ptr(),
            &mut value,
            &mut len,
        )
    };
    if ok == 0 || value.is_null() || len == 0 {
        None
    } else {
        Some((value.cast_const().cast::<u16>(), len as usize))
    }
}

fn first_translation(block: &[u32]) -> Option<(u16, u16)> {
    // Translation is a byte-length array of (lang, codepage) word pairs
    let (ptr, len) = query_value(block, "\\VarFileInfo\\Translation")?;
    if len < 4 {
        return None;
    }
    let words = unsafe { std::slice::from_raw_parts(ptr, 2) };
    Some((words[0], words[1]))
}

fn query_string(block: &[u32], sub_block: &str) -> Option<String> {
    // String values report their length in UTF-16 units, terminator included
    let (ptr, len) = query_value(block, sub_block)?;
    let units = unsafe { std::slice::from_raw_parts(ptr, len) };
    let text = String::from_utf16_lossy(units);
    let text = text.trim_end_matches('\0').trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
