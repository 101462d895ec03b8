//! Parsers for `/proc`, `/sys` and `/etc` text records.
//!
//! These are pure functions that parse the content of various kernel files
//! into structured data. They are designed to be easily testable with string
//! inputs. None of them panics on malformed input; they return a
//! [`ParseError`] and leave the decision to default or drop to the caller.

use std::collections::HashMap;

use thiserror::Error;

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("parse error: {message}")]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

/// Number of fields required after the closing `)` of a stat line.
const PROC_STAT_MIN_FIELDS: usize = 22;

/// Fields of `/proc/[pid]/stat` used by the collectors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcStat {
    pub pid: u32,
    pub comm: String,
    pub state: char,
    pub ppid: u32,
    pub utime: u64,
    pub stime: u64,
    pub num_threads: i64,
    /// Virtual memory size in bytes.
    pub vsize: u64,
    /// Resident set size in pages.
    pub rss: i64,
}

/// Parses `/proc/[pid]/stat` content.
///
/// The comm field can contain spaces and parentheses, so it is bounded by the
/// first `(` and the *last* `)`.
/// Format: pid (comm) state ppid pgrp session tty_nr ...
pub fn parse_proc_stat(content: &str) -> Result<ProcStat, ParseError> {
    let content = content.trim();

    let open_paren = content
        .find('(')
        .ok_or_else(|| ParseError::new("missing '(' in stat"))?;
    let close_paren = content
        .rfind(')')
        .ok_or_else(|| ParseError::new("missing ')' in stat"))?;

    if close_paren <= open_paren {
        return Err(ParseError::new("invalid parentheses in stat"));
    }

    let pid: u32 = content[..open_paren]
        .trim()
        .parse()
        .map_err(|_| ParseError::new("invalid pid"))?;

    let comm = content[open_paren + 1..close_paren].to_string();

    let fields: Vec<&str> = content[close_paren + 1..].split_whitespace().collect();
    if fields.len() < PROC_STAT_MIN_FIELDS {
        return Err(ParseError::new(format!(
            "not enough fields in stat: expected {}+, got {}",
            PROC_STAT_MIN_FIELDS,
            fields.len()
        )));
    }

    fn field<T: std::str::FromStr>(fields: &[&str], idx: usize, name: &str) -> Result<T, ParseError> {
        fields[idx]
            .parse()
            .map_err(|_| ParseError::new(format!("invalid {}", name)))
    }

    Ok(ProcStat {
        pid,
        comm,
        state: fields[0].chars().next().unwrap_or('?'),
        ppid: field(&fields, 1, "ppid")?,
        utime: field(&fields, 11, "utime")?,
        stime: field(&fields, 12, "stime")?,
        num_threads: field(&fields, 17, "num_threads")?,
        vsize: field(&fields, 20, "vsize")?,
        rss: field(&fields, 21, "rss")?,
    })
}

/// Parses `KEY<sep>value` lines into a map.
///
/// Keys lose a trailing `:`; values lose surrounding quotes. If a key
/// repeats, the last occurrence wins. Lines without the separator are
/// ignored.
pub fn parse_key_values(content: &str, sep: char) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in content.lines() {
        let Some((key, value)) = line.split_once(sep) else {
            continue;
        };
        let key = key.trim();
        let key = key.strip_suffix(':').unwrap_or(key).trim();
        if key.is_empty() {
            continue;
        }
        map.insert(key.to_string(), unquote(value.trim()).to_string());
    }
    map
}

fn unquote(value: &str) -> &str {
    let value = value.strip_prefix('"').unwrap_or(value);
    value.strip_suffix('"').unwrap_or(value)
}

/// Parses `/proc/meminfo` into `key -> value` (values in the file's unit, kB).
///
/// Lines whose value does not start with an integer are skipped.
pub fn parse_meminfo(content: &str) -> HashMap<String, u64> {
    parse_key_values(content, ':')
        .into_iter()
        .filter_map(|(key, value)| {
            let number = value.split_whitespace().next()?.parse().ok()?;
            Some((key, number))
        })
        .collect()
}

/// Extracts the distribution name from `/etc/os-release`.
///
/// Prefers `PRETTY_NAME`, then `NAME`.
pub fn parse_os_release(content: &str) -> Option<String> {
    let map = parse_key_values(content, '=');
    map.get("PRETTY_NAME")
        .or_else(|| map.get("NAME"))
        .filter(|v| !v.is_empty())
        .cloned()
}

/// Reads `(vendor_id, model name)` of the first processor in `/proc/cpuinfo`.
pub fn parse_cpuinfo_identity(content: &str) -> (Option<String>, Option<String>) {
    let mut vendor = None;
    let mut model = None;
    for line in content.lines() {
        if line.trim().is_empty() && (vendor.is_some() || model.is_some()) {
            break;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match key.trim() {
            "vendor_id" if vendor.is_none() => vendor = Some(value.to_string()),
            "model name" if model.is_none() => model = Some(value.to_string()),
            _ => {}
        }
    }
    (vendor, model)
}

/// Parses the leading integer of a single-value file, e.g.
/// `statistics/rx_bytes`. Anything after the digits is ignored.
pub fn parse_counter(content: &str) -> Result<u64, ParseError> {
    let text = content.trim_start();
    let end = text.find(|c: char| !c.is_ascii_digit()).unwrap_or(text.len());
    let digits = &text[..end];
    if digits.is_empty() {
        return Err(ParseError::new(format!(
            "no counter value in '{}'",
            text.lines().next().unwrap_or_default()
        )));
    }
    digits
        .parse()
        .map_err(|_| ParseError::new(format!("counter value '{}' out of range", digits)))
}

/// Tick counters of the aggregate `cpu` line in `/proc/stat`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuLine {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
    pub guest: u64,
    pub guest_nice: u64,
}

/// Parses the aggregate `cpu ` line of `/proc/stat`.
///
/// Older kernels expose fewer columns; missing trailing columns read as 0.
pub fn parse_cpu_line(content: &str) -> Result<CpuLine, ParseError> {
    let line = content
        .lines()
        .find(|l| l.starts_with("cpu "))
        .ok_or_else(|| ParseError::new("no aggregate cpu line in stat"))?;

    let values: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .map(|s| s.parse())
        .collect::<Result<_, _>>()
        .map_err(|_| ParseError::new("invalid cpu tick value"))?;

    if values.len() < 4 {
        return Err(ParseError::new(format!(
            "not enough cpu fields: expected 4+, got {}",
            values.len()
        )));
    }
    let get = |i: usize| values.get(i).copied().unwrap_or(0);

    Ok(CpuLine {
        user: get(0),
        nice: get(1),
        system: get(2),
        idle: get(3),
        iowait: get(4),
        irq: get(5),
        softirq: get(6),
        steal: get(7),
        guest: get(8),
        guest_nice: get(9),
    })
}

/// Counts the per-CPU `cpuN` lines of `/proc/stat`.
pub fn count_cpu_lines(content: &str) -> usize {
    content
        .lines()
        .filter(|l| {
            l.strip_prefix("cpu")
                .and_then(|rest| rest.chars().next())
                .is_some_and(|c| c.is_ascii_digit())
        })
        .count()
}

/// One line of a mount table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    pub device: String,
    pub mount_point: String,
    pub fs_type: String,
}

/// Parses `/etc/mtab` or `/proc/mounts`.
///
/// Lines with fewer than three fields are skipped.
pub fn parse_mounts(content: &str) -> Vec<MountEntry> {
    content
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let device = fields.next()?;
            let mount_point = fields.next()?;
            let fs_type = fields.next()?;
            Some(MountEntry {
                device: device.to_string(),
                mount_point: decode_mount_escapes(mount_point),
                fs_type: fs_type.to_string(),
            })
        })
        .collect()
}

/// Decodes the `\ooo` octal escapes the kernel uses for whitespace in paths.
fn decode_mount_escapes(raw: &str) -> String {
    if !raw.contains('\\') {
        return raw.to_string();
    }
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let escape = bytes.get(i + 1..i + 4).filter(|_| bytes[i] == b'\\');
        if let Some(digits) = escape
            && digits.iter().all(|b| (b'0'..=b'7').contains(b))
            && let Ok(code) = u8::try_from(
                digits
                    .iter()
                    .fold(0u32, |acc, d| acc * 8 + u32::from(d - b'0')),
            )
        {
            out.push(code);
            i += 4;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASH_STAT: &str = "1234 (bash) S 1233 1234 1234 34816 1235 4194304 5000 50000 10 20 100 50 200 100 20 0 1 0 100000 25000000 2000 18446744073709551615 0 0 0 0 0 0 65536 3670020 1266777851 0 0 0 17 2 0 0 5 0 0 0 0 0 0 0 0 0 0";

    #[test]
    fn test_parse_proc_stat_basic() {
        let stat = parse_proc_stat(BASH_STAT).unwrap();

        assert_eq!(stat.pid, 1234);
        assert_eq!(stat.comm, "bash");
        assert_eq!(stat.state, 'S');
        assert_eq!(stat.ppid, 1233);
        assert_eq!(stat.utime, 100);
        assert_eq!(stat.stime, 50);
        assert_eq!(stat.num_threads, 1);
        assert_eq!(stat.vsize, 25000000);
        assert_eq!(stat.rss, 2000);
    }

    #[test]
    fn test_parse_proc_stat_with_spaces_in_comm() {
        let content = "5000 (Web Content) S 4999 5000 4999 0 -1 4194304 100000 0 500 0 5000 1000 0 0 20 0 20 0 500000 2000000000 50000 18446744073709551615 0 0 0 0 0 0 0 0 0 0 0 0 17 0 0 0 0 0 0 0 0 0 0 0 0 0 0";
        let stat = parse_proc_stat(content).unwrap();

        assert_eq!(stat.pid, 5000);
        assert_eq!(stat.comm, "Web Content");
        assert_eq!(stat.utime, 5000);
        assert_eq!(stat.stime, 1000);
        assert_eq!(stat.num_threads, 20);
    }

    #[test]
    fn test_parse_proc_stat_with_nested_parentheses() {
        let content = "1234 (my proc (helper)) S 1 1234 1234 0 -1 4194304 1000 0 0 0 10 5 0 0 20 0 1 0 500100 10000000 1000 18446744073709551615 0 0 0 0 0 0 0 0 0 0 0 0 17 0 0 0 0 0 0 0 0 0 0 0 0 0 0";
        let stat = parse_proc_stat(content).unwrap();

        assert_eq!(stat.pid, 1234);
        assert_eq!(stat.comm, "my proc (helper)");
        assert_eq!(stat.state, 'S');
        assert_eq!(stat.ppid, 1);
        assert_eq!(stat.vsize, 10000000);
    }

    #[test]
    fn test_parse_proc_stat_zombie() {
        let content = "4000 (defunct) Z 1000 4000 1000 0 -1 4194308 0 0 0 0 0 0 0 0 20 0 1 0 400000 0 0 18446744073709551615 0 0 0 0 0 0 0 0 0 0 0 0 -1 0 0 0 0 0 0 0 0 0 0 0 0 0 0";
        let stat = parse_proc_stat(content).unwrap();

        assert_eq!(stat.pid, 4000);
        assert_eq!(stat.state, 'Z');
        assert_eq!(stat.rss, 0);
    }

    #[test]
    fn test_parse_proc_stat_truncated() {
        let err = parse_proc_stat("42 (short) S 1 2 3").unwrap_err();
        assert!(err.message.contains("not enough fields"));

        assert!(parse_proc_stat("").is_err());
        assert!(parse_proc_stat("42 short S").is_err());
        assert!(parse_proc_stat("x (bash) S 1").is_err());
    }

    #[test]
    fn test_parse_key_values() {
        let content = "\
NAME=\"Ubuntu\"
VERSION_ID=\"24.04\"
ID=ubuntu
garbage line
NAME=\"Ubuntu Override\"
";
        let map = parse_key_values(content, '=');
        assert_eq!(map.get("NAME").map(String::as_str), Some("Ubuntu Override"));
        assert_eq!(map.get("VERSION_ID").map(String::as_str), Some("24.04"));
        assert_eq!(map.get("ID").map(String::as_str), Some("ubuntu"));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_parse_meminfo() {
        let content = "\
MemTotal:       16384000 kB
MemFree:         8192000 kB
Buffers:          512000 kB
Cached:          2048000 kB
SwapTotal:       4096000 kB
SwapFree:        4096000 kB
HugePages_Total:       0
Broken:          notanumber kB
";
        let info = parse_meminfo(content);

        assert_eq!(info["MemTotal"], 16384000);
        assert_eq!(info["MemFree"], 8192000);
        assert_eq!(info["Buffers"], 512000);
        assert_eq!(info["Cached"], 2048000);
        assert_eq!(info["SwapTotal"], 4096000);
        assert_eq!(info["HugePages_Total"], 0);
        assert!(!info.contains_key("Broken"));
    }

    #[test]
    fn test_parse_os_release() {
        let content = "NAME=\"Debian GNU/Linux\"\nPRETTY_NAME=\"Debian GNU/Linux 12 (bookworm)\"\n";
        assert_eq!(
            parse_os_release(content).as_deref(),
            Some("Debian GNU/Linux 12 (bookworm)")
        );
        assert_eq!(parse_os_release("NAME=Alpine\n").as_deref(), Some("Alpine"));
        assert_eq!(parse_os_release("ID=foo\n"), None);
    }

    #[test]
    fn test_parse_cpuinfo_identity() {
        let content = "\
processor\t: 0
vendor_id\t: GenuineIntel
model name\t: Intel(R) Core(TM) i7-8550U CPU @ 1.80GHz

processor\t: 1
vendor_id\t: OtherVendor
model name\t: Other
";
        let (vendor, model) = parse_cpuinfo_identity(content);
        assert_eq!(vendor.as_deref(), Some("GenuineIntel"));
        assert_eq!(
            model.as_deref(),
            Some("Intel(R) Core(TM) i7-8550U CPU @ 1.80GHz")
        );
        assert_eq!(parse_cpuinfo_identity(""), (None, None));
    }

    #[test]
    fn test_parse_counter() {
        assert_eq!(parse_counter("123456\n"), Ok(123456));
        assert_eq!(parse_counter("  7 trailing"), Ok(7));
        assert!(parse_counter("").is_err());
        assert!(parse_counter("\n").is_err());
        assert!(parse_counter("abc").is_err());
        assert_eq!(parse_counter("123abc\n"), Ok(123));
        assert_eq!(parse_counter("42\t(kB)"), Ok(42));
        assert!(parse_counter("-5").is_err());
        assert!(parse_counter("99999999999999999999999").is_err());
    }

    #[test]
    fn test_parse_cpu_line() {
        let content = "\
cpu  10000 500 3000 80000 1000 200 100 0 0 0
cpu0 2500 125 750 20000 250 50 25 0 0 0
cpu1 2500 125 750 20000 250 50 25 0 0 0
intr 1000000 50 0
";
        let cpu = parse_cpu_line(content).unwrap();
        assert_eq!(cpu.user, 10000);
        assert_eq!(cpu.nice, 500);
        assert_eq!(cpu.system, 3000);
        assert_eq!(cpu.idle, 80000);
        assert_eq!(cpu.iowait, 1000);
        assert_eq!(cpu.softirq, 100);
        assert_eq!(count_cpu_lines(content), 2);
    }

    #[test]
    fn test_parse_cpu_line_short_and_invalid() {
        let cpu = parse_cpu_line("cpu 1 2 3 4\n").unwrap();
        assert_eq!(cpu.idle, 4);
        assert_eq!(cpu.iowait, 0);

        assert!(parse_cpu_line("cpu 1 2\n").is_err());
        assert!(parse_cpu_line("cpu 1 x 3 4\n").is_err());
        assert!(parse_cpu_line("cpu0 1 2 3 4\n").is_err());
    }

    #[test]
    fn test_parse_mounts() {
        let content = "\
/dev/sda1 / ext4 rw,relatime 0 0
proc /proc proc rw,nosuid 0 0
/dev/sdb1 /mnt/my\\040disk xfs rw 0 0
broken-line
";
        let mounts = parse_mounts(content);
        assert_eq!(mounts.len(), 3);
        assert_eq!(mounts[0].device, "/dev/sda1");
        assert_eq!(mounts[0].mount_point, "/");
        assert_eq!(mounts[0].fs_type, "ext4");
        assert_eq!(mounts[1].fs_type, "proc");
        assert_eq!(mounts[2].mount_point, "/mnt/my disk");
    }
}
