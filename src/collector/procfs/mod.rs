//! Parsers for the Linux `/proc` and `/sys` text formats.

pub mod parser;

pub use parser::{
    CpuLine, MountEntry, ParseError, ProcStat, count_cpu_lines, parse_counter, parse_cpu_line,
    parse_cpuinfo_identity, parse_key_values, parse_meminfo, parse_mounts, parse_os_release,
    parse_proc_stat,
};
