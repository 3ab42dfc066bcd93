use std::fmt;

use serde::Deserialize;

/// A loosely typed column value from the process listing.
///
/// The backend reports `top`-style columns whose JSON type varies between
/// hosts (`"rt"` priorities, `"1.2g"` memory sizes, plain numbers), so the
/// value is kept as received and rendered back to its string form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{}", v),
            // f64's Display already prints 10.0 as "10"
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl FieldValue {
    /// Numeric reading of the value. Text is parsed from its leading number
    /// (so `"12.5%"` reads as 12.5); text without one yields `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Int(v) => Some(*v as f64),
            FieldValue::Float(v) => Some(*v),
            FieldValue::Text(s) => parse_leading_number(s),
        }
    }
}

/// Parse the longest numeric prefix of `s` after leading whitespace.
pub fn parse_leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    // Exponent only counts when followed by at least one digit.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    s[..end].parse::<f64>().ok()
}

/// One row of the backend's process listing.
/// Immutable once received; a snapshot is replaced wholesale on every poll.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProcessRecord {
    pub pid: u32,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub pr: FieldValue,
    #[serde(default)]
    pub ni: FieldValue,
    #[serde(default)]
    pub virt: FieldValue,
    #[serde(default)]
    pub res: FieldValue,
    #[serde(default)]
    pub shr: FieldValue,
    /// Single-letter state code (R, S, D, Z, ...).
    #[serde(default)]
    pub s: String,
    #[serde(default)]
    pub cpu: FieldValue,
    #[serde(default)]
    pub mem: FieldValue,
    /// Cumulative CPU time as reported, e.g. "0:01.23".
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub command: String,
}

/// Columns of the process table, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessColumn {
    Pid,
    User,
    Priority,
    Nice,
    Virt,
    Res,
    Shr,
    State,
    Cpu,
    Mem,
    Time,
    Command,
}

impl ProcessColumn {
    pub const ALL: [ProcessColumn; 12] = [
        ProcessColumn::Pid,
        ProcessColumn::User,
        ProcessColumn::Priority,
        ProcessColumn::Nice,
        ProcessColumn::Virt,
        ProcessColumn::Res,
        ProcessColumn::Shr,
        ProcessColumn::State,
        ProcessColumn::Cpu,
        ProcessColumn::Mem,
        ProcessColumn::Time,
        ProcessColumn::Command,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            ProcessColumn::Pid => "PID",
            ProcessColumn::User => "USER",
            ProcessColumn::Priority => "PR",
            ProcessColumn::Nice => "NI",
            ProcessColumn::Virt => "VIRT",
            ProcessColumn::Res => "RES",
            ProcessColumn::Shr => "SHR",
            ProcessColumn::State => "S",
            ProcessColumn::Cpu => "%CPU",
            ProcessColumn::Mem => "%MEM",
            ProcessColumn::Time => "TIME+",
            ProcessColumn::Command => "COMMAND",
        }
    }
}

impl ProcessRecord {
    /// String form of one column, exactly as displayed and searched.
    pub fn column_text(&self, column: ProcessColumn) -> String {
        match column {
            ProcessColumn::Pid => self.pid.to_string(),
            ProcessColumn::User => self.user.clone(),
            ProcessColumn::Priority => self.pr.to_string(),
            ProcessColumn::Nice => self.ni.to_string(),
            ProcessColumn::Virt => self.virt.to_string(),
            ProcessColumn::Res => self.res.to_string(),
            ProcessColumn::Shr => self.shr.to_string(),
            ProcessColumn::State => self.s.clone(),
            ProcessColumn::Cpu => self.cpu.to_string(),
            ProcessColumn::Mem => self.mem.to_string(),
            ProcessColumn::Time => self.time.clone(),
            ProcessColumn::Command => self.command.clone(),
        }
    }

    pub fn cpu_percent(&self) -> Option<f64> {
        self.cpu.as_number()
    }

    pub fn mem_percent(&self) -> Option<f64> {
        self.mem.as_number()
    }
}
