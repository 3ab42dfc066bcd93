//! Process peek overlay: a live, searchable process table with selection
//! and batch cancellation.
//!
//! - `schedule`: poll interval and search debounce timers
//! - `filter`: free-text filtering of a snapshot
//! - `selection`: pids queued for cancellation
//! - `table`: rows projected from (filtered snapshot × selection)
//! - `controller`: the overlay state object and its message handling

mod controller;
pub mod filter;
pub mod schedule;
pub mod selection;
pub mod table;

pub use controller::{CancelState, CursorMove, Effect, Notice, NoticeLevel, PeekMsg, PeekOverlay};
pub use table::{Segment, TableRow, Thresholds};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::{FieldValue, ProcessRecord};

    pub fn make_record(pid: u32, user: &str, command: &str) -> ProcessRecord {
        ProcessRecord {
            pid,
            user: user.to_string(),
            pr: FieldValue::Int(20),
            ni: FieldValue::Int(0),
            virt: FieldValue::Int(10240),
            res: FieldValue::Int(2048),
            shr: FieldValue::Int(512),
            s: "S".to_string(),
            cpu: FieldValue::Float(0.5),
            mem: FieldValue::Float(0.1),
            time: "0:00.10".to_string(),
            command: command.to_string(),
        }
    }
}
