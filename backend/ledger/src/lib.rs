//! # Dispatch Ledger
//!
//! Numbering logic behind the dispatch register.
//!
//! ## Overall Data Structures
//!
//! - Spreadsheet rows (list of **strings**): the register itself, owned by Google Sheets. Column A holds the
//!   dispatch number, column D the file type. First row is always the header.
//!
//! - Next numbers (two **u64**): in-memory cache of the next dispatch number per file class, `Letter` and everything else.
//!   Starts at zero, rebuilt from the sheet on demand.
//!
//! ## Dispatch Numbers
//!
//! - Letters look like `No.BHCP/2024/CAT/12-034`, the trailing `12-034` is a run and the range end. Range end counts.
//! - Everything else looks like `No.BHCP/CAT/2024/057`, the trailing run of digits counts.
//!
//! ## Cache Updates
//!
//! - Rescan: full pass over the sheet, each field only ever goes up.
//! - Advance: after a row was appended, the field is overwritten with one past that row's number.
//! - Set: operator override, overwritten with one past the given total.
//!
//! Rescan and advance deliberately use different update rules, one is a max, the other an overwrite.
//!
//! ## Notes
//! - Cache is volatile. The sheet is the source of truth, a rescan always gets us back in sync.
//! - No locks, concurrent updates are last-writer-wins.

pub mod cache;
pub mod numbers;
pub mod record;

pub use cache::{DispatchNumbers, NextNumbers, RowSource};
pub use numbers::{parse_letter_number, parse_other_number};
pub use record::{DispatchRecord, FileClass, Row};
