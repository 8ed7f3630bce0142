use crate::numbers::{parse_letter_number, parse_other_number};

pub type Row = Vec<String>;

pub const LETTER: &str = "Letter";

pub const DISPATCH_NUMBER_COLUMN: usize = 0;
pub const FILE_TYPE_COLUMN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileClass {
    Letter,
    Other,
}

impl FileClass {
    /// Exact match on `Letter`, no trimming or case folding.
    pub fn classify(file_type: &str) -> Self {
        if file_type == LETTER {
            FileClass::Letter
        } else {
            FileClass::Other
        }
    }

    pub fn parse_number(self, dispatch_number: &str) -> Option<u64> {
        match self {
            FileClass::Letter => parse_letter_number(dispatch_number),
            FileClass::Other => parse_other_number(dispatch_number),
        }
    }
}

/// The two cells of a register row the numbering cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchRecord<'a> {
    pub dispatch_number: &'a str,
    pub file_type: &'a str,
}

impl<'a> DispatchRecord<'a> {
    /// `None` when either cell is absent or empty.
    pub fn from_row(row: &'a [String]) -> Option<Self> {
        let dispatch_number = cell(row, DISPATCH_NUMBER_COLUMN)?;
        let file_type = cell(row, FILE_TYPE_COLUMN)?;

        Some(Self {
            dispatch_number,
            file_type,
        })
    }

    pub fn class(&self) -> FileClass {
        FileClass::classify(self.file_type)
    }

    pub fn number(&self) -> Option<u64> {
        self.class().parse_number(self.dispatch_number)
    }
}

fn cell(row: &[String], index: usize) -> Option<&str> {
    row.get(index)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}
