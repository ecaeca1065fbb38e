use serde::Serialize;

/// The four punch slots of a workday, in canonical order.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Entry,
    LunchOut,
    LunchReturn,
    Exit,
}

impl SlotKind {
    pub const ALL: [SlotKind; 4] = [
        SlotKind::Entry,
        SlotKind::LunchOut,
        SlotKind::LunchReturn,
        SlotKind::Exit,
    ];

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            SlotKind::Entry => "entry",
            SlotKind::LunchOut => "lunch_out",
            SlotKind::LunchReturn => "lunch_return",
            SlotKind::Exit => "exit",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "entry" => Some(SlotKind::Entry),
            "lunch_out" => Some(SlotKind::LunchOut),
            "lunch_return" => Some(SlotKind::LunchReturn),
            "exit" => Some(SlotKind::Exit),
            _ => None,
        }
    }

    /// Parse a user-typed slot name (CLI accepts both `-` and `_`).
    pub fn from_cli_str(s: &str) -> Option<Self> {
        Self::from_db_str(&s.to_lowercase().replace('-', "_"))
    }

    /// Human-readable slot name for messages and listings.
    pub fn label(&self) -> &'static str {
        match self {
            SlotKind::Entry => "entry",
            SlotKind::LunchOut => "lunch out",
            SlotKind::LunchReturn => "lunch return",
            SlotKind::Exit => "exit",
        }
    }

    /// Position of this slot in the canonical order (0..4).
    pub fn index(&self) -> usize {
        match self {
            SlotKind::Entry => 0,
            SlotKind::LunchOut => 1,
            SlotKind::LunchReturn => 2,
            SlotKind::Exit => 3,
        }
    }
}
