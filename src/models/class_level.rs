use std::fmt;

/// The fixed set of class designators the portal serves. Each class owns a
/// numeric roll prefix; rolls for one class never leave that prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassLevel {
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
}

impl ClassLevel {
    pub const ALL: [ClassLevel; 5] = [
        ClassLevel::Six,
        ClassLevel::Seven,
        ClassLevel::Eight,
        ClassLevel::Nine,
        ClassLevel::Ten,
    ];

    pub fn from_designator(designator: &str) -> Option<Self> {
        match designator.trim() {
            "6" => Some(ClassLevel::Six),
            "7" => Some(ClassLevel::Seven),
            "8" => Some(ClassLevel::Eight),
            "9" => Some(ClassLevel::Nine),
            "10" => Some(ClassLevel::Ten),
            _ => None,
        }
    }

    pub fn designator(self) -> &'static str {
        match self {
            ClassLevel::Six => "6",
            ClassLevel::Seven => "7",
            ClassLevel::Eight => "8",
            ClassLevel::Nine => "9",
            ClassLevel::Ten => "10",
        }
    }

    /// Roll-number prefix for the class ("6" -> "61", "10" -> "101").
    pub fn prefix(self) -> &'static str {
        match self {
            ClassLevel::Six => "61",
            ClassLevel::Seven => "71",
            ClassLevel::Eight => "81",
            ClassLevel::Nine => "91",
            ClassLevel::Ten => "101",
        }
    }

    /// Advisory-lock key scoping roll allocation to one class.
    pub fn lock_key(self) -> i64 {
        match self {
            ClassLevel::Six => 61,
            ClassLevel::Seven => 71,
            ClassLevel::Eight => 81,
            ClassLevel::Nine => 91,
            ClassLevel::Ten => 101,
        }
    }
}

impl fmt::Display for ClassLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.designator())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn designators_round_trip() {
        for class in ClassLevel::ALL {
            assert_eq!(ClassLevel::from_designator(class.designator()), Some(class));
        }
    }

    #[test]
    fn unknown_designators_are_rejected() {
        assert_eq!(ClassLevel::from_designator("5"), None);
        assert_eq!(ClassLevel::from_designator("11"), None);
        assert_eq!(ClassLevel::from_designator(""), None);
    }

    #[test]
    fn prefixes_extend_the_designator() {
        assert_eq!(ClassLevel::Six.prefix(), "61");
        assert_eq!(ClassLevel::Ten.prefix(), "101");
    }
}
