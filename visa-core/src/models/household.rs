use serde::{Deserialize, Serialize};

/// Who is applying: a single adult, or a married couple with their children.
///
/// Children are only carried for a married household, so an unmarried
/// applicant with dependants cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Household {
    #[default]
    Single,
    Married { children: u32 },
}

impl Household {
    /// Builds a household from the raw married flag and requested child count.
    ///
    /// A single applicant's requested children are discarded.
    ///
    /// ```
    /// use visa_core::Household;
    ///
    /// assert_eq!(Household::from_request(false, 2), Household::Single);
    /// assert_eq!(
    ///     Household::from_request(true, 2),
    ///     Household::Married { children: 2 }
    /// );
    /// ```
    pub fn from_request(
        is_married: bool,
        requested_children: u32,
    ) -> Self {
        if is_married {
            Self::Married {
                children: requested_children,
            }
        } else {
            Self::Single
        }
    }

    pub fn is_married(&self) -> bool {
        matches!(self, Self::Married { .. })
    }

    pub fn num_adults(&self) -> u32 {
        match self {
            Self::Single => 1,
            Self::Married { .. } => 2,
        }
    }

    pub fn num_children(&self) -> u32 {
        match self {
            Self::Single => 0,
            Self::Married { children } => *children,
        }
    }

    /// Adults plus children.
    pub fn total_people(&self) -> u32 {
        self.num_adults().saturating_add(self.num_children())
    }
}
