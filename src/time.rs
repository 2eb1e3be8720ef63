use std::fmt;

/// Time needed to walk a passage, a route or an average of routes.
///
/// [`TravelTime::Blocked`] is an ordinary value meaning "there is no usable path". It sorts above
/// every finite time and absorbs anything added to it, so sums over a walk stay blocked as soon as
/// one step is. Sums that don't fit into `i64` are reported by [`TravelTime::checked_add`] instead
/// of wrapping around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TravelTime {
    Finite(i64),
    Blocked,
}

impl TravelTime {
    pub const ZERO: Self = Self::Finite(0);

    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked)
    }

    pub fn is_finite(&self) -> bool {
        !self.is_blocked()
    }

    pub fn finite(&self) -> Option<i64> {
        match self {
            Self::Finite(t) => Some(*t),
            Self::Blocked => None,
        }
    }

    /// Adds two times, `None` if a finite sum overflows.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        match (self, rhs) {
            (Self::Finite(a), Self::Finite(b)) => a.checked_add(b).map(Self::Finite),
            _ => Some(Self::Blocked),
        }
    }

    /// Whether the value may be stored as the time of a passage.
    ///
    /// Blocked passages are allowed, finite ones must be strictly positive.
    pub fn is_valid_passage(&self) -> bool {
        match self {
            Self::Finite(t) => *t > 0,
            Self::Blocked => true,
        }
    }
}

impl Default for TravelTime {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<i64> for TravelTime {
    fn from(t: i64) -> Self {
        Self::Finite(t)
    }
}

impl fmt::Display for TravelTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(t) => write!(f, "{}", t),
            Self::Blocked => write!(f, "Blocked"),
        }
    }
}
