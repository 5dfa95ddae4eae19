use ddqn_core::Act;

/// Action of [`CatchEnv`](super::CatchEnv).
///
/// `0` moves the paddle left, `1` keeps it, `2` moves it right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatchAct(pub usize);

impl CatchAct {
    /// The number of actions.
    pub const N: usize = 3;

    /// Move left.
    pub const LEFT: Self = Self(0);

    /// Stay.
    pub const STAY: Self = Self(1);

    /// Move right.
    pub const RIGHT: Self = Self(2);
}

impl Act for CatchAct {}

impl From<usize> for CatchAct {
    fn from(a: usize) -> Self {
        Self(a)
    }
}

impl From<CatchAct> for usize {
    fn from(a: CatchAct) -> Self {
        a.0
    }
}
