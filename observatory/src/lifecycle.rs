/// Where a subject is in its life, as far as its observers are concerned.
///
/// Only moves forward: `Live` -> `TearingDown` -> `Destroyed`.
#[derive(Debug, Clone, Copy, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Lifecycle {
    /// Accepting observers and delivering notifications
    #[default]
    Live,
    /// The "about to be destroyed" round has been sent. Observers are expected to deregister.
    TearingDown,
    /// The "destroyed" round has been sent and every remaining registration released
    Destroyed,
}

impl Lifecycle {
    pub fn accepts_observers(self) -> bool { matches!(self, Lifecycle::Live) }

    pub(crate) fn advance(self, next: Lifecycle) -> Lifecycle { self.max(next) }
}

impl std::fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lifecycle::Live => write!(f, "live"),
            Lifecycle::TearingDown => write!(f, "tearing down"),
            Lifecycle::Destroyed => write!(f, "destroyed"),
        }
    }
}
