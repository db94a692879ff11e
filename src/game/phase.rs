/// Coarse state of a play session.
///
/// `NotStarted -> Running -> GameOver -> Running -> ...`. There is no pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    NotStarted,
    Running,
    GameOver,
}

impl Phase {
    /// Start and restart are both no-ops while a game is already running.
    pub fn can_start(&self) -> bool {
        !matches!(self, Phase::Running)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Phase::Running)
    }
}
