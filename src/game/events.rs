/// Outcome of a single evaluated press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptVerdict {
    /// The press landed inside the active light's scoring window.
    Hit { points: u32 },
    /// The light was worth something, but the press fell outside its window.
    Mistimed,
    /// The active light was a zero-value position.
    DeadLight,
}

/// Typed notifications the engine publishes to whoever presents the game.
/// The engine never talks to a renderer or a speaker directly; callers pass
/// a buffer and drain it after each mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    LightAdvanced {
        index: usize,
    },
    AttemptJudged {
        seat: usize,
        light_index: usize,
        verdict: AttemptVerdict,
    },
    /// Emitted once, on the transition out of the active game. `winners`
    /// holds the seat ids sharing the top score, empty when nobody scored.
    GameOver {
        winners: Vec<u8>,
    },
}
