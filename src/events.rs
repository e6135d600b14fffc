/// What the terminal runner can be asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Stop running and restore the terminal
    Exit,

    /// Stop or resume stepping
    TogglePause,

    /// Advance a single generation, while paused
    Step,

    /// Send the current generation as text through the diagnostic transport
    DumpRows,
}
