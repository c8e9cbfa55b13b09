/// Local display timer mirroring the server's "seconds remaining".
/// Purely cosmetic: every authoritative value re-seeds it, and it
/// never runs past what the server last reported.
#[derive(Debug, Clone, Default)]
pub struct CountdownMirror {
    remaining: u32,
    running: bool,
}

impl CountdownMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the counter with an authoritative value and
    /// (re)starts ticking. Works after `stop` too.
    pub fn seed(&mut self, remaining_seconds: u32) {
        self.remaining = remaining_seconds;
        self.running = remaining_seconds > 0;
    }

    /// One-second tick. Returns true exactly once, on the tick that
    /// reaches zero; the mirror stops itself at that point.
    pub fn tick(&mut self) -> bool {
        if !self.running || self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            self.running = false;
            return true;
        }
        false
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn display(&self) -> String {
        format_clock(self.remaining)
    }
}

pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
