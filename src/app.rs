//! Process-wide bookkeeping of live windows.

/// What the process should do after a window goes away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Running,
    Exit,
}

/// Counts live windows and decides when the process ends.
///
/// The application terminates exactly when the count goes from one to zero,
/// and stays terminated afterwards.
#[derive(Debug, Default)]
pub struct Application {
    live: usize,
    terminated: bool,
}

impl Application {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self) {
        self.live += 1;
    }

    pub fn release(&mut self) -> Lifecycle {
        debug_assert!(self.live > 0, "released more windows than registered");
        self.live = self.live.saturating_sub(1);
        if self.live == 0 {
            self.terminated = true;
            Lifecycle::Exit
        } else {
            Lifecycle::Running
        }
    }

    pub fn live_count(&self) -> usize {
        self.live
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exits_when_last_window_released() {
        let mut app = Application::new();
        app.register();
        app.register();

        assert_eq!(app.release(), Lifecycle::Running);
        assert!(!app.is_terminated());
        assert_eq!(app.release(), Lifecycle::Exit);
        assert!(app.is_terminated());
        assert_eq!(app.live_count(), 0);
    }

    #[test]
    fn fresh_application_is_not_terminated() {
        let app = Application::new();
        assert_eq!(app.live_count(), 0);
        assert!(!app.is_terminated());
    }
}
