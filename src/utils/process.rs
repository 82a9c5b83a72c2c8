use sysinfo::System;

/// Answers "is a process matching `target` running right now".
pub trait ProcessProbe: Send {
    fn is_running(&mut self, target: &str) -> bool;
}

/// Process-table probe backed by sysinfo. Matches `target` as a substring of
/// the process name or its full command line, since the real game is started
/// indirectly by Steam and is not our child.
pub struct ProcessChecker {
    sys: System,
}

impl ProcessChecker {
    pub fn new() -> Self {
        Self { sys: System::new() }
    }
}

impl Default for ProcessChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessProbe for ProcessChecker {
    fn is_running(&mut self, target: &str) -> bool {
        // Refresh only what we need
        self.sys.refresh_processes();

        self.sys.processes().values().any(|p| {
            p.name().contains(target) || p.cmd().join(" ").contains(target)
        })
    }
}
