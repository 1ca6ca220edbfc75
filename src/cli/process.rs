use std::path::Path;

use sysinfo::{get_current_pid, Signal, System};

/// Terminates every running daemon whose executable is `name`. The browser
/// normally ends its host on its own, this exists for the stray ones left
/// behind by crashed browsers and debugging sessions.
pub fn kill_running_daemons(name: &Path) -> usize {
    let system = System::new_all();
    let current_id = get_current_pid().unwrap();
    let mut terminated = 0;
    for (pid, process) in system.processes().iter() {
        if *pid == current_id {
            continue;
        }
        if matches!(process.parent(), Some(p) if p == current_id) {
            continue;
        }

        if process
            .exe()
            .filter(|v| v.exists())
            .filter(|v| name == *v)
            .is_some()
        {
            // This will forcefully terminate the process on Windows. Anything
            // better will require a lot more work.
            if process.kill_with(Signal::Term).is_none() {
                process.kill();
            }
            process.wait();
            terminated += 1;
        }
    }
    terminated
}
