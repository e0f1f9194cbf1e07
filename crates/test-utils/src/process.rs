use nix::sys::signal::kill;
use nix::unistd::Pid;

/// True if a process with id `pid` exists (zombies included).
pub fn process_alive(pid: Pid) -> bool {
    kill(pid, None).is_ok()
}
