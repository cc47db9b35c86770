use std::io;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

use super::Pid;

/// Reclaims every child that has already terminated, without blocking.
/// Returns the reclaimed pids with their statuses.
pub fn reap_finished() -> Vec<(Pid, ExitStatus)> {
    let mut reaped = Vec::new();
    loop {
        let mut status: libc::c_int = 0;
        let pid = unsafe { libc::waitpid(-1, &mut status, libc::WNOHANG) };
        match pid {
            0 => break,
            -1 => {
                if io::Error::last_os_error().raw_os_error() == Some(libc::EINTR) {
                    continue;
                }
                // ECHILD: no children left at all.
                break;
            }
            pid => reaped.push((pid, ExitStatus::from_raw(status))),
        }
    }
    reaped
}
