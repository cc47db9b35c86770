//! `fork` + `execvp` launcher.
//!
//! Everything the child needs (argv, fd plan, failure messages) is built
//! before `fork`, so the child only makes async-signal-safe calls before
//! its image is replaced.

use std::ffi::CString;
use std::io::{self, Write};
use std::os::fd::RawFd;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

use super::ProcessError;

pub type Pid = libc::pid_t;

/// Exit status of a child whose program could not be found.
pub const EXIT_NOT_FOUND: i32 = 127;
/// Exit status of a child whose program exists but is not executable.
pub const EXIT_NOT_EXECUTABLE: i32 = 126;

/// Standard-stream plan applied in the child before `execvp`.
#[derive(Debug, Default, Clone)]
pub struct Redirect {
    pub stdin: Option<RawFd>,
    pub stdout: Option<RawFd>,
    /// Descriptors the child must close first (unused pipe ends).
    pub close: Vec<RawFd>,
}

impl Redirect {
    pub fn inherit() -> Self {
        Self::default()
    }
}

/// NUL-terminated argv built from owned strings.
struct CArgv {
    _strings: Vec<CString>,
    ptrs: Vec<*const libc::c_char>,
}

impl CArgv {
    fn new(args: &[String]) -> Result<Self, ProcessError> {
        let strings = args
            .iter()
            .map(|arg| {
                CString::new(arg.as_bytes())
                    .map_err(|_| ProcessError::InvalidArgument(arg.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let mut ptrs: Vec<*const libc::c_char> = strings.iter().map(|s| s.as_ptr()).collect();
        ptrs.push(std::ptr::null());
        Ok(Self {
            _strings: strings,
            ptrs,
        })
    }

    fn program(&self) -> *const libc::c_char {
        self.ptrs[0]
    }

    fn as_ptr(&self) -> *const *const libc::c_char {
        self.ptrs.as_ptr()
    }
}

/// Starts `args[0]` with `args[1..]` in a new process and returns its pid
/// without waiting. A program that cannot be executed is reported by the
/// child itself, which then exits with a non-zero status.
pub fn spawn(args: &[String], redirect: &Redirect) -> Result<Pid, ProcessError> {
    let Some(program) = args.first() else {
        return Err(ProcessError::EmptyStage("before"));
    };

    let argv = CArgv::new(args)?;
    let not_found = format!("dropsh: command not found: {}\n", program).into_bytes();
    let denied = format!("dropsh: permission denied: {}\n", program).into_bytes();

    // Buffered parent output must not be reordered after the child's.
    if let Err(e) = io::stdout().flush() {
        tracing::debug!("could not flush stdout before fork: {}", e);
    }

    let pid = unsafe { libc::fork() };
    match pid {
        -1 => Err(ProcessError::Fork(io::Error::last_os_error())),
        0 => unsafe { exec_child(&argv, redirect, &not_found, &denied) },
        pid => {
            tracing::debug!(pid, program = %program, "spawned child");
            Ok(pid)
        }
    }
}

unsafe fn exec_child(argv: &CArgv, redirect: &Redirect, not_found: &[u8], denied: &[u8]) -> ! {
    for &fd in &redirect.close {
        libc::close(fd);
    }
    if let Some(fd) = redirect.stdin {
        libc::dup2(fd, libc::STDIN_FILENO);
        if fd != libc::STDIN_FILENO {
            libc::close(fd);
        }
    }
    if let Some(fd) = redirect.stdout {
        libc::dup2(fd, libc::STDOUT_FILENO);
        if fd != libc::STDOUT_FILENO {
            libc::close(fd);
        }
    }

    // The Rust runtime ignores SIGPIPE and an ignored disposition survives
    // exec; pipeline writers must die when their reader goes away.
    libc::signal(libc::SIGPIPE, libc::SIG_DFL);

    libc::execvp(argv.program(), argv.as_ptr());

    let (message, code) = match io::Error::last_os_error().raw_os_error() {
        Some(libc::EACCES) => (denied, EXIT_NOT_EXECUTABLE),
        _ => (not_found, EXIT_NOT_FOUND),
    };
    libc::write(
        libc::STDERR_FILENO,
        message.as_ptr() as *const libc::c_void,
        message.len(),
    );
    libc::_exit(code)
}

/// Blocks until `pid` terminates. `None` means the child had already been
/// reclaimed elsewhere.
pub fn wait_for(pid: Pid) -> Result<Option<ExitStatus>, ProcessError> {
    let mut status: libc::c_int = 0;
    loop {
        let ret = unsafe { libc::waitpid(pid, &mut status, 0) };
        if ret == pid {
            let status = ExitStatus::from_raw(status);
            tracing::debug!(pid, %status, "child finished");
            return Ok(Some(status));
        }

        let err = io::Error::last_os_error();
        match err.raw_os_error() {
            Some(libc::EINTR) => continue,
            Some(libc::ECHILD) => return Ok(None),
            _ => return Err(ProcessError::Wait(err)),
        }
    }
}
