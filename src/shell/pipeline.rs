use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};
use std::process::ExitStatus;

use crate::input::parser::PIPE_MARKER;
use crate::process::{self, Pid, ProcessError, Redirect};

/// Commands connected stdout-to-stdin. Lines are split at the first `|`
/// only, so at most two stages come out of [`Pipeline::split`]; a later `|`
/// stays an ordinary argument of the second stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    stages: Vec<Vec<String>>,
}

impl Pipeline {
    pub fn split(args: &[String]) -> Result<Self, ProcessError> {
        let Some(at) = args.iter().position(|arg| arg == PIPE_MARKER) else {
            if args.is_empty() {
                return Err(ProcessError::EmptyStage("before"));
            }
            return Ok(Self {
                stages: vec![args.to_vec()],
            });
        };

        let (left, right) = (&args[..at], &args[at + 1..]);
        if left.is_empty() {
            return Err(ProcessError::EmptyStage("before"));
        }
        if right.is_empty() {
            return Err(ProcessError::EmptyStage("after"));
        }

        Ok(Self {
            stages: vec![left.to_vec(), right.to_vec()],
        })
    }

    pub fn stages(&self) -> &[Vec<String>] {
        &self.stages
    }

    /// Spawns every stage, then blocks until all of them have terminated.
    /// Statuses come back in stage order; `None` marks a child that was
    /// already reclaimed elsewhere.
    pub fn execute(&self) -> Result<Vec<Option<ExitStatus>>, ProcessError> {
        let mut pids: Vec<Pid> = Vec::with_capacity(self.stages.len());
        // Read end feeding the next stage's stdin.
        let mut upstream: Option<OwnedFd> = None;

        for (index, stage) in self.stages.iter().enumerate() {
            let is_last = index + 1 == self.stages.len();
            let downstream = if is_last {
                None
            } else {
                match create_pipe() {
                    Ok(pipe) => Some(pipe),
                    Err(e) => {
                        drop(upstream.take());
                        wait_all(&pids);
                        return Err(e);
                    }
                }
            };

            let redirect = Redirect {
                stdin: upstream.as_ref().map(AsRawFd::as_raw_fd),
                stdout: downstream.as_ref().map(|(_, write)| write.as_raw_fd()),
                close: downstream
                    .as_ref()
                    .map(|(read, _)| vec![read.as_raw_fd()])
                    .unwrap_or_default(),
            };
            tracing::debug!(stage = index, args = ?stage, "starting pipeline stage");
            let spawned = process::spawn(stage, &redirect);

            // The parent never touches pipe data: drop our copies right away.
            drop(upstream.take());
            upstream = downstream.map(|(read, write)| {
                drop(write);
                read
            });

            match spawned {
                Ok(pid) => pids.push(pid),
                Err(e) => {
                    drop(upstream.take());
                    wait_all(&pids);
                    return Err(e);
                }
            }
        }

        let mut statuses = Vec::with_capacity(pids.len());
        let mut failure = None;
        for &pid in &pids {
            match process::wait_for(pid) {
                Ok(status) => statuses.push(status),
                Err(e) => {
                    statuses.push(None);
                    if failure.is_none() {
                        failure = Some(e);
                    }
                }
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(statuses),
        }
    }
}

fn create_pipe() -> Result<(OwnedFd, OwnedFd), ProcessError> {
    let mut fds: [RawFd; 2] = [-1; 2];
    if unsafe { libc::pipe(fds.as_mut_ptr()) } == -1 {
        return Err(ProcessError::Pipe(io::Error::last_os_error()));
    }
    // SAFETY: pipe(2) just returned two fresh descriptors we now own.
    Ok(unsafe { (OwnedFd::from_raw_fd(fds[0]), OwnedFd::from_raw_fd(fds[1])) })
}

/// Best-effort wait used while abandoning a partially started pipeline.
fn wait_all(pids: &[Pid]) {
    for &pid in pids {
        if let Err(e) = process::wait_for(pid) {
            tracing::warn!(pid, "could not wait for pipeline stage: {}", e);
        }
    }
}
