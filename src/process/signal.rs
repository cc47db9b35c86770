use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use signal_hook::consts::SIGINT;

use crate::process::ProcessError;

/// Catches SIGINT in the shell so Ctrl-C only reaches the foreground
/// children. The handler is a caught one, so `execvp` restores the default
/// disposition in every child. The returned flag is raised on each SIGINT.
pub fn setup_signal_handlers() -> Result<Arc<AtomicBool>, ProcessError> {
    let interrupted = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(SIGINT, Arc::clone(&interrupted)).map_err(ProcessError::Signal)?;
    Ok(interrupted)
}
