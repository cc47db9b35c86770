use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use dropshell::core::commands::Flow;
use dropshell::core::config::ShellConfig;
use dropshell::error::ShellError;
use dropshell::process::reap_finished;
use dropshell::shell::Interpreter;

// Tests here fork children and reap with waitpid(-1), and some change the
// working directory, so they must not overlap.
static SERIAL: Mutex<()> = Mutex::new(());

fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct CwdGuard(PathBuf);

impl CwdGuard {
    fn new() -> Self {
        CwdGuard(env::current_dir().unwrap())
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = env::set_current_dir(&self.0);
    }
}

fn interpreter() -> Interpreter {
    Interpreter::new(&ShellConfig::default())
}

fn eval(sh: &mut Interpreter, line: &str) -> (Result<Flow, ShellError>, String) {
    let mut out = Vec::new();
    let result = sh.eval(line, &mut out);
    (result, String::from_utf8(out).unwrap())
}

fn history_of(sh: &Interpreter) -> Option<String> {
    sh.state().history.peek().map(str::to_owned)
}

#[test]
fn test_blank_lines_are_no_ops() {
    let _lock = serial();
    let mut sh = interpreter();
    eval(&mut sh, "echo first");

    for line in ["", "   ", "\t \t", "\n"] {
        let (result, out) = eval(&mut sh, line);
        assert!(matches!(result, Ok(Flow::Continue)));
        assert!(out.is_empty());
    }
    assert_eq!(history_of(&sh).as_deref(), Some("echo first"));
}

#[test]
fn test_history_records_exact_line() {
    let _lock = serial();
    let mut sh = interpreter();

    eval(&mut sh, "echo  spaced\targs\n");
    assert_eq!(history_of(&sh).as_deref(), Some("echo  spaced\targs"));

    let (result, _) = eval(&mut sh, "true &");
    assert!(result.is_ok());
    assert_eq!(history_of(&sh).as_deref(), Some("true &"));

    let (_, out) = eval(&mut sh, "history");
    assert_eq!(out, "Last command: history\n");
}

#[test]
fn test_replay_without_history() {
    let _lock = serial();
    let mut sh = interpreter();

    let (result, out) = eval(&mut sh, "!!");
    assert!(matches!(result, Err(ShellError::NoHistory)));
    assert!(out.is_empty());
    assert!(!sh.state().history.is_available());

    let (_, out) = eval(&mut sh, "history");
    assert_eq!(out, "No commands in history.\n");
}

#[test]
fn test_replay_runs_stored_line() {
    let _lock = serial();
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("count.txt");
    // Lines carry no quoting, so the side effect lives in a script file.
    let script = dir.path().join("append.sh");
    fs::write(&script, format!("echo x >> {}\n", target.display())).unwrap();
    let line_to_replay = format!("sh {}", script.display());

    let mut sh = interpreter();
    eval(&mut sh, &line_to_replay).0.unwrap();

    let (result, out) = eval(&mut sh, "  !!  ");
    assert!(matches!(result, Ok(Flow::Continue)));
    assert_eq!(out, format!("{}\n", line_to_replay));
    assert_eq!(history_of(&sh), Some(line_to_replay));
    assert_eq!(fs::read_to_string(&target).unwrap(), "x\nx\n");
}

#[test]
fn test_foreground_echo() {
    let _lock = serial();
    let mut sh = interpreter();
    let (result, out) = eval(&mut sh, "echo hi");
    assert!(matches!(result, Ok(Flow::Continue)));
    assert!(out.is_empty());
}

#[test]
fn test_unknown_program_is_not_fatal() {
    let _lock = serial();
    let mut sh = interpreter();
    let (result, _) = eval(&mut sh, "dropsh-no-such-program --flag");
    assert!(matches!(result, Ok(Flow::Continue)));
}

#[test]
fn test_pipeline_carries_bytes() {
    let _lock = serial();
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("piped.txt");

    let mut sh = interpreter();
    let line = format!("printf hello\\nworld\\n | tee {}", target.display());
    let (result, _) = eval(&mut sh, &line);

    assert!(matches!(result, Ok(Flow::Continue)));
    assert_eq!(fs::read_to_string(&target).unwrap(), "hello\nworld\n");
}

#[test]
fn test_pipeline_matches_standalone_listing() {
    let _lock = serial();
    let dir = tempfile::tempdir().unwrap();
    for name in ["a", "b", "c"] {
        fs::write(dir.path().join(name), "").unwrap();
    }
    let listing = tempfile::tempdir().unwrap();
    let target = listing.path().join("ls.txt");

    let mut sh = interpreter();
    let line = format!("ls {} | tee {}", dir.path().display(), target.display());
    eval(&mut sh, &line).0.unwrap();

    assert_eq!(fs::read_to_string(&target).unwrap().lines().count(), 3);
}

#[test]
fn test_background_pipeline_rejected() {
    let _lock = serial();
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("never.txt");

    let mut sh = interpreter();
    let line = format!("echo hi | tee {} &", target.display());
    let (result, _) = eval(&mut sh, &line);

    assert!(matches!(result, Err(ShellError::BackgroundPipeline)));
    assert!(!target.exists());
    assert_eq!(history_of(&sh), Some(line));
}

#[test]
fn test_empty_pipeline_side_rejected() {
    let _lock = serial();
    let mut sh = interpreter();
    let (result, _) = eval(&mut sh, "ls |");
    assert!(matches!(result, Err(ShellError::ProcessError(_))));
}

#[test]
fn test_background_returns_immediately_and_is_reaped() {
    let _lock = serial();
    let mut sh = interpreter();

    let started = Instant::now();
    let (result, out) = eval(&mut sh, "sleep 1 &");
    assert!(matches!(result, Ok(Flow::Continue)));
    assert!(started.elapsed() < Duration::from_millis(900));

    let pid: i32 = out
        .trim()
        .strip_prefix("[Process ")
        .and_then(|rest| rest.strip_suffix(" running in background]"))
        .unwrap()
        .parse()
        .unwrap();

    let mut reaped = false;
    for _ in 0..100 {
        if reap_finished().iter().any(|(p, _)| *p == pid) {
            reaped = true;
            break;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    assert!(reaped, "background child {} was never reaped", pid);
}

#[test]
fn test_cd_and_pwd() {
    let _lock = serial();
    let _cwd = CwdGuard::new();
    let mut sh = interpreter();

    let (_, before) = eval(&mut sh, "pwd");
    eval(&mut sh, "cd /tmp").0.unwrap();
    let (_, after) = eval(&mut sh, "pwd");

    let tmp = fs::canonicalize("/tmp").unwrap();
    assert_eq!(PathBuf::from(after.trim()), tmp);
    assert_ne!(before, after);
}

#[test]
fn test_cd_invalid_path_keeps_directory() {
    let _lock = serial();
    let _cwd = CwdGuard::new();
    let mut sh = interpreter();

    let (_, before) = eval(&mut sh, "pwd");
    let (result, _) = eval(&mut sh, "cd /path/that/does/not/exist");
    let (_, after) = eval(&mut sh, "pwd");

    assert!(matches!(result, Err(ShellError::Command(_))));
    assert_eq!(before, after);
}

#[test]
fn test_cd_without_argument_goes_home() {
    let _lock = serial();
    let _cwd = CwdGuard::new();
    let home = tempfile::tempdir().unwrap();
    let old_home = env::var_os("HOME");
    env::set_var("HOME", home.path());

    let mut sh = interpreter();
    let result = eval(&mut sh, "cd").0;
    let now = env::current_dir().unwrap();

    match old_home {
        Some(value) => env::set_var("HOME", value),
        None => env::remove_var("HOME"),
    }
    assert!(result.is_ok());
    assert_eq!(now, fs::canonicalize(home.path()).unwrap());
}

#[test]
fn test_builtins_take_priority_over_pipe_and_background() {
    let _lock = serial();
    let mut sh = interpreter();
    eval(&mut sh, "echo kept").0.unwrap();

    let (result, out) = eval(&mut sh, "help | wc -l &");
    assert!(matches!(result, Ok(Flow::Continue)));
    assert!(out.contains("Built-in commands"));

    let (result, _) = eval(&mut sh, "exit &");
    assert!(matches!(result, Ok(Flow::Exit)));
}

#[test]
fn test_exit() {
    let _lock = serial();
    let mut sh = interpreter();
    let (result, out) = eval(&mut sh, "exit");
    assert!(matches!(result, Ok(Flow::Exit)));
    assert!(out.is_empty());
}

#[test]
fn test_input_limits() {
    let _lock = serial();
    let config = ShellConfig {
        max_line_length: 80,
        max_args: 4,
        ..ShellConfig::default()
    };
    let mut sh = Interpreter::new(&config);

    let long = format!("echo {}", "x".repeat(80));
    assert!(matches!(
        eval(&mut sh, &long).0,
        Err(ShellError::LineTooLong { max: 80, .. })
    ));
    assert!(!sh.state().history.is_available());

    assert!(matches!(
        eval(&mut sh, "echo a b c d").0,
        Err(ShellError::TooManyArguments { count: 5, max: 4 })
    ));
    assert!(eval(&mut sh, "echo a b c &").0.is_ok());
}

#[test]
fn test_quiet_suppresses_echo_and_notices() {
    let _lock = serial();
    let config = ShellConfig {
        quiet: true,
        ..ShellConfig::default()
    };
    let mut sh = Interpreter::new(&config);

    let (result, out) = eval(&mut sh, "true &");
    assert!(matches!(result, Ok(Flow::Continue)));
    assert!(out.is_empty());

    let (result, out) = eval(&mut sh, "!!");
    assert!(matches!(result, Ok(Flow::Continue)));
    assert!(out.is_empty());
    assert_eq!(history_of(&sh).as_deref(), Some("true &"));

    let (_, out) = eval(&mut sh, "history");
    assert_eq!(out, "Last command: history\n");
}
