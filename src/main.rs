use dropshell::core::config::ShellConfig;
use dropshell::flags::Flags;
use dropshell::shell::Shell;
use std::env;
use tracing::Level;

fn main() -> Result<(), dropshell::error::ShellError> {
    let mut flags = Flags::new();
    let args: Vec<String> = env::args().skip(1).collect();
    flags.parse(&args)?;

    if flags.is_set("help") {
        flags.print_help();
        return Ok(());
    }

    if flags.is_set("version") {
        println!("dropshell {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let level = if flags.is_set("debug") {
        Level::DEBUG
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = ShellConfig::load(&flags)?;
    let mut shell = Shell::new(config)?;
    shell.run()
}
