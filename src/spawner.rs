use std::borrow::Cow;
use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::error::LaunchError;
use crate::plan::LaunchCommand;
use crate::platform::Platform;

const TERMINAL: &str = "gnome-terminal";

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Starts a process and forgets about it.
pub trait Spawner: Send + Sync {
    fn spawn(&self, cmd: &LaunchCommand) -> Result<(), LaunchError>;
}

/// How launched processes are shown to the operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    /// A new terminal window on Unix, a new console on Windows.
    #[default]
    Window,
    /// No window, run through the platform shell.
    Background,
}

impl Strategy {
    pub fn select(self, platform: Platform) -> Box<dyn Spawner> {
        match (self, platform) {
            (Strategy::Background, platform) => Box::new(ShellSpawner { platform }),
            (Strategy::Window, Platform::Windows) => Box::new(NewConsoleSpawner),
            (Strategy::Window, Platform::Unix) => Box::new(TerminalSpawner),
        }
    }
}

/// The launcher's own stdio never reaches the child. Windows that need to
/// show output get their handles from the terminal or console they open.
fn spawn_detached(mut command: Command, program: &Path) -> Result<(), LaunchError> {
    let child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(false)
        .spawn()
        .map_err(|source| LaunchError::Spawn {
            program: program.to_path_buf(),
            source,
        })?;
    debug!(pid = ?child.id(), program = %program.display(), "process started");
    Ok(())
}

/// `cmd /C <line>`, with the line passed through unescaped since cmd.exe
/// does its own parsing. The cmd process itself never gets a window.
fn cmd_exe(line: &str) -> Command {
    let mut command = std::process::Command::new("cmd");
    command.arg("/C");
    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        command.raw_arg(line).creation_flags(CREATE_NO_WINDOW);
    }
    #[cfg(not(windows))]
    command.arg(line);
    Command::from(command)
}

fn command_line(platform: Platform, cmd: &LaunchCommand) -> String {
    std::iter::once(cmd.program.to_string_lossy())
        .chain(cmd.args.iter().map(|a| Cow::Borrowed(a.as_str())))
        .map(|word| quote(platform, &word).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Opens the command in a new terminal emulator window.
pub struct TerminalSpawner;

impl TerminalSpawner {
    fn command(&self, cmd: &LaunchCommand) -> Command {
        let mut command = Command::new(TERMINAL);
        command.arg("--").arg(&cmd.program).args(&cmd.args);
        command
    }
}

impl Spawner for TerminalSpawner {
    fn spawn(&self, cmd: &LaunchCommand) -> Result<(), LaunchError> {
        info!(command = %cmd, "opening terminal");
        spawn_detached(self.command(cmd), Path::new(TERMINAL))
    }
}

/// Runs the program in a console window of its own through `start`, so the
/// window owns the program's output.
pub struct NewConsoleSpawner;

impl NewConsoleSpawner {
    fn command_line(&self, cmd: &LaunchCommand) -> String {
        format!("start \"\" {}", command_line(Platform::Windows, cmd))
    }
}

impl Spawner for NewConsoleSpawner {
    fn spawn(&self, cmd: &LaunchCommand) -> Result<(), LaunchError> {
        let line = self.command_line(cmd);
        info!(command = %line, "opening console");
        spawn_detached(cmd_exe(&line), Path::new("cmd"))
    }
}

/// Hands the whole command line to the platform shell, without a window.
pub struct ShellSpawner {
    pub platform: Platform,
}

impl ShellSpawner {
    pub fn command_line(&self, cmd: &LaunchCommand) -> String {
        command_line(self.platform, cmd)
    }
}

impl Spawner for ShellSpawner {
    fn spawn(&self, cmd: &LaunchCommand) -> Result<(), LaunchError> {
        let line = self.command_line(cmd);
        info!(command = %line, "starting in background");
        let (shell, command) = match self.platform {
            Platform::Unix => {
                let mut command = Command::new("sh");
                command.arg("-c").arg(&line);
                ("sh", command)
            }
            Platform::Windows => ("cmd", cmd_exe(&line)),
        };
        spawn_detached(command, Path::new(shell))
    }
}

fn quote(platform: Platform, word: &str) -> Cow<'_, str> {
    let safe = match platform {
        Platform::Unix => "_-./:=+,@%",
        Platform::Windows => "_-./:=+,@\\",
    };
    let plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || safe.contains(c));
    if plain {
        return Cow::Borrowed(word);
    }
    match platform {
        Platform::Unix => Cow::Owned(format!("'{}'", word.replace('\'', r"'\''"))),
        Platform::Windows => Cow::Owned(format!("\"{}\"", word.replace('"', "\"\""))),
    }
}
