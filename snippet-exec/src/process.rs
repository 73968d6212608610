use nix::errno::Errno;
use nix::sys::signal::{killpg, Signal};
use nix::unistd::{setpgid, Pid};
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::{
    io::{AsyncRead, AsyncReadExt},
    process::Command,
    task::JoinHandle,
    time::{self, Duration, Instant},
};
use tracing::{debug, warn};

use crate::{error::Error, Result};

/// How long to wait for the output pipes to drain after a forced kill.
const DRAIN_GRACE: Duration = Duration::from_secs(1);

/// A command line to run inside a workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: OsString,
    pub args: Vec<OsString>,
    pub current_dir: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// How a subprocess ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Code(i32),
    Signal(i32),
    TimedOut,
}

impl From<ExitStatus> for Exit {
    fn from(status: ExitStatus) -> Self {
        use std::os::unix::process::ExitStatusExt;
        match (status.code(), status.signal()) {
            (Some(code), _) => Exit::Code(code),
            (None, Some(signal)) => Exit::Signal(signal),
            (None, None) => Exit::Code(-1),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub exit: Exit,
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit == Exit::Code(0)
    }

    pub fn timed_out(&self) -> bool {
        self.exit == Exit::TimedOut
    }
}

/// Resolve a program to a path: explicit paths are used as-is, bare names are
/// looked up on `PATH`.
pub fn resolve_program(program: impl AsRef<OsStr>) -> Result<PathBuf> {
    let path = Path::new(program.as_ref());
    let not_found = || Error::ToolNotFound(path.display().to_string());
    if path.components().count() > 1 {
        return if path.exists() {
            Ok(path.to_path_buf())
        } else {
            Err(not_found())
        };
    }
    which::which(path).map_err(|_| not_found())
}

/// Run `spec` to completion or until `timeout` elapses.
///
/// The child leads its own process group so that a timeout can take down
/// anything it spawned. Stdin is closed; stdout and stderr are captured in
/// full.
pub async fn run(spec: &CommandSpec, timeout: Duration) -> Result<ProcessOutput> {
    let program = resolve_program(&spec.program)?;
    let name = spec.program.to_string_lossy();

    let mut command = Command::new(&program);
    command
        .args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = &spec.current_dir {
        command.current_dir(dir);
    }

    unsafe {
        command.pre_exec(|| {
            setpgid(Pid::from_raw(0), Pid::from_raw(0)).map_err(std::io::Error::from)
        });
    }

    debug!("Running `{}` (timeout {:?})", spec, timeout);
    let start = Instant::now();

    let mut child = command.spawn().map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::ToolNotFound(name.to_string()),
        _ => Error::Io(e),
    })?;
    let pid = child.id().map(|id| Pid::from_raw(id as i32));

    let mut stdout_task = tokio::spawn(read_stream(child.stdout.take()));
    let mut stderr_task = tokio::spawn(read_stream(child.stderr.take()));

    let finished = time::timeout(timeout, async {
        let status = child.wait().await?;
        let stdout = join_reader(&mut stdout_task).await?;
        let stderr = join_reader(&mut stderr_task).await?;
        Ok::<_, Error>((status, stdout, stderr))
    })
    .await;

    match finished {
        Ok(result) => {
            let (status, stdout, stderr) = result?;
            let elapsed = start.elapsed();
            debug!("`{}` exited with {} after {:?}", name, status, elapsed);
            Ok(ProcessOutput {
                exit: Exit::from(status),
                stdout: decode(stdout),
                stderr: decode(stderr),
                elapsed,
            })
        }
        Err(_) => {
            warn!("`{}` exceeded {:?}, killing process group", name, timeout);
            match pid {
                Some(pid) => kill_group(pid),
                None => {
                    let _ = child.start_kill();
                }
            }
            if let Err(e) = child.wait().await {
                warn!("Failed to reap `{}`: {}", name, e);
            }

            let stdout = drain(stdout_task).await;
            let stderr = drain(stderr_task).await;
            Ok(ProcessOutput {
                exit: Exit::TimedOut,
                stdout: decode(stdout),
                stderr: decode(stderr),
                elapsed: start.elapsed(),
            })
        }
    }
}

fn kill_group(pid: Pid) {
    match killpg(pid, Signal::SIGKILL) {
        Ok(()) | Err(Errno::ESRCH) => {}
        Err(e) => warn!("Failed to kill process group {}: {}", pid, e),
    }
}

async fn read_stream<R>(stream: Option<R>) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    if let Some(mut stream) = stream {
        stream.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

async fn join_reader(task: &mut JoinHandle<std::io::Result<Vec<u8>>>) -> Result<Vec<u8>> {
    let bytes = task
        .await
        .map_err(|e| Error::Io(std::io::Error::other(e)))??;
    Ok(bytes)
}

/// Collect whatever a reader got before the kill. A process that escaped the
/// group may still hold the pipe open, so this gives up after a short grace.
async fn drain(mut task: JoinHandle<std::io::Result<Vec<u8>>>) -> Vec<u8> {
    match time::timeout(DRAIN_GRACE, join_reader(&mut task)).await {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(e)) => {
            warn!("Failed to read process output: {}", e);
            Vec::new()
        }
        Err(_) => {
            task.abort();
            Vec::new()
        }
    }
}

fn decode(bytes: Vec<u8>) -> String {
    String::from_utf8_lossy(&bytes).into_owned()
}
