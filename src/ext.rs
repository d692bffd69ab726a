use std::{
  io,
  process::{Child, Command, ExitStatus},
  time::Duration,
};

use wait_timeout::ChildExt as WaitExt;

#[extend::ext]
pub impl Child {
  /// Waits for the child to exit. On timeout, the child and everything in its
  /// process group are killed, the child is reaped, and `Ok(None)` is
  /// returned.
  fn wait_or_kill(&mut self, timeout: Duration) -> io::Result<Option<ExitStatus>> {
    if let Some(status) = self.wait_timeout(timeout)? {
      return Ok(Some(status));
    }

    kill_group(self)?;
    self.wait()?;

    Ok(None)
  }
}

#[extend::ext]
pub impl Command {
  /// Spawns the command as the leader of a new process group, so that a kill
  /// on timeout also reaches the processes it starts.
  fn spawn_group(&mut self) -> io::Result<Child> {
    #[cfg(unix)]
    {
      use std::os::unix::process::CommandExt as _;

      self.process_group(0);
    }

    self.spawn()
  }
}

#[cfg(unix)]
fn kill_group(child: &mut Child) -> io::Result<()> {
  use nix::{
    errno::Errno,
    sys::signal::{killpg, Signal},
    unistd::Pid,
  };

  #[allow(clippy::cast_possible_wrap)]
  let pgid = Pid::from_raw(child.id() as i32);

  match killpg(pgid, Signal::SIGKILL) {
    Ok(()) => Ok(()),
    // Not a group leader.
    Err(Errno::ESRCH) => child.kill(),
    Err(errno) => Err(errno.into()),
  }
}

#[cfg(not(unix))]
fn kill_group(child: &mut Child) -> io::Result<()> {
  child.kill()
}

#[cfg(all(test, unix))]
mod tests {
  use std::{thread, time::Instant};

  use tempfile::TempDir;

  use super::*;

  fn status_timeout(command: &mut Command, timeout: Duration) -> io::Result<Option<ExitStatus>> {
    command.spawn_group()?.wait_or_kill(timeout)
  }

  #[test]
  fn fast_command_reports_status() {
    let status = status_timeout(&mut Command::new("true"), Duration::from_secs(5)).unwrap();
    assert!(status.unwrap().success());

    let status = status_timeout(&mut Command::new("false"), Duration::from_secs(5)).unwrap();
    assert!(!status.unwrap().success());
  }

  #[test]
  fn slow_command_is_killed() {
    let start = Instant::now();
    let status = status_timeout(Command::new("sleep").arg("30"), Duration::from_millis(100)).unwrap();

    assert!(status.is_none());
    assert!(start.elapsed() < Duration::from_secs(10));
  }

  #[test]
  fn timeout_kills_grandchildren() {
    let dir = TempDir::new().unwrap();
    let marker = dir.path().join("marker");

    let mut sh = Command::new("sh");
    sh.arg("-c")
      .arg(format!("(sleep 1; touch '{}') & wait", marker.display()));

    let status = status_timeout(&mut sh, Duration::from_millis(200)).unwrap();
    assert!(status.is_none());

    thread::sleep(Duration::from_millis(1500));
    assert!(!marker.exists(), "grandchild outlived the timeout");
  }

  #[test]
  fn kill_without_own_group_falls_back_to_child() {
    let mut child = Command::new("sleep").arg("30").spawn().unwrap();

    assert!(child.wait_or_kill(Duration::from_millis(50)).unwrap().is_none());
  }

  #[test]
  fn missing_program_fails_to_spawn() {
    let err = Command::new("/nonexistent/aoc-bench-tool").spawn_group().unwrap_err();

    assert_eq!(err.kind(), io::ErrorKind::NotFound);
  }
}
