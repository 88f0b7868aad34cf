// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-group (Unix) / job-object (Windows) child supervision and
//! signal forwarding.

use std::process::{Child, Command, ExitStatus};
use std::time::Duration;

/// Grace period between the cleanup `SIGTERM` and the escalating
/// `SIGKILL`.
pub const CLEANUP_GRACE: Duration = Duration::from_millis(100);

/// Maps a child's exit into the Session Manager's process exit code:
/// 128 + signal number on Unix for a signal death, the child's own code
/// otherwise.
pub fn exit_code_for(status: &ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    status.code().unwrap_or(1)
}

#[cfg(unix)]
mod platform {
    use super::*;
    use nix::sys::signal::{self, Signal};
    use nix::unistd::Pid;
    use std::os::unix::process::CommandExt;

    /// A child spawned into its own process group, so the whole group can
    /// be signalled atomically. Falls back to signalling the single child
    /// if group creation didn't happen (it always does on Unix via
    /// `process_group`, but the type still models the fallback path for
    /// platforms where it might fail).
    pub struct Supervised {
        child: Child,
        grouped: bool,
        cleaned_up: bool,
    }

    /// Spawns `cmd` in a new process group (pgid == child pid).
    pub fn spawn(mut cmd: Command) -> std::io::Result<Supervised> {
        cmd.process_group(0);
        match cmd.spawn() {
            Ok(child) => Ok(Supervised {
                child,
                grouped: true,
                cleaned_up: false,
            }),
            Err(e) => Err(e),
        }
    }

    impl Supervised {
        pub fn pid(&self) -> u32 {
            self.child.id()
        }

        fn target_pid(&self) -> Pid {
            Pid::from_raw(self.child.id() as i32)
        }

        /// Forwards `signal` to the whole process group, or to the lone
        /// child if group operations are unavailable, warning once.
        pub fn forward_signal(&self, sig: Signal) {
            let result = if self.grouped {
                signal::killpg(self.target_pid(), Some(sig))
            } else {
                signal::kill(self.target_pid(), Some(sig))
            };
            if let Err(e) = result {
                if e != nix::errno::Errno::ESRCH {
                    tracing::warn!(signal = ?sig, error = %e, "failed to forward signal to child");
                }
            }
        }

        pub fn wait(&mut self) -> std::io::Result<ExitStatus> {
            self.child.wait()
        }

        /// Non-blocking poll, so a caller can interleave signal checks with
        /// waiting for the child instead of only blocking on it.
        pub fn try_wait(&mut self) -> std::io::Result<Option<ExitStatus>> {
            self.child.try_wait()
        }

        /// `SIGTERM` -> grace period -> `SIGKILL`, guarded so a second call
        /// is a no-op.
        pub fn cleanup(&mut self) {
            if self.cleaned_up {
                return;
            }
            self.cleaned_up = true;
            self.forward_signal(Signal::SIGTERM);
            std::thread::sleep(CLEANUP_GRACE);
            self.forward_signal(Signal::SIGKILL);
            let _ = self.child.wait();
        }
    }
}

#[cfg(windows)]
#[allow(unsafe_code)]
mod platform {
    use super::*;
    use windows_sys::Win32::Foundation::{CloseHandle, HANDLE};
    use windows_sys::Win32::System::JobObjects::{
        AssignProcessToJobObject, CreateJobObjectW, JobObjectExtendedLimitInformation,
        SetInformationJobObject, JOBOBJECT_EXTENDED_LIMIT_INFORMATION,
        JOB_OBJECT_LIMIT_KILL_ON_JOB_CLOSE,
    };
    use windows_sys::Win32::System::Threading::TerminateJobObject;
    use std::os::windows::io::AsRawHandle;

    pub struct Supervised {
        child: Child,
        job: Option<HANDLE>,
        cleaned_up: bool,
    }

    /// Spawns `cmd` and assigns it to a "kill on close" job object, so the
    /// whole descendant tree terminates when the job handle is closed or
    /// `TerminateJobObject` is called. Falls back to a bare child if job
    /// creation or assignment fails, warning once.
    pub fn spawn(mut cmd: Command) -> std::io::Result<Supervised> {
        let child = cmd.spawn()?;
        let job = create_job_for(&child);
        if job.is_none() {
            tracing::warn!("failed to create/assign Windows job object; falling back to single-process kill");
        }
        Ok(Supervised {
            child,
            job,
            cleaned_up: false,
        })
    }

    fn create_job_for(child: &Child) -> Option<HANDLE> {
        unsafe {
            let job = CreateJobObjectW(std::ptr::null(), std::ptr::null());
            if job.is_null() {
                return None;
            }
            let mut info: JOBOBJECT_EXTENDED_LIMIT_INFORMATION = std::mem::zeroed();
            info.BasicLimitInformation.LimitFlags = JOB_OBJECT_LIMIT_KILL_ON_JOB_CLOSE;
            let set_ok = SetInformationJobObject(
                job,
                JobObjectExtendedLimitInformation,
                &info as *const _ as *const _,
                std::mem::size_of::<JOBOBJECT_EXTENDED_LIMIT_INFORMATION>() as u32,
            );
            if set_ok == 0 {
                CloseHandle(job);
                return None;
            }
            let process_handle = child.as_raw_handle() as HANDLE;
            if AssignProcessToJobObject(job, process_handle) == 0 {
                CloseHandle(job);
                return None;
            }
            Some(job)
        }
    }

    impl Supervised {
        pub fn pid(&self) -> u32 {
            self.child.id()
        }

        pub fn forward_signal(&self, _sig: ()) {
            // Windows has no POSIX signal equivalent at the job-object
            // level; termination always goes through `cleanup`.
        }

        pub fn wait(&mut self) -> std::io::Result<ExitStatus> {
            self.child.wait()
        }

        pub fn try_wait(&mut self) -> std::io::Result<Option<ExitStatus>> {
            self.child.try_wait()
        }

        pub fn cleanup(&mut self) {
            if self.cleaned_up {
                return;
            }
            self.cleaned_up = true;
            if let Some(job) = self.job.take() {
                unsafe {
                    TerminateJobObject(job, 1);
                    CloseHandle(job);
                }
            } else {
                let _ = self.child.kill();
            }
            let _ = self.child.wait();
        }
    }
}

pub use platform::{spawn, Supervised};

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
