use std::ffi::OsString;
use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;

/// Outcome of a single external tool invocation.
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    pub success: bool,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ProcessOutput {
    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).to_string()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).to_string()
    }
}

/// Capability for invoking external tools. Components take this instead of
/// spawning directly so tests can script tool behavior.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &Path, args: &[OsString]) -> std::io::Result<ProcessOutput>;
}

/// Runs tools as real subprocesses.
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, program: &Path, args: &[OsString]) -> std::io::Result<ProcessOutput> {
        log::debug!("running {} {:?}", program.display(), args);
        let output = Command::new(program).args(args).output().await?;
        Ok(ProcessOutput {
            success: output.status.success(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::path::PathBuf;
    use std::sync::Mutex;

    use super::*;

    /// One scripted tool result, optionally with files the real tool would
    /// have left on disk.
    pub(crate) struct ScriptedCall {
        pub output: ProcessOutput,
        pub creates: Vec<(PathBuf, Vec<u8>)>,
    }

    impl ScriptedCall {
        pub fn ok() -> Self {
            Self {
                output: ProcessOutput {
                    success: true,
                    stdout: Vec::new(),
                    stderr: Vec::new(),
                },
                creates: Vec::new(),
            }
        }

        pub fn ok_with_stdout(stdout: &str) -> Self {
            let mut call = Self::ok();
            call.output.stdout = stdout.as_bytes().to_vec();
            call
        }

        pub fn fail(stderr: &str) -> Self {
            Self {
                output: ProcessOutput {
                    success: false,
                    stdout: Vec::new(),
                    stderr: stderr.as_bytes().to_vec(),
                },
                creates: Vec::new(),
            }
        }

        pub fn creating(mut self, path: PathBuf, contents: &[u8]) -> Self {
            self.creates.push((path, contents.to_vec()));
            self
        }
    }

    /// Replays a fixed sequence of tool results and records every call.
    #[derive(Default)]
    pub(crate) struct ScriptedRunner {
        script: Mutex<VecDeque<ScriptedCall>>,
        calls: Mutex<Vec<(PathBuf, Vec<OsString>)>>,
    }

    impl ScriptedRunner {
        pub fn new(script: Vec<ScriptedCall>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> Vec<(PathBuf, Vec<OsString>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CommandRunner for ScriptedRunner {
        async fn run(&self, program: &Path, args: &[OsString]) -> std::io::Result<ProcessOutput> {
            self.calls
                .lock()
                .unwrap()
                .push((program.to_path_buf(), args.to_vec()));
            let call = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| ScriptedCall::fail("unscripted call"));
            for (path, contents) in &call.creates {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent).unwrap();
                }
                std::fs::write(path, contents).unwrap();
            }
            Ok(call.output)
        }
    }
}
