// Runs the stdin binary end to end
use std::io::Write;
use std::process::{Command, Stdio};

#[cfg(test)]
mod tests {
    use super::*;

    fn run_with_stdin(input: &[u8]) -> std::process::Output {
        let mut child = Command::new(env!("CARGO_BIN_EXE_roi_planner"))
            .env("RUST_LOG", "debug")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();
        child.stdin.take().unwrap().write_all(input).unwrap();
        child.wait_with_output().unwrap()
    }

    #[test]
    fn invalid_utf8_line_is_skipped() {
        let output = run_with_stdin(b"a,1,0,0,0,1,0\nbad\xff,1,0,0,0,1,0\nc,2,1,0,1,2,0\n");

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        let ids: Vec<&str> = stdout.lines().filter_map(|line| line.split(' ').next()).collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn debug_artifacts_are_flushed_before_exit() {
        let output = run_with_stdin(b"a,1,0,0,0,1,0\nc,2,1,0,1,2,0\n");

        assert!(output.status.success());
        let stderr = String::from_utf8_lossy(&output.stderr);
        // 2 ROIs, 4 artifacts each, 3 repeats
        assert_eq!(stderr.matches("Position - xyz").count(), 24);
    }
}
