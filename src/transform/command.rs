//! External transform programs

use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

use log::debug;

use crate::errors::{Result, transform_error};

/// Runs `program` with `args`, feeding `input` on stdin, and returns its stdout
///
/// Stdin is fed from a helper thread while stdout and stderr are drained.
///
/// # Errors
/// Returns an error if the program cannot be started, exits unsuccessfully,
/// or prints output that is not valid UTF-8
pub fn run_command(program: &str, args: &[String], input: &str) -> Result<String> {
    debug!("Running transform program: {} {}", program, args.join(" "));

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| transform_error(program, &format!("failed to start: {e}")))?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| transform_error(program, "stdin was not captured"))?;
    let owned_input = input.to_owned();
    let writer = thread::spawn(move || stdin.write_all(owned_input.as_bytes()));

    let output = child
        .wait_with_output()
        .map_err(|e| transform_error(program, &format!("failed to wait: {e}")))?;
    let status = output.status;

    match writer.join() {
        Ok(Ok(())) => {}
        // a program that exits early closes its stdin; its exit status decides
        Ok(Err(_)) if !status.success() => {}
        Ok(Err(e)) => {
            return Err(transform_error(program, &format!("failed to write input: {e}")));
        }
        Err(_) => return Err(transform_error(program, "input writer panicked")),
    }

    if !status.success() {
        return Err(transform_error(
            program,
            &format!(
                "exited with {}: {}",
                status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        ));
    }

    String::from_utf8(output.stdout)
        .map_err(|e| transform_error(program, &format!("output is not UTF-8: {e}")))
}
