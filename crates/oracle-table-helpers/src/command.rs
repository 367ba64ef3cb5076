//! External command runner.

use tokio::process::Command;

use crate::error::{HelperError, Result};
use crate::logger::Logger;

/// Run `args[0]` with the remaining arguments and wait for it to exit.
///
/// Returns stdout followed by stderr. A spawn failure or a non-zero exit
/// status is returned as a logged subprocess error.
pub async fn run_external_command<S: AsRef<str>>(
    args: &[S],
    logger: &dyn Logger,
) -> Result<String> {
    let (program, rest) = match args.split_first() {
        Some(split) => split,
        None => {
            return Err(HelperError::argument("external command cannot be empty").logged(logger))
        }
    };

    let output = Command::new(program.as_ref())
        .args(rest.iter().map(|a| a.as_ref()))
        .output()
        .await
        .map_err(|e| {
            HelperError::subprocess(format!("failed to run '{}': {}", program.as_ref(), e))
                .logged(logger)
        })?;

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));

    if !output.status.success() {
        return Err(HelperError::subprocess(format!(
            "'{}' exited with {}: {}",
            program.as_ref(),
            output.status,
            text.trim_end()
        ))
        .logged(logger));
    }

    logger.debug(&format!("Ran external command '{}'.", program.as_ref()));
    Ok(text)
}
