//! Answer input: inline text, a file, or stdin

use std::fs;
use std::io::{self, BufRead, Read};

use scigrade_core::error::{Result, ScigradeError};

use crate::cli::AnswerArgs;

/// Line that ends one answer in interactive mode
pub const END_OF_ANSWER: &str = ".";

/// Read the answer named by the arguments. Stdin is used when neither
/// `--answer` nor `--answer-file` is given.
pub fn read_answer(args: &AnswerArgs) -> Result<String> {
    if let Some(answer) = &args.answer {
        return Ok(answer.clone());
    }

    if let Some(path) = &args.answer_file {
        return fs::read_to_string(path).map_err(|e| {
            ScigradeError::Other(format!(
                "failed to read answer file {}: {}",
                path.display(),
                e
            ))
        });
    }

    let mut answer = String::new();
    io::stdin().read_to_string(&mut answer)?;
    Ok(answer)
}

/// Read the next answer block: lines up to a line holding only `.` or EOF.
///
/// Returns `None` once the input is exhausted and nothing was read.
pub fn next_answer<R: BufRead>(reader: &mut R) -> Result<Option<String>> {
    let mut lines = Vec::new();
    let mut saw_input = false;

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        saw_input = true;

        let trimmed = line.trim_end_matches(['\n', '\r']);
        if trimmed == END_OF_ANSWER {
            return Ok(Some(lines.join("\n")));
        }
        lines.push(trimmed.to_string());
    }

    Ok(saw_input.then(|| lines.join("\n")))
}
