//! Prompt assembly
//!
//! Turns a [`FileMap`] and the user's issue text into the system instruction
//! and user message sent to the completion service.

use crate::domain::{Conversation, FileMap};
use crate::utils::{estimate_tokens, format_with_commas};

/// Instruction framing the model as a debugger over the supplied files.
pub const SYSTEM_PROMPT: &str = "You are an AI debugger who is trying to debug a program for a user \
based on their file system. The user has provided you with the following files and their contents, \
finally followed by the error message or issue they are facing.";

const FILES_HEADER: &str = "My files are as follows:\n\n";
const ISSUE_HEADER: &str = "\nMy issue is as follows: ";
const CLOSING_INSTRUCTION: &str =
    "\n\nGive me ideas for what could be wrong and what fixes to do in which files.";

/// Build the user message: every file as `{path}:\n{content}\n` in map
/// order, then the issue, then the request for per-file fixes.
///
/// Nothing is truncated; oversized prompts are rejected by the service.
pub fn assemble_user_prompt(files: &FileMap, issue: &str) -> String {
    let body_len: usize = files.iter().map(|(path, content)| path.len() + content.len() + 2).sum();
    let mut prompt = String::with_capacity(
        FILES_HEADER.len() + body_len + ISSUE_HEADER.len() + issue.len() + CLOSING_INSTRUCTION.len(),
    );

    prompt.push_str(FILES_HEADER);
    for (path, content) in files {
        prompt.push_str(path);
        prompt.push_str(":\n");
        prompt.push_str(content);
        prompt.push('\n');
    }
    prompt.push_str(ISSUE_HEADER);
    prompt.push_str(issue);
    prompt.push_str(CLOSING_INSTRUCTION);

    tracing::debug!(
        "Assembled prompt from {} files: {} chars, ~{} tokens",
        files.len(),
        format_with_commas(prompt.len() as u64),
        format_with_commas(estimate_tokens(&prompt) as u64),
    );

    prompt
}

/// System instruction plus the assembled user message, with no extra turns.
pub fn build_debug_conversation(files: &FileMap, issue: &str) -> Conversation {
    let user = assemble_user_prompt(files, issue);
    Conversation::new::<&str>(SYSTEM_PROMPT, &user, &[])
}
