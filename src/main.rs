//! repo-debugger: ask an LLM to debug an issue using a directory's files
//!
//! Collects every text file under a directory, sends them along with an
//! issue description to a chat-completions service, and prints the reply.

use anyhow::Result;

fn main() -> Result<()> {
    repo_debugger::cli::run()
}
