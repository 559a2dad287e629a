//! Shell completion scripts generated from the clap command tree.

use crate::cli::{Cli, CompletionsArgs};
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io::{self, Write};

pub fn handle_completions(args: &CompletionsArgs) {
    render(args.shell, &mut io::stdout());
}

fn render<W: Write>(shell: Shell, out: &mut W) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, out);
}
