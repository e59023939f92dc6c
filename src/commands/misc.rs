use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io;

pub fn generate_completions(shell: Shell) {
    let mut cmd = crate::Cli::command();
    generate(shell, &mut cmd, "repo-scraper", &mut io::stdout());

    eprintln!();
    eprintln!("Save the output to the appropriate location for your shell:");
    match shell {
        Shell::Bash => {
            eprintln!("  repo-scraper completions bash > ~/.local/share/bash-completion/completions/repo-scraper");
        }
        Shell::Zsh => {
            eprintln!("  repo-scraper completions zsh > ~/.zsh/completions/_repo-scraper");
            eprintln!("  # (Add 'fpath=(~/.zsh/completions $fpath)' before 'compinit' in .zshrc)");
        }
        Shell::Fish => {
            eprintln!("  repo-scraper completions fish > ~/.config/fish/completions/repo-scraper.fish");
        }
        _ => {}
    }
}
