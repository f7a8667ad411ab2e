#[cfg(unix)]
mod cli_search;
#[cfg(unix)]
mod shell_search;
