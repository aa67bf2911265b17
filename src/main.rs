//! CLI entrypoint for assetsweep.

use std::io::Write;

fn main() {
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let exit_code = assetsweep::cli::execute(std::env::args_os(), &mut stdout, &mut stderr);
    let _ = stdout.flush();
    let _ = stderr.flush();
    std::process::exit(exit_code);
}
