use five_words::cli::{parse_cli, run};
use five_words::logging;
use std::io::{self, BufWriter};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = parse_cli();
    logging::init(cli.verbose);

    let stdout = io::stdout();
    match run(&cli, BufWriter::new(stdout.lock())) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
