use std::process::ExitCode;

use fsops::FsError;
use fsops::output as out;

mod app;
mod logging;

fn main() -> ExitCode {
    let args = fsops::cli::parse();
    match app::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            out::print_error(&format!("{e:#}"));
            let code = e.downcast_ref::<FsError>().map_or(1, FsError::code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
