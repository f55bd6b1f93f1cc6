use ics_timesheet::Config;
use std::env;
use std::process;

fn main() {
    env_logger::init();

    let config = Config::build(env::args()).unwrap_or_else(|err| {
        eprintln!("Problem parsing arguments: {err}");
        process::exit(1);
    });

    if let Err(e) = ics_timesheet::run(config) {
        eprintln!("Application error: {e}");
        process::exit(1);
    }
}
