use colored::Colorize;

fn main() {
    if let Err(e) = sitebuild::run() {
        eprintln!("{}: {:?}", "ERROR".red(), e);
        std::process::exit(1);
    }
}
