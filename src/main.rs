fn main() {
    if let Err(e) = parenting_digest::cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
