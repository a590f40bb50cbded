fn main() {
    if let Err(e) = cartographer_cli::run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
