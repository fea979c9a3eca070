fn main() {
    if let Err(e) = protoweave_cli::run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
