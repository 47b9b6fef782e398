fn main() {
    if let Err(err) = testpilot_lib::run() {
        eprintln!("testpilot: {}", err);
        std::process::exit(1);
    }
}
