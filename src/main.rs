fn main() {
    if let Err(err) = netdiag::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
