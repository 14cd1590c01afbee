fn main() {
    if let Err(error) = xsltc_cli::run() {
        // Tracing is initialized inside run() after argument parsing.
        tracing::error!(%error, "compilation failed");
        std::process::exit(1);
    }
}
