use burstlog::{error, info, FileSink, Logger};

// Appends a few records to `burstlog.log`, creating it if needed.
fn main() {
    let sink = FileSink::create("burstlog.log").expect("open log file");
    let logger = Logger::new(sink).unwrap();

    info!(logger, "service started on port {}", 8080);
    error!(logger, "upstream {} unreachable", "10.0.0.7");
    logger.flush();
}
