use burstlog::{info, Logger, NullSink};

// Sample script to stress the transport from several producers at once.
fn main() {
    let logger = Logger::new(NullSink).unwrap();

    std::thread::scope(|scope| {
        for tid in 0..4 {
            let logger = &logger;
            scope.spawn(move || {
                for i in 0..1_000_000u64 {
                    info!(logger, "t={} i={}", tid, i);
                }
            });
        }
    });
    logger.flush();

    let ring = logger.ring().unwrap();
    eprintln!(
        "rejections: {}, cas retries: {}",
        ring.rejections(),
        ring.cas_retries()
    );
}
