use haven_logger::{ConsoleFormat, LevelFilter, Logger};

#[test]
fn console_only_logger_has_no_file_writer() {
    let logger = Logger::builder()
        .name("haven-console-only")
        .console(true)
        .console_format(ConsoleFormat::Pretty)
        .level(LevelFilter::INFO)
        .init()
        .expect("logger should initialize");

    assert!(!logger.writes_file());
    assert_eq!(logger.name(), "haven-console-only");
}
