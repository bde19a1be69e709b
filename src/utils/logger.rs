// 日誌工具

/// 除錯模式輸出 Debug 以上，否則只輸出錯誤；RUST_LOG 仍可覆寫模組設定
pub fn init_logger(debug: bool) {
    let level = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Error
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp_millis()
        .init();
}
