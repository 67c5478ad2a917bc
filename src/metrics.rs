use prometheus::{register_int_counter_vec, IntCounterVec};

lazy_static::lazy_static! {
    pub static ref INGESTIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "flatknn_ingestions_total", "Point set ingestions", &["source", "status"]
    ).unwrap();
    pub static ref SEARCHES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "flatknn_searches_total", "Search calls", &["mode"]
    ).unwrap();
    pub static ref SEARCH_FAILURES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "flatknn_search_failures_total", "Failed search calls", &["mode", "reason"]
    ).unwrap();
}

pub fn init() {
    lazy_static::initialize(&INGESTIONS_TOTAL);
    lazy_static::initialize(&SEARCHES_TOTAL);
    lazy_static::initialize(&SEARCH_FAILURES_TOTAL);
}

/// Render every registered metric in the Prometheus text format.
pub fn gather_text() -> String {
    use prometheus::Encoder;

    let encoder = prometheus::TextEncoder::new();
    let mut buf = Vec::new();
    if encoder.encode(&prometheus::gather(), &mut buf).is_err() {
        return String::new();
    }
    String::from_utf8(buf).unwrap_or_default()
}
